use thiserror::Error;

pub type PlaygroundResult<T> = Result<T, PlaygroundError>;

/// Everything that can go wrong between the prompt box and the token table.
///
/// None of these are fatal: the UI turns each one into a status message and
/// stays interactive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaygroundError {
    #[error("Please add a prompt to tokenize.")]
    EmptyPrompt,

    /// The hub answered with a non-success status.
    #[error("Failed to fetch {resource} ({status})")]
    Fetch { status: u16, resource: String },

    /// The request never produced a response (DNS, TLS, reset, timeout).
    #[error("Failed to fetch {resource}: {message}")]
    Network { resource: String, message: String },

    #[error("Could not build tokenizer: {0}")]
    TokenizerConstruction(String),

    #[error("Tokenizer encode failed: {0}")]
    Encode(String),

    #[error("Clipboard unavailable.")]
    Clipboard(String),

    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),

    /// A tokenize thread panicked before it could report back.
    #[error("Tokenizer crashed: {0}")]
    WorkerPanic(String),
}

impl PlaygroundError {
    /// HTTP status carried by a hub rejection, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            PlaygroundError::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }
}
