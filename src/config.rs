use crate::catalog;
use crate::hub::DEFAULT_HUB_URL;
use clap::Parser;
use std::time::Duration;

/// Tokenizer playground: see how hub models split a prompt into tokens.
#[derive(Parser, Debug, Clone)]
#[command(name = "tokviz", version, about)]
pub struct Settings {
    /// Hub host serving `<model>/resolve/main/tokenizer.json`.
    #[arg(long, env = "TOKVIZ_HUB_URL", default_value = DEFAULT_HUB_URL)]
    pub hub_url: String,

    /// Access token for gated models. Pre-fills the token field; kept in memory only.
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Model id selected at startup (must be one of the listed models).
    #[arg(long, env = "TOKVIZ_MODEL")]
    pub model: Option<String>,

    /// Give up on hub requests after this many seconds. Unbounded when unset.
    #[arg(long, env = "TOKVIZ_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// tracing filter directive, e.g. `debug` or `tokviz=trace`.
    #[arg(long, env = "TOKVIZ_LOG", default_value = "info")]
    pub log: String,
}

impl Settings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// The `--model` choice if it names a listed model, else the default.
    pub fn initial_model(&self) -> &'static str {
        match self.model.as_deref() {
            None => catalog::default_model().id,
            Some(id) => match catalog::find(id) {
                Some(model) => model.id,
                None => {
                    tracing::warn!(model = id, "unknown model id, using default");
                    catalog::default_model().id
                }
            },
        }
    }
}
