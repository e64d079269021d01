//! # tokviz
//!
//! Desktop tokenizer playground: pick a Hugging Face model, type a prompt,
//! and see the token stream, token ids, vocabulary size and special-token
//! count.
//!
//! The part worth reusing outside the window is [`SessionManager`]:
//!
//! ```rust,ignore
//! use tokviz::{HubClient, SessionManager, DEFAULT_HUB_URL};
//!
//! let sessions = SessionManager::new(HubClient::new(DEFAULT_HUB_URL, None)?);
//! let out = sessions.tokenize("Hello world", "gpt2", None)?;
//! println!("{} tokens", out.summary.token_count);
//! ```

pub mod app;
pub mod catalog;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod hub;
pub mod session;
pub mod token_view;
pub mod worker;

pub use catalog::{ModelDescriptor, MODELS};
pub use config::Settings;
pub use error::{PlaygroundError, PlaygroundResult};
pub use hub::{HubClient, HubFetch, DEFAULT_HUB_URL};
pub use session::{SessionManager, Summary, TokenRow, Tokenized, TokenizerSession};
