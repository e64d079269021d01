//! Hugging Face hub access for tokenizer files.

use crate::error::{PlaygroundError, PlaygroundResult};
use std::time::Duration;

pub const DEFAULT_HUB_URL: &str = "https://huggingface.co";
pub const TOKENIZER_JSON: &str = "tokenizer.json";
pub const TOKENIZER_CONFIG_JSON: &str = "tokenizer_config.json";

/// Fetches one file out of a model repository.
///
/// Implementations return the raw body on a 2xx response and
/// [`PlaygroundError::Fetch`] with the status otherwise.
pub trait HubFetch: Send + Sync {
    fn fetch(
        &self,
        model_id: &str,
        resource: &str,
        auth_token: Option<&str>,
    ) -> PlaygroundResult<Vec<u8>>;
}

/// `<base>/<model_id>/resolve/main/<resource>`
pub fn resource_url(base_url: &str, model_id: &str, resource: &str) -> String {
    format!(
        "{}/{}/resolve/main/{}",
        base_url.trim_end_matches('/'),
        model_id,
        resource
    )
}

/// Blocking hub client. Meant to be driven from worker threads, never the UI thread.
#[derive(Debug, Clone)]
pub struct HubClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HubClient {
    /// `timeout = None` leaves requests unbounded.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> PlaygroundResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("tokviz/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| PlaygroundError::ClientSetup(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }
}

impl HubFetch for HubClient {
    fn fetch(
        &self,
        model_id: &str,
        resource: &str,
        auth_token: Option<&str>,
    ) -> PlaygroundResult<Vec<u8>> {
        let url = resource_url(&self.base_url, model_id, resource);
        tracing::debug!(%url, authorized = auth_token.is_some(), "fetching hub file");

        let mut request = self.client.get(&url);
        if let Some(token) = auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| PlaygroundError::Network {
            resource: resource.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlaygroundError::Fetch {
                status: status.as_u16(),
                resource: resource.to_string(),
            });
        }

        let bytes = response.bytes().map_err(|e| PlaygroundError::Network {
            resource: resource.to_string(),
            message: format!("failed to read response: {}", e),
        })?;
        Ok(bytes.to_vec())
    }
}
