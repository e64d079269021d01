//! Tokenizer sessions: load once per model id, then tokenize prompts into
//! display rows.

use crate::error::{PlaygroundError, PlaygroundResult};
use crate::hub::{HubFetch, TOKENIZER_CONFIG_JSON, TOKENIZER_JSON};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokenizers::Tokenizer;

/// A loaded tokenizer plus what the summary panel needs to know about it.
pub struct TokenizerSession {
    tokenizer: Tokenizer,
    vocab_size: Option<usize>,
    special_ids: HashSet<u32>,
}

impl std::fmt::Debug for TokenizerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenizerSession")
            .field("vocab_size", &self.vocab_size)
            .field("special_ids", &self.special_ids)
            .finish_non_exhaustive()
    }
}

impl TokenizerSession {
    /// Build a session from the bodies of `tokenizer.json` and
    /// `tokenizer_config.json`.
    pub fn from_hub_files(tokenizer_json: &[u8], tokenizer_config: &[u8]) -> PlaygroundResult<Self> {
        let tokenizer = Tokenizer::from_bytes(tokenizer_json)
            .map_err(|e| PlaygroundError::TokenizerConstruction(format!("{}: {}", TOKENIZER_JSON, e)))?;
        let tokenizer_file: Value = serde_json::from_slice(tokenizer_json)
            .map_err(|e| PlaygroundError::TokenizerConstruction(format!("{}: {}", TOKENIZER_JSON, e)))?;
        let special_ids = parse_special_ids(tokenizer_config)?;

        Ok(Self {
            tokenizer,
            vocab_size: vocab_size_of(&tokenizer_file),
            special_ids,
        })
    }

    /// `None` when neither `model.vocab` nor a top-level `vocab` array exists.
    pub fn vocab_size(&self) -> Option<usize> {
        self.vocab_size
    }

    pub fn special_ids(&self) -> &HashSet<u32> {
        &self.special_ids
    }

    pub fn is_special(&self, id: u32) -> bool {
        self.special_ids.contains(&id)
    }

    /// Encode `prompt` and project every output unit into a row.
    pub fn tokenize(&self, prompt: &str) -> PlaygroundResult<Tokenized> {
        let encoding = self
            .tokenizer
            .encode(prompt, true)
            .map_err(|e| PlaygroundError::Encode(e.to_string()))?;

        let rows: Vec<TokenRow> = encoding
            .get_tokens()
            .iter()
            .zip(encoding.get_ids())
            .map(|(token, &id)| TokenRow {
                token: token.clone(),
                id,
                special: self.is_special(id),
            })
            .collect();

        let summary = Summary {
            vocab_size: self.vocab_size,
            token_count: rows.len(),
            special_count: rows.iter().filter(|r| r.special).count(),
        };
        Ok(Tokenized { rows, summary })
    }
}

/// One chip in the token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRow {
    pub token: String,
    pub id: u32,
    pub special: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub vocab_size: Option<usize>,
    pub token_count: usize,
    pub special_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized {
    pub rows: Vec<TokenRow>,
    pub summary: Summary,
}

fn vocab_size_of(tokenizer_file: &Value) -> Option<usize> {
    // WordPiece/BPE keep a token -> id map, Unigram keeps a [piece, score] list.
    match tokenizer_file.pointer("/model/vocab") {
        Some(Value::Object(map)) => return Some(map.len()),
        Some(Value::Array(pieces)) => return Some(pieces.len()),
        _ => {}
    }
    tokenizer_file
        .get("vocab")
        .and_then(Value::as_array)
        .map(Vec::len)
}

#[derive(Deserialize)]
struct TokenizerConfigFile {
    #[serde(default)]
    special_tokens: Option<BTreeMap<String, SpecialTokenEntry>>,
}

#[derive(Deserialize)]
struct SpecialTokenEntry {
    id: SpecialTokenId,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpecialTokenId {
    Number(f64),
    Text(String),
}

impl SpecialTokenId {
    fn as_token_id(&self) -> Option<u32> {
        let value = match self {
            SpecialTokenId::Number(n) => *n,
            SpecialTokenId::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        let in_range = value.is_finite()
            && value.fract() == 0.0
            && value >= 0.0
            && value <= u32::MAX as f64;
        in_range.then_some(value as u32)
    }
}

/// Special ids from the `special_tokens` table of `tokenizer_config.json`.
///
/// A missing table is an empty set. Ids that do not coerce to a `u32` are
/// dropped; entries of any other shape reject the whole file.
///
/// String ids are read as plain decimal after trimming. That is stricter
/// than a JavaScript `Number()` coercion, which would turn `""` into 0 and
/// `"0x10"` into 16; configs in the wild never spell ids that way, so the
/// stricter reading drops them rather than inventing a match.
fn parse_special_ids(tokenizer_config: &[u8]) -> PlaygroundResult<HashSet<u32>> {
    let config: TokenizerConfigFile = serde_json::from_slice(tokenizer_config).map_err(|e| {
        PlaygroundError::TokenizerConstruction(format!("{}: {}", TOKENIZER_CONFIG_JSON, e))
    })?;

    let mut ids = HashSet::new();
    for (name, entry) in config.special_tokens.unwrap_or_default() {
        match entry.id.as_token_id() {
            Some(id) => {
                ids.insert(id);
            }
            None => tracing::debug!(%name, "discarding special token with non-integer id"),
        }
    }
    Ok(ids)
}

/// Owns the model id -> session cache for the lifetime of the app.
///
/// The cache lock is only held for lookups and inserts. Two threads loading
/// the same uncached model both fetch; the later insert wins.
pub struct SessionManager {
    hub: Box<dyn HubFetch>,
    cache: Mutex<HashMap<String, Arc<TokenizerSession>>>,
}

impl SessionManager {
    pub fn new(hub: impl HubFetch + 'static) -> Self {
        Self {
            hub: Box::new(hub),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_cached(&self, model_id: &str) -> bool {
        self.cache.lock().contains_key(model_id)
    }

    pub fn cached_models(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.cache.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn clear_cache(&self) {
        let dropped = {
            let mut cache = self.cache.lock();
            let n = cache.len();
            cache.clear();
            n
        };
        tracing::info!(dropped, "tokenizer cache cleared");
    }

    /// Return the cached session for `model_id`, fetching and building it on
    /// first use. Nothing is cached when any step fails.
    pub fn load(
        &self,
        model_id: &str,
        auth_token: Option<&str>,
    ) -> PlaygroundResult<Arc<TokenizerSession>> {
        if let Some(session) = self.cache.lock().get(model_id) {
            tracing::debug!(model_id, "tokenizer cache hit");
            return Ok(Arc::clone(session));
        }

        let auth_token = auth_token.filter(|t| !t.is_empty());
        tracing::info!(model_id, authorized = auth_token.is_some(), "loading tokenizer");

        let tokenizer_json = self.fetch(model_id, TOKENIZER_JSON, auth_token)?;
        let tokenizer_config = self.fetch(model_id, TOKENIZER_CONFIG_JSON, auth_token)?;
        let session = Arc::new(TokenizerSession::from_hub_files(
            &tokenizer_json,
            &tokenizer_config,
        )?);

        tracing::info!(
            model_id,
            vocab_size = ?session.vocab_size(),
            special_ids = session.special_ids().len(),
            "tokenizer ready"
        );
        self.cache
            .lock()
            .insert(model_id.to_string(), Arc::clone(&session));
        Ok(session)
    }

    /// Tokenize `prompt` with `model_id`, loading the model if needed.
    pub fn tokenize(
        &self,
        prompt: &str,
        model_id: &str,
        auth_token: Option<&str>,
    ) -> PlaygroundResult<Tokenized> {
        if prompt.trim().is_empty() {
            return Err(PlaygroundError::EmptyPrompt);
        }
        let session = self.load(model_id, auth_token)?;
        session.tokenize(prompt)
    }

    fn fetch(
        &self,
        model_id: &str,
        resource: &str,
        auth_token: Option<&str>,
    ) -> PlaygroundResult<Vec<u8>> {
        self.hub
            .fetch(model_id, resource, auth_token)
            .inspect_err(|e| tracing::warn!(model_id, resource, error = %e, "hub fetch failed"))
    }
}
