#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokviz::{HubFetch, PlaygroundError, PlaygroundResult};

/// Word-level tokenizer that wraps every sequence in `[CLS] ... [SEP]`,
/// the way `bert-base-uncased` does.
pub const BERTISH_TOKENIZER: &str = r#"{
    "version": "1.0",
    "truncation": null,
    "padding": null,
    "added_tokens": [
        {"id": 101, "content": "[CLS]", "single_word": false, "lstrip": false,
         "rstrip": false, "normalized": false, "special": true},
        {"id": 102, "content": "[SEP]", "single_word": false, "lstrip": false,
         "rstrip": false, "normalized": false, "special": true}
    ],
    "normalizer": {"type": "Lowercase"},
    "pre_tokenizer": {"type": "Whitespace"},
    "post_processor": {
        "type": "TemplateProcessing",
        "single": [
            {"SpecialToken": {"id": "[CLS]", "type_id": 0}},
            {"Sequence": {"id": "A", "type_id": 0}},
            {"SpecialToken": {"id": "[SEP]", "type_id": 0}}
        ],
        "pair": [
            {"SpecialToken": {"id": "[CLS]", "type_id": 0}},
            {"Sequence": {"id": "A", "type_id": 0}},
            {"SpecialToken": {"id": "[SEP]", "type_id": 0}},
            {"Sequence": {"id": "B", "type_id": 1}},
            {"SpecialToken": {"id": "[SEP]", "type_id": 1}}
        ],
        "special_tokens": {
            "[CLS]": {"id": "[CLS]", "ids": [101], "tokens": ["[CLS]"]},
            "[SEP]": {"id": "[SEP]", "ids": [102], "tokens": ["[SEP]"]}
        }
    },
    "decoder": null,
    "model": {
        "type": "WordLevel",
        "vocab": {"[UNK]": 0, "hello": 7, "world": 8, "[CLS]": 101, "[SEP]": 102},
        "unk_token": "[UNK]"
    }
}"#;

pub const BERTISH_CONFIG: &str = r#"{
    "do_lower_case": true,
    "special_tokens": {
        "cls_token": {"id": 101, "content": "[CLS]"},
        "sep_token": {"id": "102", "content": "[SEP]"},
        "pad_token": {"id": "not-a-number", "content": "[PAD]"}
    }
}"#;

/// Same vocabulary, no post-processor and no special-token table.
pub const PLAIN_TOKENIZER: &str = r#"{
    "version": "1.0",
    "truncation": null,
    "padding": null,
    "added_tokens": [],
    "normalizer": {"type": "Lowercase"},
    "pre_tokenizer": {"type": "Whitespace"},
    "post_processor": null,
    "decoder": null,
    "model": {
        "type": "WordLevel",
        "vocab": {"[UNK]": 0, "hello": 1, "world": 2},
        "unk_token": "[UNK]"
    }
}"#;

pub const PLAIN_CONFIG: &str = r#"{"model_max_length": 1024}"#;

/// Lowercasing word-level tokenizer with `<eos>` as an added special token
/// that is matched inside the prompt text.
pub const EOS_TOKENIZER: &str = r#"{
    "version": "1.0",
    "truncation": null,
    "padding": null,
    "added_tokens": [
        {"id": 3, "content": "<eos>", "single_word": false, "lstrip": false,
         "rstrip": false, "normalized": false, "special": true}
    ],
    "normalizer": {"type": "Lowercase"},
    "pre_tokenizer": {"type": "Whitespace"},
    "post_processor": null,
    "decoder": null,
    "model": {
        "type": "WordLevel",
        "vocab": {"[UNK]": 0, "hello": 1, "world": 2, "<eos>": 3},
        "unk_token": "[UNK]"
    }
}"#;

pub const EOS_CONFIG: &str = r#"{
    "model_max_length": 1024,
    "special_tokens": {"eos_token": {"id": 3, "content": "<eos>"}}
}"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub model_id: String,
    pub resource: String,
    pub auth_token: Option<String>,
}

/// In-memory hub that records every request. Missing files are 404s;
/// gated models answer 401 without their token and 403 with a wrong one.
#[derive(Default, Clone)]
pub struct RecordingHub {
    files: HashMap<(String, String), String>,
    gates: HashMap<String, String>,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl RecordingHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(mut self, model_id: &str, tokenizer_json: &str, tokenizer_config: &str) -> Self {
        self.files.insert(
            (model_id.to_string(), "tokenizer.json".to_string()),
            tokenizer_json.to_string(),
        );
        self.files.insert(
            (model_id.to_string(), "tokenizer_config.json".to_string()),
            tokenizer_config.to_string(),
        );
        self
    }

    pub fn serve_file(mut self, model_id: &str, resource: &str, body: &str) -> Self {
        self.files
            .insert((model_id.to_string(), resource.to_string()), body.to_string());
        self
    }

    pub fn gate(mut self, model_id: &str, token: &str) -> Self {
        self.gates.insert(model_id.to_string(), token.to_string());
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl HubFetch for RecordingHub {
    fn fetch(
        &self,
        model_id: &str,
        resource: &str,
        auth_token: Option<&str>,
    ) -> PlaygroundResult<Vec<u8>> {
        self.requests.lock().push(Request {
            model_id: model_id.to_string(),
            resource: resource.to_string(),
            auth_token: auth_token.map(str::to_string),
        });

        if let Some(expected) = self.gates.get(model_id) {
            match auth_token {
                None => {
                    return Err(PlaygroundError::Fetch {
                        status: 401,
                        resource: resource.to_string(),
                    })
                }
                Some(token) if token != expected => {
                    return Err(PlaygroundError::Fetch {
                        status: 403,
                        resource: resource.to_string(),
                    })
                }
                Some(_) => {}
            }
        }

        self.files
            .get(&(model_id.to_string(), resource.to_string()))
            .map(|body| body.as_bytes().to_vec())
            .ok_or_else(|| PlaygroundError::Fetch {
                status: 404,
                resource: resource.to_string(),
            })
    }
}

/// Hub whose every fetch panics, standing in for a crash inside the
/// tokenizer runtime.
pub struct PanickingHub;

impl HubFetch for PanickingHub {
    fn fetch(&self, _: &str, resource: &str, _: Option<&str>) -> PlaygroundResult<Vec<u8>> {
        panic!("hub exploded while fetching {}", resource);
    }
}
