/// A hub-hosted tokenizer the picker offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub id: &'static str,
    pub label: &'static str,
}

pub const MODELS: &[ModelDescriptor] = &[
    ModelDescriptor {
        id: "gpt2",
        label: "GPT-2 (OpenAI GPT BPE)",
    },
    ModelDescriptor {
        id: "EleutherAI/gpt-neo-125M",
        label: "GPT-Neo 125M",
    },
    ModelDescriptor {
        id: "hf-internal-testing/llama-tokenizer",
        label: "LLaMA tokenizer (open test)",
    },
    ModelDescriptor {
        id: "mistralai/Mistral-7B-v0.1",
        label: "Mistral 7B",
    },
    ModelDescriptor {
        id: "bert-base-uncased",
        label: "BERT base (WordPiece)",
    },
    ModelDescriptor {
        id: "roberta-base",
        label: "RoBERTa base",
    },
    ModelDescriptor {
        id: "gpt2-medium",
        label: "GPT-2 Medium",
    },
    ModelDescriptor {
        id: "t5-small",
        label: "T5 Small",
    },
    ModelDescriptor {
        id: "meta-llama/Meta-Llama-3-8B",
        label: "LLaMA 3 8B (gated, needs token)",
    },
];

pub fn default_model() -> &'static ModelDescriptor {
    &MODELS[0]
}

pub fn find(id: &str) -> Option<&'static ModelDescriptor> {
    MODELS.iter().find(|m| m.id == id)
}

/// Picker label for `id`, falling back to the raw id.
pub fn label_for(id: &str) -> &str {
    find(id).map(|m| m.label).unwrap_or(id)
}
