//! Models offered for selection.

use wepr_types::models::ModelInfo;

/// Model used when a request does not name one.
pub const DEFAULT_MODEL: &str = "cas/ministral-8b-instruct-2410_q4km";

const AVAILABLE_MODELS: &[(&str, &str)] = &[
    (DEFAULT_MODEL, "Ministral 8B (Default)"),
    ("gemma3:4b", "Gemma 4B"),
    ("llama3.2:1b", "Llama 3.2 1B"),
];

/// 可选模型列表，默认模型在前。
pub fn available_models() -> Vec<ModelInfo> {
    AVAILABLE_MODELS
        .iter()
        .map(|(id, name)| ModelInfo::new(*id, *name))
        .collect()
}

/// Looks a model up by its Ollama tag.
pub fn find_model(id: &str) -> Option<ModelInfo> {
    AVAILABLE_MODELS
        .iter()
        .find(|(model_id, _)| *model_id == id)
        .map(|(id, name)| ModelInfo::new(*id, *name))
}
