use serde::{Deserialize, Serialize};

/// 可选模型。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Ollama model tag, e.g. `gemma3:4b`.
    pub id: String,
    /// Human readable label.
    pub name: String,
}

impl ModelInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
