use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ollama 生成选项。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
}

impl GenerateOptions {
    pub const fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.top_k.is_none() && self.seed.is_none()
    }
}

/// `/api/generate` 请求体。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    /// Always `false`; the analysis needs the complete token list.
    #[serde(default)]
    pub stream: bool,
    /// Always `true`; without logprobs there is nothing to analyze.
    #[serde(default)]
    pub logprobs: bool,
    /// 每个 token 返回的候选数。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_logprobs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<GenerateOptions>,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
            logprobs: true,
            top_logprobs: None,
            system: None,
            options: None,
        }
    }

    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Empty option sets are dropped so the backend applies its defaults.
    #[must_use]
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = if options.is_empty() {
            None
        } else {
            Some(options)
        };
        self
    }

    #[must_use]
    pub const fn with_top_logprobs(mut self, top_logprobs: u32) -> Self {
        self.top_logprobs = Some(top_logprobs);
        self
    }
}

/// `/api/generate` 非流式响应。
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenerateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done_reason: Option<String>,
    /// Raw per-token logprob entries.
    ///
    /// Kept as untyped JSON: a malformed list must degrade to "no signal"
    /// instead of failing the whole response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
    /// Forward-compatible extension fields.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}
