use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::TokenResult;

/// Prompt 请求。
///
/// Every field is optional on the wire; validation happens when the request
/// is executed.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// System prompt forwarded to the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i64>,
    /// Accepted as a number or a numeric string; see [`AskRequest::seed_value`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<Value>,
}

impl AskRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            ..Default::default()
        }
    }

    /// Seed as an integer, or `None` when absent or not interpretable.
    ///
    /// Floats are truncated toward zero.
    pub fn seed_value(&self) -> Option<i64> {
        match self.seed.as_ref()? {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().and_then(truncate_to_i64)),
            Value::String(text) => text.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

fn truncate_to_i64(value: f64) -> Option<i64> {
    let truncated = value.trunc();
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

/// Prompt 响应：生成文本加熵分析。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AskResponse {
    pub response: String,
    pub epr: f64,
    pub risk_score: f64,
    #[serde(default)]
    pub tokens: Vec<TokenResult>,
}
