use serde::{Deserialize, Serialize};

/// Top-K 候选项。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub token: String,
    /// Natural-log probability as reported by the backend.
    #[serde(rename = "logprob")]
    pub log_probability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<Vec<u8>>,
}

impl Candidate {
    pub fn new(token: impl Into<String>, log_probability: f64) -> Self {
        Self {
            token: token.into(),
            log_probability,
            bytes: None,
        }
    }
}

/// 单个生成 token 及其 top-K 候选。
///
/// `candidates` is `None` when the backend omitted `top_logprobs` for this
/// position; such entries carry no signal and are skipped by the analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TokenInput {
    #[serde(default)]
    pub token: String,
    #[serde(
        rename = "top_logprobs",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub candidates: Option<Vec<Candidate>>,
}

impl TokenInput {
    pub fn new(token: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        Self {
            token: token.into(),
            candidates: Some(candidates),
        }
    }

    /// Token entry without any candidate data.
    pub fn missing(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            candidates: None,
        }
    }

    /// Log-probabilities in candidate order.
    pub fn log_probabilities(&self) -> Vec<f64> {
        self.candidates
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|c| c.log_probability)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_input_reads_ollama_shape() {
        let value = json!({
            "token": " Paris",
            "logprob": -0.02,
            "bytes": [32, 80],
            "top_logprobs": [
                {"token": " Paris", "logprob": -0.02, "bytes": [32, 80]},
                {"token": " Lyon", "logprob": -4.1}
            ]
        });
        let input: TokenInput = serde_json::from_value(value).unwrap();
        assert_eq!(input.token, " Paris");
        let candidates = input.candidates.as_ref().unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].token, " Lyon");
        assert!(candidates[1].bytes.is_none());
        assert_eq!(input.log_probabilities(), vec![-0.02, -4.1]);
    }

    #[test]
    fn test_token_input_missing_fields_default() {
        let input: TokenInput = serde_json::from_value(json!({})).unwrap();
        assert_eq!(input.token, "");
        assert!(input.candidates.is_none());

        let input: TokenInput =
            serde_json::from_value(json!({"token": "x", "top_logprobs": null})).unwrap();
        assert!(input.candidates.is_none());
        assert!(input.log_probabilities().is_empty());
    }
}
