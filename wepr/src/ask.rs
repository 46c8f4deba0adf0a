//! Prompt → generation → entropy analysis in one call.

use serde_json::Value;
use tracing::debug;
use wepr_types::ask::{AskRequest, AskResponse};
use wepr_types::generate::{GenerateOptions, GenerateRequest};

use crate::analysis::{analyze_value, AnalysisConfig};
use crate::client::Client;
use crate::error::{Error, Result};
use crate::model_registry::{find_model, DEFAULT_MODEL};

impl Client {
    /// 生成回复并计算 EPR 与逐 token 风险。
    ///
    /// Models outside the registry are passed through to the backend
    /// unchanged. A response without `logprobs` is analyzed as an empty
    /// token list.
    ///
    /// # Errors
    /// 当 prompt 缺失或后端请求失败时返回错误。
    pub async fn ask(&self, request: &AskRequest, config: &AnalysisConfig) -> Result<AskResponse> {
        let generate_request = build_generate_request(request)?;
        let generated = self.generate().generate(generate_request).await?;

        let logprobs = generated
            .logprobs
            .unwrap_or_else(|| Value::Array(Vec::new()));
        let analysis = analyze_value(&logprobs, config);
        debug!(
            tokens = analysis.tokens.len(),
            epr = analysis.epr,
            risk_score = analysis.risk_score,
            "analysis complete"
        );

        Ok(AskResponse {
            response: generated.response,
            epr: analysis.epr,
            risk_score: analysis.risk_score,
            tokens: analysis.tokens,
        })
    }
}

/// Validates an [`AskRequest`] and turns it into a backend request.
///
/// # Errors
/// 当 prompt 缺失或为空时返回 [`Error::InvalidRequest`]。
pub fn build_generate_request(request: &AskRequest) -> Result<GenerateRequest> {
    let prompt = match request.prompt.as_deref() {
        Some(prompt) if !prompt.is_empty() => prompt,
        _ => {
            return Err(Error::InvalidRequest {
                message: "No prompt".into(),
            })
        }
    };
    let model = request.model.as_deref().unwrap_or(DEFAULT_MODEL);
    if find_model(model).is_none() {
        debug!(model, "model not in registry, passing through");
    }
    let options = GenerateOptions {
        temperature: request.temperature,
        top_k: request.top_k,
        seed: request.seed_value(),
    };
    let mut generate = GenerateRequest::new(model, prompt).with_options(options);
    if let Some(system) = request.system.as_deref() {
        generate = generate.with_system(system);
    }
    Ok(generate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_prompt_is_rejected() {
        for request in [
            AskRequest::default(),
            AskRequest::new(""),
        ] {
            let err = build_generate_request(&request).unwrap_err();
            assert!(matches!(err, Error::InvalidRequest { message } if message == "No prompt"));
        }
    }

    #[test]
    fn test_defaults_model_and_drops_empty_options() {
        let request = build_generate_request(&AskRequest::new("hello")).unwrap();
        assert_eq!(request.model, DEFAULT_MODEL);
        assert_eq!(request.prompt, "hello");
        assert!(request.options.is_none());
        assert!(request.system.is_none());
    }

    #[test]
    fn test_explicit_model_is_passed_through() {
        for model in ["", "gpt-oss:20b"] {
            let request = AskRequest {
                model: Some(model.into()),
                ..AskRequest::new("hello")
            };
            let generate = build_generate_request(&request).unwrap();
            assert_eq!(generate.model, model);
        }
    }

    #[test]
    fn test_forwards_system_prompt() {
        let request = AskRequest {
            system: Some("be brief".into()),
            ..AskRequest::new("hello")
        };
        let generate = build_generate_request(&request).unwrap();
        assert_eq!(generate.system.as_deref(), Some("be brief"));
    }

    #[test]
    fn test_carries_generation_options() {
        let request = AskRequest {
            model: Some("gemma3:4b".into()),
            temperature: Some(0.3),
            top_k: Some(40),
            seed: Some(json!("12")),
            ..AskRequest::new("hello")
        };
        let generate = build_generate_request(&request).unwrap();
        assert_eq!(generate.model, "gemma3:4b");
        assert_eq!(
            generate.options,
            Some(GenerateOptions {
                temperature: Some(0.3),
                top_k: Some(40),
                seed: Some(12),
            })
        );
    }

    #[test]
    fn test_invalid_seed_is_ignored() {
        let request = AskRequest {
            seed: Some(json!("not-a-seed")),
            ..AskRequest::new("hello")
        };
        let generate = build_generate_request(&request).unwrap();
        assert!(generate.options.is_none());
    }
}
