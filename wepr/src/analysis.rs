//! Token-level risk classification and response-level EPR aggregation.
//!
//! Each token runs through reconstruct → entropy → normalize → classify on
//! its own; the per-token entropies are then reduced into the entropy
//! production rate (mean entropy) and a global risk score. Nothing in this
//! module fails: malformed or missing data degrades to "no signal".

use rayon::prelude::*;
use serde_json::Value;
use tracing::debug;
use wepr_types::analysis::{CandidateDisplay, ResponseResult, RiskLevel, TokenResult};
use wepr_types::logprobs::TokenInput;

use crate::entropy::{
    linear_probabilities, max_entropy, normalized_entropy, reconstruct_probabilities,
    shannon_entropy,
};
use crate::error::{Error, Result};

/// Normalized entropy above which a token is `high` risk.
pub const NORM_THRESHOLD_HIGH: f64 = 0.6;
/// Normalized entropy above which a token is `medium` risk.
pub const NORM_THRESHOLD_MEDIUM: f64 = 0.3;
/// EPR mapped to a risk score of 1.0.
///
/// Empirical ceiling: natural-log entropy of a realistic top-20 window rarely
/// exceeds it.
pub const EPR_RISK_DIVISOR: f64 = 2.5;
/// Token count from which the per-token stage runs on the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// 分析配置。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    pub high_threshold: f64,
    pub medium_threshold: f64,
    pub epr_risk_divisor: f64,
    /// Minimum number of tokens before the per-token stage is parallelized.
    pub parallel_threshold: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            high_threshold: NORM_THRESHOLD_HIGH,
            medium_threshold: NORM_THRESHOLD_MEDIUM,
            epr_risk_divisor: EPR_RISK_DIVISOR,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl AnalysisConfig {
    /// 从环境变量读取覆盖值。
    ///
    /// Reads `WEPR_THRESHOLD_HIGH`, `WEPR_THRESHOLD_MEDIUM` and
    /// `WEPR_EPR_DIVISOR`; unset or blank variables keep the defaults.
    ///
    /// # Errors
    /// 当变量无法解析或组合无效时返回错误。
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(value) = env_f64("WEPR_THRESHOLD_HIGH")? {
            config.high_threshold = value;
        }
        if let Some(value) = env_f64("WEPR_THRESHOLD_MEDIUM")? {
            config.medium_threshold = value;
        }
        if let Some(value) = env_f64("WEPR_EPR_DIVISOR")? {
            config.epr_risk_divisor = value;
        }
        config.validate()?;
        Ok(config)
    }

    /// 校验阈值与除数。
    ///
    /// # Errors
    /// 当阈值不在 `[0, 1]`、`medium > high` 或除数非正时返回错误。
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("high_threshold", self.high_threshold),
            ("medium_threshold", self.medium_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be within [0, 1], got {value}"),
                });
            }
        }
        if self.medium_threshold > self.high_threshold {
            return Err(Error::InvalidConfig {
                message: format!(
                    "medium_threshold ({}) must not exceed high_threshold ({})",
                    self.medium_threshold, self.high_threshold
                ),
            });
        }
        if !self.epr_risk_divisor.is_finite() || self.epr_risk_divisor <= 0.0 {
            return Err(Error::InvalidConfig {
                message: format!(
                    "epr_risk_divisor must be positive, got {}",
                    self.epr_risk_divisor
                ),
            });
        }
        Ok(())
    }

    /// Maps a normalized entropy to a risk level, high threshold first.
    pub fn classify(&self, normalized_entropy: f64) -> RiskLevel {
        if normalized_entropy > self.high_threshold {
            RiskLevel::High
        } else if normalized_entropy > self.medium_threshold {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// `min(epr / divisor, 1.0)`.
    pub fn risk_score(&self, epr: f64) -> f64 {
        (epr / self.epr_risk_divisor).min(1.0)
    }
}

fn env_f64(key: &str) -> Result<Option<f64>> {
    let Ok(raw) = std::env::var(key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| Error::InvalidConfig {
            message: format!("{key} is not a number: {raw}"),
        })
}

/// Full-precision analysis of one token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenAnalysis {
    pub token: String,
    pub entropy: f64,
    pub normalized_entropy: f64,
    pub risk_level: RiskLevel,
    /// `(token, exp(logprob))` in candidate order.
    pub candidates: Vec<(String, f64)>,
}

impl TokenAnalysis {
    fn into_result(self) -> TokenResult {
        TokenResult {
            token: self.token,
            entropy: round_to(self.entropy, 4),
            normalized_entropy: round_to(self.normalized_entropy, 2),
            risk_level: self.risk_level,
            candidates: self
                .candidates
                .into_iter()
                .map(|(token, prob)| CandidateDisplay {
                    token,
                    prob: round_to(prob, 4),
                })
                .collect(),
        }
    }
}

/// Analyzes one token, or `None` when it carries no candidate data.
pub fn analyze_token(input: &TokenInput, config: &AnalysisConfig) -> Option<TokenAnalysis> {
    let candidates = input.candidates.as_deref()?;
    let log_probs = input.log_probabilities();

    let entropy = shannon_entropy(&reconstruct_probabilities(&log_probs));
    let normalized = normalized_entropy(entropy, max_entropy(candidates.len()));

    let display = candidates
        .iter()
        .zip(linear_probabilities(&log_probs))
        .map(|(candidate, prob)| (candidate.token.clone(), prob))
        .collect();

    Some(TokenAnalysis {
        token: input.token.clone(),
        entropy,
        normalized_entropy: normalized,
        risk_level: config.classify(normalized),
        candidates: display,
    })
}

/// 全精度汇总结果。
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseAnalysis {
    pub tokens: Vec<TokenAnalysis>,
    pub epr: f64,
    pub risk_score: f64,
}

impl ResponseAnalysis {
    /// Rounds every value for presentation. This is the only place rounding
    /// happens.
    pub fn into_result(self) -> ResponseResult {
        ResponseResult {
            tokens: self
                .tokens
                .into_iter()
                .map(TokenAnalysis::into_result)
                .collect(),
            epr: round_to(self.epr, 4),
            risk_score: round_to(self.risk_score, 2),
        }
    }
}

/// Mean of the per-token entropies, 0 when there are none.
pub fn entropy_production_rate(entropies: &[f64]) -> f64 {
    if entropies.is_empty() {
        return 0.0;
    }
    entropies.iter().sum::<f64>() / entropies.len() as f64
}

/// Runs the per-token chain over `inputs` and reduces the result.
///
/// Tokens without candidate data are dropped: they appear neither in
/// `tokens` nor in the EPR denominator.
pub fn analyze_tokens(inputs: &[TokenInput], config: &AnalysisConfig) -> ResponseAnalysis {
    let tokens: Vec<TokenAnalysis> = if inputs.len() >= config.parallel_threshold {
        inputs
            .par_iter()
            .filter_map(|input| analyze_token(input, config))
            .collect()
    } else {
        inputs
            .iter()
            .filter_map(|input| analyze_token(input, config))
            .collect()
    };

    let skipped = inputs.len() - tokens.len();
    if skipped > 0 {
        debug!(skipped, "tokens without top_logprobs skipped");
    }

    let entropies: Vec<f64> = tokens.iter().map(|t| t.entropy).collect();
    let epr = entropy_production_rate(&entropies);
    let risk_score = config.risk_score(epr);
    ResponseAnalysis {
        tokens,
        epr,
        risk_score,
    }
}

/// Analyzes a raw `logprobs` value as returned by the backend.
///
/// Anything other than a JSON array yields the empty result. Array entries
/// that cannot be read as a token entry are treated like entries without
/// candidates.
pub fn analyze_value(value: &Value, config: &AnalysisConfig) -> ResponseResult {
    let Some(entries) = value.as_array() else {
        debug!("logprobs is not a list; returning empty analysis");
        return ResponseResult::empty();
    };
    let inputs: Vec<TokenInput> = entries.iter().filter_map(parse_entry).collect();
    analyze_tokens(&inputs, config).into_result()
}

/// Convenience wrapper: analyze typed inputs and round for presentation.
pub fn analyze(inputs: &[TokenInput], config: &AnalysisConfig) -> ResponseResult {
    analyze_tokens(inputs, config).into_result()
}

fn parse_entry(entry: &Value) -> Option<TokenInput> {
    if !entry.is_object() {
        debug!("skipping non-object logprobs entry");
        return None;
    }
    match serde_json::from_value::<TokenInput>(entry.clone()) {
        Ok(input) => Some(input),
        Err(err) => {
            debug!(error = %err, "skipping unreadable logprobs entry");
            None
        }
    }
}

/// Rounds on the exact decimal expansion of `value`, ties to even.
fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.decimals$}").parse().unwrap_or(value)
}
