use std::fmt;

use serde::{Deserialize, Serialize};

/// Token 风险等级。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candidate as shown to the user.
///
/// `prob` is `exp(logprob)` exactly as reported, not the value rescaled over
/// the top-K window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDisplay {
    pub token: String,
    pub prob: f64,
}

/// 单个 token 的分析结果。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResult {
    pub token: String,
    pub entropy: f64,
    pub normalized_entropy: f64,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub candidates: Vec<CandidateDisplay>,
}

/// 整个回复的分析结果。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponseResult {
    #[serde(default)]
    pub tokens: Vec<TokenResult>,
    pub epr: f64,
    pub risk_score: f64,
}

impl ResponseResult {
    /// Result carrying no signal, returned for malformed input.
    pub fn empty() -> Self {
        Self::default()
    }
}
