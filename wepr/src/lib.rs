//! Entropy production rate (EPR) for language-model generations.
//!
//! [`analysis`] turns per-token top-K log-probabilities into per-token
//! entropy and risk plus a response-level EPR and risk score. [`Client`]
//! fetches those log-probabilities from an Ollama backend.

pub mod analysis;
pub mod ask;
pub mod client;
pub mod entropy;
pub mod error;
pub mod generate;
pub mod model_registry;

#[cfg(test)]
mod test_support;

pub use wepr_types as types;

pub use analysis::{analyze, analyze_tokens, analyze_value, AnalysisConfig};
pub use client::{Client, ClientBuilder, HttpOptions};
pub use error::{Error, Result};
