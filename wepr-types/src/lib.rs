//! Shared types for WEPR.

pub mod analysis;
pub mod ask;
pub mod generate;
pub mod logprobs;
pub mod models;
