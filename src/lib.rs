//! Conjoint: part-worth utilities and attribute importance
//!
//! Loads choice-based survey data, dummy-encodes the product attributes,
//! fits a binary logit and summarizes the coefficients as part-worth
//! utilities and relative attribute importances.

pub mod cli;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod utils;
