//! Vigil: a humanitarian early-warning scoring pipeline.
//!
//! Sparse observational signals (weather, food prices, disease case
//! counts, facility capacity, ...) are validated and admitted per region,
//! aggregated into period buckets against historical baselines, and
//! combined through fixed weight configurations into per-disease risk
//! scores, hunger and health-strain stress indices, one composite vital
//! risk index per region, and threshold alerts. Every score is
//! deterministic and traces back to the signals and weights that produced
//! it; missing data reduces coverage, it never fabricates risk.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod store;
