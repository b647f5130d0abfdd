//! Read and write contracts for the durable store.
//!
//! The store is the only shared mutable resource in the pipeline. All
//! writes are append-only from this crate's perspective; derived records
//! are immutable, timestamped facts rather than rows updated in place.
//! Derived records are written in one batched call per unit of work, so
//! a store failure commits either the whole pass or nothing.

pub mod memory;

use chrono::{DateTime, Utc};

use crate::pipeline::domain::{
    Aggregation, Alert, DataSource, DiseaseRisk, Observation, Region, RiskIndex,
    SignalCategory,
};

pub use memory::InMemoryStore;

/// Storage abstraction so the intake, aggregation, and scoring services can
/// be exercised against an in-memory store in tests.
pub trait Store: Send + Sync {
    /// Look up an active region by code; inactive regions resolve to `None`.
    fn active_region(&self, code: &str) -> Result<Option<Region>, StoreError>;

    /// Look up an active data source by code.
    fn active_source(&self, code: &str) -> Result<Option<DataSource>, StoreError>;

    /// All active regions, optionally restricted to the given ids.
    fn active_regions(&self, ids: Option<&[i64]>) -> Result<Vec<Region>, StoreError>;

    /// Observations for a region within a time range over the observation
    /// timestamp, optionally filtered by category.
    fn observations_for_region(
        &self,
        region_id: i64,
        category: Option<SignalCategory>,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Observation>, StoreError>;

    /// Observations for one series within an arbitrary window, used for
    /// historical baseline computation.
    fn observations_in_window(
        &self,
        region_id: i64,
        category: SignalCategory,
        indicator: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Observation>, StoreError>;

    fn append_observation(&self, observation: Observation) -> Result<(), StoreError>;

    /// Append every aggregation record from one pass as a single write.
    fn append_aggregations(&self, aggregations: Vec<Aggregation>) -> Result<(), StoreError>;

    /// Append one region's scoring output, the per-disease risks and the
    /// composite index together, as a single write.
    fn append_region_scores(
        &self,
        risks: Vec<DiseaseRisk>,
        index: RiskIndex,
    ) -> Result<(), StoreError>;

    /// Append the alerts emitted by one region pass as a single write.
    fn append_alerts(&self, alerts: Vec<Alert>) -> Result<(), StoreError>;
}

/// Store failures are fatal for the in-flight batch or region pass; the
/// retry policy belongs to the calling scheduler.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
