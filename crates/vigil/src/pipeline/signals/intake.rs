//! Batch intake: validate, score, and admit raw signals into the store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::quality;
use crate::pipeline::domain::{Observation, SignalCategory, SignalInput};
use crate::store::{Store, StoreError};

/// Outcome for one batch. Per-item failures are collected, never raised;
/// only store-level failures abort the batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntakeSummary {
    pub total: usize,
    pub processed: usize,
    pub rejected: usize,
    pub anomalies: usize,
    pub errors: Vec<IntakeRejection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntakeRejection {
    pub indicator: String,
    pub reason: String,
}

enum Admission {
    Stored { is_anomaly: bool },
    Rejected(String),
}

/// Validates and persists raw signal batches.
pub struct SignalIntake<S> {
    store: Arc<S>,
}

impl<S: Store> SignalIntake<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Process a batch of candidate signals, stamping `now` as the
    /// reporting timestamp for every admitted observation.
    pub fn process_batch(
        &self,
        batch: &[SignalInput],
        now: DateTime<Utc>,
    ) -> Result<IntakeSummary, StoreError> {
        let mut summary = IntakeSummary {
            total: batch.len(),
            ..IntakeSummary::default()
        };

        for input in batch {
            match self.admit(input, now)? {
                Admission::Stored { is_anomaly } => {
                    summary.processed += 1;
                    if is_anomaly {
                        summary.anomalies += 1;
                    }
                }
                Admission::Rejected(reason) => {
                    warn!(
                        source = %input.source_code,
                        indicator = %input.indicator_name,
                        %reason,
                        "signal rejected"
                    );
                    summary.rejected += 1;
                    summary.errors.push(IntakeRejection {
                        indicator: input.indicator_name.clone(),
                        reason,
                    });
                }
            }
        }

        Ok(summary)
    }

    fn admit(&self, input: &SignalInput, now: DateTime<Utc>) -> Result<Admission, StoreError> {
        let Some(source) = self.store.active_source(&input.source_code)? else {
            return Ok(Admission::Rejected(format!(
                "unknown or inactive source '{}'",
                input.source_code
            )));
        };

        let Some(region) = self.store.active_region(&input.region_code)? else {
            return Ok(Admission::Rejected(format!(
                "unknown or inactive region '{}'",
                input.region_code
            )));
        };

        let Some(category) = SignalCategory::parse(&input.signal_type) else {
            return Ok(Admission::Rejected(format!(
                "unrecognized signal type '{}'",
                input.signal_type
            )));
        };

        let observed_at = input.observed_at.unwrap_or(now);
        let is_anomaly = quality::is_anomalous(category, &input.indicator_name, input.value);
        let confidence = input.confidence.clamp(0.0, 1.0);
        let quality_score = quality::quality_score(
            confidence,
            source.reliability_score,
            is_anomaly,
            observed_at,
            now,
        );

        if is_anomaly {
            info!(
                region = %region.code,
                indicator = %input.indicator_name,
                value = input.value,
                "anomaly detected"
            );
        }

        self.store.append_observation(Observation {
            source_id: source.id,
            region_id: region.id,
            category,
            indicator: input.indicator_name.clone(),
            value: input.value,
            unit: input.unit.clone(),
            confidence,
            quality_score,
            is_anomaly,
            observed_at,
            reported_at: now,
            raw_data: input.raw_data.clone(),
        })?;

        Ok(Admission::Stored { is_anomaly })
    }
}
