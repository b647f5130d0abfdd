//! Period aggregation with year-over-year baseline comparison.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::pipeline::domain::{Aggregation, Observation, PeriodType, SignalCategory};
use crate::store::{Store, StoreError};

/// Half-width of the historical window centered on "one year before the
/// bucket start".
const BASELINE_HALF_WINDOW_DAYS: i64 = 15;

/// Groups stored observations into period buckets and appends one
/// aggregation record per non-empty bucket.
pub struct PeriodAggregator<S> {
    store: Arc<S>,
}

impl<S: Store> PeriodAggregator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Aggregate a region's observations from the trailing `days_back`
    /// window into `period_type` buckets. Returns the number of
    /// aggregation records created.
    pub fn compute(
        &self,
        region_id: i64,
        period_type: PeriodType,
        days_back: i64,
        now: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        let since = now - Duration::days(days_back);
        let observations =
            self.store
                .observations_for_region(region_id, None, since, now)?;

        let mut series: BTreeMap<(SignalCategory, String), Vec<&Observation>> = BTreeMap::new();
        for obs in &observations {
            series
                .entry((obs.category, obs.indicator.clone()))
                .or_default()
                .push(obs);
        }

        let mut records = Vec::new();
        for ((category, indicator), members) in series {
            let mut buckets: BTreeMap<DateTime<Utc>, Vec<f64>> = BTreeMap::new();
            for obs in members {
                let start = period_type.bucket_start(obs.observed_at);
                buckets.entry(start).or_default().push(obs.value);
            }

            for (period_start, values) in buckets {
                let mean = mean(&values);
                let mut aggregation = Aggregation {
                    region_id,
                    category,
                    indicator: indicator.clone(),
                    period_type,
                    period_start,
                    period_end: period_type.period_end(period_start),
                    value_mean: mean,
                    value_median: median(&values),
                    value_min: values.iter().copied().fold(f64::INFINITY, f64::min),
                    value_max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    value_std: population_std(&values, mean),
                    sample_count: values.len(),
                    baseline_value: None,
                    deviation_from_baseline: None,
                    z_score: None,
                    created_at: now,
                };

                if let Some(baseline) =
                    self.baseline(region_id, category, &indicator, period_start)?
                {
                    let deviation = mean - baseline;
                    aggregation.baseline_value = Some(baseline);
                    aggregation.deviation_from_baseline = Some(deviation);
                    // Heuristic scale: no variance estimate of the baseline
                    // population is retained.
                    aggregation.z_score = Some(deviation / (baseline * 0.1).max(1.0));
                }

                records.push(aggregation);
            }
        }

        // The whole pass lands in one write, so a store failure commits
        // none of it.
        let created = records.len();
        self.store.append_aggregations(records)?;
        Ok(created)
    }

    /// Mean of the same series within ±15 days of one year before the
    /// bucket start; `None` when that window holds no observations.
    fn baseline(
        &self,
        region_id: i64,
        category: SignalCategory,
        indicator: &str,
        period_start: DateTime<Utc>,
    ) -> Result<Option<f64>, StoreError> {
        let year_ago = period_start - Duration::days(365);
        let window_start = year_ago - Duration::days(BASELINE_HALF_WINDOW_DAYS);
        let window_end = year_ago + Duration::days(BASELINE_HALF_WINDOW_DAYS);

        let historical = self.store.observations_in_window(
            region_id,
            category,
            indicator,
            window_start,
            window_end,
        )?;

        if historical.is_empty() {
            return Ok(None);
        }

        let values: Vec<f64> = historical.iter().map(|obs| obs.value).collect();
        Ok(Some(mean(&values)))
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Population standard deviation; 0 for fewer than two samples.
fn population_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_median_of_odd_sample() {
        let values = [3.0, 1.0, 2.0];
        assert_eq!(mean(&values), 2.0);
        assert_eq!(median(&values), 2.0);
    }

    #[test]
    fn median_of_even_sample_averages_the_middle_pair() {
        let values = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(median(&values), 2.5);
    }

    #[test]
    fn single_sample_bucket_has_zero_std() {
        assert_eq!(population_std(&[42.0], 42.0), 0.0);
    }

    #[test]
    fn population_std_matches_hand_computation() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&values);
        assert_eq!(m, 5.0);
        assert!((population_std(&values, m) - 2.0).abs() < 1e-12);
    }
}
