//! The generic weighted index calculator.
//!
//! Every scoring flow (per-disease, hunger stress, health-system strain)
//! is this one computation parameterized by a weight-term list.

use std::collections::BTreeMap;

use crate::pipeline::domain::{Observation, SignalCategory};

use super::weights;

/// One term of a weighted index: which series contributes, how much, and
/// whether a higher raw value means higher risk (direct) or lower risk
/// (inverted).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightTerm {
    pub category: SignalCategory,
    pub indicator: &'static str,
    pub weight: f64,
    pub invert: bool,
}

impl WeightTerm {
    pub const fn direct(category: SignalCategory, indicator: &'static str, weight: f64) -> Self {
        Self {
            category,
            indicator,
            weight,
            invert: false,
        }
    }

    pub const fn inverted(category: SignalCategory, indicator: &'static str, weight: f64) -> Self {
        Self {
            category,
            indicator,
            weight,
            invert: true,
        }
    }
}

/// A defined index value. Absence of data is `None` at the call site, never
/// a score of zero: zero data is not zero risk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexScore {
    /// 0-100 weighted score.
    pub score: f64,
    /// Mean of the contributing observations' stated confidences.
    pub confidence: f64,
}

/// Most-recent observation per (category, indicator) within the active
/// window, the calculator's only view of the data.
#[derive(Debug, Default)]
pub struct SignalWindow {
    latest: BTreeMap<(SignalCategory, String), Observation>,
    sample_count: usize,
}

impl SignalWindow {
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        let sample_count = observations.len();
        let mut latest: BTreeMap<(SignalCategory, String), Observation> = BTreeMap::new();
        for obs in observations {
            let key = (obs.category, obs.indicator.clone());
            match latest.get(&key) {
                Some(existing) if existing.observed_at >= obs.observed_at => {}
                _ => {
                    latest.insert(key, obs);
                }
            }
        }
        Self {
            latest,
            sample_count,
        }
    }

    pub fn latest(&self, category: SignalCategory, indicator: &str) -> Option<&Observation> {
        self.latest.get(&(category, indicator.to_string()))
    }

    /// Total observations the window was built from, before deduplication.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }
}

/// Project a raw value onto the 0-100 scale using the indicator's
/// configured range, clamping values outside it.
pub fn normalize(category: SignalCategory, indicator: &str, value: f64) -> f64 {
    let (min, max) = weights::normalization_range(category, indicator);
    let clamped = value.clamp(min, max);
    ((clamped - min) / (max - min)) * 100.0
}

/// Weighted combination over the terms that have data. Missing terms do not
/// bias the score, they only reduce effective weight coverage; when no term
/// has data the index is undefined.
pub fn weighted_index(window: &SignalWindow, terms: &[WeightTerm]) -> Option<IndexScore> {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    let mut confidences = Vec::new();

    for term in terms {
        let Some(obs) = window.latest(term.category, term.indicator) else {
            continue;
        };

        let mut normalized = normalize(term.category, term.indicator, obs.value);
        if term.invert {
            normalized = 100.0 - normalized;
        }

        weighted_sum += normalized * term.weight;
        total_weight += term.weight;
        confidences.push(obs.confidence);
    }

    if total_weight == 0.0 {
        return None;
    }

    let confidence = confidences.iter().sum::<f64>() / confidences.len() as f64;
    Some(IndexScore {
        score: weighted_sum / total_weight,
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).single().expect("valid timestamp")
    }

    fn observation(
        category: SignalCategory,
        indicator: &str,
        value: f64,
        confidence: f64,
        observed_at: DateTime<Utc>,
    ) -> Observation {
        Observation {
            source_id: 1,
            region_id: 1,
            category,
            indicator: indicator.to_string(),
            value,
            unit: None,
            confidence,
            quality_score: 1.0,
            is_anomaly: false,
            observed_at,
            reported_at: observed_at,
            raw_data: None,
        }
    }

    #[test]
    fn no_matching_observations_yields_undefined_not_zero() {
        let window = SignalWindow::from_observations(vec![observation(
            SignalCategory::Weather,
            "rainfall_mm",
            120.0,
            1.0,
            at(),
        )]);
        let terms = [WeightTerm::direct(
            SignalCategory::FoodPrice,
            "staple_price_index",
            0.5,
        )];
        assert_eq!(weighted_index(&window, &terms), None);
    }

    #[test]
    fn equal_direct_weights_collapse_to_the_mean() {
        let window = SignalWindow::from_observations(vec![
            observation(SignalCategory::Weather, "drought_index", 40.0, 1.0, at()),
            observation(SignalCategory::Mobility, "crowding_index", 80.0, 1.0, at()),
        ]);
        let terms = [
            WeightTerm::direct(SignalCategory::Weather, "drought_index", 1.0),
            WeightTerm::direct(SignalCategory::Mobility, "crowding_index", 1.0),
        ];
        let result = weighted_index(&window, &terms).expect("both terms have data");
        assert!((result.score - 60.0).abs() < 1e-12);
    }

    #[test]
    fn inverted_terms_flip_the_normalized_value() {
        let window = SignalWindow::from_observations(vec![observation(
            SignalCategory::HealthFacility,
            "staff_availability",
            20.0,
            1.0,
            at(),
        )]);
        let terms = [WeightTerm::inverted(
            SignalCategory::HealthFacility,
            "staff_availability",
            1.0,
        )];
        let result = weighted_index(&window, &terms).expect("term has data");
        assert!((result.score - 80.0).abs() < 1e-12);
    }

    #[test]
    fn missing_terms_reduce_coverage_without_biasing_the_score() {
        let window = SignalWindow::from_observations(vec![observation(
            SignalCategory::Weather,
            "drought_index",
            70.0,
            0.8,
            at(),
        )]);
        let terms = [
            WeightTerm::direct(SignalCategory::Weather, "drought_index", 0.2),
            WeightTerm::direct(SignalCategory::FoodPrice, "staple_price_index", 0.8),
        ];
        let result = weighted_index(&window, &terms).expect("one term has data");
        assert!((result.score - 70.0).abs() < 1e-12);
        assert!((result.confidence - 0.8).abs() < 1e-12);
    }

    #[test]
    fn window_keeps_the_most_recent_observation_per_series() {
        let older = observation(SignalCategory::Weather, "drought_index", 10.0, 1.0, at());
        let newer = observation(
            SignalCategory::Weather,
            "drought_index",
            90.0,
            1.0,
            at() + Duration::hours(6),
        );
        let window = SignalWindow::from_observations(vec![older, newer]);
        let latest = window
            .latest(SignalCategory::Weather, "drought_index")
            .expect("series present");
        assert_eq!(latest.value, 90.0);
        assert_eq!(window.sample_count(), 2);
    }

    #[test]
    fn normalization_clamps_out_of_range_values() {
        assert_eq!(normalize(SignalCategory::Weather, "rainfall_mm", 750.0), 100.0);
        assert_eq!(normalize(SignalCategory::Weather, "rainfall_mm", -5.0), 0.0);
        assert_eq!(normalize(SignalCategory::Weather, "rainfall_mm", 250.0), 50.0);
        // No configured range: identity with clamping.
        assert_eq!(normalize(SignalCategory::Mobility, "crowding_index", 250.0), 100.0);
        assert_eq!(normalize(SignalCategory::Mobility, "crowding_index", 42.0), 42.0);
    }

    #[test]
    fn confidence_averages_contributing_observations() {
        let window = SignalWindow::from_observations(vec![
            observation(SignalCategory::Weather, "drought_index", 50.0, 0.6, at()),
            observation(SignalCategory::Mobility, "crowding_index", 50.0, 1.0, at()),
        ]);
        let terms = [
            WeightTerm::direct(SignalCategory::Weather, "drought_index", 1.0),
            WeightTerm::direct(SignalCategory::Mobility, "crowding_index", 3.0),
        ];
        let result = weighted_index(&window, &terms).expect("terms have data");
        // Confidence is an unweighted mean of contributing observations.
        assert!((result.confidence - 0.8).abs() < 1e-12);
    }
}
