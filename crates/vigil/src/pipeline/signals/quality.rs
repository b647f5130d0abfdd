//! Per-observation anomaly detection and quality scoring.
//!
//! Pure functions of the candidate observation and the issuing source's
//! reliability; nothing here touches the store.

use chrono::{DateTime, Utc};

use crate::pipeline::domain::SignalCategory;

/// Expected value ranges per (category, indicator). Values strictly outside
/// their range are flagged anomalous; pairs without an entry are never
/// flagged (fail-open, since field indicators are open-ended).
const EXPECTED_RANGES: &[(SignalCategory, &str, f64, f64)] = &[
    (SignalCategory::Weather, "temperature_avg", -20.0, 50.0),
    (SignalCategory::Weather, "rainfall_mm", 0.0, 1000.0),
    (SignalCategory::Weather, "humidity_pct", 0.0, 100.0),
    (SignalCategory::Weather, "wind_speed_kmh", 0.0, 200.0),
    (SignalCategory::Weather, "drought_index", 0.0, 100.0),
    (SignalCategory::Weather, "flooding_risk", 0.0, 100.0),
    (SignalCategory::FoodPrice, "staple_price_index", 50.0, 300.0),
    (SignalCategory::FoodPrice, "maize_price_usd", 0.0, 500.0),
    (SignalCategory::FoodPrice, "rice_price_usd", 0.0, 500.0),
    (SignalCategory::FoodPrice, "wheat_price_usd", 0.0, 500.0),
    (SignalCategory::DiseaseReport, "malaria_cases", 0.0, 10_000.0),
    (SignalCategory::DiseaseReport, "cholera_cases", 0.0, 5_000.0),
    (SignalCategory::DiseaseReport, "measles_cases", 0.0, 2_000.0),
    (SignalCategory::DiseaseReport, "dengue_cases", 0.0, 3_000.0),
    (SignalCategory::DiseaseReport, "respiratory_cases", 0.0, 5_000.0),
    (SignalCategory::HealthFacility, "bed_occupancy_pct", 0.0, 100.0),
    (SignalCategory::HealthFacility, "staff_availability", 0.0, 100.0),
    (SignalCategory::HealthFacility, "oxygen_availability", 0.0, 100.0),
    (SignalCategory::HealthFacility, "ors_availability", 0.0, 100.0),
    (SignalCategory::HealthFacility, "vaccination_coverage", 0.0, 100.0),
    (SignalCategory::HealthFacility, "patient_wait_time", 0.0, 480.0),
];

/// Hours after which an observation starts losing quality.
const FRESHNESS_GRACE_HOURS: f64 = 24.0;
/// Decay span: quality reaches the floor one week past the grace period.
const FRESHNESS_DECAY_HOURS: f64 = 168.0;
const FRESHNESS_FLOOR: f64 = 0.5;
const ANOMALY_PENALTY: f64 = 0.7;

pub fn expected_range(category: SignalCategory, indicator: &str) -> Option<(f64, f64)> {
    EXPECTED_RANGES
        .iter()
        .find(|(cat, name, _, _)| *cat == category && *name == indicator)
        .map(|(_, _, min, max)| (*min, *max))
}

/// True iff the indicator has a configured range and the value falls
/// strictly outside it.
pub fn is_anomalous(category: SignalCategory, indicator: &str, value: f64) -> bool {
    match expected_range(category, indicator) {
        Some((min, max)) => value < min || value > max,
        None => false,
    }
}

/// Multiplicative quality score, clamped to 0.0-1.0.
///
/// Starts at 1.0, scaled by source reliability and stated confidence,
/// penalized for anomalies, and decayed linearly for observations older
/// than 24 hours down to a floor of 0.5 at one week.
pub fn quality_score(
    confidence: f64,
    source_reliability: f64,
    is_anomaly: bool,
    observed_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> f64 {
    let mut score = 1.0;
    score *= source_reliability;
    score *= confidence;

    if is_anomaly {
        score *= ANOMALY_PENALTY;
    }

    let age_hours = (now - observed_at).num_seconds() as f64 / 3600.0;
    if age_hours > FRESHNESS_GRACE_HOURS {
        let decay = 1.0 - (age_hours - FRESHNESS_GRACE_HOURS) / FRESHNESS_DECAY_HOURS;
        score *= decay.max(FRESHNESS_FLOOR);
    }

    score.clamp(0.0, 1.0)
}
