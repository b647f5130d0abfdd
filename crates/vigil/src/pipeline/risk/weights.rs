//! Static scoring configuration: weight terms, seasonal baselines, and
//! normalization ranges.
//!
//! These are fixed lookup tables, not trained parameters. Keeping them as
//! data keeps the weighted index calculator fully generic.

use crate::pipeline::domain::{DiseaseType, SignalCategory};

use super::index::WeightTerm;

/// Fixed composite combination of the three sub-indices.
pub const COMPOSITE_HUNGER_WEIGHT: f64 = 0.30;
pub const COMPOSITE_STRAIN_WEIGHT: f64 = 0.25;
pub const COMPOSITE_OUTBREAK_WEIGHT: f64 = 0.45;

/// Observation count in the lookback window considered full coverage.
pub const EXPECTED_SIGNALS_FOR_FULL_COVERAGE: usize = 20;

/// Baseline applied to diseases (and months) without a configured table.
pub const DEFAULT_SEASONAL_BASELINE: f64 = 30.0;

/// A monthly baseline above this marks the month as high season.
pub const HIGH_SEASON_BASELINE: f64 = 40.0;

pub const MALARIA_WEIGHTS: &[WeightTerm] = &[
    WeightTerm::direct(SignalCategory::Weather, "rainfall_mm", 0.25),
    WeightTerm::direct(SignalCategory::Weather, "temperature_avg", 0.20),
    WeightTerm::direct(SignalCategory::Weather, "humidity_pct", 0.15),
    WeightTerm::direct(SignalCategory::DiseaseReport, "malaria_cases", 0.25),
    WeightTerm::direct(SignalCategory::HealthFacility, "bed_occupancy_pct", 0.15),
];

pub const CHOLERA_WEIGHTS: &[WeightTerm] = &[
    WeightTerm::direct(SignalCategory::WaterQuality, "contamination_index", 0.30),
    WeightTerm::direct(SignalCategory::Weather, "flooding_risk", 0.20),
    WeightTerm::direct(SignalCategory::DiseaseReport, "cholera_cases", 0.30),
    WeightTerm::inverted(SignalCategory::HealthFacility, "ors_availability", 0.20),
];

pub const MEASLES_WEIGHTS: &[WeightTerm] = &[
    WeightTerm::direct(SignalCategory::DiseaseReport, "measles_cases", 0.35),
    WeightTerm::inverted(SignalCategory::HealthFacility, "vaccination_coverage", 0.35),
    WeightTerm::direct(SignalCategory::Humanitarian, "displacement_index", 0.30),
];

pub const DENGUE_WEIGHTS: &[WeightTerm] = &[
    WeightTerm::direct(SignalCategory::Weather, "rainfall_mm", 0.20),
    WeightTerm::direct(SignalCategory::Weather, "temperature_avg", 0.20),
    WeightTerm::direct(SignalCategory::DiseaseReport, "dengue_cases", 0.35),
    WeightTerm::inverted(SignalCategory::HealthFacility, "vector_control_index", 0.25),
];

pub const RESPIRATORY_WEIGHTS: &[WeightTerm] = &[
    WeightTerm::inverted(SignalCategory::Weather, "temperature_avg", 0.15),
    WeightTerm::direct(SignalCategory::DiseaseReport, "respiratory_cases", 0.40),
    WeightTerm::inverted(SignalCategory::HealthFacility, "oxygen_availability", 0.25),
    WeightTerm::direct(SignalCategory::Mobility, "crowding_index", 0.20),
];

pub const HUNGER_WEIGHTS: &[WeightTerm] = &[
    WeightTerm::direct(SignalCategory::FoodPrice, "staple_price_index", 0.30),
    WeightTerm::inverted(SignalCategory::CropIndicator, "harvest_index", 0.25),
    WeightTerm::direct(SignalCategory::Weather, "drought_index", 0.20),
    WeightTerm::direct(SignalCategory::Humanitarian, "food_insecurity_phase", 0.25),
];

pub const HEALTH_STRAIN_WEIGHTS: &[WeightTerm] = &[
    WeightTerm::direct(SignalCategory::HealthFacility, "bed_occupancy_pct", 0.25),
    WeightTerm::inverted(SignalCategory::HealthFacility, "staff_availability", 0.20),
    WeightTerm::inverted(SignalCategory::Pharmacy, "essential_medicine_stock", 0.20),
    WeightTerm::direct(SignalCategory::HealthFacility, "patient_wait_time", 0.20),
    WeightTerm::inverted(SignalCategory::Humanitarian, "healthcare_access_index", 0.15),
];

/// Weight terms for a disease; diseases without configured terms never
/// produce a score.
pub fn disease_weights(disease: DiseaseType) -> &'static [WeightTerm] {
    match disease {
        DiseaseType::Malaria => MALARIA_WEIGHTS,
        DiseaseType::Cholera => CHOLERA_WEIGHTS,
        DiseaseType::Measles => MEASLES_WEIGHTS,
        DiseaseType::Dengue => DENGUE_WEIGHTS,
        DiseaseType::Respiratory => RESPIRATORY_WEIGHTS,
        DiseaseType::Typhoid | DiseaseType::Ebola | DiseaseType::Covid => &[],
    }
}

const MALARIA_BASELINES: [f64; 12] = [
    30.0, 35.0, 45.0, 55.0, 60.0, 50.0, 40.0, 35.0, 40.0, 50.0, 45.0, 35.0,
];

const CHOLERA_BASELINES: [f64; 12] = [
    25.0, 30.0, 40.0, 50.0, 55.0, 45.0, 35.0, 30.0, 35.0, 45.0, 40.0, 30.0,
];

/// Expected score for a disease in a given calendar month (1-12).
pub fn seasonal_baseline(disease: DiseaseType, month: u32) -> f64 {
    let table = match disease {
        DiseaseType::Malaria => &MALARIA_BASELINES,
        DiseaseType::Cholera => &CHOLERA_BASELINES,
        _ => return DEFAULT_SEASONAL_BASELINE,
    };
    month
        .checked_sub(1)
        .and_then(|index| table.get(index as usize))
        .copied()
        .unwrap_or(DEFAULT_SEASONAL_BASELINE)
}

/// Per-indicator (min, max) ranges used to project raw values onto the
/// 0-100 scale. Indicators without an entry fall back to a (0, 100)
/// identity range.
const NORMALIZATION_RANGES: &[(SignalCategory, &str, f64, f64)] = &[
    (SignalCategory::Weather, "rainfall_mm", 0.0, 500.0),
    (SignalCategory::Weather, "temperature_avg", 15.0, 40.0),
    (SignalCategory::Weather, "humidity_pct", 0.0, 100.0),
    (SignalCategory::FoodPrice, "staple_price_index", 80.0, 200.0),
    (SignalCategory::HealthFacility, "bed_occupancy_pct", 0.0, 100.0),
    (SignalCategory::DiseaseReport, "malaria_cases", 0.0, 1000.0),
    (SignalCategory::DiseaseReport, "cholera_cases", 0.0, 500.0),
    (SignalCategory::DiseaseReport, "measles_cases", 0.0, 200.0),
    (SignalCategory::DiseaseReport, "dengue_cases", 0.0, 300.0),
    (SignalCategory::DiseaseReport, "respiratory_cases", 0.0, 500.0),
];

pub fn normalization_range(category: SignalCategory, indicator: &str) -> (f64, f64) {
    NORMALIZATION_RANGES
        .iter()
        .find(|(cat, name, _, _)| *cat == category && *name == indicator)
        .map(|(_, _, min, max)| (*min, *max))
        .unwrap_or((0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(terms: &[WeightTerm]) -> f64 {
        terms.iter().map(|term| term.weight).sum()
    }

    #[test]
    fn configured_weight_lists_sum_to_one() {
        for terms in [
            MALARIA_WEIGHTS,
            CHOLERA_WEIGHTS,
            MEASLES_WEIGHTS,
            DENGUE_WEIGHTS,
            RESPIRATORY_WEIGHTS,
            HUNGER_WEIGHTS,
            HEALTH_STRAIN_WEIGHTS,
        ] {
            assert!((total(terms) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn composite_weights_form_a_convex_combination() {
        let sum = COMPOSITE_HUNGER_WEIGHT + COMPOSITE_STRAIN_WEIGHT + COMPOSITE_OUTBREAK_WEIGHT;
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unconfigured_diseases_have_no_terms() {
        assert!(disease_weights(DiseaseType::Typhoid).is_empty());
        assert!(disease_weights(DiseaseType::Ebola).is_empty());
        assert!(disease_weights(DiseaseType::Covid).is_empty());
    }

    #[test]
    fn seasonal_baseline_falls_back_to_default() {
        assert_eq!(seasonal_baseline(DiseaseType::Malaria, 5), 60.0);
        assert_eq!(seasonal_baseline(DiseaseType::Cholera, 1), 25.0);
        assert_eq!(seasonal_baseline(DiseaseType::Dengue, 5), DEFAULT_SEASONAL_BASELINE);
        assert_eq!(seasonal_baseline(DiseaseType::Malaria, 0), DEFAULT_SEASONAL_BASELINE);
    }

    #[test]
    fn unlisted_indicator_gets_identity_range() {
        assert_eq!(
            normalization_range(SignalCategory::Weather, "drought_index"),
            (0.0, 100.0)
        );
        assert_eq!(
            normalization_range(SignalCategory::Weather, "rainfall_mm"),
            (0.0, 500.0)
        );
    }
}
