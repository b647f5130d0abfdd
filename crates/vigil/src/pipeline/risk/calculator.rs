//! Per-region risk scoring: disease indices, hunger and health-strain
//! stress indices, and the composite vital risk index.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Utc};
use serde_json::{json, Map, Value};
use tracing::info;

use crate::pipeline::alerts;
use crate::pipeline::domain::{
    DiseaseRisk, DiseaseType, Region, RiskIndex, RiskLevel, MODEL_VERSION,
};
use crate::store::{Store, StoreError};

use super::index::{weighted_index, IndexScore, SignalWindow, WeightTerm};
use super::weights;

/// Window and threshold configuration for a scoring cycle.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Alert trigger threshold as a 0-1 fraction of the 0-100 scale.
    pub alert_threshold: f64,
    /// Trailing observation window consulted per region.
    pub window_days: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            alert_threshold: 0.8,
            window_days: 30,
        }
    }
}

/// Scores regions from their observation windows and appends the derived
/// records. Each region's pass is independent; regions may be scored in
/// parallel workers without shared mutable state beyond the store.
pub struct RiskCalculator<S> {
    store: Arc<S>,
    config: ScoringConfig,
}

impl<S: Store> RiskCalculator<S> {
    pub fn new(store: Arc<S>, config: ScoringConfig) -> Self {
        Self { store, config }
    }

    /// Score all active regions, or only the given ids. Returns the
    /// composite index per region that produced one.
    pub fn calculate_all_risks(
        &self,
        region_ids: Option<&[i64]>,
        now: DateTime<Utc>,
    ) -> Result<BTreeMap<i64, RiskIndex>, StoreError> {
        let regions = self.store.active_regions(region_ids)?;

        let mut indices = BTreeMap::new();
        for region in regions {
            if let Some(index) = self.calculate_region_risks(&region, now)? {
                indices.insert(region.id, index);
            }
        }

        Ok(indices)
    }

    /// Score one region. A region with no observations in the lookback
    /// window produces nothing at all, which is distinct from producing an
    /// index with all-zero sub-scores.
    pub fn calculate_region_risks(
        &self,
        region: &Region,
        now: DateTime<Utc>,
    ) -> Result<Option<RiskIndex>, StoreError> {
        let since = now - Duration::days(self.config.window_days);
        let observations = self
            .store
            .observations_for_region(region.id, None, since, now)?;

        if observations.is_empty() {
            return Ok(None);
        }

        let window = SignalWindow::from_observations(observations);

        let mut disease_scores: BTreeMap<DiseaseType, IndexScore> = BTreeMap::new();
        let mut disease_risks = Vec::new();
        for disease in DiseaseType::ALL {
            let terms = weights::disease_weights(disease);
            if terms.is_empty() {
                continue;
            }
            if let Some(score) = weighted_index(&window, terms) {
                disease_risks.push(build_disease_risk(region.id, disease, score, now));
                disease_scores.insert(disease, score);
            }
        }

        let hunger = weighted_index(&window, weights::HUNGER_WEIGHTS);
        let strain = weighted_index(&window, weights::HEALTH_STRAIN_WEIGHTS);

        // The outbreak index is the worst defined disease score; the
        // composite collapses undefined sub-indices to zero because it must
        // always produce a number, unlike the per-disease records above.
        let outbreak = disease_scores
            .values()
            .map(|score| score.score)
            .fold(0.0_f64, f64::max);
        let hunger_score = hunger.map_or(0.0, |score| score.score);
        let strain_score = strain.map_or(0.0, |score| score.score);

        let vital = weights::COMPOSITE_HUNGER_WEIGHT * hunger_score
            + weights::COMPOSITE_STRAIN_WEIGHT * strain_score
            + weights::COMPOSITE_OUTBREAK_WEIGHT * outbreak;

        let completeness = (window.sample_count() as f64
            / weights::EXPECTED_SIGNALS_FOR_FULL_COVERAGE as f64)
            .min(1.0);

        let confidences: Vec<f64> = hunger
            .iter()
            .chain(strain.iter())
            .map(|score| score.confidence)
            .chain(disease_scores.values().map(|score| score.confidence))
            .collect();
        let confidence = if confidences.is_empty() {
            0.5
        } else {
            confidences.iter().sum::<f64>() / confidences.len() as f64
        };

        let index = RiskIndex {
            region_id: region.id,
            calculated_at: now,
            valid_from: now,
            valid_until: now + Duration::hours(24),
            hunger_stress_index: hunger_score,
            health_system_strain_index: strain_score,
            disease_outbreak_index: outbreak,
            vital_risk_index: vital,
            risk_level: RiskLevel::classify(vital),
            confidence,
            data_completeness: completeness,
            weights: json!({
                "hunger_stress": weights::COMPOSITE_HUNGER_WEIGHT,
                "health_strain": weights::COMPOSITE_STRAIN_WEIGHT,
                "disease_outbreak": weights::COMPOSITE_OUTBREAK_WEIGHT,
            }),
            contributing_factors: contributing_factors(&disease_scores),
            model_version: MODEL_VERSION.to_string(),
        };

        // All scoring output for the region lands in one write, so a store
        // failure commits none of it.
        self.store
            .append_region_scores(disease_risks, index.clone())?;
        info!(
            region = %region.code,
            vital_risk = index.vital_risk_index,
            level = index.risk_level.label(),
            "risk index calculated"
        );

        // Scores are already durable; an alert failure leaves the pass in a
        // recoverable "scored but not alerted" state.
        let alerts = alerts::evaluate(
            region,
            &index,
            &disease_scores,
            self.config.alert_threshold,
            now,
        );
        for alert in &alerts {
            info!(
                region = %region.code,
                kind = ?alert.alert_type,
                severity = ?alert.severity,
                score = alert.risk_score,
                "alert triggered"
            );
        }
        self.store.append_alerts(alerts)?;

        Ok(Some(index))
    }
}

fn build_disease_risk(
    region_id: i64,
    disease: DiseaseType,
    score: IndexScore,
    now: DateTime<Utc>,
) -> DiseaseRisk {
    let baseline = weights::seasonal_baseline(disease, now.month());
    DiseaseRisk {
        region_id,
        disease,
        calculated_at: now,
        valid_from: now,
        valid_until: now + Duration::hours(24),
        risk_score: score.score,
        risk_level: RiskLevel::classify(score.score),
        seasonal_baseline: baseline,
        deviation_from_seasonal: score.score - baseline,
        is_high_season: baseline > weights::HIGH_SEASON_BASELINE,
        confidence: score.confidence,
        model_version: MODEL_VERSION.to_string(),
    }
}

fn contributing_factors(disease_scores: &BTreeMap<DiseaseType, IndexScore>) -> Value {
    let mut scores = Map::new();
    for (disease, score) in disease_scores {
        scores.insert(disease.label().to_string(), json!(score.score));
    }
    json!({
        "hunger_components": describe_terms(weights::HUNGER_WEIGHTS),
        "health_strain_components": describe_terms(weights::HEALTH_STRAIN_WEIGHTS),
        "disease_scores": Value::Object(scores),
    })
}

fn describe_terms(terms: &[WeightTerm]) -> Value {
    let mut components = Map::new();
    for term in terms {
        components.insert(
            format!("{}:{}", term.category.label(), term.indicator),
            json!({ "weight": term.weight, "invert": term.invert }),
        );
    }
    Value::Object(components)
}
