//! Threshold-based alert generation.
//!
//! Runs once per region immediately after the composite index is computed.
//! No deduplication against still-active alerts happens here; repeated
//! passes while a condition persists emit repeated alerts, and suppression
//! belongs to the operator-facing layer that owns acknowledge/resolve.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use super::domain::{
    Alert, AlertSeverity, AlertStatus, AlertType, DiseaseType, Region, RiskIndex, RiskLevel,
};
use super::risk::index::IndexScore;

/// How long an emitted alert stays relevant before read-time expiry.
const ALERT_TTL_HOURS: i64 = 48;

/// Evaluate a freshly computed composite index and per-disease scores
/// against the alert threshold (a 0-1 fraction of the 0-100 scale).
pub fn evaluate(
    region: &Region,
    index: &RiskIndex,
    disease_scores: &BTreeMap<DiseaseType, IndexScore>,
    alert_threshold: f64,
    now: DateTime<Utc>,
) -> Vec<Alert> {
    let threshold = alert_threshold * 100.0;
    let expires_at = Some(now + Duration::hours(ALERT_TTL_HOURS));
    let mut alerts = Vec::new();

    if index.vital_risk_index >= threshold {
        let severity = if index.risk_level == RiskLevel::Critical {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Urgent
        };
        alerts.push(Alert {
            region_id: region.id,
            alert_type: AlertType::CompositeRisk,
            severity,
            status: AlertStatus::Active,
            title: format!("High vital risk index in {}", region.name),
            description: format!(
                "The composite vital risk index has reached {:.1}, exceeding the alert \
                 threshold. Components: hunger {:.1}, health strain {:.1}, disease {:.1}.",
                index.vital_risk_index,
                index.hunger_stress_index,
                index.health_system_strain_index,
                index.disease_outbreak_index,
            ),
            risk_score: index.vital_risk_index,
            threshold_exceeded: threshold,
            disease: None,
            triggered_at: now,
            expires_at,
            acknowledged_at: None,
            resolved_at: None,
            contributing_factors: Some(index.contributing_factors.clone()),
            confidence: index.confidence,
        });
    }

    for (disease, score) in disease_scores {
        if score.score >= threshold {
            alerts.push(Alert {
                region_id: region.id,
                alert_type: AlertType::DiseaseOutbreak,
                severity: AlertSeverity::Urgent,
                status: AlertStatus::Active,
                title: format!("High {} risk in {}", disease.label(), region.name),
                description: format!(
                    "{} risk score has reached {:.1}, indicating potential outbreak \
                     conditions.",
                    disease.label(),
                    score.score,
                ),
                risk_score: score.score,
                threshold_exceeded: threshold,
                disease: Some(*disease),
                triggered_at: now,
                expires_at,
                acknowledged_at: None,
                resolved_at: None,
                contributing_factors: None,
                confidence: score.confidence,
            });
        }
    }

    if index.hunger_stress_index >= threshold {
        alerts.push(Alert {
            region_id: region.id,
            alert_type: AlertType::HungerCrisis,
            severity: AlertSeverity::Urgent,
            status: AlertStatus::Active,
            title: format!("High hunger stress in {}", region.name),
            description: format!(
                "Hunger stress index has reached {:.1}, indicating significant food \
                 security concerns.",
                index.hunger_stress_index,
            ),
            risk_score: index.hunger_stress_index,
            threshold_exceeded: threshold,
            disease: None,
            triggered_at: now,
            expires_at,
            acknowledged_at: None,
            resolved_at: None,
            contributing_factors: None,
            confidence: index.confidence,
        });
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::domain::MODEL_VERSION;
    use chrono::TimeZone;
    use serde_json::json;

    fn region() -> Region {
        Region {
            id: 7,
            code: "KE-MAR".to_string(),
            name: "Marsabit".to_string(),
            is_active: true,
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).single().expect("valid timestamp")
    }

    fn index(vital: f64, hunger: f64) -> RiskIndex {
        RiskIndex {
            region_id: 7,
            calculated_at: at(),
            valid_from: at(),
            valid_until: at() + Duration::hours(24),
            hunger_stress_index: hunger,
            health_system_strain_index: 0.0,
            disease_outbreak_index: 0.0,
            vital_risk_index: vital,
            risk_level: RiskLevel::classify(vital),
            confidence: 0.9,
            data_completeness: 1.0,
            weights: json!({}),
            contributing_factors: json!({}),
            model_version: MODEL_VERSION.to_string(),
        }
    }

    #[test]
    fn composite_breach_emits_one_critical_alert() {
        let alerts = evaluate(&region(), &index(85.0, 10.0), &BTreeMap::new(), 0.8, at());

        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.alert_type, AlertType::CompositeRisk);
        assert_eq!(alert.severity, AlertSeverity::Critical);
        assert_eq!(alert.threshold_exceeded, 80.0);
        assert_eq!(alert.status, AlertStatus::Active);
        assert_eq!(alert.expires_at, Some(at() + Duration::hours(48)));
    }

    #[test]
    fn sub_critical_breach_is_urgent() {
        // Vital risk over the 0.75 threshold but below the critical band.
        let alerts = evaluate(&region(), &index(78.0, 0.0), &BTreeMap::new(), 0.75, at());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::Urgent);
    }

    #[test]
    fn below_threshold_emits_nothing() {
        let alerts = evaluate(&region(), &index(79.9, 50.0), &BTreeMap::new(), 0.8, at());
        assert!(alerts.is_empty());
    }

    #[test]
    fn disease_breaches_are_tagged_with_the_disease() {
        let mut scores = BTreeMap::new();
        scores.insert(
            DiseaseType::Cholera,
            IndexScore {
                score: 88.0,
                confidence: 0.7,
            },
        );
        scores.insert(
            DiseaseType::Malaria,
            IndexScore {
                score: 30.0,
                confidence: 0.9,
            },
        );

        let alerts = evaluate(&region(), &index(10.0, 0.0), &scores, 0.8, at());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert_type, AlertType::DiseaseOutbreak);
        assert_eq!(alerts[0].disease, Some(DiseaseType::Cholera));
        assert_eq!(alerts[0].severity, AlertSeverity::Urgent);
        assert!((alerts[0].confidence - 0.7).abs() < 1e-12);
    }

    #[test]
    fn hunger_breach_alone_raises_a_hunger_crisis() {
        let alerts = evaluate(&region(), &index(50.0, 82.0), &BTreeMap::new(), 0.8, at());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert_type, AlertType::HungerCrisis);
        assert_eq!(alerts[0].risk_score, 82.0);
    }

    #[test]
    fn simultaneous_breaches_emit_independent_alerts() {
        let mut scores = BTreeMap::new();
        scores.insert(
            DiseaseType::Measles,
            IndexScore {
                score: 95.0,
                confidence: 0.8,
            },
        );
        let alerts = evaluate(&region(), &index(90.0, 85.0), &scores, 0.8, at());
        let kinds: Vec<AlertType> = alerts.iter().map(|alert| alert.alert_type).collect();
        assert_eq!(
            kinds,
            vec![
                AlertType::CompositeRisk,
                AlertType::DiseaseOutbreak,
                AlertType::HungerCrisis,
            ]
        );
    }
}
