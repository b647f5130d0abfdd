use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Record schema version stamped onto derived risk records.
pub const MODEL_VERSION: &str = "v1.0";

/// Categories of observational signals the pipeline ingests.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    Weather,
    FoodPrice,
    DiseaseReport,
    HealthFacility,
    CropIndicator,
    WaterQuality,
    MediaMention,
    Mobility,
    Pharmacy,
    Humanitarian,
}

impl SignalCategory {
    /// Parse a wire label. Unknown labels are a per-item rejection, never a default.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "weather" => Some(Self::Weather),
            "food_price" => Some(Self::FoodPrice),
            "disease_report" => Some(Self::DiseaseReport),
            "health_facility" => Some(Self::HealthFacility),
            "crop_indicator" => Some(Self::CropIndicator),
            "water_quality" => Some(Self::WaterQuality),
            "media_mention" => Some(Self::MediaMention),
            "mobility" => Some(Self::Mobility),
            "pharmacy" => Some(Self::Pharmacy),
            "humanitarian" => Some(Self::Humanitarian),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::FoodPrice => "food_price",
            Self::DiseaseReport => "disease_report",
            Self::HealthFacility => "health_facility",
            Self::CropIndicator => "crop_indicator",
            Self::WaterQuality => "water_quality",
            Self::MediaMention => "media_mention",
            Self::Mobility => "mobility",
            Self::Pharmacy => "pharmacy",
            Self::Humanitarian => "humanitarian",
        }
    }
}

/// Geographic region signals are reported against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub is_active: bool,
}

/// Registered upstream data source with a static reliability rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub id: i64,
    pub code: String,
    pub name: String,
    /// Trustworthiness of the source, 0.0-1.0.
    pub reliability_score: f64,
    pub is_active: bool,
}

/// One raw signal submitted to the intake pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalInput {
    pub source_code: String,
    pub region_code: String,
    pub signal_type: String,
    pub indicator_name: String,
    pub value: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub raw_data: Option<Value>,
}

fn default_confidence() -> f64 {
    1.0
}

/// An admitted observation. Immutable once written to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub source_id: i64,
    pub region_id: i64,
    pub category: SignalCategory,
    pub indicator: String,
    pub value: f64,
    pub unit: Option<String>,
    /// Submitter-stated confidence, clamped to 0.0-1.0.
    pub confidence: f64,
    /// Derived trustworthiness, 0.0-1.0.
    pub quality_score: f64,
    pub is_anomaly: bool,
    /// When the measurement was taken. Late and backfilled data is legal.
    pub observed_at: DateTime<Utc>,
    /// When the pipeline admitted the measurement.
    pub reported_at: DateTime<Utc>,
    /// Opaque payload retained for audit, never interpreted.
    pub raw_data: Option<Value>,
}

/// Aggregation bucket granularity. All boundaries are UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    Daily,
    Weekly,
    Monthly,
}

impl PeriodType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Start of the bucket containing `at`: midnight UTC for daily, the
    /// preceding Monday 00:00 for weekly, day 1 of the month for monthly.
    pub fn bucket_start(self, at: DateTime<Utc>) -> DateTime<Utc> {
        let day = at.date_naive();
        let start = match self {
            Self::Daily => day,
            Self::Weekly => {
                day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
            }
            Self::Monthly => {
                NaiveDate::from_ymd_opt(day.year(), day.month(), 1).unwrap_or(day)
            }
        };
        Utc.from_utc_datetime(&start.and_time(NaiveTime::MIN))
    }

    /// End of a bucket, fully determined by the period type and its start.
    pub fn period_end(self, start: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Daily => start + Duration::days(1),
            Self::Weekly => start + Duration::days(7),
            Self::Monthly => {
                let day = start.date_naive();
                let (year, month) = if day.month() == 12 {
                    (day.year() + 1, 1)
                } else {
                    (day.year(), day.month() + 1)
                };
                NaiveDate::from_ymd_opt(year, month, 1)
                    .map(|next| Utc.from_utc_datetime(&next.and_time(NaiveTime::MIN)))
                    .unwrap_or(start + Duration::days(30))
            }
        }
    }
}

/// Summary statistics for one (region, category, indicator, period) bucket.
///
/// Re-running an overlapping window appends new records; history is never
/// rewritten in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub region_id: i64,
    pub category: SignalCategory,
    pub indicator: String,
    pub period_type: PeriodType,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub value_mean: f64,
    pub value_median: f64,
    pub value_min: f64,
    pub value_max: f64,
    /// Population standard deviation; 0 for a single-sample bucket.
    pub value_std: f64,
    pub sample_count: usize,
    pub baseline_value: Option<f64>,
    pub deviation_from_baseline: Option<f64>,
    pub z_score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Diseases tracked by the scoring pipeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DiseaseType {
    Malaria,
    Cholera,
    Measles,
    Dengue,
    Respiratory,
    Typhoid,
    Ebola,
    Covid,
}

impl DiseaseType {
    pub const ALL: [DiseaseType; 8] = [
        Self::Malaria,
        Self::Cholera,
        Self::Measles,
        Self::Dengue,
        Self::Respiratory,
        Self::Typhoid,
        Self::Ebola,
        Self::Covid,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Malaria => "malaria",
            Self::Cholera => "cholera",
            Self::Measles => "measles",
            Self::Dengue => "dengue",
            Self::Respiratory => "respiratory",
            Self::Typhoid => "typhoid",
            Self::Ebola => "ebola",
            Self::Covid => "covid",
        }
    }
}

/// Qualitative classification of a 0-100 risk score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Minimal,
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    /// Band thresholds are inclusive lower bounds: exactly 80.0 is critical.
    pub fn classify(score: f64) -> Self {
        if score >= 80.0 {
            Self::Critical
        } else if score >= 60.0 {
            Self::High
        } else if score >= 40.0 {
            Self::Moderate
        } else if score >= 20.0 {
            Self::Low
        } else {
            Self::Minimal
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Disease-specific risk for a region, valid for 24 hours from calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseRisk {
    pub region_id: i64,
    pub disease: DiseaseType,
    pub calculated_at: DateTime<Utc>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    /// Expected score for the current calendar month.
    pub seasonal_baseline: f64,
    pub deviation_from_seasonal: f64,
    /// High season is a property of the month's baseline, not the observed score.
    pub is_high_season: bool,
    pub confidence: f64,
    pub model_version: String,
}

/// Composite vital risk index for a region. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskIndex {
    pub region_id: i64,
    pub calculated_at: DateTime<Utc>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub hunger_stress_index: f64,
    pub health_system_strain_index: f64,
    pub disease_outbreak_index: f64,
    pub vital_risk_index: f64,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    /// min(1.0, observations-in-window / expected-for-full-coverage).
    pub data_completeness: f64,
    /// The composite weight configuration used for this calculation.
    pub weights: Value,
    /// Breakdown of contributing components for audit.
    pub contributing_factors: Value,
    pub model_version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    DiseaseOutbreak,
    HungerCrisis,
    HealthSystemStrain,
    CompositeRisk,
    AnomalyDetected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Info,
    Warning,
    Urgent,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Active,
    Acknowledged,
    Resolved,
    Expired,
    FalsePositive,
}

/// Alert emitted when a freshly computed score crosses a threshold.
///
/// Created `active`; acknowledge/resolve transitions are operator actions
/// outside this pipeline. Expiry is a read-time concern, never a write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub region_id: i64,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub status: AlertStatus,
    pub title: String,
    pub description: String,
    pub risk_score: f64,
    pub threshold_exceeded: f64,
    pub disease: Option<DiseaseType>,
    pub triggered_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub contributing_factors: Option<Value>,
    pub confidence: f64,
}

impl Alert {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| now > expiry)
    }
}
