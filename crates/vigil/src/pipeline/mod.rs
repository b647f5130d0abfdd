//! The signal-to-risk scoring pipeline.
//!
//! Data flows: raw signal -> intake -> store; store -> period aggregator;
//! store (30-day window) -> weighted indices -> composite risk -> alerts.

pub mod alerts;
pub mod domain;
pub mod risk;
pub mod signals;

pub use domain::{
    Aggregation, Alert, AlertSeverity, AlertStatus, AlertType, DataSource, DiseaseRisk,
    DiseaseType, Observation, PeriodType, Region, RiskIndex, RiskLevel, SignalCategory,
    SignalInput,
};
pub use risk::calculator::{RiskCalculator, ScoringConfig};
pub use risk::index::{IndexScore, SignalWindow, WeightTerm};
pub use signals::aggregation::PeriodAggregator;
pub use signals::intake::{IntakeRejection, IntakeSummary, SignalIntake};
