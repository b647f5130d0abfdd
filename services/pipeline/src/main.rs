mod telemetry;

use std::sync::Arc;

use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;

use vigil::config::AppConfig;
use vigil::error::PipelineError;
use vigil::pipeline::{
    DataSource, PeriodAggregator, PeriodType, Region, RiskCalculator, SignalInput,
    SignalIntake,
};
use vigil::store::{InMemoryStore, Store};

use telemetry::TelemetryError;

#[derive(Parser, Debug)]
#[command(
    name = "vigil-pipeline",
    about = "Run the Vigil early-warning scoring pipeline from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seed a demo dataset and run one full calculation cycle (default)
    Demo,
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
}

impl From<vigil::store::StoreError> for AppError {
    fn from(value: vigil::store::StoreError) -> Self {
        Self::Pipeline(PipelineError::Store(value))
    }
}

impl From<vigil::config::ConfigError> for AppError {
    fn from(value: vigil::config::ConfigError) -> Self {
        Self::Pipeline(PipelineError::Config(value))
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.log_level)?;

    match cli.command.unwrap_or(Command::Demo) {
        Command::Demo => run_demo(&config),
    }
}

/// One full cycle against a seeded in-memory store: intake, aggregation,
/// then risk scoring and alerting for every active region.
fn run_demo(config: &AppConfig) -> Result<(), AppError> {
    let store = Arc::new(InMemoryStore::new());
    seed_reference_data(&store)?;

    let now = Utc::now();
    let intake = SignalIntake::new(store.clone());
    let summary = intake.process_batch(&demo_signals(), now)?;
    info!(
        processed = summary.processed,
        rejected = summary.rejected,
        anomalies = summary.anomalies,
        "intake complete"
    );
    println!("{}", serde_json::to_string_pretty(&summary).unwrap_or_default());

    let aggregator = PeriodAggregator::new(store.clone());
    let mut aggregations_created = 0;
    for region in store.active_regions(None)? {
        aggregations_created += aggregator.compute(
            region.id,
            PeriodType::Daily,
            config.aggregation_lookback_days,
            now,
        )?;
    }
    println!(
        "{}",
        json!({ "aggregations_created": aggregations_created })
    );

    let calculator = RiskCalculator::new(store.clone(), config.scoring());
    let indices = calculator.calculate_all_risks(None, now)?;
    for (region_id, index) in &indices {
        println!(
            "{}",
            json!({
                "region_id": region_id,
                "vital_risk_index": index.vital_risk_index,
                "risk_level": index.risk_level.label(),
                "hunger_stress_index": index.hunger_stress_index,
                "health_system_strain_index": index.health_system_strain_index,
                "disease_outbreak_index": index.disease_outbreak_index,
                "confidence": index.confidence,
                "data_completeness": index.data_completeness,
            })
        );
    }

    let alerts = store.alerts()?;
    info!(count = alerts.len(), "cycle complete");
    for alert in &alerts {
        println!(
            "{}",
            json!({
                "region_id": alert.region_id,
                "alert_type": alert.alert_type,
                "severity": alert.severity,
                "risk_score": alert.risk_score,
                "threshold_exceeded": alert.threshold_exceeded,
            })
        );
    }

    Ok(())
}

fn seed_reference_data(store: &InMemoryStore) -> Result<(), AppError> {
    store.register_region(Region {
        id: 1,
        code: "KE-MAR".to_string(),
        name: "Marsabit".to_string(),
        is_active: true,
    })?;
    store.register_region(Region {
        id: 2,
        code: "SS-JON".to_string(),
        name: "Jonglei".to_string(),
        is_active: true,
    })?;
    store.register_source(DataSource {
        id: 10,
        code: "who_surveillance".to_string(),
        name: "WHO surveillance feed".to_string(),
        reliability_score: 0.95,
        is_active: true,
    })?;
    store.register_source(DataSource {
        id: 11,
        code: "field_report".to_string(),
        name: "Partner field reports".to_string(),
        reliability_score: 0.7,
        is_active: true,
    })?;
    Ok(())
}

fn demo_signals() -> Vec<SignalInput> {
    let now = Utc::now();
    let mk = |source: &str, region: &str, category: &str, indicator: &str, value: f64| {
        SignalInput {
            source_code: source.to_string(),
            region_code: region.to_string(),
            signal_type: category.to_string(),
            indicator_name: indicator.to_string(),
            value,
            unit: None,
            observed_at: Some(now - Duration::hours(6)),
            confidence: 0.9,
            raw_data: None,
        }
    };

    vec![
        mk("who_surveillance", "KE-MAR", "weather", "rainfall_mm", 310.0),
        mk("who_surveillance", "KE-MAR", "weather", "temperature_avg", 33.0),
        mk("who_surveillance", "KE-MAR", "weather", "drought_index", 74.0),
        mk("field_report", "KE-MAR", "food_price", "staple_price_index", 185.0),
        mk("field_report", "KE-MAR", "crop_indicator", "harvest_index", 22.0),
        mk("who_surveillance", "KE-MAR", "disease_report", "malaria_cases", 620.0),
        mk("field_report", "KE-MAR", "health_facility", "bed_occupancy_pct", 88.0),
        mk("field_report", "KE-MAR", "health_facility", "staff_availability", 35.0),
        mk("field_report", "KE-MAR", "pharmacy", "essential_medicine_stock", 28.0),
        mk("who_surveillance", "SS-JON", "disease_report", "cholera_cases", 140.0),
        mk("who_surveillance", "SS-JON", "water_quality", "contamination_index", 65.0),
        mk("who_surveillance", "SS-JON", "weather", "flooding_risk", 80.0),
        mk("field_report", "SS-JON", "humanitarian", "food_insecurity_phase", 70.0),
        // Rejected on purpose so the summary shows the error path.
        mk("unlisted_feed", "KE-MAR", "weather", "rainfall_mm", 12.0),
    ]
}
