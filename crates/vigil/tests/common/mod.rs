use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use vigil::pipeline::{
    Aggregation, Alert, DataSource, DiseaseRisk, Observation, Region, RiskIndex,
    SignalCategory, SignalInput,
};
use vigil::store::{InMemoryStore, Store, StoreError};

pub const REGION_ID: i64 = 1;
pub const REGION_CODE: &str = "KE-MAR";
pub const SOURCE_CODE: &str = "who_surveillance";

/// A fixed cycle timestamp so every derived value is reproducible.
pub fn cycle_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Store seeded with one active region and one highly reliable source.
pub fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store
        .register_region(Region {
            id: REGION_ID,
            code: REGION_CODE.to_string(),
            name: "Marsabit".to_string(),
            is_active: true,
        })
        .expect("region registers");
    store
        .register_region(Region {
            id: 2,
            code: "SS-JON".to_string(),
            name: "Jonglei".to_string(),
            is_active: true,
        })
        .expect("region registers");
    store
        .register_region(Region {
            id: 3,
            code: "YE-HOD".to_string(),
            name: "Al Hudaydah".to_string(),
            is_active: false,
        })
        .expect("region registers");
    store
        .register_source(DataSource {
            id: 10,
            code: SOURCE_CODE.to_string(),
            name: "WHO surveillance feed".to_string(),
            reliability_score: 1.0,
            is_active: true,
        })
        .expect("source registers");
    store
        .register_source(DataSource {
            id: 11,
            code: "field_report".to_string(),
            name: "Partner field reports".to_string(),
            reliability_score: 0.7,
            is_active: true,
        })
        .expect("source registers");
    store
}

/// Store that answers reads from the wrapped store but refuses every
/// derived-record write, for exercising failure paths.
pub struct RejectingStore {
    pub inner: Arc<InMemoryStore>,
}

impl RejectingStore {
    fn refuse<T>(&self) -> Result<T, StoreError> {
        Err(StoreError::Unavailable("derived writes refused".to_string()))
    }
}

impl Store for RejectingStore {
    fn active_region(&self, code: &str) -> Result<Option<Region>, StoreError> {
        self.inner.active_region(code)
    }

    fn active_source(&self, code: &str) -> Result<Option<DataSource>, StoreError> {
        self.inner.active_source(code)
    }

    fn active_regions(&self, ids: Option<&[i64]>) -> Result<Vec<Region>, StoreError> {
        self.inner.active_regions(ids)
    }

    fn observations_for_region(
        &self,
        region_id: i64,
        category: Option<SignalCategory>,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Observation>, StoreError> {
        self.inner
            .observations_for_region(region_id, category, since, until)
    }

    fn observations_in_window(
        &self,
        region_id: i64,
        category: SignalCategory,
        indicator: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Observation>, StoreError> {
        self.inner
            .observations_in_window(region_id, category, indicator, start, end)
    }

    fn append_observation(&self, observation: Observation) -> Result<(), StoreError> {
        self.inner.append_observation(observation)
    }

    fn append_aggregations(&self, _aggregations: Vec<Aggregation>) -> Result<(), StoreError> {
        self.refuse()
    }

    fn append_region_scores(
        &self,
        _risks: Vec<DiseaseRisk>,
        _index: RiskIndex,
    ) -> Result<(), StoreError> {
        self.refuse()
    }

    fn append_alerts(&self, _alerts: Vec<Alert>) -> Result<(), StoreError> {
        self.refuse()
    }
}

/// Signal builder with the defaults most scenarios want.
pub fn signal(signal_type: &str, indicator: &str, value: f64) -> SignalInput {
    SignalInput {
        source_code: SOURCE_CODE.to_string(),
        region_code: REGION_CODE.to_string(),
        signal_type: signal_type.to_string(),
        indicator_name: indicator.to_string(),
        value,
        unit: None,
        observed_at: Some(cycle_time()),
        confidence: 1.0,
        raw_data: None,
    }
}
