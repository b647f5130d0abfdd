//! Mutex-guarded in-memory store used by the demo binary and tests.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::{Store, StoreError};
use crate::pipeline::domain::{
    Aggregation, Alert, DataSource, DiseaseRisk, Observation, Region, RiskIndex,
    SignalCategory,
};

#[derive(Debug, Default)]
struct Shelves {
    regions: Vec<Region>,
    sources: Vec<DataSource>,
    observations: Vec<Observation>,
    aggregations: Vec<Aggregation>,
    disease_risks: Vec<DiseaseRisk>,
    risk_indices: Vec<RiskIndex>,
    alerts: Vec<Alert>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    shelves: Mutex<Shelves>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Shelves>, StoreError> {
        self.shelves
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))
    }

    pub fn register_region(&self, region: Region) -> Result<(), StoreError> {
        self.lock()?.regions.push(region);
        Ok(())
    }

    pub fn register_source(&self, source: DataSource) -> Result<(), StoreError> {
        self.lock()?.sources.push(source);
        Ok(())
    }

    pub fn observations(&self) -> Result<Vec<Observation>, StoreError> {
        Ok(self.lock()?.observations.clone())
    }

    pub fn aggregations(&self) -> Result<Vec<Aggregation>, StoreError> {
        Ok(self.lock()?.aggregations.clone())
    }

    pub fn disease_risks(&self) -> Result<Vec<DiseaseRisk>, StoreError> {
        Ok(self.lock()?.disease_risks.clone())
    }

    pub fn risk_indices(&self) -> Result<Vec<RiskIndex>, StoreError> {
        Ok(self.lock()?.risk_indices.clone())
    }

    pub fn alerts(&self) -> Result<Vec<Alert>, StoreError> {
        Ok(self.lock()?.alerts.clone())
    }
}

impl Store for InMemoryStore {
    fn active_region(&self, code: &str) -> Result<Option<Region>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves
            .regions
            .iter()
            .find(|region| region.code == code && region.is_active)
            .cloned())
    }

    fn active_source(&self, code: &str) -> Result<Option<DataSource>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves
            .sources
            .iter()
            .find(|source| source.code == code && source.is_active)
            .cloned())
    }

    fn active_regions(&self, ids: Option<&[i64]>) -> Result<Vec<Region>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves
            .regions
            .iter()
            .filter(|region| region.is_active)
            .filter(|region| ids.map_or(true, |wanted| wanted.contains(&region.id)))
            .cloned()
            .collect())
    }

    fn observations_for_region(
        &self,
        region_id: i64,
        category: Option<SignalCategory>,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Observation>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves
            .observations
            .iter()
            .filter(|obs| obs.region_id == region_id)
            .filter(|obs| category.map_or(true, |wanted| obs.category == wanted))
            .filter(|obs| obs.observed_at >= since && obs.observed_at <= until)
            .cloned()
            .collect())
    }

    fn observations_in_window(
        &self,
        region_id: i64,
        category: SignalCategory,
        indicator: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Observation>, StoreError> {
        let shelves = self.lock()?;
        Ok(shelves
            .observations
            .iter()
            .filter(|obs| {
                obs.region_id == region_id
                    && obs.category == category
                    && obs.indicator == indicator
                    && obs.observed_at >= start
                    && obs.observed_at <= end
            })
            .cloned()
            .collect())
    }

    fn append_observation(&self, observation: Observation) -> Result<(), StoreError> {
        self.lock()?.observations.push(observation);
        Ok(())
    }

    fn append_aggregations(&self, aggregations: Vec<Aggregation>) -> Result<(), StoreError> {
        self.lock()?.aggregations.extend(aggregations);
        Ok(())
    }

    fn append_region_scores(
        &self,
        risks: Vec<DiseaseRisk>,
        index: RiskIndex,
    ) -> Result<(), StoreError> {
        let mut shelves = self.lock()?;
        shelves.disease_risks.extend(risks);
        shelves.risk_indices.push(index);
        Ok(())
    }

    fn append_alerts(&self, alerts: Vec<Alert>) -> Result<(), StoreError> {
        self.lock()?.alerts.extend(alerts);
        Ok(())
    }
}
