use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use crate::{
    domain::measure::{Measure, MeasureId},
    errors::AppError,
};

#[async_trait]
pub trait MeasureService: Send + Sync {
    /// Alive measures, optionally restricted to an exact `type` match.
    async fn list_alive(&self, measure_type: Option<&str>) -> Result<Vec<Measure>, AppError>;

    async fn get_by_id(&self, id: MeasureId) -> Result<Measure, AppError>;

    async fn delete_by_id(&self, id: MeasureId) -> Result<(), AppError>;

    async fn delete_all(&self) -> Result<(), AppError>;

    async fn update(&self, measure: Measure) -> Result<(), AppError>;

    async fn list_alive_by_owner(&self, owner: &str) -> Result<Vec<Measure>, AppError>;

    async fn create(&self, measure: Measure) -> Result<Measure, AppError>;
}

#[derive(Debug)]
struct Store {
    next_id: MeasureId,
    measures: BTreeMap<MeasureId, Measure>,
}

/// Process-local measure store. Deletes are soft: records stay but stop being alive.
#[derive(Debug)]
pub struct InMemoryMeasureService {
    store: RwLock<Store>,
}

impl Default for InMemoryMeasureService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMeasureService {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store {
                next_id: 1,
                measures: BTreeMap::new(),
            }),
        }
    }
}

impl Store {
    fn alive_mut(&mut self, id: MeasureId) -> Result<&mut Measure, AppError> {
        self.measures
            .get_mut(&id)
            .filter(|measure| measure.is_alive())
            .ok_or_else(|| AppError::measure_not_found(id))
    }

    fn alive(&self) -> impl Iterator<Item = &Measure> {
        self.measures.values().filter(|measure| measure.is_alive())
    }

    /// Alive names are unique; `owner` is the measure allowed to keep the name.
    fn ensure_name_free(&self, name: &str, owner: Option<MeasureId>) -> Result<(), AppError> {
        let taken = self
            .alive()
            .any(|existing| existing.name == name && existing.id != owner);
        if taken {
            return Err(AppError::conflict(
                "measure_name_exists",
                format!("a measure named '{name}' already exists"),
            ));
        }
        Ok(())
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[async_trait]
impl MeasureService for InMemoryMeasureService {
    async fn list_alive(&self, measure_type: Option<&str>) -> Result<Vec<Measure>, AppError> {
        let store = self.store.read().await;
        Ok(store
            .alive()
            .filter(|measure| measure_type.map_or(true, |t| measure.measure_type == t))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: MeasureId) -> Result<Measure, AppError> {
        let store = self.store.read().await;
        store
            .measures
            .get(&id)
            .filter(|measure| measure.is_alive())
            .cloned()
            .ok_or_else(|| AppError::measure_not_found(id))
    }

    async fn delete_by_id(&self, id: MeasureId) -> Result<(), AppError> {
        let mut store = self.store.write().await;
        let measure = store.alive_mut(id)?;
        measure.deleted = true;
        measure.modified_date = Some(now_millis());
        info!(measure_id = id, "measure deleted");
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), AppError> {
        let mut store = self.store.write().await;
        let now = now_millis();
        let mut count = 0usize;
        for measure in store.measures.values_mut().filter(|m| m.is_alive()) {
            measure.deleted = true;
            measure.modified_date = Some(now);
            count += 1;
        }
        info!(count, "all measures deleted");
        Ok(())
    }

    async fn update(&self, mut measure: Measure) -> Result<(), AppError> {
        let Some(id) = measure.id else {
            return Err(AppError::bad_request(
                "invalid_measure",
                "measure id is required for update",
            ));
        };
        measure.validate()?;
        measure.name = measure.name.trim().to_string();

        let mut store = self.store.write().await;
        let existing = store.alive_mut(id)?;
        if existing.measure_type != measure.measure_type {
            return Err(AppError::bad_request(
                "measure_type_mismatch",
                format!(
                    "measure type cannot change from '{}' to '{}'",
                    existing.measure_type, measure.measure_type
                ),
            ));
        }
        let created_date = existing.created_date;
        store.ensure_name_free(&measure.name, Some(id))?;

        let existing = store.alive_mut(id)?;
        *existing = Measure {
            id: Some(id),
            deleted: false,
            created_date,
            modified_date: Some(now_millis()),
            ..measure
        };
        info!(measure_id = id, "measure updated");
        Ok(())
    }

    async fn list_alive_by_owner(&self, owner: &str) -> Result<Vec<Measure>, AppError> {
        let store = self.store.read().await;
        Ok(store
            .alive()
            .filter(|measure| measure.owner == owner)
            .cloned()
            .collect())
    }

    async fn create(&self, mut measure: Measure) -> Result<Measure, AppError> {
        measure.validate()?;
        measure.name = measure.name.trim().to_string();

        let mut store = self.store.write().await;
        store.ensure_name_free(&measure.name, None)?;

        let id = store.next_id;
        store.next_id += 1;
        let created = Measure {
            id: Some(id),
            deleted: false,
            created_date: Some(now_millis()),
            modified_date: None,
            ..measure
        };
        store.measures.insert(id, created.clone());
        info!(measure_id = id, name = %created.name, "measure created");
        Ok(created)
    }
}
