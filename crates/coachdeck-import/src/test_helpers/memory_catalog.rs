//! In-memory exercise catalog

use async_trait::async_trait;
use coachdeck_core::models::NewExercise;
use coachdeck_core::AppError;
use coachdeck_db::ExerciseCatalog;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryCatalog {
    records: Mutex<Vec<(Uuid, NewExercise)>>,
    seeded: Mutex<Vec<(Uuid, String)>>,
    read_error: Mutex<Option<String>>,
    failing_names: Mutex<HashSet<String>>,
    list_calls: AtomicUsize,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-existing catalog entries for `owner_id`.
    pub fn seed<I, S>(&self, owner_id: Uuid, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seeded = self.seeded.lock().unwrap();
        seeded.extend(names.into_iter().map(|n| (owner_id, n.into())));
    }

    /// Make every `list_names` call fail with `message`.
    pub fn fail_reads(&self, message: &str) {
        *self.read_error.lock().unwrap() = Some(message.to_string());
    }

    /// Make `insert` fail for records with this exact name.
    pub fn fail_insert_for(&self, name: &str) {
        self.failing_names.lock().unwrap().insert(name.to_string());
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Records appended through `insert`, in insertion order.
    pub fn inserted(&self) -> Vec<NewExercise> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|(_, record)| record.clone())
            .collect()
    }
}

#[async_trait]
impl ExerciseCatalog for MemoryCatalog {
    async fn list_names(&self, owner_id: Uuid) -> Result<HashSet<String>, AppError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.read_error.lock().unwrap().clone() {
            return Err(AppError::Catalog(message));
        }

        let seeded = self.seeded.lock().unwrap();
        let records = self.records.lock().unwrap();
        Ok(seeded
            .iter()
            .filter(|(owner, _)| *owner == owner_id)
            .map(|(_, name)| name.clone())
            .chain(
                records
                    .iter()
                    .filter(|(_, r)| r.owner_id == owner_id)
                    .map(|(_, r)| r.name.clone()),
            )
            .collect())
    }

    async fn insert(&self, exercise: NewExercise) -> Result<Uuid, AppError> {
        if self.failing_names.lock().unwrap().contains(&exercise.name) {
            return Err(AppError::Catalog(format!(
                "insert rejected for {}",
                exercise.name
            )));
        }

        let id = Uuid::new_v4();
        self.records.lock().unwrap().push((id, exercise));
        Ok(id)
    }
}
