//! Mock concert store for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::concert::{stored_precision, Concert, ConcertStore, NewConcert, StoreError};

/// In-memory implementation of the ConcertStore trait.
///
/// Provides controllable behavior for testing:
/// - Slow writes, to check callers wait for the commit
/// - Failing writes
/// - A save counter
#[derive(Debug, Default)]
pub struct MockConcertStore {
    concerts: Arc<RwLock<HashMap<String, Concert>>>,
    save_delay: Arc<RwLock<Duration>>,
    save_error: Arc<RwLock<Option<String>>>,
    saves: Arc<RwLock<usize>>,
}

impl MockConcertStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every save by `delay` before it lands.
    pub async fn set_save_delay(&self, delay: Duration) {
        *self.save_delay.write().await = delay;
    }

    /// Make every save fail with the given message.
    pub async fn set_save_error(&self, message: impl Into<String>) {
        *self.save_error.write().await = Some(message.into());
    }

    /// Number of successful saves.
    pub async fn save_count(&self) -> usize {
        *self.saves.read().await
    }

    /// The concert exactly as stored.
    pub async fn stored(&self, id: &str) -> Option<Concert> {
        self.concerts.read().await.get(id).cloned()
    }
}

#[async_trait]
impl ConcertStore for MockConcertStore {
    async fn insert(&self, concert: NewConcert) -> Result<Concert, StoreError> {
        let id = concert
            .id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let mut concerts = self.concerts.write().await;
        if concerts.contains_key(&id) {
            return Err(StoreError::Conflict(id));
        }

        let stored = Concert {
            id: id.clone(),
            name: concert.name,
            band: concert.band,
            concert_date: stored_precision(concert.concert_date),
            available_tickets: None,
            is_deleted: false,
        };
        concerts.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_all(&self) -> Result<Vec<Concert>, StoreError> {
        let mut all: Vec<Concert> = self.concerts.read().await.values().cloned().collect();
        all.sort_by(|a, b| {
            a.concert_date
                .cmp(&b.concert_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(all)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Concert>, StoreError> {
        Ok(self.concerts.read().await.get(id).cloned())
    }

    async fn find_by_name(&self, fragment: &str) -> Result<Vec<Concert>, StoreError> {
        let needle = fragment.to_ascii_lowercase();
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(|c| c.name.to_ascii_lowercase().contains(&needle))
            .collect())
    }

    async fn save(&self, concert: &Concert) -> Result<Concert, StoreError> {
        let delay = *self.save_delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.save_error.read().await.clone() {
            return Err(StoreError::Database(message));
        }

        let mut stored = concert.clone().undecorated();
        stored.concert_date = stored_precision(stored.concert_date);
        self.concerts
            .write()
            .await
            .insert(stored.id.clone(), stored.clone());
        *self.saves.write().await += 1;
        Ok(stored)
    }
}
