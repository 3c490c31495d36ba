//! Session Store
//!
//! In-process `tower-sessions` store. Records expire at the date the
//! session layer stamps on every save.
//!
//! Only [`SessionStore::create`] inserts. [`SessionStore::save`] updates a
//! record that is still present and does nothing otherwise, so a request
//! that loaded a session before a concurrent logout cannot write the
//! credential back.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, ExpiredDeletion, SessionStore};
use tracing::{debug, warn};

/// Sessions do not survive a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<DashMap<Id, Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub(crate) fn expiry_of(&self, id: &Id) -> Option<OffsetDateTime> {
        self.records.get(id).map(|record| record.expiry_date)
    }

    #[cfg(test)]
    pub(crate) fn set_expiry(&self, id: &Id, expiry_date: OffsetDateTime) {
        if let Some(mut record) = self.records.get_mut(id) {
            record.expiry_date = expiry_date;
        }
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        // Identifiers are always minted here, so a cleared session never
        // comes back under its old id.
        loop {
            record.id = Id::default();
            if let Entry::Vacant(slot) = self.records.entry(record.id) {
                slot.insert(record.clone());
                return Ok(());
            }
        }
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        match self.records.get_mut(&record.id) {
            Some(mut stored) => *stored = record.clone(),
            None => debug!("Session was removed while in use, not saving it"),
        }
        Ok(())
    }

    async fn load(&self, id: &Id) -> session_store::Result<Option<Record>> {
        let now = OffsetDateTime::now_utc();
        if let Some(record) = self.records.get(id) {
            if record.expiry_date > now {
                return Ok(Some(record.clone()));
            }
        }
        self.records
            .remove_if(id, |_, record| record.expiry_date <= now);
        Ok(None)
    }

    async fn delete(&self, id: &Id) -> session_store::Result<()> {
        self.records.remove(id);
        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for MemoryStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        let now = OffsetDateTime::now_utc();
        let before = self.records.len();
        self.records.retain(|_, record| record.expiry_date > now);

        let purged = before.saturating_sub(self.records.len());
        if purged > 0 {
            debug!("Purged {} expired sessions", purged);
        }
        Ok(())
    }
}

/// Periodically drops expired sessions until the runtime shuts down.
pub fn spawn_purge_task<S>(store: S, every: Duration) -> JoinHandle<()>
where
    S: ExpiredDeletion + Clone,
{
    tokio::spawn(async move {
        let mut ticker = interval(every);
        loop {
            ticker.tick().await;
            if let Err(e) = store.delete_expired().await {
                warn!("Session purge failed: {}", e);
            }
        }
    })
}
