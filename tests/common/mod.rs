//! In-memory trait implementations for integration tests.
//!
//! These back the real services with hash maps instead of PostgreSQL so
//! full resolution flows can run without a database, including the
//! version-checked write semantics of the real repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use secure_link::domain::entities::{
    LinkStatus, NewAuditRecord, NewSecureLink, SecureLink,
};
use secure_link::domain::repositories::{AuditRepository, LinkRepository};
use secure_link::error::AppError;
use secure_link::infrastructure::storage::FileStore;

#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<HashMap<String, SecureLink>>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a link directly, bypassing the creation service.
    pub fn seed(&self, link: SecureLink) {
        self.links
            .lock()
            .unwrap()
            .insert(link.short_code.clone(), link);
    }

    pub fn get(&self, short_code: &str) -> Option<SecureLink> {
        self.links.lock().unwrap().get(short_code).cloned()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, new_link: NewSecureLink) -> Result<SecureLink, AppError> {
        let mut links = self.links.lock().unwrap();
        if links.contains_key(&new_link.short_code) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                serde_json::json!({ "short_code": new_link.short_code }),
            ));
        }

        let link = SecureLink {
            id: Uuid::new_v4(),
            short_code: new_link.short_code.clone(),
            target: new_link.target,
            expires_at: new_link.expires_at,
            max_views: new_link.max_views,
            view_count: 0,
            status: LinkStatus::Active,
            password_hash: new_link.password_hash,
            created_at: Utc::now(),
            version: 0,
        };
        links.insert(new_link.short_code, link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<SecureLink>, AppError> {
        Ok(self.links.lock().unwrap().get(short_code).cloned())
    }

    async fn exists_by_code(&self, short_code: &str) -> Result<bool, AppError> {
        Ok(self.links.lock().unwrap().contains_key(short_code))
    }

    async fn update(&self, link: &SecureLink) -> Result<bool, AppError> {
        let mut links = self.links.lock().unwrap();
        let Some(stored) = links.get_mut(&link.short_code) else {
            return Ok(false);
        };

        if stored.version != link.version {
            return Ok(false);
        }

        let mut updated = link.clone();
        updated.version += 1;
        *stored = updated;
        Ok(true)
    }

    async fn expire_due(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let mut links = self.links.lock().unwrap();
        let mut expired = 0;

        for link in links.values_mut() {
            if link.is_active() && (link.is_time_expired(now) || link.has_reached_view_limit()) {
                link.expire();
                link.version += 1;
                expired += 1;
            }
        }

        Ok(expired)
    }
}

#[derive(Default)]
pub struct InMemoryAuditRepository {
    records: Mutex<Vec<NewAuditRecord>>,
}

impl InMemoryAuditRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<NewAuditRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn append(&self, record: NewAuditRecord) -> Result<(), AppError> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryFileStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops a stored payload, simulating external deletion.
    pub fn remove(&self, path: &str) {
        self.files.lock().unwrap().remove(path);
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn store(&self, original_filename: &str, content: &[u8]) -> Result<String, AppError> {
        let path = format!("mem://{}/{}", Uuid::new_v4(), original_filename);
        self.files
            .lock()
            .unwrap()
            .insert(path.clone(), content.to_vec());
        Ok(path)
    }

    async fn load(&self, path: &str) -> Result<Option<Vec<u8>>, AppError> {
        Ok(self.files.lock().unwrap().get(path).cloned())
    }

    fn is_writable(&self) -> bool {
        true
    }
}
