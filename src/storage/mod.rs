pub mod http;
pub mod json_backend;
pub mod memory;

use async_trait::async_trait;

use crate::{core::errors::RentalError, domain::Rental};

pub type Result<T> = std::result::Result<T, RentalError>;

/// Remote document store holding one record per rental id.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Creates or replaces the record stored under `id`.
    async fn upsert(&self, id: &str, rental: &Rental) -> Result<()>;

    async fn list_all(&self) -> Result<Vec<Rental>>;
}

/// Remote blob store for agreement images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Stores `bytes` under `key` and returns the public URL of the object.
    async fn put(&self, bytes: Vec<u8>, key: &str, content_type: &str) -> Result<String>;
}

/// Durable on-device copy of every rental, read and written as a whole.
pub trait LocalCache: Send + Sync {
    fn load_all(&self) -> Result<Vec<Rental>>;
    fn store_all(&self, rentals: &[Rental]) -> Result<()>;
    fn record_last_rental(&self, id: &str) -> Result<()>;
    fn last_rental(&self) -> Result<Option<String>>;

    /// Replaces the record with a matching id, or appends it.
    fn upsert(&self, rental: &Rental) -> Result<()> {
        let mut rentals = self.load_all()?;
        match rentals.iter_mut().find(|existing| existing.id == rental.id) {
            Some(existing) => *existing = rental.clone(),
            None => rentals.push(rental.clone()),
        }
        self.store_all(&rentals)
    }

    /// Upserts `rental` and records it as the last saved one.
    fn save(&self, rental: &Rental) -> Result<()> {
        self.upsert(rental)?;
        self.record_last_rental(&rental.id)
    }

    fn find(&self, id: &str) -> Result<Option<Rental>> {
        Ok(self.load_all()?.into_iter().find(|rental| rental.id == id))
    }
}

pub use http::{HttpDocumentStore, HttpImageStore};
pub use json_backend::{JsonRentalCache, CACHE_SCHEMA_VERSION};
pub use memory::{MemoryCache, MemoryDocumentStore, MemoryImageStore};
