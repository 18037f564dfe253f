use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::{core::errors::RentalError, domain::Rental};

use super::{DocumentStore, ImageStore, LocalCache, Result};

fn guard<T>(lock: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    lock.lock()
        .map_err(|_| RentalError::LocalPersistence("in-memory store poisoned".into()))
}

/// Document store kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    records: Mutex<Vec<Rental>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Rental>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn len(&self) -> Result<usize> {
        Ok(guard(&self.records)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn upsert(&self, id: &str, rental: &Rental) -> Result<()> {
        let mut records = guard(&self.records)?;
        match records.iter_mut().find(|existing| existing.id == id) {
            Some(existing) => *existing = rental.clone(),
            None => records.push(rental.clone()),
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Rental>> {
        Ok(guard(&self.records)?.clone())
    }
}

/// Image store that keeps uploaded objects in memory and hands out
/// `<base>/<key>` URLs.
#[derive(Debug)]
pub struct MemoryImageStore {
    public_base: String,
    objects: Mutex<Vec<(String, String, Vec<u8>)>>,
}

impl MemoryImageStore {
    pub fn new(public_base: impl Into<String>) -> Self {
        Self {
            public_base: public_base.into(),
            objects: Mutex::new(Vec::new()),
        }
    }

    /// Keys stored so far, in upload order.
    pub fn keys(&self) -> Result<Vec<String>> {
        Ok(guard(&self.objects)?
            .iter()
            .map(|(key, _, _)| key.clone())
            .collect())
    }

    pub fn object(&self, key: &str) -> Result<Option<(String, Vec<u8>)>> {
        Ok(guard(&self.objects)?
            .iter()
            .find(|(stored, _, _)| stored == key)
            .map(|(_, content_type, bytes)| (content_type.clone(), bytes.clone())))
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn put(&self, bytes: Vec<u8>, key: &str, content_type: &str) -> Result<String> {
        let mut objects = guard(&self.objects)?;
        objects.retain(|(stored, _, _)| stored != key);
        objects.push((key.to_string(), content_type.to_string(), bytes));
        Ok(format!("{}/{}", self.public_base.trim_end_matches('/'), key))
    }
}

/// Local cache without a backing file.
#[derive(Debug, Default)]
pub struct MemoryCache {
    rentals: Mutex<Vec<Rental>>,
    last: Mutex<Option<String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalCache for MemoryCache {
    fn load_all(&self) -> Result<Vec<Rental>> {
        Ok(guard(&self.rentals)?.clone())
    }

    fn store_all(&self, rentals: &[Rental]) -> Result<()> {
        *guard(&self.rentals)? = rentals.to_vec();
        Ok(())
    }

    fn record_last_rental(&self, id: &str) -> Result<()> {
        *guard(&self.last)? = Some(id.to_string());
        Ok(())
    }

    fn last_rental(&self) -> Result<Option<String>> {
        Ok(guard(&self.last)?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn document_store_upserts_by_id() {
        let store = MemoryDocumentStore::new();
        let mut rental = Rental::default();
        rental.id = "r-1".into();
        store.upsert("r-1", &rental).await.expect("insert");
        rental.notes = "updated".into();
        store.upsert("r-1", &rental).await.expect("replace");

        let all = store.list_all().await.expect("list");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].notes, "updated");
        assert_eq!(store.len().expect("len"), 1);
    }

    #[tokio::test]
    async fn image_store_returns_public_url() {
        let store = MemoryImageStore::new("https://cdn.example.test/");
        let url = store
            .put(vec![1, 2, 3], "rentals/r-1/vehicle.png", "image/png")
            .await
            .expect("put");
        assert_eq!(url, "https://cdn.example.test/rentals/r-1/vehicle.png");
        assert_eq!(
            store.object("rentals/r-1/vehicle.png").expect("lookup"),
            Some(("image/png".to_string(), vec![1, 2, 3]))
        );
    }

    #[test]
    fn cache_save_uses_default_read_modify_write() {
        let cache = MemoryCache::new();
        let mut rental = Rental::default();
        rental.id = "local_1".into();
        cache.save(&rental).expect("save");
        cache.save(&rental).expect("save again");
        assert_eq!(cache.load_all().expect("load").len(), 1);
        assert_eq!(cache.last_rental().expect("last").as_deref(), Some("local_1"));
    }

    #[test]
    fn poisoned_store_reports_an_error() {
        let store = std::sync::Arc::new(MemoryImageStore::new("https://cdn.example.test"));
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _held = poisoner.objects.lock().expect("lock");
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(store.keys(), Err(RentalError::LocalPersistence(_))));
        assert!(matches!(
            store.object("rentals/r-1/vehicle.png"),
            Err(RentalError::LocalPersistence(_))
        ));
    }
}
