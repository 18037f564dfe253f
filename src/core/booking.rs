//! Entry point tying the wizard to media upload and persistence.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Local, Utc};

use crate::{
    config::Config,
    core::{
        compression::{compress_all, ImageCompressor, JpegCompressor},
        errors::{RentalError, Result},
        media::MediaUploader,
        reconciler::{PersistenceReconciler, SaveReport},
        wizard::BookingWizard,
    },
    domain::{new_local_rental_id, new_rental_id, Rental},
    storage::{DocumentStore, HttpDocumentStore, HttpImageStore, ImageStore, JsonRentalCache, LocalCache},
};

pub struct BookingService {
    remote: Option<Arc<dyn DocumentStore>>,
    local: Arc<dyn LocalCache>,
    compressor: Arc<dyn ImageCompressor>,
    uploader: MediaUploader,
    reconciler: PersistenceReconciler,
    local_prefix: String,
    timeout: Duration,
}

impl BookingService {
    pub fn new(
        remote: Option<Arc<dyn DocumentStore>>,
        images: Option<Arc<dyn ImageStore>>,
        local: Arc<dyn LocalCache>,
        local_prefix: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let local_prefix = local_prefix.into();
        let reconciler =
            PersistenceReconciler::new(remote.clone(), local.clone(), local_prefix.clone(), timeout);
        Self {
            remote,
            local,
            compressor: Arc::new(JpegCompressor),
            uploader: MediaUploader::new(images),
            reconciler,
            local_prefix,
            timeout,
        }
    }

    pub fn with_compressor(mut self, compressor: Arc<dyn ImageCompressor>) -> Self {
        self.compressor = compressor;
        self
    }

    /// Wires HTTP stores from the remote section and a JSON cache in the data
    /// directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let remote = HttpDocumentStore::from_config(&config.remote)?
            .map(|store| Arc::new(store) as Arc<dyn DocumentStore>);
        let images = HttpImageStore::from_config(&config.remote)?
            .map(|store| Arc::new(store) as Arc<dyn ImageStore>);
        let local = Arc::new(JsonRentalCache::new(Some(config.resolve_data_dir()))?);
        if remote.is_none() {
            tracing::info!("no document store configured; rentals are kept locally");
        }
        Ok(Self::new(
            remote,
            images,
            local,
            config.local_prefix.clone(),
            config.remote.timeout(),
        ))
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn local_prefix(&self) -> &str {
        &self.local_prefix
    }

    /// Session for a new rental eligible for remote replication.
    pub fn start_new(&self) -> BookingWizard {
        BookingWizard::new(Rental::draft(new_rental_id(), Local::now().date_naive()))
    }

    /// Session for a new rental that stays in the local cache.
    pub fn start_offline(&self) -> BookingWizard {
        let id = new_local_rental_id(&self.local_prefix);
        BookingWizard::new(Rental::draft(id, Local::now().date_naive()))
    }

    /// Session editing an existing rental.
    ///
    /// Remote-eligible ids are looked up in the document store first; the
    /// local cache answers when the remote is unavailable or lacks the record.
    pub async fn start_edit(&self, id: &str) -> Result<BookingWizard> {
        if let Some(rental) = self.find_remote(id).await {
            return Ok(BookingWizard::hydrate(rental));
        }
        match self.local.find(id)? {
            Some(rental) => Ok(BookingWizard::hydrate(rental)),
            None => Err(RentalError::RentalNotFound(id.to_string())),
        }
    }

    async fn find_remote(&self, id: &str) -> Option<Rental> {
        if id.starts_with(&self.local_prefix) && !self.local_prefix.is_empty() {
            return None;
        }
        let store = self.remote.as_ref()?;
        match tokio::time::timeout(self.timeout, store.list_all()).await {
            Ok(Ok(rentals)) => rentals.into_iter().find(|rental| rental.id == id),
            Ok(Err(err)) => {
                tracing::warn!(id, error = %err, "remote lookup failed; using local cache");
                None
            }
            Err(_) => {
                tracing::warn!(id, "remote lookup timed out; using local cache");
                None
            }
        }
    }

    /// Freezes the wizard's draft, compresses and uploads inline images and
    /// saves the result.
    ///
    /// On error the wizard is untouched and the submit can be retried.
    pub async fn submit(&self, wizard: &BookingWizard) -> Result<SaveReport> {
        self.submit_at(wizard, Utc::now()).await
    }

    pub async fn submit_at(&self, wizard: &BookingWizard, now: DateTime<Utc>) -> Result<SaveReport> {
        let frozen = wizard.submit(now)?;
        let compressed = self.compress(frozen).await;
        let rental = self.uploader.upload_all(compressed).await;
        self.reconciler.save(&rental).await
    }

    async fn compress(&self, rental: Rental) -> Rental {
        let compressor = Arc::clone(&self.compressor);
        let original = rental.clone();
        match tokio::task::spawn_blocking(move || compress_all(compressor.as_ref(), rental)).await {
            Ok(rental) => rental,
            Err(err) => {
                tracing::warn!(id = %original.id, error = %err, "image compression aborted; saving originals");
                original
            }
        }
    }

    /// Every rental in the local cache.
    pub fn list(&self) -> Result<Vec<Rental>> {
        self.local.load_all()
    }

    pub fn find_local(&self, id: &str) -> Result<Option<Rental>> {
        self.local.find(id)
    }

    pub fn last_saved(&self) -> Result<Option<String>> {
        self.local.last_rental()
    }
}
