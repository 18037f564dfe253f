//! Best-effort dual write of a finished rental to the remote document store
//! and the local cache.
//!
//! The remote write goes first and may fail or time out without failing the
//! save; the local write always runs and its failure is the only fatal one.
//! There is no rollback: each store keeps its last successful write.

use std::{fmt, sync::Arc, time::Duration};

use crate::{
    core::errors::{RentalError, Result},
    domain::Rental,
    storage::{DocumentStore, LocalCache},
};

/// Why the remote write was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The id carries the local prefix.
    LocalOnly,
    /// No remote document store is configured.
    Unconfigured,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    Replicated,
    Skipped(SkipReason),
    Failed(String),
}

impl fmt::Display for RemoteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteOutcome::Replicated => f.write_str("saved to remote store"),
            RemoteOutcome::Skipped(SkipReason::LocalOnly) => {
                f.write_str("remote skipped (local-only record)")
            }
            RemoteOutcome::Skipped(SkipReason::Unconfigured) => {
                f.write_str("remote skipped (not configured)")
            }
            RemoteOutcome::Failed(reason) => write!(f, "remote save failed: {reason}"),
        }
    }
}

/// Result of a save whose local write succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub rental_id: String,
    pub remote: RemoteOutcome,
}

impl SaveReport {
    pub fn is_replicated(&self) -> bool {
        self.remote == RemoteOutcome::Replicated
    }

    /// Non-fatal problems to surface to the user.
    pub fn warnings(&self) -> Vec<String> {
        match &self.remote {
            RemoteOutcome::Failed(reason) => vec![format!(
                "Saved locally, but the remote copy could not be updated: {reason}"
            )],
            _ => Vec::new(),
        }
    }
}

pub struct PersistenceReconciler {
    remote: Option<Arc<dyn DocumentStore>>,
    local: Arc<dyn LocalCache>,
    local_prefix: String,
    timeout: Duration,
}

impl PersistenceReconciler {
    pub fn new(
        remote: Option<Arc<dyn DocumentStore>>,
        local: Arc<dyn LocalCache>,
        local_prefix: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            remote,
            local,
            local_prefix: local_prefix.into(),
            timeout,
        }
    }

    pub fn local_prefix(&self) -> &str {
        &self.local_prefix
    }

    pub async fn save(&self, rental: &Rental) -> Result<SaveReport> {
        let remote = self.write_remote(rental).await;

        if let Err(err) = self.local.save(rental) {
            tracing::error!(id = %rental.id, error = %err, "local save failed");
            return Err(match err {
                RentalError::LocalPersistence(_) => err,
                other => RentalError::LocalPersistence(other.to_string()),
            });
        }

        tracing::info!(id = %rental.id, remote = %remote, "rental saved");
        Ok(SaveReport {
            rental_id: rental.id.clone(),
            remote,
        })
    }

    async fn write_remote(&self, rental: &Rental) -> RemoteOutcome {
        if rental.is_local_only(&self.local_prefix) {
            return RemoteOutcome::Skipped(SkipReason::LocalOnly);
        }
        let Some(store) = self.remote.as_ref() else {
            return RemoteOutcome::Skipped(SkipReason::Unconfigured);
        };

        match tokio::time::timeout(self.timeout, store.upsert(&rental.id, rental)).await {
            Ok(Ok(())) => RemoteOutcome::Replicated,
            Ok(Err(err)) => {
                tracing::warn!(id = %rental.id, error = %err, "remote save failed");
                RemoteOutcome::Failed(err.to_string())
            }
            Err(_) => {
                tracing::warn!(id = %rental.id, timeout = ?self.timeout, "remote save timed out");
                RemoteOutcome::Failed(format!("timed out after {:?}", self.timeout))
            }
        }
    }
}
