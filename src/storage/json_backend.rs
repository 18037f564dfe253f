use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::{
        errors::RentalError,
        utils::{ensure_dir, PathResolver},
    },
    domain::Rental,
};

use super::{LocalCache, Result};

const TMP_SUFFIX: &str = "tmp";
const BACKUP_SUFFIX: &str = "bak";

pub const CACHE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheEnvelope {
    schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_rental_id: Option<String>,
    #[serde(default)]
    rentals: Vec<Rental>,
}

impl Default for CacheEnvelope {
    fn default() -> Self {
        Self {
            schema_version: CACHE_SCHEMA_VERSION,
            last_rental_id: None,
            rentals: Vec::new(),
        }
    }
}

/// Accepted on-disk shapes. Early caches stored the bare rental array.
#[derive(Deserialize)]
#[serde(untagged)]
enum CacheFile {
    Envelope(CacheEnvelope),
    Legacy(Vec<Rental>),
}

/// Rental cache kept as a single JSON file under the data directory.
#[derive(Debug, Clone)]
pub struct JsonRentalCache {
    path: PathBuf,
}

impl JsonRentalCache {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        Ok(Self {
            path: PathResolver::cache_file_in(&app_root),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        sibling_path(&self.path, BACKUP_SUFFIX)
    }

    fn read_envelope(&self) -> Result<CacheEnvelope> {
        if !self.path.exists() {
            return Ok(CacheEnvelope::default());
        }
        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(CacheEnvelope::default());
        }
        let parsed: CacheFile = serde_json::from_str(&data).map_err(|err| {
            RentalError::LocalPersistence(format!(
                "rental cache `{}` is unreadable: {}",
                self.path.display(),
                err
            ))
        })?;
        let envelope = match parsed {
            CacheFile::Envelope(envelope) => envelope,
            CacheFile::Legacy(rentals) => {
                tracing::debug!(count = rentals.len(), "read legacy rental cache");
                CacheEnvelope {
                    rentals,
                    ..CacheEnvelope::default()
                }
            }
        };
        if envelope.schema_version > CACHE_SCHEMA_VERSION {
            return Err(RentalError::LocalPersistence(format!(
                "rental cache `{}` is from a newer schema version ({})",
                self.path.display(),
                envelope.schema_version
            )));
        }
        Ok(envelope)
    }

    fn write_envelope(&self, envelope: &CacheEnvelope) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        if self.path.exists() {
            fs::copy(&self.path, self.backup_path())?;
        }
        let envelope = CacheEnvelope {
            schema_version: CACHE_SCHEMA_VERSION,
            ..envelope.clone()
        };
        let json = serde_json::to_string_pretty(&envelope)?;
        let tmp = sibling_path(&self.path, TMP_SUFFIX);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl LocalCache for JsonRentalCache {
    fn load_all(&self) -> Result<Vec<Rental>> {
        Ok(self.read_envelope()?.rentals)
    }

    fn store_all(&self, rentals: &[Rental]) -> Result<()> {
        let mut envelope = self.read_envelope()?;
        envelope.rentals = rentals.to_vec();
        self.write_envelope(&envelope)
    }

    fn record_last_rental(&self, id: &str) -> Result<()> {
        let mut envelope = self.read_envelope()?;
        envelope.last_rental_id = Some(id.to_string());
        self.write_envelope(&envelope)
    }

    fn last_rental(&self) -> Result<Option<String>> {
        Ok(self.read_envelope()?.last_rental_id)
    }

    fn save(&self, rental: &Rental) -> Result<()> {
        let mut envelope = self.read_envelope()?;
        match envelope
            .rentals
            .iter_mut()
            .find(|existing| existing.id == rental.id)
        {
            Some(existing) => *existing = rental.clone(),
            None => envelope.rentals.push(rental.clone()),
        }
        envelope.last_rental_id = Some(rental.id.clone());
        self.write_envelope(&envelope)
    }
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut sibling = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, suffix),
        None => suffix.to_string(),
    };
    sibling.set_extension(ext);
    sibling
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
