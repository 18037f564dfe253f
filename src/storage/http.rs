use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, RequestBuilder};

use crate::{config::RemoteConfig, core::errors::RentalError, domain::Rental};

use super::{DocumentStore, ImageStore, Result};

fn unavailable(context: &str, err: impl std::fmt::Display) -> RentalError {
    RentalError::StorageUnavailable(format!("{context}: {err}"))
}

fn build_client(remote: &RemoteConfig) -> Result<Client> {
    Client::builder()
        .timeout(remote.timeout())
        .build()
        .map_err(|err| unavailable("failed to create HTTP client", err))
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn authorize(request: RequestBuilder, api_key: Option<&str>) -> RequestBuilder {
    match api_key {
        Some(key) => request.bearer_auth(key),
        None => request,
    }
}

/// Document store speaking JSON over HTTP: `PUT <base>/rentals/<id>` and
/// `GET <base>/rentals`.
#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpDocumentStore {
    /// Returns `None` when no document URL is configured.
    pub fn from_config(remote: &RemoteConfig) -> Result<Option<Self>> {
        let Some(base_url) = remote.document_url.clone() else {
            return Ok(None);
        };
        Ok(Some(Self {
            client: build_client(remote)?,
            base_url,
            api_key: remote.api_key.clone(),
        }))
    }

    pub fn record_url(&self, id: &str) -> String {
        join_url(&self.base_url, &format!("rentals/{id}"))
    }

    pub fn collection_url(&self) -> String {
        join_url(&self.base_url, "rentals")
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn upsert(&self, id: &str, rental: &Rental) -> Result<()> {
        let request = self.client.put(self.record_url(id)).json(rental);
        authorize(request, self.api_key.as_deref())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| unavailable("document upsert failed", err))?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Rental>> {
        let request = self.client.get(self.collection_url());
        let response = authorize(request, self.api_key.as_deref())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| unavailable("document listing failed", err))?;
        response
            .json::<Vec<Rental>>()
            .await
            .map_err(|err| unavailable("document listing was malformed", err))
    }
}

/// Image store uploading with `PUT <upload base>/<key>` and returning
/// `<public base>/<key>`.
#[derive(Debug, Clone)]
pub struct HttpImageStore {
    client: Client,
    upload_base: String,
    public_base: String,
    api_key: Option<String>,
}

impl HttpImageStore {
    /// Returns `None` when no image URL is configured.
    pub fn from_config(remote: &RemoteConfig) -> Result<Option<Self>> {
        let Some(upload_base) = remote.image_url.clone() else {
            return Ok(None);
        };
        let public_base = remote.public_base().unwrap_or(&upload_base).to_string();
        Ok(Some(Self {
            client: build_client(remote)?,
            upload_base,
            public_base,
            api_key: remote.api_key.clone(),
        }))
    }

    pub fn upload_url(&self, key: &str) -> String {
        join_url(&self.upload_base, key)
    }

    pub fn public_url(&self, key: &str) -> String {
        join_url(&self.public_base, key)
    }
}

#[async_trait]
impl ImageStore for HttpImageStore {
    async fn put(&self, bytes: Vec<u8>, key: &str, content_type: &str) -> Result<String> {
        let request = self
            .client
            .put(self.upload_url(key))
            .header(CONTENT_TYPE, content_type)
            .body(bytes);
        authorize(request, self.api_key.as_deref())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| unavailable("image upload failed", err))?;
        Ok(self.public_url(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote() -> RemoteConfig {
        RemoteConfig {
            document_url: Some("https://db.example.test/v1/".into()),
            image_url: Some("https://upload.example.test".into()),
            public_image_url: Some("https://cdn.example.test/".into()),
            ..RemoteConfig::default()
        }
    }

    #[test]
    fn unconfigured_remote_builds_nothing() {
        let empty = RemoteConfig::default();
        assert!(HttpDocumentStore::from_config(&empty)
            .expect("document store")
            .is_none());
        assert!(HttpImageStore::from_config(&empty)
            .expect("image store")
            .is_none());
    }

    #[test]
    fn document_urls() {
        let store = HttpDocumentStore::from_config(&remote())
            .expect("build")
            .expect("configured");
        assert_eq!(
            store.record_url("r-1"),
            "https://db.example.test/v1/rentals/r-1"
        );
        assert_eq!(store.collection_url(), "https://db.example.test/v1/rentals");
    }

    #[test]
    fn image_urls_use_public_base() {
        let store = HttpImageStore::from_config(&remote())
            .expect("build")
            .expect("configured");
        assert_eq!(
            store.upload_url("rentals/r-1/vehicle.png"),
            "https://upload.example.test/rentals/r-1/vehicle.png"
        );
        assert_eq!(
            store.public_url("rentals/r-1/vehicle.png"),
            "https://cdn.example.test/rentals/r-1/vehicle.png"
        );
    }
}
