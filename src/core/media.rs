use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::{
    domain::{ImageRef, Rental},
    storage::ImageStore,
};

/// Moves inline `data:` images of a rental into the image store.
pub struct MediaUploader {
    store: Option<Arc<dyn ImageStore>>,
}

impl MediaUploader {
    pub fn new(store: Option<Arc<dyn ImageStore>>) -> Self {
        Self { store }
    }

    pub fn disabled() -> Self {
        Self { store: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Replaces every inline image with the URL returned by the store.
    ///
    /// A slot whose upload fails keeps its inline value. Slots that already
    /// hold a URL are left alone.
    pub async fn upload_all(&self, mut rental: Rental) -> Rental {
        let Some(store) = self.store.as_deref() else {
            return rental;
        };
        let id = rental.id.clone();
        let mut uploaded = 0usize;

        for (slot, image) in rental.image_slots_mut() {
            if let Some(url) = upload_slot(store, &id, &slot, image.as_ref()).await {
                *image = Some(url);
                uploaded += 1;
            }
        }
        for (index, image) in rental.dents_scratches.images.iter_mut().enumerate() {
            let slot = format!("damage-{}", index + 1);
            if let Some(url) = upload_slot(store, &id, &slot, Some(&*image)).await {
                *image = url;
                uploaded += 1;
            }
        }

        if uploaded > 0 {
            tracing::info!(id = %id, uploaded, "inline images uploaded");
        }
        rental
    }
}

async fn upload_slot(
    store: &dyn ImageStore,
    id: &str,
    slot: &str,
    image: Option<&ImageRef>,
) -> Option<ImageRef> {
    let image = image.filter(|image| image.is_inline())?;
    let Some((mime, payload)) = image.inline_parts() else {
        tracing::warn!(id, slot, "inline image is not a base64 data URL; kept as is");
        return None;
    };
    let bytes = match STANDARD.decode(payload.trim()) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(id, slot, error = %err, "inline image could not be decoded; kept as is");
            return None;
        }
    };
    let key = object_key(id, slot, mime);
    match store.put(bytes, &key, mime).await {
        Ok(url) => Some(ImageRef::from(url)),
        Err(err) => {
            tracing::warn!(id, slot, error = %err, "image upload failed; kept inline");
            None
        }
    }
}

/// `rentals/<id>/<slot>.<ext>`
pub fn object_key(id: &str, slot: &str, mime: &str) -> String {
    format!("rentals/{}/{}.{}", id, slot, extension_for(mime))
}

fn extension_for(mime: &str) -> &str {
    match mime {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/svg+xml" => "svg",
        other => other
            .strip_prefix("image/")
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or("bin"),
    }
}
