//! Re-encodes inline images as bounded-width JPEG before they are uploaded
//! or stored.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{
    codecs::jpeg::JpegEncoder, imageops::FilterType, DynamicImage, Rgb, RgbImage, Rgba, RgbaImage,
};

use crate::{
    core::errors::{RentalError, Result},
    domain::{ImageRef, Rental},
};

/// Target width and JPEG quality for one kind of image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionProfile {
    pub max_width: u32,
    pub quality: u8,
}

impl CompressionProfile {
    pub const PHOTO: Self = Self {
        max_width: 600,
        quality: 60,
    };
    /// CNIC scans and the driving licence need legible text.
    pub const DOCUMENT: Self = Self {
        max_width: 800,
        quality: 70,
    };
    pub const SIGNATURE: Self = Self {
        max_width: 400,
        quality: 80,
    };

    /// Profile for a slot name as produced by [`Rental::image_slots_mut`] or
    /// `damage-N`.
    pub fn for_slot(slot: &str) -> Self {
        match slot {
            "cnic-front" | "cnic-back" | "driving-license" => Self::DOCUMENT,
            "client-signature" | "owner-signature" => Self::SIGNATURE,
            _ => Self::PHOTO,
        }
    }
}

pub trait ImageCompressor: Send + Sync {
    /// Returns a re-encoded copy of an inline image.
    fn compress(&self, source: &ImageRef, profile: CompressionProfile) -> Result<ImageRef>;
}

/// Downscales to the profile width, paints transparency white and encodes JPEG.
#[derive(Debug, Default, Clone, Copy)]
pub struct JpegCompressor;

impl ImageCompressor for JpegCompressor {
    fn compress(&self, source: &ImageRef, profile: CompressionProfile) -> Result<ImageRef> {
        let (_, payload) = source
            .inline_parts()
            .ok_or_else(|| RentalError::Media("not a base64 data URL".into()))?;
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|err| RentalError::Media(err.to_string()))?;
        let decoded = image::load_from_memory(&bytes).map_err(codec_error)?;
        let flattened = flatten_onto_white(&scale_to_width(decoded, profile.max_width).to_rgba8());

        let mut encoded = Vec::new();
        JpegEncoder::new_with_quality(&mut encoded, profile.quality)
            .encode_image(&flattened)
            .map_err(codec_error)?;
        Ok(ImageRef::new(format!(
            "data:image/jpeg;base64,{}",
            STANDARD.encode(encoded)
        )))
    }
}

fn codec_error(err: image::ImageError) -> RentalError {
    RentalError::Media(err.to_string())
}

fn scale_to_width(source: DynamicImage, max_width: u32) -> DynamicImage {
    if source.width() <= max_width {
        return source;
    }
    let height = (u64::from(source.height()) * u64::from(max_width) / u64::from(source.width()))
        .max(1) as u32;
    source.resize_exact(max_width, height, FilterType::Triangle)
}

fn flatten_onto_white(rgba: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let alpha = u16::from(a);
        let blend =
            |channel: u8| ((u16::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Compresses every inline image slot of `rental`.
///
/// A slot that fails to decode or encode keeps its original value; URLs are
/// never touched.
pub fn compress_all(compressor: &dyn ImageCompressor, mut rental: Rental) -> Rental {
    let id = rental.id.clone();
    let mut compressed = 0usize;

    for (slot, image) in rental.image_slots_mut() {
        if let Some(smaller) = compress_slot(compressor, &id, &slot, image.as_ref()) {
            *image = Some(smaller);
            compressed += 1;
        }
    }
    for (index, image) in rental.dents_scratches.images.iter_mut().enumerate() {
        let slot = format!("damage-{}", index + 1);
        if let Some(smaller) = compress_slot(compressor, &id, &slot, Some(&*image)) {
            *image = smaller;
            compressed += 1;
        }
    }

    if compressed > 0 {
        tracing::debug!(id = %id, compressed, "inline images compressed");
    }
    rental
}

fn compress_slot(
    compressor: &dyn ImageCompressor,
    id: &str,
    slot: &str,
    image: Option<&ImageRef>,
) -> Option<ImageRef> {
    let image = image.filter(|image| image.is_inline())?;
    match compressor.compress(image, CompressionProfile::for_slot(slot)) {
        Ok(smaller) => Some(smaller),
        Err(err) => {
            tracing::warn!(id, slot, error = %err, "image compression failed; kept original");
            None
        }
    }
}
