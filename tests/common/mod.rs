#![allow(dead_code)]

use std::{io::Cursor, sync::Arc, time::Duration};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use chrono::{NaiveDate, NaiveDateTime};
use rental_core::{
    core::BookingService,
    domain::{Client, ImageRef, Vehicle, Witness},
    storage::{DocumentStore, ImageStore, JsonRentalCache},
    BookingWizard,
};
use tempfile::TempDir;

pub const LOCAL_PREFIX: &str = "local_";

/// Service backed by a JSON cache in a fresh temporary directory.
pub fn service_in_temp_dir(
    remote: Option<Arc<dyn DocumentStore>>,
    images: Option<Arc<dyn ImageStore>>,
) -> (BookingService, Arc<JsonRentalCache>, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let cache = Arc::new(
        JsonRentalCache::new(Some(temp.path().to_path_buf())).expect("create json cache"),
    );
    let service = BookingService::new(
        remote,
        images,
        cache.clone(),
        LOCAL_PREFIX,
        Duration::from_secs(2),
    );
    (service, cache, temp)
}

pub fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .expect("valid timestamp")
}

/// Walks a wizard from Client to Agreement with valid data, a daily rate of
/// 1000 and a two-day period.
pub fn complete(wizard: &mut BookingWizard) {
    wizard.update_client(|client| {
        *client = Client::new("Ali Raza", "12345-1234567-1", "0300-1234567", "Lahore");
    });
    wizard.advance().expect("client step");
    wizard.update_vehicle(|vehicle| {
        *vehicle = Vehicle::new("Toyota", "Corolla", "2022", "White").with_plate("LEA-1234");
    });
    wizard.advance().expect("vehicle step");
    wizard.advance().expect("condition step");
    wizard.set_delivery(at(1, 10));
    wizard.set_return(at(3, 10));
    wizard.set_per_day_price(1000.0);
    wizard.advance().expect("period step");
    wizard.update_witness(|witness| {
        *witness = Witness::new("Sara Khan", "54321-7654321-9", "0301-7654321", "Lahore");
    });
    wizard.advance().expect("witness step");
    wizard.advance().expect("payment step");
}

/// Opaque grey PNG of the given size as an inline `data:` reference.
pub fn png_data_url(width: u32, height: u32) -> ImageRef {
    let pixels = image::RgbImage::from_pixel(width, height, image::Rgb([120, 120, 120]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(pixels)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encode png");
    ImageRef::new(format!("data:image/png;base64,{}", STANDARD.encode(bytes)))
}
