pub mod booking;
pub mod compression;
pub mod errors;
pub mod media;
pub mod reconciler;
pub mod utils;
pub mod validation;
pub mod wizard;

pub use booking::BookingService;
pub use compression::{CompressionProfile, ImageCompressor, JpegCompressor};
pub use errors::{RentalError, Result};
pub use media::MediaUploader;
pub use reconciler::{PersistenceReconciler, RemoteOutcome, SaveReport, SkipReason};
pub use validation::{FieldErrors, ValidationError};
pub use wizard::{BookingWizard, SessionOrigin, WizardStep};
