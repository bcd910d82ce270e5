pub mod extraction_service;
pub mod notifier;
pub mod renderer;
pub mod translation_service;
pub mod upload_service;

pub use extraction_service::{ExtractOutcome, ExtractionCoordinator};
pub use notifier::{Notification, Notifier};
pub use renderer::{RenderOutcome, Renderer};
pub use translation_service::{TranslateOutcome, TranslationCoordinator};
pub use upload_service::{UploadCoordinator, UploadOutcome};
