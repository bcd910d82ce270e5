pub mod extraction;
pub mod session;
pub mod translation;
pub mod wire;

pub use extraction::{ExtractionCache, ExtractionEntry};
pub use session::{DocumentId, RequestKey, RequestTicket, Session, SharedSession};
pub use translation::{TranslationEntry, TranslationStatus};
pub use wire::{ExtractedText, HealthStatus, IngestResponse, TRANSLATION_FIELDS};
