//! # Bangla PDF Client
//!
//! Client-side session controller for the PDF-to-Bangla translation tool:
//! loads a PDF, navigates its pages and coordinates the asynchronous
//! extraction / translation calls to the backend.
//!
//! ## Architecture
//!
//! ### ① Infrastructure
//! - `infrastructure/` - holds scarce resources and only exposes capabilities
//! - `DocumentDecoder` / `RenderableDocument` - external decode/render engine
//! - `DisplaySurface` - the only pixel buffer, written by the renderer alone
//!
//! ### ② Clients and models
//! - `clients/` - `Backend` trait and its HTTP implementation
//! - `models/` - `Session`, extraction cache, translation state, wire payloads
//!
//! ### ③ Services
//! - `UploadCoordinator` - upload, decode preview, reset the session
//! - `Renderer` - draw a page, drop pixels of superseded pages
//! - `ExtractionCoordinator` - column text per (document, page, columns)
//! - `TranslationCoordinator` - `Idle → Pending → Resolved | Failed`
//! - `Notifier` - user-visible notifications
//!
//! ### ④ Workflow and orchestration
//! - `PageNavigator` - page changes drive render + extraction
//! - `DocumentController` - wires everything around one shared session
//!
//! Every outbound request carries a `RequestTicket` (key + generation); a
//! response whose ticket no longer matches the session is dropped.

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// Re-export commonly used types
pub use clients::{Backend, HttpBackend};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{DocumentDecoder, LopdfDecoder, RenderableDocument};
pub use models::{DocumentId, RequestKey, Session, SharedSession, TranslationStatus};
pub use orchestrator::{DocumentController, SessionSnapshot};
pub use services::{ExtractOutcome, Notification, RenderOutcome, TranslateOutcome, UploadOutcome};
pub use utils::logging as logger;
pub use workflow::{NavigationOutcome, PageNavigator};
