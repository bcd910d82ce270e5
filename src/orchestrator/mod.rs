//! Orchestration layer
//!
//! ## Responsibilities
//!
//! Builds the shared session and wires every coordinator to it. Holds no
//! business rules of its own.
//!
//! ## Layering
//!
//! ```text
//! orchestrator::DocumentController
//!     ↓
//! workflow::PageNavigator (page change → render + extract)
//!     ↓
//! services (upload / render / extraction / translation / notifier)
//!     ↓
//! clients (Backend) + infrastructure (decoder, display surface)
//! ```

pub mod controller;

pub use controller::{DocumentController, SessionSnapshot};
