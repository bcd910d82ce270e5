//! Infrastructure layer
//!
//! Holds the scarce resources (decoded document, display surface) and only
//! exposes capabilities.

pub mod document;
pub mod lopdf_document;
pub mod surface;

pub use document::{DocumentDecoder, Raster, RenderableDocument, Viewport};
pub use lopdf_document::LopdfDecoder;
pub use surface::{DisplaySurface, SurfaceSnapshot};
