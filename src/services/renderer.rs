//! Renderer - service layer
//!
//! Draws the current page onto the display surface. A render only commits its
//! pixels if, once rasterizing finishes, the session still shows the same page
//! of the same document.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::RenderError;
use crate::infrastructure::{DisplaySurface, SurfaceSnapshot};
use crate::models::session::SharedSession;

/// Result of a render request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Pixels are on the surface
    Committed { page: u32, width: u32, height: u32 },
    /// Page outside `[1, page_count]` of the preview document
    OutOfRange,
    /// No preview document to draw from
    NoDocument,
    /// The session moved on while rasterizing; pixels were dropped
    Stale,
}

/// Renderer
#[derive(Clone)]
pub struct Renderer {
    session: SharedSession,
    surface: Arc<Mutex<DisplaySurface>>,
    scale: f32,
}

impl Renderer {
    pub fn new(session: SharedSession, scale: f32) -> Self {
        Self {
            session,
            surface: Arc::new(Mutex::new(DisplaySurface::new())),
            scale,
        }
    }

    pub async fn render(&self, page: u32) -> Result<RenderOutcome, RenderError> {
        let (document, epoch) = {
            let session = self.session.lock();
            match session.document() {
                Some(document) => (document, session.document_epoch()),
                None => return Ok(RenderOutcome::NoDocument),
            }
        };

        if page < 1 || page > document.page_count() {
            debug!("render skipped: page {} outside 1..={}", page, document.page_count());
            return Ok(RenderOutcome::OutOfRange);
        }

        let viewport = document.viewport(page, self.scale)?;
        let raster = document.rasterize(page, viewport).await?;

        let session = self.session.lock();
        if session.document_epoch() != epoch || session.current_page() != page {
            debug!(
                "render of page {} dropped, session is on page {}",
                page,
                session.current_page()
            );
            return Ok(RenderOutcome::Stale);
        }

        let (width, height) = (raster.width, raster.height);
        self.surface.lock().commit(page, raster);
        Ok(RenderOutcome::Committed {
            page,
            width,
            height,
        })
    }

    /// Drop the pixels of a replaced document
    pub fn reset(&self) {
        self.surface.lock().clear();
    }

    pub fn surface(&self) -> SurfaceSnapshot {
        self.surface.lock().snapshot()
    }

    pub fn with_pixels<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        f(self.surface.lock().pixels())
    }
}
