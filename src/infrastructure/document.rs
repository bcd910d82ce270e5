//! Document decode / render capability
//!
//! The decode engine is an external collaborator. These traits are the only
//! surface the coordinators see.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RenderError;

/// Pixel size of a page at a given scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub scale: f32,
}

impl Viewport {
    /// Viewport for a page of `width_pt` × `height_pt` points
    pub fn from_points(width_pt: f32, height_pt: f32, scale: f32) -> Self {
        Self {
            width: (width_pt * scale).round().max(1.0) as u32,
            height: (height_pt * scale).round().max(1.0) as u32,
            scale,
        }
    }

    /// Size of an RGBA8 buffer covering the viewport
    pub fn rgba_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Rasterized page, RGBA8
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// A decoded document that can lay out and rasterize its pages
#[async_trait]
pub trait RenderableDocument: Send + Sync {
    /// Number of pages
    fn page_count(&self) -> u32;

    /// Viewport of a 1-based page at `scale`
    fn viewport(&self, page: u32, scale: f32) -> Result<Viewport, RenderError>;

    /// Rasterize a 1-based page into `viewport`
    async fn rasterize(&self, page: u32, viewport: Viewport) -> Result<Raster, RenderError>;
}

/// Turns raw bytes into a [`RenderableDocument`]
pub trait DocumentDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<Arc<dyn RenderableDocument>, RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_scales_letter_page() {
        let viewport = Viewport::from_points(612.0, 792.0, 1.25);
        assert_eq!(viewport.width, 765);
        assert_eq!(viewport.height, 990);
        assert_eq!(viewport.rgba_len(), 765 * 990 * 4);
    }
}
