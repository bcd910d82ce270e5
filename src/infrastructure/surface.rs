//! Display surface - infrastructure layer
//!
//! Holds the only pixel buffer shown to the user. Owned by the renderer;
//! nothing else writes to it.

use crate::infrastructure::document::Raster;

/// Display surface
#[derive(Debug, Default)]
pub struct DisplaySurface {
    page: Option<u32>,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    commits: u64,
}

/// Cheap view of what the surface currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSnapshot {
    pub page: Option<u32>,
    pub width: u32,
    pub height: u32,
    pub commits: u64,
}

impl DisplaySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resize to the raster and overwrite every pixel
    pub fn commit(&mut self, page: u32, raster: Raster) {
        self.page = Some(page);
        self.width = raster.width;
        self.height = raster.height;
        self.pixels = raster.pixels;
        self.commits += 1;
    }

    /// Forget the current page (used when the document is replaced)
    pub fn clear(&mut self) {
        self.page = None;
        self.width = 0;
        self.height = 0;
        self.pixels.clear();
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        SurfaceSnapshot {
            page: self.page,
            width: self.width,
            height: self.height,
            commits: self.commits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_replaces_size_and_pixels() {
        let mut surface = DisplaySurface::new();
        surface.commit(
            1,
            Raster {
                width: 2,
                height: 1,
                pixels: vec![0; 8],
            },
        );
        surface.commit(
            2,
            Raster {
                width: 1,
                height: 1,
                pixels: vec![255; 4],
            },
        );

        let snapshot = surface.snapshot();
        assert_eq!(snapshot.page, Some(2));
        assert_eq!((snapshot.width, snapshot.height), (1, 1));
        assert_eq!(snapshot.commits, 2);
        assert_eq!(surface.pixels(), &[255; 4]);

        surface.clear();
        assert_eq!(surface.snapshot().page, None);
        assert!(surface.pixels().is_empty());
    }
}
