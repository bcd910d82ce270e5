//! `lopdf`-backed document decoder
//!
//! Reads the page tree for page count and page sizes. The rasterizer only paints
//! the blank page frame at the right size; glyph rasterization needs a full
//! engine plugged in through [`RenderableDocument`].

use std::sync::Arc;

use async_trait::async_trait;
use lopdf::{Document, Object, ObjectId};
use tracing::debug;

use crate::error::RenderError;
use crate::infrastructure::document::{DocumentDecoder, Raster, RenderableDocument, Viewport};

/// US Letter, used when a page has no MediaBox anywhere in its ancestry
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Page tree inheritance depth guard
const MAX_PARENT_DEPTH: usize = 32;

#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfDecoder;

impl DocumentDecoder for LopdfDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Arc<dyn RenderableDocument>, RenderError> {
        let doc = Document::load_mem(bytes).map_err(|e| RenderError::Decode(e.to_string()))?;

        let page_sizes: Vec<(f32, f32)> = doc
            .get_pages()
            .into_values()
            .map(|id| media_box_size(&doc, id).unwrap_or(DEFAULT_PAGE_SIZE))
            .collect();

        if page_sizes.is_empty() {
            return Err(RenderError::Decode("document has no pages".to_string()));
        }

        debug!("decoded preview with {} pages", page_sizes.len());
        Ok(Arc::new(LopdfDocument { page_sizes }))
    }
}

/// Page geometry of a decoded PDF
#[derive(Debug, Clone)]
pub struct LopdfDocument {
    page_sizes: Vec<(f32, f32)>,
}

impl LopdfDocument {
    fn page_size(&self, page: u32) -> Result<(f32, f32), RenderError> {
        page.checked_sub(1)
            .and_then(|idx| self.page_sizes.get(idx as usize))
            .copied()
            .ok_or_else(|| RenderError::Page {
                page,
                reason: format!("out of range 1..={}", self.page_sizes.len()),
            })
    }
}

#[async_trait]
impl RenderableDocument for LopdfDocument {
    fn page_count(&self) -> u32 {
        self.page_sizes.len() as u32
    }

    fn viewport(&self, page: u32, scale: f32) -> Result<Viewport, RenderError> {
        let (width, height) = self.page_size(page)?;
        Ok(Viewport::from_points(width, height, scale))
    }

    async fn rasterize(&self, page: u32, viewport: Viewport) -> Result<Raster, RenderError> {
        self.page_size(page)?;
        Ok(Raster {
            width: viewport.width,
            height: viewport.height,
            pixels: vec![255; viewport.rgba_len()],
        })
    }
}

/// Width and height of the page's MediaBox, following `Parent` links
fn media_box_size(doc: &Document, page_id: ObjectId) -> Option<(f32, f32)> {
    let mut current = Some(page_id);
    for _ in 0..MAX_PARENT_DEPTH {
        let dict = doc.get_dictionary(current?).ok()?;
        if let Ok(media_box) = dict.get(b"MediaBox") {
            return rect_size(doc, media_box);
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

fn rect_size(doc: &Document, obj: &Object) -> Option<(f32, f32)> {
    let obj = match obj {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let coords: Vec<f32> = obj.as_array().ok()?.iter().filter_map(number).collect();
    if coords.len() != 4 {
        return None;
    }
    let width = (coords[2] - coords[0]).abs();
    let height = (coords[3] - coords[1]).abs();
    (width > 0.0 && height > 0.0).then_some((width, height))
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    /// Two pages: the first with its own MediaBox, the second inheriting A4 from the tree
    fn create_test_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let first = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        let second = doc.add_object(dictionary! {
            "Type" => "Page",
        });
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(first), Object::Reference(second)],
            "Count" => 2,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        for page_id in [first, second] {
            if let Ok(page) = doc.get_object_mut(page_id) {
                if let Ok(dict) = page.as_dict_mut() {
                    dict.set("Parent", Object::Reference(pages_id));
                }
            }
        }
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn test_decode_reads_page_sizes() {
        let document = LopdfDecoder.decode(&create_test_pdf()).unwrap();
        assert_eq!(document.page_count(), 2);

        let first = document.viewport(1, 1.0).unwrap();
        assert_eq!((first.width, first.height), (612, 792));

        let second = document.viewport(2, 1.0).unwrap();
        assert_eq!((second.width, second.height), (595, 842));

        assert!(document.viewport(3, 1.0).is_err());
        assert!(document.viewport(0, 1.0).is_err());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            LopdfDecoder.decode(b"not a pdf"),
            Err(RenderError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_rasterize_fills_viewport() {
        let document = LopdfDecoder.decode(&create_test_pdf()).unwrap();
        let viewport = document.viewport(1, 0.5).unwrap();
        let raster = document.rasterize(1, viewport).await.unwrap();

        assert_eq!((raster.width, raster.height), (306, 396));
        assert_eq!(raster.pixels.len(), viewport.rgba_len());
    }
}
