//! Page navigator - workflow layer
//!
//! Owns the navigation position. Every page change re-renders and re-extracts
//! the new page; a column change only invalidates, the user extracts again.
//!
//! Navigation policy: every request (typed page, next, previous) is clamped into
//! `[1, page_count]`, and a request that lands on the current page does nothing.
//! "Next" on the last page therefore behaves exactly like a rejected request.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{info, warn};

use crate::error::{ExtractionError, NavigationError, RenderError};
use crate::models::session::SharedSession;
use crate::services::{ExtractOutcome, ExtractionCoordinator, RenderOutcome, Renderer};

/// Result of a navigation request
#[derive(Debug)]
pub enum NavigationOutcome {
    /// Already there; nothing was rendered or fetched
    Unchanged { page: u32 },
    /// Moved to `page`; render and extraction ran concurrently
    Moved {
        page: u32,
        render: Result<RenderOutcome, RenderError>,
        extraction: Result<ExtractOutcome, ExtractionError>,
    },
}

impl NavigationOutcome {
    pub fn page(&self) -> u32 {
        match self {
            NavigationOutcome::Unchanged { page } | NavigationOutcome::Moved { page, .. } => *page,
        }
    }

    pub fn changed(&self) -> bool {
        matches!(self, NavigationOutcome::Moved { .. })
    }
}

/// Page navigator
#[derive(Clone)]
pub struct PageNavigator {
    session: SharedSession,
    renderer: Renderer,
    extractor: ExtractionCoordinator,
}

impl PageNavigator {
    pub fn new(session: SharedSession, renderer: Renderer, extractor: ExtractionCoordinator) -> Self {
        Self {
            session,
            renderer,
            extractor,
        }
    }

    /// Go to `page`, clamped into `[1, page_count]`
    pub async fn go_to_page(&self, page: u32) -> Result<NavigationOutcome, NavigationError> {
        let changed = {
            let mut session = self.session.lock();
            if !session.has_document() {
                return Err(NavigationError::NoDocument);
            }
            session.set_current_page(page)
        };

        if !changed {
            let page = self.session.lock().current_page();
            return Ok(NavigationOutcome::Unchanged { page });
        }
        Ok(self.show_current().await)
    }

    /// Go to a page typed by the user, e.g. `"9"` or `"p. 9"`
    pub async fn go_to_input(&self, input: &str) -> Result<NavigationOutcome, NavigationError> {
        let page = parse_page_input(input)?;
        self.go_to_page(page).await
    }

    pub async fn next(&self) -> Result<NavigationOutcome, NavigationError> {
        let target = self.session.lock().current_page().saturating_add(1);
        self.go_to_page(target).await
    }

    pub async fn previous(&self) -> Result<NavigationOutcome, NavigationError> {
        let target = self.session.lock().current_page().saturating_sub(1);
        self.go_to_page(target).await
    }

    /// Change the column hint
    ///
    /// Invalidates the translation for the page; extraction is left to the user.
    pub fn set_columns(&self, columns: u32) -> Result<bool, NavigationError> {
        let changed = self.session.lock().set_column_count(columns)?;
        if changed {
            info!("🔢 Column count set to {}", columns);
        }
        Ok(changed)
    }

    /// Render and extract whatever page the session is on
    pub async fn show_current(&self) -> NavigationOutcome {
        let (page, key) = {
            let session = self.session.lock();
            (session.current_page(), session.current_key())
        };
        info!("📖 Showing page {}", page);

        let extraction = async {
            match key {
                Some(key) => self.extractor.extract(key).await,
                None => Err(ExtractionError::NoDocument),
            }
        };
        let (render, extraction) = futures::join!(self.renderer.render(page), extraction);

        if let Err(e) = &render {
            warn!("⚠️ Render of page {} failed: {}", page, e);
        }

        NavigationOutcome::Moved {
            page,
            render,
            extraction,
        }
    }
}

/// Parse a typed page number, taking the first (optionally signed) run of digits
///
/// # Returns
/// The page to request. Negative numbers come back as 0 and numbers too large
/// for `u32` saturate; navigation clamps both.
pub fn parse_page_input(input: &str) -> Result<u32, NavigationError> {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    let number = NUMBER.get_or_init(|| Regex::new(r"-?[0-9]+").expect("valid page number pattern"));

    let found = number
        .find(input)
        .ok_or_else(|| NavigationError::InvalidInput(input.to_string()))?;
    if found.as_str().starts_with('-') {
        return Ok(0);
    }
    Ok(found.as_str().parse().unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_input() {
        assert_eq!(parse_page_input("9").unwrap(), 9);
        assert_eq!(parse_page_input("  12 ").unwrap(), 12);
        assert_eq!(parse_page_input("p. 3").unwrap(), 3);
        assert_eq!(parse_page_input("99999999999999").unwrap(), u32::MAX);
        assert_eq!(parse_page_input("-3").unwrap(), 0);
        assert_eq!(parse_page_input("page -12").unwrap(), 0);
        assert!(matches!(
            parse_page_input("next"),
            Err(NavigationError::InvalidInput(_))
        ));
    }
}
