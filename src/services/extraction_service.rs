//! Extraction coordinator - service layer
//!
//! Fetches column-partitioned text for a (document, page, columns) key and owns
//! the extraction cache. Responses are applied only while their key is still
//! the session's current key.

use std::sync::Arc;

use tracing::{debug, info};

use crate::clients::Backend;
use crate::error::ExtractionError;
use crate::models::extraction::ExtractionEntry;
use crate::models::session::{RequestKey, SharedSession};
use crate::services::notifier::{Notification, Notifier};
use crate::utils::truncate_text;

/// Result of an extraction request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// Fetched from the backend and stored
    Fetched(ExtractionEntry),
    /// Served from the cache without a request
    Cached(ExtractionEntry),
    /// The key stopped being current; nothing was applied
    Discarded,
}

impl ExtractOutcome {
    pub fn entry(&self) -> Option<&ExtractionEntry> {
        match self {
            ExtractOutcome::Fetched(entry) | ExtractOutcome::Cached(entry) => Some(entry),
            ExtractOutcome::Discarded => None,
        }
    }
}

/// Extraction coordinator
#[derive(Clone)]
pub struct ExtractionCoordinator {
    session: SharedSession,
    backend: Arc<dyn Backend>,
    notifier: Notifier,
    reuse_cached: bool,
}

impl ExtractionCoordinator {
    pub fn new(
        session: SharedSession,
        backend: Arc<dyn Backend>,
        notifier: Notifier,
        reuse_cached: bool,
    ) -> Self {
        Self {
            session,
            backend,
            notifier,
            reuse_cached,
        }
    }

    /// Extract text for `key`
    ///
    /// On failure the cache is untouched and the previous entry stays displayed.
    ///
    /// # Arguments
    /// - `key`: must still be the session's current key, otherwise nothing is sent
    ///
    /// # Returns
    /// - `Cached` when cache reuse is on and the key was already fetched
    /// - `Fetched` when the response was stored
    /// - `Discarded` when the session moved on before the response arrived
    pub async fn extract(&self, key: RequestKey) -> Result<ExtractOutcome, ExtractionError> {
        let ticket = {
            let session = self.session.lock();
            if !session.has_document() {
                return Err(ExtractionError::NoDocument);
            }
            if session.current_key().as_ref() != Some(&key) {
                debug!("extract {} skipped, not the current key", key);
                return Ok(ExtractOutcome::Discarded);
            }
            if self.reuse_cached {
                if let Some(entry) = session.cached_extraction(&key) {
                    debug!("extract {} served from cache", key);
                    return Ok(ExtractOutcome::Cached(entry));
                }
            }
            session.ticket_for(key)
        };

        info!("📄 Extracting {}", ticket.key);
        let result = self.backend.extract(&ticket.key).await;

        let mut session = self.session.lock();
        match result {
            Ok(text) => {
                let entry = ExtractionEntry::from(text);
                if !session.store_extraction(&ticket, entry.clone()) {
                    debug!("discarding stale extraction {}", ticket);
                    return Ok(ExtractOutcome::Discarded);
                }
                drop(session);

                info!(
                    "✓ Extracted {} columns for {}: {}",
                    entry.columns.len(),
                    ticket.key,
                    truncate_text(&entry.joined_text, 60)
                );
                Ok(ExtractOutcome::Fetched(entry))
            }
            Err(e) => {
                if !session.is_current(&ticket) {
                    debug!("discarding stale extraction failure {}: {}", ticket, e);
                    return Ok(ExtractOutcome::Discarded);
                }
                drop(session);

                self.notifier.notify(Notification::ExtractionFailed {
                    key: ticket.key,
                    message: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    /// Extract text for the session's current key
    pub async fn extract_current(&self) -> Result<ExtractOutcome, ExtractionError> {
        let key = self
            .session
            .lock()
            .current_key()
            .ok_or(ExtractionError::NoDocument)?;
        self.extract(key).await
    }
}
