//! Translation coordinator - service layer
//!
//! Submits the current page's joined text for translation and drives the
//! `Idle → Pending → Resolved | Failed` state of the session's translation entry.

use std::sync::Arc;

use tracing::{debug, info};

use crate::clients::Backend;
use crate::error::TranslationError;
use crate::models::session::{RequestKey, SharedSession};
use crate::services::notifier::{Notification, Notifier};
use crate::utils::truncate_text;

/// Result of a translation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateOutcome {
    Resolved(String),
    /// No extraction with non-empty text for the key; no request was sent
    Disabled,
    /// The key changed while waiting; the response was dropped
    Discarded,
}

/// Translation coordinator
#[derive(Clone)]
pub struct TranslationCoordinator {
    session: SharedSession,
    backend: Arc<dyn Backend>,
    notifier: Notifier,
}

impl TranslationCoordinator {
    pub fn new(session: SharedSession, backend: Arc<dyn Backend>, notifier: Notifier) -> Self {
        Self {
            session,
            backend,
            notifier,
        }
    }

    /// Whether `translate` would send a request right now
    pub fn is_enabled(&self) -> bool {
        self.session.lock().can_translate()
    }

    /// Translate the text extracted for `key`
    ///
    /// The entry turns `Pending` before the request goes out.
    pub async fn translate(&self, key: RequestKey) -> Result<TranslateOutcome, TranslationError> {
        let (ticket, epoch) = {
            let mut session = self.session.lock();
            if session.current_key().as_ref() != Some(&key) {
                return Ok(TranslateOutcome::Disabled);
            }
            match session.begin_translation() {
                Some(tagged) => tagged,
                None => {
                    debug!("translate {} disabled, no extracted text", key);
                    return Ok(TranslateOutcome::Disabled);
                }
            }
        };

        info!("🌐 Translating {}", ticket.key);
        let result = self.backend.translate(&ticket.key).await;

        let mut session = self.session.lock();
        match result {
            Ok(text) => {
                if !session.finish_translation(&ticket, epoch, Ok(text.clone())) {
                    debug!("discarding stale translation {}", ticket);
                    return Ok(TranslateOutcome::Discarded);
                }
                let revision = session.translation().revision();
                drop(session);

                info!("✓ Translated {}: {}", ticket.key, truncate_text(&text, 60));
                self.notifier.notify(Notification::TranslationReady {
                    key: ticket.key,
                    revision,
                });
                Ok(TranslateOutcome::Resolved(text))
            }
            Err(e) => {
                if !session.finish_translation(&ticket, epoch, Err(e.to_string())) {
                    debug!("discarding stale translation failure {}: {}", ticket, e);
                    return Ok(TranslateOutcome::Discarded);
                }
                drop(session);

                self.notifier.notify(Notification::TranslationFailed {
                    key: ticket.key,
                    message: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    /// Translate the session's current key
    pub async fn translate_current(&self) -> Result<TranslateOutcome, TranslationError> {
        let key = self.session.lock().current_key();
        match key {
            Some(key) => self.translate(key).await,
            None => Ok(TranslateOutcome::Disabled),
        }
    }
}
