//! Notification service - service layer
//!
//! Only surfaces user-visible events; it never decides anything.

use std::fmt::{self, Display};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::models::session::{DocumentId, RequestKey};

/// Events the view layer shows to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A new document replaced the session
    DocumentLoaded {
        document_id: DocumentId,
        page_count: u32,
    },
    UploadFailed(String),
    ExtractionFailed {
        key: RequestKey,
        message: String,
    },
    TranslationFailed {
        key: RequestKey,
        message: String,
    },
    /// New translated text is displayed; re-run typesetting
    TranslationReady {
        key: RequestKey,
        revision: u64,
    },
}

impl Notification {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Notification::UploadFailed(_)
                | Notification::ExtractionFailed { .. }
                | Notification::TranslationFailed { .. }
        )
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::DocumentLoaded {
                document_id,
                page_count,
            } => write!(f, "document {} loaded ({} pages)", document_id, page_count),
            Notification::UploadFailed(message) => write!(f, "upload failed: {}", message),
            Notification::ExtractionFailed { key, message } => {
                write!(f, "extraction failed {}: {}", key, message)
            }
            Notification::TranslationFailed { key, message } => {
                write!(f, "translation failed {}: {}", key, message)
            }
            Notification::TranslationReady { key, revision } => {
                write!(f, "translation ready {} (rev {})", key, revision)
            }
        }
    }
}

/// Notification sender
///
/// Cloned into every coordinator; the view owns the receiving end.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: Option<UnboundedSender<Notification>>,
}

impl Notifier {
    /// Create a notifier and the receiver the view layer listens on
    pub fn channel() -> (Self, UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A notifier that only logs
    pub fn silent() -> Self {
        Self { tx: None }
    }

    pub fn notify(&self, notification: Notification) {
        if notification.is_failure() {
            warn!("⚠️ {}", notification);
        } else {
            info!("✓ {}", notification);
        }

        if let Some(tx) = &self.tx {
            if tx.send(notification).is_err() {
                debug!("notification receiver dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notifications_reach_receiver() {
        let (notifier, mut rx) = Notifier::channel();
        notifier.notify(Notification::UploadFailed("empty".to_string()));

        let received = rx.recv().await.unwrap();
        assert!(received.is_failure());
        assert_eq!(received.to_string(), "upload failed: empty");
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (notifier, rx) = Notifier::channel();
        drop(rx);
        notifier.notify(Notification::UploadFailed("nobody listening".to_string()));
        Notifier::silent().notify(Notification::UploadFailed("silent".to_string()));
    }
}
