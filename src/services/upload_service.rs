//! Upload coordinator - service layer
//!
//! Submits raw document bytes, decodes the local preview and, unless a newer
//! upload has already landed, swaps the whole session over to the new document.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clients::Backend;
use crate::error::UploadError;
use crate::infrastructure::DocumentDecoder;
use crate::models::session::{DocumentId, SharedSession};
use crate::services::notifier::{Notification, Notifier};

/// Result of a finished upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The session now points at this document
    Committed {
        document_id: DocumentId,
        page_count: u32,
    },
    /// A later upload was started before this one resolved; nothing changed
    Superseded,
}

/// Upload coordinator
#[derive(Clone)]
pub struct UploadCoordinator {
    session: SharedSession,
    backend: Arc<dyn Backend>,
    decoder: Arc<dyn DocumentDecoder>,
    notifier: Notifier,
}

impl UploadCoordinator {
    pub fn new(
        session: SharedSession,
        backend: Arc<dyn Backend>,
        decoder: Arc<dyn DocumentDecoder>,
        notifier: Notifier,
    ) -> Self {
        Self {
            session,
            backend,
            decoder,
            notifier,
        }
    }

    /// Upload a document
    ///
    /// On failure the session, its caches and the current preview are left untouched.
    ///
    /// # Arguments
    /// - `file_name`: name sent with the multipart part
    /// - `bytes`: raw file contents, decoded locally and ingested at the same time
    ///
    /// # Returns
    /// `Superseded` when a newer upload was committed first
    pub async fn submit(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadOutcome, UploadError> {
        if bytes.is_empty() {
            return Err(self.fail(UploadError::EmptyFile));
        }

        let seq = self.session.lock().begin_upload();
        let in_flight = InFlight {
            session: self.session.clone(),
        };
        info!("📤 Uploading {} (upload #{})", file_name, seq);

        // The preview is decoded whatever the server says, but only committed with its id
        let decoder = self.decoder.clone();
        let preview_bytes = bytes.clone();
        let decode = tokio::task::spawn_blocking(move || decoder.decode(&preview_bytes));

        let (decoded, result) = futures::join!(decode, self.backend.ingest(file_name, bytes));
        drop(in_flight);

        let preview = match decoded {
            Ok(Ok(document)) => Some(document),
            Ok(Err(e)) => {
                warn!("⚠️ Local preview unavailable for {}: {}", file_name, e);
                None
            }
            Err(e) => {
                warn!("⚠️ Preview decode task for {} failed: {}", file_name, e);
                None
            }
        };

        let response = match result {
            Ok(response) => response,
            Err(e) => return Err(self.fail(e.into())),
        };

        if response.page_count == 0 {
            return Err(self.fail(UploadError::InvalidPageCount(response.page_count)));
        }

        if let Some(document) = &preview {
            if document.page_count() != response.page_count {
                warn!(
                    "⚠️ Preview has {} pages but backend reports {}; using backend count",
                    document.page_count(),
                    response.page_count
                );
            }
        }

        let document_id = DocumentId::from(response.file_id);
        let page_count = response.page_count;
        let committed = self
            .session
            .lock()
            .commit_upload(seq, document_id.clone(), page_count, preview);
        if !committed {
            debug!("upload #{} superseded by a later upload", seq);
            return Ok(UploadOutcome::Superseded);
        }

        self.notifier.notify(Notification::DocumentLoaded {
            document_id: document_id.clone(),
            page_count,
        });

        Ok(UploadOutcome::Committed {
            document_id,
            page_count,
        })
    }

    fn fail(&self, error: UploadError) -> UploadError {
        self.notifier
            .notify(Notification::UploadFailed(error.to_string()));
        error
    }
}

/// Keeps `uploads_in_flight` raised while an upload is outstanding, even if
/// the upload future is dropped halfway
struct InFlight {
    session: SharedSession,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.session.lock().end_upload();
    }
}
