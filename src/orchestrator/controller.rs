//! Document controller - orchestration layer
//!
//! Entry point for the view layer. Owns the [`SharedSession`] and hands clones
//! of it to every coordinator; all state changes go through them.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use crate::clients::{Backend, HttpBackend};
use crate::config::Config;
use crate::error::{ApiError, AppResult, NavigationError, UploadError};
use crate::infrastructure::{DocumentDecoder, SurfaceSnapshot};
use crate::models::extraction::ExtractionEntry;
use crate::models::session::{DocumentId, Session, SharedSession};
use crate::models::translation::TranslationStatus;
use crate::models::wire::HealthStatus;
use crate::services::{
    ExtractOutcome, ExtractionCoordinator, Notification, Notifier, Renderer, TranslateOutcome,
    TranslationCoordinator, UploadCoordinator, UploadOutcome,
};
use crate::workflow::{NavigationOutcome, PageNavigator};

/// What the view layer needs to draw one frame
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub document_id: Option<DocumentId>,
    pub page_count: u32,
    pub current_page: u32,
    pub column_count: u32,
    pub uploads_in_flight: u32,
    /// Extraction for the current key, if fetched
    pub extraction: Option<ExtractionEntry>,
    pub translation: TranslationStatus,
    pub translation_revision: u64,
    pub can_translate: bool,
    pub surface: SurfaceSnapshot,
}

/// Document session controller
pub struct DocumentController {
    session: SharedSession,
    backend: Arc<dyn Backend>,
    uploader: UploadCoordinator,
    renderer: Renderer,
    extractor: ExtractionCoordinator,
    translator: TranslationCoordinator,
    navigator: PageNavigator,
}

impl DocumentController {
    /// Wire a controller around `backend` and `decoder`
    ///
    /// # Arguments
    /// - `config`: render scale, default columns and cache reuse
    /// - `backend`: extraction / translation service
    /// - `decoder`: local preview engine
    ///
    /// # Returns
    /// The controller and the receiver on which user-visible notifications arrive
    pub fn new(
        config: &Config,
        backend: Arc<dyn Backend>,
        decoder: Arc<dyn DocumentDecoder>,
    ) -> (Self, UnboundedReceiver<Notification>) {
        let (notifier, notifications) = Notifier::channel();
        let session = Session::new(config.default_columns).shared();

        let uploader = UploadCoordinator::new(
            session.clone(),
            backend.clone(),
            decoder,
            notifier.clone(),
        );
        let renderer = Renderer::new(session.clone(), config.render_scale);
        let extractor = ExtractionCoordinator::new(
            session.clone(),
            backend.clone(),
            notifier.clone(),
            config.reuse_cached_extractions,
        );
        let translator = TranslationCoordinator::new(session.clone(), backend.clone(), notifier);
        let navigator = PageNavigator::new(session.clone(), renderer.clone(), extractor.clone());

        let controller = Self {
            session,
            backend,
            uploader,
            renderer,
            extractor,
            translator,
            navigator,
        };
        (controller, notifications)
    }

    /// Controller talking to the HTTP backend from `config`
    pub fn with_http(
        config: &Config,
        decoder: Arc<dyn DocumentDecoder>,
    ) -> Result<(Self, UnboundedReceiver<Notification>), ApiError> {
        let backend = HttpBackend::new(config)?;
        Ok(Self::new(config, Arc::new(backend), decoder))
    }

    // ========== Upload ==========

    /// Upload a document, then show its first page
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadOutcome, UploadError> {
        let outcome = self.uploader.submit(file_name, bytes).await?;

        if let UploadOutcome::Committed { page_count, .. } = &outcome {
            info!("📚 {} ready with {} pages", file_name, page_count);
            self.renderer.reset();
            if let NavigationOutcome::Moved {
                extraction: Err(e), ..
            } = self.navigator.show_current().await
            {
                debug!("first page extraction failed: {}", e);
            }
        }
        Ok(outcome)
    }

    /// Read a file from disk and upload it
    pub async fn upload_file(&self, path: impl AsRef<Path>) -> AppResult<UploadOutcome> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| UploadError::ReadFailed {
                path: path.display().to_string(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "document.pdf".to_string());

        Ok(self.upload(&file_name, bytes).await?)
    }

    // ========== Navigation ==========

    pub async fn go_to_page(&self, page: u32) -> Result<NavigationOutcome, NavigationError> {
        self.navigator.go_to_page(page).await
    }

    pub async fn go_to_input(&self, input: &str) -> Result<NavigationOutcome, NavigationError> {
        self.navigator.go_to_input(input).await
    }

    pub async fn next_page(&self) -> Result<NavigationOutcome, NavigationError> {
        self.navigator.next().await
    }

    pub async fn previous_page(&self) -> Result<NavigationOutcome, NavigationError> {
        self.navigator.previous().await
    }

    pub fn set_columns(&self, columns: u32) -> Result<bool, NavigationError> {
        self.navigator.set_columns(columns)
    }

    // ========== Extraction / translation ==========

    /// Extract the current page (the "Extract Text" action)
    pub async fn extract(&self) -> AppResult<ExtractOutcome> {
        Ok(self.extractor.extract_current().await?)
    }

    /// Translate the current page (the "Translate Text" action)
    pub async fn translate(&self) -> AppResult<TranslateOutcome> {
        Ok(self.translator.translate_current().await?)
    }

    // ========== Backend housekeeping ==========

    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.backend.health().await
    }

    /// Re-read the page count of the current document from the backend
    ///
    /// Applied only if nothing changed in the session meanwhile. A current page that
    /// no longer exists is clamped, then rendered and extracted like any page change.
    /// Returns whether the count was applied.
    pub async fn refresh_metadata(&self) -> Result<bool, ApiError> {
        let (document_id, generation) = {
            let session = self.session.lock();
            match session.document_id() {
                Some(id) => (id.clone(), session.generation()),
                None => return Ok(false),
            }
        };

        let metadata = self.backend.metadata(&document_id).await?;
        if metadata.file_id != document_id.as_str() {
            warn!(
                "⚠️ Metadata for {} came back as {}; ignoring",
                document_id, metadata.file_id
            );
            return Ok(false);
        }

        let (applied, moved) = {
            let mut session = self.session.lock();
            let before = session.current_page();
            let applied = session.apply_page_count(generation, metadata.page_count);
            (applied, session.current_page() != before)
        };
        if !applied {
            return Ok(false);
        }

        debug!("page count of {} refreshed to {}", document_id, metadata.page_count);
        // The old page fell off the end; show the one it was clamped to
        if moved {
            if let NavigationOutcome::Moved {
                extraction: Err(e), ..
            } = self.navigator.show_current().await
            {
                debug!("extraction after page count refresh failed: {}", e);
            }
        }
        Ok(true)
    }

    // ========== View access ==========

    pub fn snapshot(&self) -> SessionSnapshot {
        let surface = self.renderer.surface();
        let session = self.session.lock();
        SessionSnapshot {
            document_id: session.document_id().cloned(),
            page_count: session.page_count(),
            current_page: session.current_page(),
            column_count: session.column_count(),
            uploads_in_flight: session.uploads_in_flight(),
            extraction: session.current_extraction().cloned(),
            translation: session.translation().status().clone(),
            translation_revision: session.translation().revision(),
            can_translate: session.can_translate(),
            surface,
        }
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn extractor(&self) -> &ExtractionCoordinator {
        &self.extractor
    }

    pub fn translator(&self) -> &TranslationCoordinator {
        &self.translator
    }

    pub fn navigator(&self) -> &PageNavigator {
        &self.navigator
    }
}
