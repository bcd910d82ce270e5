//! Session state
//!
//! The single in-memory record of the loaded document, the navigation
//! position and the column configuration. It is shared as [`SharedSession`]
//! and injected into every coordinator; all mutation goes through the methods
//! below so the invariants hold after every operation:
//!
//! - `1 ≤ current_page ≤ page_count` whenever `page_count > 0`
//! - `column_count ≥ 1`
//! - no cache entry outlives the document it was fetched for

use std::fmt::{self, Display};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::NavigationError;
use crate::infrastructure::RenderableDocument;
use crate::models::extraction::{ExtractionCache, ExtractionEntry};
use crate::models::translation::TranslationEntry;

/// Session shared between coordinators. Never hold the lock across an `.await`.
pub type SharedSession = Arc<Mutex<Session>>;

/// Server-assigned document identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cache / request key: (document, page, columns)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub document_id: DocumentId,
    /// 1-based page number
    pub page: u32,
    pub columns: u32,
}

impl RequestKey {
    pub fn new(document_id: DocumentId, page: u32, columns: u32) -> Self {
        Self {
            document_id,
            page,
            columns,
        }
    }
}

impl Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[doc #{} page #{} columns #{}]",
            self.document_id, self.page, self.columns
        )
    }
}

/// Tag carried by every outbound extraction / translation request
///
/// A response is applied only while the session still has the same key and
/// generation; otherwise it is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub key: RequestKey,
    pub generation: u64,
}

impl Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} gen #{}", self.key, self.generation)
    }
}

pub struct Session {
    document_id: Option<DocumentId>,
    page_count: u32,
    current_page: u32,
    column_count: u32,
    /// Bumped on upload, page change and column change
    generation: u64,
    document: Option<Arc<dyn RenderableDocument>>,
    /// Bumped whenever `document` is replaced
    document_epoch: u64,
    upload_seq: u64,
    /// Sequence number of the upload the session currently shows
    committed_upload: u64,
    uploads_in_flight: u32,
    extractions: ExtractionCache,
    translation: TranslationEntry,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("document_id", &self.document_id)
            .field("page_count", &self.page_count)
            .field("current_page", &self.current_page)
            .field("column_count", &self.column_count)
            .field("generation", &self.generation)
            .field("has_preview", &self.document.is_some())
            .field("cached_extractions", &self.extractions.len())
            .field("translation", self.translation.status())
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Session {
    pub fn new(column_count: u32) -> Self {
        Self {
            document_id: None,
            page_count: 0,
            current_page: 0,
            column_count: column_count.max(1),
            generation: 0,
            document: None,
            document_epoch: 0,
            upload_seq: 0,
            committed_upload: 0,
            uploads_in_flight: 0,
            extractions: ExtractionCache::new(),
            translation: TranslationEntry::default(),
        }
    }

    pub fn shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    // ========== Accessors ==========

    pub fn document_id(&self) -> Option<&DocumentId> {
        self.document_id.as_ref()
    }

    pub fn has_document(&self) -> bool {
        self.document_id.is_some()
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn column_count(&self) -> u32 {
        self.column_count
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn document(&self) -> Option<Arc<dyn RenderableDocument>> {
        self.document.clone()
    }

    pub fn document_epoch(&self) -> u64 {
        self.document_epoch
    }

    pub fn uploads_in_flight(&self) -> u32 {
        self.uploads_in_flight
    }

    pub fn extractions(&self) -> &ExtractionCache {
        &self.extractions
    }

    pub fn translation(&self) -> &TranslationEntry {
        &self.translation
    }

    // ========== Keys and tickets ==========

    pub fn current_key(&self) -> Option<RequestKey> {
        self.document_id
            .as_ref()
            .map(|id| RequestKey::new(id.clone(), self.current_page, self.column_count))
    }

    /// Ticket for the current key
    pub fn ticket(&self) -> Option<RequestTicket> {
        self.current_key().map(|key| self.ticket_for(key))
    }

    /// Ticket for an explicit key, tagged with the current generation
    pub fn ticket_for(&self, key: RequestKey) -> RequestTicket {
        RequestTicket {
            key,
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.generation == self.generation
            && self.current_key().as_ref() == Some(&ticket.key)
    }

    // ========== Upload ==========

    /// Register a new upload and return its sequence number
    pub fn begin_upload(&mut self) -> u64 {
        self.upload_seq += 1;
        self.uploads_in_flight += 1;
        self.upload_seq
    }

    pub fn end_upload(&mut self) {
        self.uploads_in_flight = self.uploads_in_flight.saturating_sub(1);
    }

    /// Whether upload `seq` may still replace the document
    ///
    /// Only a newer successful upload supersedes it; failed uploads never commit
    /// and so never count.
    pub fn accepts_upload(&self, seq: u64) -> bool {
        seq > self.committed_upload
    }

    /// Replace the document and wipe everything derived from the old one
    ///
    /// The preview and the server id are committed together, so they always
    /// come from the same file.
    ///
    /// # Arguments
    /// - `seq`: number handed out by [`Session::begin_upload`]
    /// - `document`: local preview, if it could be decoded
    ///
    /// # Returns
    /// `false` if a newer upload has already been committed or `page_count` is 0
    pub fn commit_upload(
        &mut self,
        seq: u64,
        document_id: DocumentId,
        page_count: u32,
        document: Option<Arc<dyn RenderableDocument>>,
    ) -> bool {
        if !self.accepts_upload(seq) || page_count == 0 {
            return false;
        }

        self.committed_upload = seq;
        self.document_id = Some(document_id);
        self.page_count = page_count;
        self.current_page = 1;
        self.document = document;
        self.document_epoch += 1;
        self.extractions.clear();
        self.generation += 1;
        let key = self.current_key();
        self.translation.reset(key);
        true
    }

    // ========== Navigation ==========

    /// Move to `page`, clamped into `[1, page_count]`. Returns whether the page changed.
    pub fn set_current_page(&mut self, page: u32) -> bool {
        if self.page_count == 0 {
            return false;
        }
        let page = page.clamp(1, self.page_count);
        if page == self.current_page {
            return false;
        }

        self.current_page = page;
        self.invalidate_active_key();
        true
    }

    /// Change the column hint. Returns whether it changed.
    pub fn set_column_count(&mut self, columns: u32) -> Result<bool, NavigationError> {
        if columns < 1 {
            return Err(NavigationError::InvalidColumns(columns));
        }
        if columns == self.column_count {
            return Ok(false);
        }

        self.column_count = columns;
        self.invalidate_active_key();
        Ok(true)
    }

    /// Apply a refreshed page count fetched under `generation`
    ///
    /// A shrinking count pulls `current_page` back into range; the caller then
    /// has to show the new page.
    pub fn apply_page_count(&mut self, generation: u64, page_count: u32) -> bool {
        if generation != self.generation || page_count == 0 || !self.has_document() {
            return false;
        }

        self.page_count = page_count;
        if self.current_page > page_count {
            self.current_page = page_count;
            self.invalidate_active_key();
        }
        true
    }

    fn invalidate_active_key(&mut self) {
        self.generation += 1;
        let key = self.current_key();
        self.translation.reset(key);
    }

    // ========== Extraction ==========

    pub fn cached_extraction(&self, key: &RequestKey) -> Option<ExtractionEntry> {
        self.extractions.get(key).cloned()
    }

    /// Extraction for the current key, if fetched
    pub fn current_extraction(&self) -> Option<&ExtractionEntry> {
        self.current_key().and_then(|key| self.extractions.get(&key))
    }

    /// Store an extraction if its ticket is still current
    ///
    /// A changed joined text invalidates the translation for that key.
    pub fn store_extraction(&mut self, ticket: &RequestTicket, entry: ExtractionEntry) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        let joined_text = entry.joined_text.clone();
        let previous = self.extractions.insert(ticket.key.clone(), entry);
        if previous.map(|p| p.joined_text) != Some(joined_text) {
            self.translation.reset(Some(ticket.key.clone()));
        }
        true
    }

    // ========== Translation ==========

    /// Whether the current key has an extraction with non-empty joined text
    pub fn can_translate(&self) -> bool {
        self.current_extraction()
            .map(ExtractionEntry::is_translatable)
            .unwrap_or(false)
    }

    /// Move the translation to `Pending` for the current key
    ///
    /// Returns `None` (and leaves the state alone) when translation is disabled.
    pub fn begin_translation(&mut self) -> Option<(RequestTicket, u64)> {
        if !self.can_translate() {
            return None;
        }
        let ticket = self.ticket()?;
        let epoch = self.translation.begin(ticket.key.clone());
        Some((ticket, epoch))
    }

    pub fn finish_translation(
        &mut self,
        ticket: &RequestTicket,
        epoch: u64,
        result: Result<String, String>,
    ) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.translation.finish(&ticket.key, epoch, result)
    }
}
