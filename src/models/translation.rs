//! Translation state machine
//!
//! `Idle → Pending → Resolved | Failed`. Any change of the active key resets
//! the entry to `Idle`; the bumped `epoch` lets late responses be recognised.

use crate::models::session::RequestKey;

/// Translation status for the active key
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TranslationStatus {
    #[default]
    Idle,
    Pending,
    Resolved(String),
    Failed(String),
}

/// Translation entry for the session's active key
#[derive(Debug, Clone, Default)]
pub struct TranslationEntry {
    key: Option<RequestKey>,
    status: TranslationStatus,
    epoch: u64,
    revision: u64,
}

impl TranslationEntry {
    pub fn key(&self) -> Option<&RequestKey> {
        self.key.as_ref()
    }

    pub fn status(&self) -> &TranslationStatus {
        &self.status
    }

    /// Resolved text, if any
    pub fn text(&self) -> Option<&str> {
        match &self.status {
            TranslationStatus::Resolved(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, TranslationStatus::Pending)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Bumped every time resolved text is set; the view re-typesets on change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Drop whatever state the entry had and rebind it to `key`
    pub fn reset(&mut self, key: Option<RequestKey>) {
        self.key = key;
        self.status = TranslationStatus::Idle;
        self.epoch += 1;
    }

    /// Enter `Pending`, clearing any displayed result. Returns the epoch to tag the request with.
    pub fn begin(&mut self, key: RequestKey) -> u64 {
        if self.key.as_ref() != Some(&key) {
            self.reset(Some(key));
        }
        self.status = TranslationStatus::Pending;
        self.epoch
    }

    /// Apply a response if it still belongs to this entry
    pub fn finish(&mut self, key: &RequestKey, epoch: u64, result: Result<String, String>) -> bool {
        if self.key.as_ref() != Some(key) || self.epoch != epoch {
            return false;
        }
        match result {
            Ok(text) => {
                self.revision += 1;
                self.status = TranslationStatus::Resolved(text);
            }
            Err(message) => self.status = TranslationStatus::Failed(message),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::DocumentId;

    fn key(page: u32) -> RequestKey {
        RequestKey::new(DocumentId::from("doc"), page, 1)
    }

    #[test]
    fn test_pending_then_resolved() {
        let mut entry = TranslationEntry::default();
        let epoch = entry.begin(key(1));
        assert!(entry.is_pending());

        assert!(entry.finish(&key(1), epoch, Ok("অনুবাদ".to_string())));
        assert_eq!(entry.text(), Some("অনুবাদ"));
        assert_eq!(entry.revision(), 1);
    }

    #[test]
    fn test_reset_discards_late_response() {
        let mut entry = TranslationEntry::default();
        let epoch = entry.begin(key(1));
        entry.reset(Some(key(2)));

        assert!(!entry.finish(&key(1), epoch, Ok("stale".to_string())));
        assert_eq!(entry.status(), &TranslationStatus::Idle);
    }

    #[test]
    fn test_begin_clears_previous_result() {
        let mut entry = TranslationEntry::default();
        let epoch = entry.begin(key(1));
        entry.finish(&key(1), epoch, Err("timeout".to_string()));
        assert_eq!(entry.status(), &TranslationStatus::Failed("timeout".to_string()));

        entry.begin(key(1));
        assert!(entry.is_pending());
        assert_eq!(entry.text(), None);
    }
}
