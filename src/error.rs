use thiserror::Error;

/// Application error type
///
/// Each coordinator owns one variant family. None of them is fatal to the session.
#[derive(Debug, Error)]
pub enum AppError {
    /// Upload failed
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),
    /// Extraction failed
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),
    /// Translation failed
    #[error("translation error: {0}")]
    Translation(#[from] TranslationError),
    /// Render failed
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    /// Navigation request rejected
    #[error("navigation error: {0}")]
    Navigation(#[from] NavigationError),
    /// Configuration error
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Backend transport errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network request failed
    #[error("request to {endpoint} failed: {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Backend answered with a non-success status
    #[error("{endpoint} returned status {status}: {detail:?}")]
    BadStatus {
        endpoint: String,
        status: u16,
        detail: Option<String>,
    },
    /// Response body could not be decoded
    #[error("invalid JSON from {endpoint}: {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Upload errors
#[derive(Debug, Error)]
pub enum UploadError {
    /// Nothing to upload
    #[error("file is empty")]
    EmptyFile,
    /// Local file could not be read
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Backend accepted the file but reported no pages
    #[error("backend reported an invalid page count: {0}")]
    InvalidPageCount(u32),
    /// Backend rejected the file or the transport failed
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Extraction errors
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// No document has been uploaded yet
    #[error("no document loaded")]
    NoDocument,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Translation errors
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Decode / render errors from the document engine
#[derive(Debug, Error)]
pub enum RenderError {
    /// Raw bytes could not be decoded into a document
    #[error("failed to decode document: {0}")]
    Decode(String),
    /// A single page could not be laid out or rasterized
    #[error("page {page}: {reason}")]
    Page { page: u32, reason: String },
}

/// Navigation errors
#[derive(Debug, Error)]
pub enum NavigationError {
    /// No document has been uploaded yet
    #[error("no document loaded")]
    NoDocument,
    /// Page entry contained no number
    #[error("not a page number: {0:?}")]
    InvalidInput(String),
    /// Column count must be at least one
    #[error("column count must be at least 1, got {0}")]
    InvalidColumns(u32),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Config file is not valid TOML
    #[error("failed to parse {path}: {source}")]
    ParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// A value is out of range
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

// ========== Conversions from common error types ==========

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| u.path().to_string())
            .unwrap_or_default();
        ApiError::RequestFailed {
            endpoint,
            source: Box::new(err),
        }
    }
}

// ========== Convenience constructors ==========

impl ApiError {
    /// Create a request failure error
    pub fn request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }

    /// Create a bad status error
    pub fn bad_status(endpoint: impl Into<String>, status: u16, detail: Option<String>) -> Self {
        ApiError::BadStatus {
            endpoint: endpoint.into(),
            status,
            detail,
        }
    }
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ========== Result alias ==========

/// Application result type
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_error_display() {
        let err: AppError = UploadError::from(ApiError::bad_status(
            "/pdf/ingest",
            400,
            Some("empty_file".to_string()),
        ))
        .into();

        let msg = err.to_string();
        assert!(msg.starts_with("upload error:"));
        assert!(msg.contains("400"));
        assert!(msg.contains("empty_file"));
    }

    #[test]
    fn test_navigation_error_display() {
        let err = NavigationError::InvalidInput("abc".to_string());
        assert_eq!(err.to_string(), "not a page number: \"abc\"");
    }
}
