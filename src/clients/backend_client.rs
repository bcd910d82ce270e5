//! Backend API client
//!
//! Wraps every call to the extraction / translation backend
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::session::{DocumentId, RequestKey};
use crate::models::wire::{
    decode_translation, ExtractResponse, ExtractedText, HealthStatus, IngestResponse,
};

/// Backend capabilities used by the coordinators
#[async_trait]
pub trait Backend: Send + Sync {
    /// Submit raw file bytes; returns the document id and page count
    async fn ingest(&self, file_name: &str, bytes: Vec<u8>) -> Result<IngestResponse, ApiError>;

    /// Column-partitioned text for one page
    async fn extract(&self, key: &RequestKey) -> Result<ExtractedText, ApiError>;

    /// Translated text for one page
    async fn translate(&self, key: &RequestKey) -> Result<String, ApiError>;

    /// Page count of an already ingested document
    async fn metadata(&self, document_id: &DocumentId) -> Result<IngestResponse, ApiError>;

    async fn health(&self) -> Result<HealthStatus, ApiError>;
}

/// HTTP backend client
pub struct HttpBackend {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpBackend {
    /// Create a new backend client
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.translation_api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn ingest(&self, file_name: &str, bytes: Vec<u8>) -> Result<IngestResponse, ApiError> {
        let endpoint = "/pdf/ingest";
        debug!("uploading {} ({} bytes)", file_name, bytes.len());

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url(endpoint))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::request_failed(endpoint, e))?;

        read_json(endpoint, response).await
    }

    async fn extract(&self, key: &RequestKey) -> Result<ExtractedText, ApiError> {
        let endpoint = format!("/pdf/{}/extract", key.document_id);
        debug!("extract request {}", key);

        let response = self
            .client
            .post(self.url(&endpoint))
            .query(&[("page", key.page), ("columns", key.columns)])
            .send()
            .await
            .map_err(|e| ApiError::request_failed(endpoint.as_str(), e))?;

        let payload: ExtractResponse = read_json(&endpoint, response).await?;
        Ok(payload.text)
    }

    async fn translate(&self, key: &RequestKey) -> Result<String, ApiError> {
        let endpoint = "/gemini/translate";
        debug!("translate request {}", key);

        let page = key.page.to_string();
        let columns = key.columns.to_string();
        let mut request = self.client.post(self.url(endpoint)).query(&[
            ("file_id", key.document_id.as_str()),
            ("page", page.as_str()),
            ("columns", columns.as_str()),
        ]);
        if let Some(api_key) = &self.api_key {
            request = request.header("X-API-Key", api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::request_failed(endpoint, e))?;

        let body = read_body(endpoint, response).await?;
        Ok(decode_translation(&body))
    }

    async fn metadata(&self, document_id: &DocumentId) -> Result<IngestResponse, ApiError> {
        let endpoint = format!("/pdf/{}/metadata", document_id);

        let response = self
            .client
            .get(self.url(&endpoint))
            .send()
            .await
            .map_err(|e| ApiError::request_failed(endpoint.as_str(), e))?;

        read_json(&endpoint, response).await
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let endpoint = "/health";

        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|e| ApiError::request_failed(endpoint, e))?;

        read_json(endpoint, response).await
    }
}

// ========== Response helpers ==========

/// Read the body, turning non-2xx statuses into [`ApiError::BadStatus`]
async fn read_body(endpoint: &str, response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::request_failed(endpoint, e))?;

    if !status.is_success() {
        return Err(ApiError::bad_status(
            endpoint,
            status.as_u16(),
            error_detail(&body),
        ));
    }
    Ok(body)
}

async fn read_json<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T, ApiError> {
    let body = read_body(endpoint, response).await?;
    serde_json::from_str(&body).map_err(|source| ApiError::JsonParseFailed {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// The backend reports failures as `{"detail": ...}`
fn error_detail(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(value) => match value.get("detail") {
            Some(Value::String(detail)) => Some(detail.clone()),
            Some(other) => Some(other.to_string()),
            None => Some(body.to_string()),
        },
        Err(_) => Some(body.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_prefers_detail_field() {
        assert_eq!(
            error_detail(r#"{"detail":"empty_file"}"#),
            Some("empty_file".to_string())
        );
        assert_eq!(
            error_detail(r#"{"detail":{"msg":"bad"}}"#),
            Some(r#"{"msg":"bad"}"#.to_string())
        );
        assert_eq!(
            error_detail("Internal Server Error"),
            Some("Internal Server Error".to_string())
        );
        assert_eq!(error_detail("  "), None);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = Config {
            api_base_url: "http://localhost:8000/".to_string(),
            ..Config::default()
        };
        let backend = HttpBackend::new(&config).unwrap();
        assert_eq!(backend.url("/health"), "http://localhost:8000/health");
    }
}
