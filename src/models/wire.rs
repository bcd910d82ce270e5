//! Backend wire payloads
//!
//! ## Translation response contract
//!
//! The translated text is looked up under [`TRANSLATION_FIELDS`], first match
//! wins. A body that is a bare JSON string is taken as the text itself, and any
//! other body is returned verbatim.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Accepted field names for translated text, in priority order
pub const TRANSLATION_FIELDS: &[&str] = &["translated_text", "translatedText", "translated"];

/// `POST /pdf/ingest` and `GET /pdf/{id}/metadata` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub file_id: String,
    pub page_count: u32,
}

/// `POST /pdf/{id}/extract` response
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractResponse {
    pub text: ExtractedText,
}

/// Structured extraction for one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub joined_text: Option<String>,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub titles: Vec<String>,
    #[serde(default)]
    pub footers: Vec<String>,
}

/// `GET /health` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub gemini_key_set: bool,
}

/// Pull the translated text out of a translation response body
pub fn decode_translation(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => TRANSLATION_FIELDS
            .iter()
            .filter_map(|field| map.get(*field).and_then(Value::as_str))
            .find(|text| !text.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        Ok(Value::String(text)) => text,
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_translation_field_priority() {
        let body = r#"{"translated":"third","translatedText":"second","translated_text":"first"}"#;
        assert_eq!(decode_translation(body), "first");

        let body = r#"{"translated":"third","translatedText":"second"}"#;
        assert_eq!(decode_translation(body), "second");

        let body = r#"{"original_text":"hi","translated":"হাই"}"#;
        assert_eq!(decode_translation(body), "হাই");
    }

    #[test]
    fn test_decode_translation_empty_field_falls_through() {
        let body = r#"{"translated_text":"","translatedText":"দ্বিতীয়"}"#;
        assert_eq!(decode_translation(body), "দ্বিতীয়");
    }

    #[test]
    fn test_decode_translation_raw_fallbacks() {
        assert_eq!(decode_translation(r#""শুধু লেখা""#), "শুধু লেখা");
        assert_eq!(decode_translation("plain body"), "plain body");

        let body = r#"{"result":"x"}"#;
        assert_eq!(decode_translation(body), body);
    }

    #[test]
    fn test_extract_response_tolerates_missing_fields() {
        let payload = r#"{"file_id":"abc","page":1,"text":{"columns":["only"]}}"#;
        let response: ExtractResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.text.columns, vec!["only".to_string()]);
        assert!(response.text.joined_text.is_none());
        assert!(response.text.headers.is_empty());
    }
}
