//! Google Cloud Vision text detection client
//!
//! Sends one image per request to `images:annotate` with a single
//! `TEXT_DETECTION` feature. The first text annotation's `description` is
//! the full recognized text; an image without any text yields `""`.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("cropwise/", env!("CARGO_PKG_VERSION"));

/// Vision client errors
#[derive(Debug, Error)]
pub enum VisionError {
    /// Network communication error (includes timeouts)
    #[error("Network error: {0}")]
    Network(String),

    /// Vision API returned an error status or an error object
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Failed to parse API response JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// Uploaded image could not be read from disk
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns image bytes into recognized text
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<String, VisionError>;
}

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// `images:annotate` response body
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotateResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateImageResponse {
    #[serde(default)]
    pub text_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    pub error: Option<ApiStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityAnnotation {
    #[serde(default)]
    pub description: String,
}

/// Per-image error object
#[derive(Debug, Clone, Deserialize)]
pub struct ApiStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

impl AnnotateResponse {
    /// Full text of the first image, or `""` when nothing was detected
    pub fn into_text(self) -> Result<String, VisionError> {
        let first = match self.responses.into_iter().next() {
            Some(r) => r,
            None => return Ok(String::new()),
        };

        if let Some(status) = first.error {
            return Err(VisionError::Api(status.code.max(0) as u16, status.message));
        }

        Ok(first
            .text_annotations
            .into_iter()
            .next()
            .map(|a| a.description)
            .unwrap_or_default())
    }
}

/// Google Cloud Vision REST client (API-key authenticated)
pub struct VisionClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl VisionClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, VisionError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| VisionError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn annotate_url(&self) -> String {
        format!("{}/images:annotate", self.base_url)
    }
}

#[async_trait]
impl TextRecognizer for VisionClient {
    async fn recognize(&self, image: &[u8]) -> Result<String, VisionError> {
        let body = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: STANDARD.encode(image),
                },
                features: vec![Feature {
                    kind: "TEXT_DETECTION",
                }],
            }],
        };

        tracing::debug!(image_bytes = image.len(), "Submitting image to Vision API");

        let mut request = self.http_client.post(self.annotate_url()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| VisionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(VisionError::Api(status.as_u16(), error_text));
        }

        let annotate: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| VisionError::Parse(e.to_string()))?;

        let text = annotate.into_text()?;
        tracing::info!(characters = text.len(), "Vision text detection complete");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    fn parse(body: &str) -> AnnotateResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_first_annotation_is_full_text() {
        let response = parse(
            r#"{"responses":[{"textAnnotations":[
                {"locale":"en","description":"N: 12\nP: 4\n"},
                {"description":"N:"},
                {"description":"12"}
            ]}]}"#,
        );
        assert_eq!(response.into_text().unwrap(), "N: 12\nP: 4\n");
    }

    #[test]
    fn test_no_annotations_is_empty_text() {
        let response = parse(r#"{"responses":[{}]}"#);
        assert_eq!(response.into_text().unwrap(), "");
    }

    #[test]
    fn test_no_responses_is_empty_text() {
        let response = parse(r#"{}"#);
        assert_eq!(response.into_text().unwrap(), "");
    }

    #[test]
    fn test_error_object_is_failure() {
        let response = parse(
            r#"{"responses":[{"error":{"code":3,"message":"Bad image data."}}]}"#,
        );
        match response.into_text() {
            Err(VisionError::Api(code, message)) => {
                assert_eq!(code, 3);
                assert_eq!(message, "Bad image data.");
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: STANDARD.encode(b"abc"),
                },
                features: vec![Feature {
                    kind: "TEXT_DETECTION",
                }],
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["requests"][0]["image"]["content"], "YWJj");
        assert_eq!(value["requests"][0]["features"][0]["type"], "TEXT_DETECTION");
    }
}
