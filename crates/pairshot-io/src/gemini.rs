//! [`MergeService`] over the Gemini `generateContent` HTTP API.
//!
//! Request building and response parsing are plain functions over
//! `serde_json` values so they can be tested without a network.

use async_trait::async_trait;
use pairshot_core::{
    MergeConfig, MergeError, MergeRequest, MergeService, UploadedImage, merge_prompt,
};
use serde::Serialize;
use serde_json::Value;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: [&'static str; 2],
}

fn image_part(image: &UploadedImage) -> Part<'_> {
    Part::Inline {
        inline_data: InlineData {
            mime_type: &image.mime_type,
            data: &image.base64,
        },
    }
}

/// Build the JSON body for one merge: both photos as inline parts,
/// followed by the prompt.
///
/// # Errors
///
/// Returns [`MergeError::InvalidResponse`] if serialization fails, which
/// only happens on a serde bug.
pub fn build_request_body(request: &MergeRequest) -> Result<Value, MergeError> {
    let body = GenerateContentRequest {
        contents: [Content {
            parts: vec![
                image_part(&request.first),
                image_part(&request.second),
                Part::Text {
                    text: merge_prompt(&request.instruction),
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_modalities: ["IMAGE", "TEXT"],
        },
    };
    serde_json::to_value(&body).map_err(|e| MergeError::InvalidResponse(e.to_string()))
}

/// Pull the first inline image out of a `generateContent` response.
///
/// # Errors
///
/// Returns [`MergeError::Service`] if the body is an error envelope and
/// [`MergeError::NoImage`] if no candidate part carries image data.
pub fn parse_response(body: &Value) -> Result<String, MergeError> {
    if let Some(message) = error_message(body) {
        return Err(MergeError::Service(message));
    }

    let parts = body
        .get("candidates")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|candidate| candidate.get("content")?.get("parts")?.as_array())
        .flatten();

    for part in parts {
        let data = part
            .get("inlineData")
            .or_else(|| part.get("inline_data"))
            .and_then(|inline| inline.get("data"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        if !data.is_empty() {
            return Ok(data.to_owned());
        }
    }

    if let Some(reason) = body
        .get("promptFeedback")
        .and_then(|feedback| feedback.get("blockReason"))
        .and_then(Value::as_str)
    {
        tracing::warn!(%reason, "prompt blocked by the image service");
    }
    Err(MergeError::NoImage)
}

/// The `error.message` of an error envelope, if present and non-blank.
#[must_use]
pub fn error_message(body: &Value) -> Option<String> {
    body.get("error")?
        .get("message")?
        .as_str()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
}

/// Merges photos by calling a Gemini image model.
#[derive(Debug, Clone)]
pub struct GeminiMergeService {
    client: reqwest::Client,
    config: MergeConfig,
}

impl GeminiMergeService {
    /// Create a service for `config`.
    #[must_use]
    pub fn new(config: MergeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait(?Send)]
impl MergeService for GeminiMergeService {
    async fn merge(&self, request: &MergeRequest) -> Result<String, MergeError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(MergeError::MissingApiKey);
        };
        let body = build_request_body(request)?;
        let url = self.config.endpoint();
        tracing::debug!(%url, ticket = %request.ticket, "posting merge request");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| MergeError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| MergeError::Transport(e.to_string()))?;
        let parsed = serde_json::from_str::<Value>(&text);

        if !status.is_success() {
            return Err(parsed
                .ok()
                .as_ref()
                .and_then(error_message)
                .map_or(
                    MergeError::Status {
                        status: status.as_u16(),
                    },
                    MergeError::Service,
                ));
        }

        let value = parsed.map_err(|e| MergeError::InvalidResponse(e.to_string()))?;
        parse_response(&value)
    }
}
