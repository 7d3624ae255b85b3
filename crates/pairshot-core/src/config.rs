//! Image generation service configuration.
//!
//! A WASM bundle has no process environment at runtime, so
//! [`MergeConfig::from_build_env`] captures overrides when the crate is
//! compiled.

use serde::{Deserialize, Serialize};

/// Default REST endpoint prefix of the Gemini API.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default image-capable model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Default per-file upload limit. Inline request data is capped at
/// 20 MiB by the service.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Settings for the merge service and upload capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Endpoint prefix, without a trailing slash.
    pub api_base: String,

    /// Model name, with or without the `models/` prefix.
    pub model: String,

    /// API key sent in the `x-goog-api-key` header. Requests are refused
    /// locally when this is `None`.
    pub api_key: Option<String>,

    /// Largest file, in bytes, accepted by the uploaders.
    pub max_upload_bytes: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            api_key: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl MergeConfig {
    /// Defaults overridden by `PAIRSHOT_API_KEY`, `PAIRSHOT_API_BASE` and
    /// `PAIRSHOT_MODEL` as set when this crate was compiled.
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::default().with_overrides(
            option_env!("PAIRSHOT_API_KEY"),
            option_env!("PAIRSHOT_API_BASE"),
            option_env!("PAIRSHOT_MODEL"),
        )
    }

    /// Apply optional overrides. Blank values are ignored.
    #[must_use]
    pub fn with_overrides(
        mut self,
        api_key: Option<&str>,
        api_base: Option<&str>,
        model: Option<&str>,
    ) -> Self {
        if let Some(key) = non_blank(api_key) {
            self.api_key = Some(key.to_owned());
        }
        if let Some(base) = non_blank(api_base) {
            self.api_base = base.trim_end_matches('/').to_owned();
        }
        if let Some(model) = non_blank(model) {
            self.model = model.to_owned();
        }
        self
    }

    /// Full `generateContent` endpoint for the configured model.
    #[must_use]
    pub fn endpoint(&self) -> String {
        let model = self.model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_owned()
        } else {
            format!("models/{model}")
        };
        format!("{}/{model_path}:generateContent", self.api_base)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_targets_image_model() {
        let config = MergeConfig::default();
        assert_eq!(
            config.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-image-preview:generateContent"
        );
        assert!(config.api_key.is_none());
    }

    #[test]
    fn model_prefix_is_not_doubled() {
        let config = MergeConfig::default().with_overrides(None, None, Some("models/custom"));
        assert!(config.endpoint().ends_with("/models/custom:generateContent"));
    }

    #[test]
    fn overrides_skip_blank_values_and_trim_base() {
        let config = MergeConfig::default().with_overrides(
            Some("  "),
            Some("http://localhost:8080/v1/"),
            Some(""),
        );
        assert_eq!(config.api_key, None);
        assert_eq!(config.api_base, "http://localhost:8080/v1");
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: MergeConfig = serde_json::from_str(r#"{"api_key":"k"}"#).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }
}
