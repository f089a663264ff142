//! Voice configuration types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

/// Text-to-Speech configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    /// Provider id. Only "gemini" is available.
    pub provider: String,

    /// Max prompt length before the request is refused (characters).
    pub max_text_length: usize,

    /// Gemini TTS settings.
    pub gemini: GeminiTtsConfig,

    /// Backoff for retryable API failures.
    pub retry: RetryConfig,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".into(),
            max_text_length: 5000,
            gemini: GeminiTtsConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

/// Gemini TTS provider configuration.
///
/// The API key is not configured here; it lives sealed in the vault.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiTtsConfig {
    /// Model to use (e.g., "gemini-2.5-flash-preview-tts").
    pub model: Option<String>,

    /// Default prebuilt voice name (e.g., "Kore").
    pub voice: Option<String>,

    /// API origin override, mainly for proxies and tests.
    pub base_url: Option<String>,
}

/// Retry settings in config-friendly units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,

    /// First backoff delay in milliseconds.
    pub base_delay_ms: u64,

    /// Backoff cap in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_retries: policy.max_retries,
            base_delay_ms: policy.base_delay.as_millis() as u64,
            max_delay_ms: policy.max_delay.as_millis() as u64,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}
