//! Studio error types.

use {narrator_vault::VaultError, narrator_voice::VoiceError};

/// Errors surfaced to the UI layer.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// Nothing to say.
    #[error("prompt is empty")]
    EmptyPrompt,

    /// Prompt exceeds the configured limit.
    #[error("prompt is {len} characters, limit is {max}")]
    PromptTooLong { len: usize, max: usize },

    /// Credential could not be stored or opened.
    #[error(transparent)]
    Vault(#[from] VaultError),

    /// Speech request or audio framing failed.
    #[error(transparent)]
    Voice(#[from] VoiceError),
}

/// Failure categories the UI branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Prompt empty or over the length limit.
    InvalidPrompt,
    /// No API key stored yet.
    CredentialMissing,
    /// Stored blob is not valid base64 or is too short.
    MalformedBlob,
    /// Wrong password or tampered blob.
    AuthenticationFailed,
    /// Random source or cipher unusable.
    CryptoUnavailable,
    /// Audio mime type carried no usable rate.
    SampleRateUnresolvable,
    /// Audio was missing or not 16-bit PCM.
    UnsupportedAudioFormat,
    /// Retries used up on a busy or unreachable service.
    RemoteCallExhausted,
    /// Service refused the request outright.
    RemoteRejected,
    /// Storage, runtime or decoding fault.
    Internal,
}

impl StudioError {
    /// Category of this failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyPrompt | Self::PromptTooLong { .. } => ErrorKind::InvalidPrompt,
            Self::Vault(e) => match e {
                VaultError::CredentialMissing => ErrorKind::CredentialMissing,
                VaultError::MalformedBlob(_) => ErrorKind::MalformedBlob,
                VaultError::AuthenticationFailed => ErrorKind::AuthenticationFailed,
                VaultError::CryptoUnavailable(_) => ErrorKind::CryptoUnavailable,
                VaultError::Database(_) | VaultError::Migration(_) | VaultError::Join(_) => {
                    ErrorKind::Internal
                },
            },
            Self::Voice(e) => match e {
                VoiceError::SampleRateUnresolvable { .. } => ErrorKind::SampleRateUnresolvable,
                VoiceError::UnsupportedAudioFormat { .. } | VoiceError::MissingAudio => {
                    ErrorKind::UnsupportedAudioFormat
                },
                VoiceError::RemoteCallExhausted { .. } => ErrorKind::RemoteCallExhausted,
                VoiceError::Remote { .. } => ErrorKind::RemoteRejected,
                VoiceError::PayloadTooLarge(_)
                | VoiceError::Http(_)
                | VoiceError::Base64(_)
                | VoiceError::Json(_) => ErrorKind::Internal,
            },
        }
    }

    /// Banner text for this failure. Never includes secrets or response bodies.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::InvalidPrompt => "Please enter some text to speak (within the length limit).",
            ErrorKind::CredentialMissing => "No API key is stored. Add one before generating speech.",
            ErrorKind::MalformedBlob => {
                "The stored API key is corrupted. Clear it and enter it again."
            },
            ErrorKind::AuthenticationFailed => {
                "The stored API key could not be unlocked. Check the password or re-enter the key."
            },
            ErrorKind::CryptoUnavailable => "Secure encryption is not available on this system.",
            ErrorKind::SampleRateUnresolvable => {
                "The speech service returned audio without a usable sample rate."
            },
            ErrorKind::UnsupportedAudioFormat => {
                "The speech service returned audio in an unexpected format."
            },
            ErrorKind::RemoteCallExhausted => {
                "The speech service is busy or unreachable. Please try again later."
            },
            ErrorKind::RemoteRejected => {
                "The speech service rejected the request. Check the API key and prompt."
            },
            ErrorKind::Internal => "Something went wrong while generating speech.",
        }
    }
}
