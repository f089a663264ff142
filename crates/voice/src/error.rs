//! Voice error types.

/// Errors produced while requesting or framing synthesized speech.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// The audio mime type carries no usable `rate` parameter.
    #[error("no usable sample rate in audio mime type {mime_type:?}")]
    SampleRateUnresolvable { mime_type: String },

    /// Audio is present but not raw 16-bit PCM.
    #[error("unsupported audio format {mime_type:?}, expected audio/L16")]
    UnsupportedAudioFormat { mime_type: String },

    /// The payload does not fit the 32-bit WAV size fields.
    #[error("PCM payload of {0} bytes is too large for a WAV container")]
    PayloadTooLarge(usize),

    /// The response carried no inline audio part.
    #[error("speech response contained no audio")]
    MissingAudio,

    /// Every attempt hit a retryable failure.
    #[error("speech request gave up after {attempts} attempts{}", status_suffix(.last_status))]
    RemoteCallExhausted {
        attempts: u32,
        last_status: Option<u16>,
    },

    /// The API rejected the request with a non-retryable status.
    #[error("speech API error {status}: {body}")]
    Remote { status: u16, body: String },

    /// HTTP client error outside the retry loop (e.g. an undecodable body).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The audio payload is not valid base64.
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (last status {s})")).unwrap_or_default()
}
