//! Text-to-Speech provider abstraction and implementations.

mod gemini;

pub use gemini::GeminiTts;

use {
    async_trait::async_trait,
    bytes::Bytes,
    secrecy::Secret,
    serde::{Deserialize, Serialize},
};

use crate::{
    error::VoiceError,
    wav::{self, SampleRate},
};

/// A voice available from a TTS provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voice {
    /// Provider-specific voice identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Optional description or tags.
    pub description: Option<String>,
}

/// Audio output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// RIFF/WAVE container around 16-bit PCM.
    #[default]
    Wav,
}

impl AudioFormat {
    /// MIME type for this format.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
        }
    }

    /// File extension for this format.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
        }
    }
}

/// Request to synthesize speech from text.
#[derive(Debug, Clone, Default)]
pub struct SynthesizeRequest {
    /// Text to convert to speech.
    pub text: String,
    /// Voice ID (provider-specific).
    pub voice_id: Option<String>,
    /// Model to use (provider-specific).
    pub model: Option<String>,
}

/// Audio output from TTS synthesis.
#[derive(Debug, Clone)]
pub struct AudioOutput {
    /// Encoded audio data.
    pub data: Bytes,
    /// Audio format.
    pub format: AudioFormat,
    /// Sample rate of the payload.
    pub sample_rate: SampleRate,
    /// Playback duration in milliseconds, from the payload length.
    pub duration_ms: u64,
}

impl AudioOutput {
    /// Frame raw PCM into a playable WAV output.
    pub fn wav_from_pcm(pcm: &[u8], sample_rate: SampleRate) -> Result<Self, VoiceError> {
        Ok(Self {
            data: wav::frame(pcm, sample_rate)?,
            format: AudioFormat::Wav,
            sample_rate,
            duration_ms: wav::duration_ms(pcm.len(), sample_rate),
        })
    }
}

/// Text-to-Speech provider trait.
///
/// The API key is passed on every call rather than held by the provider, so
/// callers can open the stored credential per request and drop it afterwards.
#[async_trait]
pub trait TtsProvider: Send + Sync {
    /// Provider identifier (e.g., "gemini").
    fn id(&self) -> &'static str;

    /// Human-readable provider name.
    fn name(&self) -> &'static str;

    /// Voices this provider offers.
    fn voices(&self) -> Vec<Voice>;

    /// Convert text to speech.
    async fn synthesize(
        &self,
        api_key: &Secret<String>,
        request: SynthesizeRequest,
    ) -> Result<AudioOutput, VoiceError>;
}
