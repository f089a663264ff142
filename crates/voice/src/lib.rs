//! Speech synthesis for narrator: the Gemini TTS client and the PCM → WAV framer.
//!
//! The speech API answers with raw 16-bit mono PCM and a mime type carrying
//! the sample rate; [`wav::frame`] wraps that payload in a standard 44-byte
//! RIFF/WAVE header so any decoder can play it.

pub mod config;
pub mod error;
pub mod mime;
pub mod retry;
pub mod tts;
pub mod wav;

pub use {
    config::{GeminiTtsConfig, RetryConfig, TtsConfig},
    error::VoiceError,
    mime::parse_sample_rate,
    retry::RetryPolicy,
    tts::{AudioFormat, AudioOutput, GeminiTts, SynthesizeRequest, TtsProvider, Voice},
    wav::SampleRate,
};
