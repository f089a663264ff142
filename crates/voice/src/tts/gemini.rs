//! Gemini text-to-speech provider.
//!
//! Gemini answers `generateContent` with an inline `audio/L16;rate=<n>` part:
//! base64 raw PCM, mono, 16-bit. The payload is framed into WAV before it is
//! handed back.

use {
    async_trait::async_trait,
    narrator_common::codec,
    reqwest::Client,
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
    tracing::{debug, error, warn},
};

use {
    super::{AudioOutput, SynthesizeRequest, TtsProvider, Voice},
    crate::{
        config::GeminiTtsConfig,
        error::VoiceError,
        mime,
        retry::{self, RetryPolicy},
    },
};

/// Gemini API origin.
const API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default TTS model.
const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Default prebuilt voice.
const DEFAULT_VOICE: &str = "Kore";

/// Prebuilt Gemini voices and their style.
const VOICES: &[(&str, &str)] = &[
    ("Zephyr", "Bright"),
    ("Puck", "Upbeat"),
    ("Charon", "Informative"),
    ("Kore", "Firm"),
    ("Fenrir", "Excitable"),
    ("Leda", "Youthful"),
    ("Orus", "Firm"),
    ("Aoede", "Breezy"),
    ("Callirrhoe", "Easy-going"),
    ("Autonoe", "Bright"),
    ("Enceladus", "Breathy"),
    ("Iapetus", "Clear"),
    ("Umbriel", "Easy-going"),
    ("Algieba", "Smooth"),
    ("Despina", "Smooth"),
    ("Erinome", "Clear"),
    ("Algenib", "Gravelly"),
    ("Rasalgethi", "Informative"),
    ("Laomedeia", "Upbeat"),
    ("Achernar", "Soft"),
    ("Alnilam", "Firm"),
    ("Schedar", "Even"),
    ("Gacrux", "Mature"),
    ("Pulcherrima", "Forward"),
    ("Achird", "Friendly"),
    ("Zubenelgenubi", "Casual"),
    ("Vindemiatrix", "Gentle"),
    ("Sadachbia", "Lively"),
    ("Sadaltager", "Knowledgeable"),
    ("Sulafat", "Warm"),
];

/// Gemini TTS provider.
#[derive(Clone)]
pub struct GeminiTts {
    client: Client,
    base_url: String,
    default_model: String,
    default_voice: String,
    retry: RetryPolicy,
}

impl std::fmt::Debug for GeminiTts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiTts")
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("default_voice", &self.default_voice)
            .field("retry", &self.retry)
            .finish()
    }
}

impl Default for GeminiTts {
    fn default() -> Self {
        Self::new(&GeminiTtsConfig::default(), RetryPolicy::default())
    }
}

impl GeminiTts {
    /// Create a new Gemini TTS provider from config.
    #[must_use]
    pub fn new(config: &GeminiTtsConfig, retry: RetryPolicy) -> Self {
        Self {
            client: Client::new(),
            base_url: config
                .base_url
                .as_deref()
                .unwrap_or(API_BASE)
                .trim_end_matches('/')
                .to_string(),
            default_model: config
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.into()),
            default_voice: config
                .voice
                .clone()
                .unwrap_or_else(|| DEFAULT_VOICE.into()),
            retry,
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    /// POST `body`, retrying 429 / 5xx / transport failures per the policy.
    async fn generate_with_retry(
        &self,
        api_key: &Secret<String>,
        url: &str,
        body: &GenerateContentRequest<'_>,
    ) -> Result<GenerateContentResponse, VoiceError> {
        let max_attempts = self.retry.max_attempts();
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            let last_status = match self
                .client
                .post(url)
                .header("x-goog-api-key", api_key.expose_secret())
                .json(body)
                .send()
                .await
            {
                Ok(resp) if resp.status().is_success() => {
                    debug!(attempt, "speech API request succeeded");
                    return Ok(resp.json().await?);
                },
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    let text = match resp.text().await {
                        Ok(text) => text,
                        Err(e) => {
                            warn!(status, error = %e, "failed to read speech API error body");
                            String::new()
                        },
                    };
                    if !retry::is_retryable(status) {
                        error!(status, "speech API rejected request");
                        return Err(VoiceError::Remote { status, body: text });
                    }
                    Some(status)
                },
                Err(e) => {
                    warn!(attempt, error = %e, "speech API request failed to send");
                    None
                },
            };

            if attempt >= max_attempts {
                error!(
                    attempts = attempt,
                    last_status, "speech API retries exhausted"
                );
                return Err(VoiceError::RemoteCallExhausted {
                    attempts: attempt,
                    last_status,
                });
            }

            let wait = self.retry.delay_for_retry(attempt - 1);
            warn!(
                attempt,
                max_attempts,
                last_status,
                wait_ms = wait.as_millis() as u64,
                "speech API call failed, waiting before retry"
            );
            tokio::time::sleep(wait).await;
        }
    }
}

#[async_trait]
impl TtsProvider for GeminiTts {
    fn id(&self) -> &'static str {
        "gemini"
    }

    fn name(&self) -> &'static str {
        "Gemini TTS"
    }

    fn voices(&self) -> Vec<Voice> {
        VOICES
            .iter()
            .map(|(id, style)| Voice {
                id: (*id).into(),
                name: (*id).into(),
                description: Some((*style).into()),
            })
            .collect()
    }

    async fn synthesize(
        &self,
        api_key: &Secret<String>,
        request: SynthesizeRequest,
    ) -> Result<AudioOutput, VoiceError> {
        let model = request.model.as_deref().unwrap_or(&self.default_model);
        let voice = request.voice_id.as_deref().unwrap_or(&self.default_voice);

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![TextPart {
                    text: &request.text,
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: &["AUDIO"],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig { voice_name: voice },
                    },
                },
            },
        };

        debug!(model, voice, chars = request.text.len(), "requesting speech");
        let resp = self
            .generate_with_retry(api_key, &self.endpoint(model), &body)
            .await?;

        let inline = resp.into_inline_audio().ok_or(VoiceError::MissingAudio)?;
        let sample_rate = mime::parse_sample_rate(&inline.mime_type)?;
        let pcm = codec::decode_base64(&inline.data)?;

        debug!(
            pcm_bytes = pcm.len(),
            sample_rate = sample_rate.hz(),
            "speech received"
        );
        AudioOutput::wav_from_pcm(&pcm, sample_rate)
    }
}

// ── API request/response types ─────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_modalities: &'a [&'a str],
    speech_config: SpeechConfig<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig<'a> {
    voice_config: VoiceConfig<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig<'a> {
    prebuilt_voice_config: PrebuiltVoiceConfig<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig<'a> {
    voice_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// First inline data part of the first candidate.
    fn into_inline_audio(self) -> Option<InlineData> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|part| part.inline_data)
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::wav::HEADER_LEN,
        std::time::Duration,
        wiremock::{
            Mock, MockServer, ResponseTemplate,
            matchers::{body_partial_json, header, method, path},
        },
    };

    const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash-preview-tts:generateContent";

    fn key() -> Secret<String> {
        Secret::new("test-key".into())
    }

    fn provider(server: &MockServer, max_retries: u32) -> GeminiTts {
        let config = GeminiTtsConfig {
            base_url: Some(server.uri()),
            ..Default::default()
        };
        GeminiTts::new(&config, RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        })
    }

    fn audio_body(mime_type: &str, pcm: &[u8]) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{
                        "inlineData": {
                            "mimeType": mime_type,
                            "data": codec::encode_base64(pcm),
                        }
                    }]
                }
            }]
        })
    }

    fn request(text: &str) -> SynthesizeRequest {
        SynthesizeRequest {
            text: text.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_provider_metadata() {
        let provider = GeminiTts::default();
        assert_eq!(provider.id(), "gemini");
        assert_eq!(provider.name(), "Gemini TTS");
        assert_eq!(provider.voices().len(), VOICES.len());
        assert!(provider.voices().iter().any(|v| v.id == DEFAULT_VOICE));
    }

    #[test]
    fn test_endpoint_uses_base_url() {
        let provider = GeminiTts::new(
            &GeminiTtsConfig {
                base_url: Some("http://localhost:9000/".into()),
                ..Default::default()
            },
            RetryPolicy::default(),
        );
        assert_eq!(
            provider.endpoint("m"),
            "http://localhost:9000/v1beta/models/m:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![TextPart { text: "hi" }],
            }],
            generation_config: GenerationConfig {
                response_modalities: &["AUDIO"],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig { voice_name: "Puck" },
                    },
                },
            },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(
            json["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            "Puck"
        );
    }

    #[tokio::test]
    async fn test_synthesize_frames_pcm() {
        let server = MockServer::start().await;
        let pcm = [0x01u8, 0x00, 0xff, 0x7f];

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"parts": [{"text": "Say hello"}]}],
                "generationConfig": {
                    "responseModalities": ["AUDIO"],
                    "speechConfig": {"voiceConfig": {"prebuiltVoiceConfig": {"voiceName": "Kore"}}}
                }
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(audio_body("audio/L16;codec=pcm;rate=24000", &pcm)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let out = provider(&server, 0)
            .synthesize(&key(), request("Say hello"))
            .await
            .unwrap();

        assert_eq!(out.sample_rate.hz(), 24_000);
        assert_eq!(out.data.len(), HEADER_LEN + pcm.len());
        assert_eq!(&out.data[0..4], b"RIFF");
        assert_eq!(&out.data[HEADER_LEN..], &pcm);
    }

    #[tokio::test]
    async fn test_request_overrides_voice_and_model() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/custom-tts:generateContent"))
            .and(body_partial_json(serde_json::json!({
                "generationConfig": {
                    "speechConfig": {"voiceConfig": {"prebuiltVoiceConfig": {"voiceName": "Puck"}}}
                }
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(audio_body("audio/L16;rate=16000", &[])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let out = provider(&server, 0)
            .synthesize(&key(), SynthesizeRequest {
                text: "hi".into(),
                voice_id: Some("Puck".into()),
                model: Some("custom-tts".into()),
            })
            .await
            .unwrap();

        assert_eq!(out.data.len(), HEADER_LEN);
        assert_eq!(out.duration_ms, 0);
    }

    #[tokio::test]
    async fn test_retries_server_error_then_succeeds() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(audio_body("audio/L16;rate=24000", &[0, 0])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let out = provider(&server, 3)
            .synthesize(&key(), request("hi"))
            .await
            .unwrap();
        assert_eq!(out.data.len(), HEADER_LEN + 2);
    }

    #[tokio::test]
    async fn test_persistent_rate_limit_exhausts_retries() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .expect(3)
            .mount(&server)
            .await;

        let err = provider(&server, 2)
            .synthesize(&key(), request("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, VoiceError::RemoteCallExhausted {
            attempts: 3,
            last_status: Some(429),
        }));
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
            .expect(1)
            .mount(&server)
            .await;

        let err = provider(&server, 5)
            .synthesize(&key(), request("hi"))
            .await
            .unwrap_err();

        match err {
            VoiceError::Remote { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("API key not valid"));
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_exhausts_retries() {
        let config = GeminiTtsConfig {
            base_url: Some("http://127.0.0.1:1".into()),
            ..Default::default()
        };
        let provider = GeminiTts::new(&config, RetryPolicy {
            max_retries: 1,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
        });

        let err = provider.synthesize(&key(), request("hi")).await.unwrap_err();
        assert!(matches!(err, VoiceError::RemoteCallExhausted {
            attempts: 2,
            last_status: None,
        }));
    }

    #[tokio::test]
    async fn test_missing_audio_part() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "no audio here"}]}}]
            })))
            .mount(&server)
            .await;

        let err = provider(&server, 0)
            .synthesize(&key(), request("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, VoiceError::MissingAudio));
    }

    #[tokio::test]
    async fn test_non_pcm_audio_is_unsupported() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(audio_body("audio/mpeg", &[1, 2, 3])),
            )
            .mount(&server)
            .await;

        let err = provider(&server, 0)
            .synthesize(&key(), request("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, VoiceError::UnsupportedAudioFormat { .. }));
    }

    #[tokio::test]
    async fn test_missing_rate_is_unresolvable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(audio_body("audio/L16;codec=pcm", &[0, 0])),
            )
            .mount(&server)
            .await;

        let err = provider(&server, 0)
            .synthesize(&key(), request("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, VoiceError::SampleRateUnresolvable { .. }));
    }
}
