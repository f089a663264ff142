//! Credential + provider orchestration.

use std::sync::Arc;

use {
    narrator_vault::{
        CredentialStore, CryptoBackend, KeyValueStore, RustCryptoBackend, VaultError,
    },
    narrator_voice::{AudioOutput, SynthesizeRequest, TtsProvider},
    secrecy::{ExposeSecret, Secret},
    tracing::{error, info},
};

use crate::error::StudioError;

/// Default prompt length limit in characters.
const DEFAULT_MAX_TEXT_LENGTH: usize = 5000;

/// Speech generation front door.
///
/// The password seals and opens the stored credential; it is supplied by the
/// caller and never written anywhere.
pub struct Studio<B: CryptoBackend = RustCryptoBackend> {
    credentials: CredentialStore<B>,
    provider: Arc<dyn TtsProvider>,
    password: Secret<String>,
    max_text_length: usize,
}

impl Studio<RustCryptoBackend> {
    /// Studio over `store` with the default cipher.
    #[must_use]
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        provider: Arc<dyn TtsProvider>,
        password: Secret<String>,
    ) -> Self {
        Self::with_credentials(CredentialStore::new(store), provider, password)
    }
}

impl<B: CryptoBackend + Clone + 'static> Studio<B> {
    /// Studio over a pre-built credential store.
    #[must_use]
    pub fn with_credentials(
        credentials: CredentialStore<B>,
        provider: Arc<dyn TtsProvider>,
        password: Secret<String>,
    ) -> Self {
        Self {
            credentials,
            provider,
            password,
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
        }
    }

    /// Override the prompt length limit.
    #[must_use]
    pub fn with_max_text_length(mut self, max_text_length: usize) -> Self {
        self.max_text_length = max_text_length;
        self
    }

    /// Whether an API key is stored.
    pub async fn has_credential(&self) -> Result<bool, StudioError> {
        Ok(self.credentials.exists().await?)
    }

    /// Seal and store an API key entered by the user.
    ///
    /// A blank entry counts as no credential and stores nothing.
    pub async fn set_credential(&self, api_key: &str) -> Result<(), StudioError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(VaultError::CredentialMissing.into());
        }

        self.credentials
            .save(api_key, self.password.expose_secret())
            .await?;
        Ok(())
    }

    /// Forget the stored API key.
    pub async fn clear_credential(&self) -> Result<(), StudioError> {
        Ok(self.credentials.clear().await?)
    }

    /// Generate speech for `text`.
    ///
    /// Opens the credential once for this request; the provider retries with
    /// the same key.
    pub async fn speak(&self, text: &str, voice: Option<&str>) -> Result<AudioOutput, StudioError> {
        let result = self.speak_inner(text, voice).await;
        if let Err(ref e) = result {
            error!(kind = ?e.kind(), error = %e, "speech generation failed");
        }
        result
    }

    async fn speak_inner(
        &self,
        text: &str,
        voice: Option<&str>,
    ) -> Result<AudioOutput, StudioError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StudioError::EmptyPrompt);
        }
        let len = text.chars().count();
        if len > self.max_text_length {
            return Err(StudioError::PromptTooLong {
                len,
                max: self.max_text_length,
            });
        }

        let api_key = Secret::new(
            self.credentials
                .load(self.password.expose_secret())
                .await?,
        );

        let request = SynthesizeRequest {
            text: text.to_string(),
            voice_id: voice.map(str::to_string),
            model: None,
        };
        let audio = self.provider.synthesize(&api_key, request).await?;

        info!(
            provider = self.provider.id(),
            mime = audio.format.mime_type(),
            bytes = audio.data.len(),
            sample_rate = audio.sample_rate.hz(),
            duration_ms = audio.duration_ms,
            "speech generated"
        );
        Ok(audio)
    }
}
