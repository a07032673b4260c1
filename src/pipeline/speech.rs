//! Voice summary of the result, best effort.
//!
//! Synthesis goes through a remote text-to-speech endpoint. Every failure is
//! turned into [`VoiceOutcome::Degraded`] by [`synthesize_best_effort`]; the
//! pipeline never fails because audio could not be produced.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use super::artifacts::ArtifactStore;

/// Generated audio file.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceArtifact {
    pub audio_path: PathBuf,
    pub locale: String,
    pub text: String,
}

/// Result of the best-effort speech step.
#[derive(Debug, Clone)]
pub enum VoiceOutcome {
    Synthesized(VoiceArtifact),
    /// No audio. The reason is for logs, not for the patient.
    Degraded { reason: String },
}

impl VoiceOutcome {
    pub fn artifact(&self) -> Option<&VoiceArtifact> {
        match self {
            Self::Synthesized(artifact) => Some(artifact),
            Self::Degraded { .. } => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("Speech synthesis disabled")]
    Disabled,

    #[error("Nothing to synthesize")]
    EmptyText,

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Speech endpoint error (HTTP {status})")]
    Endpoint { status: u16 },

    #[error("Speech endpoint returned no audio")]
    EmptyAudio,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text-to-speech engine.
pub trait SpeechSynthesizer: Send + Sync {
    /// Speak `text` in `locale` and store the audio in `store`.
    fn synthesize(
        &self,
        text: &str,
        locale: &str,
        store: &ArtifactStore,
    ) -> Result<VoiceArtifact, SpeechError>;
}

/// Run `synth`, downgrading any error to [`VoiceOutcome::Degraded`].
pub fn synthesize_best_effort(
    synth: &dyn SpeechSynthesizer,
    text: &str,
    locale: &str,
    store: &ArtifactStore,
) -> VoiceOutcome {
    match synth.synthesize(text, locale, store) {
        Ok(artifact) => {
            tracing::debug!(locale, path = %artifact.audio_path.display(), "Voice summary synthesized");
            VoiceOutcome::Synthesized(artifact)
        }
        Err(e) => {
            tracing::warn!(locale, error = %e, "Voice summary unavailable");
            VoiceOutcome::Degraded {
                reason: e.to_string(),
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Google Translate TTS client
// ═══════════════════════════════════════════════════════════

/// Client for the `translate_tts` endpoint (MP3 response).
#[derive(Debug, Clone)]
pub struct TranslateTtsClient {
    endpoint: String,
    timeout: Duration,
}

impl TranslateTtsClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Built per call so the blocking client never lives inside the async
    /// runtime.
    fn client(&self) -> Result<reqwest::blocking::Client, SpeechError> {
        reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| SpeechError::HttpClient(e.to_string()))
    }
}

impl SpeechSynthesizer for TranslateTtsClient {
    fn synthesize(
        &self,
        text: &str,
        locale: &str,
        store: &ArtifactStore,
    ) -> Result<VoiceArtifact, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let response = self
            .client()?
            .get(&self.endpoint)
            .query(&[("ie", "UTF-8"), ("client", "tw-ob"), ("tl", locale), ("q", text)])
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    SpeechError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout.as_secs()
                    ))
                } else {
                    SpeechError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Endpoint {
                status: status.as_u16(),
            });
        }

        let audio = response
            .bytes()
            .map_err(|e| SpeechError::HttpClient(e.to_string()))?;
        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }

        let audio_path = store.write("voice-", ".mp3", &audio)?;

        Ok(VoiceArtifact {
            audio_path,
            locale: locale.to_string(),
            text: text.to_string(),
        })
    }
}

// ═══════════════════════════════════════════════════════════
// Offline synthesizers
// ═══════════════════════════════════════════════════════════

/// Used when speech is turned off in configuration. Always degrades.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSynthesizer;

impl SpeechSynthesizer for DisabledSynthesizer {
    fn synthesize(
        &self,
        _text: &str,
        _locale: &str,
        _store: &ArtifactStore,
    ) -> Result<VoiceArtifact, SpeechError> {
        Err(SpeechError::Disabled)
    }
}

/// Writes the same bytes for every request. Test double.
#[derive(Debug, Clone)]
pub struct StaticAudioSynthesizer {
    audio: Vec<u8>,
}

impl StaticAudioSynthesizer {
    pub fn new(audio: impl Into<Vec<u8>>) -> Self {
        Self {
            audio: audio.into(),
        }
    }
}

impl SpeechSynthesizer for StaticAudioSynthesizer {
    fn synthesize(
        &self,
        text: &str,
        locale: &str,
        store: &ArtifactStore,
    ) -> Result<VoiceArtifact, SpeechError> {
        let audio_path = store.write("voice-", ".mp3", &self.audio)?;
        Ok(VoiceArtifact {
            audio_path,
            locale: locale.to_string(),
            text: text.to_string(),
        })
    }
}
