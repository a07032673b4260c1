//! Process-wide application state.
//!
//! Built once at startup (classifier load, synthesizer, artifact store) and
//! shared read-only with every handler behind `Arc`. The only mutable piece
//! is the analysis lock, which serializes requests so each one runs to
//! completion before the next starts.

use std::sync::Arc;

use crate::config::{AppConfig, ConfigError};
use crate::pipeline::report::ReportFont;
use crate::pipeline::speech::{DisabledSynthesizer, SpeechSynthesizer, TranslateTtsClient};
use crate::pipeline::{load_classifier, ArtifactStore, ImageClassifier, Pipeline, PipelineError};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cannot prepare artifact directory {path}: {source}")]
    ArtifactDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Classifier load failed: {0}")]
    Classifier(#[from] PipelineError),

    #[error("Server failed to start: {0}")]
    Server(String),
}

/// Shared by all axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    /// Held for the whole analysis; one request at a time.
    pub analyze_lock: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    /// Wire the production collaborators from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let store = ArtifactStore::open(&config.artifact_dir).map_err(|source| {
            StartupError::ArtifactDir {
                path: config.artifact_dir.display().to_string(),
                source,
            }
        })?;

        let classifier = load_classifier(&config.model_path)?;

        let synthesizer: Arc<dyn SpeechSynthesizer> = if config.tts_enabled {
            Arc::new(TranslateTtsClient::new(&config.tts_endpoint, config.tts_timeout))
        } else {
            tracing::info!("Speech synthesis disabled by configuration");
            Arc::new(DisabledSynthesizer)
        };

        let font = match &config.report_font {
            Some(path) => ReportFont::External(path.clone()),
            None => ReportFont::Builtin,
        };

        tracing::info!(
            model = %config.model_path.display(),
            artifacts = %store.dir().display(),
            tts = config.tts_enabled,
            "Application state ready"
        );

        Ok(Self::new(
            Pipeline::new(classifier, synthesizer, store).with_report_font(font),
        ))
    }

    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            analyze_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// State with caller-supplied collaborators (tests, embedding).
    pub fn with_collaborators(
        classifier: Arc<dyn ImageClassifier>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        store: ArtifactStore,
    ) -> Self {
        Self::new(Pipeline::new(classifier, synthesizer, store))
    }
}
