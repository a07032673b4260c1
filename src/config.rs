use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Brainscan";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Square input resolution the trained classifier expects (150x150 RGB).
/// Fixed by the model artifact, not tunable per request.
pub const MODEL_INPUT_SIZE: u32 = 150;

/// Raw scores strictly above this are labelled as tumor.
pub const DECISION_THRESHOLD: f32 = 0.5;

/// Link encoded in the report's QR code. Independent of request data.
pub const REPORT_QR_URL: &str = "https://huggingface.co/spaces/your-space-name";

/// Default location of the exported classifier.
pub const DEFAULT_MODEL_PATH: &str = "brain_tumor_model.onnx";

/// Default listen address (same port the hosted demo used).
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:7860";

/// Google Translate speech endpoint (the one gTTS-style clients use).
pub const DEFAULT_TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";

const DEFAULT_TTS_TIMEOUT_SECS: u64 = 15;

/// Fallback `EnvFilter` directive when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,brainscan_lib=debug"
}

/// Directory for generated reports, QR images and audio files.
pub fn default_artifact_dir() -> PathBuf {
    std::env::temp_dir().join("brainscan")
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub model_path: PathBuf,
    pub artifact_dir: PathBuf,
    pub tts_enabled: bool,
    pub tts_endpoint: String,
    pub tts_timeout: Duration,
    /// TTF/OTF embedded into reports. Builtin Helvetica when `None`,
    /// which cannot draw the Urdu script.
    pub report_font: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 7860))),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            artifact_dir: default_artifact_dir(),
            tts_enabled: true,
            tts_endpoint: DEFAULT_TTS_ENDPOINT.to_string(),
            tts_timeout: Duration::from_secs(DEFAULT_TTS_TIMEOUT_SECS),
            report_font: None,
        }
    }
}

impl AppConfig {
    /// Build from `BRAINSCAN_*` environment variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("BRAINSCAN_ADDR") {
            config.bind_addr = value.parse().map_err(|_| ConfigError::InvalidValue {
                var: "BRAINSCAN_ADDR",
                value,
            })?;
        }
        if let Some(value) = lookup("BRAINSCAN_MODEL_PATH") {
            config.model_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("BRAINSCAN_ARTIFACT_DIR") {
            config.artifact_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("BRAINSCAN_TTS") {
            config.tts_enabled = match value.to_ascii_lowercase().as_str() {
                "on" | "1" | "true" => true,
                "off" | "0" | "false" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "BRAINSCAN_TTS",
                        value,
                    })
                }
            };
        }
        if let Some(value) = lookup("BRAINSCAN_TTS_ENDPOINT") {
            config.tts_endpoint = value;
        }
        if let Some(value) = lookup("BRAINSCAN_TTS_TIMEOUT_SECS") {
            let secs: u64 = value.parse().map_err(|_| ConfigError::InvalidValue {
                var: "BRAINSCAN_TTS_TIMEOUT_SECS",
                value,
            })?;
            config.tts_timeout = Duration::from_secs(secs);
        }
        if let Some(value) = lookup("BRAINSCAN_REPORT_FONT") {
            if !value.is_empty() {
                config.report_font = Some(PathBuf::from(value));
            }
        }

        Ok(config)
    }
}
