//! Inference-and-report pipeline: one MRI scan in, result line, confidence
//! bar, PDF report, voice summary and simulated messages out.

pub mod types;
pub mod artifacts;
pub mod preprocess;
pub mod classifier;
pub mod report;
pub mod speech;
pub mod markup;
pub mod orchestrator;

pub use types::*;
pub use artifacts::ArtifactStore;
pub use classifier::*;
pub use orchestrator::*;

use std::path::PathBuf;

use thiserror::Error;

/// Fatal pipeline failures. Missing form input is not an error (it yields
/// a guidance response) and speech failures degrade instead of erroring.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Classifier model not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("Classifier initialization: {0}")]
    ModelInit(String),

    #[error("Classifier inference failed: {0}")]
    Classifier(String),

    #[error("Classifier returned score outside [0, 1]: {0}")]
    InvalidScore(f32),

    #[error("QR code generation failed: {0}")]
    Qr(String),

    #[error("Report rendering failed: {0}")]
    Report(String),
}
