use std::path::Path;
use std::sync::Arc;

use super::preprocess::ModelInput;
use super::PipelineError;

/// Binary MRI classifier: one sigmoid score in [0, 1] per scan,
/// higher meaning tumor.
///
/// Loaded once at startup and shared read-only between requests.
pub trait ImageClassifier: Send + Sync {
    fn predict(&self, input: &ModelInput) -> Result<f32, PipelineError>;
}

// ═══════════════════════════════════════════════════════════
// ONNX classifier, behind `onnx-classifier` feature
// ═══════════════════════════════════════════════════════════

#[cfg(feature = "onnx-classifier")]
mod onnx {
    use super::{ImageClassifier, ModelInput, PipelineError};
    use ort::session::Session;
    use std::path::Path;
    use std::sync::Mutex;

    /// Keras CNN exported to ONNX, run with ONNX Runtime.
    ///
    /// Expects one NHWC float input `[1, 150, 150, 3]` and one `[1, 1]` output.
    /// `Session::run` needs `&mut self`, hence the Mutex.
    pub struct OnnxClassifier {
        session: Mutex<Session>,
    }

    impl OnnxClassifier {
        pub fn load(model_path: &Path) -> Result<Self, PipelineError> {
            if !model_path.exists() {
                return Err(PipelineError::ModelNotFound(model_path.to_path_buf()));
            }

            let session = Session::builder()
                .map_err(|e: ort::Error| PipelineError::ModelInit(e.to_string()))?
                .with_intra_threads(2)
                .map_err(|e: ort::Error| PipelineError::ModelInit(e.to_string()))?
                .commit_from_file(model_path)
                .map_err(|e: ort::Error| {
                    PipelineError::ModelInit(format!("ONNX load failed: {e}"))
                })?;

            tracing::info!("ONNX classifier loaded from {}", model_path.display());

            Ok(Self {
                session: Mutex::new(session),
            })
        }
    }

    impl ImageClassifier for OnnxClassifier {
        fn predict(&self, input: &ModelInput) -> Result<f32, PipelineError> {
            use ort::value::TensorRef;

            let [n, h, w, c] = input.shape();
            let array = ndarray::Array4::from_shape_vec((n, h, w, c), input.data().to_vec())
                .map_err(|e| PipelineError::Classifier(e.to_string()))?;
            let tensor = TensorRef::from_array_view(&array)
                .map_err(|e| PipelineError::Classifier(e.to_string()))?;

            let mut session = self
                .session
                .lock()
                .map_err(|_| PipelineError::Classifier("Session lock poisoned".to_string()))?;

            let outputs = session
                .run(ort::inputs![tensor])
                .map_err(|e| PipelineError::Classifier(format!("ONNX inference failed: {e}")))?;

            let (shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| PipelineError::Classifier(format!("Output extraction: {e}")))?;

            // Single sigmoid unit: [1, 1]
            if data.len() != 1 {
                return Err(PipelineError::Classifier(format!(
                    "Unexpected output shape: {shape:?}, expected [1, 1]"
                )));
            }

            Ok(data[0])
        }
    }
}

#[cfg(feature = "onnx-classifier")]
pub use onnx::OnnxClassifier;

/// Load the production classifier from `model_path`.
///
/// Any failure here is fatal for the process.
pub fn load_classifier(model_path: &Path) -> Result<Arc<dyn ImageClassifier>, PipelineError> {
    #[cfg(feature = "onnx-classifier")]
    {
        Ok(Arc::new(OnnxClassifier::load(model_path)?))
    }

    #[cfg(not(feature = "onnx-classifier"))]
    {
        if !model_path.exists() {
            return Err(PipelineError::ModelNotFound(model_path.to_path_buf()));
        }
        Err(PipelineError::ModelInit(
            "built without the `onnx-classifier` feature".to_string(),
        ))
    }
}

// ═══════════════════════════════════════════════════════════
// Test double
// ═══════════════════════════════════════════════════════════

/// Returns the same score for every scan.
#[derive(Debug, Clone, Copy)]
pub struct FixedScoreClassifier {
    score: f32,
}

impl FixedScoreClassifier {
    pub fn new(score: f32) -> Self {
        Self { score }
    }
}

impl ImageClassifier for FixedScoreClassifier {
    fn predict(&self, input: &ModelInput) -> Result<f32, PipelineError> {
        if input.data().is_empty() {
            return Err(PipelineError::Classifier("empty input tensor".into()));
        }
        Ok(self.score)
    }
}
