use std::fmt;
use std::path::Path;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use super::report::ReportArtifact;
use super::speech::VoiceOutcome;
use super::PipelineError;
use crate::config::DECISION_THRESHOLD;
use crate::i18n::{Language, TextKey};

/// Shown instead of a result when the image, name or age is missing.
pub const GUIDANCE_MESSAGE: &str = "Please provide all details.";

// ═══════════════════════════════════════════════════════════
// Classification
// ═══════════════════════════════════════════════════════════

/// Binary outcome of the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TumorLabel {
    Tumor,
    NoTumor,
}

impl TumorLabel {
    /// Advice line printed on the report.
    pub fn advice_key(self) -> TextKey {
        match self {
            Self::Tumor => TextKey::AdviceYes,
            Self::NoTumor => TextKey::AdviceNo,
        }
    }

    /// Premium message shown next to the result.
    pub fn premium_key(self) -> TextKey {
        match self {
            Self::Tumor => TextKey::PremiumText,
            Self::NoTumor => TextKey::NoPremium,
        }
    }
}

impl fmt::Display for TumorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tumor => write!(f, "Tumor"),
            Self::NoTumor => write!(f, "No Tumor"),
        }
    }
}

/// Label plus confidence relative to the winning side of the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: TumorLabel,
    /// Percentage in [50, 100].
    pub confidence: f64,
    /// Sigmoid output as returned by the classifier.
    pub raw_score: f32,
}

impl Prediction {
    /// Apply the decision rule to a raw score in [0, 1].
    ///
    /// Tumor iff `score > 0.5`; exactly 0.5 resolves to no tumor.
    pub fn from_score(score: f32) -> Result<Self, PipelineError> {
        // NaN also fails the range check.
        if !(0.0..=1.0).contains(&score) {
            return Err(PipelineError::InvalidScore(score));
        }

        let p = f64::from(score);
        let (label, confidence) = if score > DECISION_THRESHOLD {
            (TumorLabel::Tumor, p * 100.0)
        } else {
            (TumorLabel::NoTumor, (1.0 - p) * 100.0)
        };

        Ok(Self {
            label,
            confidence,
            raw_score: score,
        })
    }

    /// Confidence with two decimals, e.g. `82.00`.
    pub fn confidence_text(&self) -> String {
        format!("{:.2}", self.confidence)
    }
}

// ═══════════════════════════════════════════════════════════
// Request / response
// ═══════════════════════════════════════════════════════════

/// One form submission. Transient: built per call, dropped afterwards.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub image: Option<DynamicImage>,
    pub patient_name: String,
    pub patient_age: String,
    /// Optional; empty when not supplied.
    pub email: String,
    pub language: Language,
}

impl AnalysisRequest {
    /// Name and age are only checked for emptiness. Age is free text.
    pub fn is_complete(&self) -> bool {
        self.image.is_some() && !self.patient_name.is_empty() && !self.patient_age.is_empty()
    }
}

/// The six outputs shown on the page, plus the prediction they were
/// derived from.
#[derive(Debug, Default)]
pub struct AnalysisResponse {
    pub result_text: String,
    pub confidence_html: String,
    pub report: Option<ReportArtifact>,
    pub premium_message: String,
    /// `None` only for incomplete requests.
    pub voice: Option<VoiceOutcome>,
    pub email_status: String,
    pub prediction: Option<Prediction>,
}

impl AnalysisResponse {
    /// Guidance message with every other output empty.
    pub fn incomplete() -> Self {
        Self {
            result_text: GUIDANCE_MESSAGE.to_string(),
            ..Self::default()
        }
    }

    pub fn is_incomplete(&self) -> bool {
        self.prediction.is_none()
    }

    /// Audio file path when synthesis succeeded.
    pub fn audio_path(&self) -> Option<&Path> {
        self.voice
            .as_ref()
            .and_then(VoiceOutcome::artifact)
            .map(|a| a.audio_path.as_path())
    }
}
