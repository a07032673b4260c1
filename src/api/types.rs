//! JSON shapes returned by the API.

use serde::Serialize;

use crate::pipeline::{AnalysisResponse, ArtifactStore, TumorLabel};

/// Text of the standalone premium button. Independent of any analysis.
pub const APPOINTMENT_MESSAGE: &str = "This feature is available for Premium Users.";

/// `POST /api/analyze` body. File outputs are download URLs.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub request_id: String,
    pub result: String,
    pub confidence_html: String,
    pub report_url: Option<String>,
    pub premium: String,
    pub audio_url: Option<String>,
    pub email_status: String,
    pub label: Option<TumorLabel>,
    pub confidence: Option<f64>,
}

impl AnalyzeResponse {
    pub fn from_analysis(request_id: String, analysis: &AnalysisResponse, store: &ArtifactStore) -> Self {
        Self {
            request_id,
            result: analysis.result_text.clone(),
            confidence_html: analysis.confidence_html.clone(),
            report_url: analysis
                .report
                .as_ref()
                .and_then(|r| store.public_url(&r.pdf_path)),
            premium: analysis.premium_message.clone(),
            audio_url: analysis.audio_path().and_then(|p| store.public_url(p)),
            email_status: analysis.email_status.clone(),
            label: analysis.prediction.map(|p| p.label),
            confidence: analysis.prediction.map(|p| p.confidence),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
