use std::sync::Arc;

use chrono::{Local, NaiveDateTime};

use super::artifacts::ArtifactStore;
use super::classifier::ImageClassifier;
use super::markup::confidence_bar;
use super::preprocess::prepare;
use super::report::{render_report, ReportContent, ReportFont};
use super::speech::{synthesize_best_effort, SpeechSynthesizer};
use super::types::{AnalysisRequest, AnalysisResponse, Prediction};
use super::PipelineError;
use crate::i18n::{email_status, t, TextKey};

/// Runs one scan through classification, report, voice and messages.
///
/// Collaborators are injected as trait objects so tests can swap in
/// fixed-score classifiers and offline synthesizers.
pub struct Pipeline {
    classifier: Arc<dyn ImageClassifier>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    store: ArtifactStore,
    report_font: ReportFont,
}

impl Pipeline {
    pub fn new(
        classifier: Arc<dyn ImageClassifier>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        store: ArtifactStore,
    ) -> Self {
        Self {
            classifier,
            synthesizer,
            store,
            report_font: ReportFont::Builtin,
        }
    }

    /// Embed a font into reports instead of builtin Helvetica.
    pub fn with_report_font(mut self, font: ReportFont) -> Self {
        self.report_font = font;
        self
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Classify the scan and build every output.
    ///
    /// Missing image, name or age yields [`AnalysisResponse::incomplete`].
    /// Speech failures degrade; all other failures are returned as errors.
    pub fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, PipelineError> {
        self.analyze_at(request, Local::now().naive_local())
    }

    pub(crate) fn analyze_at(
        &self,
        request: AnalysisRequest,
        generated_at: NaiveDateTime,
    ) -> Result<AnalysisResponse, PipelineError> {
        if !request.is_complete() {
            tracing::info!("Analysis skipped: image, name or age missing");
            return Ok(AnalysisResponse::incomplete());
        }
        let AnalysisRequest {
            image,
            patient_name,
            patient_age,
            email,
            language,
        } = request;
        let Some(image) = image else {
            return Ok(AnalysisResponse::incomplete());
        };

        // Step 1-3: preprocess + classify
        let input = prepare(&image)?;
        let score = self.classifier.predict(&input)?;

        // Step 4: decision rule
        let prediction = Prediction::from_score(score)?;
        tracing::info!(
            score,
            label = %prediction.label,
            confidence = prediction.confidence,
            language = %language,
            "Scan classified"
        );

        // Step 5: report
        let content = ReportContent::new(
            &patient_name,
            &patient_age,
            &prediction,
            language,
            generated_at,
        );
        let report = render_report(&self.store, content, &self.report_font)?;

        // Step 6: premium message
        let premium_message = t(language, prediction.label.premium_key()).to_string();

        // Step 7: voice, never fatal
        let tts_text = format!("{} {}", t(language, TextKey::TtsMessage), prediction.label);
        let voice = synthesize_best_effort(
            self.synthesizer.as_ref(),
            &tts_text,
            language.speech_locale(),
            &self.store,
        );

        // Step 8-9: confidence bar + simulated email
        let confidence_html = confidence_bar(&prediction);
        let email_status = email_status(language, &email);

        Ok(AnalysisResponse {
            result_text: format!("{}: {}", t(language, TextKey::Result), prediction.label),
            confidence_html,
            report: Some(report),
            premium_message,
            voice: Some(voice),
            email_status,
            prediction: Some(prediction),
        })
    }
}
