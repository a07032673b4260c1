//! `POST /api/analyze`: the analysis form submission.

use axum::extract::{Multipart, State};
use axum::Json;
use image::DynamicImage;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::AnalyzeResponse;
use crate::i18n::Language;
use crate::pipeline::AnalysisRequest;
use crate::state::AppState;

/// Multipart fields: `image` (file), `name`, `age`, `email`, `lang`.
///
/// Missing fields are not an HTTP error: the pipeline answers with the
/// guidance message. Undecodable images and unknown languages are 400s.
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("analyze", request_id = %request_id);

    async move {
        let request = read_form(multipart).await?;

        // One analysis at a time. The guard moves into the blocking task so a
        // dropped request cannot release it while the pipeline still runs.
        let guard = state.analyze_lock.clone().lock_owned().await;
        let pipeline = state.pipeline.clone();
        let analysis = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            pipeline.analyze(request)
        })
        .await??;

        let response =
            AnalyzeResponse::from_analysis(request_id, &analysis, state.pipeline.store());
        tracing::info!(
            label = ?response.label,
            audio = response.audio_url.is_some(),
            "Analysis complete"
        );
        Ok::<_, ApiError>(Json(response))
    }
    .instrument(span)
    .await
}

async fn read_form(mut multipart: Multipart) -> Result<AnalysisRequest, ApiError> {
    let mut request = AnalysisRequest::default();
    let mut image_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed form data: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {e}")))?;
                // Browsers send an empty part when no file was chosen.
                if !bytes.is_empty() {
                    image_bytes = Some(bytes.to_vec());
                }
            }
            "name" => request.patient_name = read_text(field).await?,
            "age" => request.patient_age = read_text(field).await?,
            "email" => request.email = read_text(field).await?,
            "lang" => {
                let code = read_text(field).await?;
                if !code.is_empty() {
                    request.language = code
                        .parse::<Language>()
                        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                }
            }
            _ => {}
        }
    }

    request.image = image_bytes.as_deref().map(decode_image).transpose()?;
    Ok(request)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read form field: {e}")))
}

fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ApiError> {
    image::load_from_memory(bytes)
        .map_err(|e| ApiError::BadRequest(format!("Unreadable image: {e}")))
}
