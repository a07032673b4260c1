//! HTTP router: the form page, the two JSON actions, and artifact downloads.
//!
//! Routes:
//! - `GET  /`                 localized form (`?lang=en|ur`)
//! - `POST /api/analyze`      multipart analysis
//! - `POST /api/appointment`  premium upsell
//! - `GET  /artifacts/*`      generated PDFs and audio
//! - `GET  /health`           liveness

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;

use crate::api::endpoints;
use crate::state::AppState;

/// MRI uploads are single images; anything bigger is a mistake.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let artifacts = ServeDir::new(state.pipeline.store().dir());

    let api = Router::new()
        .route("/analyze", post(endpoints::analyze::analyze))
        .route("/appointment", post(endpoints::appointment::book));

    Router::new()
        .route("/", get(endpoints::page::index))
        .route("/health", get(endpoints::health::check))
        .nest("/api", api)
        .nest_service("/artifacts", artifacts)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::pipeline::speech::{DisabledSynthesizer, StaticAudioSynthesizer, SpeechSynthesizer};
    use crate::pipeline::{ArtifactStore, FixedScoreClassifier};

    const BOUNDARY: &str = "brainscan-test-boundary";

    fn test_state(score: f32, synthesizer: Arc<dyn SpeechSynthesizer>) -> (AppState, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(tmp.path()).unwrap();
        let state = AppState::with_collaborators(
            Arc::new(FixedScoreClassifier::new(score)),
            synthesizer,
            store,
        );
        (state, tmp)
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(32, 24, image::Rgb([120, 90, 60]));
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    /// Hand-built multipart body. `image` is sent as a file part when present.
    fn multipart_body(fields: &[(&str, &str)], image: Option<&[u8]>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(bytes) = image {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"scan.png\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn analyze_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    async fn text_body(response: axum::response::Response) -> String {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (state, _tmp) = test_state(0.1, Arc::new(DisabledSynthesizer));
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = build_router(state).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn appointment_returns_premium_message() {
        let (state, _tmp) = test_state(0.1, Arc::new(DisabledSynthesizer));
        let req = Request::builder()
            .method("POST")
            .uri("/api/appointment")
            .body(Body::empty())
            .unwrap();
        let response = build_router(state).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["message"], "This feature is available for Premium Users.");
    }

    #[tokio::test]
    async fn index_renders_urdu_right_to_left() {
        let (state, _tmp) = test_state(0.1, Arc::new(DisabledSynthesizer));
        let req = Request::builder().uri("/?lang=ur").body(Body::empty()).unwrap();
        let response = build_router(state).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = text_body(response).await;
        assert!(html.contains(r#"dir="rtl""#));
        assert!(html.contains("مریض کا نام"));
    }

    #[tokio::test]
    async fn index_falls_back_to_english() {
        let (state, _tmp) = test_state(0.1, Arc::new(DisabledSynthesizer));
        let req = Request::builder().uri("/?lang=xx").body(Body::empty()).unwrap();
        let response = build_router(state).oneshot(req).await.unwrap();
        let html = text_body(response).await;
        assert!(html.contains(r#"dir="ltr""#));
        assert!(html.contains("Patient Name"));
    }

    #[tokio::test]
    async fn analyze_with_missing_fields_returns_guidance() {
        let (state, tmp) = test_state(0.9, Arc::new(DisabledSynthesizer));
        let body = multipart_body(&[("name", "Ali"), ("age", "")], Some(&png_bytes()));
        let response = build_router(state)
            .oneshot(analyze_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["result"], "Please provide all details.");
        assert_eq!(json["confidence_html"], "");
        assert!(json["report_url"].is_null());
        assert!(json["audio_url"].is_null());
        assert!(json["label"].is_null());
        // nothing written
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn analyze_tumor_produces_report_and_audio() {
        let (state, _tmp) = test_state(
            0.87,
            Arc::new(StaticAudioSynthesizer::new(b"ID3fake".to_vec())),
        );
        let app = build_router(state);
        let body = multipart_body(
            &[
                ("name", "Ali"),
                ("age", "45"),
                ("email", "a@b.com"),
                ("lang", "en"),
            ],
            Some(&png_bytes()),
        );
        let response = app.clone().oneshot(analyze_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["result"], "Prediction Result: Tumor");
        assert_eq!(json["label"], "tumor");
        assert!(json["confidence_html"]
            .as_str()
            .unwrap()
            .contains("width:87.00%"));
        assert_eq!(
            json["premium"],
            "For Premium Users: AI Health Assistant can schedule an appointment with a doctor!"
        );
        assert_eq!(json["email_status"], "Report sent to a@b.com (simulation)");

        let report_url = json["report_url"].as_str().unwrap().to_string();
        assert!(report_url.starts_with("/artifacts/"));
        assert!(json["audio_url"].as_str().unwrap().ends_with(".mp3"));

        let download = Request::builder().uri(&report_url).body(Body::empty()).unwrap();
        let response = app.oneshot(download).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn analyze_survives_speech_outage() {
        let (state, _tmp) = test_state(0.2, Arc::new(DisabledSynthesizer));
        let body = multipart_body(
            &[("name", "Sara"), ("age", "30"), ("lang", "ur")],
            Some(&png_bytes()),
        );
        let response = build_router(state)
            .oneshot(analyze_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["label"], "no_tumor");
        assert!(json["audio_url"].is_null());
        assert!(json["report_url"].is_string());
        assert_eq!(json["premium"], "کوئی پریمیئم ایکشن نہیں۔");
        assert_eq!(json["email_status"], "");
    }

    #[tokio::test]
    async fn undecodable_image_is_bad_request() {
        let (state, _tmp) = test_state(0.5, Arc::new(DisabledSynthesizer));
        let body = multipart_body(&[("name", "Ali"), ("age", "45")], Some(b"not an image"));
        let response = build_router(state)
            .oneshot(analyze_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn unknown_language_is_bad_request() {
        let (state, _tmp) = test_state(0.5, Arc::new(DisabledSynthesizer));
        let body = multipart_body(&[("name", "Ali"), ("age", "45"), ("lang", "fr")], None);
        let response = build_router(state)
            .oneshot(analyze_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_artifact_is_not_found() {
        let (state, _tmp) = test_state(0.5, Arc::new(DisabledSynthesizer));
        let req = Request::builder()
            .uri("/artifacts/missing.pdf")
            .body(Body::empty())
            .unwrap();
        let response = build_router(state).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    /// Sleeps before answering and records when it is done.
    struct SlowClassifier {
        delay: std::time::Duration,
        finished: Arc<std::sync::atomic::AtomicBool>,
    }

    impl crate::pipeline::ImageClassifier for SlowClassifier {
        fn predict(
            &self,
            _input: &crate::pipeline::preprocess::ModelInput,
        ) -> Result<f32, crate::pipeline::PipelineError> {
            std::thread::sleep(self.delay);
            self.finished
                .store(true, std::sync::atomic::Ordering::SeqCst);
            Ok(0.7)
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn dropped_request_keeps_analysis_lock_until_pipeline_ends() {
        use std::sync::atomic::Ordering;
        use std::time::Duration;

        let tmp = tempfile::tempdir().unwrap();
        let finished = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let state = AppState::with_collaborators(
            Arc::new(SlowClassifier {
                delay: Duration::from_millis(800),
                finished: Arc::clone(&finished),
            }),
            Arc::new(DisabledSynthesizer),
            ArtifactStore::open(tmp.path()).unwrap(),
        );

        let app = build_router(state.clone());
        let body = multipart_body(&[("name", "Ali"), ("age", "45")], Some(&png_bytes()));
        let request = tokio::spawn(async move { app.oneshot(analyze_request(body)).await });

        // Client goes away while the classifier is still working.
        tokio::time::sleep(Duration::from_millis(300)).await;
        request.abort();
        assert!(request.await.unwrap_err().is_cancelled());

        assert!(!finished.load(Ordering::SeqCst));
        assert!(
            state.analyze_lock.try_lock().is_err(),
            "lock must stay held while the pipeline runs"
        );

        // Released once the blocking work completes.
        let mut released = false;
        for _ in 0..40 {
            tokio::time::sleep(Duration::from_millis(50)).await;
            if state.analyze_lock.try_lock().is_ok() {
                released = true;
                break;
            }
        }
        assert!(released);
        assert!(finished.load(Ordering::SeqCst));
    }
}
