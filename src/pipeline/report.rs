//! Single-page PDF report with an embedded QR code.
//!
//! Layout is fixed (US Letter, coordinates in points from the bottom-left
//! corner). The QR code always points at [`REPORT_QR_URL`]; it is drawn as
//! vector modules on the page and also saved as a PNG next to the PDF.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use printpdf::{
    BuiltinFont, Color, Greyscale, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Pt, Rect,
};
use qrcode::QrCode;
use serde::Serialize;

use super::artifacts::ArtifactStore;
use super::types::Prediction;
use super::PipelineError;
use crate::config::REPORT_QR_URL;
use crate::i18n::{t, Language, TextKey};

// ─── Layout constants (points) ───────────────────────────────────────────────

const PAGE_WIDTH_PT: f32 = 612.0;
const PAGE_HEIGHT_PT: f32 = 792.0;

const TITLE_POS: (f32, f32) = (150.0, 750.0);
const TITLE_SIZE: f32 = 18.0;
const BODY_X: f32 = 50.0;
const BODY_SIZE: f32 = 12.0;
/// y of name, age, result, confidence, timestamp, advice.
const BODY_LINES_Y: [f32; 6] = [700.0, 680.0, 660.0, 640.0, 620.0, 600.0];

const QR_POS: (f32, f32) = (400.0, 550.0);
const QR_SIZE: f32 = 100.0;
/// Modules of white border around the code.
const QR_QUIET_ZONE: usize = 4;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ─── Types ────────────────────────────────────────────────────────────────────

/// Font used for every line of the report.
#[derive(Debug, Clone, Default)]
pub enum ReportFont {
    /// Helvetica / Helvetica-Bold. Latin only.
    #[default]
    Builtin,
    /// TTF/OTF embedded into the document (needed for Urdu).
    External(PathBuf),
}

/// Text drawn on the page, in order.
#[derive(Debug, Clone, Serialize)]
pub struct ReportContent {
    pub title: String,
    pub name_line: String,
    pub age_line: String,
    pub result_line: String,
    pub confidence_line: String,
    pub timestamp_line: String,
    pub advice_line: String,
    pub language: Language,
    pub generated_at: NaiveDateTime,
}

impl ReportContent {
    pub fn new(
        patient_name: &str,
        patient_age: &str,
        prediction: &Prediction,
        language: Language,
        generated_at: NaiveDateTime,
    ) -> Self {
        Self {
            title: t(language, TextKey::ReportTitle).to_string(),
            name_line: format!("{}: {}", t(language, TextKey::Name), patient_name),
            age_line: format!("{}: {}", t(language, TextKey::Age), patient_age),
            result_line: format!("{}: {}", t(language, TextKey::Result), prediction.label),
            confidence_line: format!("Confidence: {}%", prediction.confidence_text()),
            timestamp_line: format!(
                "Date & Time: {}",
                generated_at.format(TIMESTAMP_FORMAT)
            ),
            advice_line: format!(
                "Advice: {}",
                t(language, prediction.label.advice_key())
            ),
            language,
            generated_at,
        }
    }

    /// Body lines below the title, top to bottom.
    pub fn body_lines(&self) -> [&str; 6] {
        [
            &self.name_line,
            &self.age_line,
            &self.result_line,
            &self.confidence_line,
            &self.timestamp_line,
            &self.advice_line,
        ]
    }

    /// Whether any line on the page contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.title.contains(needle) || self.body_lines().iter().any(|l| l.contains(needle))
    }
}

/// Generated report files plus the text they contain.
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    pub pdf_path: PathBuf,
    /// PNG of the QR code embedded in the PDF.
    pub qr_image_path: PathBuf,
    pub content: ReportContent,
}

// ─── Rendering ───────────────────────────────────────────────────────────────

/// Render the report PDF and its QR image into `store`.
pub fn render_report(
    store: &ArtifactStore,
    content: ReportContent,
    font: &ReportFont,
) -> Result<ReportArtifact, PipelineError> {
    if lacks_script_font(content.language, font) {
        tracing::warn!(
            language = %content.language,
            "Builtin PDF font cannot draw this script; set BRAINSCAN_REPORT_FONT to a TTF/OTF font"
        );
    }

    let qr = QrCode::new(REPORT_QR_URL.as_bytes())
        .map_err(|e| PipelineError::Qr(format!("QR generation failed: {e}")))?;
    let qr_image_path = save_qr_png(store, &qr)?;

    let pdf_bytes = generate_report_pdf(&content, &qr, font)?;
    let pdf_path = store.write("report-", ".pdf", &pdf_bytes)?;

    tracing::debug!(
        pdf = %pdf_path.display(),
        qr = %qr_image_path.display(),
        "Report rendered"
    );

    Ok(ReportArtifact {
        pdf_path,
        qr_image_path,
        content,
    })
}

/// Helvetica only covers Latin text.
fn lacks_script_font(language: Language, font: &ReportFont) -> bool {
    language.is_rtl() && matches!(font, ReportFont::Builtin)
}

/// Build the PDF in memory. Returns PDF bytes.
pub fn generate_report_pdf(
    content: &ReportContent,
    qr: &QrCode,
    font: &ReportFont,
) -> Result<Vec<u8>, PipelineError> {
    let (doc, page1, layer1) = PdfDocument::new(
        &content.title,
        Mm::from(Pt(PAGE_WIDTH_PT)),
        Mm::from(Pt(PAGE_HEIGHT_PT)),
        "Layer 1",
    );
    let layer = doc.get_page(page1).get_layer(layer1);

    let (regular, bold) = match font {
        ReportFont::Builtin => (
            doc.add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| PipelineError::Report(format!("PDF font error: {e}")))?,
            doc.add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| PipelineError::Report(format!("PDF font error: {e}")))?,
        ),
        ReportFont::External(path) => {
            let font = load_external_font(&doc, path)?;
            (font.clone(), font)
        }
    };

    layer.use_text(
        &content.title,
        TITLE_SIZE,
        Mm::from(Pt(TITLE_POS.0)),
        Mm::from(Pt(TITLE_POS.1)),
        &bold,
    );
    for (line, y) in content.body_lines().iter().zip(BODY_LINES_Y) {
        layer.use_text(*line, BODY_SIZE, Mm::from(Pt(BODY_X)), Mm::from(Pt(y)), &regular);
    }

    draw_qr(&layer, qr);

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| PipelineError::Report(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| PipelineError::Report(format!("PDF buffer error: {e}")))
}

fn load_external_font(
    doc: &PdfDocumentReference,
    path: &Path,
) -> Result<IndirectFontRef, PipelineError> {
    let file = File::open(path)
        .map_err(|e| PipelineError::Report(format!("Cannot open font {}: {e}", path.display())))?;
    doc.add_external_font(file)
        .map_err(|e| PipelineError::Report(format!("PDF font error: {e}")))
}

/// Dark modules as filled squares inside the 100pt box, white quiet zone
/// left unpainted.
fn draw_qr(layer: &PdfLayerReference, qr: &QrCode) {
    let width = qr.width();
    let module = QR_SIZE / (width + 2 * QR_QUIET_ZONE) as f32;
    let colors = qr.to_colors();

    layer.set_fill_color(Color::Greyscale(Greyscale::new(0.0, None)));

    for (idx, color) in colors.iter().enumerate() {
        if *color != qrcode::Color::Dark {
            continue;
        }
        let col = idx % width;
        let row = idx / width;
        // Row 0 is the top of the code; PDF y grows upwards.
        let x = QR_POS.0 + (col + QR_QUIET_ZONE) as f32 * module;
        let y = QR_POS.1 + QR_SIZE - (row + QR_QUIET_ZONE + 1) as f32 * module;
        layer.add_rect(Rect::new(
            Mm::from(Pt(x)),
            Mm::from(Pt(y)),
            Mm::from(Pt(x + module)),
            Mm::from(Pt(y + module)),
        ));
    }
}

fn save_qr_png(store: &ArtifactStore, qr: &QrCode) -> Result<PathBuf, PipelineError> {
    let raster = qr
        .render::<image::Luma<u8>>()
        .min_dimensions(200, 200)
        .quiet_zone(true)
        .build();

    let (file, path) = store.create("qr-", ".png")?;
    drop(file);
    raster
        .save_with_format(&path, image::ImageFormat::Png)
        .map_err(|e| PipelineError::Qr(format!("QR image save failed: {e}")))?;
    Ok(path)
}
