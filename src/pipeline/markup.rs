//! Confidence bar rendered as an inline-styled HTML fragment.

use super::types::{Prediction, TumorLabel};

/// Fill color for healthy results.
pub const HEALTHY_COLOR: &str = "green";
/// Fill color for tumor results.
pub const ALERT_COLOR: &str = "red";

pub fn bar_color(label: TumorLabel) -> &'static str {
    match label {
        TumorLabel::NoTumor => HEALTHY_COLOR,
        TumorLabel::Tumor => ALERT_COLOR,
    }
}

/// Horizontal bar filled to the confidence percentage, number overlaid.
pub fn confidence_bar(prediction: &Prediction) -> String {
    let pct = prediction.confidence_text();
    let color = bar_color(prediction.label);
    format!(
        "<div style='width:100%;background:#ddd;border-radius:10px;'>\
<div style='width:{pct}%;background:{color};padding:5px;border-radius:10px;color:white;text-align:center;'>\
{pct}%</div></div>"
    )
}
