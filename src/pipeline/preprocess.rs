//! Image preprocessing for classifier input.
//!
//! The classifier was trained on 150x150 RGB scans scaled to [0, 1].
//! Input is stretched to the square (no aspect-ratio padding) with bicubic
//! filtering, matching how scans were resized when the model was served.

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use tracing::debug;

use super::PipelineError;
use crate::config::MODEL_INPUT_SIZE;

/// Channels per pixel (RGB).
pub const CHANNELS: usize = 3;

/// Batched NHWC tensor `[1, size, size, 3]`, row-major, values in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInput {
    size: u32,
    data: Vec<f32>,
}

impl ModelInput {
    /// Tensor shape with the leading batch dimension.
    pub fn shape(&self) -> [usize; 4] {
        let s = self.size as usize;
        [1, s, s, CHANNELS]
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }
}

/// Resize to the model's square resolution and normalize.
pub fn prepare(image: &DynamicImage) -> Result<ModelInput, PipelineError> {
    prepare_with_size(image, MODEL_INPUT_SIZE)
}

pub(crate) fn prepare_with_size(
    image: &DynamicImage,
    size: u32,
) -> Result<ModelInput, PipelineError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PipelineError::ImageProcessing(format!(
            "Cannot resize empty image ({}x{})",
            image.width(),
            image.height()
        )));
    }

    let rgb = image.to_rgb8();
    let resized = image::imageops::resize(&rgb, size, size, FilterType::CatmullRom);

    debug!(
        original_width = image.width(),
        original_height = image.height(),
        target = size,
        "Resized scan for classifier"
    );

    Ok(ModelInput {
        size,
        data: normalize(&resized),
    })
}

/// Linear scaling of every channel by 1/255, HWC order.
fn normalize(image: &RgbImage) -> Vec<f32> {
    image
        .as_raw()
        .iter()
        .map(|&v| f32::from(v) / 255.0)
        .collect()
}
