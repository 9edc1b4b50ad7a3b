//! OCR collaborator seam.
//!
//! The extraction pipeline only needs raw text out of a document image. Any
//! engine that implements [`TextSource`] can feed it; the `native` feature
//! provides [`PureOcrEngine`] on top of `pure-onnx-ocr`.

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::{create_engine_from_dir, PureOcrEngine};

use std::cmp::Ordering;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Anything that turns a document image into raw text.
pub trait TextSource {
    /// Recognize the text of an image, regions joined with newlines in
    /// reading order.
    fn extract_text(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// Vertical band height (pixels) within which regions count as one row.
pub const ROW_HEIGHT: f32 = 20.0;

/// A recognized text region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRegion {
    /// Axis-aligned bounds `(min_x, min_y, max_x, max_y)`.
    pub rect: [f32; 4],

    /// Recognized text.
    pub text: String,

    /// Recognition confidence (0.0 - 1.0).
    pub confidence: f32,
}

impl TextRegion {
    fn row(&self) -> i32 {
        (self.rect[1] / ROW_HEIGHT) as i32
    }
}

/// Result of running OCR on one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrOutput {
    /// Regions in reading order.
    pub regions: Vec<TextRegion>,

    /// Region texts joined with newlines.
    pub text: String,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrOutput {
    /// Build an output from unordered regions.
    pub fn from_regions(
        mut regions: Vec<TextRegion>,
        image_size: (u32, u32),
        processing_time_ms: u64,
    ) -> Self {
        sort_by_reading_order(&mut regions);
        let text = join_regions(&regions);
        Self {
            regions,
            text,
            processing_time_ms,
            image_size,
        }
    }

    /// Mean region confidence, or `None` without regions.
    pub fn mean_confidence(&self) -> Option<f32> {
        if self.regions.is_empty() {
            return None;
        }
        let sum: f32 = self.regions.iter().map(|r| r.confidence).sum();
        Some(sum / self.regions.len() as f32)
    }
}

/// Sort regions top-to-bottom in rows of [`ROW_HEIGHT`], then left-to-right.
pub fn sort_by_reading_order(regions: &mut [TextRegion]) {
    regions.sort_by(|a, b| {
        a.row().cmp(&b.row()).then_with(|| {
            a.rect[0]
                .partial_cmp(&b.rect[0])
                .unwrap_or(Ordering::Equal)
        })
    });
}

/// Join region texts with newlines.
pub fn join_regions(regions: &[TextRegion]) -> String {
    regions
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
