use crate::constants::CHANNELS;
use crate::pixels::PixelBuffer;
use std::fmt;

/// 两幅图像不可逐像素比较的原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    Dimensions,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dimensions => f.write_str("dimension mismatch"),
        }
    }
}

/// 逐像素比较的结果。
///
/// 尺寸不同时 `similarity` 固定为 `0.0`，像素计数为 `None`，`reason` 给出原因。
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub identical: bool,
    pub similarity: f64,
    pub differing_pixels: Option<usize>,
    pub total_pixels: Option<usize>,
    pub reason: Option<Mismatch>,
}

/// 比较两个 RGB 像素缓冲区；三个通道中任意一个不同即视为该像素不同。
///
/// 两个空图像 (0 个像素) 视为完全相同。
pub fn compare(first: &PixelBuffer, second: &PixelBuffer) -> Comparison {
    if first.dimensions() != second.dimensions() {
        return Comparison {
            identical: false,
            similarity: 0.0,
            differing_pixels: None,
            total_pixels: None,
            reason: Some(Mismatch::Dimensions),
        };
    }

    let total_pixels = first.pixel_count();
    let differing_pixels = first
        .as_bytes()
        .chunks_exact(CHANNELS)
        .zip(second.as_bytes().chunks_exact(CHANNELS))
        .filter(|(a, b)| a != b)
        .count();

    let similarity = if total_pixels == 0 {
        100.0
    } else {
        (total_pixels - differing_pixels) as f64 / total_pixels as f64 * 100.0
    };

    Comparison {
        identical: differing_pixels == 0,
        similarity,
        differing_pixels: Some(differing_pixels),
        total_pixels: Some(total_pixels),
        reason: None,
    }
}
