//! # 图像缩放模块
//!
//! 按固定系数等比例缩小图像尺寸，直到 `width * height * 3 + 12`
//! 不超过给定的字节预算。尺寸搜索是纯计算，只在找到目标尺寸后
//! 调用一次重采样器。

use crate::constants::{CHANNELS, DEFAULT_MIN_DIMENSION, DEFAULT_SHRINK_FACTOR, HEADER_SIZE};
use crate::error::{Result, StegoError};
use crate::pixels::{PixelBuffer, Resampler};
use crate::report::Reporter;

/// 缩放搜索的参数。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    shrink_factor: f64,
    min_dimension: u32,
}

impl FitOptions {
    /// `shrink_factor` 必须位于 `(0, 1)`，`min_dimension` 至少为 1。
    pub fn new(shrink_factor: f64, min_dimension: u32) -> Option<Self> {
        (shrink_factor > 0.0 && shrink_factor < 1.0 && min_dimension >= 1).then_some(Self {
            shrink_factor,
            min_dimension,
        })
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            shrink_factor: DEFAULT_SHRINK_FACTOR,
            min_dimension: DEFAULT_MIN_DIMENSION,
        }
    }
}

/// 缩放结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fitted {
    pub pixels: PixelBuffer,
    pub original_size: (u32, u32),
    pub resized: bool,
}

impl Fitted {
    pub fn original_bytes(&self) -> u64 {
        image_bytes(self.original_size.0, self.original_size.1)
    }

    pub fn final_bytes(&self) -> u64 {
        image_bytes(self.pixels.width(), self.pixels.height())
    }

    /// 数据量减少的百分比。
    pub fn reduction_percent(&self) -> f64 {
        match self.original_bytes() {
            0 => 0.0,
            original => (original - self.final_bytes()) as f64 / original as f64 * 100.0,
        }
    }
}

/// 图像连同头部嵌入后所占的字节数。
pub fn encoded_size(width: u32, height: u32) -> u64 {
    image_bytes(width, height).saturating_add(HEADER_SIZE as u64)
}

fn image_bytes(width: u32, height: u32) -> u64 {
    u64::from(width)
        .saturating_mul(u64::from(height))
        .saturating_mul(CHANNELS as u64)
}

/// 计算满足 `max_bytes` 的目标尺寸。
///
/// 已经满足时原样返回；否则每一步把两条边都乘以缩放系数 (向下取整，
/// 不低于最小边长)，直到满足预算。结果只取决于输入，是确定的。
///
/// # Errors
///
/// 最小尺寸仍然超出预算时返回 [`StegoError::Resize`]。
pub fn fit_dimensions(
    width: u32,
    height: u32,
    max_bytes: usize,
    options: FitOptions,
) -> Result<(u32, u32)> {
    let budget = max_bytes as u64;
    if encoded_size(width, height) <= budget {
        return Ok((width, height));
    }

    let floor_width = options.min_dimension.min(width);
    let floor_height = options.min_dimension.min(height);
    if width == 0 || height == 0 || encoded_size(floor_width, floor_height) > budget {
        return Err(StegoError::Resize { max_bytes });
    }

    let mut scale = 1.0;
    loop {
        scale *= options.shrink_factor;
        let candidate = (
            shrink(width, scale, floor_width),
            shrink(height, scale, floor_height),
        );
        if encoded_size(candidate.0, candidate.1) <= budget {
            return Ok(candidate);
        }
    }
}

fn shrink(length: u32, scale: f64, floor: u32) -> u32 {
    ((f64::from(length) * scale).floor() as u32).clamp(floor, length)
}

/// 缩小图像直到其编码大小不超过 `max_bytes`。
///
/// # Errors
///
/// * 无法满足预算时返回 [`StegoError::Resize`]。
/// * 重采样失败时返回重采样器的错误。
pub fn fit(
    pixels: PixelBuffer,
    max_bytes: usize,
    options: FitOptions,
    resampler: &dyn Resampler,
    reporter: &dyn Reporter,
) -> Result<Fitted> {
    let original_size = pixels.dimensions();
    let (width, height) = fit_dimensions(original_size.0, original_size.1, max_bytes, options)?;

    if (width, height) == original_size {
        reporter.step(format_args!("Image already fits within {max_bytes} bytes"));
        return Ok(Fitted {
            pixels,
            original_size,
            resized: false,
        });
    }

    reporter.step(format_args!(
        "Image too large ({} bytes), resizing {}x{} -> {}x{} to fit {} bytes",
        encoded_size(original_size.0, original_size.1),
        original_size.0,
        original_size.1,
        width,
        height,
        max_bytes
    ));

    Ok(Fitted {
        pixels: resampler.resample(&pixels, width, height)?,
        original_size,
        resized: true,
    })
}
