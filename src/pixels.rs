//! # 像素缓冲区适配器
//!
//! 借助 `image` 库把任意支持的图像格式解码为 RGB 字节序列，
//! 以及把 RGB 字节序列编码回图像文件。Alpha 等额外通道会被丢弃。

use crate::constants::CHANNELS;
use crate::error::{Result, StegoError};
use image::{RgbImage, imageops::FilterType};
use std::path::Path;
use tracing::debug;

/// 行优先、RGB 顺序的像素缓冲区。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// 由尺寸和原始字节构造缓冲区。
    ///
    /// # Errors
    ///
    /// `data.len() != width * height * 3` 时返回 [`StegoError::PixelLayout`]。
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(CHANNELS));
        if expected != Some(data.len()) {
            return Err(StegoError::PixelLayout {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / CHANNELS
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl From<RgbImage> for PixelBuffer {
    fn from(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }
}

/// 把像素缓冲区重新采样到新尺寸。
pub trait Resampler {
    fn resample(&self, pixels: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer>;
}

/// 使用 Lanczos3 滤波的重采样器。
#[derive(Debug, Default, Clone, Copy)]
pub struct LanczosResampler;

impl Resampler for LanczosResampler {
    fn resample(&self, pixels: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer> {
        let source = to_rgb_image(pixels)?;
        let resized = image::imageops::resize(&source, width, height, FilterType::Lanczos3);
        Ok(resized.into())
    }
}

/// 读取图像文件并统一转换为 RGB。
///
/// # Errors
///
/// * 文件不存在时返回 [`StegoError::MissingInput`]。
/// * 无法解码时返回 [`StegoError::Image`]。
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    if !path.exists() {
        return Err(StegoError::MissingInput(path.to_path_buf()));
    }
    let image = image::open(path)?;
    debug!(
        path = %path.display(),
        color = ?image.color(),
        width = image.width(),
        height = image.height(),
        "decoded image"
    );
    Ok(image.into_rgb8().into())
}

/// 将像素缓冲区按扩展名对应的格式保存。
///
/// # Errors
///
/// 编码或写入失败时返回 [`StegoError::Image`]。
pub fn save_image(pixels: &PixelBuffer, path: &Path) -> Result<()> {
    to_rgb_image(pixels)?.save(path)?;
    debug!(path = %path.display(), "encoded image");
    Ok(())
}

fn to_rgb_image(pixels: &PixelBuffer) -> Result<RgbImage> {
    RgbImage::from_raw(pixels.width, pixels.height, pixels.data.clone()).ok_or(
        StegoError::PixelLayout {
            width: pixels.width,
            height: pixels.height,
            len: pixels.data.len(),
        },
    )
}
