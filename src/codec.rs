//! # 图像隐写流程
//!
//! 把像素缓冲区连同头部写入样本序列，以及按两阶段协议读回：
//! 先读 96 个样本得到头部，再从偏移 96 处读取头部声明的数据长度。

use crate::capacity::{capacity_bytes, usage_percent};
use crate::constants::{BITS_PER_BYTE, HEADER_BITS, HEADER_SIZE};
use crate::error::{Result, StegoError};
use crate::fitter::{FitOptions, encoded_size, fit};
use crate::header::{Header, decode_header};
use crate::pixels::{PixelBuffer, Resampler};
use crate::report::Reporter;
use crate::steganography::{LsbSample, embed, extract, extract_at};

/// 隐藏图像时的选项。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HideOptions {
    /// 图像过大时自动缩小到载体容量以内。
    pub auto_resize: bool,
    pub fit: FitOptions,
}

/// 隐藏操作的结果。
#[derive(Debug, Clone, PartialEq)]
pub struct HideOutcome<S> {
    /// 嵌入后的新样本序列，长度与输入相同。
    pub samples: Vec<S>,
    pub width: u32,
    pub height: u32,
    /// 图像数据字节数 (不含头部)。
    pub data_bytes: usize,
    /// 头部加图像数据占载体容量的百分比。
    pub capacity_usage: f64,
    pub resized: bool,
}

/// 把图像隐藏到样本序列中。
///
/// 输入样本不会被修改，结果中的样本序列是新分配的。
///
/// # Errors
///
/// * 图像放不下且未开启自动缩放时返回 [`StegoError::Capacity`]。
/// * 自动缩放也无法满足容量时返回 [`StegoError::Resize`]。
pub fn hide_image<S: LsbSample>(
    samples: &[S],
    image: PixelBuffer,
    options: &HideOptions,
    resampler: &dyn Resampler,
    reporter: &dyn Reporter,
) -> Result<HideOutcome<S>> {
    let capacity = capacity_bytes(samples.len());
    reporter.step(format_args!(
        "Total audio samples: {} (capacity {} bytes)",
        samples.len(),
        capacity
    ));
    reporter.step(format_args!(
        "Image size: {}x{} pixels, {} data bytes",
        image.width(),
        image.height(),
        image.as_bytes().len()
    ));

    let required = encoded_size(image.width(), image.height());
    let (image, resized) = if required > capacity as u64 {
        if !options.auto_resize {
            return Err(StegoError::Capacity {
                needed: usize::try_from(required.saturating_mul(BITS_PER_BYTE as u64))
                    .unwrap_or(usize::MAX),
                available: samples.len(),
            });
        }
        let fitted = fit(image, capacity, options.fit, resampler, reporter)?;
        (fitted.pixels, fitted.resized)
    } else {
        (image, false)
    };

    let header = Header::for_image(image.width(), image.height())?;
    let mut payload = Vec::with_capacity(HEADER_SIZE + image.as_bytes().len());
    payload.extend_from_slice(&header.to_bytes());
    payload.extend_from_slice(image.as_bytes());

    reporter.step(format_args!(
        "Total bits to hide: {} (including header)",
        payload.len() * BITS_PER_BYTE
    ));
    let carrier = embed(samples, &payload)?;
    let capacity_usage = usage_percent(payload.len(), capacity).unwrap_or(0.0);
    reporter.step(format_args!("Capacity usage: {capacity_usage:.2}%"));

    Ok(HideOutcome {
        samples: carrier,
        width: image.width(),
        height: image.height(),
        data_bytes: image.as_bytes().len(),
        capacity_usage,
        resized,
    })
}

/// 读取并校验隐写头部 (第一阶段)。
///
/// # Errors
///
/// 样本不足 96 个或头部不一致时返回 [`StegoError::Format`]。
pub fn read_header<S: LsbSample>(samples: &[S]) -> Result<Header> {
    if samples.len() < HEADER_BITS {
        return Err(StegoError::Format(format!(
            "carrier has {} samples, a header needs {HEADER_BITS}",
            samples.len()
        )));
    }
    decode_header(&extract(samples, HEADER_SIZE)?)
}

/// 从样本序列中提取隐藏的图像。
///
/// # Errors
///
/// * 头部缺失、不一致或描述的是空图像时返回 [`StegoError::Format`]。
/// * 载体短于头部声明的数据长度时返回 [`StegoError::Capacity`]。
pub fn extract_image<S: LsbSample>(samples: &[S], reporter: &dyn Reporter) -> Result<PixelBuffer> {
    reporter.step(format_args!("Extracting header information..."));
    let header = read_header(samples)?;
    reporter.step(format_args!(
        "Extracted image dimensions: {}x{}, {} data bytes",
        header.width, header.height, header.data_length
    ));

    if header.data_length == 0 {
        return Err(StegoError::Format(
            "header describes an empty image".to_string(),
        ));
    }

    reporter.step(format_args!("Extracting image data from audio samples..."));
    let data = extract_at(samples, HEADER_BITS, header.data_length as usize)?;
    PixelBuffer::new(header.width, header.height, data)
}
