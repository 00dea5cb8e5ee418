//! # 隐写头部编解码模块
//!
//! 头部固定 12 字节，布局为 `[width:4][height:4][data_length:4]`，
//! 三个字段均为大端序 `u32`，紧挨在图像数据之前写入载体。

use crate::constants::{CHANNELS, HEADER_SIZE};
use crate::error::{Result, StegoError};

/// 隐写头部记录的元数据。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub width: u32,
    pub height: u32,
    pub data_length: u32,
}

impl Header {
    /// 为 `width` x `height` 的 RGB 图像构造头部。
    ///
    /// # Errors
    ///
    /// 像素数据长度超出 `u32` 时返回 [`StegoError::Range`]。
    pub fn for_image(width: u32, height: u32) -> Result<Self> {
        let data_length = expected_length(width, height).unwrap_or(u64::MAX);
        Ok(Self {
            width,
            height,
            data_length: to_u32("data_length", data_length)?,
        })
    }

    pub fn to_bytes(self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.width.to_be_bytes());
        bytes[4..8].copy_from_slice(&self.height.to_be_bytes());
        bytes[8..12].copy_from_slice(&self.data_length.to_be_bytes());
        bytes
    }

    /// 只做字节解析，不做一致性校验。
    ///
    /// # Errors
    ///
    /// 输入不足 12 字节时返回 [`StegoError::Format`]。
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let field = |index: usize| -> Result<u32> {
            bytes
                .get(index * 4..index * 4 + 4)
                .and_then(|chunk| <[u8; 4]>::try_from(chunk).ok())
                .map(u32::from_be_bytes)
                .ok_or_else(|| {
                    StegoError::Format(format!(
                        "header needs {HEADER_SIZE} bytes, got {}",
                        bytes.len()
                    ))
                })
        };

        Ok(Self {
            width: field(0)?,
            height: field(1)?,
            data_length: field(2)?,
        })
    }

    /// `width * height * 3 == data_length` 是否成立。
    pub fn is_consistent(&self) -> bool {
        expected_length(self.width, self.height) == Some(u64::from(self.data_length))
    }
}

/// 将三个字段编码为 12 字节头部。
///
/// # Errors
///
/// 任一字段超出 `u32` 范围时返回 [`StegoError::Range`]。
pub fn encode_header(width: u64, height: u64, data_length: u64) -> Result<[u8; HEADER_SIZE]> {
    let header = Header {
        width: to_u32("width", width)?,
        height: to_u32("height", height)?,
        data_length: to_u32("data_length", data_length)?,
    };
    Ok(header.to_bytes())
}

/// 解码 12 字节头部并校验数据长度与尺寸是否一致。
///
/// 这项校验用来区分真实的隐藏数据与普通音频的噪声。
///
/// # Errors
///
/// 输入过短或 `width * height * 3 != data_length` 时返回 [`StegoError::Format`]。
pub fn decode_header(bytes: &[u8]) -> Result<Header> {
    let header = Header::parse(bytes)?;
    if !header.is_consistent() {
        return Err(StegoError::Format(format!(
            "header claims {}x{} pixels but {} data bytes",
            header.width, header.height, header.data_length
        )));
    }
    Ok(header)
}

fn expected_length(width: u32, height: u32) -> Option<u64> {
    u64::from(width)
        .checked_mul(u64::from(height))?
        .checked_mul(CHANNELS as u64)
}

fn to_u32(field: &'static str, value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| StegoError::Range { field, value })
}
