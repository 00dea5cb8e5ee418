//! # 错误类型模块
//!
//! 核心隐写逻辑与两个外部适配器 (WAV 读写、图像读写) 共用的错误类型。
//! 命令行层再用 `anyhow` 为这些错误补充上下文。

use std::path::PathBuf;
use thiserror::Error;

/// 核心操作的 `Result` 别名。
pub type Result<T> = std::result::Result<T, StegoError>;

/// 隐写过程中可能出现的错误。
#[derive(Error, Debug)]
pub enum StegoError {
    /// 音频载体的样本数不足以容纳头部和图像数据。
    #[error("Not enough carrier capacity: need {needed} samples, have {available}")]
    Capacity { needed: usize, available: usize },

    /// 头部不完整或自相矛盾，说明载体中没有有效的隐藏图像。
    #[error("No valid embedded image found: {0}")]
    Format(String),

    /// 头部字段超出 32 位无符号整数范围。
    #[error("Header field `{field}` out of range: {value} does not fit in 32 bits")]
    Range { field: &'static str, value: u64 },

    /// 即使缩放到最小尺寸也无法满足字节预算。
    #[error("Cannot resize image to fit within {max_bytes} bytes")]
    Resize { max_bytes: usize },

    /// 输入文件不存在。
    #[error("Input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// 像素缓冲区长度与尺寸不符。
    #[error("Pixel buffer of {len} bytes does not match {width}x{height} RGB")]
    PixelLayout { width: u32, height: u32, len: usize },

    /// 不支持的音频格式。
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("WAV error: {0}")]
    Audio(#[from] hound::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
