//! # wav_hide 库
//!
//! 本库包含在 WAV 音频中隐藏图像的 LSB 隐写核心逻辑，
//! 以及命令行工具使用的 WAV/图像适配器。

// 声明库包含的所有模块。

pub mod audio;
pub mod capacity;
pub mod cli;
pub mod codec;
pub mod comparator;
pub mod constants;
pub mod error;
pub mod fitter;
pub mod handler;
pub mod header;
pub mod pixels;
pub mod report;
pub mod steganography;

pub use error::{Result, StegoError};
