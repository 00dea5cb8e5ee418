//! # WAV 样本流适配器
//!
//! 使用 `hound` 把整数 PCM WAV 解码为交错的样本序列，并以相同的
//! 规格 (声道数、采样率、位深) 写回。所有位深的样本都以 `i32` 保存，
//! 只改动最低位时数值永远不会越出原位深的范围。

use crate::capacity::{capacity_bytes, payload_capacity_bytes};
use crate::error::{Result, StegoError};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;

/// 载体音频的规格与容量信息。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarrierInfo {
    /// 所有声道的样本总数 (每个样本一个隐写位)。
    pub samples: usize,
    pub sample_rate: u32,
    pub channels: u16,
    /// 每个样本的字节数。
    pub sample_width: u16,
    pub duration_seconds: f64,
    pub capacity_bytes: usize,
    /// 扣除头部后的可用字节数。
    pub payload_capacity_bytes: usize,
}

/// 已解码的 WAV 载体。
#[derive(Debug, Clone)]
pub struct Carrier {
    spec: WavSpec,
    samples: Vec<i32>,
}

impl Carrier {
    /// 由规格和样本构造载体。
    ///
    /// # Errors
    ///
    /// 非整数 PCM 或位深不在 8/16/24/32 之内时返回 [`StegoError::UnsupportedFormat`]。
    pub fn new(spec: WavSpec, samples: Vec<i32>) -> Result<Self> {
        check_spec(&spec)?;
        Ok(Self { spec, samples })
    }

    /// 打开 WAV 文件。
    ///
    /// # Errors
    ///
    /// * 文件不存在时返回 [`StegoError::MissingInput`]。
    /// * 无法解析或格式不受支持时返回相应错误。
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(StegoError::MissingInput(path.to_path_buf()));
        }
        let carrier = Self::from_reader(WavReader::open(path)?)?;
        debug!(path = %path.display(), samples = carrier.samples.len(), "decoded carrier");
        Ok(carrier)
    }

    /// 从内存中的 WAV 字节解码。
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(WavReader::new(Cursor::new(bytes))?)
    }

    fn from_reader<R: Read + Seek>(reader: WavReader<R>) -> Result<Self> {
        let spec = reader.spec();
        check_spec(&spec)?;
        let samples = reader
            .into_samples::<i32>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { spec, samples })
    }

    pub fn spec(&self) -> WavSpec {
        self.spec
    }

    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    /// 以新的样本替换当前样本，规格保持不变。
    ///
    /// # Errors
    ///
    /// 样本数量发生变化时返回 [`StegoError::Format`]。
    pub fn with_samples(&self, samples: Vec<i32>) -> Result<Self> {
        if samples.len() != self.samples.len() {
            return Err(StegoError::Format(format!(
                "carrier has {} samples, replacement has {}",
                self.samples.len(),
                samples.len()
            )));
        }
        Ok(Self {
            spec: self.spec,
            samples,
        })
    }

    pub fn info(&self) -> CarrierInfo {
        let samples = self.samples.len();
        let frames = samples / usize::from(self.spec.channels.max(1));
        CarrierInfo {
            samples,
            sample_rate: self.spec.sample_rate,
            channels: self.spec.channels,
            sample_width: self.spec.bits_per_sample / 8,
            duration_seconds: frames as f64 / f64::from(self.spec.sample_rate.max(1)),
            capacity_bytes: capacity_bytes(samples),
            payload_capacity_bytes: payload_capacity_bytes(samples),
        }
    }

    /// 保存为 WAV 文件。
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = WavWriter::create(path, self.spec)?;
        for &sample in &self.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        debug!(path = %path.display(), "encoded carrier");
        Ok(())
    }

    /// 编码为内存中的 WAV 字节。
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        {
            let mut writer = WavWriter::new(Cursor::new(&mut bytes), self.spec)?;
            for &sample in &self.samples {
                writer.write_sample(sample)?;
            }
            writer.finalize()?;
        }
        Ok(bytes)
    }
}

fn check_spec(spec: &WavSpec) -> Result<()> {
    if spec.sample_format != SampleFormat::Int {
        return Err(StegoError::UnsupportedFormat(
            "only integer PCM WAV is supported, got floating point samples".to_string(),
        ));
    }
    if !matches!(spec.bits_per_sample, 8 | 16 | 24 | 32) {
        return Err(StegoError::UnsupportedFormat(format!(
            "unsupported sample width: {} bits",
            spec.bits_per_sample
        )));
    }
    Ok(())
}
