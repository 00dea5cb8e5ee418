//! # LSB 位级嵌入与提取
//!
//! 每个载体样本的最低有效位承载 1 bit。字节按顺序写入，
//! 每个字节内部先写最高位 (MSB first)，样本按载体的存储顺序使用。

use crate::constants::BITS_PER_BYTE;
use crate::error::{Result, StegoError};

/// 可以承载 1 bit 隐写数据的整数样本。
pub trait LsbSample: Copy {
    /// 样本的最低有效位 (0 或 1)。
    fn lsb(self) -> u8;

    /// 清除最低有效位后写入 `bit`。
    fn with_lsb(self, bit: u8) -> Self;
}

macro_rules! impl_lsb_sample {
    ($($t:ty),*) => {
        $(
            impl LsbSample for $t {
                #[inline]
                fn lsb(self) -> u8 {
                    (self & 1) as u8
                }

                #[inline]
                fn with_lsb(self, bit: u8) -> Self {
                    (self & !1) | (bit & 1) as $t
                }
            }
        )*
    };
}

impl_lsb_sample!(i8, u8, i16, u16, i32, u32, i64, u64);

/// 将 `payload` 写入样本序列的最低有效位。
///
/// 总是返回一个新的样本序列，长度与输入相同；输入不会被修改。
/// 超出 `payload.len() * 8` 的样本原样保留。
///
/// # Errors
///
/// 所需 bit 数超过样本数时返回 [`StegoError::Capacity`]，此时不会修改任何样本。
pub fn embed<S: LsbSample>(samples: &[S], payload: &[u8]) -> Result<Vec<S>> {
    let needed = payload
        .len()
        .checked_mul(BITS_PER_BYTE)
        .unwrap_or(usize::MAX);
    if needed > samples.len() {
        return Err(StegoError::Capacity {
            needed,
            available: samples.len(),
        });
    }

    let mut carrier = samples.to_vec();
    carrier
        .iter_mut()
        .zip(payload_bits(payload))
        .for_each(|(sample, bit)| *sample = sample.with_lsb(bit));

    Ok(carrier)
}

/// 从前 `byte_count * 8` 个样本中读出 `byte_count` 字节。
///
/// # Errors
///
/// 样本不足时返回 [`StegoError::Capacity`]。
pub fn extract<S: LsbSample>(samples: &[S], byte_count: usize) -> Result<Vec<u8>> {
    extract_at(samples, 0, byte_count)
}

/// 从样本偏移 `offset` 开始读出 `byte_count` 字节。
///
/// 两阶段提取时先读头部，再以头部之后的偏移读取图像数据。
///
/// # Errors
///
/// `offset + byte_count * 8` 超出样本数时返回 [`StegoError::Capacity`]。
pub fn extract_at<S: LsbSample>(samples: &[S], offset: usize, byte_count: usize) -> Result<Vec<u8>> {
    let end = byte_count
        .checked_mul(BITS_PER_BYTE)
        .and_then(|bits| bits.checked_add(offset))
        .unwrap_or(usize::MAX);
    if end > samples.len() {
        return Err(StegoError::Capacity {
            needed: end,
            available: samples.len(),
        });
    }

    Ok(samples[offset..end]
        .chunks_exact(BITS_PER_BYTE)
        .map(|chunk| chunk.iter().fold(0u8, |byte, sample| (byte << 1) | sample.lsb()))
        .collect())
}

fn payload_bits(payload: &[u8]) -> impl Iterator<Item = u8> + '_ {
    payload
        .iter()
        .flat_map(|&byte| (0..BITS_PER_BYTE).rev().map(move |shift| (byte >> shift) & 1))
}
