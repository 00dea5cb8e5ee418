/// 隐写头部的字节数：宽度、高度、数据长度各占 4 字节 (大端序)。
pub const HEADER_SIZE: usize = 12;

/// 每个载体样本只承载 1 bit，因此 1 字节需要 8 个样本。
pub const BITS_PER_BYTE: usize = 8;

/// 隐写头部占用的样本数量 (12 * 8 = 96)。
/// 图像数据从这个样本偏移处开始。
pub const HEADER_BITS: usize = HEADER_SIZE * BITS_PER_BYTE;

/// 像素缓冲区统一使用 RGB 三通道。
pub const CHANNELS: usize = 3;

/// 自动缩放时每一步的几何缩放系数。
pub const DEFAULT_SHRINK_FACTOR: f64 = 0.9;

/// 自动缩放时允许的最小边长 (像素)。
pub const DEFAULT_MIN_DIMENSION: u32 = 1;
