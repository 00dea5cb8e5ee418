use crate::constants::{BITS_PER_BYTE, HEADER_SIZE};

/// 给定样本数量时最多可承载的字节数 (每个样本 1 bit)。
pub fn capacity_bytes(sample_count: usize) -> usize {
    sample_count / BITS_PER_BYTE
}

/// 扣除 12 字节头部后，真正可用于图像数据的字节数。
pub fn payload_capacity_bytes(sample_count: usize) -> usize {
    capacity_bytes(sample_count).saturating_sub(HEADER_SIZE)
}

/// 数据占用容量的百分比。容量为 0 时没有意义，返回 `None`。
pub fn usage_percent(data_bytes: usize, capacity_bytes: usize) -> Option<f64> {
    (capacity_bytes > 0).then(|| data_bytes as f64 / capacity_bytes as f64 * 100.0)
}
