//! # 长度头部
//!
//! 光栅顺序前 5 个像素的 R/G/B 低两位记录已嵌入的符号数量：
//! 一个小端序 `u32`，拆分为 16 个符号，但只写入前 15 个。
//! 第 16 个符号 (第 4 个字节的 bit 1-0，即数量的 bit 25-24) 被舍弃，读取时按 0 处理。
//! 嵌入流程因此把数量限制在 [`HEADER_COUNT_LIMIT`](crate::constants::HEADER_COUNT_LIMIT) 以内。

use image::RgbaImage;
use tracing::trace;

use crate::constants::{
    CHANNELS_PER_PIXEL, HEADER_PIXELS, HEADER_SYMBOLS, HEADER_WRITTEN_SYMBOLS, SYMBOLS_PER_BYTE,
};
use crate::error::{Error, Result};
use crate::quarters::{Symbol, low_bits, quantize, reconstruct, set_low_bits};
use crate::walker::RasterOrder;

pub fn encode_header(count: u32) -> [Symbol; HEADER_SYMBOLS] {
    let mut symbols = [0; HEADER_SYMBOLS];
    for (chunk, byte) in symbols.chunks_exact_mut(SYMBOLS_PER_BYTE).zip(count.to_le_bytes()) {
        chunk.copy_from_slice(&quantize(byte));
    }
    symbols
}

pub fn decode_header(symbols: &[Symbol; HEADER_SYMBOLS]) -> u32 {
    let mut bytes = [0; 4];
    for (byte, chunk) in bytes.iter_mut().zip(symbols.chunks_exact(SYMBOLS_PER_BYTE)) {
        let mut quad = [0; SYMBOLS_PER_BYTE];
        quad.copy_from_slice(chunk);
        *byte = reconstruct(quad);
    }
    u32::from_le_bytes(bytes)
}

/// 将头部符号写入头部区域，每个像素 3 个，写满 15 个后停止。
///
/// 图像不足 5 个像素时只写能写下的部分；嵌入流程在此之前已经拒绝了这类图像。
pub fn write_header(symbols: &[Symbol; HEADER_SYMBOLS], image: &mut RgbaImage) {
    let written = &symbols[..HEADER_WRITTEN_SYMBOLS];
    let region = RasterOrder::new(image.width(), image.height()).take(HEADER_PIXELS);

    for ((x, y), triple) in region.zip(written.chunks_exact(CHANNELS_PER_PIXEL)) {
        let pixel = image.get_pixel_mut(x, y);
        for (channel, &symbol) in pixel.0.iter_mut().zip(triple) {
            *channel = set_low_bits(*channel, symbol);
        }
    }
}

/// 读取头部区域中记录的符号数量。
///
/// # Errors
///
/// 图像不足 5 个像素 (头部不完整) 时返回 [`Error::MalformedImage`]。
pub fn read_header(image: &RgbaImage) -> Result<u32> {
    let mut symbols = [0; HEADER_SYMBOLS];
    let mut read = 0;

    for (x, y) in RasterOrder::new(image.width(), image.height()).take(HEADER_PIXELS) {
        let pixel = image.get_pixel(x, y);
        for &channel in &pixel.0[..CHANNELS_PER_PIXEL] {
            symbols[read] = low_bits(channel);
            read += 1;
        }
    }

    if read < HEADER_WRITTEN_SYMBOLS {
        return Err(Error::MalformedImage {
            missing: (HEADER_WRITTEN_SYMBOLS - read) as u64,
        });
    }

    // symbols[15] 保持为 0
    let count = decode_header(&symbols);
    trace!(count, "read capacity header");
    Ok(count)
}
