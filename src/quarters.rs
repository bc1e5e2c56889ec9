//! # 位量化
//!
//! 字节与 2 bit 符号 ("quarter") 之间的相互转换，以及颜色通道低两位的读写。

use crate::constants::{
    FIRST_QUARTER, FOURTH_QUARTER, SECOND_QUARTER, SYMBOLS_PER_BYTE, THIRD_QUARTER,
};

/// 2 bit 符号，取值 0..=3。
pub type Symbol = u8;

/// 将一个字节拆分成 4 个符号，最高两位在前。
pub fn quantize(byte: u8) -> [Symbol; SYMBOLS_PER_BYTE] {
    [
        (byte & FIRST_QUARTER) >> 6,
        (byte & SECOND_QUARTER) >> 4,
        (byte & THIRD_QUARTER) >> 2,
        byte & FOURTH_QUARTER,
    ]
}

/// `quantize` 的逆运算。
pub fn reconstruct(symbols: [Symbol; SYMBOLS_PER_BYTE]) -> u8 {
    (symbols[0] << 6) | (symbols[1] << 4) | (symbols[2] << 2) | symbols[3]
}

pub fn low_bits(channel: u8) -> Symbol {
    channel & FOURTH_QUARTER
}

/// 用 `symbol` 替换通道的低两位，高 6 位保持不变。
pub fn set_low_bits(channel: u8, symbol: Symbol) -> u8 {
    (channel & !FOURTH_QUARTER) | (symbol & FOURTH_QUARTER)
}

/// 将符号序列还原为字节。长度不是 4 的倍数时，末尾以 0 符号补齐。
pub fn assemble(symbols: &[Symbol]) -> Vec<u8> {
    symbols
        .chunks(SYMBOLS_PER_BYTE)
        .map(|chunk| {
            let mut quad = [0; SYMBOLS_PER_BYTE];
            quad[..chunk.len()].copy_from_slice(chunk);
            reconstruct(quad)
        })
        .collect()
}
