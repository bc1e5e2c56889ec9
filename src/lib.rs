//! # dkeymask 库
//!
//! 本库包含 LSB 隐写编解码器与可选的加密封装。
//! 载荷的每个字节拆分为 4 个 2 bit 符号，依次写入图像像素 R/G/B 通道的最低两位。

// 声明库包含的所有模块。

pub mod cipher;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod header;
pub mod quarters;
pub mod steganography;
pub mod stream;
pub mod walker;

pub use error::{DecodeError, Error, Result};
pub use steganography::{
    capacity, cover_capacity, decode_rgba, embed, embed_into, extract, extract_from, extract_with,
};
pub use walker::AlphaPolicy;
