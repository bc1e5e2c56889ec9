//! # 错误类型
//!
//! 隐写编解码与加密封装中所有可能的失败。每一种错误对当前调用都是终结性的，
//! 调用方不应使用任何部分输出。

use std::io;

use image::ImageFormat;

/// 编解码与加密封装的错误。
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 图像数据无法解码，或 PNG 序列化失败。
    #[error("unable to decode or encode the image")]
    Format(#[from] image::ImageError),

    /// 无法识别图像容器的格式。
    #[error("unable to detect the image format")]
    FormatDetection(#[source] io::Error),

    /// 图像可以解码，但不接受用于隐写 (仅支持 PNG 和 JPEG)。
    #[error("unsupported image format: {}", describe_format(.0))]
    UnsupportedFormat(Option<ImageFormat>),

    /// 一个符号都没有嵌入：头部之后没有可用的颜色通道，或载荷为空。
    #[error("the image isn't supported for steganography: nothing could be embedded")]
    UnsupportedImage,

    /// 载荷超出图像容量。
    #[error("data exceeds image capacity ({embedded} symbols embedded before running out of room)")]
    CapacityExceeded { embedded: u32 },

    /// 头部声明的符号数量多于图像实际包含的数量。
    #[error("the image isn't steganographic: {missing} declared symbols are missing")]
    MalformedImage { missing: u64 },

    /// 读取载荷数据源时失败。
    #[error("failed to read the payload")]
    PayloadRead(#[source] io::Error),

    /// 分组密码初始化失败。
    #[error("failed to initialize the cipher")]
    CipherKey(#[from] aes::cipher::InvalidLength),

    /// 密文的 base64 外壳或分组结构无效。
    #[error("malformed ciphertext: {0}")]
    CipherDecode(#[from] DecodeError),
}

/// 密文解码阶段的具体失败原因。
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Base64(#[from] base64::DecodeError),

    #[error("ciphertext is empty")]
    Empty,

    #[error("ciphertext length {0} is not a multiple of the block size")]
    PartialBlock(usize),
}

fn describe_format(format: &Option<ImageFormat>) -> String {
    format.map_or_else(|| "unknown".to_owned(), |f| format!("{f:?}"))
}

pub type Result<T> = std::result::Result<T, Error>;
