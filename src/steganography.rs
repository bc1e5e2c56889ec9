use std::io::{Cursor, Read};
use std::thread;

use image::{ImageFormat, ImageReader, RgbaImage};
use tracing::debug;

use crate::constants::{CHANNELS_PER_PIXEL, HEADER_COUNT_LIMIT, SYMBOLS_PER_BYTE};
use crate::error::{Error, Result};
use crate::header::{encode_header, read_header, write_header};
use crate::quarters::{assemble, low_bits, set_low_bits};
use crate::stream::SymbolStream;
use crate::walker::{AlphaPolicy, RasterOrder, is_usable, slot_count, usable_pixels};

/// 单幅图像最多嵌入的符号数量。
const MAX_EMBEDDED_SYMBOLS: u32 = HEADER_COUNT_LIMIT - 1;

fn open(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(Error::FormatDetection)
}

/// 解码任意受支持格式的图像，并规整为 RGBA8。
pub fn decode_rgba(bytes: &[u8]) -> Result<(RgbaImage, Option<ImageFormat>)> {
    let reader = open(bytes)?;
    let format = reader.format();
    let image = reader.decode()?.into_rgba8();
    debug!(?format, width = image.width(), height = image.height(), "decoded image");
    Ok((image, format))
}

/// 嵌入时是否需要跳过透明像素。只有支持透明度的容器 (PNG) 才需要。
fn alpha_aware(format: Option<ImageFormat>) -> Result<bool> {
    match format {
        Some(ImageFormat::Png) => Ok(true),
        Some(ImageFormat::Jpeg) => Ok(false),
        other => Err(Error::UnsupportedFormat(other)),
    }
}

/// 图像还能容纳的载荷字节数。
pub fn capacity(image: &RgbaImage, alpha_aware: bool) -> usize {
    slot_count(image, alpha_aware).min(MAX_EMBEDDED_SYMBOLS as usize) / SYMBOLS_PER_BYTE
}

/// 读取 `cover` 中的载荷容量 (字节)，同时检查格式是否可用于嵌入。
pub fn cover_capacity(cover: &[u8]) -> Result<usize> {
    let reader = open(cover)?;
    let alpha_aware = alpha_aware(reader.format())?;
    let image = reader.decode()?.into_rgba8();
    Ok(capacity(&image, alpha_aware))
}

/// 将 `payload` 嵌入 PNG 或 JPEG 图像 `cover`，返回 PNG 编码的结果。
pub fn embed<R: Read + Send>(cover: &[u8], payload: R) -> Result<Vec<u8>> {
    let reader = open(cover)?;
    let alpha_aware = alpha_aware(reader.format())?;
    let mut image = reader.decode()?.into_rgba8();

    embed_into(&mut image, payload, alpha_aware)?;

    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// 将 `payload` 写入 `image` 的通道低位并写入头部，返回嵌入的符号数量。
///
/// 没有可用像素或载荷为空时返回 [`Error::UnsupportedImage`]。
/// 失败时 `image` 可能已被部分修改，调用方应当丢弃它。
pub fn embed_into<R: Read + Send>(
    image: &mut RgbaImage,
    payload: R,
    alpha_aware: bool,
) -> Result<u32> {
    if usable_pixels(image, alpha_aware).next().is_none() {
        return Err(Error::UnsupportedImage);
    }

    let (width, height) = image.dimensions();
    let embedded = thread::scope(|scope| -> Result<u32> {
        let stream = SymbolStream::spawn(scope, payload);
        let mut embedded = 0u32;

        'pixels: for (x, y) in RasterOrder::payload_region(width, height) {
            let pixel = image.get_pixel_mut(x, y);
            if !is_usable(pixel, alpha_aware) {
                continue;
            }
            for channel in &mut pixel.0[..CHANNELS_PER_PIXEL] {
                if embedded == MAX_EMBEDDED_SYMBOLS {
                    break 'pixels;
                }
                match stream.next_symbol()? {
                    Some(symbol) => *channel = set_low_bits(*channel, symbol),
                    None => return Ok(embedded),
                }
                embedded += 1;
            }
        }

        match stream.next_symbol()? {
            Some(_) => Err(Error::CapacityExceeded { embedded }),
            None => Ok(embedded),
        }
    })?;

    // 空载荷与没有可用像素一样视为失败
    if embedded == 0 {
        return Err(Error::UnsupportedImage);
    }

    write_header(&encode_header(embedded), image);
    debug!(embedded, alpha_aware, "embedded payload");
    Ok(embedded)
}

/// 从图像中提取载荷，透明像素的处理与嵌入一致。
pub fn extract(image: &[u8]) -> Result<Vec<u8>> {
    extract_with(image, AlphaPolicy::default())
}

pub fn extract_with(image: &[u8], policy: AlphaPolicy) -> Result<Vec<u8>> {
    let (image, _) = decode_rgba(image)?;
    extract_from(&image, policy)
}

/// 从已解码的图像中提取载荷。
///
/// 每个像素读取 3 个符号，直到读满头部声明的数量；多读出的符号被截掉。
pub fn extract_from(image: &RgbaImage, policy: AlphaPolicy) -> Result<Vec<u8>> {
    let declared = read_header(image)?;
    let mut remaining = i64::from(declared);

    let ceiling = usize::try_from(declared).unwrap_or(usize::MAX);
    let mut symbols = Vec::with_capacity(ceiling.min(slot_count(image, false)));

    for (x, y) in usable_pixels(image, policy.skips_transparent()) {
        if remaining <= 0 {
            break;
        }
        let pixel = image.get_pixel(x, y);
        symbols.extend(pixel.0[..CHANNELS_PER_PIXEL].iter().map(|&c| low_bits(c)));
        remaining -= CHANNELS_PER_PIXEL as i64;
    }

    if remaining > 0 {
        return Err(Error::MalformedImage {
            missing: remaining as u64,
        });
    }

    symbols.truncate(ceiling);
    debug!(declared, ?policy, "extracted payload");
    Ok(assemble(&symbols))
}
