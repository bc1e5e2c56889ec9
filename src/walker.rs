//! # 像素通道遍历
//!
//! 按光栅顺序 (外层 x、内层 y，即逐列自上而下) 遍历图像像素。
//! 头部区域之后的像素提供载荷使用的 R/G/B 通道槽位；可选地跳过完全透明的像素。

use image::{Rgba, RgbaImage};

use crate::constants::{CHANNELS_PER_PIXEL, HEADER_PIXELS};

/// 提取时如何对待完全透明 (alpha = 0) 的像素。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlphaPolicy {
    /// 与嵌入一致：跳过透明像素。
    #[default]
    SkipTransparent,
    /// 读取所有像素，兼容旧版编码器生成的图像 (旧版只在嵌入时跳过透明像素)。
    ReadAll,
}

impl AlphaPolicy {
    pub fn skips_transparent(self) -> bool {
        matches!(self, Self::SkipTransparent)
    }
}

/// 按光栅顺序产生像素坐标的迭代器。
#[derive(Clone, Debug)]
pub struct RasterOrder {
    height: u64,
    position: u64,
    end: u64,
}

impl RasterOrder {
    /// 覆盖整幅图像的遍历。
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            height: u64::from(height),
            position: 0,
            end: u64::from(width) * u64::from(height),
        }
    }

    /// 头部区域之后的遍历。像素不足时为空。
    pub fn payload_region(width: u32, height: u32) -> Self {
        let mut order = Self::new(width, height);
        order.position = order.end.min(HEADER_PIXELS as u64);
        order
    }
}

impl Iterator for RasterOrder {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.end {
            return None;
        }
        // position < width * height，因此商与余数都能放进 u32
        let x = (self.position / self.height) as u32;
        let y = (self.position % self.height) as u32;
        self.position += 1;
        Some((x, y))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.end - self.position).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

/// 判断像素的颜色通道能否承载数据。
pub fn is_usable(pixel: &Rgba<u8>, skip_transparent: bool) -> bool {
    !(skip_transparent && pixel[3] == 0)
}

/// 头部之后所有可用像素的坐标。
pub fn usable_pixels(
    image: &RgbaImage,
    skip_transparent: bool,
) -> impl Iterator<Item = (u32, u32)> + '_ {
    RasterOrder::payload_region(image.width(), image.height())
        .filter(move |&(x, y)| is_usable(image.get_pixel(x, y), skip_transparent))
}

/// 可用于载荷的通道槽位总数。
pub fn slot_count(image: &RgbaImage, skip_transparent: bool) -> usize {
    usable_pixels(image, skip_transparent).count() * CHANNELS_PER_PIXEL
}
