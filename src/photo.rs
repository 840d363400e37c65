//! 送信用写真の準備
//!
//! 写真を読み込み、選択範囲で切り抜き、長辺を上限まで縮小してJPEGにする。

use crate::error::{MarketFinderError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::path::Path;
use tracing::debug;

/// 切り抜き範囲の最小辺（px）
pub const MIN_CROP_EDGE: u32 = 100;

/// JPEG品質
pub const JPEG_QUALITY: u8 = 80;

/// 切り抜き範囲（px）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropArea {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropArea {
    /// 画像の範囲内に収める。辺は最小値まで広げるが画像からははみ出さない
    pub fn clamp_to(&self, image_width: u32, image_height: u32) -> Result<CropArea> {
        if self.x >= image_width || self.y >= image_height {
            return Err(MarketFinderError::ImageLoad(format!(
                "切り抜き範囲が画像外です: ({}, {}) / {}x{}",
                self.x, self.y, image_width, image_height
            )));
        }

        let width = self.width.max(MIN_CROP_EDGE).min(image_width - self.x);
        let height = self.height.max(MIN_CROP_EDGE).min(image_height - self.y);

        Ok(CropArea {
            x: self.x,
            y: self.y,
            width,
            height,
        })
    }
}

impl std::str::FromStr for CropArea {
    type Err = String;

    /// "x,y,width,height" 形式
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<u32> = s
            .split(',')
            .map(|p| p.trim().parse::<u32>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| format!("Invalid crop: {}. Use X,Y,WIDTH,HEIGHT", s))?;

        match parts.as_slice() {
            &[x, y, width, height] => Ok(CropArea { x, y, width, height }),
            _ => Err(format!("Invalid crop: {}. Use X,Y,WIDTH,HEIGHT", s)),
        }
    }
}

/// 写真を読み込んで送信用JPEGバイト列にする
pub fn prepare_photo(path: &Path, crop: Option<CropArea>, max_size: u32) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(MarketFinderError::FileNotFound(path.display().to_string()));
    }

    let img = image::open(path)?;
    debug!(path = %path.display(), width = img.width(), height = img.height(), "photo loaded");

    let img = match crop {
        Some(area) => {
            let area = area.clamp_to(img.width(), img.height())?;
            img.crop_imm(area.x, area.y, area.width, area.height)
        }
        None => img,
    };

    let img = if max_size > 0 && img.width().max(img.height()) > max_size {
        img.resize(max_size, max_size, FilterType::Triangle)
    } else {
        img
    };

    encode_jpeg(&img)
}

fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>> {
    let rgb = img.to_rgb8();
    let mut bytes = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
        encoder.encode_image(&rgb)?;
    }
    Ok(bytes)
}
