//! ボトムシートの高さ計算
//!
//! ドラッグ量から新しい高さを求め、`[min, max]` に収める。
//! UIフレームワークに依存しない。

use crate::error::{Error, Result};

/// 画面高さに対する最小比率
pub const MIN_HEIGHT_RATIO: f64 = 0.10;
/// 画面高さに対する最大比率
pub const MAX_HEIGHT_RATIO: f64 = 0.85;

/// シートの高さ範囲
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetBounds {
    pub min: f64,
    pub max: f64,
}

impl SheetBounds {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite()) || min > max {
            return Err(Error::InvalidSheetBounds { min, max });
        }
        Ok(Self { min, max })
    }

    /// 画面高さの10%〜85%
    pub fn for_screen(screen_height: f64) -> Self {
        Self {
            min: screen_height * MIN_HEIGHT_RATIO,
            max: screen_height * MAX_HEIGHT_RATIO,
        }
    }

    pub fn clamp(&self, height: f64) -> f64 {
        if height.is_nan() {
            return self.min;
        }
        height.clamp(self.min, self.max)
    }
}

/// ドラッグ開始時の高さと縦方向の移動量から新しい高さを計算
///
/// 上方向へのドラッグ（`drag_dy < 0`）でシートが伸びる。
pub fn drag_to_height(start_height: f64, drag_dy: f64, bounds: &SheetBounds) -> f64 {
    bounds.clamp(start_height - drag_dy)
}

/// ドラッグ中のシート状態
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BottomSheet {
    bounds: SheetBounds,
    drag_start: f64,
    height: f64,
}

impl BottomSheet {
    /// 共有された高さがあればそれを、なければ最小高さで開始
    pub fn new(bounds: SheetBounds, shared_height: Option<f64>) -> Self {
        let height = bounds.clamp(shared_height.unwrap_or(bounds.min));
        Self {
            bounds,
            drag_start: height,
            height,
        }
    }

    /// 確定済みの高さ
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn bounds(&self) -> SheetBounds {
        self.bounds
    }

    /// ドラッグ開始: 現在の高さを基準にする
    pub fn begin_drag(&mut self) {
        self.drag_start = self.height;
    }

    /// ドラッグ中の表示高さ（確定はしない）
    pub fn drag_to(&self, drag_dy: f64) -> f64 {
        drag_to_height(self.drag_start, drag_dy, &self.bounds)
    }

    /// ドラッグ終了: 高さを確定して返す
    pub fn release(&mut self, drag_dy: f64) -> f64 {
        self.height = self.drag_to(drag_dy);
        self.drag_start = self.height;
        self.height
    }
}
