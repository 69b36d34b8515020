//! 注目領域のオーバーレイ表示
//!
//! 正規化座標をそのまま百分率へ線形変換する。

use serde::{Deserialize, Serialize};

use crate::types::BoundingBox;

/// ラベルがない場合の表示名
pub const FALLBACK_LABEL: &str = "Abnormality";

/// 座標の扱い
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoxPolicy {
    /// 受け取った座標をそのまま使う（範囲外・反転もそのまま描画）
    #[default]
    Passthrough,
    /// [0,1]に収め、反転した範囲は入れ替える
    Clamp,
}

/// 表示画像に対する百分率の矩形
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
}

impl OverlayBox {
    pub fn from_bbox(bbox: &BoundingBox) -> Self {
        Self::with_policy(bbox, BoxPolicy::Passthrough)
    }

    pub fn with_policy(bbox: &BoundingBox, policy: BoxPolicy) -> Self {
        let (xmin, ymin, xmax, ymax) = match policy {
            BoxPolicy::Passthrough => (bbox.xmin, bbox.ymin, bbox.xmax, bbox.ymax),
            BoxPolicy::Clamp => {
                let (x0, x1) = ordered(clamp01(bbox.xmin), clamp01(bbox.xmax));
                let (y0, y1) = ordered(clamp01(bbox.ymin), clamp01(bbox.ymax));
                (x0, y0, x1, y1)
            }
        };

        let label = bbox
            .label
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(FALLBACK_LABEL)
            .to_string();

        Self {
            left: xmin * 100.0,
            top: ymin * 100.0,
            width: (xmax - xmin) * 100.0,
            height: (ymax - ymin) * 100.0,
            label,
        }
    }

    /// 絶対配置用のCSS
    pub fn style(&self) -> String {
        format!(
            "left: {}%; top: {}%; width: {}%; height: {}%;",
            self.left, self.top, self.width, self.height
        )
    }

    /// CLI表示用の1行
    pub fn to_text_row(&self) -> String {
        format!(
            "{}: left={:.1}% top={:.1}% width={:.1}% height={:.1}%",
            self.label, self.left, self.top, self.width, self.height
        )
    }
}

/// 注釈列をオーバーレイ列へ（順序は維持）
pub fn layout_overlays(annotations: &[BoundingBox], policy: BoxPolicy) -> Vec<OverlayBox> {
    annotations
        .iter()
        .map(|bbox| OverlayBox::with_policy(bbox, policy))
        .collect()
}

fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
