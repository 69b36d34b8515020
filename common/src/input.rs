//! 入力の保持（テキストと画像1枚）
//!
//! ドラッグ&ドロップはメディアタイプを検証するが、ファイル選択ダイアログ経由は
//! `accept="image/*"` の指定のみで検証しない。

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{Error, Result};
use crate::notifier::{Notifier, Toast};
use crate::types::{ImageFile, Task};

pub const INVALID_DROP_MESSAGE: &str = "Please drop a valid image file.";

/// 画像の入手経路
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// ドラッグ&ドロップ（image/* 以外は拒否）
    Dropped,
    /// ファイル選択（検証なし）
    Picked,
}

/// プレビュー生成の照合用トークン
///
/// 画像が差し替え・削除された後に古いデコード結果が届いても適用しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewToken(u64);

/// 1ページ分の未送信入力
#[derive(Debug, Clone, Default)]
pub struct InputState {
    text: String,
    image: Option<ImageFile>,
    preview_uri: Option<String>,
    image_generation: u64,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn image(&self) -> Option<&ImageFile> {
        self.image.as_ref()
    }

    pub fn preview_uri(&self) -> Option<&str> {
        self.preview_uri.as_deref()
    }

    pub fn set_text(&mut self, value: impl Into<String>) {
        self.text = value.into();
    }

    /// 画像を受け付ける
    ///
    /// ドロップされた非画像ファイルはエラー通知を1件出して拒否し、既存の画像とプレビューは残す。
    /// 受け付けた場合はプレビューを消し、デコード完了時に渡すトークンを返す。
    pub fn set_image(
        &mut self,
        file: ImageFile,
        source: ImageSource,
        notifier: &mut dyn Notifier,
    ) -> Result<PreviewToken> {
        if source == ImageSource::Dropped && !file.is_image() {
            notifier.notify(Toast::error(INVALID_DROP_MESSAGE));
            return Err(Error::NotAnImage(file.name));
        }

        self.image = Some(file);
        self.preview_uri = None;
        self.image_generation += 1;
        Ok(PreviewToken(self.image_generation))
    }

    /// 非同期デコードの結果を反映。トークンが古ければ捨ててfalse
    pub fn apply_preview(&mut self, token: PreviewToken, uri: String) -> bool {
        if self.image.is_none() || token.0 != self.image_generation {
            return false;
        }
        self.preview_uri = Some(uri);
        true
    }

    /// 画像とプレビューを削除（テキストは残す）
    pub fn clear_image(&mut self) {
        self.image = None;
        self.preview_uri = None;
        self.image_generation += 1;
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// テキスト（空白除去後）か画像のどちらかがあれば送信可能
    pub fn can_submit(&self) -> bool {
        self.has_text() || self.image.is_some()
    }

    /// タスクごとの送信可否（画像診断は画像必須）
    pub fn can_submit_for(&self, task: Task) -> bool {
        if task.requires_image() {
            self.image.is_some()
        } else {
            self.can_submit()
        }
    }
}

/// ドロップされたファイルを読み込む前に検査する
///
/// `(名前, メディアタイプ)`。ファイルがない（テキストのドラッグなど）場合と
/// `image/*` 以外はエラー通知を1件出して拒否する。
pub fn check_drop(file: Option<(&str, &str)>, notifier: &mut dyn Notifier) -> Result<()> {
    match file {
        Some((_, media_type)) if media_type.starts_with("image/") => Ok(()),
        other => {
            notifier.notify(Toast::error(INVALID_DROP_MESSAGE));
            let name = other.map(|(name, _)| name.to_string()).unwrap_or_default();
            Err(Error::NotAnImage(name))
        }
    }
}

/// 画像を `data:<media>;base64,...` 形式のプレビューURIへ変換
///
/// メディアタイプが不明な場合は `application/octet-stream` とする。
pub fn encode_preview(file: &ImageFile) -> String {
    let media_type = if file.media_type.is_empty() {
        "application/octet-stream"
    } else {
        file.media_type.as_str()
    };
    format!("data:{};base64,{}", media_type, STANDARD.encode(&file.bytes))
}
