//! 入力ファイルの読み込み

use crate::error::{MedSupportError, Result};
use image::ImageFormat;
use medsupport_common::ImageFile;
use std::io::Read;
use std::path::Path;

/// 画像ファイルを読み込み、メディアタイプを判定する
///
/// 先頭バイトから判定し、判定できなければ拡張子を見る。どちらも不明なら空文字。
pub fn load_image(path: &Path) -> Result<ImageFile> {
    if !path.is_file() {
        return Err(MedSupportError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| MedSupportError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    let media_type = detect_media_type(path, &bytes);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(ImageFile::new(name, media_type, bytes))
}

pub fn detect_media_type(path: &Path, bytes: &[u8]) -> String {
    image::guess_format(bytes)
        .ok()
        .or_else(|| ImageFormat::from_path(path).ok())
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_default()
}

/// テキストを読み込む（`-` は標準入力）
pub fn load_text(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }

    if !path.is_file() {
        return Err(MedSupportError::FileNotFound(path.display().to_string()));
    }
    Ok(std::fs::read_to_string(path)?)
}
