//! エラー型定義

use thiserror::Error;

/// 共通エラー型
///
/// UI境界ではどのエラーも通知1件として表示され、ページの状態はリセットされる。
#[derive(Error, Debug)]
pub enum Error {
    /// 入力なしで送信しようとした
    #[error("Validation error: {0}")]
    Validation(String),

    /// ドロップされたファイルが画像ではない
    #[error("Not an image: {0}")]
    NotAnImage(String),

    /// 2xx以外のステータス（ボディは読まない）
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// ネットワーク/サーバー系の失敗か
    pub fn is_backend_failure(&self) -> bool {
        matches!(self, Error::Http { .. } | Error::Network(_) | Error::Json(_))
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
