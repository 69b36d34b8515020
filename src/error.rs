use thiserror::Error;

#[derive(Error, Debug)]
pub enum MedSupportError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("HTTPクライアントの初期化に失敗: {0}")]
    HttpClient(String),

    #[error("バックエンドに接続できません: {0}")]
    Unreachable(String),

    /// 入力検証で送信しなかった（通知は表示済み）
    #[error("送信を中止しました: {0}")]
    Rejected(String),

    /// 送信は行ったが失敗した（通知は表示済み）
    #[error("解析に失敗しました: {0}")]
    TaskFailed(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] medsupport_common::Error),
}

pub type Result<T> = std::result::Result<T, MedSupportError>;
