//! バックエンドAPIの定数とURL解決

pub const ANALYZE_TEXT: &str = "/api/analyze_text";
pub const ANALYZE_NOTE_MULTIMODAL: &str = "/api/analyze_note_multimodal";
pub const SIMPLIFY_REPORT: &str = "/api/simplify_report";
pub const SIMPLIFY_REPORT_MULTIMODAL: &str = "/api/simplify_report_multimodal";
pub const ANALYZE_IMAGE: &str = "/api/analyze_image";
pub const HEALTH: &str = "/api/health";

/// multipartの画像フィールド名
pub const FILE_FIELD: &str = "file";
/// multipartのテキストフィールド名
pub const PROMPT_FIELD: &str = "prompt";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
/// ベースURLを上書きする環境変数
pub const API_URL_ENV: &str = "MEDSUPPORT_API_URL";

/// ベースURLを決定する
///
/// 優先順位: 環境変数 → 設定ファイル → `DEFAULT_API_URL`。
/// 空文字は未設定として扱い、末尾の`/`は取り除く。
pub fn resolve_base_url(from_env: Option<&str>, from_config: Option<&str>) -> String {
    [from_env, from_config]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_string()
}

/// ベースURLとパスを結合
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
