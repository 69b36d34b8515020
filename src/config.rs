use crate::error::{MedSupportError, Result};
use medsupport_common::{api, BoxPolicy, ResponseOrdering};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// バックエンドのベースURL（`--api-url` / MEDSUPPORT_API_URL が優先）
    pub api_url: Option<String>,
    pub timeout_seconds: u64,
    pub response_ordering: ResponseOrdering,
    pub box_policy: BoxPolicy,
    /// 画像診断の既定プロンプトを上書き
    pub diagnostic_prompt: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout_seconds: 120,
            response_ordering: ResponseOrdering::default(),
            box_policy: BoxPolicy::default(),
            diagnostic_prompt: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込み。ファイルがなければ既定値
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MedSupportError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("medsupport").join("config.json"))
    }

    /// 実際に使うベースURL
    ///
    /// `override_url` はその回だけの指定（clapが環境変数も読み込み済み）。
    /// 設定ファイルには書き戻さない。
    pub fn base_url(&self, override_url: Option<&str>) -> String {
        api::resolve_base_url(override_url, self.api_url.as_deref())
    }

    pub fn set_api_url(&mut self, url: String) -> Result<()> {
        self.api_url = Some(url);
        self.save()
    }
}
