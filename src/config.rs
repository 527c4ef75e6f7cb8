use crate::error::{BridgeGeoError, Result};
use crate::overpass::FetchPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 既定のOverpassミラー（優先順）
pub const DEFAULT_MIRRORS: &[&str] = &[
    "https://lz4.overpass-api.de/api/interpreter",
    "https://overpass-api.de/api/interpreter",
    "https://overpass.kumi.systems/api/interpreter",
];

pub const DEFAULT_SHEET_NAME: &str = "橋リスト";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub mirrors: Vec<String>,
    pub retries: u32,
    pub wait_seconds: u64,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub sheet_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mirrors: DEFAULT_MIRRORS.iter().map(|m| m.to_string()).collect(),
            retries: 3,
            wait_seconds: 5,
            timeout_seconds: 90,
            user_agent: format!("bridge-geo/{}", env!("CARGO_PKG_VERSION")),
            sheet_name: DEFAULT_SHEET_NAME.into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// `config` サブコマンド用。reset なら壊れたファイルも読まない
    pub fn load_for_edit(reset: bool) -> Result<Self> {
        Self::load_from_for_edit(&Self::config_path()?, reset)
    }

    pub fn load_from_for_edit(path: &Path, reset: bool) -> Result<Self> {
        if reset {
            Ok(Self::default())
        } else {
            Self::load_from(path)
        }
    }

    /// ファイルがなければ既定値
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
            .ok_or_else(|| BridgeGeoError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("bridge-geo").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.mirrors.iter().all(|m| m.trim().is_empty()) {
            return Err(BridgeGeoError::Config("ミラーURLが1件も設定されていません".into()));
        }
        if self.retries == 0 {
            return Err(BridgeGeoError::Config("リトライ回数は1以上にしてください".into()));
        }
        Ok(())
    }

    /// 空文字を除いたミラー一覧
    pub fn mirror_list(&self) -> Vec<String> {
        self.mirrors
            .iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect()
    }

    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            retries: self.retries,
            wait: Duration::from_secs(self.wait_seconds),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// コマンドライン指定で一時的に上書き（ミラー指定時は一覧ごと置き換え）
    pub fn with_fetch_overrides(&self, mirrors: &[String], retries: Option<u32>, wait_seconds: Option<u64>) -> Self {
        let mut config = self.clone();
        if !mirrors.is_empty() {
            config.mirrors = mirrors.to_vec();
        }
        if let Some(retries) = retries {
            config.retries = retries;
        }
        if let Some(wait) = wait_seconds {
            config.wait_seconds = wait;
        }
        config
    }

    pub fn add_mirror(&mut self, url: String) {
        if !self.mirrors.contains(&url) {
            self.mirrors.push(url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mirrors.len(), 3);
        assert_eq!(config.sheet_name, "橋リスト");
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&dir.path().join("none.json")).expect("読み込み失敗");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.retries = 5;
        config.add_mirror("http://localhost:12345/api/interpreter".into());
        config.save_to(&path).expect("保存失敗");

        let loaded = Config::load_from(&path).expect("読み込み失敗");
        assert_eq!(loaded.retries, 5);
        assert_eq!(loaded.mirrors.len(), 4);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"retries": 7}"#).unwrap();

        let config = Config::load_from(&path).expect("読み込み失敗");
        assert_eq!(config.retries, 7);
        assert_eq!(config.wait_seconds, 5);
        assert_eq!(config.mirrors.len(), 3);
    }

    #[test]
    fn test_validate_rejects_empty_mirrors_and_zero_retries() {
        let mut config = Config::default();
        config.mirrors = vec!["  ".into()];
        assert!(matches!(config.validate(), Err(BridgeGeoError::Config(_))));

        let mut config = Config::default();
        config.retries = 0;
        assert!(matches!(config.validate(), Err(BridgeGeoError::Config(_))));
    }

    /// 壊れた設定ファイルでも reset なら既定値で編集できる
    #[test]
    fn test_load_for_edit_ignores_corrupt_file_on_reset() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ broken").unwrap();

        let config = Config::load_from_for_edit(&path, true).expect("reset で失敗");
        assert_eq!(config, Config::default());

        assert!(matches!(
            Config::load_from_for_edit(&path, false),
            Err(BridgeGeoError::JsonParse(_))
        ));
    }

    #[test]
    fn test_add_mirror_dedup() {
        let mut config = Config::default();
        config.add_mirror(DEFAULT_MIRRORS[0].to_string());
        assert_eq!(config.mirrors.len(), 3);
    }

    #[test]
    fn test_with_fetch_overrides() {
        let base = Config::default();
        let overridden = base.with_fetch_overrides(&["http://localhost/api".to_string()], Some(1), None);
        assert_eq!(overridden.mirrors, vec!["http://localhost/api"]);
        assert_eq!(overridden.retries, 1);
        assert_eq!(overridden.wait_seconds, base.wait_seconds);

        let untouched = base.with_fetch_overrides(&[], None, None);
        assert_eq!(untouched, base);
    }

    #[test]
    fn test_fetch_policy() {
        let config = Config { retries: 4, wait_seconds: 2, ..Config::default() };
        let policy = config.fetch_policy();
        assert_eq!(policy.retries, 4);
        assert_eq!(policy.wait, Duration::from_secs(2));
    }
}
