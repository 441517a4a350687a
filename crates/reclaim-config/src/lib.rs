//! reclaim の設定ファイル探索と読み込み

pub mod error;
pub mod parser;
pub mod settings;

pub use error::*;
pub use parser::parse_settings;
pub use settings::{ClusterSettings, DiskSettings, Settings};

use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "RECLAIM_CONFIG_PATH";

/// reclaim のグローバル設定ディレクトリ (~/.config/reclaim)
pub fn get_config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("reclaim"))
}

/// 設定ファイルを探す
///
/// 以下の優先順位で設定ファイルを検索:
/// 1. 環境変数 RECLAIM_CONFIG_PATH (直接パス指定、存在しなければエラー)
/// 2. カレントディレクトリ: reclaim.local.kdl, reclaim.kdl
/// 3. ~/.config/reclaim/reclaim.kdl (グローバル設定)
///
/// どれも見つからなければ `None` (デフォルト設定で動作する)
pub fn find_config_file() -> Result<Option<PathBuf>> {
    // 1. 環境変数で直接指定
    if let Some(config_path) = std::env::var_os(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if !path.exists() {
            return Err(ConfigError::ConfigFileNotFound(path));
        }
        return Ok(Some(path));
    }

    // 2. カレントディレクトリで検索
    let current_dir = std::env::current_dir()?;
    for filename in ["reclaim.local.kdl", "reclaim.kdl"] {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    // 3. グローバル設定ファイル
    if let Ok(config_dir) = get_config_dir() {
        let global_config = config_dir.join("reclaim.kdl");
        if global_config.exists() {
            return Ok(Some(global_config));
        }
    }

    Ok(None)
}

/// 設定ファイルを読み込む (環境変数は未適用)
pub fn load_file(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Err(ConfigError::ConfigFileNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let mut settings = parse_settings(&content)?;
    settings.source = Some(path.to_path_buf());
    Ok(settings)
}

/// 設定を解決する: 明示パスまたは探索したファイル、その上に環境変数
///
/// CLI フラグの適用は呼び出し側で行う
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file()?,
    };

    let mut settings = match path {
        Some(path) => load_file(&path)?,
        None => Settings::default(),
    };
    settings.apply_env()?;
    Ok(settings)
}
