//! Configuration file handling for bizdash.
//!
//! The configuration file is stored at `$BIZDASH_HOME/config.json` and holds the address of the
//! backend API along with a few display settings. Exported CSV files are written to
//! `$BIZDASH_HOME/exports` unless another path is given.

use crate::error::{ErrorType, IntoResult, Res};
use crate::model::INVENTORY_PURCHASE;
use crate::views::PAGE_SIZE;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const APP_NAME: &str = "bizdash";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const EXPORTS: &str = "exports";

/// The API address used when none is given to `init`.
pub const DEFAULT_API_URL: &str = "http://localhost:5001/api";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$BIZDASH_HOME` and from there it loads `$BIZDASH_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    exports: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, its `exports` subdirectory and an initial `config.json` that
    /// points at `api_url`.
    ///
    /// # Errors
    /// - Returns an error if `api_url` is not a valid URL or if any file operation fails.
    pub async fn create(dir: impl Into<PathBuf>, api_url: &str) -> Result<Self> {
        Self::create_inner(dir.into(), api_url)
            .await
            .pub_result(ErrorType::Config)
    }

    async fn create_inner(maybe_relative: PathBuf, api_url: &str) -> Res<Self> {
        validate_api_url(api_url)?;

        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the bizdash home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let exports = root.join(EXPORTS);
        utils::make_dir(&exports).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            api_url: api_url.to_string(),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            exports,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `bizdash_home` exists and that the config file exists
    /// - load and validate the config file
    /// - validate that the exports directory exists
    pub async fn load(bizdash_home: impl Into<PathBuf>) -> Result<Self> {
        Self::load_inner(bizdash_home.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn load_inner(maybe_relative: PathBuf) -> Res<Self> {
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The bizdash home directory is missing, run 'bizdash init' first")?;

        let _ = utils::read_dir(&root)
            .await
            .context("The bizdash home directory is unreadable")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let exports = root.join(EXPORTS);
        if !exports.is_dir() {
            bail!("The exports directory is missing '{}'", exports.display())
        }

        Ok(Self {
            root,
            exports,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn exports(&self) -> &Path {
        &self.exports
    }

    /// The base URL of the backend API, e.g. `http://localhost:5001/api`.
    pub fn api_url(&self) -> &str {
        &self.config_file.api_url
    }

    /// Rows per page in reports.
    pub fn page_size(&self) -> usize {
        self.config_file.page_size
    }

    /// The expense category that counts as buying stock.
    pub fn inventory_category(&self) -> &str {
        self.config_file
            .inventory_category
            .as_deref()
            .unwrap_or(INVENTORY_PURCHASE)
    }
}

fn validate_api_url(api_url: &str) -> Res<()> {
    let url = Url::parse(api_url).with_context(|| format!("Invalid API URL '{api_url}'"))?;
    anyhow::ensure!(
        matches!(url.scheme(), "http" | "https"),
        "The API URL must use http or https, got '{}'",
        url.scheme()
    );
    Ok(())
}

fn default_page_size() -> usize {
    PAGE_SIZE
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "bizdash",
///   "config_version": 1,
///   "api_url": "http://localhost:5001/api",
///   "page_size": 10,
///   "inventory_category": "Compra de Inventario"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "bizdash"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Base URL of the backend API
    api_url: String,

    /// Rows per page in reports
    #[serde(default = "default_page_size")]
    page_size: usize,

    /// Overrides the expense category that counts as an inventory purchase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inventory_category: Option<String>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            api_url: DEFAULT_API_URL.to_string(),
            page_size: PAGE_SIZE,
            inventory_category: None,
        }
    }
}

impl ConfigFile {
    /// Loads and validates a ConfigFile from `path`.
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(config.page_size > 0, "page_size must be at least 1");
        validate_api_url(&config.api_url)?;

        Ok(config)
    }

    /// Saves the ConfigFile to `path`.
    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path, data)
            .await
            .context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("bizdash_home");

        let config = Config::create(&home_dir, "https://api.example.com/api")
            .await
            .unwrap();

        assert_eq!("https://api.example.com/api", config.api_url());
        assert_eq!(PAGE_SIZE, config.page_size());
        assert_eq!(INVENTORY_PURCHASE, config.inventory_category());
        assert!(config.exports().is_dir());
        assert!(config.config_path().is_file());

        let loaded = Config::load(&home_dir).await.unwrap();
        assert_eq!(loaded.api_url(), config.api_url());
        assert_eq!(loaded.root(), config.root());
    }

    #[tokio::test]
    async fn test_config_create_invalid_url() {
        let dir = TempDir::new().unwrap();
        let e = Config::create(dir.path(), "not a url").await.unwrap_err();
        assert_eq!(e.kind(), ErrorType::Config);
        assert!(e.message().contains("Invalid API URL"));

        let e = Config::create(dir.path(), "ftp://example.com")
            .await
            .unwrap_err();
        assert!(e.message().contains("http or https"));
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let e = Config::load(dir.path().join("nope")).await.unwrap_err();
        assert_eq!(e.kind(), ErrorType::Config);
        assert!(e.message().contains("bizdash init"));
    }

    #[tokio::test]
    async fn test_config_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let e = Config::load(dir.path()).await.unwrap_err();
        assert!(e.message().contains("config file is missing"));
    }

    #[tokio::test]
    async fn test_config_file_load_with_minimal_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        let json = r#"{
            "app_name": "bizdash",
            "config_version": 1,
            "api_url": "http://10.0.0.5:5001/api"
        }"#;
        utils::write(&path, json).await.unwrap();

        let config = ConfigFile::load(&path).await.unwrap();
        assert_eq!(config.page_size, PAGE_SIZE);
        assert_eq!(config.inventory_category, None);
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        let json = r#"{
            "app_name": "wrong_app",
            "config_version": 1,
            "api_url": "http://localhost:5001/api"
        }"#;
        utils::write(&path, json).await.unwrap();

        let result = ConfigFile::load(&path).await;
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_load_zero_page_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        let json = r#"{
            "app_name": "bizdash",
            "config_version": 1,
            "api_url": "http://localhost:5001/api",
            "page_size": 0
        }"#;
        utils::write(&path, json).await.unwrap();
        assert!(ConfigFile::load(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        let original = ConfigFile {
            page_size: 25,
            inventory_category: Some("Stock".to_string()),
            ..ConfigFile::default()
        };
        original.save(&path).await.unwrap();
        let loaded = ConfigFile::load(&path).await.unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_serialization_omits_default_inventory_category() {
        let json = serde_json::to_string(&ConfigFile::default()).unwrap();
        assert!(!json.contains("inventory_category"));
    }
}
