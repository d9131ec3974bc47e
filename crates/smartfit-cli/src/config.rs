//! Configuration file management for smartfit.
//!
//! Provides a TOML-based config file at `~/.config/smartfit/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use smartfit_core::generator::DEFAULT_MODEL;
use smartfit_core::generator::gemini::API_KEY_ENV;
use smartfit_store::StoreConfig;

/// Environment variable overriding the Gemini model.
pub const MODEL_ENV: &str = "SMARTFIT_MODEL";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub gemini: GeminiSection,
    #[serde(default)]
    pub storage: StorageSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GeminiSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StorageSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the smartfit config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/smartfit` or `~/.config/smartfit`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("smartfit");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("smartfit")
}

/// Return the path to the smartfit config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file at `path`.
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))
}

/// Load the config file if one exists. A missing file is not an error.
pub fn load_config() -> Result<Option<ConfigFile>> {
    let path = config_path();
    if !path.exists() {
        return Ok(None);
    }
    load_config_from(&path).map(Some)
}

/// Serialize and write the config file to `path`, creating parent dirs as
/// needed. Sets file permissions to 0600 on Unix.
pub fn save_config_to(config: &ConfigFile, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values given on the command line, before resolution.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub data_dir: Option<PathBuf>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct SmartfitConfig {
    api_key: Option<String>,
    pub model: String,
    pub store_config: StoreConfig,
}

impl SmartfitConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - API key: `--api-key` > `GEMINI_API_KEY` > `gemini.api_key` > none
    /// - Model: `--model` > `SMARTFIT_MODEL` > `gemini.model` > `gemini-2.5-flash`
    /// - Data dir: `--data-dir` > `SMARTFIT_DATA_DIR` > `storage.data_dir` > platform data dir
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let file = load_config()?.unwrap_or_default();
        Ok(Self::resolve_with(cli, file))
    }

    fn resolve_with(cli: &CliOverrides, file: ConfigFile) -> Self {
        let env = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let api_key = cli
            .api_key
            .clone()
            .or_else(|| env(API_KEY_ENV))
            .or(file.gemini.api_key);

        let model = cli
            .model
            .clone()
            .or_else(|| env(MODEL_ENV))
            .or(file.gemini.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_owned());

        let store_config = match cli
            .data_dir
            .clone()
            .or_else(|| env(StoreConfig::ENV_VAR).map(PathBuf::from))
            .or(file.storage.data_dir)
        {
            Some(dir) => StoreConfig::new(dir),
            None => StoreConfig::new(StoreConfig::default_dir()),
        };

        Self {
            api_key,
            model,
            store_config,
        }
    }

    /// The Gemini API key, or an error telling the user how to set one.
    pub fn api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) => Ok(key),
            None => bail!(
                "Gemini API key not found; set {API_KEY_ENV}, pass --api-key, or run `smartfit init`"
            ),
        }
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        crate::test_util::lock_env()
    }

    fn clear_env() {
        unsafe { std::env::remove_var(API_KEY_ENV) };
        unsafe { std::env::remove_var(MODEL_ENV) };
        unsafe { std::env::remove_var(StoreConfig::ENV_VAR) };
    }

    fn file_config() -> ConfigFile {
        ConfigFile {
            gemini: GeminiSection {
                api_key: Some("file-key".into()),
                model: Some("file-model".into()),
            },
            storage: StorageSection {
                data_dir: Some(PathBuf::from("/from/file")),
            },
        }
    }

    #[test]
    fn save_and_load_config_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("smartfit").join("config.toml");

        save_config_to(&file_config(), &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded.gemini.api_key.as_deref(), Some("file-key"));
        assert_eq!(loaded.gemini.model.as_deref(), Some("file-model"));
        assert_eq!(loaded.storage.data_dir, Some(PathBuf::from("/from/file")));
    }

    #[cfg(unix)]
    #[test]
    fn save_config_sets_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        save_config_to(&ConfigFile::default(), &path).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }

    #[test]
    fn partial_config_file_parses() {
        let cfg: ConfigFile = toml::from_str("[gemini]\nmodel = \"gemini-2.5-pro\"\n").unwrap();
        assert_eq!(cfg.gemini.model.as_deref(), Some("gemini-2.5-pro"));
        assert!(cfg.gemini.api_key.is_none());
        assert!(cfg.storage.data_dir.is_none());
    }

    #[test]
    fn cli_flags_override_everything() {
        let _lock = lock_env();
        clear_env();
        unsafe { std::env::set_var(API_KEY_ENV, "env-key") };
        unsafe { std::env::set_var(MODEL_ENV, "env-model") };

        let cli = CliOverrides {
            api_key: Some("cli-key".into()),
            model: Some("cli-model".into()),
            data_dir: Some(PathBuf::from("/from/cli")),
        };
        let config = SmartfitConfig::resolve_with(&cli, file_config());

        assert_eq!(config.api_key().unwrap(), "cli-key");
        assert_eq!(config.model, "cli-model");
        assert_eq!(config.store_config.data_dir, PathBuf::from("/from/cli"));
        clear_env();
    }

    #[test]
    fn env_vars_override_config_file() {
        let _lock = lock_env();
        clear_env();
        unsafe { std::env::set_var(API_KEY_ENV, "env-key") };
        unsafe { std::env::set_var(StoreConfig::ENV_VAR, "/from/env") };

        let config = SmartfitConfig::resolve_with(&CliOverrides::default(), file_config());

        assert_eq!(config.api_key().unwrap(), "env-key");
        assert_eq!(config.model, "file-model");
        assert_eq!(config.store_config.data_dir, PathBuf::from("/from/env"));
        clear_env();
    }

    #[test]
    fn defaults_when_nothing_set() {
        let _lock = lock_env();
        clear_env();

        let config = SmartfitConfig::resolve_with(&CliOverrides::default(), ConfigFile::default());

        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.store_config.data_dir, StoreConfig::default_dir());
        let msg = config.api_key().unwrap_err().to_string();
        assert!(msg.contains("API key not found"), "unexpected error: {msg}");
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let path = config_path();
        assert!(
            path.ends_with("smartfit/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }
}
