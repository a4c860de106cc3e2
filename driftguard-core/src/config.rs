//! Configuration system for DriftGuard.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment.
//! Command-line flags are applied by the caller on top of the loaded value.
//! Configuration is loaded from `~/.config/driftguard/config.toml` and/or
//! `.driftguard/config.toml` in the workspace directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::drift::{DEFAULT_BUCKETS, MAX_BUCKETS};
use crate::error::DriftError;
use crate::server::ServerConfig;

/// Top-level configuration shared by the CLI and the drift service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriftGuardConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub drift: DriftConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where the reference and current snapshots live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Training-time snapshot.
    #[serde(default = "default_reference_path")]
    pub reference_path: PathBuf,
    /// Production-time snapshot.
    #[serde(default = "default_current_path")]
    pub current_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            reference_path: default_reference_path(),
            current_path: default_current_path(),
        }
    }
}

fn default_reference_path() -> PathBuf {
    PathBuf::from("data/processed/reference.csv")
}

fn default_current_path() -> PathBuf {
    PathBuf::from("data/processed/current.csv")
}

/// Drift computation settings.
///
/// The retrain threshold is deliberately absent: it is a fixed constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftConfig {
    /// Histogram buckets for PSI.
    #[serde(default = "default_buckets")]
    pub buckets: usize,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            buckets: default_buckets(),
        }
    }
}

fn default_buckets() -> usize {
    DEFAULT_BUCKETS
}

impl DriftGuardConfig {
    /// Reject values no evaluation could use.
    pub fn validate(&self) -> Result<(), DriftError> {
        if self.drift.buckets == 0 {
            return Err(DriftError::config("drift.buckets must be at least 1"));
        }
        if self.drift.buckets > MAX_BUCKETS {
            return Err(DriftError::config(format!(
                "drift.buckets must be at most {MAX_BUCKETS}"
            )));
        }
        Ok(())
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "driftguard", "driftguard")
}

/// Workspace-level config file location.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".driftguard").join("config.toml")
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with `DRIFTGUARD_`)
/// 2. Workspace-local config (`.driftguard/config.toml`)
/// 3. User config (`~/.config/driftguard/config.toml`)
/// 4. Built-in defaults
pub fn load_config(workspace: Option<&Path>) -> Result<DriftGuardConfig, DriftError> {
    let mut figment = Figment::from(Serialized::defaults(DriftGuardConfig::default()));

    if let Some(dirs) = project_dirs() {
        let user_config = dirs.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // DRIFTGUARD_DATA__REFERENCE_PATH, DRIFTGUARD_DRIFT__BUCKETS, DRIFTGUARD_SERVER__PORT, ...
    figment = figment.merge(Env::prefixed("DRIFTGUARD_").split("__"));

    let config: DriftGuardConfig = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Check whether any DriftGuard configuration file exists (user-level or workspace-level).
pub fn config_exists(workspace: Option<&Path>) -> bool {
    if let Some(dirs) = project_dirs() {
        if dirs.config_dir().join("config.toml").exists() {
            return true;
        }
    }
    workspace.is_some_and(|ws| workspace_config_path(ws).exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DriftGuardConfig::default();
        assert_eq!(
            config.data.reference_path,
            PathBuf::from("data/processed/reference.csv")
        );
        assert_eq!(
            config.data.current_path,
            PathBuf::from("data/processed/current.csv")
        );
        assert_eq!(config.drift.buckets, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_buckets_rejected() {
        let mut config = DriftGuardConfig::default();
        config.drift.buckets = 0;
        assert!(matches!(config.validate(), Err(DriftError::Config(_))));
    }

    #[test]
    fn test_workspace_file_and_env_layering() {
        figment::Jail::expect_with(|jail| {
            jail.create_dir(".driftguard")?;
            jail.create_file(
                ".driftguard/config.toml",
                r#"
                [data]
                reference_path = "snapshots/train.csv"

                [drift]
                buckets = 20
                "#,
            )?;
            jail.set_env("DRIFTGUARD_DRIFT__BUCKETS", "5");

            let config = load_config(Some(jail.directory()))
                .map_err(|e| e.to_string())?;
            assert_eq!(
                config.data.reference_path,
                PathBuf::from("snapshots/train.csv")
            );
            assert_eq!(
                config.data.current_path,
                PathBuf::from("data/processed/current.csv")
            );
            assert_eq!(config.drift.buckets, 5);
            Ok(())
        });
    }

    #[test]
    fn test_env_without_workspace() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DRIFTGUARD_DATA__CURRENT_PATH", "env.csv");
            let config = load_config(None).map_err(|e| e.to_string())?;
            assert_eq!(config.data.current_path, PathBuf::from("env.csv"));
            Ok(())
        });
    }

    #[test]
    fn test_excessive_buckets_rejected() {
        let mut config = DriftGuardConfig::default();
        config.drift.buckets = MAX_BUCKETS;
        assert!(config.validate().is_ok());
        config.drift.buckets = MAX_BUCKETS + 1;
        assert!(matches!(config.validate(), Err(DriftError::Config(_))));
    }

    #[test]
    fn test_excessive_buckets_from_env_fail_to_load() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DRIFTGUARD_DRIFT__BUCKETS", "18446744073709551615");
            assert!(load_config(Some(jail.directory())).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_toml_round_trip() {
        let config = DriftGuardConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("reference_path"));
        let parsed: DriftGuardConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }
}
