use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use stagehand_util::errors::StagehandError;

/// Default base URL of the OSSRH Nexus staging service.
pub const DEFAULT_BASE_URL: &str = "https://oss.sonatype.org/service/local/";

/// User configuration loaded from `~/.stagehand/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub nexus: NexusConfig,

    #[serde(default)]
    pub signing: SigningConfig,

    #[serde(default)]
    pub wait: WaitConfig,

    #[serde(default)]
    pub pom: PomConfig,
}

/// Repository manager settings from `[nexus]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NexusConfig {
    #[serde(default, rename = "base-url")]
    pub base_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, rename = "profile-id")]
    pub profile_id: Option<String>,
}

/// Key material settings from `[signing]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SigningConfig {
    #[serde(default, rename = "key-file")]
    pub key_file: Option<PathBuf>,
    #[serde(default)]
    pub passphrase: Option<String>,
}

/// Close-polling settings from `[wait]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitConfig {
    #[serde(default = "default_interval_secs", rename = "interval-secs")]
    pub interval_secs: u64,
    /// `0` polls forever.
    #[serde(default = "default_max_attempts", rename = "max-attempts")]
    pub max_attempts: u32,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_interval_secs() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    360
}

/// Defaults injected into POM files that lack the corresponding element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PomConfig {
    #[serde(default, rename = "project-url")]
    pub project_url: Option<String>,
    #[serde(default, rename = "license-name")]
    pub license_name: Option<String>,
    #[serde(default, rename = "license-url")]
    pub license_url: Option<String>,
    #[serde(default, rename = "developer-name")]
    pub developer_name: Option<String>,
    #[serde(default, rename = "scm-url")]
    pub scm_url: Option<String>,
}

impl GlobalConfig {
    /// Load the configuration from `~/.stagehand/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load the configuration from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            tracing::debug!("no config file at {}", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| StagehandError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| {
            StagehandError::Config {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Returns the default path to the config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }
}

/// Returns the path to the stagehand data directory (`~/.stagehand/`).
pub fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".stagehand")
}
