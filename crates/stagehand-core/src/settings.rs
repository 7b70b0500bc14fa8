//! Resolved settings: one explicit value built at process start.
//!
//! Flags and environment variables arrive already merged by the CLI as
//! [`Overrides`]; [`Settings::resolve`] layers them over the config file and
//! built-in defaults. Nothing here reads the environment itself.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use stagehand_util::errors::StagehandError;

use crate::config::{GlobalConfig, DEFAULT_BASE_URL};

/// Values supplied on the command line (or through their environment fallbacks).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub profile_id: Option<String>,
    /// Armored key text, as passed through `GPG_PRIVATE_KEY`.
    pub private_key: Option<String>,
    pub private_key_file: Option<PathBuf>,
    pub passphrase: Option<String>,
    pub poll_interval_secs: Option<u64>,
    pub max_polls: Option<u32>,
    pub pom: PomDefaults,
}

/// Basic-auth credentials for the repository manager.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// How long and how often to poll a repository while it closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub interval: Duration,
    /// `None` polls until the repository closes.
    pub max_attempts: Option<u32>,
}

impl WaitPolicy {
    pub fn new(interval: Duration, max_attempts: Option<u32>) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Build a policy from config-style values, where `0` attempts means unbounded.
    pub fn from_parts(interval_secs: u64, max_attempts: u32) -> Self {
        Self::new(
            Duration::from_secs(interval_secs),
            (max_attempts > 0).then_some(max_attempts),
        )
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::from_parts(10, 360)
    }
}

/// Elements added to POM files that lack them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomDefaults {
    pub project_url: Option<String>,
    pub license_name: Option<String>,
    pub license_url: Option<String>,
    pub developer_name: Option<String>,
    pub scm_url: Option<String>,
}

impl PomDefaults {
    /// Fill unset fields from `other`.
    pub fn or(self, other: PomDefaults) -> Self {
        Self {
            project_url: self.project_url.or(other.project_url),
            license_name: self.license_name.or(other.license_name),
            license_url: self.license_url.or(other.license_url),
            developer_name: self.developer_name.or(other.developer_name),
            scm_url: self.scm_url.or(other.scm_url),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Clone)]
pub struct NexusSettings {
    /// Always ends with exactly one `/`.
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub profile_id: Option<String>,
}

impl fmt::Debug for NexusSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NexusSettings")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("profile_id", &self.profile_id)
            .finish()
    }
}

#[derive(Clone, Default)]
pub struct SigningSettings {
    pub private_key: Option<String>,
    pub passphrase: Option<String>,
}

impl fmt::Debug for SigningSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningSettings")
            .field("private_key", &self.private_key.as_ref().map(|_| "<armored key>"))
            .field("passphrase", &self.passphrase.as_ref().map(|_| "********"))
            .finish()
    }
}

/// Fully resolved settings passed by reference into every operation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub nexus: NexusSettings,
    pub signing: SigningSettings,
    pub wait: WaitPolicy,
    pub pom: PomDefaults,
}

impl Settings {
    /// Layer `overrides` over `file`, reading the key file if one is named.
    pub fn resolve(file: &GlobalConfig, overrides: Overrides) -> miette::Result<Self> {
        let base_url = overrides
            .base_url
            .or_else(|| file.nexus.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let private_key = match overrides.private_key {
            Some(text) => Some(text),
            None => match overrides
                .private_key_file
                .or_else(|| file.signing.key_file.clone())
            {
                Some(path) => Some(std::fs::read_to_string(&path).map_err(|e| {
                    StagehandError::Config {
                        message: format!("Cannot read private key file {}: {e}", path.display()),
                    }
                })?),
                None => None,
            },
        };

        let pom_file = PomDefaults {
            project_url: file.pom.project_url.clone(),
            license_name: file.pom.license_name.clone(),
            license_url: file.pom.license_url.clone(),
            developer_name: file.pom.developer_name.clone(),
            scm_url: file.pom.scm_url.clone(),
        };

        Ok(Self {
            nexus: NexusSettings {
                base_url: normalize_base_url(&base_url),
                username: overrides.username.or_else(|| file.nexus.username.clone()),
                password: overrides.password.or_else(|| file.nexus.password.clone()),
                profile_id: overrides
                    .profile_id
                    .or_else(|| file.nexus.profile_id.clone()),
            },
            signing: SigningSettings {
                private_key,
                passphrase: overrides
                    .passphrase
                    .or_else(|| file.signing.passphrase.clone()),
            },
            wait: WaitPolicy::from_parts(
                overrides.poll_interval_secs.unwrap_or(file.wait.interval_secs),
                overrides.max_polls.unwrap_or(file.wait.max_attempts),
            ),
            pom: overrides.pom.or(pom_file),
        })
    }

    /// Credentials for the repository manager, or a configuration error naming what is missing.
    pub fn credentials(&self) -> miette::Result<Credentials> {
        let username = self.nexus.username.clone().ok_or_else(|| StagehandError::Config {
            message: "Please specify --username or the SONATYPE_NEXUS_USERNAME environment variable"
                .to_string(),
        })?;
        let password = self.nexus.password.clone().ok_or_else(|| StagehandError::Config {
            message: "Please specify --password or the SONATYPE_NEXUS_PASSWORD environment variable"
                .to_string(),
        })?;
        Ok(Credentials { username, password })
    }

    /// Armored private key and its passphrase, or a configuration error naming what is missing.
    pub fn signing_key(&self) -> miette::Result<(&str, &str)> {
        let key = self.signing.private_key.as_deref().ok_or_else(|| StagehandError::Config {
            message: "Please specify --private-key or the GPG_PRIVATE_KEY environment variable"
                .to_string(),
        })?;
        let passphrase = self.signing.passphrase.as_deref().ok_or_else(|| {
            StagehandError::Config {
                message: "Please specify --private-key-password or the GPG_PRIVATE_KEY_PASSWORD environment variable"
                    .to_string(),
            }
        })?;
        Ok((key, passphrase))
    }
}

/// Trim trailing slashes and append exactly one.
pub fn normalize_base_url(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}
