use super::{CompanionConfig, GatewayConfig, GuardrailConfig, ObservabilityConfig};
use crate::error::ConfigError;
use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (audit log lives here) - computed from home, not serialized
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub companion: CompanionConfig,

    #[serde(default)]
    pub guardrail: GuardrailConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

fn home_dir() -> PathBuf {
    UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf())
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw.trim()).into_owned())
}

impl Default for Config {
    fn default() -> Self {
        let mistward_dir = home_dir().join(".mistward");

        Self {
            data_dir: mistward_dir.join("data"),
            config_path: mistward_dir.join("config.toml"),
            gateway: GatewayConfig::default(),
            companion: CompanionConfig::default(),
            guardrail: GuardrailConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Self::load_or_init_in(&home.join(".mistward"))
    }

    /// Load `<dir>/config.toml`, writing defaults on first run.
    pub fn load_or_init_in(mistward_dir: &Path) -> Result<Self> {
        let config_path = mistward_dir.join("config.toml");

        if !mistward_dir.exists() {
            fs::create_dir_all(mistward_dir).context("Failed to create .mistward directory")?;
        }

        let mut config = if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.config_path.clone_from(&config_path);
            config.data_dir = mistward_dir.join("data");
            config
        } else {
            let config = Self {
                config_path: config_path.clone(),
                data_dir: mistward_dir.join("data"),
                ..Self::default()
            };
            config.save()?;
            config
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("MISTWARD_HOST") {
            if !host.trim().is_empty() {
                self.gateway.host = host.trim().to_string();
            }
        }

        if let Ok(port_str) = std::env::var("MISTWARD_PORT") {
            if let Ok(port) = port_str.trim().parse::<u16>() {
                self.gateway.port = port;
            }
        }

        if let Ok(path) = std::env::var("MISTWARD_GUARDRAIL_LOG") {
            if !path.trim().is_empty() {
                self.guardrail.log_path = Some(path);
            }
        }

        if let Ok(dir) = std::env::var("MISTWARD_DESKTOP_DIR") {
            if !dir.trim().is_empty() {
                self.companion.desktop_dir = Some(dir);
            }
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.companion.probe_port == 0 {
            return Err(ConfigError::Validation(
                "companion.probe_port must be non-zero".into(),
            ));
        }
        if self.companion.probe_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "companion.probe_timeout_ms must be non-zero".into(),
            ));
        }
        if self.gateway.host.trim().is_empty() {
            return Err(ConfigError::Validation("gateway.host cannot be empty".into()));
        }
        Ok(())
    }

    pub fn guardrail_log_path(&self) -> PathBuf {
        self.guardrail.log_path.as_deref().map_or_else(
            || self.data_dir.join("guardrail_events.jsonl"),
            expand_path,
        )
    }

    /// Directory CreateFile writes into.
    pub fn desktop_dir(&self) -> PathBuf {
        if let Some(dir) = self.companion.desktop_dir.as_deref() {
            return expand_path(dir);
        }
        match UserDirs::new() {
            Some(dirs) => dirs
                .desktop_dir()
                .map_or_else(|| dirs.home_dir().to_path_buf(), Path::to_path_buf),
            None => PathBuf::from("."),
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.companion.probe_timeout_ms)
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}
