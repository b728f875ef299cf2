// File: manager/src/config/manager.rs
use super::{Config, Secrets};
use anyhow::{anyhow, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::info;

pub struct ConfigManager {
    current_config: Arc<Config>,
    secrets: Arc<Secrets>,
}

impl ConfigManager {
    pub async fn new(config_dir: String) -> Result<Self> {
        let config = Self::load_configuration(&config_dir).await?;
        let secrets = Secrets::load(&Path::new(&config_dir).join("secrets.toml"))?;

        Ok(Self {
            current_config: Arc::new(config),
            secrets: Arc::new(secrets),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    pub fn get_secrets(&self) -> Arc<Secrets> {
        self.secrets.clone()
    }

    async fn load_configuration(config_dir: &str) -> Result<Config> {
        let main_config_path = format!("{}/main.toml", config_dir);
        let main_config_content = fs::read_to_string(&main_config_path)
            .await
            .map_err(|e| anyhow!("Failed to read main config {}: {}", main_config_path, e))?;

        let config: Config = toml::from_str(&main_config_content)
            .map_err(|e| anyhow!("Failed to parse main config: {}", e))?;

        // Validate the configured timezone up front so a typo fails startup
        // instead of every poll tick
        config
            .timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|_| anyhow!("Unknown timezone in config: '{}'", config.timezone))?;

        info!(
            "Configuration loaded from {} (timezone: {}, poll interval: {}s)",
            main_config_path, config.timezone, config.poll_interval_seconds
        );

        Ok(config)
    }
}
