use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persistent CLI settings: which server to talk to and the token to present
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    pub server_url: String,
    pub token: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Up,
    Down,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000".to_string(),
            token: None,
            updated_at: None,
        }
    }
}

impl CliConfig {
    pub fn endpoint(&self, path: &str) -> anyhow::Result<url::Url> {
        let base = url::Url::parse(&self.server_url)
            .map_err(|e| anyhow::anyhow!("Invalid server URL '{}': {}", self.server_url, e))?;
        Ok(base.join(path)?)
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("PORTAL_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("compliance-portal").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_cli_config() -> anyhow::Result<CliConfig> {
    let config_file = get_config_dir()?.join("cli.json");

    if !config_file.exists() {
        return Ok(CliConfig::default());
    }

    let content = fs::read_to_string(config_file)?;
    let config: CliConfig = serde_json::from_str(&content)?;
    Ok(config)
}

pub fn save_cli_config(config: &CliConfig) -> anyhow::Result<()> {
    let config_file = get_config_dir()?.join("cli.json");

    let mut config = config.clone();
    config.updated_at = Some(Utc::now());
    fs::write(config_file, serde_json::to_string_pretty(&config)?)?;
    Ok(())
}

pub async fn ping_server(config: &CliConfig) -> ServerStatus {
    let Ok(url) = config.endpoint("/health") else {
        return ServerStatus::Down;
    };
    let client = reqwest::Client::new();

    match client.get(url).timeout(std::time::Duration::from_secs(5)).send().await {
        Ok(response) if response.status().is_success() => ServerStatus::Up,
        _ => ServerStatus::Down,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_paths() {
        let config = CliConfig { server_url: "http://127.0.0.1:4100".into(), ..Default::default() };
        assert_eq!(config.endpoint("/api/session").unwrap().as_str(), "http://127.0.0.1:4100/api/session");
    }

    #[test]
    fn rejects_garbage_url() {
        let config = CliConfig { server_url: "not a url".into(), ..Default::default() };
        assert!(config.endpoint("/health").is_err());
    }
}
