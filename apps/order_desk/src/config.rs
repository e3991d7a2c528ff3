use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const CONFIG_FILE: &str = "order_desk.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub log_filter: String,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5500".into(),
            log_filter: "info".into(),
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    log_filter: Option<String>,
    request_timeout_secs: Option<u64>,
}

pub fn load_settings(path: &Path) -> Settings {
    load_settings_with(path, |key| std::env::var(key).ok())
}

/// File values override defaults, environment overrides the file.
pub fn load_settings_with(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<FileSettings>(&raw) {
            if let Some(v) = file_cfg.server_url {
                settings.server_url = v;
            }
            if let Some(v) = file_cfg.log_filter {
                settings.log_filter = v;
            }
            if file_cfg.request_timeout_secs.is_some() {
                settings.request_timeout_secs = file_cfg.request_timeout_secs;
            }
        }
    }

    if let Some(v) = env("ORDER_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = Some(parsed);
        }
    }

    settings
}

/// Adds a missing scheme, drops trailing slashes and checks the result parses.
pub fn normalize_server_url(raw_server_url: &str) -> anyhow::Result<String> {
    let trimmed = raw_server_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        bail!("server url is empty");
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let parsed = Url::parse(&candidate)
        .with_context(|| format!("invalid server url '{raw_server_url}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!(
            "unsupported scheme '{}' in server url '{raw_server_url}'",
            parsed.scheme()
        );
    }

    Ok(candidate)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
