use std::{fs, io, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use shared::domain::DefaultFill;
use tracing::warn;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://breast-cancer-api-74zl.onrender.com";
pub const SETTINGS_FILE: &str = "predict.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Base URL of the inference service; `predict` is resolved against it.
    pub api_url: String,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub default_fill: DefaultFill,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            connect_timeout_secs: Some(10),
            request_timeout_secs: None,
            default_fill: DefaultFill::Blank,
        }
    }
}

impl ClientSettings {
    pub fn base_url(&self) -> Result<Url> {
        resolve_base_url(&self.api_url)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_url: Option<String>,
    connect_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    default_fill: Option<DefaultFill>,
}

pub fn load_settings() -> Result<ClientSettings> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file if present, then environment overrides.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
            if let Some(v) = file_cfg.api_url {
                settings.api_url = v;
            }
            if let Some(v) = file_cfg.connect_timeout_secs {
                settings.connect_timeout_secs = non_zero(v);
            }
            if let Some(v) = file_cfg.request_timeout_secs {
                settings.request_timeout_secs = non_zero(v);
            }
            if let Some(v) = file_cfg.default_fill {
                settings.default_fill = v;
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()));
        }
    }

    if let Some(v) = env("PREDICT_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("APP__CONNECT_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.connect_timeout_secs = non_zero(parsed),
            Err(_) => warn!(value = %v, "ignoring invalid APP__CONNECT_TIMEOUT_SECS"),
        }
    }
    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = non_zero(parsed),
            Err(_) => warn!(value = %v, "ignoring invalid APP__REQUEST_TIMEOUT_SECS"),
        }
    }

    if let Some(v) = env("APP__DEFAULT_FILL") {
        match v.parse::<DefaultFill>() {
            Ok(fill) => settings.default_fill = fill,
            Err(reason) => warn!(%reason, "ignoring invalid APP__DEFAULT_FILL"),
        }
    }

    Ok(settings)
}

// 0 disables the timeout.
fn non_zero(secs: u64) -> Option<u64> {
    (secs > 0).then_some(secs)
}

/// Normalizes the configured service URL to a base ending in `/`.
///
/// A trailing `predict` segment is accepted and stripped so that either the
/// service root or the full prediction endpoint can be configured.
pub fn resolve_base_url(raw_api_url: &str) -> Result<Url> {
    let raw_api_url = raw_api_url.trim();
    if raw_api_url.is_empty() {
        bail!("api url must not be empty");
    }

    let mut url = Url::parse(raw_api_url)
        .with_context(|| format!("invalid api url '{raw_api_url}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!(
            "api url '{raw_api_url}' must use http or https, not '{}'",
            url.scheme()
        );
    }

    let trimmed = url.path().trim_end_matches('/');
    let mut path = trimmed.strip_suffix("/predict").unwrap_or(trimmed).to_string();
    path.push('/');
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
