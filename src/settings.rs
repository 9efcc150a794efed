//! Refresh settings and collaborator environment.
//!
//! Refresh settings use the same partial-override contract as the chart configuration.
//! Endpoint URLs and session cookies come from the process environment, optionally
//! seeded from a `.env` file in the per-user config directory.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::{PartialChartConfig, PartialRange, PartialTime};

pub const APP_DIR: &str = "glucotv";

/// Healthy glucose limits in mg/dL.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BsLimits {
    pub low: f64,
    pub high: f64,
}

impl Default for BsLimits {
    fn default() -> Self {
        Self {
            low: 60.0,
            high: 200.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSettings {
    pub bs_limits: BsLimits,
    /// Hours fetched from the source and shown on the chart.
    pub span_hours: u32,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            bs_limits: BsLimits::default(),
            span_hours: 6,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialBsLimits {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialRefreshSettings {
    pub bs_limits: PartialBsLimits,
    pub span_hours: Option<u32>,
}

impl RefreshSettings {
    pub fn merge(&self, o: &PartialRefreshSettings) -> Self {
        Self {
            bs_limits: BsLimits {
                low: o.bs_limits.low.unwrap_or(self.bs_limits.low),
                high: o.bs_limits.high.unwrap_or(self.bs_limits.high),
            },
            span_hours: o.span_hours.unwrap_or(self.span_hours),
        }
    }

    /// Chart override for a production refresh: span and good range from these
    /// settings, never mock data.
    pub fn chart_overrides(&self) -> PartialChartConfig {
        PartialChartConfig {
            time: PartialTime {
                shown_span_hours: Some(self.span_hours as f64),
                ..Default::default()
            },
            range: PartialRange {
                good_min: Some(self.bs_limits.low),
                good_max: Some(self.bs_limits.high),
                ..Default::default()
            },
            generate_mock_data: Some(false),
            ..Default::default()
        }
    }
}

/// Endpoints and credentials of the external collaborators.
#[derive(Clone, PartialEq, Eq)]
pub struct Environment {
    pub api_url: String,
    pub session_cookie: String,
    pub userid_cookie: String,
    pub device_url: String,
}

// Cookies stay out of logs.
impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("api_url", &self.api_url)
            .field("session_cookie", &"<redacted>")
            .field("userid_cookie", &"<redacted>")
            .field("device_url", &self.device_url)
            .finish()
    }
}

impl Environment {
    pub const API_URL: &'static str = "API_URL";
    pub const SESSION_COOKIE: &'static str = "SESSION_COOKIE";
    pub const USERID_COOKIE: &'static str = "USERID_COOKIE";
    pub const DEVICE_URL: &'static str = "SMALLTV_URL";

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from any key lookup; every variable is required and must be non-empty.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let mut missing = Vec::new();
        let mut get = |key: &'static str| match lookup(key).filter(|v| !v.trim().is_empty()) {
            Some(v) => v,
            None => {
                missing.push(key);
                String::new()
            }
        };
        let env = Self {
            api_url: get(Self::API_URL),
            session_cookie: get(Self::SESSION_COOKIE),
            userid_cookie: get(Self::USERID_COOKIE),
            device_url: get(Self::DEVICE_URL),
        };
        if !missing.is_empty() {
            bail!("missing environment variable(s): {}", missing.join(", "));
        }
        Ok(env)
    }
}

/// Default location of the per-user `.env` file.
pub fn default_env_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(".env"))
}

/// Load `path` (or the default location) into the process environment if it exists.
/// Returns the file that was loaded.
pub fn load_dotenv(path: Option<PathBuf>) -> Result<Option<PathBuf>> {
    let Some(path) = path.or_else(default_env_path) else {
        return Ok(None);
    };
    if !path.exists() {
        log::debug!("no env file at {}", path.display());
        return Ok(None);
    }
    dotenvy::from_path(&path)?;
    log::info!("loaded environment variables from {}", path.display());
    Ok(Some(path))
}
