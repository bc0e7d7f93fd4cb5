use crate::action::Endpoint;
use crate::error::{CallsError, Result};
use crate::types::Office;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// PanelConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Server origin, e.g. `http://localhost:8000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_project_slug")]
    pub project_slug: String,
    #[serde(default = "default_office")]
    pub office: Office,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Class token marking the content region in the served page.
    #[serde(default = "default_region_marker")]
    pub region_marker: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_project_slug() -> String {
    "elections17-alabama".to_string()
}

fn default_office() -> Office {
    Office::Senate
}

fn default_refresh_interval() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

fn default_region_marker() -> String {
    "container".to_string()
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            project_slug: default_project_slug(),
            office: default_office(),
            refresh_interval_secs: default_refresh_interval(),
            request_timeout_secs: default_request_timeout(),
            region_marker: default_region_marker(),
        }
    }
}

impl PanelConfig {
    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CallsError::ConfigNotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: PanelConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Load `path` when given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    // -----------------------------------------------------------------------
    // Derived values
    // -----------------------------------------------------------------------

    /// The page the panel lives on. Always ends in `/` so endpoint suffixes
    /// append directly.
    pub fn panel_url(&self) -> String {
        format!(
            "{}/{}/calls/{}/",
            self.base_url.trim_end_matches('/'),
            self.project_slug.trim_matches('/'),
            self.office
        )
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.panel_url(), endpoint.path_suffix())
    }

    pub fn health_url(&self) -> String {
        format!(
            "{}/{}/test/",
            self.base_url.trim_end_matches('/'),
            self.project_slug.trim_matches('/')
        )
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("base_url '{}' is not an http(s) URL", self.base_url),
            });
        }

        if self.project_slug.trim_matches('/').is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "project_slug is empty".to_string(),
            });
        }

        if self.refresh_interval_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "refresh_interval_secs must be at least 1".to_string(),
            });
        }

        if self.request_timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "request_timeout_secs is 0; every request will time out".to_string(),
            });
        } else if self.request_timeout_secs > self.refresh_interval_secs.saturating_mul(6) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "request_timeout_secs ({}) is much longer than the refresh interval ({})",
                    self.request_timeout_secs, self.refresh_interval_secs
                ),
            });
        }

        if self.region_marker.trim().is_empty() || self.region_marker.contains(' ') {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "region_marker '{}' must be a single class token",
                    self.region_marker
                ),
            });
        }

        warnings
    }
}
