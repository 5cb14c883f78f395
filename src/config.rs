//! Bridge configuration.
//!
//! [`Settings::load`] layers, lowest precedence first: the embedded defaults,
//! an optional TOML file, then `SYNDICATION__SECTION__KEY` environment
//! variables. [`Settings::defaults`] returns the embedded defaults without
//! touching the filesystem or environment (useful in tests).

use crate::model::QueryOptions;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[api]
url           = "https://api.pmp.io"
client_id     = ""
client_secret = ""

[search]
profile = "story"
limit   = 10

[ajax]
nonce_action = "pmp_ajax_nonce"
nonce_field  = "security"

[cms]
admin_url            = "http://localhost/wp-admin"
default_group_option = "pmp_default_group"
"#;

const ENV_PREFIX: &str = "SYNDICATION";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    pub search: SearchDefaults,
    pub ajax: AjaxSettings,
    pub cms: CmsSettings,
}

/// `[api]`: where the syndication API lives and how to identify to it.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub url: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
}

impl ApiSettings {
    /// `url` without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Profile link target for documents created by the bridge.
    pub fn profile_href(&self, profile: &str) -> String {
        format!("{}/profiles/{profile}", self.base_url())
    }
}

/// `[search]`: options every search starts from.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchDefaults {
    pub profile: String,
    pub limit: u64,
}

impl SearchDefaults {
    /// Starting point for a search's query options.
    pub fn options(&self) -> QueryOptions {
        let mut options = QueryOptions::new();
        options.insert("profile".to_string(), Value::from(self.profile.as_str()));
        options.insert("limit".to_string(), Value::from(self.limit));
        options
    }
}

/// `[ajax]`: request token check.
#[derive(Debug, Clone, Deserialize)]
pub struct AjaxSettings {
    pub nonce_action: String,
    pub nonce_field: String,
}

/// `[cms]`
#[derive(Debug, Clone, Deserialize)]
pub struct CmsSettings {
    pub admin_url: String,
    pub default_group_option: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Settings {
    /// Load defaults, then `path` if given, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml));

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// The embedded defaults.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.url must not be empty".to_string()));
        }
        if self.search.limit == 0 {
            return Err(ConfigError::Invalid(
                "search.limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Same settings pointed at another API endpoint.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api.url = url.into();
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
