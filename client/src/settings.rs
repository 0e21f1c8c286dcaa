//! Client configuration loaded via OrthoConfig.
//!
//! Values layer in the usual order: defaults, configuration file,
//! `AMEP_*` environment variables, then command-line overrides applied by
//! the binary through [`ClientSettings::with_overrides`].

use std::ffi::OsString;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Directory holding the session file, relative to the working directory.
pub const DEFAULT_SESSION_DIR: &str = ".amep";
/// Name of the session file inside the session directory.
pub const DEFAULT_SESSION_FILE: &str = "session.json";

/// Errors raised while resolving settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// Layered configuration could not be loaded.
    #[error("configuration could not be loaded: {message}")]
    Load {
        /// Loader message.
        message: String,
    },
    /// The base URL is not an absolute HTTP(S) URL.
    #[error("invalid base URL '{value}': {message}")]
    InvalidBaseUrl {
        /// Configured value.
        value: String,
        /// Reason it was rejected.
        message: String,
    },
}

/// Settings controlling which backend is used and where the session lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "AMEP")]
pub struct ClientSettings {
    /// Backend base URL.
    #[serde(default = "default_base_url")]
    #[ortho_config(default = default_base_url())]
    pub base_url: String,
    /// Directory holding the session file.
    #[serde(default = "default_session_dir")]
    #[ortho_config(default = default_session_dir())]
    pub session_dir: String,
    /// Session file name.
    #[serde(default = "default_session_file")]
    #[ortho_config(default = default_session_file())]
    pub session_file: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_session_dir() -> String {
    DEFAULT_SESSION_DIR.to_owned()
}

fn default_session_file() -> String {
    DEFAULT_SESSION_FILE.to_owned()
}

/// Values supplied on the command line; `None` keeps the layered value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    /// Replacement backend base URL.
    pub base_url: Option<String>,
    /// Replacement session directory.
    pub session_dir: Option<String>,
    /// Replacement session file name.
    pub session_file: Option<String>,
}

impl ClientSettings {
    /// Load defaults, configuration files and `AMEP_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] when a configuration source is
    /// malformed.
    pub fn load_layered() -> Result<Self, SettingsError> {
        Self::load_from_iter([OsString::from("amep")]).map_err(|error| SettingsError::Load {
            message: error.to_string(),
        })
    }

    /// Settings holding only the built-in defaults.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            base_url: default_base_url(),
            session_dir: default_session_dir(),
            session_file: default_session_file(),
        }
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(self, overrides: SettingsOverrides) -> Self {
        Self {
            base_url: overrides.base_url.unwrap_or(self.base_url),
            session_dir: overrides.session_dir.unwrap_or(self.session_dir),
            session_file: overrides.session_file.unwrap_or(self.session_file),
        }
    }

    /// Validated backend base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBaseUrl`] for relative, non-HTTP or
    /// otherwise unparsable values.
    ///
    /// # Examples
    /// ```
    /// use amep_client::settings::ClientSettings;
    ///
    /// let settings = ClientSettings::defaults();
    /// assert_eq!(settings.base_url().expect("default is valid").as_str(), "http://localhost:8000/");
    /// ```
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let value = self.base_url.trim();
        let invalid = |message: String| SettingsError::InvalidBaseUrl {
            value: value.to_owned(),
            message,
        };
        let url = Url::parse(value).map_err(|error| invalid(error.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if url.cannot_be_a_base() {
            return Err(invalid("URL cannot carry a path".to_owned()));
        }
        Ok(url)
    }

    /// Session directory, [`DEFAULT_SESSION_DIR`] unless configured.
    #[must_use]
    pub fn session_dir(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.session_dir.as_str())
    }

    /// Session file name, [`DEFAULT_SESSION_FILE`] unless configured.
    #[must_use]
    pub fn session_file(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.session_file.as_str())
    }
}
