// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Server configuration.
//!
//! Settings are layered, lowest precedence first: built-in defaults, an
//! optional TOML file, then environment variables and command-line flags
//! (clap resolves those two).

use chrono_tz::Tz;
use duty_roster_domain::{DEFAULT_TIMEZONE, DEFAULT_WEEK_START, parse_timezone, parse_week_start};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use time::Weekday;
use tracing::{debug, info};

/// Environment variable naming the backend base URL.
pub const BACKEND_URL_ENV_VAR: &str = "DUTY_ROSTER_BACKEND_URL";
/// Environment variable naming the IANA timezone of the roster.
pub const TIMEZONE_ENV_VAR: &str = "DUTY_ROSTER_TIMEZONE";
/// Environment variable naming the first day of the week.
pub const WEEK_START_ENV_VAR: &str = "DUTY_ROSTER_WEEK_START";
/// Environment variable pointing at a configuration file.
pub const CONFIG_FILE_ENV_VAR: &str = "DUTY_ROSTER_CONFIG";

const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
const DEFAULT_BIND: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ROSTER_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unknown timezone '{0}'")]
    Timezone(String),

    #[error("Invalid week start '{0}'")]
    WeekStart(String),

    #[error("Invalid bind address '{0}'")]
    BindAddress(String),

    #[error("Backend URL cannot be empty")]
    EmptyBackendUrl,
}

/// Settings read from the TOML file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub backend_url: Option<String>,
    pub timezone: Option<String>,
    pub week_start: Option<String>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub roster_cache_ttl_secs: Option<u64>,
}

/// Settings given on the command line or through the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub backend_url: Option<String>,
    pub timezone: Option<String>,
    pub week_start: Option<String>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub roster_cache_ttl_secs: Option<u64>,
}

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Base URL of the roster backend, without the API prefix.
    pub backend_url: String,
    /// Zone used for "today" and for flagging shifts in progress.
    pub timezone: Tz,
    /// First day of each week row.
    pub week_start: Weekday,
    /// Address the gateway listens on.
    pub listen: SocketAddr,
    /// How long a user's loaded roster is reused for lookups.
    pub roster_cache_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            backend_url: String::from(DEFAULT_BACKEND_URL),
            timezone: Tz::Asia__Kathmandu,
            week_start: DEFAULT_WEEK_START,
            listen: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            roster_cache_ttl: Duration::from_secs(DEFAULT_ROSTER_CACHE_TTL_SECS),
        }
    }
}

impl ServerConfig {
    /// Layers `overrides` over `file` over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the timezone, week start or bind address is invalid.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self, ConfigError> {
        let backend_url: String = overrides
            .backend_url
            .or(file.backend_url)
            .unwrap_or_else(|| String::from(DEFAULT_BACKEND_URL));
        if backend_url.trim().is_empty() {
            return Err(ConfigError::EmptyBackendUrl);
        }

        let timezone_name: String = overrides
            .timezone
            .or(file.timezone)
            .unwrap_or_else(|| String::from(DEFAULT_TIMEZONE));
        let timezone: Tz =
            parse_timezone(&timezone_name).map_err(|_| ConfigError::Timezone(timezone_name))?;

        let week_start: Weekday = match overrides.week_start.or(file.week_start) {
            Some(raw) => parse_week_start(&raw).map_err(|_| ConfigError::WeekStart(raw))?,
            None => DEFAULT_WEEK_START,
        };

        let bind: String = overrides
            .bind
            .or(file.bind)
            .unwrap_or_else(|| String::from(DEFAULT_BIND));
        let ip: IpAddr = bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::BindAddress(bind.clone()))?;
        let port: u16 = overrides.port.or(file.port).unwrap_or(DEFAULT_PORT);
        let roster_cache_ttl_secs: u64 = overrides
            .roster_cache_ttl_secs
            .or(file.roster_cache_ttl_secs)
            .unwrap_or(DEFAULT_ROSTER_CACHE_TTL_SECS);

        Ok(Self {
            backend_url: backend_url.trim().to_string(),
            timezone,
            week_start,
            listen: SocketAddr::new(ip, port),
            roster_cache_ttl: Duration::from_secs(roster_cache_ttl_secs),
        })
    }
}

/// Default location of the configuration file.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("duty-roster").join("server.toml"))
}

/// Parses a configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw: String = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_file(&raw, path)
}

fn parse_file(raw: &str, path: &Path) -> Result<FileConfig, ConfigError> {
    toml::from_str(raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Loads the configuration file if there is one.
///
/// An explicitly named file must exist. The default file is optional.
///
/// # Errors
///
/// Returns an error if a file that exists cannot be read or parsed.
pub fn load_optional_file(explicit: Option<&Path>) -> Result<FileConfig, ConfigError> {
    if let Some(path) = explicit {
        info!(file = %path.display(), "Loading configuration file");
        return load_file(path);
    }

    match default_config_path() {
        Some(path) if path.is_file() => {
            info!(file = %path.display(), "Loading configuration file");
            load_file(&path)
        }
        Some(path) => {
            debug!(file = %path.display(), "No configuration file, using defaults");
            Ok(FileConfig::default())
        }
        None => Ok(FileConfig::default()),
    }
}
