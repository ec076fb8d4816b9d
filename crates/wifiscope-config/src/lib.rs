//! Configuration for the wifiscope binary.
//!
//! TOML file + `WIFISCOPE_` environment, password resolution (env +
//! keyring + plaintext), and translation to the api/core types. The core
//! crate never sees these structs -- it receives a pre-built
//! `PollerConfig` and `RouterOsClient`.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use wifiscope_api::{RouterOsClient, TlsMode, TransportConfig};
use wifiscope_core::PollerConfig;

/// Keyring service name passwords are stored under.
pub const KEYRING_SERVICE: &str = "wifiscope";

/// Environment variable consulted for the router password.
pub const PASSWORD_ENV: &str = "WIFISCOPE_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to build RouterOS client: {0}")]
    Client(#[from] wifiscope_api::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub router: RouterSection,

    #[serde(default)]
    pub polling: PollingSection,

    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// Where the router is and how to log in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouterSection {
    /// Router address, `192.168.88.1` or `192.168.88.1:8080`. A full URL
    /// (`https://router.lan`) is also accepted and overrides `scheme`.
    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub scheme: Scheme,

    #[serde(default = "default_username")]
    pub username: String,

    /// Password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Accept invalid TLS certificates (self-signed RouterOS `www-ssl`).
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Per-fetch timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RouterSection {
    fn default() -> Self {
        Self {
            host: String::new(),
            scheme: Scheme::default(),
            username: default_username(),
            password: None,
            password_env: None,
            insecure: false,
            ca_cert: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_username() -> String {
    "admin".into()
}
fn default_timeout_secs() -> u64 {
    10
}

/// Refresh intervals per source, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PollingSection {
    #[serde(default = "default_leases_secs")]
    pub leases_secs: u64,

    #[serde(default = "default_registrations_secs")]
    pub registrations_secs: u64,

    #[serde(default = "default_radios_secs")]
    pub radios_secs: u64,

    #[serde(default = "default_interfaces_secs")]
    pub interfaces_secs: u64,

    /// Scheduler tick, in milliseconds.
    #[serde(default = "default_cadence_ms")]
    pub cadence_ms: u64,

    /// Rejoin and publish on every tick even when nothing was refreshed.
    #[serde(default)]
    pub recompute_every_cycle: bool,
}

impl Default for PollingSection {
    fn default() -> Self {
        Self {
            leases_secs: default_leases_secs(),
            registrations_secs: default_registrations_secs(),
            radios_secs: default_radios_secs(),
            interfaces_secs: default_interfaces_secs(),
            cadence_ms: default_cadence_ms(),
            recompute_every_cycle: false,
        }
    }
}

fn default_leases_secs() -> u64 {
    60
}
fn default_registrations_secs() -> u64 {
    60
}
fn default_radios_secs() -> u64 {
    30 * 60
}
fn default_interfaces_secs() -> u64 {
    2 * 60
}
fn default_cadence_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// Directory served at `/`. Nothing is served there when unset.
    #[serde(default = "default_static_dir")]
    pub static_dir: Option<PathBuf>,

    /// Upper bound on how long `/api/graph` waits for the first snapshot.
    /// Waits indefinitely when unset.
    pub snapshot_timeout_secs: Option<u64>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            static_dir: default_static_dir(),
            snapshot_timeout_secs: None,
        }
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8888))
}
#[allow(clippy::unnecessary_wraps)]
fn default_static_dir() -> Option<PathBuf> {
    Some(PathBuf::from("public"))
}

impl ServerSection {
    pub fn snapshot_timeout(&self) -> Option<Duration> {
        self.snapshot_timeout_secs.map(Duration::from_secs)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "wifiscope", "wifiscope").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("wifiscope");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config: defaults, then the TOML file, then `WIFISCOPE_*`
/// environment variables (`__` separates sections, e.g.
/// `WIFISCOPE_ROUTER__HOST`).
///
/// A missing file at the default path is fine; a missing file at an
/// explicitly given path is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(explicit) => {
            if !explicit.is_file() {
                return Err(ConfigError::Validation {
                    field: "config".into(),
                    reason: format!("file not found: {}", explicit.display()),
                });
            }
            explicit.to_path_buf()
        }
        None => config_path(),
    };

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("WIFISCOPE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Render a config as TOML with the plaintext password masked.
pub fn to_redacted_toml(config: &Config) -> Result<String, ConfigError> {
    let mut shown = config.clone();
    if shown.router.password.is_some() {
        shown.router.password = Some("********".into());
    }
    Ok(toml::to_string_pretty(&shown)?)
}

// ── Password resolution ─────────────────────────────────────────────

/// Resolve the router password from the credential chain.
///
/// `password_env` variable, then `WIFISCOPE_PASSWORD`, then the system
/// keyring, then the plaintext `password` field. Falls back to an empty
/// password, which RouterOS accepts for a fresh `admin` account.
pub fn resolve_password(router: &RouterSection) -> SecretString {
    resolve_password_with(router, |name| std::env::var(name).ok(), keyring_password)
}

/// [`resolve_password`] with injectable env and keyring lookups.
pub fn resolve_password_with(
    router: &RouterSection,
    env: impl Fn(&str) -> Option<String>,
    stored: impl Fn(&str) -> Option<String>,
) -> SecretString {
    // 1. Section's password_env -> env var lookup
    if let Some(val) = router.password_env.as_deref().and_then(&env) {
        return SecretString::from(val);
    }

    // 2. Global env var
    if let Some(val) = env(PASSWORD_ENV) {
        return SecretString::from(val);
    }

    // 3. System keyring
    if let Some(val) = stored(router.host.trim()) {
        return SecretString::from(val);
    }

    // 4. Plaintext in config
    SecretString::from(router.password.clone().unwrap_or_default())
}

fn keyring_entry(host: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(KEYRING_SERVICE, &format!("{host}/password"))?)
}

fn keyring_password(host: &str) -> Option<String> {
    if host.is_empty() {
        return None;
    }
    keyring_entry(host).ok()?.get_password().ok()
}

/// Store the password for `host` in the system keyring.
pub fn store_password(host: &str, password: &str) -> Result<(), ConfigError> {
    if host.is_empty() {
        return Err(missing_host());
    }
    keyring_entry(host)?.set_password(password)?;
    Ok(())
}

// ── Translation to api/core types ───────────────────────────────────

impl RouterSection {
    /// The router root URL the REST paths hang off.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let host = self.host.trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(missing_host());
        }

        let raw = if host.contains("://") {
            host.to_owned()
        } else {
            format!("{}://{host}", self.scheme.as_str())
        };

        let url = Url::parse(&raw).map_err(|e| ConfigError::Validation {
            field: "router.host".into(),
            reason: format!("invalid URL {raw}: {e}"),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::Validation {
                field: "router.host".into(),
                reason: format!("expected an http or https URL, got '{other}'"),
            }),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        let tls = if self.insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.ca_cert {
            TlsMode::CustomCa(ca_path.clone())
        } else {
            TlsMode::System
        };

        TransportConfig {
            tls,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    /// Build a ready-to-use client, resolving the password on the way.
    pub fn client(&self) -> Result<RouterOsClient, ConfigError> {
        let base_url = self.base_url()?;
        let password = resolve_password(self);
        Ok(RouterOsClient::new(
            base_url,
            self.username.clone(),
            password,
            &self.transport(),
        )?)
    }
}

impl PollingSection {
    pub fn poller_config(&self) -> Result<PollerConfig, ConfigError> {
        let positive = |field: &str, value: u64| {
            if value == 0 {
                Err(ConfigError::Validation {
                    field: format!("polling.{field}"),
                    reason: "must be greater than zero".into(),
                })
            } else {
                Ok(value)
            }
        };

        Ok(PollerConfig {
            lease_interval: Duration::from_secs(positive("leases_secs", self.leases_secs)?),
            registration_interval: Duration::from_secs(positive(
                "registrations_secs",
                self.registrations_secs,
            )?),
            radio_interval: Duration::from_secs(positive("radios_secs", self.radios_secs)?),
            interface_interval: Duration::from_secs(positive(
                "interfaces_secs",
                self.interfaces_secs,
            )?),
            cadence: Duration::from_millis(positive("cadence_ms", self.cadence_ms)?),
            recompute_every_cycle: self.recompute_every_cycle,
        })
    }
}

fn missing_host() -> ConfigError {
    ConfigError::Validation {
        field: "router.host".into(),
        reason: "no router configured (set --host, WIFISCOPE_HOST or router.host)".into(),
    }
}
