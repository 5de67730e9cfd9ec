//! Shared configuration for the vigil console.
//!
//! TOML profiles, API-key resolution (env + keyring + plaintext), and
//! translation to `vigil_core::ConsoleConfig`. The CLI adds flag-aware
//! wrappers on top.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use vigil_core::{ConsoleConfig, KeywordPolicy, TlsVerification};

/// Keyring service name for stored API keys.
const KEYRING_SERVICE: &str = "vigil";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown profile '{profile}'")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

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
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named service profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile, falling back to a synthesized localhost
    /// profile when the named one is "default" and nothing is on disk.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        if let Some(profile) = self.profiles.get(name) {
            return Ok(profile.clone());
        }
        if name == "default" {
            return Ok(Profile::default());
        }
        Err(ConfigError::UnknownProfile {
            profile: name.into(),
        })
    }

    /// The profile name to use when the caller specifies none.
    pub fn default_profile_name(&self) -> String {
        self.default_profile
            .clone()
            .unwrap_or_else(|| "default".into())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named service profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Service base URL (e.g., "http://localhost:8000").
    pub server: String,

    /// API key (plaintext -- prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification (self-signed deployments).
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override the service-side bulk fetch cap.
    pub fetch_limit: Option<u32>,

    /// Keyword overrides for the priority comparator.
    pub keywords: Option<KeywordOverrides>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            server: "http://localhost:8000".into(),
            api_key: None,
            api_key_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            fetch_limit: None,
            keywords: None,
        }
    }
}

/// Optional replacements for the default keyword sets. A set that is
/// absent keeps its built-in words.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KeywordOverrides {
    pub human: Option<Vec<String>>,
    pub hazard: Option<Vec<String>>,
}

impl KeywordOverrides {
    /// Merge onto the built-in policy.
    pub fn apply(&self, mut policy: KeywordPolicy) -> KeywordPolicy {
        if let Some(ref human) = self.human {
            policy.human.clone_from(human);
        }
        if let Some(ref hazard) = self.hazard {
            policy.hazard.clone_from(hazard);
        }
        policy
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "vigil", "vigil").map_or_else(
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
    p.push("vigil");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from a specific file + environment.
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("VIGIL_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load the full Config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to the given path.
pub fn save_config_to(cfg: &Config, path: &std::path::Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve an API key from the credential chain: env var, keyring, then
/// plaintext config. Most deployments have no key at all; `None` is the
/// normal outcome, not an error.
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    // 1. Profile's api_key_env → env var lookup
    if let Some(ref env_name) = profile.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-key")) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    profile
        .api_key
        .as_ref()
        .map(|key| SecretString::from(key.clone()))
}

/// Store an API key in the system keyring for a profile.
pub fn store_api_key(profile_name: &str, key: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-key"))
        .map_err(|e| ConfigError::Validation {
            field: "api_key".into(),
            reason: format!("keyring unavailable: {e}"),
        })?;
    entry.set_password(key).map_err(|e| ConfigError::Validation {
        field: "api_key".into(),
        reason: format!("keyring write failed: {e}"),
    })
}

// ── Translation to core config ──────────────────────────────────────

/// Build a `ConsoleConfig` from a profile -- no CLI flag overrides.
pub fn profile_to_console_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ConsoleConfig, ConfigError> {
    let url: url::Url = profile
        .server
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {}", profile.server),
        })?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let base = ConsoleConfig::default();
    let keywords = profile
        .keywords
        .as_ref()
        .map_or_else(KeywordPolicy::default, |overrides| {
            overrides.apply(KeywordPolicy::default())
        });

    Ok(ConsoleConfig {
        url,
        api_key: resolve_api_key(profile, profile_name),
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(30)),
        fetch_limit: profile.fetch_limit.unwrap_or(base.fetch_limit),
        keywords,
    })
}
