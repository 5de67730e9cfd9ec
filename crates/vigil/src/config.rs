//! Flag-aware configuration resolution.
//!
//! `vigil-config` owns the TOML schema and credential chain; this module
//! layers CLI flags and env vars on top and produces the `ConsoleConfig`
//! that core consumes.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use vigil_config::{Config, load_config_from};
use vigil_core::ConsoleConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// The config file path, honoring `--config`.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(vigil_config::config_path)
}

/// Load the config file + environment, falling back to defaults when
/// nothing is on disk.
pub fn load_or_default(global: &GlobalOpts) -> Config {
    load_config_from(&config_path(global)).unwrap_or_default()
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.default_profile_name())
}

/// Fill unset output/color flags from the config's `[defaults]` table.
pub fn apply_defaults(global: &mut GlobalOpts, config: &Config) {
    if global.output.is_none() {
        global.output = OutputFormat::from_str(&config.defaults.output, true).ok();
    }
    if global.color.is_none() {
        global.color = ColorMode::from_str(&config.defaults.color, true).ok();
    }
}

/// Translate the active profile + global flags into a `ConsoleConfig`.
///
/// This is the single boundary where CLI config types cross into core.
pub fn build_console_config(
    global: &GlobalOpts,
    config: &Config,
) -> Result<ConsoleConfig, CliError> {
    let profile_name = active_profile_name(global, config);
    let profile = config.profile(&profile_name).map_err(|_| {
        CliError::ProfileNotFound {
            name: profile_name.clone(),
            available: available_profiles(config),
        }
    })?;

    let mut console = vigil_config::profile_to_console_config(&profile, &profile_name)?;

    // Flag > env > profile > defaults.
    if let Some(ref server) = global.server {
        console.url = server.parse().map_err(|_| CliError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {server}"),
        })?;
    }

    if let Some(timeout) = global.timeout {
        console.timeout = Duration::from_secs(timeout);
    } else if profile.timeout.is_none() {
        console.timeout = Duration::from_secs(config.defaults.timeout);
    }

    Ok(console)
}

/// Comma-joined profile names for error help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        return "(none)".into();
    }
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    names.sort();
    names.join(", ")
}
