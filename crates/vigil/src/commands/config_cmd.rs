//! Config subcommand handlers.

use dialoguer::{Input, Password, Select};

use vigil_config::{Config, Profile, save_config_to, store_api_key};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

fn save(cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    save_config_to(cfg, &config::config_path(global))?;
    Ok(())
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path(global);
            eprintln!("vigil -- configuration wizard");
            eprintln!("  Config path: {}\n", config_path.display());

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            // 2. Service URL
            let server: String = Input::new()
                .with_prompt("Service URL")
                .default("http://localhost:8000".into())
                .interact_text()
                .map_err(prompt_err)?;

            // 3. Optional API key
            let key = Password::new()
                .with_prompt("API key (leave empty if the service has none)")
                .allow_empty_password(true)
                .interact()
                .map_err(prompt_err)?;

            let api_key = if key.is_empty() {
                None
            } else {
                let store_choices = &[
                    "Store in system keyring (recommended)",
                    "Save to config file (plaintext)",
                ];
                let store_selection = Select::new()
                    .with_prompt("Where to store the API key?")
                    .items(store_choices)
                    .default(0)
                    .interact()
                    .map_err(prompt_err)?;

                if store_selection == 0 {
                    store_api_key(&profile_name, &key)?;
                    eprintln!("  ✓ API key stored in system keyring");
                    None
                } else {
                    Some(key)
                }
            };

            // 4. Build profile and config
            let mut cfg = config::load_or_default(global);
            cfg.default_profile = Some(profile_name.clone());
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    server,
                    api_key,
                    ..Profile::default()
                },
            );
            save(&cfg, global)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: vigil health");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_or_default(global);
            let out = output::render_single(
                &global.output(),
                &cfg,
                |c| format!("{c:#?}"),
                |c| c.default_profile_name(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_or_default(global);
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg
                .profiles
                .entry(profile_name.clone())
                .or_insert_with(Profile::default);

            match key.as_str() {
                "server" => profile.server = value,
                "api_key" | "api-key" => profile.api_key = Some(value),
                "api_key_env" | "api-key-env" => profile.api_key_env = Some(value),
                "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
                "insecure" => {
                    profile.insecure = Some(value.parse().map_err(|_| CliError::Validation {
                        field: "insecure".into(),
                        reason: "must be 'true' or 'false'".into(),
                    })?);
                }
                "timeout" => {
                    profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                        field: "timeout".into(),
                        reason: "must be a number (seconds)".into(),
                    })?);
                }
                "fetch_limit" | "fetch-limit" => {
                    profile.fetch_limit =
                        Some(value.parse().map_err(|_| CliError::Validation {
                            field: "fetch_limit".into(),
                            reason: "must be a number".into(),
                        })?);
                }
                other => {
                    return Err(CliError::Validation {
                        field: other.into(),
                        reason: format!(
                            "unknown config key '{other}'. Valid keys: server, api_key, \
                             api_key_env, ca_cert, insecure, timeout, fetch_limit"
                        ),
                    });
                }
            }

            save(&cfg, global)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_or_default(global);
            let default = cfg.default_profile_name();
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: vigil config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_or_default(global);

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }

            cfg.default_profile = Some(name.clone());
            save(&cfg, global)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }
    }
}
