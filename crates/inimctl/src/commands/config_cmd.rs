//! Config subcommand handlers.

use dialoguer::{Input, Select};
use secrecy::SecretString;

use inim_config::{Config, Profile, SecretKind};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, SecretArg};
use crate::config;
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

// ── Helpers ─────────────────────────────────────────────────────────

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_secret(label: &str) -> Result<String, CliError> {
    rpassword::prompt_password(format!("{label}: ")).map_err(prompt_err)
}

/// Ask where to keep a secret. `Some` means "write it to the file".
fn store_secret(
    profile_name: &str,
    kind: SecretKind,
    label: &str,
    value: String,
) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(format!("Where to store the {label}?"))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        inim_config::store_secret(profile_name, kind, &SecretString::from(value))?;
        eprintln!("   ✓ {label} stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(value))
    }
}

fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(REDACTED.into());
        }
        if profile.user_code.is_some() {
            profile.user_code = Some(REDACTED.into());
        }
    }
    cfg
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config()?);
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| e.to_string()),
                |c| c.profiles.keys().cloned().collect::<Vec<_>>().join("\n"),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", inim_config::config_path().display());
            Ok(())
        }

        ConfigCommand::SetSecret { kind } => {
            let cfg = config::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);
            cfg.profile(&profile_name)?;

            let (kind, label) = match kind {
                SecretArg::Password => (SecretKind::Password, "Password"),
                SecretArg::UserCode => (SecretKind::UserCode, "User code"),
            };
            let value = prompt_secret(label)?;
            if value.is_empty() {
                return Err(CliError::Validation {
                    field: label.to_lowercase(),
                    reason: "cannot be empty".into(),
                });
            }
            inim_config::store_secret(&profile_name, kind, &SecretString::from(value))?;
            if !global.quiet {
                eprintln!("✓ {label} for profile '{profile_name}' stored in system keyring");
            }
            Ok(())
        }
    }
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init() -> Result<(), CliError> {
    let config_path = inim_config::config_path();
    eprintln!("inimctl configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let username: String = Input::new()
        .with_prompt("INIM Cloud username (e-mail)")
        .interact_text()
        .map_err(prompt_err)?;
    let password = prompt_secret("Password")?;
    if username.trim().is_empty() || password.is_empty() {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "username and password cannot be empty".into(),
        });
    }
    let password = store_secret(&profile_name, SecretKind::Password, "password", password)?;

    // Optional: only needed for zone bypass and area control.
    let code = prompt_secret("Panel user code (leave empty to skip)")?;
    let user_code = if code.is_empty() {
        None
    } else {
        store_secret(&profile_name, SecretKind::UserCode, "user code", code)?
    };

    let scan_interval: u64 = Input::new()
        .with_prompt("Polling interval in seconds")
        .default(inim_config::Defaults::default().scan_interval)
        .validate_with(|secs: &u64| {
            inim_config::validate_scan_interval(*secs)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(prompt_err)?;

    let mut cfg = inim_config::load_config().unwrap_or_default();
    cfg.default_profile = Some(profile_name.clone());
    cfg.profiles.insert(
        profile_name.clone(),
        Profile {
            username: username.trim().to_owned(),
            password,
            user_code,
            scan_interval: Some(scan_interval),
            ..Profile::default()
        },
    );
    inim_config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: inimctl status");
    Ok(())
}
