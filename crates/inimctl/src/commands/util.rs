//! Shared helpers for command handlers.

use std::sync::Arc;

use inim_core::{Coordinator, Device};

use crate::config::Context;
use crate::error::CliError;

/// Pick the panel to act on: `--device` if given, otherwise the only
/// panel on the account.
pub fn resolve_device(
    coordinator: &Coordinator,
    requested: Option<i64>,
) -> Result<Arc<Device>, CliError> {
    let devices = coordinator.devices();
    if let Some(device_id) = requested {
        return coordinator
            .get_device(device_id)
            .ok_or_else(|| CliError::NotFound {
                resource_type: "panel".into(),
                identifier: device_id.to_string(),
                list_command: "devices".into(),
            });
    }
    match devices.as_slice() {
        [only] => Ok(Arc::clone(only)),
        [] => Err(CliError::NotFound {
            resource_type: "panel".into(),
            identifier: "any".into(),
            list_command: "devices".into(),
        }),
        many => Err(CliError::AmbiguousDevice {
            available: many
                .iter()
                .map(|d| format!("{} ({})", d.id, d.name))
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

/// Fail early, with profile-specific help, when no user code is set.
pub fn require_user_code(ctx: &Context) -> Result<(), CliError> {
    if ctx.coordinator.config().user_code.is_some() {
        Ok(())
    } else {
        Err(CliError::NoUserCode {
            profile: ctx.profile_name.clone(),
        })
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
