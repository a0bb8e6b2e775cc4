//! Scenario listing and activation handlers (arm, disarm, scenario).

use serde::Serialize;
use tabled::Tabled;

use inim_core::{CommandResult, ScenarioKind};

use crate::cli::{ArmMode, GlobalOpts};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct ScenarioEntry {
    id: i64,
    name: String,
    kind: ScenarioKind,
    /// `away`, `home` and/or `disarm` when used for those actions.
    roles: Vec<&'static str>,
    active: bool,
}

#[derive(Tabled)]
struct ScenarioRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Used for")]
    roles: String,
    #[tabled(rename = "Active")]
    active: &'static str,
}

impl From<&ScenarioEntry> for ScenarioRow {
    fn from(s: &ScenarioEntry) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
            kind: s.kind.to_string(),
            roles: s.roles.join(", "),
            active: output::yes_no(s.active),
        }
    }
}

pub async fn list(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let coordinator = &ctx.coordinator;
    coordinator.refresh().await?;
    let device = util::resolve_device(coordinator, global.device)?;
    let selection = coordinator.scenario_selection(device.id);

    let entries: Vec<ScenarioEntry> = device
        .scenarios
        .values()
        .map(|s| {
            let roles: Vec<&'static str> = selection
                .map(|sel| {
                    [("away", sel.away), ("home", sel.home), ("disarm", sel.disarm)]
                        .into_iter()
                        .filter(|(_, id)| *id == s.id)
                        .map(|(role, _)| role)
                        .collect()
                })
                .unwrap_or_default();
            ScenarioEntry {
                id: s.id,
                name: s.name.clone(),
                kind: s.kind(),
                roles,
                active: device.active_scenario == Some(s.id),
            }
        })
        .collect();

    let out = output::render_list(
        &global.output,
        &entries,
        |s| ScenarioRow::from(s),
        |s| s.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn arm(ctx: &Context, mode: ArmMode, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.coordinator.refresh().await?;
    let device = util::resolve_device(&ctx.coordinator, global.device)?;
    let result = match mode {
        ArmMode::Away => ctx.coordinator.arm_away(device.id).await?,
        ArmMode::Home => ctx.coordinator.arm_home(device.id).await?,
    };
    report(ctx, &result, global);
    Ok(())
}

pub async fn disarm(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.coordinator.refresh().await?;
    let device = util::resolve_device(&ctx.coordinator, global.device)?;
    let result = ctx.coordinator.disarm(device.id).await?;
    report(ctx, &result, global);
    Ok(())
}

pub async fn activate(ctx: &Context, scenario_id: i64, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.coordinator.refresh().await?;
    let device = util::resolve_device(&ctx.coordinator, global.device)?;
    let result = ctx
        .coordinator
        .activate_scenario(device.id, scenario_id)
        .await?;
    report(ctx, &result, global);
    Ok(())
}

fn report(ctx: &Context, result: &CommandResult, global: &GlobalOpts) {
    if global.quiet {
        return;
    }
    if let CommandResult::ScenarioActivated {
        device_id,
        scenario_id,
    } = *result
    {
        let name = ctx
            .coordinator
            .get_scenario(device_id, scenario_id)
            .map_or_else(|| scenario_id.to_string(), |s| s.name);
        eprintln!("Scenario '{name}' activated");
    }
}
