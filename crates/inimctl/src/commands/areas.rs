//! Area listing and per-area arm/disarm handlers.

use tabled::Tabled;

use inim_core::Area;

use crate::cli::{AreaCommand, GlobalOpts};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct AreaRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Armed")]
    armed: &'static str,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Alarm mem.")]
    alarm_memory: &'static str,
    #[tabled(rename = "Tamper")]
    tamper: &'static str,
}

fn area_row(a: &Area, color: bool) -> AreaRow {
    AreaRow {
        id: a.id,
        name: a.name.clone(),
        armed: a.armed.label(),
        state: output::paint_state(a.alarm_state(), color),
        alarm_memory: output::yes_no(a.alarm_memory),
        tamper: output::yes_no(a.tamper || a.tamper_memory),
    }
}

pub async fn list(ctx: &Context, all: bool, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.coordinator.refresh().await?;
    let device = util::resolve_device(&ctx.coordinator, global.device)?;

    let color = output::should_color(&global.color);
    let areas: Vec<Area> = device
        .areas
        .values()
        .filter(|a| all || !a.is_placeholder())
        .cloned()
        .collect();
    let out = output::render_list(
        &global.output,
        &areas,
        |a| area_row(a, color),
        |a| a.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle(ctx: &Context, cmd: AreaCommand, global: &GlobalOpts) -> Result<(), CliError> {
    let (ids, arm) = match cmd {
        AreaCommand::Arm { ids } => (ids, true),
        AreaCommand::Disarm { ids } => (ids, false),
    };
    util::require_user_code(ctx)?;
    ctx.coordinator.refresh().await?;
    let device = util::resolve_device(&ctx.coordinator, global.device)?;

    let listed = ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    ctx.coordinator.set_areas(device.id, ids, arm).await?;
    if !global.quiet {
        eprintln!(
            "Areas {listed} {}",
            if arm { "armed" } else { "disarmed" }
        );
    }
    Ok(())
}
