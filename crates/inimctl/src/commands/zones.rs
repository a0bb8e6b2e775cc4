//! Zone listing and bypass handlers.

use tabled::Tabled;

use inim_core::Zone;

use crate::cli::GlobalOpts;
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Open")]
    open: &'static str,
    #[tabled(rename = "Bypassed")]
    bypassed: &'static str,
    #[tabled(rename = "Alarm mem.")]
    alarm_memory: &'static str,
    #[tabled(rename = "Tamper mem.")]
    tamper_memory: &'static str,
}

impl From<&Zone> for ZoneRow {
    fn from(z: &Zone) -> Self {
        Self {
            id: z.id,
            name: z.name.clone(),
            kind: z.kind().to_string(),
            open: output::yes_no(z.is_open()),
            bypassed: output::yes_no(z.bypassed),
            alarm_memory: output::yes_no(z.alarm_memory),
            tamper_memory: output::yes_no(z.tamper_memory),
        }
    }
}

pub async fn list(ctx: &Context, all: bool, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.coordinator.refresh().await?;
    let device = util::resolve_device(&ctx.coordinator, global.device)?;

    let zones: Vec<Zone> = device
        .zones
        .values()
        .filter(|z| all || z.visible)
        .cloned()
        .collect();
    let out = output::render_list(
        &global.output,
        &zones,
        |z| ZoneRow::from(z),
        |z| z.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn bypass(
    ctx: &Context,
    zone_id: i64,
    reinstate: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_user_code(ctx)?;
    ctx.coordinator.refresh().await?;
    let device = util::resolve_device(&ctx.coordinator, global.device)?;

    let bypass = !reinstate;
    if bypass {
        let name = device
            .zone(zone_id)
            .map_or_else(|| format!("zone {zone_id}"), |z| z.name.clone());
        if !util::confirm(
            &format!("Bypass '{name}'? It will not trigger alarms."),
            global.yes,
        )? {
            return Ok(());
        }
    }

    ctx.coordinator
        .bypass_zone(device.id, zone_id, bypass)
        .await?;
    if !global.quiet {
        eprintln!(
            "Zone {zone_id} {}",
            if bypass { "bypassed" } else { "reinstated" }
        );
    }
    Ok(())
}
