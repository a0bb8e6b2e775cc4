//! Panel listing, status and poll handlers.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use inim_core::{AlarmState, Coordinator, Device};

use crate::cli::GlobalOpts;
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Firmware")]
    firmware: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Scenario")]
    scenario: String,
    #[tabled(rename = "Areas")]
    areas: usize,
    #[tabled(rename = "Zones")]
    zones: usize,
}

fn device_row(coordinator: &Coordinator, device: &Device, color: bool) -> DeviceRow {
    DeviceRow {
        id: device.id,
        name: device.name.clone(),
        model: device.model.clone().unwrap_or_default(),
        firmware: device.firmware.clone().unwrap_or_default(),
        state: output::paint_maybe_state(coordinator.alarm_state(device.id), color),
        scenario: device
            .active_scenario()
            .map(|s| s.name.clone())
            .unwrap_or_default(),
        areas: device.areas.len(),
        zones: device.zones.len(),
    }
}

// ── Status view ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct PanelStatus {
    device_id: i64,
    name: String,
    state: Option<AlarmState>,
    active_scenario: Option<String>,
    faults: i64,
    areas: Vec<AreaStatus>,
    open_zones: Vec<ZoneRef>,
    bypassed_zones: Vec<ZoneRef>,
    fetched_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct AreaStatus {
    id: i64,
    name: String,
    armed: &'static str,
    state: AlarmState,
}

#[derive(Serialize)]
struct ZoneRef {
    id: i64,
    name: String,
}

fn panel_status(coordinator: &Coordinator, device: &Device) -> PanelStatus {
    let zone_refs = |pred: fn(&inim_core::Zone) -> bool| {
        device
            .zones
            .values()
            .filter(|z| pred(z))
            .map(|z| ZoneRef {
                id: z.id,
                name: z.name.clone(),
            })
            .collect()
    };

    PanelStatus {
        device_id: device.id,
        name: device.name.clone(),
        state: coordinator.alarm_state(device.id),
        active_scenario: device.active_scenario().map(|s| s.name.clone()),
        faults: device.faults,
        areas: device
            .areas
            .values()
            .filter(|a| !a.is_placeholder())
            .map(|a| AreaStatus {
                id: a.id,
                name: a.name.clone(),
                armed: a.armed.label(),
                state: a.alarm_state(),
            })
            .collect(),
        open_zones: zone_refs(|z| z.visible && z.is_open()),
        bypassed_zones: zone_refs(|z| z.bypassed),
        fetched_at: coordinator.snapshot().fetched_at,
    }
}

fn status_detail(status: &PanelStatus, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", status.name, status.device_id);
    let _ = writeln!(out, "  State:     {}", output::paint_maybe_state(status.state, color));
    if let Some(ref scenario) = status.active_scenario {
        let _ = writeln!(out, "  Scenario:  {scenario}");
    }
    if status.faults != 0 {
        let _ = writeln!(out, "  Faults:    {}", status.faults);
    }
    for area in &status.areas {
        let _ = writeln!(
            out,
            "  Area {:>3}:  {:<20} {}",
            area.id,
            area.name,
            output::paint_state(area.state, color)
        );
    }
    let names = |zones: &[ZoneRef]| {
        zones
            .iter()
            .map(|z| z.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    if !status.open_zones.is_empty() {
        let _ = writeln!(out, "  Open:      {}", names(&status.open_zones));
    }
    if !status.bypassed_zones.is_empty() {
        let _ = writeln!(out, "  Bypassed:  {}", names(&status.bypassed_zones));
    }
    if let Some(at) = status.fetched_at {
        let _ = write!(out, "  Updated:   {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    out.trim_end().to_owned()
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let coordinator = &ctx.coordinator;
    coordinator.refresh().await?;

    let color = output::should_color(&global.color);
    let devices: Vec<Arc<Device>> = coordinator.devices();
    let out = output::render_list(
        &global.output,
        &devices,
        |d| device_row(coordinator, d, color),
        |d| d.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn status(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let coordinator = &ctx.coordinator;
    coordinator.refresh().await?;

    let device = util::resolve_device(coordinator, global.device)?;
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &panel_status(coordinator, &device),
        |s| status_detail(s, color),
        |s| output::paint_maybe_state(s.state, false),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn poll(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let coordinator = &ctx.coordinator;
    coordinator.refresh().await?;

    let device = util::resolve_device(coordinator, global.device)?;
    coordinator.request_poll(device.id).await?;
    coordinator.refresh().await?;
    if !global.quiet {
        eprintln!("Poll requested for {}", device.name);
    }
    Ok(())
}
