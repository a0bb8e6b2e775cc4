//! `watch`: run the polling loop and print alarm events until Ctrl-C.

use chrono::Utc;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use inim_core::{AlarmEvent, RefreshStatus};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

fn print_event(event: &AlarmEvent, global: &GlobalOpts) -> Result<(), CliError> {
    let line = match global.output {
        OutputFormat::Json | OutputFormat::JsonCompact => serde_json::to_string(event)?,
        OutputFormat::Plain => format!("{}:{}", event.device_id, event.area_id),
        OutputFormat::Table => format!(
            "{}  ALARM  {} / {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S"),
            event.device_name,
            event.area_name
        ),
    };
    // Alarm lines are the point of `watch`; --quiet only hides the banner.
    output::print_output(&line, false);
    Ok(())
}

pub async fn handle(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let coordinator = &ctx.coordinator;

    let mut alarms = coordinator.subscribe_alarms();
    let mut status = coordinator.refresh_status();

    // Fail fast on bad credentials before going into the loop.
    coordinator.refresh().await?;
    if !global.quiet {
        eprintln!(
            "Watching {} panel(s) every {}s, Ctrl-C to stop",
            coordinator.devices().len(),
            coordinator.config().refresh_interval.as_secs()
        );
    }

    let cancel = CancellationToken::new();
    let poller = coordinator.spawn_polling(cancel.clone());

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut degraded = false;
    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,

            event = alarms.recv() => match event {
                Ok(event) => print_event(&event, global)?,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "alarm events dropped");
                }
                Err(RecvError::Closed) => break,
            },

            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = status.borrow_and_update().clone();
                match current {
                    RefreshStatus::Degraded { error, .. } if !degraded => {
                        degraded = true;
                        eprintln!("INIM Cloud unavailable, showing last known state: {error}");
                    }
                    RefreshStatus::Available { .. } if degraded => {
                        degraded = false;
                        eprintln!("INIM Cloud reachable again");
                    }
                    _ => {}
                }
            }
        }
    }

    cancel.cancel();
    poller.await.map_err(|e| CliError::Internal {
        message: format!("polling task failed: {e}"),
    })?;
    Ok(())
}
