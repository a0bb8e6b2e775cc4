//! Command dispatch: bridges CLI args -> coordinator calls -> output.

pub mod areas;
pub mod config_cmd;
pub mod devices;
pub mod scenarios;
pub mod util;
pub mod watch;
pub mod zones;

use crate::cli::{Command, GlobalOpts};
use crate::config::Context;
use crate::error::CliError;

/// Dispatch a cloud-bound command to its handler.
pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Devices => devices::list(ctx, global).await,
        Command::Status => devices::status(ctx, global).await,
        Command::Poll => devices::poll(ctx, global).await,
        Command::Zones(args) => zones::list(ctx, args.all, global).await,
        Command::Bypass { zone, reinstate } => zones::bypass(ctx, zone, reinstate, global).await,
        Command::Areas(args) => areas::list(ctx, args.all, global).await,
        Command::Area(args) => areas::handle(ctx, args.command, global).await,
        Command::Scenarios => scenarios::list(ctx, global).await,
        Command::Arm(args) => scenarios::arm(ctx, args.mode, global).await,
        Command::Disarm => scenarios::disarm(ctx, global).await,
        Command::Scenario { id } => scenarios::activate(ctx, id, global).await,
        Command::Watch(_) => watch::handle(ctx, global).await,
        // Handled before a context is built
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal {
            message: "local command reached cloud dispatch".into(),
        }),
    }
}
