//! Top-level action dispatch.

use crate::cli::{Action, Request};
use crate::config::SnapvolConfig;
use crate::errors::{Result, SnapvolError};
use crate::root_volume::{root_volume_identifier, MountOutcome, RootVolumeMounter};
use crate::snapshots::SnapshotService;
use snapvol_hal::SystemHal;
use std::io::Write;

/// Run one action, writing user-facing results to `out`.
///
/// Snapshot failures are logged and swallowed so the process carries on; root-volume
/// failures are returned to the caller.
pub fn dispatch<H, W>(hal: &H, config: &SnapvolConfig, request: &Request, out: &mut W) -> Result<()>
where
    H: SystemHal + ?Sized,
    W: Write + ?Sized,
{
    // Validate before any external call is made.
    let has_id = matches!(request.id.as_deref(), Some(id) if !id.is_empty());
    if request.action == Action::Delete && !has_id {
        return Err(SnapvolError::Usage(
            "The --id parameter is required for the delete action.".to_string(),
        ));
    }

    log::debug!("action: {}", request.action);
    let snapshots = SnapshotService::new(hal, request.dry_run);
    let volume = request.volume.as_path();

    match request.action {
        Action::List => match snapshots.list(volume) {
            Ok(list) if list.is_empty() => log::info!("No snapshots for {}", volume.display()),
            Ok(list) => {
                writeln!(out, "Snapshots:")?;
                for snapshot in list {
                    writeln!(out, "{}", snapshot.id)?;
                }
            }
            Err(err) => log::error!("Error listing snapshots: {err}"),
        },
        Action::Create => match snapshots.create(volume) {
            Ok(created) => {
                writeln!(out, "Snapshot created for volume {}", volume.display())?;
                if let Some(date) = created {
                    log::info!("- Snapshot date: {date}");
                }
            }
            Err(err) => log::error!("Error creating snapshot: {err}"),
        },
        Action::Delete => {
            let id = request.id.as_deref().unwrap_or_default();
            match snapshots.delete(id) {
                Ok(()) => writeln!(out, "Snapshot {id} deleted")?,
                Err(err) => log::error!("Error deleting snapshot: {err}"),
            }
        }
        Action::GetRootVol => {
            let root = root_volume_identifier(hal)?;
            writeln!(out, "Current root volume: {root}")?;
        }
        Action::MountRootVol => {
            let outcome = RootVolumeMounter::new(hal, config)
                .dry_run(request.dry_run)
                .mount()?;
            if let MountOutcome::Planned(argv) = outcome {
                writeln!(out, "{}", argv.join(" "))?;
            }
        }
    }
    Ok(())
}
