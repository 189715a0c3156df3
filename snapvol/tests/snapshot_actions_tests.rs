use snapvol::actions::dispatch;
use snapvol::cli::{Action, Request};
use snapvol::config::SnapvolConfig;
use snapvol::snapshots::SnapshotService;
use snapvol_hal::{FakeHal, Operation};
use std::path::{Path, PathBuf};

fn request(action: Action, volume: &str, id: Option<&str>) -> Request {
    Request {
        action,
        volume: PathBuf::from(volume),
        id: id.map(str::to_string),
        dry_run: false,
    }
}

fn run(hal: &FakeHal, req: Request) -> String {
    let mut out = Vec::new();
    dispatch(hal, &SnapvolConfig::default(), &req, &mut out).expect("dispatch");
    String::from_utf8(out).expect("utf8 output")
}

#[test]
fn created_snapshot_shows_up_in_listing() {
    let hal = FakeHal::new();
    let svc = SnapshotService::new(&hal, false);
    let before = svc.list(Path::new("/")).unwrap();

    let date = svc.create(Path::new("/")).unwrap().expect("tmutil reports a date");
    let after = svc.list(Path::new("/")).unwrap();

    assert_eq!(after.len(), before.len() + 1);
    assert!(after.iter().any(|s| s.id.contains(&date)));
}

#[test]
fn list_action_prints_ids_under_header() {
    let hal = FakeHal::new();
    hal.seed_snapshot("/Volumes/Data", "com.apple.TimeMachine.2026-10-18-090000.local");

    let printed = run(&hal, request(Action::List, "/Volumes/Data", None));
    assert_eq!(
        printed,
        "Snapshots:\ncom.apple.TimeMachine.2026-10-18-090000.local\n"
    );
    assert!(hal.has_operation(|op| *op
        == Operation::ListSnapshots {
            volume: PathBuf::from("/Volumes/Data")
        }));
}

#[test]
fn empty_listing_prints_nothing() {
    let hal = FakeHal::new();
    assert_eq!(run(&hal, request(Action::List, "/", None)), "");
}

#[test]
fn create_and_delete_report_to_stdout() {
    let hal = FakeHal::new();
    assert_eq!(
        run(&hal, request(Action::Create, "/", None)),
        "Snapshot created for volume /\n"
    );
    assert_eq!(
        run(&hal, request(Action::Delete, "/", Some("2026-10-19-000001"))),
        "Snapshot 2026-10-19-000001 deleted\n"
    );
    assert_eq!(run(&hal, request(Action::List, "/", None)), "");
}

#[test]
fn deleting_unknown_snapshot_is_reported_not_fatal() {
    let hal = FakeHal::new();
    let printed = run(&hal, request(Action::Delete, "/", Some("1999-01-01-000000")));
    assert_eq!(printed, "");
    assert!(hal.has_operation(|op| matches!(op, Operation::DeleteSnapshot { .. })));
}

#[test]
fn dry_run_mount_prints_planned_command() {
    let hal = FakeHal::new();
    hal.set_disk_info("/", "disk3s1s1", Some(true));
    let mut req = request(Action::MountRootVol, "/", None);
    req.dry_run = true;

    let printed = run(&hal, req);
    assert_eq!(
        printed,
        "sudo mount -o nobrowse -t apfs /dev/disk3s1 /System/Volumes/Update/mnt1\n"
    );
    assert!(hal.commands().is_empty());
}
