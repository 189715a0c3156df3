use clap::Parser;
use snapvol::cli::{Action, Cli};
use std::path::PathBuf;

#[test]
fn volume_defaults_to_root() {
    let cli = Cli::try_parse_from(["snapvol", "list"]).unwrap();
    assert_eq!(cli.action, Action::List);
    assert_eq!(cli.volume, PathBuf::from("/"));
    assert_eq!(cli.id, None);
    assert!(!cli.dry_run);
}

#[test]
fn all_five_actions_parse() {
    let cases = [
        ("list", Action::List),
        ("create", Action::Create),
        ("delete", Action::Delete),
        ("get-root-vol", Action::GetRootVol),
        ("mount-root-vol", Action::MountRootVol),
    ];
    for (name, expected) in cases {
        let cli = Cli::try_parse_from(["snapvol", name]).unwrap();
        assert_eq!(cli.action, expected);
    }
}

#[test]
fn delete_id_and_volume_are_carried_into_request() {
    let cli = Cli::try_parse_from([
        "snapvol",
        "delete",
        "--id",
        "2026-10-19-101500",
        "--volume",
        "/Volumes/Data",
        "--dry-run",
    ])
    .unwrap();
    let req = cli.request();
    assert_eq!(req.action, Action::Delete);
    assert_eq!(req.id.as_deref(), Some("2026-10-19-101500"));
    assert_eq!(req.volume, PathBuf::from("/Volumes/Data"));
    assert!(req.dry_run);
}

#[test]
fn unknown_action_is_rejected() {
    assert!(Cli::try_parse_from(["snapvol", "unmount-root-vol"]).is_err());
    assert!(Cli::try_parse_from(["snapvol"]).is_err());
}
