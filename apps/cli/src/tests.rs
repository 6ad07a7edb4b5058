use clap::Parser;

use super::{Cli, Command, PrincipalsCommand};

#[test]
fn parses_a_principals_sync_invocation() {
    let parsed = Cli::try_parse_from([
        "azmirror",
        "principals",
        "sync",
        "--original-id",
        "00000000-0000-0000-0000-000000000001",
        "--target-id",
        "00000000-0000-0000-0000-000000000002",
        "--dry-run",
    ]);

    match parsed {
        Ok(Cli {
            command: Command::Principals(PrincipalsCommand::Sync(args)),
        }) => {
            assert!(args.dry_run);
            assert_ne!(args.original_id, args.target_id);
        }
        other => panic!("expected a sync command, got {other:?}"),
    }
}

#[test]
fn every_reconcile_subcommand_accepts_the_documented_flags() {
    for subcommand in ["add", "remove", "sync"] {
        let parsed = Cli::try_parse_from([
            "azmirror",
            "principals",
            subcommand,
            "--original-id",
            "00000000-0000-0000-0000-000000000001",
            "--target-id",
            "00000000-0000-0000-0000-000000000002",
        ]);

        assert!(parsed.is_ok(), "{subcommand} rejected the documented flags");
    }
}

#[test]
fn reset_only_needs_a_target() {
    let parsed = Cli::try_parse_from([
        "azmirror",
        "principals",
        "reset",
        "--target-id",
        "00000000-0000-0000-0000-000000000002",
    ]);

    match parsed {
        Ok(Cli {
            command: Command::Principals(PrincipalsCommand::Reset(args)),
        }) => assert!(!args.dry_run),
        other => panic!("expected a reset command, got {other:?}"),
    }
}

#[test]
fn rejects_a_non_uuid_object_identifier() {
    let parsed = Cli::try_parse_from([
        "azmirror",
        "principals",
        "add",
        "--original-id",
        "not-a-uuid",
        "--target-id",
        "00000000-0000-0000-0000-000000000002",
    ]);

    assert!(parsed.is_err());
}

#[test]
fn parses_an_app_registration_creation() {
    let parsed = Cli::try_parse_from([
        "azmirror",
        "appRegistration",
        "create",
        "--display-name",
        "sync-tool",
    ]);

    assert!(parsed.is_ok());
}
