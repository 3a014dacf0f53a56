use std::path::Path;
use std::time::Duration;

use proptest::prelude::*;

use tabmap_core::{ExportError, RestoreOutcome, Session, SessionError, SessionOptions};
use tabmap_map::{Assignment, FileStore, MemoryStore};
use tabmap_model::{CellValue, Record, SourceDataset, TargetSchema};

fn fast() -> SessionOptions {
    SessionOptions {
        min_export_latency: Duration::from_millis(5),
    }
}

fn file_session(dir: &Path) -> Session {
    Session::new(FileStore::new(dir).expect("store"), fast())
}

fn people() -> SourceDataset {
    SourceDataset::new(
        vec!["Full Name".into(), "Mail".into(), "Country".into()],
        vec![
            Record::new()
                .with("Full Name", "Ana")
                .with("Mail", "ana@x.sk")
                .with("Country", "SK"),
            Record::new()
                .with("Full Name", "Petr")
                .with("Mail", "petr@x.cz")
                .with("Country", "CZ"),
            Record::new()
                .with("Full Name", "Jana")
                .with("Mail", "jana@x.sk")
                .with("Country", "SK"),
        ],
    )
}

fn schema() -> TargetSchema {
    TargetSchema::new(["Name", "Email"]).expect("schema")
}

#[test]
fn mapping_survives_a_restart_for_the_same_schema() {
    let dir = tempfile::tempdir().expect("tempdir");

    let mut first = file_session(dir.path());
    assert_eq!(first.load_target(schema()), RestoreOutcome::Blank);
    assert!(first.assign_from_source("Name", "Full Name"));
    assert!(first.assign_literal("Email", "n/a"));
    let saved = first.mapping().clone();

    let mut second = file_session(dir.path());
    assert_eq!(second.load_target(schema()), RestoreOutcome::Restored);
    assert_eq!(second.mapping(), &saved);
}

#[test]
fn different_schema_starts_blank() {
    let dir = tempfile::tempdir().expect("tempdir");

    let mut first = file_session(dir.path());
    first.load_target(schema());
    first.assign_literal("Email", "n/a");

    let mut second = file_session(dir.path());
    let other = TargetSchema::new(["Email", "Name"]).expect("schema");
    assert_eq!(second.load_target(other), RestoreOutcome::Blank);
    assert!(!second.has_any_assignment());
}

#[test]
fn reloading_a_new_target_replaces_the_mapping() {
    let mut session = Session::new(MemoryStore::new(), fast());
    session.load_target(schema());
    session.assign_literal("Email", "n/a");

    let other = TargetSchema::new(["Title"]).expect("schema");
    session.load_target(other);
    assert_eq!(session.mapping().columns(), ["Title"]);
    assert!(!session.has_any_assignment());

    // Loading alone does not overwrite the slot.
    assert_eq!(session.load_target(schema()), RestoreOutcome::Restored);
    assert!(session.has_any_assignment());
}

#[test]
fn rejected_command_reports_no_change() {
    let mut session = Session::new(MemoryStore::new(), fast());
    session.load_target(schema());
    assert!(session.assign_from_source("Name", "Full Name"));
    assert!(!session.assign_from_source("Email", "Full Name"));
    assert!(session.is_source_header_in_use("Full Name"));
    assert_eq!(session.mapping().assignment("Email"), &Assignment::Unassigned);
    assert!(!session.clear("Email"));
}

#[test]
fn commands_before_a_target_are_no_ops() {
    let mut session = Session::new(MemoryStore::new(), fast());
    assert!(!session.assign_literal("Name", "x"));
    assert_eq!(session.begin_export().unwrap_err(), SessionError::NoTarget);
}

#[test]
fn loading_a_source_resets_filters() {
    let mut session = Session::new(MemoryStore::new(), fast());
    session.load_source(people());
    let rule = session.add_filter_rule();
    assert!(session.set_filter_column(rule, "Country"));
    assert!(session.set_filter_values(rule, ["SK"]));
    assert_eq!(session.selected_row_count(), 2);

    session.load_source(people());
    assert!(session.filters().rules().is_empty());
    assert_eq!(session.selected_row_count(), 3);
}

#[test]
fn value_domain_reads_the_current_source() {
    let mut session = Session::new(MemoryStore::new(), fast());
    assert!(session.value_domain("Country").is_empty());
    session.load_source(people());
    assert_eq!(session.value_domain("Country"), vec!["CZ", "SK"]);
}

#[test]
fn export_with_nothing_configured_leaves_state_alone() {
    let mut session = Session::new(MemoryStore::new(), fast());
    session.load_target(schema());
    session.load_source(people());
    let before = session.mapping().clone();

    let err = session.begin_export().unwrap_err();
    assert_eq!(err, SessionError::Export(ExportError::NothingConfigured));
    assert_eq!(session.mapping(), &before);
    assert!(!session.export_in_progress());
}

#[tokio::test]
async fn export_applies_filters_and_mapping() {
    let mut session = Session::new(MemoryStore::new(), fast());
    session.load_target(schema());
    session.load_source(people());
    session.assign_from_source("Name", "Full Name");
    session.assign_literal("Email", "n/a");
    let rule = session.add_filter_rule();
    session.set_filter_column(rule, "Country");
    session.set_filter_values(rule, ["SK"]);

    let table = session.begin_export().expect("job").run().await.expect("table");
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows[0][0], CellValue::text("Ana"));
    assert_eq!(table.rows[1][0], CellValue::text("Jana"));
    assert_eq!(table.rows[1][1], CellValue::text("n/a"));
}

#[tokio::test]
async fn second_export_is_rejected_while_one_is_running() {
    let mut session = Session::new(MemoryStore::new(), fast());
    session.load_target(schema());
    session.load_source(people());
    session.assign_from_source("Name", "Full Name");

    let job = session.begin_export().expect("first job");
    assert!(session.export_in_progress());
    assert_eq!(
        session.begin_export().unwrap_err(),
        SessionError::ExportInProgress
    );

    let table = job.run().await.expect("table");
    assert_eq!(table.row_count(), 3);
    assert!(!session.export_in_progress());
    assert!(session.begin_export().is_ok());
}

#[tokio::test]
async fn job_uses_state_captured_at_dispatch() {
    let mut session = Session::new(MemoryStore::new(), fast());
    session.load_target(schema());
    session.load_source(people());
    session.assign_literal("Email", "first");

    let job = session.begin_export().expect("job");
    session.assign_literal("Email", "second");

    let table = job.run().await.expect("table");
    assert_eq!(table.rows[0][1], CellValue::text("first"));
}

#[test]
fn dropping_an_unrun_job_releases_the_gate() {
    let mut session = Session::new(MemoryStore::new(), fast());
    session.load_target(schema());
    session.assign_literal("Email", "n/a");

    let job = session.begin_export().expect("job");
    drop(job);
    assert!(!session.export_in_progress());
}

proptest! {
    #[test]
    fn mapping_commands_round_trip_through_the_cache(
        literal in "[a-z]{1,5}",
        map_name in any::<bool>(),
    ) {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut first = file_session(dir.path());
        first.load_target(schema());
        if map_name {
            first.assign_from_source("Name", "Full Name");
        }
        first.assign_literal("Email", &literal);

        let mut second = file_session(dir.path());
        prop_assert_eq!(second.load_target(schema()), RestoreOutcome::Restored);
        prop_assert_eq!(second.mapping(), first.mapping());
    }
}
