use tabmap_cli::edits::{MappingEdits, SkippedEdit};
use tabmap_cli::pairs::FilterArg;
use tabmap_core::{Session, SessionOptions};
use tabmap_map::{Assignment, MemoryStore};
use tabmap_model::{Record, SourceDataset, TargetSchema};

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
        ],
    )
}

fn session() -> Session {
    let mut session = Session::new(MemoryStore::new(), SessionOptions::default());
    session.load_target(TargetSchema::new(["Name", "Email", "Note"]).expect("schema"));
    session
}

fn pair(target: &str, value: &str) -> (String, String) {
    (target.to_string(), value.to_string())
}

#[test]
fn reset_runs_before_map_and_literal() {
    let mut session = session();
    session.assign_literal("Note", "old");
    session.assign_from_source("Name", "Full Name");

    let edits = MappingEdits {
        reset: true,
        map: vec![pair("Email", "Mail")],
        literal: vec![pair("Note", "new")],
        ..MappingEdits::default()
    };
    assert!(edits.apply_mapping(&mut session, &people()).is_empty());

    let mapping = session.mapping();
    assert_eq!(mapping.assignment("Name"), &Assignment::Unassigned);
    assert_eq!(
        mapping.assignment("Email"),
        &Assignment::FromSource("Mail".to_string())
    );
    assert_eq!(mapping.assignment("Note"), &Assignment::Literal("new".to_string()));
}

#[test]
fn unmap_runs_before_map_so_a_source_can_move() {
    let mut session = session();
    session.assign_from_source("Name", "Full Name");

    let edits = MappingEdits {
        unmap: vec!["Name".to_string()],
        map: vec![pair("Note", "Full Name")],
        ..MappingEdits::default()
    };
    assert!(edits.apply_mapping(&mut session, &people()).is_empty());
    assert_eq!(session.mapping().assignment("Name"), &Assignment::Unassigned);
    assert_eq!(session.mapping().mapped_target_for("Full Name"), Some("Note"));
}

#[test]
fn literal_overrides_a_map_for_the_same_column() {
    let mut session = session();
    let edits = MappingEdits {
        map: vec![pair("Email", "Mail")],
        literal: vec![pair("Email", "n/a")],
        ..MappingEdits::default()
    };
    edits.apply_mapping(&mut session, &people());
    assert_eq!(session.mapping().assignment("Email"), &Assignment::Literal("n/a".to_string()));
    assert!(!session.is_source_header_in_use("Mail"));
}

#[test]
fn unknown_columns_are_skipped_and_the_rest_applies() {
    let mut session = session();
    let edits = MappingEdits {
        unmap: vec!["Phone".to_string()],
        map: vec![pair("Phone", "Mail"), pair("Name", "Nickname"), pair("Email", "Mail")],
        literal: vec![pair("Fax", "0")],
        ..MappingEdits::default()
    };
    let skipped = edits.apply_mapping(&mut session, &people());
    assert_eq!(
        skipped,
        vec![
            SkippedEdit::UnknownTarget {
                flag: "--unmap",
                column: "Phone".to_string()
            },
            SkippedEdit::UnknownTarget {
                flag: "--map",
                column: "Phone".to_string()
            },
            SkippedEdit::UnknownSource {
                column: "Name".to_string(),
                source: "Nickname".to_string()
            },
            SkippedEdit::UnknownTarget {
                flag: "--literal",
                column: "Fax".to_string()
            },
        ]
    );
    assert_eq!(session.mapping().assignment("Name"), &Assignment::Unassigned);
    assert_eq!(
        session.mapping().assignment("Email"),
        &Assignment::FromSource("Mail".to_string())
    );
}

#[test]
fn source_already_mapped_elsewhere_is_reported() {
    let mut session = session();
    session.assign_from_source("Name", "Full Name");

    let edits = MappingEdits {
        map: vec![pair("Note", "Full Name"), pair("Name", "Full Name")],
        ..MappingEdits::default()
    };
    let skipped = edits.apply_mapping(&mut session, &people());
    assert_eq!(
        skipped,
        vec![SkippedEdit::SourceInUse {
            column: "Note".to_string(),
            source: "Full Name".to_string(),
            mapped_to: "Name".to_string(),
        }]
    );
    assert_eq!(session.mapping().assignment("Note"), &Assignment::Unassigned);
}

#[test]
fn filters_apply_against_the_loaded_source() {
    let mut session = session();
    session.load_source(people());

    let edits = MappingEdits {
        filter: vec![
            FilterArg {
                column: "Country".to_string(),
                values: vec!["SK".to_string()],
            },
            FilterArg {
                column: "Region".to_string(),
                values: vec!["West".to_string()],
            },
        ],
        ..MappingEdits::default()
    };
    let skipped = edits.apply_filters(&mut session);
    assert_eq!(
        skipped,
        vec![SkippedEdit::UnknownFilterColumn {
            column: "Region".to_string()
        }]
    );
    assert_eq!(session.filters().rules().len(), 2);
    assert_eq!(session.selected_row_count(), 0);
}

#[test]
fn known_filter_selects_matching_rows() {
    let mut session = session();
    session.load_source(people());
    let edits = MappingEdits {
        filter: vec![FilterArg {
            column: "Country".to_string(),
            values: vec!["CZ".to_string(), "SK".to_string()],
        }],
        ..MappingEdits::default()
    };
    assert!(edits.apply_filters(&mut session).is_empty());
    assert_eq!(session.selected_row_count(), 2);
}
