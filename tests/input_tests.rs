//! Snapshot and configuration loading tests
mod common;

use common::*;
use std::io::Write;
use tempfile::NamedTempFile;
use todoist_everdo::{Config, ExportError, Exporter, ListType, Snapshot};

const SYNC_JSON: &str = r#"{
    "projects": [
        {"id": 1, "name": "Inbox", "indent": 1, "item_order": 0, "is_deleted": 0, "is_archived": 0},
        {"id": 2, "name": "GTD", "indent": 1, "item_order": 1, "is_deleted": 0, "is_archived": 0},
        {"id": 3, "name": "Garden", "indent": 2, "item_order": 2, "is_deleted": 0, "is_archived": 0, "is_favorite": 1},
        {"id": 4, "name": "Someday/Maybe", "indent": 1, "item_order": 3, "is_deleted": 0, "is_archived": 0}
    ],
    "items": [
        {"id": 10, "project_id": 1, "content": "Buy milk", "item_order": 1, "is_deleted": 0,
         "is_archived": 0, "due_date_utc": null, "date_string": "", "date_added": "Mon 01 Mar 2021 10:00:00 +0000",
         "date_completed": null, "labels": []},
        {"id": 11, "project_id": 3, "content": "Prune roses", "item_order": 1, "is_deleted": 0,
         "is_archived": 0, "due_date_utc": "2021-04-01T18:30:00Z", "labels": [7]}
    ],
    "labels": [
        {"id": 7, "name": "outside", "color": 4, "is_deleted": 0}
    ],
    "notes": [
        {"id": 20, "item_id": 11, "content": "Before it gets warm", "is_deleted": false}
    ]
}"#;

#[test]
fn test_sync_json_is_parsed() {
    let snapshot = Snapshot::from_json(SYNC_JSON).unwrap();
    assert_eq!(snapshot.projects().len(), 4);
    assert!(snapshot.projects()[2].is_favorite);

    let milk = snapshot.item_by_id(10).unwrap();
    // Blank date strings count as absent
    assert_eq!(milk.date_string, None);
    assert!(!milk.is_completed());

    let garden: Vec<&str> = snapshot
        .child_projects(2)
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(garden, vec!["Garden"]);
    assert_eq!(snapshot.label_id_by_name("OUTSIDE"), Some(7));
}

#[test]
fn test_loaded_snapshot_exports() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SYNC_JSON.as_bytes()).unwrap();
    let snapshot = Snapshot::load(file.path()).unwrap();

    let config = Config::default();
    let (out, summary) = Exporter::new(&snapshot, &config, test_clock())
        .run()
        .unwrap();

    assert_eq!(summary.inbox_items, 1);
    assert_eq!(summary.active_projects, 1);
    assert_eq!(summary.comments, 1);
    let roses = out
        .items()
        .iter()
        .find(|i| i.title() == "Prune roses")
        .unwrap();
    assert_eq!(roses.list(), ListType::Active);
    assert_eq!(roses.due_date(), Some(MAR_3 + 29 * 86_400));
    assert_eq!(roses.note(), "Before it gets warm");
}

#[test]
fn test_broken_snapshot_is_reported() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"{\"projects\": [").unwrap();
    let err = Snapshot::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse snapshot"));

    let missing = Snapshot::load("/nonexistent/snapshot.json").unwrap_err();
    assert!(missing.to_string().contains("Failed to read snapshot"));
}

#[test]
fn test_unparseable_due_date_is_fatal() {
    let mut bad = item(10, 1, "Someday", 1);
    bad.due_date_utc = Some("next tuesday-ish".to_string());
    let snapshot = Snapshot::new(
        vec![project(1, "Inbox", 1, 1)],
        vec![bad],
        Vec::new(),
        Vec::new(),
    );
    let config = Config {
        target_projects: Vec::new(),
        someday_projects: Vec::new(),
        ..Default::default()
    };
    let err = Exporter::new(&snapshot, &config, test_clock())
        .run()
        .unwrap_err();
    assert!(matches!(err, ExportError::Timestamp(_)));
}

// 設定ファイルに書かれていないキーはデフォルト値のまま
#[test]
fn test_config_file_overrides_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"inbox-project = "Eingang"
target-projects = ["Arbeit", "Privat"]
notebooks = ["Notizen"]
contact-color = 7"#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.inbox_project, "Eingang");
    assert_eq!(config.target_projects, vec!["Arbeit", "Privat"]);
    assert_eq!(config.notebooks, vec!["Notizen"]);
    assert_eq!(config.contact_color, 7);
    assert_eq!(config.someday_projects, vec!["Someday/Maybe"]);
    assert_eq!(config.waiting_label, "waiting");
    assert_eq!(config.context_color, 0);
}

#[test]
fn test_config_file_with_overlap_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"target-projects = ["GTD"]
someday-projects = [" GTD"]"#
    )
    .unwrap();
    assert!(matches!(
        Config::load(file.path()),
        Err(ExportError::Config(_))
    ));
}
