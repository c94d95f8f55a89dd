//! Common test utilities for integration tests
#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use todoist_everdo::source::{
    FileAttachment, SourceItem, SourceLabel, SourceNote, SourceProject,
};
use todoist_everdo::{Config, ExportClock, Snapshot};

/// 2021-03-03T00:00:00Z
pub const MAR_3: i64 = 1_614_729_600;
/// 2021-03-05T00:00:00Z, the export day of [`test_clock`]
pub const MAR_5: i64 = 1_614_902_400;
/// 2021-09-01T00:00:00Z
pub const SEP_1: i64 = 1_630_454_400;

/// Clock pinned to 2021-03-05 12:00 UTC
pub fn test_clock() -> ExportClock {
    ExportClock::fixed(Utc.with_ymd_and_hms(2021, 3, 5, 12, 0, 0).unwrap())
}

/// Create a live project
pub fn project(id: u64, name: &str, indent: u32, item_order: i64) -> SourceProject {
    SourceProject {
        id,
        name: name.to_string(),
        indent,
        item_order,
        ..Default::default()
    }
}

/// Create a live item with no dates and no labels
pub fn item(id: u64, project_id: u64, content: &str, item_order: i64) -> SourceItem {
    SourceItem {
        id,
        project_id,
        content: content.to_string(),
        item_order,
        ..Default::default()
    }
}

pub fn label(id: u64, name: &str, color: i64) -> SourceLabel {
    SourceLabel {
        id,
        name: name.to_string(),
        color,
        is_deleted: false,
    }
}

pub fn note(id: u64, item_id: u64, content: &str) -> SourceNote {
    SourceNote {
        id,
        item_id,
        content: content.to_string(),
        ..Default::default()
    }
}

/// Default configuration plus one copied project and one notebook
pub fn test_config() -> Config {
    Config {
        other_projects: vec!["Household".to_string()],
        notebooks: vec!["Reference".to_string()],
        ..Default::default()
    }
}

/// A small but complete account
///
/// ```text
/// Inbox                 Buy milk, Call plumber
/// GTD                   Renew passport, * Misc
///   Work (favorite)     Planning:, Finish report, Review budget __waiting,
///                       Get signature, (deleted), Pick up parcel __Errands __nonsense
///   Old stuff (archived) Old task
///   Trashed (deleted)
/// Someday/Maybe         Write a novel
///   Travel              Book flights, Pack bags, Renew visa (completed)
///   Learn piano         Find lessons
/// Reference             Recipes:, Wifi password is on the router
/// Household             Fix the tap
/// ```
pub fn sample_snapshot() -> Snapshot {
    let mut old_stuff = project(202, "Old stuff", 2, 4);
    old_stuff.is_archived = true;
    let mut trashed = project(203, "Trashed", 2, 5);
    trashed.is_deleted = true;
    let mut work = project(201, "Work", 2, 3);
    work.is_favorite = true;

    let projects = vec![
        project(100, "Inbox", 1, 1),
        project(200, "GTD", 1, 2),
        work,
        old_stuff,
        trashed,
        project(300, "Someday/Maybe", 1, 6),
        project(301, "Travel", 2, 7),
        project(302, "Learn piano", 2, 8),
        project(400, "Reference", 1, 9),
        project(500, "Household", 1, 10),
    ];

    let labels = vec![
        label(1, "waiting", 5),
        label(2, "Errands", 0),
        label(3, "Alice", 9),
        label(4, "home", 3),
    ];

    let mut buy_milk = item(1000, 100, "Buy milk", 1);
    buy_milk.date_added = Some("Mon 01 Mar 2021 10:00:00 +0000".to_string());
    let mut call_plumber = item(1001, 100, "Call plumber", 2);
    call_plumber.labels = vec![4];

    let mut finish_report = item(2011, 201, "Finish report", 2);
    finish_report.is_archived = true;
    finish_report.date_completed = Some("Wed 03 Mar 2021 22:59:59 +0000".to_string());
    let mut get_signature = item(2013, 201, "Get signature", 4);
    get_signature.labels = vec![1, 3];
    let mut deleted = item(2014, 201, "Deleted thing", 5);
    deleted.is_deleted = true;

    let mut book_flights = item(3010, 301, "Book flights", 1);
    book_flights.due_date_utc = Some("Fri 10 Sep 2021 12:00:00 +0000".to_string());
    let mut pack_bags = item(3011, 301, "Pack bags", 2);
    pack_bags.due_date_utc = Some("Wed 01 Sep 2021 23:59:59 +0000".to_string());
    let mut renew_visa = item(3012, 301, "Renew visa", 3);
    renew_visa.due_date_utc = Some("Sun 01 Aug 2021 12:00:00 +0000".to_string());
    renew_visa.date_completed = Some("Tue 02 Mar 2021 08:00:00 +0000".to_string());

    let mut fix_tap = item(5000, 500, "Fix the tap", 1);
    fix_tap.date_string = Some("every monday".to_string());

    let items = vec![
        buy_milk,
        call_plumber,
        item(2000, 200, "Renew passport", 1),
        item(2001, 200, "* Misc", 2),
        item(2010, 201, "Planning:", 1),
        finish_report,
        item(2012, 201, "Review budget __waiting", 3),
        get_signature,
        deleted,
        item(2015, 201, "Pick up parcel __Errands __nonsense", 6),
        item(2020, 202, "Old task", 1),
        item(3000, 300, "Write a novel", 1),
        book_flights,
        pack_bags,
        renew_visa,
        item(3020, 302, "Find lessons", 1),
        item(4000, 400, "Recipes:", 1),
        item(4001, 400, "Wifi password is on the router", 2),
        fix_tap,
    ];

    let mut invoice = note(9003, 1001, "Invoice");
    invoice.file_attachment = Some(FileAttachment {
        file_name: Some("invoice.pdf".to_string()),
        file_url: Some("https://files.example.com/invoice.pdf".to_string()),
        url: None,
    });
    let mut removed = note(9004, 2011, "Removed comment");
    removed.is_deleted = true;

    let notes = vec![
        note(9000, 1000, "Semi-skimmed"),
        note(9001, 2010, "Quarterly numbers"),
        note(9002, 2014, "Comment on a deleted item"),
        invoice,
        removed,
    ];

    Snapshot::new(projects, items, labels, notes)
}
