// File: tests/workbook_load.rs
use chrono::{Local, NaiveDate, TimeZone};
use sheetcal::config::Config;
use sheetcal::context::TestContext;
use sheetcal::range::DateRange;
use sheetcal::session::Session;
use sheetcal::source;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn ides_of_march() -> DateRange {
    let day = NaiveDate::from_ymd_opt(2023, 3, 15).unwrap();
    DateRange::days(day, day).unwrap()
}

async fn load(name: &str) {
    let ctx = TestContext::new();
    let mut session = Session::open(&ctx, Config::default()).unwrap();

    let outcome = session.load_file(&fixture(name)).await.unwrap();
    assert_eq!(outcome.count, 2);
    assert_eq!(outcome.skipped, 1);
    assert!(outcome.saved);

    // Loaded in sheet order; only the first sheet is read.
    let events = session.store().events();
    let subjects: Vec<&str> = events.iter().map(|e| e.subject.as_str()).collect();
    assert_eq!(subjects, vec!["Planning", "Standup"]);

    let planning = &events[0];
    assert_eq!(planning.location, "Room 2");
    assert_eq!(planning.start, Local.with_ymd_and_hms(2023, 3, 15, 9, 0, 0).unwrap());
    assert_eq!(
        planning.end,
        Some(Local.with_ymd_and_hms(2023, 3, 15, 10, 30, 0).unwrap())
    );
    assert_eq!(events[1].start, Local.with_ymd_and_hms(2023, 3, 15, 8, 30, 0).unwrap());
    assert_eq!(events[1].end, None);

    // Queried by start time.
    let outcome = session.query(&ides_of_march());
    let subjects: Vec<&str> = outcome.events().iter().map(|e| e.subject.as_str()).collect();
    assert_eq!(subjects, vec!["Standup", "Planning"]);
}

#[tokio::test]
async fn test_load_xlsx() {
    load("events.xlsx").await;
}

#[tokio::test]
async fn test_load_xlsx_with_1904_dates() {
    // Same sheet saved with the 1904 epoch; the default config stays on 1900.
    load("events_1904.xlsx").await;
}

#[tokio::test]
async fn test_decode_keeps_header_labels() {
    let rows = source::read_file(&fixture("events.xlsx")).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].contains_key("Start"));
    assert!(!rows[1].contains_key("Location"));
    assert!(!rows[2].contains_key("Start"));
}
