// tests/runner_flow.rs
//
// End-to-end runs against a saved page, an on-disk store, and a captured mailer.
//
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, Utc};

use price_watch::Error;
use price_watch::core::net::FileSource;
use price_watch::mail::Mailer;
use price_watch::progress::NullProgress;
use price_watch::runner::{self, RunOutcome};
use price_watch::specs::filter::CategoryFilter;
use price_watch::store::SnapshotStore;

#[derive(Default)]
struct CapturedMail {
    sent: Vec<(String, String)>,
    fail: bool,
}

impl Mailer for CapturedMail {
    fn send(&mut self, subject: &str, body: &str) -> price_watch::Result<()> {
        if self.fail { return Err(Error::Mail("smtp down".into())); }
        self.sent.push((subject.to_string(), body.to_string()));
        Ok(())
    }
}

fn t(n: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 8, 1).unwrap().and_hms_opt(n, 0, 0).unwrap()
}

fn page(dir: &Path, name: &str, body: &str) -> FileSource {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    FileSource { path }
}

fn doc(options: &str) -> String {
    format!(r#"<select><optgroup label="NVIDIA RTX4060 系列">{options}</optgroup></select>"#)
}

fn installed(dir: &Path) -> PathBuf {
    let data = dir.join("data");
    runner::install(&data, &data.join("coolpc.db"), false).unwrap()
}

#[test]
fn first_run_stores_and_second_run_reports() {
    let dir = tempfile::tempdir().unwrap();
    let db = installed(dir.path());
    let mut store = SnapshotStore::open(&db).unwrap();
    let mut mail = CapturedMail::default();
    let f = CategoryFilter::default();

    let p1 = page(dir.path(), "p1.html", &doc(concat!(
        "<option>ASUS RTX4060(8G) Dual, $10990 </option>",
        "<option>MSI RTX4060(8G) Ventus, $9990 </option>",
    )));
    let out = runner::run(&p1, &mut store, &mut mail, &f, t(1), &mut NullProgress).unwrap();
    assert_eq!(out, RunOutcome::NoChange { ingested: 2 });
    assert!(mail.sent.is_empty());

    let p2 = page(dir.path(), "p2.html", &doc(concat!(
        "<option>ASUS RTX4060(8G) Dual, $10990$9891 </option>",
        "<option>ZOTAC RTX4060(8G) Twin, $9490 </option>",
    )));
    let out = runner::run(&p2, &mut store, &mut mail, &f, t(2), &mut NullProgress).unwrap();
    let RunOutcome::Reported { ingested, report } = out else { panic!("expected a report") };
    assert_eq!(ingested, 2);
    assert_eq!(report.lines, vec![
        "ASUS RTX4060(8G) 9891 -10.0%",
        "[soldout] RTX4060(8G)",
        "[new] ZOTAC RTX4060(8G) 9490",
    ]);
    assert_eq!(mail.sent, vec![(report.subject.clone(), report.to_string())]);
}

#[test]
fn parse_failure_ingests_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let db = installed(dir.path());
    let mut store = SnapshotStore::open(&db).unwrap();
    let mut mail = CapturedMail::default();

    let bad = page(dir.path(), "bad.html", &doc(concat!(
        "<option>ASUS RTX4060(8G) Dual, $10990 </option>",
        "<option>MSI RTX4060 8G Ventus, $9990 </option>",
    )));
    let err = runner::run(&bad, &mut store, &mut mail, &CategoryFilter::default(), t(1), &mut NullProgress).unwrap_err();
    assert_eq!(err.stage(), "tokenize");
    assert!(store.is_empty().unwrap());
    assert!(mail.sent.is_empty());
}

#[test]
fn empty_page_stores_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let db = installed(dir.path());
    let mut store = SnapshotStore::open(&db).unwrap();
    let src = page(dir.path(), "empty.html", "<html></html>");
    let out = runner::run(&src, &mut store, &mut CapturedMail::default(), &CategoryFilter::default(), t(1), &mut NullProgress).unwrap();
    assert_eq!(out, RunOutcome::NothingParsed);
    assert!(store.is_empty().unwrap());
}

#[test]
fn mail_failure_is_surfaced_after_ingest() {
    let dir = tempfile::tempdir().unwrap();
    let db = installed(dir.path());
    let mut store = SnapshotStore::open(&db).unwrap();
    let f = CategoryFilter::default();
    let mut ok = CapturedMail::default();
    let mut down = CapturedMail { fail: true, ..Default::default() };

    let p1 = page(dir.path(), "p1.html", &doc("<option>ASUS RTX4060(8G) Dual, $10000 </option>"));
    runner::run(&p1, &mut store, &mut ok, &f, t(1), &mut NullProgress).unwrap();
    let p2 = page(dir.path(), "p2.html", &doc("<option>ASUS RTX4060(8G) Dual, $9000 </option>"));
    let err = runner::run(&p2, &mut store, &mut down, &f, t(2), &mut NullProgress).unwrap_err();
    assert_eq!(err.stage(), "mail");

    // the scrape itself is kept; --diff can still show it
    let report = runner::diff_only(&store).unwrap().unwrap();
    assert_eq!(report.lines, vec!["ASUS RTX4060(8G) 9000 -10.0%"]);
}

#[test]
fn dry_run_scrape_leaves_store_alone() {
    let dir = tempfile::tempdir().unwrap();
    let db = installed(dir.path());
    let src = page(dir.path(), "p.html", &doc("<option>ASUS RTX4060(8G) Dual, $10000 </option>"));
    let recs = runner::scrape(&src, &CategoryFilter::default(), t(1), &mut NullProgress).unwrap();
    assert_eq!(recs.len(), 1);
    assert!(SnapshotStore::open(&db).unwrap().is_empty().unwrap());
}

#[test]
fn install_reset_wipes_history() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    let db = data.join("coolpc.db");
    runner::install(&data, &db, false).unwrap();
    fs::write(data.join("stray.txt"), "x").unwrap();

    // plain reinstall keeps everything
    runner::install(&data, &db, false).unwrap();
    assert!(data.join("stray.txt").exists());

    runner::install(&data, &db, true).unwrap();
    assert!(!data.join("stray.txt").exists());
    assert!(db.exists());
}

#[test]
fn test_mail_uses_fixed_subject() {
    let mut mail = CapturedMail::default();
    runner::test_mail(&mut mail).unwrap();
    assert_eq!(mail.sent[0].0, "Coolpc test mail");
}

#[test]
fn capture_time_follows_utc() {
    let before = Utc::now().naive_utc();
    let at = runner::capture_time();
    let after = Utc::now().naive_utc();
    assert!(before <= at && at <= after, "{before} <= {at} <= {after}");
}
