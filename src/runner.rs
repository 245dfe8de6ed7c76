// src/runner.rs
//
// One run = one fetch → one parse pass → one transaction → one diff → at
// most one mail. Parse errors surface before the store is touched.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, Utc};

use crate::config::{Options, SourceKind};
use crate::core::net::{ChromeSource, FileSource, HttpSource, PageSource};
use crate::data::ProductRecord;
use crate::error::Result;
use crate::mail::{Mailer, PrintMailer, SendmailMailer};
use crate::progress::Progress;
use crate::report::{format_report, Report};
use crate::specs::evaluate::parse_page;
use crate::specs::filter::CategoryFilter;
use crate::store::SnapshotStore;
use crate::config::consts::{TEST_BODY, TEST_SUBJECT};

/// What a full run ended with.
#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// No in-scope listings on the page; nothing stored.
    NothingParsed,
    /// Stored, and nothing changed since the previous scrape.
    NoChange { ingested: usize },
    /// Stored, and the report was mailed.
    Reported { ingested: usize, report: Report },
}

/// Capture time for a new scrape. UTC, so a wall clock stepping back an
/// hour at a DST change cannot sort a new scrape before the previous one.
pub fn capture_time() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Page source per options; a local file wins over live retrieval.
pub fn source_for(opts: &Options, file: Option<&Path>) -> Box<dyn PageSource> {
    match (file, opts.source) {
        (Some(path), _) => Box::new(FileSource { path: path.to_path_buf() }),
        (None, SourceKind::Chrome) => Box::new(ChromeSource { chrome: opts.chrome.clone(), url: opts.url.clone() }),
        (None, SourceKind::Http) => Box::new(HttpSource { url: opts.url.clone() }),
    }
}

/// Sendmail when a recipient is configured, stdout otherwise.
pub fn mailer_for(opts: &Options) -> Box<dyn Mailer> {
    match &opts.mail_to {
        Some(to) => Box::new(SendmailMailer {
            sendmail: opts.sendmail.clone(),
            from: opts.mail_from.clone(),
            to: to.clone(),
        }),
        None => Box::new(PrintMailer::stdout()),
    }
}

/// Fetch and parse without touching storage (also the dry run).
pub fn scrape(
    source: &dyn PageSource,
    filter: &CategoryFilter,
    captured_at: NaiveDateTime,
    progress: &mut dyn Progress,
) -> Result<Vec<ProductRecord>> {
    logf!("fetch: {}", source.describe());
    let doc = source.fetch()?;
    logf!("fetch: {} bytes", doc.len());

    progress.begin(doc.len());
    let parsed = parse_page(&doc, filter, captured_at, progress);
    progress.finish();

    let (records, stats) = parsed?;
    logf!("parse: {} records from {} of {} groups", records.len(), stats.groups_accepted, stats.groups_seen);
    Ok(records)
}

/// Scrape, ingest, diff, notify.
pub fn run(
    source: &dyn PageSource,
    store: &mut SnapshotStore,
    mailer: &mut dyn Mailer,
    filter: &CategoryFilter,
    captured_at: NaiveDateTime,
    progress: &mut dyn Progress,
) -> Result<RunOutcome> {
    let records = scrape(source, filter, captured_at, progress)?;
    if records.is_empty() {
        logf!("parse: no in-scope listings; nothing stored");
        return Ok(RunOutcome::NothingParsed);
    }

    let ingested = store.ingest(&records)?;
    logf!("store: {ingested} records at {}", crate::data::format_ts(&captured_at));

    match diff_only(store)? {
        Some(report) => {
            mailer.send(&report.subject, &report.to_string())?;
            Ok(RunOutcome::Reported { ingested, report })
        }
        None => Ok(RunOutcome::NoChange { ingested }),
    }
}

/// Report on what is already stored, without scraping.
pub fn diff_only(store: &SnapshotStore) -> Result<Option<Report>> {
    let diff = store.compute_diff()?;
    logf!("diff: {} price changes, {} stock events", diff.deltas.len(), diff.events.len());
    Ok(format_report(&diff))
}

/// Create the data dir and database. `reset` wipes the dir first.
pub fn install(data_dir: &Path, db_path: &Path, reset: bool) -> Result<PathBuf> {
    if reset && data_dir.exists() {
        logf!("install: removing {}", data_dir.display());
        fs::remove_dir_all(data_dir)?;
    }
    fs::create_dir_all(data_dir)?;
    SnapshotStore::create(db_path)?;
    logf!("install: database ready at {}", db_path.display());
    Ok(db_path.to_path_buf())
}

pub fn test_mail(mailer: &mut dyn Mailer) -> Result<()> {
    mailer.send(TEST_SUBJECT, TEST_BODY)
}
