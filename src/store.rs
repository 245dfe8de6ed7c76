// src/store.rs
//
// Append-only price history in one SQLite file. Rows are never updated or
// deleted; "latest" and "previous" snapshots are views computed on read.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};

use crate::data::{format_ts, parse_ts, Diff, PriceDelta, ProductRecord, RecordKey, StockEvent, StockKind};
use crate::error::{Error, Result};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS products (
    category    TEXT    NOT NULL,
    vendor      TEXT    NOT NULL,
    product     TEXT    NOT NULL,
    note        TEXT    NOT NULL,
    price       INTEGER NOT NULL CHECK (price >= 0),
    captured_at TEXT    NOT NULL,
    PRIMARY KEY (category, vendor, product, captured_at)
);
CREATE INDEX IF NOT EXISTS products_captured_at ON products (captured_at);
";

const COLUMNS: &str = "category, vendor, product, note, price, captured_at";

pub struct SnapshotStore {
    conn: Connection,
}

impl SnapshotStore {
    /// Open an existing database. Never creates one: a missing file means
    /// the data dir was not installed.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Config(format!(
                "no database at {} (run with --install first)", path.display()
            )));
        }
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_WRITE)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create (or reuse) the database file and its schema.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let store = Self { conn: Connection::open(path)? };
        store.init_schema()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let store = Self { conn: Connection::open_in_memory()? };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Append one scrape's records in a single transaction: all or nothing.
    pub fn ingest(&mut self, records: &[ProductRecord]) -> Result<usize> {
        if let Some(bad) = records.iter().find(|r| !r.is_well_formed()) {
            return Err(Error::MalformedRecord { field: "non-empty fields", text: bad.to_line() });
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO products ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
            ))?;
            for r in records {
                stmt.execute(params![
                    r.category, r.vendor, r.product, r.note, r.price, format_ts(&r.captured_at)
                ])?;
            }
        }
        // Dropping an uncommitted transaction rolls it back, so any `?` above
        // leaves the table untouched.
        tx.commit()?;

        logd!("store: ingested {} records", records.len());
        Ok(records.len())
    }

    pub fn len(&self) -> Result<usize> {
        let n: i64 = self.conn.query_row("SELECT COUNT(*) FROM products", [], |r| r.get(0))?;
        Ok(n as usize)
    }

    pub fn is_empty(&self) -> Result<bool> { Ok(self.len()? == 0) }

    /// Distinct capture times, oldest first.
    pub fn captures(&self) -> Result<Vec<NaiveDateTime>> {
        let mut stmt = self.conn.prepare("SELECT DISTINCT captured_at FROM products ORDER BY captured_at")?;
        let raw = stmt
            .query_map([], |r| r.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        raw.iter().map(|s| parse_ts(s)).collect()
    }

    /// Newest record per (category, vendor, product).
    pub fn latest_snapshot(&self) -> Result<Vec<ProductRecord>> {
        self.select(
            &format!(
                "SELECT {COLUMNS} FROM products AS p
                 WHERE captured_at = (
                     SELECT MAX(captured_at) FROM products AS q
                     WHERE q.category = p.category AND q.vendor = p.vendor AND q.product = p.product
                 )
                 ORDER BY category, vendor, product"
            ),
            &[],
        )
    }

    /// Every record of one scrape.
    pub fn records_at(&self, at: &NaiveDateTime) -> Result<Vec<ProductRecord>> {
        self.select(
            &format!("SELECT {COLUMNS} FROM products WHERE captured_at = ?1 ORDER BY category, vendor, product"),
            &[&format_ts(at)],
        )
    }

    /// Compare the latest scrape with what came before it. Read-only.
    ///
    /// - price deltas: keys in the latest scrape, against the same key's
    ///   newest earlier capture, when the price differs;
    /// - stock events: keys of the previous scrape vs keys of the latest.
    ///
    /// With fewer than two scrapes on record there is nothing to compare.
    pub fn compute_diff(&self) -> Result<Diff> {
        let Some(latest) = self.latest_capture()? else { return Ok(Diff::default()) };
        let Some(previous) = self.capture_before(&latest)? else { return Ok(Diff::default()) };

        let latest_rows = self.records_at(&latest)?;
        let previous_rows = self.records_at(&previous)?;

        let mut deltas = Vec::new();
        for rec in &latest_rows {
            if let Some(prev_price) = self.price_before(&rec.key(), &latest)? {
                if prev_price != rec.price {
                    deltas.push(PriceDelta::between(rec, prev_price));
                }
            }
        }

        let latest_keys: BTreeSet<RecordKey> = latest_rows.iter().map(ProductRecord::key).collect();
        let previous_keys: BTreeSet<RecordKey> = previous_rows.iter().map(ProductRecord::key).collect();

        let mut by_key: BTreeMap<RecordKey, StockEvent> = BTreeMap::new();
        for rec in previous_rows.into_iter().filter(|r| !latest_keys.contains(&r.key())) {
            by_key.insert(rec.key(), StockEvent { kind: StockKind::SoldOut, record: rec });
        }
        let mut arrivals: BTreeMap<RecordKey, StockEvent> = BTreeMap::new();
        for rec in latest_rows.into_iter().filter(|r| !previous_keys.contains(&r.key())) {
            arrivals.insert(rec.key(), StockEvent { kind: StockKind::NewArrival, record: rec });
        }

        let mut events: Vec<StockEvent> = by_key.into_values().collect();
        events.extend(arrivals.into_values());

        logd!(
            "store: diff {} vs {}: {} deltas, {} stock events",
            format_ts(&latest), format_ts(&previous), deltas.len(), events.len()
        );
        Ok(Diff { deltas, events })
    }

    fn latest_capture(&self) -> Result<Option<NaiveDateTime>> {
        let raw: Option<String> = self.conn.query_row("SELECT MAX(captured_at) FROM products", [], |r| r.get(0))?;
        raw.as_deref().map(parse_ts).transpose()
    }

    fn capture_before(&self, at: &NaiveDateTime) -> Result<Option<NaiveDateTime>> {
        let raw: Option<String> = self.conn.query_row(
            "SELECT MAX(captured_at) FROM products WHERE captured_at < ?1",
            [format_ts(at)],
            |r| r.get(0),
        )?;
        raw.as_deref().map(parse_ts).transpose()
    }

    /// Price of `key` at its newest capture strictly before `at`.
    fn price_before(&self, key: &RecordKey, at: &NaiveDateTime) -> Result<Option<u32>> {
        let price = self.conn.query_row(
            "SELECT price FROM products
             WHERE category = ?1 AND vendor = ?2 AND product = ?3 AND captured_at < ?4
             ORDER BY captured_at DESC LIMIT 1",
            params![key.category, key.vendor, key.product, format_ts(at)],
            |r| r.get::<_, u32>(0),
        ).optional()?;
        Ok(price)
    }

    fn select(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<ProductRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let raw = stmt
            .query_map(args, raw_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        raw.into_iter().map(RawRow::into_record).collect()
    }
}

/// Row as stored; the timestamp is parsed after the query so a bad value
/// surfaces as our error rather than a rusqlite conversion failure.
struct RawRow {
    category: String,
    vendor: String,
    product: String,
    note: String,
    price: u32,
    captured_at: String,
}

fn raw_row(r: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        category: r.get(0)?,
        vendor: r.get(1)?,
        product: r.get(2)?,
        note: r.get(3)?,
        price: r.get(4)?,
        captured_at: r.get(5)?,
    })
}

impl RawRow {
    fn into_record(self) -> Result<ProductRecord> {
        Ok(ProductRecord {
            captured_at: parse_ts(&self.captured_at)?,
            category: self.category,
            vendor: self.vendor,
            product: self.product,
            note: self.note,
            price: self.price,
        })
    }
}
