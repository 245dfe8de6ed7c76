// src/data.rs
//
// Records and the derived diff shapes.
//
// - ProductRecord: one listed item from one scrape; the only thing persisted.
// - PriceDelta / StockEvent: computed from the two most recent scrapes,
//   never stored.

use std::fmt;

use chrono::NaiveDateTime;

use crate::error::{Error, Result};

/// Fixed-width so stored timestamps order lexically.
pub const TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

pub fn format_ts(ts: &NaiveDateTime) -> String {
    ts.format(TS_FORMAT).to_string()
}

pub fn parse_ts(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TS_FORMAT).map_err(|_| Error::StorageTimestamp(s!(s)))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductRecord {
    /// Sanitized group label, e.g. "nvidia rtx 4070".
    pub category: String,
    pub vendor: String,
    /// May embed parentheses, e.g. "RTX4070(OC)".
    pub product: String,
    pub note: String,
    /// Sale price when one is listed, else list price.
    pub price: u32,
    pub captured_at: NaiveDateTime,
}

impl ProductRecord {
    pub fn key(&self) -> RecordKey {
        RecordKey {
            category: self.category.clone(),
            vendor: self.vendor.clone(),
            product: self.product.clone(),
        }
    }

    /// All text fields present; checked again before anything is written.
    pub fn is_well_formed(&self) -> bool {
        !self.category.is_empty()
            && !self.vendor.is_empty()
            && !self.product.is_empty()
            && !self.note.is_empty()
    }

    /// Comma-joined fields, the verbose echo format.
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.category, self.vendor, self.product, self.note, self.price,
            format_ts(&self.captured_at)
        )
    }
}

/// Identity of a listing across scrapes.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordKey {
    pub category: String,
    pub vendor: String,
    pub product: String,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.category, self.vendor, self.product)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PriceDelta {
    pub category: String,
    pub vendor: String,
    pub product: String,
    pub note: String,
    pub price: u32,
    pub previous_price: u32,
    pub percent_change: f64,
}

impl PriceDelta {
    pub fn between(latest: &ProductRecord, previous_price: u32) -> Self {
        let percent_change = (latest.price as f64 - previous_price as f64) * 100.0 / previous_price as f64;
        Self {
            category: latest.category.clone(),
            vendor: latest.vendor.clone(),
            product: latest.product.clone(),
            note: latest.note.clone(),
            price: latest.price,
            previous_price,
            percent_change,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StockKind {
    /// In the previous scrape, gone from the latest.
    SoldOut,
    /// In the latest scrape, absent from the previous.
    NewArrival,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StockEvent {
    pub kind: StockKind,
    pub record: ProductRecord,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Diff {
    pub deltas: Vec<PriceDelta>,
    pub events: Vec<StockEvent>,
}

impl Diff {
    pub fn is_empty(&self) -> bool { self.deltas.is_empty() && self.events.is_empty() }

    pub fn sold_out(&self) -> impl Iterator<Item = &ProductRecord> {
        self.events.iter().filter(|e| e.kind == StockKind::SoldOut).map(|e| &e.record)
    }

    pub fn new_arrivals(&self) -> impl Iterator<Item = &ProductRecord> {
        self.events.iter().filter(|e| e.kind == StockKind::NewArrival).map(|e| &e.record)
    }
}
