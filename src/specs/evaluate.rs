// src/specs/evaluate.rs
//! Scraping *spec* for the price-evaluation page.
//!
//! Layout relied on:
//! - one `<optgroup label="...">` per product family (e.g. "NVIDIA RTX4070 系列");
//! - one `<option ...>Vendor Product(...) Note, $price[$sale] ...</option>` per listing.
//!
//! Responsibilities:
//! - Walk groups → items with `core::html::scan_tags`.
//! - Apply `CategoryFilter` (silent skips) and `tokens::tokenize` (loud failures).
//! - Stamp every record with the scrape's single capture time.
//!
//! Non-Responsibilities: fetching, storage, diffing.
//!
//! The pass is all-or-nothing: the first scan or tokenize error is returned
//! and the records gathered so far are dropped with it.

use std::collections::HashSet;

use chrono::NaiveDateTime;

use super::filter::CategoryFilter;
use super::tokens::tokenize;
use crate::core::html::scan_tags;
use crate::data::{ProductRecord, RecordKey};
use crate::error::Result;
use crate::progress::Progress;

pub const GROUP_TAG: &str = "optgroup";
pub const ITEM_TAG: &str = "option";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub groups_seen: usize,
    pub groups_accepted: usize,
    pub items_skipped: usize,
    pub duplicates: usize,
}

pub fn parse_page(
    doc: &str,
    filter: &CategoryFilter,
    captured_at: NaiveDateTime,
    progress: &mut dyn Progress,
) -> Result<(Vec<ProductRecord>, ParseStats)> {
    let mut stats = ParseStats::default();
    let mut out = Vec::new();
    let mut seen: HashSet<RecordKey> = HashSet::new();

    for group in scan_tags(doc, GROUP_TAG) {
        let group = group?;
        stats.groups_seen += 1;

        let Some(label) = group.attr("label") else {
            logd!("evaluate: group at {} has no label", group.start);
            continue;
        };
        let Some(category) = filter.accept_group(label) else {
            logd!("evaluate: group {label:?} out of scope");
            continue;
        };
        stats.groups_accepted += 1;
        progress.log(&format!("Group: {category}"));

        for item in scan_tags(group.text, ITEM_TAG) {
            let item = item?;
            if !filter.accept_item(item.text) {
                stats.items_skipped += 1;
                logd!("evaluate: item at {} filtered", group.start + item.start);
                continue;
            }
            let t = tokenize(item.text)?;
            let rec = ProductRecord {
                category: category.clone(),
                vendor: s!(t.vendor),
                product: s!(t.product),
                note: s!(t.note),
                price: t.price,
                captured_at,
            };
            // one row per key per scrape; first listing wins
            if !seen.insert(rec.key()) {
                stats.duplicates += 1;
                logd!("evaluate: duplicate listing {} dropped", rec.key());
                continue;
            }
            progress.record(&rec);
            out.push(rec);
        }
    }

    logd!(
        "evaluate: {} groups, {} in scope, {} items skipped, {} duplicates, {} records",
        stats.groups_seen, stats.groups_accepted, stats.items_skipped, stats.duplicates, out.len()
    );
    Ok((out, stats))
}
