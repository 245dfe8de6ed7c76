// src/report.rs
// Plain-text diff report. `None` means "nothing happened": the caller skips
// the mail entirely instead of sending an empty one.

use std::fmt;

use crate::config::consts::REPORT_SUBJECT;
use crate::data::{Diff, PriceDelta, ProductRecord};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub subject: String,
    pub lines: Vec<String>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Deltas first, then sold-out, then new arrivals.
pub fn format_report(diff: &Diff) -> Option<Report> {
    if diff.is_empty() { return None; }

    let mut lines = Vec::with_capacity(diff.deltas.len() + diff.events.len());
    lines.extend(diff.deltas.iter().map(delta_line));
    lines.extend(diff.sold_out().map(sold_out_line));
    lines.extend(diff.new_arrivals().map(new_line));

    Some(Report { subject: s!(REPORT_SUBJECT), lines })
}

fn delta_line(d: &PriceDelta) -> String {
    format!("{} {} {} {:+.1}%", d.vendor, d.product, d.price, d.percent_change)
}

fn sold_out_line(r: &ProductRecord) -> String {
    format!("[soldout] {}", r.product)
}

fn new_line(r: &ProductRecord) -> String {
    format!("[new] {} {} {}", r.vendor, r.product, r.price)
}
