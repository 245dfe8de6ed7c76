// src/progress.rs
use crate::data::ProductRecord;

/// Lightweight progress reporting for a scrape pass.
/// The CLI implements this to echo records in verbose mode.
pub trait Progress {
    /// Called once the page text is in hand.
    fn begin(&mut self, _bytes: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One record accepted by the parse pass.
    fn record(&mut self, _rec: &ProductRecord) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Collects everything it is told; handy in tests.
#[derive(Default)]
pub struct RecordingProgress {
    pub bytes: usize,
    pub lines: Vec<String>,
    pub records: Vec<ProductRecord>,
    pub finished: bool,
}

impl Progress for RecordingProgress {
    fn begin(&mut self, bytes: usize) { self.bytes = bytes; }
    fn log(&mut self, msg: &str) { self.lines.push(s!(msg)); }
    fn record(&mut self, rec: &ProductRecord) { self.records.push(rec.clone()); }
    fn finish(&mut self) { self.finished = true; }
}
