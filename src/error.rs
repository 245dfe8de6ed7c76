// src/error.rs
//
// One error type for the whole pipeline. Each variant maps to the stage that
// failed so the CLI can tell the operator where upstream markup drifted.

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An opening tag with no literal closer anywhere after it.
    #[error("malformed markup: <{tag} at byte {offset} has no closing </{tag}>")]
    MalformedMarkup { tag: String, offset: usize },

    /// Item text does not follow `Vendor Product(...) Note, $price ...`.
    #[error("malformed record: missing {field} in {text:?}")]
    MalformedRecord { field: &'static str, text: String },

    #[error("storage: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("storage: bad timestamp {0:?} in database")]
    StorageTimestamp(String),

    #[error("fetch: {0}")]
    Fetch(String),

    #[error("mail: {0}")]
    Mail(String),

    #[error("config: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Short name of the pipeline stage that produced the error.
    pub fn stage(&self) -> &'static str {
        match self {
            Error::MalformedMarkup { .. } => "scan",
            Error::MalformedRecord { .. } => "tokenize",
            Error::Storage(_) | Error::StorageTimestamp(_) => "storage",
            Error::Fetch(_) => "fetch",
            Error::Mail(_) => "mail",
            Error::Config(_) => "config",
            Error::Io(_) => "io",
        }
    }

    /// Parse-stage errors abort a scrape before anything is ingested.
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::MalformedMarkup { .. } | Error::MalformedRecord { .. })
    }
}

impl From<ureq::Error> for Error {
    fn from(e: ureq::Error) -> Self {
        Error::Fetch(e.to_string())
    }
}
