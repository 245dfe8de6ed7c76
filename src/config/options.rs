// src/config/options.rs
use std::path::{Path, PathBuf};

use super::consts::*;
use crate::error::{Error, Result};
use crate::specs::filter::CategoryFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// Headless Chrome `--dump-dom` (the page fills its lists with script).
    Chrome,
    /// Plain GET.
    Http,
}

impl SourceKind {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "chrome" => Ok(SourceKind::Chrome),
            "http" => Ok(SourceKind::Http),
            other => Err(Error::Config(format!("unknown source: {other}"))),
        }
    }
}

/// Process-wide settings, resolved once at startup and passed down.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub data_dir: PathBuf,
    pub url: String,
    pub source: SourceKind,
    pub chrome: String,
    pub sendmail: String,
    pub mail_from: Option<String>,
    /// No recipient → reports go to stdout.
    pub mail_to: Option<String>,
    pub filter: CategoryFilter,
}

impl Options {
    /// Built-in defaults rooted at `data_dir`.
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            url: s!(SOURCE_URL),
            source: SourceKind::Chrome,
            chrome: s!(CHROME_BIN),
            sendmail: s!(SENDMAIL_BIN),
            mail_from: None,
            mail_to: None,
            filter: CategoryFilter::default(),
        }
    }

    /// Defaults, then `watch.conf` from the data dir when it exists.
    pub fn resolve(data_dir: Option<PathBuf>) -> Result<Self> {
        let dir = match data_dir {
            Some(d) => d,
            None => default_data_dir()?,
        };
        let mut opts = Self::new(dir);
        let conf = opts.config_path();
        if conf.exists() {
            super::file::load(&conf, &mut opts)?;
        }
        Ok(opts)
    }

    pub fn db_path(&self) -> PathBuf { self.data_dir.join(DB_FILE) }

    pub fn config_path(&self) -> PathBuf { self.data_dir.join(CONFIG_FILE) }
}

/// `%LOCALAPPDATA%\.coolpc` on Windows, `$HOME/.coolpc` elsewhere.
pub fn default_data_dir() -> Result<PathBuf> {
    let var = if cfg!(windows) { "LOCALAPPDATA" } else { "HOME" };
    let base = std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Config(format!("{var} is not set; pass --data-dir")))?;
    Ok(Path::new(&base).join(DATA_DIR_NAME))
}
