// src/core/net.rs
// Page retrieval. The pipeline only needs "the full document text, now".
// No retries and no caching: a failed fetch fails the run.

use std::{fs, path::PathBuf, process::Command, time::Duration};

use crate::config::consts::{HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::error::{Error, Result};

pub trait PageSource {
    /// Human-readable origin, for logs.
    fn describe(&self) -> String;
    fn fetch(&self) -> Result<String>;
}

/// A page saved to disk earlier (`price_watch page.html`).
pub struct FileSource {
    pub path: PathBuf,
}

impl PageSource for FileSource {
    fn describe(&self) -> String { format!("file {}", self.path.display()) }

    fn fetch(&self) -> Result<String> {
        let bytes = fs::read(&self.path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Plain blocking GET.
pub struct HttpSource {
    pub url: String,
}

impl PageSource for HttpSource {
    fn describe(&self) -> String { format!("GET {}", self.url) }

    fn fetch(&self) -> Result<String> {
        let agent = ureq::Agent::new_with_config(
            ureq::Agent::config_builder()
                .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
                .user_agent(USER_AGENT)
                .build(),
        );
        // non-2xx statuses come back as `ureq::Error::StatusCode`
        let resp = agent.get(&self.url).call()?;
        Ok(resp.into_body().read_to_string()?)
    }
}

/// Headless Chrome `--dump-dom`: the price page builds its option lists
/// with script, so the rendered DOM is what we want to scan.
pub struct ChromeSource {
    pub chrome: String,
    pub url: String,
}

impl PageSource for ChromeSource {
    fn describe(&self) -> String { format!("{} --dump-dom {}", self.chrome, self.url) }

    fn fetch(&self) -> Result<String> {
        let out = Command::new(&self.chrome)
            .args(["--headless", "--disable-gpu", "--dump-dom", "--enable-logging"])
            .arg(&self.url)
            .output()
            .map_err(|e| Error::Fetch(format!("cannot run {}: {e}", self.chrome)))?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(Error::Fetch(format!("{} exited with {}: {}", self.chrome, out.status, stderr.trim())));
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}
