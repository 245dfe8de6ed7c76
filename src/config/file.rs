// src/config/file.rs
//
// Optional `watch.conf` in the data dir:
//
//   # comment
//   url=https://www.coolpc.com.tw/evaluate.php
//   source=chrome
//   mail_to=me@example.com
//   categories=nvidia rt, amd rx
//
// Unknown keys are ignored so older binaries keep reading newer files.

use std::{fs, path::Path};

use super::options::{Options, SourceKind};
use crate::core::sanitize::split_list;
use crate::error::{Error, Result};

pub fn load(path: &Path, opts: &mut Options) -> Result<()> {
    let text = fs::read_to_string(path)?;
    apply(&text, opts)?;
    logd!("config: applied {}", path.display());
    Ok(())
}

pub fn apply(text: &str, opts: &mut Options) -> Result<()> {
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }

        let Some(eq) = line.find('=') else {
            return Err(Error::Config(format!("line {}: expected key=value", n + 1)));
        };
        let key = line[..eq].trim();
        let val = line[eq + 1..].trim();
        let opt = |v: &str| if v.is_empty() { None } else { Some(s!(v)) };

        match key {
            "url" => opts.url = s!(val),
            "source" => opts.source = SourceKind::parse(val)?,
            "chrome" => opts.chrome = s!(val),
            "sendmail" => opts.sendmail = s!(val),
            "mail_from" => opts.mail_from = opt(val),
            "mail_to" => opts.mail_to = opt(val),
            "categories" => {
                let list = split_list(val);
                if list.is_empty() {
                    return Err(Error::Config(format!("line {}: categories is empty", n + 1)));
                }
                opts.filter.categories = list;
            }
            other => logd!("config: ignoring unknown key {other:?}"),
        }
    }
    Ok(())
}
