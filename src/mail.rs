// src/mail.rs
// Outbound notification. One message per run at most; a failed send is
// reported, never retried.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

pub trait Mailer {
    fn send(&mut self, subject: &str, body: &str) -> Result<()>;
}

/// Pipes a complete message to `sendmail -t` (recipients read from headers).
pub struct SendmailMailer {
    pub sendmail: String,
    pub from: Option<String>,
    pub to: String,
}

impl Mailer for SendmailMailer {
    fn send(&mut self, subject: &str, body: &str) -> Result<()> {
        let msg = compose(self.from.as_deref(), &self.to, subject, body);

        let mut child = Command::new(&self.sendmail)
            .arg("-t")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Mail(format!("cannot run {}: {e}", self.sendmail)))?;

        // A write failure (EPIPE when sendmail quits early) is held until the
        // child is reaped: its exit status says more than the broken pipe.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(msg.as_bytes()),
            None => Ok(()),
        };
        let out = child
            .wait_with_output()
            .map_err(|e| Error::Mail(format!("waiting for {}: {e}", self.sendmail)))?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(Error::Mail(format!("{} exited with {}: {}", self.sendmail, out.status, stderr.trim())));
        }
        if let Err(e) = written {
            return Err(Error::Mail(format!("{} did not take the message: {e}", self.sendmail)));
        }
        logf!("mail: sent {subject:?} to {}", self.to);
        Ok(())
    }
}

/// Prints the message instead of sending it.
pub struct PrintMailer<W: Write> {
    out: W,
}

impl PrintMailer<io::Stdout> {
    pub fn stdout() -> Self { Self { out: io::stdout() } }
}

impl<W: Write> PrintMailer<W> {
    pub fn new(out: W) -> Self { Self { out } }
    pub fn into_inner(self) -> W { self.out }
}

impl<W: Write> Mailer for PrintMailer<W> {
    fn send(&mut self, subject: &str, body: &str) -> Result<()> {
        writeln!(self.out, "Subject: {subject}\n")?;
        write!(self.out, "{body}")?;
        self.out.flush()?;
        Ok(())
    }
}

/// RFC 5322 message; UTF-8 body sent as 8bit.
pub fn compose(from: Option<&str>, to: &str, subject: &str, body: &str) -> String {
    let mut msg = s!();
    if let Some(f) = from {
        msg.push_str(&format!("From: {f}\r\n"));
    }
    msg.push_str(&format!("To: {to}\r\n"));
    msg.push_str(&format!("Subject: {subject}\r\n"));
    msg.push_str("MIME-Version: 1.0\r\n");
    msg.push_str("Content-Type: text/plain; charset=utf-8\r\n");
    msg.push_str("Content-Transfer-Encoding: 8bit\r\n\r\n");
    for line in body.lines() {
        msg.push_str(line);
        msg.push_str("\r\n");
    }
    msg
}
