// src/cli.rs
use std::path::PathBuf;

use crate::config::{Options, SourceKind};
use crate::data::ProductRecord;
use crate::error::{Error, Result};
use crate::progress::{NullProgress, Progress};
use crate::runner::{self, RunOutcome};
use crate::store::SnapshotStore;

pub const HELP: &str = include_str!("cli_help.txt");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Run,
    Diff,
    Install { reset: bool },
    TestMail,
    Help,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    pub file: Option<PathBuf>,
    pub dry_run: bool,
    pub verbose: bool,
    pub data_dir: Option<PathBuf>,
    pub source: Option<SourceKind>,
    pub url: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            command: Command::Run,
            file: None,
            dry_run: false,
            verbose: false,
            data_dir: None,
            source: None,
            url: None,
        }
    }
}

/// Parse arguments (without the program name).
pub fn parse_args<I: IntoIterator<Item = String>>(argv: I) -> Result<Args> {
    let mut args = Args::default();
    let mut install = false;
    let mut reset = false;

    let mut it = argv.into_iter();
    while let Some(a) = it.next() {
        match a.as_str() {
            "-i" | "--install" => install = true,
            "--reset" => reset = true,
            "--diff" => args.command = Command::Diff,
            "--testmail" => args.command = Command::TestMail,
            "-d" | "--dryrun" => args.dry_run = true,
            "-v" | "--verbose" => args.verbose = true,
            "--source" => {
                let v = it.next().ok_or_else(|| usage("Missing value for --source"))?;
                args.source = Some(SourceKind::parse(&v)?);
            }
            "--url" => args.url = Some(it.next().ok_or_else(|| usage("Missing value for --url"))?),
            "--data-dir" => args.data_dir = Some(PathBuf::from(it.next().ok_or_else(|| usage("Missing value for --data-dir"))?)),
            "-h" | "--help" => { args.command = Command::Help; return Ok(args); }
            s if s.starts_with('-') => return Err(usage(&format!("Unknown arg: {s}"))),
            _ => {
                if args.file.is_some() { return Err(usage(&format!("Unexpected extra file: {a}"))); }
                args.file = Some(PathBuf::from(&a));
            }
        }
    }

    // install wins, as the one mode that needs no existing state
    if install {
        args.command = Command::Install { reset };
    } else if reset {
        return Err(usage("--reset only applies to --install"));
    }
    Ok(args)
}

fn usage(msg: &str) -> Error {
    Error::Config(format!("{msg} (see --help)"))
}

/// Verbose mode: one comma-joined line per parsed record.
struct EchoProgress;

impl Progress for EchoProgress {
    fn record(&mut self, rec: &ProductRecord) {
        println!("{}", rec.to_line());
    }
}

pub fn run(args: Args) -> Result<()> {
    crate::log::init(args.verbose);

    let result = dispatch(args);
    if let Err(e) = &result {
        if e.is_parse() {
            loge!("page layout no longer matches; nothing stored: {e}");
        } else {
            loge!("{} failed: {e}", e.stage());
        }
    }
    result
}

fn dispatch(args: Args) -> Result<()> {
    if args.command == Command::Help {
        print!("{HELP}");
        return Ok(());
    }

    let mut opts = Options::resolve(args.data_dir.clone())?;
    if let Some(kind) = args.source { opts.source = kind; }
    if let Some(url) = &args.url { opts.url = url.clone(); }

    let mut echo = EchoProgress;
    let mut quiet = NullProgress;
    let progress: &mut dyn Progress = if args.verbose { &mut echo } else { &mut quiet };

    match args.command {
        Command::Help => Ok(()),
        Command::Install { reset } => {
            let db = runner::install(&opts.data_dir, &opts.db_path(), reset)?;
            println!("Installed {}", db.display());
            Ok(())
        }
        Command::TestMail => runner::test_mail(runner::mailer_for(&opts).as_mut()),
        Command::Diff => {
            let store = SnapshotStore::open(&opts.db_path())?;
            match runner::diff_only(&store)? {
                Some(report) => print!("{report}"),
                None => println!("No price diff found"),
            }
            Ok(())
        }
        Command::Run => {
            let source = runner::source_for(&opts, args.file.as_deref());
            let now = runner::capture_time();

            if args.dry_run {
                let records = runner::scrape(source.as_ref(), &opts.filter, now, progress)?;
                println!("Parsed {} records (dry run, nothing stored)", records.len());
                return Ok(());
            }

            let mut store = SnapshotStore::open(&opts.db_path())?;
            let mut mailer = runner::mailer_for(&opts);
            let outcome = runner::run(source.as_ref(), &mut store, mailer.as_mut(), &opts.filter, now, progress)?;
            match outcome {
                RunOutcome::NothingParsed => println!("No listings found"),
                RunOutcome::NoChange { .. } => println!("No price diff found"),
                RunOutcome::Reported { report, .. } => logf!("reported {} lines", report.lines.len()),
            }
            Ok(())
        }
    }
}
