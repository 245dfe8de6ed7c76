// src/bin/cli.rs
use color_eyre::eyre::{Report, Result};
use price_watch::cli;

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = cli::parse_args(std::env::args().skip(1))
        .map_err(|e| Report::new(e).wrap_err("bad arguments"))?;

    cli::run(args).map_err(|e| {
        let stage = e.stage();
        Report::new(e).wrap_err(format!("{stage} stage failed"))
    })
}
