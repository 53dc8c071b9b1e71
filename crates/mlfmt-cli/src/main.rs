//! `mlfmt` — the external CLI collaborator spec §6 describes at its
//! interface: positional source/`.mlb` paths, overwrite/preview flags, and
//! the layout knobs spec §4.4 exposes.

mod cli;
mod config;
mod run;

use std::io::IsTerminal;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;

fn main() {
    if let Err(e) = try_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose)?;

    let base = config::load(args.config.as_deref()).context("loading configuration")?;
    let opts = config::apply_overrides(base, args.ribbon_frac, args.max_width, args.indent_width, args.tab_width);
    config::validate(&opts)?;

    let outcome = run::run(&args, &opts)?;
    if outcome.had_diagnostics {
        anyhow::bail!("one or more files reported diagnostics");
    }
    Ok(())
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose { EnvFilter::new("debug") } else { EnvFilter::new("info") };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_ansi(std::io::stderr().is_terminal()))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}
