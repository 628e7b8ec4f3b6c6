// SPDX-FileCopyrightText: 2026 University Corporation for Atmospheric Research
// SPDX-License-Identifier: BSD-3-Clause

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use regex::Regex;

mod lsf;
mod report;

use lsf::LsfClient;
use report::ReservationReport;

#[derive(Parser, Debug)]
#[command(name = "lsf-rsvstat")]
#[command(about = "Dumps LSF advance reservation statistics against a host regex")]
#[command(after_help = "Output format: <label><type> <hosts> <slots> <reservations>")]
#[command(version)]
struct Args {
    /// Regular expression matched against reservation hostnames (search, not full match)
    #[arg(value_parser = parse_regex)]
    host_regex: Regex,

    /// Prefix added to each output line (e.g. source cluster name)
    label: String,

    /// Print progress diagnostics to stderr
    #[arg(long)]
    debug: bool,
}

fn parse_regex(s: &str) -> Result<Regex, regex::Error> {
    Regex::new(s)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let client = LsfClient::connect().context("Failed to initialize LSF session")?;
    if args.debug {
        eprintln!("LSF session initialized");
    }

    let reservations = client
        .reservations()
        .context("Failed to query advance reservations")?;
    if args.debug {
        eprintln!("Loaded {} reservations", reservations.len());
    }

    let report = ReservationReport::build(&reservations, &args.host_regex);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report.write(&mut out, &args.label)?;
    out.flush()?;

    Ok(())
}
