//! `sddlinfo`: decode an SDDL string and print it as JSON.

use std::io::{self, Read, Write};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use win_sddl::{DecodeError, decode};

/// Decode an SDDL string and print its meaning as JSON
#[derive(Parser, Debug)]
#[command(name = "sddlinfo", author, version, about, long_about = None)]
struct Cli {
    /// SDDL string to decode, `-` to read it from stdin
    sddl: String,

    /// Domain SID used to expand domain-relative aliases (`DA`, `DU`, …)
    #[arg(long, env = "SDDL_DOMAIN_SID", default_value = "")]
    domain_sid: String,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

fn read_sddl(arg: String) -> Result<String> {
    if arg != "-" {
        return Ok(arg);
    }
    let mut sddl = String::new();
    io::stdin()
        .read_to_string(&mut sddl)
        .context("reading SDDL from stdin")?;
    Ok(sddl)
}

/// `<kind>: <fragment>`, independent of the error's message text.
fn failure(err: &DecodeError) -> anyhow::Error {
    anyhow!("{}: {}", err.kind(), err.fragment())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sddl = read_sddl(cli.sddl)?;
    let sd = decode(&sddl, &cli.domain_sid)
        .map_err(|err| failure(&err))?;

    let mut out = io::stdout().lock();
    if cli.compact {
        serde_json::to_writer(&mut out, &sd)?;
    } else {
        serde_json::to_writer_pretty(&mut out, &sd)?;
    }
    writeln!(out)?;
    Ok(())
}
