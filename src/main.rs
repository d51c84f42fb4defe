//! Page table simulator - Main Entry Point
//!
//! Usage: ptsim [OPTIONS] [COMMANDS]...
//!
//! Commands:
//!   pfm                 - Print the page free map
//!   ppt <proc>          - Print the page table of a process
//!   np <proc> <pages>   - New process with that many data pages
//!   kp <proc>           - Kill a process
//!   sb <proc> <va> <v>  - Store byte
//!   lb <proc> <va>      - Load byte

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};

use ptsim::command::commands;
use ptsim::{Simulator, logging};

/// Command-line configuration
#[derive(Parser)]
#[command(name = "ptsim")]
#[command(about = "Simulate single-level page tables over 16 KiB of RAM")]
struct Cli {
    /// Commands to run: pfm, ppt <p>, np <p> <n>, kp <p>, sb <p> <va> <v>, lb <p> <va>
    commands: Vec<String>,

    /// Read more commands from a file, run after the inline ones
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Print detailed simulator activity to stderr (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable logging
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(logging::level_for(cli.verbose, cli.quiet))?;

    let script = read_script(&cli)?;
    let tokens: Vec<&str> = cli
        .commands
        .iter()
        .map(String::as_str)
        .chain(script.split_whitespace())
        .collect();
    if tokens.is_empty() {
        eprintln!("usage: ptsim commands");
        process::exit(1);
    }

    run(&tokens);
    Ok(())
}

/// Contents of the command file, empty when none was given
fn read_script(cli: &Cli) -> Result<String> {
    let Some(path) = &cli.file else {
        return Ok(String::new());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read command file {}", path.display()))?;
    debug!("read {} bytes of commands from {}", content.len(), path.display());
    Ok(content)
}

/// Run every command in order. Bad tokens and simulation errors are
/// reported and do not stop the following commands.
fn run(tokens: &[&str]) {
    let mut sim = Simulator::new();
    let mut executed = 0;

    for parsed in commands(tokens.iter().copied()) {
        let command = match parsed {
            Ok(command) => command,
            Err(err) => {
                warn!("skipping: {err}");
                continue;
            }
        };
        match command.execute(&mut sim) {
            Ok(Some(output)) => print_output(&output),
            Ok(None) => {}
            Err(err) => println!("{err}"),
        }
        executed += 1;
    }

    info!("{} pages free after {executed} commands", sim.free_page_count());
}

fn print_output(output: &str) {
    if output.ends_with('\n') {
        print!("{output}");
    } else {
        println!("{output}");
    }
}
