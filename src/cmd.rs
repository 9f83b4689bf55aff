//! Command-line surface over the core: one struct per subcommand, each with a `run`

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::error::{Error, Result};
use crate::fec;
use crate::fraig::fraig;
use crate::io;
use crate::sat::KissatBackend;
use crate::sim::{self, random_sim, WORD_WIDTH};
use crate::strash::strash;

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the selected subcommand
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Read(a) => a.run(),
            Commands::Strash(a) => a.run(),
            Commands::Simulate(a) => a.run(),
            Commands::Fraig(a) => a.run(),
            Commands::Write(a) => a.run(),
        }
    }
}

/// The available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Parse a netlist and print a one-line summary
    Read(ReadArgs),
    /// Parse, structurally hash, and write a netlist
    Strash(StrashArgs),
    /// Parse, simulate a batch of patterns, and report how many were simulated
    Simulate(SimulateArgs),
    /// Parse, strash, simulate, fraig, and write a netlist
    Fraig(FraigArgs),
    /// Parse and write a netlist unchanged
    Write(WriteArgs),
}

/// Arguments for `read`
#[derive(Args)]
pub struct ReadArgs {
    /// Netlist to read
    file: PathBuf,
}

impl ReadArgs {
    pub fn run(&self) -> Result<()> {
        let mgr = io::parse_file(&self.file)?;
        println!(
            "{} inputs, {} outputs, {} AND gates",
            mgr.nb_inputs(),
            mgr.nb_outputs(),
            mgr.nb_and()
        );
        Ok(())
    }
}

/// Arguments for `strash`
#[derive(Args)]
pub struct StrashArgs {
    /// Netlist to strash
    file: PathBuf,
    /// Output file
    #[arg(short = 'o', long)]
    output: PathBuf,
}

impl StrashArgs {
    pub fn run(&self) -> Result<()> {
        let mut mgr = io::parse_file(&self.file)?;
        strash(&mut mgr);
        io::write_file(&self.output, &mgr)
    }
}

/// Arguments for `simulate`
#[derive(Args)]
pub struct SimulateArgs {
    /// Netlist to simulate
    file: PathBuf,
    /// Output file for the simulated netlist
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
    /// Simulate this many random patterns
    #[arg(long, conflicts_with = "file_patterns")]
    random: Option<usize>,
    /// Simulate patterns read from this file, one per line
    #[arg(long = "file", value_name = "PATTERNS")]
    file_patterns: Option<PathBuf>,
    /// Seed for random pattern generation
    #[arg(long, default_value_t = 1)]
    seed: u64,
}

impl SimulateArgs {
    pub fn run(&self) -> Result<()> {
        let mut mgr = io::parse_file(&self.file)?;
        let count = if let Some(n) = self.random {
            random_sim(&mut mgr, n, self.seed)
        } else if let Some(path) = &self.file_patterns {
            let f = File::open(path)?;
            sim::read_and_simulate_patterns(&mut mgr, BufReader::new(f))?
        } else {
            return Err(Error::PatternFormat(
                "specify --random N or --file PATTERNS".to_string(),
            ));
        };
        println!("{count} patterns simulated.");
        if let Some(out) = &self.output {
            io::write_file(out, &mgr)?;
        }
        Ok(())
    }
}

/// Arguments for `fraig`
#[derive(Args)]
pub struct FraigArgs {
    /// Netlist to reduce
    file: PathBuf,
    /// Output file for the reduced netlist
    #[arg(short = 'o', long)]
    output: PathBuf,
    /// Seed for the random patterns used to seed FEC groups
    #[arg(long, default_value_t = 1)]
    seed: u64,
}

impl FraigArgs {
    pub fn run(&self) -> Result<()> {
        let mut mgr = io::parse_file(&self.file)?;
        strash(&mut mgr);
        random_sim(&mut mgr, WORD_WIDTH, self.seed);
        let groups = fec::initial_classify(&mgr);
        let mut backend = KissatBackend::new();
        fraig(&mut mgr, &mut backend, groups);
        io::write_file(&self.output, &mgr)
    }
}

/// Arguments for `write`
#[derive(Args)]
pub struct WriteArgs {
    /// Netlist to round-trip
    file: PathBuf,
    /// Output file
    #[arg(short = 'o', long)]
    output: PathBuf,
}

impl WriteArgs {
    pub fn run(&self) -> Result<()> {
        let mgr = io::parse_file(&self.file)?;
        io::write_file(&self.output, &mgr)
    }
}
