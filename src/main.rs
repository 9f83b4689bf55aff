//! Command-line front end for the fraig engine

#![warn(missing_docs)]

use clap::Parser;

use fraiger::cmd::Cli;

#[doc(hidden)]
fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
