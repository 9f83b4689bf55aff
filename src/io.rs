//! Read and write AIG netlists to files

pub mod aag;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{Error, Result};
use crate::manager::AigManager;

/// Parse an AIG netlist from a file
///
/// Following extensions are supported: `.aag`
pub fn parse_file(path: &Path) -> Result<AigManager> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("aag") => {
            let f = File::open(path)?;
            aag::read(BufReader::new(f))
        }
        other => Err(Error::Parse(format!(
            "unsupported extension {:?}, expected .aag",
            other.unwrap_or("")
        ))),
    }
}

/// Write an AIG netlist to a file
///
/// Following extensions are supported: `.aag`
pub fn write_file(path: &Path, mgr: &AigManager) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("aag") => {
            let f = File::create(path)?;
            let mut w = BufWriter::new(f);
            aag::write(&mut w, mgr)?;
            Ok(())
        }
        other => Err(Error::Parse(format!(
            "unsupported extension {:?}, expected .aag",
            other.unwrap_or("")
        ))),
    }
}
