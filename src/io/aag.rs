//! AAG text format: the ASCII And-Inverter Graph representation
//!
//! Header `aag M I L O A`, followed by `I` PI literals, `O` PO fanin literals, `A` AND
//! gate triples, and an optional symbol table and comment section.

use std::io::{self, BufRead, Write};

use crate::error::{Error, Result};
use crate::gate::GateKind;
use crate::manager::AigManager;

struct LineReader<R> {
    lines: io::Lines<R>,
    line_no: u32,
}

impl<R: BufRead> LineReader<R> {
    fn new(reader: R) -> LineReader<R> {
        LineReader {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    fn next(&mut self) -> Result<Option<String>> {
        match self.lines.next() {
            None => Ok(None),
            Some(line) => {
                self.line_no += 1;
                Ok(Some(line?))
            }
        }
    }

    fn required(&mut self) -> Result<String> {
        self.next()?
            .ok_or_else(|| Error::Parse(format!("unexpected end of file at line {}", self.line_no + 1)))
    }
}

fn parse_u32(s: Option<&str>, field: &str) -> Result<u32> {
    s.ok_or_else(|| Error::Parse(format!("missing {field} field in header")))?
        .parse()
        .map_err(|_| Error::Parse(format!("invalid {field} field in header")))
}

fn parse_lit(line: &str, line_no: u32) -> Result<u32> {
    line.trim()
        .parse()
        .map_err(|_| Error::Parse(format!("invalid literal '{line}' at line {line_no}")))
}

/// Parse an AAG netlist
pub fn read<R: BufRead>(reader: R) -> Result<AigManager> {
    let mut r = LineReader::new(reader);

    let header = r.required()?;
    let mut fields = header.split_whitespace();
    let magic = fields.next().ok_or_else(|| Error::Parse("empty header line".to_string()))?;
    if magic != "aag" {
        return Err(Error::Parse(format!("expected 'aag' magic, found '{magic}'")));
    }
    let m = parse_u32(fields.next(), "M")?;
    let n_pi = parse_u32(fields.next(), "I")? as usize;
    let n_latch = parse_u32(fields.next(), "L")? as usize;
    let n_po = parse_u32(fields.next(), "O")? as usize;
    let n_and = parse_u32(fields.next(), "A")? as usize;

    let mut mgr = AigManager::new();
    mgr.n_latch = n_latch;

    for _ in 0..n_pi {
        let line = r.required()?;
        let lit = parse_lit(&line, r.line_no)?;
        if lit % 2 != 0 || lit == 0 {
            return Err(Error::Parse(format!(
                "PI literal must be even and non-zero, got {lit} at line {}",
                r.line_no
            )));
        }
        mgr.new_gate(GateKind::Pi, lit / 2, r.line_no);
    }

    let mut po_lits = Vec::with_capacity(n_po);
    for _ in 0..n_po {
        let line = r.required()?;
        po_lits.push((parse_lit(&line, r.line_no)?, r.line_no));
    }

    for _ in 0..n_and {
        let line = r.required()?;
        let mut parts = line.split_whitespace();
        let g = parse_u32(parts.next(), "gate literal")?;
        let f0 = parse_u32(parts.next(), "first fanin literal")?;
        let f1 = parse_u32(parts.next(), "second fanin literal")?;
        if g % 2 != 0 || g == 0 {
            return Err(Error::Parse(format!(
                "AND gate literal must be even and non-zero, got {g} at line {}",
                r.line_no
            )));
        }
        let var = g / 2;
        mgr.new_gate(GateKind::And, var, r.line_no);
        mgr.set_fanin(var, 0, f0 / 2, f0 & 1 != 0);
        mgr.set_fanin(var, 1, f1 / 2, f1 & 1 != 0);
    }

    if mgr.logic_max_var() > m {
        return Err(Error::Parse(format!(
            "variable index {} exceeds declared maximum {m}",
            mgr.logic_max_var()
        )));
    }

    let po_base = m + 1;
    mgr.input_names = vec![None; n_pi];
    mgr.output_names = vec![None; n_po];
    for (idx, (lit, line_no)) in po_lits.into_iter().enumerate() {
        let var = po_base + idx as u32;
        mgr.new_gate(GateKind::Po, var, line_no);
        mgr.set_fanin(var, 0, lit / 2, lit & 1 != 0);
    }

    while let Some(line) = r.next()? {
        if line == "c" {
            break;
        }
        if let Some(rest) = line.strip_prefix('i') {
            set_symbol(&mut mgr.input_names, rest, r.line_no)?;
        } else if let Some(rest) = line.strip_prefix('o') {
            set_symbol(&mut mgr.output_names, rest, r.line_no)?;
        } else if line.trim().is_empty() {
            continue;
        } else {
            break;
        }
    }

    mgr.rebuild_dfs();
    Ok(mgr)
}

fn set_symbol(table: &mut [Option<String>], rest: &str, line_no: u32) -> Result<()> {
    let (idx_str, name) = rest
        .split_once(' ')
        .ok_or_else(|| Error::Parse(format!("malformed symbol line at line {line_no}")))?;
    let idx: usize = idx_str
        .parse()
        .map_err(|_| Error::Parse(format!("malformed symbol index at line {line_no}")))?;
    let slot = table
        .get_mut(idx)
        .ok_or_else(|| Error::Parse(format!("symbol index {idx} out of range at line {line_no}")))?;
    *slot = Some(name.to_string());
    Ok(())
}

/// Write an AAG netlist, preserving the existing variable numbering
pub fn write<W: Write>(writer: &mut W, mgr: &AigManager) -> io::Result<()> {
    writeln!(
        writer,
        "aag {} {} {} {} {}",
        mgr.logic_max_var(),
        mgr.nb_inputs(),
        mgr.n_latch,
        mgr.nb_outputs(),
        mgr.nb_and()
    )?;

    for &v in mgr.pi_order() {
        writeln!(writer, "{}", 2 * v)?;
    }
    for &v in mgr.po_order() {
        let f = mgr.gate(v).expect("PO in po_order must be live").po_fanin();
        writeln!(writer, "{}", f.lit().raw())?;
    }
    let mut and_vars: Vec<u32> = mgr
        .iter_gates()
        .filter(|g| g.kind == GateKind::And)
        .map(|g| g.var)
        .collect();
    and_vars.sort_unstable();
    for v in and_vars {
        let g = mgr.gate(v).unwrap();
        let (f0, f1) = g.and_fanins();
        writeln!(writer, "{} {} {}", 2 * v, f0.lit().raw(), f1.lit().raw())?;
    }

    for (i, name) in mgr.input_names.iter().enumerate() {
        if let Some(n) = name {
            writeln!(writer, "i{i} {n}")?;
        }
    }
    for (i, name) in mgr.output_names.iter().enumerate() {
        if let Some(n) = name {
            writeln!(writer, "o{i} {n}")?;
        }
    }
    Ok(())
}
