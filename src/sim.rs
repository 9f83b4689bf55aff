//! Bit-parallel simulation: evaluate the whole AIG on a batch of W Boolean patterns,
//! one sample per bit position

use std::io::BufRead;

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use crate::error::{Error, Result};
use crate::manager::AigManager;

/// Number of patterns simulated per batch, equal to the machine word width used
pub const WORD_WIDTH: usize = u64::BITS as usize;

/// A batch of input patterns: one `u64` word per primary input, one bit per pattern
#[derive(Clone, Debug, Default)]
pub struct CirModel {
    /// Per-input packed samples, indexed by PI declaration order
    pub words: Vec<u64>,
}

impl CirModel {
    /// An all-zero batch sized for `n_pi` primary inputs
    pub fn new(n_pi: usize) -> CirModel {
        CirModel {
            words: vec![0u64; n_pi],
        }
    }

    /// Set the bit at `col` of input `pi` to `value`
    pub fn set_bit(&mut self, pi: usize, col: usize, value: bool) {
        if value {
            self.words[pi] |= 1u64 << col;
        } else {
            self.words[pi] &= !(1u64 << col);
        }
    }

    /// Fill every input's word from a random source
    pub fn randomize(&mut self, rng: &mut SmallRng) {
        for w in self.words.iter_mut() {
            *w = rng.next_u64();
        }
    }
}

/// Run one batch of simulation: install `model`'s words on the primary inputs, evaluate
/// every AND gate along the current DFS order, and refresh every PO's `sim_value`
///
/// The DFS list must already be up to date; this never rebuilds it.
pub fn simulate(mgr: &mut AigManager, model: &CirModel) {
    mgr.gate_mut(mgr.const_var()).unwrap().sim_value = 0;

    let pi_vars: Vec<u32> = mgr.pi_order().to_vec();
    for (pi_idx, var) in pi_vars.into_iter().enumerate() {
        let w = model.words.get(pi_idx).copied().unwrap_or(0);
        mgr.gate_mut(var).unwrap().sim_value = w;
    }

    for &var in mgr.dfs_list().to_vec().iter() {
        let gate = mgr.gate(var).unwrap();
        if gate.is_and() {
            let (f0, f1) = gate.and_fanins();
            let v0 = mgr.gate(f0.target).unwrap().sim_value ^ if f0.inv { u64::MAX } else { 0 };
            let v1 = mgr.gate(f1.target).unwrap().sim_value ^ if f1.inv { u64::MAX } else { 0 };
            mgr.gate_mut(var).unwrap().sim_value = v0 & v1;
        } else if gate.is_po() {
            let f = gate.po_fanin();
            let v = mgr.gate(f.target).unwrap().sim_value ^ if f.inv { u64::MAX } else { 0 };
            mgr.gate_mut(var).unwrap().sim_value = v;
        }
    }
}

/// Generate `n` random patterns and simulate them in successive batches of `WORD_WIDTH`,
/// following the `-random` form of the simulate command
///
/// Returns the number of patterns simulated, always `n`: the last batch is padded with
/// extra random bits that are simply not counted.
pub fn random_sim(mgr: &mut AigManager, n: usize, seed: u64) -> usize {
    mgr.rebuild_dfs();
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut remaining = n;
    while remaining > 0 {
        let mut model = CirModel::new(mgr.nb_inputs());
        model.randomize(&mut rng);
        simulate(mgr, &model);
        remaining = remaining.saturating_sub(WORD_WIDTH);
    }
    n
}

/// Read patterns from `reader`, one per line, each exactly `n_pi` characters of `'0'`
/// or `'1'`, and simulate them in successive batches
///
/// Every line is validated before any batch is simulated: a single malformed line
/// aborts with `Error::PatternFormat` and leaves the netlist's simulation state
/// unmodified, simulating zero patterns.
pub fn read_and_simulate_patterns<R: BufRead>(mgr: &mut AigManager, reader: R) -> Result<usize> {
    let n_pi = mgr.nb_inputs();
    let mut patterns: Vec<Vec<bool>> = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.len() != n_pi || !line.bytes().all(|b| b == b'0' || b == b'1') {
            return Err(Error::PatternFormat(format!(
                "line {} must be exactly {n_pi} characters of '0' or '1'",
                i + 1
            )));
        }
        patterns.push(line.bytes().map(|b| b == b'1').collect());
    }

    mgr.rebuild_dfs();
    let mut idx = 0;
    while idx < patterns.len() {
        let batch_len = (patterns.len() - idx).min(WORD_WIDTH);
        let mut model = CirModel::new(n_pi);
        for col in 0..batch_len {
            for pi in 0..n_pi {
                model.set_bit(pi, col, patterns[idx + col][pi]);
            }
        }
        simulate(mgr, &model);
        idx += batch_len;
    }
    Ok(patterns.len())
}
