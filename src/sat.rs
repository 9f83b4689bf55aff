//! Abstract SAT solver contract and the concrete Kissat-backed implementation
//!
//! The rest of the core never touches `rustsat` types directly: every interaction with
//! the solver goes through [`SatBackend`], so swapping solvers means writing a new
//! implementation of this trait rather than touching the fraig driver.

use rustsat::clause;
use rustsat::solvers::{Solve, SolveIncremental, SolverResult};
use rustsat::types::{Lit as RsLit, TernaryVal, Var as RsVar};
use rustsat_kissat::Kissat;

/// Opaque handle for a SAT variable, as seen by callers of [`SatBackend`]
pub type VarId = u32;

/// Abstract incremental CNF encoder and solver, as needed by the fraig driver
pub trait SatBackend {
    /// Reset the solver to an empty instance and permanently fix the constant's variable
    fn initialize(&mut self);

    /// Allocate a fresh variable, disjoint from every gate variable and every
    /// previously allocated fresh variable
    fn new_var(&mut self) -> VarId;

    /// Add clauses encoding `y <-> (a ^ a_inv) & (b ^ b_inv)`
    fn add_aig_cnf(&mut self, y: VarId, a: VarId, a_inv: bool, b: VarId, b_inv: bool);

    /// Add clauses encoding `y <-> (a ^ a_inv) ^ (b ^ b_inv)`
    fn add_xor_cnf(&mut self, y: VarId, a: VarId, a_inv: bool, b: VarId, b_inv: bool);

    /// Permanently assert that `v` takes the given boolean value
    fn assert_property(&mut self, v: VarId, polarity: bool);

    /// Clear all pending assumptions
    fn assume_release(&mut self);

    /// Add a temporary assumption that `v` takes the given boolean value for the next
    /// call to [`SatBackend::assume_solve`]
    fn assume_property(&mut self, v: VarId, polarity: bool);

    /// Solve under the currently assumed literals; `true` means satisfiable
    fn assume_solve(&mut self) -> bool;

    /// Value assigned to `v` by the last solve, if the solver reported one
    fn get_value(&mut self, v: VarId) -> Option<bool>;
}

/// Fresh variables start here, far past any realistic gate count, so they never collide
/// with a gate's own `v + 1` SAT variable
const FRESH_VAR_BASE: u32 = 1 << 28;

/// A [`SatBackend`] backed by the Kissat solver through `rustsat`
pub struct KissatBackend {
    solver: Kissat,
    assumptions: Vec<RsLit>,
    fresh_counter: u32,
}

impl KissatBackend {
    pub fn new() -> KissatBackend {
        KissatBackend {
            solver: Kissat::default(),
            assumptions: Vec::new(),
            fresh_counter: 0,
        }
    }

    fn sat_lit(&self, v: VarId, inv: bool) -> RsLit {
        let var = RsVar::new(v + 1);
        let lit = RsLit::positive(var);
        if inv {
            !lit
        } else {
            lit
        }
    }
}

impl Default for KissatBackend {
    fn default() -> KissatBackend {
        KissatBackend::new()
    }
}

impl SatBackend for KissatBackend {
    fn initialize(&mut self) {
        self.solver = Kissat::default();
        self.assumptions.clear();
        self.fresh_counter = 0;
        self.assert_property(0, false);
    }

    fn new_var(&mut self) -> VarId {
        let v = FRESH_VAR_BASE + self.fresh_counter;
        self.fresh_counter += 1;
        v
    }

    fn add_aig_cnf(&mut self, y: VarId, a: VarId, a_inv: bool, b: VarId, b_inv: bool) {
        let ly = self.sat_lit(y, false);
        let la = self.sat_lit(a, a_inv);
        let lb = self.sat_lit(b, b_inv);
        let _ = self.solver.add_clause(clause![!ly, la]);
        let _ = self.solver.add_clause(clause![!ly, lb]);
        let _ = self.solver.add_clause(clause![ly, !la, !lb]);
    }

    fn add_xor_cnf(&mut self, y: VarId, a: VarId, a_inv: bool, b: VarId, b_inv: bool) {
        let ly = self.sat_lit(y, false);
        let la = self.sat_lit(a, a_inv);
        let lb = self.sat_lit(b, b_inv);
        let _ = self.solver.add_clause(clause![!ly, la, lb]);
        let _ = self.solver.add_clause(clause![!ly, !la, !lb]);
        let _ = self.solver.add_clause(clause![ly, !la, lb]);
        let _ = self.solver.add_clause(clause![ly, la, !lb]);
    }

    fn assert_property(&mut self, v: VarId, polarity: bool) {
        let lit = self.sat_lit(v, !polarity);
        let _ = self.solver.add_clause(clause![lit]);
    }

    fn assume_release(&mut self) {
        self.assumptions.clear();
    }

    fn assume_property(&mut self, v: VarId, polarity: bool) {
        self.assumptions.push(self.sat_lit(v, !polarity));
    }

    fn assume_solve(&mut self) -> bool {
        let assumps = self.assumptions.clone();
        matches!(self.solver.solve_assumps(&assumps), Ok(SolverResult::Sat))
    }

    fn get_value(&mut self, v: VarId) -> Option<bool> {
        let lit = self.sat_lit(v, false);
        match self.solver.lit_val(lit) {
            Ok(TernaryVal::True) => Some(true),
            Ok(TernaryVal::False) => Some(false),
            _ => None,
        }
    }
}

/// Attempt to prove `rep` and `cand` functionally equivalent under the encoding already
/// built into `backend`
///
/// Returns `true` (UNSAT) if equivalent; `false` (SAT) if a distinguishing input exists,
/// in which case the caller should read it off with [`SatBackend::get_value`] before the
/// next call releases the assumption.
pub fn prove_pair<B: SatBackend>(backend: &mut B, rep: (u32, bool), cand: (u32, bool)) -> bool {
    let miter = backend.new_var();
    backend.add_xor_cnf(miter, rep.0, rep.1, cand.0, cand.1);
    backend.assume_release();
    backend.assume_property(miter, true);
    !backend.assume_solve()
}
