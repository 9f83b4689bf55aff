//! The fraig driver: orchestrates strashing, simulation, FEC partitioning and SAT-based
//! proof to reduce an AIG to its functionally minimal form

use crate::fec::{self, FecGroup};
use crate::manager::AigManager;
use crate::sat::{prove_pair, SatBackend};
use crate::sim::{self, CirModel, WORD_WIDTH};
use crate::strash::strash;

const INITIAL_MERGE_RATIO: f64 = 0.3;
const MERGE_RATIO_INCREMENT: f64 = 0.9;

/// Run the fraig loop to completion: repeatedly prove or refute candidate equivalences
/// within `groups` until none remain, merging proven pairs and refining the partition
/// from SAT counterexamples along the way. Runs a final strash pass to absorb any
/// structural duplicates the merges exposed.
pub fn fraig<B: SatBackend>(mgr: &mut AigManager, backend: &mut B, initial_groups: Vec<FecGroup>) {
    let pi_vars: Vec<u32> = mgr.pi_order().to_vec();

    let mut groups = initial_groups;
    let mut merge_pairs: Vec<(u32, u32, bool)> = Vec::new();
    let mut pattern_batch = CirModel::new(pi_vars.len());
    let mut period_cnt = 0usize;
    let mut unsat_merge_ratio = INITIAL_MERGE_RATIO;

    'outer: while !groups.is_empty() {
        backend.initialize();
        groups = fec::refine(mgr, groups);
        mgr.rebuild_dfs();
        mgr.assign_dfs_order();
        for g in groups.iter_mut() {
            g.sort_by_dfs_order(mgr);
        }
        fec::link_groups(mgr, &groups);

        let dfs_list = mgr.dfs_list().to_vec();
        let total = dfs_list.len().max(1);

        for (i, &var) in dfs_list.iter().enumerate() {
            let (is_and, fanins, fec_group, fec_index) = {
                let g = mgr.gate(var).unwrap();
                let fanins = if g.is_and() { Some(g.and_fanins()) } else { None };
                (g.is_and(), fanins, g.fec_group, g.fec_index)
            };
            if !is_and {
                continue;
            }
            let (f0, f1) = fanins.unwrap();
            backend.add_aig_cnf(var, f0.target, f0.inv, f1.target, f1.inv);

            let group_idx = match fec_group {
                Some(idx) => idx,
                None => continue,
            };
            let (rep_var, rep_inv) = groups[group_idx].rep();
            if rep_var == var {
                continue;
            }
            let cand = groups[group_idx].cand(fec_index);
            debug_assert_eq!(cand.0, var);

            if rep_var == mgr.const_var() {
                println!(
                    "Prove {}{} = {}...",
                    if cand.1 { "!" } else { "" },
                    cand.0,
                    if rep_inv { 0 } else { 1 }
                );
            } else {
                let inv = rep_inv ^ cand.1;
                println!(
                    "Prove ({}, {}{})...",
                    rep_var,
                    if inv { "!" } else { "" },
                    cand.0
                );
            }

            if prove_pair(backend, (rep_var, rep_inv), cand) {
                merge_pairs.push((rep_var, cand.0, cand.1 ^ rep_inv));
                groups[group_idx].tombstone(fec_index);
                println!("Updating by UNSAT... Total #FEC Group = {}", groups.len());

                if (i as f64 + 1.0) / total as f64 > unsat_merge_ratio {
                    for (alive, dead, inv) in merge_pairs.drain(..) {
                        println!(
                            "Fraig: {alive} merging {}{dead}...",
                            if inv { "!" } else { "" }
                        );
                        mgr.merge(alive, dead, inv);
                    }
                    groups = fec::refine(mgr, groups);
                    unsat_merge_ratio = (unsat_merge_ratio + MERGE_RATIO_INCREMENT).min(1.0);
                    mgr.rebuild_dfs();
                    continue 'outer;
                }
            } else {
                let col = period_cnt;
                for (pi_idx, &pi_var) in pi_vars.iter().enumerate() {
                    let value = backend.get_value(pi_var);
                    debug_assert!(value.is_some(), "solver left PI {pi_var} indeterminate");
                    pattern_batch.set_bit(pi_idx, col, value.unwrap_or(false));
                }
                period_cnt += 1;
                println!("Updating by SAT... Total #FEC Group = {}", groups.len());

                if period_cnt == WORD_WIDTH {
                    sim::simulate(mgr, &pattern_batch);
                    fec::link_groups(mgr, &groups);
                    pattern_batch = CirModel::new(pi_vars.len());
                    period_cnt = 0;
                }
            }
        }

        mgr.rebuild_dfs();
    }

    for (alive, dead, inv) in merge_pairs.drain(..) {
        println!("Fraig: {alive} merging {}{dead}...", if inv { "!" } else { "" });
        mgr.merge(alive, dead, inv);
    }
    mgr.rebuild_dfs();
    groups = fec::refine(mgr, groups);
    if period_cnt > 0 {
        sim::simulate(mgr, &pattern_batch);
        groups = fec::refine(mgr, groups);
    }
    debug_assert!(groups.is_empty(), "fraig loop terminated with unresolved FEC groups");

    strash(mgr);
}
