//! Structural hashing: canonicalize an AIG by merging gates with identical fanin pairs

use fxhash::FxHashMap;

use crate::literal::Lit;
use crate::manager::AigManager;

/// Canonical fanin signature of an AND gate: its two fanin literals, order-independent
fn signature(a: Lit, b: Lit) -> (Lit, Lit) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Merge every AND gate that shares its fanin signature with an earlier one
///
/// Walks the current DFS order so that, for any pair of structurally identical gates,
/// the one appearing first in DFS order (with its fanins already processed) survives.
pub fn strash(mgr: &mut AigManager) {
    mgr.rebuild_dfs();
    mgr.assign_dfs_order();

    let mut seen: FxHashMap<(Lit, Lit), u32> = FxHashMap::default();
    for &var in mgr.dfs_list().to_vec().iter() {
        let gate = match mgr.gate(var) {
            Some(g) if g.is_and() => g,
            _ => continue,
        };
        let (f0, f1) = gate.and_fanins();
        let key = signature(f0.lit(), f1.lit());
        match seen.get(&key) {
            Some(&existing) if existing != var => {
                println!("Strashing: {existing} merging {var}...");
                mgr.merge(existing, var, false);
            }
            _ => {
                seen.insert(key, var);
            }
        }
    }

    mgr.rebuild_dfs();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateKind;

    fn build_and2(mgr: &mut AigManager, a: u32, ai: bool, b: u32, bi: bool, line: u32) -> u32 {
        let v = mgr.max_var() + 1;
        mgr.new_gate(GateKind::And, v, line);
        mgr.set_fanin(v, 0, a, ai);
        mgr.set_fanin(v, 1, b, bi);
        v
    }

    #[test]
    fn test_strash_merges_duplicate_gates() {
        let mut mgr = AigManager::new();
        let i1 = mgr.new_gate(GateKind::Pi, 1, 1);
        let i2 = mgr.new_gate(GateKind::Pi, 2, 2);
        let a = build_and2(&mut mgr, i1, false, i2, true, 3);
        // same fanins, opposite literal order: must be recognized as the same signature
        let b = build_and2(&mut mgr, i2, true, i1, false, 4);
        let po = mgr.new_gate(GateKind::Po, b + 1, 5);
        mgr.set_fanin(po, 0, b, false);

        strash(&mut mgr);

        assert!(mgr.gate(b).is_none());
        assert_eq!(mgr.gate(po).unwrap().po_fanin().target, a);
        assert_eq!(mgr.nb_and(), 1);
    }

    #[test]
    fn test_strash_idempotent() {
        let mut mgr = AigManager::new();
        let i1 = mgr.new_gate(GateKind::Pi, 1, 1);
        let i2 = mgr.new_gate(GateKind::Pi, 2, 2);
        let a = build_and2(&mut mgr, i1, false, i2, false, 3);
        let po = mgr.new_gate(GateKind::Po, a + 1, 4);
        mgr.set_fanin(po, 0, a, false);

        strash(&mut mgr);
        let n1 = mgr.nb_and();
        strash(&mut mgr);
        let n2 = mgr.nb_and();
        assert_eq!(n1, n2);
    }
}
