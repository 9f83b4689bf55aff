//! Functionally Equivalent Candidate (FEC) groups: gates conjectured to compute the same
//! function, up to a polarity recorded relative to the group's first member

use fxhash::FxHashMap;

use crate::manager::AigManager;

/// A group of at least two `(gate, inverted)` pairs sharing a simulation signature
///
/// The first live member is the representative. Deletion during a fraig sweep is lazy:
/// [`FecGroup::tombstone`] marks an index dead without touching the others' indices, so a
/// `fec_index` recorded on a gate stays valid until the group is rebuilt by [`refine`].
#[derive(Clone, Debug)]
pub struct FecGroup {
    members: Vec<(u32, bool)>,
    dead: Vec<bool>,
}

impl FecGroup {
    fn new(members: Vec<(u32, bool)>) -> FecGroup {
        let dead = vec![false; members.len()];
        FecGroup { members, dead }
    }

    /// All members, live or tombstoned, in their current order
    pub fn members(&self) -> &[(u32, bool)] {
        &self.members
    }

    /// Number of members not yet tombstoned
    pub fn live_count(&self) -> usize {
        self.dead.iter().filter(|d| !**d).count()
    }

    /// Live members only, in their current order
    pub fn live_members(&self) -> Vec<(u32, bool)> {
        self.members
            .iter()
            .zip(&self.dead)
            .filter(|(_, d)| !**d)
            .map(|(m, _)| *m)
            .collect()
    }

    /// Whether member `index` has been tombstoned
    pub fn is_dead(&self, index: usize) -> bool {
        self.dead[index]
    }

    /// Mark member `index` as no longer a live candidate
    pub fn tombstone(&mut self, index: usize) {
        self.dead[index] = true;
    }

    /// The representative: the first live member
    ///
    /// Panics if the group has no live members.
    pub fn rep(&self) -> (u32, bool) {
        self.members
            .iter()
            .zip(&self.dead)
            .find(|(_, d)| !**d)
            .map(|(m, _)| *m)
            .expect("FEC group has no live representative")
    }

    /// The candidate at `index`
    pub fn cand(&self, index: usize) -> (u32, bool) {
        self.members[index]
    }

    /// Sort members by the current `dfs_order` of their gate, ascending
    pub fn sort_by_dfs_order(&mut self, mgr: &AigManager) {
        let mut idx: Vec<usize> = (0..self.members.len()).collect();
        idx.sort_by_key(|&i| mgr.gate(self.members[i].0).map(|g| g.dfs_order).unwrap_or(u32::MAX));
        self.members = idx.iter().map(|&i| self.members[i]).collect();
        self.dead = idx.iter().map(|&i| self.dead[i]).collect();
    }

    /// Drop tombstoned members, compacting the group in place
    ///
    /// Returns `false` if fewer than two members survive, meaning the group is no longer
    /// valid and should be discarded by the caller.
    pub fn compact(&mut self) -> bool {
        let mut members = Vec::new();
        for (m, d) in self.members.iter().zip(&self.dead) {
            if !*d {
                members.push(*m);
            }
        }
        let valid = members.len() >= 2;
        self.members = members;
        self.dead = vec![false; self.members.len()];
        valid
    }
}

/// Fold a raw simulation word into a bucket key and the polarity of that sample relative
/// to the bucket, per the representative-at-bit-0 convention: words whose low bit is 0
/// bucket directly, words whose low bit is 1 bucket under their complement
fn fold(sim: u64) -> (u64, bool) {
    if sim & 1 == 0 {
        (sim, false)
    } else {
        (!sim, true)
    }
}

fn bucket_into_groups(buckets: FxHashMap<u64, Vec<(u32, bool)>>) -> Vec<FecGroup> {
    let mut groups = Vec::new();
    for (_, mut members) in buckets {
        if members.len() < 2 {
            continue;
        }
        let r0 = members[0].1;
        for m in members.iter_mut() {
            m.1 ^= r0;
        }
        groups.push(FecGroup::new(members));
    }
    groups
}

/// Build the initial FEC classification from the current simulation values of every AIG
/// gate and the constant
pub fn initial_classify(mgr: &AigManager) -> Vec<FecGroup> {
    let mut buckets: FxHashMap<u64, Vec<(u32, bool)>> = FxHashMap::default();
    let const_var = mgr.const_var();
    let (k, inv) = fold(mgr.gate(const_var).unwrap().sim_value);
    buckets.entry(k).or_default().push((const_var, inv));
    for g in mgr.iter_gates().filter(|g| g.is_and()) {
        let (k, inv) = fold(g.sim_value);
        buckets.entry(k).or_default().push((g.var, inv));
    }
    bucket_into_groups(buckets)
}

/// Refine an existing set of groups after a new simulation batch: split each group by the
/// current signature of its live members, discarding any resulting subgroup of size < 2
pub fn refine(mgr: &AigManager, groups: Vec<FecGroup>) -> Vec<FecGroup> {
    let mut result = Vec::new();
    for group in groups {
        let live = group.live_members();
        let mut buckets: FxHashMap<u64, Vec<(u32, bool)>> = FxHashMap::default();
        for (var, _) in live {
            let sim = mgr.gate(var).unwrap().sim_value;
            let (k, inv) = fold(sim);
            buckets.entry(k).or_default().push((var, inv));
        }
        result.extend(bucket_into_groups(buckets));
    }
    result
}

/// Record each group's members back onto their gates, as `fec_group`/`fec_index`
///
/// Clears the back-reference on every gate first, so a gate dropped from all groups
/// during refinement stops pointing at a stale group.
pub fn link_groups(mgr: &mut AigManager, groups: &[FecGroup]) {
    let all_vars: Vec<u32> = mgr.iter_gates().map(|g| g.var).collect();
    for var in all_vars {
        if let Some(g) = mgr.gate_mut(var) {
            g.fec_group = None;
        }
    }
    for (gi, group) in groups.iter().enumerate() {
        for (i, (var, _inv)) in group.members().iter().enumerate() {
            if let Some(g) = mgr.gate_mut(*var) {
                g.fec_group = Some(gi);
                g.fec_index = i;
            }
        }
    }
}
