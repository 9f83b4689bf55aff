//! End-to-end scenarios exercising the full read -> strash -> simulate -> fraig -> write
//! pipeline through the public API, one per documented scenario.

use fraiger::fec;
use fraiger::fraig::fraig;
use fraiger::gate::GateKind;
use fraiger::io::aag;
use fraiger::sat::KissatBackend;
use fraiger::sim::{random_sim, WORD_WIDTH};
use fraiger::strash::strash;
use fraiger::AigManager;

fn run_fraig(mgr: &mut AigManager) {
    strash(mgr);
    random_sim(mgr, WORD_WIDTH, 1);
    let groups = fec::initial_classify(mgr);
    let mut backend = KissatBackend::new();
    fraig(mgr, &mut backend, groups);
}

/// S1: a PO tied directly to a PI survives strash and fraig unchanged.
#[test]
fn s1_trivial_identity() {
    let mut mgr = aag::read("aag 2 2 0 1 0\n2\n4\n4\n".as_bytes()).unwrap();
    assert_eq!(mgr.nb_inputs(), 2);
    assert_eq!(mgr.nb_outputs(), 1);

    run_fraig(&mut mgr);

    let po = mgr.gate(mgr.po_order()[0]).unwrap();
    assert_eq!(po.po_fanin().target, mgr.pi_order()[1]);
    assert!(!po.po_fanin().inv);
    assert_eq!(mgr.nb_and(), 0);
}

/// S2: `x AND !x` is UNSAT against the constant and collapses to it.
#[test]
fn s2_constant_collapse() {
    // aag 3 1 0 1 1: PI var 1 (lit 2), AND var 3 = PI(false) & PI(true), PO = var 3
    let mut mgr = aag::read("aag 3 1 0 1 1\n2\n6\n6 2 3\n".as_bytes()).unwrap();
    run_fraig(&mut mgr);

    let po = mgr.gate(mgr.po_order()[0]).unwrap();
    let f = po.po_fanin();
    assert_eq!(f.target, mgr.const_var());
    assert!(!f.inv, "x & !x is always false, PO fanin must settle on constant-false polarity");
}

/// S3: two structurally identical ANDs merge during strash, no SAT solver needed.
#[test]
fn s3_structural_duplicate() {
    let mut mgr = AigManager::new();
    let i1 = mgr.new_gate(GateKind::Pi, 1, 1);
    let i2 = mgr.new_gate(GateKind::Pi, 2, 2);
    let a = mgr.new_gate(GateKind::And, 3, 3);
    mgr.set_fanin(a, 0, i1, false);
    mgr.set_fanin(a, 1, i2, false);
    let b = mgr.new_gate(GateKind::And, 4, 4);
    mgr.set_fanin(b, 0, i1, false);
    mgr.set_fanin(b, 1, i2, false);
    let po_a = mgr.new_gate(GateKind::Po, 5, 5);
    mgr.set_fanin(po_a, 0, a, false);
    let po_b = mgr.new_gate(GateKind::Po, 6, 6);
    mgr.set_fanin(po_b, 0, b, false);

    strash(&mut mgr);

    assert!(mgr.gate(b).is_none());
    assert_eq!(mgr.gate(po_b).unwrap().po_fanin().target, a);
    assert_eq!(mgr.nb_and(), 1);
}

/// S4: `x & x = x` and `!x & !x = !x` are detected as inverse and merged with `inv = true`.
#[test]
fn s4_inverter_pair() {
    let mut mgr = AigManager::new();
    let x = mgr.new_gate(GateKind::Pi, 1, 1);
    let a = mgr.new_gate(GateKind::And, 2, 2);
    mgr.set_fanin(a, 0, x, false);
    mgr.set_fanin(a, 1, x, false);
    let b = mgr.new_gate(GateKind::And, 3, 3);
    mgr.set_fanin(b, 0, x, true);
    mgr.set_fanin(b, 1, x, true);
    let po_a = mgr.new_gate(GateKind::Po, 4, 4);
    mgr.set_fanin(po_a, 0, a, false);
    let po_b = mgr.new_gate(GateKind::Po, 5, 5);
    mgr.set_fanin(po_b, 0, b, false);

    run_fraig(&mut mgr);

    assert_eq!(mgr.nb_and(), 1, "both gates compute x up to polarity, one must survive");
    let fa = mgr.gate(po_a).unwrap().po_fanin();
    let fb = mgr.gate(po_b).unwrap().po_fanin();
    assert_eq!(fa.target, fb.target);
    assert_ne!(fa.inv, fb.inv, "a computes x, b computes !x: their surviving edges must disagree in polarity");
}

/// S5: two independent ANDs over disjoint inputs never merge.
#[test]
fn s5_no_merges() {
    let mut mgr = AigManager::new();
    let i1 = mgr.new_gate(GateKind::Pi, 1, 1);
    let i2 = mgr.new_gate(GateKind::Pi, 2, 2);
    let i3 = mgr.new_gate(GateKind::Pi, 3, 3);
    let i4 = mgr.new_gate(GateKind::Pi, 4, 4);
    let a = mgr.new_gate(GateKind::And, 5, 5);
    mgr.set_fanin(a, 0, i1, false);
    mgr.set_fanin(a, 1, i2, false);
    let b = mgr.new_gate(GateKind::And, 6, 6);
    mgr.set_fanin(b, 0, i3, false);
    mgr.set_fanin(b, 1, i4, false);
    let po_a = mgr.new_gate(GateKind::Po, 7, 7);
    mgr.set_fanin(po_a, 0, a, false);
    let po_b = mgr.new_gate(GateKind::Po, 8, 8);
    mgr.set_fanin(po_b, 0, b, false);

    run_fraig(&mut mgr);

    assert_eq!(mgr.nb_and(), 2);
    assert_eq!(mgr.gate(po_a).unwrap().po_fanin().target, a);
    assert_eq!(mgr.gate(po_b).unwrap().po_fanin().target, b);
}

/// S6: a pattern line of the wrong length is rejected and the netlist is left unmodified.
#[test]
fn s6_simulation_pattern_mismatch() {
    let mut mgr = AigManager::new();
    mgr.new_gate(GateKind::Pi, 1, 1);
    mgr.new_gate(GateKind::Pi, 2, 2);
    mgr.new_gate(GateKind::Pi, 3, 3);

    let err = fraiger::sim::read_and_simulate_patterns(&mut mgr, "0110\n".as_bytes()).unwrap_err();
    assert!(matches!(err, fraiger::Error::PatternFormat(_)));
    assert_eq!(mgr.nb_inputs(), 3, "a rejected pattern batch must leave the netlist itself untouched");
}

/// Merge monotonicity: gate count never increases across strash or fraig.
#[test]
fn merge_monotonicity() {
    let mut mgr = aag::read(
        "aag 8 2 0 2 4\n2\n4\n6\n8\n6 2 4\n8 3 5\n10 6 8\n12 10 10\n".as_bytes(),
    )
    .unwrap();
    let before = mgr.nb_and();
    strash(&mut mgr);
    let after_strash = mgr.nb_and();
    assert!(after_strash <= before);
    run_fraig(&mut mgr);
    assert!(mgr.nb_and() <= after_strash);
}
