//! Pipeline tests for flattening and re-folding symmetric gate regions.

mod common;

use common::{apply, assert_well_formed};
use minicirc::minimize::recipes;
use minicirc::{Error, GateType};

#[test]
fn connect_flattens_an_and_tree() {
    let (circuit, encoder) = apply(
        &recipes::connect_symmetrical_gates(true, true, true),
        "INPUT(0)\n\
         INPUT(1)\n\
         INPUT(2)\n\
         INPUT(3)\n\
         OUTPUT(7)\n\
         4 = AND(0, 1)\n\
         5 = AND(2, 4)\n\
         6 = AND(3, 4)\n\
         7 = AND(5, 6)\n",
    );

    assert_eq!(circuit.num_gates(), 5);
    assert_eq!(circuit.gate_type(4), GateType::And);
    assert_eq!(circuit.operands(4), &[0, 1, 2, 3]);
    assert_eq!(circuit.outputs(), &[4]);
    assert_well_formed(&circuit, &encoder);
}

#[test]
fn connect_flattens_a_diamond_of_ors() {
    let (circuit, _) = apply(
        &recipes::connect_symmetrical_gates(true, true, true),
        "INPUT(0)\n\
         INPUT(1)\n\
         INPUT(2)\n\
         INPUT(3)\n\
         OUTPUT(7)\n\
         4 = OR(0, 1)\n\
         5 = OR(2, 4)\n\
         6 = OR(3, 4)\n\
         7 = OR(5, 6)\n",
    );

    assert_eq!(circuit.num_gates(), 5);
    assert_eq!(circuit.gate_type(4), GateType::Or);
    assert_eq!(circuit.operands(4), &[0, 1, 2, 3]);
    assert_eq!(circuit.outputs(), &[4]);
}

#[test]
fn connect_keeps_xor_multiplicity_and_escaping_gates() {
    let (circuit, _) = apply(
        &recipes::connect_symmetrical_gates(true, true, true),
        "INPUT(1)\n\
         INPUT(2)\n\
         INPUT(3)\n\
         INPUT(4)\n\
         INPUT(5)\n\
         INPUT(6)\n\
         INPUT(7)\n\
         OUTPUT(15)\n\
         8 = AND(1, 2)\n\
         9 = AND(8, 10)\n\
         10 = XOR(5, 6)\n\
         11 = XOR(3, 10)\n\
         12 = XOR(4, 10)\n\
         13 = XOR(11, 12)\n\
         14 = AND(6, 9)\n\
         15 = XOR(13, 14)\n",
    );

    assert_eq!(circuit.num_gates(), 9);
    for input in 0..6 {
        assert_eq!(circuit.gate_type(input), GateType::Input);
    }
    // The XOR region keeps one copy of the shared subterm per path (parity),
    // while the AND region below it stays a direct operand.
    assert_eq!(circuit.gate_type(6), GateType::Xor);
    assert_eq!(circuit.operands(6), &[2, 3, 7, 7, 8]);
    assert_eq!(circuit.gate_type(7), GateType::Xor);
    assert_eq!(circuit.operands(7), &[4, 5]);
    assert_eq!(circuit.gate_type(8), GateType::And);
    assert_eq!(circuit.operands(8), &[0, 1, 5, 7]);
    assert_eq!(circuit.outputs(), &[6]);
}

#[test]
fn connect_ignores_mixed_operators() {
    let (circuit, _) = apply(
        &recipes::connect_symmetrical_gates(true, true, true),
        "INPUT(1)\n\
         INPUT(2)\n\
         INPUT(3)\n\
         OUTPUT(5)\n\
         4 = AND(1, 2)\n\
         5 = OR(4, 3)\n",
    );

    assert_eq!(circuit.num_gates(), 5);
    assert_eq!(circuit.gate_type(3), GateType::Or);
    assert_eq!(circuit.operands(3), &[2, 4]);
    assert_eq!(circuit.gate_type(4), GateType::And);
    assert_eq!(circuit.operands(4), &[0, 1]);
    assert_eq!(circuit.outputs(), &[3]);
}

#[test]
fn connect_with_several_outputs() {
    let (circuit, _) = apply(
        &recipes::connect_symmetrical_gates(true, true, true),
        "INPUT(0)\n\
         INPUT(1)\n\
         INPUT(2)\n\
         INPUT(3)\n\
         OUTPUT(7)\n\
         OUTPUT(9)\n\
         4 = OR(0, 1)\n\
         5 = OR(2, 4)\n\
         6 = OR(3, 4)\n\
         7 = OR(5, 6)\n\
         8 = AND(0, 1)\n\
         9 = AND(2, 8)\n",
    );

    assert_eq!(circuit.num_gates(), 6);
    assert_eq!(circuit.gate_type(4), GateType::Or);
    assert_eq!(circuit.operands(4), &[0, 1, 2, 3]);
    assert_eq!(circuit.gate_type(5), GateType::And);
    assert_eq!(circuit.operands(5), &[0, 1, 2]);
    assert_eq!(circuit.outputs(), &[4, 5]);
}

#[test]
fn connect_does_not_absorb_through_a_mux() {
    let (circuit, _) = apply(
        &recipes::connect_symmetrical_gates(true, true, true),
        "INPUT(0)\n\
         INPUT(1)\n\
         INPUT(2)\n\
         INPUT(3)\n\
         OUTPUT(7)\n\
         4 = OR(0, 1)\n\
         5 = OR(2, 4)\n\
         6 = MUX(3, 0, 4)\n\
         7 = OR(5, 6)\n",
    );

    assert_eq!(circuit.num_gates(), 7);
    assert_eq!(circuit.gate_type(4), GateType::Or);
    assert_eq!(circuit.operands(4), &[2, 5, 6]);
    assert_eq!(circuit.gate_type(5), GateType::Or);
    assert_eq!(circuit.operands(5), &[0, 1]);
    assert_eq!(circuit.gate_type(6), GateType::Mux);
    assert_eq!(circuit.operands(6), &[3, 0, 5]);
    assert_eq!(circuit.outputs(), &[4]);
}

#[test]
fn disconnect_refolds_a_wide_and() {
    let (circuit, encoder) = apply(
        &recipes::disconnect_symmetrical_gates(3, true, true, true).unwrap(),
        "INPUT(0)\n\
         INPUT(1)\n\
         INPUT(2)\n\
         INPUT(3)\n\
         INPUT(4)\n\
         INPUT(5)\n\
         INPUT(6)\n\
         \n\
         OUTPUT(8)\n\
         \n\
         7 = AND(0, 1, 2, 3, 4, 5)\n\
         8 = XOR(6, 7)\n",
    );

    assert_eq!(circuit.num_gates(), 11);
    assert_eq!(circuit.gate_type(7), GateType::Xor);
    assert_eq!(circuit.operands(7), &[6, 8]);
    assert_eq!(circuit.gate_type(8), GateType::And);
    assert_eq!(circuit.operands(8), &[5, 10]);
    assert_eq!(circuit.gate_type(9), GateType::And);
    assert_eq!(circuit.operands(9), &[0, 1, 2]);
    assert_eq!(circuit.gate_type(10), GateType::And);
    assert_eq!(circuit.operands(10), &[3, 4, 9]);
    assert_eq!(circuit.outputs(), &[7]);
    assert_well_formed(&circuit, &encoder);
}

#[test]
fn disconnect_with_several_outputs_drops_dead_inputs() {
    let (circuit, _) = apply(
        &recipes::disconnect_symmetrical_gates(2, true, true, true).unwrap(),
        "INPUT(0)\n\
         INPUT(1)\n\
         INPUT(2)\n\
         INPUT(3)\n\
         INPUT(4)\n\
         INPUT(5)\n\
         INPUT(6)\n\
         OUTPUT(7)\n\
         OUTPUT(10)\n\
         7 = AND(0, 1, 2, 3)\n\
         8 = XOR(0, 1, 2)\n\
         9 = CONST(0)\n\
         10 = MUX(0, 8, 9)\n",
    );

    assert_eq!(circuit.num_gates(), 11);
    assert_eq!(circuit.gate_type(4), GateType::And);
    assert_eq!(circuit.operands(4), &[3, 9]);
    assert_eq!(circuit.gate_type(5), GateType::Mux);
    assert_eq!(circuit.operands(5), &[0, 6, 7]);
    assert_eq!(circuit.gate_type(6), GateType::Xor);
    assert_eq!(circuit.operands(6), &[2, 10]);
    assert_eq!(circuit.gate_type(7), GateType::ConstFalse);
    assert_eq!(circuit.gate_type(8), GateType::And);
    assert_eq!(circuit.operands(8), &[0, 1]);
    assert_eq!(circuit.gate_type(9), GateType::And);
    assert_eq!(circuit.operands(9), &[2, 8]);
    assert_eq!(circuit.gate_type(10), GateType::Xor);
    assert_eq!(circuit.operands(10), &[0, 1]);
    assert_eq!(circuit.outputs(), &[4, 5]);
}

#[test]
fn disconnect_leaves_disabled_operators_alone() {
    let (circuit, _) = apply(
        &recipes::disconnect_symmetrical_gates(2, false, false, false).unwrap(),
        "INPUT(0)\n\
         INPUT(1)\n\
         INPUT(2)\n\
         OUTPUT(3)\n\
         3 = XOR(0, 1, 2)\n",
    );

    assert_eq!(circuit.num_gates(), 4);
    assert_eq!(circuit.gate_type(3), GateType::Xor);
    assert_eq!(circuit.operands(3), &[0, 1, 2]);
    assert_eq!(circuit.outputs(), &[3]);
}

#[test]
fn disconnect_respects_per_operator_flags() {
    let (circuit, _) = apply(
        &recipes::disconnect_symmetrical_gates(2, true, true, false).unwrap(),
        "INPUT(0)\n\
         INPUT(1)\n\
         INPUT(2)\n\
         OUTPUT(3)\n\
         OUTPUT(4)\n\
         3 = XOR(0, 1, 2)\n\
         4 = AND(0, 1, 2)\n",
    );

    assert_eq!(circuit.num_gates(), 6);
    assert_eq!(circuit.gate_type(3), GateType::Xor);
    assert_eq!(circuit.operands(3), &[0, 1, 2]);
    assert_eq!(circuit.gate_type(4), GateType::And);
    assert_eq!(circuit.operands(4), &[2, 5]);
    assert_eq!(circuit.gate_type(5), GateType::And);
    assert_eq!(circuit.operands(5), &[0, 1]);
    assert_eq!(circuit.outputs(), &[3, 4]);
}

#[test]
fn disconnect_rejects_arity_below_two() {
    let error = recipes::disconnect_symmetrical_gates(1, true, false, false).unwrap_err();
    assert!(matches!(error, Error::Config { .. }));
}
