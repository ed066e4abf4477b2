//! Shared helpers for the pipeline tests.

use minicirc::bench::parse_bench_str;
use minicirc::{Circuit, GateType, NameEncoder, Pass, Pipeline};

#[allow(dead_code)]
pub fn parse(text: &str) -> (Circuit, NameEncoder) {
    parse_bench_str(text).expect("test circuit parses")
}

/// Parses `text` and runs `pipeline` over it.
#[allow(dead_code)]
pub fn apply(pipeline: &Pipeline, text: &str) -> (Circuit, NameEncoder) {
    let (circuit, encoder) = parse(text);
    pipeline.apply(circuit, encoder)
}

/// Structural sanity of a circuit a pass produced: no placeholder gates,
/// canonical symmetric operands, consistent user/operand back-edges, and an
/// encoder in sync with the gate table.
#[allow(dead_code)]
pub fn assert_well_formed(circuit: &Circuit, encoder: &NameEncoder) {
    assert_eq!(encoder.size(), circuit.num_gates());
    for gate in 0..circuit.num_gates() {
        assert_ne!(
            circuit.gate_type(gate),
            GateType::Undefined,
            "gate {gate} has no definition"
        );
        if circuit.gate_type(gate).is_symmetric() {
            assert!(
                circuit.operands(gate).windows(2).all(|w| w[0] <= w[1]),
                "gate {gate} has unsorted operands"
            );
        }
        for &operand in circuit.operands(gate) {
            assert!(
                circuit.users(operand).contains(&gate),
                "edge {gate} -> {operand} has no back-edge"
            );
        }
        for &user in circuit.users(gate) {
            assert!(
                circuit.operands(user).contains(&gate),
                "back-edge {gate} -> {user} has no edge"
            );
        }
    }
    for &output in circuit.outputs() {
        assert!(output < circuit.num_gates());
    }
}
