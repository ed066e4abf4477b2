//! Propagation of constant gates through the circuit.

use crate::algo;
use crate::circuit::{Circuit, GateInfo};
use crate::encoder::NameEncoder;
use crate::logic::{GateId, GateType};
use crate::minimize::{resolve, Pass};
use crate::seed;

/// Folds `CONST_FALSE`/`CONST_TRUE` operands into their users, bottom-up.
///
/// Absorption laws per operator: `AND` drops TRUE operands and dies on FALSE
/// (dually `OR`); `XOR` drops FALSE and folds TRUE operands into a parity;
/// `NOT`/`IFF` of a constant fold directly; `MUX` with a constant selector
/// picks its branch. A gate whose value pinned to a constant becomes a
/// constant-typed gate and is absorbed by its users in turn.
///
/// An output left pointing at a constant is materialized in place as a
/// tautology `OR(x, NOT(x))` or contradiction `AND(x, NOT(x))` over the first
/// input, so the emitted circuit needs no constant gates; one freshly-named
/// `NOT` is shared by all materializations of a run. Constant gates kept alive
/// as operands of a non-constant-selector `MUX` survive as they are.
#[derive(Debug, Clone, Copy)]
pub struct ConstantGateReducer;

impl Pass for ConstantGateReducer {
    fn apply(&self, circuit: Circuit, mut encoder: NameEncoder) -> (Circuit, NameEncoder) {
        log::debug!("START ConstantGateReducer");

        let n = circuit.num_gates();
        let mut replace: Vec<GateId> = (0..n).collect();
        let mut gate_info = vec![GateInfo::default(); n];

        let order = algo::top_sort(&circuit);
        for &gate_id in order.iter().rev() {
            let gate_type = circuit.gate_type(gate_id);
            match gate_type {
                GateType::Input
                | GateType::ConstFalse
                | GateType::ConstTrue
                | GateType::Undefined => {
                    gate_info[gate_id] = GateInfo::new(gate_type, vec![]);
                }
                GateType::Not => {
                    let operand = resolve(&replace, circuit.operands(gate_id)[0]);
                    gate_info[gate_id] = match constant_value(&gate_info, operand) {
                        Some(value) => GateInfo::new(constant_type(!value), vec![]),
                        None => GateInfo::new(GateType::Not, vec![operand]),
                    };
                }
                GateType::Iff | GateType::Buff => {
                    let operand = resolve(&replace, circuit.operands(gate_id)[0]);
                    gate_info[gate_id] = match constant_value(&gate_info, operand) {
                        Some(value) => GateInfo::new(constant_type(value), vec![]),
                        None => GateInfo::new(gate_type, vec![operand]),
                    };
                }
                GateType::Mux => {
                    reduce_mux(&circuit, gate_id, &mut replace, &mut gate_info);
                }
                GateType::And | GateType::Nand | GateType::Or | GateType::Nor => {
                    reduce_and_or(&circuit, gate_id, &mut replace, &mut gate_info);
                }
                GateType::Xor | GateType::Nxor => {
                    reduce_xor(&circuit, gate_id, &mut replace, &mut gate_info);
                }
            }
        }

        let outputs: Vec<GateId> = circuit
            .outputs()
            .iter()
            .map(|&output| resolve(&replace, output))
            .collect();

        // Outputs must not degenerate into constant gates: express the value
        // as a tautology/contradiction over the first input instead. Without
        // any input there is nothing to anchor on and the constant stays.
        let mut shared_not: Option<GateId> = None;
        for &output in &outputs {
            let Some(value) = constant_value(&gate_info, output) else {
                continue;
            };
            let Some(&anchor) = circuit.inputs().first() else {
                continue;
            };
            let not_id = match shared_not {
                Some(id) => id,
                None => {
                    let name =
                        format!("{}::const_anchor@{}", seed::unique_prefix(), encoder.size());
                    let id = encoder.encode(&name);
                    debug_assert_eq!(id, gate_info.len());
                    gate_info.push(GateInfo::new(GateType::Not, vec![anchor]));
                    shared_not = Some(id);
                    id
                }
            };
            let materialized = if value { GateType::Or } else { GateType::And };
            gate_info[output] = GateInfo::new(materialized, vec![anchor, not_id]);
        }

        log::debug!("END ConstantGateReducer");
        (Circuit::new(gate_info, outputs), encoder)
    }
}

fn constant_value(gate_info: &[GateInfo], gate_id: GateId) -> Option<bool> {
    match gate_info[gate_id].gate_type() {
        GateType::ConstTrue => Some(true),
        GateType::ConstFalse => Some(false),
        _ => None,
    }
}

fn constant_type(value: bool) -> GateType {
    if value {
        GateType::ConstTrue
    } else {
        GateType::ConstFalse
    }
}

fn reduce_mux(
    circuit: &Circuit,
    gate_id: GateId,
    replace: &mut Vec<GateId>,
    gate_info: &mut Vec<GateInfo>,
) {
    let operands = circuit.operands(gate_id);
    let sel = resolve(replace, operands[0]);
    let a = resolve(replace, operands[1]);
    let b = resolve(replace, operands[2]);

    let Some(sel_value) = constant_value(gate_info, sel) else {
        gate_info[gate_id] = GateInfo::new(GateType::Mux, vec![sel, a, b]);
        return;
    };
    let chosen = if sel_value { b } else { a };
    match constant_value(gate_info, chosen) {
        Some(value) => gate_info[gate_id] = GateInfo::new(constant_type(value), vec![]),
        None => {
            replace[gate_id] = chosen;
            gate_info[gate_id] = GateInfo::new(GateType::Iff, vec![chosen]);
        }
    }
}

fn reduce_and_or(
    circuit: &Circuit,
    gate_id: GateId,
    replace: &mut Vec<GateId>,
    gate_info: &mut Vec<GateInfo>,
) {
    let gate_type = circuit.gate_type(gate_id);
    let negated = matches!(gate_type, GateType::Nand | GateType::Nor);
    // TRUE is the identity of AND and FALSE absorbs it; dually for OR.
    let identity = matches!(gate_type, GateType::And | GateType::Nand);

    let mut kept: Vec<GateId> = Vec::new();
    let mut absorbed = false;
    for &operand in circuit.operands(gate_id) {
        let operand = resolve(replace, operand);
        match constant_value(gate_info, operand) {
            Some(value) if value == identity => {}
            Some(_) => absorbed = true,
            None => kept.push(operand),
        }
    }

    if absorbed {
        let value = !identity ^ negated;
        gate_info[gate_id] = GateInfo::new(constant_type(value), vec![]);
        return;
    }
    match kept.len() {
        0 => {
            // Every operand was the identity constant.
            let value = identity ^ negated;
            gate_info[gate_id] = GateInfo::new(constant_type(value), vec![]);
        }
        1 => {
            let survivor = kept[0];
            if negated {
                negation_of(gate_id, survivor, replace, gate_info);
            } else {
                replace[gate_id] = survivor;
                gate_info[gate_id] = GateInfo::new(GateType::Iff, vec![survivor]);
            }
        }
        _ => gate_info[gate_id] = GateInfo::new(gate_type, kept),
    }
}

fn reduce_xor(
    circuit: &Circuit,
    gate_id: GateId,
    replace: &mut Vec<GateId>,
    gate_info: &mut Vec<GateInfo>,
) {
    let mut parity = circuit.gate_type(gate_id) == GateType::Nxor;
    let mut kept: Vec<GateId> = Vec::new();
    for &operand in circuit.operands(gate_id) {
        let operand = resolve(replace, operand);
        match constant_value(gate_info, operand) {
            Some(true) => parity = !parity,
            Some(false) => {}
            None => kept.push(operand),
        }
    }

    match kept.len() {
        0 => gate_info[gate_id] = GateInfo::new(constant_type(parity), vec![]),
        1 => {
            let survivor = kept[0];
            if parity {
                negation_of(gate_id, survivor, replace, gate_info);
            } else {
                replace[gate_id] = survivor;
                gate_info[gate_id] = GateInfo::new(GateType::Iff, vec![survivor]);
            }
        }
        _ => {
            let gate_type = if parity { GateType::Nxor } else { GateType::Xor };
            gate_info[gate_id] = GateInfo::new(gate_type, kept);
        }
    }
}

/// The gate's value is `NOT(operand)`: resolve a double negation when the
/// operand is itself a `NOT`, otherwise rebuild the gate as one.
fn negation_of(
    gate_id: GateId,
    operand: GateId,
    replace: &mut [GateId],
    gate_info: &mut [GateInfo],
) {
    if gate_info[operand].gate_type() == GateType::Not {
        let target = gate_info[operand].operands()[0];
        replace[gate_id] = target;
        gate_info[gate_id] = GateInfo::new(GateType::Iff, vec![target]);
    } else {
        gate_info[gate_id] = GateInfo::new(GateType::Not, vec![operand]);
    }
}
