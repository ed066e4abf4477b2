//! Per-operator identities over repeated operands.

use hashbrown::HashSet;

use crate::algo;
use crate::circuit::{Circuit, GateInfo};
use crate::encoder::NameEncoder;
use crate::logic::{GateId, GateType};
use crate::minimize::{resolve, Pass};

/// Applies the idempotence and cancellation identities of each operator to its
/// operand multiset.
///
/// - `AND(x, .., x) = x` and `OR(x, .., x) = x`; the negated forms leave a
///   `NOT` (or resolve a double negation) instead.
/// - `XOR` removes pairs: identical operands cancel to nothing, an operand and
///   its `NOT` cancel to a parity flip. An empty multiset leaves a constant,
///   chosen by the parity.
/// - An `AND`/`OR` whose operands contain both `x` and `NOT(x)` becomes the
///   corresponding constant.
///
/// Gates collapsing to a single operand are bypassed through a replacement
/// map, bottom-up, so the effect cascades in one sweep. Constants exposed here
/// are left for `ConstantGateReducer`, and the bypassed orphans for the
/// cleaners; see the canonical recipe.
#[derive(Debug, Clone, Copy)]
pub struct DuplicateOperandsCleaner;

impl Pass for DuplicateOperandsCleaner {
    fn apply(&self, circuit: Circuit, encoder: NameEncoder) -> (Circuit, NameEncoder) {
        log::debug!("START DuplicateOperandsCleaner");

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
                    if gate_info[operand].gate_type() == GateType::Not {
                        // NOT over NOT: skip both.
                        let target = gate_info[operand].operands()[0];
                        replace[gate_id] = target;
                        gate_info[gate_id] = GateInfo::new(GateType::Iff, vec![target]);
                    } else {
                        gate_info[gate_id] = GateInfo::new(GateType::Not, vec![operand]);
                    }
                }
                GateType::Iff | GateType::Buff | GateType::Mux => {
                    let operands = circuit
                        .operands(gate_id)
                        .iter()
                        .map(|&operand| resolve(&replace, operand))
                        .collect();
                    gate_info[gate_id] = GateInfo::new(gate_type, operands);
                }
                GateType::And | GateType::Nand | GateType::Or | GateType::Nor => {
                    reduce_and_or(&circuit, gate_id, &mut replace, &mut gate_info);
                }
                GateType::Xor | GateType::Nxor => {
                    reduce_xor(&circuit, gate_id, &mut replace, &mut gate_info);
                }
            }
        }

        let outputs = circuit
            .outputs()
            .iter()
            .map(|&output| resolve(&replace, output))
            .collect();

        log::debug!("END DuplicateOperandsCleaner");
        (Circuit::new(gate_info, outputs), encoder)
    }
}

/// Collapse of a gate whose reduced form is `NOT(x)`: resolves the double
/// negation through an operand that is itself a `NOT`, otherwise rebuilds the
/// gate as a plain `NOT`.
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

fn reduce_and_or(
    circuit: &Circuit,
    gate_id: GateId,
    replace: &mut Vec<GateId>,
    gate_info: &mut Vec<GateInfo>,
) {
    let gate_type = circuit.gate_type(gate_id);
    let negated = matches!(gate_type, GateType::Nand | GateType::Nor);
    let base_is_and = matches!(gate_type, GateType::And | GateType::Nand);

    let resolved: Vec<GateId> = circuit
        .operands(gate_id)
        .iter()
        .map(|&operand| resolve(replace, operand))
        .collect();

    // x together with NOT(x) pins the whole gate to a constant.
    let members: HashSet<GateId> = resolved.iter().copied().collect();
    let contradictory = resolved.iter().any(|&operand| {
        gate_info[operand].gate_type() == GateType::Not
            && members.contains(&gate_info[operand].operands()[0])
    });
    if contradictory {
        let value = !base_is_and ^ negated;
        gate_info[gate_id] = GateInfo::new(constant_type(value), vec![]);
        return;
    }

    let mut operands = resolved;
    operands.sort_unstable();
    operands.dedup();

    if operands.len() == 1 {
        let survivor = operands[0];
        if negated {
            negation_of(gate_id, survivor, replace, gate_info);
        } else {
            replace[gate_id] = survivor;
            gate_info[gate_id] = GateInfo::new(GateType::Iff, vec![survivor]);
        }
    } else {
        gate_info[gate_id] = GateInfo::new(gate_type, operands);
    }
}

fn reduce_xor(
    circuit: &Circuit,
    gate_id: GateId,
    replace: &mut Vec<GateId>,
    gate_info: &mut Vec<GateInfo>,
) {
    let negated = circuit.gate_type(gate_id) == GateType::Nxor;
    let mut parity = negated;

    // First cancel x against NOT(x) on the raw operand list: each such pair
    // evaluates to TRUE, i.e. one parity flip.
    let mut operands: Vec<GateId> = circuit.operands(gate_id).to_vec();
    let mut index = 0;
    while index < operands.len() {
        let candidate = operands[index];
        let mut cancelled = false;
        if gate_info[candidate].gate_type() == GateType::Not {
            let inverted = gate_info[candidate].operands()[0];
            if let Some(partner) = operands.iter().position(|&o| o == inverted) {
                let (high, low) = if index > partner {
                    (index, partner)
                } else {
                    (partner, index)
                };
                operands.remove(high);
                operands.remove(low);
                parity = !parity;
                cancelled = true;
            }
        }
        if cancelled {
            index = 0;
        } else {
            index += 1;
        }
    }

    // Then cancel identical operands pairwise (x XOR x = FALSE).
    let mut resolved: Vec<GateId> = operands
        .into_iter()
        .map(|operand| resolve(replace, operand))
        .collect();
    resolved.sort_unstable();
    let mut kept: Vec<GateId> = Vec::with_capacity(resolved.len());
    for operand in resolved {
        if kept.last() == Some(&operand) {
            kept.pop();
        } else {
            kept.push(operand);
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

fn constant_type(value: bool) -> GateType {
    if value {
        GateType::ConstTrue
    } else {
        GateType::ConstFalse
    }
}
