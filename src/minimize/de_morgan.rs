//! Transport of `NOT` toward the inputs with De Morgan's laws.

use crate::algo;
use crate::circuit::{Circuit, GateInfo};
use crate::encoder::NameEncoder;
use crate::logic::{GateId, GateType};
use crate::minimize::Pass;
use crate::seed;

const NONE: GateId = usize::MAX;

/// Pushes negations toward the inputs:
/// `NOT(AND(x, y)) = OR(NOT(x), NOT(y))` and dually for `OR`; `NAND`/`NOR`
/// convert to the dual base operator over negated operands, `NXOR` under a
/// `NOT` folds to `XOR`.
///
/// A `NOT` over an `AND`/`OR` is first treated as *fictive*: the decision is
/// taken when the gate below it is processed, by counting how many of that
/// gate's users consumed the negated form (`count_branches`). Only when every
/// user did is the rewrite committed (the plain copy of the gate then dies as
/// an orphan); otherwise the `NOT` is materialized and both forms stay. A
/// negated operator whose users partly keep the negated form is rehung: its id
/// turns into `NOT` of the base gate.
///
/// Relies on the duplicate-gates cleaner and `MergeNotWithOthers` running
/// right before, so no gate carries more than one real `NOT` user; the
/// canonical recipe wires this up.
#[derive(Debug, Clone, Copy)]
pub struct DeMorgan;

impl DeMorgan {
    /// The id carrying `NOT(gate_id)`: a registered fictive `NOT`, an existing
    /// `NOT` user, or a freshly minted gate whose body is filled in when
    /// `gate_id` is processed.
    fn negation_id(
        circuit: &Circuit,
        gate_info: &mut Vec<GateInfo>,
        encoder: &mut NameEncoder,
        index_of_not: &mut [GateId],
        prefix: &str,
        gate_id: GateId,
    ) -> GateId {
        if index_of_not[gate_id] != NONE {
            return index_of_not[gate_id];
        }
        if let Some(&user) = circuit
            .users(gate_id)
            .iter()
            .find(|&&user| circuit.gate_type(user) == GateType::Not)
        {
            return user;
        }
        let name = format!("{prefix}::fictive_not@{}", encoder.size());
        let fresh = encoder.encode(&name);
        if gate_info.len() <= fresh {
            gate_info.resize(fresh + 1, GateInfo::default());
        }
        index_of_not[gate_id] = fresh;
        fresh
    }

    /// Negated images of `gate_id`'s operands, registering a branch count per
    /// operand.
    fn negated_operands(
        circuit: &Circuit,
        gate_info: &mut Vec<GateInfo>,
        encoder: &mut NameEncoder,
        index_of_not: &mut [GateId],
        count_branches: &mut [usize],
        prefix: &str,
        gate_id: GateId,
    ) -> Vec<GateId> {
        let mut negated = Vec::with_capacity(circuit.operands(gate_id).len());
        for &operand in circuit.operands(gate_id) {
            negated.push(Self::negation_id(
                circuit,
                gate_info,
                encoder,
                index_of_not,
                prefix,
                operand,
            ));
            count_branches[operand] += 1;
        }
        negated
    }
}

impl Pass for DeMorgan {
    fn apply(&self, circuit: Circuit, mut encoder: NameEncoder) -> (Circuit, NameEncoder) {
        log::debug!("START DeMorgan");

        let n = circuit.num_gates();
        let mut index_of_not: Vec<GateId> = vec![NONE; n];
        let mut count_branches: Vec<usize> = vec![0; n];
        let mut gate_info: Vec<GateInfo> = vec![GateInfo::default(); n];
        let prefix = seed::unique_prefix();

        for gate_id in algo::top_sort(&circuit) {
            let gate_type = circuit.gate_type(gate_id);
            let operands = circuit.operands(gate_id);

            if index_of_not[gate_id] != NONE {
                // A (fictive or real) NOT hangs over this gate.
                let not_id = index_of_not[gate_id];
                match gate_type {
                    GateType::And | GateType::Or => {
                        if count_branches[gate_id] != circuit.users(gate_id).len() {
                            // Some user keeps the plain form; committing would
                            // duplicate the subtree, so materialize the NOT.
                            gate_info[not_id] = GateInfo::new(GateType::Not, vec![gate_id]);
                        } else {
                            let dual = if gate_type == GateType::And {
                                GateType::Or
                            } else {
                                GateType::And
                            };
                            let negated = Self::negated_operands(
                                &circuit,
                                &mut gate_info,
                                &mut encoder,
                                &mut index_of_not,
                                &mut count_branches,
                                &prefix,
                                gate_id,
                            );
                            gate_info[not_id] = GateInfo::new(dual, negated);
                        }
                        gate_info[gate_id] = GateInfo::new(gate_type, operands.to_vec());
                    }
                    GateType::Nand | GateType::Nor | GateType::Nxor => {
                        // NOT over a negated operator is the base operator.
                        let base = gate_type
                            .strip_negation()
                            .expect("negated operator has a base form");
                        gate_info[not_id] = GateInfo::new(base, operands.to_vec());
                        if count_branches[gate_id] != circuit.users(gate_id).len() {
                            // Rehang: users keeping the negated form now go
                            // through NOT(base).
                            gate_info[gate_id] = GateInfo::new(GateType::Not, vec![not_id]);
                        } else {
                            gate_info[gate_id] = GateInfo::new(gate_type, operands.to_vec());
                        }
                    }
                    _ => {
                        gate_info[not_id] = GateInfo::new(GateType::Not, vec![gate_id]);
                        gate_info[gate_id] = GateInfo::new(gate_type, operands.to_vec());
                    }
                }
            } else if gate_type == GateType::Not
                && matches!(
                    circuit.gate_type(operands[0]),
                    GateType::And | GateType::Or
                )
            {
                // Treat this NOT as fictive for now; whether De Morgan applies
                // is decided once its operand is reached.
                index_of_not[operands[0]] = gate_id;
            } else if matches!(gate_type, GateType::Nand | GateType::Nor) {
                let dual = if gate_type == GateType::Nand {
                    GateType::Or
                } else {
                    GateType::And
                };
                let negated = Self::negated_operands(
                    &circuit,
                    &mut gate_info,
                    &mut encoder,
                    &mut index_of_not,
                    &mut count_branches,
                    &prefix,
                    gate_id,
                );
                gate_info[gate_id] = GateInfo::new(dual, negated);
            } else {
                gate_info[gate_id] = GateInfo::new(gate_type, operands.to_vec());
            }
        }

        let outputs = circuit.outputs().to_vec();
        log::debug!("END DeMorgan");
        (Circuit::new(gate_info, outputs), encoder)
    }
}
