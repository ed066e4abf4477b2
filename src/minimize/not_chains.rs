//! Passes that move `NOT` gates around: chain shortening, fusion into
//! composite operators, and the inverse split.

use crate::algo;
use crate::circuit::{Circuit, GateInfo};
use crate::encoder::NameEncoder;
use crate::logic::{GateId, GateType};
use crate::minimize::Pass;
use crate::seed;

/// Rewires every operand edge that enters a `NOT` chain.
///
/// A chain of k `NOT`s collapses to its terminal when k is even, or to the
/// chain's deepest `NOT` over the terminal when k is odd (reusing that
/// existing gate rather than synthesizing one). The bypassed `NOT`s become
/// orphans; a cleaner is expected right after.
#[derive(Debug, Clone, Copy)]
pub struct ReduceNotComposition;

impl ReduceNotComposition {
    /// `gate` is a `NOT`; returns what an edge into it should point at.
    fn shortened(circuit: &Circuit, mut gate: GateId) -> GateId {
        let mut even = false;
        let mut below = circuit.operands(gate)[0];
        while circuit.gate_type(below) == GateType::Not {
            even = !even;
            gate = below;
            below = circuit.operands(gate)[0];
        }
        if even {
            below
        } else {
            gate
        }
    }
}

impl Pass for ReduceNotComposition {
    fn apply(&self, circuit: Circuit, encoder: NameEncoder) -> (Circuit, NameEncoder) {
        log::debug!("START ReduceNotComposition");

        let mut gate_info = Vec::with_capacity(circuit.num_gates());
        for gate_id in 0..circuit.num_gates() {
            let operands = circuit
                .operands(gate_id)
                .iter()
                .map(|&operand| {
                    if circuit.gate_type(operand) == GateType::Not {
                        Self::shortened(&circuit, operand)
                    } else {
                        operand
                    }
                })
                .collect();
            gate_info.push(GateInfo::new(circuit.gate_type(gate_id), operands));
        }
        let outputs = circuit.outputs().to_vec();

        log::debug!("END ReduceNotComposition");
        (Circuit::new(gate_info, outputs), encoder)
    }
}

/// Fuses a `NOT` with the symmetric operator below it.
///
/// `NOT(AND(..))` becomes `NAND(..)` (and every dual) when the operator gate
/// has no other user. A negated operator with several users is rehung instead:
/// it keeps its id but becomes `NOT` of the merged gate, so its other users
/// still see the same value. A cleaner is expected right after.
#[derive(Debug, Clone, Copy)]
pub struct MergeNotWithOthers;

impl Pass for MergeNotWithOthers {
    fn apply(&self, circuit: Circuit, encoder: NameEncoder) -> (Circuit, NameEncoder) {
        log::debug!("START MergeNotWithOthers");

        let n = circuit.num_gates();
        let mut visited = vec![false; n];
        let mut gate_info = vec![GateInfo::default(); n];

        for gate_id in algo::top_sort(&circuit) {
            // Some gates are rebuilt before their own turn comes.
            if visited[gate_id] {
                continue;
            }
            visited[gate_id] = true;

            let copy = GateInfo::new(
                circuit.gate_type(gate_id),
                circuit.operands(gate_id).to_vec(),
            );
            if circuit.gate_type(gate_id) != GateType::Not {
                gate_info[gate_id] = copy;
                continue;
            }
            let operand = circuit.operands(gate_id)[0];
            let operand_type = circuit.gate_type(operand);
            let Some(merged_type) = operand_type.toggled_negation() else {
                gate_info[gate_id] = copy;
                continue;
            };

            if circuit.users(operand).len() == 1 {
                // NOT + AND = NAND, NOT + NAND = AND, ...
                gate_info[gate_id] =
                    GateInfo::new(merged_type, circuit.operands(operand).to_vec());
            } else if operand_type.strip_negation().is_none() {
                // A base operator with other users stays; so does the NOT.
                gate_info[gate_id] = GateInfo::new(GateType::Not, vec![operand]);
            } else {
                // Negated operator with several users: rehang. Its users will
                // now see NOT(base), this gate becomes the base itself.
                gate_info[operand] = GateInfo::new(GateType::Not, vec![gate_id]);
                gate_info[gate_id] =
                    GateInfo::new(merged_type, circuit.operands(operand).to_vec());
                visited[operand] = true;
            }
        }

        let outputs = circuit.outputs().to_vec();
        log::debug!("END MergeNotWithOthers");
        (Circuit::new(gate_info, outputs), encoder)
    }
}

/// Expands every `NAND`/`NOR`/`NXOR` into `NOT` over a fresh base-operator
/// gate. The original id stays the `NOT`, so upstream references keep their
/// value; the fresh gate receives the original operand list.
#[derive(Debug, Clone, Copy)]
pub struct SplitNotFromOthers;

impl Pass for SplitNotFromOthers {
    fn apply(&self, circuit: Circuit, mut encoder: NameEncoder) -> (Circuit, NameEncoder) {
        log::debug!("START SplitNotFromOthers");

        let n = circuit.num_gates();
        let mut gate_info = vec![GateInfo::default(); n];
        let prefix = seed::unique_prefix();

        let order = algo::top_sort(&circuit);
        for &gate_id in order.iter().rev() {
            let Some(base) = circuit.gate_type(gate_id).strip_negation() else {
                // Operands are taken as-is: each either survived unchanged or
                // turned into the equivalent NOT under the same id.
                gate_info[gate_id] = GateInfo::new(
                    circuit.gate_type(gate_id),
                    circuit.operands(gate_id).to_vec(),
                );
                continue;
            };

            let name = format!("{prefix}::split_not@{}", encoder.size());
            let base_id = encoder.encode(&name);
            debug_assert_eq!(base_id, gate_info.len());
            gate_info.push(GateInfo::new(base, circuit.operands(gate_id).to_vec()));
            gate_info[gate_id] = GateInfo::new(GateType::Not, vec![base_id]);
        }

        let outputs = circuit.outputs().to_vec();
        log::debug!("END SplitNotFromOthers");
        (Circuit::new(gate_info, outputs), encoder)
    }
}
