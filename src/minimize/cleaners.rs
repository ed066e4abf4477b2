//! The two cleanup passes the other rewrites lean on: reachability cleaning
//! and structural deduplication.

use hashbrown::HashMap;

use crate::algo::{self, VisitState};
use crate::circuit::{Circuit, GateInfo};
use crate::encoder::NameEncoder;
use crate::logic::{GateId, GateType};
use crate::minimize::Pass;

/// Removes every gate that is not reachable from the outputs, re-encoding the
/// survivors to dense ids while keeping their relative order.
///
/// This is the rename-and-compact pass: the other passes assume their input is
/// compact, and most of them leave orphans behind that a later cleaner drops.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedundantGatesCleaner {
    preserve_inputs: bool,
}

impl RedundantGatesCleaner {
    /// A cleaner that keeps all `INPUT` gates alive even when unreachable,
    /// for callers that rely on the circuit's input arity.
    #[must_use]
    pub fn preserving_inputs() -> Self {
        Self {
            preserve_inputs: true,
        }
    }
}

impl Pass for RedundantGatesCleaner {
    fn apply(&self, circuit: Circuit, encoder: NameEncoder) -> (Circuit, NameEncoder) {
        log::debug!("START RedundantGatesCleaner");

        let mask = algo::reach(&circuit, circuit.outputs());

        // First step: re-encode only the gates that survive, in ascending old
        // id order, so the new ids keep the old relative order.
        let mut new_encoder = NameEncoder::new();
        for gate_id in 0..circuit.num_gates() {
            let keep = mask[gate_id] == VisitState::Visited
                || (self.preserve_inputs && circuit.gate_type(gate_id) == GateType::Input);
            if keep {
                new_encoder.encode(encoder.decode(gate_id));
            } else {
                log::debug!(
                    "gate '{}' (#{gate_id}) is redundant and will be removed",
                    encoder.decode(gate_id)
                );
            }
        }

        // Second step: rebuild each surviving gate with re-encoded operands.
        // Operands of a reachable gate are reachable themselves, so every
        // encode below resolves to an id handed out in the first step.
        let mut gate_info = vec![GateInfo::default(); new_encoder.size()];
        for gate_id in 0..circuit.num_gates() {
            let name = encoder.decode(gate_id);
            if !new_encoder.key_exists(name) {
                continue;
            }
            let operands = circuit
                .operands(gate_id)
                .iter()
                .map(|&operand| new_encoder.encode(encoder.decode(operand)))
                .collect();
            let new_id = new_encoder.encode(name);
            gate_info[new_id] = GateInfo::new(circuit.gate_type(gate_id), operands);
        }

        // Third step: outputs were the DFS roots, so they all survived.
        let outputs = circuit
            .outputs()
            .iter()
            .map(|&output| new_encoder.encode(encoder.decode(output)))
            .collect();

        log::debug!("END RedundantGatesCleaner");
        (Circuit::new(gate_info, outputs), new_encoder)
    }
}

/// Collapses gates with an identical (type, operand list) key into a single
/// representative, redirecting users and outputs.
///
/// The walk is a post-order DFS from the outputs, so an operand is always
/// remapped before any gate referencing it and merges cascade in one sweep.
/// Surviving gates are re-encoded in that post-order; gates unreachable from
/// the outputs are dropped along the way.
#[derive(Debug, Clone, Copy)]
pub struct DuplicateGatesCleaner;

impl Pass for DuplicateGatesCleaner {
    fn apply(&self, circuit: Circuit, encoder: NameEncoder) -> (Circuit, NameEncoder) {
        log::debug!("START DuplicateGatesCleaner");

        let n = circuit.num_gates();
        let mut old_to_new: Vec<Option<GateId>> = vec![None; n];
        let mut new_gates: Vec<GateInfo> = Vec::with_capacity(n);
        let mut new_encoder = NameEncoder::new();
        let mut seen: HashMap<GateInfo, GateId> = HashMap::new();

        algo::depth_first_search(
            &circuit,
            circuit.outputs(),
            |_, _| {},
            |gate_id, _| {
                let operands = circuit
                    .operands(gate_id)
                    .iter()
                    .map(|&operand| old_to_new[operand].expect("operands precede users"))
                    .collect();
                let info = GateInfo::new(circuit.gate_type(gate_id), operands);

                // Inputs all share the empty key and must never merge.
                if circuit.gate_type(gate_id) != GateType::Input {
                    if let Some(&survivor) = seen.get(&info) {
                        log::debug!(
                            "gate '{}' (#{gate_id}) duplicates #{survivor}",
                            encoder.decode(gate_id)
                        );
                        old_to_new[gate_id] = Some(survivor);
                        return;
                    }
                }

                let new_id = new_gates.len();
                new_encoder.encode(encoder.decode(gate_id));
                if circuit.gate_type(gate_id) != GateType::Input {
                    seen.insert(info.clone(), new_id);
                }
                new_gates.push(info);
                old_to_new[gate_id] = Some(new_id);
            },
            || {},
            |_, _| {},
        );

        let outputs = circuit
            .outputs()
            .iter()
            .map(|&output| old_to_new[output].expect("outputs are DFS roots"))
            .collect();

        log::debug!("END DuplicateGatesCleaner");
        (Circuit::new(new_gates, outputs), new_encoder)
    }
}
