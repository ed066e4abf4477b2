//! Flattening and re-folding of symmetric gate regions.

use std::collections::VecDeque;

use hashbrown::HashMap;
use snafu::ensure;

use crate::algo;
use crate::circuit::{Circuit, GateInfo};
use crate::encoder::NameEncoder;
use crate::error::{ConfigSnafu, Result};
use crate::logic::{GateId, GateType};
use crate::minimize::Pass;
use crate::seed;

/// Per-gate bookkeeping for the flattening frontier.
#[derive(Debug, Clone, Copy)]
struct VisitCounter {
    /// The flattening root that last touched this gate.
    root: GateId,
    /// How many operand edges into this gate the current walk has seen.
    counter: usize,
}

impl Default for VisitCounter {
    fn default() -> Self {
        Self {
            root: usize::MAX,
            counter: 0,
        }
    }
}

/// Removes nesting of the enabled symmetric operators:
/// `AND(AND(0, 1), 2) => AND(0, 1, 2)`.
///
/// A nested gate is absorbed only when it has the same operator, is not an
/// output, and every one of its users lies inside the current flattening
/// frontier; absorbing it otherwise would force duplicating its subtree.
/// For `AND`/`OR` an absorbed region contributes each originating operand
/// once; for `XOR` once per path, preserving parity. Needs a cleaner right
/// before and right after (see the canonical recipe).
#[derive(Debug, Clone, Copy)]
pub struct ConnectSymmetricalGates {
    and: bool,
    or: bool,
    xor: bool,
}

impl ConnectSymmetricalGates {
    #[must_use]
    pub fn new(and: bool, or: bool, xor: bool) -> Self {
        Self { and, or, xor }
    }

    fn enabled(&self, gate_type: GateType) -> bool {
        match gate_type {
            GateType::And => self.and,
            GateType::Or => self.or,
            GateType::Xor => self.xor,
            _ => false,
        }
    }

    /// Collects the flattened operand list of `root` via BFS over the region
    /// of same-operator gates, marking absorbed gates in `visit_mask`.
    fn flatten(
        circuit: &Circuit,
        visit_mask: &mut [bool],
        counters: &mut [VisitCounter],
        root: GateId,
    ) -> Vec<GateId> {
        let is_xor = circuit.gate_type(root) == GateType::Xor;

        let mut new_operands: Vec<GateId> = Vec::new();
        let mut undecided: Vec<GateId> = Vec::new();
        // Paths from the root into each gate of the region; XOR needs the
        // multiplicity, AND/OR only care that it is nonzero.
        let mut takes: HashMap<GateId, usize> = HashMap::new();
        takes.insert(root, 1);

        let mut queue = VecDeque::new();
        queue.push_back(root);
        while let Some(current) = queue.pop_front() {
            visit_mask[current] = true;
            let current_takes = takes.get(&current).copied().unwrap_or(0);

            for &operand in circuit.operands(current) {
                if counters[operand].counter == 0 {
                    counters[operand].root = root;
                }
                counters[operand].counter += 1;

                let same_operator = circuit.gate_type(current) == circuit.gate_type(operand);
                let in_this_walk = counters[operand].root == root;
                if same_operator
                    && in_this_walk
                    && counters[operand].counter == circuit.users(operand).len()
                    && !circuit.is_output(operand)
                {
                    // Every user accounted for: absorb the gate, take its
                    // operands instead.
                    queue.push_back(operand);
                    *takes.entry(operand).or_insert(0) += current_takes;
                } else if !same_operator || !in_this_walk || circuit.is_output(operand) {
                    // Definitely kept as a direct operand.
                    if is_xor {
                        for _ in 0..current_takes {
                            new_operands.push(operand);
                        }
                    } else {
                        new_operands.push(operand);
                    }
                } else {
                    // Same operator but users still unaccounted for. If the
                    // walk later reaches them all, the gate gets absorbed
                    // above; otherwise it is taken as an operand after the
                    // walk.
                    undecided.push(operand);
                    *takes.entry(operand).or_insert(0) += current_takes;
                }
            }
        }

        for operand in undecided {
            if counters[operand].counter == circuit.users(operand).len() {
                continue; // absorbed after all
            }
            if is_xor {
                let operand_takes = takes.entry(operand).or_insert(0);
                while *operand_takes > 0 {
                    new_operands.push(operand);
                    *operand_takes -= 1;
                }
            } else if takes.get(&operand).copied().unwrap_or(0) != 0 {
                new_operands.push(operand);
                takes.insert(operand, 0);
            }
        }

        new_operands
    }
}

impl Pass for ConnectSymmetricalGates {
    fn apply(&self, circuit: Circuit, encoder: NameEncoder) -> (Circuit, NameEncoder) {
        log::debug!("START ConnectSymmetricalGates");

        let n = circuit.num_gates();
        let mut gate_info = vec![GateInfo::default(); n];
        let mut visit_mask = vec![false; n];
        let mut counters = vec![VisitCounter::default(); n];

        // Outputs toward inputs, so a region is flattened from its top gate.
        for gate_id in algo::top_sort(&circuit) {
            // Gates absorbed into an earlier region are gone already.
            if visit_mask[gate_id] {
                continue;
            }
            visit_mask[gate_id] = true;

            if self.enabled(circuit.gate_type(gate_id)) {
                let operands =
                    Self::flatten(&circuit, &mut visit_mask, &mut counters, gate_id);
                gate_info[gate_id] = GateInfo::new(circuit.gate_type(gate_id), operands);
            } else {
                gate_info[gate_id] = GateInfo::new(
                    circuit.gate_type(gate_id),
                    circuit.operands(gate_id).to_vec(),
                );
            }
        }

        let outputs = circuit.outputs().to_vec();
        log::debug!("END ConnectSymmetricalGates");
        (Circuit::new(gate_info, outputs), encoder)
    }
}

/// Separates wide gates of the enabled symmetric operators into a left-leaning
/// tree of gates with at most `arity` operands:
/// `arity = 2: AND(0, 1, 2) => AND(AND(0, 1), 2)`.
///
/// Sound because the enabled operators are associative. Fresh intermediate
/// gates receive freshly-minted encoder names. Needs a cleaner right before.
#[derive(Debug, Clone, Copy)]
pub struct DisconnectSymmetricalGates {
    arity: usize,
    and: bool,
    or: bool,
    xor: bool,
}

impl DisconnectSymmetricalGates {
    /// Fails with a configuration error when `arity < 2` (an arity-1 refold
    /// can not terminate).
    pub fn new(arity: usize, and: bool, or: bool, xor: bool) -> Result<Self> {
        ensure!(
            arity >= 2,
            ConfigSnafu {
                detail: format!("DisconnectSymmetricalGates needs arity >= 2, got {arity}"),
            }
        );
        Ok(Self {
            arity,
            and,
            or,
            xor,
        })
    }

    fn enabled(&self, gate_type: GateType) -> bool {
        match gate_type {
            GateType::And => self.and,
            GateType::Or => self.or,
            GateType::Xor => self.xor,
            _ => false,
        }
    }
}

impl Pass for DisconnectSymmetricalGates {
    fn apply(&self, circuit: Circuit, mut encoder: NameEncoder) -> (Circuit, NameEncoder) {
        log::debug!("START DisconnectSymmetricalGates");

        let n = circuit.num_gates();
        let mut gate_info = vec![GateInfo::default(); n];
        let prefix = seed::unique_prefix();

        let order = algo::top_sort(&circuit);
        for &gate_id in order.iter().rev() {
            let gate_type = circuit.gate_type(gate_id);
            let operands = circuit.operands(gate_id);
            if operands.len() <= self.arity || !self.enabled(gate_type) {
                gate_info[gate_id] = GateInfo::new(gate_type, operands.to_vec());
                continue;
            }

            // Fold operands left to right, spilling a fresh gate every time
            // the accumulator fills up; the spilled gate becomes the first
            // operand of the next chunk.
            let mut accumulator: Vec<GateId> = Vec::with_capacity(self.arity);
            for &operand in &operands[..operands.len() - 1] {
                accumulator.push(operand);
                if accumulator.len() == self.arity {
                    let name = format!("{prefix}::chunk@{}", encoder.size());
                    let fresh = encoder.encode(&name);
                    debug_assert_eq!(fresh, gate_info.len());
                    gate_info.push(GateInfo::new(gate_type, std::mem::take(&mut accumulator)));
                    accumulator.push(fresh);
                }
            }
            accumulator.push(operands[operands.len() - 1]);
            gate_info[gate_id] = GateInfo::new(gate_type, accumulator);
        }

        let outputs = circuit.outputs().to_vec();
        log::debug!("END DisconnectSymmetricalGates");
        (Circuit::new(gate_info, outputs), encoder)
    }
}
