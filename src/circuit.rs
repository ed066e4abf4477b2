//! The circuit intermediate representation: an immutable DAG of gates keyed by
//! dense integer ids.

use crate::assignment::VectorAssignment;
use crate::logic::{op, GateId, GateState, GateType};

/// Non-structured description of one gate: its operator and operand list.
///
/// Invariant: when the type is symmetric the operands are sorted ascending,
/// which makes structural equality of gates cheap and canonical.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GateInfo {
    gate_type: GateType,
    operands: Vec<GateId>,
}

impl GateInfo {
    #[must_use]
    pub fn new(gate_type: GateType, mut operands: Vec<GateId>) -> Self {
        if gate_type.is_symmetric() {
            operands.sort_unstable();
        }
        Self {
            gate_type,
            operands,
        }
    }

    #[must_use]
    pub fn gate_type(&self) -> GateType {
        self.gate_type
    }

    #[must_use]
    pub fn operands(&self) -> &[GateId] {
        &self.operands
    }
}

impl Default for GateInfo {
    fn default() -> Self {
        Self {
            gate_type: GateType::Undefined,
            operands: Vec::new(),
        }
    }
}

/// An immutable combinational circuit.
///
/// Gates live in an arena indexed by `GateId`; the operand edges of a gate
/// point toward the inputs, and `users` carries the precomputed back-edges.
/// A `Circuit` is built once (by the parser, or by a rewrite pass building its
/// successor) and is read-only afterwards: passes are pure functions producing
/// fresh `Circuit` values rather than mutating in place.
#[derive(Debug, Clone)]
pub struct Circuit {
    gates: Vec<GateInfo>,
    users: Vec<Vec<GateId>>,
    inputs: Vec<GateId>,
    outputs: Vec<GateId>,
    output_mask: Vec<bool>,
}

impl Circuit {
    /// Builds a circuit from per-gate info and the ordered output list.
    ///
    /// `users(g)` is derived here by scanning every gate's operands in id
    /// order, so the order of a gate's users is the order in which referencing
    /// gates appear in `gate_info`. Panics on an out-of-range operand or
    /// output id; a malformed table is a caller bug.
    #[must_use]
    pub fn new(gate_info: Vec<GateInfo>, outputs: Vec<GateId>) -> Self {
        let n = gate_info.len();
        let mut users: Vec<Vec<GateId>> = vec![Vec::new(); n];
        for (id, info) in gate_info.iter().enumerate() {
            for &operand in info.operands() {
                assert!(
                    operand < n,
                    "gate {id} references operand {operand} outside of [0, {n})"
                );
                users[operand].push(id);
            }
        }

        let inputs = (0..n)
            .filter(|&id| gate_info[id].gate_type() == GateType::Input)
            .collect();

        let mut output_mask = vec![false; n];
        for &output in &outputs {
            assert!(output < n, "output {output} outside of [0, {n})");
            output_mask[output] = true;
        }

        Self {
            gates: gate_info,
            users,
            inputs,
            outputs,
            output_mask,
        }
    }

    #[must_use]
    pub fn gate_type(&self, gate_id: GateId) -> GateType {
        self.gates[gate_id].gate_type()
    }

    #[must_use]
    pub fn operands(&self, gate_id: GateId) -> &[GateId] {
        self.gates[gate_id].operands()
    }

    /// The gates that use `gate_id` as an operand, in discovery order.
    #[must_use]
    pub fn users(&self, gate_id: GateId) -> &[GateId] {
        &self.users[gate_id]
    }

    #[must_use]
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// Inputs are not counted as operator gates.
    #[must_use]
    pub fn num_operator_gates(&self) -> usize {
        self.gates.len() - self.inputs.len()
    }

    /// Every id of type `Input`, ascending.
    #[must_use]
    pub fn inputs(&self) -> &[GateId] {
        &self.inputs
    }

    /// The designated outputs, in declaration order (duplicates allowed).
    #[must_use]
    pub fn outputs(&self) -> &[GateId] {
        &self.outputs
    }

    #[must_use]
    pub fn is_output(&self, gate_id: GateId) -> bool {
        self.output_mask[gate_id]
    }

    /// Three-valued forward evaluation from a (partial) input assignment.
    ///
    /// Assigns every gate reachable from the outputs; unreachable gates stay
    /// `Undefined`. A gate of type `Input` (or any gate the input assignment
    /// explicitly defines) takes its value from `input`; every other gate
    /// applies its operator to the states of its operands. Deterministic and
    /// idempotent.
    #[must_use]
    pub fn evaluate<const D: bool>(&self, input: &VectorAssignment<D>) -> VectorAssignment<false> {
        let mut result = VectorAssignment::<false>::with_capacity(self.num_gates());
        let mut evaluated = vec![false; self.num_gates()];
        for &sink in &self.outputs {
            self.evaluate_gate(sink, input, &mut result, &mut evaluated);
        }
        result
    }

    fn evaluate_gate<const D: bool>(
        &self,
        root: GateId,
        input: &VectorAssignment<D>,
        result: &mut VectorAssignment<false>,
        evaluated: &mut [bool],
    ) {
        let mut stack = vec![root];
        while let Some(&gate) = stack.last() {
            if evaluated[gate] {
                stack.pop();
                continue;
            }

            // Inputs take their state from the given assignment, defaulting to
            // Undefined; a gate the assignment pins explicitly is also taken
            // as-is, without looking at its operands.
            if self.gate_type(gate) == GateType::Input || input.is_defined(gate) {
                result.assign(gate, input.state(gate));
                evaluated[gate] = true;
                stack.pop();
                continue;
            }

            let mut operands_ready = true;
            for &operand in self.operands(gate) {
                if !evaluated[operand] {
                    operands_ready = false;
                    stack.push(operand);
                }
            }
            if operands_ready {
                let states: Vec<GateState> = self
                    .operands(gate)
                    .iter()
                    .map(|&operand| {
                        if result.is_undefined(operand) {
                            input.state(operand)
                        } else {
                            result.state(operand)
                        }
                    })
                    .collect();
                result.assign(gate, op::nary_operator(self.gate_type(gate))(&states));
                evaluated[gate] = true;
                stack.pop();
            }
        }
    }
}
