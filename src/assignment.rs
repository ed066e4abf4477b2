//! Mappings from gate ids to their current [`GateState`].

use crate::logic::{GateId, GateState};

/// A `GateId -> GateState` mapping backed by a plain vector.
///
/// Ids outside the stored range read as `Undefined`. The `DYNAMIC_RESIZE`
/// parameter chooses between the auto-growing variant (convenient for building
/// input assignments by hand) and the fixed-capacity variant the evaluator
/// uses internally (cheaper, and an out-of-range `assign` is a bug there).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VectorAssignment<const DYNAMIC_RESIZE: bool = true> {
    states: Vec<GateState>,
}

impl<const DYNAMIC_RESIZE: bool> VectorAssignment<DYNAMIC_RESIZE> {
    #[must_use]
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    /// An assignment pre-sized for gate ids `0..number_of_gates`.
    #[must_use]
    pub fn with_capacity(number_of_gates: usize) -> Self {
        Self {
            states: vec![GateState::Undefined; number_of_gates],
        }
    }

    pub fn assign(&mut self, gate_id: GateId, state: GateState) {
        if DYNAMIC_RESIZE {
            self.ensure_capacity(gate_id);
        }
        self.states[gate_id] = state;
    }

    /// `Undefined` when the id was never assigned.
    #[must_use]
    pub fn state(&self, gate_id: GateId) -> GateState {
        self.states
            .get(gate_id)
            .copied()
            .unwrap_or(GateState::Undefined)
    }

    #[must_use]
    pub fn is_defined(&self, gate_id: GateId) -> bool {
        self.state(gate_id).is_defined()
    }

    #[must_use]
    pub fn is_undefined(&self, gate_id: GateId) -> bool {
        !self.is_defined(gate_id)
    }

    /// Drops all assignments; everything reads as `Undefined` again.
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Grows the backing vector so `gate_id` is addressable.
    pub fn ensure_capacity(&mut self, gate_id: GateId) {
        if self.states.len() <= gate_id {
            self.states.resize(gate_id + 1, GateState::Undefined);
        }
    }
}
