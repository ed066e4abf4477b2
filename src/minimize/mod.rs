//! Semantics-preserving rewrite passes and the combinators composing them.
//!
//! Every pass consumes a `(Circuit, NameEncoder)` pair and produces a new one
//! with the same observable behavior: for every total input assignment, the
//! states at corresponding outputs are identical. Passes interact; most of
//! them assume dense ids on entry or leave orphans behind, so the recipes in
//! [`recipes`] wire each pass together with the cleanups it relies on.

mod cleaners;
mod constant_reducer;
mod de_morgan;
mod duplicate_operands;
mod not_chains;
mod symmetric;

pub use cleaners::{DuplicateGatesCleaner, RedundantGatesCleaner};
pub use constant_reducer::ConstantGateReducer;
pub use de_morgan::DeMorgan;
pub use duplicate_operands::DuplicateOperandsCleaner;
pub use not_chains::{MergeNotWithOthers, ReduceNotComposition, SplitNotFromOthers};
pub use symmetric::{ConnectSymmetricalGates, DisconnectSymmetricalGates};

use crate::circuit::Circuit;
use crate::encoder::NameEncoder;
use crate::logic::GateId;

/// A circuit transformer.
///
/// A pass takes sole ownership of its input pair and yields sole ownership of
/// the result; no two passes ever hold live references to the same circuit.
pub trait Pass {
    fn apply(&self, circuit: Circuit, encoder: NameEncoder) -> (Circuit, NameEncoder);
}

/// Sequential application of passes, left to right.
#[derive(Default)]
pub struct Pipeline {
    passes: Vec<Box<dyn Pass>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("passes", &self.passes.len())
            .finish()
    }
}

impl Pipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pass (or a whole sub-pipeline) to the sequence.
    #[must_use]
    pub fn then(mut self, pass: impl Pass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }
}

impl Pass for Pipeline {
    fn apply(&self, circuit: Circuit, encoder: NameEncoder) -> (Circuit, NameEncoder) {
        self.passes
            .iter()
            .fold((circuit, encoder), |(c, e), pass| pass.apply(c, e))
    }
}

/// Fixed-iteration repetition of a pipeline.
///
/// Convergence is not guaranteed; the repeat count is a user choice.
pub struct Nest {
    times: usize,
    body: Pipeline,
}

impl Nest {
    #[must_use]
    pub fn new(times: usize, body: Pipeline) -> Self {
        Self { times, body }
    }
}

impl Pass for Nest {
    fn apply(&self, circuit: Circuit, encoder: NameEncoder) -> (Circuit, NameEncoder) {
        let mut pair = (circuit, encoder);
        for _ in 0..self.times {
            pair = self.body.apply(pair.0, pair.1);
        }
        pair
    }
}

/// Follows a replacement chain down to its final target.
///
/// Passes that collapse gates record `gate -> survivor` links in a map that is
/// the identity everywhere else; chains arise when a survivor later collapses
/// itself.
pub(crate) fn resolve(replace: &[GateId], mut gate: GateId) -> GateId {
    while replace[gate] != gate {
        gate = replace[gate];
    }
    gate
}

/// The canonical named pipelines.
///
/// These are the recommended recipes; they encode the neighboring-pass
/// contracts (which pass needs a cleanup before or after) so callers do not
/// have to know them.
pub mod recipes {
    use super::{
        ConnectSymmetricalGates, ConstantGateReducer, DeMorgan, DisconnectSymmetricalGates,
        DuplicateGatesCleaner, DuplicateOperandsCleaner, MergeNotWithOthers, Pipeline,
        RedundantGatesCleaner, ReduceNotComposition, SplitNotFromOthers,
    };
    use crate::error::Result;

    /// Drop every gate unreachable from the outputs.
    #[must_use]
    pub fn redundant_gates_cleaner() -> Pipeline {
        Pipeline::new().then(RedundantGatesCleaner::default())
    }

    /// Merge structurally identical gates.
    #[must_use]
    pub fn duplicate_gates_cleaner() -> Pipeline {
        Pipeline::new()
            .then(RedundantGatesCleaner::default())
            .then(DuplicateGatesCleaner)
    }

    /// Shorten `NOT` chains (`NOT(NOT(x)) => x`).
    #[must_use]
    pub fn reduce_not_composition() -> Pipeline {
        Pipeline::new()
            .then(ReduceNotComposition)
            .then(RedundantGatesCleaner::default())
    }

    /// Fold constant gates into their users.
    #[must_use]
    pub fn constant_gate_reducer() -> Pipeline {
        Pipeline::new()
            .then(ConstantGateReducer)
            .then(ReduceNotComposition)
            .then(RedundantGatesCleaner::default())
            .then(DuplicateGatesCleaner)
    }

    /// Apply per-operator identities over repeated operands, then clean up the
    /// constants this may expose.
    #[must_use]
    pub fn duplicate_operands_cleaner() -> Pipeline {
        Pipeline::new()
            .then(RedundantGatesCleaner::default())
            .then(DuplicateOperandsCleaner)
            .then(RedundantGatesCleaner::preserving_inputs())
            .then(ConstantGateReducer)
            .then(ReduceNotComposition)
            .then(RedundantGatesCleaner::default())
            .then(DuplicateGatesCleaner)
    }

    /// Fuse `NOT` into a neighboring symmetric operator.
    #[must_use]
    pub fn merge_not_with_others() -> Pipeline {
        Pipeline::new()
            .then(MergeNotWithOthers)
            .then(RedundantGatesCleaner::default())
    }

    /// Flatten nested symmetric gates of the enabled operators.
    #[must_use]
    pub fn connect_symmetrical_gates(and: bool, or: bool, xor: bool) -> Pipeline {
        Pipeline::new()
            .then(RedundantGatesCleaner::default())
            .then(ConnectSymmetricalGates::new(and, or, xor))
            .then(RedundantGatesCleaner::default())
    }

    /// Refold wide symmetric gates of the enabled operators to `arity`.
    pub fn disconnect_symmetrical_gates(
        arity: usize,
        and: bool,
        or: bool,
        xor: bool,
    ) -> Result<Pipeline> {
        Ok(Pipeline::new()
            .then(RedundantGatesCleaner::default())
            .then(DisconnectSymmetricalGates::new(arity, and, or, xor)?))
    }

    /// Push `NOT` toward the inputs with De Morgan's laws.
    #[must_use]
    pub fn de_morgan() -> Pipeline {
        Pipeline::new()
            .then(RedundantGatesCleaner::default())
            .then(DuplicateGatesCleaner)
            .then(MergeNotWithOthers)
            .then(RedundantGatesCleaner::default())
            .then(DeMorgan)
            .then(ReduceNotComposition)
            .then(RedundantGatesCleaner::default())
    }

    /// Expand `NAND`/`NOR`/`NXOR` into `NOT` over the base operator.
    #[must_use]
    pub fn split_not_from_others() -> Pipeline {
        Pipeline::new().then(SplitNotFromOthers)
    }

    /// The recipe the CLI runs: collapse duplicates and constants, flatten
    /// symmetric regions, then fuse the remaining lone `NOT`s.
    #[must_use]
    pub fn default_pipeline() -> Pipeline {
        Pipeline::new()
            .then(duplicate_operands_cleaner())
            .then(connect_symmetrical_gates(true, true, true))
            .then(merge_not_with_others())
    }
}
