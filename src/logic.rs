//! The value domain of the circuit model and the three-valued semantics of
//! every gate operator.

/// Internal gate ids are the numbers 0, 1, 2, ...
///
/// Ids are dense within one [`Circuit`](crate::Circuit) instance.
pub type GateId = usize;

/// One of the three states a gate can evaluate to.
///
/// `Undefined` means "not known (yet)"; it is a first-class value with its own
/// truth-table rows, NOT an error or a missing-value sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateState {
    False,
    True,
    Undefined,
}

impl GateState {
    #[must_use]
    pub fn is_defined(self) -> bool {
        self != GateState::Undefined
    }
}

impl From<bool> for GateState {
    fn from(value: bool) -> Self {
        if value {
            GateState::True
        } else {
            GateState::False
        }
    }
}

/// Every gate operator the circuit model supports.
///
/// `Undefined` is the placeholder a rebuilt gate table starts from; it never
/// survives into a valid circuit. `Buff` exists so the data model can name it,
/// but the bench parser normalizes `BUFF` to `Iff` (both are the identity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GateType {
    Input,
    Not,
    And,
    Nand,
    Or,
    Nor,
    Xor,
    Nxor,
    Iff,
    Buff,
    Mux,
    ConstFalse,
    ConstTrue,
    Undefined,
}

impl GateType {
    /// True for the operators whose operand order is immaterial.
    #[must_use]
    pub fn is_symmetric(self) -> bool {
        matches!(
            self,
            GateType::And
                | GateType::Nand
                | GateType::Or
                | GateType::Nor
                | GateType::Xor
                | GateType::Nxor
        )
    }

    #[must_use]
    pub fn is_constant(self) -> bool {
        matches!(self, GateType::ConstFalse | GateType::ConstTrue)
    }

    /// Toggles the negation of a symmetric operator (`And <-> Nand`, ...).
    ///
    /// Returns `None` for every other type; this is exactly the set of gates
    /// a neighboring `Not` can be fused into.
    #[must_use]
    pub fn toggled_negation(self) -> Option<GateType> {
        match self {
            GateType::And => Some(GateType::Nand),
            GateType::Nand => Some(GateType::And),
            GateType::Or => Some(GateType::Nor),
            GateType::Nor => Some(GateType::Or),
            GateType::Xor => Some(GateType::Nxor),
            GateType::Nxor => Some(GateType::Xor),
            _ => None,
        }
    }

    /// `Nand -> And`, `Nor -> Or`, `Nxor -> Xor`; `None` otherwise.
    #[must_use]
    pub fn strip_negation(self) -> Option<GateType> {
        match self {
            GateType::Nand => Some(GateType::And),
            GateType::Nor => Some(GateType::Or),
            GateType::Nxor => Some(GateType::Xor),
            _ => None,
        }
    }

    /// The operator keyword used by the bench text format.
    #[must_use]
    pub fn bench_name(self) -> &'static str {
        match self {
            GateType::Input => "INPUT",
            GateType::Not => "NOT",
            GateType::And => "AND",
            GateType::Nand => "NAND",
            GateType::Or => "OR",
            GateType::Nor => "NOR",
            GateType::Xor => "XOR",
            GateType::Nxor => "NXOR",
            GateType::Iff => "IFF",
            GateType::Buff => "BUFF",
            GateType::Mux => "MUX",
            GateType::ConstFalse => "CONST(0)",
            GateType::ConstTrue => "CONST(1)",
            GateType::Undefined => "UNDEFINED",
        }
    }
}

/// Scalar and N-ary evaluation of each operator over [`GateState`].
///
/// The N-ary form of an associative operator is the left-fold of its binary
/// form; [`nary_operator`](op::nary_operator) is the dispatch table the
/// evaluator uses and the single source of truth for gate semantics.
pub mod op {
    use super::GateState::{False, True, Undefined};
    use super::{GateState, GateType};

    pub fn not(x: GateState) -> GateState {
        match x {
            False => True,
            True => False,
            Undefined => Undefined,
        }
    }

    pub fn iff(x: GateState) -> GateState {
        x
    }

    /// `False` dominates; otherwise `Undefined` is contagious.
    pub fn and2(a: GateState, b: GateState) -> GateState {
        match (a, b) {
            (False, _) | (_, False) => False,
            (Undefined, _) | (_, Undefined) => Undefined,
            _ => True,
        }
    }

    /// `True` dominates; otherwise `Undefined` is contagious.
    pub fn or2(a: GateState, b: GateState) -> GateState {
        match (a, b) {
            (True, _) | (_, True) => True,
            (Undefined, _) | (_, Undefined) => Undefined,
            _ => False,
        }
    }

    /// `Undefined` is contagious; otherwise parity of `True` arguments.
    pub fn xor2(a: GateState, b: GateState) -> GateState {
        match (a, b) {
            (Undefined, _) | (_, Undefined) => Undefined,
            _ => GateState::from(a != b),
        }
    }

    /// `a` when the selector is `False`, `b` when `True`.
    pub fn mux(sel: GateState, a: GateState, b: GateState) -> GateState {
        match sel {
            False => a,
            True => b,
            Undefined => Undefined,
        }
    }

    pub fn and(args: &[GateState]) -> GateState {
        args.iter().copied().fold(True, and2)
    }

    pub fn or(args: &[GateState]) -> GateState {
        args.iter().copied().fold(False, or2)
    }

    pub fn xor(args: &[GateState]) -> GateState {
        args.iter().copied().fold(False, xor2)
    }

    pub fn nand(args: &[GateState]) -> GateState {
        not(and(args))
    }

    pub fn nor(args: &[GateState]) -> GateState {
        not(or(args))
    }

    pub fn nxor(args: &[GateState]) -> GateState {
        not(xor(args))
    }

    fn not_n(args: &[GateState]) -> GateState {
        not(args[0])
    }

    fn iff_n(args: &[GateState]) -> GateState {
        args[0]
    }

    fn mux_n(args: &[GateState]) -> GateState {
        mux(args[0], args[1], args[2])
    }

    fn const_false(_args: &[GateState]) -> GateState {
        False
    }

    fn const_true(_args: &[GateState]) -> GateState {
        True
    }

    /// An N-ary evaluator over a slice of operand states.
    pub type OperatorN = fn(&[GateState]) -> GateState;

    /// Dispatch table from operator tag to its N-ary evaluator.
    ///
    /// `Input`, `Buff` and `Undefined` are never dispatched: inputs take their
    /// value from the assignment, `BUFF` is normalized to `IFF` at parse time,
    /// and `Undefined` never appears in a valid circuit.
    pub fn nary_operator(gate_type: GateType) -> OperatorN {
        match gate_type {
            GateType::Not => not_n,
            GateType::And => and,
            GateType::Nand => nand,
            GateType::Or => or,
            GateType::Nor => nor,
            GateType::Xor => xor,
            GateType::Nxor => nxor,
            GateType::Iff => iff_n,
            GateType::Mux => mux_n,
            GateType::ConstFalse => const_false,
            GateType::ConstTrue => const_true,
            GateType::Input | GateType::Buff | GateType::Undefined => {
                panic!("gate type {gate_type:?} has no N-ary evaluator")
            }
        }
    }
}
