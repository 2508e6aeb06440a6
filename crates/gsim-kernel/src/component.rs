//! Component configuration: what kind of gate to instantiate and its shape.
//!
//! The raw boundary encodes a component as a (kind, sub-kind) pair whose
//! sub-kind numbering restarts for every kind. Here the pairing is a tagged
//! union, so only valid pairs can be expressed; [`ComponentKind::from_raw`]
//! is the single place raw pairs are checked.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::logic::LogicState;
use crate::status::{ErrorCode, Result};

/// Raw kind discriminants.
pub const KIND_CONSTANT: u32 = 0;
pub const KIND_UNARY: u32 = 1;
pub const KIND_BINARY: u32 = 2;

/// Constant drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstantKind {
    PullDown,
    PullUp,
}

impl ConstantKind {
    /// Value asserted on every output bit.
    pub fn value(self) -> LogicState {
        match self {
            ConstantKind::PullDown => LogicState::Logic0,
            ConstantKind::PullUp => LogicState::Logic1,
        }
    }
}

/// Single-operand gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryKind {
    Not,
}

/// Multi-operand gates folded over all inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryKind {
    And,
    Nand,
    Or,
    Nor,
    Xor,
    Xnor,
}

impl BinaryKind {
    pub const ALL: [BinaryKind; 6] = [
        BinaryKind::And,
        BinaryKind::Nand,
        BinaryKind::Or,
        BinaryKind::Nor,
        BinaryKind::Xor,
        BinaryKind::Xnor,
    ];

    /// The underlying associative operator.
    fn apply(self, a: bool, b: bool) -> bool {
        match self {
            BinaryKind::And | BinaryKind::Nand => a && b,
            BinaryKind::Or | BinaryKind::Nor => a || b,
            BinaryKind::Xor | BinaryKind::Xnor => a ^ b,
        }
    }

    fn inverted(self) -> bool {
        matches!(self, BinaryKind::Nand | BinaryKind::Nor | BinaryKind::Xnor)
    }

    /// Evaluate one output bit from the same bit of every operand.
    pub fn eval<I>(self, operands: I) -> LogicState
    where
        I: IntoIterator<Item = LogicState>,
    {
        let mut operands = operands.into_iter();
        let first = match operands.next().and_then(LogicState::to_bool) {
            Some(value) => LogicState::from_bool(value),
            None => return LogicState::Undefined,
        };
        let folded = operands.fold(first, |acc, x| acc.lift2(x, |a, b| self.apply(a, b)));
        if self.inverted() {
            folded.not()
        } else {
            folded
        }
    }
}

/// Kind of a component together with the operation valid for that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Constant(ConstantKind),
    Unary(UnaryKind),
    Binary(BinaryKind),
}

impl ComponentKind {
    /// Decode a raw (kind, sub-kind) pair.
    pub fn from_raw(kind: u32, sub_kind: u32) -> Result<Self> {
        let decoded = match (kind, sub_kind) {
            (KIND_CONSTANT, 0) => ComponentKind::Constant(ConstantKind::PullDown),
            (KIND_CONSTANT, 1) => ComponentKind::Constant(ConstantKind::PullUp),
            (KIND_UNARY, 0) => ComponentKind::Unary(UnaryKind::Not),
            (KIND_BINARY, 0) => ComponentKind::Binary(BinaryKind::And),
            (KIND_BINARY, 1) => ComponentKind::Binary(BinaryKind::Nand),
            (KIND_BINARY, 2) => ComponentKind::Binary(BinaryKind::Or),
            (KIND_BINARY, 3) => ComponentKind::Binary(BinaryKind::Nor),
            (KIND_BINARY, 4) => ComponentKind::Binary(BinaryKind::Xor),
            (KIND_BINARY, 5) => ComponentKind::Binary(BinaryKind::Xnor),
            _ => return Err(ErrorCode::InvalidComponentConfiguration),
        };
        Ok(decoded)
    }

    /// Raw (kind, sub-kind) pair.
    pub fn raw(self) -> (u32, u32) {
        match self {
            ComponentKind::Constant(c) => (KIND_CONSTANT, c as u32),
            ComponentKind::Unary(u) => (KIND_UNARY, u as u32),
            ComponentKind::Binary(b) => (KIND_BINARY, b as u32),
        }
    }

    /// Whether `input_count` operands are acceptable for this kind.
    pub fn accepts_input_count(self, input_count: u32) -> bool {
        match self {
            ComponentKind::Constant(_) => input_count == 0,
            ComponentKind::Unary(_) => input_count == 1,
            ComponentKind::Binary(_) => input_count >= 2,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Constant(c) => write!(f, "Constant({c:?})"),
            ComponentKind::Unary(u) => write!(f, "Unary({u:?})"),
            ComponentKind::Binary(b) => write!(f, "Binary({b:?})"),
        }
    }
}

/// Description of a component to instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentCreateInfo {
    pub kind: ComponentKind,
    /// Bits per input slot and per output.
    pub width: u32,
    /// Number of input slots.
    pub input_count: u32,
}

impl ComponentCreateInfo {
    pub fn new(kind: ComponentKind, width: u32, input_count: u32) -> Self {
        Self {
            kind,
            width,
            input_count,
        }
    }

    pub fn constant(kind: ConstantKind, width: u32) -> Self {
        Self::new(ComponentKind::Constant(kind), width, 0)
    }

    pub fn not(width: u32) -> Self {
        Self::new(ComponentKind::Unary(UnaryKind::Not), width, 1)
    }

    pub fn binary(kind: BinaryKind, width: u32, input_count: u32) -> Self {
        Self::new(ComponentKind::Binary(kind), width, input_count)
    }

    /// Decode a raw boundary description.
    pub fn from_raw(kind: u32, sub_kind: u32, width: u32, input_count: u32) -> Result<Self> {
        let info = Self::new(ComponentKind::from_raw(kind, sub_kind)?, width, input_count);
        info.validate()?;
        Ok(info)
    }

    /// Check Width and InputCount against the kind.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || !self.kind.accepts_input_count(self.input_count) {
            return Err(ErrorCode::InvalidComponentConfiguration);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LogicState::{HighZ, Logic0, Logic1, Undefined};

    #[test]
    fn overlapping_sub_kinds_decode_per_kind() {
        assert_eq!(
            ComponentKind::from_raw(KIND_CONSTANT, 1).unwrap(),
            ComponentKind::Constant(ConstantKind::PullUp)
        );
        assert_eq!(
            ComponentKind::from_raw(KIND_BINARY, 1).unwrap(),
            ComponentKind::Binary(BinaryKind::Nand)
        );
    }

    #[test]
    fn mismatched_pairs_are_rejected() {
        assert_eq!(
            ComponentKind::from_raw(KIND_UNARY, 1),
            Err(ErrorCode::InvalidComponentConfiguration)
        );
        assert_eq!(
            ComponentKind::from_raw(KIND_CONSTANT, 2),
            Err(ErrorCode::InvalidComponentConfiguration)
        );
        assert_eq!(
            ComponentKind::from_raw(7, 0),
            Err(ErrorCode::InvalidComponentConfiguration)
        );
    }

    #[test]
    fn raw_pairs_survive_decoding() {
        for kind in BinaryKind::ALL {
            let k = ComponentKind::Binary(kind);
            let (raw_kind, raw_sub) = k.raw();
            assert_eq!(ComponentKind::from_raw(raw_kind, raw_sub).unwrap(), k);
        }
    }

    #[test]
    fn input_count_rules() {
        assert!(ComponentCreateInfo::constant(ConstantKind::PullUp, 1).validate().is_ok());
        assert!(ComponentCreateInfo::not(4).validate().is_ok());
        assert!(ComponentCreateInfo::binary(BinaryKind::Or, 1, 3).validate().is_ok());

        let bad = [
            ComponentCreateInfo::binary(BinaryKind::And, 1, 1),
            ComponentCreateInfo::binary(BinaryKind::And, 0, 2),
            ComponentCreateInfo::new(ComponentKind::Unary(UnaryKind::Not), 1, 2),
            ComponentCreateInfo::new(ComponentKind::Constant(ConstantKind::PullDown), 1, 1),
        ];
        for info in bad {
            assert_eq!(info.validate(), Err(ErrorCode::InvalidComponentConfiguration));
        }
    }

    #[test]
    fn binary_truth_tables() {
        let cases = [
            (BinaryKind::And, [Logic0, Logic0, Logic0, Logic1]),
            (BinaryKind::Nand, [Logic1, Logic1, Logic1, Logic0]),
            (BinaryKind::Or, [Logic0, Logic1, Logic1, Logic1]),
            (BinaryKind::Nor, [Logic1, Logic0, Logic0, Logic0]),
            (BinaryKind::Xor, [Logic0, Logic1, Logic1, Logic0]),
            (BinaryKind::Xnor, [Logic1, Logic0, Logic0, Logic1]),
        ];
        for (kind, expected) in cases {
            for (row, want) in expected.iter().enumerate() {
                let a = LogicState::from_bool(row & 2 != 0);
                let b = LogicState::from_bool(row & 1 != 0);
                assert_eq!(kind.eval([a, b]), *want, "{kind:?} row {row}");
            }
        }
    }

    #[test]
    fn wide_fold_and_poison() {
        assert_eq!(BinaryKind::Xor.eval([Logic1, Logic1, Logic1]), Logic1);
        assert_eq!(BinaryKind::Nor.eval([Logic0, Logic0, Logic0]), Logic1);
        assert_eq!(BinaryKind::Or.eval([Logic1, HighZ]), Undefined);
        assert_eq!(BinaryKind::And.eval([Undefined, Logic0]), Undefined);
    }
}
