//! The four-valued logic lattice carried by wires and pins.
//!
//! Values resolve on a wire with [`LogicState::resolve`]: `HighZ` is the
//! identity, `Undefined` absorbs everything, and two different driven values
//! collapse to `Undefined`. Gate operators treat any non-driven operand as
//! poison.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::status::ErrorCode;

/// Per-bit state of a wire or pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum LogicState {
    /// Not driven.
    #[default]
    HighZ = 0,
    /// Conflicting or unknown.
    Undefined = 1,
    Logic0 = 2,
    Logic1 = 3,
}

impl LogicState {
    /// Decode a raw boundary value.
    pub fn from_raw(raw: u32) -> Result<Self, ErrorCode> {
        match raw {
            0 => Ok(LogicState::HighZ),
            1 => Ok(LogicState::Undefined),
            2 => Ok(LogicState::Logic0),
            3 => Ok(LogicState::Logic1),
            _ => Err(ErrorCode::InvalidLogicState),
        }
    }

    /// Raw boundary value.
    pub fn raw(self) -> u32 {
        self as u32
    }

    pub fn from_bool(value: bool) -> Self {
        if value {
            LogicState::Logic1
        } else {
            LogicState::Logic0
        }
    }

    /// `Some` only for `Logic0`/`Logic1`.
    pub fn to_bool(self) -> Option<bool> {
        match self {
            LogicState::Logic0 => Some(false),
            LogicState::Logic1 => Some(true),
            LogicState::HighZ | LogicState::Undefined => None,
        }
    }

    /// Whether this is a strong `Logic0`/`Logic1` value.
    pub fn is_driven(self) -> bool {
        matches!(self, LogicState::Logic0 | LogicState::Logic1)
    }

    /// Join two values asserted onto the same wire bit.
    pub fn resolve(self, other: LogicState) -> LogicState {
        match (self, other) {
            (LogicState::HighZ, x) | (x, LogicState::HighZ) => x,
            (LogicState::Undefined, _) | (_, LogicState::Undefined) => LogicState::Undefined,
            (a, b) if a == b => a,
            _ => LogicState::Undefined,
        }
    }

    /// Resolve every asserted value of a wire; no drivers reads as `HighZ`.
    pub fn resolve_all<I>(values: I) -> LogicState
    where
        I: IntoIterator<Item = LogicState>,
    {
        values
            .into_iter()
            .fold(LogicState::HighZ, LogicState::resolve)
    }

    /// Apply a two-valued operator, poisoning on non-driven operands.
    pub fn lift2(self, other: LogicState, op: impl Fn(bool, bool) -> bool) -> LogicState {
        match (self.to_bool(), other.to_bool()) {
            (Some(a), Some(b)) => LogicState::from_bool(op(a, b)),
            _ => LogicState::Undefined,
        }
    }

    /// Logical complement, poisoning on non-driven operands.
    pub fn not(self) -> LogicState {
        match self.to_bool() {
            Some(v) => LogicState::from_bool(!v),
            None => LogicState::Undefined,
        }
    }
}

impl fmt::Display for LogicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            LogicState::HighZ => "Z",
            LogicState::Undefined => "X",
            LogicState::Logic0 => "0",
            LogicState::Logic1 => "1",
        })
    }
}

impl FromStr for LogicState {
    type Err = ErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Z" | "z" => Ok(LogicState::HighZ),
            "X" | "x" => Ok(LogicState::Undefined),
            "0" => Ok(LogicState::Logic0),
            "1" => Ok(LogicState::Logic1),
            _ => Err(ErrorCode::InvalidLogicState),
        }
    }
}
