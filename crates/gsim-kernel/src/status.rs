//! Status codes returned across the kernel boundary.
//!
//! Non-negative codes are informational, negative codes are failures. The
//! numeric values are stable so an out-of-process kernel can report them
//! verbatim.

/// Raw success code.
pub const SUCCESS: i32 = 0;

/// Failure reported by a kernel operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[repr(i32)]
pub enum ErrorCode {
    /// The simulation handle is unknown, destroyed, or belongs to another simulation.
    #[error("invalid simulation handle")]
    InvalidSimulation = -1,

    #[error("invalid component ID")]
    InvalidComponentId = -2,

    #[error("invalid wire ID")]
    InvalidWireId = -3,

    /// Kind/SubKind/Width/InputCount rejected at creation.
    #[error("invalid component configuration")]
    InvalidComponentConfiguration = -4,

    #[error("invalid output index")]
    InvalidOutputIndex = -5,

    /// The kernel refuses the circuit outright (it cannot be brought to a fixed point).
    #[error("conflict")]
    Conflict = -6,

    /// State array length mismatch or out-of-range enumerant.
    #[error("invalid logic state")]
    InvalidLogicState = -7,

    #[error("invalid input index")]
    InvalidInputIndex = -8,

    /// Bus has more wires than the input slot has bits.
    #[error("bus wider than input")]
    BusTooWide = -9,

    #[error("allocation failed")]
    Allocation = -10,
}

impl ErrorCode {
    /// Raw boundary value.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Decode a raw failure code. Returns `None` for non-failure or unknown codes.
    pub fn from_code(code: i32) -> Option<Self> {
        let error = match code {
            -1 => ErrorCode::InvalidSimulation,
            -2 => ErrorCode::InvalidComponentId,
            -3 => ErrorCode::InvalidWireId,
            -4 => ErrorCode::InvalidComponentConfiguration,
            -5 => ErrorCode::InvalidOutputIndex,
            -6 => ErrorCode::Conflict,
            -7 => ErrorCode::InvalidLogicState,
            -8 => ErrorCode::InvalidInputIndex,
            -9 => ErrorCode::BusTooWide,
            -10 => ErrorCode::Allocation,
            _ => return None,
        };
        Some(error)
    }
}

/// Informational outcome of a driver registration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverStatus {
    Added,
    AlreadyPresent,
    Removed,
    NotPresent,
}

impl DriverStatus {
    /// Raw boundary value (`Added` and `Removed` are plain success).
    pub fn code(self) -> i32 {
        match self {
            DriverStatus::Added | DriverStatus::Removed => SUCCESS,
            DriverStatus::AlreadyPresent => 1,
            DriverStatus::NotPresent => 2,
        }
    }
}

/// Result type alias for kernel operations.
pub type Result<T> = std::result::Result<T, ErrorCode>;
