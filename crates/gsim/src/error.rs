//! Host-level error types.
//!
//! Kernel status codes are translated into [`SimulationError`] at the
//! boundary; nothing below this layer is surfaced as a raw integer.

use gsim_kernel::ErrorCode;

/// Errors that can occur while driving a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The kernel or an entity's storage could not be allocated.
    #[error("allocation failed")]
    Allocation,

    /// Handle from another (or an already destroyed) simulation.
    #[error("invalid simulation handle")]
    InvalidSimulation,

    #[error("invalid component ID")]
    InvalidComponentId,

    #[error("invalid wire ID")]
    InvalidWireId,

    #[error("invalid component configuration")]
    InvalidComponentConfiguration,

    #[error("invalid output index")]
    InvalidOutputIndex,

    #[error("invalid input index")]
    InvalidInputIndex,

    #[error("bus wider than input")]
    BusTooWide,

    #[error("invalid logic state")]
    InvalidLogicState,

    /// The kernel refused the circuit outright.
    #[error("conflict")]
    Conflict,

    /// A failure code this layer does not know.
    #[error("unknown simulation error (code {0})")]
    Unknown(i32),

    /// Settings file rejected.
    #[error("invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML rendering error.
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimulationError {
    /// Translate a raw boundary status. Non-negative codes are not failures.
    pub fn from_raw(code: i32) -> Option<Self> {
        if code >= 0 {
            return None;
        }
        Some(match ErrorCode::from_code(code) {
            Some(error) => error.into(),
            None => SimulationError::Unknown(code),
        })
    }

    /// The raw boundary status, for errors that originate in the kernel.
    pub fn code(&self) -> Option<i32> {
        let code = match self {
            SimulationError::Allocation => ErrorCode::Allocation,
            SimulationError::InvalidSimulation => ErrorCode::InvalidSimulation,
            SimulationError::InvalidComponentId => ErrorCode::InvalidComponentId,
            SimulationError::InvalidWireId => ErrorCode::InvalidWireId,
            SimulationError::InvalidComponentConfiguration => {
                ErrorCode::InvalidComponentConfiguration
            }
            SimulationError::InvalidOutputIndex => ErrorCode::InvalidOutputIndex,
            SimulationError::InvalidInputIndex => ErrorCode::InvalidInputIndex,
            SimulationError::BusTooWide => ErrorCode::BusTooWide,
            SimulationError::InvalidLogicState => ErrorCode::InvalidLogicState,
            SimulationError::Conflict => ErrorCode::Conflict,
            SimulationError::Unknown(code) => return Some(*code),
            SimulationError::InvalidConfig { .. }
            | SimulationError::Toml(_)
            | SimulationError::TomlSerialize(_)
            | SimulationError::Io(_) => return None,
        };
        Some(code.code())
    }
}

impl From<ErrorCode> for SimulationError {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::InvalidSimulation => SimulationError::InvalidSimulation,
            ErrorCode::InvalidComponentId => SimulationError::InvalidComponentId,
            ErrorCode::InvalidWireId => SimulationError::InvalidWireId,
            ErrorCode::InvalidComponentConfiguration => {
                SimulationError::InvalidComponentConfiguration
            }
            ErrorCode::InvalidOutputIndex => SimulationError::InvalidOutputIndex,
            ErrorCode::Conflict => SimulationError::Conflict,
            ErrorCode::InvalidLogicState => SimulationError::InvalidLogicState,
            ErrorCode::InvalidInputIndex => SimulationError::InvalidInputIndex,
            ErrorCode::BusTooWide => SimulationError::BusTooWide,
            ErrorCode::Allocation => SimulationError::Allocation,
        }
    }
}

/// Result type alias for simulation operations.
pub type Result<T> = std::result::Result<T, SimulationError>;
