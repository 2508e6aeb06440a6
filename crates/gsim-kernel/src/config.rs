//! Kernel tuning knobs.

use serde::{Deserialize, Serialize};

/// Settings fixed for the lifetime of one kernel instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct KernelConfig {
    /// Propagation rounds per step before still-changing wires are forced to
    /// `Undefined`. Raised to the live component count plus one when lower.
    pub max_step_iterations: u32,
    /// Component slots reserved up front.
    pub initial_component_capacity: usize,
    /// Wire slots reserved up front.
    pub initial_wire_capacity: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            max_step_iterations: 1000,
            initial_component_capacity: 64,
            initial_wire_capacity: 64,
        }
    }
}
