//! Discrete-event logic evaluation kernel for gsim.
//!
//! Hosts one simulation per [`Kernel`] instance: components (constants,
//! gates, input and output pins) and single-bit wires, all addressed by
//! generation-checked numeric handles.
//!
//! ## Modules
//!
//! - [`logic`] — The four-valued logic lattice
//! - [`id`] — Simulation, component, and wire handles
//! - [`arena`] — Generational slot storage behind the handles
//! - [`component`] — Component kinds and creation info
//! - [`status`] — Boundary status codes
//! - [`api`] — The `SimulationKernel` boundary trait
//! - [`kernel`] — The in-process implementation
//! - [`config`] — Kernel tuning knobs

pub mod api;
pub mod arena;
pub mod component;
pub mod config;
pub mod id;
pub mod kernel;
pub mod logic;
pub mod status;

// Re-export key types for convenience
pub use api::SimulationKernel;
pub use component::{BinaryKind, ComponentCreateInfo, ComponentKind, ConstantKind, UnaryKind};
pub use config::KernelConfig;
pub use id::{ComponentId, SimulationHandle, WireId};
pub use kernel::Kernel;
pub use logic::LogicState;
pub use status::{DriverStatus, ErrorCode};
