//! Host-side interface to the gsim logic simulation kernel.
//!
//! A [`Simulator`] owns one kernel instance and hands out copyable facades
//! ([`Component`], [`InputPin`], [`OutputPin`], [`Wire`]) that address
//! entities by handle. Facades never own anything; every call goes through
//! the simulator that issued them.
//!
//! ```
//! use gsim::{LogicState, Simulator};
//!
//! let mut sim = Simulator::new()?;
//! let input = sim.add_input_pin(1)?;
//! let output = sim.add_output_pin(1)?;
//! let wire = sim.add_wire()?;
//! wire.add_driver(&mut sim, input, (0, 0))?;
//! output.connect(&mut sim, &[wire])?;
//!
//! input.set(&mut sim, &[LogicState::Logic1])?;
//! sim.step()?;
//! assert_eq!(output.read(&sim)?.as_slice(), &[LogicState::Logic1]);
//! sim.destroy()?;
//! # Ok::<(), gsim::SimulationError>(())
//! ```
//!
//! ## Modules
//!
//! - [`simulator`] — Kernel ownership and entity lifecycle
//! - [`component`] — Component and pin facades
//! - [`wire`] — Wire facade
//! - [`marshal`] — Inline/heap bulk transfer buffers
//! - [`config`] — `gsim.toml` settings
//! - [`error`] — Error taxonomy

pub mod component;
pub mod config;
pub mod error;
pub mod marshal;
pub mod simulator;
pub mod wire;

// Re-export key types for convenience
pub use component::{Component, InputPin, OutputPin};
pub use config::SimulatorConfig;
pub use error::SimulationError;
pub use gsim_kernel::{
    BinaryKind, ComponentCreateInfo, ComponentId, ComponentKind, ConstantKind, KernelConfig,
    LogicState, SimulationHandle, SimulationKernel, UnaryKind, WireId,
};
pub use marshal::MarshalStrategy;
pub use simulator::{live_simulations, Simulator};
pub use wire::Wire;
