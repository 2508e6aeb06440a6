//! The kernel boundary.
//!
//! Every operation the host layer may issue against a simulation kernel.
//! Implementations may live in-process ([`Kernel`](crate::kernel::Kernel))
//! or forward to another process; the host only depends on this trait.
//! After [`SimulationKernel::destroy`] every operation fails with
//! [`ErrorCode::InvalidSimulation`](crate::status::ErrorCode::InvalidSimulation).

use crate::component::ComponentCreateInfo;
use crate::id::{ComponentId, SimulationHandle, WireId};
use crate::logic::LogicState;
use crate::status::{DriverStatus, Result};

pub trait SimulationKernel: Send {
    /// Handle of the simulation this kernel instance hosts.
    fn handle(&self) -> SimulationHandle;

    /// Release all kernel resources.
    fn destroy(&mut self) -> Result<()>;

    fn add_component(&mut self, info: ComponentCreateInfo) -> Result<ComponentId>;

    fn add_input_pin(&mut self, width: u32) -> Result<ComponentId>;

    fn add_output_pin(&mut self, width: u32) -> Result<ComponentId>;

    /// Remove a component and every driver registration that names it.
    fn remove_component(&mut self, id: ComponentId) -> Result<()>;

    fn add_wire(&mut self) -> Result<WireId>;

    /// Remove a wire and detach it from every input bus that references it.
    fn remove_wire(&mut self, id: WireId) -> Result<()>;

    /// Propagate to a fixed point. Returns whether any observable state changed.
    fn step(&mut self) -> Result<bool>;

    /// Bind a bus to one input slot, replacing any previous binding.
    fn connect_input(&mut self, id: ComponentId, input_index: u32, wires: &[WireId]) -> Result<()>;

    fn disconnect_input(&mut self, id: ComponentId, input_index: u32) -> Result<()>;

    fn set_input_pin(&mut self, id: ComponentId, states: &[LogicState]) -> Result<()>;

    fn get_output_pin(&self, id: ComponentId, states: &mut [LogicState]) -> Result<()>;

    fn get_wire_state(&self, id: WireId) -> Result<LogicState>;

    fn add_driver(
        &mut self,
        wire: WireId,
        component: ComponentId,
        output_index: u32,
        output_sub_index: u32,
    ) -> Result<DriverStatus>;

    fn remove_driver(
        &mut self,
        wire: WireId,
        component: ComponentId,
        output_index: u32,
        output_sub_index: u32,
    ) -> Result<DriverStatus>;

    fn component_count(&self) -> usize;

    fn wire_count(&self) -> usize;
}
