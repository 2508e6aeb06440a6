//! Wire facade.

use gsim_kernel::{DriverStatus, LogicState, SimulationHandle, WireId};

use crate::component::Component;
use crate::error::Result;
use crate::simulator::Simulator;

/// View of one single-bit wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wire {
    simulation: SimulationHandle,
    id: WireId,
}

impl Wire {
    pub(crate) fn new(simulation: SimulationHandle, id: WireId) -> Self {
        Self { simulation, id }
    }

    pub fn id(&self) -> WireId {
        self.id
    }

    /// Simulation that issued this wire.
    pub fn simulation(&self) -> SimulationHandle {
        self.simulation
    }

    /// State resolved by the last step.
    pub fn state(&self, sim: &Simulator) -> Result<LogicState> {
        sim.check(self.simulation)?;
        Ok(sim.kernel().get_wire_state(self.id)?)
    }

    /// Register `component`'s output `(index, sub_index)` as a driver.
    ///
    /// Returns `true` if that driver was already registered, in which case
    /// nothing changes.
    pub fn add_driver(
        &self,
        sim: &mut Simulator,
        component: impl Into<Component>,
        (output_index, output_sub_index): (u32, u32),
    ) -> Result<bool> {
        let component = component.into();
        sim.check(self.simulation)?;
        sim.check(component.simulation())?;
        let status = sim.kernel_mut().add_driver(
            self.id,
            component.id(),
            output_index,
            output_sub_index,
        )?;
        tracing::trace!(wire = %self.id, component = %component.id(), ?status, "add driver");
        Ok(status == DriverStatus::AlreadyPresent)
    }

    /// Unregister a driver. Returns `true` if it was registered.
    pub fn remove_driver(
        &self,
        sim: &mut Simulator,
        component: impl Into<Component>,
        (output_index, output_sub_index): (u32, u32),
    ) -> Result<bool> {
        let component = component.into();
        sim.check(self.simulation)?;
        sim.check(component.simulation())?;
        let status = sim.kernel_mut().remove_driver(
            self.id,
            component.id(),
            output_index,
            output_sub_index,
        )?;
        tracing::trace!(wire = %self.id, component = %component.id(), ?status, "remove driver");
        Ok(status == DriverStatus::Removed)
    }
}
