//! Component and pin facades.
//!
//! A facade is a copyable (simulation, id) pair. It owns nothing: every call
//! forwards to the [`Simulator`] passed in, after checking the facade was
//! issued by that simulator.

use gsim_kernel::{ComponentId, LogicState, SimulationHandle};

use crate::error::{Result, SimulationError};
use crate::marshal::{self, TransferBuffer};
use crate::simulator::Simulator;
use crate::wire::Wire;

/// View of any component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Component {
    simulation: SimulationHandle,
    id: ComponentId,
}

impl Component {
    pub(crate) fn new(simulation: SimulationHandle, id: ComponentId) -> Self {
        Self { simulation, id }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Simulation that issued this component.
    pub fn simulation(&self) -> SimulationHandle {
        self.simulation
    }

    /// Bind `wires` (bit 0 first) to input slot `input_index`, replacing any previous bus.
    pub fn connect_input(
        &self,
        sim: &mut Simulator,
        input_index: u32,
        wires: &[Wire],
    ) -> Result<()> {
        sim.check(self.simulation)?;
        let ids = marshal::try_marshal(wires, |wire| {
            sim.check(wire.simulation())?;
            Ok::<_, SimulationError>(wire.id())
        })?;
        sim.kernel_mut().connect_input(self.id, input_index, &ids)?;
        tracing::trace!(id = %self.id, input_index, width = ids.len(), "input connected");
        Ok(())
    }

    /// Clear the bus bound to input slot `input_index`; every bit reads `HighZ`.
    pub fn disconnect_input(&self, sim: &mut Simulator, input_index: u32) -> Result<()> {
        sim.check(self.simulation)?;
        sim.kernel_mut().disconnect_input(self.id, input_index)?;
        tracing::trace!(id = %self.id, input_index, "input disconnected");
        Ok(())
    }
}

/// External stimulus port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputPin {
    component: Component,
    width: u32,
}

impl InputPin {
    pub(crate) fn new(component: Component, width: u32) -> Self {
        Self { component, width }
    }

    pub fn id(&self) -> ComponentId {
        self.component.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn component(&self) -> Component {
        self.component
    }

    /// Drive the pin. `states.len()` must equal the pin width.
    pub fn set(&self, sim: &mut Simulator, states: &[LogicState]) -> Result<()> {
        sim.check(self.component.simulation)?;
        sim.kernel_mut().set_input_pin(self.component.id, states)?;
        Ok(())
    }

    /// Drive the pin from two-valued bits.
    pub fn set_bools(&self, sim: &mut Simulator, bits: &[bool]) -> Result<()> {
        let states = marshal::marshal(bits, |&bit| LogicState::from_bool(bit));
        self.set(sim, &states)
    }

    /// Drive the pin from raw boundary values, rejecting out-of-range enumerants.
    pub fn set_raw(&self, sim: &mut Simulator, raw: &[u32]) -> Result<()> {
        let states = marshal::try_marshal(raw, |&value| LogicState::from_raw(value))?;
        self.set(sim, &states)
    }
}

impl From<InputPin> for Component {
    fn from(pin: InputPin) -> Self {
        pin.component
    }
}

/// External observation port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputPin {
    component: Component,
    width: u32,
}

impl OutputPin {
    pub(crate) fn new(component: Component, width: u32) -> Self {
        Self { component, width }
    }

    pub fn id(&self) -> ComponentId {
        self.component.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn component(&self) -> Component {
        self.component
    }

    /// Bind the observed bus.
    pub fn connect(&self, sim: &mut Simulator, wires: &[Wire]) -> Result<()> {
        self.component.connect_input(sim, 0, wires)
    }

    /// Copy the state captured by the last step into `states` (length = pin width).
    pub fn get(&self, sim: &Simulator, states: &mut [LogicState]) -> Result<()> {
        sim.check(self.component.simulation)?;
        sim.kernel().get_output_pin(self.component.id, states)?;
        Ok(())
    }

    /// Read the captured state into a fresh buffer.
    pub fn read(&self, sim: &Simulator) -> Result<TransferBuffer<LogicState>> {
        let mut states: TransferBuffer<LogicState> =
            smallvec::smallvec![LogicState::HighZ; self.width as usize];
        self.get(sim, &mut states)?;
        Ok(states)
    }
}

impl From<OutputPin> for Component {
    fn from(pin: OutputPin) -> Self {
        pin.component
    }
}
