//! The simulator: sole owner of one kernel instance.
//!
//! A [`Simulator`] is released exactly once. [`Simulator::destroy`] is the
//! deterministic path; `Drop` releases a simulator that was never destroyed
//! and, in debug builds, logs it as a leak.

use std::sync::atomic::{AtomicUsize, Ordering};

use gsim_kernel::{ComponentCreateInfo, Kernel, SimulationHandle, SimulationKernel};

use crate::component::{Component, InputPin, OutputPin};
use crate::config::SimulatorConfig;
use crate::error::{Result, SimulationError};
use crate::wire::Wire;

static LIVE_SIMULATIONS: AtomicUsize = AtomicUsize::new(0);

/// Number of simulators created and not yet released in this process.
pub fn live_simulations() -> usize {
    LIVE_SIMULATIONS.load(Ordering::Relaxed)
}

/// Owner of a simulation kernel and factory for its components and wires.
pub struct Simulator {
    kernel: Box<dyn SimulationKernel>,
    handle: SimulationHandle,
    config: SimulatorConfig,
    released: bool,
}

impl Simulator {
    /// Create a simulator backed by the in-process kernel with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(SimulatorConfig::default())
    }

    /// Create a simulator backed by the in-process kernel.
    pub fn with_config(config: SimulatorConfig) -> Result<Self> {
        let kernel = Kernel::create(config.kernel.clone())?;
        Ok(Self::with_kernel(Box::new(kernel), config))
    }

    /// Take ownership of an already created kernel.
    pub fn with_kernel(kernel: Box<dyn SimulationKernel>, config: SimulatorConfig) -> Self {
        let handle = kernel.handle();
        LIVE_SIMULATIONS.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(%handle, "simulator created");
        Self {
            kernel,
            handle,
            config,
            released: false,
        }
    }

    pub fn handle(&self) -> SimulationHandle {
        self.handle
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Reject facades issued by another simulation.
    pub(crate) fn check(&self, simulation: SimulationHandle) -> Result<()> {
        if simulation != self.handle {
            tracing::trace!(expected = %self.handle, found = %simulation, "foreign handle");
            return Err(SimulationError::InvalidSimulation);
        }
        Ok(())
    }

    pub(crate) fn kernel(&self) -> &dyn SimulationKernel {
        &*self.kernel
    }

    pub(crate) fn kernel_mut(&mut self) -> &mut dyn SimulationKernel {
        &mut *self.kernel
    }

    pub fn add_component(&mut self, info: ComponentCreateInfo) -> Result<Component> {
        let id = self.kernel.add_component(info)?;
        tracing::trace!(handle = %self.handle, %id, kind = %info.kind, "component added");
        Ok(Component::new(self.handle, id))
    }

    pub fn add_input_pin(&mut self, width: u32) -> Result<InputPin> {
        let id = self.kernel.add_input_pin(width)?;
        tracing::trace!(handle = %self.handle, %id, width, "input pin added");
        Ok(InputPin::new(Component::new(self.handle, id), width))
    }

    pub fn add_output_pin(&mut self, width: u32) -> Result<OutputPin> {
        let id = self.kernel.add_output_pin(width)?;
        tracing::trace!(handle = %self.handle, %id, width, "output pin added");
        Ok(OutputPin::new(Component::new(self.handle, id), width))
    }

    /// Remove a component; wires it drove lose that driver.
    pub fn remove_component(&mut self, component: impl Into<Component>) -> Result<()> {
        let component = component.into();
        self.check(component.simulation())?;
        self.kernel.remove_component(component.id())?;
        tracing::trace!(handle = %self.handle, id = %component.id(), "component removed");
        Ok(())
    }

    pub fn add_wire(&mut self) -> Result<Wire> {
        let id = self.kernel.add_wire()?;
        tracing::trace!(handle = %self.handle, %id, "wire added");
        Ok(Wire::new(self.handle, id))
    }

    /// Remove a wire; every input bus that referenced it reads `HighZ` in its place.
    pub fn remove_wire(&mut self, wire: Wire) -> Result<()> {
        self.check(wire.simulation())?;
        self.kernel.remove_wire(wire.id())?;
        tracing::trace!(handle = %self.handle, id = %wire.id(), "wire removed");
        Ok(())
    }

    /// Propagate to a fixed point. Returns whether any observable state changed.
    pub fn step(&mut self) -> Result<bool> {
        let changed = self.kernel.step()?;
        tracing::trace!(handle = %self.handle, changed, "step");
        Ok(changed)
    }

    pub fn component_count(&self) -> usize {
        self.kernel.component_count()
    }

    pub fn wire_count(&self) -> usize {
        self.kernel.wire_count()
    }

    /// Release the kernel now.
    pub fn destroy(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        LIVE_SIMULATIONS.fetch_sub(1, Ordering::Relaxed);
        tracing::debug!(handle = %self.handle, "simulator released");
        self.kernel.destroy()?;
        Ok(())
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if cfg!(debug_assertions) && self.config.leak_warnings {
            tracing::warn!(handle = %self.handle, "simulator dropped without destroy");
        }
        if let Err(e) = self.release() {
            tracing::error!(handle = %self.handle, error = %e, "failed to release simulator");
        }
    }
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("handle", &self.handle)
            .field("components", &self.component_count())
            .field("wires", &self.wire_count())
            .field("released", &self.released)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsim_kernel::status::Result as KernelResult;
    use gsim_kernel::{
        BinaryKind, ComponentId, DriverStatus, ErrorCode, KernelConfig, LogicState, WireId,
    };

    #[test]
    fn allocation_failure_is_reported() {
        let config = SimulatorConfig {
            kernel: KernelConfig {
                initial_component_capacity: usize::MAX,
                ..KernelConfig::default()
            },
            ..SimulatorConfig::default()
        };
        assert!(matches!(
            Simulator::with_config(config),
            Err(SimulationError::Allocation)
        ));
    }

    #[test]
    fn invalid_component_creates_nothing() {
        let mut sim = Simulator::new().unwrap();
        let err = sim
            .add_component(ComponentCreateInfo::binary(BinaryKind::Xor, 1, 1))
            .unwrap_err();
        assert!(matches!(err, SimulationError::InvalidComponentConfiguration));
        assert_eq!(sim.component_count(), 0);
        sim.destroy().unwrap();
    }

    #[test]
    fn oversized_component_is_an_error() {
        let mut sim = Simulator::new().unwrap();
        let err = sim
            .add_component(ComponentCreateInfo::binary(BinaryKind::Or, 1, u32::MAX))
            .unwrap_err();
        assert!(matches!(err, SimulationError::Allocation));
        assert_eq!(sim.component_count(), 0);
        sim.destroy().unwrap();
    }

    #[test]
    fn foreign_facades_are_rejected() {
        let mut a = Simulator::new().unwrap();
        let mut b = Simulator::new().unwrap();
        let wire_a = a.add_wire().unwrap();
        let _wire_b = b.add_wire().unwrap();

        assert!(matches!(
            b.remove_wire(wire_a),
            Err(SimulationError::InvalidSimulation)
        ));
        assert_eq!(b.wire_count(), 1);
        a.remove_wire(wire_a).unwrap();
        a.destroy().unwrap();
        b.destroy().unwrap();
    }

    #[test]
    fn adopts_an_existing_kernel() {
        let kernel = Kernel::create(KernelConfig::default()).unwrap();
        let handle = kernel.handle();
        let mut sim = Simulator::with_kernel(Box::new(kernel), SimulatorConfig::default());
        assert_eq!(sim.handle(), handle);
        let wire = sim.add_wire().unwrap();
        assert_eq!(wire.simulation(), handle);
        sim.destroy().unwrap();
    }

    /// Delegates to the in-process kernel but refuses every step.
    struct RefusingKernel(Kernel);

    impl SimulationKernel for RefusingKernel {
        fn handle(&self) -> SimulationHandle {
            self.0.handle()
        }
        fn destroy(&mut self) -> KernelResult<()> {
            self.0.destroy()
        }
        fn add_component(&mut self, info: ComponentCreateInfo) -> KernelResult<ComponentId> {
            self.0.add_component(info)
        }
        fn add_input_pin(&mut self, width: u32) -> KernelResult<ComponentId> {
            self.0.add_input_pin(width)
        }
        fn add_output_pin(&mut self, width: u32) -> KernelResult<ComponentId> {
            self.0.add_output_pin(width)
        }
        fn remove_component(&mut self, id: ComponentId) -> KernelResult<()> {
            self.0.remove_component(id)
        }
        fn add_wire(&mut self) -> KernelResult<WireId> {
            self.0.add_wire()
        }
        fn remove_wire(&mut self, id: WireId) -> KernelResult<()> {
            self.0.remove_wire(id)
        }
        fn step(&mut self) -> KernelResult<bool> {
            Err(ErrorCode::Conflict)
        }
        fn connect_input(
            &mut self,
            id: ComponentId,
            input_index: u32,
            wires: &[WireId],
        ) -> KernelResult<()> {
            self.0.connect_input(id, input_index, wires)
        }
        fn disconnect_input(&mut self, id: ComponentId, input_index: u32) -> KernelResult<()> {
            self.0.disconnect_input(id, input_index)
        }
        fn set_input_pin(&mut self, id: ComponentId, states: &[LogicState]) -> KernelResult<()> {
            self.0.set_input_pin(id, states)
        }
        fn get_output_pin(&self, id: ComponentId, states: &mut [LogicState]) -> KernelResult<()> {
            self.0.get_output_pin(id, states)
        }
        fn get_wire_state(&self, id: WireId) -> KernelResult<LogicState> {
            self.0.get_wire_state(id)
        }
        fn add_driver(
            &mut self,
            wire: WireId,
            component: ComponentId,
            output_index: u32,
            output_sub_index: u32,
        ) -> KernelResult<DriverStatus> {
            self.0.add_driver(wire, component, output_index, output_sub_index)
        }
        fn remove_driver(
            &mut self,
            wire: WireId,
            component: ComponentId,
            output_index: u32,
            output_sub_index: u32,
        ) -> KernelResult<DriverStatus> {
            self.0.remove_driver(wire, component, output_index, output_sub_index)
        }
        fn component_count(&self) -> usize {
            self.0.component_count()
        }
        fn wire_count(&self) -> usize {
            self.0.wire_count()
        }
    }

    #[test]
    fn kernel_conflict_is_surfaced() {
        let kernel = RefusingKernel(Kernel::create(KernelConfig::default()).unwrap());
        let mut sim = Simulator::with_kernel(Box::new(kernel), SimulatorConfig::default());
        let pin = sim.add_input_pin(1).unwrap();
        let wire = sim.add_wire().unwrap();
        wire.add_driver(&mut sim, pin, (0, 0)).unwrap();
        pin.set(&mut sim, &[LogicState::Logic1]).unwrap();

        let err = sim.step().unwrap_err();
        assert!(matches!(err, SimulationError::Conflict));
        assert_eq!(err.code(), Some(ErrorCode::Conflict.code()));
        assert_eq!(wire.state(&sim).unwrap(), LogicState::HighZ);
        sim.destroy().unwrap();
    }

    #[test]
    fn debug_output_reports_counts() {
        let mut sim = Simulator::new().unwrap();
        sim.add_wire().unwrap();
        let text = format!("{sim:?}");
        assert!(text.contains("wires: 1"), "{text}");
        sim.destroy().unwrap();
    }
}
