//! In-process evaluation kernel.
//!
//! Components and wires live in per-simulation generational arenas. A step
//! alternates two phases until nothing changes: every component recomputes
//! its output from the current wire states, then every wire resolves the
//! values asserted by its drivers.

use std::collections::HashSet;

use crate::api::SimulationKernel;
use crate::arena::Arena;
use crate::component::{ComponentCreateInfo, ComponentKind, UnaryKind};
use crate::config::KernelConfig;
use crate::id::{ComponentId, SimulationHandle, WireId};
use crate::logic::LogicState;
use crate::status::{DriverStatus, ErrorCode, Result};

/// What a component record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Gate(ComponentKind),
    InputPin,
    OutputPin,
}

#[derive(Debug, Clone)]
struct ComponentRecord {
    role: Role,
    width: u32,
    /// One bus per input slot. `None` marks a bit whose wire was removed.
    inputs: Vec<Vec<Option<WireId>>>,
    /// Driven output of gates and input pins; observed input of output pins.
    state: Vec<LogicState>,
}

/// A vector of `len` copies of `value`, failing instead of aborting when
/// the allocation cannot be made.
fn try_filled<T: Clone>(len: u32, value: T) -> Result<Vec<T>> {
    let len = len as usize;
    let mut items = Vec::new();
    items.try_reserve_exact(len).map_err(|_| ErrorCode::Allocation)?;
    items.resize(len, value);
    Ok(items)
}

impl ComponentRecord {
    fn new(role: Role, width: u32, input_count: u32) -> Result<Self> {
        Ok(Self {
            role,
            width,
            inputs: try_filled(input_count, Vec::new())?,
            state: try_filled(width, LogicState::HighZ)?,
        })
    }

    fn output_count(&self) -> u32 {
        match self.role {
            Role::OutputPin => 0,
            Role::Gate(_) | Role::InputPin => 1,
        }
    }

    /// The value asserted at (output index, sub-index), if that output exists.
    fn output(&self, index: u32, sub_index: u32) -> Option<LogicState> {
        if index >= self.output_count() {
            return None;
        }
        self.state.get(sub_index as usize).copied()
    }
}

/// A driver registration: (component, output index, output sub-index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Driver {
    component: ComponentId,
    output_index: u32,
    output_sub_index: u32,
}

#[derive(Debug, Clone, Default)]
struct WireRecord {
    drivers: Vec<Driver>,
    state: LogicState,
}

fn input_bit(wires: &Arena<WireId, WireRecord>, bus: &[Option<WireId>], bit: usize) -> LogicState {
    bus.get(bit)
        .copied()
        .flatten()
        .and_then(|id| wires.get(id))
        .map_or(LogicState::HighZ, |wire| wire.state)
}

/// One simulation instance.
#[derive(Debug)]
pub struct Kernel {
    handle: SimulationHandle,
    config: KernelConfig,
    components: Arena<ComponentId, ComponentRecord>,
    wires: Arena<WireId, WireRecord>,
    destroyed: bool,
}

impl Kernel {
    /// Allocate a kernel instance, reserving the configured initial capacity.
    pub fn create(config: KernelConfig) -> Result<Self> {
        let components = Arena::try_with_capacity(config.initial_component_capacity)?;
        let wires = Arena::try_with_capacity(config.initial_wire_capacity)?;
        let handle = SimulationHandle::next();
        tracing::debug!(%handle, "kernel created");
        Ok(Self {
            handle,
            config,
            components,
            wires,
            destroyed: false,
        })
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    fn ensure_live(&self) -> Result<()> {
        if self.destroyed {
            return Err(ErrorCode::InvalidSimulation);
        }
        Ok(())
    }

    fn component(&self, id: ComponentId) -> Result<&ComponentRecord> {
        self.ensure_live()?;
        self.components.get(id).ok_or(ErrorCode::InvalidComponentId)
    }

    fn component_mut(&mut self, id: ComponentId) -> Result<&mut ComponentRecord> {
        self.ensure_live()?;
        self.components
            .get_mut(id)
            .ok_or(ErrorCode::InvalidComponentId)
    }

    fn wire(&self, id: WireId) -> Result<&WireRecord> {
        self.ensure_live()?;
        self.wires.get(id).ok_or(ErrorCode::InvalidWireId)
    }

    fn add_pin(&mut self, role: Role, width: u32) -> Result<ComponentId> {
        self.ensure_live()?;
        if width == 0 {
            return Err(ErrorCode::InvalidComponentConfiguration);
        }
        let input_count = if role == Role::OutputPin { 1 } else { 0 };
        let record = ComponentRecord::new(role, width, input_count)?;
        Ok(self.components.insert(record))
    }

    /// Validate a driver triple against the live entities.
    fn driver(
        &self,
        wire: WireId,
        component: ComponentId,
        output_index: u32,
        output_sub_index: u32,
    ) -> Result<Driver> {
        self.wire(wire)?;
        let record = self.component(component)?;
        if record.output(output_index, output_sub_index).is_none() {
            return Err(ErrorCode::InvalidOutputIndex);
        }
        Ok(Driver {
            component,
            output_index,
            output_sub_index,
        })
    }

    /// Recompute every component's state from the current wire states.
    fn evaluate_components(&mut self) {
        let wires = &self.wires;
        for (_, record) in self.components.iter_mut() {
            let width = record.width as usize;
            match record.role {
                Role::InputPin => {}
                Role::OutputPin => {
                    for bit in 0..width {
                        record.state[bit] = input_bit(wires, &record.inputs[0], bit);
                    }
                }
                Role::Gate(ComponentKind::Constant(kind)) => {
                    record.state.fill(kind.value());
                }
                Role::Gate(ComponentKind::Unary(UnaryKind::Not)) => {
                    for bit in 0..width {
                        record.state[bit] = input_bit(wires, &record.inputs[0], bit).not();
                    }
                }
                Role::Gate(ComponentKind::Binary(kind)) => {
                    for bit in 0..width {
                        let operands = record.inputs.iter().map(|bus| input_bit(wires, bus, bit));
                        record.state[bit] = kind.eval(operands);
                    }
                }
            }
        }
    }

    /// Resolve every wire from its drivers. Returns the wires that changed.
    fn resolve_wires(&mut self, forced: &HashSet<WireId>) -> Vec<WireId> {
        let components = &self.components;
        let mut changed = Vec::new();
        for (id, wire) in self.wires.iter_mut() {
            let asserted = wire.drivers.iter().map(|d| {
                components
                    .get(d.component)
                    .and_then(|c| c.output(d.output_index, d.output_sub_index))
                    .unwrap_or(LogicState::HighZ)
            });
            let mut next = LogicState::resolve_all(asserted);
            if forced.contains(&id) {
                next = LogicState::Undefined;
            }
            if next != wire.state {
                wire.state = next;
                changed.push(id);
            }
        }
        changed
    }

    /// Rounds allowed before still-changing wires count as oscillating.
    ///
    /// Each round moves a value one component further, so an acyclic circuit
    /// settles within one round per component plus one. The configured limit
    /// only extends this.
    fn round_budget(&self) -> u32 {
        let depth = u32::try_from(self.components.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        self.config.max_step_iterations.max(depth)
    }

    /// Run rounds until no wire changes, forcing oscillating wires to
    /// `Undefined` once the round budget is spent.
    ///
    /// A forced wire holds `Undefined`, which every gate and every resolution
    /// propagates, so the forced pass settles within the same budget.
    /// `Conflict` only bounds the loop.
    fn settle(&mut self) -> Result<()> {
        let budget = self.round_budget();
        let mut forced = HashSet::new();
        let mut rounds = 0u32;
        loop {
            self.evaluate_components();
            let changed = self.resolve_wires(&forced);
            if changed.is_empty() {
                tracing::trace!(handle = %self.handle, rounds, "step converged");
                return Ok(());
            }
            rounds += 1;
            if rounds >= budget {
                if !forced.is_empty() {
                    return Err(ErrorCode::Conflict);
                }
                tracing::warn!(
                    handle = %self.handle,
                    wires = changed.len(),
                    "step did not converge, forcing oscillating wires to Undefined"
                );
                forced.extend(changed);
                rounds = 0;
            }
        }
    }

    fn observable_state(&self) -> (Vec<LogicState>, Vec<Vec<LogicState>>) {
        let wires = self.wires.iter().map(|(_, w)| w.state).collect();
        let pins = self
            .components
            .iter()
            .filter(|(_, c)| c.role == Role::OutputPin)
            .map(|(_, c)| c.state.clone())
            .collect();
        (wires, pins)
    }
}

impl SimulationKernel for Kernel {
    fn handle(&self) -> SimulationHandle {
        self.handle
    }

    fn destroy(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.components.clear();
        self.wires.clear();
        self.destroyed = true;
        tracing::debug!(handle = %self.handle, "kernel destroyed");
        Ok(())
    }

    fn add_component(&mut self, info: ComponentCreateInfo) -> Result<ComponentId> {
        self.ensure_live()?;
        info.validate()?;
        let record = ComponentRecord::new(Role::Gate(info.kind), info.width, info.input_count)?;
        Ok(self.components.insert(record))
    }

    fn add_input_pin(&mut self, width: u32) -> Result<ComponentId> {
        self.add_pin(Role::InputPin, width)
    }

    fn add_output_pin(&mut self, width: u32) -> Result<ComponentId> {
        self.add_pin(Role::OutputPin, width)
    }

    fn remove_component(&mut self, id: ComponentId) -> Result<()> {
        self.ensure_live()?;
        self.components
            .remove(id)
            .ok_or(ErrorCode::InvalidComponentId)?;
        for (_, wire) in self.wires.iter_mut() {
            wire.drivers.retain(|d| d.component != id);
        }
        Ok(())
    }

    fn add_wire(&mut self) -> Result<WireId> {
        self.ensure_live()?;
        Ok(self.wires.insert(WireRecord::default()))
    }

    fn remove_wire(&mut self, id: WireId) -> Result<()> {
        self.ensure_live()?;
        self.wires.remove(id).ok_or(ErrorCode::InvalidWireId)?;
        for (_, record) in self.components.iter_mut() {
            for bit in record.inputs.iter_mut().flatten() {
                if *bit == Some(id) {
                    *bit = None;
                }
            }
        }
        Ok(())
    }

    fn step(&mut self) -> Result<bool> {
        self.ensure_live()?;
        let before = self.observable_state();
        self.settle()?;
        Ok(self.observable_state() != before)
    }

    fn connect_input(&mut self, id: ComponentId, input_index: u32, wires: &[WireId]) -> Result<()> {
        let record = self.component(id)?;
        if input_index as usize >= record.inputs.len() {
            return Err(ErrorCode::InvalidInputIndex);
        }
        if wires.len() > record.width as usize {
            return Err(ErrorCode::BusTooWide);
        }
        if !wires.iter().all(|&w| self.wires.contains(w)) {
            return Err(ErrorCode::InvalidWireId);
        }
        let record = self.component_mut(id)?;
        record.inputs[input_index as usize] = wires.iter().copied().map(Some).collect();
        Ok(())
    }

    fn disconnect_input(&mut self, id: ComponentId, input_index: u32) -> Result<()> {
        let record = self.component_mut(id)?;
        let bus = record
            .inputs
            .get_mut(input_index as usize)
            .ok_or(ErrorCode::InvalidInputIndex)?;
        bus.clear();
        Ok(())
    }

    fn set_input_pin(&mut self, id: ComponentId, states: &[LogicState]) -> Result<()> {
        let record = self.component_mut(id)?;
        if record.role != Role::InputPin {
            return Err(ErrorCode::InvalidComponentId);
        }
        if states.len() != record.width as usize {
            return Err(ErrorCode::InvalidLogicState);
        }
        record.state.copy_from_slice(states);
        Ok(())
    }

    fn get_output_pin(&self, id: ComponentId, states: &mut [LogicState]) -> Result<()> {
        let record = self.component(id)?;
        if record.role != Role::OutputPin {
            return Err(ErrorCode::InvalidComponentId);
        }
        if states.len() != record.width as usize {
            return Err(ErrorCode::InvalidLogicState);
        }
        states.copy_from_slice(&record.state);
        Ok(())
    }

    fn get_wire_state(&self, id: WireId) -> Result<LogicState> {
        Ok(self.wire(id)?.state)
    }

    fn add_driver(
        &mut self,
        wire: WireId,
        component: ComponentId,
        output_index: u32,
        output_sub_index: u32,
    ) -> Result<DriverStatus> {
        let driver = self.driver(wire, component, output_index, output_sub_index)?;
        let record = self.wires.get_mut(wire).ok_or(ErrorCode::InvalidWireId)?;
        if record.drivers.contains(&driver) {
            return Ok(DriverStatus::AlreadyPresent);
        }
        record.drivers.push(driver);
        Ok(DriverStatus::Added)
    }

    fn remove_driver(
        &mut self,
        wire: WireId,
        component: ComponentId,
        output_index: u32,
        output_sub_index: u32,
    ) -> Result<DriverStatus> {
        let driver = self.driver(wire, component, output_index, output_sub_index)?;
        let record = self.wires.get_mut(wire).ok_or(ErrorCode::InvalidWireId)?;
        match record.drivers.iter().position(|d| *d == driver) {
            Some(pos) => {
                record.drivers.remove(pos);
                Ok(DriverStatus::Removed)
            }
            None => Ok(DriverStatus::NotPresent),
        }
    }

    fn component_count(&self) -> usize {
        self.components.len()
    }

    fn wire_count(&self) -> usize {
        self.wires.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{BinaryKind, ConstantKind};
    use LogicState::{HighZ, Logic0, Logic1, Undefined};

    fn kernel() -> Kernel {
        Kernel::create(KernelConfig::default()).unwrap()
    }

    /// An input pin of `width` bits driving one fresh wire per bit.
    fn driven_bus(k: &mut Kernel, width: u32) -> (ComponentId, Vec<WireId>) {
        let pin = k.add_input_pin(width).unwrap();
        let wires: Vec<_> = (0..width)
            .map(|bit| {
                let w = k.add_wire().unwrap();
                k.add_driver(w, pin, 0, bit).unwrap();
                w
            })
            .collect();
        (pin, wires)
    }

    #[test]
    fn create_with_impossible_capacity_fails() {
        let config = KernelConfig {
            initial_wire_capacity: usize::MAX,
            ..KernelConfig::default()
        };
        assert_eq!(Kernel::create(config).err(), Some(ErrorCode::Allocation));
    }

    #[test]
    fn and_gate_evaluates() {
        let mut k = kernel();
        let (a_pin, a) = driven_bus(&mut k, 1);
        let (b_pin, b) = driven_bus(&mut k, 1);
        let gate = k
            .add_component(ComponentCreateInfo::binary(BinaryKind::And, 1, 2))
            .unwrap();
        k.connect_input(gate, 0, &a).unwrap();
        k.connect_input(gate, 1, &b).unwrap();
        let out = k.add_wire().unwrap();
        k.add_driver(out, gate, 0, 0).unwrap();

        k.set_input_pin(a_pin, &[Logic1]).unwrap();
        k.set_input_pin(b_pin, &[Logic1]).unwrap();
        assert!(k.step().unwrap());
        assert_eq!(k.get_wire_state(out).unwrap(), Logic1);

        k.set_input_pin(b_pin, &[Logic0]).unwrap();
        assert!(k.step().unwrap());
        assert_eq!(k.get_wire_state(out).unwrap(), Logic0);
        assert!(!k.step().unwrap());
    }

    #[test]
    fn constant_drives_without_inputs() {
        let mut k = kernel();
        let pull_up = k
            .add_component(ComponentCreateInfo::constant(ConstantKind::PullUp, 2))
            .unwrap();
        let w = k.add_wire().unwrap();
        k.add_driver(w, pull_up, 0, 1).unwrap();
        assert_eq!(k.get_wire_state(w).unwrap(), HighZ);
        k.step().unwrap();
        assert_eq!(k.get_wire_state(w).unwrap(), Logic1);
    }

    #[test]
    fn ring_oscillator_is_forced_undefined() {
        let mut k = Kernel::create(KernelConfig {
            max_step_iterations: 8,
            ..KernelConfig::default()
        })
        .unwrap();
        let (pin, bus) = driven_bus(&mut k, 1);
        let ring = bus[0];
        let not = k.add_component(ComponentCreateInfo::not(1)).unwrap();
        k.connect_input(not, 0, &[ring]).unwrap();
        k.set_input_pin(pin, &[Logic0]).unwrap();
        k.step().unwrap();
        assert_eq!(k.get_wire_state(ring).unwrap(), Logic0);

        // Close the loop while the wire still carries a driven value.
        k.remove_driver(ring, pin, 0, 0).unwrap();
        k.add_driver(ring, not, 0, 0).unwrap();
        assert!(k.step().unwrap());
        assert_eq!(k.get_wire_state(ring).unwrap(), Undefined);
        assert!(!k.step().unwrap());
    }

    #[test]
    fn chain_deeper_than_iteration_limit_settles() {
        let mut k = Kernel::create(KernelConfig {
            max_step_iterations: 8,
            ..KernelConfig::default()
        })
        .unwrap();
        let (pin, bus) = driven_bus(&mut k, 1);
        let mut tail = bus[0];
        for _ in 0..20 {
            let not = k.add_component(ComponentCreateInfo::not(1)).unwrap();
            k.connect_input(not, 0, &[tail]).unwrap();
            tail = k.add_wire().unwrap();
            k.add_driver(tail, not, 0, 0).unwrap();
        }

        k.set_input_pin(pin, &[Logic0]).unwrap();
        assert!(k.step().unwrap());
        assert_eq!(k.get_wire_state(tail).unwrap(), Logic0);

        k.set_input_pin(pin, &[Logic1]).unwrap();
        assert!(k.step().unwrap());
        assert_eq!(k.get_wire_state(tail).unwrap(), Logic1);
        assert!(!k.step().unwrap());
    }

    #[test]
    fn oversized_component_reports_allocation_failure() {
        let mut k = kernel();
        let info = ComponentCreateInfo::binary(BinaryKind::And, 1, u32::MAX);
        assert_eq!(k.add_component(info), Err(ErrorCode::Allocation));
        assert_eq!(k.component_count(), 0);
        assert!(k.add_output_pin(1).is_ok());
    }

    #[test]
    fn removing_wire_detaches_it_from_buses() {
        let mut k = kernel();
        let (pin, bus) = driven_bus(&mut k, 2);
        let out = k.add_output_pin(2).unwrap();
        k.connect_input(out, 0, &bus).unwrap();
        k.set_input_pin(pin, &[Logic1, Logic0]).unwrap();
        k.step().unwrap();

        k.remove_wire(bus[0]).unwrap();
        k.step().unwrap();
        let mut observed = [Undefined; 2];
        k.get_output_pin(out, &mut observed).unwrap();
        assert_eq!(observed, [HighZ, Logic0]);
        assert_eq!(k.get_wire_state(bus[0]), Err(ErrorCode::InvalidWireId));
    }

    #[test]
    fn connect_validation_is_atomic() {
        let mut k = kernel();
        let (_, bus) = driven_bus(&mut k, 1);
        let gate = k.add_component(ComponentCreateInfo::not(1)).unwrap();
        k.connect_input(gate, 0, &bus).unwrap();

        let stale = k.add_wire().unwrap();
        k.remove_wire(stale).unwrap();
        assert_eq!(k.connect_input(gate, 0, &[stale]), Err(ErrorCode::InvalidWireId));
        assert_eq!(k.connect_input(gate, 1, &bus), Err(ErrorCode::InvalidInputIndex));
        assert_eq!(
            k.connect_input(gate, 0, &[bus[0], bus[0]]),
            Err(ErrorCode::BusTooWide)
        );
        assert_eq!(k.component(gate).unwrap().inputs[0], vec![Some(bus[0])]);
    }

    #[test]
    fn driver_index_validation() {
        let mut k = kernel();
        let w = k.add_wire().unwrap();
        let pin = k.add_input_pin(2).unwrap();
        let out = k.add_output_pin(1).unwrap();
        assert_eq!(k.add_driver(w, pin, 0, 2), Err(ErrorCode::InvalidOutputIndex));
        assert_eq!(k.add_driver(w, pin, 1, 0), Err(ErrorCode::InvalidOutputIndex));
        assert_eq!(k.add_driver(w, out, 0, 0), Err(ErrorCode::InvalidOutputIndex));
        assert_eq!(k.remove_driver(w, pin, 0, 1), Ok(DriverStatus::NotPresent));
    }

    #[test]
    fn pins_reject_wrong_role_and_width() {
        let mut k = kernel();
        let input = k.add_input_pin(2).unwrap();
        let output = k.add_output_pin(2).unwrap();
        assert_eq!(
            k.set_input_pin(input, &[Logic1]),
            Err(ErrorCode::InvalidLogicState)
        );
        assert_eq!(
            k.set_input_pin(output, &[Logic1, Logic1]),
            Err(ErrorCode::InvalidComponentId)
        );
        let mut buf = [HighZ; 2];
        assert_eq!(
            k.get_output_pin(input, &mut buf),
            Err(ErrorCode::InvalidComponentId)
        );
        assert_eq!(k.add_input_pin(0), Err(ErrorCode::InvalidComponentConfiguration));
    }

    #[test]
    fn destroyed_kernel_rejects_everything() {
        let mut k = kernel();
        let w = k.add_wire().unwrap();
        k.destroy().unwrap();
        assert_eq!(k.get_wire_state(w), Err(ErrorCode::InvalidSimulation));
        assert_eq!(k.add_wire(), Err(ErrorCode::InvalidSimulation));
        assert_eq!(k.step(), Err(ErrorCode::InvalidSimulation));
        assert_eq!(k.destroy(), Err(ErrorCode::InvalidSimulation));
    }
}
