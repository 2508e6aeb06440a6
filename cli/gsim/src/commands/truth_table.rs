//! `gsim truth-table` — tabulate a gate by driving it through the simulator.

use anyhow::{bail, Result};
use serde::Serialize;

use gsim::{BinaryKind, ComponentCreateInfo, LogicState, Simulator, SimulatorConfig};

const MAX_INPUTS: u32 = 8;

/// One simulated row.
#[derive(Debug, Serialize)]
pub struct Row {
    pub inputs: Vec<LogicState>,
    pub output: LogicState,
}

/// Complete table for one gate.
#[derive(Debug, Serialize)]
pub struct TruthTable {
    pub gate: String,
    pub rows: Vec<Row>,
}

fn parse_gate(gate: &str, inputs: u32) -> Result<ComponentCreateInfo> {
    let kind = match gate.to_ascii_lowercase().as_str() {
        "not" => return Ok(ComponentCreateInfo::not(1)),
        "and" => BinaryKind::And,
        "nand" => BinaryKind::Nand,
        "or" => BinaryKind::Or,
        "nor" => BinaryKind::Nor,
        "xor" => BinaryKind::Xor,
        "xnor" => BinaryKind::Xnor,
        other => bail!(
            "unknown gate: '{other}'. Expected one of: and, nand, or, nor, xor, xnor, not"
        ),
    };
    if !(2..=MAX_INPUTS).contains(&inputs) {
        bail!("'{gate}' needs between 2 and {MAX_INPUTS} inputs, got {inputs}");
    }
    Ok(ComponentCreateInfo::binary(kind, 1, inputs))
}

/// Simulate every input combination of `gate`.
pub fn build(
    config: SimulatorConfig,
    gate: &str,
    inputs: u32,
    four_state: bool,
) -> Result<TruthTable> {
    let info = parse_gate(gate, inputs)?;
    let values: &[LogicState] = if four_state {
        &[
            LogicState::Logic0,
            LogicState::Logic1,
            LogicState::HighZ,
            LogicState::Undefined,
        ]
    } else {
        &[LogicState::Logic0, LogicState::Logic1]
    };

    let mut sim = Simulator::with_config(config)?;
    let component = sim.add_component(info)?;
    let mut pins = Vec::new();
    for index in 0..info.input_count {
        let pin = sim.add_input_pin(1)?;
        let wire = sim.add_wire()?;
        wire.add_driver(&mut sim, pin, (0, 0))?;
        component.connect_input(&mut sim, index, &[wire])?;
        pins.push(pin);
    }
    let output = sim.add_output_pin(1)?;
    let result = sim.add_wire()?;
    result.add_driver(&mut sim, component, (0, 0))?;
    output.connect(&mut sim, &[result])?;

    let radix = values.len();
    let combinations = radix.pow(info.input_count);
    let mut rows = Vec::with_capacity(combinations);
    for row in 0..combinations {
        // Most significant input first.
        let row_inputs: Vec<LogicState> = (0..pins.len())
            .rev()
            .map(|i| values[(row / radix.pow(i as u32)) % radix])
            .collect();
        for (pin, state) in pins.iter().zip(&row_inputs) {
            pin.set(&mut sim, std::slice::from_ref(state))?;
        }
        sim.step()?;
        let mut observed = [LogicState::HighZ];
        output.get(&sim, &mut observed)?;
        rows.push(Row {
            inputs: row_inputs,
            output: observed[0],
        });
    }
    sim.destroy()?;

    Ok(TruthTable {
        gate: info.kind.to_string(),
        rows,
    })
}

pub fn run(
    config: SimulatorConfig,
    gate: &str,
    inputs: u32,
    four_state: bool,
    json: bool,
) -> Result<()> {
    let table = build(config, gate, inputs, four_state)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    println!("=== {} ===", table.gate);
    let width = table.rows.first().map_or(0, |r| r.inputs.len());
    let header: Vec<String> = (0..width).map(|i| format!("i{i}")).collect();
    println!("{} | out", header.join(" "));
    for row in &table.rows {
        let cells: Vec<String> = row.inputs.iter().map(|s| format!("{s:<2}")).collect();
        println!("{} |  {}", cells.join(" "), row.output);
    }
    Ok(())
}
