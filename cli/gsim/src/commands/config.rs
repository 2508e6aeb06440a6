//! `gsim config` — effective settings.

use std::path::Path;

use anyhow::Result;

use gsim::SimulatorConfig;

pub fn run(config: &SimulatorConfig, path: &Path) -> Result<()> {
    if path.exists() {
        println!("# loaded from {}", path.display());
    } else {
        println!("# defaults ({} not found)", path.display());
    }
    print!("{}", config.to_toml()?);
    Ok(())
}
