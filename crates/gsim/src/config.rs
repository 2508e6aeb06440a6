//! Simulator settings (`gsim.toml`).
//!
//! ```toml
//! leak-warnings = true
//!
//! [kernel]
//! max-step-iterations = 1000
//! initial-component-capacity = 64
//! initial-wire-capacity = 64
//! ```

use std::path::Path;

use gsim_kernel::KernelConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// Default settings file name looked up by front ends.
pub const CONFIG_FILE_NAME: &str = "gsim.toml";

/// Settings applied when a [`Simulator`](crate::Simulator) is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SimulatorConfig {
    /// Log a warning when a simulator is dropped without `destroy` (debug builds).
    pub leak_warnings: bool,
    /// Settings forwarded to the in-process kernel.
    pub kernel: KernelConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            leak_warnings: true,
            kernel: KernelConfig::default(),
        }
    }
}

impl SimulatorConfig {
    /// Parse settings from a TOML string.
    pub fn parse(input: &str) -> Result<Self> {
        let config: SimulatorConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Load settings from `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading simulator config");
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.kernel.max_step_iterations == 0 {
            return Err(SimulationError::InvalidConfig {
                detail: "kernel.max-step-iterations must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_input_is_default() {
        assert_eq!(SimulatorConfig::parse("").unwrap(), SimulatorConfig::default());
    }

    #[test]
    fn partial_kernel_table() {
        let config = SimulatorConfig::parse(
            r#"
leak-warnings = false

[kernel]
max-step-iterations = 16
"#,
        )
        .unwrap();
        assert!(!config.leak_warnings);
        assert_eq!(config.kernel.max_step_iterations, 16);
        assert_eq!(
            config.kernel.initial_wire_capacity,
            KernelConfig::default().initial_wire_capacity
        );
    }

    #[test]
    fn zero_iterations_rejected() {
        let err = SimulatorConfig::parse("[kernel]\nmax-step-iterations = 0\n").unwrap_err();
        assert!(matches!(err, SimulationError::InvalidConfig { .. }));
    }

    #[test]
    fn malformed_toml_rejected() {
        let err = SimulatorConfig::parse("leak-warnings = ").unwrap_err();
        assert!(matches!(err, SimulationError::Toml(_)));
    }

    #[test]
    fn load_from_file_and_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert_eq!(
            SimulatorConfig::load_or_default(&path).unwrap(),
            SimulatorConfig::default()
        );

        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[kernel]\ninitial-component-capacity = 8").unwrap();
        let config = SimulatorConfig::load_or_default(&path).unwrap();
        assert_eq!(config.kernel.initial_component_capacity, 8);
    }

    #[test]
    fn rendered_toml_parses_back() {
        let config = SimulatorConfig::default();
        assert_eq!(SimulatorConfig::parse(&config.to_toml().unwrap()).unwrap(), config);
    }
}
