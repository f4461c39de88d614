//! Bootstrap configuration: a key-value text format with bracketed context
//! sections, parsed into a strongly-typed [`Config`], with command-line
//! overrides layered on top.

mod config;
mod errors;
mod parser;
mod resolution;
mod version;

pub use config::{AudioConfig, Config, ControllerConfig, CursorConfig, DisplayConfig, EngineConfig, KeyboardConfig, SystemConfig};
pub use errors::ConfigError;
pub use version::Version;

/// Bootstrap-time check that a configured engine version isn't newer than
/// the engine actually running it.
pub fn check_version_compatible(config: &Config, running: Version) -> Result<(), ConfigError> {
    if config.system.version.is_satisfied_by(running) {
        Ok(())
    } else {
        Err(ConfigError::IncompatibleVersion { requested: config.system.version, running })
    }
}
