mod bootstrap;
mod display;
mod errors;
mod events;
mod input;
mod loop_;
mod script;
mod storage;

pub use bootstrap::{bootstrap, mount_directory_only, Session, ENGINE_VERSION};
pub use display::{Display, ShaderUniforms};
pub use errors::{BootstrapError, RuntimeError};
pub use events::{diff, EnvironmentSource, Environment, EventQueue, SENTINEL};
pub use input::InputDevice;
pub use loop_::EngineLoop;
pub use script::{Services, ScriptBridge};
pub use storage::Storage;
