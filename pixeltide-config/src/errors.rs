use crate::version::Version;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("configured engine version {requested} is newer than the running engine {running}")]
    IncompatibleVersion { requested: Version, running: Version },
}
