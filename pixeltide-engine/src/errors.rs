/// Failures that prevent the engine from starting at all; the caller logs
/// one line identifying the failed stage and exits with a non-zero code.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("configuration error: {0}")]
    Config(#[from] pixeltide_config::ConfigError),
    #[error("required asset `{0}` is missing")]
    MissingAsset(String),
    #[error("display could not be created: {0}")]
    Display(String),
    #[error("audio device could not be created: {0}")]
    Audio(#[from] pixeltide_audio::DeviceError),
    #[error("script interpreter failed to boot")]
    ScriptBoot,
    #[error("storage mount failed: {0}")]
    Storage(#[from] pixeltide_archive::ArchiveError),
}

/// A sub-system's per-step failure during the running loop. The loop
/// transitions to shutdown at the next step boundary; it never unwinds
/// mid-step.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("script callback `{0}` failed")]
    Script(&'static str),
    #[error("{0} update reported failure")]
    SubsystemUpdate(&'static str),
}
