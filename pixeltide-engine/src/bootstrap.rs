use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use pixeltide_audio::{AudioDevice, AudioGraph, BalanceLaw, PanLaw};
use pixeltide_config::{check_version_compatible, Config, Version};
use tracing::info;

use crate::errors::BootstrapError;
use crate::storage::Storage;

/// The running engine's own version, compared against a configured
/// `system-version` during bootstrap.
pub const ENGINE_VERSION: Version = Version { major: 0, minor: 1, revision: 0 };

/// Everything bootstrap assembles before the script layer's `boot` callback
/// runs: the parsed configuration, the resolved storage stack, and a live
/// audio device backing a fresh [`AudioGraph`]. Display, input and the
/// script bridge itself are constructed by the caller (they depend on a
/// concrete windowing backend this crate does not own) and combined with
/// this session via [`crate::EngineLoop::new`].
pub struct Session {
    pub config: Config,
    pub storage: Storage,
    pub audio_graph: Arc<Mutex<AudioGraph>>,
    pub audio_device: AudioDevice,
}

/// Parses `config_text`, applies `cli_overrides`, checks version
/// compatibility, mounts `storage` according to the caller's asset layout,
/// and opens the default audio output device.
///
/// `mount` is given the parsed config and must mount whatever archives or
/// directories the asset layout requires; it runs before the audio device
/// is opened so a storage failure never leaves a live audio stream behind.
pub fn bootstrap(
    config_text: &str,
    cli_overrides: impl IntoIterator<Item = &'static str>,
    mount: impl FnOnce(&Config, &mut Storage) -> Result<(), BootstrapError>,
) -> Result<Session, BootstrapError> {
    let mut config = Config::parse(config_text);
    config.apply_overrides(cli_overrides);
    check_version_compatible(&config, ENGINE_VERSION)?;

    let mut storage = Storage::new();
    mount(&config, &mut storage)?;

    let audio_graph = Arc::new(Mutex::new(AudioGraph::with_default_laws(
        PanLaw::ConstantPowerSinCos,
        BalanceLaw::SinCos,
    )));
    let audio_device = AudioDevice::open(audio_graph.clone())?;

    info!(
        identity = %config.system.identity,
        fps = config.engine.frames_per_second,
        "engine bootstrapped"
    );

    Ok(Session { config, storage, audio_graph, audio_device })
}

/// Convenience mount closure for the common case of a single asset
/// directory with no packed archive.
pub fn mount_directory_only(dir: impl AsRef<Path>) -> impl FnOnce(&Config, &mut Storage) -> Result<(), BootstrapError> {
    let dir = dir.as_ref().to_path_buf();
    move |_config, storage| {
        storage.mount_directory(dir);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_rejects_newer_configured_version() {
        let text = "[system]\nversion=99.0.0\n";
        let result = bootstrap(text, [], |_, _| Ok(()));
        assert!(matches!(result, Err(BootstrapError::Config(_))));
    }

    #[test]
    fn bootstrap_propagates_mount_failure() {
        let result = bootstrap("", [], |_, _| Err(BootstrapError::MissingAsset("assets/icon.png".into())));
        assert!(matches!(result, Err(BootstrapError::MissingAsset(_))));
    }
}
