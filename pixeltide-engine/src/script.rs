use std::sync::Arc;

use parking_lot::Mutex;
use pixeltide_audio::AudioGraph;
use pixeltide_graphics::Canvas;

use crate::events::Environment;
use crate::input::InputDevice;
use crate::storage::Storage;

/// Opaque handles handed to the script layer's one-shot `boot` call. Nothing
/// here is retained by the engine beyond that call; the script layer is
/// expected to stash whatever references it needs.
pub struct Services<'a> {
    pub canvas: &'a mut Canvas,
    pub input: &'a mut dyn InputDevice,
    pub audio: Arc<Mutex<AudioGraph>>,
    pub environment: &'a Environment,
    pub storage: &'a Storage,
}

/// The four entry points a script layer exposes. Any non-`true` return from
/// `boot` or `update` initiates shutdown.
pub trait ScriptBridge: Send {
    fn boot(&mut self, services: &mut Services) -> bool;
    fn process(&mut self, events: &[&str]);
    fn update(&mut self, dt: f32) -> bool;
    fn render(&mut self, alpha: f32);
}
