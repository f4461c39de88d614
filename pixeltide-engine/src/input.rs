/// Keyboard/gamepad polling, implemented by the windowing layer. `update`
/// refreshes the polled state; the environment's controller sets are read
/// from it once per iteration to build the events buffer.
pub trait InputDevice: Send {
    fn update(&mut self, dt: f32) -> bool;
}
