use pixeltide_shared::Color;

/// Uniforms the default pass-through fragment shader (and any replacement
/// effect shader) receives every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderUniforms {
    pub texture_size: (f32, f32),
    pub screen_size: (f32, f32),
    pub screen_scale: (f32, f32),
    pub time: f32,
}

/// Binary interface to a GPU context: create a texture, upload the RGBA
/// canvas into it, and draw a single textured quad through a fragment
/// shader. Implemented by the windowing layer, never by this crate.
pub trait Display: Send {
    fn create_texture(&mut self, width: u32, height: u32);
    fn upload_subimage(&mut self, rgba: &[Color], x: u32, y: u32, width: u32, height: u32);
    fn draw_quad(&mut self, uniforms: ShaderUniforms);
    fn present(&mut self);
    fn should_close(&self) -> bool;
    /// Per-tick housekeeping (resize handling, vsync bookkeeping). Returns
    /// `false` to request shutdown.
    fn update(&mut self, dt: f32) -> bool;
}
