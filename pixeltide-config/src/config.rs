use crate::parser::{parse_line, parse_override, Line};
use crate::resolution;
use crate::version::Version;

#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    pub identity: String,
    pub version: Version,
    pub debug: bool,
    pub icon: String,
    pub mappings: String,
    pub quit_on_close: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        SystemConfig {
            identity: String::new(),
            version: Version::new(0, 1, 0),
            debug: true,
            icon: "assets/png/icon.png".to_string(),
            mappings: "assets/txt/gamecontrollerdb.txt".to_string(),
            quit_on_close: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    pub fullscreen: bool,
    pub vertical_sync: bool,
    pub effect: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            title: "Pixeltide".to_string(),
            width: 320,
            height: 240,
            scale: 0,
            fullscreen: false,
            vertical_sync: false,
            effect: "assets/glsl/passthru.glsl".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioConfig {
    pub device_index: i32,
    pub master_volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig { device_index: -1, master_volume: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KeyboardConfig {
    pub exit_key: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorConfig {
    pub enabled: bool,
    pub hide: bool,
    pub speed: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        CursorConfig { enabled: true, hide: true, speed: 128.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    pub inner_deadzone: f32,
    pub outer_deadzone: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig { inner_deadzone: 0.25, outer_deadzone: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub frames_per_second: u32,
    pub skippable_frames: u32,
    pub frames_limit: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig { frames_per_second: 60, skippable_frames: 3, frames_limit: 0 }
    }
}

/// Bootstrap configuration assembled from defaults, an optional config file,
/// and command-line overrides, in that precedence order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub system: SystemConfig,
    pub display: DisplayConfig,
    pub audio: AudioConfig,
    pub keyboard: KeyboardConfig,
    pub cursor: CursorConfig,
    pub controller: ControllerConfig,
    pub engine: EngineConfig,
}

impl Config {
    /// Parses a configuration file's full text, applying each recognised
    /// parameter over the defaults, then normalises the identity.
    pub fn parse(text: &str) -> Self {
        let mut config = Config::default();
        let mut context = String::new();
        for raw_line in text.lines() {
            match parse_line(raw_line) {
                Line::Context(name) => context = name.to_string(),
                Line::Pair(key, value) => config.apply(&context, key, value),
                Line::Empty => {}
            }
        }
        config.normalize_identity();
        config
    }

    /// Applies `--<fully-qualified-key>=<value>` command-line overrides. The
    /// context is already fused into the key, so no section is implied.
    pub fn apply_overrides<'a>(&mut self, args: impl IntoIterator<Item = &'a str>) {
        for arg in args {
            if let Some((key, value)) = parse_override(arg) {
                self.apply("", key, value);
            }
        }
    }

    fn apply(&mut self, context: &str, key: &str, value: &str) {
        let fqn = if context.is_empty() { key.to_string() } else { format!("{context}-{key}") };
        match fqn.as_str() {
            "system-identity" => self.system.identity = value.to_string(),
            "system-version" => self.system.version = Version::parse(value),
            "system-debug" => self.system.debug = is_true(value),
            "system-icon" => self.system.icon = value.to_string(),
            "system-mappings" => self.system.mappings = value.to_string(),
            "system-quit-on-close" => self.system.quit_on_close = is_true(value),
            "display-title" => self.display.title = value.to_string(),
            "display-resolution" => match resolution::find(value) {
                Some((w, h)) => {
                    self.display.width = w;
                    self.display.height = h;
                }
                None => tracing::warn!("unknown resolution preset `{value}`"),
            },
            "display-width" => self.display.width = parse_or_warn(value, self.display.width),
            "display-height" => self.display.height = parse_or_warn(value, self.display.height),
            "display-scale" => self.display.scale = parse_or_warn(value, self.display.scale),
            "display-fullscreen" => self.display.fullscreen = is_true(value),
            "display-vertical-sync" => self.display.vertical_sync = is_true(value),
            "display-effect" => self.display.effect = value.to_string(),
            "audio-device-index" => self.audio.device_index = parse_or_warn(value, self.audio.device_index),
            "audio-master-volume" => self.audio.master_volume = parse_or_warn(value, self.audio.master_volume),
            "keyboard-exit-key" => self.keyboard.exit_key = is_true(value),
            "cursor-enabled" => self.cursor.enabled = is_true(value),
            "cursor-hide" => self.cursor.hide = is_true(value),
            "cursor-speed" => self.cursor.speed = parse_or_warn(value, self.cursor.speed),
            "controller-inner-deadzone" => {
                self.controller.inner_deadzone = parse_or_warn(value, self.controller.inner_deadzone)
            }
            "controller-outer-deadzone" => {
                self.controller.outer_deadzone = parse_or_warn(value, self.controller.outer_deadzone)
            }
            "engine-frames-per-seconds" => {
                self.engine.frames_per_second = parse_or_warn(value, self.engine.frames_per_second);
                self.engine.skippable_frames = self.engine.frames_per_second / 20;
            }
            "engine-skippable-frames" => {
                let suggested = self.engine.frames_per_second / 20;
                self.engine.skippable_frames = parse_or_warn(value, suggested).min(suggested);
            }
            "engine-frames-limit" => self.engine.frames_limit = parse_or_warn(value, self.engine.frames_limit),
            _ => tracing::debug!("ignoring unrecognised configuration key `{fqn}`"),
        }
    }

    /// If no explicit identity was set, derives a lowercase alphanumeric
    /// slug from the display title.
    fn normalize_identity(&mut self) {
        if self.system.identity.is_empty() {
            self.system.identity = self.display.title.chars().filter(|c| c.is_alphanumeric()).collect();
        }
        self.system.identity = self.system.identity.to_lowercase();
    }
}

fn is_true(value: &str) -> bool {
    value == "true"
}

fn parse_or_warn<T: std::str::FromStr>(value: &str, fallback: T) -> T {
    value.parse().unwrap_or_else(|_| {
        tracing::warn!("can't parse configuration value `{value}`, keeping default");
        fallback
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.engine.frames_per_second, 60);
        assert_eq!(config.engine.skippable_frames, 3);
        assert_eq!(config.audio.device_index, -1);
    }

    #[test]
    fn parses_sectioned_file() {
        let text = "\
[system]
identity=myquest
debug=false

[display]
width=640
height=480
fullscreen=true

[engine]
frames-per-seconds=30
";
        let config = Config::parse(text);
        assert_eq!(config.system.identity, "myquest");
        assert!(!config.system.debug);
        assert_eq!(config.display.width, 640);
        assert_eq!(config.display.height, 480);
        assert!(config.display.fullscreen);
        assert_eq!(config.engine.frames_per_second, 30);
        assert_eq!(config.engine.skippable_frames, 1); // 30/20 == 1
    }

    #[test]
    fn skippable_frames_override_is_clamped_to_suggestion() {
        let text = "\
[engine]
frames-per-seconds=60
skippable-frames=100
";
        let config = Config::parse(text);
        assert_eq!(config.engine.skippable_frames, 3); // clamped to 60/20
    }

    #[test]
    fn identity_falls_back_to_sanitized_title() {
        let text = "[display]\ntitle=My Game! v2\n";
        let config = Config::parse(text);
        assert_eq!(config.system.identity, "mygamev2");
    }

    #[test]
    fn resolution_preset_sets_width_and_height() {
        let text = "[display]\nresolution=VGA\n";
        let config = Config::parse(text);
        assert_eq!((config.display.width, config.display.height), (640, 480));
    }

    #[test]
    fn command_line_override_takes_fully_qualified_key() {
        let mut config = Config::default();
        config.apply_overrides(["--display-width=800", "--not-a-flag"]);
        assert_eq!(config.display.width, 800);
    }
}
