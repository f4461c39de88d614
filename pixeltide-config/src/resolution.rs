/// Named resolution presets accepted by `display-resolution`.
const PRESETS: &[(&str, u32, u32)] = &[
    ("QQVGA", 160, 120),
    ("QVGA", 320, 240),
    ("HVGA", 480, 320),
    ("VGA", 640, 480),
    ("SVGA", 800, 600),
];

/// Case-insensitive lookup, returning `(width, height)`.
pub fn find(name: &str) -> Option<(u32, u32)> {
    PRESETS.iter().find(|(preset, _, _)| preset.eq_ignore_ascii_case(name)).map(|(_, w, h)| (*w, *h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_preset_is_case_insensitive() {
        assert_eq!(find("qvga"), Some((320, 240)));
        assert_eq!(find("QVGA"), Some((320, 240)));
    }

    #[test]
    fn unknown_preset_returns_none() {
        assert_eq!(find("not-a-preset"), None);
    }
}
