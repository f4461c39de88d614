use std::fmt;

/// `major.minor.revision`, as found in the `system-version` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub revision: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32, revision: u32) -> Self {
        Version { major, minor, revision }
    }

    /// Parses `"M.m.r"`; missing components default to zero, matching the
    /// original `sscanf("%d.%d.%d", ...)` behaviour of tolerating a partial
    /// version string.
    pub fn parse(text: &str) -> Self {
        let mut parts = text.splitn(3, '.');
        let major = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
        let minor = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
        let revision = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
        Version { major, minor, revision }
    }

    /// A configuration requesting a newer engine than the one running is a
    /// bootstrap failure; older or equal requests are accepted.
    pub fn is_satisfied_by(&self, running: Version) -> bool {
        *self <= running
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_version() {
        assert_eq!(Version::parse("1.2.3"), Version::new(1, 2, 3));
    }

    #[test]
    fn parses_partial_version_as_zero_filled() {
        assert_eq!(Version::parse("2"), Version::new(2, 0, 0));
    }

    #[test]
    fn newer_requested_version_is_unsatisfied() {
        let requested = Version::new(2, 0, 0);
        assert!(!requested.is_satisfied_by(Version::new(1, 9, 9)));
        assert!(requested.is_satisfied_by(Version::new(2, 0, 0)));
    }
}
