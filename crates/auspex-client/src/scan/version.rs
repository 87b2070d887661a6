//! Scan result document version numbers.

use std::fmt;

/// A `major.minor` version of the CLI scan result document.
///
/// The major number selects the schema; the minor is informational only.
/// Versions are ordered and comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScanVersion {
    /// Schema-selecting major version.
    pub major: u32,

    /// Informational minor version.
    pub minor: u32,
}

impl ScanVersion {
    /// Create a version from its parts.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse `"major"` or `"major.minor"`. Anything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() {
            return None;
        }

        let mut parts = s.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = match parts.next() {
            Some(minor) => minor.parse().ok()?,
            None => 0,
        };
        if parts.next().is_some() {
            return None;
        }

        Some(Self { major, minor })
    }
}

impl fmt::Display for ScanVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_major_minor() {
        assert_eq!(ScanVersion::parse("1.0"), Some(ScanVersion::new(1, 0)));
        assert_eq!(ScanVersion::parse("2.3"), Some(ScanVersion::new(2, 3)));
    }

    #[test]
    fn test_parse_bare_major_defaults_minor_to_zero() {
        assert_eq!(ScanVersion::parse("2"), Some(ScanVersion::new(2, 0)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(ScanVersion::parse(""), None);
        assert_eq!(ScanVersion::parse("one.two"), None);
        assert_eq!(ScanVersion::parse("1.2.3"), None);
        assert_eq!(ScanVersion::parse("-1.0"), None);
        assert_eq!(ScanVersion::parse("1."), None);
        assert_eq!(ScanVersion::parse("."), None);
    }

    #[test]
    fn test_ordering() {
        assert!(ScanVersion::new(1, 9) < ScanVersion::new(2, 0));
        assert!(ScanVersion::new(2, 0) < ScanVersion::new(2, 1));
        assert_eq!(ScanVersion::new(2, 0), ScanVersion::parse("2").unwrap());
    }

    #[test]
    fn test_display() {
        assert_eq!(ScanVersion::new(2, 3).to_string(), "2.3");
    }
}
