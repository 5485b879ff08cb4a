//! Segment-wise option paths.
//!
//! An [`OptionPath`] is the list of field names from the root of the options
//! tree to a node. Prefix tests compare whole segments, so `theme` is a
//! prefix of `theme.dark.bg` but not of `themeX.bg`.

use std::fmt;
use std::str::FromStr;

/// Path of a node in the options tree. The empty path addresses the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionPath(Vec<String>);

impl OptionPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parses a dotted id. Empty segments are skipped, so `""` is the root
    /// and `"a..b"` equals `"a.b"`.
    pub fn parse(dotted: &str) -> Self {
        Self(
            dotted
                .split('.')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Whole-segment prefix test. The root path is a prefix of every path.
    pub fn starts_with(&self, prefix: &OptionPath) -> bool {
        self.0.len() >= prefix.0.len() && self.0.iter().zip(prefix.0.iter()).all(|(a, b)| a == b)
    }
}

impl fmt::Display for OptionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for OptionPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for OptionPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        let path = OptionPath::parse("theme.dark.primary.bg");
        assert_eq!(path.segments(), ["theme", "dark", "primary", "bg"]);
        assert_eq!(path.to_string(), "theme.dark.primary.bg");
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn empty_string_is_root() {
        assert!(OptionPath::parse("").is_root());
        assert_eq!(OptionPath::parse("a..b"), OptionPath::parse("a.b"));
    }

    #[test]
    fn prefix_matches_whole_segments_only() {
        let theme = OptionPath::parse("theme");
        assert!(OptionPath::parse("theme.dark.bg").starts_with(&theme));
        assert!(OptionPath::parse("theme").starts_with(&theme));
        assert!(!OptionPath::parse("themeX.bg").starts_with(&theme));
        assert!(!OptionPath::parse("bar.position").starts_with(&theme));
        assert!(!OptionPath::parse("theme").starts_with(&OptionPath::parse("theme.dark")));
    }

    #[test]
    fn root_prefix_matches_everything() {
        assert!(OptionPath::parse("bar.position").starts_with(&OptionPath::root()));
        assert!(OptionPath::root().starts_with(&OptionPath::root()));
    }

    #[test]
    fn child_appends_segment() {
        let path = OptionPath::from_segments(["a"]).child("b");
        assert_eq!(path, "a.b".parse().unwrap());
    }
}
