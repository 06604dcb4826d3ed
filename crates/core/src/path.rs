//! Path normalisation and segment-aware prefix matching.

use crate::error::AccessError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalises a stored path or alias: leading `/`, no empty or `.` segments,
/// no trailing `/`, query and fragment dropped. Returns `None` for empty input
/// and for paths containing a `..` segment.
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let without_query = trimmed
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    if without_query.is_empty() {
        return None;
    }
    let segments: Vec<&str> = without_query
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    if segments.contains(&"..") {
        return None;
    }
    if segments.is_empty() {
        return Some("/".to_string());
    }
    Some(format!("/{}", segments.join("/")))
}

/// A normalised path prefix covering itself and everything nested below it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PathPrefix(String);

impl PathPrefix {
    pub fn parse(raw: &str) -> Result<Self, AccessError> {
        normalize(raw)
            .map(PathPrefix)
            .ok_or_else(|| AccessError::InvalidPrefix(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Segment-bounded match: `/news` covers `/news` and `/news/x`, not
    /// `/newsroom`. The root prefix covers every path.
    pub fn covers(&self, path: &str) -> bool {
        if self.0 == "/" {
            return path.starts_with('/');
        }
        match path.strip_prefix(self.0.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl fmt::Display for PathPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PathPrefix {
    type Error = AccessError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PathPrefix::parse(&value)
    }
}

impl From<PathPrefix> for String {
    fn from(value: PathPrefix) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_leading_and_strips_trailing_slash() {
        assert_eq!(normalize("news/").as_deref(), Some("/news"));
        assert_eq!(normalize("  /news//sports/ ").as_deref(), Some("/news/sports"));
        assert_eq!(normalize("/news?page=2#top").as_deref(), Some("/news"));
        assert_eq!(normalize("/").as_deref(), Some("/"));
        assert_eq!(normalize("   "), None);
        assert_eq!(normalize("?q=1"), None);
    }

    #[test]
    fn dot_segments_are_dropped_and_parent_segments_rejected() {
        assert_eq!(normalize("/news/./sports").as_deref(), Some("/news/sports"));
        assert_eq!(normalize("/news/../blog/x"), None);
        assert_eq!(normalize(".."), None);
        assert!(matches!(
            PathPrefix::parse("/news/.."),
            Err(AccessError::InvalidPrefix(_))
        ));
    }

    #[test]
    fn prefix_covers_itself_and_descendants() {
        let news = PathPrefix::parse("/news").unwrap();
        assert!(news.covers("/news"));
        assert!(news.covers("/news/something"));
        assert!(news.covers("/news/sports/rugby"));
    }

    #[test]
    fn prefix_is_segment_bounded() {
        let news = PathPrefix::parse("/news").unwrap();
        assert!(!news.covers("/newsroom"));
        assert!(!news.covers("/news-archive/x"));
        assert!(!news.covers("/blog/news"));
    }

    #[test]
    fn descendant_prefix_does_not_cover_ancestor() {
        let sports = PathPrefix::parse("/news/sports").unwrap();
        assert!(!sports.covers("/news"));
        assert!(!sports.covers("/news/something"));
        assert!(sports.covers("/news/sports/rugby"));
    }

    #[test]
    fn root_prefix_covers_everything() {
        let root = PathPrefix::parse("/").unwrap();
        assert!(root.covers("/"));
        assert!(root.covers("/anything/at/all"));
    }

    #[test]
    fn empty_prefix_is_rejected() {
        assert!(matches!(
            PathPrefix::parse(""),
            Err(AccessError::InvalidPrefix(_))
        ));
    }
}
