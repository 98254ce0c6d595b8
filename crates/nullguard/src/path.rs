// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Root-anchored value paths (`root.a[0][k].key[x]`).

use crate::value::Value;
use std::fmt;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// The `root` anchor.
    Root,
    /// `.name`
    Field(String),
    /// `[n]`
    Index(usize),
    /// `[k]`
    Key(String),
    /// `.key[k]`, location of a mapping key itself.
    KeyMarker(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("root"),
            Self::Field(name) => write!(f, ".{}", name),
            Self::Index(i) => write!(f, "[{}]", i),
            Self::Key(k) => write!(f, "[{}]", k),
            Self::KeyMarker(k) => write!(f, ".key[{}]", k),
        }
    }
}

/// Ordered segments from the root to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Default for Path {
    fn default() -> Self {
        Self::root()
    }
}

impl Path {
    /// The root path.
    pub fn root() -> Self {
        Self {
            segments: vec![Segment::Root],
        }
    }

    /// Append a segment.
    pub fn push(&self, segment: Segment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }

    /// Child path for a named field.
    pub fn field(&self, name: &str) -> Self {
        self.push(Segment::Field(name.to_string()))
    }

    /// Child path for a sequence index.
    pub fn index(&self, index: usize) -> Self {
        self.push(Segment::Index(index))
    }

    /// Child path for a mapping value.
    pub fn key(&self, key: &Value) -> Self {
        self.push(Segment::Key(key.to_string()))
    }

    /// Child path for a mapping key.
    pub fn key_marker(&self, key: impl fmt::Display) -> Self {
        self.push(Segment::KeyMarker(key.to_string()))
    }

    /// Re-anchor a root-relative path below this one.
    pub fn join(&self, relative: &Path) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(
            relative
                .segments
                .iter()
                .filter(|s| **s != Segment::Root)
                .cloned(),
        );
        Self { segments }
    }

    /// Segments, starting with [`Segment::Root`].
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }

    /// Check if this is the root path.
    pub fn is_root(&self) -> bool {
        self.depth() == 0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl PartialEq<str> for Path {
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<&str> for Path {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl PartialEq<Path> for &str {
    fn eq(&self, other: &Path) -> bool {
        other == self
    }
}

/// Render paths as strings.
pub fn render(paths: &[Path]) -> Vec<String> {
    paths.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root() {
        assert_eq!(Path::root().to_string(), "root");
        assert!(Path::root().is_root());
    }

    #[test]
    fn test_segments_render_in_order() {
        let p = Path::root()
            .field("items")
            .index(2)
            .key(&Value::from("k"))
            .key_marker(Value::Null);
        assert_eq!(p.to_string(), "root.items[2][k].key[null]");
        assert_eq!(p.depth(), 4);
    }

    #[test]
    fn test_compare_with_str() {
        let p = Path::root().field("s");
        assert_eq!(p, "root.s");
        assert!("root.s" == p);
        assert_ne!(p, "root.t");
    }

    #[test]
    fn test_join() {
        let base = Path::root().field("outer").index(0);
        let relative = Path::root().field("x");
        assert_eq!(base.join(&relative), "root.outer[0].x");
        assert_eq!(Path::root().join(&Path::root()), "root");
    }

    #[test]
    fn test_push_does_not_mutate_parent() {
        let parent = Path::root().field("a");
        let _child = parent.index(0);
        assert_eq!(parent, "root.a");
    }
}
