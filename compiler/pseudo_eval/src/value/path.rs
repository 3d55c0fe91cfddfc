//! Access paths.

use std::fmt;

use smallvec::SmallVec;

/// An ordered chain of access segments (`a.b[0]` is `a`, `b`, `0`).
///
/// Segments are drained from the front with [`Path::next`] and from the
/// back with [`Path::last`]; callers that must not consume a path clone it
/// first.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: SmallVec<[String; 4]>,
}

impl Path {
    #[inline]
    pub fn new() -> Self {
        Path::default()
    }

    /// Split a dotted string. Empty input is the empty path.
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return Path::new();
        }
        path.split('.').map(str::to_string).collect()
    }

    pub fn single(segment: impl Into<String>) -> Self {
        let mut path = Path::new();
        path.push(segment);
        path
    }

    #[inline]
    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    /// Remove and return the first segment.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<String> {
        if self.segments.is_empty() {
            None
        } else {
            Some(self.segments.remove(0))
        }
    }

    /// Remove and return the last segment.
    #[inline]
    pub fn last(&mut self) -> Option<String> {
        self.segments.pop()
    }

    #[inline]
    pub fn first(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// Everything after the first segment.
    pub fn rest(&self) -> Path {
        self.segments.iter().skip(1).cloned().collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl FromIterator<String> for Path {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Path {
            segments: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({self})")
    }
}
