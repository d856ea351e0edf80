//! Structured field paths.
//!
//! Array-entry field names are composed paths (`users[0].name`), not ad-hoc
//! string concatenation. Both the emitter and the runtime validator go
//! through [`FieldPath`] so the wire format cannot drift between them.

use std::fmt;

/// One segment of a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// An object key (a field or array name).
    Key(String),
    /// A positional index into an array's entries.
    Index(usize),
}

/// A path from the form's value root to one field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// A path rooted at a top-level key.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Key(name.into())],
        }
    }

    /// Appends an object key.
    pub fn key(mut self, name: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(name.into()));
        self
    }

    /// Appends an array index.
    pub fn index(mut self, idx: usize) -> Self {
        self.segments.push(PathSegment::Index(idx));
        self
    }

    /// The path of one field inside one array entry.
    pub fn entry_field(array: &str, index: usize, field: &str) -> Self {
        Self::root(array).index(index).key(field)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    /// Canonical wire format: `users[0].name`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{name}")?;
                }
                PathSegment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_form() {
        assert_eq!(FieldPath::root("email").to_string(), "email");
        assert_eq!(
            FieldPath::entry_field("users", 0, "name").to_string(),
            "users[0].name"
        );
        assert_eq!(
            FieldPath::root("matrix").index(1).index(2).key("cell").to_string(),
            "matrix[1][2].cell"
        );
    }

    #[test]
    fn empty_path() {
        assert!(FieldPath::default().is_empty());
        assert_eq!(FieldPath::default().to_string(), "");
    }
}
