/*!
# Shared Types

Types describing where in a document a match was found.
*/
use serde_json::Value;
use std::fmt::Display;

/// A matched value together with its location in the document.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct JSONPointer<'a> {
    /// Keys and indices walked from the root, e.g. \["companies", 1, "name"\]
    pub path: Vec<PathType<'a>>,
    /// A reference to the value in the JSON document
    pub value: &'a Value,
}

impl JSONPointer<'_> {
    /// Renders the location as a path expression, e.g. `.companies[1].name`.
    /// Evaluating it against the same document selects the same value,
    /// unless a key on the way contains `.` or `[`, see [`format_location`].
    #[must_use]
    pub fn location(&self) -> String {
        format_location(&self.path)
    }
}

impl Display for JSONPointer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location(), self.value)
    }
}

/// One step taken while walking the document.
#[derive(Hash, PartialEq, Eq, Debug, Clone, Copy)]
pub enum PathType<'a> {
    /// Represents an index in an array, e.g., "foo\[3\]"
    Index(usize),
    /// Represents a field in an object, e.g., "foo.bar"
    Field(&'a str),
}

impl Display for PathType<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(index) => write!(f, "[{index}]"),
            Self::Field(name) => write!(f, ".{name}"),
        }
    }
}

/// Renders a walked path in path expression syntax. The root is `""`.
///
/// An index directly following another index starts its own segment
/// (`.grid[1].[2]`) since a segment holds a single accessor.
///
/// Keys are written verbatim. The path syntax has no escapes, so a key
/// containing `.` or `[` (reachable through
/// [`PathBuilder::field`](crate::path::PathBuilder::field)) renders to a
/// string that parses back into different segments.
#[must_use]
pub fn format_location(path: &[PathType]) -> String {
    let mut location = String::new();
    let mut previous = None;
    for step in path {
        if let (Some(PathType::Index(_)), PathType::Index(_)) = (previous, step)
        {
            location.push('.');
        }
        location.push_str(&step.to_string());
        previous = Some(*step);
    }
    location
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_uses_path_syntax() {
        let value = Value::Null;
        let pointer = JSONPointer {
            path: vec![
                PathType::Field("companies"),
                PathType::Index(1),
                PathType::Field("name"),
            ],
            value: &value,
        };
        assert_eq!(pointer.location(), ".companies[1].name");
        assert_eq!(pointer.to_string(), ".companies[1].name: null");
    }

    #[test]
    fn root_location_is_empty() {
        assert_eq!(format_location(&[]), "");
        assert_eq!(format_location(&[PathType::Index(0)]), "[0]");
    }

    #[test]
    fn keys_are_written_verbatim() {
        let path = [PathType::Field("a.b"), PathType::Field("c[0]")];
        assert_eq!(format_location(&path), ".a.b.c[0]");
    }

    #[test]
    fn consecutive_indices_get_their_own_segment() {
        let path =
            [PathType::Field("grid"), PathType::Index(1), PathType::Index(2)];
        assert_eq!(format_location(&path), ".grid[1].[2]");
    }
}
