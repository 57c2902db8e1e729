/*!
# Path AST and Builder

Defines the parsed form of a path expression and a fluent API for building
one without going through a string.

# Examples

A path expression is an ordered list of [`Segment`]s, each holding a field
name and the raw text of an optional bracket accessor:

```
use jpath::path::{PathExpression, Segment};
let path = PathExpression::parse(".companies[1:3].name");
assert_eq!(
    path.segments(),
    &[Segment::new("companies", Some("[1:3]")), Segment::new("name", None)]
);
```

The same expression can be constructed with the [`PathBuilder`]:

```
use jpath::path::{PathBuilder, PathExpression};
let path = PathBuilder::new()
    .field("companies")
    .range(1..3)
    .field("name")
    .build();
assert_eq!(path, PathExpression::parse(".companies[1:3].name"));
assert_eq!(".companies[1:3].name", path.to_string());
```
*/
use std::{convert::Infallible, fmt::Display, ops::Range, str::FromStr};

use super::parse_path;

/// One dot-delimited unit of a path expression.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Segment {
    /// Field looked up when the segment meets an object. Empty for a pure
    /// bracket segment such as `[*]`.
    pub field: String,
    /// Raw accessor text including the brackets, e.g. `"[^2]"`.
    pub accessor: Option<String>,
}

impl Segment {
    /// Creates a segment from a field name and optional accessor text.
    #[must_use]
    pub fn new<T: Into<String>>(field: T, accessor: Option<&str>) -> Self {
        Self { field: field.into(), accessor: accessor.map(str::to_string) }
    }

    /// Returns `true` if the segment only selects within an array, e.g. `[0]`.
    #[must_use]
    pub const fn is_bracket_only(&self) -> bool {
        self.field.is_empty() && self.accessor.is_some()
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.field)?;
        if let Some(accessor) = &self.accessor {
            write!(f, "{accessor}")?;
        }
        Ok(())
    }
}

/// A parsed path expression. Immutable once built.
#[derive(Debug, PartialEq, Eq, Clone, Default, Hash)]
pub struct PathExpression {
    segments: Vec<Segment>,
}

impl PathExpression {
    /// Parses a path string. Never fails: malformed brackets are reported per
    /// branch during evaluation.
    #[must_use]
    pub fn parse(expression: &str) -> Self {
        parse_path(expression)
    }

    /// Wraps an already split list of segments.
    #[must_use]
    pub const fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// The segments in evaluation order.
    #[must_use]
    pub const fn segments(&self) -> &[Segment] {
        self.segments.as_slice()
    }

    /// Returns `true` if the expression selects the document root itself.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.segments.len()
    }
}

impl Display for PathExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // A leading dot is dropped by the parser, so prefixing every segment
        // keeps pure bracket and empty segments intact on re-parse.
        for segment in &self.segments {
            write!(f, ".{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for PathExpression {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse_path(s))
    }
}

impl From<&str> for PathExpression {
    fn from(value: &str) -> Self {
        parse_path(value)
    }
}

/// Builder for constructing path expressions.
///
/// Field names containing `.` or `[` cannot be expressed in the string form,
/// so a built path holding one will not survive a `to_string` round trip.
#[derive(Debug, Default)]
pub struct PathBuilder {
    segments: Vec<Segment>,
}

impl PathBuilder {
    /// Creates a builder with no segments.
    #[must_use]
    pub const fn new() -> Self {
        Self { segments: vec![] }
    }

    /// Appends a field access.
    ///
    /// # Examples
    ///
    /// ```
    /// use jpath::path::PathBuilder;
    /// let path = PathBuilder::new().field("org").field("name").build();
    /// assert_eq!(".org.name", path.to_string());
    /// ```
    #[must_use]
    pub fn field(mut self, name: &str) -> Self {
        self.segments.push(Segment::new(name, None));
        self
    }

    /// Selects the element at `index`.
    #[must_use]
    pub fn index(self, index: usize) -> Self {
        self.bracket(format!("[{index}]"))
    }

    /// Selects the element `n` positions before the end, `[^n]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use jpath::path::PathBuilder;
    /// let path = PathBuilder::new().field("items").from_end(1).build();
    /// assert_eq!(".items[^1]", path.to_string());
    /// ```
    #[must_use]
    pub fn from_end(self, n: usize) -> Self {
        self.bracket(format!("[^{n}]"))
    }

    /// Selects the half-open range `[start:end]`.
    #[must_use]
    pub fn range(self, Range { start, end }: Range<usize>) -> Self {
        self.bracket(format!("[{start}:{end}]"))
    }

    /// Selects every element, `[*]`.
    ///
    /// # Examples
    ///
    /// On an empty builder the wildcard becomes a pure bracket segment:
    /// ```
    /// use jpath::path::PathBuilder;
    /// let path = PathBuilder::new().wildcard().field("name").build();
    /// assert_eq!(".[*].name", path.to_string());
    /// assert!(path.segments()[0].is_bracket_only());
    /// ```
    #[must_use]
    pub fn wildcard(self) -> Self {
        self.bracket("[*]".to_string())
    }

    /// Attaches the accessor to the last field if it has none yet, otherwise
    /// starts a pure bracket segment.
    fn bracket(mut self, text: String) -> Self {
        match self.segments.last_mut() {
            Some(last) if last.accessor.is_none() && !last.field.is_empty() => {
                last.accessor = Some(text);
            }
            _ => self.segments.push(Segment {
                field: String::new(),
                accessor: Some(text),
            }),
        }
        self
    }

    /// Returns the built [`PathExpression`].
    #[must_use]
    pub fn build(self) -> PathExpression {
        PathExpression::from_segments(self.segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_attaches_bracket_to_field() {
        let path =
            PathBuilder::new().field("arr").index(0).field("text").build();
        assert_eq!(
            path.segments(),
            &[Segment::new("arr", Some("[0]")), Segment::new("text", None)]
        );
    }

    #[test]
    fn builder_chained_brackets_become_bracket_segments() {
        let path = PathBuilder::new().field("grid").index(1).index(2).build();
        assert_eq!(
            path.segments(),
            &[Segment::new("grid", Some("[1]")), Segment::new("", Some("[2]"))]
        );
        assert_eq!(".grid[1].[2]", path.to_string());
    }

    #[test]
    fn display_round_trips_through_parser() {
        for expression in [
            ".companies[1:3].name",
            "[*].text",
            ".a..b",
            ".",
            "",
            "x[y:0]",
        ] {
            let parsed = PathExpression::parse(expression);
            let reparsed = PathExpression::parse(&parsed.to_string());
            assert_eq!(parsed, reparsed, "expression {expression:?}");
        }
    }

    #[test]
    fn from_str_is_infallible() {
        let path: PathExpression = ".a[0]".parse().unwrap();
        assert_eq!(path.len(), 1);
        assert!(!path.is_empty());
    }
}
