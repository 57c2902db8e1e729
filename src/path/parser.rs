/*!
# Path Parser

Splits raw path strings into [`PathExpression`]s.

## Examples

```rust
use jpath::path::{parser, Segment};
let path = parser::parse_path("[*].text");
assert_eq!(
    path.segments(),
    &[Segment::new("", Some("[*]")), Segment::new("text", None)]
);
```

Splitting never fails. Bracket text is kept verbatim and only interpreted
when an array is reached, so a malformed selector such as `[x]` surfaces as an
[`EvalError::ParseFailure`](crate::path::EvalError::ParseFailure) item of the
result stream.
*/

use crate::path::{PathExpression, Segment};

/// Parse an input path string into a [`PathExpression`].
///
/// The string is split on `.`; an empty first token (the string started with
/// a dot) is discarded. Within each token everything before the first `[` is
/// the field name and the rest, brackets included, is the accessor text.
#[must_use]
pub fn parse_path(input: &str) -> PathExpression {
    let mut tokens = input.split('.').peekable();
    if tokens.peek() == Some(&"") {
        tokens.next();
    }

    let segments: Vec<Segment> = tokens.map(parse_segment).collect();
    log::trace!("parsed {} segment(s) from {input:?}", segments.len());

    PathExpression::from_segments(segments)
}

/// Split one dot-delimited token into field name and accessor text.
fn parse_segment(token: &str) -> Segment {
    token.find('[').map_or_else(
        || Segment::new(token, None),
        |open| {
            let (field, accessor) = token.split_at(open);
            Segment::new(field, Some(accessor))
        },
    )
}
