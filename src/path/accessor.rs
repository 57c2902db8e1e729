/*!
# Accessor Resolver

Turns bracket text such as `[^2]` into an [`Accessor`] and resolves it
against the length of an array into half-open bounds.

| Text | Accessor | Bounds for length `len` |
|---|---|---|
| `[*]`, `[:]` | [`Accessor::All`] | `0..len` |
| `[a:b]` | [`Accessor::Range`] | `a..b` clamped to `len`, never checked |
| `[^n]` | [`Accessor::IndexFromEnd`] | `len-n..len-n+1`, checked |
| `[n]` | [`Accessor::Index`] | `n..n+1`, checked |

```rust
use jpath::path::{accessor, EvalError};

assert_eq!(accessor::resolve("[1:3]", 4), Ok(1..3));
assert_eq!(accessor::resolve("[^1]", 4), Ok(3..4));
assert!(matches!(
    accessor::resolve("[4]", 4),
    Err(EvalError::OutOfRange { length: 4, .. })
));
```
*/
use pest::Parser;
use pest_derive::Parser;
use std::ops::Range;

use crate::path::{EvalError, SelectorError};

/// Parser for the bracket selector grammar.
#[derive(Parser)]
#[grammar = "path/grammar/accessor.pest"]
pub struct AccessorParser;

/// A parsed bracket selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    /// Every element, `[*]` or `[:]`
    All,
    /// A single element, `[n]`
    Index(i64),
    /// A single element counted back from the end, `[^n]`
    IndexFromEnd(i64),
    /// Elements in `[low, high)`, `[low:high]`
    Range(usize, usize),
}

impl Accessor {
    /// Parses bracket text, brackets included.
    ///
    /// # Errors
    ///
    /// Returns the [`SelectorError`] describing why the text is not a valid
    /// selector: either an integer token failed to parse or the text does not
    /// follow the grammar.
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        let mut pairs = AccessorParser::parse(Rule::accessor, text)
            .map_err(|e| SelectorError::Syntax(e.to_string()))?;

        let selector = pairs
            .next()
            .and_then(|accessor| accessor.into_inner().next())
            .ok_or_else(|| {
                SelectorError::Syntax("empty selector".to_string())
            })?;

        let accessor = match selector.as_rule() {
            Rule::wildcard => Self::All,
            Rule::index => Self::Index(parse_number(selector)?),
            Rule::from_end => Self::IndexFromEnd(parse_number(selector)?),
            Rule::range => {
                let mut bounds = selector.into_inner();
                let mut bound = || -> Result<usize, SelectorError> {
                    let pair = bounds.next().ok_or_else(|| {
                        SelectorError::Syntax("missing range bound".to_string())
                    })?;
                    Ok(pair.as_str().parse::<usize>()?)
                };
                let low = bound()?;
                let high = bound()?;
                Self::Range(low, high)
            }
            rule => {
                return Err(SelectorError::Syntax(format!(
                    "unexpected rule {rule:?}"
                )));
            }
        };

        Ok(accessor)
    }

    /// Resolves the accessor against an array of `length` elements.
    ///
    /// `selector` is the original bracket text, carried into errors.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::OutOfRange`] when a single index falls outside
    /// `[0, length)`. Ranges never fail: their bounds are clamped.
    pub fn bounds(
        self,
        selector: &str,
        length: usize,
    ) -> Result<Range<usize>, EvalError<'static>> {
        let single = |index: Option<i64>| {
            index
                .and_then(|i| usize::try_from(i).ok())
                .filter(|&i| i < length)
                .map(|i| i..i + 1)
                .ok_or_else(|| EvalError::OutOfRange {
                    selector: selector.to_string(),
                    length,
                })
        };

        match self {
            Self::All => Ok(0..length),
            Self::Index(i) => single(Some(i)),
            Self::IndexFromEnd(n) => single(
                i64::try_from(length).ok().and_then(|len| len.checked_sub(n)),
            ),
            Self::Range(low, high) => {
                let high = high.min(length);
                Ok(low.min(high)..high)
            }
        }
    }
}

/// Parses the single number token nested in `pair`.
fn parse_number(
    pair: pest::iterators::Pair<Rule>,
) -> Result<i64, SelectorError> {
    let number = pair
        .into_inner()
        .next()
        .ok_or_else(|| SelectorError::Syntax("missing number".to_string()))?;
    Ok(number.as_str().parse::<i64>()?)
}

/// Parses `selector` and resolves it against an array of `length` elements.
///
/// # Errors
///
/// Returns [`EvalError::ParseFailure`] for text that is not a selector and
/// [`EvalError::OutOfRange`] for a single index outside the array.
pub fn resolve(
    selector: &str,
    length: usize,
) -> Result<Range<usize>, EvalError<'static>> {
    Accessor::parse(selector)
        .map_err(|cause| EvalError::ParseFailure {
            selector: selector.to_string(),
            cause,
        })?
        .bounds(selector, length)
}
