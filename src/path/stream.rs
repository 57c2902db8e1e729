/*!
# Result Stream

[`Matches`] is the lazy, single-pass sequence of outcomes of one evaluation.
Each item is either a [`JSONPointer`] to a matched value or the
[`EvalError`] that ended a branch. Items come out depth-first, left to right
in segment order, and in ascending index order across an array fan-out.

Nothing runs ahead of the consumer: every call to `next` does just enough
work to produce one item. Pending work lives on an explicit stack whose size
follows the depth of the walk, not the width of a fan-out; an array range is
kept as a single frame and expanded one element per pull.

A consumer that stops early simply drops the stream, or calls
[`Matches::cancel`] to discard the pending work while keeping the handle.

```
use jpath::path::{fetch, PathExpression};
use serde_json::json;

let ids: Vec<u32> = (0..10_000).collect();
let doc = json!({ "ids": ids });
let path = PathExpression::parse(".ids[*]");

let first: Vec<_> = fetch(&doc, &path).take(2).filter_map(Result::ok).collect();
assert_eq!(first.len(), 2);
assert_eq!(first[1].value, &json!(1));
```
*/
use serde_json::Value;
use std::{iter::FusedIterator, ops::Range};

use crate::path::eval::{Remaining, Step};
use crate::path::{EvalError, Evaluator, JSONPointer, PathType};

/// One item of a [`Matches`] stream.
pub type FetchResult<'a> = Result<JSONPointer<'a>, EvalError<'a>>;

/// Pending work of the walk.
#[derive(Debug)]
enum Frame<'a> {
    /// Evaluate `value` with `remaining` segments. `value` sits at `depth`
    /// steps from the root, the last of which is `step`.
    Visit {
        value: &'a Value,
        remaining: Remaining<'a>,
        depth: usize,
        step: Option<PathType<'a>>,
    },
    /// Elements of `items` still to be visited, each with `rest`. The array
    /// itself sits at `depth`.
    FanOut {
        items: &'a [Value],
        next: Range<usize>,
        rest: Remaining<'a>,
        depth: usize,
    },
}

/// Lazy stream of evaluation outcomes, see the [module docs](self).
#[derive(Debug)]
pub struct Matches<'a> {
    evaluator: Evaluator,
    stack: Vec<Frame<'a>>,
    /// Location of the value currently being evaluated.
    path: Vec<PathType<'a>>,
}

impl<'a> Matches<'a> {
    pub(crate) fn new(
        evaluator: Evaluator,
        root: &'a Value,
        remaining: Remaining<'a>,
    ) -> Self {
        Self {
            evaluator,
            stack: vec![Frame::Visit {
                value: root,
                remaining,
                depth: 0,
                step: None,
            }],
            path: Vec::new(),
        }
    }

    /// Abandons the evaluation. Pending branches are dropped and every
    /// further call to `next` returns `None`.
    pub fn cancel(&mut self) {
        log::trace!("cancelled with {} pending frame(s)", self.stack.len());
        self.stack.clear();
        self.path.clear();
    }

    /// Returns `true` once every branch has terminated (or the stream was
    /// cancelled).
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.stack.is_empty()
    }

    /// Pops the next value to evaluate, moving `path` to its location.
    fn advance(&mut self) -> Option<(&'a Value, Remaining<'a>)> {
        loop {
            match self.stack.pop()? {
                Frame::Visit { value, remaining, depth, step } => {
                    self.path.truncate(depth);
                    self.path.extend(step);
                    return Some((value, remaining));
                }
                Frame::FanOut { items, mut next, rest, depth } => {
                    let Some(index) = next.next() else { continue };
                    if !next.is_empty() {
                        self.stack.push(Frame::FanOut {
                            items,
                            next,
                            rest,
                            depth,
                        });
                    }
                    let Some(value) = items.get(index) else { continue };
                    self.path.truncate(depth);
                    self.path.push(PathType::Index(index));
                    return Some((value, rest));
                }
            }
        }
    }
}

impl<'a> Iterator for Matches<'a> {
    type Item = FetchResult<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((value, remaining)) = self.advance() {
            match self.evaluator.step(value, remaining, &self.path) {
                Step::Emit(item) => return Some(item),
                Step::Descend { value, field, remaining } => {
                    self.stack.push(Frame::Visit {
                        value,
                        remaining,
                        depth: self.path.len(),
                        step: Some(PathType::Field(field)),
                    });
                }
                Step::FanOut { items, range, rest } => {
                    self.stack.push(Frame::FanOut {
                        items,
                        next: range,
                        rest,
                        depth: self.path.len(),
                    });
                }
            }
        }
        None
    }
}

impl FusedIterator for Matches<'_> {}
