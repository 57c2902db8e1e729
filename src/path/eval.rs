/*!
# Tree Evaluator

Walks a JSON value tree guided by a [`PathExpression`], one segment per object
field and one independent branch per selected array element.

The walk itself is driven by [`Matches`], which keeps the pending work on an
explicit stack; this module decides, for a single value and the segments
still to apply, what happens next: emit an outcome, descend into a field, or
fan out over a range of array elements.

## Container terminals

A path may end on an object or array instead of a scalar. What happens then
is a [`ContainerPolicy`], fixed per [`Evaluator`]:

```
use jpath::path::{ContainerPolicy, EvalError, Evaluator, PathExpression};
use serde_json::json;

let doc = json!({"org": {"name": "foo"}});
let path = PathExpression::parse(".org");

let found: Vec<_> = Evaluator::new().fetch(&doc, &path).collect();
assert_eq!(found[0].as_ref().map(|m| m.value), Ok(&json!({"name": "foo"})));

let rejected: Vec<_> = Evaluator::new()
    .containers(ContainerPolicy::Reject)
    .fetch(&doc, &path)
    .collect();
assert!(matches!(rejected[0], Err(EvalError::UnexpectedContainer { .. })));
```
*/
use serde_json::Value;
use std::{borrow::Cow, ops::Range};

use crate::path::{
    EvalError, FetchResult, JSONPointer, Matches, PathExpression, PathType,
    Segment, accessor,
};

/// What to do when the segments run out on an object or array.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ContainerPolicy {
    /// Emit the container as a match.
    #[default]
    Match,
    /// Emit [`EvalError::UnexpectedContainer`].
    Reject,
}

/// Evaluates path expressions against value trees.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator {
    containers: ContainerPolicy,
}

impl Evaluator {
    /// Creates an evaluator that matches containers.
    #[must_use]
    pub const fn new() -> Self {
        Self { containers: ContainerPolicy::Match }
    }

    /// Sets the policy for paths ending on an object or array.
    #[must_use]
    pub const fn containers(mut self, policy: ContainerPolicy) -> Self {
        self.containers = policy;
        self
    }

    /// Returns the configured container policy.
    #[must_use]
    pub const fn container_policy(&self) -> ContainerPolicy {
        self.containers
    }

    /// Lazily evaluates `path` against `json`.
    ///
    /// Nothing is evaluated until the returned stream is pulled.
    #[must_use]
    pub fn fetch<'a>(
        &self,
        json: &'a Value,
        path: &'a PathExpression,
    ) -> Matches<'a> {
        log::debug!("evaluating `{path}` ({} segment(s))", path.len());
        Matches::new(*self, json, Remaining::from(path.segments()))
    }

    /// Decides the next move for `value` given the `remaining` segments.
    /// `path` is the location of `value`, used for matches.
    pub(crate) fn step<'a>(
        self,
        value: &'a Value,
        remaining: Remaining<'a>,
        path: &[PathType<'a>],
    ) -> Step<'a> {
        let Some((head, rest)) = remaining.split_first() else {
            return self.terminal(value, path);
        };

        match (value, head) {
            (Value::Object(map), Head::Field { name, accessor }) => {
                map.get(name).map_or(
                    Step::Emit(Err(EvalError::NotFound)),
                    |child| Step::Descend {
                        value: child,
                        field: name,
                        remaining: Remaining { pending: accessor, ..rest },
                    },
                )
            }
            (Value::Array(items), Head::Bracket(selector)) => {
                accessor::resolve(selector, items.len()).map_or_else(
                    |err| {
                        log::debug!("branch ended at {selector}: {err}");
                        Step::Emit(Err(err))
                    },
                    |range| {
                        log::trace!(
                            "fan out {selector} over {range:?} of {} item(s)",
                            items.len()
                        );
                        Step::FanOut { items, range, rest }
                    },
                )
            }
            // Scalars cannot be traversed; arrays have no fields and objects
            // no positions.
            _ => Step::Emit(Err(EvalError::NotFound)),
        }
    }

    /// Outcome of a branch whose segments are exhausted.
    fn terminal<'a>(
        self,
        value: &'a Value,
        path: &[PathType<'a>],
    ) -> Step<'a> {
        let is_container = value.is_object() || value.is_array();
        if is_container && self.containers == ContainerPolicy::Reject {
            return Step::Emit(Err(EvalError::UnexpectedContainer {
                value: Cow::Borrowed(value),
            }));
        }
        Step::Emit(Ok(JSONPointer { path: path.to_vec(), value }))
    }
}

/// The next move of the walk for one value.
#[derive(Debug)]
pub(crate) enum Step<'a> {
    /// The branch is over.
    Emit(FetchResult<'a>),
    /// Continue with the value under `field`.
    Descend {
        value: &'a Value,
        field: &'a str,
        remaining: Remaining<'a>,
    },
    /// Continue independently with every element of `items[range]`, in
    /// ascending order, each with `rest`.
    FanOut {
        items: &'a [Value],
        range: Range<usize>,
        rest: Remaining<'a>,
    },
}

/// Segments still to be applied to a value.
///
/// A `field[..]` segment is applied in two moves: the field lookup, then its
/// accessor against the looked-up value. In between, the accessor sits in
/// `pending`, ahead of `rest`, so the shared segment list is never modified
/// and sibling branches cannot observe each other.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Remaining<'a> {
    pending: Option<&'a str>,
    rest: &'a [Segment],
}

impl<'a> From<&'a [Segment]> for Remaining<'a> {
    fn from(rest: &'a [Segment]) -> Self {
        Self { pending: None, rest }
    }
}

/// The first of the remaining segments, classified.
#[derive(Debug, Clone, Copy)]
enum Head<'a> {
    /// A field lookup, possibly followed by an accessor.
    Field { name: &'a str, accessor: Option<&'a str> },
    /// A selector applied to the current value itself.
    Bracket(&'a str),
}

impl<'a> Remaining<'a> {
    /// Splits off the next segment to apply.
    fn split_first(self) -> Option<(Head<'a>, Self)> {
        if let Some(selector) = self.pending {
            return Some((Head::Bracket(selector), Self::from(self.rest)));
        }

        let (segment, rest) = self.rest.split_first()?;
        let head = match segment.accessor.as_deref() {
            Some(selector) if segment.is_bracket_only() => {
                Head::Bracket(selector)
            }
            accessor => Head::Field { name: &segment.field, accessor },
        };
        Some((head, Self::from(rest)))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::path::PathBuilder;

    /// Collects the stream into values and error messages.
    fn run(
        evaluator: Evaluator,
        json: &Value,
        expression: &str,
    ) -> Vec<Result<Value, String>> {
        let path = PathExpression::parse(expression);
        evaluator
            .fetch(json, &path)
            .map(|item| {
                item.map(|m| m.value.clone()).map_err(|e| e.to_string())
            })
            .collect()
    }

    fn fetch(json: &Value, expression: &str) -> Vec<Result<Value, String>> {
        run(Evaluator::new(), json, expression)
    }

    fn ok(values: &[Value]) -> Vec<Result<Value, String>> {
        values.iter().cloned().map(Ok).collect()
    }

    fn companies() -> Value {
        json!({
            "arranged": "alphabetically",
            "companies": [
                {"name": "apple"},
                {"name": "facebook"},
                {"name": "github"},
                {"name": "google"}
            ]
        })
    }

    #[test]
    fn field_on_object() {
        assert_eq!(
            fetch(&companies(), ".arranged"),
            ok(&[json!("alphabetically")])
        );
        assert_eq!(
            fetch(&json!({"text": "bar"}), ".text"),
            ok(&[json!("bar")])
        );
    }

    #[test]
    fn wildcards_yield_every_element_in_order() {
        let expected = ok(&[
            json!("apple"),
            json!("facebook"),
            json!("github"),
            json!("google"),
        ]);
        assert_eq!(fetch(&companies(), ".companies[:].name"), expected);
        assert_eq!(fetch(&companies(), ".companies[*].name"), expected);
    }

    #[test]
    fn range_selects_half_open_slice() {
        assert_eq!(
            fetch(&companies(), ".companies[1:3].name"),
            ok(&[json!("facebook"), json!("github")])
        );
        assert_eq!(
            fetch(&json!(["foo", "bar", "baz", "pub"]), "[1:3]"),
            ok(&[json!("bar"), json!("baz")])
        );
    }

    #[test]
    fn from_end_index() {
        assert_eq!(
            fetch(&companies(), ".companies[^2].name"),
            ok(&[json!("github")])
        );
        let doc = json!([{"text": "foo"}, {"text": "bar"}, {"text": "baz"}]);
        assert_eq!(fetch(&doc, "[^1].text"), ok(&[json!("baz")]));
        assert_eq!(fetch(&doc, "[^2].text"), ok(&[json!("bar")]));
        assert_eq!(
            fetch(&doc, "[^4].text"),
            vec![Err("index out of range [^4] with length 3".to_string())]
        );
    }

    #[test]
    fn top_level_array_index() {
        let doc = json!([{"text": "foo"}, {"text": "bar"}]);
        assert_eq!(fetch(&doc, "[:].text"), ok(&[json!("foo"), json!("bar")]));
        assert_eq!(fetch(&doc, "[0].text"), ok(&[json!("foo")]));
        assert_eq!(fetch(&doc, "[1].text"), ok(&[json!("bar")]));
    }

    #[test]
    fn nested_index_then_field() {
        let doc = json!({"arr": [{"text": "foo"}, {"text": "bar"}]});
        assert_eq!(fetch(&doc, ".arr[0].text"), ok(&[json!("foo")]));
    }

    #[test]
    fn out_of_range_single_index() {
        assert_eq!(
            fetch(&json!(["foo"]), "[1]"),
            vec![Err("index out of range [1] with length 1".to_string())]
        );
    }

    #[test]
    fn parse_failures_carry_selector() {
        let doc = json!(["foo"]);
        for (query, token) in [("[x]", "x"), ("[y:0]", "y"), ("[0:z]", "z")] {
            let cause = token.parse::<i64>().unwrap_err();
            assert_eq!(
                fetch(&doc, query),
                vec![Err(format!("could not parse {query}: {cause}"))]
            );
        }
    }

    #[test]
    fn missing_field_is_single_not_found() {
        assert_eq!(
            fetch(&json!({"text": "bar"}), ".name"),
            vec![Err("not found".to_string())]
        );
    }

    #[test]
    fn traversing_a_scalar_is_not_found() {
        assert_eq!(
            fetch(&json!({"text": "bar"}), ".text.name"),
            vec![Err("not found".to_string())]
        );
        assert_eq!(
            fetch(&json!({"n": 1, "b": true, "z": null}), ".n.x"),
            vec![Err("not found".to_string())]
        );
    }

    #[test]
    fn fan_out_branches_fail_independently() {
        let doc = json!({"arr": [
            {"name": "a"},
            {"other": 1},
            {"name": "c"},
            {"name": "d"}
        ]});
        assert_eq!(
            fetch(&doc, ".arr[0:3].name"),
            vec![Ok(json!("a")), Err("not found".to_string()), Ok(json!("c"))]
        );
    }

    #[test]
    fn nested_fan_out_is_depth_first() {
        let doc = json!({"rows": [
            {"cells": [1, 2]},
            {"cells": [3]},
            {"cells": [4, 5, 6]}
        ]});
        assert_eq!(
            fetch(&doc, ".rows[*].cells[*]"),
            ok(&[json!(1), json!(2), json!(3), json!(4), json!(5), json!(6)])
        );
        assert_eq!(
            fetch(&doc, ".rows[*].cells[1]"),
            vec![
                Ok(json!(2)),
                Err("index out of range [1] with length 1".to_string()),
                Ok(json!(5))
            ]
        );
    }

    #[test]
    fn array_of_arrays_with_bracket_segments() {
        let doc = json!({"grid": [[1, 2], [3, 4]]});
        assert_eq!(fetch(&doc, ".grid[1].[0]"), ok(&[json!(3)]));
        assert_eq!(fetch(&doc, ".grid[*].[^1]"), ok(&[json!(2), json!(4)]));
    }

    #[test]
    fn array_addressed_by_name_is_not_found() {
        let doc = json!({"arr": [{"name": "a"}]});
        assert_eq!(
            fetch(&doc, ".arr.name"),
            vec![Err("not found".to_string())]
        );
    }

    #[test]
    fn bracket_on_object_is_not_found() {
        assert_eq!(
            fetch(&json!({"a": 1}), "[0]"),
            vec![Err("not found".to_string())]
        );
        assert_eq!(
            fetch(&json!({"a": {"b": 1}}), ".a[0]"),
            vec![Err("not found".to_string())]
        );
    }

    #[test]
    fn bracket_on_scalar_is_not_found() {
        assert_eq!(
            fetch(&json!({"text": "bar"}), ".text[0]"),
            vec![Err("not found".to_string())]
        );
        assert_eq!(
            fetch(&Value::Null, "[*]"),
            vec![Err("not found".to_string())]
        );
        assert_eq!(
            fetch(&json!(7), "[0:1]"),
            vec![Err("not found".to_string())]
        );
        assert_eq!(
            fetch(&json!({"flag": true}), ".flag[^1]"),
            vec![Err("not found".to_string())]
        );
    }

    #[test]
    fn empty_range_emits_nothing() {
        assert_eq!(fetch(&json!({"arr": []}), ".arr[*]"), vec![]);
        assert_eq!(fetch(&json!([1, 2, 3]), "[2:1]"), vec![]);
    }

    #[test]
    fn containers_match_by_default() {
        assert_eq!(Evaluator::new().container_policy(), ContainerPolicy::Match);
        assert_eq!(
            Evaluator::default().container_policy(),
            Evaluator::new().container_policy()
        );
        let doc = json!({"org": {"name": "foo"}, "tags": ["a"]});
        assert_eq!(fetch(&doc, ".org"), ok(&[json!({"name": "foo"})]));
        assert_eq!(fetch(&doc, ".tags"), ok(&[json!(["a"])]));
        assert_eq!(fetch(&doc, ""), ok(&[doc.clone()]));
    }

    #[test]
    fn containers_rejected_on_request() {
        let doc = json!({"org": {"name": "foo"}, "tags": ["a"]});
        let evaluator = Evaluator::new().containers(ContainerPolicy::Reject);
        assert_eq!(evaluator.container_policy(), ContainerPolicy::Reject);
        assert_eq!(
            run(evaluator, &doc, ".org"),
            vec![Err("found other type: object".to_string())]
        );
        assert_eq!(
            run(evaluator, &doc, ".tags"),
            vec![Err("found other type: array".to_string())]
        );
        assert_eq!(run(evaluator, &doc, ".org.name"), ok(&[json!("foo")]));
    }

    #[test]
    fn scalars_are_terminal() {
        let doc = json!({"s": "x", "n": 1.5, "b": false, "z": null});
        assert_eq!(fetch(&doc, ".s"), ok(&[json!("x")]));
        assert_eq!(fetch(&doc, ".n"), ok(&[json!(1.5)]));
        assert_eq!(fetch(&doc, ".b"), ok(&[json!(false)]));
        assert_eq!(fetch(&doc, ".z"), ok(&[Value::Null]));
        assert_eq!(fetch(&json!(42), ""), ok(&[json!(42)]));
    }

    #[test]
    fn matches_report_their_location() {
        let doc = companies();
        let path = PathExpression::parse(".companies[1:3].name");
        let locations: Vec<String> = Evaluator::new()
            .fetch(&doc, &path)
            .filter_map(Result::ok)
            .map(|m| m.location())
            .collect();
        assert_eq!(locations, vec![".companies[1].name", ".companies[2].name"]);
    }

    #[test]
    fn location_selects_the_same_value() {
        let doc = json!({"grid": [[1, {"x": [true]}], [3]]});
        let path = PathExpression::parse(".grid[*].[*]");
        let evaluator = Evaluator::new();
        for found in evaluator.fetch(&doc, &path).filter_map(Result::ok) {
            let again = PathExpression::parse(&found.location());
            let values: Vec<_> = Evaluator::new()
                .fetch(&doc, &again)
                .map(|item| item.map(|m| m.value))
                .collect();
            assert_eq!(values, vec![Ok(found.value)]);
        }
    }

    #[test]
    fn location_of_dotted_key_does_not_reparse() {
        let doc = json!({"a.b": 1, "a": {"b": 99}});
        let path = PathBuilder::new().field("a.b").build();
        let found: Vec<_> = Evaluator::new()
            .fetch(&doc, &path)
            .filter_map(Result::ok)
            .collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, &json!(1));
        assert_eq!(found[0].location(), ".a.b");

        let again = PathExpression::parse(&found[0].location());
        assert_ne!(again, path);
        assert_eq!(fetch(&doc, &found[0].location()), ok(&[json!(99)]));
    }
}
