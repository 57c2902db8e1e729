/*!
# `jpath` Library

Extracts values from JSON documents (and other serialization formats decoded
into the same value tree) with compact dot-separated path expressions such as
`.companies[1:3].name`.

```
use jpath::{Document, path::PathExpression};

let doc: Document = r#"{"companies": [{"name": "apple"}, {"name": "github"}]}"#
    .parse()
    .expect("valid JSON");
let path = PathExpression::parse(".companies[^1].name");

let names: Vec<_> = doc
    .fetch(&path)
    .filter_map(Result::ok)
    .map(|m| m.value.clone())
    .collect();
assert_eq!(names, vec![serde_json::json!("github")]);
```
*/

pub mod commands;
pub mod document;
pub mod path;
pub mod utils;

// Re-exports
pub use document::{DecodeError, Document, InputFormat};
