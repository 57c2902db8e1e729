//! An example of using the [`PathBuilder`] fluent API to construct a path
//! expression and stream its results.
use jpath::Document;
use jpath::path::{PathBuilder, PathExpression};

fn main() {
    // Construct the path ".companies[1:3].name"
    let path: PathExpression =
        PathBuilder::new().field("companies").range(1..3).field("name").build();

    // The built path renders as the expression it stands for
    assert_eq!(".companies[1:3].name", path.to_string());

    let doc: Document = r#"{"companies": [
        {"name": "apple"}, {"name": "facebook"}, {"name": "github"}
    ]}"#
    .parse()
    .expect("hardcoded JSON");

    for item in doc.fetch(&path) {
        match item {
            Ok(found) => println!("{found}"),
            Err(err) => eprintln!("error: {err}"),
        }
    }

    // Pure bracket segments address top-level arrays: "[^1].[0]"
    let path = PathBuilder::new().from_end(1).index(0).build();
    assert_eq!(".[^1].[0]", path.to_string());
}
