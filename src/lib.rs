/*!
A parser for Rudimentary Markup (RuM): a restricted, schema-constrained
subset of [XML 1.0](https://www.w3.org/TR/xml/).

RuM is deliberately smaller than full XML: elements, attributes, processing
instructions, and comments are supported; DTDs, namespaces, CDATA sections,
and numeric character references are not. In exchange for giving those up, a
RuM document is parsed against a [`Schema`] that says exactly which tags are
legal where and which attributes each tag takes — an unknown tag or
attribute is a parse error, not something silently accepted into the tree.

The entry point is [`parse_stream`], which reads from anything implementing
[`std::io::Read`] and returns a [`Document`] built against a caller-supplied
[`Schema`]:

```no_run
use rumxml::{parse_stream, AttrSpec, Schema};

let mut builder = Schema::builder("cabinet");
let root = builder.root();
builder.add_tag(root, "shelf", false, vec![AttrSpec::new("id", false)]).unwrap();
let schema = builder.build();

let input = std::io::Cursor::new(b"<cabinet><shelf id=\"1\"></shelf></cabinet>".as_slice());
let doc = parse_stream(input, &schema, false).unwrap();
let cabinet = doc.root().unwrap();
assert_eq!(doc.tag_name(cabinet), "cabinet");
```

Internally, the input is tokenized by a character-driven state machine over
a rolling input buffer, one byte at a time, rather than materializing the
whole document up front.
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod char_class;
mod document;
mod driver;
mod entity;
mod error;
mod parser;
mod schema;

pub use document::{Document, ElementId};
pub use driver::parse_stream;
pub use error::{last_error_message, Error, Position};
pub use schema::{AttrSpec, Schema, SchemaBuilder, SchemaError, TagId};
