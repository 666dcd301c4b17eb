//! The top-level parsing entry point.
//!
//! Drives the character-level [`Parser`] one byte at a time over any
//! [`std::io::Read`], then checks the two conditions that can only be
//! detected at end of input: unclosed tags still on the stack, and no root
//! element ever completed.

use std::io::Read;

use crate::document::Document;
use crate::error::{self, Error};
use crate::parser::Parser;
use crate::schema::Schema;

/// Parses `input` against `schema`, returning the resulting [`Document`].
///
/// On failure, if `print_on_error` is set, the bytes consumed so far (the
/// rolling buffer's contents) are written to `stderr` before the error is
/// returned.
///
/// Also updates the thread's "last error" slot (see
/// [`crate::error::last_error_message`]), clearing it on entry and setting
/// it on failure, purely as a backward-compatibility shim: callers should
/// use the returned `Result`.
pub fn parse_stream<'s>(
    mut input: impl Read,
    schema: &'s Schema,
    print_on_error: bool,
) -> Result<Document<'s>, Error> {
    error::set_last_error(None);

    let mut parser = Parser::new();
    let mut doc = Document::new(schema);

    let result = run(&mut input, &mut parser, &mut doc);

    match result {
        Ok(()) => Ok(doc),
        Err(err) => {
            if print_on_error {
                eprintln!("--- input consumed before error ---");
                eprintln!("{}", String::from_utf8_lossy(parser.buffer().consumed()));
                eprintln!("*** ERROR: {err}");
            }
            error::set_last_error(Some(&err));
            Err(err)
        }
    }
}

fn run(input: &mut impl Read, parser: &mut Parser, doc: &mut Document) -> Result<(), Error> {
    let mut byte = [0u8; 1];
    loop {
        let n = input.read(&mut byte)?;
        if n == 0 {
            break;
        }
        parser.parse_char(doc, byte[0] as u32)?;
    }

    if parser.depth() > 1 {
        return Err(Error::UnclosedTags);
    }
    if doc.root().is_none() {
        return Err(Error::NoRoot);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AttrSpec;

    fn cabinet_schema() -> Schema {
        let mut b = Schema::builder("cabinet");
        let root = b.root();
        b.add_tag(root, "shelf", false, vec![AttrSpec::new("id", false)])
            .unwrap();
        b.build()
    }

    #[test]
    fn parses_a_complete_document_from_a_reader() {
        let schema = cabinet_schema();
        let xml = b"<cabinet><shelf id=\"1\"></shelf></cabinet>" as &[u8];
        let doc = parse_stream(xml, &schema, false).unwrap();
        let cabinet = doc.root().unwrap();
        let shelf = doc.first_child(cabinet).unwrap();
        assert_eq!(doc.attribute(shelf, "id"), Some("1"));
    }

    #[test]
    fn unclosed_input_is_reported_and_recorded_as_last_error() {
        let schema = cabinet_schema();
        let xml = b"<cabinet>" as &[u8];
        let err = parse_stream(xml, &schema, false).unwrap_err();
        assert_eq!(err, Error::UnclosedTags);
        assert!(error::last_error_message().is_some());
    }

    #[test]
    fn successful_parse_clears_last_error() {
        let schema = cabinet_schema();
        let xml = b"<cabinet>" as &[u8];
        assert!(parse_stream(xml, &schema, false).is_err());
        let xml_ok = b"<cabinet></cabinet>" as &[u8];
        assert!(parse_stream(xml_ok, &schema, false).is_ok());
        assert!(error::last_error_message().is_none());
    }
}
