//! Sample CLI driver: parses Rudimentary Markup input against a fixed demo
//! schema and prints the resulting tree.
//!
//! Reads a single optional filename argument (stdin otherwise), parses it
//! against a small `cabinet`/`shelf`/`bottle`/`glass` schema, and prints the
//! resulting element tree. A sample consumer of the library, not the
//! library itself.

use std::env;
use std::fs::File;
use std::io;
use std::process::ExitCode;

use rumxml::{parse_stream, AttrSpec, Document, ElementId, Schema};

const DEBUG: bool = false;

fn define_language() -> Schema {
    let mut builder = Schema::builder("cabinet");
    let cabinet = builder.root();
    let shelf = builder
        .add_tag(cabinet, "shelf", false, vec![AttrSpec::new("id", false)])
        .expect("cabinet is not declared empty");
    builder
        .add_tag(
            shelf,
            "bottle",
            false,
            vec![
                AttrSpec::new("type", true),
                AttrSpec::new("aged", false),
                AttrSpec::new("vintage", false),
            ],
        )
        .expect("shelf is not declared empty");
    builder
        .add_tag(shelf, "glass", true, vec![AttrSpec::new("type", true)])
        .expect("shelf is not declared empty");
    builder.build()
}

fn display_tree(doc: &Document<'_>, element: ElementId, depth: usize, out: &mut impl io::Write) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    write!(out, "{indent}<{}", doc.tag_name(element))?;
    if let Some(content) = doc.content(element) {
        writeln!(out, "> {content}")?;
    } else if doc.is_empty(element) {
        writeln!(out, "/>")?;
    } else {
        writeln!(out, ">")?;
    }
    let mut child = doc.first_child(element);
    while let Some(id) = child {
        display_tree(doc, id, depth + 1, out)?;
        child = doc.next_sibling(id);
    }
    Ok(())
}

fn run() -> Result<(), u8> {
    let args: Vec<String> = env::args().collect();

    // trivial command line parsing -- read from standard input or filename
    if args.len() > 2 {
        eprintln!("Usage: {} [<file>]", args[0]);
        return Err(1);
    }

    let language = define_language();
    if DEBUG {
        let stderr = io::stderr();
        language.display(&mut stderr.lock()).ok();
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let document = if args.len() == 2 {
        let file = File::open(&args[1]).map_err(|_| {
            eprintln!("Could not open {}", args[1]);
            1
        })?;
        parse_stream(file, &language, true)
    } else {
        parse_stream(io::stdin(), &language, true)
    };

    let document = document.map_err(|_| 1u8)?;

    if let Some(root) = document.root() {
        display_tree(&document, root, 0, &mut out).map_err(|_| 1u8)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}
