//! The parser's error taxonomy.

use std::cell::RefCell;
use std::fmt;

/// A 1-based line/column position in the input.
///
/// Computed lazily from a byte offset only when an error is actually raised,
/// rather than tracked incrementally on every character, since the input
/// here is an arbitrary `Read` stream rather than an already-materialized
/// string to slice.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub(crate) fn from_consumed(consumed: &[u8]) -> Position {
        let mut line = 1u32;
        let mut column = 1u32;
        for &b in consumed {
            if b == b'\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// All errors the parser and its collaborators can produce.
///
/// Variants are grouped by kind: input-syntax, semantic, entity, structural,
/// resource, and programmer-error.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Error {
    // -- input-syntax --
    /// A byte outside the XML 1.0 legal-character ranges.
    IllegalCharacter(Position),
    /// A character other than `?`, `!`, `/`, or a name-start character
    /// followed `<`.
    InvalidAfterLT(Position),
    /// A character that cannot continue a tag or attribute name appeared
    /// where a name character was expected.
    InvalidNameChar(Position),
    /// A tag declared empty in the schema was closed with a plain `>`
    /// instead of `/>`.
    EmptyTagNotSelfClosed(Position),
    /// A tag not declared empty in the schema was self-closed with `/>`.
    NonEmptyClosedAsEmpty(Position),
    /// A close tag's name didn't match the name of the element it closed.
    CloseOpenMismatch(Position),
    /// An attribute's `=` was not followed by a `'`- or `"`-quoted value.
    UnquotedAttrValue(Position),
    /// Non-whitespace content appeared outside the root element.
    ContentOutsideRoot(Position),
    /// A `<!...>` construct other than a comment was encountered.
    InvalidBangElement(Position),
    /// `<!-` was not followed by a second `-`.
    MalformedComment(Position),
    /// `--` appeared inside a comment body.
    DashDashInComment(Position),
    /// A close tag (`</...>`) was encountered with no open element.
    CloseWithoutOpen(Position),

    // -- semantic --
    /// The first tag encountered did not match the schema's root tag name.
    RootMismatch(Position),
    /// A tag is not a declared child of its parent tag in the schema.
    UnknownTagHere(Position),
    /// An attribute name is not declared on its element's tag.
    UnknownAttribute(Position),
    /// The same attribute was set twice on one element.
    DuplicateAttribute(Position),

    // -- entity --
    /// A bare, unescaped `<` appeared in text content or an attribute value.
    LessThanInText,
    /// A second `&` was encountered before the first's entity reference
    /// closed.
    NestedAmpersand,
    /// A `&...;` sequence did not match one of the five predefined entities.
    UnknownEntity,
    /// Input ended (or the value ended) with an `&` never closed by `;`.
    UnterminatedEntity,

    // -- structural --
    /// End of input was reached with open elements still on the stack.
    UnclosedTags,
    /// End of input was reached without ever completing the root element.
    NoRoot,

    // -- resource --
    /// Memory allocation failed.
    ///
    /// Effectively unreachable in safe Rust, where the global allocator
    /// aborts the process rather than returning this; kept for taxonomy
    /// completeness.
    AllocationFailure,
    /// The underlying `Read` returned an I/O error.
    IOError(String),

    // -- programmer --
    /// A public entry point was called with an invalid configuration (e.g. a
    /// `Schema` with no root tag registered).
    ParserMisconfigured(&'static str),
}

impl Error {
    /// Returns this error's position in the input, if it carries one.
    ///
    /// Entity, structural, resource, and programmer errors are not tied to a
    /// single input offset (entity errors are raised after the offending
    /// text has already been fully consumed; structural errors are raised at
    /// EOF), so they return `None`.
    pub fn position(&self) -> Option<Position> {
        use Error::*;
        match *self {
            IllegalCharacter(p)
            | InvalidAfterLT(p)
            | InvalidNameChar(p)
            | EmptyTagNotSelfClosed(p)
            | NonEmptyClosedAsEmpty(p)
            | CloseOpenMismatch(p)
            | UnquotedAttrValue(p)
            | ContentOutsideRoot(p)
            | InvalidBangElement(p)
            | MalformedComment(p)
            | DashDashInComment(p)
            | CloseWithoutOpen(p)
            | RootMismatch(p)
            | UnknownTagHere(p)
            | UnknownAttribute(p)
            | DuplicateAttribute(p) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Error::*;
        match self {
            IllegalCharacter(p) => write!(f, "illegal character in input at {p}"),
            InvalidAfterLT(p) => write!(f, "disallowed character after '<' at {p}"),
            InvalidNameChar(p) => write!(f, "invalid character in name at {p}"),
            EmptyTagNotSelfClosed(p) => write!(f, "empty tag not closed with '/>' at {p}"),
            NonEmptyClosedAsEmpty(p) => write!(f, "non-empty tag closed with '/>' at {p}"),
            CloseOpenMismatch(p) => write!(f, "close tag does not match open tag at {p}"),
            UnquotedAttrValue(p) => write!(f, "attribute values must be quoted at {p}"),
            ContentOutsideRoot(p) => write!(f, "content found outside the root element at {p}"),
            InvalidBangElement(p) => write!(f, "invalid '<!' element at {p}"),
            MalformedComment(p) => write!(f, "malformed comment at {p}"),
            DashDashInComment(p) => write!(f, "'--' not allowed within a comment at {p}"),
            CloseWithoutOpen(p) => write!(f, "close tag found without a matching open tag at {p}"),
            RootMismatch(p) => write!(f, "root tag does not match the schema's root at {p}"),
            UnknownTagHere(p) => write!(f, "tag is not valid at this position at {p}"),
            UnknownAttribute(p) => write!(f, "attribute is not valid for this tag at {p}"),
            DuplicateAttribute(p) => write!(f, "attribute set more than once at {p}"),
            LessThanInText => write!(f, "unescaped '<' in text or attribute value"),
            NestedAmpersand => write!(f, "'&' encountered before a prior entity reference closed"),
            UnknownEntity => write!(f, "unknown entity reference (only &lt; &gt; &amp; &apos; &quot; are supported)"),
            UnterminatedEntity => write!(f, "'&' not followed by a terminating ';'"),
            UnclosedTags => write!(f, "end of input reached with open elements remaining"),
            NoRoot => write!(f, "end of input reached without a root element"),
            AllocationFailure => write!(f, "memory allocation failed"),
            IOError(msg) => write!(f, "I/O error: {msg}"),
            ParserMisconfigured(what) => write!(f, "programmer error: {what}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IOError(e.to_string())
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = RefCell::new(None);
}

/// Records `err` (or clears the slot if `None`) in the per-thread
/// "last error" shim.
///
/// This is a thin backward-compatibility convenience over the primary
/// `Result`-based API; nothing in this crate's own control flow reads
/// `LAST_ERROR` back.
pub(crate) fn set_last_error(err: Option<&Error>) {
    LAST_ERROR.with(|cell| {
        *cell.borrow_mut() = err.map(|e| e.to_string());
    });
}

/// Returns the message of the most recent error raised by this thread's
/// calls into this crate, or `None` if the most recent call succeeded (or
/// none has been made yet).
pub fn last_error_message() -> Option<String> {
    LAST_ERROR.with(|cell| cell.borrow().clone())
}
