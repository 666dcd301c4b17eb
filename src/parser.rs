//! The character-driven parser state machine.
//!
//! [`Parser`] consumes one legal XML code point at a time and drives a
//! stack of [`Frame`]s, one per currently-open element, through the
//! open-tag / close-tag / comment / processing-instruction sub-grammars.
//! It owns no [`crate::document::Document`] itself; the caller (normally
//! [`crate::driver::parse_stream`]) hands one in on every character and the
//! parser mutates it as elements, attributes, and content are completed.

use crate::buffer::RollingBuffer;
use crate::char_class;
use crate::document::{Document, ElementId};
use crate::error::{Error, Position};
use crate::schema::Schema;

/// One state of the open-tag / close-tag / comment / PI sub-grammars.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum State {
    Content,
    StartTag,
    OpenPi,
    ClosePi,
    OpenCommentBang,
    OpenCommentBangDash,
    Comment,
    CloseCommentDash,
    CloseCommentDashDash,
    OpenTagName,
    OpenTagSpace,
    OpenTagEmpty,
    OpenTagAttrName,
    OpenTagAttrEquals,
    OpenTagAttrValue,
    OpenTagHaveValue,
    CloseTagStart,
    CloseTagName,
}

/// One stack frame: the state machine's progress through the open tag (if
/// any) currently being scanned, plus the element it belongs to.
///
/// `quote_char`/`attr_name` are only meaningful while scanning an attribute
/// value; `element` is `None` only for the bottommost frame, representing
/// "outside the root element".
struct Frame {
    state: State,
    quote_char: u8,
    attr_name: Option<String>,
    element: Option<ElementId>,
}

/// The parser's stack of open elements, plus the rolling input buffer it
/// tokenizes against.
pub(crate) struct Parser {
    stack: Vec<Frame>,
    buffer: RollingBuffer,
}

impl Parser {
    pub(crate) fn new() -> Self {
        Parser {
            stack: vec![Frame {
                state: State::Content,
                quote_char: 0,
                attr_name: None,
                element: None,
            }],
            buffer: RollingBuffer::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> State {
        self.stack.last().unwrap().state
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    pub(crate) fn buffer(&self) -> &RollingBuffer {
        &self.buffer
    }

    /// Converts the bytes consumed so far into a line/column [`Position`].
    ///
    /// Only called on error branches, not on every character: the
    /// conversion walks every consumed byte, so doing it unconditionally
    /// would make a successful parse quadratic in the input length.
    fn error_pos(&self) -> Position {
        Position::from_consumed(self.buffer.consumed())
    }

    fn top(&self) -> &Frame {
        self.stack.last().expect("parser stack is never empty")
    }

    fn top_mut(&mut self) -> &mut Frame {
        self.stack.last_mut().expect("parser stack is never empty")
    }

    fn set_state(&mut self, state: State) {
        self.top_mut().state = state;
    }

    /// If the top frame's element has no content yet and a substring was
    /// actually tracked since the last reset, clones and stores it as the
    /// element's content.
    ///
    /// Gating on [`RollingBuffer::substr_active`] keeps "no text before this
    /// boundary" (content stays unset) distinct from "an empty-but-present
    /// text run": without it, an element with no text at all would pick up
    /// whatever stale bytes the substring cursor last happened to cover.
    fn handle_content(&mut self, doc: &mut Document) -> Result<(), Error> {
        if let Some(element) = self.top().element {
            if doc.content(element).is_none() && self.buffer.substr_active() {
                let text = self.buffer.clone_substr();
                doc.set_content(element, &text)?;
            }
        }
        self.buffer.reset_substr();
        Ok(())
    }

    /// Creates a new element named by the tracked substring, as a child of
    /// the current top frame's element, then pushes a new frame for it in
    /// `next_state`.
    fn start_element(&mut self, doc: &mut Document, next_state: State) -> Result<(), Error> {
        let name = self.buffer.clone_substr();
        self.buffer.reset_substr();
        let parent = self.top().element;
        let element = doc.create_element(parent, &name, self.buffer.consumed())?;
        self.stack.push(Frame {
            state: next_state,
            quote_char: 0,
            attr_name: None,
            element: Some(element),
        });
        Ok(())
    }

    /// Sets an attribute named by the tracked substring to an empty value on
    /// the top frame's element.
    fn add_empty_value(&mut self, doc: &mut Document) -> Result<(), Error> {
        let name = self.buffer.clone_substr();
        let element = self.top().element.expect("attribute requires an open element");
        doc.set_attribute_value(element, &name, "", self.buffer.consumed())?;
        self.buffer.reset_substr();
        Ok(())
    }

    /// Pops the top frame, returning the element it held (if any).
    fn pop(&mut self) -> Option<ElementId> {
        self.stack.pop().expect("never pop the root frame").element
    }

    /// Feeds one legal-XML code point to the state machine, mutating `doc`
    /// as elements/attributes/content are completed.
    ///
    /// Returns the element that was just closed on this character, if any
    /// (non-`None` only on the character that completes an element).
    pub(crate) fn parse_char(
        &mut self,
        doc: &mut Document,
        c: u32,
    ) -> Result<Option<ElementId>, Error> {
        if !char_class::is_legal(c) {
            return Err(Error::IllegalCharacter(self.error_pos()));
        }
        // Safe: legal XML chars fit in a `char` (no surrogate halves).
        let ch = char::from_u32(c).expect("legal XML code point is a valid char");

        let mut completed = None;

        match self.top().state {
            State::Content => {
                if ch == '<' {
                    self.set_state(State::StartTag);
                    self.handle_content(doc)?;
                } else if self.top().element.is_none() {
                    if !char_class::is_xml_space(c) {
                        return Err(Error::ContentOutsideRoot(self.error_pos()));
                    }
                } else {
                    let element = self.top().element.unwrap();
                    // Only the first contiguous text region, before any
                    // nested child, becomes content; text after a child has
                    // already appeared is silently dropped, even though
                    // `content` itself may still be unset.
                    if doc.content(element).is_none() && doc.first_child(element).is_none() {
                        self.buffer.track_substr();
                    }
                }
            }

            State::StartTag => {
                if ch == '?' {
                    self.set_state(State::OpenPi);
                } else if ch == '!' {
                    self.set_state(State::OpenCommentBang);
                } else if ch == '/' {
                    if self.top().element.is_none() {
                        return Err(Error::CloseWithoutOpen(self.error_pos()));
                    }
                    self.set_state(State::CloseTagStart);
                } else if char_class::is_name_start(c) {
                    self.set_state(State::OpenTagName);
                    self.buffer.track_substr();
                } else {
                    return Err(Error::InvalidAfterLT(self.error_pos()));
                }
            }

            State::OpenPi => {
                if ch == '?' {
                    self.set_state(State::ClosePi);
                }
            }

            State::ClosePi => {
                if ch == '>' {
                    self.set_state(State::Content);
                    self.handle_content(doc)?;
                } else {
                    self.set_state(State::OpenPi);
                }
            }

            State::OpenCommentBang => {
                if ch == '-' {
                    self.set_state(State::OpenCommentBangDash);
                } else {
                    return Err(Error::InvalidBangElement(self.error_pos()));
                }
            }

            State::OpenCommentBangDash => {
                if ch == '-' {
                    self.set_state(State::Comment);
                } else {
                    return Err(Error::MalformedComment(self.error_pos()));
                }
            }

            State::Comment => {
                if ch == '-' {
                    self.set_state(State::CloseCommentDash);
                }
            }

            State::CloseCommentDash => {
                self.set_state(if ch == '-' {
                    State::CloseCommentDashDash
                } else {
                    State::Comment
                });
            }

            State::CloseCommentDashDash => {
                if ch == '>' {
                    self.set_state(State::Content);
                    self.handle_content(doc)?;
                } else {
                    return Err(Error::DashDashInComment(self.error_pos()));
                }
            }

            State::OpenTagName => {
                if char_class::is_name_char(c) {
                    self.buffer.track_substr();
                } else if char_class::is_xml_space(c) {
                    self.set_state(State::Content);
                    self.start_element(doc, State::OpenTagSpace)?;
                } else if ch == '>' {
                    self.set_state(State::Content);
                    self.start_element(doc, State::Content)?;
                    let element = self.top().element.unwrap();
                    if doc.is_empty(element) {
                        return Err(Error::EmptyTagNotSelfClosed(self.error_pos()));
                    }
                } else if ch == '/' {
                    self.set_state(State::Content);
                    self.start_element(doc, State::OpenTagEmpty)?;
                } else {
                    return Err(Error::InvalidNameChar(self.error_pos()));
                }
            }

            State::OpenTagSpace => {
                if ch == '/' {
                    self.set_state(State::OpenTagEmpty);
                } else if ch == '>' {
                    self.set_state(State::Content);
                    let element = self.top().element.unwrap();
                    if doc.is_empty(element) {
                        return Err(Error::EmptyTagNotSelfClosed(self.error_pos()));
                    }
                } else if char_class::is_name_start(c) {
                    self.set_state(State::OpenTagAttrName);
                    self.buffer.track_substr();
                } else if !char_class::is_xml_space(c) {
                    return Err(Error::InvalidNameChar(self.error_pos()));
                }
            }

            State::OpenTagEmpty => {
                if ch == '>' {
                    let element = self.top().element.unwrap();
                    if !doc.is_empty(element) {
                        return Err(Error::NonEmptyClosedAsEmpty(self.error_pos()));
                    }
                    completed = self.pop();
                    self.buffer.reset_substr();
                } else {
                    return Err(Error::InvalidNameChar(self.error_pos()));
                }
            }

            State::OpenTagAttrName => {
                if char_class::is_name_char(c) {
                    self.buffer.track_substr();
                } else if char_class::is_xml_space(c) {
                    self.set_state(State::OpenTagSpace);
                    self.add_empty_value(doc)?;
                } else if ch == '>' {
                    self.set_state(State::Content);
                    self.add_empty_value(doc)?;
                } else if ch == '=' {
                    self.set_state(State::OpenTagAttrEquals);
                    let name = self.buffer.clone_substr();
                    self.top_mut().attr_name = Some(name);
                    self.buffer.reset_substr();
                } else {
                    return Err(Error::InvalidNameChar(self.error_pos()));
                }
            }

            State::OpenTagAttrEquals => {
                if ch == '\'' || ch == '"' {
                    self.set_state(State::OpenTagAttrValue);
                    self.top_mut().quote_char = ch as u8;
                } else {
                    return Err(Error::UnquotedAttrValue(self.error_pos()));
                }
            }

            State::OpenTagAttrValue => {
                if c != self.top().quote_char as u32 {
                    self.buffer.track_substr();
                } else {
                    self.set_state(State::OpenTagHaveValue);
                    let value = self.buffer.clone_substr();
                    let name = self
                        .top_mut()
                        .attr_name
                        .take()
                        .expect("OpenTagAttrName always sets attr_name before equals");
                    let element = self.top().element.unwrap();
                    doc.set_attribute_value(element, &name, &value, self.buffer.consumed())?;
                    self.buffer.reset_substr();
                }
            }

            State::OpenTagHaveValue => {
                if ch == '/' {
                    self.set_state(State::OpenTagEmpty);
                } else if ch == '>' {
                    self.set_state(State::Content);
                    let element = self.top().element.unwrap();
                    if doc.is_empty(element) {
                        return Err(Error::EmptyTagNotSelfClosed(self.error_pos()));
                    }
                } else if char_class::is_xml_space(c) {
                    self.set_state(State::OpenTagSpace);
                } else {
                    return Err(Error::UnquotedAttrValue(self.error_pos()));
                }
                self.top_mut().quote_char = 0;
            }

            State::CloseTagStart => {
                if char_class::is_name_start(c) {
                    self.set_state(State::CloseTagName);
                    self.buffer.track_substr();
                } else {
                    return Err(Error::InvalidNameChar(self.error_pos()));
                }
            }

            State::CloseTagName => {
                if char_class::is_name_char(c) {
                    self.buffer.track_substr();
                } else if ch == '>' {
                    let element = self
                        .top()
                        .element
                        .ok_or_else(|| Error::CloseWithoutOpen(self.error_pos()))?;
                    let name = doc.tag_name(element).to_string();
                    if !self.buffer.substr_eq(&name) {
                        return Err(Error::CloseOpenMismatch(self.error_pos()));
                    }
                    completed = self.pop();
                    self.buffer.reset_substr();
                } else {
                    return Err(Error::InvalidNameChar(self.error_pos()));
                }
            }
        }

        self.buffer.push(ch as u8);
        Ok(completed)
    }
}
