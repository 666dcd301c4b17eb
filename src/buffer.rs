//! A rolling input buffer with a substring cursor.
//!
//! The buffer accumulates every byte consumed from the input and lets the
//! parser mark the start/end of the token currently being scanned (a tag
//! name, attribute name, attribute value, or text run) directly inside it,
//! without allocating per character. The active substring is an
//! `Option<(usize, usize)>` rather than a pair of indices with a reserved
//! "inactive" value, so "no substring tracked yet" and "a substring that
//! happens to start at byte 0" can never be confused.

/// Chunks are grown in units of this many bytes.
pub const CHUNK_SIZE: usize = 1024;

/// Accumulates every byte consumed from the input, with a single active
/// substring cursor the parser can extend one byte at a time.
#[derive(Default)]
pub(crate) struct RollingBuffer {
    buf: Vec<u8>,
    substr: Option<(usize, usize)>,
}

impl RollingBuffer {
    pub(crate) fn new() -> Self {
        RollingBuffer {
            buf: Vec::with_capacity(CHUNK_SIZE),
            substr: None,
        }
    }

    /// Number of bytes consumed so far.
    pub(crate) fn pos(&self) -> usize {
        self.buf.len()
    }

    /// Starts (if inactive) or extends (if active) the substring cursor to
    /// cover the position the *next* appended byte will occupy.
    ///
    /// Callers track a substring *before* appending the byte that belongs to
    /// it: tracking and appending are separate steps, and a caller always
    /// tracks first, then appends at the end of handling that character.
    pub(crate) fn track_substr(&mut self) {
        let pos = self.buf.len();
        match &mut self.substr {
            Some((_, end)) => *end = pos,
            None => self.substr = Some((pos, pos)),
        }
    }

    /// Clears the substring cursor without affecting the accumulated bytes.
    pub(crate) fn reset_substr(&mut self) {
        self.substr = None;
    }

    /// Whether a substring is currently being tracked, i.e. at least one byte
    /// has been covered by [`track_substr`](Self::track_substr) since the
    /// last reset.
    pub(crate) fn substr_active(&self) -> bool {
        self.substr.is_some()
    }

    /// Returns a clone of the currently tracked substring as an owned UTF-8
    /// string, or the empty string if no substring is active.
    ///
    /// Does not reset the cursor; callers reset it explicitly once they're
    /// done with the clone (e.g. after storing a tag name they just cloned).
    pub(crate) fn clone_substr(&self) -> String {
        match self.substr {
            Some((start, end)) => {
                String::from_utf8_lossy(&self.buf[start..=end]).into_owned()
            }
            None => String::new(),
        }
    }

    /// Prefix-compares the tracked substring against `name`: `true` iff they
    /// are equal in length and content. Used only to validate a close tag's
    /// name against the name of the element it is meant to close.
    pub(crate) fn substr_eq(&self, name: &str) -> bool {
        match self.substr {
            Some((start, end)) => &self.buf[start..=end] == name.as_bytes(),
            None => name.is_empty(),
        }
    }

    /// Appends one consumed byte to the buffer.
    ///
    /// Growth is amortized O(1).
    pub(crate) fn push(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Returns every byte consumed so far, for diagnostic dumps on error.
    pub(crate) fn consumed(&self) -> &[u8] {
        &self.buf
    }
}
