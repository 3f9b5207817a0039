//! Per-nesting-level parser state.
//!
//! A [`Frame`] holds everything the tokenizer needs to resume a single level
//! of bencode nesting across arbitrary byte boundaries: the current token
//! kind, the accumulated scalar value for that kind, and the two growable
//! byte buffers used while a string or dictionary key is being copied in.

/// The nine mutually-exclusive states a [`Frame`] can be in.
///
/// This enum only names the states; the transitions between them live in
/// [`crate::tokenizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum TokenKind {
    /// Frame freshly pushed, awaiting the first byte of a new value.
    None,
    /// Reading decimal digits of an integer until `e`.
    Int,
    /// Reading decimal digits of a byte-string length until `:`.
    StrLen,
    /// Copying exactly `pending_len` bytes into the string buffer.
    Str,
    /// Inside a list; next byte either starts a new element or is `e`.
    List,
    /// Inside a dictionary at an element boundary.
    Dict,
    /// Reading decimal digits of the current key length until `:`.
    DictKeyLen,
    /// Copying exactly `pending_len` bytes of the key into the key buffer.
    DictKey,
    /// Key complete; next byte starts the value.
    DictVal,
}

/// Default initial capacity for lazily-allocated `strval`/`key` buffers.
/// Overridable via [`crate::config::ParseConfig`].
pub const DEFAULT_INITIAL_BUFFER_CAPACITY: usize = 20;

/// The per-nesting-level parser state.
///
/// Buffers are retained across push/pop (see [`crate::frame_stack::FrameStack`])
/// so that repeated parses of similar shape do not re-allocate.
#[derive(Debug, Clone)]
pub struct Frame {
    pub(crate) token_kind: TokenKind,
    /// Signed accumulator for `INT` frames.
    pub(crate) pending_int: i64,
    /// Nonnegative accumulator shared by `STR_LEN`/`DICT_KEYLEN` and the
    /// in-progress copy length for `STR`/`DICT_KEY`.
    pub(crate) pending_len: usize,
    /// Write cursor into `strval`/`key`, or digit counter while accumulating.
    pub(crate) pos: usize,
    /// Growable buffer for the value portion of a string.
    pub(crate) strval: Vec<u8>,
    /// Growable buffer for the most recent dictionary key at this depth.
    pub(crate) key: Vec<u8>,
    /// Logical length of `key` (may be shorter than `key.len()`'s capacity).
    pub(crate) key_len: usize,
    /// Size a buffer is grown to the first time it is needed at this depth,
    /// tunable via [`crate::config::ParseConfig`].
    pub(crate) initial_capacity: usize,
}

impl Frame {
    /// A frame with no allocated buffers; buffers are lazily allocated on
    /// first use at this depth.
    pub(crate) fn empty(initial_capacity: usize) -> Self {
        Self {
            token_kind: TokenKind::None,
            pending_int: 0,
            pending_len: 0,
            pos: 0,
            strval: Vec::new(),
            key: Vec::new(),
            key_len: 0,
            initial_capacity,
        }
    }

    /// Resets scalar fields for reuse at a push; buffer allocations are
    /// retained.
    pub(crate) fn reset_for_push(&mut self) {
        self.token_kind = TokenKind::None;
        self.pending_int = 0;
        self.pending_len = 0;
        self.pos = 0;
        self.key_len = 0;
    }

    /// The key bytes this frame was last given, or `None` if this frame has
    /// never held a dictionary key (it is a list element or the top level).
    ///
    /// A frame's key is set once, when its `DICT_KEY` copy completes, and is
    /// retained while the very same frame transitions in place into the
    /// value's token kind. `key_len` alone (not `token_kind`) distinguishes
    /// "has a key" from "does not", since by the time a value event fires
    /// the frame's kind has already moved on to `INT`/`STR`/`LIST`/`DICT`.
    ///
    /// Borrowed for the duration of the observer callback only; callers
    /// that need to retain it must copy.
    pub(crate) fn current_key(&self) -> Option<&[u8]> {
        if self.key_len > 0 {
            Some(&self.key[..self.key_len])
        } else {
            None
        }
    }

    /// Ensures `strval` has room for at least `needed` bytes, growing by
    /// `new = 4 + old * 2` each step rather than to the exact size needed.
    pub(crate) fn ensure_strval_capacity(&mut self, needed: usize) {
        let initial = self.initial_capacity;
        grow_buffer(&mut self.strval, needed, initial);
    }

    /// Ensures `key` has room for at least `needed` bytes, growing by
    /// `new = old * 2 + 4` each step.
    pub(crate) fn ensure_key_capacity(&mut self, needed: usize) {
        let initial = self.initial_capacity;
        grow_buffer(&mut self.key, needed, initial);
    }
}

fn grow_buffer(buf: &mut Vec<u8>, needed: usize, initial_capacity: usize) {
    if buf.is_empty() && needed > 0 {
        buf.resize(initial_capacity.max(needed), 0);
        return;
    }
    let mut cap = buf.len();
    while cap < needed {
        cap = 4 + cap * 2;
    }
    if cap > buf.len() {
        buf.resize(cap, 0);
    }
}
