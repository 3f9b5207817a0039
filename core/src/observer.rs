//! The caller-supplied collaborator the tokenizer reports events to.
//!
//! An [`Observer`] never drives the parser itself (see [`crate::Parser`] for
//! that); it only reacts to the events the tokenizer raises in input order.
//! Implementations that need to retain a `dict_key` slice past the callback
//! must copy it — it borrows the frame's key buffer for the callback's
//! duration only.

/// Callbacks invoked by the tokenizer at semantic event boundaries.
///
/// Every method returns `bool`: `true` to continue parsing, `false` to
/// request an abort, which the driver surfaces as
/// [`crate::Error::ObserverAbort`]. Default bodies return `true` so an
/// implementer only overrides the events it actually cares about.
pub trait Observer {
    /// Fired when an integer value closes (`e` after its digits).
    ///
    /// `dict_key` is the enclosing dictionary's key bytes, or `None` when
    /// this integer is a list element or the top-level value.
    #[allow(unused_variables)]
    fn hit_int(&mut self, dict_key: Option<&[u8]>, value: i64) -> bool {
        true
    }

    /// Fired once a byte-string value is fully buffered.
    ///
    /// `total_len` and `len` are always equal in this implementation; chunked
    /// emission for very large strings is a documented, unimplemented future
    /// extension.
    #[allow(unused_variables)]
    fn hit_str(&mut self, dict_key: Option<&[u8]>, total_len: usize, bytes: &[u8], len: usize) -> bool {
        true
    }

    /// Fired when a `d` opens a dictionary, before any of its children.
    #[allow(unused_variables)]
    fn dict_enter(&mut self, dict_key: Option<&[u8]>) -> bool {
        true
    }

    /// Fired when the `e` closing a dictionary is processed.
    ///
    /// `dict_key` here is the key under which *this dictionary itself* was
    /// nested (the parent's key), or `None` if the parent is a list or the
    /// top level.
    #[allow(unused_variables)]
    fn dict_leave(&mut self, dict_key: Option<&[u8]>) -> bool {
        true
    }

    /// Fired when an `l` opens a list, before any of its elements.
    #[allow(unused_variables)]
    fn list_enter(&mut self, dict_key: Option<&[u8]>) -> bool {
        true
    }

    /// Fired when the `e` closing a list is processed.
    #[allow(unused_variables)]
    fn list_leave(&mut self, dict_key: Option<&[u8]>) -> bool {
        true
    }

    /// Fired once per list element, after that element's own events.
    fn list_next(&mut self) -> bool {
        true
    }

    /// Fired once per dictionary key/value pair, after the value's events.
    fn dict_next(&mut self) -> bool {
        true
    }
}
