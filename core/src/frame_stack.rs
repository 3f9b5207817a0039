//! A pre-allocated stack of [`Frame`]s with push/pop discipline.
//!
//! Capacity is fixed at construction. Push resets a frame's scalar fields but
//! keeps its buffer allocations; pop fires the leave/sibling-advance observer
//! events for the frame being removed before exposing the parent as the new
//! top.
//!
//! A frame's key buffer (`key`/`key_len`) is set exactly once, when a
//! `DICT_KEY` copy completes, and is retained while that same frame
//! transitions in place into the value's token kind (`INT`, `STR_LEN`,
//! `LIST`, or `DICT`). So a frame's own `key_len` is sufficient to recover
//! the dict_key argument for any event raised while that frame is current,
//! or when it is popped: no separate bookkeeping of "are we a dict value" is
//! needed.

use crate::error::Error;
use crate::frame::{Frame, TokenKind};
use crate::observer::Observer;

#[cfg(feature = "tracing")]
use tracing::trace;

/// The fixed-capacity stack of [`Frame`]s backing a [`crate::Parser`].
#[derive(Debug)]
pub struct FrameStack {
    frames: Vec<Frame>,
    /// Index of the current top frame.
    depth: usize,
    capacity: usize,
    initial_buffer_capacity: usize,
}

impl FrameStack {
    /// Creates a stack with room for `capacity` nesting levels (including
    /// the top-level frame at depth 0). `initial_buffer_capacity` is the
    /// size newly-allocated frame buffers start at.
    pub fn new(capacity: usize, initial_buffer_capacity: usize) -> Self {
        let mut frames = Vec::with_capacity(capacity.max(1));
        frames.push(Frame::empty(initial_buffer_capacity));
        Self {
            frames,
            depth: 0,
            capacity,
            initial_buffer_capacity,
        }
    }

    /// Current nesting depth (the index of the top frame).
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Configured maximum depth.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn top(&self) -> &Frame {
        &self.frames[self.depth]
    }

    #[inline]
    pub(crate) fn top_mut(&mut self) -> &mut Frame {
        &mut self.frames[self.depth]
    }

    /// Pushes a new frame, resetting its scalar fields but retaining any
    /// buffers previously allocated at this depth.
    ///
    /// Fails with [`Error::DepthExceeded`] if `depth + 1` would reach
    /// `capacity`.
    pub(crate) fn push(&mut self) -> Result<(), Error> {
        if self.depth + 1 >= self.capacity {
            return Err(Error::DepthExceeded {
                depth: self.depth + 1,
                limit: self.capacity,
            });
        }
        self.depth += 1;
        if self.depth == self.frames.len() {
            self.frames.push(Frame::empty(self.initial_buffer_capacity));
        } else {
            self.frames[self.depth].reset_for_push();
        }
        Ok(())
    }

    /// Pops the top frame.
    ///
    /// Fires the leaving frame's own `list_leave`/`dict_leave` (using its own
    /// key buffer, which — for a container that was itself a dict value —
    /// still holds the key set during the preceding `DICT_KEY` phase).
    /// Then, if a parent remains (or the top-level frame is being reset to
    /// `NONE`), fires the new top's sibling-advance event (`list_next` for a
    /// `LIST` parent, `dict_next` for a `DICT` parent).
    ///
    /// Scalar (non-container) frames fire no leave event of their own; the
    /// caller is responsible for emitting `hit_int`/`hit_str` before calling
    /// this.
    pub(crate) fn pop<O: Observer>(&mut self, observer: &mut O) -> Result<(), Error> {
        let leaving_kind = self.top().token_kind;
        let leaving_key = if matches!(leaving_kind, TokenKind::List | TokenKind::Dict) {
            self.top().current_key().map(<[u8]>::to_vec)
        } else {
            None
        };
        let had_parent = self.depth > 0;

        if had_parent {
            self.depth -= 1;
        } else {
            self.top_mut().reset_for_push();
        }

        let key_ref = leaving_key.as_deref();
        match leaving_kind {
            TokenKind::List => {
                #[cfg(feature = "tracing")]
                trace!(depth = self.depth, key = ?key_ref, "list_leave");
                if !observer.list_leave(key_ref) {
                    return Err(Error::ObserverAbort);
                }
            }
            TokenKind::Dict => {
                #[cfg(feature = "tracing")]
                trace!(depth = self.depth, key = ?key_ref, "dict_leave");
                if !observer.dict_leave(key_ref) {
                    return Err(Error::ObserverAbort);
                }
            }
            _ => {}
        }

        if had_parent {
            self.fire_sibling_advance(observer)?;
        }

        Ok(())
    }

    fn fire_sibling_advance<O: Observer>(&mut self, observer: &mut O) -> Result<(), Error> {
        match self.top().token_kind {
            TokenKind::List => {
                if !observer.list_next() {
                    return Err(Error::ObserverAbort);
                }
            }
            TokenKind::Dict => {
                if !observer.dict_next() {
                    return Err(Error::ObserverAbort);
                }
            }
            _ => {}
        }
        Ok(())
    }
}
