//! The public parser surface: construction, observer access, and dispatch.
//!
//! A C-style `create`/`set_observer`/`dispatch`/`destroy` lifecycle,
//! rendered as Rust construction + methods + `Drop` (nothing to release
//! explicitly — all buffers are owned `Vec<u8>`s dropped automatically).

use crate::config::ParseConfig;
use crate::error::Error;
use crate::frame_stack::FrameStack;
use crate::observer::Observer;
use crate::tokenizer;

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

/// An incremental, push-style bencode parser.
///
/// `Parser` owns the frame stack and drives the tokenizer one byte at a
/// time across however many [`dispatch`](Parser::dispatch) calls the caller
/// makes; it never materializes a value tree itself. Events are reported to
/// the observer `O` as soon as they are known.
///
/// # Example
///
/// ```
/// use bencode_core::{Observer, Parser};
///
/// #[derive(Default)]
/// struct Counter {
///     ints: u32,
/// }
///
/// impl Observer for Counter {
///     fn hit_int(&mut self, _dict_key: Option<&[u8]>, _value: i64) -> bool {
///         self.ints += 1;
///         true
///     }
/// }
///
/// let mut parser = Parser::with_depth(4, Counter::default()).unwrap();
/// parser.dispatch(b"i123e").unwrap();
/// assert_eq!(parser.observer().ints, 1);
/// ```
pub struct Parser<O: Observer> {
    stack: FrameStack,
    observer: O,
    /// Absolute offset of the next byte to be processed, summed across all
    /// `dispatch` calls (used only for error reporting).
    offset: usize,
}

impl<O: Observer> Parser<O> {
    /// Creates a parser from an explicit [`ParseConfig`].
    pub fn new(config: ParseConfig, observer: O) -> Result<Self, Error> {
        #[cfg(feature = "tracing")]
        trace!(expected_depth = config.expected_depth, "bencode parser created");
        Ok(Self {
            stack: FrameStack::new(config.expected_depth, config.initial_buffer_capacity),
            observer,
            offset: 0,
        })
    }

    /// Convenience constructor taking just the expected nesting depth (the
    /// observer plays the role of user data here: it owns whatever state it
    /// needs).
    pub fn with_depth(expected_depth: usize, observer: O) -> Result<Self, Error> {
        Self::new(ParseConfig::new(expected_depth), observer)
    }

    /// Replaces the observer, returning the previous one.
    pub fn set_observer(&mut self, observer: O) -> O {
        core::mem::replace(&mut self.observer, observer)
    }

    /// Borrows the observer, e.g. to inspect state it has accumulated.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Mutably borrows the observer.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Consumes the parser, returning its observer.
    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Feeds one chunk of input through the tokenizer.
    ///
    /// Chunk boundaries are arbitrary: a value (integer, string, key) may
    /// span any number of `dispatch` calls and is only reported once fully
    /// buffered. On error the parser is left in its failing state and
    /// should be discarded rather than fed more input.
    pub fn dispatch(&mut self, chunk: &[u8]) -> Result<(), Error> {
        if self.stack.depth() >= self.stack.capacity() {
            return Err(Error::DepthExceeded {
                depth: self.stack.depth() + 1,
                limit: self.stack.capacity(),
            });
        }

        #[cfg(feature = "tracing")]
        trace!(len = chunk.len(), "dispatching chunk");

        for &byte in chunk {
            if let Err(err) = tokenizer::step(&mut self.stack, &mut self.observer, byte, self.offset)
            {
                #[cfg(feature = "tracing")]
                debug!(?err, offset = self.offset, "bencode dispatch failed");
                return Err(err);
            }
            self.offset += 1;
        }
        Ok(())
    }
}

impl<O: Observer + core::fmt::Debug> core::fmt::Debug for Parser<O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Parser")
            .field("depth", &self.stack.depth())
            .field("capacity", &self.stack.capacity())
            .field("offset", &self.offset)
            .field("observer", &self.observer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::Observer;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Observer for Recorder {
        fn hit_int(&mut self, dict_key: Option<&[u8]>, value: i64) -> bool {
            self.events
                .push(format!("hit_int({:?}, {})", dict_key, value));
            true
        }
        fn hit_str(&mut self, dict_key: Option<&[u8]>, total_len: usize, bytes: &[u8], len: usize) -> bool {
            self.events.push(format!(
                "hit_str({:?}, {}, {:?}, {})",
                dict_key, total_len, bytes, len
            ));
            true
        }
        fn dict_enter(&mut self, dict_key: Option<&[u8]>) -> bool {
            self.events.push(format!("dict_enter({:?})", dict_key));
            true
        }
        fn dict_leave(&mut self, dict_key: Option<&[u8]>) -> bool {
            self.events.push(format!("dict_leave({:?})", dict_key));
            true
        }
        fn list_enter(&mut self, dict_key: Option<&[u8]>) -> bool {
            self.events.push(format!("list_enter({:?})", dict_key));
            true
        }
        fn list_leave(&mut self, dict_key: Option<&[u8]>) -> bool {
            self.events.push(format!("list_leave({:?})", dict_key));
            true
        }
        fn list_next(&mut self) -> bool {
            self.events.push("list_next()".into());
            true
        }
        fn dict_next(&mut self) -> bool {
            self.events.push("dict_next()".into());
            true
        }
    }

    fn events_for(input: &[u8], depth: usize) -> Result<Vec<String>, Error> {
        let mut parser = Parser::with_depth(depth, Recorder::default())?;
        parser.dispatch(input)?;
        Ok(parser.into_observer().events)
    }

    #[test]
    fn scenario_1_integer() {
        assert_eq!(events_for(b"i123e", 2).unwrap(), vec!["hit_int(None, 123)"]);
    }

    #[test]
    fn scenario_2_large_integer() {
        assert_eq!(
            events_for(b"i252875232e", 2).unwrap(),
            vec!["hit_int(None, 252875232)"]
        );
    }

    #[test]
    fn scenario_4_string_with_colon() {
        assert_eq!(
            events_for(b"13:flying:animal", 2).unwrap(),
            vec!["hit_str(None, 13, [102, 108, 121, 105, 110, 103, 58, 97, 110, 105, 109, 97, 108], 13)"]
        );
    }

    #[test]
    fn scenario_5_nested_list() {
        assert_eq!(
            events_for(b"ll3:fooee", 3).unwrap(),
            vec![
                "list_enter(None)",
                "list_enter(None)",
                "hit_str(None, 3, [102, 111, 111], 3)",
                "list_next()",
                "list_leave(None)",
                "list_next()",
                "list_leave(None)",
            ]
        );
    }

    #[test]
    fn scenario_6_dict_with_list_value() {
        assert_eq!(
            events_for(b"d3:keyl4:test3:fooe4:testi999ee", 4).unwrap(),
            vec![
                "dict_enter(None)",
                "list_enter(Some([107, 101, 121]))",
                "hit_str(None, 4, [116, 101, 115, 116], 4)",
                "list_next()",
                "hit_str(None, 3, [102, 111, 111], 3)",
                "list_next()",
                "list_leave(Some([107, 101, 121]))",
                "dict_next()",
                "hit_int(Some([116, 101, 115, 116]), 999)",
                "dict_next()",
                "dict_leave(None)",
            ]
        );
    }

    #[test]
    fn scenario_7_empty_string_value() {
        assert_eq!(
            events_for(b"d8:intervali1800e5:peers0:e", 3).unwrap(),
            vec![
                "dict_enter(None)",
                "hit_int(Some([105, 110, 116, 101, 114, 118, 97, 108]), 1800)",
                "dict_next()",
                "hit_str(Some([112, 101, 101, 114, 115]), 0, [], 0)",
                "dict_next()",
                "dict_leave(None)",
            ]
        );
    }

    #[test]
    fn scenario_8_insufficient_depth() {
        let mut parser = Parser::with_depth(0, Recorder::default()).unwrap();
        assert!(parser.dispatch(b"4:test").is_err());
        assert!(parser.into_observer().events.is_empty());
    }

    #[test]
    fn empty_dict_no_spurious_dict_next() {
        assert_eq!(
            events_for(b"de", 2).unwrap(),
            vec!["dict_enter(None)", "dict_leave(None)"]
        );
    }

    #[test]
    fn empty_list_no_spurious_list_next() {
        assert_eq!(events_for(b"le", 2).unwrap(), vec!["list_enter(None)", "list_leave(None)"]);
    }

    #[test]
    fn depth_exceeded_on_nested_list() {
        // Depth 2 tolerates one push (one level of real nesting past the
        // top-level frame, which transitions in place); a second nested
        // list must exceed it.
        let err = events_for(b"lll", 2).unwrap_err();
        assert!(matches!(err, Error::DepthExceeded { .. }));
    }

    #[test]
    fn negative_integer_is_rejected() {
        assert!(events_for(b"i-42e", 2).is_err());
    }

    #[test]
    fn chunked_dispatch_matches_whole_input() {
        let whole = events_for(b"d3:keyl4:test3:fooe4:testi999ee", 4).unwrap();

        let input = b"d3:keyl4:test3:fooe4:testi999ee";
        let mut parser = Parser::with_depth(4, Recorder::default()).unwrap();
        for byte in input {
            parser.dispatch(core::slice::from_ref(byte)).unwrap();
        }
        let chunked = parser.into_observer().events;

        assert_eq!(whole, chunked);
    }
}
