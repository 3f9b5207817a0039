//! Async adapters around the synchronous [`Parser`] (feature-gated).
//!
//! Grounded in the teacher's `Source -> AsyncTokenStream -> AstStream ->
//! Consumer` channel pipeline, simplified to a single stage: the bencode
//! engine has no separate lex/parse split, just one synchronous hop from
//! bytes straight to observer events, so there is nothing here for an
//! `await` point to do except wait for the next chunk to arrive. `step`
//! itself never suspends, performs no internal I/O, and sets no timers.
//! Only [`AsyncDispatcher::feed`]'s *caller* awaits anything, and only while
//! waiting on its own chunk source.

use crate::config::ParseConfig;
use crate::error::Error;
use crate::observer::Observer;
use crate::parser::Parser;

/// Wraps a [`Parser`] behind an `async fn feed`, for callers whose chunk
/// source is itself async (a socket, an async file, a channel) rather than
/// an in-memory byte slice.
///
/// `feed` does no actual awaiting of its own — `Parser::dispatch` is
/// synchronous and CPU-only — but giving it an `async fn` signature lets it
/// compose directly in an async chunk-processing loop without a `block_on`.
pub struct AsyncDispatcher<O: Observer> {
    parser: Parser<O>,
}

impl<O: Observer> AsyncDispatcher<O> {
    /// Creates a dispatcher from an explicit [`ParseConfig`].
    pub fn new(config: ParseConfig, observer: O) -> Result<Self, Error> {
        Ok(Self {
            parser: Parser::new(config, observer)?,
        })
    }

    /// Creates a dispatcher with the default initial buffer capacity.
    pub fn with_depth(expected_depth: usize, observer: O) -> Result<Self, Error> {
        Self::new(ParseConfig::new(expected_depth), observer)
    }

    /// Feeds one chunk through the wrapped parser.
    ///
    /// Chunk boundaries remain arbitrary: a value may span any number of
    /// `feed` calls.
    pub async fn feed(&mut self, chunk: &[u8]) -> Result<(), Error> {
        self.parser.dispatch(chunk)
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.parser.depth()
    }

    /// Borrows the observer.
    pub fn observer(&self) -> &O {
        self.parser.observer()
    }

    /// Mutably borrows the observer.
    pub fn observer_mut(&mut self) -> &mut O {
        self.parser.observer_mut()
    }

    /// Consumes the dispatcher, returning its observer.
    pub fn into_observer(self) -> O {
        self.parser.into_observer()
    }
}

/// An owned, `'static` mirror of every [`Observer`] callback.
///
/// Useful for forwarding parse events across a channel to a separate task —
/// the async equivalent of the teacher's `AstStream -> Consumer` hop — since
/// [`Observer`]'s own borrowed `dict_key: Option<&[u8]>` only lives for the
/// duration of one callback and cannot itself cross a channel send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserEvent {
    /// See [`Observer::hit_int`].
    HitInt {
        dict_key: Option<Vec<u8>>,
        value: i64,
    },
    /// See [`Observer::hit_str`].
    HitStr {
        dict_key: Option<Vec<u8>>,
        total_len: usize,
        bytes: Vec<u8>,
        len: usize,
    },
    /// See [`Observer::dict_enter`].
    DictEnter { dict_key: Option<Vec<u8>> },
    /// See [`Observer::dict_leave`].
    DictLeave { dict_key: Option<Vec<u8>> },
    /// See [`Observer::list_enter`].
    ListEnter { dict_key: Option<Vec<u8>> },
    /// See [`Observer::list_leave`].
    ListLeave { dict_key: Option<Vec<u8>> },
    /// See [`Observer::list_next`].
    ListNext,
    /// See [`Observer::dict_next`].
    DictNext,
}

#[cfg(feature = "tokio")]
pub mod tokio_impl {
    //! Tokio-based async adapter.

    use super::*;
    use ::tokio::sync::mpsc;

    /// Drains an async byte-chunk source into an [`AsyncDispatcher`],
    /// stopping at the first [`Error`] or when the source closes.
    pub async fn dispatch_stream<O: Observer>(
        dispatcher: &mut AsyncDispatcher<O>,
        mut chunks: mpsc::Receiver<Vec<u8>>,
    ) -> Result<(), Error> {
        while let Some(chunk) = chunks.recv().await {
            dispatcher.feed(&chunk).await?;
        }
        Ok(())
    }

    /// Forwards every parser event to an `mpsc` channel as a [`ParserEvent`].
    ///
    /// [`Observer`]'s callbacks are synchronous and return a plain `bool`,
    /// so a full `Sender::send(...).await` is not available here; a bounded
    /// channel that is momentarily full is
    /// treated the same as a consumer that has hung up — `try_send` failing
    /// requests [`Error::ObserverAbort`] via a `false` return, rather than
    /// blocking the synchronous tokenizer loop on channel capacity. Callers
    /// who need backpressure should size the channel generously or drain it
    /// on a dedicated task.
    impl Observer for mpsc::Sender<ParserEvent> {
        fn hit_int(&mut self, dict_key: Option<&[u8]>, value: i64) -> bool {
            self.try_send(ParserEvent::HitInt {
                dict_key: dict_key.map(<[u8]>::to_vec),
                value,
            })
            .is_ok()
        }

        fn hit_str(
            &mut self,
            dict_key: Option<&[u8]>,
            total_len: usize,
            bytes: &[u8],
            len: usize,
        ) -> bool {
            self.try_send(ParserEvent::HitStr {
                dict_key: dict_key.map(<[u8]>::to_vec),
                total_len,
                bytes: bytes.to_vec(),
                len,
            })
            .is_ok()
        }

        fn dict_enter(&mut self, dict_key: Option<&[u8]>) -> bool {
            self.try_send(ParserEvent::DictEnter {
                dict_key: dict_key.map(<[u8]>::to_vec),
            })
            .is_ok()
        }

        fn dict_leave(&mut self, dict_key: Option<&[u8]>) -> bool {
            self.try_send(ParserEvent::DictLeave {
                dict_key: dict_key.map(<[u8]>::to_vec),
            })
            .is_ok()
        }

        fn list_enter(&mut self, dict_key: Option<&[u8]>) -> bool {
            self.try_send(ParserEvent::ListEnter {
                dict_key: dict_key.map(<[u8]>::to_vec),
            })
            .is_ok()
        }

        fn list_leave(&mut self, dict_key: Option<&[u8]>) -> bool {
            self.try_send(ParserEvent::ListLeave {
                dict_key: dict_key.map(<[u8]>::to_vec),
            })
            .is_ok()
        }

        fn list_next(&mut self) -> bool {
            self.try_send(ParserEvent::ListNext).is_ok()
        }

        fn dict_next(&mut self) -> bool {
            self.try_send(ParserEvent::DictNext).is_ok()
        }
    }
}

#[cfg(feature = "futures")]
pub mod futures_impl {
    //! Runtime-agnostic adapter over any [`futures_core::Stream`].

    use super::*;
    use core::future::poll_fn;
    use core::pin::Pin;
    use futures_core::Stream;

    /// Drains an async byte-chunk [`Stream`] into an [`AsyncDispatcher`],
    /// stopping at the first [`Error`] or when the stream ends.
    ///
    /// Built directly on `Stream::poll_next` (via `core::future::poll_fn`)
    /// rather than a `StreamExt::next()` combinator, since this crate's
    /// `futures` feature depends only on `futures-core`, not `futures-util`
    /// (matching the teacher's own minimal `futures-core`-only dependency).
    pub async fn dispatch_stream<O, S>(
        dispatcher: &mut AsyncDispatcher<O>,
        mut chunks: S,
    ) -> Result<(), Error>
    where
        O: Observer,
        S: Stream<Item = Vec<u8>> + Unpin,
    {
        loop {
            let next = poll_fn(|cx| Pin::new(&mut chunks).poll_next(cx)).await;
            match next {
                Some(chunk) => dispatcher.feed(&chunk).await?,
                None => return Ok(()),
            }
        }
    }
}

#[cfg(all(test, feature = "tokio"))]
mod tokio_tests {
    use super::tokio_impl::dispatch_stream;
    use super::*;
    use crate::Parser;
    use ::tokio::sync::mpsc;

    #[derive(Default)]
    struct Counter {
        ints: u32,
        strs: u32,
    }

    impl Observer for Counter {
        fn hit_int(&mut self, _dict_key: Option<&[u8]>, _value: i64) -> bool {
            self.ints += 1;
            true
        }
        fn hit_str(&mut self, _dict_key: Option<&[u8]>, _total_len: usize, _bytes: &[u8], _len: usize) -> bool {
            self.strs += 1;
            true
        }
    }

    #[tokio::test]
    async fn feed_across_multiple_chunks() {
        let mut dispatcher = AsyncDispatcher::with_depth(4, Counter::default()).unwrap();
        dispatcher.feed(b"d3:key").await.unwrap();
        dispatcher.feed(b"i1e").await.unwrap();
        dispatcher.feed(b"e").await.unwrap();
        assert_eq!(dispatcher.observer().ints, 1);
    }

    #[tokio::test]
    async fn dispatch_stream_drains_channel_source() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(b"i123e".to_vec()).await.unwrap();
        drop(tx);

        let mut dispatcher = AsyncDispatcher::with_depth(2, Counter::default()).unwrap();
        dispatch_stream(&mut dispatcher, rx).await.unwrap();
        assert_eq!(dispatcher.observer().ints, 1);
    }

    #[tokio::test]
    async fn parser_event_channel_receives_forwarded_events() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut parser = Parser::with_depth(4, tx).unwrap();
        parser.dispatch(b"d3:keyi1ee").unwrap();
        drop(parser);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                ParserEvent::DictEnter { dict_key: None },
                ParserEvent::HitInt {
                    dict_key: Some(b"key".to_vec()),
                    value: 1
                },
                ParserEvent::DictNext,
                ParserEvent::DictLeave { dict_key: None },
            ]
        );
    }
}
