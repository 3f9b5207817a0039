#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]
#![cfg_attr(not(any(test, feature = "fuzz")), forbid(unsafe_code))]

//! An incremental, push-style SAX parser for bencoded data.
//!
//! This crate is the engine only: a [`Parser`] drives a byte-at-a-time
//! tokenizer over a fixed-capacity stack of frames, reporting structural
//! events to a caller-supplied [`Observer`]. It never builds a value tree
//! itself — see the `bencode` crate's `Value`/`ValueBuilder` for that, built
//! entirely on top of the `Observer` contract defined here.

pub mod config;
mod error;
mod frame;
mod frame_stack;
mod observer;
mod parser;
mod tokenizer;

#[cfg(any(feature = "tokio", feature = "futures"))]
pub mod async_stream;

pub use config::ParseConfig;
pub use error::Error;
pub use frame::TokenKind;
pub use observer::Observer;
pub use parser::Parser;
