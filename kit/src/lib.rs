#![deny(
    unsafe_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

//! The ergonomic public surface over `bencode-core`.
//!
//! `bencode-core` is a SAX-style engine only: it never builds a value tree.
//! This crate re-exports that engine and adds the one thing almost every
//! real caller wants on top of it — an owned [`Value`] tree, built by
//! [`ValueBuilder`] entirely on the public [`Observer`] contract, no extra
//! hooks into the tokenizer.

pub use bencode_core::*;

mod value;

pub use value::{decode, encode, Value, ValueBuilder};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_scenario_6_dict_with_list_value() {
        let value = decode(b"d3:keyl4:test3:fooe4:testi999ee").unwrap();
        let dict = value.as_dict().unwrap();
        assert_eq!(
            dict.get(b"key".as_slice()).unwrap().as_list().unwrap(),
            &[Value::Str(b"test".to_vec()), Value::Str(b"foo".to_vec())]
        );
        assert_eq!(dict.get(b"test".as_slice()).unwrap(), &Value::Int(999));
    }

    #[test]
    fn round_trips_through_encode() {
        let original = decode(b"d8:intervali1800e5:peers0:e").unwrap();
        let re_encoded = encode(&original);
        let reparsed = decode(&re_encoded).unwrap();
        assert_eq!(original, reparsed);
    }
}
