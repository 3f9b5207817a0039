//! An owned value tree, built entirely on top of [`bencode_core::Observer`].
//!
//! `bencode-core` never materializes a value tree itself; [`ValueBuilder`] is
//! the DOM-building collaborator that closes that gap, since real consumers
//! of a bencode crate expect *some* path to an owned tree.

use bencode_core::{Error, Observer, ParseConfig, Parser};

/// A decoded bencode value.
///
/// Dictionary entries are kept as an insertion-ordered `Vec`, not a
/// `BTreeMap`: a torrent's `info` dict hash depends on its bytes re-encoding
/// identically, so key order must be preserved losslessly rather than
/// normalized away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A bencode integer (`i<digits>e`).
    Int(i64),
    /// A bencode byte string. Opaque bytes, not necessarily valid UTF-8.
    Str(Vec<u8>),
    /// A bencode list (`l...e`).
    List(Vec<Value>),
    /// A bencode dictionary (`d...e`), entries in encounter order.
    Dict(Vec<(Vec<u8>, Value)>),
}

impl Value {
    /// The integer value, if this is [`Value::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The byte-string value, if this is [`Value::Str`].
    pub fn as_str_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Str(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// The list elements, if this is [`Value::List`].
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// The dictionary entries, if this is [`Value::Dict`].
    pub fn as_dict(&self) -> Option<Dict<'_>> {
        match self {
            Value::Dict(entries) => Some(Dict(entries)),
            _ => None,
        }
    }
}

/// A borrowing view over a [`Value::Dict`]'s entries.
///
/// Lookup is linear (entries are a `Vec`, not a map) — appropriate for the
/// handful of top-level keys a torrent metainfo or tracker response dict
/// actually has; callers needing faster repeated lookup on large dicts can
/// build their own index from `.iter()`.
#[derive(Debug, Clone, Copy)]
pub struct Dict<'a>(&'a [(Vec<u8>, Value)]);

impl<'a> Dict<'a> {
    /// Looks up a value by its exact key bytes.
    pub fn get(&self, key: &[u8]) -> Option<&'a Value> {
        self.0
            .iter()
            .find(|(k, _)| k.as_slice() == key)
            .map(|(_, v)| v)
    }

    /// Iterates entries in their original encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a [u8], &'a Value)> {
        self.0.iter().map(|(k, v)| (k.as_slice(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this dict has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A container in progress, one per currently-open `l`/`d` nesting level.
///
/// Mirrors the core engine's own frame-stack discipline one level up: here
/// in the observer, rather than in the tokenizer, which has no notion of a
/// value tree at all.
enum Container {
    List(Vec<Value>),
    Dict(Vec<(Vec<u8>, Value)>),
}

/// An [`Observer`] that assembles a [`Value`] tree from the events the
/// tokenizer raises.
///
/// `ValueBuilder::parse` is the one-shot convenience entry point most
/// callers reach for first; `into_value` is exposed for streaming use where
/// the caller drives a [`Parser`] itself across several `dispatch` calls.
#[derive(Default)]
pub struct ValueBuilder {
    stack: Vec<Container>,
    result: Option<Value>,
}

impl ValueBuilder {
    /// Creates an empty builder, ready to be driven by a [`Parser`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a complete, single bencode value from `bytes` in one call.
    ///
    /// Uses a frame-stack depth of 64, generous for real-world torrent
    /// metainfo and tracker responses; callers expecting deeper nesting
    /// should drive a [`Parser`] with a larger [`ParseConfig`] directly.
    pub fn parse(bytes: &[u8]) -> Result<Value, Error> {
        let mut parser = Parser::new(ParseConfig::new(64), ValueBuilder::new())?;
        parser.dispatch(bytes)?;
        parser
            .into_observer()
            .into_value()
            .ok_or(Error::UnexpectedByte {
                byte: 0,
                state: "EOF",
                offset: bytes.len(),
            })
    }

    /// Consumes the builder, returning the completed top-level value, or
    /// `None` if the parse never reached a complete top-level value (e.g.
    /// the input ended mid-container, or no bytes were dispatched at all).
    pub fn into_value(self) -> Option<Value> {
        self.result
    }

    /// Attaches a just-completed value (scalar or container) to whatever is
    /// enclosing it: pushed onto the parent list, inserted under `key` into
    /// the parent dict, or — if nothing is open — recorded as the top-level
    /// result.
    ///
    /// `key` is `None` for a list element or the top-level value, `Some` for
    /// a dict value. A dict value event is always preceded by its key copy
    /// completing, so `key` is always `Some` here when the parent is a dict.
    fn attach(&mut self, key: Option<&[u8]>, value: Value) {
        match self.stack.last_mut() {
            Some(Container::List(items)) => items.push(value),
            Some(Container::Dict(entries)) => {
                if let Some(key) = key {
                    entries.push((key.to_vec(), value));
                }
            }
            None => self.result = Some(value),
        }
    }
}

impl Observer for ValueBuilder {
    fn hit_int(&mut self, dict_key: Option<&[u8]>, value: i64) -> bool {
        self.attach(dict_key, Value::Int(value));
        true
    }

    fn hit_str(&mut self, dict_key: Option<&[u8]>, _total_len: usize, bytes: &[u8], _len: usize) -> bool {
        self.attach(dict_key, Value::Str(bytes.to_vec()));
        true
    }

    fn dict_enter(&mut self, _dict_key: Option<&[u8]>) -> bool {
        self.stack.push(Container::Dict(Vec::new()));
        true
    }

    fn dict_leave(&mut self, dict_key: Option<&[u8]>) -> bool {
        match self.stack.pop() {
            Some(Container::Dict(entries)) => {
                self.attach(dict_key, Value::Dict(entries));
                true
            }
            _ => false,
        }
    }

    fn list_enter(&mut self, _dict_key: Option<&[u8]>) -> bool {
        self.stack.push(Container::List(Vec::new()));
        true
    }

    fn list_leave(&mut self, dict_key: Option<&[u8]>) -> bool {
        match self.stack.pop() {
            Some(Container::List(items)) => {
                self.attach(dict_key, Value::List(items));
                true
            }
            _ => false,
        }
    }
}

/// Decodes a single complete bencode value from `bytes`.
///
/// Convenience wrapper over [`ValueBuilder::parse`] for callers who have the
/// whole input in memory already and don't need incremental dispatch.
pub fn decode(bytes: &[u8]) -> Result<Value, Error> {
    ValueBuilder::parse(bytes)
}

/// Encodes a [`Value`] back to its bencode byte representation.
///
/// Bencoding is symmetric by definition, and this is the natural counterpart
/// any consumer of a decoded [`Value`] expects. It operates purely on the
/// DOM type; it never touches the frame/tokenizer engine.
///
/// Dict entries are written in the order they appear in the [`Value::Dict`]
/// — this function does not sort keys; sorting is a validation callers may
/// layer on top, not something this crate imposes.
pub fn encode(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(value, &mut out);
    out
}

fn encode_into(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Int(v) => {
            out.push(b'i');
            out.extend_from_slice(v.to_string().as_bytes());
            out.push(b'e');
        }
        Value::Str(bytes) => {
            out.extend_from_slice(bytes.len().to_string().as_bytes());
            out.push(b':');
            out.extend_from_slice(bytes);
        }
        Value::List(items) => {
            out.push(b'l');
            for item in items {
                encode_into(item, out);
            }
            out.push(b'e');
        }
        Value::Dict(entries) => {
            out.push(b'd');
            for (key, val) in entries {
                out.extend_from_slice(key.len().to_string().as_bytes());
                out.push(b':');
                out.extend_from_slice(key);
                encode_into(val, out);
            }
            out.push(b'e');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_1_integer() {
        assert_eq!(decode(b"i123e").unwrap(), Value::Int(123));
    }

    #[test]
    fn scenario_4_string_with_colon() {
        assert_eq!(
            decode(b"13:flying:animal").unwrap(),
            Value::Str(b"flying:animal".to_vec())
        );
    }

    #[test]
    fn scenario_5_nested_list() {
        assert_eq!(
            decode(b"ll3:fooee").unwrap(),
            Value::List(vec![Value::List(vec![Value::Str(b"foo".to_vec())])])
        );
    }

    #[test]
    fn scenario_7_empty_string_value() {
        let value = decode(b"d8:intervali1800e5:peers0:e").unwrap();
        let dict = value.as_dict().unwrap();
        assert_eq!(dict.get(b"interval").unwrap().as_int(), Some(1800));
        assert_eq!(dict.get(b"peers").unwrap().as_str_bytes(), Some(&[][..]));
    }

    #[test]
    fn dict_preserves_insertion_order_not_sorted() {
        let value = decode(b"d1:zi1e1:ai2ee").unwrap();
        let Value::Dict(entries) = value else {
            unreachable!("expected a dict")
        };
        assert_eq!(entries[0].0, b"z");
        assert_eq!(entries[1].0, b"a");
    }

    #[test]
    fn encode_round_trips_nested_structure() {
        let value = Value::Dict(vec![
            (b"key".to_vec(), Value::List(vec![Value::Str(b"test".to_vec()), Value::Str(b"foo".to_vec())])),
            (b"test".to_vec(), Value::Int(999)),
        ]);
        assert_eq!(encode(&value), b"d3:keyl4:test3:fooe4:testi999ee".to_vec());
    }

    #[test]
    fn decode_rejects_insufficient_depth_input_gracefully() {
        assert!(decode(b"4:").is_err());
    }

    #[test]
    fn decode_incomplete_input_yields_error_not_panic() {
        assert!(decode(b"d3:key").is_err());
    }
}
