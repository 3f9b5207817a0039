#![no_main]

use arbitrary::Arbitrary;
use bencode::{Observer, Parser};
use libfuzzer_sys::fuzz_target;

/// Arbitrary bytes plus a list of split "weights", turned into actual split
/// points modulo however much of `data` remains at each step.
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    data: Vec<u8>,
    split_weights: Vec<u8>,
}

#[derive(Default)]
struct Recorder(Vec<String>);

impl Observer for Recorder {
    fn hit_int(&mut self, dict_key: Option<&[u8]>, value: i64) -> bool {
        self.0.push(format!("I{:?}{}", dict_key, value));
        true
    }

    fn hit_str(&mut self, dict_key: Option<&[u8]>, total_len: usize, bytes: &[u8], len: usize) -> bool {
        self.0
            .push(format!("S{:?}{}{:?}{}", dict_key, total_len, bytes, len));
        true
    }

    fn dict_enter(&mut self, dict_key: Option<&[u8]>) -> bool {
        self.0.push(format!("DE{:?}", dict_key));
        true
    }

    fn dict_leave(&mut self, dict_key: Option<&[u8]>) -> bool {
        self.0.push(format!("DL{:?}", dict_key));
        true
    }

    fn list_enter(&mut self, dict_key: Option<&[u8]>) -> bool {
        self.0.push(format!("LE{:?}", dict_key));
        true
    }

    fn list_leave(&mut self, dict_key: Option<&[u8]>) -> bool {
        self.0.push(format!("LL{:?}", dict_key));
        true
    }

    fn list_next(&mut self) -> bool {
        self.0.push("LN".to_string());
        true
    }

    fn dict_next(&mut self) -> bool {
        self.0.push("DN".to_string());
        true
    }
}

/// Depth generous enough that `DepthExceeded` on deeply-nested fuzz inputs
/// doesn't drown out genuine chunk-boundary bugs.
const FUZZ_DEPTH: usize = 48;

fn events_whole(data: &[u8]) -> Option<Vec<String>> {
    let mut parser = Parser::with_depth(FUZZ_DEPTH, Recorder::default()).ok()?;
    parser.dispatch(data).ok()?;
    Some(parser.into_observer().0)
}

/// Splits `data` at points derived from `split_weights` (each weight taken
/// modulo the bytes remaining, so any weight sequence produces valid,
/// in-bounds splits) and dispatches one chunk per split.
fn events_chunked(data: &[u8], split_weights: &[u8]) -> Option<Vec<String>> {
    let mut parser = Parser::with_depth(FUZZ_DEPTH, Recorder::default()).ok()?;
    let mut offset = 0;
    for &weight in split_weights {
        if offset >= data.len() {
            break;
        }
        let remaining = data.len() - offset;
        let take = (weight as usize % remaining) + 1;
        parser.dispatch(&data[offset..offset + take]).ok()?;
        offset += take;
    }
    if offset < data.len() {
        parser.dispatch(&data[offset..]).ok()?;
    }
    Some(parser.into_observer().0)
}

fuzz_target!(|input: FuzzInput| {
    let Some(whole) = events_whole(&input.data) else {
        return;
    };
    let Some(chunked) = events_chunked(&input.data, &input.split_weights) else {
        return;
    };
    assert_eq!(whole, chunked, "chunk boundary changed the emitted event stream");
});
