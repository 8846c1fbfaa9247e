#![no_main]

use libfuzzer_sys::fuzz_target;
use tagged_json::{from_bytes, parse, stringify, TypedArray, Value};

// Strings are written unescaped, so a quote or an odd run of trailing
// backslashes breaks the closing quote on the way back in.
fn writes_cleanly(s: &str) -> bool {
    let trailing = s.bytes().rev().take_while(|b| *b == b'\\').count();
    !s.contains('"') && trailing % 2 == 0
}

fn round_trips(value: &Value) -> bool {
    match value {
        Value::String(s) => writes_cleanly(s),
        Value::Object(map) => map.iter().all(|(k, v)| writes_cleanly(k) && round_trips(v)),
        Value::Array(values) => values.iter().all(round_trips),
        Value::Typed(TypedArray::String(values)) => values.iter().all(|s| writes_cleanly(s)),
        _ => true,
    }
}

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = from_bytes(data) {
        let text = stringify(&value);
        let reparsed = parse(&text);
        if round_trips(&value) {
            assert!(reparsed.is_ok(), "{:?} stringified to {:?} which failed to parse", value, text);
        }
    }
});
