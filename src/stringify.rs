use std::fmt::{Display, Formatter};

use crate::value::{TypedArray, Value};


/// Serializes `value` to compact JSON text. Never fails.
///
/// String contents are written as-is; embedded quotes are not escaped. A
/// string holding a `"`, or ending in an odd run of backslashes, therefore
/// produces text that does not parse back.
pub fn stringify(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => {
            out.push('{');
            for (key, item) in map {
                out.push('"');
                out.push_str(key);
                out.push_str("\":");
                write_value(out, item);
                out.push(',');
            }
            if !map.is_empty() {
                out.pop();
            }
            out.push('}');
        }
        Value::Array(values) => {
            out.push('[');
            for item in values {
                write_value(out, item);
                out.push(',');
            }
            if !values.is_empty() {
                out.pop();
            }
            out.push(']');
        }
        Value::Typed(typed) => write_typed(out, typed),
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::I8(n) => push_integer(out, n),
        Value::I16(n) => push_integer(out, n),
        Value::I32(n) => push_integer(out, n),
        Value::I64(n) => push_integer(out, n),
        Value::U8(n) => push_integer(out, n),
        Value::U16(n) => push_integer(out, n),
        Value::U32(n) => push_integer(out, n),
        Value::U64(n) => push_integer(out, n),
        Value::F32(f) => push_float(out, f.to_string(), f.is_finite()),
        Value::F64(f) => push_float(out, f.to_string(), f.is_finite()),
        Value::String(s) => push_quoted(out, s),
    }
}

fn push_integer<T: ToString>(out: &mut String, n: &T) {
    out.push_str(&n.to_string());
}

// Float text always carries a '.' so it reads back as a float. Non-finite
// values have no JSON spelling and become null.
fn push_float(out: &mut String, text: String, finite: bool) {
    if !finite {
        out.push_str("null");
        return
    }
    out.push_str(&text);
    if !text.contains('.') {
        out.push_str(".0");
    }
}

fn push_quoted(out: &mut String, s: &str) {
    out.push('"');
    out.push_str(s);
    out.push('"');
}

fn push_list<T>(out: &mut String, items: &[T], mut push_item: impl FnMut(&mut String, &T)) {
    out.push('[');
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        push_item(out, item);
    }
    out.push(']');
}

fn write_typed(out: &mut String, typed: &TypedArray) {
    match typed {
        // quoted on purpose, unlike a scalar bool
        TypedArray::Bool(v) => push_list(out, v, |o, b| push_quoted(o, if *b { "true" } else { "false" })),
        TypedArray::I8(v) => push_list(out, v, push_integer),
        TypedArray::I16(v) => push_list(out, v, push_integer),
        TypedArray::I32(v) => push_list(out, v, push_integer),
        TypedArray::I64(v) => push_list(out, v, push_integer),
        TypedArray::U8(v) => push_list(out, v, push_integer),
        TypedArray::U16(v) => push_list(out, v, push_integer),
        TypedArray::U32(v) => push_list(out, v, push_integer),
        TypedArray::U64(v) => push_list(out, v, push_integer),
        TypedArray::F32(v) => push_list(out, v, |o, f| push_float(o, f.to_string(), f.is_finite())),
        TypedArray::F64(v) => push_list(out, v, |o, f| push_float(o, f.to_string(), f.is_finite())),
        TypedArray::String(v) => push_list(out, v, |o, s| push_quoted(o, s)),
    }
}


impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", stringify(self))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{from_str, ParsingError};
    use crate::value::Map;

    fn obj(pairs: Vec<(&str, Value)>) -> Value {
        Value::Object(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    // Parsed values come back widened to I64/U64/F64 and typed arrays come
    // back heterogeneous, so compare through the numeric accessors.
    fn same(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Object(x), Value::Object(y)) => {
                x.len() == y.len() && x.iter().zip(y.iter()).all(|((ka, va), (kb, vb))| ka == kb && same(va, vb))
            }
            (Value::Array(x), Value::Array(y)) => x.len() == y.len() && x.iter().zip(y).all(|(va, vb)| same(va, vb)),
            (Value::Typed(t), other) | (other, Value::Typed(t)) => same(&Value::Array(t.to_values()), other),
            (x, y) if x.is_integer() && y.is_integer() => x.as_i64() == y.as_i64() && x.as_u64() == y.as_u64(),
            (x, y) if x.is_number() && y.is_number() => x.as_f64() == y.as_f64(),
            (x, y) => x == y,
        }
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(stringify(&Value::Object(Map::new())), "{}");
        assert_eq!(stringify(&Value::Array(vec![])), "[]");
        assert_eq!(stringify(&Value::from(Vec::<i32>::new())), "[]");
    }

    #[test]
    fn test_scalars() {
        assert_eq!(stringify(&Value::Null), "null");
        assert_eq!(stringify(&Value::Bool(true)), "true");
        assert_eq!(stringify(&Value::Bool(false)), "false");
        assert_eq!(stringify(&Value::I8(-128)), "-128");
        assert_eq!(stringify(&Value::U16(65535)), "65535");
        assert_eq!(stringify(&Value::I64(i64::MIN)), "-9223372036854775808");
        assert_eq!(stringify(&Value::U64(u64::MAX)), "18446744073709551615");
        assert_eq!(stringify(&Value::F64(1.5)), "1.5");
        assert_eq!(stringify(&Value::F64(2.0)), "2.0");
        assert_eq!(stringify(&Value::F32(0.25)), "0.25");
        assert_eq!(stringify(&Value::F64(f64::NAN)), "null");
        assert_eq!(stringify(&Value::F32(f32::INFINITY)), "null");
        assert_eq!(stringify(&Value::from("hi")), "\"hi\"");
    }

    #[test]
    fn test_string_is_not_escaped() {
        assert_eq!(stringify(&Value::from("a\"b")), "\"a\"b\"");
    }

    #[test]
    fn test_object_order() {
        let v = obj(vec![("b", Value::I64(2)), ("a", Value::I64(1)), ("c", Value::Array(vec![]))]);
        assert_eq!(stringify(&v), "{\"b\":2,\"a\":1,\"c\":[]}");
    }

    #[test]
    fn test_nested() {
        let v = obj(vec![("x", obj(vec![("y", Value::I64(1))])), ("z", obj(vec![]))]);
        assert_eq!(stringify(&v), "{\"x\":{\"y\":1},\"z\":{}}");
        assert_eq!(v.to_string(), "{\"x\":{\"y\":1},\"z\":{}}");
    }

    #[test]
    fn test_typed_bool_array_is_quoted() {
        assert_eq!(stringify(&Value::from(vec![true, false])), "[\"true\",\"false\"]");
        assert_eq!(stringify(&Value::Array(vec![Value::Bool(true), Value::Bool(false)])), "[true,false]");
    }

    #[test]
    fn test_typed_fast_path_matches_generic_path() {
        let cases: Vec<TypedArray> = vec![
            TypedArray::from(vec![1i8, -2, 3]),
            TypedArray::from(vec![300i16, -300]),
            TypedArray::from(vec![i32::MIN, 0, i32::MAX]),
            TypedArray::from(vec![i64::MIN, 1]),
            TypedArray::from(vec![0u8, 255]),
            TypedArray::from(vec![1u16]),
            TypedArray::from(vec![u32::MAX, 7]),
            TypedArray::from(vec![u64::MAX]),
            TypedArray::from(vec![0.5f32, 2.0, f32::NAN]),
            TypedArray::from(vec![1.25f64, -3.0, 1e21]),
            TypedArray::from(vec!["a".to_string(), "b c".to_string()]),
        ];
        for typed in cases {
            let fast = stringify(&Value::Typed(typed.clone()));
            let generic = stringify(&Value::Array(typed.to_values()));
            assert_eq!(fast, generic);
        }
    }

    #[test]
    fn test_round_trip() {
        let mut inner = Map::new();
        inner.insert("y".to_string(), Value::I32(-4));
        inner.insert("s".to_string(), Value::from("text with spaces"));
        let samples = vec![
            Value::Null,
            Value::Bool(true),
            Value::U8(9),
            Value::I64(-12),
            Value::F64(0.125),
            Value::F64(3.0),
            Value::from("word"),
            Value::Object(Map::new()),
            Value::Array(vec![]),
            obj(vec![("x", Value::Object(inner)), ("n", Value::Null), ("b", Value::Bool(false))]),
            Value::Array(vec![Value::I16(1), Value::from("two"), Value::F32(3.5), Value::Array(vec![Value::U64(u64::MAX)])]),
            Value::from(vec![1u32, 2, 3]),
            Value::from(vec![0.5f64, 1.0]),
            Value::from(vec!["p", "q"]),
        ];
        for v in samples {
            let text = stringify(&v);
            let back = from_str(&text).unwrap();
            assert!(same(&v, &back), "{:?} came back as {:?} via {}", v, back, text);
        }
    }

    #[test]
    fn test_typed_bool_round_trip_gap() {
        let back = from_str(&stringify(&Value::from(vec![true, false]))).unwrap();
        assert_eq!(back, Value::Array(vec![Value::from("true"), Value::from("false")]));
    }

    #[test]
    fn test_trailing_backslash_round_trip_gap() {
        let text = stringify(&Value::from("C:\\dir\\"));
        assert_eq!(text, r#""C:\dir\""#);
        assert_eq!(from_str(&text), Err(ParsingError::Malformed));

        let in_array = Value::Array(vec![Value::from("a\\"), Value::I64(1)]);
        assert_eq!(from_str(&stringify(&in_array)), Err(ParsingError::Malformed));

        let in_key = obj(vec![("k\\", Value::I64(1))]);
        assert_eq!(from_str(&stringify(&in_key)), Err(ParsingError::Malformed));
    }

    #[test]
    fn test_even_trailing_backslashes_round_trip() {
        let v = Value::Array(vec![Value::from("a\\\\"), Value::from("b\\c")]);
        assert_eq!(from_str(&stringify(&v)).unwrap(), v);
    }

    #[test]
    fn test_reparse_reproduces_nested_text() {
        let text = "{\"x\":{\"y\":1}}";
        assert_eq!(stringify(&from_str(text).unwrap()), text);
    }
}
