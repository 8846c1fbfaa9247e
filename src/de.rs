use serde::de::{self, DeserializeSeed, Deserialize, Deserializer, IntoDeserializer, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde::forward_to_deserialize_any;
use std::fmt;
use crate::parser::from_str as model_from_str;
use crate::ser::SerdeJSONError;
use crate::value::{Map, TypedArray, Value};


impl de::Error for SerdeJSONError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        SerdeJSONError::Custom(msg.to_string())
    }
}


impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i8<E>(self, v: i8) -> Result<Value, E> {
        Ok(Value::I8(v))
    }

    fn visit_i16<E>(self, v: i16) -> Result<Value, E> {
        Ok(Value::I16(v))
    }

    fn visit_i32<E>(self, v: i32) -> Result<Value, E> {
        Ok(Value::I32(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::I64(v))
    }

    fn visit_u8<E>(self, v: u8) -> Result<Value, E> {
        Ok(Value::U8(v))
    }

    fn visit_u16<E>(self, v: u16) -> Result<Value, E> {
        Ok(Value::U16(v))
    }

    fn visit_u32<E>(self, v: u32) -> Result<Value, E> {
        Ok(Value::U32(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
        Ok(Value::U64(v))
    }

    fn visit_f32<E>(self, v: f32) -> Result<Value, E> {
        Ok(Value::F32(v))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
        Ok(Value::F64(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_bytes<E>(self, v: &[u8]) -> Result<Value, E> {
        Ok(Value::Typed(TypedArray::U8(v.to_vec())))
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(v) = seq.next_element()? {
            values.push(v);
        }
        Ok(Value::Array(values))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = Map::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((k, v)) = access.next_entry::<String, Value>()? {
            map.insert(k, v);
        }
        Ok(Value::Object(map))
    }
}


/// Wraps a borrowed [Value] and implements `serde::Deserializer`.
pub struct ValueDeserializer<'a> {
    input: &'a Value,
}

impl<'a> ValueDeserializer<'a> {
    pub fn new(input: &'a Value) -> Self {
        ValueDeserializer { input }
    }
}


impl<'de, 'a> Deserializer<'de> for ValueDeserializer<'a> {
    type Error = SerdeJSONError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.input {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(*b),
            Value::I8(n) => visitor.visit_i8(*n),
            Value::I16(n) => visitor.visit_i16(*n),
            Value::I32(n) => visitor.visit_i32(*n),
            Value::I64(n) => visitor.visit_i64(*n),
            Value::U8(n) => visitor.visit_u8(*n),
            Value::U16(n) => visitor.visit_u16(*n),
            Value::U32(n) => visitor.visit_u32(*n),
            Value::U64(n) => visitor.visit_u64(*n),
            Value::F32(n) => visitor.visit_f32(*n),
            Value::F64(n) => visitor.visit_f64(*n),
            Value::String(s) => visitor.visit_str(s),
            Value::Object(map) => {
                let mut map_deserializer = ObjectAccess {
                    iter: map.iter(),
                    value: None,
                };
                visitor.visit_map(&mut map_deserializer)
            }
            Value::Array(values) => {
                let mut seq_deserializer = ArrayAccess {
                    values,
                    index: 0,
                };
                visitor.visit_seq(&mut seq_deserializer)
            }
            Value::Typed(typed) => {
                let mut seq_deserializer = TypedAccess {
                    typed,
                    index: 0,
                };
                visitor.visit_seq(&mut seq_deserializer)
            }
        }
    }

    // Typed bool arrays are written as quoted tokens and read back as strings.
    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.input {
            Value::String(s) if s == "true" => visitor.visit_bool(true),
            Value::String(s) if s == "false" => visitor.visit_bool(false),
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.input {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if let Value::Null = self.input {
            visitor.visit_unit()
        } else {
            self.deserialize_any(visitor)
        }
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.input {
            Value::String(variant) => {
                visitor.visit_enum(variant.as_str().into_deserializer())
            }
            Value::Object(map) if map.len() == 1 => {
                match map.iter().next() {
                    Some((variant, content)) => visitor.visit_enum(EnumDeserializer { variant, content }),
                    None => Err(de::Error::custom("Invalid enum representation")),
                }
            }
            other => Err(de::Error::custom(format!("Unsupported enum representation: {}", other.type_name()))),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf seq tuple tuple_struct map struct identifier
    }
}

struct ArrayAccess<'a> {
    values: &'a [Value],
    index: usize,
}

impl<'de, 'a> SeqAccess<'de> for ArrayAccess<'a> {
    type Error = SerdeJSONError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, SerdeJSONError>
    where
        T: DeserializeSeed<'de>,
    {
        if self.index < self.values.len() {
            let deserializer = ValueDeserializer {
                input: &self.values[self.index],
            };
            self.index += 1;
            seed.deserialize(deserializer).map(Some)
        } else {
            Ok(None)
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.values.len() - self.index)
    }
}

struct TypedAccess<'a> {
    typed: &'a TypedArray,
    index: usize,
}

impl<'de, 'a> SeqAccess<'de> for TypedAccess<'a> {
    type Error = SerdeJSONError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, SerdeJSONError>
    where
        T: DeserializeSeed<'de>,
    {
        match self.typed.get(self.index) {
            Some(element) => {
                self.index += 1;
                seed.deserialize(ValueDeserializer { input: &element }).map(Some)
            }
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.typed.len() - self.index)
    }
}

struct ObjectAccess<'a> {
    iter: indexmap::map::Iter<'a, String, Value>,
    value: Option<&'a Value>,
}

impl<'de, 'a> MapAccess<'de> for ObjectAccess<'a> {
    type Error = SerdeJSONError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, SerdeJSONError>
    where
        K: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(MapKeyDeserializer { key }).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, SerdeJSONError>
    where
        V: DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(input) => seed.deserialize(ValueDeserializer { input }),
            None => Err(de::Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}


/// Object keys are always text; numeric and boolean targets parse it.
struct MapKeyDeserializer<'a> {
    key: &'a str,
}

macro_rules! deserialize_parsed_key {
    ($($method:ident => $visit:ident: $t:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, Self::Error>
            where
                V: Visitor<'de>,
            {
                match self.key.parse::<$t>() {
                    Ok(parsed) => visitor.$visit(parsed),
                    Err(_) => visitor.visit_str(self.key),
                }
            }
        )*
    };
}

impl<'de, 'a> Deserializer<'de> for MapKeyDeserializer<'a> {
    type Error = SerdeJSONError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_str(self.key)
    }

    deserialize_parsed_key! {
        deserialize_bool => visit_bool: bool,
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_enum(self.key.into_deserializer())
    }

    forward_to_deserialize_any! {
        i128 u128 char str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}


struct EnumDeserializer<'a> {
    variant: &'a str,
    content: &'a Value,
}

impl<'de, 'a> de::EnumAccess<'de> for EnumDeserializer<'a> {
    type Error = SerdeJSONError;
    type Variant = ValueDeserializer<'a>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant), SerdeJSONError>
    where
        V: DeserializeSeed<'de>,
    {
        let variant: de::value::StrDeserializer<'_, SerdeJSONError> = self.variant.into_deserializer();
        let val = seed.deserialize(variant)?;
        Ok((val, ValueDeserializer { input: self.content }))
    }
}

impl<'de, 'a> VariantAccess<'de> for ValueDeserializer<'a> {
    type Error = SerdeJSONError;

    fn unit_variant(self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, Self::Error>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self)
    }

    fn tuple_variant<V>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }
}

/// Deserializes a `T` out of an already-built [Value].
pub fn from_value<'de, T>(value: &Value) -> Result<T, SerdeJSONError>
where
    T: Deserialize<'de>,
{
    T::deserialize(ValueDeserializer::new(value))
}

/// Parses JSON text and deserializes the result into `T`.
pub fn from_str<'de, T>(s: &str) -> Result<T, SerdeJSONError>
where
    T: Deserialize<'de>,
{
    let parsed = model_from_str(s)?;
    from_value(&parsed)
}

#[cfg(test)]
mod test {
    use std::collections::{BTreeMap, HashMap};
    use serde::{Deserialize, Serialize};
    use crate::ser::{to_string, to_value};
    use crate::parser::ParsingError;
    use super::*;

    #[derive(Debug, PartialEq, Deserialize, Serialize)]
    struct MyData {
        name: String,
        count: i64,
        maybe: Option<f64>,
    }

    #[derive(Debug, PartialEq, Deserialize, Serialize)]
    enum Command {
        Stop,
        Move { x: i32, y: i32 },
        Say(String),
        Pair(u8, u8),
    }

    #[test]
    fn test_struct() {
        let source = r#"{ "name": "Hello", "count": 42, "maybe": 0.5 }"#;
        let data: MyData = from_str(source).unwrap();
        assert_eq!(data, MyData { name: "Hello".to_string(), count: 42, maybe: Some(0.5) });
    }

    #[test]
    fn test_option_null() {
        let data: MyData = from_str(r#"{"name":"x","count":-1,"maybe":null}"#).unwrap();
        assert_eq!(data.maybe, None);
    }

    #[test]
    fn test_integer_feeds_float_field() {
        let data: MyData = from_str(r#"{"name":"x","count":1,"maybe":3}"#).unwrap();
        assert_eq!(data.maybe, Some(3.0));
    }

    #[test]
    fn test_hashmap() {
        let res: HashMap<String, Option<String>> = from_str(r#"{"name":"Hello","count":"42","maybe":null}"#).unwrap();
        let expected = HashMap::from([
            (String::from("name"), Some(String::from("Hello"))),
            (String::from("count"), Some(String::from("42"))),
            (String::from("maybe"), None),
        ]);
        assert_eq!(res, expected)
    }

    #[test]
    fn test_numeric_keys() {
        let res: BTreeMap<u32, bool> = from_str(r#"{"1":true,"20":false}"#).unwrap();
        assert_eq!(res, BTreeMap::from([(1, true), (20, false)]));
    }

    #[test]
    fn test_enums() {
        for cmd in [Command::Stop, Command::Move { x: 1, y: -2 }, Command::Say("hi".to_string()), Command::Pair(3, 4)] {
            let text = to_string(&cmd).unwrap();
            let back: Command = from_str(&text).unwrap();
            assert_eq!(back, cmd);
        }
    }

    #[test]
    fn test_typed_arrays() {
        let ints: Vec<u16> = from_value(&Value::from(vec![1u16, 2, 3])).unwrap();
        assert_eq!(ints, vec![1, 2, 3]);
        let flags: Vec<bool> = from_value(&Value::from(vec![true, false])).unwrap();
        assert_eq!(flags, vec![true, false]);
    }

    #[test]
    fn test_typed_bool_text_reads_back_as_bools() {
        let text = crate::stringify(&Value::from(vec![false, true]));
        let flags: Vec<bool> = from_str(&text).unwrap();
        assert_eq!(flags, vec![false, true]);
    }

    #[test]
    fn test_out_of_range_integer() {
        let res: Result<u8, _> = from_str("300");
        assert!(res.is_err());
    }

    #[test]
    fn test_parse_error_is_wrapped() {
        let res: Result<Vec<i32>, _> = from_str("[1,2,");
        match res {
            Err(SerdeJSONError::Parsing(ParsingError::Malformed)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_value_from_serde_json() {
        let v: Value = serde_json::from_str(r#"{"b":[1,-2,3.5],"a":{"z":null,"t":true},"s":"x"}"#).unwrap();
        let keys: Vec<&String> = v.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "a", "s"]);
        assert_eq!(v.get("b"), Some(&Value::Array(vec![Value::U64(1), Value::I64(-2), Value::F64(3.5)])));
        assert_eq!(v.get("a").unwrap().get("z"), Some(&Value::Null));
        assert_eq!(v.get("s"), Some(&Value::String("x".to_string())));
    }

    #[test]
    fn test_value_round_trip_through_serde() {
        let data = MyData { name: "n".to_string(), count: 7, maybe: None };
        let value = to_value(&data).unwrap();
        let back: MyData = from_value(&value).unwrap();
        assert_eq!(back, data);
        let copy: Value = from_value(&value).unwrap();
        assert_eq!(copy, value);
    }
}
