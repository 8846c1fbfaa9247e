use crate::parser::ParsingError;
use crate::stringify::stringify;
use crate::value::{Map, TypedArray, Value};

use serde::ser::{
    self, Serialize, Serializer, SerializeSeq, SerializeTuple, SerializeMap, SerializeStruct,
    SerializeStructVariant, SerializeTupleVariant, SerializeTupleStruct
};
use std::fmt;

/// Converts any `Serialize` type into a [Value], keeping integer and float widths.
pub fn to_value<T>(value: &T) -> Result<Value, SerdeJSONError>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Serializes any `Serialize` type straight to compact JSON text.
pub fn to_string<T>(value: &T) -> Result<String, SerdeJSONError>
where
    T: ?Sized + Serialize
{
    let model = to_value(value)?;
    Ok(stringify(&model))
}

#[derive(Debug)]
pub enum SerdeJSONError {
    Custom(String),
    Parsing(ParsingError),
}

impl std::error::Error for SerdeJSONError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SerdeJSONError::Parsing(e) => Some(e),
            SerdeJSONError::Custom(_) => None,
        }
    }
}

impl fmt::Display for SerdeJSONError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerdeJSONError::Custom(msg) => write!(f, "{}", msg),
            SerdeJSONError::Parsing(e) => write!(f, "{}", e),
        }
    }
}

impl From<ParsingError> for SerdeJSONError {
    fn from(e: ParsingError) -> Self {
        SerdeJSONError::Parsing(e)
    }
}

impl ser::Error for SerdeJSONError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        SerdeJSONError::Custom(msg.to_string())
    }
}


impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::I8(n) => serializer.serialize_i8(*n),
            Value::I16(n) => serializer.serialize_i16(*n),
            Value::I32(n) => serializer.serialize_i32(*n),
            Value::I64(n) => serializer.serialize_i64(*n),
            Value::U8(n) => serializer.serialize_u8(*n),
            Value::U16(n) => serializer.serialize_u16(*n),
            Value::U32(n) => serializer.serialize_u32(*n),
            Value::U64(n) => serializer.serialize_u64(*n),
            Value::F32(n) => serializer.serialize_f32(*n),
            Value::F64(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Object(map) => {
                let mut state = serializer.serialize_map(Some(map.len()))?;
                for (key, item) in map {
                    state.serialize_entry(key, item)?;
                }
                state.end()
            }
            Value::Array(values) => {
                let mut state = serializer.serialize_seq(Some(values.len()))?;
                for item in values {
                    state.serialize_element(item)?;
                }
                state.end()
            }
            Value::Typed(typed) => typed.serialize(serializer),
        }
    }
}

impl Serialize for TypedArray {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TypedArray::Bool(v) => v.serialize(serializer),
            TypedArray::I8(v) => v.serialize(serializer),
            TypedArray::I16(v) => v.serialize(serializer),
            TypedArray::I32(v) => v.serialize(serializer),
            TypedArray::I64(v) => v.serialize(serializer),
            TypedArray::U8(v) => v.serialize(serializer),
            TypedArray::U16(v) => v.serialize(serializer),
            TypedArray::U32(v) => v.serialize(serializer),
            TypedArray::U64(v) => v.serialize(serializer),
            TypedArray::F32(v) => v.serialize(serializer),
            TypedArray::F64(v) => v.serialize(serializer),
            TypedArray::String(v) => v.serialize(serializer),
        }
    }
}


/// Object keys must end up as strings; numbers and booleans are spelled out.
fn key_to_string(key: Value) -> Result<String, SerdeJSONError> {
    match key {
        Value::String(s) => Ok(s),
        Value::Object(_) | Value::Array(_) | Value::Typed(_) | Value::Null => {
            Err(SerdeJSONError::Custom(format!("object key must be a string, not {}", key.type_name())))
        }
        scalar => Ok(stringify(&scalar)),
    }
}

fn single_entry(key: &str, value: Value) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(key.to_string(), value);
    Value::Object(map)
}

/// Used for a normal sequence `[elem, elem, ...]` or a tuple `(elem, ...)`.
pub struct CompoundSeq {
    pub elements: Vec<Value>,
}

impl CompoundSeq {
    fn end_impl(self) -> Result<Value, SerdeJSONError> {
        Ok(Value::Array(self.elements))
    }

    fn serialize_element_impl<T>(&mut self, value: &T) -> Result<(), SerdeJSONError>
    where
        T: ?Sized + Serialize,
    {
        let val = value.serialize(ValueSerializer)?;
        self.elements.push(val);
        Ok(())
    }
}

impl SerializeSeq for CompoundSeq {
    type Ok = Value;
    type Error = SerdeJSONError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.serialize_element_impl(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.end_impl()
    }
}

impl SerializeTuple for CompoundSeq {
    type Ok = Value;
    type Error = SerdeJSONError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.serialize_element_impl(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.end_impl()
    }
}

impl SerializeTupleStruct for CompoundSeq {
    type Ok = Value;
    type Error = SerdeJSONError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.serialize_element_impl(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.end_impl()
    }
}

/// `MyEnum::Variant(a, b)` becomes `{"Variant":[a,b]}`.
pub struct CompoundSeqVariant {
    pub variant: String,
    pub elements: Vec<Value>,
}

impl SerializeTupleVariant for CompoundSeqVariant {
    type Ok = Value;
    type Error = SerdeJSONError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        let val = value.serialize(ValueSerializer)?;
        self.elements.push(val);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(single_entry(&self.variant, Value::Array(self.elements)))
    }
}


/// For a normal map or a struct
pub struct CompoundMap {
    pub map: Map,
    pub next_key: Option<String>,
}

impl SerializeMap for CompoundMap {
    type Ok = Value;
    type Error = SerdeJSONError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        let k = key.serialize(ValueSerializer)?;
        self.next_key = Some(key_to_string(k)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        let v = value.serialize(ValueSerializer)?;
        let key = self.next_key.take().ok_or_else(|| {
            SerdeJSONError::Custom("serialize_value called before serialize_key".to_string())
        })?;
        self.map.insert(key, v);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Object(self.map))
    }
}

impl SerializeStruct for CompoundMap {
    type Ok = Value;
    type Error = SerdeJSONError;

    fn serialize_field<T>(&mut self, field: &'static str, value: &T)
                          -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        let val = value.serialize(ValueSerializer)?;
        self.map.insert(field.to_string(), val);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Object(self.map))
    }
}

/// `MyEnum::Variant { x: 1 }` becomes `{"Variant":{"x":1}}`.
pub struct CompoundMapVariant {
    pub variant: String,
    pub map: Map,
}

impl SerializeStructVariant for CompoundMapVariant {
    type Ok = Value;
    type Error = SerdeJSONError;

    fn serialize_field<T>(
        &mut self,
        field: &'static str,
        value: &T
    ) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        let val = value.serialize(ValueSerializer)?;
        self.map.insert(field.to_string(), val);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(single_entry(&self.variant, Value::Object(self.map)))
    }
}


pub struct ValueSerializer;

impl Serializer for ValueSerializer {
    type Ok = Value;
    type Error = SerdeJSONError;

    type SerializeSeq = CompoundSeq;
    type SerializeTuple = CompoundSeq;
    type SerializeTupleStruct = CompoundSeq;
    type SerializeTupleVariant = CompoundSeqVariant;
    type SerializeMap = CompoundMap;
    type SerializeStruct = CompoundMap;
    type SerializeStructVariant = CompoundMapVariant;

    // ---- Primitives ----
    fn serialize_bool(self, v: bool) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok, Self::Error> {
        Ok(Value::I8(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok, Self::Error> {
        Ok(Value::I16(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok, Self::Error> {
        Ok(Value::I32(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok, Self::Error> {
        Ok(Value::I64(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok, Self::Error> {
        Ok(Value::U8(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok, Self::Error> {
        Ok(Value::U16(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok, Self::Error> {
        Ok(Value::U32(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok, Self::Error> {
        Ok(Value::U64(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok, Self::Error> {
        Ok(Value::F32(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok, Self::Error> {
        Ok(Value::F64(v))
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok, Self::Error> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok, Self::Error> {
        // raw bytes have a natural home in a typed u8 array
        Ok(Value::Typed(TypedArray::U8(v.to_vec())))
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Self::Ok, Self::Error>
    where
        T: ?Sized + Serialize
    {
        value.serialize(self)
    }

    // ---- Special cases: unit, option, etc. ----
    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        Ok(Value::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        let val = value.serialize(ValueSerializer)?;
        Ok(single_entry(variant, val))
    }

    // ---- Sequences ----
    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Ok(CompoundSeq {
            elements: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Ok(CompoundSeq {
            elements: Vec::with_capacity(len),
        })
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Ok(CompoundSeq {
            elements: Vec::with_capacity(len),
        })
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Ok(CompoundSeqVariant {
            variant: variant.to_string(),
            elements: Vec::with_capacity(len),
        })
    }

    // ---- Maps ----
    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(CompoundMap {
            map: Map::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(CompoundMap {
            map: Map::with_capacity(len),
            next_key: None,
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Ok(CompoundMapVariant {
            variant: variant.to_string(),
            map: Map::with_capacity(len),
        })
    }
}
