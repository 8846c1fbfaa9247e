use std::fmt::{Display, Formatter};

use indexmap::IndexMap;

/// Ordered string-keyed mapping backing [Value::Object].
///
/// Iteration follows insertion order. Inserting an existing key replaces its
/// value and keeps the key where it was.
pub type Map = IndexMap<String, Value>;


/// Runtime discriminant of a [Value].
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum Tag {
    Null,
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    Object,
    Array,
    /// A homogeneous array; the payload is the element tag
    Typed(ElementTag),
}

/// Element kind of a [TypedArray].
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum ElementTag {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
}


/// A homogeneous ordered sequence of one primitive kind.
#[derive(PartialEq, Debug, Clone)]
pub enum TypedArray {
    Bool(Vec<bool>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    String(Vec<String>),
}


/// The dynamic value produced by [crate::parse] and consumed by [crate::stringify()].
#[derive(PartialEq, Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Object(Map),
    Array(Vec<Value>),
    Typed(TypedArray),
}


impl TypedArray {
    pub fn element_tag(&self) -> ElementTag {
        match self {
            TypedArray::Bool(_) => ElementTag::Bool,
            TypedArray::I8(_) => ElementTag::I8,
            TypedArray::I16(_) => ElementTag::I16,
            TypedArray::I32(_) => ElementTag::I32,
            TypedArray::I64(_) => ElementTag::I64,
            TypedArray::U8(_) => ElementTag::U8,
            TypedArray::U16(_) => ElementTag::U16,
            TypedArray::U32(_) => ElementTag::U32,
            TypedArray::U64(_) => ElementTag::U64,
            TypedArray::F32(_) => ElementTag::F32,
            TypedArray::F64(_) => ElementTag::F64,
            TypedArray::String(_) => ElementTag::String,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TypedArray::Bool(v) => v.len(),
            TypedArray::I8(v) => v.len(),
            TypedArray::I16(v) => v.len(),
            TypedArray::I32(v) => v.len(),
            TypedArray::I64(v) => v.len(),
            TypedArray::U8(v) => v.len(),
            TypedArray::U16(v) => v.len(),
            TypedArray::U32(v) => v.len(),
            TypedArray::U64(v) => v.len(),
            TypedArray::F32(v) => v.len(),
            TypedArray::F64(v) => v.len(),
            TypedArray::String(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element `index` lifted into a scalar [Value] of the matching tag.
    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            TypedArray::Bool(v) => v.get(index).map(|x| Value::Bool(*x)),
            TypedArray::I8(v) => v.get(index).map(|x| Value::I8(*x)),
            TypedArray::I16(v) => v.get(index).map(|x| Value::I16(*x)),
            TypedArray::I32(v) => v.get(index).map(|x| Value::I32(*x)),
            TypedArray::I64(v) => v.get(index).map(|x| Value::I64(*x)),
            TypedArray::U8(v) => v.get(index).map(|x| Value::U8(*x)),
            TypedArray::U16(v) => v.get(index).map(|x| Value::U16(*x)),
            TypedArray::U32(v) => v.get(index).map(|x| Value::U32(*x)),
            TypedArray::U64(v) => v.get(index).map(|x| Value::U64(*x)),
            TypedArray::F32(v) => v.get(index).map(|x| Value::F32(*x)),
            TypedArray::F64(v) => v.get(index).map(|x| Value::F64(*x)),
            TypedArray::String(v) => v.get(index).map(|x| Value::String(x.clone())),
        }
    }

    /// Widens into a heterogeneous sequence of scalar values.
    pub fn to_values(&self) -> Vec<Value> {
        (0..self.len()).filter_map(|i| self.get(i)).collect()
    }
}


impl Value {
    pub fn tag(&self) -> Tag {
        match self {
            Value::Null => Tag::Null,
            Value::Bool(_) => Tag::Bool,
            Value::I8(_) => Tag::I8,
            Value::I16(_) => Tag::I16,
            Value::I32(_) => Tag::I32,
            Value::I64(_) => Tag::I64,
            Value::U8(_) => Tag::U8,
            Value::U16(_) => Tag::U16,
            Value::U32(_) => Tag::U32,
            Value::U64(_) => Tag::U64,
            Value::F32(_) => Tag::F32,
            Value::F64(_) => Tag::F64,
            Value::String(_) => Tag::String,
            Value::Object(_) => Tag::Object,
            Value::Array(_) => Tag::Array,
            Value::Typed(t) => Tag::Typed(t.element_tag()),
        }
    }

    /// Human-readable kind, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::I8(_) | Value::I16(_) | Value::I32(_) | Value::I64(_) => "signed integer",
            Value::U8(_) | Value::U16(_) | Value::U32(_) | Value::U64(_) => "unsigned integer",
            Value::F32(_) | Value::F64(_) => "float",
            Value::String(_) => "string",
            Value::Object(_) => "object",
            Value::Array(_) => "array",
            Value::Typed(_) => "typed array",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Value::I8(_) | Value::I16(_) | Value::I32(_) | Value::I64(_)
            | Value::U8(_) | Value::U16(_) | Value::U32(_) | Value::U64(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::F32(_) | Value::F64(_))
    }

    pub fn is_number(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_typed_array(&self) -> bool {
        matches!(self, Value::Typed(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Any integer variant whose value fits in an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::I8(n) => Some(n.into()),
            Value::I16(n) => Some(n.into()),
            Value::I32(n) => Some(n.into()),
            Value::I64(n) => Some(n),
            Value::U8(n) => Some(n.into()),
            Value::U16(n) => Some(n.into()),
            Value::U32(n) => Some(n.into()),
            Value::U64(n) => i64::try_from(n).ok(),
            _ => None,
        }
    }

    /// Any integer variant whose value fits in a `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::I8(n) => u64::try_from(n).ok(),
            Value::I16(n) => u64::try_from(n).ok(),
            Value::I32(n) => u64::try_from(n).ok(),
            Value::I64(n) => u64::try_from(n).ok(),
            Value::U8(n) => Some(n.into()),
            Value::U16(n) => Some(n.into()),
            Value::U32(n) => Some(n.into()),
            Value::U64(n) => Some(n),
            _ => None,
        }
    }

    /// Any numeric variant, converted to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::F32(n) => Some(n.into()),
            Value::F64(n) => Some(n),
            Value::I8(n) => Some(n.into()),
            Value::I16(n) => Some(n.into()),
            Value::I32(n) => Some(n.into()),
            Value::I64(n) => Some(n as f64),
            Value::U8(n) => Some(n.into()),
            Value::U16(n) => Some(n.into()),
            Value::U32(n) => Some(n.into()),
            Value::U64(n) => Some(n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Object(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_typed_array(&self) -> Option<&TypedArray> {
        match self {
            Value::Typed(t) => Some(t),
            _ => None,
        }
    }

    /// Looks up `key` if this is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(m) => m.get(key),
            _ => None,
        }
    }

    /// Element `index` of a heterogeneous array. Typed arrays are not
    /// indexable by reference; use [TypedArray::get].
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(a) => a.get(index),
            _ => None,
        }
    }

    /// Entry count for objects and arrays, `None` for scalars.
    pub fn entry_count(&self) -> Option<usize> {
        match self {
            Value::Object(m) => Some(m.len()),
            Value::Array(a) => Some(a.len()),
            Value::Typed(t) => Some(t.len()),
            _ => None,
        }
    }
}


impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Tag::Typed(elem) => write!(f, "Typed<{:?}>", elem),
            other => write!(f, "{:?}", other),
        }
    }
}


macro_rules! impl_from_scalar {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v)
                }
            }

            impl From<Vec<$t>> for TypedArray {
                fn from(v: Vec<$t>) -> Self {
                    TypedArray::$variant(v)
                }
            }

            impl From<Vec<$t>> for Value {
                fn from(v: Vec<$t>) -> Self {
                    Value::Typed(TypedArray::$variant(v))
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Value::Typed(TypedArray::String(v.into_iter().map(str::to_string).collect()))
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Object(m)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<TypedArray> for Value {
    fn from(t: TypedArray) -> Self {
        Value::Typed(t)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
