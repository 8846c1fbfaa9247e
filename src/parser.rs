use std::error;
use std::fmt::{Display, Formatter};

use tracing::{debug, trace};

use crate::locate::{locate_block, locate_value_end};
use crate::utils::{is_space, skip_space, starts_with_letter, strip_space};
use crate::value::{Map, Value};


/// Nesting depth accepted by [ParserConfig::new].
pub const DEFAULT_MAX_DEPTH: usize = 128;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Deepest allowed nesting of objects and arrays. Ignored with the
    /// `unlimited_depth` feature.
    pub max_depth: usize,
}

impl ParserConfig {
    pub fn new() -> Self {
        ParserConfig { max_depth: DEFAULT_MAX_DEPTH }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        ParserConfig { max_depth }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}


#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ParsingError {
    /// Unbalanced or mismatched delimiters, or a stray closer.
    Malformed,
    NestingTooDeep { limit: usize },
}

impl Display for ParsingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParsingError::Malformed => write!(f, "ParsingError: Invalid JSON Format"),
            ParsingError::NestingTooDeep { limit } => {
                write!(f, "ParsingError: nesting exceeds {} levels", limit)
            }
        }
    }
}

impl error::Error for ParsingError {}


/// Decodes an unquoted scalar.
///
/// Booleans are recognized by substring, so `"untrue"` reads as `true`.
/// Text with a leading letter that is not a keyword passes through as a
/// string.
pub fn decode_literal(text: &str) -> Value {
    let s = text.trim_matches(|c: char| c.is_ascii() && is_space(c as u8));
    if s.is_empty() || s == "null" {
        return Value::Null
    }
    if s.contains("false") {
        return Value::Bool(false)
    }
    if s.contains("true") {
        return Value::Bool(true)
    }
    if s.contains('.') {
        return match s.parse::<f64>() {
            Ok(f) if f.is_finite() => Value::F64(f),
            _ => Value::String(s.to_string()),
        }
    }
    if starts_with_letter(s) {
        return Value::String(s.to_string())
    }
    if let Ok(n) = s.parse::<i64>() {
        return Value::I64(n)
    }
    if let Ok(n) = s.parse::<u64>() {
        return Value::U64(n)
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => Value::F64(f),
        _ => Value::String(s.to_string()),
    }
}


struct JSONParser<'input> {
    source: &'input str,
    bytes: &'input [u8],
    config: ParserConfig,
    depth: usize,
}

impl<'input> JSONParser<'input> {
    fn new(source: &'input str, config: ParserConfig) -> Self {
        JSONParser { source, bytes: source.as_bytes(), config, depth: 0 }
    }

    fn malformed(&self, index: usize, reason: &str) -> ParsingError {
        debug!(index, reason, "malformed JSON input");
        ParsingError::Malformed
    }

    fn enter(&mut self, index: usize) -> Result<(), ParsingError> {
        self.depth += 1;
        if cfg!(not(feature = "unlimited_depth")) && self.depth > self.config.max_depth {
            debug!(index, limit = self.config.max_depth, "JSON nesting too deep");
            return Err(ParsingError::NestingTooDeep { limit: self.config.max_depth })
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn block_end(&self, pos: usize, end: usize) -> Result<usize, ParsingError> {
        match locate_block(self.bytes, pos) {
            Some(close) if close < end => Ok(close),
            Some(close) => Err(self.malformed(close, "block closes past its container")),
            None => Err(self.malformed(pos, "unterminated or mismatched block")),
        }
    }

    fn parse_text(&mut self) -> Result<Value, ParsingError> {
        let len = self.bytes.len();
        let start = skip_space(self.bytes, 0, len);
        match self.bytes.get(start) {
            Some(b'[' | b'{' | b'"') => self.parse_span(start, len),
            Some(b']' | b'}' | b')') => Err(self.malformed(start, "stray closing delimiter")),
            _ => {
                let stray = self.bytes[start..]
                    .iter()
                    .position(|b| matches!(b, b'[' | b']' | b'{' | b'}' | b')' | b'"'));
                if let Some(offset) = stray {
                    return Err(self.malformed(start + offset, "structural character in bare literal"))
                }
                Ok(decode_literal(&strip_space(&self.source[start..])))
            }
        }
    }

    /// Decodes whatever value begins in `[start, end)`. Bytes after a
    /// container or string are ignored.
    fn parse_span(&mut self, start: usize, end: usize) -> Result<Value, ParsingError> {
        let x = skip_space(self.bytes, start, end);
        if x >= end {
            return Ok(Value::Null)
        }
        match self.bytes[x] {
            b'[' | b'{' | b'"' => {
                let y = self.block_end(x, end)?;
                self.parse_block(x, y)
            }
            b']' | b'}' | b')' => Err(self.malformed(x, "stray closing delimiter")),
            _ => Ok(decode_literal(&self.source[x..end])),
        }
    }

    /// Decodes the block opened at `x` and closed at `y`, both already matched.
    fn parse_block(&mut self, x: usize, y: usize) -> Result<Value, ParsingError> {
        match self.bytes[x] {
            b'[' => {
                self.enter(x)?;
                let values = self.parse_array(x + 1, y)?;
                self.leave();
                Ok(Value::Array(values))
            }
            b'{' => {
                self.enter(x)?;
                let map = self.parse_object(x + 1, y)?;
                self.leave();
                Ok(Value::Object(map))
            }
            _ => Ok(Value::String(self.source[x + 1..y].to_string())),
        }
    }

    /// End of the object value scanned from `pos`, clipped to the object's `end`.
    fn value_end(&self, pos: usize, end: usize) -> usize {
        match locate_value_end(self.bytes, pos) {
            Some(w) if w < end => w,
            _ => end,
        }
    }

    fn skip_separators(&self, mut pos: usize, end: usize) -> usize {
        while pos < end && (is_space(self.bytes[pos]) || self.bytes[pos] == b',') {
            pos += 1;
        }
        pos
    }

    fn parse_object(&mut self, start: usize, end: usize) -> Result<Map, ParsingError> {
        let mut map = Map::new();
        let mut x = start;
        loop {
            x = self.skip_separators(x, end);
            if x >= end {
                break
            }
            if self.bytes[x] != b'"' {
                return Err(self.malformed(x, "expected a quoted key"))
            }
            let key_end = self.block_end(x, end)?;
            let key = &self.source[x + 1..key_end];

            let colon = skip_space(self.bytes, key_end + 1, end);
            if colon >= end || self.bytes[colon] != b':' {
                return Err(self.malformed(colon, "expected ':' after key"))
            }
            let v = skip_space(self.bytes, colon + 1, end);
            let (value, value_end) = if v < end && matches!(self.bytes[v], b'[' | b'{' | b'"') {
                let close = self.block_end(v, end)?;
                let value = self.parse_block(v, close)?;
                // anything between the block and the next separator is dropped
                (value, self.value_end(close + 1, end))
            } else {
                let value_end = self.value_end(colon, end);
                (self.parse_span(colon + 1, value_end)?, value_end)
            };
            map.insert(key.to_string(), value);
            x = value_end + 1;
        }
        Ok(map)
    }

    fn parse_array(&mut self, start: usize, end: usize) -> Result<Vec<Value>, ParsingError> {
        let mut values = Vec::new();
        let mut x = start;
        loop {
            x = self.skip_separators(x, end);
            if x >= end {
                break
            }
            match self.bytes[x] {
                b'{' | b'[' | b'"' => {
                    let z = self.block_end(x, end)?;
                    values.push(self.parse_block(x, z)?);
                    x = z + 1;
                }
                _ => {
                    let mut z = x;
                    while z < end && self.bytes[z] != b',' {
                        z += 1;
                    }
                    values.push(decode_literal(&self.source[x..z]));
                    x = z;
                }
            }
        }
        Ok(values)
    }
}


pub fn from_str_with_config(source: &str, config: ParserConfig) -> Result<Value, ParsingError> {
    trace!(len = source.len(), max_depth = config.max_depth, "parsing JSON text");
    let mut parser = JSONParser::new(source, config);
    parser.parse_text()
}

/// Parses JSON text into a [Value] with the default [ParserConfig].
pub fn from_str(source: &str) -> Result<Value, ParsingError> {
    from_str_with_config(source, ParserConfig::new())
}

/// Like [from_str], for raw bytes. Invalid UTF-8 is malformed input.
pub fn from_bytes(bytes: &[u8]) -> Result<Value, ParsingError> {
    match std::str::from_utf8(bytes) {
        Ok(text) => from_str(text),
        Err(e) => {
            debug!(index = e.valid_up_to(), "invalid UTF-8 in JSON input");
            Err(ParsingError::Malformed)
        }
    }
}
