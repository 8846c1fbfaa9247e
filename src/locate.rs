//! Delimiter matching over raw JSON bytes.
//!
//! Both scans keep a stack of the closers they still expect. A closer that
//! does not match the top of the stack, or running out of input first, makes
//! the scan report `None`.

/// Finds the closer matching the opener (`{`, `[` or `"`) at `pos`.
///
/// Inside a string only `\` (skips the next byte) and `"` are significant.
/// Outside strings a `\` also skips the next byte.
pub fn locate_block(text: &[u8], pos: usize) -> Option<usize> {
    let mut expected: Vec<u8> = Vec::with_capacity(8);
    match text.get(pos) {
        Some(b'{') => expected.push(b'}'),
        Some(b'[') => expected.push(b']'),
        Some(b'"') => expected.push(b'"'),
        _ => return None,
    }
    let mut i = pos + 1;
    while i < text.len() {
        let b = text[i];
        if expected.last() == Some(&b'"') {
            match b {
                b'\\' => i += 1,
                b'"' => {
                    expected.pop();
                }
                _ => {}
            }
        } else {
            match b {
                b'{' => expected.push(b'}'),
                b'[' => expected.push(b']'),
                b'"' => expected.push(b'"'),
                b'}' | b']' => {
                    if expected.pop() != Some(b) {
                        return None
                    }
                }
                b'\\' => i += 1,
                _ => {}
            }
        }
        if expected.is_empty() {
            return Some(i)
        }
        i += 1;
    }
    None
}

/// Finds where the value starting at `pos` ends: the next top-level `,`, or
/// the `}`/`]` of the enclosing container.
///
/// `pos` may point at the `:` of an object entry, which is skipped. Nested
/// blocks and strings are jumped over with [locate_block].
pub fn locate_value_end(text: &[u8], pos: usize) -> Option<usize> {
    let mut i = pos;
    if text.get(i) == Some(&b':') {
        i += 1;
    }
    while i < text.len() {
        match text[i] {
            b'{' | b'[' | b'"' => i = locate_block(text, i)?,
            b'\\' => i += 1,
            b',' | b'}' | b']' => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}
