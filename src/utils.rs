use unicode_general_category::{get_general_category, GeneralCategory};


/// JSON insignificant whitespace, plus the vertical tab and form feed that
/// C-style `isspace` also accepts.
pub(crate) fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0b' | b'\x0c')
}

pub(crate) fn skip_space(text: &[u8], mut pos: usize, end: usize) -> usize {
    while pos < end && is_space(text[pos]) {
        pos += 1;
    }
    pos
}

/// True when `s` starts with a letter in any script (general category L*).
pub(crate) fn starts_with_letter(s: &str) -> bool {
    match s.chars().next() {
        None => false,
        Some(c) => {
            matches!(get_general_category(c),
                GeneralCategory::UppercaseLetter
                | GeneralCategory::LowercaseLetter
                | GeneralCategory::TitlecaseLetter
                | GeneralCategory::ModifierLetter
                | GeneralCategory::OtherLetter)
        }
    }
}

/// Copies `s` without any whitespace bytes.
pub(crate) fn strip_space(s: &str) -> String {
    s.chars().filter(|c| !(c.is_ascii() && is_space(*c as u8))).collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters() {
        assert!(starts_with_letter("abc"));
        assert!(starts_with_letter("Ärger"));
        assert!(starts_with_letter("日本"));
        assert!(!starts_with_letter("1abc"));
        assert!(!starts_with_letter("-x"));
        assert!(!starts_with_letter(""));
    }

    #[test]
    fn test_strip_space() {
        assert_eq!(strip_space(" 1 2\t3\n"), "123");
        assert_eq!(skip_space(b"  x", 0, 3), 2);
        assert_eq!(skip_space(b"   ", 0, 3), 3);
    }
}
