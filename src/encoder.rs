//! Percent-encoding of variable values.
//!
//! Both encoders normalize their input to Unicode Normalization Form C first,
//! so precomposed and decomposed forms of the same text encode identically.
use std::borrow::Cow;
use std::fmt::Write;

use unicode_normalization::{IsNormalized, UnicodeNormalization, is_nfc_quick};

use crate::{Error, ErrorKind, Result};

pub(crate) fn is_unreserved(c: char) -> bool {
    matches!(c, 'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '.' | '_' | '~')
}

/// Characters left as-is by [`minimal_encode`] in addition to the unreserved set.
fn is_minimal_safe(c: char) -> bool {
    matches!(
        c,
        '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '=' | ':' | '@' | '/'
    )
}

fn nfc(s: &str) -> Cow<'_, str> {
    match is_nfc_quick(s.chars()) {
        IsNormalized::Yes => Cow::Borrowed(s),
        _ => Cow::Owned(s.nfc().collect()),
    }
}

fn encode_char(ch: char, out: &mut String) {
    for b in ch.encode_utf8(&mut [0; 4]).as_bytes() {
        write!(out, "%{b:02X}").unwrap();
    }
}

pub(crate) fn encode_to(s: &str, out: &mut String) {
    for ch in nfc(s).chars() {
        if is_unreserved(ch) {
            out.push(ch);
        } else {
            encode_char(ch, out);
        }
    }
}
pub(crate) fn minimal_encode_to(s: &str, out: &mut String) {
    for ch in nfc(s).chars() {
        if is_unreserved(ch) || is_minimal_safe(ch) {
            out.push(ch);
        } else {
            encode_char(ch, out);
        }
    }
}

/// Percent-encodes every character outside `ALPHA / DIGIT / "-" / "." / "_" / "~"`.
pub fn encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    encode_to(s, &mut out);
    out
}

/// Like [`encode`], but leaves sub-delimiters, `:`, `@` and `/` unescaped.
pub fn minimal_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    minimal_encode_to(s, &mut out);
    out
}

/// Decodes percent-encoded octets and `+` as a space.
///
/// A `%` that is not followed by two hex digits is kept as-is.
pub fn decode(s: &str) -> Result<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => match (bytes.get(i + 1).and_then(to_u8), bytes.get(i + 2).and_then(to_u8)) {
                (Some(h), Some(l)) => {
                    out.push(h * 16 + l);
                    i += 3;
                    continue;
                }
                _ => out.push(b'%'),
            },
            b'+' => out.push(b' '),
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8(out).map_err(|e| {
        let valid = e.utf8_error().valid_up_to();
        Error::new(s, source_index_of(bytes, valid), ErrorKind::InvalidUtf8)
    })
}

/// Maps an offset in the decoded bytes back to an offset in the encoded text.
fn source_index_of(bytes: &[u8], decoded: usize) -> usize {
    let mut i = 0;
    let mut n = 0;
    while i < bytes.len() && n < decoded {
        if bytes[i] == b'%'
            && bytes.get(i + 1).and_then(to_u8).is_some()
            && bytes.get(i + 2).and_then(to_u8).is_some()
        {
            i += 3;
        } else {
            i += 1;
        }
        n += 1;
    }
    i
}

fn to_u8(c: &u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conservative() {
        assert_eq!(encode("ben & jerrys"), "ben%20%26%20jerrys");
        assert_eq!(encode("a/b/c"), "a%2Fb%2Fc");
        assert_eq!(encode("A-z_0.9~"), "A-z_0.9~");
        assert_eq!(encode("あ"), "%E3%81%82");
        assert_eq!(encode("+"), "%2B");
    }

    #[test]
    fn minimal() {
        assert_eq!(minimal_encode("this/is/a/path"), "this/is/a/path");
        assert_eq!(minimal_encode("email@acme.com"), "email@acme.com");
        assert_eq!(minimal_encode("a;b=c,d"), "a;b=c,d");
        assert_eq!(minimal_encode("a b?c#d"), "a%20b%3Fc%23d");
        assert_eq!(minimal_encode("100%"), "100%25");
    }

    #[test]
    fn normalization() {
        let precomposed = "\u{00E9}";
        let decomposed = "e\u{0301}";
        assert_eq!(encode(precomposed), "%C3%A9");
        assert_eq!(encode(decomposed), encode(precomposed));
        assert_eq!(minimal_encode(decomposed), minimal_encode(precomposed));
    }

    #[test]
    fn decoding() {
        assert_eq!(decode("ben%20%26%20jerrys").unwrap(), "ben & jerrys");
        assert_eq!(decode("a+b").unwrap(), "a b");
        assert_eq!(decode("%e3%81%82").unwrap(), "あ");
        assert_eq!(decode("%").unwrap(), "%");
        assert_eq!(decode("%2G").unwrap(), "%2G");
        assert_eq!(decode("%4").unwrap(), "%4");
    }

    #[test]
    fn decoding_invalid_utf8() {
        let e = decode("ab%F8%28").unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidUtf8);
        assert_eq!(e.source_index(), 2);
    }
}
