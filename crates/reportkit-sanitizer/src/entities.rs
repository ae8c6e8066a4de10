//! Character reference decoding for text and attribute values.
//!
//! Numeric references (decimal and hex, `;` optional) and the full WHATWG
//! named reference table from `markup5ever`, including the legacy names
//! browsers accept without `;` (`&copy2024`, `&eacute`). Named references
//! match the longest known name, the same way a browser tokenizer does.
//! Unknown references stay literal; the serializer escapes their `&` so they
//! remain literal for the browser too.

use std::borrow::Cow;

use markup5ever::data::{C1_REPLACEMENTS, NAMED_ENTITIES};

/// Decode character references in `input`.
///
/// With `in_attribute` set, a legacy reference without `;` that is followed
/// by `=` or an alphanumeric stays literal (`?a=1&copy=2`), as in browsers.
pub fn decode(input: &str, in_attribute: bool) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match decode_reference(after, in_attribute) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decode one reference starting just after `&`.
///
/// Returns the replacement and the number of bytes consumed after `&`.
fn decode_reference(after: &str, in_attribute: bool) -> Option<(String, usize)> {
    if let Some(numeric) = after.strip_prefix('#') {
        return decode_numeric(numeric).map(|(c, len)| (c.to_string(), len + 1));
    }

    let (len, (first, second)) = longest_named(after)?;
    if in_attribute && !after[..len].ends_with(';') {
        let next = after.as_bytes().get(len);
        if next.is_some_and(|b| *b == b'=' || b.is_ascii_alphanumeric()) {
            return None;
        }
    }

    let mut value = String::with_capacity(8);
    value.extend(char::from_u32(first));
    if second != 0 {
        value.extend(char::from_u32(second));
    }
    Some((value, len))
}

/// Longest entry of the named table that prefixes `after`.
///
/// The table holds every prefix of every name with a `(0, 0)` value, so the
/// walk stops at the first miss and stays bounded by the longest name.
fn longest_named(after: &str) -> Option<(usize, (u32, u32))> {
    let mut best = None;
    for (i, b) in after.bytes().enumerate() {
        if !(b.is_ascii_alphanumeric() || b == b';') {
            break;
        }
        match NAMED_ENTITIES.get(&after[..=i]) {
            None => break,
            Some(&(0, _)) => {}
            Some(&value) => best = Some((i + 1, value)),
        }
        if b == b';' {
            break;
        }
    }
    best
}

/// Decode `123;` or `x7B;` (after `&#`). `;` is optional.
fn decode_numeric(input: &str) -> Option<(char, usize)> {
    let (radix, digits_start) = match input.as_bytes().first() {
        Some(b'x') | Some(b'X') => (16, 1),
        _ => (10, 0),
    };

    let digits = input[digits_start..]
        .bytes()
        .take_while(|b| (*b as char).is_digit(radix))
        .count();
    if digits == 0 {
        return None;
    }

    let mut code: u32 = 0;
    for b in input[digits_start..digits_start + digits].bytes() {
        let digit = (b as char).to_digit(radix).unwrap_or(0);
        code = code.saturating_mul(radix).saturating_add(digit);
    }

    let mut consumed = digits_start + digits;
    if input[consumed..].starts_with(';') {
        consumed += 1;
    }

    Some((numeric_char(code), consumed))
}

fn numeric_char(code: u32) -> char {
    match code {
        0 => char::REPLACEMENT_CHARACTER,
        0x80..=0x9F => C1_REPLACEMENTS[(code - 0x80) as usize]
            .or_else(|| char::from_u32(code))
            .unwrap_or(char::REPLACEMENT_CHARACTER),
        _ => char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_references_borrowed() {
        assert!(matches!(decode("plain text", false), Cow::Borrowed(_)));
    }

    #[test]
    fn test_named_references() {
        assert_eq!(decode("a &amp; b &lt;p&gt;", false), "a & b <p>");
        assert_eq!(decode("&quot;hi&quot;", true), "\"hi\"");
        assert_eq!(decode("javascript&colon;x", true), "javascript:x");
        assert_eq!(decode("jav&Tab;ascript", true), "jav\tascript");
    }

    #[test]
    fn test_full_named_table() {
        assert_eq!(decode("caf&eacute; &rarr; &alpha;", false), "caf\u{00E9} \u{2192} \u{03B1}");
        assert_eq!(decode("&uuml;ber &hearts;", true), "\u{00FC}ber \u{2665}");
        assert_eq!(decode("&CounterClockwiseContourIntegral;", false), "\u{2233}");
        // Two code points
        assert_eq!(decode("&NotEqualTilde;", false), "\u{2242}\u{0338}");
    }

    #[test]
    fn test_longest_match() {
        assert_eq!(decode("&notin;", false), "\u{2209}");
        assert_eq!(decode("&notit;", false), "\u{00AC}it;");
        assert_eq!(decode("&ampfoo", false), "&foo");
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(decode("jav&#9;ascript:", true), "jav\tascript:");
        assert_eq!(decode("&#106;avascript", true), "javascript");
        assert_eq!(decode("&#x6A;&#X61;", true), "ja");
        assert_eq!(decode("&#0000106avascript", true), "javascript");
    }

    #[test]
    fn test_invalid_numeric_references() {
        assert_eq!(decode("&#0;", false), "\u{FFFD}");
        assert_eq!(decode("&#xD800;", false), "\u{FFFD}");
        assert_eq!(decode("&#99999999999;", false), "\u{FFFD}");
        assert_eq!(decode("&#150;", false), "\u{2013}");
        assert_eq!(decode("&#;", false), "&#;");
        assert_eq!(decode("&#x;", false), "&#x;");
    }

    #[test]
    fn test_unknown_and_bare_ampersands() {
        assert_eq!(decode("AT&T", false), "AT&T");
        assert_eq!(decode("&unknown;", true), "&unknown;");
        assert_eq!(decode("a & b", true), "a & b");
        assert_eq!(decode("trailing &", false), "trailing &");
    }

    #[test]
    fn test_legacy_without_semicolon() {
        assert_eq!(decode("&amp &lt", false), "& <");
        assert_eq!(decode("&copy2024", false), "\u{00A9}2024");
        assert_eq!(decode("caf&eacute au lait", false), "caf\u{00E9} au lait");
        // Attribute values keep the literal form before `=` or alphanumerics
        assert_eq!(decode("?a=1&copy=2", true), "?a=1&copy=2");
        assert_eq!(decode("?x&copy2", true), "?x&copy2");
        assert_eq!(decode("caf&eacute au lait", true), "caf\u{00E9} au lait");
    }

    #[test]
    fn test_no_double_decoding() {
        assert_eq!(decode("&amp;lt;", false), "&lt;");
        assert_eq!(decode("&amp;#106;", true), "&#106;");
    }
}
