//! Lenient HTML tokenizer.
//!
//! Follows the shape of the HTML tokenizer closely enough that the tree it
//! feeds matches what a browser would see for ordinary markup, without
//! aiming for full conformance:
//!
//! - start tags with double-, single- and un-quoted attributes; the first of
//!   duplicate attributes wins; names are ASCII-lowercased
//! - end tags (attributes on them are parsed and discarded)
//! - comments, bogus comments (`<!x>`, `<?x>`, `</1>`) and doctypes
//! - raw text content for `script`-like elements, escapable raw text for
//!   `textarea` and `title`, and `plaintext`
//! - a `<` that does not start markup is text
//! - a tag still open at end of input is dropped
//!
//! Tokenization never fails.

use std::collections::HashSet;

use crate::dom::Attribute;
use crate::entities;

/// A lexical unit of markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
    Text(String),
    Comment(String),
    Doctype,
}

/// How the content following a start tag is tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextMode {
    /// Literal text up to the matching end tag.
    Raw,
    /// Like `Raw`, but character references are decoded.
    Escapable,
    /// Everything to end of input is text.
    Plaintext,
}

fn text_mode(tag: &str) -> Option<TextMode> {
    match tag {
        "script" | "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => {
            Some(TextMode::Raw)
        }
        "textarea" | "title" => Some(TextMode::Escapable),
        "plaintext" => Some(TextMode::Plaintext),
        _ => None,
    }
}

/// Offset and length of the first `-->` or `--!>` in `rest`.
fn comment_end(rest: &str) -> Option<(usize, usize)> {
    let mut from = 0;
    while let Some(offset) = rest[from..].find("--") {
        let at = from + offset;
        let tail = &rest.as_bytes()[at + 2..];
        if tail.starts_with(b">") {
            return Some((at, 3));
        }
        if tail.starts_with(b"!>") {
            return Some((at, 4));
        }
        from = at + 1;
    }
    None
}

fn is_space(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

/// Replace U+0000, which browsers never pass through verbatim.
fn clean(s: &str) -> String {
    if s.contains('\0') {
        s.replace('\0', "\u{FFFD}")
    } else {
        s.to_string()
    }
}

/// Streaming tokenizer over a borrowed input.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    /// Set after a start tag whose content is not markup.
    pending: Option<(String, TextMode)>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            pending: None,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    fn rest(&self) -> &'a str {
        let input = self.input;
        &input[self.pos..]
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_space(&mut self) {
        while self.peek().is_some_and(is_space) {
            self.pos += 1;
        }
    }

    /// Advance to end of input; any partial construct is dropped.
    fn finish(&mut self) -> Option<Token> {
        self.pos = self.input.len();
        None
    }

    /// Consume up to (not including) the first byte matching `stop`.
    fn take_until(&mut self, stop: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        let len = self.bytes()[start..]
            .iter()
            .position(|&b| stop(b))
            .unwrap_or(self.input.len() - start);
        self.pos = start + len;
        let input = self.input;
        &input[start..self.pos]
    }

    fn raw_text(&mut self, tag: &str, mode: TextMode) -> Option<Token> {
        let start = self.pos;
        let end = match mode {
            TextMode::Plaintext => self.input.len(),
            _ => self.find_raw_end(tag),
        };
        self.pos = end;
        if end == start {
            return None;
        }
        let raw = &self.input[start..end];
        let text = match mode {
            TextMode::Escapable => entities::decode(raw, false).into_owned(),
            _ => raw.to_string(),
        };
        Some(Token::Text(clean(&text)))
    }

    /// Position of `</tag` followed by a delimiter, or end of input.
    fn find_raw_end(&self, tag: &str) -> usize {
        let bytes = self.bytes();
        let mut from = self.pos;
        while let Some(offset) = self.input[from..].find("</") {
            let start = from + offset;
            let name_end = start + 2 + tag.len();
            if name_end <= bytes.len()
                && bytes[start + 2..name_end].eq_ignore_ascii_case(tag.as_bytes())
                && matches!(bytes.get(name_end), Some(&b) if is_space(b) || b == b'/' || b == b'>')
            {
                return start;
            }
            from = start + 2;
        }
        bytes.len()
    }

    fn text(&mut self) -> Token {
        let start = self.pos;
        // The current byte may be a '<' that did not start markup
        self.pos += 1;
        self.take_until(|b| b == b'<');
        let raw = &self.input[start..self.pos];
        Token::Text(clean(&entities::decode(raw, false)))
    }

    fn comment(&mut self) -> Token {
        // After "<!--"
        self.pos += 4;
        let rest = self.rest();
        if rest.starts_with('>') {
            self.pos += 1;
            return Token::Comment(String::new());
        }
        if rest.starts_with("->") {
            self.pos += 2;
            return Token::Comment(String::new());
        }

        match comment_end(rest) {
            Some((i, len)) => {
                let body = rest[..i].to_string();
                self.pos += i + len;
                Token::Comment(body)
            }
            None => {
                let body = rest.to_string();
                self.pos = self.input.len();
                Token::Comment(body)
            }
        }
    }

    /// `<!...>`, `<?...>` and `</` + non-letter, all up to the next `>`.
    fn bogus_comment(&mut self, skip: usize) -> Token {
        self.pos += skip;
        let body = self.take_until(|b| b == b'>').to_string();
        if !self.at_eof() {
            self.pos += 1;
        }
        Token::Comment(body)
    }

    fn doctype(&mut self) -> Token {
        self.take_until(|b| b == b'>');
        if !self.at_eof() {
            self.pos += 1;
        }
        Token::Doctype
    }

    fn tag_name(&mut self) -> String {
        let name = self.take_until(|b| is_space(b) || b == b'/' || b == b'>');
        clean(&name.to_ascii_lowercase())
    }

    /// Parse attributes up to and including `>`.
    ///
    /// Returns `None` if input ends inside the tag.
    fn attributes(&mut self) -> Option<(Vec<Attribute>, bool)> {
        let mut attributes: Vec<Attribute> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        loop {
            self.skip_space();
            match self.peek()? {
                b'>' => {
                    self.pos += 1;
                    return Some((attributes, false));
                }
                b'/' => {
                    self.pos += 1;
                    if self.peek() == Some(b'>') {
                        self.pos += 1;
                        return Some((attributes, true));
                    }
                }
                _ => {
                    let attribute = self.attribute()?;
                    if seen.insert(attribute.name.clone()) {
                        attributes.push(attribute);
                    }
                }
            }
        }
    }

    fn attribute(&mut self) -> Option<Attribute> {
        // A leading '=' belongs to the name
        let start = self.pos;
        self.pos += 1;
        self.take_until(|b| is_space(b) || b == b'/' || b == b'>' || b == b'=');
        let name = clean(&self.input[start..self.pos].to_ascii_lowercase());

        self.skip_space();
        if self.peek() != Some(b'=') {
            return Some(Attribute::new(name, ""));
        }
        self.pos += 1;
        self.skip_space();

        let raw = match self.peek()? {
            quote @ (b'"' | b'\'') => {
                self.pos += 1;
                let value = self.take_until(|b| b == quote);
                if self.at_eof() {
                    return None;
                }
                self.pos += 1;
                value
            }
            b'>' => "",
            _ => self.take_until(|b| is_space(b) || b == b'>'),
        };

        Some(Attribute::new(name, clean(&entities::decode(raw, true))))
    }

    fn start_tag(&mut self) -> Option<Token> {
        // After "<"
        self.pos += 1;
        let name = self.tag_name();
        let Some((attributes, self_closing)) = self.attributes() else {
            return self.finish();
        };
        if let Some(mode) = text_mode(&name) {
            self.pending = Some((name.clone(), mode));
        }
        Some(Token::StartTag {
            name,
            attributes,
            self_closing,
        })
    }

    fn end_tag(&mut self) -> Option<Token> {
        // After "</"
        self.pos += 2;
        let name = self.tag_name();
        if self.attributes().is_none() {
            return self.finish();
        }
        Some(Token::EndTag { name })
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some((tag, mode)) = self.pending.take() {
                if let Some(token) = self.raw_text(&tag, mode) {
                    return Some(token);
                }
            }
            if self.at_eof() {
                return None;
            }

            let rest = self.rest().as_bytes();
            if rest[0] != b'<' {
                return Some(self.text());
            }

            let next = rest.get(1).copied();
            match next {
                Some(b'!') if rest.starts_with(b"<!--") => return Some(self.comment()),
                Some(b'!') if rest.len() >= 9 && rest[2..9].eq_ignore_ascii_case(b"doctype") => {
                    return Some(self.doctype())
                }
                Some(b'!') => return Some(self.bogus_comment(2)),
                Some(b'?') => return Some(self.bogus_comment(1)),
                Some(b'/') => match rest.get(2).copied() {
                    Some(b) if b.is_ascii_alphabetic() => return self.end_tag(),
                    Some(b'>') => {
                        // "</>" is ignored entirely
                        self.pos += 3;
                        continue;
                    }
                    None => return Some(self.text()),
                    Some(_) => return Some(self.bogus_comment(2)),
                },
                Some(b) if b.is_ascii_alphabetic() => return self.start_tag(),
                _ => return Some(self.text()),
            }
        }
    }
}
