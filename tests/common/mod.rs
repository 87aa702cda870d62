//! Shared test support: a minimal byte-level parser good enough to read
//! this crate's own serializer output back into a [`ParsedDocument`].

#![allow(dead_code)]

use pdf_splice::{
    Dict, Document, Error, Object, ObjectRef, PageSource, ParsedDocument, Parser, Ref, Result,
};

/// Reads classic-xref PDF files produced by the crate under test. Not a
/// general-purpose parser: object streams, incremental updates, and
/// encryption are out of its world.
pub struct SimpleParser;

impl Parser for SimpleParser {
    fn parse(&self, bytes: &[u8]) -> Result<ParsedDocument> {
        let mut lexer = Lexer::new(bytes);
        let version = lexer.header_version();

        let mut objects: Vec<(ObjectRef, Object)> = Vec::new();
        loop {
            lexer.skip_whitespace_and_comments();
            if lexer.peek_keyword(b"xref") || lexer.at_end() {
                break;
            }
            objects.push(lexer.indirect_object()?);
        }

        let info = match lexer.seek_keyword(b"trailer") {
            true => {
                lexer.skip_whitespace_and_comments();
                match lexer.value()? {
                    Object::Dictionary(trailer) => match trailer.get("Info") {
                        Some(Object::Dictionary(info)) => Some(info.clone()),
                        _ => None,
                    },
                    _ => None,
                }
            },
            false => None,
        };

        Ok(ParsedDocument {
            objects,
            version,
            info,
        })
    }
}

struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn header_version(&mut self) -> Option<f32> {
        let rest = &self.bytes[self.pos..];
        if !rest.starts_with(b"%PDF-") {
            return None;
        }
        let line_end = rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
        let version = std::str::from_utf8(&rest[5..line_end])
            .ok()?
            .trim()
            .parse()
            .ok();
        self.pos += line_end;
        version
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b' ' | b'\t' | b'\r' | b'\n' | b'\x0c' | b'\0' => {
                    self.pos += 1;
                },
                b'%' => {
                    while let Some(b) = self.bump() {
                        if b == b'\n' {
                            break;
                        }
                    }
                },
                _ => break,
            }
        }
    }

    fn peek_keyword(&self, keyword: &[u8]) -> bool {
        self.bytes[self.pos..].starts_with(keyword)
    }

    fn eat_keyword(&mut self, keyword: &[u8]) -> bool {
        if self.peek_keyword(keyword) {
            self.pos += keyword.len();
            true
        } else {
            false
        }
    }

    /// Scan forward to just past the next occurrence of `keyword`.
    fn seek_keyword(&mut self, keyword: &[u8]) -> bool {
        while self.pos < self.bytes.len() {
            if self.eat_keyword(keyword) {
                return true;
            }
            self.pos += 1;
        }
        false
    }

    fn indirect_object(&mut self) -> Result<(ObjectRef, Object)> {
        let id = self.unsigned()? as u32;
        self.skip_whitespace_and_comments();
        let gen = self.unsigned()? as u16;
        self.skip_whitespace_and_comments();
        if !self.eat_keyword(b"obj") {
            return Err(Error::Construction(format!(
                "expected obj keyword at byte {}",
                self.pos
            )));
        }
        self.skip_whitespace_and_comments();
        let body = self.value()?;
        self.skip_whitespace_and_comments();
        if !self.eat_keyword(b"endobj") {
            return Err(Error::Construction(format!(
                "expected endobj keyword at byte {}",
                self.pos
            )));
        }
        Ok((ObjectRef::new(id, gen), body))
    }

    fn value(&mut self) -> Result<Object> {
        self.skip_whitespace_and_comments();
        match self.peek() {
            Some(b'<') if self.peek_keyword(b"<<") => {
                let dict = self.dictionary()?;
                self.stream_or_dict(dict)
            },
            Some(b'<') => self.hex_string(),
            Some(b'(') => self.literal_string(),
            Some(b'/') => Ok(Object::Name(self.name()?)),
            Some(b'[') => self.array(),
            Some(b't') if self.eat_keyword(b"true") => Ok(Object::Boolean(true)),
            Some(b'f') if self.eat_keyword(b"false") => Ok(Object::Boolean(false)),
            Some(b'n') if self.eat_keyword(b"null") => Ok(Object::Null),
            Some(b) if b.is_ascii_digit() || b == b'+' || b == b'-' || b == b'.' => {
                self.number_or_reference()
            },
            other => Err(Error::Construction(format!(
                "unexpected byte {:?} at {}",
                other, self.pos
            ))),
        }
    }

    fn dictionary(&mut self) -> Result<Dict> {
        self.pos += 2; // <<
        let mut dict = Dict::new();
        loop {
            self.skip_whitespace_and_comments();
            if self.eat_keyword(b">>") {
                return Ok(dict);
            }
            let key = self.name()?;
            let value = self.value()?;
            dict.insert(key, value);
        }
    }

    fn stream_or_dict(&mut self, dict: Dict) -> Result<Object> {
        let checkpoint = self.pos;
        self.skip_whitespace_and_comments();
        if !self.eat_keyword(b"stream") {
            self.pos = checkpoint;
            return Ok(Object::Dictionary(dict));
        }
        if self.peek() == Some(b'\r') {
            self.pos += 1;
        }
        if self.peek() == Some(b'\n') {
            self.pos += 1;
        }
        let length = dict
            .get("Length")
            .and_then(|l| l.as_integer())
            .ok_or_else(|| Error::Construction("stream without integer /Length".to_string()))?
            as usize;
        if self.pos + length > self.bytes.len() {
            return Err(Error::Construction("stream payload truncated".to_string()));
        }
        let data = self.bytes[self.pos..self.pos + length].to_vec();
        self.pos += length;
        self.skip_whitespace_and_comments();
        if !self.eat_keyword(b"endstream") {
            return Err(Error::Construction("missing endstream".to_string()));
        }
        Ok(Object::Stream {
            dict,
            data: data.into(),
        })
    }

    fn array(&mut self) -> Result<Object> {
        self.pos += 1; // [
        let mut items = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            if self.peek() == Some(b']') {
                self.pos += 1;
                return Ok(Object::Array(items));
            }
            items.push(self.value()?);
        }
    }

    fn name(&mut self) -> Result<String> {
        if self.bump() != Some(b'/') {
            return Err(Error::Construction(format!(
                "expected name at byte {}",
                self.pos
            )));
        }
        let mut out = String::new();
        while let Some(b) = self.peek() {
            match b {
                b'#' => {
                    self.pos += 1;
                    let hi = self.bump().and_then(hex_digit);
                    let lo = self.bump().and_then(hex_digit);
                    match (hi, lo) {
                        (Some(hi), Some(lo)) => out.push((hi * 16 + lo) as char),
                        _ => {
                            return Err(Error::Construction(
                                "truncated #-escape in name".to_string(),
                            ))
                        },
                    }
                },
                b' ' | b'\t' | b'\r' | b'\n' | b'\x0c' | b'\0' | b'/' | b'<' | b'>' | b'['
                | b']' | b'(' | b')' | b'%' => break,
                other => {
                    out.push(other as char);
                    self.pos += 1;
                },
            }
        }
        Ok(out)
    }

    fn literal_string(&mut self) -> Result<Object> {
        self.pos += 1; // (
        let mut out = Vec::new();
        let mut depth = 1usize;
        while let Some(b) = self.bump() {
            match b {
                b'\\' => match self.bump() {
                    Some(b'n') => out.push(b'\n'),
                    Some(b'r') => out.push(b'\r'),
                    Some(b't') => out.push(b'\t'),
                    Some(b'b') => out.push(0x08),
                    Some(b'f') => out.push(0x0c),
                    Some(other @ (b'(' | b')' | b'\\')) => out.push(other),
                    Some(other) => out.push(other),
                    None => break,
                },
                b'(' => {
                    depth += 1;
                    out.push(b);
                },
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(Object::String(out));
                    }
                    out.push(b);
                },
                other => out.push(other),
            }
        }
        Err(Error::Construction("unterminated literal string".to_string()))
    }

    fn hex_string(&mut self) -> Result<Object> {
        self.pos += 1; // <
        let mut digits = Vec::new();
        while let Some(b) = self.bump() {
            match b {
                b'>' => {
                    if digits.len() % 2 == 1 {
                        digits.push(0);
                    }
                    let bytes = digits.chunks(2).map(|p| p[0] * 16 + p[1]).collect();
                    return Ok(Object::String(bytes));
                },
                b' ' | b'\t' | b'\r' | b'\n' => {},
                other => match hex_digit(other) {
                    Some(d) => digits.push(d),
                    None => {
                        return Err(Error::Construction(format!(
                            "bad hex digit {:?} in string",
                            other as char
                        )))
                    },
                },
            }
        }
        Err(Error::Construction("unterminated hex string".to_string()))
    }

    /// A number, or an `N G R` indirect reference when the lookahead fits.
    fn number_or_reference(&mut self) -> Result<Object> {
        let start = self.pos;
        let first = self.number()?;

        if let Object::Integer(id) = first {
            let checkpoint = self.pos;
            self.skip_whitespace_and_comments();
            if let Some(b) = self.peek() {
                if b.is_ascii_digit() {
                    if let Ok(Object::Integer(gen)) = self.number() {
                        self.skip_whitespace_and_comments();
                        if self.eat_keyword(b"R") && id >= 0 && gen >= 0 {
                            return Ok(Object::Reference(Ref::Unresolved(ObjectRef::new(
                                id as u32, gen as u16,
                            ))));
                        }
                    }
                }
            }
            self.pos = checkpoint;
        }

        self.pos = start;
        self.number()
    }

    fn number(&mut self) -> Result<Object> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+') | Some(b'-')) {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(b) if b.is_ascii_digit() || b == b'.') {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| Error::Construction("non-ascii number".to_string()))?;
        if text.contains('.') {
            text.parse()
                .map(Object::Real)
                .map_err(|_| Error::Construction(format!("bad real {:?}", text)))
        } else {
            text.parse()
                .map(Object::Integer)
                .map_err(|_| Error::Construction(format!("bad integer {:?}", text)))
        }
    }

    fn unsigned(&mut self) -> Result<i64> {
        match self.number()? {
            Object::Integer(n) if n >= 0 => Ok(n),
            other => Err(Error::Construction(format!(
                "expected unsigned integer, got {:?}",
                other
            ))),
        }
    }
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// A page dictionary tagged with an integer marker for order assertions.
pub fn page_dict(marker: i64) -> Dict {
    let mut d = Dict::new();
    d.insert("Type".to_string(), Object::Name("Page".to_string()));
    d.insert("Marker".to_string(), Object::Integer(marker));
    d
}

/// A document holding `markers.len()` pages, in marker order.
pub fn doc_with_markers(markers: &[i64]) -> Document {
    let mut doc = Document::new();
    for &m in markers {
        doc.insert(isize::MAX, PageSource::Page(page_dict(m)))
            .expect("page insert");
    }
    doc
}

/// Marker of a page, looked up through the document.
pub fn marker_of(doc: &Document, id: pdf_splice::ObjId) -> i64 {
    doc.get(id)
        .and_then(|o| o.as_dict())
        .and_then(|d| d.get("Marker"))
        .and_then(|m| m.as_integer())
        .expect("marked page")
}
