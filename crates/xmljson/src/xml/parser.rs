//! XML parser implementation

use indexmap::IndexMap;

use crate::cursor::{is_whitespace, Cursor};
use crate::error::{Error, ErrorKind, Pos, Result};
use crate::xml::model::{Content, Document, Element};

/// Configuration for the XML parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth and size
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }
}

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: Config,
    depth: u16,
}

impl<'a> Parser<'a> {
    /// Create a new parser with default configuration
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Create a new parser with custom configuration
    pub const fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            depth: 0,
        }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        let size = self.cursor.remaining().len();
        if self.config.max_size != 0 && size > self.config.max_size {
            return Err(Error::at(
                ErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                },
                self.cursor.position(),
            ));
        }

        if self.cursor.starts_with(b"\xEF\xBB\xBF") {
            self.cursor.advance_by(3);
        }
        let prolog_start = self.cursor.pos();

        let mut children = Vec::new();
        let mut seen_root = false;
        let mut seen_doctype = false;

        loop {
            self.cursor.skip_whitespace();
            let Some(b) = self.cursor.current() else {
                break;
            };
            if b != b'<' {
                return Err(self.error_here(ErrorKind::TextOutsideRoot));
            }

            if self.cursor.starts_with(b"<?") {
                let at_start = self.cursor.pos() == prolog_start;
                if let Some(pi) = self.parse_processing_instruction(at_start)? {
                    children.push(pi);
                }
            } else if self.cursor.starts_with(b"<!--") {
                children.push(self.parse_comment()?);
            } else if self.cursor.starts_with(b"<!DOCTYPE") {
                if seen_root || seen_doctype {
                    return Err(self.error_here(ErrorKind::MisplacedDoctype));
                }
                self.skip_doctype()?;
                seen_doctype = true;
            } else if self.cursor.starts_with(b"<!") {
                return Err(self.error_here(ErrorKind::TextOutsideRoot));
            } else if self.cursor.starts_with(b"</") {
                let pos = self.cursor.position();
                self.cursor.advance_by(2);
                let name = self.parse_name()?;
                return Err(Error::at(ErrorKind::UnexpectedClosingTag { name }, pos));
            } else if seen_root {
                return Err(self.error_here(ErrorKind::MultipleRoots));
            } else {
                children.push(Content::Element(self.parse_element()?));
                seen_root = true;
            }
        }

        if !seen_root {
            return Err(self.error_here(ErrorKind::MissingRoot));
        }

        Ok(Document { children })
    }

    fn parse_element(&mut self) -> Result<Element> {
        let start = self.cursor.position();
        self.expect_byte(b'<')?;
        self.enter()?;

        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        if self.cursor.consume(b'/') {
            self.expect_byte(b'>')?;
            self.exit();
            return Ok(Element {
                name,
                attributes,
                children: Vec::new(),
            });
        }

        self.expect_byte(b'>')?;
        let children = self.parse_children(&name, start)?;
        self.exit();

        Ok(Element {
            name,
            attributes,
            children,
        })
    }

    fn parse_children(&mut self, name: &str, start: Pos) -> Result<Vec<Content>> {
        let mut children = Vec::new();

        loop {
            match self.cursor.current() {
                None => {
                    return Err(Error::at(
                        ErrorKind::UnclosedElement {
                            name: name.to_string(),
                        },
                        start,
                    ));
                }
                Some(b'<') => {}
                Some(_) => {
                    children.push(Content::Text(self.read_decoded(b'<')?));
                    continue;
                }
            }

            if self.cursor.starts_with(b"</") {
                let pos = self.cursor.position();
                self.cursor.advance_by(2);
                let close_name = self.parse_name()?;
                if close_name != name {
                    return Err(Error::at(
                        ErrorKind::MismatchedTag {
                            expected: name.to_string(),
                            found: close_name,
                        },
                        pos,
                    ));
                }
                self.cursor.skip_whitespace();
                self.expect_byte(b'>')?;
                return Ok(children);
            }

            if self.cursor.starts_with(b"<!--") {
                children.push(self.parse_comment()?);
            } else if self.cursor.starts_with(b"<![CDATA[") {
                children.push(self.parse_cdata()?);
            } else if self.cursor.starts_with(b"<?") {
                if let Some(pi) = self.parse_processing_instruction(false)? {
                    children.push(pi);
                }
            } else if self.cursor.starts_with(b"<!") {
                return Err(self.expected("comment or CDATA section"));
            } else {
                children.push(Content::Element(self.parse_element()?));
            }
        }
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            let separated = self.skip_whitespace();
            match self.cursor.current() {
                Some(b'/' | b'>') => break,
                Some(_) if !separated => return Err(self.expected("whitespace")),
                Some(_) => {}
                None => return Err(self.error_here(ErrorKind::UnexpectedEof)),
            }

            let pos = self.cursor.position();
            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(Error::at(ErrorKind::DuplicateAttribute { name }, pos));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.expected("quoted attribute value")),
        };
        let start = self.cursor.position();
        self.cursor.advance();

        let value = self.read_decoded(quote)?;
        if !self.cursor.consume(quote) {
            return Err(Error::at(
                ErrorKind::Unterminated {
                    what: "attribute value",
                },
                start,
            ));
        }
        Ok(value)
    }

    /// Read character data up to `stop`, decoding references and line endings.
    fn read_decoded(&mut self, stop: u8) -> Result<String> {
        let mut out = String::new();
        let mut run = self.cursor.position();

        while let Some(b) = self.cursor.current() {
            if b == stop {
                break;
            }
            match b {
                b'&' => {
                    self.flush_run(&mut out, run)?;
                    out.push(self.parse_reference()?);
                    run = self.cursor.position();
                }
                b'\r' => {
                    self.flush_run(&mut out, run)?;
                    self.cursor.advance();
                    self.cursor.consume(b'\n');
                    out.push('\n');
                    run = self.cursor.position();
                }
                b'<' => return Err(self.invalid_character()),
                b']' if stop == b'<' && self.cursor.starts_with(b"]]>") => {
                    return Err(self.error_here(ErrorKind::CdataEndInText));
                }
                b if b < 0x20 && !is_whitespace(b) => return Err(self.invalid_character()),
                _ => self.cursor.advance(),
            }
        }

        self.flush_run(&mut out, run)?;
        Ok(out)
    }

    fn flush_run(&self, out: &mut String, run: Pos) -> Result<()> {
        let raw = self.cursor.slice_from(run.offset);
        out.push_str(char_data(raw, run)?);
        Ok(())
    }

    fn parse_reference(&mut self) -> Result<char> {
        let pos = self.cursor.position();
        self.cursor.advance();
        let start = self.cursor.pos();

        while let Some(b) = self.cursor.current() {
            if b == b';' || is_whitespace(b) || matches!(b, b'<' | b'&' | b'"' | b'\'') {
                break;
            }
            self.cursor.advance();
        }

        let entity = utf8(self.cursor.slice_from(start), pos)?.to_string();
        if !self.cursor.consume(b';') {
            return Err(Error::at(ErrorKind::InvalidEntity { entity }, pos));
        }

        let decoded = match entity.as_str() {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(&entity),
        };

        decoded.ok_or_else(|| Error::at(ErrorKind::InvalidEntity { entity }, pos))
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.cursor.position();

        match self.peek_char()? {
            Some(c) if is_name_start(c) => self.cursor.advance_by(c.len_utf8()),
            Some(_) => return Err(Error::at(ErrorKind::InvalidName, start)),
            None => return Err(self.error_here(ErrorKind::UnexpectedEof)),
        }
        while let Some(c) = self.peek_char()? {
            if !is_name_char(c) {
                break;
            }
            self.cursor.advance_by(c.len_utf8());
        }

        let raw = self.cursor.slice_from(start.offset);
        utf8(raw, start).map(str::to_string)
    }

    /// Decode the character at the cursor without consuming it
    fn peek_char(&self) -> Result<Option<char>> {
        let rest = self.cursor.remaining();
        if rest.is_empty() {
            return Ok(None);
        }
        let head = rest.get(..4).unwrap_or(rest);
        let valid = match std::str::from_utf8(head) {
            Ok(s) => s,
            Err(err) => head
                .get(..err.valid_up_to())
                .and_then(|b| std::str::from_utf8(b).ok())
                .unwrap_or_default(),
        };
        valid
            .chars()
            .next()
            .map(Some)
            .ok_or_else(|| self.error_here(ErrorKind::InvalidUtf8))
    }

    fn parse_comment(&mut self) -> Result<Content> {
        let start = self.cursor.position();
        self.cursor.advance_by(4);
        let raw = self.take_until(b"-->", "comment", start)?;
        let text = char_data(raw, start)?;
        if text.contains("--") || text.ends_with('-') {
            return Err(Error::at(ErrorKind::InvalidComment, start));
        }
        Ok(Content::Comment(text.to_string()))
    }

    fn parse_cdata(&mut self) -> Result<Content> {
        let start = self.cursor.position();
        self.cursor.advance_by(9);
        let raw = self.take_until(b"]]>", "CDATA section", start)?;
        Ok(Content::CData(char_data(raw, start)?.to_string()))
    }

    /// Returns `None` for the XML declaration, which is not a node.
    fn parse_processing_instruction(&mut self, at_document_start: bool) -> Result<Option<Content>> {
        let start = self.cursor.position();
        self.cursor.advance_by(2);
        let target = self.parse_name()?;
        let separated = self.skip_whitespace();
        if !separated && !self.cursor.starts_with(b"?>") {
            return Err(self.expected("whitespace"));
        }
        let raw = self.take_until(b"?>", "processing instruction", start)?;
        let data = char_data(raw, start)?.trim_end().to_string();

        if target.eq_ignore_ascii_case("xml") {
            if !at_document_start {
                return Err(Error::at(ErrorKind::MisplacedDeclaration, start));
            }
            if !declares_version(&data) {
                return Err(Error::at(ErrorKind::InvalidDeclaration, start));
            }
            return Ok(None);
        }

        Ok(Some(Content::ProcessingInstruction { target, data }))
    }

    fn skip_doctype(&mut self) -> Result<()> {
        let start = self.cursor.position();
        self.cursor.advance_by(9);
        let mut in_subset = false;
        let mut quote = None;

        while let Some(b) = self.cursor.current() {
            self.cursor.advance();
            match (quote, b) {
                (Some(q), b) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'[') => in_subset = true,
                (None, b']') => in_subset = false,
                (None, b'>') if !in_subset => return Ok(()),
                (None, _) => {}
            }
        }

        Err(Error::at(ErrorKind::Unterminated { what: "DOCTYPE" }, start))
    }

    /// Consume input up to and including `pattern`, returning what precedes it.
    fn take_until(&mut self, pattern: &[u8], what: &'static str, start: Pos) -> Result<&'a [u8]> {
        let from = self.cursor.pos();
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                let raw = self.cursor.slice_from(from);
                self.cursor.advance_by(pattern.len());
                return Ok(raw);
            }
            self.cursor.advance();
        }
        Err(Error::at(ErrorKind::Unterminated { what }, start))
    }

    fn enter(&mut self) -> Result<()> {
        self.depth = self.depth.saturating_add(1);
        if self.config.max_depth != 0 && self.depth > self.config.max_depth {
            return Err(self.error_here(ErrorKind::MaxDepthExceeded {
                max: self.config.max_depth,
            }));
        }
        Ok(())
    }

    fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else {
            Err(self.expected(&format!("'{}'", char::from(expected))))
        }
    }

    /// Returns whether any whitespace was skipped
    fn skip_whitespace(&mut self) -> bool {
        let before = self.cursor.pos();
        self.cursor.skip_whitespace();
        self.cursor.pos() != before
    }

    fn expected(&self, expected: &str) -> Error {
        if self.cursor.is_eof() {
            return self.error_here(ErrorKind::UnexpectedEof);
        }
        self.error_here(ErrorKind::Expected {
            expected: expected.to_string(),
            found: format!("{:?}", self.current_char()),
        })
    }

    fn invalid_character(&self) -> Error {
        self.error_here(ErrorKind::InvalidCharacter {
            found: self.current_char(),
        })
    }

    fn current_char(&self) -> char {
        let rest = self.cursor.remaining();
        let head = rest.get(..4).unwrap_or(rest);
        String::from_utf8_lossy(head)
            .chars()
            .next()
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    fn error_here(&self, kind: ErrorKind) -> Error {
        Error::at(kind, self.cursor.position())
    }
}

fn utf8(bytes: &[u8], at: Pos) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|_| Error::at(ErrorKind::InvalidUtf8, at))
}

/// Decoded text, rejecting code points outside the XML `Char` production
fn char_data(bytes: &[u8], at: Pos) -> Result<&str> {
    let text = utf8(bytes, at)?;
    match text.chars().find(|c| !is_xml_char(*c)) {
        Some(found) => Err(Error::at(ErrorKind::InvalidCharacter { found }, at)),
        None => Ok(text),
    }
}

const fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

const fn is_name_start(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

const fn is_name_char(c: char) -> bool {
    is_name_start(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

/// `version` must be the first pseudo-attribute of the declaration
fn declares_version(data: &str) -> bool {
    data.strip_prefix("version")
        .map(|rest| rest.trim_start_matches(|c: char| c.is_ascii_whitespace()))
        .is_some_and(|rest| rest.starts_with('='))
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()?
    } else {
        return None;
    };

    char::from_u32(code).filter(|ch| is_xml_char(*ch))
}
