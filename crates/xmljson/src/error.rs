//! Error types for xmljson

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Which stage of a conversion failed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Input was empty or whitespace-only and never reached the parser
    InputEmpty,
    /// Input is not well-formed XML
    Parse,
    /// The parsed tree could not be turned into a value
    Conversion,
}

/// Error kind for detailed categorization
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("input is empty")]
    EmptyInput,
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("expected {expected}, found {found}")]
    Expected { expected: String, found: String },
    #[error("mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedTag { expected: String, found: String },
    #[error("unexpected closing tag </{name}>")]
    UnexpectedClosingTag { name: String },
    #[error("unclosed element <{name}>")]
    UnclosedElement { name: String },
    #[error("document has no root element")]
    MissingRoot,
    #[error("extra content after the root element")]
    MultipleRoots,
    #[error("text is not allowed outside the root element")]
    TextOutsideRoot,
    #[error("duplicate attribute: {name}")]
    DuplicateAttribute { name: String },
    #[error("invalid entity reference: &{entity};")]
    InvalidEntity { entity: String },
    #[error("invalid name")]
    InvalidName,
    #[error("'--' is not allowed inside comments")]
    InvalidComment,
    #[error("XML declaration allowed only at the start of the document")]
    MisplacedDeclaration,
    #[error("XML declaration must begin with a version")]
    InvalidDeclaration,
    #[error("']]>' is not allowed in character data")]
    CdataEndInText,
    #[error("DOCTYPE must appear once, before the root element")]
    MisplacedDoctype,
    #[error("invalid character {found:?}")]
    InvalidCharacter { found: char },
    #[error("invalid utf-8")]
    InvalidUtf8,
    #[error("unterminated {what}")]
    Unterminated { what: &'static str },
    #[error("max depth exceeded: {max}")]
    MaxDepthExceeded { max: u16 },
    #[error("max size exceeded: {max}")]
    MaxSizeExceeded { max: usize },
    #[error("conversion nesting exceeded: {max}")]
    ConversionDepthExceeded { max: u16 },
}

impl ErrorKind {
    /// Stage this kind of error belongs to
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::EmptyInput => ErrorClass::InputEmpty,
            Self::ConversionDepthExceeded { .. } => ErrorClass::Conversion,
            _ => ErrorClass::Parse,
        }
    }
}

/// Main error type for xmljson
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("error at {}: {}", .span.start, .message)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Input was empty or blank
    pub fn empty_input() -> Self {
        Self::new(ErrorKind::EmptyInput, Span::empty())
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, pos: Pos) -> Self {
        Self::new(kind, Span::at(pos))
    }
}

/// Result type alias for xmljson
pub type Result<T> = std::result::Result<T, Error>;
