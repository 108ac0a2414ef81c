//! Raw XML handed to a conversion

use crate::number::is_js_whitespace;

/// XML source bytes plus an optional name used in log fields
#[derive(Clone, Copy, Debug)]
pub struct Input<'a> {
    source: &'a [u8],
    filename: Option<&'a str>,
}

impl<'a> Input<'a> {
    pub const fn from_bytes(source: &'a [u8]) -> Self {
        Self {
            source,
            filename: None,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub const fn from_str(source: &'a str) -> Self {
        Self::from_bytes(source.as_bytes())
    }

    /// Name the input, e.g. the path it was read from
    pub const fn with_filename(self, filename: &'a str) -> Self {
        Self {
            filename: Some(filename),
            ..self
        }
    }

    pub const fn as_bytes(&self) -> &'a [u8] {
        self.source
    }

    pub const fn filename(&self) -> Option<&'a str> {
        self.filename
    }

    pub const fn len(&self) -> usize {
        self.source.len()
    }

    /// No characters other than whitespace and byte order marks.
    ///
    /// Such input is rejected before parsing.
    pub fn is_blank(&self) -> bool {
        String::from_utf8_lossy(self.source)
            .chars()
            .all(is_js_whitespace)
    }
}
