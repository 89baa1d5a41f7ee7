use std::io;
use std::io::Cursor;

use encoding_rs::Encoding;

use crate::protocol::DecodeError;

/// Strictly decodes `bytes` with `encoding`.
///
/// Malformed input is an error, never replaced with U+FFFD. No BOM is sniffed or
/// stripped, so valid text comes back exactly as it was encoded.
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> Result<String, DecodeError> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or_else(|| DecodeError::malformed(encoding.name()))
}

/// A character view of a captured body.
///
/// The whole body is decoded when the reader is created, so a reader that exists always
/// holds valid text. Reading goes through [`io::Read`] and [`io::BufRead`], which makes
/// line-oriented consumers (`reader.lines()`) work unchanged.
#[derive(Debug, Clone)]
pub struct TextReader {
    inner: Cursor<String>,
    charset: &'static Encoding,
}

impl TextReader {
    pub fn new(bytes: &[u8], charset: &'static Encoding) -> Result<Self, DecodeError> {
        let text = decode(bytes, charset)?;
        Ok(Self { inner: Cursor::new(text), charset })
    }

    /// The encoding the body was decoded from.
    pub fn charset(&self) -> &'static Encoding {
        self.charset
    }

    /// The complete decoded text, regardless of how much has been read.
    pub fn as_str(&self) -> &str {
        self.inner.get_ref()
    }

    pub fn into_string(self) -> String {
        self.inner.into_inner()
    }
}

impl io::Read for TextReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(&mut self.inner, buf)
    }
}

impl io::BufRead for TextReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        io::BufRead::fill_buf(&mut self.inner)
    }

    fn consume(&mut self, amt: usize) {
        io::BufRead::consume(&mut self.inner, amt);
    }
}
