//! Conversions between text and bytes in a named charset.
//!
//! Charsets are named by their WHATWG labels (`"utf-8"`, `"gbk"`, `"iso-8859-1"`, ...).
//! Both directions are strict: malformed input and characters the charset can not
//! represent are errors rather than replacement characters.

use encoding_rs::{Encoding, REPLACEMENT};
use thiserror::Error;

/// The charset used when none is given.
pub const DEFAULT_CHARSET: &str = "utf-8";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CharsetError {
    #[error("unsupported charset: {label}")]
    UnsupportedCharset { label: String },

    #[error("bytes are not valid {charset}")]
    Malformed { charset: &'static str },

    #[error("text can not be represented in {charset}")]
    Unmappable { charset: &'static str },
}

impl CharsetError {
    pub fn unsupported_charset<S: ToString>(label: S) -> Self {
        Self::UnsupportedCharset { label: label.to_string() }
    }
}

/// Resolves a charset label.
///
/// Labels that map to the `replacement` encoding (`iso-2022-kr`, `hz-gb-2312`, ...) can
/// not decode anything and are reported as unsupported.
pub fn lookup(label: &str) -> Result<&'static Encoding, CharsetError> {
    Encoding::for_label(label.trim().as_bytes())
        .filter(|encoding| *encoding != REPLACEMENT)
        .ok_or_else(|| CharsetError::unsupported_charset(label))
}

/// Decodes `bytes` from `charset`. No BOM is sniffed or removed.
pub fn to_text(bytes: &[u8], charset: &str) -> Result<String, CharsetError> {
    let encoding = lookup(charset)?;
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or(CharsetError::Malformed { charset: encoding.name() })
}

/// Encodes `text` into `charset`.
///
/// UTF-16 labels are rejected: only charsets that can be written by the encoder are
/// accepted.
pub fn to_bytes(text: &str, charset: &str) -> Result<Vec<u8>, CharsetError> {
    let encoding = lookup(charset)?;
    if encoding.output_encoding() != encoding {
        return Err(CharsetError::unsupported_charset(charset));
    }

    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(CharsetError::Unmappable { charset: encoding.name() });
    }
    Ok(bytes.into_owned())
}

/// [`to_text`] with [`DEFAULT_CHARSET`].
pub fn utf8_to_text(bytes: &[u8]) -> Result<String, CharsetError> {
    to_text(bytes, DEFAULT_CHARSET)
}
