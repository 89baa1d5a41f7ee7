//! Settings applied while capturing a request body.

use encoding_rs::{Encoding, REPLACEMENT, UTF_8};
use tracing::debug;

use crate::protocol::{DecodeError, HttpRequest};

/// The charset a captured body is decoded with.
///
/// A request may declare a charset label that is not a known encoding. That only matters
/// to the text views of the body, so the label is kept and reported when text is asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Charset {
    Known(&'static Encoding),
    Unsupported(String),
}

impl Charset {
    pub fn encoding(&self) -> Result<&'static Encoding, DecodeError> {
        match self {
            Charset::Known(encoding) => Ok(*encoding),
            Charset::Unsupported(label) => Err(DecodeError::unsupported_charset(label)),
        }
    }
}

impl From<&'static Encoding> for Charset {
    fn from(encoding: &'static Encoding) -> Self {
        Charset::Known(encoding)
    }
}

#[derive(Debug, Clone)]
pub struct CaptureConfig {
    max_body_size: Option<usize>,
    default_charset: &'static Encoding,
    charset_from_content_type: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { max_body_size: None, default_charset: UTF_8, charset_from_content_type: true }
    }
}

impl CaptureConfig {
    pub fn builder() -> CaptureConfigBuilder {
        CaptureConfigBuilder::new()
    }

    /// The largest body, in bytes, a capture accepts. `None` means unbounded.
    pub fn max_body_size(&self) -> Option<usize> {
        self.max_body_size
    }

    pub fn default_charset(&self) -> &'static Encoding {
        self.default_charset
    }

    pub fn charset_from_content_type(&self) -> bool {
        self.charset_from_content_type
    }

    /// Picks the charset for `req`: the `charset` parameter of its `Content-Type` when
    /// enabled and present, otherwise the configured default.
    pub fn resolve_charset<R: HttpRequest>(&self, req: &R) -> Charset {
        if !self.charset_from_content_type {
            return Charset::Known(self.default_charset);
        }

        let Some(content_type) = req.content_type() else {
            return Charset::Known(self.default_charset);
        };

        match content_type.get_param(mime::CHARSET) {
            Some(label) => match lookup_label(label.as_str()) {
                Some(encoding) => Charset::Known(encoding),
                None => {
                    debug!(label = label.as_str(), "unknown charset declared by content-type");
                    Charset::Unsupported(label.as_str().to_string())
                }
            },
            None => Charset::Known(self.default_charset),
        }
    }
}

/// Looks up a WHATWG charset label.
///
/// Labels such as `iso-2022-kr` resolve to the `replacement` encoding, which turns any
/// input into a single error. Those are reported as unknown instead.
fn lookup_label(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.as_bytes()).filter(|encoding| *encoding != REPLACEMENT)
}

#[derive(Debug)]
pub struct CaptureConfigBuilder {
    max_body_size: Option<usize>,
    default_charset: &'static Encoding,
    charset_from_content_type: bool,
}

impl CaptureConfigBuilder {
    fn new() -> Self {
        let config = CaptureConfig::default();
        Self {
            max_body_size: config.max_body_size,
            default_charset: config.default_charset,
            charset_from_content_type: config.charset_from_content_type,
        }
    }

    pub fn max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = Some(max_body_size);
        self
    }

    pub fn default_charset(mut self, charset: &'static Encoding) -> Self {
        self.default_charset = charset;
        self
    }

    /// Sets the default charset by its WHATWG label, e.g. `"iso-8859-1"` or `"gbk"`.
    pub fn charset_label(self, label: &str) -> Result<Self, DecodeError> {
        match lookup_label(label) {
            Some(encoding) => Ok(self.default_charset(encoding)),
            None => Err(DecodeError::unsupported_charset(label)),
        }
    }

    pub fn charset_from_content_type(mut self, enable: bool) -> Self {
        self.charset_from_content_type = enable;
        self
    }

    pub fn build(self) -> CaptureConfig {
        CaptureConfig {
            max_body_size: self.max_body_size,
            default_charset: self.default_charset,
            charset_from_content_type: self.charset_from_content_type,
        }
    }
}
