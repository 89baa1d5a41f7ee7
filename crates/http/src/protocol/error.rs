use std::io;
use thiserror::Error;

/// Raised while draining the original one-shot body into the capture buffer.
///
/// A capture either completes or fails as a whole, so holding one of these means no
/// buffer was ever exposed for the request.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("request body too large, exceed the limit {limit}")]
    TooLarge { limit: usize },

    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl CaptureError {
    pub fn too_large(limit: usize) -> Self {
        Self::TooLarge { limit }
    }

    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Raised only by the text views of a captured body. Byte views never decode and so
/// never see this error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("request body is not valid {charset}")]
    Malformed { charset: &'static str },

    #[error("unsupported charset: {label}")]
    UnsupportedCharset { label: String },
}

impl DecodeError {
    pub fn malformed(charset: &'static str) -> Self {
        Self::Malformed { charset }
    }

    pub fn unsupported_charset<S: ToString>(label: S) -> Self {
        Self::UnsupportedCharset { label: label.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("invalid json body: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("invalid form body: {source}")]
    Form {
        #[from]
        source: serde_urlencoded::de::Error,
    },

    #[error("invalid query string: {reason}")]
    Query { reason: String },

    #[error("has no query string")]
    MissingQuery,
}

impl ExtractError {
    pub fn query<S: ToString>(str: S) -> Self {
        Self::Query { reason: str.to_string() }
    }
}
