//! A request whose body can be read more than once.
//!
//! [`CapturedRequest`] drains the body of an inbound request into memory exactly once,
//! when it is constructed, and from then on answers every body request with a fresh
//! [`ReadSession`] over that buffer. Everything else about the request is answered by
//! the original [`RequestHeader`], unchanged.
//!
//! Capturing takes the original request by value. Once a request has been captured its
//! one-shot body is gone, so there is no way left to read the exhausted stream by
//! mistake: all body access goes through the captured buffer.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use http::Request;
//! use http_body_util::{BodyExt, Full};
//! use replay_http::protocol::{CapturedRequest, HttpRequest};
//!
//! # tokio_test_block_on(async {
//! let request = Request::post("/orders").body(Full::new(Bytes::from_static(b"{\"a\":1}"))).unwrap();
//! let captured = CapturedRequest::capture(request).await.unwrap();
//!
//! // a logging step reads the body ...
//! let logged = captured.body().collect().await.unwrap().to_bytes();
//! // ... and the deserialization step reads it again from the start
//! let text = captured.text().unwrap();
//!
//! assert_eq!(logged, Bytes::from_static(b"{\"a\":1}"));
//! assert_eq!(text, "{\"a\":1}");
//! assert_eq!(captured.path(), "/orders");
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::error::Error;
use std::io::Read;

use bytes::Bytes;
use encoding_rs::{Encoding, UTF_8};
use http::{Extensions, HeaderMap, Method, Request, Uri, Version};
use http_body::Body;
use serde::de::DeserializeOwned;
use tokio::io::AsyncRead;
use tracing::{debug, warn};

use crate::ensure;
use crate::protocol::body::{ReadSession, TextReader, collect, decode};
use crate::protocol::{CaptureConfig, CaptureError, Charset, DecodeError, ExtractError, HttpRequest, RequestHeader};

/// A request with its body captured into an immutable in-memory buffer.
#[derive(Debug)]
pub struct CapturedRequest {
    header: RequestHeader,
    body: Bytes,
    charset: Charset,
}

impl CapturedRequest {
    /// Captures `request` with the default [`CaptureConfig`].
    pub async fn capture<B>(request: Request<B>) -> Result<Self, CaptureError>
    where
        B: Body,
        B::Error: Into<Box<dyn Error + Send + Sync>>,
    {
        Self::capture_with(request, &CaptureConfig::default()).await
    }

    /// Reads the whole body of `request` before returning.
    ///
    /// Fails when the body stream yields an error or exceeds the configured size limit. A
    /// `Content-Length` already above the limit fails before anything is read.
    pub async fn capture_with<B>(request: Request<B>, config: &CaptureConfig) -> Result<Self, CaptureError>
    where
        B: Body,
        B::Error: Into<Box<dyn Error + Send + Sync>>,
    {
        let (header, body) = RequestHeader::split(request);
        check_declared_length(&header, config).inspect_err(|e| log_failure(&header, e))?;

        let bytes = collect::collect_body(body, config.max_body_size()).await.inspect_err(|e| log_failure(&header, e))?;
        Ok(Self::from_parts(header, bytes, config))
    }

    /// Captures a body served by a blocking reader; the calling thread blocks until the
    /// reader is exhausted.
    pub fn capture_from_reader<H, R>(header: H, reader: R, config: &CaptureConfig) -> Result<Self, CaptureError>
    where
        H: Into<RequestHeader>,
        R: Read,
    {
        let header = header.into();
        check_declared_length(&header, config).inspect_err(|e| log_failure(&header, e))?;

        let bytes = collect::read_body(reader, config.max_body_size()).inspect_err(|e| log_failure(&header, e))?;
        Ok(Self::from_parts(header, bytes, config))
    }

    pub async fn capture_from_async_read<H, R>(header: H, reader: R, config: &CaptureConfig) -> Result<Self, CaptureError>
    where
        H: Into<RequestHeader>,
        R: AsyncRead + Unpin,
    {
        let header = header.into();
        check_declared_length(&header, config).inspect_err(|e| log_failure(&header, e))?;

        let bytes =
            collect::read_body_async(reader, config.max_body_size()).await.inspect_err(|e| log_failure(&header, e))?;
        Ok(Self::from_parts(header, bytes, config))
    }

    /// Wraps a body that is already in memory.
    pub fn from_parts<H, T>(header: H, body: T, config: &CaptureConfig) -> Self
    where
        H: Into<RequestHeader>,
        T: Into<Bytes>,
    {
        let header = header.into();
        let body = body.into();
        let charset = config.resolve_charset(&header);

        debug!(method = %header.method(), path = header.path(), size = body.len(), "captured request body");

        Self { header, body, charset }
    }

    /// Returns a new session positioned at the start of the captured body.
    ///
    /// Every call returns an independent session; reading one never affects another.
    pub fn body(&self) -> ReadSession {
        ReadSession::new(self.body.clone())
    }

    /// Returns the whole captured body. The returned `Bytes` shares the buffer.
    pub fn body_bytes(&self) -> Bytes {
        self.body.clone()
    }

    /// Returns a character reader over the captured body.
    ///
    /// Fails if the body is not valid in the request's charset, or if the request declared
    /// a charset that is not known.
    pub fn body_reader(&self) -> Result<TextReader, DecodeError> {
        TextReader::new(&self.body, self.charset()?)
    }

    pub fn text(&self) -> Result<String, DecodeError> {
        decode(&self.body, self.charset()?)
    }

    /// Deserializes the captured body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ExtractError> {
        let charset = self.charset()?;
        if charset == UTF_8 {
            return Ok(serde_json::from_slice(&self.body)?);
        }

        let text = decode(&self.body, charset)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Deserializes the captured body as `application/x-www-form-urlencoded` data.
    pub fn form<T: DeserializeOwned>(&self) -> Result<T, ExtractError> {
        Ok(serde_urlencoded::from_bytes(&self.body)?)
    }

    /// The charset used by the text views of the body.
    pub fn charset(&self) -> Result<&'static Encoding, DecodeError> {
        self.charset.encoding()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn request_header(&self) -> &RequestHeader {
        &self.header
    }

    /// Reassembles a standard request whose body is a fresh [`ReadSession`].
    ///
    /// The header, extensions included, is moved into the new request. Downstream code can
    /// call [`ReadSession::replay`] on the body to read it again.
    pub fn into_request(self) -> Request<ReadSession> {
        self.header.body(ReadSession::new(self.body))
    }

    pub fn into_parts(self) -> (RequestHeader, Bytes) {
        (self.header, self.body)
    }
}

impl HttpRequest for CapturedRequest {
    fn method(&self) -> &Method {
        self.header.method()
    }

    fn uri(&self) -> &Uri {
        self.header.uri()
    }

    fn version(&self) -> Version {
        self.header.version()
    }

    fn headers(&self) -> &HeaderMap {
        self.header.headers()
    }

    fn extensions(&self) -> &Extensions {
        self.header.extensions()
    }
}

fn check_declared_length(header: &RequestHeader, config: &CaptureConfig) -> Result<(), CaptureError> {
    if let (Some(limit), Some(declared)) = (config.max_body_size(), header.content_length()) {
        ensure!(usize::try_from(declared).is_ok_and(|declared| declared <= limit), CaptureError::too_large(limit));
    }
    Ok(())
}

fn log_failure(header: &RequestHeader, e: &CaptureError) {
    warn!(method = %header.method(), path = header.path(), cause = %e, "capture request body failed");
}
