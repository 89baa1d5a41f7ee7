//! The request abstraction shared by inbound requests and captured requests.
//!
//! [`HttpRequest`] is the read-only surface every downstream step relies on: method,
//! URI, version, headers, extensions and the conveniences derived from them. It is
//! implemented by the plain [`http::Request`], by [`RequestHeader`] (a request with its
//! body detached) and by [`CapturedRequest`](crate::protocol::CapturedRequest), which
//! forwards every call to the header it holds.

use http::header::{AsHeaderName, CONTENT_LENGTH, CONTENT_TYPE};
use http::request::Parts;
use http::{Extensions, HeaderMap, HeaderValue, Method, Request, Uri, Version};
use mime::Mime;
use serde::de::DeserializeOwned;

use crate::protocol::ExtractError;

/// Read access to everything in a request except its body.
pub trait HttpRequest {
    /// Returns a reference to the request's HTTP method.
    fn method(&self) -> &Method;

    /// Returns a reference to the request's URI.
    fn uri(&self) -> &Uri;

    /// Returns the request's HTTP version.
    fn version(&self) -> Version;

    /// Returns a reference to the request's headers.
    fn headers(&self) -> &HeaderMap;

    /// Returns a reference to the request's extensions.
    fn extensions(&self) -> &Extensions;

    fn path(&self) -> &str {
        self.uri().path()
    }

    fn query(&self) -> Option<&str> {
        self.uri().query()
    }

    /// Returns the first value of the header `name`.
    fn header<K: AsHeaderName>(&self, name: K) -> Option<&HeaderValue> {
        self.headers().get(name)
    }

    /// Returns the parsed `Content-Type`, or `None` when it is absent or malformed.
    fn content_type(&self) -> Option<Mime> {
        self.header(CONTENT_TYPE)?.to_str().ok()?.parse::<Mime>().ok()
    }

    /// Returns the declared `Content-Length`, or `None` when it is absent or malformed.
    fn content_length(&self) -> Option<u64> {
        self.header(CONTENT_LENGTH)?.to_str().ok()?.trim().parse::<u64>().ok()
    }

    /// Returns the first decoded query parameter named `name`.
    fn parameter(&self, name: &str) -> Option<String> {
        self.parameters().into_iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    /// Returns every decoded query parameter, in order, keeping duplicates.
    fn parameters(&self) -> Vec<(String, String)> {
        self.query()
            .and_then(|query| serde_urlencoded::from_str::<Vec<(String, String)>>(query).ok())
            .unwrap_or_default()
    }

    /// Deserializes the query string into `T`.
    fn query_as<T: DeserializeOwned>(&self) -> Result<T, ExtractError> {
        let query = self.query().ok_or(ExtractError::MissingQuery)?;
        serde_qs::from_str::<T>(query).map_err(ExtractError::query)
    }
}

impl<B> HttpRequest for Request<B> {
    fn method(&self) -> &Method {
        Request::method(self)
    }

    fn uri(&self) -> &Uri {
        Request::uri(self)
    }

    fn version(&self) -> Version {
        Request::version(self)
    }

    fn headers(&self) -> &HeaderMap {
        Request::headers(self)
    }

    fn extensions(&self) -> &Extensions {
        Request::extensions(self)
    }
}

/// Represents an HTTP request whose body has been detached.
///
/// This struct wraps a `http::Request<()>` so the head of a request can travel on its
/// own once the body has been taken away for capturing, and be reunited with a body
/// later through [`RequestHeader::body`].
#[derive(Debug)]
pub struct RequestHeader {
    inner: Request<()>,
}

impl AsRef<Request<()>> for RequestHeader {
    fn as_ref(&self) -> &Request<()> {
        &self.inner
    }
}

impl AsMut<Request<()>> for RequestHeader {
    fn as_mut(&mut self) -> &mut Request<()> {
        &mut self.inner
    }
}

impl RequestHeader {
    /// Splits a full request into its header and its body.
    pub fn split<B>(request: Request<B>) -> (Self, B) {
        let (parts, body) = request.into_parts();
        (Self::from(parts), body)
    }

    /// Consumes the header and returns the inner `Request<()>`.
    pub fn into_inner(self) -> Request<()> {
        self.inner
    }

    /// Attaches a body to this header, converting it into a full `Request<T>`.
    pub fn body<T>(self, body: T) -> Request<T> {
        self.inner.map(|_| body)
    }
}

impl HttpRequest for RequestHeader {
    fn method(&self) -> &Method {
        self.inner.method()
    }

    fn uri(&self) -> &Uri {
        self.inner.uri()
    }

    fn version(&self) -> Version {
        self.inner.version()
    }

    fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    fn extensions(&self) -> &Extensions {
        self.inner.extensions()
    }
}

/// Converts request parts into a RequestHeader.
impl From<Parts> for RequestHeader {
    #[inline]
    fn from(parts: Parts) -> Self {
        Self { inner: Request::from_parts(parts, ()) }
    }
}

/// Converts a bodyless request into a RequestHeader.
impl From<Request<()>> for RequestHeader {
    #[inline]
    fn from(inner: Request<()>) -> Self {
        Self { inner }
    }
}
