//! Core abstractions for capturing and replaying request bodies.
//!
//! # Architecture
//!
//! - **Request Abstraction** ([`request`]): the read-only request surface
//!   - [`HttpRequest`]: method, URI, version, headers, extensions and query parameters
//!   - [`RequestHeader`]: a request with its body detached
//!
//! - **Capture** ([`captured`]): the replayable request
//!   - [`CapturedRequest`]: owns the captured body and delegates everything else
//!
//! - **Body Views** ([`body`]): independent readers over the captured buffer
//!   - [`body::ReadSession`]: byte view, one fresh cursor per call
//!   - [`body::TextReader`]: character view, decoded with the request's charset
//!
//! - **Configuration** ([`config`]): size limit and charset selection
//!   - [`CaptureConfig`]
//!
//! - **Error Handling** ([`error`])
//!   - [`CaptureError`]: the body could not be drained
//!   - [`DecodeError`]: the body is not text in the request's charset
//!   - [`ExtractError`]: the body or query could not be deserialized

mod request;
pub use request::HttpRequest;
pub use request::RequestHeader;

mod captured;
pub use captured::CapturedRequest;

mod config;
pub use config::CaptureConfig;
pub use config::CaptureConfigBuilder;
pub use config::Charset;

mod error;
pub use error::CaptureError;
pub use error::DecodeError;
pub use error::ExtractError;

pub mod body;
