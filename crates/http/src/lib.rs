//! Replayable request bodies for asynchronous HTTP handlers
//!
//! An inbound HTTP request body is a one-shot stream: once a logging step, a signature
//! check or an auditing filter has read it, the handler that actually needs the payload
//! finds it exhausted. This crate captures the body into an immutable in-memory buffer
//! exactly once and hands out a fresh, independent reader over that buffer on every
//! request, so any number of processing steps can each read the complete body.
//!
//! # Features
//!
//! - Drains `http_body::Body`, `std::io::Read` and `tokio::io::AsyncRead` sources
//! - Independent byte sessions usable as `Body`, `Read`, `BufRead`, `AsyncRead` or `Buf`
//! - Strict character decoding using the charset declared in `Content-Type`
//! - Optional body size limit, checked against `Content-Length` before reading
//! - Handler decorator that captures the body before dispatching
//!
//! # Example
//!
//! ```no_run
//! use std::error::Error;
//!
//! use bytes::Bytes;
//! use http::Request;
//! use http_body_util::{BodyExt, Full};
//! use replay_http::handler::{CaptureBody, Handler, make_handler};
//! use replay_http::protocol::{CapturedRequest, HttpRequest};
//! use tracing::info;
//!
//! #[tokio::main]
//! async fn main() {
//!     let handler = CaptureBody::new(make_handler(audit_then_handle));
//!
//!     let request = Request::post("/orders")
//!         .header(http::header::CONTENT_TYPE, "application/json")
//!         .body(Full::new(Bytes::from_static(b"{\"a\":1}")))
//!         .unwrap();
//!
//!     let value = handler.call(request).await.unwrap();
//!     assert_eq!(value["a"], 1);
//! }
//!
//! async fn audit_then_handle(request: CapturedRequest) -> Result<serde_json::Value, Box<dyn Error + Send + Sync>> {
//!     // the audit step reads the whole body
//!     let body = request.body().collect().await?.to_bytes();
//!     info!(path = request.path(), size = body.len(), "audit request body");
//!
//!     // and the business step reads it again from the beginning
//!     Ok(request.json()?)
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: the captured request, body views, configuration and errors
//! - [`handler`]: handler traits and the body capturing decorator
//!
//! # Limitations
//!
//! - The whole body is held in memory, use [`protocol::CaptureConfig`] to bound it
//! - Trailers of the original body are not kept

pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
