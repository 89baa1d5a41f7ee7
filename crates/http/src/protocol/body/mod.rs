//! Captured request body handling.
//!
//! A request body arrives as a one-shot stream. This module turns it into something
//! that can be read any number of times:
//!
//! - [`collect`]: drains the one-shot source (an `http_body::Body`, a blocking
//!   `std::io::Read` or a `tokio::io::AsyncRead`) into one immutable [`bytes::Bytes`]
//! - [`ReadSession`]: a fresh, independent cursor over that buffer, handed out every time
//!   somebody asks for the body
//! - [`TextReader`]: the character view of the buffer, decoded strictly with the
//!   request's charset
//!
//! The buffer is never written to after the capture, so any number of sessions and
//! readers may exist at the same time without coordination.

pub mod collect;
mod session;
mod text;

pub use session::ReadSession;
pub use text::TextReader;
pub use text::decode;
