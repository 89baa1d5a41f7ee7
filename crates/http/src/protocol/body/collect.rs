//! Draining a one-shot body into a single in-memory buffer.
//!
//! Each function here reads its source to exhaustion exactly once. On success the source
//! is spent and the returned [`Bytes`] is the only copy of the body; on failure nothing
//! partial is returned.

use std::error::Error;
use std::io;
use std::io::Read;

use bytes::Bytes;
use http_body::Body;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::ensure;
use crate::protocol::CaptureError;

/// Collects every data frame of `body`. Trailers are dropped.
pub async fn collect_body<B>(body: B, limit: Option<usize>) -> Result<Bytes, CaptureError>
where
    B: Body,
    B::Error: Into<Box<dyn Error + Send + Sync>>,
{
    match limit {
        Some(limit) => Limited::new(body, limit)
            .collect()
            .await
            .map(|collected| collected.to_bytes())
            .map_err(|e| match e.downcast::<LengthLimitError>() {
                Ok(_) => CaptureError::too_large(limit),
                Err(e) => body_error(e),
            }),
        None => body.collect().await.map(|collected| collected.to_bytes()).map_err(|e| body_error(e.into())),
    }
}

/// Reads `reader` to the end, blocking the current thread.
pub fn read_body<R: Read>(mut reader: R, limit: Option<usize>) -> Result<Bytes, CaptureError> {
    let mut buf = Vec::new();
    match limit {
        Some(limit) => {
            reader.take(probe_len(limit)).read_to_end(&mut buf)?;
            ensure!(buf.len() <= limit, CaptureError::too_large(limit));
        }
        None => {
            reader.read_to_end(&mut buf)?;
        }
    }
    Ok(Bytes::from(buf))
}

/// Reads `reader` to the end.
pub async fn read_body_async<R: AsyncRead + Unpin>(mut reader: R, limit: Option<usize>) -> Result<Bytes, CaptureError> {
    let mut buf = Vec::new();
    match limit {
        Some(limit) => {
            reader.take(probe_len(limit)).read_to_end(&mut buf).await?;
            ensure!(buf.len() <= limit, CaptureError::too_large(limit));
        }
        None => {
            reader.read_to_end(&mut buf).await?;
        }
    }
    Ok(Bytes::from(buf))
}

// one byte past the limit is enough to tell an oversized body apart
fn probe_len(limit: usize) -> u64 {
    u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1)
}

fn body_error(e: Box<dyn Error + Send + Sync>) -> CaptureError {
    match e.downcast::<io::Error>() {
        Ok(e) => CaptureError::io(*e),
        Err(e) => CaptureError::invalid_body(e),
    }
}

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;
    use http_body::Frame;
    use http_body_util::{Full, StreamBody};

    use super::*;

    fn chunked(chunks: Vec<Result<&'static str, io::Error>>) -> StreamBody<impl futures::Stream<Item = Result<Frame<Bytes>, io::Error>>> {
        let stream = futures::stream::iter(chunks).map_ok(|s| Frame::data(Bytes::from_static(s.as_bytes())));
        StreamBody::new(stream)
    }

    #[tokio::test]
    async fn collect_chunks() {
        let body = chunked(vec![Ok("{\"a\""), Ok(":"), Ok("1}")]);

        let bytes = collect_body(body, None).await.unwrap();
        assert_eq!(bytes, Bytes::from_static(b"{\"a\":1}"));
    }

    #[tokio::test]
    async fn collect_fails_mid_stream() {
        let body = chunked(vec![Ok("partial"), Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"))]);

        let result = collect_body(body, None).await;
        match result {
            Err(CaptureError::Io { source }) => assert_eq!(source.kind(), io::ErrorKind::ConnectionReset),
            other => panic!("expect io error, but got {other:?}"),
        }
    }

    #[tokio::test]
    async fn collect_non_io_error() {
        let stream = futures::stream::iter(vec![Err::<Frame<Bytes>, _>("bad chunk size")]);
        let body = StreamBody::new(stream);

        let result = collect_body(body, None).await;
        assert!(matches!(result, Err(CaptureError::InvalidBody { reason }) if reason == "bad chunk size"));
    }

    #[tokio::test]
    async fn collect_with_limit() {
        let body = chunked(vec![Ok("12345"), Ok("67890")]);
        assert!(matches!(collect_body(body, Some(9)).await, Err(CaptureError::TooLarge { limit: 9 })));

        let body = chunked(vec![Ok("12345"), Ok("67890")]);
        assert_eq!(collect_body(body, Some(10)).await.unwrap(), Bytes::from_static(b"1234567890"));
    }

    #[tokio::test]
    async fn collect_empty() {
        let bytes = collect_body(Full::new(Bytes::new()), Some(0)).await.unwrap();
        assert!(bytes.is_empty());
    }

    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated transfer"));
            }
            self.served = true;
            buf[..3].copy_from_slice(b"abc");
            Ok(3)
        }
    }

    #[test]
    fn read_blocking() {
        assert_eq!(read_body(&b"hello"[..], None).unwrap(), Bytes::from_static(b"hello"));
        assert_eq!(read_body(&b"hello"[..], Some(5)).unwrap(), Bytes::from_static(b"hello"));
        assert!(matches!(read_body(&b"hello"[..], Some(4)), Err(CaptureError::TooLarge { limit: 4 })));
        assert!(read_body(io::empty(), None).unwrap().is_empty());
    }

    #[test]
    fn read_blocking_fails() {
        let result = read_body(FailingReader { served: false }, None);
        assert!(matches!(result, Err(CaptureError::Io { source }) if source.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[tokio::test]
    async fn read_async() {
        assert_eq!(read_body_async(&b"hello"[..], None).await.unwrap(), Bytes::from_static(b"hello"));
        assert!(matches!(read_body_async(&b"hello"[..], Some(2)).await, Err(CaptureError::TooLarge { limit: 2 })));
        assert!(read_body_async(tokio::io::empty(), Some(0)).await.unwrap().is_empty());
    }
}
