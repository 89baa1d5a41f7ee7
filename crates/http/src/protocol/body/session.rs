use std::convert::Infallible;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Buf, Bytes};
use http_body::{Body, Frame, SizeHint};
use tokio::io::{AsyncRead, ReadBuf};

/// An independent cursor over a captured body.
///
/// Every session starts at offset 0 of the buffer it was created from and moves only its
/// own position; the buffer itself is shared through [`Bytes`] and is never written to.
/// A clone continues from the clone source's position, while [`ReadSession::replay`]
/// starts over from the beginning.
///
/// The session can be consumed through whichever interface the consumer speaks:
/// - [`http_body::Body`], yielding the unread bytes as a single data frame
/// - [`std::io::Read`] and [`std::io::BufRead`]
/// - [`tokio::io::AsyncRead`]
/// - [`bytes::Buf`]
#[derive(Debug, Clone, Default)]
pub struct ReadSession {
    buffer: Bytes,
    unread: Bytes,
}

impl ReadSession {
    pub fn new(buffer: Bytes) -> Self {
        let unread = buffer.clone();
        Self { buffer, unread }
    }

    /// Returns a new session over the same buffer, positioned at offset 0.
    pub fn replay(&self) -> Self {
        Self::new(self.buffer.clone())
    }

    /// Number of bytes already read through this session.
    pub fn position(&self) -> usize {
        self.buffer.len() - self.unread.len()
    }

    /// Total length of the underlying buffer, independent of the position.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The bytes not read yet.
    pub fn unread(&self) -> &[u8] {
        &self.unread
    }

    pub fn into_unread(self) -> Bytes {
        self.unread
    }
}

impl From<Bytes> for ReadSession {
    fn from(buffer: Bytes) -> Self {
        Self::new(buffer)
    }
}

impl Buf for ReadSession {
    fn remaining(&self) -> usize {
        self.unread.len()
    }

    fn chunk(&self) -> &[u8] {
        &self.unread
    }

    fn advance(&mut self, cnt: usize) {
        self.unread.advance(cnt);
    }
}

impl io::Read for ReadSession {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let size = buf.len().min(self.unread.len());
        buf[..size].copy_from_slice(&self.unread[..size]);
        self.unread.advance(size);
        Ok(size)
    }
}

impl io::BufRead for ReadSession {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(&self.unread)
    }

    fn consume(&mut self, amt: usize) {
        let amt = amt.min(self.unread.len());
        self.unread.advance(amt);
    }
}

impl AsyncRead for ReadSession {
    fn poll_read(self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let size = buf.remaining().min(this.unread.len());
        buf.put_slice(&this.unread[..size]);
        this.unread.advance(size);
        Poll::Ready(Ok(()))
    }
}

/// A captured body is already in memory, so the whole unread part goes out as one frame.
impl Body for ReadSession {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        if this.unread.is_empty() {
            return Poll::Ready(None);
        }

        Poll::Ready(Some(Ok(Frame::data(std::mem::take(&mut this.unread)))))
    }

    fn is_end_stream(&self) -> bool {
        self.unread.is_empty()
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.unread.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, Read};

    use bytes::{Buf, Bytes};
    use http_body::Body;
    use http_body_util::BodyExt;
    use indoc::indoc;
    use tokio::io::AsyncReadExt;

    use super::ReadSession;

    fn check_send_sync<T: Send + Sync>() {}

    #[test]
    fn is_send_sync() {
        check_send_sync::<ReadSession>();
    }

    #[test]
    fn read_in_small_chunks() {
        let mut session = ReadSession::new(Bytes::from_static(b"hello world"));
        let mut chunk = [0u8; 4];

        assert_eq!(Read::read(&mut session, &mut chunk).unwrap(), 4);
        assert_eq!(&chunk, b"hell");
        assert_eq!(session.position(), 4);

        let mut rest = Vec::new();
        Read::read_to_end(&mut session, &mut rest).unwrap();
        assert_eq!(rest, b"o world");
        assert_eq!(session.position(), 11);
        assert_eq!(Read::read(&mut session, &mut chunk).unwrap(), 0);
    }

    #[test]
    fn clone_keeps_position_and_replay_restarts() {
        let mut session = ReadSession::new(Bytes::from_static(b"abcdef"));
        session.advance(2);

        let mut cloned = session.clone();
        let mut replayed = session.replay();

        let mut from_clone = String::new();
        Read::read_to_string(&mut cloned, &mut from_clone).unwrap();
        assert_eq!(from_clone, "cdef");

        let mut from_replay = String::new();
        Read::read_to_string(&mut replayed, &mut from_replay).unwrap();
        assert_eq!(from_replay, "abcdef");

        // reading the clone and the replay did not move the original
        assert_eq!(session.position(), 2);
        assert_eq!(session.unread(), b"cdef");
    }

    #[test]
    fn buf_read_lines() {
        let text = indoc! {"
            first line
            second line
            third line
        "};
        let session = ReadSession::new(Bytes::from_static(text.as_bytes()));

        let lines: Vec<String> = session.lines().map(Result::unwrap).collect();
        assert_eq!(lines, vec!["first line", "second line", "third line"]);
    }

    #[test]
    fn buf_get() {
        let mut session = ReadSession::new(Bytes::from_static(&[0, 1, 0x12, 0x34]));

        assert_eq!(session.get_u16(), 1);
        assert_eq!(session.get_u16(), 0x1234);
        assert!(!session.has_remaining());
    }

    #[tokio::test]
    async fn body_single_frame() {
        let mut session = ReadSession::new(Bytes::from_static(b"{\"a\":1}"));

        assert_eq!(session.size_hint().exact(), Some(7));
        assert!(!session.is_end_stream());

        let data = session.frame().await.unwrap().unwrap().into_data().unwrap();
        assert_eq!(data, Bytes::from_static(b"{\"a\":1}"));

        assert!(session.is_end_stream());
        assert_eq!(session.size_hint().exact(), Some(0));
        assert!(session.frame().await.is_none());

        let collected = session.replay().collect().await.unwrap().to_bytes();
        assert_eq!(collected, Bytes::from_static(b"{\"a\":1}"));
    }

    #[tokio::test]
    async fn async_read() {
        let mut session = ReadSession::new(Bytes::from_static(b"async body"));

        let mut first = [0u8; 5];
        AsyncReadExt::read_exact(&mut session, &mut first).await.unwrap();
        assert_eq!(&first, b"async");

        let mut rest = Vec::new();
        AsyncReadExt::read_to_end(&mut session, &mut rest).await.unwrap();
        assert_eq!(rest, b" body");
    }

    #[tokio::test]
    async fn empty_session() {
        let mut session = ReadSession::new(Bytes::new());

        assert!(session.is_empty());
        assert!(session.is_end_stream());
        assert!(session.frame().await.is_none());

        let mut buf = Vec::new();
        assert_eq!(Read::read_to_end(&mut session, &mut buf).unwrap(), 0);
        assert!(buf.is_empty());
    }
}
