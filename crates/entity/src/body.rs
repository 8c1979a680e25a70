//! Entity body handling: buffered values and lazily-read streams.
//!
//! A message body is either an in-memory value or a handle to an external
//! byte stream opened by the transport collaborator. Both are read through
//! the same surface: [`Body::text`] and [`Body::bytes`] materialize the
//! contents, and [`Body::as_streamed`] exposes the raw handle when one
//! exists.
//!
//! # Caching
//!
//! A stream-backed body is drained at most once. The first materializing
//! read locks the stream, reads it to exhaustion, rewinds it to the start
//! and stores the bytes; every later read is served from that cache without
//! touching the stream. The rewind keeps the handle fully usable for direct
//! access after a buffered read has happened.
//!
//! # Concurrency
//!
//! The read, store, rewind sequence runs under the stream lock and the
//! cache cell serializes concurrent first readers, so sharing one message
//! between tasks cannot drain the stream twice. Holding the guard returned
//! by [`StreamedBody::lock`] across a materializing call on the same body
//! deadlocks, as with any re-entrant lock use: the stream handle has a
//! single logical owner at a time.

use std::fmt;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};
use tokio::sync::{Mutex, MutexGuard, OnceCell};
use tracing::{error, trace};

use crate::error::BodyError;

/// Capabilities an entity-body stream handle must provide.
///
/// The transport collaborator opens the handle over the connection's
/// entity-body bytes. Rewindability is part of the contract: it is what
/// keeps the handle readable after a buffered read.
pub trait BodyStream: AsyncRead + AsyncSeek + Send + Unpin {}

impl<T> BodyStream for T where T: AsyncRead + AsyncSeek + Send + Unpin {}

/// Boxed stream handle stored inside a [`Body`].
pub type BoxBodyStream = Box<dyn BodyStream>;

/// The entity body of a message.
///
/// Exactly one of the two cases is active for a given message, and reads
/// dispatch on the tag rather than on any runtime type probing.
pub enum Body {
    /// An in-memory value, coerced to text on every read.
    Buffered(Bytes),
    /// A handle to an external byte stream, drained at most once.
    Streamed(StreamedBody),
}

impl Body {
    /// Creates a buffered body from an in-memory value.
    pub fn buffered(value: impl Into<Bytes>) -> Self {
        Body::Buffered(value.into())
    }

    /// Creates a stream-backed body over the given handle.
    ///
    /// The stream is expected to be positioned at the start of the entity
    /// bytes; the first materializing read consumes it from its current
    /// position.
    pub fn streamed(stream: impl BodyStream + 'static) -> Self {
        Body::Streamed(StreamedBody::new(Box::new(stream)))
    }

    /// Creates an empty buffered body.
    pub fn empty() -> Self {
        Body::Buffered(Bytes::new())
    }

    /// Returns true if the body is stream-backed.
    #[inline]
    pub fn is_streamed(&self) -> bool {
        matches!(self, Body::Streamed(_))
    }

    /// Returns the stream-backed case, if that is what this body is.
    ///
    /// Returns `None` for buffered bodies. Never triggers buffering and
    /// never consumes the stream.
    pub fn as_streamed(&self) -> Option<&StreamedBody> {
        match self {
            Body::Buffered(_) => None,
            Body::Streamed(streamed) => Some(streamed),
        }
    }

    /// Materializes the body as text.
    ///
    /// A buffered value is coerced on every call (lossy UTF-8 conversion,
    /// deterministic for a fixed value). A stream-backed body goes through
    /// the one-shot cache described at the module level, so repeated calls
    /// return the same text without re-reading the stream.
    pub async fn text(&self) -> Result<String, BodyError> {
        Ok(String::from_utf8_lossy(&self.bytes().await?).into_owned())
    }

    /// Materializes the body as raw bytes, with the same caching contract
    /// as [`Body::text`].
    pub async fn bytes(&self) -> Result<Bytes, BodyError> {
        match self {
            Body::Buffered(bytes) => Ok(bytes.clone()),
            Body::Streamed(streamed) => Ok(streamed.buffer().await?.clone()),
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Buffered(bytes) => f.debug_struct("Buffered").field("len", &bytes.len()).finish(),
            Body::Streamed(streamed) => streamed.fmt(f),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Buffered(bytes)
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Body::Buffered(Bytes::from(value))
    }
}

impl From<&'static str> for Body {
    fn from(value: &'static str) -> Self {
        Body::Buffered(Bytes::from_static(value.as_bytes()))
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Body::Buffered(Bytes::from(value))
    }
}

/// A stream-backed entity body with its one-shot cache.
///
/// The cache transition is terminal: once the stream has been drained the
/// cached bytes serve every later materializing read, and the stream itself
/// is only reachable through [`StreamedBody::lock`].
pub struct StreamedBody {
    stream: Mutex<BoxBodyStream>,
    cached: OnceCell<Bytes>,
}

impl StreamedBody {
    fn new(stream: BoxBodyStream) -> Self {
        Self { stream: Mutex::new(stream), cached: OnceCell::new() }
    }

    /// Returns the fully buffered stream contents.
    ///
    /// The first call reads the stream to exhaustion, rewinds it to the
    /// start and caches the bytes; concurrent first callers are serialized
    /// and the stream is drained exactly once. A failed read (or a rewind
    /// failure, which breaks the re-readability contract just the same)
    /// surfaces [`BodyError::ReadFailed`] and caches nothing; partial
    /// content is never retained. The stream position is unspecified after
    /// a failure.
    pub async fn buffer(&self) -> Result<&Bytes, BodyError> {
        self.cached
            .get_or_try_init(|| async {
                let mut stream = self.stream.lock().await;

                let mut buf = Vec::new();
                if let Err(e) = stream.read_to_end(&mut buf).await {
                    error!(cause = %e, "failed to read body stream");
                    return Err(BodyError::read_failed(e));
                }

                if let Err(e) = stream.rewind().await {
                    error!(cause = %e, "failed to rewind body stream after read");
                    return Err(BodyError::read_failed(e));
                }

                trace!(size = buf.len(), "buffered body stream");
                Ok(Bytes::from(buf))
            })
            .await
    }

    /// Locks and returns the underlying stream handle for direct access.
    ///
    /// Never triggers buffering and never consumes the stream by itself.
    /// If a buffering read is in flight the lock waits for it to finish.
    pub async fn lock(&self) -> MutexGuard<'_, BoxBodyStream> {
        self.stream.lock().await
    }

    /// Returns true once the one-shot cache has been populated.
    pub fn is_buffered(&self) -> bool {
        self.cached.get().is_some()
    }
}

impl fmt::Debug for StreamedBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Streamed").field("buffered", &self.is_buffered()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::{self, Cursor, SeekFrom};
    use std::pin::Pin;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::{Context, Poll};

    use tokio::io::ReadBuf;

    /// Counts every byte served so a test can tell whether the underlying
    /// stream was drained more than once across rewinds.
    struct CountingStream {
        inner: Cursor<Vec<u8>>,
        served: Arc<AtomicUsize>,
    }

    impl CountingStream {
        fn new(content: &[u8]) -> (Self, Arc<AtomicUsize>) {
            let served = Arc::new(AtomicUsize::new(0));
            let stream = Self { inner: Cursor::new(content.to_vec()), served: Arc::clone(&served) };
            (stream, served)
        }
    }

    impl AsyncRead for CountingStream {
        fn poll_read(mut self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
            let before = buf.filled().len();
            let poll = Pin::new(&mut self.inner).poll_read(cx, buf);
            if let Poll::Ready(Ok(())) = poll {
                self.served.fetch_add(buf.filled().len() - before, Ordering::SeqCst);
            }
            poll
        }
    }

    impl AsyncSeek for CountingStream {
        fn start_seek(mut self: Pin<&mut Self>, position: SeekFrom) -> io::Result<()> {
            Pin::new(&mut self.inner).start_seek(position)
        }

        fn poll_complete(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<u64>> {
            Pin::new(&mut self.inner).poll_complete(cx)
        }
    }

    /// Fails every read so the error path can be observed.
    struct FailingStream;

    impl AsyncRead for FailingStream {
        fn poll_read(self: Pin<&mut Self>, _cx: &mut Context<'_>, _buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")))
        }
    }

    impl AsyncSeek for FailingStream {
        fn start_seek(self: Pin<&mut Self>, _position: SeekFrom) -> io::Result<()> {
            Ok(())
        }

        fn poll_complete(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<u64>> {
            Poll::Ready(Ok(0))
        }
    }

    #[tokio::test]
    async fn test_buffered_body_recoerces_on_every_read() {
        let body = Body::from("hello");

        assert!(!body.is_streamed());
        assert!(body.as_streamed().is_none());
        assert_eq!(body.text().await.unwrap(), "hello");
        assert_eq!(body.text().await.unwrap(), "hello");
        assert_eq!(&body.bytes().await.unwrap()[..], b"hello");
    }

    #[tokio::test]
    async fn test_empty_body() {
        let body = Body::empty();
        assert_eq!(body.text().await.unwrap(), "");
        assert!(body.bytes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_streamed_body_drains_once_and_rewinds() {
        let (stream, served) = CountingStream::new(b"hello");
        let body = Body::streamed(stream);

        assert_eq!(body.text().await.unwrap(), "hello");
        assert_eq!(body.text().await.unwrap(), "hello");
        // the second call was served from the cache
        assert_eq!(served.load(Ordering::SeqCst), 5);

        // the stream was rewound after buffering, direct access sees the
        // full content again
        let streamed = body.as_streamed().unwrap();
        assert!(streamed.is_buffered());

        let mut stream = streamed.lock().await;
        let mut reread = Vec::new();
        stream.read_to_end(&mut reread).await.unwrap();
        assert_eq!(reread, b"hello");
    }

    #[tokio::test]
    async fn test_concurrent_first_reads_share_one_drain() {
        let (stream, served) = CountingStream::new(b"hello");
        let body = Body::streamed(stream);

        let (a, b) = tokio::join!(body.text(), body.text());

        assert_eq!(a.unwrap(), "hello");
        assert_eq!(b.unwrap(), "hello");
        assert_eq!(served.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_failed_read_caches_nothing() {
        let body = Body::streamed(FailingStream);

        let err = body.text().await.unwrap_err();
        assert!(matches!(err, BodyError::ReadFailed { .. }));
        assert!(!body.as_streamed().unwrap().is_buffered());
    }

    #[tokio::test]
    async fn test_direct_access_without_buffering() {
        let body = Body::streamed(Cursor::new(b"hello".to_vec()));

        {
            let mut stream = body.as_streamed().unwrap().lock().await;
            let mut read = Vec::new();
            stream.read_to_end(&mut read).await.unwrap();
            assert_eq!(read, b"hello");
        }

        assert!(!body.as_streamed().unwrap().is_buffered());
    }
}
