//! Immutable HTTP message entity types.
//!
//! This crate models an HTTP message (request or response) as an in-memory
//! value object: a case-insensitive header collection, an entity body that
//! is either an in-memory value or a lazily-read stream, and an HTTP
//! version marker. A message is built once, typically by a request builder
//! or by a transport layer that has already parsed the wire bytes, and is
//! read-only from then on.
//!
//! Parsing raw byte streams into messages and rendering messages back onto
//! a wire are collaborator concerns and live outside this crate.
//!
//! # Features
//!
//! - Case-insensitive header lookup with normalization of trailing
//!   colon/whitespace left over from header-line splitting
//! - Dual-mode entity bodies: buffered in-memory values and stream-backed
//!   bodies over any rewindable async byte source
//! - One-shot buffering of stream-backed bodies with a rewind that keeps
//!   the stream usable for direct access afterwards
//! - Builder-based construction with recorded errors, including bulk
//!   header assignment from typed iterables or loosely typed JSON values
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use http_entity::{Body, Message, Request};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), http_entity::MessageError> {
//! let request = Request::builder()
//!     .target("/upload")
//!     .header("Content-Type:", "text/plain")
//!     .body(Body::streamed(Cursor::new(b"hello".to_vec())))?;
//!
//! assert!(request.has_header("content-type"));
//! assert_eq!(request.header("CONTENT-TYPE")?, "text/plain");
//!
//! // reading a streamed body buffers it once and rewinds the stream
//! assert_eq!(request.body().text().await?, "hello");
//! assert_eq!(request.body().text().await?, "hello");
//!
//! // the raw handle is still there for direct access
//! assert!(request.body_stream().is_some());
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into a few small modules, re-exported flat:
//!
//! - [`Message`]: the read capability set shared by both message kinds
//! - [`Request`] / [`Response`]: the concrete variants and their builders
//! - [`HeaderMap`] / [`HeaderName`]: the normalized header collection
//! - [`Body`] / [`StreamedBody`]: buffered and stream-backed entity bodies
//! - [`Version`]: the `<major>.<minor>` version marker
//! - [`MessageError`] / [`HeaderError`] / [`BodyError`]: error types
//!
//! # Concurrency
//!
//! A built message is safe to share between tasks. The only lazy state is
//! the stream-backed body cache, and cache population runs under a lock,
//! so concurrent readers drain the stream exactly once. See
//! the [`body`](Body) documentation for the single caveat around holding
//! the raw stream guard across a materializing read.
//!
//! # Limitations
//!
//! - One value per header name; multi-value headers collapse to the last
//!   write
//! - Header values are opaque strings, no validation beyond name
//!   normalization
//! - No mutation after construction

mod body;
mod error;
mod header;
mod message;
mod request;
mod response;
mod version;

mod utils;
pub(crate) use utils::ensure;

pub use body::{Body, BodyStream, BoxBodyStream, StreamedBody};
pub use error::{BodyError, HeaderError, MessageError};
pub use header::{HeaderMap, HeaderName};
pub use message::Message;
pub use request::{Method, Request, RequestBuilder};
pub use response::{Response, ResponseBuilder, StatusCode};
pub use version::Version;
