//! The message capability set shared by requests and responses.

use std::collections::HashMap;

use crate::body::{Body, StreamedBody};
use crate::error::HeaderError;
use crate::header::HeaderMap;
use crate::version::Version;

/// Uniform read interface over an HTTP message.
///
/// Headers, body and version are fixed when the message is built; every
/// operation here is a read. Header lookups are case-insensitive and
/// tolerate a trailing colon or whitespace on the supplied name, see
/// [`HeaderMap`] for the normalization rules.
pub trait Message {
    /// Returns the normalized header collection.
    fn headers(&self) -> &HeaderMap;

    /// Returns the entity body.
    fn body(&self) -> &Body;

    /// Returns the HTTP version marker.
    fn version(&self) -> &Version;

    /// Returns whether a header matching `name` exists after normalization.
    fn has_header(&self, name: &str) -> bool {
        self.headers().contains(name)
    }

    /// Returns the value of the header matching `name`.
    ///
    /// An absent header is reported as [`HeaderError::NotFound`]; callers
    /// expecting absence should probe with [`Message::has_header`] first.
    fn header(&self, name: &str) -> Result<&str, HeaderError> {
        self.headers().get(name).ok_or_else(|| HeaderError::not_found(name))
    }

    /// Returns an owned snapshot of the full header mapping, keyed by
    /// normalized name.
    ///
    /// The snapshot is detached from the message: mutating it never
    /// changes later lookups on the message itself.
    fn all_headers(&self) -> HashMap<String, String> {
        self.headers().to_map()
    }

    /// Returns the stream handle behind the body, if the body is
    /// stream-backed.
    ///
    /// Returns `None` for buffered bodies. Never triggers buffering; the
    /// materializing read is [`Body::text`].
    fn body_stream(&self) -> Option<&StreamedBody> {
        self.body().as_streamed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Method, Request};

    fn message() -> Request {
        Request::builder()
            .method(Method::Post)
            .target("/messages")
            .header("Content-Type", "text/plain")
            .header("X-Request-Id", "42")
            .body("hello")
            .unwrap()
    }

    #[test]
    fn test_has_header_normalizes() {
        let message = message();

        assert!(message.has_header("content-type:"));
        assert!(message.has_header("CONTENT-TYPE "));
        assert!(!message.has_header("content-length"));
    }

    #[test]
    fn test_header_lookup() {
        let message = message();

        assert_eq!(message.header("Content-Type").unwrap(), "text/plain");
        assert_eq!(message.header("x-request-id:").unwrap(), "42");

        let err = message.header("Content-Length").unwrap_err();
        assert_eq!(err, HeaderError::not_found("Content-Length"));
    }

    #[test]
    fn test_all_headers_is_a_snapshot() {
        let message = message();

        let mut snapshot = message.all_headers();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("content-type").map(String::as_str), Some("text/plain"));

        snapshot.clear();
        assert!(message.has_header("content-type"));
        assert_eq!(message.header("x-request-id").unwrap(), "42");
    }

    #[tokio::test]
    async fn test_body_stream_on_buffered_body() {
        let message = message();

        assert!(message.body_stream().is_none());
        assert_eq!(message.body().text().await.unwrap(), "hello");
    }

    #[test]
    fn test_version_defaults_to_1_1() {
        assert_eq!(message().version().as_str(), "1.1");
    }
}
