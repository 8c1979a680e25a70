//! HTTP response value type and its builder.

use std::fmt;

use serde_json::Value;

use crate::body::Body;
use crate::error::MessageError;
use crate::header::HeaderMap;
use crate::message::Message;
use crate::version::Version;

/// HTTP response status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatusCode(u16);

impl StatusCode {
    /// 200 OK
    pub const OK: StatusCode = StatusCode(200);

    /// 204 No Content
    pub const NO_CONTENT: StatusCode = StatusCode(204);

    /// 404 Not Found
    pub const NOT_FOUND: StatusCode = StatusCode(404);

    /// 500 Internal Server Error
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    /// Creates a status code from its numeric value.
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric value.
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        Self::OK
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self::new(code)
    }
}

/// An immutable HTTP response message.
///
/// Built through [`ResponseBuilder`]; the read surface is the [`Message`]
/// trait plus the response-specific accessors here.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    reason: Option<String>,
    version: Version,
    headers: HeaderMap,
    body: Body,
}

impl Response {
    /// Creates a builder with status `200`, no reason phrase, version `1.1`
    /// and no headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::new()
    }

    /// Returns the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the reason phrase, if one was supplied at construction.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

impl Message for Response {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn version(&self) -> &Version {
        &self.version
    }
}

#[derive(Debug, Default)]
struct Head {
    status: StatusCode,
    reason: Option<String>,
    version: Version,
    headers: HeaderMap,
}

/// Builder for [`Response`].
///
/// Setters are chainable. The first construction failure is recorded and
/// surfaced by the [`ResponseBuilder::body`] finalizer; setters on a failed
/// builder are no-ops.
#[derive(Debug)]
pub struct ResponseBuilder {
    inner: Result<Head, MessageError>,
}

impl ResponseBuilder {
    fn new() -> Self {
        Self { inner: Ok(Head::default()) }
    }

    fn map(self, f: impl FnOnce(Head) -> Result<Head, MessageError>) -> Self {
        Self { inner: self.inner.and_then(f) }
    }

    /// Sets the status code.
    pub fn status(self, status: impl Into<StatusCode>) -> Self {
        self.map(|mut head| {
            head.status = status.into();
            Ok(head)
        })
    }

    /// Sets the reason phrase.
    pub fn reason(self, reason: impl Into<String>) -> Self {
        self.map(|mut head| {
            head.reason = Some(reason.into());
            Ok(head)
        })
    }

    /// Sets the HTTP version marker.
    pub fn version(self, version: impl Into<Version>) -> Self {
        self.map(|mut head| {
            head.version = version.into();
            Ok(head)
        })
    }

    /// Stores a header under the normalized form of `name`, overwriting any
    /// previous value held under the same normalized name.
    pub fn header(self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.map(|mut head| {
            head.headers.insert(name.as_ref(), value);
            Ok(head)
        })
    }

    /// Stores every header from a key-value iterable, in iteration order.
    pub fn headers<I, K, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.map(|mut head| {
            head.headers.extend(headers);
            Ok(head)
        })
    }

    /// Stores every header found in a loosely typed JSON value, see
    /// [`HeaderMap::try_extend_from_value`] for the accepted shapes.
    ///
    /// A value that cannot be read as key-value pairs fails the build with
    /// [`HeaderError::InvalidSource`](crate::error::HeaderError::InvalidSource).
    pub fn headers_from_value(self, source: &Value) -> Self {
        self.map(|mut head| {
            head.headers.try_extend_from_value(source)?;
            Ok(head)
        })
    }

    /// Attaches the entity body and finishes construction.
    pub fn body(self, body: impl Into<Body>) -> Result<Response, MessageError> {
        let head = self.inner?;
        Ok(Response {
            status: head.status,
            reason: head.reason,
            version: head.version,
            headers: head.headers,
            body: body.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HeaderError;
    use serde_json::json;
    use std::io::Cursor;

    #[test]
    fn test_builder_defaults() {
        let response = Response::builder().body(Body::empty()).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.reason(), None);
        assert_eq!(response.version().as_str(), "1.1");
        assert!(response.headers().is_empty());
    }

    #[test]
    fn test_builder_chain() {
        let response = Response::builder()
            .status(StatusCode::NOT_FOUND)
            .reason("Not Found")
            .version("1.0")
            .header("Content-Type", "text/html")
            .body("<h1>missing</h1>")
            .unwrap();

        assert_eq!(response.status().as_u16(), 404);
        assert_eq!(response.reason(), Some("Not Found"));
        assert_eq!(response.version().as_str(), "1.0");
        assert!(response.has_header("content-type:"));
    }

    #[test]
    fn test_builder_invalid_header_source_is_fatal() {
        let result = Response::builder().headers_from_value(&json!(500)).body(Body::empty());

        assert!(matches!(result, Err(MessageError::Header { source: HeaderError::InvalidSource { .. } })));
    }

    #[tokio::test]
    async fn test_streamed_response_body() {
        let response = Response::builder()
            .status(StatusCode::OK)
            .body(Body::streamed(Cursor::new(b"chunked".to_vec())))
            .unwrap();

        assert!(response.body_stream().is_some());
        assert_eq!(response.body().text().await.unwrap(), "chunked");
    }

    #[test]
    fn test_status_code() {
        assert_eq!(StatusCode::new(204), StatusCode::NO_CONTENT);
        assert_eq!(StatusCode::from(204).to_string(), "204");
        assert_eq!(StatusCode::default(), StatusCode::OK);
    }
}
