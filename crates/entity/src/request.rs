//! HTTP request value type and its builder.
//!
//! A [`Request`] is built once, by a client-side builder or by a transport
//! layer that has already parsed a request line, and is read-only from then
//! on. The start line values (method, target, version) are taken as given;
//! parsing raw bytes into them belongs to the transport collaborator.

use std::fmt;

use serde_json::Value;

use crate::body::Body;
use crate::error::MessageError;
use crate::header::HeaderMap;
use crate::message::Message;
use crate::version::Version;

/// HTTP request method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Method {
    #[default]
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
}

impl Method {
    /// Returns the canonical wire spelling of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Connect => "CONNECT",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable HTTP request message.
///
/// Built through [`RequestBuilder`]; the read surface is the [`Message`]
/// trait plus the request-specific accessors here.
#[derive(Debug)]
pub struct Request {
    method: Method,
    target: String,
    version: Version,
    headers: HeaderMap,
    body: Body,
}

impl Request {
    /// Creates a builder with method `GET`, target `/`, version `1.1` and
    /// no headers.
    pub fn builder() -> RequestBuilder {
        RequestBuilder::new()
    }

    /// Returns the request method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the request target as supplied at construction.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Message for Request {
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

#[derive(Debug)]
struct Head {
    method: Method,
    target: String,
    version: Version,
    headers: HeaderMap,
}

impl Default for Head {
    fn default() -> Self {
        Self { method: Method::default(), target: "/".to_owned(), version: Version::default(), headers: HeaderMap::new() }
    }
}

/// Builder for [`Request`].
///
/// Setters are chainable. The first construction failure is recorded and
/// surfaced by the [`RequestBuilder::body`] finalizer; setters on a failed
/// builder are no-ops.
#[derive(Debug)]
pub struct RequestBuilder {
    inner: Result<Head, MessageError>,
}

impl RequestBuilder {
    fn new() -> Self {
        Self { inner: Ok(Head::default()) }
    }

    fn map(self, f: impl FnOnce(Head) -> Result<Head, MessageError>) -> Self {
        Self { inner: self.inner.and_then(f) }
    }

    /// Sets the request method.
    pub fn method(self, method: Method) -> Self {
        self.map(|mut head| {
            head.method = method;
            Ok(head)
        })
    }

    /// Sets the request target.
    pub fn target(self, target: impl Into<String>) -> Self {
        self.map(|mut head| {
            head.target = target.into();
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
    pub fn body(self, body: impl Into<Body>) -> Result<Request, MessageError> {
        let head = self.inner?;
        Ok(Request {
            method: head.method,
            target: head.target,
            version: head.version,
            headers: head.headers,
            body: body.into(),
        })
    }
}
