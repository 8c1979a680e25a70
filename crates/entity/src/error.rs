use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("header error: {source}")]
    Header {
        #[from]
        source: HeaderError,
    },

    #[error("body error: {source}")]
    Body {
        #[from]
        source: BodyError,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("header not found: {name}")]
    NotFound { name: String },

    #[error("invalid header source: {reason}")]
    InvalidSource { reason: String },
}

impl HeaderError {
    pub fn not_found<S: ToString>(name: S) -> Self {
        Self::NotFound { name: name.to_string() }
    }

    pub fn invalid_source<S: ToString>(reason: S) -> Self {
        Self::InvalidSource { reason: reason.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum BodyError {
    #[error("body read failed: {source}")]
    ReadFailed {
        #[from]
        source: io::Error,
    },
}

impl BodyError {
    pub fn read_failed<E: Into<io::Error>>(e: E) -> Self {
        Self::ReadFailed { source: e.into() }
    }
}
