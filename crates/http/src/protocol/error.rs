use std::io;
use thiserror::Error;

use crate::protocol::ParseState;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed request line: expected 3 parts, got {parts}")]
    MalformedRequestLine { parts: usize },

    #[error("unsupported http version: {version}, only HTTP/1.1 is supported")]
    UnsupportedVersion { version: String },

    #[error("invalid http method: {method}")]
    InvalidMethod { method: String },

    #[error("malformed header: {reason}")]
    MalformedHeader { reason: &'static str },

    #[error("invalid header field name: {name}")]
    InvalidFieldName { name: String },

    #[error("invalid content-length header: {value}")]
    InvalidContentLength { value: String },

    #[error("body length {actual} does not match content-length {expected}")]
    BodyLengthMismatch { expected: usize, actual: usize },

    #[error("invalid parse state transition from {from:?}")]
    InvalidTransition { from: ParseState },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn malformed_request_line(parts: usize) -> Self {
        Self::MalformedRequestLine { parts }
    }

    pub fn unsupported_version<S: ToString>(version: S) -> Self {
        Self::UnsupportedVersion { version: version.to_string() }
    }

    pub fn invalid_method<S: ToString>(method: S) -> Self {
        Self::InvalidMethod { method: method.to_string() }
    }

    pub fn malformed_header(reason: &'static str) -> Self {
        Self::MalformedHeader { reason }
    }

    pub fn invalid_field_name<S: ToString>(name: S) -> Self {
        Self::InvalidFieldName { name: name.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(value: S) -> Self {
        Self::InvalidContentLength { value: value.to_string() }
    }

    pub fn body_length_mismatch(expected: usize, actual: usize) -> Self {
        Self::BodyLengthMismatch { expected, actual }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    pub fn unexpected_eof() -> Self {
        Self::io(io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed before request was complete"))
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
