//! Request handlers.
//!
//! A [`Handler`] gets the parsed [`Request`] and an in-memory sink for the
//! response body. Returning `Ok(())` answers `200 OK` with whatever was written
//! to the sink; returning a [`HandlerError`] answers with its status and
//! message instead.

use bytes::BytesMut;
use http::StatusCode;
use thiserror::Error;

use crate::protocol::{Request, Response};

pub trait Handler: Send + Sync {
    fn call(&self, writer: &mut BytesMut, request: &Request) -> Result<(), HandlerError>;
}

/// An error status and the message sent as the response body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{status}: {message}")]
pub struct HandlerError {
    status: StatusCode,
    message: String,
}

impl HandlerError {
    pub fn new<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal_server_error<S: Into<String>>(message: S) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<HandlerError> for Response {
    fn from(e: HandlerError) -> Self {
        Response::new(e.status, e.message)
    }
}

#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&mut BytesMut, &Request) -> Result<(), HandlerError> + Send + Sync,
{
    fn call(&self, writer: &mut BytesMut, request: &Request) -> Result<(), HandlerError> {
        (self.f)(writer, request)
    }
}

pub fn make_handler<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&mut BytesMut, &Request) -> Result<(), HandlerError>,
{
    HandlerFn { f }
}
