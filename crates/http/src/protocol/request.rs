//! The parsed HTTP request and the parse state machine that builds it.
//!
//! A [`Request`] starts out empty in [`ParseState::ParsingRequestLine`] and is
//! filled in section by section while the decoder works through the wire
//! format. Once it reaches [`ParseState::Done`] it is handed out and only read
//! from then on.

use bytes::Bytes;

use crate::protocol::{Headers, ParseError};

/// Which section of the wire format the parser expects next.
///
/// States only ever move forward:
/// `ParsingRequestLine -> ParsingHeaders -> (ParsingBody ->) Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseState {
    #[default]
    ParsingRequestLine,
    ParsingHeaders,
    ParsingBody,
    Done,
}

/// Something the parser finished, driving a [`ParseState`] transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseEvent {
    RequestLineParsed,
    HeadersParsed { has_body: bool },
    BodyParsed,
}

impl ParseState {
    /// The single transition function of the parser.
    ///
    /// Every `(state, event)` pair not listed here is rejected.
    pub(crate) fn transition(self, event: ParseEvent) -> Result<Self, ParseError> {
        match (self, event) {
            (Self::ParsingRequestLine, ParseEvent::RequestLineParsed) => Ok(Self::ParsingHeaders),
            (Self::ParsingHeaders, ParseEvent::HeadersParsed { has_body: true }) => Ok(Self::ParsingBody),
            (Self::ParsingHeaders, ParseEvent::HeadersParsed { has_body: false }) | (Self::ParsingBody, ParseEvent::BodyParsed) => {
                Ok(Self::Done)
            }
            (from, _) => Err(ParseError::InvalidTransition { from }),
        }
    }

    #[inline]
    pub fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

/// `METHOD SP TARGET SP VERSION`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLine {
    method: String,
    target: String,
    version: String,
}

impl RequestLine {
    pub(crate) fn new(method: String, target: String, version: String) -> Self {
        Self { method, target, version }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request target, kept exactly as it appeared on the wire.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

/// An HTTP request read from a connection.
#[derive(Debug, Clone, Default)]
pub struct Request {
    request_line: RequestLine,
    headers: Headers,
    body: Bytes,
    content_length: Option<usize>,
    state: ParseState,
}

impl Request {
    /// Creates an empty request waiting for its request line.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    pub fn method(&self) -> &str {
        self.request_line.method()
    }

    pub fn target(&self) -> &str {
        self.request_line.target()
    }

    pub fn version(&self) -> &str {
        self.request_line.version()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The declared body length; an absent `Content-Length` counts as zero.
    pub fn content_length(&self) -> usize {
        self.content_length.unwrap_or(0)
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state.is_done()
    }

    pub(crate) fn set_request_line(&mut self, request_line: RequestLine) {
        self.request_line = request_line;
    }

    pub(crate) fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub(crate) fn set_content_length(&mut self, content_length: usize) {
        self.content_length = Some(content_length);
    }

    pub(crate) fn set_body(&mut self, body: Bytes) {
        self.body = body;
    }

    pub(crate) fn advance(&mut self, event: ParseEvent) -> Result<(), ParseError> {
        self.state = self.state.transition(event)?;
        Ok(())
    }
}
