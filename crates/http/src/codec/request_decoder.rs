//! HTTP request decoder module
//!
//! This module turns buffered request bytes into a [`Request`] one section at a
//! time. The buffer may end anywhere: in the middle of the request line, of a
//! header line or of the body. Whenever the current section is not complete yet
//! the decoder returns `Ok(None)` without consuming anything, and picks up where
//! it stopped once more bytes have been appended.
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use tcp_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from("GET /coffee HTTP/1.1\r\nHost: local");
//! assert!(decoder.decode(&mut buffer).unwrap().is_none());
//!
//! buffer.extend_from_slice(b"host:42069\r\n\r\n");
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(request.target(), "/coffee");
//! assert_eq!(request.headers().get("Host"), Some("localhost:42069"));
//! ```

use std::mem;

use bytes::{Buf, Bytes, BytesMut};
use http::header::CONTENT_LENGTH;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::protocol::{ParseError, ParseEvent, ParseState, Request, RequestLine};
use crate::utils::{CRLF, ensure, find_crlf};

/// The only protocol version accepted on the request line.
const HTTP_1_1: &[u8] = b"HTTP/1.1";

/// A decoder for a single HTTP request.
///
/// # State Machine
///
/// The decoder owns the [`Request`] under construction and dispatches on its
/// [`ParseState`]:
/// - `ParsingRequestLine`: waits for a CRLF, then parses the request line
/// - `ParsingHeaders`: waits for a CRLF, then parses one header line
/// - `ParsingBody`: waits for `Content-Length` bytes, then takes the body
/// - `Done`: hands the request out and starts over with an empty one
#[derive(Debug)]
pub struct RequestDecoder {
    request: Request,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Self { request: Request::new() }
    }

    /// The state of the request currently being decoded.
    pub fn state(&self) -> ParseState {
        self.request.state()
    }

    /// Whether `buf` holds enough bytes for the current state to make progress.
    fn is_ready(&self, buf: &[u8]) -> bool {
        match self.request.state() {
            ParseState::ParsingRequestLine | ParseState::ParsingHeaders => find_crlf(buf).is_some(),
            ParseState::ParsingBody => buf.len() >= self.request.content_length(),
            ParseState::Done => true,
        }
    }

    /// Runs one parse step and returns how many bytes of `buf` it consumed.
    fn parse(&mut self, buf: &[u8]) -> Result<usize, ParseError> {
        match self.request.state() {
            ParseState::ParsingRequestLine => self.parse_request_line(buf),
            ParseState::ParsingHeaders => self.parse_header(buf),
            ParseState::ParsingBody => self.parse_body(buf),
            from @ ParseState::Done => Err(ParseError::InvalidTransition { from }),
        }
    }

    fn parse_request_line(&mut self, buf: &[u8]) -> Result<usize, ParseError> {
        let Some(line_end) = find_crlf(buf) else {
            return Ok(0);
        };

        let fields = buf[..line_end].split(|&b| b == b' ').collect::<Vec<_>>();
        let &[method, target, version] = fields.as_slice() else {
            return Err(ParseError::malformed_request_line(fields.len()));
        };

        ensure!(version == HTTP_1_1, ParseError::unsupported_version(String::from_utf8_lossy(version)));
        ensure!(
            !method.is_empty() && method.iter().all(u8::is_ascii_uppercase),
            ParseError::invalid_method(String::from_utf8_lossy(method))
        );

        let request_line = RequestLine::new(
            String::from_utf8_lossy(method).into_owned(),
            String::from_utf8_lossy(target).into_owned(),
            String::from_utf8_lossy(version).into_owned(),
        );
        trace!(method = request_line.method(), target = request_line.target(), "parsed request line");

        self.request.set_request_line(request_line);
        self.request.advance(ParseEvent::RequestLineParsed)?;
        Ok(line_end + CRLF.len())
    }

    fn parse_header(&mut self, buf: &[u8]) -> Result<usize, ParseError> {
        let (consumed, done) = self.request.headers_mut().parse(buf)?;
        if !done {
            return Ok(consumed);
        }

        let content_length = match self.request.headers().get_value(&CONTENT_LENGTH) {
            None => None,
            Some(value) => Some(parse_content_length(value.as_bytes())?),
        };

        if let Some(content_length) = content_length {
            self.request.set_content_length(content_length);
        }

        let has_body = content_length.is_some_and(|n| n > 0);
        trace!(header_count = self.request.headers().len(), has_body, "parsed headers");
        self.request.advance(ParseEvent::HeadersParsed { has_body })?;
        Ok(consumed)
    }

    fn parse_body(&mut self, buf: &[u8]) -> Result<usize, ParseError> {
        let expected = self.request.content_length();
        ensure!(buf.len() == expected, ParseError::body_length_mismatch(expected, buf.len()));

        self.request.set_body(Bytes::copy_from_slice(buf));
        trace!(body_size = expected, "parsed body");
        self.request.advance(ParseEvent::BodyParsed)?;
        Ok(expected)
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to decode a complete request from the provided buffer
    ///
    /// Runs parse steps for as long as the buffer holds enough bytes for the
    /// current state, dropping each consumed prefix from `src`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: the request reached [`ParseState::Done`]
    /// - `Ok(None)`: need more data to proceed
    /// - `Err(_)`: encountered a parsing error
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        while !self.request.is_done() {
            if !self.is_ready(src) {
                return Ok(None);
            }

            let consumed = self.parse(src)?;
            src.advance(consumed);
        }

        Ok(Some(mem::replace(&mut self.request, Request::new())))
    }

    /// Called once the source has no more bytes to offer.
    ///
    /// A request that still can't complete is an error: a short body reports
    /// [`ParseError::BodyLengthMismatch`], anything else an unexpected EOF.
    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(request) = self.decode(buf)? {
            return Ok(Some(request));
        }

        match self.request.state() {
            ParseState::ParsingBody => Err(ParseError::body_length_mismatch(self.request.content_length(), buf.len())),
            _ => Err(ParseError::unexpected_eof()),
        }
    }
}

fn parse_content_length(value: &[u8]) -> Result<usize, ParseError> {
    let invalid = || ParseError::invalid_content_length(String::from_utf8_lossy(value));
    ensure!(!value.is_empty() && value.iter().all(u8::is_ascii_digit), invalid());
    value
        .iter()
        .try_fold(0_usize, |n, &digit| n.checked_mul(10)?.checked_add(usize::from(digit - b'0')))
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::io;

    fn crlf(raw: &str) -> BytesMut {
        BytesMut::from(raw.trim_end_matches(' ').replace('\n', "\r\n").as_str())
    }

    #[test]
    fn from_curl() {
        let mut buf = crlf(indoc! {"
            GET /coffee HTTP/1.1
            Host: localhost:42069
            User-Agent: curl/7.81.0
            Accept: */*

        "});

        let request = RequestDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert!(request.is_done());
        assert_eq!(request.method(), "GET");
        assert_eq!(request.target(), "/coffee");
        assert_eq!(request.version(), "HTTP/1.1");
        assert_eq!(request.headers().len(), 3);
        assert_eq!(request.headers().get("host"), Some("localhost:42069"));
        assert_eq!(request.headers().get("user-agent"), Some("curl/7.81.0"));
        assert_eq!(request.headers().get("accept"), Some("*/*"));
        assert!(request.body().is_empty());
        assert!(buf.is_empty());
    }

    #[test]
    fn resumes_after_partial_input() {
        let raw = b"POST /submit HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::new();

        for (i, b) in raw.iter().enumerate() {
            buf.extend_from_slice(&[*b]);
            let result = decoder.decode(&mut buf).unwrap();
            if i + 1 < raw.len() {
                assert!(result.is_none(), "completed early at byte {i}");
            } else {
                let request = result.unwrap();
                assert_eq!(&request.body()[..], b"hello");
                assert_eq!(request.content_length(), 5);
            }
        }
    }

    #[test]
    fn waits_in_each_state() {
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::from("GET / HTTP/1.1");
        assert!(decoder.decode(&mut buf).unwrap().is_none());
        assert_eq!(decoder.state(), ParseState::ParsingRequestLine);

        buf.extend_from_slice(b"\r\nContent-Length: 4\r\n");
        assert!(decoder.decode(&mut buf).unwrap().is_none());
        assert_eq!(decoder.state(), ParseState::ParsingHeaders);

        buf.extend_from_slice(b"\r\nab");
        assert!(decoder.decode(&mut buf).unwrap().is_none());
        assert_eq!(decoder.state(), ParseState::ParsingBody);
        assert_eq!(&buf[..], b"ab");

        buf.extend_from_slice(b"cd");
        let request = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(&request.body()[..], b"abcd");
        assert_eq!(decoder.state(), ParseState::ParsingRequestLine);
    }

    #[test]
    fn no_content_length_ignores_trailing_bytes() {
        let mut buf = BytesMut::from("POST /submit HTTP/1.1\r\nHost: localhost:42069\r\n\r\nhere is a body that shouldn't be read");

        let request = RequestDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert!(request.body().is_empty());
        assert_eq!(request.content_length(), 0);
        assert_eq!(&buf[..], b"here is a body that shouldn't be read");
    }

    #[test]
    fn zero_content_length_is_done() {
        let mut buf = BytesMut::from("POST /submit HTTP/1.1\r\nContent-Length: 0\r\n\r\n");

        let request = RequestDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert!(request.body().is_empty());
        assert_eq!(request.content_length(), 0);
    }

    #[test]
    fn padded_zero_content_length_is_done() {
        let mut buf = BytesMut::from("POST /submit HTTP/1.1\r\nContent-Length: 00\r\n\r\n");

        let request = RequestDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert_eq!(request.state(), ParseState::Done);
        assert!(request.body().is_empty());
    }

    #[test]
    fn missing_method() {
        let mut buf = BytesMut::from("/coffee HTTP/1.1\r\nHost: localhost:42069\r\n\r\n");
        let result = RequestDecoder::new().decode(&mut buf);

        assert!(matches!(result, Err(ParseError::MalformedRequestLine { parts: 2 })));
    }

    #[test]
    fn double_space_is_malformed() {
        let mut buf = BytesMut::from("GET  / HTTP/1.1\r\n\r\n");
        let result = RequestDecoder::new().decode(&mut buf);

        assert!(matches!(result, Err(ParseError::MalformedRequestLine { parts: 4 })));
    }

    #[test]
    fn lowercase_method() {
        let mut buf = BytesMut::from("get / HTTP/1.1\r\n\r\n");
        let result = RequestDecoder::new().decode(&mut buf);

        assert!(matches!(result, Err(ParseError::InvalidMethod { method }) if method == "get"));
    }

    #[test]
    fn empty_method() {
        let mut buf = BytesMut::from(" / HTTP/1.1\r\n\r\n");
        let result = RequestDecoder::new().decode(&mut buf);

        assert!(matches!(result, Err(ParseError::InvalidMethod { .. })));
    }

    #[test]
    fn unsupported_version() {
        let mut buf = BytesMut::from("GET / HTTP/1.0\r\n\r\n");
        let result = RequestDecoder::new().decode(&mut buf);

        assert!(matches!(result, Err(ParseError::UnsupportedVersion { version }) if version == "HTTP/1.0"));
    }

    #[test]
    fn invalid_content_length() {
        for value in ["abc", "-1", "+5", "1 2", "99999999999999999999999"] {
            let mut buf = BytesMut::from(format!("POST / HTTP/1.1\r\nContent-Length: {value}\r\n\r\n").as_str());
            let result = RequestDecoder::new().decode(&mut buf);

            assert!(matches!(result, Err(ParseError::InvalidContentLength { .. })), "accepted {value}");
        }
    }

    #[test]
    fn body_longer_than_content_length() {
        let mut buf = BytesMut::from("POST / HTTP/1.1\r\nContent-Length: 3\r\n\r\nabcdef");
        let result = RequestDecoder::new().decode(&mut buf);

        assert!(matches!(result, Err(ParseError::BodyLengthMismatch { expected: 3, actual: 6 })));
    }

    #[test]
    fn eof_with_short_body() {
        let mut buf = BytesMut::from("POST /submit HTTP/1.1\r\nContent-Length: 20\r\n\r\npartial content");
        let mut decoder = RequestDecoder::new();

        assert!(decoder.decode(&mut buf).unwrap().is_none());
        let result = decoder.decode_eof(&mut buf);

        assert!(matches!(result, Err(ParseError::BodyLengthMismatch { expected: 20, actual: 15 })));
    }

    #[test]
    fn eof_before_headers_end() {
        let mut buf = BytesMut::from("GET / HTTP/1.1\r\nHost: localhost:42069\r\n");
        let result = RequestDecoder::new().decode_eof(&mut buf);

        assert!(matches!(result, Err(ParseError::Io { source }) if source.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn eof_on_empty_input() {
        let result = RequestDecoder::new().decode_eof(&mut BytesMut::new());

        assert!(matches!(result, Err(ParseError::Io { source }) if source.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn eof_after_complete_request() {
        let mut buf = BytesMut::from("GET / HTTP/1.1\r\n\r\n");
        let request = RequestDecoder::new().decode_eof(&mut buf).unwrap().unwrap();

        assert_eq!(request.target(), "/");
    }

    #[test]
    fn content_length_header_is_case_insensitive() {
        let mut buf = BytesMut::from("POST / HTTP/1.1\r\ncontent-LENGTH: 13\r\n\r\nhello world!\n");
        let request = RequestDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert_eq!(&request.body()[..], b"hello world!\n");
        assert_eq!(request.content_length(), 13);
    }
}
