//! HTTP response representation.
//!
//! Responses always close the connection, so every [`Response`] starts from
//! [`default_headers`] sized to its body.

use bytes::Bytes;
use http::header::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderValue, StatusCode};

use crate::protocol::Headers;

const CLOSE: HeaderValue = HeaderValue::from_static("close");
const TEXT_PLAIN: HeaderValue = HeaderValue::from_static("text/plain");

/// The headers sent with every response: `Content-Length`, `Connection: close`
/// and `Content-Type: text/plain`.
pub fn default_headers(content_length: usize) -> Headers {
    let mut headers = Headers::new();
    headers.set(CONTENT_LENGTH, HeaderValue::from(content_length));
    headers.set(CONNECTION, CLOSE);
    headers.set(CONTENT_TYPE, TEXT_PLAIN);
    headers
}

/// A status code, its headers and a fully buffered body.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    body: Bytes,
}

impl Response {
    /// Creates a response carrying `body` with the default headers sized to it.
    pub fn new<B: Into<Bytes>>(status: StatusCode, body: B) -> Self {
        let body = body.into();
        Self { status, headers: default_headers(body.len()), body }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_headers_close_the_connection() {
        let headers = default_headers(15);

        assert_eq!(headers.len(), 3);
        assert_eq!(headers.get("Content-Length"), Some("15"));
        assert_eq!(headers.get("Connection"), Some("close"));
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn headers_are_sized_to_the_body() {
        let response = Response::new(StatusCode::OK, "All good, frfr\n");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("content-length"), Some("15"));
        assert_eq!(&response.body()[..], b"All good, frfr\n");
    }
}
