//! Reads one [`Request`] from an async byte source.
//!
//! A [`RequestReader`] pairs the read pump with a [`RequestDecoder`]. The pump
//! keeps reading in the background while the decoder works through whatever
//! has been buffered so far, so a read can end anywhere in the message.

use std::cmp;
use std::io;

use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use futures::channel::mpsc;
use tokio::io::AsyncRead;
use tokio::task::JoinHandle;
use tokio_util::codec::Decoder;
use tracing::{debug, trace};

use crate::codec::RequestDecoder;
use crate::connection::read_pump::{ReadResult, spawn_read_pump};
use crate::protocol::{ParseError, Request};

/// Default buffer capacity the read pump reads into.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 1024;

/// Initial capacity of the parse buffer, doubled whenever a chunk doesn't fit.
const INIT_BUFFER_SIZE: usize = 1024;

/// Parses a single request from `reader`.
///
/// # Errors
///
/// Any [`ParseError`] from the request itself, an I/O error from `reader`, or
/// an error when `reader` ends before the request is complete.
pub async fn request_from_reader<R>(reader: R) -> Result<Request, ParseError>
where
    R: AsyncRead + Send + Unpin + 'static,
{
    RequestReader::new(reader).read_request().await
}

/// Drives a [`RequestDecoder`] with the chunks delivered by a read pump.
///
/// The pump task is aborted when the reader is dropped.
#[derive(Debug)]
pub struct RequestReader {
    chunks: mpsc::Receiver<ReadResult>,
    pump: JoinHandle<()>,
    buffer: BytesMut,
    decoder: RequestDecoder,
}

impl RequestReader {
    pub fn new<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self::with_chunk_size(reader, DEFAULT_READ_CHUNK_SIZE)
    }

    pub fn with_chunk_size<R>(reader: R, chunk_size: usize) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        let (chunks, pump) = spawn_read_pump(reader, chunk_size);
        Self { chunks, pump, buffer: BytesMut::with_capacity(INIT_BUFFER_SIZE), decoder: RequestDecoder::new() }
    }

    /// Waits until a whole request has been read and parsed.
    pub async fn read_request(mut self) -> Result<Request, ParseError> {
        loop {
            if let Some(request) = self.decoder.decode(&mut self.buffer)? {
                debug!(method = request.method(), target = request.target(), body_size = request.body().len(), "request parsed");
                return Ok(request);
            }

            match self.chunks.next().await {
                Some(Ok(chunk)) => self.fill(&chunk),
                Some(Err(e)) if e.kind() != io::ErrorKind::UnexpectedEof => return Err(ParseError::io(e)),
                Some(Err(_)) | None => {
                    trace!(state = ?self.decoder.state(), buffered = self.buffer.len(), "reached end of stream");
                    return self.decoder.decode_eof(&mut self.buffer)?.ok_or_else(ParseError::unexpected_eof);
                }
            }
        }
    }

    /// Appends `chunk`, doubling the buffer capacity when it doesn't fit.
    fn fill(&mut self, chunk: &Bytes) {
        let available = self.buffer.capacity() - self.buffer.len();
        if chunk.len() > available {
            let additional = cmp::max(self.buffer.capacity(), chunk.len());
            trace!(capacity = self.buffer.capacity(), additional, "grow parse buffer");
            self.buffer.reserve(additional);
        }
        self.buffer.extend_from_slice(chunk);
    }
}

impl Drop for RequestReader {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::test_utils::{ChunkReader, FailingReader};
    use tokio::io::AsyncWriteExt;

    const GET_ROOT: &str = "GET / HTTP/1.1\r\nHost: localhost:42069\r\nUser-Agent: curl/7.81.0\r\nAccept: */*\r\n\r\n";

    async fn read(data: &str, bytes_per_read: usize) -> Result<Request, ParseError> {
        request_from_reader(ChunkReader::new(data, bytes_per_read)).await
    }

    #[tokio::test]
    async fn request_line_in_3_byte_chunks() {
        let request = read(GET_ROOT, 3).await.unwrap();

        assert_eq!(request.method(), "GET");
        assert_eq!(request.target(), "/");
        assert_eq!(request.version(), "HTTP/1.1");
    }

    #[tokio::test]
    async fn request_line_in_1_byte_chunks() {
        let data = "GET /coffee HTTP/1.1\r\nHost: localhost:42069\r\nUser-Agent: curl/7.81.0\r\nAccept: */*\r\n\r\n";
        let request = read(data, 1).await.unwrap();

        assert_eq!(request.method(), "GET");
        assert_eq!(request.target(), "/coffee");
        assert_eq!(request.version(), "HTTP/1.1");
    }

    #[tokio::test]
    async fn invalid_request_line() {
        let data = "/coffee HTTP/1.1\r\nHost: localhost:42069\r\nUser-Agent: curl/7.81.0\r\nAccept: */*\r\n\r\n";
        let result = read(data, data.len()).await;

        assert!(matches!(result, Err(ParseError::MalformedRequestLine { .. } | ParseError::InvalidMethod { .. })));
    }

    #[tokio::test]
    async fn standard_headers() {
        let request = read(GET_ROOT, 3).await.unwrap();

        assert_eq!(request.headers().len(), 3);
        assert_eq!(request.headers().get("host"), Some("localhost:42069"));
        assert_eq!(request.headers().get("user-agent"), Some("curl/7.81.0"));
        assert_eq!(request.headers().get("accept"), Some("*/*"));
    }

    #[tokio::test]
    async fn malformed_header() {
        let result = read("GET / HTTP/1.1\r\nHost localhost:42069\r\n\r\n", 3).await;

        assert!(matches!(result, Err(ParseError::MalformedHeader { .. })));
    }

    #[tokio::test]
    async fn empty_input() {
        let result = read("", 3).await;

        assert!(matches!(result, Err(ParseError::Io { source }) if source.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[tokio::test]
    async fn headers_are_chunk_size_invariant() {
        let data = "POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nSet-Person: a\r\n  X-Padded:   yes  \r\nset-person: b\r\nContent-Length: 4\r\n\r\nbody";
        let whole = read(data, data.len()).await.unwrap();
        assert_eq!(whole.headers().get("set-person"), Some("a, b"));
        assert_eq!(whole.headers().get("x-padded"), Some("yes"));

        for bytes_per_read in 1..=data.len() {
            let request = read(data, bytes_per_read).await.unwrap();
            assert_eq!(request.headers(), whole.headers(), "{bytes_per_read} bytes per read");
            assert_eq!(request.request_line(), whole.request_line());
            assert_eq!(request.body(), whole.body());
        }
    }

    #[tokio::test]
    async fn standard_body() {
        let data = "POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nContent-Length: 13\r\n\r\nhello world!\n";
        let request = read(data, 3).await.unwrap();

        assert_eq!(&request.body()[..], b"hello world!\n");
        assert_eq!(request.content_length(), 13);
    }

    #[tokio::test]
    async fn body_shorter_than_content_length() {
        let data = "POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nContent-Length: 20\r\n\r\npartial content!";
        let result = read(data, 3).await;

        assert!(matches!(result, Err(ParseError::BodyLengthMismatch { expected: 20, actual: 16 })));
    }

    #[tokio::test]
    async fn empty_body_content_length_0() {
        let data = "POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nContent-Length: 0\r\n\r\n";
        let request = read(data, 8).await.unwrap();

        assert!(request.body().is_empty());
        assert_eq!(request.content_length(), 0);
    }

    #[tokio::test]
    async fn empty_body_no_content_length() {
        let data = "POST /submit HTTP/1.1\r\nHost: localhost:42069\r\n\r\n";
        let request = read(data, 8).await.unwrap();

        assert!(request.body().is_empty());
    }

    #[tokio::test]
    async fn no_content_length_but_body_exists() {
        let data = "POST /submit HTTP/1.1\r\nHost: localhost:42069\r\n\r\nhere is a body that shouldn't be read";
        let request = read(data, 8).await.unwrap();

        assert!(request.body().is_empty());
        assert_eq!(request.content_length(), 0);
    }

    #[tokio::test]
    async fn large_body_grows_the_buffer() {
        let body = "0123456789".repeat(1000);
        let data = format!("POST /upload HTTP/1.1\r\nContent-Length: {}\r\n\r\n{body}", body.len());
        let request = read(&data, 7).await.unwrap();

        assert_eq!(request.body().len(), body.len());
        assert_eq!(&request.body()[..], body.as_bytes());
    }

    #[tokio::test]
    async fn body_keeps_zero_bytes() {
        let mut data = b"POST / HTTP/1.1\r\nContent-Length: 4\r\n\r\n".to_vec();
        data.extend_from_slice(&[0, 1, 0, 2]);
        let request = request_from_reader(ChunkReader::new(data, 5)).await.unwrap();

        assert_eq!(&request.body()[..], &[0, 1, 0, 2]);
    }

    #[tokio::test]
    async fn completes_without_waiting_for_eof() {
        let (mut client, server) = tokio::io::duplex(1024);
        client.write_all(GET_ROOT.as_bytes()).await.unwrap();

        // the client stays open, so only the parsed request can end the read
        let request = request_from_reader(server).await.unwrap();
        assert_eq!(request.headers().get("host"), Some("localhost:42069"));
        drop(client);
    }

    #[tokio::test]
    async fn read_error_is_reported() {
        let reader = FailingReader::new("GET / HTTP/1.1\r\nHost: local", io::ErrorKind::ConnectionReset);
        let result = request_from_reader(reader).await;

        assert!(matches!(result, Err(ParseError::Io { source }) if source.kind() == io::ErrorKind::ConnectionReset));
    }

    #[tokio::test]
    async fn custom_chunk_size() {
        let request = RequestReader::with_chunk_size(ChunkReader::new(GET_ROOT, 64), 2).read_request().await.unwrap();

        assert_eq!(request.target(), "/");
    }
}
