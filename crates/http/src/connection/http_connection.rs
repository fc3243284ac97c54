use std::sync::Arc;

use bytes::BytesMut;
use futures::SinkExt;
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::FramedWrite;
use tracing::{error, info, warn};

use crate::codec::ResponseEncoder;
use crate::connection::request_reader::{DEFAULT_READ_CHUNK_SIZE, RequestReader};
use crate::handler::Handler;
use crate::protocol::{HttpError, Response, SendError};

/// A single request/response exchange on a connection
///
/// `HttpConnection` reads one request, answers it and closes the write side.
/// Keep-alive is not supported, so there is never a second request.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type, handed to the read pump
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    reader: R,
    framed_write: FramedWrite<W, ResponseEncoder>,
    read_chunk_size: usize,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Send + Unpin + 'static,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_chunk_size(reader, writer, DEFAULT_READ_CHUNK_SIZE)
    }

    pub fn with_chunk_size(reader: R, writer: W, read_chunk_size: usize) -> Self {
        Self { reader, framed_write: FramedWrite::new(writer, ResponseEncoder::new()), read_chunk_size }
    }

    /// Reads the request, runs `handler` and writes the response.
    ///
    /// A request that fails to parse is answered with `400 Bad Request`
    /// carrying the error text, and the parse error is returned.
    pub async fn process<H>(self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler + ?Sized,
    {
        let Self { reader, mut framed_write, read_chunk_size } = self;

        let request = match RequestReader::with_chunk_size(reader, read_chunk_size).read_request().await {
            Ok(request) => request,
            Err(e) => {
                error!("can't receive request, cause {}", e);
                let error_response = Response::new(StatusCode::BAD_REQUEST, e.to_string());
                if let Err(send_error) = send_response(&mut framed_write, error_response).await {
                    warn!(cause = %send_error, "failed to send bad request response");
                }
                return Err(e.into());
            }
        };

        info!(method = request.method(), target = request.target(), "received request");

        let mut body = BytesMut::new();
        let response = match handler.call(&mut body, &request) {
            Ok(()) => Response::new(StatusCode::OK, body.freeze()),
            Err(e) => {
                warn!(status = e.status().as_u16(), "handler returned error, cause: {}", e.message().trim_end());
                Response::from(e)
            }
        };

        info!(status = response.status().as_u16(), body_size = response.body().len(), "sending response");
        send_response(&mut framed_write, response).await?;
        Ok(())
    }
}

/// Writes the whole response, then shuts the write side down.
async fn send_response<W>(framed_write: &mut FramedWrite<W, ResponseEncoder>, response: Response) -> Result<(), SendError>
where
    W: AsyncWrite + Unpin,
{
    // send flushes, so everything is on the wire before the shutdown
    framed_write.send(response).await?;
    framed_write.get_mut().shutdown().await.map_err(SendError::io)
}
