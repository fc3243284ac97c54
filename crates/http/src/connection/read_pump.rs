//! Background reads from a connection, delivered in order over a channel.
//!
//! The pump owns the read half of the connection. Every chunk it reads is
//! moved into the channel, so nothing is shared with the parser that consumes
//! them. The pump stops after forwarding the first error; end of stream is
//! forwarded as an [`io::ErrorKind::UnexpectedEof`] error.

use std::io;

use bytes::Bytes;
use futures::channel::mpsc;
use futures::{SinkExt, StreamExt};
use tokio::io::AsyncRead;
use tokio::task::JoinHandle;
use tokio_util::io::ReaderStream;
use tracing::trace;

/// How many chunks the pump may read ahead of the parser.
const PUMP_CHANNEL_SIZE: usize = 8;

pub(crate) type ReadResult = io::Result<Bytes>;

/// Spawns the read pump for `reader`, using `chunk_size` as the read buffer capacity.
pub(crate) fn spawn_read_pump<R>(reader: R, chunk_size: usize) -> (mpsc::Receiver<ReadResult>, JoinHandle<()>)
where
    R: AsyncRead + Send + Unpin + 'static,
{
    let (mut sender, receiver) = mpsc::channel(PUMP_CHANNEL_SIZE);

    let pump = tokio::spawn(async move {
        let mut chunks = ReaderStream::with_capacity(reader, chunk_size.max(1));
        loop {
            let item = chunks.next().await.unwrap_or_else(|| Err(io::Error::from(io::ErrorKind::UnexpectedEof)));
            let last = item.is_err();

            match &item {
                Ok(chunk) => trace!(size = chunk.len(), "read chunk"),
                Err(e) => trace!(cause = %e, "read pump finished"),
            }

            if sender.send(item).await.is_err() {
                trace!("request reader dropped, stop reading");
                return;
            }

            if last {
                return;
            }
        }
    });

    (receiver, pump)
}
