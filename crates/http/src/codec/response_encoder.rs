use crate::codec::header::{write_headers, write_status_line};
use crate::protocol::{Response, SendError};
use crate::utils::CRLF;
use bytes::{BufMut, BytesMut};
use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;

/// Initial buffer size allocated for the status line and headers
const INIT_HEADER_SIZE: usize = 256;

/// Encodes a [`Response`] as status line, headers, blank line and body.
#[derive(Debug, Default)]
pub struct ResponseEncoder;

impl ResponseEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder<Response> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE + item.body().len());

        let mut writer = FastWrite(dst);
        write_status_line(&mut writer, item.status())?;
        write_headers(&mut writer, item.headers())?;

        dst.put_slice(CRLF);
        dst.put_slice(item.body());
        Ok(())
    }
}

/// Fast writer implementation for writing to `BytesMut`.
///
/// Space has already been reserved, so writes go straight into the buffer.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
