//! Encoder for chunked transfer encoding, see
//! [RFC 7230 Section 4.1](https://tools.ietf.org/html/rfc7230#section-4.1).

use std::io::Write;

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::Encoder;
use tracing::trace;

use crate::codec::header::encode_fields;
use crate::protocol::{Headers, PayloadItem, SendError};
use crate::utils::FastWrite;

/// Encodes body chunks as `<HEX>\r\n<data>\r\n` and the end of the body as
/// `0\r\n\r\n`.
///
/// Encoding a `&Headers` ends the body with trailers instead:
/// `0\r\n<Name>: <Value>\r\n...\r\n`. Once the body has ended, everything
/// else is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChunkedEncoder {
    eof: bool,
}

impl ChunkedEncoder {
    pub fn new() -> Self {
        Self { eof: false }
    }

    pub fn is_finish(&self) -> bool {
        self.eof
    }
}

impl<D: Buf> Encoder<PayloadItem<D>> for ChunkedEncoder {
    type Error = SendError;

    fn encode(&mut self, item: PayloadItem<D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if self.eof {
            return Ok(());
        }

        match item {
            PayloadItem::Chunk(bytes) => {
                // a zero sized chunk would end the body
                if !bytes.has_remaining() {
                    return Ok(());
                }

                trace!(size = bytes.remaining(), "encode chunk");
                write!(FastWrite(dst), "{:X}\r\n", bytes.remaining())?;
                dst.reserve(bytes.remaining() + 2);
                dst.put(bytes);
                dst.put_slice(b"\r\n");
                Ok(())
            }
            PayloadItem::Eof => {
                self.eof = true;
                dst.put_slice(b"0\r\n\r\n");
                Ok(())
            }
        }
    }
}

impl Encoder<&Headers> for ChunkedEncoder {
    type Error = SendError;

    fn encode(&mut self, trailers: &Headers, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if self.eof {
            return Ok(());
        }

        trace!(count = trailers.len(), "encode trailers");
        self.eof = true;
        dst.put_slice(b"0\r\n");
        encode_fields(trailers, dst);
        dst.put_slice(b"\r\n");
        Ok(())
    }
}
