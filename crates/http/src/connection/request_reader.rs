use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::RequestDecoder;
use crate::protocol::{ParseError, Request};

const INIT_BUFFER_SIZE: usize = 8;

/// Reads exactly one request from `reader`.
///
/// Bytes are read into a buffer that starts at 8 bytes and doubles whenever it
/// is full before the request is complete. Consumed bytes are dropped from the
/// front, so the buffer only ever holds the unparsed tail. Anything that
/// arrives after the request is complete is discarded.
///
/// # Errors
///
/// - any [`ParseError`] the decoder reports
/// - [`ParseError::IncompleteRequest`] if the stream ends first
/// - [`ParseError::Io`] if reading fails
pub async fn read_request<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    let mut decoder = RequestDecoder::new();
    let mut buffer = BytesMut::with_capacity(INIT_BUFFER_SIZE);

    loop {
        if buffer.len() == buffer.capacity() {
            let additional = buffer.capacity().max(INIT_BUFFER_SIZE);
            buffer.reserve(additional);
            trace!(capacity = buffer.capacity(), "grow request buffer");
        }

        let read = reader.read_buf(&mut buffer).await?;
        if read == 0 {
            return decoder.decode_eof(&mut buffer)?.ok_or_else(|| ParseError::incomplete(decoder.stage()));
        }

        if let Some(request) = decoder.decode(&mut buffer)? {
            return Ok(request);
        }
    }
}
