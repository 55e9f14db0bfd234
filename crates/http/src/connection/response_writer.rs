use bytes::{BufMut, BytesMut};
use http::StatusCode;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Encoder;
use tracing::trace;

use crate::codec::{ChunkedEncoder, HeaderEncoder};
use crate::ensure;
use crate::protocol::{FieldName, Headers, PayloadItem, SendError, WriterState};

const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Writes one response to `W`, enforcing the order of its parts.
///
/// The writer moves through [`WriterState::StatusLine`],
/// [`WriterState::Headers`] and [`WriterState::Body`]. Calling a method in the
/// wrong state fails with [`SendError::InvalidState`] and writes nothing.
/// Ending a chunked body with [`write_chunk_terminator`](Self::write_chunk_terminator)
/// or [`write_trailers`](Self::write_trailers) moves it to
/// [`WriterState::Finished`].
///
/// Every call encodes into an internal buffer which is then written out and
/// flushed before the call returns.
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    buffer: BytesMut,
    state: WriterState,
    header_encoder: HeaderEncoder,
    chunked_encoder: ChunkedEncoder,
    trailers: Vec<FieldName>,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self::with_capacity(writer, DEFAULT_BUFFER_SIZE)
    }

    pub fn with_capacity(writer: W, buffer_size: usize) -> Self {
        Self {
            writer,
            buffer: BytesMut::with_capacity(buffer_size),
            state: WriterState::StatusLine,
            header_encoder: HeaderEncoder,
            chunked_encoder: ChunkedEncoder::new(),
            trailers: Vec::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> WriterState {
        self.state
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Writes `HTTP/1.1 <code> <reason>\r\n`.
    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), SendError> {
        self.expect_state("write_status_line", WriterState::StatusLine)?;

        self.header_encoder.encode(status, &mut self.buffer)?;
        self.flush_buffer().await?;

        trace!(status = status.as_u16(), "status line written");
        self.state = WriterState::Headers;
        Ok(())
    }

    /// Writes every header followed by the blank line ending the head.
    ///
    /// Names listed in a `Trailers` header are remembered, only those may be
    /// sent later with [`write_trailers`](Self::write_trailers).
    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), SendError> {
        self.expect_state("write_headers", WriterState::Headers)?;

        self.header_encoder.encode(headers, &mut self.buffer)?;
        self.flush_buffer().await?;

        self.trailers = headers.declared_trailers();
        trace!(count = headers.len(), trailers = self.trailers.len(), "headers written");
        self.state = WriterState::Body;
        Ok(())
    }

    /// Writes `body` verbatim, returning the number of bytes written.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, SendError> {
        self.expect_state("write_body", WriterState::Body)?;

        self.buffer.put_slice(body);
        self.flush_buffer().await?;
        Ok(body.len())
    }

    /// Writes `data` as a single chunk, returning the number of bytes put on
    /// the wire including the size line and the CRLFs. An empty `data` writes
    /// nothing, a zero sized chunk would end the body.
    pub async fn write_chunk(&mut self, data: &[u8]) -> Result<usize, SendError> {
        self.expect_state("write_chunk", WriterState::Body)?;

        self.chunked_encoder.encode(PayloadItem::Chunk(data), &mut self.buffer)?;
        self.flush_buffer().await
    }

    /// Ends a chunked body with `0\r\n\r\n`.
    pub async fn write_chunk_terminator(&mut self) -> Result<usize, SendError> {
        self.expect_state("write_chunk_terminator", WriterState::Body)?;

        self.chunked_encoder.encode(PayloadItem::<&[u8]>::Eof, &mut self.buffer)?;
        let written = self.flush_buffer().await?;

        self.state = WriterState::Finished;
        Ok(written)
    }

    /// Ends a chunked body with `0\r\n`, the trailer fields and a final
    /// `\r\n`.
    ///
    /// # Errors
    ///
    /// [`SendError::UndeclaredTrailer`] if a field was not declared in the
    /// `Trailers` header passed to [`write_headers`](Self::write_headers).
    pub async fn write_trailers(&mut self, trailers: &Headers) -> Result<(), SendError> {
        self.expect_state("write_trailers", WriterState::Body)?;

        for (name, _) in trailers.iter() {
            let name = FieldName::from(name);
            ensure!(self.trailers.contains(&name), SendError::undeclared_trailer(name));
        }

        self.chunked_encoder.encode(trailers, &mut self.buffer)?;
        self.flush_buffer().await?;

        trace!(count = trailers.len(), "trailers written");
        self.state = WriterState::Finished;
        Ok(())
    }

    /// Shuts down the write half of the underlying stream.
    pub async fn shutdown(&mut self) -> Result<(), SendError> {
        Ok(self.writer.shutdown().await?)
    }

    fn expect_state(&self, operation: &'static str, expected: WriterState) -> Result<(), SendError> {
        ensure!(self.state == expected, SendError::invalid_state(operation, self.state));
        Ok(())
    }

    async fn flush_buffer(&mut self) -> Result<usize, SendError> {
        let written = self.buffer.len();
        if written == 0 {
            return Ok(0);
        }

        let result = self.writer.write_all(&self.buffer).await;
        self.buffer.clear();
        result?;

        self.writer.flush().await?;
        Ok(written)
    }
}
