use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

/// Hands out at most `chunk_size` bytes per read, like a slow network.
#[derive(Debug)]
pub struct ChunkReader {
    data: Vec<u8>,
    pos: usize,
    chunk_size: usize,
}

impl ChunkReader {
    pub fn new(data: impl Into<Vec<u8>>, chunk_size: usize) -> Self {
        Self { data: data.into(), pos: 0, chunk_size }
    }
}

impl AsyncRead for ChunkReader {
    fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let remaining = &self.data[self.pos..];
        let amt = remaining.len().min(buf.remaining()).min(self.chunk_size);
        buf.put_slice(&remaining[..amt]);
        self.pos += amt;
        Poll::Ready(Ok(()))
    }
}
