//! HTTP codec module for encoding and decoding HTTP messages
//!
//! This module holds the byte-level half of the protocol: the incremental
//! request parser and the encoders used by the response writer. Decoders work
//! on whatever prefix of the message has arrived and report how many bytes
//! they consumed, so correctness never depends on how the transport splits
//! its reads.
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestDecoder`]: the RequestLine -> Headers -> Body -> Done state machine
//!   - [`RequestLineDecoder`]: decodes the request line
//!   - [`HeaderDecoder`]: decodes one header line at a time
//!   - [`LengthDecoder`]: collects a Content-Length bounded body
//!
//! - Response handling:
//!   - [`HeaderEncoder`]: encodes the status line and header block
//!   - [`ChunkedEncoder`]: encodes chunks, the terminating chunk and trailers
//!
//! # Example
//!
//! ```
//! use raw_http::codec::ChunkedEncoder;
//! use raw_http::protocol::PayloadItem;
//! use tokio_util::codec::Encoder;
//! use bytes::BytesMut;
//!
//! let mut encoder = ChunkedEncoder::new();
//! let mut buffer = BytesMut::new();
//! encoder.encode(PayloadItem::Chunk(&b"hello"[..]), &mut buffer).unwrap();
//! encoder.encode(PayloadItem::<&[u8]>::Eof, &mut buffer).unwrap();
//! assert_eq!(&buffer[..], b"5\r\nhello\r\n0\r\n\r\n");
//! ```

mod body;
mod header;
mod request_decoder;

pub use body::{ChunkedEncoder, LengthDecoder};
pub(crate) use header::encode_fields;
pub use header::{HeaderDecoder, HeaderEncoder, RequestLineDecoder};
pub use request_decoder::RequestDecoder;
