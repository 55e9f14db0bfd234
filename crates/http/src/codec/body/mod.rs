//! HTTP body handling
//!
//! - [`LengthDecoder`]: Collects a request body bounded by Content-Length
//! - [`ChunkedEncoder`]: Implements chunked transfer encoding and trailers for responses

mod chunked_encoder;
mod length_decoder;

pub use chunked_encoder::ChunkedEncoder;
pub use length_decoder::LengthDecoder;
