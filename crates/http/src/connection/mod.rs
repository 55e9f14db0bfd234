//! HTTP connection handling module
//!
//! This module drives the codecs over real streams: it reads one request from
//! an `AsyncRead`, hands it to a [`Handler`](crate::handler::Handler) and lets
//! the handler write the response in order.
//!
//! # Components
//!
//! - [`read_request`]: reads one request through a small, doubling buffer
//! - [`ResponseWriter`]: writes the status line, headers and body in that
//!   order, with chunked bodies and trailers
//! - [`HttpConnection`]: serves a single request and closes the connection

mod http_connection;
mod request_reader;
mod response_writer;

pub use http_connection::HttpConnection;
pub use request_reader::read_request;
pub use response_writer::ResponseWriter;
