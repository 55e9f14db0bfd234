//! HTTP/1.1 message framing over a raw byte stream
//!
//! This crate reads HTTP/1.1 requests from, and writes responses to, any
//! tokio `AsyncRead`/`AsyncWrite` pair. It does the framing by hand: an
//! incremental parser that is indifferent to how the transport splits its
//! reads, and a response writer that refuses to emit the parts of a response
//! out of order.
//!
//! # Features
//!
//! - Incremental request parsing (request line, headers, Content-Length body)
//! - Case-insensitive header collection that merges repeated fields
//! - Ordered response writing with chunked transfer encoding and trailers
//! - A task-per-connection TCP server with graceful shutdown
//! - Structured errors for every failure
//!
//! One request is served per connection, the connection is closed after the
//! response.
//!
//! # Example
//!
//! ```no_run
//! use http::StatusCode;
//! use raw_http::connection::ResponseWriter;
//! use raw_http::handler::Handler;
//! use raw_http::protocol::{HandlerError, Headers, Request};
//! use raw_http::server::{ServerConfig, serve_with_config};
//! use tokio::io::AsyncWrite;
//! use tracing::{Level, error, info};
//! use tracing_subscriber::FmtSubscriber;
//!
//! struct Echo;
//!
//! impl Handler for Echo {
//!     async fn call<W>(&self, writer: &mut ResponseWriter<W>, request: Request) -> Result<(), HandlerError>
//!     where
//!         W: AsyncWrite + Unpin + Send,
//!     {
//!         writer.write_status_line(StatusCode::OK).await?;
//!         writer.write_headers(&Headers::defaults(request.body().len())).await?;
//!         writer.write_body(request.body()).await?;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
//!     tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
//!
//!     let config = ServerConfig::builder().port(8080).build();
//!     let mut server = match serve_with_config(config, Echo).await {
//!         Ok(server) => server,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     info!(address = %server.local_addr(), "serving");
//!     tokio::signal::ctrl_c().await.unwrap();
//!     server.close().await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: headers, the parsed request, writer states and errors
//! - [`codec`]: the request decoder and the response encoders
//! - [`connection`]: reading a request and writing a response over a stream
//! - [`handler`]: the trait application code implements
//! - [`server`]: the TCP listener and accept loop

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
pub mod server;

mod utils;
pub(crate) use utils::ensure;
