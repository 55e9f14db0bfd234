//! TCP server running one [`HttpConnection`] per accepted connection.
//!
//! [`serve`] binds the listener and returns right away; the accept loop runs on
//! its own task until [`Server::close`] is called.
//!
//! # Example
//!
//! ```no_run
//! use http::StatusCode;
//! use raw_http::connection::ResponseWriter;
//! use raw_http::handler::Handler;
//! use raw_http::protocol::{HandlerError, Headers, Request};
//! use tokio::io::AsyncWrite;
//!
//! struct Hello;
//!
//! impl Handler for Hello {
//!     async fn call<W>(&self, writer: &mut ResponseWriter<W>, _request: Request) -> Result<(), HandlerError>
//!     where
//!         W: AsyncWrite + Unpin + Send,
//!     {
//!         writer.write_status_line(StatusCode::OK).await?;
//!         writer.write_headers(&Headers::defaults(6)).await?;
//!         writer.write_body(b"hello\n").await?;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut server = raw_http::server::serve(42069, Hello).await.unwrap();
//!     tokio::signal::ctrl_c().await.unwrap();
//!     server.close().await.unwrap();
//! }
//! ```

mod config;

pub use config::{DEFAULT_PORT, ServerConfig, ServerConfigBuilder};

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::select;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::connection::HttpConnection;
use crate::handler::Handler;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("server is not running")]
    NotRunning,
}

/// A running server.
///
/// Dropping it stops the accept loop without waiting for it, connections
/// already accepted are served to the end either way.
#[derive(Debug)]
pub struct Server {
    local_addr: SocketAddr,
    closed: Arc<AtomicBool>,
    shutdown: CancellationToken,
    accept_task: Option<JoinHandle<()>>,
}

/// Listens on every interface at `port`.
pub async fn serve<H>(port: u16, handler: H) -> Result<Server, ServerError>
where
    H: Handler + 'static,
{
    serve_with_config(ServerConfig::builder().port(port).build(), handler).await
}

/// Binds the configured address and starts accepting connections.
pub async fn serve_with_config<H>(config: ServerConfig, handler: H) -> Result<Server, ServerError>
where
    H: Handler + 'static,
{
    let address = config.address();
    let listener = TcpListener::bind(address).await.map_err(|source| ServerError::Bind { address, source })?;
    let local_addr = listener.local_addr().map_err(|source| ServerError::Bind { address, source })?;
    info!(address = %local_addr, "start listening");

    let closed = Arc::new(AtomicBool::new(false));
    let shutdown = CancellationToken::new();
    let accept_task = tokio::spawn(accept_loop(listener, Arc::new(handler), Arc::clone(&closed), shutdown.clone()));

    Ok(Server { local_addr, closed, shutdown, accept_task: Some(accept_task) })
}

impl Server {
    /// The address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Stops accepting connections and waits for the accept loop to exit.
    ///
    /// # Errors
    ///
    /// [`ServerError::NotRunning`] if the server was already closed.
    pub async fn close(&mut self) -> Result<(), ServerError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(ServerError::NotRunning);
        }

        self.shutdown.cancel();
        if let Some(accept_task) = self.accept_task.take()
            && let Err(e) = accept_task.await
        {
            warn!(cause = %e, "accept loop ended abnormally");
        }

        info!(address = %self.local_addr, "server closed");
        Ok(())
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.closed.store(true, Ordering::Release);
        self.shutdown.cancel();
    }
}

async fn accept_loop<H>(listener: TcpListener, handler: Arc<H>, closed: Arc<AtomicBool>, shutdown: CancellationToken)
where
    H: Handler + 'static,
{
    loop {
        let accepted = select! {
            () = shutdown.cancelled() => break,
            accepted = listener.accept() => accepted,
        };

        let (tcp_stream, remote_addr) = match accepted {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                if closed.load(Ordering::Acquire) {
                    break;
                }
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            let (reader, writer) = tcp_stream.into_split();
            let connection = HttpConnection::new(reader, writer);
            match connection.process(handler).await {
                Ok(()) => {
                    debug!(peer = %remote_addr, "finished process, connection shutdown");
                }
                Err(e) => {
                    warn!(peer = %remote_addr, cause = %e, "service has error, connection shutdown");
                }
            }
        });
    }

    debug!("accept loop exited");
}
