use std::future::Future;

use tokio::io::AsyncWrite;

use crate::connection::ResponseWriter;
use crate::protocol::{HandlerError, Request};

/// Application logic invoked once per parsed request.
///
/// The handler writes its response through `writer`. Returning an error before
/// anything was written makes the connection render it as a plain text
/// response, an error returned later is only logged.
///
/// Implementations may use `async fn`, the returned future has to be `Send`
/// so connections can run on their own tasks.
pub trait Handler: Send + Sync {
    fn call<W>(
        &self,
        writer: &mut ResponseWriter<W>,
        request: Request,
    ) -> impl Future<Output = Result<(), HandlerError>> + Send
    where
        W: AsyncWrite + Unpin + Send;
}

