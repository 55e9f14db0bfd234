use std::sync::Arc;

use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, error, info, warn};

use crate::connection::{ResponseWriter, read_request};
use crate::handler::Handler;
use crate::protocol::{Headers, HttpError, ParseError, SendError, WriterState};

/// An HTTP connection that serves exactly one request
///
/// `HttpConnection` handles the full lifecycle of a connection:
/// - Reading and decoding the request
/// - Answering malformed requests with `400 Bad Request`
/// - Passing the request and a [`ResponseWriter`] to the handler
/// - Closing the write half once the response is done
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    reader: R,
    writer: ResponseWriter<W>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer: ResponseWriter::new(writer) }
    }

    /// Serves one request, then shuts the writer down.
    ///
    /// A request that fails to parse is answered with a 400 whose body is the
    /// error message, and the parse error is returned. Errors the handler
    /// returns are rendered as a response when nothing was written yet and
    /// only logged otherwise.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler,
    {
        let result = self.do_process(handler.as_ref()).await;

        if let Err(e) = self.writer.shutdown().await {
            debug!(cause = %e, "failed to shutdown connection");
        }

        result
    }

    async fn do_process<H>(&mut self, handler: &H) -> Result<(), HttpError>
    where
        H: Handler,
    {
        let request = match read_request(&mut self.reader).await {
            Ok(request) => request,
            Err(e) => {
                error!(cause = %e, "can't parse request");
                if !matches!(e, ParseError::Io { .. }) {
                    self.send_error(StatusCode::BAD_REQUEST, &e.to_string()).await?;
                }
                return Err(e.into());
            }
        };

        info!(method = %request.method(), target = request.target(), "received request");

        let Err(e) = handler.call(&mut self.writer, request).await else {
            return Ok(());
        };

        if self.writer.state() == WriterState::StatusLine {
            warn!(status = %e.status, message = %e.message, "handler failed, sending error response");
            self.send_error(e.status, &e.message).await?;
        } else {
            error!(
                status = %e.status,
                message = %e.message,
                state = %self.writer.state(),
                "handler failed after the response was started"
            );
        }

        Ok(())
    }

    async fn send_error(&mut self, status: StatusCode, message: &str) -> Result<(), SendError> {
        self.writer.write_status_line(status).await?;
        self.writer.write_headers(&Headers::defaults(message.len())).await?;
        self.writer.write_body(message.as_bytes()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{HandlerError, Request};

    #[derive(Debug)]
    struct Hello;

    impl Handler for Hello {
        async fn call<W>(&self, writer: &mut ResponseWriter<W>, request: Request) -> Result<(), HandlerError>
        where
            W: AsyncWrite + Unpin + Send,
        {
            let body = format!("hello {}", request.target());
            writer.write_status_line(StatusCode::OK).await?;
            writer.write_headers(&Headers::defaults(body.len())).await?;
            writer.write_body(body.as_bytes()).await?;
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Teapot;

    impl Handler for Teapot {
        async fn call<W>(&self, _writer: &mut ResponseWriter<W>, _request: Request) -> Result<(), HandlerError>
        where
            W: AsyncWrite + Unpin + Send,
        {
            Err(HandlerError::new(StatusCode::FORBIDDEN, "no coffee here"))
        }
    }

    #[derive(Debug)]
    struct HalfDone;

    impl Handler for HalfDone {
        async fn call<W>(&self, writer: &mut ResponseWriter<W>, _request: Request) -> Result<(), HandlerError>
        where
            W: AsyncWrite + Unpin + Send,
        {
            writer.write_status_line(StatusCode::OK).await?;
            Err(HandlerError::new(StatusCode::INTERNAL_SERVER_ERROR, "gave up"))
        }
    }

    async fn serve<H: Handler>(input: &[u8], handler: H) -> (Result<(), HttpError>, String) {
        let mut output = Vec::new();
        let result = HttpConnection::new(input, &mut output).process(Arc::new(handler)).await;
        (result, String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn handler_response() {
        let (result, output) = serve(b"GET /world HTTP/1.1\r\nHost: localhost\r\n\r\n", Hello).await;

        assert!(result.is_ok());
        assert_eq!(
            output,
            "HTTP/1.1 200 OK\r\nConnection: close\r\nContent-Length: 12\r\nContent-Type: text/plain\r\n\r\nhello /world"
        );
    }

    #[tokio::test]
    async fn malformed_request_gets_400() {
        let (result, output) = serve(b"/coffee HTTP/1.1\r\n\r\n", Hello).await;

        assert!(matches!(result, Err(HttpError::RequestError { source: ParseError::InvalidRequestLine { parts: 2 } })));
        assert!(output.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(output.ends_with("\r\n\r\nrequest line requires 3 parts, got 2"));
    }

    #[tokio::test]
    async fn incomplete_request_gets_400() {
        let (result, output) = serve(b"GET / HTTP/1.1\r\nHost: local", Hello).await;

        assert!(matches!(result, Err(HttpError::RequestError { source: ParseError::IncompleteRequest { .. } })));
        assert!(output.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }

    #[tokio::test]
    async fn handler_error_is_rendered() {
        let (result, output) = serve(b"GET /brew HTTP/1.1\r\n\r\n", Teapot).await;

        assert!(result.is_ok());
        assert_eq!(
            output,
            "HTTP/1.1 403 Forbidden\r\nConnection: close\r\nContent-Length: 14\r\nContent-Type: text/plain\r\n\r\nno coffee here"
        );
    }

    #[tokio::test]
    async fn handler_error_after_start_is_only_logged() {
        let (result, output) = serve(b"GET / HTTP/1.1\r\n\r\n", HalfDone).await;

        assert!(result.is_ok());
        assert_eq!(output, "HTTP/1.1 200 OK\r\n");
    }
}
