use http::StatusCode;
use raw_http::connection::ResponseWriter;
use raw_http::handler::Handler;
use raw_http::protocol::{CONTENT_TYPE, HandlerError, Headers, Request, TRAILERS, TRANSFER_ENCODING};
use sha2::{Digest, Sha256};
use tokio::io::AsyncWrite;
use tracing::debug;

const MAX_STREAM_LINES: usize = 100;

const HELLO_PAGE: &str = "<html>
  <head>
    <title>200 OK</title>
  </head>
  <body>
    <h1>Success!</h1>
    <p>Your request was an absolute banger.</p>
  </body>
</html>
";

const BAD_REQUEST_PAGE: &str = "<html>
  <head>
    <title>400 Bad Request</title>
  </head>
  <body>
    <h1>Bad Request</h1>
    <p>Your request honestly kinda sucked.</p>
  </body>
</html>
";

const SERVER_ERROR_PAGE: &str = "<html>
  <head>
    <title>500 Internal Server Error</title>
  </head>
  <body>
    <h1>Internal Server Error</h1>
    <p>Okay, you know what? This one is on me.</p>
  </body>
</html>
";

/// The demo routes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Routes;

impl Handler for Routes {
    async fn call<W>(&self, writer: &mut ResponseWriter<W>, request: Request) -> Result<(), HandlerError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        match request.target() {
            "/" => html(writer, StatusCode::OK, HELLO_PAGE).await,
            "/yourproblem" => html(writer, StatusCode::BAD_REQUEST, BAD_REQUEST_PAGE).await,
            "/myproblem" => html(writer, StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_PAGE).await,
            "/echo" => echo(writer, &request).await,
            target => match target.strip_prefix("/stream/") {
                Some(lines) => stream(writer, lines).await,
                None => Err(HandlerError::new(StatusCode::NOT_FOUND, format!("no route for {target}"))),
            },
        }
    }
}

async fn html<W>(writer: &mut ResponseWriter<W>, status: StatusCode, page: &str) -> Result<(), HandlerError>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut headers = Headers::defaults(page.len());
    headers.override_default(CONTENT_TYPE, "text/html");

    writer.write_status_line(status).await?;
    writer.write_headers(&headers).await?;
    writer.write_body(page.as_bytes()).await?;
    Ok(())
}

async fn echo<W>(writer: &mut ResponseWriter<W>, request: &Request) -> Result<(), HandlerError>
where
    W: AsyncWrite + Unpin + Send,
{
    let body = request.body();
    let mut headers = Headers::defaults(body.len());
    headers.override_default(CONTENT_TYPE, "application/octet-stream");

    writer.write_status_line(StatusCode::OK).await?;
    writer.write_headers(&headers).await?;
    writer.write_body(body).await?;
    Ok(())
}

/// Streams `lines` numbered lines as chunks, followed by the body's SHA-256
/// and length as trailers.
async fn stream<W>(writer: &mut ResponseWriter<W>, lines: &str) -> Result<(), HandlerError>
where
    W: AsyncWrite + Unpin + Send,
{
    let lines = match lines.parse::<usize>() {
        Ok(lines) if lines <= MAX_STREAM_LINES => lines,
        _ => {
            return Err(HandlerError::new(
                StatusCode::BAD_REQUEST,
                format!("stream length must be a number up to {MAX_STREAM_LINES}"),
            ));
        }
    };

    let mut headers = Headers::defaults(0);
    headers.override_default(TRAILERS, "X-Content-SHA256, X-Content-Length");
    headers.override_default(TRANSFER_ENCODING, "chunked");

    writer.write_status_line(StatusCode::OK).await?;
    writer.write_headers(&headers).await?;

    let mut hasher = Sha256::new();
    let mut content_length = 0;
    for id in 0..lines {
        let line = format!("line {id} of {lines}\n");
        hasher.update(line.as_bytes());
        content_length += line.len();
        writer.write_chunk(line.as_bytes()).await?;
    }

    let mut trailers = Headers::new();
    trailers.set("X-Content-SHA256", format!("{:x}", hasher.finalize()));
    trailers.set("X-Content-Length", content_length.to_string());
    writer.write_trailers(&trailers).await?;

    debug!(lines, content_length, "stream finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use raw_http::connection::read_request;

    async fn respond(raw_request: &str) -> Result<String, HandlerError> {
        let request = read_request(&mut raw_request.as_bytes()).await.unwrap();
        let mut writer = ResponseWriter::new(Vec::new());
        Routes.call(&mut writer, request).await?;
        Ok(String::from_utf8(writer.into_inner()).unwrap())
    }

    #[tokio::test]
    async fn hello_page() {
        let response = respond("GET / HTTP/1.1\r\nHost: localhost:42069\r\n\r\n").await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("Content-Type: text/html\r\n"));
        assert!(response.contains(&format!("Content-Length: {}\r\n", HELLO_PAGE.len())));
        assert!(response.ends_with(HELLO_PAGE));
    }

    #[tokio::test]
    async fn problem_pages() {
        let response = respond("GET /yourproblem HTTP/1.1\r\n\r\n").await.unwrap();
        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(response.ends_with(BAD_REQUEST_PAGE));

        let response = respond("GET /myproblem HTTP/1.1\r\n\r\n").await.unwrap();
        assert!(response.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
        assert!(response.ends_with(SERVER_ERROR_PAGE));
    }

    #[tokio::test]
    async fn echo_body() {
        let response = respond("POST /echo HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello").await.unwrap();

        assert!(response.contains("Content-Type: application/octet-stream\r\n"));
        assert!(response.ends_with("\r\n\r\nhello"));
    }

    #[tokio::test]
    async fn stream_with_trailers() {
        let response = respond("GET /stream/2 HTTP/1.1\r\n\r\n").await.unwrap();

        let body = "line 0 of 2\nline 1 of 2\n";
        let digest = format!("{:x}", Sha256::digest(body.as_bytes()));

        assert!(response.contains("Transfer-Encoding: chunked\r\n"));
        assert!(response.contains("Trailers: X-Content-SHA256, X-Content-Length\r\n"));
        assert!(!response.contains("Content-Length: 0"));
        assert!(response.ends_with(&format!(
            "\r\n\r\nC\r\nline 0 of 2\n\r\nC\r\nline 1 of 2\n\r\n0\r\nX-Content-Length: 24\r\nX-Content-SHA256: {digest}\r\n\r\n"
        )));
    }

    #[tokio::test]
    async fn stream_limit() {
        let error = respond("GET /stream/101 HTTP/1.1\r\n\r\n").await.unwrap_err();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);

        let error = respond("GET /stream/many HTTP/1.1\r\n\r\n").await.unwrap_err();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route() {
        let error = respond("GET /nowhere HTTP/1.1\r\n\r\n").await.unwrap_err();

        assert_eq!(error.status, StatusCode::NOT_FOUND);
        assert_eq!(error.message, "no route for /nowhere");
    }
}
