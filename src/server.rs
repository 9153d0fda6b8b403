//! HTTP façade exposing `POST /analyze`.
//!
//! One request per connection. Bodies are framed by `Content-Length` or
//! `Transfer-Encoding: chunked`.
//! Routing is a pure function ([`handle_request`]) so it can be exercised
//! without sockets.

use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::organize::{AnalysisResult, ModuleSelection, Runner};
use crate::tree::Document;

/// Largest accepted request body. Design exports can be large.
pub const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

const MAX_HEADER_LINES: usize = 100;

/// A fully rendered HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        let body = serde_json::to_string(value).unwrap_or_else(|e| {
            format!(r#"{{"success":false,"error":"serializing response: {}"}}"#, e)
        });
        Self { status, body }
    }

    fn empty(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }

    fn reason(&self) -> &'static str {
        match self.status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            413 => "Payload Too Large",
            _ => "Internal Server Error",
        }
    }

    /// Serialize status line, headers and body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let head = format!(
            "HTTP/1.1 {} {}\r\n\
             Content-Type: application/json\r\n\
             Access-Control-Allow-Origin: *\r\n\
             Access-Control-Allow-Methods: POST, OPTIONS\r\n\
             Access-Control-Allow-Headers: Content-Type\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n",
            self.status,
            self.reason(),
            self.body.len()
        );
        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(self.body.as_bytes());
        bytes
    }
}

#[derive(Serialize)]
struct SuccessBody<'a> {
    success: bool,
    results: &'a AnalysisResult,
}

#[derive(Serialize)]
struct FailureBody<'a> {
    success: bool,
    error: &'a str,
}

#[derive(Serialize)]
struct NotFoundBody {
    error: &'static str,
}

fn failure(status: u16, error: &str) -> HttpResponse {
    HttpResponse::json(
        status,
        &FailureBody {
            success: false,
            error,
        },
    )
}

/// Route one request.
pub fn handle_request(method: &str, path: &str, body: &[u8], runner: &Runner) -> HttpResponse {
    if method == "OPTIONS" {
        return HttpResponse::empty(200);
    }

    let route = path.split('?').next().unwrap_or(path);
    if method != "POST" || route != "/analyze" {
        return HttpResponse::json(404, &NotFoundBody { error: "Not found" });
    }

    match Document::from_json_slice(body) {
        Ok(document) => {
            let results = runner.run(&document);
            info!(
                nodes = results.summary.total_nodes,
                renames = results.summary.rename_candidates_count,
                "analyzed request"
            );
            HttpResponse::json(
                200,
                &SuccessBody {
                    success: true,
                    results: &results,
                },
            )
        }
        Err(e) => {
            warn!(error = %e, "rejecting unparsable request body");
            failure(400, &e.to_string())
        }
    }
}

/// Parsed request line and body.
struct RawRequest {
    method: String,
    path: String,
    body: Vec<u8>,
}

enum ReadError {
    Malformed(String),
    TooLarge,
    Io(std::io::Error),
}

impl From<std::io::Error> for ReadError {
    fn from(e: std::io::Error) -> Self {
        ReadError::Io(e)
    }
}

/// A peer that hangs up mid-body sent a bad request, not a dropped one.
fn truncated(e: std::io::Error) -> ReadError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        ReadError::Malformed("request body shorter than declared".to_string())
    } else {
        ReadError::Io(e)
    }
}

async fn read_request<R>(stream: R) -> Result<RawRequest, ReadError>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;
    let mut parts = request_line.split_whitespace();
    let (Some(method), Some(path)) = (parts.next(), parts.next()) else {
        return Err(ReadError::Malformed(format!(
            "bad request line {:?}",
            request_line.trim()
        )));
    };
    let method = method.to_string();
    let path = path.to_string();

    let mut content_length = 0usize;
    let mut chunked = false;
    for _ in 0..MAX_HEADER_LINES {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().map_err(|_| {
                    ReadError::Malformed(format!("bad content-length {:?}", value.trim()))
                })?;
            } else if name.eq_ignore_ascii_case("transfer-encoding") {
                chunked = value
                    .split(',')
                    .any(|coding| coding.trim().eq_ignore_ascii_case("chunked"));
            }
        }
    }

    let body = if chunked {
        read_chunked(&mut reader).await?
    } else {
        if content_length > MAX_BODY_BYTES {
            return Err(ReadError::TooLarge);
        }
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).await.map_err(truncated)?;
        body
    };

    Ok(RawRequest { method, path, body })
}

/// Decode a `Transfer-Encoding: chunked` body, discarding trailers.
async fn read_chunked<R>(reader: &mut BufReader<R>) -> Result<Vec<u8>, ReadError>
where
    R: AsyncRead + Unpin,
{
    let mut body = Vec::new();
    loop {
        let mut size_line = String::new();
        if reader.read_line(&mut size_line).await? == 0 {
            return Err(ReadError::Malformed("unterminated chunked body".to_string()));
        }
        let size_field = size_line.split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_field, 16)
            .map_err(|_| ReadError::Malformed(format!("bad chunk size {:?}", size_field)))?;

        if size == 0 {
            for _ in 0..MAX_HEADER_LINES {
                let mut trailer = String::new();
                if reader.read_line(&mut trailer).await? == 0 || trailer.trim_end().is_empty() {
                    break;
                }
            }
            return Ok(body);
        }

        if body.len() + size > MAX_BODY_BYTES {
            return Err(ReadError::TooLarge);
        }
        let start = body.len();
        body.resize(start + size, 0);
        reader.read_exact(&mut body[start..]).await.map_err(truncated)?;

        let mut crlf = [0u8; 2];
        reader.read_exact(&mut crlf).await.map_err(truncated)?;
        if &crlf != b"\r\n" {
            return Err(ReadError::Malformed("chunk not terminated by CRLF".to_string()));
        }
    }
}

async fn serve_connection(mut stream: TcpStream, runner: Arc<Runner>) {
    let response = match read_request(&mut stream).await {
        Ok(RawRequest { method, path, body }) => {
            debug!(%method, %path, bytes = body.len(), "request");
            // Analysis is CPU-bound; keep it off the async workers.
            tokio::task::spawn_blocking(move || handle_request(&method, &path, &body, &runner))
                .await
                .unwrap_or_else(|e| {
                    warn!(error = %e, "analysis task failed");
                    failure(500, "analysis failed")
                })
        }
        Err(ReadError::Malformed(msg)) => {
            warn!(error = %msg, "malformed request");
            failure(400, &msg)
        }
        Err(ReadError::TooLarge) => {
            warn!("request body too large");
            failure(413, "request body too large")
        }
        Err(ReadError::Io(e)) => {
            debug!(error = %e, "connection dropped");
            return;
        }
    };

    if let Err(e) = stream.write_all(&response.to_bytes()).await {
        debug!(error = %e, "writing response");
    }
    let _ = stream.shutdown().await;
}

/// Accept connections on `listener` forever.
pub async fn serve_listener(listener: TcpListener, runner: Arc<Runner>) -> anyhow::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        debug!(%peer, "accepted connection");
        tokio::spawn(serve_connection(stream, Arc::clone(&runner)));
    }
}

/// Bind `host:port` and analyze each `POST /analyze` body.
pub async fn serve(host: &str, port: u16, selection: ModuleSelection) -> anyhow::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    let local = listener.local_addr()?;
    info!("figma-organizer server listening on http://{}", local);
    info!("POST http://{}/analyze", local);

    serve_listener(listener, Arc::new(Runner::new().modules(selection))).await
}
