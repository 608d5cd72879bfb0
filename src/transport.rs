//! Wire transport: the last stop of the interceptor chain.
//!
//! # The contract
//!
//! The gateway sits on the internal network behind the edge proxy. The proxy
//! owns TLS, retries at the edge, and request shaping — so this transport
//! deliberately stays small: plain HTTP/1.1 over a fresh TCP connection per
//! request, `connection: close`, no pooling, no timeouts. A failed request is
//! surfaced once; whether to retry is the caller's decision.
//!
//! Tests never touch the network — [`FnTransport`] adapts any async closure
//! into a [`Transport`], so a stub is one line.

use std::future::Future;
use std::io;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::error::Error;
use crate::pipeline::BoxFuture;
use crate::request::Request;
use crate::response::Response;

// ── Transport trait ───────────────────────────────────────────────────────────

/// Moves one request across the wire and produces one response.
///
/// Only transport-level failures are `Err` here; a non-2xx response is a
/// perfectly good `Ok` at this layer. The pipeline converts it afterwards.
pub trait Transport: Send + Sync + 'static {
    fn send(&self, req: Request) -> BoxFuture<'_, Result<Response, Error>>;
}

/// Newtype adapter implementing [`Transport`] for plain async functions.
///
/// ```rust
/// use bytes::Bytes;
/// use teller::{FnTransport, Request, Response};
///
/// let stub = FnTransport(|_req: Request| async {
///     Ok::<_, teller::Error>(Response::new(200, vec![], Bytes::from_static(b"42")))
/// });
/// ```
pub struct FnTransport<F>(pub F);

impl<F, Fut> Transport for FnTransport<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
    fn send(&self, req: Request) -> BoxFuture<'_, Result<Response, Error>> {
        Box::pin((self.0)(req))
    }
}

// ── TcpTransport ──────────────────────────────────────────────────────────────

/// The production transport: HTTP/1.1 over a per-request TCP connection.
#[derive(Clone, Copy, Debug, Default)]
pub struct TcpTransport;

impl TcpTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for TcpTransport {
    fn send(&self, req: Request) -> BoxFuture<'_, Result<Response, Error>> {
        Box::pin(async move {
            let target = Target::parse(req.url())?;
            let mut stream = TcpStream::connect((target.host.as_str(), target.port)).await?;
            write_request(&mut stream, &req, &target).await?;
            let resp = read_response(&mut stream).await?;
            debug!(method = %req.method(), url = req.url(), status = resp.status(), "request completed");
            Ok(resp)
        })
    }
}

// ── URL parsing ───────────────────────────────────────────────────────────────

/// The pieces of an `http://` URL the transport needs.
struct Target {
    host: String,
    port: u16,
    /// `host` or `host:port` for the `host` header.
    authority: String,
    /// Path plus query, always starting with `/`.
    path: String,
}

impl Target {
    fn parse(url: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidUrl(url.to_owned());

        let rest = url.strip_prefix("http://").ok_or_else(invalid)?;
        let (authority, path) = match rest.split_once('/') {
            Some((authority, path)) => (authority, format!("/{path}")),
            None => (rest, "/".to_owned()),
        };
        if authority.is_empty() {
            return Err(invalid());
        }

        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => (host, port.parse::<u16>().map_err(|_| invalid())?),
            None => (authority, 80),
        };
        if host.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            host: host.to_owned(),
            port,
            authority: authority.to_owned(),
            path,
        })
    }
}

// ── Request serialisation ─────────────────────────────────────────────────────

async fn write_request<W: AsyncWrite + Unpin>(
    writer: &mut W,
    req: &Request,
    target: &Target,
) -> io::Result<()> {
    writer
        .write_all(format!("{} {} HTTP/1.1\r\n", req.method(), target.path).as_bytes())
        .await?;
    writer.write_all(format!("host: {}\r\n", target.authority).as_bytes()).await?;
    writer.write_all(format!("content-length: {}\r\n", req.body().len()).as_bytes()).await?;
    writer.write_all(b"connection: close\r\n").await?;
    for (name, value) in req.headers() {
        writer.write_all(format!("{name}: {value}\r\n").as_bytes()).await?;
    }
    writer.write_all(b"\r\n").await?;
    writer.write_all(req.body()).await?;
    writer.flush().await
}

// ── Response parsing ──────────────────────────────────────────────────────────

async fn read_response<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Response, Error> {
    let mut raw = Vec::with_capacity(4096);

    // Read until the blank line terminating the header block.
    let header_end = loop {
        if let Some(pos) = find_header_end(&raw) {
            break pos;
        }
        let mut buf = [0u8; 4096];
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Err(eof("connection closed before response headers"));
        }
        raw.extend_from_slice(&buf[..n]);
    };

    let head = std::str::from_utf8(&raw[..header_end])
        .map_err(|_| bad_response("response headers are not valid UTF-8"))?;
    let mut lines = head.split("\r\n");

    // Status line: `HTTP/1.1 200 OK`.
    let status: u16 = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse().ok())
        .ok_or_else(|| bad_response("malformed status line"))?;

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_owned(), value.trim().to_owned()))
        .collect();

    let mut body = raw[header_end + 4..].to_vec();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok());
    let chunked = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("transfer-encoding"))
        .is_some_and(|(_, v)| v.to_ascii_lowercase().contains("chunked"));

    if let Some(len) = content_length {
        while body.len() < len {
            let mut buf = [0u8; 4096];
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                return Err(eof("connection closed mid-body"));
            }
            body.extend_from_slice(&buf[..n]);
        }
        body.truncate(len);
    } else {
        // `connection: close` — the body runs to EOF.
        loop {
            let mut buf = [0u8; 4096];
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&buf[..n]);
        }
        if chunked {
            body = decode_chunked(&body)?;
        }
    }

    Ok(Response::new(status, headers, Bytes::from(body)))
}

fn find_header_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|w| w == b"\r\n\r\n")
}

fn decode_chunked(raw: &[u8]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(raw.len());
    let mut rest = raw;
    loop {
        let line_end = rest
            .windows(2)
            .position(|w| w == b"\r\n")
            .ok_or_else(|| bad_response("truncated chunk size line"))?;
        let size_line = std::str::from_utf8(&rest[..line_end])
            .map_err(|_| bad_response("malformed chunk size line"))?;
        // Chunk extensions (`;...`) are permitted and ignored.
        let size_hex = size_line.split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_hex, 16)
            .map_err(|_| bad_response("malformed chunk size"))?;
        rest = &rest[line_end + 2..];
        if size == 0 {
            return Ok(out);
        }
        if rest.len() < size + 2 {
            return Err(eof("connection closed mid-chunk"));
        }
        out.extend_from_slice(&rest[..size]);
        rest = &rest[size + 2..];
    }
}

fn eof(msg: &str) -> Error {
    Error::Transport(io::Error::new(io::ErrorKind::UnexpectedEof, msg.to_owned()))
}

fn bad_response(msg: &str) -> Error {
    Error::Transport(io::Error::new(io::ErrorKind::InvalidData, msg.to_owned()))
}
