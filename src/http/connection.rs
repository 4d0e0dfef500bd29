use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::config::ServerConfig;
use crate::http::parser::{find_headers_end, parse_request_line, ParseError};
use crate::http::request::Request;
use crate::http::writer::ResponseWriter;
use crate::static_files::StaticFileHandler;

/// One accepted client, served exactly once.
pub struct Connection<S> {
    stream: S,
    handler: Arc<StaticFileHandler>,
    buffer: BytesMut,
    buffer_size: usize,
    read_timeout: Option<Duration>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, handler: Arc<StaticFileHandler>, cfg: &ServerConfig) -> Self {
        Self {
            stream,
            handler,
            buffer: BytesMut::with_capacity(cfg.buffer_size),
            buffer_size: cfg.buffer_size,
            read_timeout: cfg.read_timeout_secs.map(Duration::from_secs),
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Some(req) => ConnectionState::Processing(req),
                        None => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    let response = self.handler.handle(req).await;

                    tracing::info!(
                        method = %req.method,
                        uri = %req.target,
                        status = response.status.as_u16(),
                        "Request served"
                    );

                    let writer = ResponseWriter::new(&response);
                    self.state = ConnectionState::Writing(writer);
                }

                ConnectionState::Writing(writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    // No keep-alive: one response per connection.
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(error = %e, "Shutdown after response failed");
        }

        Ok(())
    }

    /// Reads and parses the request line.
    ///
    /// Returns `None` when nothing usable arrived (empty, malformed, or timed
    /// out); the connection is then closed without a response.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        match self.read_timeout {
            Some(limit) => {
                let Ok(filled) = timeout(limit, self.fill_buffer()).await else {
                    tracing::warn!(timeout_secs = limit.as_secs(), "Client did not send a request in time");
                    return Ok(None);
                };
                filled?;
            }
            None => self.fill_buffer().await?,
        }

        tracing::debug!(raw = %String::from_utf8_lossy(&self.buffer), "Got a request");

        match parse_request_line(&self.buffer) {
            Ok(request) => Ok(Some(request)),
            Err(ParseError::Incomplete) => Ok(None),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed request");
                Ok(None)
            }
        }
    }

    /// Fills the buffer until the header block ends, the buffer is full, or
    /// the client stops sending. Anything past `buffer_size` is never read.
    async fn fill_buffer(&mut self) -> anyhow::Result<()> {
        while self.buffer.len() < self.buffer_size && find_headers_end(&self.buffer).is_none() {
            let remaining = (self.buffer_size - self.buffer.len()) as u64;
            let n = (&mut self.stream)
                .take(remaining)
                .read_buf(&mut self.buffer)
                .await?;

            if n == 0 {
                // Client closed its write side
                break;
            }
        }

        Ok(())
    }
}
