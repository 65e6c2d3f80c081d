//! Transport abstraction over the wire format, so the named-pipe
//! implementation and an in-memory double used in tests share one codec.

use super::protocol::{Message, Response};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("connection closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// One full-duplex client connection, already accepted.
#[async_trait::async_trait]
pub trait Connection: Send {
    async fn read_message(&mut self) -> Result<Message>;
    async fn write_response(&mut self, response: Response, payload: &[u8]) -> Result<()>;
}

/// Wraps any `AsyncRead + AsyncWrite` stream (a named pipe instance, or a
/// duplex pair in tests) with the fixed-header framing.
pub struct FramedConnection<S> {
    pub(crate) stream: S,
}

impl<S> FramedConnection<S> {
    pub fn new(stream: S) -> Self {
        Self { stream }
    }
}

#[async_trait::async_trait]
impl<S> Connection for FramedConnection<S>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send,
{
    async fn read_message(&mut self) -> Result<Message> {
        let mut buf = [0u8; Message::WIRE_SIZE];
        self.stream
            .read_exact(&mut buf)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::UnexpectedEof => TransportError::Closed,
                _ => TransportError::Io(e),
            })?;
        Ok(Message::from_bytes(&buf))
    }

    async fn write_response(&mut self, response: Response, payload: &[u8]) -> Result<()> {
        self.stream.write_all(&response.to_bytes()).await?;
        if !payload.is_empty() {
            self.stream.write_all(payload).await?;
        }
        self.stream.flush().await?;
        Ok(())
    }
}

#[cfg(windows)]
pub mod named_pipe {
    use super::*;
    use tokio::net::windows::named_pipe::{ServerOptions, NamedPipeServer};

    /// Creates the next named-pipe server instance listening at
    /// [`super::super::protocol::PIPE_NAME`]. The caller awaits
    /// `connect()` before wrapping the result in a [`FramedConnection`].
    pub fn create_pipe_instance(first: bool) -> std::io::Result<NamedPipeServer> {
        ServerOptions::new()
            .first_pipe_instance(first)
            .in_buffer_size(4096)
            .out_buffer_size(4096)
            .create(super::super::protocol::PIPE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::protocol::Command;

    #[tokio::test]
    async fn framed_connection_round_trips_over_duplex() {
        let (client, server) = tokio::io::duplex(256);
        let mut client_conn = FramedConnection::new(client);
        let mut server_conn = FramedConnection::new(server);

        let msg = Message {
            cmd: Command::Echo as u32,
            session_id: 1,
            param1: 0,
            param2: 0,
        };
        tokio::io::AsyncWriteExt::write_all(&mut client_conn.stream, &msg.to_bytes())
            .await
            .unwrap();

        let got = server_conn.read_message().await.unwrap();
        assert_eq!(got, msg);

        server_conn
            .write_response(Response::ok(), b"hi")
            .await
            .unwrap();
        let mut header = [0u8; Response::WIRE_SIZE];
        tokio::io::AsyncReadExt::read_exact(&mut client_conn.stream, &mut header)
            .await
            .unwrap();
        assert_eq!(Response::from_bytes(&header), Response::ok());
    }
}
