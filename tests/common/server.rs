//! Fake IRC server.
//!
//! Accepts one connection at a time and lets a test script the server side
//! line by line.

use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_util::codec::{Framed, LinesCodec};

/// A listening fake server on an ephemeral local port.
pub struct FakeServer {
    listener: TcpListener,
}

impl FakeServer {
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Ok(Self { listener })
    }

    pub fn port(&self) -> u16 {
        self.listener
            .local_addr()
            .map(|addr| addr.port())
            .unwrap_or_default()
    }

    /// Wait for the client to connect.
    pub async fn accept(&self) -> anyhow::Result<FakeClient> {
        let (stream, _) = timeout(Duration::from_secs(5), self.listener.accept()).await??;
        Ok(FakeClient {
            lines: Framed::new(stream, LinesCodec::new()),
        })
    }
}

/// Server-side view of the connected client.
pub struct FakeClient {
    lines: Framed<TcpStream, LinesCodec>,
}

impl FakeClient {
    /// Send a raw line to the client.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.lines.send(format!("{line}\r")).await?;
        Ok(())
    }

    /// Write bytes straight to the socket, bypassing line encoding.
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.lines.get_mut().write_all(bytes).await?;
        Ok(())
    }

    /// Receive one line from the client, without its terminator.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        let line = timeout(Duration::from_secs(5), self.lines.next())
            .await?
            .ok_or_else(|| anyhow::anyhow!("client disconnected"))??;
        Ok(line.trim_end_matches('\r').to_string())
    }

    /// Receive lines until one equals `expected`, returning the lines
    /// skipped on the way.
    pub async fn expect(&mut self, expected: &str) -> anyhow::Result<Vec<String>> {
        let mut skipped = Vec::new();
        loop {
            let line = self.recv().await?;
            if line == expected {
                return Ok(skipped);
            }
            skipped.push(line);
        }
    }

    /// Drop the connection from the server side.
    pub fn close(self) {
        drop(self.lines);
    }
}
