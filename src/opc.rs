// Open Pixel Control wire protocol
//
// Each frame is one OPC set-pixel-colors message addressed to a fixed
// channel: a 4-byte header (channel, command, big-endian payload length)
// followed by the RGB payload. The connection is established once at
// startup and kept for the life of the process.

use std::io;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::debug;

/// OPC command code for set-pixel-colors.
pub const SET_PIXEL_COLORS: u8 = 0x00;
/// Channel the installation listens on.
pub const CHANNEL: u8 = 0;

/// A single OPC message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcMessage {
    pub channel: u8,
    pub data: Vec<u8>,
}

impl OpcMessage {
    pub fn set_pixel_colors(channel: u8, data: Vec<u8>) -> Self {
        Self { channel, data }
    }

    /// Wire encoding: `[channel, command, len_hi, len_lo]` + payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let len = self.data.len().min(u16::MAX as usize) as u16;
        let mut bytes = Vec::with_capacity(4 + self.data.len());
        bytes.push(self.channel);
        bytes.push(SET_PIXEL_COLORS);
        bytes.extend_from_slice(&len.to_be_bytes());
        bytes.extend_from_slice(&self.data[..len as usize]);
        bytes
    }
}

/// Persistent connection to the lighting controller.
#[derive(Debug)]
pub struct OpcClient {
    stream: TcpStream,
}

impl OpcClient {
    /// Connect once at startup. There is no retry path: without a
    /// controller there is nothing to drive.
    pub async fn connect(addr: impl ToSocketAddrs) -> io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        debug!(peer = ?stream.peer_addr().ok(), "controller connected");
        Ok(Self { stream })
    }

    /// Transmit one message. Errors are the caller's to log and drop;
    /// the next tick sends a fresh frame regardless.
    pub async fn send(&mut self, msg: &OpcMessage) -> io::Result<()> {
        self.stream.write_all(&msg.to_bytes()).await
    }
}
