//! Line framing for the socket.
//!
//! Splits on LF and leaves a trailing CR for [`Message::parse`] to trim.
//! Bytes are decoded lossily, so a line in a legacy charset reaches the
//! parser with replacement characters instead of ending the stream. Lines
//! longer than the limit are skipped whole.
//!
//! [`Message::parse`]: super::Message::parse

use bytes::{Buf, BytesMut};
use std::io;
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

/// Longest inbound line accepted, tags and terminator included.
pub const MAX_LINE_LENGTH: usize = 16 * 1024;

/// Newline-framed codec for IRC traffic.
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    max_len: usize,
    /// Set while dropping the rest of an overlong line.
    discarding: bool,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::with_max_len(MAX_LINE_LENGTH)
    }

    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> io::Result<Option<String>> {
        loop {
            let newline = src[self.next_index..].iter().position(|b| *b == b'\n');

            match (self.discarding, newline) {
                (true, Some(offset)) => {
                    src.advance(self.next_index + offset + 1);
                    self.next_index = 0;
                    self.discarding = false;
                }
                (true, None) => {
                    src.clear();
                    self.next_index = 0;
                    return Ok(None);
                }
                (false, Some(offset)) => {
                    let end = self.next_index + offset + 1;
                    self.next_index = 0;
                    if end > self.max_len {
                        warn!(len = end, limit = self.max_len, "skipping overlong line");
                        src.advance(end);
                        continue;
                    }
                    let line = src.split_to(end);
                    return Ok(Some(String::from_utf8_lossy(&line[..end - 1]).into_owned()));
                }
                (false, None) if src.len() > self.max_len => {
                    warn!(len = src.len(), limit = self.max_len, "skipping overlong line");
                    self.discarding = true;
                }
                (false, None) => {
                    self.next_index = src.len();
                    return Ok(None);
                }
            }
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = io::Error;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> io::Result<()> {
        dst.reserve(line.len() + 2);
        dst.extend_from_slice(line.as_bytes());
        dst.extend_from_slice(b"\r\n");
        Ok(())
    }
}
