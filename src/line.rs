//! Line-based codec for tokio.
//!
//! Reads `\n`-terminated lines and decodes each one as UTF-8, falling back
//! to a configured legacy encoding when the bytes are not valid UTF-8.
//! Writes lines as UTF-8 terminated by CRLF.

use bytes::{BufMut, BytesMut};
use encoding::Encoding;
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

use crate::error::{ClientError, ProtocolError};

/// Default maximum line length, tags included.
pub const MAX_IRC_LINE_LEN: usize = 8191;

/// One inbound line after decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedLine {
    /// Line text without its terminator.
    pub text: String,
    /// The bytes were not valid UTF-8 and the fallback encoding was used.
    pub used_fallback: bool,
}

/// Line codec with an encoding fallback.
///
/// Lines longer than the configured limit are discarded with a warning
/// instead of failing the stream.
#[derive(Debug)]
pub struct LineCodec {
    fallback: &'static Encoding,
    /// Index of next byte to check for newline
    next_index: usize,
    max_len: usize,
    /// Skipping the rest of an oversized line.
    discarding: bool,
}

impl LineCodec {
    /// Create a codec whose fallback is the encoding named by `label`
    /// (e.g. `"iso-8859-1"`, `"windows-1251"`).
    pub fn new(label: &str) -> Result<Self, ClientError> {
        let fallback = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| ClientError::UnknownEncoding(label.to_owned()))?;
        Ok(Self {
            fallback,
            next_index: 0,
            max_len: MAX_IRC_LINE_LEN,
            discarding: false,
        })
    }

    /// Create a codec with a custom max line length.
    pub fn with_max_len(label: &str, max_len: usize) -> Result<Self, ClientError> {
        let mut codec = Self::new(label)?;
        codec.max_len = max_len;
        Ok(codec)
    }

    pub fn fallback_encoding(&self) -> &'static Encoding {
        self.fallback
    }

    /// Decode one line's bytes, without its terminator.
    pub fn decode_line(&self, bytes: &[u8]) -> DecodedLine {
        match std::str::from_utf8(bytes) {
            Ok(text) => DecodedLine {
                text: text.to_owned(),
                used_fallback: false,
            },
            Err(_) => {
                let (text, _had_errors) = self.fallback.decode_without_bom_handling(bytes);
                DecodedLine {
                    text: text.into_owned(),
                    used_fallback: true,
                }
            }
        }
    }

    /// Cut `line` at its first CR or LF so it can never carry a second
    /// protocol line.
    pub fn sanitize(line: &str) -> &str {
        match line.find(['\r', '\n']) {
            Some(pos) => &line[..pos],
            None => line,
        }
    }
}

impl Decoder for LineCodec {
    type Item = DecodedLine;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<DecodedLine>, ProtocolError> {
        loop {
            let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
                self.next_index = src.len();
                if src.len() > self.max_len {
                    warn!(
                        limit = self.max_len,
                        "discarding oversized line"
                    );
                    src.clear();
                    self.next_index = 0;
                    self.discarding = true;
                }
                return Ok(None);
            };

            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if self.discarding {
                self.discarding = false;
                continue;
            }
            if line.len() > self.max_len {
                warn!(
                    actual = line.len(),
                    limit = self.max_len,
                    "discarding oversized line"
                );
                continue;
            }

            let mut end = line.len() - 1;
            if end > 0 && line[end - 1] == b'\r' {
                end -= 1;
            }
            return Ok(Some(self.decode_line(&line[..end])));
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        dst.reserve(line.len() + 2);
        dst.put_slice(line.as_bytes());
        dst.put_slice(b"\r\n");
        Ok(())
    }
}
