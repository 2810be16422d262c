use core::fmt::{Debug, Formatter, Result};
use ufmt::{uDebug, uWrite};

/// Single-size (4 byte) UID as returned by cascade level 1 anticollision,
/// followed by its Block Check Character.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Uid {
    bytes: [u8; 4],
    bcc: u8,
}

impl Uid {
    /// Assumes `bcc` was received from the card; see [`Uid::is_valid`].
    pub fn new(bytes: [u8; 4], bcc: u8) -> Self {
        Uid { bytes, bcc }
    }

    /// Builds a UID with the checksum computed from `bytes`.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Uid { bytes, bcc: checksum(&bytes) }
    }

    pub fn bytes(&self) -> &[u8; 4] {
        &self.bytes
    }

    pub fn bcc(&self) -> u8 {
        self.bcc
    }

    /// True when the BCC equals the XOR of the four UID bytes.
    pub fn is_valid(&self) -> bool {
        checksum(&self.bytes) == self.bcc
    }

    /// The five bytes as they appear on the wire: UID then BCC.
    pub fn to_frame(&self) -> [u8; 5] {
        let [b0, b1, b2, b3] = self.bytes;
        [b0, b1, b2, b3, self.bcc]
    }
}

pub fn checksum(bytes: &[u8; 4]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

const HEX: &[u8; 16] = b"0123456789ABCDEF";

impl Uid {
    /// "01 02 03 04" without the BCC.
    fn hex_text(&self) -> [u8; 11] {
        let mut text = [b' '; 11];
        for (i, b) in self.bytes.iter().enumerate() {
            text[i * 3] = HEX[(b >> 4) as usize];
            text[i * 3 + 1] = HEX[(b & 0x0F) as usize];
        }
        text
    }
}

impl Debug for Uid {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = self.hex_text();
        f.write_str(core::str::from_utf8(&text).unwrap_or(""))
    }
}

impl uDebug for Uid {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<W>) -> core::result::Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        let text = self.hex_text();
        f.write_str(core::str::from_utf8(&text).unwrap_or(""))
    }
}
