//! CRC-32 integrity checksum over arbitrary byte ranges.
//!
//! The reflected CRC-32 everyone knows, the CRC-32/ISO-HDLC variant:
//! polynomial `0xEDB88320`, initial register `0xFFFFFFFF`, final complement.
//! Used by the update flow to confirm a freshly written image before it is
//! marked valid. Integrity attestation only, not cryptographic
//! authentication.

const POLYNOMIAL: u32 = 0xEDB8_8320;

/// Running CRC-32 over a byte stream.
///
/// Pure local state, so it is safe to use from any context. Feeding the whole
/// range through a single [`update`](Self::update) is equivalent to feeding
/// it in chunks, which is how an update flow receiving an image piecewise
/// verifies it without buffering.
pub struct Crc32 {
    state: u32,
}

impl Crc32 {
    pub const fn new() -> Self {
        Self { state: 0xFFFF_FFFF }
    }

    /// Consume the next chunk of the byte stream.
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.state ^= u32::from(byte);
            for _ in 0..8 {
                if self.state & 1 != 0 {
                    self.state = (self.state >> 1) ^ POLYNOMIAL;
                } else {
                    self.state >>= 1;
                }
            }
        }
    }

    /// Finish the stream and produce the checksum.
    pub const fn finalize(self) -> u32 {
        !self.state
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Checksum of a single byte range.
///
/// Deterministic and side-effect free. The empty range yields `0x0000_0000`
/// (the complement of the untouched initial register).
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(data);
    crc.finalize()
}
