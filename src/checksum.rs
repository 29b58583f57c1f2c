//! CRC16 footer verification for DSMR 4 and later.
//!
//! The footer line is `!XXXX`, XXXX being the CRC16/ARC of every byte from
//! the leading `/` up to and including the `!`, in upper-case hex. DSMR 2.2
//! and 3 meters end the telegram with a bare `!`.

use crc16::{State, ARC};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checksum {
    Valid,
    /// Bare `!` footer, nothing to verify.
    Missing,
    Mismatch { expected: u16, computed: u16 },
    /// Footer present but not four hex digits.
    Malformed,
}

impl Checksum {
    pub fn is_acceptable(&self) -> bool {
        matches!(self, Checksum::Valid | Checksum::Missing)
    }
}

pub fn compute(data: &[u8]) -> u16 {
    State::<ARC>::calculate(data)
}

/// Verify a raw telegram, header to footer line inclusive.
pub fn verify(raw: &[u8]) -> Checksum {
    let Some(bang) = raw.iter().rposition(|&b| b == b'!') else {
        return Checksum::Malformed;
    };
    let footer = String::from_utf8_lossy(&raw[bang + 1..]);
    let footer = footer.trim();

    if footer.is_empty() {
        return Checksum::Missing;
    }
    if footer.len() != 4 {
        return Checksum::Malformed;
    }
    let Ok(expected) = u16::from_str_radix(footer, 16) else {
        return Checksum::Malformed;
    };

    let computed = compute(&raw[..=bang]);
    debug!("Telegram CRC: expected {:04X}, computed {:04X}", expected, computed);

    if expected == computed {
        Checksum::Valid
    } else {
        Checksum::Mismatch { expected, computed }
    }
}
