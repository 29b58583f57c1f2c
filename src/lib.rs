//! Decoder for the DSMR "P1" telegrams smart meters broadcast on their
//! serial port.
//!
//! A [`reader::P1Reader`] owns the input and runs a [`reader::Framer`] on its
//! own thread, delivering one [`telegram::Telegram`] per complete frame:
//!
//! ```no_run
//! use p1mon::reader::{P1Reader, ReaderConfig};
//!
//! let input = std::fs::File::open("/dev/ttyUSB0")?;
//! let reader = P1Reader::start(input, ReaderConfig::default())?;
//! for telegram in reader.iter() {
//!     println!("{} sent {} objects", telegram.device, telegram.objects.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalogue;
pub mod checksum;
pub mod error;
pub mod parser;
pub mod reader;
pub mod telegram;

#[cfg(test)]
mod testdata;

pub use catalogue::{Catalogue, ObisType};
pub use error::{Error, ParseError};
pub use parser::LineParser;
pub use reader::{Framing, P1Reader, ReaderConfig};
pub use telegram::{Telegram, TelegramObject, TelegramValue};
