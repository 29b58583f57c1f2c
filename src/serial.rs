use anyhow::{Context, Result};
use log::{info, trace};
use std::io::{self, Read};
use std::time::Duration;

use crate::config::Config;

/// How long a single serial read may wait before it is retried.
const READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Open the P1 port. DSMR 4+ meters send at 115200 8N1, DSMR 2.2/3 at
/// 9600 7E1. Sets DTR and RTS high; P1 cables use RTS as the data request
/// line and some power their level shifter from DTR.
pub fn open_port(config: &Config) -> Result<BlockingPort> {
    let (baud_rate, data_bits, parity) = if config.legacy_serial {
        (9600, serialport::DataBits::Seven, serialport::Parity::Even)
    } else {
        (
            config.baud_rate,
            serialport::DataBits::Eight,
            serialport::Parity::None,
        )
    };

    let mut port = serialport::new(&config.port, baud_rate)
        .data_bits(data_bits)
        .parity(parity)
        .stop_bits(serialport::StopBits::One)
        .timeout(READ_TIMEOUT)
        .open()
        .with_context(|| format!("Failed to open serial port {}", config.port))?;

    port.write_data_terminal_ready(true)
        .context("Failed to set DTR")?;
    port.write_request_to_send(true)
        .context("Failed to set RTS")?;

    info!("Opened {} at {} baud", config.port, baud_rate);
    Ok(BlockingPort { port })
}

/// Serial port whose reads block until data arrives, the port fails or
/// closes. Meters only send every 1 to 10 seconds, a timeout is not an error.
pub struct BlockingPort {
    port: Box<dyn serialport::SerialPort>,
}

impl Read for BlockingPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.port.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                    trace!("No P1 data within {:?}, still waiting", READ_TIMEOUT);
                }
                other => return other,
            }
        }
    }
}
