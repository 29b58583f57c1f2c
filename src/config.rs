use clap::{Parser, ValueEnum};
use p1mon::reader::{Framing, ReaderConfig};

/// Command line spelling of [`Framing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FramingArg {
    /// `/` header to `!` footer (DSMR)
    Footer,
    /// From one header to the next
    Header,
}

impl From<FramingArg> for Framing {
    fn from(arg: FramingArg) -> Self {
        match arg {
            FramingArg::Footer => Framing::Footer,
            FramingArg::Header => Framing::Header,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "p1mon",
    about = "DSMR smart meter P1 port reader publishing telegrams to MQTT"
)]
pub struct Config {
    /// Serial port the P1 cable is attached to
    #[arg(long, default_value = "/dev/ttyUSB0")]
    pub port: String,

    /// Serial baud rate (DSMR 4 and later use 115200)
    #[arg(long, default_value_t = 115200)]
    pub baud_rate: u32,

    /// DSMR 2.2/3 line settings: 9600 baud, 7 data bits, even parity
    #[arg(long)]
    pub legacy_serial: bool,

    /// Replay a captured P1 trace instead of opening the serial port
    #[arg(long)]
    pub input: Option<String>,

    /// How telegram boundaries are detected
    #[arg(long, value_enum, default_value_t = FramingArg::Footer)]
    pub framing: FramingArg,

    /// Accept telegrams whose CRC footer does not match
    #[arg(long)]
    pub no_verify_checksum: bool,

    /// MQTT broker hostname
    #[arg(long, default_value = "127.0.0.1")]
    pub mqtt_host: String,

    /// MQTT broker port
    #[arg(long, default_value_t = 1883)]
    pub mqtt_port: u16,

    /// MQTT client ID
    #[arg(long, default_value = "p1mon")]
    pub mqtt_client_id: String,

    /// MQTT topic to publish to
    #[arg(long, default_value = "tele/p1")]
    pub mqtt_topic: String,

    /// Print telegrams as JSON lines instead of publishing them
    #[arg(long)]
    pub print: bool,
}

impl Config {
    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig {
            framing: self.framing.into(),
            verify_checksum: !self.no_verify_checksum,
        }
    }
}
