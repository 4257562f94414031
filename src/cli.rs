use std::time::Duration;

use apdu_core::apdu::ApduCommand;
use apdu_core::backend::Backend;
use apdu_core::error::DeviceError;
use clap::{Parser, Subcommand, ValueEnum};

#[cfg(feature = "hid")]
use crate::backend::HidBackend;
use crate::backend::{SerialBackend, SpeculosBackend};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// How to reach the device
    #[clap(long, value_enum, env = "BOILERPLATE_TRANSPORT", default_value = "speculos")]
    pub transport: TransportKind,
    /// Host of the Speculos APDU port
    #[clap(long, env = "SPECULOS_HOST", default_value = "127.0.0.1")]
    pub host: String,
    /// Speculos APDU port
    #[clap(long, env = "SPECULOS_APDU_PORT", default_value_t = 9999)]
    pub port: u16,
    /// Serial device, e.g. /dev/ttyUSB0 or COM4
    #[clap(long, env = "BOILERPLATE_SERIAL_PORT")]
    pub serial_port: Option<String>,
    #[clap(long, env = "BOILERPLATE_BAUD_RATE", default_value_t = 115200)]
    pub baud_rate: u32,
    /// Read timeout of every transport. The device holds its answer while the message is on screen.
    #[clap(long, env = "BOILERPLATE_TIMEOUT_MS", default_value_t = 10_000)]
    pub timeout_ms: u64,
    #[clap(subcommand)]
    pub command: CliCommand,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportKind {
    Speculos,
    Serial,
    Hid,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum CliCommand {
    /// Ask the device to show "Message Received"
    ShowMessage,
    /// Read the version of the application
    GetVersion,
    /// Send an APDU given in hex, e.g. e003000000
    Raw { apdu: String },
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn open_backend(&self) -> Result<Box<dyn Backend>, DeviceError> {
        match self.transport {
            TransportKind::Speculos => Ok(Box::new(SpeculosBackend::connect(
                &self.host,
                self.port,
                self.timeout(),
            )?)),
            TransportKind::Serial => {
                let path = self
                    .serial_port
                    .as_deref()
                    .ok_or(DeviceError::MissingSetting("serial port"))?;
                Ok(Box::new(SerialBackend::open(path, self.baud_rate, self.timeout())?))
            }
            #[cfg(feature = "hid")]
            TransportKind::Hid => Ok(Box::new(HidBackend::open(self.timeout())?)),
            #[cfg(not(feature = "hid"))]
            TransportKind::Hid => Err(DeviceError::Unsupported("HID transport")),
        }
    }
}

/// Parses a hex encoded APDU, whitespace between bytes is allowed.
pub fn parse_apdu(text: &str) -> Result<ApduCommand, DeviceError> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let raw = hex::decode(compact)?;
    Ok(ApduCommand::from_bytes(&raw)?)
}
