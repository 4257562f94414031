use std::io::{self, ErrorKind, Read, Write};
use std::net::TcpStream;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use apdu_core::apdu::{ApduAnswer, ApduCommand};
use apdu_core::backend::Backend;
use apdu_core::error::DeviceError;
use apdu_core::framing;
use apdu_core::status::StatusWord;
use ledger_transport::{APDUAnswer, APDUCommand};
#[cfg(feature = "hid")]
use ledger_transport_hid::{hidapi::HidApi, TransportNativeHID};
use log::{debug, info, warn};
use serialport::SerialPort;

/// Talks to the device over a byte stream with length prefixed frames.
pub struct FramedBackend<T: Read + Write> {
    stream: T,
}

/// The APDU port of a Speculos emulator.
pub type SpeculosBackend = FramedBackend<TcpStream>;
/// A device on a serial line.
pub type SerialBackend = FramedBackend<Box<dyn SerialPort>>;

impl<T: Read + Write> FramedBackend<T> {
    pub fn new(stream: T) -> Self {
        Self { stream }
    }

    pub fn into_inner(self) -> T {
        self.stream
    }
}

impl FramedBackend<TcpStream> {
    pub fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self, DeviceError> {
        let stream = TcpStream::connect((host, port))?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_nodelay(true)?;
        info!("connected to APDU port {}:{}", host, port);
        Ok(Self::new(stream))
    }
}

impl FramedBackend<Box<dyn SerialPort>> {
    pub fn open(path: &str, baud_rate: u32, timeout: Duration) -> Result<Self, DeviceError> {
        let port = serialport::new(path, baud_rate).timeout(timeout).open()?;
        info!("opened serial port {} at {} baud", path, baud_rate);
        Ok(Self::new(port))
    }
}

impl<T: Read + Write> Backend for FramedBackend<T> {
    fn exchange(&mut self, command: &ApduCommand) -> Result<ApduAnswer, DeviceError> {
        debug!("=> {}", hex::encode(command.to_bytes()));
        framing::write_command(&mut self.stream, command)?;
        let answer = framing::read_answer(&mut self.stream)?;
        debug!("<= {}", hex::encode(answer.to_bytes()));
        Ok(answer)
    }
}

/// Carries one APDU to a Ledger device over HID and brings back its answer.
pub trait HidTransport: Send + Sync + 'static {
    fn send_apdu(&self, command: &APDUCommand<Vec<u8>>) -> Result<APDUAnswer<Vec<u8>>, DeviceError>;
}

#[cfg(feature = "hid")]
impl HidTransport for TransportNativeHID {
    fn send_apdu(&self, command: &APDUCommand<Vec<u8>>) -> Result<APDUAnswer<Vec<u8>>, DeviceError> {
        self.exchange(command)
            .map_err(|e| DeviceError::HidTransport(e.to_string()))
    }
}

/// Talks to a Ledger device over HID. Every exchange gives up after `timeout`.
pub struct HidBackend<T: HidTransport> {
    transport: Arc<T>,
    timeout: Duration,
}

impl<T: HidTransport> HidBackend<T> {
    pub fn new(transport: T, timeout: Duration) -> Self {
        Self {
            transport: Arc::new(transport),
            timeout,
        }
    }
}

#[cfg(feature = "hid")]
impl HidBackend<TransportNativeHID> {
    /// Opens the first Ledger device hidapi finds.
    pub fn open(timeout: Duration) -> Result<Self, DeviceError> {
        let api = HidApi::new().map_err(|e| DeviceError::HidTransport(e.to_string()))?;
        let transport =
            TransportNativeHID::new(&api).map_err(|e| DeviceError::HidTransport(e.to_string()))?;
        info!("opened Ledger HID device");
        Ok(Self::new(transport, timeout))
    }
}

impl<T: HidTransport> Backend for HidBackend<T> {
    fn exchange(&mut self, command: &ApduCommand) -> Result<ApduAnswer, DeviceError> {
        debug!("=> {}", hex::encode(command.to_bytes()));
        let request = APDUCommand {
            cla: command.cla,
            ins: command.ins,
            p1: command.p1,
            p2: command.p2,
            data: command.data().to_vec(),
        };

        // hidapi blocks without a bound of our own, the answer is awaited on a channel instead
        let transport = Arc::clone(&self.transport);
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(transport.send_apdu(&request));
        });

        let reply = match rx.recv_timeout(self.timeout) {
            Ok(reply) => reply?,
            Err(RecvTimeoutError::Timeout) => {
                warn!("no HID answer within {:?}", self.timeout);
                return Err(io::Error::new(ErrorKind::TimedOut, "no answer from the HID device").into());
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(DeviceError::HidTransport("exchange stopped without an answer".to_string()));
            }
        };

        let answer = ApduAnswer::new(reply.data(), StatusWord(reply.retcode()))?;
        debug!("<= {}", hex::encode(answer.to_bytes()));
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use apdu_core::instruction::Instruction;

    use super::*;

    /// Reads a scripted reply and records everything written to it.
    struct FakePort {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl FakePort {
        fn replying(input: Vec<u8>) -> Self {
            Self {
                input: Cursor::new(input),
                output: Vec::new(),
            }
        }
    }

    impl Read for FakePort {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for FakePort {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn framed_exchange() {
        let port = FakePort::replying(vec![0, 0, 0, 0, 0x90, 0x00]);
        let mut backend = FramedBackend::new(port);
        let answer = backend.exchange(&Instruction::GetVersion.command()).unwrap();
        assert_eq!(answer.status, 0x9000);

        let port = backend.into_inner();
        assert_eq!(port.output, vec![0, 0, 0, 5, 0xE0, 0x03, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn framed_exchange_truncated_reply() {
        let port = FakePort::replying(vec![0, 0, 0, 3, 0x01]);
        let mut backend = FramedBackend::new(port);
        let err = backend.exchange(&Instruction::GetVersion.command()).unwrap_err();
        assert!(matches!(err, DeviceError::IoError(_)));
    }

    /// Answers every command with a fixed reply and keeps the last command seen.
    struct ScriptedHid {
        reply: Vec<u8>,
        seen: std::sync::Mutex<Option<APDUCommand<Vec<u8>>>>,
    }

    impl HidTransport for ScriptedHid {
        fn send_apdu(
            &self,
            command: &APDUCommand<Vec<u8>>,
        ) -> Result<APDUAnswer<Vec<u8>>, DeviceError> {
            *self.seen.lock().unwrap() = Some(command.clone());
            Ok(APDUAnswer::from_answer(self.reply.clone()).unwrap())
        }
    }

    /// A device that never answers.
    struct SilentHid;

    impl HidTransport for SilentHid {
        fn send_apdu(&self, _: &APDUCommand<Vec<u8>>) -> Result<APDUAnswer<Vec<u8>>, DeviceError> {
            thread::sleep(Duration::from_secs(60));
            Err(DeviceError::HidTransport("woke up".to_string()))
        }
    }

    /// A transport whose hidapi call fails.
    struct UnpluggedHid;

    impl HidTransport for UnpluggedHid {
        fn send_apdu(&self, _: &APDUCommand<Vec<u8>>) -> Result<APDUAnswer<Vec<u8>>, DeviceError> {
            Err(DeviceError::HidTransport("device disconnected".to_string()))
        }
    }

    #[test]
    fn hid_exchange() {
        let mut backend = HidBackend::new(
            ScriptedHid {
                reply: vec![0x01, 0x02, 0x03, 0x90, 0x00],
                seen: std::sync::Mutex::new(None),
            },
            Duration::from_secs(5),
        );
        let answer = backend.exchange(&Instruction::GetVersion.command()).unwrap();
        assert_eq!(answer.data(), &[1, 2, 3]);
        assert_eq!(answer.status, 0x9000);

        let seen = backend.transport.seen.lock().unwrap().clone().unwrap();
        assert_eq!((seen.cla, seen.ins, seen.p1, seen.p2), (0xE0, 0x03, 0x00, 0x00));
        assert!(seen.data.is_empty());
    }

    #[test]
    fn hid_exchange_keeps_error_status() {
        let mut backend = HidBackend::new(
            ScriptedHid {
                reply: vec![0x6D, 0x00],
                seen: std::sync::Mutex::new(None),
            },
            Duration::from_secs(5),
        );
        let answer = backend.exchange(&Instruction::GetVersion.command()).unwrap();
        assert_eq!(answer.status, 0x6D00);
        assert!(answer.data().is_empty());
    }

    #[test]
    fn silent_hid_device_times_out() {
        let mut backend = HidBackend::new(SilentHid, Duration::from_millis(50));
        let started = std::time::Instant::now();
        let err = backend.exchange(&Instruction::GetVersion.command()).unwrap_err();
        assert!(matches!(err, DeviceError::IoError(ref e) if e.kind() == ErrorKind::TimedOut));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn hid_transport_error_is_returned() {
        let mut backend = HidBackend::new(UnpluggedHid, Duration::from_secs(5));
        let err = backend.exchange(&Instruction::GetVersion.command()).unwrap_err();
        assert!(matches!(err, DeviceError::HidTransport(_)));
    }
}
