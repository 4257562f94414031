//! # Boilerplate-Client
//! This library is the host side of the Ledger boilerplate application. It builds the
//! application's APDUs, sends them through a [Backend](apdu_core::backend::Backend) and unpacks
//! the answers.
//!
//! The [BoilerplateCommandSender](command_sender::BoilerplateCommandSender) borrows whatever
//! backend it is given: the APDU port of a Speculos emulator, a serial line, a Ledger over HID
//! (with the `hid` feature), or the in process emulator used by the tests.
//!
//! ```no_run
//! use boilerplate_client::backend::SpeculosBackend;
//! use boilerplate_client::command_sender::BoilerplateCommandSender;
//!
//! let mut backend = SpeculosBackend::connect("127.0.0.1", 9999, std::time::Duration::from_secs(10)).unwrap();
//! let rapdu = BoilerplateCommandSender::new(&mut backend).show_message().unwrap();
//! assert_eq!(rapdu.status, 0x9000);
//! ```
//! ## Testing
//! Unit tests live next to the code. `tests/test_version_cmd.rs` runs the command sender against
//! the emulator, in process and over TCP, and holds ignored tests for a live Speculos instance.

pub mod backend;
pub mod cli;
pub mod command_sender;
pub mod response_unpacker;

pub use apdu_core;
pub use serialport;
