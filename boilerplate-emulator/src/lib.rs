//! # Boilerplate-Emulator
//! An in process stand in for the Ledger boilerplate application. The [App](app::App)
//! answers APDUs the way the device application does: it checks the class byte and the
//! command length, decodes the instruction, shows "Message Received" until the ticker
//! runs out and replies with `0x9000`.
//!
//! The app can be handed to a command sender directly since it implements
//! [Backend](apdu_core::backend::Backend), or be served on a TCP port with the
//! Speculos APDU framing through [Server](server::Server).

pub mod app;
pub mod server;

pub use apdu_core;
