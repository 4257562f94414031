//! # APDU-Core
//! This library provides shared types and utilities for talking to Ledger style secure devices.
//! It is used by the boilerplate client and by the boilerplate emulator.
//! ## Features
//! - Encoding and decoding APDUs in the [apdu] module
//! - Status words in the [status] module
//! - Length prefixed stream framing (Speculos, serial) in the [framing] module
//! - Instructions shared by host and device in the [instruction] module
//! - The [Backend](backend::Backend) trait every transport implements
//! - Shared device errors in the [error] module
pub mod apdu;
pub mod backend;
pub mod error;
pub mod framing;
pub mod instruction;
pub mod status;
pub mod version;
