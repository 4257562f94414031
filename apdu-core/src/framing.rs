//! Length prefixed APDU framing over byte streams, as spoken by the Speculos
//! APDU port. Serial links use the same framing.
//!
//! Host to device: `len (u32 BE) | apdu`.
//! Device to host: `len (u32 BE, data only) | data | SW1 SW2`.

use std::io::{ErrorKind, Read, Write};

use arrayvec::ArrayVec;

use crate::apdu::{ApduAnswer, ApduCommand, HEADER_LEN, MAX_ANSWER_DATA, MAX_COMMAND_DATA};
use crate::error::{DeviceError, TranslationError};

pub const MAX_COMMAND_FRAME: usize = HEADER_LEN + 1 + MAX_COMMAND_DATA;

pub fn write_command<W: Write>(writer: &mut W, command: &ApduCommand) -> Result<(), DeviceError> {
    let raw = command.to_bytes();
    let mut frame = ArrayVec::<u8, { 4 + MAX_COMMAND_FRAME }>::new();
    frame.try_extend_from_slice(&(raw.len() as u32).to_be_bytes())?;
    frame.try_extend_from_slice(&raw)?;
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

pub fn read_answer<R: Read>(reader: &mut R) -> Result<ApduAnswer, DeviceError> {
    let mut len = [0_u8; 4];
    reader.read_exact(&mut len)?;
    let len = u32::from_be_bytes(len) as usize;
    if len > MAX_ANSWER_DATA {
        return Err(TranslationError::DataTooLarge.into());
    }

    let mut buff = [0_u8; MAX_ANSWER_DATA + 2];
    reader.read_exact(&mut buff[..len + 2])?;
    Ok(ApduAnswer::from_bytes(&buff[..len + 2])?)
}

/// Reads one raw command frame. Returns `None` when the stream ends cleanly
/// before a new frame starts.
pub fn read_command_frame<R: Read>(
    reader: &mut R,
) -> Result<Option<ArrayVec<u8, MAX_COMMAND_FRAME>>, DeviceError> {
    let mut len = [0_u8; 4];
    let mut filled = 0;
    while filled < len.len() {
        match reader.read(&mut len[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => return Err(std::io::Error::from(ErrorKind::UnexpectedEof).into()),
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    let len = u32::from_be_bytes(len) as usize;
    if len > MAX_COMMAND_FRAME {
        return Err(TranslationError::DataTooLarge.into());
    }

    let mut buff = [0_u8; MAX_COMMAND_FRAME];
    reader.read_exact(&mut buff[..len])?;
    let mut out = ArrayVec::new();
    out.try_extend_from_slice(&buff[..len])?;
    Ok(Some(out))
}

pub fn write_answer<W: Write>(writer: &mut W, answer: &ApduAnswer) -> Result<(), DeviceError> {
    let mut frame = ArrayVec::<u8, { 4 + MAX_ANSWER_DATA + 2 }>::new();
    frame.try_extend_from_slice(&(answer.data.len() as u32).to_be_bytes())?;
    frame.try_extend_from_slice(&answer.to_bytes())?;
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}
