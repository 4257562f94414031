use apdu_core::apdu::{ApduAnswer, ApduCommand};
use apdu_core::backend::Backend;
use apdu_core::error::DeviceError;
use apdu_core::instruction::Instruction;
use apdu_core::version::AppVersion;
use log::debug;

use crate::response_unpacker::unpack_get_version_response;

/// Sends the boilerplate application's commands through a borrowed backend.
pub struct BoilerplateCommandSender<'a, B: Backend + ?Sized> {
    backend: &'a mut B,
}

impl<'a, B: Backend + ?Sized> BoilerplateCommandSender<'a, B> {
    pub fn new(backend: &'a mut B) -> Self {
        Self { backend }
    }

    /// Asks the device to show "Message Received". The answer is returned as is,
    /// whatever its status.
    pub fn show_message(&mut self) -> Result<ApduAnswer, DeviceError> {
        self.send_raw(&Instruction::GetVersion.command())
    }

    /// Same command as [show_message](Self::show_message), but requires success and a
    /// version payload.
    pub fn get_version(&mut self) -> Result<AppVersion, DeviceError> {
        let answer = self.show_message()?;
        if !answer.is_ok() {
            return Err(DeviceError::StatusResponse(answer.status_word()));
        }
        unpack_get_version_response(answer.data())
    }

    pub fn send_raw(&mut self, command: &ApduCommand) -> Result<ApduAnswer, DeviceError> {
        let answer = self.backend.exchange(command)?;
        debug!("INS {:#04x} answered {}", command.ins, answer.status_word());
        Ok(answer)
    }
}
