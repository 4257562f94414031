use crate::apdu::{ApduAnswer, ApduCommand};
use crate::error::DeviceError;

/// A connection able to carry one APDU to the device and bring its answer back.
pub trait Backend {
    fn exchange(&mut self, command: &ApduCommand) -> Result<ApduAnswer, DeviceError>;
}

impl<B: Backend + ?Sized> Backend for &mut B {
    fn exchange(&mut self, command: &ApduCommand) -> Result<ApduAnswer, DeviceError> {
        (**self).exchange(command)
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn exchange(&mut self, command: &ApduCommand) -> Result<ApduAnswer, DeviceError> {
        (**self).exchange(command)
    }
}
