use crate::apdu::ApduCommand;
use crate::status::AppSW;

/// Class byte the boilerplate application answers to.
pub const BOILERPLATE_CLA: u8 = 0xE0;

/// Instructions understood by the boilerplate application.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Shows "Message Received" on the device and answers once the message timed out.
    GetVersion = 0x03,
}

impl Instruction {
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// The command the host sends for this instruction.
    pub fn command(self) -> ApduCommand {
        ApduCommand::header_only(BOILERPLATE_CLA, self.as_byte(), 0x00, 0x00)
    }
}

impl TryFrom<&ApduCommand> for Instruction {
    type Error = AppSW;

    fn try_from(value: &ApduCommand) -> Result<Self, Self::Error> {
        match (value.ins, value.p1, value.p2) {
            (0x03, 0, 0) => Ok(Instruction::GetVersion),
            (_, _, _) => Err(AppSW::InsNotSupported),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_version_round_trips() {
        let cmd = Instruction::GetVersion.command();
        assert_eq!(cmd.cla, 0xE0);
        assert_eq!(Instruction::try_from(&cmd), Ok(Instruction::GetVersion));
    }

    #[test]
    fn parameters_must_be_zero() {
        let cmd = ApduCommand::new(0xE0, 0x03, 0x01, 0x00, &[]).unwrap();
        assert_eq!(Instruction::try_from(&cmd), Err(AppSW::InsNotSupported));
        let cmd = ApduCommand::new(0xE0, 0x04, 0x00, 0x00, &[]).unwrap();
        assert_eq!(Instruction::try_from(&cmd), Err(AppSW::InsNotSupported));
    }
}
