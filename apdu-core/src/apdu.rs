use arrayvec::ArrayVec;

use crate::error::TranslationError;
use crate::status::StatusWord;

/// Largest payload a short APDU command can carry.
pub const MAX_COMMAND_DATA: usize = 255;
/// Largest payload a short APDU answer can carry, status word excluded.
pub const MAX_ANSWER_DATA: usize = 256;
/// `CLA INS P1 P2`
pub const HEADER_LEN: usize = 4;

/// A command sent from the host to the device.
///
/// On the wire it is `CLA INS P1 P2 Lc DATA`, `Lc` is always written even for
/// an empty payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApduCommand {
    pub cla: u8,
    pub ins: u8,
    pub p1: u8,
    pub p2: u8,
    data: ArrayVec<u8, MAX_COMMAND_DATA>,
}

impl ApduCommand {
    pub fn new(cla: u8, ins: u8, p1: u8, p2: u8, data: &[u8]) -> Result<Self, TranslationError> {
        let mut payload = ArrayVec::new();
        payload
            .try_extend_from_slice(data)
            .map_err(|_| TranslationError::DataTooLarge)?;

        Ok(Self {
            cla,
            ins,
            p1,
            p2,
            data: payload,
        })
    }

    /// A command without payload.
    pub fn header_only(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: ArrayVec::new(),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn to_bytes(&self) -> ArrayVec<u8, { HEADER_LEN + 1 + MAX_COMMAND_DATA }> {
        let mut out = ArrayVec::new();
        out.push(self.cla);
        out.push(self.ins);
        out.push(self.p1);
        out.push(self.p2);
        out.push(self.data.len() as u8);
        // capacity is header + Lc + max data
        let extended = out.try_extend_from_slice(&self.data);
        debug_assert!(extended.is_ok());
        out
    }

    /// Parses a raw command as the device receives it. A bare four byte header
    /// is accepted as a command without data.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, TranslationError> {
        if raw.len() < HEADER_LEN {
            return Err(TranslationError::NotEnoughData(HEADER_LEN, raw.len()));
        }

        let data: &[u8] = match raw.get(HEADER_LEN) {
            None => &[],
            Some(&lc) => {
                let rest = &raw[HEADER_LEN + 1..];
                if rest.len() != lc as usize {
                    return Err(TranslationError::LengthMismatch(lc as usize, rest.len()));
                }
                rest
            }
        };

        Self::new(raw[0], raw[1], raw[2], raw[3], data)
    }
}

/// The device's reply: an optional payload closed by a big endian status word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApduAnswer {
    pub data: ArrayVec<u8, MAX_ANSWER_DATA>,
    pub status: u16,
}

impl ApduAnswer {
    pub fn new(data: &[u8], status: impl Into<StatusWord>) -> Result<Self, TranslationError> {
        let mut payload = ArrayVec::new();
        payload
            .try_extend_from_slice(data)
            .map_err(|_| TranslationError::DataTooLarge)?;

        Ok(Self {
            data: payload,
            status: status.into().0,
        })
    }

    /// An answer made of a status word only.
    pub fn from_status(status: impl Into<StatusWord>) -> Self {
        Self {
            data: ArrayVec::new(),
            status: status.into().0,
        }
    }

    pub fn from_bytes(raw: &[u8]) -> Result<Self, TranslationError> {
        if raw.len() < 2 {
            return Err(TranslationError::NotEnoughData(2, raw.len()));
        }

        let (data, sw) = raw.split_at(raw.len() - 2);
        Self::new(data, StatusWord(u16::from_be_bytes([sw[0], sw[1]])))
    }

    pub fn to_bytes(&self) -> ArrayVec<u8, { MAX_ANSWER_DATA + 2 }> {
        let mut out = ArrayVec::new();
        let extended = out
            .try_extend_from_slice(&self.data)
            .and_then(|_| out.try_extend_from_slice(&self.status.to_be_bytes()));
        debug_assert!(extended.is_ok());
        out
    }

    pub fn status_word(&self) -> StatusWord {
        StatusWord(self.status)
    }

    pub fn is_ok(&self) -> bool {
        self.status_word().is_ok()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::AppSW;

    #[test]
    fn get_version_command_bytes() {
        let cmd = ApduCommand::new(0xE0, 0x03, 0x00, 0x00, &[]).unwrap();
        assert_eq!(cmd.to_bytes().as_slice(), &[0xE0, 0x03, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn command_with_data() {
        let cmd = ApduCommand::new(0xE0, 0x05, 0x01, 0x80, &[0xAA, 0xBB, 0xCC]).unwrap();
        let raw = cmd.to_bytes();
        assert_eq!(raw.as_slice(), &[0xE0, 0x05, 0x01, 0x80, 0x03, 0xAA, 0xBB, 0xCC]);
        assert_eq!(ApduCommand::from_bytes(&raw).unwrap(), cmd);
    }

    #[test]
    fn command_too_large() {
        let data = [0_u8; 256];
        assert_eq!(
            ApduCommand::new(0xE0, 0x03, 0, 0, &data),
            Err(TranslationError::DataTooLarge)
        );
        assert!(ApduCommand::new(0xE0, 0x03, 0, 0, &data[..255]).is_ok());
    }

    #[test]
    fn bare_header_has_no_data() {
        let cmd = ApduCommand::from_bytes(&[0xE0, 0x03, 0x00, 0x00]).unwrap();
        assert_eq!(cmd.ins, 0x03);
        assert!(cmd.data().is_empty());
    }

    #[test]
    fn short_command_rejected() {
        assert_eq!(
            ApduCommand::from_bytes(&[0xE0, 0x03]),
            Err(TranslationError::NotEnoughData(4, 2))
        );
    }

    #[test]
    fn lc_mismatch_rejected() {
        assert_eq!(
            ApduCommand::from_bytes(&[0xE0, 0x03, 0x00, 0x00, 0x02, 0x01]),
            Err(TranslationError::LengthMismatch(2, 1))
        );
    }

    #[test]
    fn answer_splits_status() {
        let answer = ApduAnswer::from_bytes(&[0x01, 0x02, 0x03, 0x90, 0x00]).unwrap();
        assert_eq!(answer.data(), &[0x01, 0x02, 0x03]);
        assert_eq!(answer.status, 0x9000);
        assert!(answer.is_ok());
    }

    #[test]
    fn answer_status_only() {
        let answer = ApduAnswer::from_status(AppSW::InsNotSupported);
        assert_eq!(answer.to_bytes().as_slice(), &[0x6D, 0x00]);
        assert!(!answer.is_ok());
        assert_eq!(answer.status_word().known(), Some(AppSW::InsNotSupported));
    }

    #[test]
    fn largest_frames_fit() {
        let cmd = ApduCommand::new(0xE0, 0x03, 0, 0, &[0xAB; MAX_COMMAND_DATA]).unwrap();
        let raw = cmd.to_bytes();
        assert_eq!(raw.len(), HEADER_LEN + 1 + MAX_COMMAND_DATA);
        assert_eq!(raw[4], 0xFF);

        let answer = ApduAnswer::new(&[0xCD; MAX_ANSWER_DATA], AppSW::Ok).unwrap();
        let raw = answer.to_bytes();
        assert_eq!(raw.len(), MAX_ANSWER_DATA + 2);
        assert_eq!(&raw[MAX_ANSWER_DATA..], &[0x90, 0x00]);
    }

    #[test]
    fn answer_needs_status() {
        assert_eq!(
            ApduAnswer::from_bytes(&[0x90]),
            Err(TranslationError::NotEnoughData(2, 1))
        );
    }
}
