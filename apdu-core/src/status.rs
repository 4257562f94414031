//! Status words closing every APDU answer.

use std::fmt::Display;

/// Status words the boilerplate application and the device SDK answer with.
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppSW {
    Deny = 0x6985,
    WrongP1P2 = 0x6A86,
    InsNotSupported = 0x6D00,
    ClaNotSupported = 0x6E00,
    /// Raised by the SDK when `Lc` does not match the received length.
    WrongApduLength = 0x6E03,
    UserCancelled = 0x6E04,
    TxDisplayFail = 0xB001,
    AddrDisplayFail = 0xB002,
    TxWrongLength = 0xB004,
    TxParsingFail = 0xB005,
    TxHashFail = 0xB006,
    TxSignFail = 0xB008,
    KeyDeriveFail = 0xB009,
    VersionParsingFail = 0xB00A,
    /// The application panicked and exited.
    Panic = 0xE000,
    Ok = 0x9000,
}

impl AppSW {
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Deny => "rejected by the user",
            Self::WrongP1P2 => "wrong P1 or P2",
            Self::InsNotSupported => "instruction not supported",
            Self::ClaNotSupported => "class not supported",
            Self::WrongApduLength => "wrong APDU length",
            Self::UserCancelled => "cancelled by the user",
            Self::TxDisplayFail => "transaction display failed",
            Self::AddrDisplayFail => "address display failed",
            Self::TxWrongLength => "wrong transaction length",
            Self::TxParsingFail => "transaction parsing failed",
            Self::TxHashFail => "transaction hashing failed",
            Self::TxSignFail => "transaction signing failed",
            Self::KeyDeriveFail => "key derivation failed",
            Self::VersionParsingFail => "version parsing failed",
            Self::Panic => "application panicked",
            Self::Ok => "success",
        }
    }
}

impl TryFrom<u16> for AppSW {
    type Error = StatusWord;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0x6985 => Ok(Self::Deny),
            0x6A86 => Ok(Self::WrongP1P2),
            0x6D00 => Ok(Self::InsNotSupported),
            0x6E00 => Ok(Self::ClaNotSupported),
            0x6E03 => Ok(Self::WrongApduLength),
            0x6E04 => Ok(Self::UserCancelled),
            0xB001 => Ok(Self::TxDisplayFail),
            0xB002 => Ok(Self::AddrDisplayFail),
            0xB004 => Ok(Self::TxWrongLength),
            0xB005 => Ok(Self::TxParsingFail),
            0xB006 => Ok(Self::TxHashFail),
            0xB008 => Ok(Self::TxSignFail),
            0xB009 => Ok(Self::KeyDeriveFail),
            0xB00A => Ok(Self::VersionParsingFail),
            0xE000 => Ok(Self::Panic),
            0x9000 => Ok(Self::Ok),
            _ => Err(StatusWord(value)),
        }
    }
}

/// A raw two byte status word. `0x9000` is success.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StatusWord(pub u16);

impl StatusWord {
    pub const OK: StatusWord = StatusWord(0x9000);

    pub fn is_ok(&self) -> bool {
        *self == Self::OK
    }

    pub fn known(&self) -> Option<AppSW> {
        AppSW::try_from(self.0).ok()
    }

    pub fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl From<AppSW> for StatusWord {
    fn from(value: AppSW) -> Self {
        Self(value as u16)
    }
}

impl Display for StatusWord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.known() {
            Some(sw) => write!(f, "{:#06x} ({})", self.0, sw.description()),
            None => write!(f, "{:#06x} (unknown)", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_sw_conversion() {
        let mappings: [(u16, AppSW); 8] = [
            (0x9000, AppSW::Ok),
            (0x6985, AppSW::Deny),
            (0x6A86, AppSW::WrongP1P2),
            (0x6D00, AppSW::InsNotSupported),
            (0x6E00, AppSW::ClaNotSupported),
            (0x6E03, AppSW::WrongApduLength),
            (0xB00A, AppSW::VersionParsingFail),
            (0xE000, AppSW::Panic),
        ];

        for (value, expected) in mappings {
            assert_eq!(AppSW::try_from(value), Ok(expected));
            assert_eq!(expected.as_u16(), value);
        }
    }

    #[test]
    fn unknown_status_is_kept() {
        assert_eq!(AppSW::try_from(0x1234_u16), Err(StatusWord(0x1234)));
        assert_eq!(StatusWord(0x1234).to_string(), "0x1234 (unknown)");
    }

    #[test]
    fn only_9000_is_ok() {
        assert!(StatusWord(0x9000).is_ok());
        assert!(StatusWord::from(AppSW::Ok).is_ok());
        assert!(!StatusWord(0x6985).is_ok());
        assert_eq!(StatusWord::OK.to_be_bytes(), [0x90, 0x00]);
    }
}
