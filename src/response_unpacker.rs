use apdu_core::error::DeviceError;
use apdu_core::version::AppVersion;

/// Reads the `major minor patch` bytes of a get version answer.
pub fn unpack_get_version_response(data: &[u8]) -> Result<AppVersion, DeviceError> {
    match data {
        [major, minor, patch] => Ok(AppVersion::new(*major, *minor, *patch)),
        _ => Err(DeviceError::UnexpectedLength {
            expected: 3,
            found: data.len(),
        }),
    }
}
