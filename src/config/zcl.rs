//! ZCL character strings.
//!
//! A ZCL `char string` is a length byte followed by that many payload bytes.
//! The Basic cluster's manufacturer name and model identifier are limited to
//! 32 bytes. `0xFF` as a length means "invalid" on the wire and is never
//! produced here.

use std::fmt;

use super::ConfigError;

/// Maximum payload for manufacturer name and model identifier attributes.
pub const ZCL_STRING_MAX_LEN: usize = 32;

/// Largest payload a ZCL char string can describe (0xFF is reserved).
pub const ZCL_STRING_ABSOLUTE_MAX: usize = 254;

/// Field name used by validator errors until the caller attaches one.
const UNNAMED: &str = "zcl_string";

/// A validated, length-prefixed ZCL string.
///
/// Stored inline so the assembled configuration stays `Copy`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZclString {
    /// Length prefix followed by payload; bytes past the payload are zero.
    buf: [u8; ZCL_STRING_MAX_LEN + 1],
}

impl ZclString {
    /// Encode `text` with its length prefix and validate it.
    pub const fn new(text: &str) -> Result<Self, ConfigError> {
        let payload = text.as_bytes();
        if payload.len() > ZCL_STRING_MAX_LEN {
            return Err(ConfigError::TooLong {
                field: UNNAMED,
                len: payload.len(),
                max: ZCL_STRING_MAX_LEN,
            });
        }
        let mut buf = [0u8; ZCL_STRING_MAX_LEN + 1];
        buf[0] = payload.len() as u8;
        let mut i = 0;
        while i < payload.len() {
            buf[i + 1] = payload[i];
            i += 1;
        }
        Ok(Self { buf })
    }

    /// Payload length in bytes, as declared by the prefix.
    pub const fn len(&self) -> usize {
        self.buf[0] as usize
    }

    /// Whether the payload is empty.
    pub const fn is_empty(&self) -> bool {
        self.buf[0] == 0
    }

    /// Payload without the length prefix.
    pub fn payload(&self) -> &[u8] {
        &self.buf[1..=self.len()]
    }

    /// Length prefix plus payload, ready for a ZCL attribute.
    pub fn as_zcl_bytes(&self) -> &[u8] {
        &self.buf[..=self.len()]
    }
}

impl fmt::Debug for ZclString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZclString({:?})", String::from_utf8_lossy(self.payload()))
    }
}

impl fmt::Display for ZclString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.payload()))
    }
}

#[cfg(not(target_os = "espidf"))]
impl serde::Serialize for ZclString {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(self.payload()))
    }
}

/// Validate a length-prefixed ZCL string.
///
/// `raw[0]` is the declared length and the rest is the payload. Fails with
/// [`ConfigError::LengthMismatch`] when they disagree (including an empty
/// `raw` with no prefix byte) and with [`ConfigError::TooLong`] when the
/// payload exceeds `max_len`.
///
/// A payload over [`ZCL_STRING_ABSOLUTE_MAX`] bytes is `TooLong` whatever its
/// prefix says, since no length byte can describe it.
///
/// `max_len` above [`ZCL_STRING_MAX_LEN`] is lowered to it: the payload must
/// fit the inline buffer, and `TooLong` then reports `max: 32`.
pub const fn validate_zcl_string(raw: &[u8], max_len: usize) -> Result<ZclString, ConfigError> {
    if raw.is_empty() {
        return Err(ConfigError::LengthMismatch {
            field: UNNAMED,
            declared: 0,
            actual: 0,
        });
    }

    let mut max = max_len;
    if max > ZCL_STRING_MAX_LEN {
        max = ZCL_STRING_MAX_LEN;
    }
    let declared = raw[0] as usize;
    let actual = raw.len() - 1;
    if actual > ZCL_STRING_ABSOLUTE_MAX {
        return Err(ConfigError::TooLong {
            field: UNNAMED,
            len: actual,
            max,
        });
    }
    if declared != actual {
        return Err(ConfigError::LengthMismatch {
            field: UNNAMED,
            declared,
            actual,
        });
    }

    if actual > max {
        return Err(ConfigError::TooLong {
            field: UNNAMED,
            len: actual,
            max,
        });
    }

    let mut buf = [0u8; ZCL_STRING_MAX_LEN + 1];
    let mut i = 0;
    while i < raw.len() {
        buf[i] = raw[i];
        i += 1;
    }
    Ok(ZclString { buf })
}

/// Prepend the length byte to `text`.
///
/// Oversized input keeps its true length in the returned vector and is
/// rejected later by [`validate_zcl_string`] as `TooLong`. The prefix
/// saturates at 255 so it can never wrap into a short, valid-looking string.
pub fn encode_zcl(text: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() + 1);
    bytes.push(text.len().min(u8::MAX as usize) as u8);
    bytes.extend_from_slice(text);
    bytes
}
