//! Install codes for the coordinator's install-code join policy.
//!
//! An install code is a 6, 8, 12 or 16 byte secret printed on a device,
//! followed by a CRC-16/X.25 checksum stored least significant byte first.
//! The trust center derives the device's initial link key from it, so the
//! buffer is zeroed when the value is dropped.
//!
//! # Example
//!
//! ```
//! use esp_zigbee_gateway::security::{install_code_crc, InstallCode};
//!
//! let code = [0x83, 0xFE, 0xD3, 0x40, 0x7A, 0x93];
//! let crc = install_code_crc(&code).to_le_bytes();
//! let hex = format!(
//!     "83FED3407A93{:02X}{:02X}",
//!     crc[0], crc[1]
//! );
//! let parsed = InstallCode::parse_hex(&hex).unwrap();
//! assert_eq!(parsed.code(), &code);
//! ```

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::ConfigError;

/// Code lengths allowed by Zigbee 3.0, without the CRC.
pub const VALID_CODE_LENGTHS: [usize; 4] = [6, 8, 12, 16];

/// CRC trailer length.
pub const CRC_LEN: usize = 2;

const MAX_LEN: usize = 16 + CRC_LEN;

/// CRC-16/X.25 (reflected 0x1021, init and final XOR 0xFFFF).
pub fn install_code_crc(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in data {
        crc ^= u16::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0x8408
            } else {
                crc >> 1
            };
        }
    }
    !crc
}

/// A validated install code including its CRC.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct InstallCode {
    bytes: [u8; MAX_LEN],
    // Not secret; keeps the accessors in bounds after an explicit zeroize.
    #[zeroize(skip)]
    len: usize,
}

impl InstallCode {
    /// Validate code bytes with their CRC trailer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let code_len = bytes.len().checked_sub(CRC_LEN).ok_or(
            ConfigError::InvalidInstallCode {
                reason: "shorter than its CRC",
            },
        )?;
        if !VALID_CODE_LENGTHS.contains(&code_len) {
            return Err(ConfigError::InvalidInstallCode {
                reason: "code must be 6, 8, 12 or 16 bytes plus CRC",
            });
        }

        let (code, trailer) = bytes.split_at(code_len);
        let expected = install_code_crc(code);
        if u16::from_le_bytes([trailer[0], trailer[1]]) != expected {
            return Err(ConfigError::InvalidInstallCode {
                reason: "CRC mismatch",
            });
        }

        let mut buf = [0u8; MAX_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            bytes: buf,
            len: bytes.len(),
        })
    }

    /// Parse a hex install code. Spaces, `-` and `:` separators are ignored.
    pub fn parse_hex(text: &str) -> Result<Self, ConfigError> {
        let mut digits: Vec<u8> = text
            .bytes()
            .filter(|b| !matches!(b, b' ' | b'-' | b':'))
            .collect();
        let mut raw = [0u8; MAX_LEN];
        let len = digits.len() / 2;

        let result = if len > MAX_LEN {
            Err(ConfigError::InvalidInstallCode {
                reason: "code must be 6, 8, 12 or 16 bytes plus CRC",
            })
        } else {
            hex::decode_to_slice(&digits, &mut raw[..len])
                .map_err(hex_error)
                .and_then(|()| Self::from_bytes(&raw[..len]))
        };

        raw.zeroize();
        digits.zeroize();
        result
    }

    /// Code bytes without the CRC.
    pub fn code(&self) -> &[u8] {
        &self.bytes[..self.len - CRC_LEN]
    }

    /// Code bytes followed by the CRC, as the stack expects them.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Stored CRC value.
    pub fn crc(&self) -> u16 {
        u16::from_le_bytes([self.bytes[self.len - 2], self.bytes[self.len - 1]])
    }
}

impl PartialEq for InstallCode {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for InstallCode {}

impl fmt::Debug for InstallCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstallCode({} bytes, crc 0x{:04x})", self.len, self.crc())
    }
}

fn hex_error(e: hex::FromHexError) -> ConfigError {
    let reason = match e {
        hex::FromHexError::InvalidHexCharacter { .. } => "not a hex digit",
        hex::FromHexError::OddLength => "odd number of hex digits",
        hex::FromHexError::InvalidStringLength => "wrong number of hex digits",
    };
    ConfigError::InvalidInstallCode { reason }
}

/// Install code bound to the IEEE address of the device that will use it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCodeEntry {
    pub ieee_addr: u64,
    pub code: InstallCode,
}

impl InstallCodeEntry {
    /// Parse `<ieee hex>=<install code hex>`.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let (addr, code) = text
            .split_once('=')
            .ok_or(ConfigError::InvalidInstallCode {
                reason: "expected <ieee address>=<install code>",
            })?;
        let addr = addr.trim();
        let addr = addr
            .strip_prefix("0x")
            .or_else(|| addr.strip_prefix("0X"))
            .unwrap_or(addr);
        let mut ieee = [0u8; 8];
        hex::decode_to_slice(addr, &mut ieee).map_err(|_| ConfigError::InvalidInstallCode {
            reason: "IEEE address must be 16 hex digits",
        })?;
        Ok(Self {
            ieee_addr: u64::from_be_bytes(ieee),
            code: InstallCode::parse_hex(code.trim())?,
        })
    }

    /// Parse a `;`-separated list of entries. Blank items are skipped.
    pub fn parse_list(text: &str) -> Result<Vec<Self>, ConfigError> {
        text.split(';')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(Self::parse)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_crc(code: &[u8]) -> Vec<u8> {
        let mut bytes = code.to_vec();
        bytes.extend_from_slice(&install_code_crc(code).to_le_bytes());
        bytes
    }

    fn to_hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02X}", b)).collect()
    }

    #[test]
    fn test_crc_check_value() {
        // Standard CRC-16/X.25 check input
        assert_eq!(install_code_crc(b"123456789"), 0x906E);
    }

    #[test]
    fn test_valid_lengths() {
        for len in VALID_CODE_LENGTHS {
            let code: Vec<u8> = (0..len as u8).collect();
            let parsed = InstallCode::from_bytes(&with_crc(&code)).unwrap();
            assert_eq!(parsed.code(), &code[..]);
            assert_eq!(parsed.as_bytes().len(), len + CRC_LEN);
        }
    }

    #[test]
    fn test_invalid_length() {
        let code = [0u8; 10];
        assert!(matches!(
            InstallCode::from_bytes(&with_crc(&code)),
            Err(ConfigError::InvalidInstallCode { .. })
        ));
        assert!(InstallCode::from_bytes(&[0x12]).is_err());
    }

    #[test]
    fn test_crc_mismatch() {
        let mut bytes = with_crc(&[0xAA; 8]);
        bytes[0] ^= 0x01;
        assert_eq!(
            InstallCode::from_bytes(&bytes),
            Err(ConfigError::InvalidInstallCode {
                reason: "CRC mismatch",
            })
        );
    }

    #[test]
    fn test_parse_hex_with_separators() {
        let bytes = with_crc(&[0x83, 0xFE, 0xD3, 0x40, 0x7A, 0x93, 0x97, 0x23]);
        let hex = to_hex(&bytes);
        let spaced = format!("{}-{} {}", &hex[..4], &hex[4..8], &hex[8..]);
        let parsed = InstallCode::parse_hex(&spaced).unwrap();
        assert_eq!(parsed.as_bytes(), &bytes[..]);
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert_eq!(
            InstallCode::parse_hex("83FEZZ"),
            Err(ConfigError::InvalidInstallCode {
                reason: "not a hex digit",
            })
        );
        assert_eq!(
            InstallCode::parse_hex("83F"),
            Err(ConfigError::InvalidInstallCode {
                reason: "odd number of hex digits",
            })
        );
    }

    #[test]
    fn test_parse_hex_rejects_oversized_input() {
        let hex = to_hex(&with_crc(&[0x42; 24]));
        assert_eq!(
            InstallCode::parse_hex(&hex),
            Err(ConfigError::InvalidInstallCode {
                reason: "code must be 6, 8, 12 or 16 bytes plus CRC",
            })
        );
    }

    #[test]
    fn test_accessors_after_zeroize() {
        let mut code = InstallCode::from_bytes(&with_crc(&[0x5A; 6])).unwrap();
        code.zeroize();
        assert_eq!(code.code(), &[0u8; 6]);
        assert_eq!(code.as_bytes(), &[0u8; 8]);
        assert_eq!(code.crc(), 0);
    }

    #[test]
    fn test_debug_hides_code() {
        let code = InstallCode::from_bytes(&with_crc(&[0x55; 6])).unwrap();
        let shown = format!("{:?}", code);
        assert!(!shown.contains("85, 85"));
        assert!(shown.starts_with("InstallCode(8 bytes"));
    }

    #[test]
    fn test_entry_list() {
        let hex = to_hex(&with_crc(&[1, 2, 3, 4, 5, 6]));
        let text = format!("0x00124B0001020304={} ; 00124b0001020305={};", hex, hex);
        let entries = InstallCodeEntry::parse_list(&text).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].ieee_addr, 0x0012_4B00_0102_0304);
        assert_eq!(entries[1].ieee_addr, 0x0012_4B00_0102_0305);
        assert_eq!(entries[1].code.code(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_entry_address_needs_sixteen_digits() {
        let hex = to_hex(&with_crc(&[1, 2, 3, 4, 5, 6]));
        for addr in ["1234", "00124b00010203", "00124b000102030405", "00124b00010203zz"] {
            assert_eq!(
                InstallCodeEntry::parse(&format!("{}={}", addr, hex)),
                Err(ConfigError::InvalidInstallCode {
                    reason: "IEEE address must be 16 hex digits",
                }),
                "address {:?}",
                addr
            );
        }
    }

    #[test]
    fn test_entry_missing_separator() {
        assert!(matches!(
            InstallCodeEntry::parse("00124b0001020304"),
            Err(ConfigError::InvalidInstallCode { .. })
        ));
    }
}
