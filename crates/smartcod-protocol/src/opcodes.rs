//! Firmware command bytes
//!
//! The byte values are owned by the SmartBox firmware and are loaded from a
//! TOML table rather than compiled in:
//!
//! ```toml
//! download_data = 0x01
//! read_lomem = 0x02
//! # ...
//! nop_name = "NOP"
//! ```
use std::str::FromStr;

use serde::Deserialize;

use crate::err::Error;

/// Name of the reserved job bound to code 0 unless the table says otherwise
pub const DEFAULT_NOP_NAME: &str = "NOP";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Opcodes {
    /// Store a chunk at an address
    pub download_data: u8,
    /// Query the low boundary of free memory
    pub read_lomem: u8,
    /// Query the high boundary of free memory
    pub read_himem: u8,
    /// Call code at an address
    pub execute: u8,
    /// Reset the device
    pub reset: u8,
    /// Read the version and credits text
    pub get_credits: u8,
    /// Look up the name bound to a job code
    pub get_code_name: u8,
    /// Look up the job code bound to a name
    pub get_code_for_name: u8,
    /// Job name that legitimately resolves to code 0
    #[serde(default = "default_nop_name")]
    pub nop_name: String,
}

fn default_nop_name() -> String {
    DEFAULT_NOP_NAME.to_owned()
}

impl Opcodes {
    /// Whether `name` is the reserved no-op job
    #[must_use]
    pub fn is_nop(&self, name: &str) -> bool {
        self.nop_name.eq_ignore_ascii_case(name.trim())
    }
}

impl FromStr for Opcodes {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s).map_err(|e| e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
        download_data = 0x20
        read_lomem = 0x21
        read_himem = 0x22
        execute = 0x23
        reset = 0x24
        get_credits = 0x25
        get_code_name = 0x26
        get_code_for_name = 27
    "#;

    #[test]
    fn parses_table_with_default_nop() {
        let opcodes: Opcodes = TABLE.parse().unwrap();
        assert_eq!(opcodes.download_data, 0x20);
        assert_eq!(opcodes.get_code_for_name, 27);
        assert_eq!(opcodes.nop_name, DEFAULT_NOP_NAME);
        assert!(opcodes.is_nop("nop"));
        assert!(!opcodes.is_nop("beep"));
    }

    #[test]
    fn custom_nop_name() {
        let opcodes: Opcodes = format!("{TABLE}\nnop_name = \"Idle\"").parse().unwrap();
        assert!(opcodes.is_nop("IDLE"));
        assert!(!opcodes.is_nop("NOP"));
    }

    #[test]
    fn rejects_missing_and_oversized_entries() {
        assert!(matches!(
            "download_data = 1".parse::<Opcodes>(),
            Err(Error::Opcodes(_))
        ));

        let oversized = TABLE.replace("0x20", "0x100");
        assert!(oversized.parse::<Opcodes>().is_err());
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(format!("{TABLE}\nflash = 3").parse::<Opcodes>().is_err());
    }
}
