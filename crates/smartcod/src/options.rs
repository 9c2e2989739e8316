use std::{collections::BTreeMap, iter::once, path::PathBuf};

use clap::Parser;
use smartcod_protocol::ResetLevel;

use crate::Result;

/// Name of the option that removes another one
const UNSET: &str = "unset";

/// Option values as of the command being run
#[derive(Debug, Parser)]
#[command(name = "smartcod", disable_help_flag = true)]
pub struct Options {
    /// Patch artifact, written by `build` and read by `load`
    #[arg(long)]
    pub cod: Option<PathBuf>,

    /// Code assembled at the master origin
    #[arg(long, default_value = "code1")]
    pub master: PathBuf,

    /// Same code assembled at a different origin
    #[arg(long, default_value = "code2")]
    pub diff: PathBuf,

    /// SmartBox serial port
    #[arg(long)]
    pub port: Option<String>,

    /// Serial port speed
    #[arg(long, default_value_t = 9600)]
    pub baud: u32,

    /// Reset level: soft, hard or a byte
    #[arg(long, default_value = "soft")]
    pub reset: ResetLevel,

    /// Job call signature, e.g. `(B,W--S)`
    #[arg(long)]
    pub params: Option<String>,

    /// Firmware opcode table
    #[arg(long, default_value = "opcodes.toml")]
    pub opcodes: PathBuf,
}

/// `-name value` pairs collected from the command line, last write wins
#[derive(Debug, Default)]
pub struct OptionTable {
    values: BTreeMap<String, String>,
}

impl OptionTable {
    /// Store `value` under `name`, or drop the option named by `value` for `-unset`
    pub fn set(&mut self, name: &str, value: String) {
        let name = name.to_ascii_lowercase();
        if name == UNSET {
            self.values.remove(&value.to_ascii_lowercase());
        } else {
            self.values.insert(name, value);
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Validate the table into typed options
    pub fn options(&self) -> Result<Options> {
        let args = self
            .values
            .iter()
            .map(|(name, value)| format!("--{name}={value}"));

        Ok(Options::try_parse_from(once("smartcod".to_owned()).chain(args))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut table = OptionTable::default();
        table.set("PORT", "COM1".into());
        table.set("port", "COM3".into());

        assert_eq!(table.get("Port"), Some("COM3"));
        assert_eq!(table.options().unwrap().port.as_deref(), Some("COM3"));
    }

    #[test]
    fn unset_removes_option() {
        let mut table = OptionTable::default();
        table.set("params", "(B--)".into());
        table.set("unset", "PARAMS".into());

        assert_eq!(table.get("params"), None);
        assert!(table.options().unwrap().params.is_none());
    }

    #[test]
    fn defaults() {
        let options = OptionTable::default().options().unwrap();

        assert_eq!(options.master, PathBuf::from("code1"));
        assert_eq!(options.diff, PathBuf::from("code2"));
        assert_eq!(options.reset, ResetLevel::Soft);
        assert_eq!(options.baud, 9600);
        assert_eq!(options.opcodes, PathBuf::from("opcodes.toml"));
        assert!(options.cod.is_none());
    }

    #[test]
    fn typed_values() {
        let mut table = OptionTable::default();
        table.set("reset", "hard".into());
        table.set("params", "(--S)".into());
        table.set("cod", "-odd name.cod".into());

        let options = table.options().unwrap();
        assert_eq!(options.reset, ResetLevel::Hard);
        assert_eq!(options.params.as_deref(), Some("(--S)"));
        assert_eq!(options.cod, Some(PathBuf::from("-odd name.cod")));
    }

    #[test]
    fn rejects_bad_values_and_names() {
        let mut table = OptionTable::default();
        table.set("reset", "lukewarm".into());
        assert!(table.options().is_err());

        let mut table = OptionTable::default();
        table.set("colour", "blue".into());
        assert!(table.options().is_err());
    }
}
