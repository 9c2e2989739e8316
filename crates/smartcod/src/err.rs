use std::path::PathBuf;

use thiserror::Error as TError;

#[derive(Debug, TError)]
pub enum Error {
    /// Nothing to do
    #[error("Usage: smartcod [-option value]... command [command arguments]...")]
    Usage,
    /// An option was the last argument
    #[error("No option value following option '{0}'")]
    MissingOptionValue(String),
    /// Not a known command
    #[error("Unsupported operation '{0}'")]
    UnsupportedCommand(String),
    /// A command needs an option that was never set
    #[error("{what} option -{option} not specified")]
    MissingOption {
        option: &'static str,
        what: &'static str,
    },
    /// `call` wasn't followed by a job name
    #[error("No job name following 'call'")]
    MissingJobName,
    /// Input file is missing
    #[error("{what} file '{}' does not exist", .path.display())]
    FileNotFound { what: &'static str, path: PathBuf },
    /// Port name isn't one the OS reports
    #[error("Invalid serial port name '{0}'")]
    InvalidPort(String),
    /// Artifact doesn't fit between lomem and himem
    #[error("'{}' is too large to fit in SmartBox memory ({available} bytes available)", .path.display())]
    TooLarge { path: PathBuf, available: usize },
    /// Artifact can't hold an entry offset
    #[error("'{}' is too short to hold an entry offset", .0.display())]
    Truncated(PathBuf),

    /// smartcod-patcher error
    #[error("{0}")]
    Patcher(#[from] smartcod_patcher::err::Error),
    /// smartcod-protocol error
    #[error("{0}")]
    Protocol(#[from] smartcod_protocol::err::Error),

    /// Option validation error
    #[error("{0}")]
    Clap(#[from] clap::Error),
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Artifact couldn't be moved into place
    #[error("Couldn't write output file: {0}")]
    Persist(#[from] tempfile::PersistError),
    /// serialport crate error
    #[error("serialport error: {0}")]
    SerialPort(#[from] serialport::Error),
}
