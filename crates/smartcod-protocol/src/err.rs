use thiserror::Error as TError;

#[derive(Debug, TError)]
pub enum Error {
    /// Transport error, fatal to the session
    #[error("Port error: {0}")]
    Port(#[from] smartcod_port::err::Error),

    /// Opcode table couldn't be parsed
    #[error("Opcode table error: {0}")]
    Opcodes(#[from] toml::de::Error),

    /// Signature or argument error, raised before anything is sent
    #[error("{0}")]
    Params(#[from] crate::params::err::Error),

    /// Neither `-params` nor an earlier call defined a signature
    #[error("No signature defined for job '{0}', specify one with -params")]
    SignatureUndefined(String),

    /// The device has no job bound to the name
    #[error("Unknown job '{0}'")]
    UnknownJob(String),

    /// Upload would run past the 16-bit address space
    #[error("{len} bytes at &{address:04X} don't fit in the 16-bit address space")]
    AddressOverflow { address: u16, len: usize },

    /// Reset level is neither a name nor a byte
    #[error("Invalid reset level '{0}', expected soft, hard or a byte value")]
    InvalidResetLevel(String),
}
