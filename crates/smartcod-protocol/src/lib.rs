use std::{fmt::Display, str::FromStr};

use derive_ctor::ctor;
use smartcod_port::{SimpleRead, SimpleWrite};

use crate::{
    err::Error,
    params::{ParamType, Text, Value},
};

pub mod err;
pub mod invoker;
pub mod opcodes;
pub mod params;

#[cfg(test)]
mod mock;

pub use invoker::{CallContext, SignatureCache};
pub use opcodes::Opcodes;

pub type Result<T> = core::result::Result<T, Error>;

/// Largest payload of a single `DownloadData` frame
pub const CHUNK_SIZE: usize = 128;

/// Job code reserved for the no-op job; any other name resolving to it is unbound
pub const NOP_CODE: u8 = 0;

/// Reset strength
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetLevel {
    /// Restart the firmware, keep resident jobs
    Soft,
    /// Cold restart
    Hard,
    /// Device specific reset code, `0..=253`
    Code(u8),
}

impl From<u8> for ResetLevel {
    fn from(value: u8) -> Self {
        match value {
            254 => Self::Soft,
            255 => Self::Hard,
            code => Self::Code(code),
        }
    }
}

impl From<ResetLevel> for u8 {
    fn from(value: ResetLevel) -> Self {
        match value {
            ResetLevel::Soft => 254,
            ResetLevel::Hard => 255,
            ResetLevel::Code(code) => code,
        }
    }
}

impl Display for ResetLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Soft => f.write_str("soft"),
            Self::Hard => f.write_str("hard"),
            Self::Code(code) => write!(f, "&{code:02X}"),
        }
    }
}

impl FromStr for ResetLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "soft" => Ok(Self::Soft),
            "hard" => Ok(Self::Hard),
            other => params::parse_unsigned(other)
                .and_then(|n| u8::try_from(n).ok())
                .map(Self::from)
                .ok_or_else(|| Error::InvalidResetLevel(s.to_owned())),
        }
    }
}

/// Writable memory reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, ctor)]
pub struct MemoryWindow {
    pub lomem: u16,
    pub himem: u16,
}

impl MemoryWindow {
    /// Bytes available for an upload
    #[must_use]
    pub fn available(&self) -> usize {
        self.himem.saturating_sub(self.lomem) as usize
    }
}

/// Session with a SmartBox
///
/// Every operation is a synchronous request/response over the one transport
/// the session owns. The transport is released when the session is dropped,
/// whichever way the caller leaves.
#[derive(ctor)]
pub struct SmartBox<T: SimpleRead + SimpleWrite> {
    io: T,
    opcodes: Opcodes,
}

impl<T: SimpleRead + SimpleWrite> SmartBox<T> {
    #[must_use]
    pub fn opcodes(&self) -> &Opcodes {
        &self.opcodes
    }

    /// Flush and release the transport.
    pub fn close(mut self) -> Result<()> {
        self.io.flush().map_err(|e| e.into())
    }

    /// Give the transport back without closing it
    pub fn into_inner(self) -> T {
        self.io
    }

    fn query_u16(&mut self, opcode: u8) -> Result<u16> {
        self.io.write_u8(opcode)?;
        self.io.flush()?;
        Ok(self.io.read_u16_le()?)
    }

    pub fn read_low_memory(&mut self) -> Result<u16> {
        self.query_u16(self.opcodes.read_lomem)
    }

    pub fn read_high_memory(&mut self) -> Result<u16> {
        self.query_u16(self.opcodes.read_himem)
    }

    pub fn memory_window(&mut self) -> Result<MemoryWindow> {
        Ok(MemoryWindow::new(
            self.read_low_memory()?,
            self.read_high_memory()?,
        ))
    }

    /// Upload `data` at `address` in `CHUNK_SIZE` frames.
    ///
    /// `progress` is called with `(offset, total)` before each chunk and once
    /// more with `(total, total)` when done.
    pub fn download<F: FnMut(usize, usize)>(
        &mut self,
        address: u16,
        data: &[u8],
        mut progress: F,
    ) -> Result<()> {
        if address as usize + data.len() > 0x10000 {
            return Err(Error::AddressOverflow {
                address,
                len: data.len(),
            });
        }

        for (i, chunk) in data.chunks(CHUNK_SIZE).enumerate() {
            let offset = i * CHUNK_SIZE;
            progress(offset, data.len());

            self.io.write_u8(self.opcodes.download_data)?;
            self.io.write_u16_le(address.wrapping_add(offset as u16))?;
            self.io.write_u16_le(chunk.len() as u16)?;
            self.io.write(chunk)?;
            self.io.flush()?;
        }
        progress(data.len(), data.len());

        Ok(())
    }

    /// Call code at `address` with three register bytes
    pub fn execute_with(&mut self, address: u16, flags: u8, lo: u8, hi: u8) -> Result<()> {
        self.io.write_u8(self.opcodes.execute)?;
        self.io.write_u16_le(address)?;
        for byte in [flags, lo, hi] {
            self.io.write_u8(byte)?;
        }
        self.io.flush().map_err(|e| e.into())
    }

    /// Run code at `entrypoint`, handing it its own address
    pub fn execute(&mut self, entrypoint: u16) -> Result<()> {
        let [lo, hi] = entrypoint.to_le_bytes();
        self.execute_with(entrypoint, 0, lo, hi)
    }

    pub fn reset(&mut self, level: ResetLevel) -> Result<()> {
        self.io.write_u8(self.opcodes.reset)?;
        self.io.write_u8(level.into())?;
        self.io.flush().map_err(|e| e.into())
    }

    /// Version and credits text
    pub fn get_credits(&mut self) -> Result<String> {
        self.io.write_u8(self.opcodes.get_credits)?;
        self.io.flush()?;
        Ok(Text::from(self.io.read_until(0)?.as_slice()).to_string())
    }

    /// Name bound to `code`, empty if unbound
    pub fn get_code_name(&mut self, code: u8) -> Result<String> {
        self.io.write_u8(self.opcodes.get_code_name)?;
        self.io.write_u8(code)?;
        self.io.flush()?;
        let len = self.io.read_u8()?;
        Ok(Text::from(self.io.read_vec(len as usize)?.as_slice()).to_string())
    }

    /// Code bound to `name`, `NOP_CODE` if unbound
    pub fn get_code_for_name(&mut self, name: &str) -> Result<u8> {
        let name = Value::parse(ParamType::String, name.trim())?;
        self.io.write_u8(self.opcodes.get_code_for_name)?;
        name.write_to(&mut self.io)?;
        self.io.flush()?;
        Ok(self.io.read_u8()?)
    }

    /// Every bound job, by code
    pub fn jobs(&mut self) -> Result<Vec<(u8, String)>> {
        let mut jobs = Vec::new();
        for code in 1..=u8::MAX {
            let name = self.get_code_name(code)?;
            if !name.is_empty() {
                jobs.push((code, name));
            }
        }
        Ok(jobs)
    }

    /// Resolve `name` to a job code, accepting 0 only for the no-op job
    pub fn resolve_job(&mut self, name: &str) -> Result<u8> {
        match self.get_code_for_name(name)? {
            NOP_CODE if !self.opcodes.is_nop(name) => Err(Error::UnknownJob(name.to_owned())),
            code => Ok(code),
        }
    }

    /// Run job `code`: send its code and `inputs`, then read one value per `outputs` entry
    pub fn invoke(
        &mut self,
        code: u8,
        inputs: &[Value],
        outputs: &[ParamType],
    ) -> Result<Vec<Value>> {
        self.io.write_u8(code)?;
        for value in inputs {
            value.write_to(&mut self.io)?;
        }
        self.io.flush()?;

        outputs
            .iter()
            .map(|ty| ty.read_from(&mut self.io).map_err(|e| e.into()))
            .collect()
    }
}
