//! Little-endian reads and writes over a blocking, point-to-point transport.

use std::io::{Read, Write};

use crate::err::Error;

pub mod err;

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(feature = "serialport")]
pub type Port = Box<dyn serialport::SerialPort>;

pub trait FromBytes<const N: usize> {
    fn from_le(bytes: [u8; N]) -> Self;
}

pub trait ToBytes<const N: usize> {
    fn to_le(&self) -> [u8; N];
}

macro_rules! impl_bytes {
    ($($ty:ty => $n:literal),+ $(,)?) => {$(
        impl FromBytes<$n> for $ty {
            fn from_le(bytes: [u8; $n]) -> Self {
                Self::from_le_bytes(bytes)
            }
        }

        impl ToBytes<$n> for $ty {
            fn to_le(&self) -> [u8; $n] {
                self.to_le_bytes()
            }
        }
    )+};
}

impl_bytes!(u8 => 1, u16 => 2, u32 => 4);

pub trait SimpleRead {
    /// Fill the whole `buf` or fail.
    fn read(&mut self, buf: &mut [u8]) -> Result<()>;

    fn simple_read_le<T: FromBytes<N>, const N: usize>(&mut self) -> Result<T> {
        let mut bytes = [0; N];
        self.read(&mut bytes)?;
        Ok(T::from_le(bytes))
    }

    fn read_u8(&mut self) -> Result<u8> {
        self.simple_read_le()
    }

    fn read_u16_le(&mut self) -> Result<u16> {
        self.simple_read_le()
    }

    fn read_u32_le(&mut self) -> Result<u32> {
        self.simple_read_le()
    }

    /// Read exactly `len` bytes into a fresh buffer.
    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0; len];
        self.read(&mut buf)?;
        Ok(buf)
    }

    /// Read bytes up to (and consuming) the first `terminator`.
    fn read_until(&mut self, terminator: u8) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        loop {
            match self.read_u8()? {
                b if b == terminator => return Ok(buf),
                b => buf.push(b),
            }
        }
    }
}

pub trait SimpleWrite {
    fn write(&mut self, buf: &[u8]) -> Result<()>;

    /// Push any buffered bytes onto the wire.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn simple_write_le<T: ToBytes<N>, const N: usize>(&mut self, value: T) -> Result<()> {
        self.write(&value.to_le())
    }

    fn write_u8(&mut self, value: u8) -> Result<()> {
        self.simple_write_le(value)
    }

    fn write_u16_le(&mut self, value: u16) -> Result<()> {
        self.simple_write_le(value)
    }

    fn write_u32_le(&mut self, value: u32) -> Result<()> {
        self.simple_write_le(value)
    }
}

impl<T: SimpleRead + ?Sized> SimpleRead for &mut T {
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read(buf)
    }
}

impl<T: SimpleWrite + ?Sized> SimpleWrite for &mut T {
    fn write(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write(buf)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

#[cfg(feature = "serialport")]
impl SimpleRead for Port {
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        self.read_exact(buf).map_err(|e| e.into())
    }
}

#[cfg(feature = "serialport")]
impl SimpleWrite for Port {
    fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.write_all(buf).map_err(|e| e.into())
    }

    fn flush(&mut self) -> Result<()> {
        Write::flush(self).map_err(|e| e.into())
    }
}

/// Reads from a byte slice, consuming it. Handy for decoding captured traffic.
impl SimpleRead for &[u8] {
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.len() < buf.len() {
            return Err(Error::Exhausted(self.len(), buf.len()));
        }
        Read::read_exact(self, buf).map_err(|e| e.into())
    }
}

impl SimpleWrite for Vec<u8> {
    fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.extend_from_slice(buf);
        Ok(())
    }
}
