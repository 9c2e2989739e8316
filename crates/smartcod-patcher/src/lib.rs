use derive_ctor::ctor;
use getset::Getters;

use crate::err::Error;

pub mod err;
pub mod reloc;

pub type Result<T> = core::result::Result<T, Error>;

/// Smallest image that still holds an entry offset and one byte of code
pub const MIN_IMAGE_LEN: usize = 3;
/// Largest image addressable by the 16-bit device
pub const MAX_IMAGE_LEN: usize = u16::MAX as usize;

/// Read the little-endian entry offset (`execcall`) from the start of `data`
#[inline]
#[must_use]
pub fn entry_offset(data: &[u8]) -> Option<u16> {
    match data {
        [lo, hi, ..] => Some(u16::from_le_bytes([*lo, *hi])),
        _ => None,
    }
}

/// Raw code assembled for the device
#[derive(Debug, Clone, ctor, PartialEq, Eq)]
pub struct CodeImage {
    data: Vec<u8>,
}

impl CodeImage {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn entry(&self) -> Option<u16> {
        entry_offset(&self.data)
    }
}

impl From<Vec<u8>> for CodeImage {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

/// Master image followed by its relocation bitmap, as consumed by the device loader
#[derive(Debug, Clone, Getters, PartialEq, Eq)]
pub struct PatchArtifact {
    /// Master image, verbatim
    #[getset(get = "pub")]
    image: Vec<u8>,
    /// `ceil(entry / 8)` bytes of relocation flags
    #[getset(get = "pub")]
    bitmap: Vec<u8>,
}

impl PatchArtifact {
    #[must_use]
    pub fn len(&self) -> usize {
        self.image.len() + self.bitmap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialized file contents
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.len());
        bytes.extend_from_slice(&self.image);
        bytes.extend_from_slice(&self.bitmap);
        bytes
    }
}

/// Combine a master image and its difference image into a patch artifact.
///
/// The difference image must be the same code assembled at another origin.
/// All checks happen before anything is produced.
pub fn build(master: &CodeImage, diff: &CodeImage) -> Result<PatchArtifact> {
    if master.len() != diff.len() {
        return Err(Error::SizeMismatch {
            master: master.len(),
            diff: diff.len(),
        });
    }

    if !(MIN_IMAGE_LEN..=MAX_IMAGE_LEN).contains(&master.len()) {
        return Err(Error::SizeOutOfRange(master.len()));
    }

    let (Some(entry), Some(diff_entry)) = (master.entry(), diff.entry()) else {
        return Err(Error::SizeOutOfRange(master.len()));
    };

    if entry != diff_entry {
        return Err(Error::EntryOffsetMismatch {
            master: entry,
            diff: diff_entry,
        });
    }

    if entry as usize >= master.len() {
        return Err(Error::EntryOutOfBounds {
            entry,
            len: master.len(),
        });
    }

    Ok(PatchArtifact {
        image: master.data.clone(),
        bitmap: reloc::encode(&master.data, &diff.data, entry),
    })
}
