use thiserror::Error as TError;

#[derive(Debug, TError, PartialEq, Eq)]
pub enum Error {
    /// Master and difference images differ in length
    #[error("Master and difference files are different sizes ({master} and {diff} bytes)")]
    SizeMismatch { master: usize, diff: usize },
    /// Image length is outside of `MIN_IMAGE_LEN..=MAX_IMAGE_LEN`
    #[error("Image size {0} is out of range, expected 3..=65535 bytes")]
    SizeOutOfRange(usize),
    /// The first two bytes of the images disagree
    #[error("Offset to execcall differs in master and difference files (&{master:04X} and &{diff:04X})")]
    EntryOffsetMismatch { master: u16, diff: u16 },
    /// Entry offset doesn't point inside the image
    #[error("execcall entrypoint &{entry:04X} is beyond the end of the {len} byte image")]
    EntryOutOfBounds { entry: u16, len: usize },
}
