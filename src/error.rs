
//! Error type returned by all map reading and writing operations.

use std::borrow::Cow;
use std::convert::TryFrom;
use std::fmt;
use std::io::Error as IoError;


/// A result that may contain a map codec error.
pub type Result<T> = std::result::Result<T, Error>;

/// A result that, if ok, contains nothing, and otherwise contains a map codec error.
pub type UnitResult = Result<()>;


/// An error that occurred while reading or writing a map file.
/// Fatal to the enclosing read or write call; there is no recovery or retry.
#[derive(Debug)]
pub enum Error {

    /// A read went past the end of the byte buffer.
    Truncated,

    /// The first four bytes of the file are neither `DATA` nor `ATAD`.
    BadMagic([u8; 4]),

    /// The container version is not the supported version 4.
    UnsupportedVersion(i32),

    /// An item carries a version number outside the supported set for its kind.
    UnsupportedItemVersion {

        /// Name of the item kind whose version was rejected.
        kind: &'static str,

        /// The version number found in the file.
        version: i32,
    },

    /// An item of an unrecognized type-id was requested.
    /// Unknown type-ids merely present in a file are skipped instead.
    UnknownKind(i32),

    /// An item header declares a size that does not equal
    /// the schema size for its kind and version.
    SizeMismatch {

        /// The byte size the schema prescribes.
        expected: usize,

        /// The byte size found in the item header.
        actual: usize,
    },

    /// The index packed into an item header does not equal
    /// the position of that item in its offset-table slot.
    IndexMismatch {

        /// The index implied by the offset table.
        expected: usize,

        /// The index found in the item header.
        actual: usize,
    },

    /// A reference index, tile coordinate, or integer value is outside its domain.
    OutOfRange(Cow<'static, str>),

    /// A data-pool blob failed to decompress, or its decompressed
    /// length does not equal the declared uncompressed size.
    CorruptBlob(Cow<'static, str>),

    /// The map violates a structural invariant, for example a missing
    /// game layer or duplicate mutually-exclusive tile flags.
    InvariantViolation(Cow<'static, str>),

    /// An error of the underlying byte stream.
    /// Only occurs at the optional file-system boundary,
    /// never while translating in-memory buffers.
    Io(IoError),
}


impl Error {

    /// Create an error signalling that a value or index is outside its valid domain.
    pub fn out_of_range(message: impl Into<Cow<'static, str>>) -> Self {
        Error::OutOfRange(message.into())
    }

    /// Create an error signalling an undecodable data-pool blob.
    pub fn corrupt_blob(message: impl Into<Cow<'static, str>>) -> Self {
        Error::CorruptBlob(message.into())
    }

    /// Create an error signalling a violated structural invariant of the map.
    pub fn invariant(message: impl Into<Cow<'static, str>>) -> Self {
        Error::InvariantViolation(message.into())
    }
}


/// Enable using the `?` operator on `std::io` results.
impl From<IoError> for Error {
    fn from(error: IoError) -> Self {
        Error::Io(error)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Truncated => write!(formatter, "unexpected end of byte buffer"),
            Error::BadMagic(magic) => write!(formatter, "magic bytes {:?} are not a map file identifier", magic),
            Error::UnsupportedVersion(version) => write!(formatter, "container version {} is not supported (only version 4 is)", version),
            Error::UnsupportedItemVersion { kind, version } => write!(formatter, "version {} of {} items is not supported", version, kind),
            Error::UnknownKind(type_id) => write!(formatter, "item type-id {} is not recognized", type_id),
            Error::SizeMismatch { expected, actual } => write!(formatter, "item size {} does not match the expected size {}", actual, expected),
            Error::IndexMismatch { expected, actual } => write!(formatter, "item index {} does not match the expected index {}", actual, expected),
            Error::OutOfRange(message) => write!(formatter, "value out of range: {}", message),
            Error::CorruptBlob(message) => write!(formatter, "corrupt data blob: {}", message),
            Error::InvariantViolation(message) => write!(formatter, "invalid map: {}", message),
            Error::Io(error) => write!(formatter, "io error: {}", error),
        }
    }
}


/// Convert a signed wire integer to an index or byte count,
/// failing if it does not fit.
pub fn i32_to_usize(value: i32, name: &'static str) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::out_of_range(name))
}

/// Convert an in-memory count to a signed wire integer,
/// failing if it does not fit.
pub fn usize_to_i32(value: usize, name: &'static str) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::out_of_range(name))
}
