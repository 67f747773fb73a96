
//! Everything about the DataFile container format:
//! the outer envelope with its index tables, the fixed-size
//! item records, and the low-level reader and writer that
//! translate between byte buffers and those records.

pub mod text;
pub mod records;
pub mod reader;
pub mod writer;

use bit_field::BitField;

use crate::error::{usize_to_i32, Error, Result, UnitResult};
use crate::io::{Data, SliceRead, Write};


/// The kind of an item stored in the container.
/// The container index lists each present kind exactly once,
/// in ascending order of its type-id.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ItemKind {

    /// The map format version singleton. Always present, always index 0.
    Version,

    /// The map info singleton: author, credits, license, server settings.
    Info,

    /// An embedded or externally referenced tile set image.
    Image,

    /// An animation envelope.
    Envelope,

    /// A layer group.
    Group,

    /// A tile, quad or sound layer.
    Layer,

    /// The single block holding the points of all envelopes.
    EnvPoints,

    /// An embedded or externally referenced sound sample.
    Sound,
}

/// The reserved type-id of the UUID extension index.
/// Items of this type describe extension mappings that this
/// crate does not interpret; the reader skips them.
pub const UUID_TYPE_ID: i32 = 0xffff;

impl ItemKind {

    /// The type-id identifying this kind inside the container index.
    pub fn type_id(self) -> i32 {
        match self {
            ItemKind::Version => 0,
            ItemKind::Info => 1,
            ItemKind::Image => 2,
            ItemKind::Envelope => 3,
            ItemKind::Group => 4,
            ItemKind::Layer => 5,
            ItemKind::EnvPoints => 6,
            ItemKind::Sound => 7,
        }
    }

    /// Look up the kind with the specified type-id.
    /// Returns `None` for unrecognized ids, including the UUID block.
    pub fn from_type_id(type_id: i32) -> Option<Self> {
        Some(match type_id {
            0 => ItemKind::Version,
            1 => ItemKind::Info,
            2 => ItemKind::Image,
            3 => ItemKind::Envelope,
            4 => ItemKind::Group,
            5 => ItemKind::Layer,
            6 => ItemKind::EnvPoints,
            7 => ItemKind::Sound,
            _ => return None,
        })
    }
}


/// The first four bytes of each map file.
/// Used to abort reading files that are not maps at all.
pub mod magic_number {
    use super::*;

    /// The first four bytes of each map file.
    pub const BYTES: [u8; 4] = *b"DATA";

    /// The magic as written by historical big-endian hosts.
    /// Accepted and treated identically to the little-endian magic.
    pub const BYTES_SWAPPED: [u8; 4] = *b"ATAD";

    /// Without validation, write this instance to the byte stream.
    pub fn write(write: &mut impl Write) -> UnitResult {
        u8::write_slice(write, &BYTES)
    }

    /// Consume four bytes and check that they identify a map file.
    pub fn validate(read: &mut SliceRead<'_>) -> UnitResult {
        let bytes = read.read_bytes(BYTES.len())?;

        if bytes == &BYTES[..] || bytes == &BYTES_SWAPPED[..] {
            Ok(())
        }
        else {
            Err(Error::BadMagic([bytes[0], bytes[1], bytes[2], bytes[3]]))
        }
    }
}

/// The container format version following the magic number.
pub mod container_version {
    use super::*;

    /// The only container version this crate supports.
    pub const SUPPORTED: i32 = 4;

    /// Without validation, write this instance to the byte stream.
    pub fn write(write: &mut impl Write) -> UnitResult {
        SUPPORTED.write(write)
    }

    /// Consume the version field and check that it is supported.
    pub fn validate(read: &mut SliceRead<'_>) -> UnitResult {
        let version = i32::read(read)?;

        if version == SUPPORTED { Ok(()) }
        else { Err(Error::UnsupportedVersion(version)) }
    }
}


/// The seven-field fixed header following the version header.
/// Declares the sizes of every region of the container.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct ContainerHeader {

    /// Byte size of everything after the magic, version and this field pair.
    pub size: i32,

    /// Byte size of the structured prefix up to and including the items,
    /// excluding the data pool. Historical tools byte-swapped this range
    /// when converting endianness.
    pub swaplen: i32,

    /// Number of entries in the item-type index.
    pub item_type_count: i32,

    /// Total number of items across all types.
    pub item_count: i32,

    /// Number of blobs in the data pool.
    pub data_count: i32,

    /// Total byte size of all items including their headers.
    pub item_byte_size: i32,

    /// Total byte size of the compressed data pool.
    pub data_byte_size: i32,
}

impl ContainerHeader {

    /// Number of bytes this header occupies in a map file.
    pub const BYTE_SIZE: usize = 7 * i32::BYTE_SIZE;

    /// Read the fixed header. Does not validate the declared sizes.
    pub fn read(read: &mut SliceRead<'_>) -> Result<Self> {
        Ok(ContainerHeader {
            size: i32::read(read)?,
            swaplen: i32::read(read)?,
            item_type_count: i32::read(read)?,
            item_count: i32::read(read)?,
            data_count: i32::read(read)?,
            item_byte_size: i32::read(read)?,
            data_byte_size: i32::read(read)?,
        })
    }

    /// Without validation, write this instance to the byte stream.
    pub fn write(&self, write: &mut impl Write) -> UnitResult {
        self.size.write(write)?;
        self.swaplen.write(write)?;
        self.item_type_count.write(write)?;
        self.item_count.write(write)?;
        self.data_count.write(write)?;
        self.item_byte_size.write(write)?;
        self.data_byte_size.write(write)
    }
}


/// One entry of the item-type index. Declares that the items
/// `start .. start + count` of the item-offset table belong to `type_id`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct ItemTypeEntry {

    /// The type-id this entry describes.
    pub type_id: i32,

    /// Index of the first item of this type inside the item-offset table.
    pub start: i32,

    /// Number of consecutive items of this type.
    pub count: i32,
}

impl ItemTypeEntry {

    /// Number of bytes this entry occupies in a map file.
    pub const BYTE_SIZE: usize = 3 * i32::BYTE_SIZE;

    /// Read a single index entry.
    pub fn read(read: &mut SliceRead<'_>) -> Result<Self> {
        Ok(ItemTypeEntry {
            type_id: i32::read(read)?,
            start: i32::read(read)?,
            count: i32::read(read)?,
        })
    }

    /// Without validation, write this instance to the byte stream.
    pub fn write(&self, write: &mut impl Write) -> UnitResult {
        self.type_id.write(write)?;
        self.start.write(write)?;
        self.count.write(write)
    }
}


/// The eight bytes preceding every item body.
/// Packs the owning type-id and the index within that type
/// into a single word, followed by the byte size of the body.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ItemHeader {

    /// `(type_id << 16) | index`.
    pub type_and_index: i32,

    /// Byte size of the item body that follows this header.
    pub byte_size: i32,
}

impl ItemHeader {

    /// Number of bytes this header occupies in a map file.
    pub const BYTE_SIZE: usize = 2 * i32::BYTE_SIZE;

    /// Pack an item header for the specified item.
    /// The index must fit the sixteen bits reserved for it.
    pub fn new(type_id: i32, index: usize, byte_size: usize) -> Result<Self> {
        if index > 0xffff {
            return Err(Error::out_of_range("item index"));
        }

        let mut word: u32 = 0;
        word.set_bits(0 .. 16, index as u32);
        word.set_bits(16 .. 32, type_id as u32);

        Ok(ItemHeader {
            type_and_index: word as i32,
            byte_size: usize_to_i32(byte_size, "item byte size")?,
        })
    }

    /// The type-id packed into the upper sixteen bits.
    pub fn type_id(&self) -> i32 {
        (self.type_and_index as u32).get_bits(16 .. 32) as i32
    }

    /// The index packed into the lower sixteen bits.
    pub fn index(&self) -> usize {
        (self.type_and_index as u32).get_bits(0 .. 16) as usize
    }

    /// Read a single item header.
    pub fn read(read: &mut SliceRead<'_>) -> Result<Self> {
        Ok(ItemHeader {
            type_and_index: i32::read(read)?,
            byte_size: i32::read(read)?,
        })
    }

    /// Without validation, write this instance to the byte stream.
    pub fn write(&self, write: &mut impl Write) -> UnitResult {
        self.type_and_index.write(write)?;
        self.byte_size.write(write)
    }
}


/// Byte size of the structured prefix: the fixed header without its leading
/// size pair, all index tables, and all items. This is the range that
/// historical tools byte-swapped when converting endianness.
pub fn swaplen(item_type_count: usize, item_count: usize, data_count: usize, item_byte_size: usize) -> usize {
    (ContainerHeader::BYTE_SIZE - 2 * i32::BYTE_SIZE)
        + item_type_count * ItemTypeEntry::BYTE_SIZE
        + item_count * i32::BYTE_SIZE
        + 2 * data_count * i32::BYTE_SIZE
        + item_byte_size
}

/// The declared total size: the structured prefix, the compressed data pool,
/// and the leading size pair itself.
pub fn total_size(swaplen: usize, compressed_pool_byte_size: usize) -> usize {
    swaplen + compressed_pool_byte_size + 2 * i32::BYTE_SIZE
}
