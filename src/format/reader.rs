
//! Low-level reading of the container envelope.
//! Parses the index tables once, then serves random-access
//! item and data-pool lookups to the map reader.

use smallvec::SmallVec;

use crate::compress::{self, ByteVec};
use crate::error::{i32_to_usize, Error, Result};
use crate::format::text::Text;
use crate::format::{container_version, magic_number, ContainerHeader, ItemHeader, ItemKind, ItemTypeEntry};
use crate::io::{Data, SliceRead};


/// A parsed container envelope, borrowing the file bytes.
/// Items and data blobs are fetched on demand; type-ids that this
/// crate does not recognize (such as the UUID extension index)
/// remain in the tables but are never touched.
#[derive(Debug)]
pub struct DataFileReader<'bytes> {
    bytes: &'bytes [u8],
    header: ContainerHeader,
    item_types: Vec<ItemTypeEntry>,
    item_offsets: Vec<i32>,
    data_offsets: Vec<i32>,
    data_sizes: Vec<i32>,
    items_start: usize,
    data_start: usize,
}

impl<'bytes> DataFileReader<'bytes> {

    /// Parse the envelope: magic, container version, fixed header
    /// and all index tables. Item bodies are not touched yet.
    pub fn parse(bytes: &'bytes [u8]) -> Result<Self> {
        let mut read = SliceRead::new(bytes);

        magic_number::validate(&mut read)?;
        container_version::validate(&mut read)?;

        let header = ContainerHeader::read(&mut read)?;

        let item_type_count = i32_to_usize(header.item_type_count, "item type count")?;
        let item_count = i32_to_usize(header.item_count, "item count")?;
        let data_count = i32_to_usize(header.data_count, "data count")?;

        let mut item_types = Vec::with_capacity(item_type_count.min(16));
        for _ in 0 .. item_type_count {
            item_types.push(ItemTypeEntry::read(&mut read)?);
        }

        let item_offsets = i32::read_vec(&mut read, item_count)?;
        let data_offsets = i32::read_vec(&mut read, data_count)?;
        let data_sizes = i32::read_vec(&mut read, data_count)?;

        let items_start = read.position();
        let data_start = items_start
            .checked_add(i32_to_usize(header.item_byte_size, "item byte size")?)
            .ok_or(Error::Truncated)?;

        if data_start > bytes.len() {
            return Err(Error::Truncated);
        }

        Ok(DataFileReader {
            bytes, header, item_types,
            item_offsets, data_offsets, data_sizes,
            items_start, data_start,
        })
    }

    /// The fixed header as found in the file.
    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    fn type_entry(&self, kind: ItemKind) -> Option<&ItemTypeEntry> {
        self.item_types.iter().find(|entry| entry.type_id == kind.type_id())
    }

    /// Number of items of the specified kind present in this file.
    pub fn item_count(&self, kind: ItemKind) -> usize {
        self.type_entry(kind)
            .and_then(|entry| i32_to_usize(entry.count, "item count").ok())
            .unwrap_or(0)
    }

    /// Fetch the body of the item `(kind, index)`.
    ///
    /// Seeks to the item via the offset table, validates the packed
    /// type-id and index of the item header, and, where an expected
    /// byte size is supplied, validates the declared body size against
    /// it. Returns a cursor bounded to exactly the item body.
    pub fn item(&self, kind: ItemKind, index: usize, expected_byte_size: Option<usize>) -> Result<SliceRead<'bytes>> {
        let entry = self.type_entry(kind).ok_or_else(|| Error::UnknownKind(kind.type_id()))?;

        let start = i32_to_usize(entry.start, "item type start")?;
        let count = i32_to_usize(entry.count, "item type count")?;

        if index >= count {
            return Err(Error::out_of_range("item index"));
        }

        let offset = *self.item_offsets.get(start + index)
            .ok_or_else(|| Error::out_of_range("item offset index"))?;

        let mut read = SliceRead::new(self.bytes);
        read.seek(self.items_start + i32_to_usize(offset, "item offset")?)?;

        let item_header = ItemHeader::read(&mut read)?;

        if item_header.index() != index {
            return Err(Error::IndexMismatch { expected: index, actual: item_header.index() });
        }

        if item_header.type_id() != kind.type_id() {
            return Err(Error::invariant("item is filed under the wrong type-id"));
        }

        let byte_size = i32_to_usize(item_header.byte_size, "item byte size")?;

        if let Some(expected) = expected_byte_size {
            if byte_size != expected {
                return Err(Error::SizeMismatch { expected, actual: byte_size });
            }
        }

        Ok(SliceRead::new(read.read_bytes(byte_size)?))
    }

    /// Fetch and decompress the data-pool blob behind `pointer`.
    ///
    /// The compressed extent is the difference of neighbouring offsets;
    /// the final blob extends to the end of the file. The decompressed
    /// length must equal the declared uncompressed size.
    pub fn blob(&self, pointer: i32) -> Result<ByteVec> {
        let index = i32_to_usize(pointer, "data pointer")?;

        let begin = i32_to_usize(
            *self.data_offsets.get(index).ok_or_else(|| Error::out_of_range("data pointer"))?,
            "data offset",
        )?;

        let end = match self.data_offsets.get(index + 1) {
            Some(&next) => i32_to_usize(next, "data offset")?,
            None => self.bytes.len() - self.data_start,
        };

        if end < begin {
            return Err(Error::invariant("data offsets are not monotonic"));
        }

        let compressed = self.bytes
            .get(self.data_start + begin .. self.data_start + end)
            .ok_or(Error::Truncated)?;

        let expected_byte_size = i32_to_usize(self.data_sizes[index], "uncompressed size")?;
        compress::decompress_bytes(compressed, expected_byte_size)
    }

    /// Resolve an optional pool pointer to a NUL-terminated string.
    /// A negative pointer yields the empty string.
    pub fn blob_text(&self, pointer: i32) -> Result<Text> {
        if pointer < 0 {
            return Ok(Text::default());
        }

        Text::from_null_terminated_blob(&self.blob(pointer)?)
    }

    /// Resolve an optional pool pointer to a sequence of NUL-terminated
    /// strings stored in a single blob. A negative pointer yields no strings.
    pub fn blob_text_list(&self, pointer: i32) -> Result<Vec<Text>> {
        if pointer < 0 {
            return Ok(Vec::new());
        }

        let blob = self.blob(pointer)?;

        let mut texts: Vec<Text> = blob
            .split(|&byte| byte == 0)
            .map(|string| Text::from_bytes_unchecked(SmallVec::from_slice(string)))
            .collect();

        // splitting leaves one entry behind the final terminator
        texts.pop();
        Ok(texts)
    }
}
