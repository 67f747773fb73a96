
//! Low-level writing of the container envelope.
//! Collects item bodies and data blobs, then emits the complete
//! container with all sizes and offset tables computed.

use std::collections::BTreeMap;

use crate::compress::{self, ByteVec};
use crate::error::{usize_to_i32, Result, UnitResult};
use crate::format::text::Text;
use crate::format::{
    container_version, magic_number, swaplen, total_size,
    ContainerHeader, ItemHeader, ItemTypeEntry,
};
use crate::format::ItemKind;
use crate::io::{Data, Write};


/// Accumulates items and data blobs, then emits a container.
///
/// Items are partitioned by ascending type-id; within one type-id
/// they keep the order in which they were added, which becomes their
/// index on disk. Data blobs are compressed as they are registered
/// and referenced through the returned pool pointers.
#[derive(Debug, Default)]
pub struct DataFileWriter {
    items: BTreeMap<i32, Vec<ByteVec>>,
    data_offsets: Vec<i32>,
    data_sizes: Vec<i32>,
    data: ByteVec,
}

impl DataFileWriter {

    /// Create a writer holding no items and no data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finished item body.
    /// Returns the index of the item within its kind.
    pub fn add_item(&mut self, kind: ItemKind, body: ByteVec) -> usize {
        let bodies = self.items.entry(kind.type_id()).or_insert_with(Vec::new);
        bodies.push(body);
        bodies.len() - 1
    }

    /// Compress and append a blob to the data pool.
    /// Returns the pool pointer referencing it.
    pub fn register_data(&mut self, bytes: &[u8]) -> Result<i32> {
        let pointer = usize_to_i32(self.data_offsets.len(), "data pointer")?;

        self.data_offsets.push(usize_to_i32(self.data.len(), "data offset")?);
        self.data_sizes.push(usize_to_i32(bytes.len(), "uncompressed size")?);
        self.data.extend_from_slice(&compress::compress_bytes(bytes));

        Ok(pointer)
    }

    /// Register a string as a NUL-terminated blob.
    pub fn register_text(&mut self, text: &Text) -> Result<i32> {
        self.register_data(&text.to_null_terminated_bytes())
    }

    /// Register a sequence of strings as one blob
    /// of concatenated NUL-terminated strings.
    pub fn register_text_list(&mut self, texts: &[Text]) -> Result<i32> {
        let mut bytes = Vec::new();
        for text in texts {
            bytes.extend_from_slice(&text.to_null_terminated_bytes());
        }

        self.register_data(&bytes)
    }

    fn item_count(&self) -> usize {
        self.items.values().map(Vec::len).sum()
    }

    fn item_byte_size(&self) -> usize {
        self.items.values().flatten()
            .map(|body| ItemHeader::BYTE_SIZE + body.len())
            .sum()
    }

    /// Emit the complete container: version header, fixed header,
    /// item-type index, offset tables, items and the data pool.
    pub fn write(self, write: &mut impl Write) -> UnitResult {
        let item_byte_size = self.item_byte_size();

        let swaplen = swaplen(
            self.items.len(), self.item_count(),
            self.data_offsets.len(), item_byte_size,
        );

        let header = ContainerHeader {
            size: usize_to_i32(total_size(swaplen, self.data.len()), "container size")?,
            swaplen: usize_to_i32(swaplen, "container swaplen")?,
            item_type_count: usize_to_i32(self.items.len(), "item type count")?,
            item_count: usize_to_i32(self.item_count(), "item count")?,
            data_count: usize_to_i32(self.data_offsets.len(), "data count")?,
            item_byte_size: usize_to_i32(item_byte_size, "item byte size")?,
            data_byte_size: usize_to_i32(self.data.len(), "data byte size")?,
        };

        magic_number::write(write)?;
        container_version::write(write)?;
        header.write(write)?;

        let mut start = 0_usize;
        for (&type_id, bodies) in &self.items {
            ItemTypeEntry {
                type_id,
                start: usize_to_i32(start, "item type start")?,
                count: usize_to_i32(bodies.len(), "item type count")?,
            }.write(write)?;

            start += bodies.len();
        }

        let mut offset = 0_usize;
        for body in self.items.values().flatten() {
            usize_to_i32(offset, "item offset")?.write(write)?;
            offset += ItemHeader::BYTE_SIZE + body.len();
        }

        i32::write_slice(write, &self.data_offsets)?;
        i32::write_slice(write, &self.data_sizes)?;

        for (&type_id, bodies) in &self.items {
            for (index, body) in bodies.iter().enumerate() {
                ItemHeader::new(type_id, index, body.len())?.write(write)?;
                u8::write_slice(write, body)?;
            }
        }

        u8::write_slice(write, &self.data)
    }
}
