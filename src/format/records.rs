
//! The fixed-size wire records stored inside container items.
//!
//! Every record is the concatenation of its fields in declaration
//! order, all integers little-endian. Most records begin with their
//! own version field, separate from the container version.
//! Fields holding `-1` denote an absent reference or pointer.

use crate::error::{Result, UnitResult};
use crate::format::text::Text;
use crate::io::{Data, SliceRead, Write};
use crate::math::{Bounds, Vec2};


/// A color with red, green, blue and alpha components,
/// each stored as a full integer but ranging 0 to 255.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Color {

    /// The red component of this color.
    pub r: i32,

    /// The green component of this color.
    pub g: i32,

    /// The blue component of this color.
    pub b: i32,

    /// The alpha component of this color. Zero is fully transparent.
    pub a: i32,
}

impl Color {

    /// Opaque white, the neutral tint of a tile layer.
    pub fn white() -> Self {
        Color { r: 255, g: 255, b: 255, a: 255 }
    }

    /// Whether all components are inside the storable range.
    pub fn is_valid(self) -> bool {
        let in_range = |component: i32| (0 ..= 255).contains(&component);
        in_range(self.r) && in_range(self.g) && in_range(self.b) && in_range(self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::white()
    }
}

impl Data for Color {
    const BYTE_SIZE: usize = 4 * i32::BYTE_SIZE;

    fn read(read: &mut SliceRead<'_>) -> Result<Self> {
        Ok(Color {
            r: i32::read(read)?,
            g: i32::read(read)?,
            b: i32::read(read)?,
            a: i32::read(read)?,
        })
    }

    fn read_slice(read: &mut SliceRead<'_>, slice: &mut [Self]) -> UnitResult {
        for color in slice {
            *color = Self::read(read)?;
        }

        Ok(())
    }

    fn write(self, write: &mut impl Write) -> UnitResult {
        self.r.write(write)?;
        self.g.write(write)?;
        self.b.write(write)?;
        self.a.write(write)
    }

    fn write_slice(write: &mut impl Write, slice: &[Self]) -> UnitResult {
        for color in slice {
            color.write(write)?;
        }

        Ok(())
    }
}


/// Body of the format-version singleton item.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct VersionRecord {

    /// Version of the item schema. Always 1.
    pub version: i32,
}

impl VersionRecord {

    /// Number of bytes this record occupies in a map file.
    pub const BYTE_SIZE: usize = i32::BYTE_SIZE;

    /// The item version this crate reads and writes.
    pub const VERSION: i32 = 1;

    /// Read this record from an item body.
    pub fn read(read: &mut SliceRead<'_>) -> Result<Self> {
        Ok(VersionRecord { version: i32::read(read)? })
    }

    /// Without validation, write this instance to the byte stream.
    pub fn write(&self, write: &mut impl Write) -> UnitResult {
        self.version.write(write)
    }
}


/// Body of the map-info singleton item.
/// All five fields are data-pool pointers to NUL-terminated
/// strings, or `-1` where no value is stored.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct InfoRecord {

    /// Version of the item schema. Always 1.
    pub version: i32,

    /// Pool pointer to the author string.
    pub author: i32,

    /// Pool pointer to the map version string.
    pub map_version: i32,

    /// Pool pointer to the credits string.
    pub credits: i32,

    /// Pool pointer to the license string.
    pub license: i32,

    /// Pool pointer to the blob of NUL-delimited server settings.
    pub settings: i32,
}

impl InfoRecord {

    /// Number of bytes this record occupies in a map file.
    pub const BYTE_SIZE: usize = 6 * i32::BYTE_SIZE;

    /// The item version this crate reads and writes.
    pub const VERSION: i32 = 1;

    /// Read this record from an item body.
    pub fn read(read: &mut SliceRead<'_>) -> Result<Self> {
        Ok(InfoRecord {
            version: i32::read(read)?,
            author: i32::read(read)?,
            map_version: i32::read(read)?,
            credits: i32::read(read)?,
            license: i32::read(read)?,
            settings: i32::read(read)?,
        })
    }

    /// Without validation, write this instance to the byte stream.
    pub fn write(&self, write: &mut impl Write) -> UnitResult {
        self.version.write(write)?;
        self.author.write(write)?;
        self.map_version.write(write)?;
        self.credits.write(write)?;
        self.license.write(write)?;
        self.settings.write(write)
    }
}


/// Body of an image item.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ImageRecord {

    /// Version of the item schema. Always 1.
    pub version: i32,

    /// Width in pixels. Advisory for external images.
    pub width: i32,

    /// Height in pixels. Advisory for external images.
    pub height: i32,

    /// Nonzero if the image data lives outside the map file
    /// and is found by name instead.
    pub external: i32,

    /// Pool pointer to the NUL-terminated image name.
    pub name: i32,

    /// Pool pointer to the raw RGBA pixels, or `-1` for external images.
    pub data: i32,
}

impl ImageRecord {

    /// Number of bytes this record occupies in a map file.
    pub const BYTE_SIZE: usize = 6 * i32::BYTE_SIZE;

    /// The item version this crate reads and writes.
    pub const VERSION: i32 = 1;

    /// Read this record from an item body.
    pub fn read(read: &mut SliceRead<'_>) -> Result<Self> {
        Ok(ImageRecord {
            version: i32::read(read)?,
            width: i32::read(read)?,
            height: i32::read(read)?,
            external: i32::read(read)?,
            name: i32::read(read)?,
            data: i32::read(read)?,
        })
    }

    /// Without validation, write this instance to the byte stream.
    pub fn write(&self, write: &mut impl Write) -> UnitResult {
        self.version.write(write)?;
        self.width.write(write)?;
        self.height.write(write)?;
        self.external.write(write)?;
        self.name.write(write)?;
        self.data.write(write)
    }
}


/// Body of an envelope item. The points themselves live in the
/// shared env-points block; this record references a range of it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EnvelopeRecord {

    /// Version of the item schema. Always 2.
    pub version: i32,

    /// Number of values each point of this envelope animates.
    pub channels: i32,

    /// Index of this envelope's first point inside the shared block.
    pub start_point: i32,

    /// Number of consecutive points belonging to this envelope.
    pub point_count: i32,

    /// Display name of this envelope.
    pub name: Text,

    /// Nonzero if the envelope time is synchronized with the server clock.
    pub synchronized: i32,
}

impl EnvelopeRecord {

    /// Number of `i32` words the name field occupies.
    pub const NAME_WORDS: usize = 8;

    /// Number of bytes this record occupies in a map file.
    pub const BYTE_SIZE: usize = (5 + Self::NAME_WORDS) * i32::BYTE_SIZE;

    /// The item version this crate reads and writes.
    pub const VERSION: i32 = 2;

    /// Read this record from an item body.
    pub fn read(read: &mut SliceRead<'_>) -> Result<Self> {
        Ok(EnvelopeRecord {
            version: i32::read(read)?,
            channels: i32::read(read)?,
            start_point: i32::read(read)?,
            point_count: i32::read(read)?,
            name: Text::read_int_encoded(read, Self::NAME_WORDS)?,
            synchronized: i32::read(read)?,
        })
    }

    /// Write this instance to the byte stream,
    /// failing if the name does not fit its field.
    pub fn write(&self, write: &mut impl Write) -> UnitResult {
        self.version.write(write)?;
        self.channels.write(write)?;
        self.start_point.write(write)?;
        self.point_count.write(write)?;
        self.name.write_int_encoded(write, Self::NAME_WORDS)?;
        self.synchronized.write(write)
    }
}


/// One point of an envelope, as stored in the shared env-points block.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct EnvPointRecord {

    /// Point in time this point is anchored at, in milliseconds.
    pub time: i32,

    /// How to interpolate between this point and the next.
    pub curve: i32,

    /// The animated values. Envelopes with fewer channels
    /// leave the remaining values zero.
    pub values: [i32; 4],
}

impl EnvPointRecord {

    /// Number of bytes this record occupies in a map file.
    pub const BYTE_SIZE: usize = 6 * i32::BYTE_SIZE;

    /// Read this record from an item body.
    pub fn read(read: &mut SliceRead<'_>) -> Result<Self> {
        let mut point = EnvPointRecord {
            time: i32::read(read)?,
            curve: i32::read(read)?,
            values: [0; 4],
        };

        i32::read_slice(read, &mut point.values)?;
        Ok(point)
    }

    /// Without validation, write this instance to the byte stream.
    pub fn write(&self, write: &mut impl Write) -> UnitResult {
        self.time.write(write)?;
        self.curve.write(write)?;
        i32::write_slice(write, &self.values)
    }
}


/// Body of a group item.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GroupRecord {

    /// Version of the item schema. Always 3.
    pub version: i32,

    /// World-space offset applied to all layers of this group.
    pub offset: Vec2<i32>,

    /// Parallax factors in percent. 100 scrolls with the camera.
    pub parallax: Vec2<i32>,

    /// Index of this group's first layer inside the global layer order.
    pub start_layer: i32,

    /// Number of consecutive layers belonging to this group.
    pub layer_count: i32,

    /// Nonzero if rendering of this group is clipped to `clip`.
    pub clipping: i32,

    /// The clip rectangle, in world coordinates.
    pub clip: Bounds,

    /// Display name of this group.
    pub name: Text,
}

impl GroupRecord {

    /// Number of `i32` words the name field occupies.
    pub const NAME_WORDS: usize = 3;

    /// Number of bytes this record occupies in a map file.
    pub const BYTE_SIZE: usize = (12 + Self::NAME_WORDS) * i32::BYTE_SIZE;

    /// The item version this crate reads and writes.
    pub const VERSION: i32 = 3;

    /// Read this record from an item body.
    pub fn read(read: &mut SliceRead<'_>) -> Result<Self> {
        Ok(GroupRecord {
            version: i32::read(read)?,
            offset: Vec2::read(read)?,
            parallax: Vec2::read(read)?,
            start_layer: i32::read(read)?,
            layer_count: i32::read(read)?,
            clipping: i32::read(read)?,
            clip: Bounds::read(read)?,
            name: Text::read_int_encoded(read, Self::NAME_WORDS)?,
        })
    }

    /// Write this instance to the byte stream,
    /// failing if the name does not fit its field.
    pub fn write(&self, write: &mut impl Write) -> UnitResult {
        self.version.write(write)?;
        self.offset.write(write)?;
        self.parallax.write(write)?;
        self.start_layer.write(write)?;
        self.layer_count.write(write)?;
        self.clipping.write(write)?;
        self.clip.write(write)?;
        self.name.write_int_encoded(write, Self::NAME_WORDS)
    }
}


/// The twelve-byte header shared by all layer items,
/// preceding the kind-specific body record.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct LayerRecord {

    /// Unused by every known tool. Written as `-1`.
    pub version: i32,

    /// Which body record follows: one of the `LAYER_KIND_*` constants.
    pub kind: i32,

    /// Bitset of layer flags. Only `LAYER_FLAG_DETAIL` is defined.
    pub flags: i32,
}

/// Layer kind of tile layers.
pub const LAYER_KIND_TILES: i32 = 2;

/// Layer kind of quad layers.
pub const LAYER_KIND_QUADS: i32 = 3;

/// Layer kind written by historical versions for sound layers.
/// Read like `LAYER_KIND_SOUNDS` and preserved on write.
pub const LAYER_KIND_SOUNDS_DEPRECATED: i32 = 9;

/// Layer kind of sound layers.
pub const LAYER_KIND_SOUNDS: i32 = 10;

/// Bit marking a layer as a non-essential detail layer
/// that low-detail clients may skip.
pub const LAYER_FLAG_DETAIL: i32 = 1;

impl LayerRecord {

    /// Number of bytes this record occupies in a map file.
    pub const BYTE_SIZE: usize = 3 * i32::BYTE_SIZE;

    /// Read this record from an item body.
    pub fn read(read: &mut SliceRead<'_>) -> Result<Self> {
        Ok(LayerRecord {
            version: i32::read(read)?,
            kind: i32::read(read)?,
            flags: i32::read(read)?,
        })
    }

    /// Without validation, write this instance to the byte stream.
    pub fn write(&self, write: &mut impl Write) -> UnitResult {
        self.version.write(write)?;
        self.kind.write(write)?;
        self.flags.write(write)
    }
}


/// Body of a tile layer item, following the layer header.
/// The same record layout serves all gameplay variants; the `flags`
/// bitset selects the cell layout and which data pointer is live.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TileLayerRecord {

    /// Version of the item schema. Always 3.
    pub version: i32,

    /// Size of the tile grid in cells.
    pub size: Vec2<i32>,

    /// Bitset of gameplay flags, at most one bit set.
    pub flags: i32,

    /// Tint color applied to the whole layer.
    pub color: Color,

    /// Envelope reference animating the tint color, or `-1`.
    pub color_envelope: i32,

    /// Time offset into the color envelope, in milliseconds.
    pub color_envelope_offset: i32,

    /// Image reference of the tile set, or `-1`.
    pub image: i32,

    /// Pool pointer to the vanilla cell grid.
    pub data: i32,

    /// Display name of this layer.
    pub name: Text,

    /// Pool pointer to the tele cell grid, or `-1`.
    pub data_tele: i32,

    /// Pool pointer to the speedup cell grid, or `-1`.
    pub data_speedup: i32,

    /// Pool pointer to the front cell grid, or `-1`.
    pub data_front: i32,

    /// Pool pointer to the switch cell grid, or `-1`.
    pub data_switch: i32,

    /// Pool pointer to the tune cell grid, or `-1`.
    pub data_tune: i32,
}

impl TileLayerRecord {

    /// Number of `i32` words the name field occupies.
    pub const NAME_WORDS: usize = 3;

    /// Number of bytes this record occupies in a map file.
    pub const BYTE_SIZE: usize = (17 + Self::NAME_WORDS) * i32::BYTE_SIZE;

    /// The item version this crate reads and writes.
    pub const VERSION: i32 = 3;

    /// Read this record from an item body.
    pub fn read(read: &mut SliceRead<'_>) -> Result<Self> {
        Ok(TileLayerRecord {
            version: i32::read(read)?,
            size: Vec2::read(read)?,
            flags: i32::read(read)?,
            color: Color::read(read)?,
            color_envelope: i32::read(read)?,
            color_envelope_offset: i32::read(read)?,
            image: i32::read(read)?,
            data: i32::read(read)?,
            name: Text::read_int_encoded(read, Self::NAME_WORDS)?,
            data_tele: i32::read(read)?,
            data_speedup: i32::read(read)?,
            data_front: i32::read(read)?,
            data_switch: i32::read(read)?,
            data_tune: i32::read(read)?,
        })
    }

    /// Write this instance to the byte stream,
    /// failing if the name does not fit its field.
    pub fn write(&self, write: &mut impl Write) -> UnitResult {
        self.version.write(write)?;
        self.size.write(write)?;
        self.flags.write(write)?;
        self.color.write(write)?;
        self.color_envelope.write(write)?;
        self.color_envelope_offset.write(write)?;
        self.image.write(write)?;
        self.data.write(write)?;
        self.name.write_int_encoded(write, Self::NAME_WORDS)?;
        self.data_tele.write(write)?;
        self.data_speedup.write(write)?;
        self.data_front.write(write)?;
        self.data_switch.write(write)?;
        self.data_tune.write(write)
    }
}


/// Body of a quad layer item, following the layer header.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct QuadLayerRecord {

    /// Version of the item schema. Always 2.
    pub version: i32,

    /// Number of quads stored in the data blob.
    pub quad_count: i32,

    /// Pool pointer to the concatenated quad records.
    pub data: i32,

    /// Image reference of the texture, or `-1`.
    pub image: i32,

    /// Display name of this layer.
    pub name: Text,
}

impl QuadLayerRecord {

    /// Number of `i32` words the name field occupies.
    pub const NAME_WORDS: usize = 3;

    /// Number of bytes this record occupies in a map file.
    pub const BYTE_SIZE: usize = (4 + Self::NAME_WORDS) * i32::BYTE_SIZE;

    /// The item version this crate reads and writes.
    pub const VERSION: i32 = 2;

    /// Read this record from an item body.
    pub fn read(read: &mut SliceRead<'_>) -> Result<Self> {
        Ok(QuadLayerRecord {
            version: i32::read(read)?,
            quad_count: i32::read(read)?,
            data: i32::read(read)?,
            image: i32::read(read)?,
            name: Text::read_int_encoded(read, Self::NAME_WORDS)?,
        })
    }

    /// Write this instance to the byte stream,
    /// failing if the name does not fit its field.
    pub fn write(&self, write: &mut impl Write) -> UnitResult {
        self.version.write(write)?;
        self.quad_count.write(write)?;
        self.data.write(write)?;
        self.image.write(write)?;
        self.name.write_int_encoded(write, Self::NAME_WORDS)
    }
}


/// One textured rectangle of a quad layer, as stored in its data blob.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct QuadRecord {

    /// The four corners followed by the rotation pivot.
    pub positions: [Vec2<i32>; 5],

    /// The color at each corner.
    pub colors: [Color; 4],

    /// The texture coordinate at each corner.
    pub texture_coords: [Vec2<i32>; 4],

    /// Envelope reference animating the position, or `-1`.
    pub position_envelope: i32,

    /// Time offset into the position envelope, in milliseconds.
    pub position_envelope_offset: i32,

    /// Envelope reference animating the color, or `-1`.
    pub color_envelope: i32,

    /// Time offset into the color envelope, in milliseconds.
    pub color_envelope_offset: i32,
}

impl QuadRecord {

    /// Number of bytes this record occupies in a map file.
    pub const BYTE_SIZE: usize = (5 * 2 + 4 * 4 + 4 * 2 + 4) * i32::BYTE_SIZE;

    /// Read this record from an item body.
    pub fn read(read: &mut SliceRead<'_>) -> Result<Self> {
        let mut quad = QuadRecord {
            positions: [Vec2(0, 0); 5],
            colors: [Color::white(); 4],
            texture_coords: [Vec2(0, 0); 4],
            position_envelope: -1,
            position_envelope_offset: 0,
            color_envelope: -1,
            color_envelope_offset: 0,
        };

        Vec2::read_slice(read, &mut quad.positions)?;
        Color::read_slice(read, &mut quad.colors)?;
        Vec2::read_slice(read, &mut quad.texture_coords)?;

        quad.position_envelope = i32::read(read)?;
        quad.position_envelope_offset = i32::read(read)?;
        quad.color_envelope = i32::read(read)?;
        quad.color_envelope_offset = i32::read(read)?;

        Ok(quad)
    }

    /// Without validation, write this instance to the byte stream.
    pub fn write(&self, write: &mut impl Write) -> UnitResult {
        Vec2::write_slice(write, &self.positions)?;
        Color::write_slice(write, &self.colors)?;
        Vec2::write_slice(write, &self.texture_coords)?;

        self.position_envelope.write(write)?;
        self.position_envelope_offset.write(write)?;
        self.color_envelope.write(write)?;
        self.color_envelope_offset.write(write)
    }
}


/// Body of a sound layer item, following the layer header.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SoundLayerRecord {

    /// Version of the item schema. Always 2.
    pub version: i32,

    /// Number of sound sources stored in the data blob.
    pub source_count: i32,

    /// Pool pointer to the concatenated source records.
    pub data: i32,

    /// Sound reference of the sample to play, or `-1`.
    pub sound: i32,

    /// Display name of this layer.
    pub name: Text,
}

impl SoundLayerRecord {

    /// Number of `i32` words the name field occupies.
    pub const NAME_WORDS: usize = 3;

    /// Number of bytes this record occupies in a map file.
    pub const BYTE_SIZE: usize = (4 + Self::NAME_WORDS) * i32::BYTE_SIZE;

    /// The item version this crate reads and writes.
    pub const VERSION: i32 = 2;

    /// Read this record from an item body.
    pub fn read(read: &mut SliceRead<'_>) -> Result<Self> {
        Ok(SoundLayerRecord {
            version: i32::read(read)?,
            source_count: i32::read(read)?,
            data: i32::read(read)?,
            sound: i32::read(read)?,
            name: Text::read_int_encoded(read, Self::NAME_WORDS)?,
        })
    }

    /// Write this instance to the byte stream,
    /// failing if the name does not fit its field.
    pub fn write(&self, write: &mut impl Write) -> UnitResult {
        self.version.write(write)?;
        self.source_count.write(write)?;
        self.data.write(write)?;
        self.sound.write(write)?;
        self.name.write_int_encoded(write, Self::NAME_WORDS)
    }
}


/// Body of a sound item.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SoundRecord {

    /// Version of the item schema. Always 1.
    pub version: i32,

    /// Nonzero if the sample data lives outside the map file
    /// and is found by name instead.
    pub external: i32,

    /// Pool pointer to the NUL-terminated sample name.
    pub name: i32,

    /// Pool pointer to the opus sample data, or `-1` for external sounds.
    pub data: i32,

    /// Byte size of the sample data.
    pub data_byte_size: i32,
}

impl SoundRecord {

    /// Number of bytes this record occupies in a map file.
    pub const BYTE_SIZE: usize = 5 * i32::BYTE_SIZE;

    /// The item version this crate reads and writes.
    pub const VERSION: i32 = 1;

    /// Read this record from an item body.
    pub fn read(read: &mut SliceRead<'_>) -> Result<Self> {
        Ok(SoundRecord {
            version: i32::read(read)?,
            external: i32::read(read)?,
            name: i32::read(read)?,
            data: i32::read(read)?,
            data_byte_size: i32::read(read)?,
        })
    }

    /// Without validation, write this instance to the byte stream.
    pub fn write(&self, write: &mut impl Write) -> UnitResult {
        self.version.write(write)?;
        self.external.write(write)?;
        self.name.write(write)?;
        self.data.write(write)?;
        self.data_byte_size.write(write)
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn schema_sizes() {
        assert_eq!(VersionRecord::BYTE_SIZE, 4);
        assert_eq!(InfoRecord::BYTE_SIZE, 24);
        assert_eq!(ImageRecord::BYTE_SIZE, 24);
        assert_eq!(EnvelopeRecord::BYTE_SIZE, 52);
        assert_eq!(EnvPointRecord::BYTE_SIZE, 24);
        assert_eq!(GroupRecord::BYTE_SIZE, 60);
        assert_eq!(LayerRecord::BYTE_SIZE, 12);
        assert_eq!(TileLayerRecord::BYTE_SIZE, 80);
        assert_eq!(QuadLayerRecord::BYTE_SIZE, 28);
        assert_eq!(QuadRecord::BYTE_SIZE, 152);
        assert_eq!(SoundLayerRecord::BYTE_SIZE, 28);
        assert_eq!(SoundRecord::BYTE_SIZE, 20);
    }

    #[test]
    fn tile_layer_record_roundtrip() {
        let record = TileLayerRecord {
            version: TileLayerRecord::VERSION,
            size: Vec2(50, 25),
            flags: 1,
            color: Color { r: 10, g: 20, b: 30, a: 40 },
            color_envelope: -1,
            color_envelope_offset: -1234567,
            image: 2,
            data: 7,
            name: Text::from("Game").unwrap(),
            data_tele: -1,
            data_speedup: -1,
            data_front: -1,
            data_switch: -1,
            data_tune: -1,
        };

        let mut bytes = Vec::new();
        record.write(&mut bytes).unwrap();
        assert_eq!(bytes.len(), TileLayerRecord::BYTE_SIZE);

        let decoded = TileLayerRecord::read(&mut SliceRead::new(&bytes)).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn group_record_roundtrip() {
        let record = GroupRecord {
            version: GroupRecord::VERSION,
            offset: Vec2(-3, 14),
            parallax: Vec2(100, 100),
            start_layer: 0,
            layer_count: 1,
            clipping: 1,
            clip: Bounds { position: Vec2(0, 0), size: Vec2(800, 600) },
            name: Text::from("Game").unwrap(),
        };

        let mut bytes = Vec::new();
        record.write(&mut bytes).unwrap();
        assert_eq!(bytes.len(), GroupRecord::BYTE_SIZE);

        let decoded = GroupRecord::read(&mut SliceRead::new(&bytes)).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn quad_record_roundtrip() {
        let quad = QuadRecord {
            positions: [Vec2(0, 0), Vec2(64, 0), Vec2(0, 64), Vec2(64, 64), Vec2(32, 32)],
            colors: [Color::white(); 4],
            texture_coords: [Vec2(0, 0), Vec2(1024, 0), Vec2(0, 1024), Vec2(1024, 1024)],
            position_envelope: 1,
            position_envelope_offset: 0,
            color_envelope: -1,
            color_envelope_offset: 250,
        };

        let mut bytes = Vec::new();
        quad.write(&mut bytes).unwrap();
        assert_eq!(bytes.len(), QuadRecord::BYTE_SIZE);

        assert_eq!(QuadRecord::read(&mut SliceRead::new(&bytes)).unwrap(), quad);
    }
}
