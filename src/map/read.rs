
//! Materializing a map from a container.
//!
//! Layers are decoded in two phases: every twelve-byte layer header
//! is inspected first, then the item is re-read as the record its
//! kind prescribes. Tile layers are further classified into their
//! gameplay variant by the flag bitset of the body record.

use std::convert::TryFrom;
use std::path::Path;

use bit_field::BitField;

use crate::compress::ByteVec;
use crate::error::{i32_to_usize, Error, Result, UnitResult};
use crate::format::reader::DataFileReader;
use crate::format::records::{
    EnvPointRecord, EnvelopeRecord, GroupRecord, ImageRecord, InfoRecord, LayerRecord,
    QuadLayerRecord, QuadRecord, SoundLayerRecord, SoundRecord, TileLayerRecord, VersionRecord,
    LAYER_KIND_QUADS, LAYER_KIND_SOUNDS, LAYER_KIND_SOUNDS_DEPRECATED, LAYER_FLAG_DETAIL,
};
use crate::format::ItemKind;
use crate::map::tiles::{SpeedupTiles, SwitchTiles, TeleTiles, TileGrid, TuneTiles, VanillaTiles};
use crate::map::{
    Envelope, EnvPoint, EnvelopeChannels, CurveKind, Group, Image, Info, Layer, Map,
    Quad, QuadLayer, Sound, SoundLayer, TileLayer, TileLayerFlag,
};
use crate::io::{Read, SliceRead};
use crate::math::Vec2;


impl Map {

    /// Read a map from a file.
    /// Use `read_from_bytes` instead if the file is already in memory.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::read_from_bytes(&std::fs::read(path)?)
    }

    /// Buffer the byte stream completely, then read a map from it.
    /// The container requires random access, so streaming decode is not possible.
    pub fn read_from_unbuffered(mut read: impl Read) -> Result<Self> {
        let mut bytes = Vec::new();
        read.read_to_end(&mut bytes)?;
        Self::read_from_bytes(&bytes)
    }

    /// Read a map from an in-memory buffer and validate it.
    pub fn read_from_bytes(bytes: &[u8]) -> Result<Self> {
        let file = DataFileReader::parse(bytes)?;

        read_version(&file)?;

        let info = read_info(&file)?;
        let images = read_all(&file, ItemKind::Image, read_image)?;
        let envelopes = read_envelopes(&file)?;
        let sounds = read_all(&file, ItemKind::Sound, read_sound)?;
        let layers = read_all(&file, ItemKind::Layer, read_layer)?;
        let groups = read_groups(&file, layers)?;

        let map = Map { info, images, envelopes, sounds, groups };
        map.validate()?;
        Ok(map)
    }
}


fn read_all<T>(
    file: &DataFileReader<'_>,
    kind: ItemKind,
    mut read_one: impl FnMut(&DataFileReader<'_>, usize) -> Result<T>,
) -> Result<Vec<T>>
{
    (0 .. file.item_count(kind))
        .map(|index| read_one(file, index))
        .collect()
}

fn unsupported_version(kind: &'static str, version: i32) -> Error {
    Error::UnsupportedItemVersion { kind, version }
}

/// A signed wire reference: negative means none.
/// Whether the index is in range is checked by `Map::validate`.
fn reference(value: i32) -> Option<usize> {
    usize::try_from(value).ok()
}


fn read_version(file: &DataFileReader<'_>) -> UnitResult {
    if file.item_count(ItemKind::Version) == 0 {
        return Err(Error::invariant("the map has no version item"));
    }

    let mut body = file.item(ItemKind::Version, 0, Some(VersionRecord::BYTE_SIZE))?;
    let record = VersionRecord::read(&mut body)?;

    if record.version != VersionRecord::VERSION {
        return Err(unsupported_version("version", record.version));
    }

    Ok(())
}

fn read_info(file: &DataFileReader<'_>) -> Result<Info> {
    if file.item_count(ItemKind::Info) == 0 {
        return Err(Error::invariant("the map has no info item"));
    }

    let mut body = file.item(ItemKind::Info, 0, Some(InfoRecord::BYTE_SIZE))?;
    let record = InfoRecord::read(&mut body)?;

    if record.version != InfoRecord::VERSION {
        return Err(unsupported_version("info", record.version));
    }

    Ok(Info {
        author: file.blob_text(record.author)?,
        version: file.blob_text(record.map_version)?,
        credits: file.blob_text(record.credits)?,
        license: file.blob_text(record.license)?,
        settings: file.blob_text_list(record.settings)?,
    })
}

fn read_image(file: &DataFileReader<'_>, index: usize) -> Result<Image> {
    let mut body = file.item(ItemKind::Image, index, Some(ImageRecord::BYTE_SIZE))?;
    let record = ImageRecord::read(&mut body)?;

    if record.version != ImageRecord::VERSION {
        return Err(unsupported_version("image", record.version));
    }

    let name = file.blob_text(record.name)?;
    let size = Vec2(
        i32_to_usize(record.width, "image width")?,
        i32_to_usize(record.height, "image height")?,
    );

    if record.external != 0 {
        Ok(Image::External { name, size })
    }
    else {
        if record.data < 0 {
            return Err(Error::invariant("internal image misses its pixel data"));
        }

        Ok(Image::Internal { name, size, pixels: file.blob(record.data)? })
    }
}

fn read_envelopes(file: &DataFileReader<'_>) -> Result<Vec<Envelope>> {
    let points = read_env_points(file)?;

    let count = file.item_count(ItemKind::Envelope);
    let mut envelopes = Vec::with_capacity(count);

    for index in 0 .. count {
        let mut body = file.item(ItemKind::Envelope, index, Some(EnvelopeRecord::BYTE_SIZE))?;
        let record = EnvelopeRecord::read(&mut body)?;

        if record.version != EnvelopeRecord::VERSION {
            return Err(unsupported_version("envelope", record.version));
        }

        let channels = EnvelopeChannels::from_count(record.channels)
            .ok_or_else(|| Error::invariant("envelope channel count is not 1, 3 or 4"))?;

        let start = i32_to_usize(record.start_point, "envelope start point")?;
        let point_count = i32_to_usize(record.point_count, "envelope point count")?;

        let own_points = start.checked_add(point_count)
            .and_then(|end| points.get(start .. end))
            .ok_or_else(|| Error::out_of_range("envelope point range"))?;

        envelopes.push(Envelope {
            name: record.name,
            channels,
            synchronized: record.synchronized != 0,
            points: own_points.iter()
                .map(|point| EnvPoint {
                    time: point.time,
                    curve: CurveKind(point.curve),
                    values: point.values,
                })
                .collect(),
        });
    }

    Ok(envelopes)
}

fn read_env_points(file: &DataFileReader<'_>) -> Result<Vec<EnvPointRecord>> {
    if file.item_count(ItemKind::EnvPoints) == 0 {
        return Ok(Vec::new());
    }

    let mut body = file.item(ItemKind::EnvPoints, 0, None)?;
    let count = body.byte_count() / EnvPointRecord::BYTE_SIZE;

    (0 .. count).map(|_| EnvPointRecord::read(&mut body)).collect()
}

fn read_sound(file: &DataFileReader<'_>, index: usize) -> Result<Sound> {
    let mut body = file.item(ItemKind::Sound, index, Some(SoundRecord::BYTE_SIZE))?;
    let record = SoundRecord::read(&mut body)?;

    if record.version != SoundRecord::VERSION {
        return Err(unsupported_version("sound", record.version));
    }

    let name = file.blob_text(record.name)?;

    if record.external != 0 {
        Ok(Sound::External { name })
    }
    else {
        if record.data < 0 {
            return Err(Error::invariant("internal sound misses its sample data"));
        }

        Ok(Sound::Internal { name, data: file.blob(record.data)? })
    }
}


fn read_layer(file: &DataFileReader<'_>, index: usize) -> Result<Layer> {
    // phase one: only the layer header, to learn the body kind
    let mut body = file.item(ItemKind::Layer, index, None)?;
    let header = LayerRecord::read(&mut body)?;

    let detail = header.flags & LAYER_FLAG_DETAIL != 0;

    match header.kind {
        LAYER_KIND_QUADS =>
            read_quad_layer(file, index, detail),

        LAYER_KIND_SOUNDS | LAYER_KIND_SOUNDS_DEPRECATED =>
            read_sound_layer(file, index, detail, header.kind == LAYER_KIND_SOUNDS_DEPRECATED),

        // everything else has historically been a tile layer
        _ => read_tile_layer(file, index, detail),
    }
}

fn read_tile_layer(file: &DataFileReader<'_>, index: usize, detail: bool) -> Result<Layer> {
    let expected = LayerRecord::BYTE_SIZE + TileLayerRecord::BYTE_SIZE;
    let mut body = file.item(ItemKind::Layer, index, Some(expected))?;
    body.skip(LayerRecord::BYTE_SIZE)?;

    let record = TileLayerRecord::read(&mut body)?;

    if record.version != TileLayerRecord::VERSION {
        return Err(unsupported_version("tile layer", record.version));
    }

    let mut flag = None;
    for candidate in TileLayerFlag::ALL {
        if (record.flags as u32).get_bit(candidate.bit()) {
            if flag.is_some() {
                return Err(Error::invariant("tile layer carries more than one gameplay flag"));
            }

            flag = Some(candidate);
        }
    }

    let size = Vec2(
        i32_to_usize(record.size.x(), "tile layer width")?,
        i32_to_usize(record.size.y(), "tile layer height")?,
    );

    // the flag selects both the cell layout and the live data pointer
    let pointer = match flag {
        Some(TileLayerFlag::Tele) => record.data_tele,
        Some(TileLayerFlag::Speedup) => record.data_speedup,
        Some(TileLayerFlag::Front) => record.data_front,
        Some(TileLayerFlag::Switch) => record.data_switch,
        Some(TileLayerFlag::Tune) => record.data_tune,
        _ => record.data,
    };

    if pointer < 0 {
        return Err(Error::invariant("tile layer misses its cell data"));
    }

    let cells = file.blob(pointer)?;

    let tiles = match flag {
        Some(TileLayerFlag::Tele) => TileGrid::Tele(TeleTiles::from_bytes(size, cells)?),
        Some(TileLayerFlag::Speedup) => TileGrid::Speedup(SpeedupTiles::from_bytes(size, cells)?),
        Some(TileLayerFlag::Switch) => TileGrid::Switch(SwitchTiles::from_bytes(size, cells)?),
        Some(TileLayerFlag::Tune) => TileGrid::Tune(TuneTiles::from_bytes(size, cells)?),
        _ => TileGrid::Vanilla(VanillaTiles::from_bytes(size, cells)?),
    };

    let mut layer = TileLayer::new(tiles);
    layer.detail = detail;
    layer.name = record.name;
    layer.color = record.color;
    layer.color_envelope = reference(record.color_envelope);
    layer.color_envelope_offset = record.color_envelope_offset;
    layer.image = reference(record.image);
    layer.flag = flag;

    Ok(Layer::Tiles(layer))
}

fn read_quad_layer(file: &DataFileReader<'_>, index: usize, detail: bool) -> Result<Layer> {
    let expected = LayerRecord::BYTE_SIZE + QuadLayerRecord::BYTE_SIZE;
    let mut body = file.item(ItemKind::Layer, index, Some(expected))?;
    body.skip(LayerRecord::BYTE_SIZE)?;

    let record = QuadLayerRecord::read(&mut body)?;

    if record.version != QuadLayerRecord::VERSION {
        return Err(unsupported_version("quad layer", record.version));
    }

    let quad_count = i32_to_usize(record.quad_count, "quad count")?;

    let quads = if quad_count == 0 && record.data < 0 {
        Vec::new()
    }
    else {
        if record.data < 0 {
            return Err(Error::invariant("quad layer misses its quad data"));
        }

        let blob = file.blob(record.data)?;

        if Some(blob.len()) != quad_count.checked_mul(QuadRecord::BYTE_SIZE) {
            return Err(Error::invariant("quad data length does not match the quad count"));
        }

        let mut quad_read = SliceRead::new(&blob);
        (0 .. quad_count)
            .map(|_| {
                let quad = QuadRecord::read(&mut quad_read)?;
                Ok(Quad {
                    corners: [quad.positions[0], quad.positions[1], quad.positions[2], quad.positions[3]],
                    pivot: quad.positions[4],
                    corner_colors: quad.colors,
                    texture_coords: quad.texture_coords,
                    position_envelope: reference(quad.position_envelope),
                    position_envelope_offset: quad.position_envelope_offset,
                    color_envelope: reference(quad.color_envelope),
                    color_envelope_offset: quad.color_envelope_offset,
                })
            })
            .collect::<Result<Vec<Quad>>>()?
    };

    Ok(Layer::Quads(QuadLayer {
        detail,
        name: record.name,
        image: reference(record.image),
        quads,
    }))
}

fn read_sound_layer(file: &DataFileReader<'_>, index: usize, detail: bool, deprecated: bool) -> Result<Layer> {
    let expected = LayerRecord::BYTE_SIZE + SoundLayerRecord::BYTE_SIZE;
    let mut body = file.item(ItemKind::Layer, index, Some(expected))?;
    body.skip(LayerRecord::BYTE_SIZE)?;

    let record = SoundLayerRecord::read(&mut body)?;

    if record.version != SoundLayerRecord::VERSION {
        return Err(unsupported_version("sound layer", record.version));
    }

    let sources: ByteVec = if record.data < 0 { Vec::new() } else { file.blob(record.data)? };

    Ok(Layer::Sounds(SoundLayer {
        detail,
        name: record.name,
        sound: reference(record.sound),
        source_count: record.source_count,
        sources,
        deprecated,
    }))
}


fn read_groups(file: &DataFileReader<'_>, layers: Vec<Layer>) -> Result<Vec<Group>> {
    let mut slots: Vec<Option<Layer>> = layers.into_iter().map(Some).collect();

    let count = file.item_count(ItemKind::Group);
    let mut groups = Vec::with_capacity(count);

    for index in 0 .. count {
        let mut body = file.item(ItemKind::Group, index, Some(GroupRecord::BYTE_SIZE))?;
        let record = GroupRecord::read(&mut body)?;

        if record.version != GroupRecord::VERSION {
            return Err(unsupported_version("group", record.version));
        }

        let start = i32_to_usize(record.start_layer, "group start layer")?;
        let layer_count = i32_to_usize(record.layer_count, "group layer count")?;

        let mut group = Group::new();
        group.offset = record.offset;
        group.parallax = record.parallax;
        group.clipping = record.clipping != 0;
        group.clip = record.clip;
        group.name = record.name;

        let end = start.checked_add(layer_count)
            .ok_or_else(|| Error::out_of_range("group layer range"))?;

        for slot in start .. end {
            let layer = slots.get_mut(slot)
                .ok_or_else(|| Error::invariant("group layer range is out of bounds"))?
                .take()
                .ok_or_else(|| Error::invariant("group layer ranges overlap"))?;

            group.layers.push(layer);
        }

        groups.push(group);
    }

    if slots.iter().any(Option::is_some) {
        return Err(Error::invariant("a layer belongs to no group"));
    }

    Ok(groups)
}
