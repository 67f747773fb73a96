
//! Serializing a map into a container.
//!
//! Walk order: version, info, images, envelopes, sounds, then for
//! every group its layers followed by the group record itself. The
//! container writer partitions the collected items by type-id, so
//! this order fixes the on-disk index of every item within its kind.

use std::path::Path;

use crate::compress::ByteVec;
use crate::error::{usize_to_i32, Result, UnitResult};
use crate::format::records::{
    EnvPointRecord, EnvelopeRecord, GroupRecord, ImageRecord, InfoRecord, LayerRecord,
    QuadLayerRecord, QuadRecord, SoundLayerRecord, SoundRecord, TileLayerRecord, VersionRecord,
    LAYER_KIND_QUADS, LAYER_KIND_SOUNDS, LAYER_KIND_SOUNDS_DEPRECATED, LAYER_KIND_TILES,
    LAYER_FLAG_DETAIL,
};
use crate::format::text::Text;
use crate::format::writer::DataFileWriter;
use crate::format::ItemKind;
use crate::io::Write;
use crate::map::tiles::VanillaTiles;
use crate::map::{
    Envelope, Group, Image, Info, Layer, Map, QuadLayer, Sound, SoundLayer,
    TileLayer, TileLayerFlag,
};
use crate::math::Vec2;


impl Map {

    /// Validate this map and write it to a file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> UnitResult {
        std::fs::write(path, self.write_to_bytes()?)?;
        Ok(())
    }

    /// Validate this map and write it to any byte stream.
    pub fn write_to_unbuffered(&self, write: &mut impl Write) -> UnitResult {
        write.write_all(&self.write_to_bytes()?)?;
        Ok(())
    }

    /// Validate this map and serialize it into an in-memory buffer.
    pub fn write_to_bytes(&self) -> Result<ByteVec> {
        self.validate()?;

        let mut file = DataFileWriter::new();

        write_version(&mut file)?;
        write_info(&mut file, &self.info)?;

        for image in &self.images {
            write_image(&mut file, image)?;
        }

        write_envelopes(&mut file, &self.envelopes)?;

        for sound in &self.sounds {
            write_sound(&mut file, sound)?;
        }

        let mut start_layer = 0_usize;
        for group in &self.groups {
            for layer in &group.layers {
                write_layer(&mut file, layer)?;
            }

            write_group(&mut file, group, start_layer)?;
            start_layer += group.layers.len();
        }

        let mut bytes = Vec::new();
        file.write(&mut bytes)?;
        Ok(bytes)
    }
}


/// A pool pointer for an optional string: empty strings are not stored.
fn register_optional_text(file: &mut DataFileWriter, text: &Text) -> Result<i32> {
    if text.is_empty() { Ok(-1) }
    else { file.register_text(text) }
}

/// A signed wire reference: none becomes negative.
fn reference(value: Option<usize>) -> Result<i32> {
    match value {
        None => Ok(-1),
        Some(index) => usize_to_i32(index, "item reference"),
    }
}

fn grid_size(size: Vec2<usize>) -> Result<Vec2<i32>> {
    Ok(Vec2(
        usize_to_i32(size.x(), "tile layer width")?,
        usize_to_i32(size.y(), "tile layer height")?,
    ))
}


fn write_version(file: &mut DataFileWriter) -> UnitResult {
    let mut body = Vec::new();
    VersionRecord { version: VersionRecord::VERSION }.write(&mut body)?;

    file.add_item(ItemKind::Version, body);
    Ok(())
}

fn write_info(file: &mut DataFileWriter, info: &Info) -> UnitResult {
    let record = InfoRecord {
        version: InfoRecord::VERSION,
        author: register_optional_text(file, &info.author)?,
        map_version: register_optional_text(file, &info.version)?,
        credits: register_optional_text(file, &info.credits)?,
        license: register_optional_text(file, &info.license)?,
        settings: if info.settings.is_empty() { -1 } else { file.register_text_list(&info.settings)? },
    };

    let mut body = Vec::new();
    record.write(&mut body)?;

    file.add_item(ItemKind::Info, body);
    Ok(())
}

fn write_image(file: &mut DataFileWriter, image: &Image) -> UnitResult {
    let name = file.register_text(image.name())?;

    let data = match image {
        Image::External { .. } => -1,
        Image::Internal { pixels, .. } => file.register_data(pixels)?,
    };

    let record = ImageRecord {
        version: ImageRecord::VERSION,
        width: usize_to_i32(image.size().x(), "image width")?,
        height: usize_to_i32(image.size().y(), "image height")?,
        external: i32::from(image.is_external()),
        name,
        data,
    };

    let mut body = Vec::new();
    record.write(&mut body)?;

    file.add_item(ItemKind::Image, body);
    Ok(())
}

fn write_envelopes(file: &mut DataFileWriter, envelopes: &[Envelope]) -> UnitResult {
    if envelopes.is_empty() {
        return Ok(());
    }

    let mut points_body = Vec::new();
    let mut start_point = 0_usize;

    for envelope in envelopes {
        let record = EnvelopeRecord {
            version: EnvelopeRecord::VERSION,
            channels: envelope.channels.count(),
            start_point: usize_to_i32(start_point, "envelope start point")?,
            point_count: usize_to_i32(envelope.points.len(), "envelope point count")?,
            name: envelope.name.clone(),
            synchronized: i32::from(envelope.synchronized),
        };

        let mut body = Vec::new();
        record.write(&mut body)?;
        file.add_item(ItemKind::Envelope, body);

        for point in &envelope.points {
            EnvPointRecord {
                time: point.time,
                curve: point.curve.0,
                values: point.values,
            }.write(&mut points_body)?;
        }

        start_point += envelope.points.len();
    }

    file.add_item(ItemKind::EnvPoints, points_body);
    Ok(())
}

fn write_sound(file: &mut DataFileWriter, sound: &Sound) -> UnitResult {
    let name = file.register_text(sound.name())?;

    let record = match sound {
        Sound::External { .. } => SoundRecord {
            version: SoundRecord::VERSION,
            external: 1,
            name,
            data: -1,
            data_byte_size: 0,
        },

        Sound::Internal { data, .. } => SoundRecord {
            version: SoundRecord::VERSION,
            external: 0,
            name,
            data: file.register_data(data)?,
            data_byte_size: usize_to_i32(data.len(), "sound data size")?,
        },
    };

    let mut body = Vec::new();
    record.write(&mut body)?;

    file.add_item(ItemKind::Sound, body);
    Ok(())
}


fn layer_header(kind: i32, detail: bool) -> LayerRecord {
    LayerRecord {
        version: -1,
        kind,
        flags: if detail { LAYER_FLAG_DETAIL } else { 0 },
    }
}

fn write_layer(file: &mut DataFileWriter, layer: &Layer) -> UnitResult {
    match layer {
        Layer::Tiles(tile_layer) => write_tile_layer(file, tile_layer),
        Layer::Quads(quad_layer) => write_quad_layer(file, quad_layer),
        Layer::Sounds(sound_layer) => write_sound_layer(file, sound_layer),
    }
}

fn write_tile_layer(file: &mut DataFileWriter, layer: &TileLayer) -> UnitResult {
    let size = layer.tiles.size();
    let stored_cells = file.register_data(layer.tiles.raw_bytes())?;

    let mut record = TileLayerRecord {
        version: TileLayerRecord::VERSION,
        size: grid_size(size)?,
        flags: 0,
        color: layer.color,
        color_envelope: reference(layer.color_envelope)?,
        color_envelope_offset: layer.color_envelope_offset,
        image: reference(layer.image)?,
        data: stored_cells,
        name: layer.name.clone(),
        data_tele: -1,
        data_speedup: -1,
        data_front: -1,
        data_switch: -1,
        data_tune: -1,
    };

    if let Some(flag) = layer.tile_flag() {
        record.flags = 1 << flag.bit();

        // variant grids live behind their dedicated pointer; the primary
        // pointer then receives a zero-filled vanilla grid so that tools
        // unaware of the variant still find well-formed cell data
        let variant_pointer = match flag {
            TileLayerFlag::Game => None,
            TileLayerFlag::Tele => Some(&mut record.data_tele),
            TileLayerFlag::Speedup => Some(&mut record.data_speedup),
            TileLayerFlag::Front => Some(&mut record.data_front),
            TileLayerFlag::Switch => Some(&mut record.data_switch),
            TileLayerFlag::Tune => Some(&mut record.data_tune),
        };

        if let Some(pointer) = variant_pointer {
            *pointer = stored_cells;

            let placeholder = vec![0_u8; size.area() * VanillaTiles::CELL_BYTE_SIZE];
            record.data = file.register_data(&placeholder)?;
        }
    }

    let mut body = Vec::new();
    layer_header(LAYER_KIND_TILES, layer.detail).write(&mut body)?;
    record.write(&mut body)?;

    file.add_item(ItemKind::Layer, body);
    Ok(())
}

fn write_quad_layer(file: &mut DataFileWriter, layer: &QuadLayer) -> UnitResult {
    let data = if layer.quads.is_empty() { -1 }
    else {
        let mut quad_bytes = Vec::with_capacity(layer.quads.len() * QuadRecord::BYTE_SIZE);

        for quad in &layer.quads {
            QuadRecord {
                positions: [
                    quad.corners[0], quad.corners[1], quad.corners[2], quad.corners[3],
                    quad.pivot,
                ],
                colors: quad.corner_colors,
                texture_coords: quad.texture_coords,
                position_envelope: reference(quad.position_envelope)?,
                position_envelope_offset: quad.position_envelope_offset,
                color_envelope: reference(quad.color_envelope)?,
                color_envelope_offset: quad.color_envelope_offset,
            }.write(&mut quad_bytes)?;
        }

        file.register_data(&quad_bytes)?
    };

    let record = QuadLayerRecord {
        version: QuadLayerRecord::VERSION,
        quad_count: usize_to_i32(layer.quads.len(), "quad count")?,
        data,
        image: reference(layer.image)?,
        name: layer.name.clone(),
    };

    let mut body = Vec::new();
    layer_header(LAYER_KIND_QUADS, layer.detail).write(&mut body)?;
    record.write(&mut body)?;

    file.add_item(ItemKind::Layer, body);
    Ok(())
}

fn write_sound_layer(file: &mut DataFileWriter, layer: &SoundLayer) -> UnitResult {
    let record = SoundLayerRecord {
        version: SoundLayerRecord::VERSION,
        source_count: layer.source_count,
        data: if layer.sources.is_empty() { -1 } else { file.register_data(&layer.sources)? },
        sound: reference(layer.sound)?,
        name: layer.name.clone(),
    };

    let kind = if layer.deprecated { LAYER_KIND_SOUNDS_DEPRECATED } else { LAYER_KIND_SOUNDS };

    let mut body = Vec::new();
    layer_header(kind, layer.detail).write(&mut body)?;
    record.write(&mut body)?;

    file.add_item(ItemKind::Layer, body);
    Ok(())
}


fn write_group(file: &mut DataFileWriter, group: &Group, start_layer: usize) -> UnitResult {
    let record = GroupRecord {
        version: GroupRecord::VERSION,
        offset: group.offset,
        parallax: group.parallax,
        start_layer: usize_to_i32(start_layer, "group start layer")?,
        layer_count: usize_to_i32(group.layers.len(), "group layer count")?,
        clipping: i32::from(group.clipping),
        clip: group.clip,
        name: group.name.clone(),
    };

    let mut body = Vec::new();
    record.write(&mut body)?;

    file.add_item(ItemKind::Group, body);
    Ok(())
}
