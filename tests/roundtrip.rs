
//! End-to-end scenarios: write a map, read it back,
//! and inspect the emitted container structure.

extern crate twmap;

use twmap::format::reader::DataFileReader;
use twmap::format::records::{ImageRecord, InfoRecord, TileLayerRecord};
use twmap::format::{ContainerHeader, ItemHeader, ItemKind, ItemTypeEntry};
use twmap::io::{Data, SliceRead};
use twmap::prelude::*;


fn roundtrip(map: &Map) -> Map {
    let bytes = map.write_to_bytes().unwrap();
    let reloaded = Map::read_from_bytes(&bytes).unwrap();

    assert_eq!(&reloaded, map);
    reloaded
}

/// A map exercising every item kind at once.
fn kitchen_sink() -> Map {
    let mut map = Map::new();

    map.info.author = Text::from("unit test").unwrap();
    map.info.version = Text::from("1").unwrap();
    map.info.settings = vec![
        Text::from("sv_foo 1").unwrap(),
        Text::from("sv_bar baz").unwrap(),
    ];

    map.images.push(Image::External {
        name: Text::from("grass_main").unwrap(),
        size: Vec2(1024, 1024),
    });

    map.images.push(Image::Internal {
        name: Text::from("embedded").unwrap(),
        size: Vec2(4, 2),
        pixels: [255_u8, 0, 0, 255].repeat(8),
    });

    map.envelopes.push(Envelope {
        name: Text::from("wiggle").unwrap(),
        channels: EnvelopeChannels::Position,
        synchronized: true,
        points: vec![
            EnvPoint { time: 0, curve: CurveKind::LINEAR, values: [0, 0, 0, 0] },
            EnvPoint { time: 1000, curve: CurveKind::SMOOTH, values: [32, -32, 90, 0] },
        ],
    });

    map.sounds.push(Sound::Internal {
        name: Text::from("bird").unwrap(),
        data: vec![1, 2, 3, 4, 5],
    });

    let mut design = Group::new();
    design.name = Text::from("Design").unwrap();
    design.parallax = Vec2(70, 70);
    design.offset = Vec2(16, -16);
    design.clipping = true;
    design.clip = Bounds { position: Vec2(0, 0), size: Vec2(640, 480) };

    let mut background = TileLayer::new(TileGrid::Vanilla(VanillaTiles::new(Vec2(20, 10))));
    background.name = Text::from("sky").unwrap();
    background.detail = true;
    background.image = Some(1);
    background.color = Color { r: 10, g: 20, b: 30, a: 40 };
    background.color_envelope_offset = -1234567;
    design.layers.push(Layer::Tiles(background));

    let mut decoration = QuadLayer::new();
    decoration.name = Text::from("quads").unwrap();
    decoration.image = Some(0);
    decoration.quads.push(Quad {
        corners: [Vec2(0, 0), Vec2(64, 0), Vec2(0, 64), Vec2(64, 64)],
        pivot: Vec2(32, 32),
        corner_colors: [Color::white(); 4],
        texture_coords: [Vec2(0, 0), Vec2(1024, 0), Vec2(0, 1024), Vec2(1024, 1024)],
        position_envelope: Some(0),
        position_envelope_offset: 100,
        color_envelope: None,
        color_envelope_offset: 0,
    });
    design.layers.push(Layer::Quads(decoration));

    design.layers.push(Layer::Sounds(SoundLayer {
        detail: false,
        name: Text::from("ambience").unwrap(),
        sound: Some(0),
        source_count: 0,
        sources: Vec::new(),
        deprecated: false,
    }));

    map.groups.insert(0, design);

    // gameplay layers next to the game layer
    let game_group = map.groups.len() - 1;
    let tele = TileLayer::new(TileGrid::Tele(TeleTiles::new(Vec2(50, 50))));
    map.groups[game_group].layers.push(Layer::Tiles(tele));

    let mut switch = SwitchTiles::new(Vec2(50, 50));
    switch.set_id(Vec2(3, 4), 24).unwrap();
    map.groups[game_group].layers.push(Layer::Tiles(
        TileLayer::new(TileGrid::Switch(switch)),
    ));

    map.set_tile_flag(game_group, 1, TileLayerFlag::Tele).unwrap();
    map.set_tile_flag(game_group, 2, TileLayerFlag::Switch).unwrap();

    map.validate().unwrap();
    map
}


#[test]
fn minimal_map_roundtrips() {
    let map = Map::new();
    roundtrip(&map);
}

#[test]
fn minimal_map_container_structure() {
    let bytes = Map::new().write_to_bytes().unwrap();
    let file = DataFileReader::parse(&bytes).unwrap();

    // version, info, layer, group
    assert_eq!(file.header().item_type_count, 4);
    assert_eq!(file.header().item_count, 4);

    assert_eq!(file.item_count(ItemKind::Version), 1);
    assert_eq!(file.item_count(ItemKind::Info), 1);
    assert_eq!(file.item_count(ItemKind::Layer), 1);
    assert_eq!(file.item_count(ItemKind::Group), 1);
    assert_eq!(file.item_count(ItemKind::Image), 0);
    assert_eq!(file.item_count(ItemKind::Envelope), 0);

    // the game layer stores its cell grid even when all cells are empty
    assert_eq!(file.header().data_count, 1);
    assert_eq!(file.blob(0).unwrap(), vec![0_u8; 50 * 50 * 4]);
}

#[test]
fn swapped_magic_reads_identically() {
    let map = Map::new();
    let mut bytes = map.write_to_bytes().unwrap();

    assert_eq!(&bytes[.. 4], b"DATA");
    bytes[.. 4].copy_from_slice(b"ATAD");

    assert_eq!(Map::read_from_bytes(&bytes).unwrap(), map);
}

#[test]
fn color_and_envelope_offset_roundtrip_exactly() {
    let mut map = Map::new();

    let mut layer = TileLayer::new(TileGrid::Vanilla(VanillaTiles::new(Vec2(8, 8))));
    layer.color = Color { r: 10, g: 20, b: 30, a: 40 };
    layer.color_envelope_offset = -1234567;
    map.groups[0].layers.push(Layer::Tiles(layer));

    let reloaded = roundtrip(&map);
    let decoded = reloaded.groups[0].layers[1].as_tiles().unwrap();

    assert_eq!(decoded.color, Color { r: 10, g: 20, b: 30, a: 40 });
    assert_eq!(decoded.color_envelope_offset, -1234567);
}

#[test]
fn internal_image_pixels_roundtrip() {
    let mut map = Map::new();

    map.images.push(Image::Internal {
        name: Text::from("red").unwrap(),
        size: Vec2(4, 2),
        pixels: [255_u8, 0, 0, 255].repeat(8),
    });

    let bytes = map.write_to_bytes().unwrap();

    // the pixel blob holds exactly width * height * 4 bytes
    let file = DataFileReader::parse(&bytes).unwrap();
    let record = ImageRecord::read(&mut file.item(ItemKind::Image, 0, None).unwrap()).unwrap();
    assert_eq!(record.external, 0);
    assert_eq!(file.blob(record.data).unwrap().len(), 32);

    roundtrip(&map);
}

#[test]
fn game_flag_transfer_survives_a_save() {
    let mut map = Map::new();
    map.groups[0].layers.push(Layer::Tiles(
        TileLayer::new(TileGrid::Vanilla(VanillaTiles::new(Vec2(50, 50)))),
    ));

    map.set_tile_flag(0, 1, TileLayerFlag::Game).unwrap();

    assert!(!map.groups[0].layers[0].as_tiles().unwrap().is_game());
    assert!(map.groups[0].layers[1].as_tiles().unwrap().is_game());

    let reloaded = roundtrip(&map);
    assert_eq!(reloaded.tile_flag_position(TileLayerFlag::Game), Some((0, 1)));
}

#[test]
fn settings_are_one_nul_delimited_blob() {
    let mut map = Map::new();
    map.info.settings = vec![
        Text::from("sv_foo 1").unwrap(),
        Text::from("sv_bar baz").unwrap(),
    ];

    let bytes = map.write_to_bytes().unwrap();

    let file = DataFileReader::parse(&bytes).unwrap();
    let record = InfoRecord::read(&mut file.item(ItemKind::Info, 0, None).unwrap()).unwrap();
    assert_eq!(file.blob(record.settings).unwrap(), b"sv_foo 1\0sv_bar baz\0");

    let reloaded = roundtrip(&map);
    assert_eq!(reloaded.info.settings, map.info.settings);
}

#[test]
fn empty_info_strings_are_not_stored() {
    let bytes = Map::new().write_to_bytes().unwrap();

    let file = DataFileReader::parse(&bytes).unwrap();
    let record = InfoRecord::read(&mut file.item(ItemKind::Info, 0, None).unwrap()).unwrap();

    assert_eq!(record.author, -1);
    assert_eq!(record.map_version, -1);
    assert_eq!(record.credits, -1);
    assert_eq!(record.license, -1);
    assert_eq!(record.settings, -1);
}

#[test]
fn kitchen_sink_roundtrips() {
    let map = kitchen_sink();
    let reloaded = roundtrip(&map);

    assert_eq!(reloaded.images.len(), 2);
    assert_eq!(reloaded.envelopes.len(), 1);
    assert_eq!(reloaded.sounds.len(), 1);
    assert_eq!(reloaded.envelopes[0].points.len(), 2);

    // variant classification survives
    let game_group = reloaded.groups.len() - 1;
    let tele = reloaded.groups[game_group].layers[1].as_tiles().unwrap();
    assert!(matches!(tele.tiles, TileGrid::Tele(_)));
    assert_eq!(tele.tile_flag(), Some(TileLayerFlag::Tele));

    let switch = reloaded.groups[game_group].layers[2].as_tiles().unwrap();
    if let TileGrid::Switch(tiles) = &switch.tiles {
        assert_eq!(tiles.id(Vec2(3, 4)).unwrap(), 24);
    }
    else {
        panic!("switch layer lost its cell layout");
    }
}

#[test]
fn variant_layers_carry_a_vanilla_placeholder_grid() {
    let bytes = kitchen_sink().write_to_bytes().unwrap();
    let file = DataFileReader::parse(&bytes).unwrap();

    // the tele layer is the fifth layer on disk (design group first)
    let mut body = file.item(ItemKind::Layer, 4, None).unwrap();
    body.skip(12).unwrap();
    let record = TileLayerRecord::read(&mut body).unwrap();

    assert_eq!(record.flags, 1 << 1);
    assert!(record.data_tele >= 0);
    assert!(record.data >= 0);

    assert_eq!(file.blob(record.data_tele).unwrap().len(), 50 * 50 * 2);
    assert_eq!(file.blob(record.data).unwrap(), vec![0_u8; 50 * 50 * 4]);

    assert_eq!(record.data_speedup, -1);
    assert_eq!(record.data_front, -1);
    assert_eq!(record.data_switch, -1);
    assert_eq!(record.data_tune, -1);
}

#[test]
fn groups_without_layers_are_allowed() {
    let mut map = Map::new();

    let mut empty = Group::new();
    empty.name = Text::from("todo").unwrap();
    map.groups.push(empty);

    let reloaded = roundtrip(&map);
    assert!(reloaded.groups[1].layers.is_empty());
}

#[test]
fn deprecated_sound_layer_kind_is_preserved() {
    let mut map = Map::new();

    map.sounds.push(Sound::External { name: Text::from("wind").unwrap() });
    map.groups[0].layers.push(Layer::Sounds(SoundLayer {
        detail: false,
        name: Text::from("old").unwrap(),
        sound: Some(0),
        source_count: 0,
        sources: Vec::new(),
        deprecated: true,
    }));

    let reloaded = roundtrip(&map);

    match &reloaded.groups[0].layers[1] {
        Layer::Sounds(layer) => assert!(layer.deprecated),
        _ => panic!("sound layer changed kind"),
    }
}

#[test]
fn declared_sizes_match_the_emitted_bytes() {
    let bytes = kitchen_sink().write_to_bytes().unwrap();
    let file = DataFileReader::parse(&bytes).unwrap();
    let header = file.header();

    // size spans everything after the magic, the version and itself
    assert_eq!(header.size as usize, bytes.len() - 8);
    assert_eq!(header.size, header.swaplen + header.data_byte_size + 8);
}

#[test]
fn item_offsets_increase_by_the_emitted_item_sizes() {
    let bytes = kitchen_sink().write_to_bytes().unwrap();

    let mut read = SliceRead::new(&bytes);
    read.skip(8).unwrap();

    let header = ContainerHeader::read(&mut read).unwrap();

    for _ in 0 .. header.item_type_count {
        ItemTypeEntry::read(&mut read).unwrap();
    }

    let item_offsets = i32::read_vec(&mut read, header.item_count as usize).unwrap();
    i32::read_vec(&mut read, header.data_count as usize).unwrap();
    i32::read_vec(&mut read, header.data_count as usize).unwrap();

    let items_start = read.position();

    let mut expected_offset = 0;
    for &offset in &item_offsets {
        assert_eq!(offset, expected_offset);

        read.seek(items_start + offset as usize).unwrap();
        let item_header = ItemHeader::read(&mut read).unwrap();

        expected_offset += (ItemHeader::BYTE_SIZE as i32) + item_header.byte_size;
    }

    assert_eq!(expected_offset, header.item_byte_size);
}

#[test]
fn unknown_item_kinds_are_skipped() {
    use twmap::compress;
    use twmap::format::records::{
        GroupRecord, LayerRecord, VersionRecord, LAYER_KIND_TILES,
    };
    use twmap::format::{container_version, magic_number, swaplen, total_size};

    // a hand-assembled container: version, info, group, tile layer,
    // and one item of the reserved UUID extension kind
    let mut version_body = Vec::new();
    VersionRecord { version: 1 }.write(&mut version_body).unwrap();

    let mut info_body = Vec::new();
    InfoRecord { version: 1, author: -1, map_version: -1, credits: -1, license: -1, settings: -1 }
        .write(&mut info_body).unwrap();

    let mut group_body = Vec::new();
    GroupRecord {
        version: 3,
        offset: Vec2(0, 0),
        parallax: Vec2(100, 100),
        start_layer: 0,
        layer_count: 1,
        clipping: 0,
        clip: Bounds::default(),
        name: Text::default(),
    }.write(&mut group_body).unwrap();

    let mut layer_body = Vec::new();
    LayerRecord { version: -1, kind: LAYER_KIND_TILES, flags: 0 }.write(&mut layer_body).unwrap();
    TileLayerRecord {
        version: 3,
        size: Vec2(2, 2),
        flags: 1,
        color: Color::white(),
        color_envelope: -1,
        color_envelope_offset: 0,
        image: -1,
        data: 0,
        name: Text::default(),
        data_tele: -1,
        data_speedup: -1,
        data_front: -1,
        data_switch: -1,
        data_tune: -1,
    }.write(&mut layer_body).unwrap();

    let items: Vec<(i32, Vec<u8>)> = vec![
        (0, version_body),
        (1, info_body),
        (4, group_body),
        (5, layer_body),
        (0xffff, vec![0; 16]),
    ];

    let cells = vec![0_u8; 2 * 2 * 4];
    let compressed = compress::compress_bytes(&cells);

    let item_byte_size: usize = items.iter()
        .map(|(_, body)| ItemHeader::BYTE_SIZE + body.len())
        .sum();
    let swap = swaplen(items.len(), items.len(), 1, item_byte_size);

    let mut bytes = Vec::new();
    magic_number::write(&mut bytes).unwrap();
    container_version::write(&mut bytes).unwrap();

    ContainerHeader {
        size: total_size(swap, compressed.len()) as i32,
        swaplen: swap as i32,
        item_type_count: items.len() as i32,
        item_count: items.len() as i32,
        data_count: 1,
        item_byte_size: item_byte_size as i32,
        data_byte_size: compressed.len() as i32,
    }.write(&mut bytes).unwrap();

    for (position, (type_id, _)) in items.iter().enumerate() {
        ItemTypeEntry { type_id: *type_id, start: position as i32, count: 1 }
            .write(&mut bytes).unwrap();
    }

    let mut offset = 0_i32;
    for (_, body) in &items {
        offset.write(&mut bytes).unwrap();
        offset += (ItemHeader::BYTE_SIZE + body.len()) as i32;
    }

    0_i32.write(&mut bytes).unwrap(); // data offset
    (cells.len() as i32).write(&mut bytes).unwrap(); // uncompressed size

    for (type_id, body) in &items {
        ItemHeader::new(*type_id, 0, body.len()).unwrap().write(&mut bytes).unwrap();
        bytes.extend_from_slice(body);
    }

    bytes.extend_from_slice(&compressed);

    let map = Map::read_from_bytes(&bytes).unwrap();
    assert_eq!(map.groups.len(), 1);
    assert!(map.game_layer().is_some());
    assert_eq!(map.game_layer().unwrap().tiles.size(), Vec2(2, 2));
}

#[test]
fn truncated_files_error_cleanly() {
    let bytes = Map::new().write_to_bytes().unwrap();

    for length in 0 .. bytes.len() {
        assert!(Map::read_from_bytes(&bytes[.. length]).is_err());
    }
}

#[test]
fn foreign_files_are_rejected() {
    assert!(matches!(
        Map::read_from_bytes(b"\x89PNG\r\n\x1a\n0000000000000000000000000000"),
        Err(Error::BadMagic(_))
    ));

    // a correct magic with an unsupported container version
    let mut bytes = Map::new().write_to_bytes().unwrap();
    bytes[4] = 3;
    assert!(matches!(
        Map::read_from_bytes(&bytes),
        Err(Error::UnsupportedVersion(3))
    ));
}
