
//! The in-memory map model.
//!
//! A `Map` owns typed collections of images, envelopes, sounds and
//! groups; groups own their layers in drawing order. Items reference
//! each other by index into the owning collection, which is what the
//! file format stores as well (with `-1` meaning no reference).
//! Indices are renumbered by the writer, so they are only stable
//! until the next save.

pub mod tiles;
pub mod read;
pub mod write;

use crate::compress::ByteVec;
use crate::error::{Error, Result, UnitResult};
use crate::format::records::Color;
use crate::format::records::{EnvelopeRecord, GroupRecord, TileLayerRecord};
use crate::format::text::Text;
use crate::map::tiles::{TileGrid, VanillaTiles};
use crate::math::{Bounds, Vec2};


/// A complete map document: metadata, shared resources,
/// and a tree of groups containing layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {

    /// Author, credits, license and server settings.
    pub info: Info,

    /// The tile set and quad images, referenced by layers through their index.
    pub images: Vec<Image>,

    /// The animation envelopes, referenced by layers and quads through their index.
    pub envelopes: Vec<Envelope>,

    /// The sound samples, referenced by sound layers through their index.
    pub sounds: Vec<Sound>,

    /// The layer groups in drawing order, back to front.
    pub groups: Vec<Group>,
}

impl Map {

    /// Create the default document: empty info and a single "Game"
    /// group holding an empty fifty by fifty game layer.
    pub fn new() -> Self {
        let mut game_layer = TileLayer::new(TileGrid::Vanilla(VanillaTiles::new(Vec2(50, 50))));
        game_layer.name = Text::from_slice_unchecked(b"Game");
        game_layer.flag = Some(TileLayerFlag::Game);

        let mut game_group = Group::new();
        game_group.name = Text::from_slice_unchecked(b"Game");
        game_group.layers.push(Layer::Tiles(game_layer));

        Map {
            info: Info::default(),
            images: Vec::new(),
            envelopes: Vec::new(),
            sounds: Vec::new(),
            groups: vec![game_group],
        }
    }

    /// Iterate over all layers of all groups in drawing order.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.groups.iter().flat_map(|group| group.layers.iter())
    }

    /// Find the layer currently carrying the specified gameplay flag.
    /// Returns the group index and the layer index within that group.
    pub fn tile_flag_position(&self, flag: TileLayerFlag) -> Option<(usize, usize)> {
        for (group_index, group) in self.groups.iter().enumerate() {
            for (layer_index, layer) in group.layers.iter().enumerate() {
                if let Layer::Tiles(tile_layer) = layer {
                    if tile_layer.flag == Some(flag) {
                        return Some((group_index, layer_index));
                    }
                }
            }
        }

        None
    }

    /// The tile layer currently carrying the specified gameplay flag.
    pub fn gameplay_layer(&self, flag: TileLayerFlag) -> Option<&TileLayer> {
        let (group_index, layer_index) = self.tile_flag_position(flag)?;

        match &self.groups[group_index].layers[layer_index] {
            Layer::Tiles(tile_layer) => Some(tile_layer),
            _ => None,
        }
    }

    /// The unique layer defining the playable grid, if the map has one.
    /// Every valid map has one.
    pub fn game_layer(&self) -> Option<&TileLayer> {
        self.gameplay_layer(TileLayerFlag::Game)
    }

    /// Move a gameplay flag onto the specified tile layer.
    ///
    /// The flag is cleared from whichever layer held it before, and any
    /// other gameplay flag of the target layer is silently replaced.
    /// Fails if the target is not a tile layer, if its cell layout does
    /// not fit the flag, or if replacing would remove the game flag
    /// (the game flag can only be moved, never dropped).
    pub fn set_tile_flag(&mut self, group_index: usize, layer_index: usize, flag: TileLayerFlag) -> UnitResult {
        {
            let target = self.tile_layer_at(group_index, layer_index)?;

            if !flag.fits_grid(&target.tiles) {
                return Err(Error::invariant("cell layout of the layer does not fit the flag"));
            }

            if target.flag == Some(TileLayerFlag::Game) && flag != TileLayerFlag::Game {
                return Err(Error::invariant("the game flag can only be moved to another layer"));
            }
        }

        if let Some((previous_group, previous_layer)) = self.tile_flag_position(flag) {
            if let Layer::Tiles(tile_layer) = &mut self.groups[previous_group].layers[previous_layer] {
                tile_layer.flag = None;
            }
        }

        self.tile_layer_at_mut(group_index, layer_index)?.flag = Some(flag);
        Ok(())
    }

    /// Remove the gameplay flag from the specified tile layer.
    /// The game flag cannot be cleared, only moved with `set_tile_flag`.
    pub fn clear_tile_flag(&mut self, group_index: usize, layer_index: usize) -> UnitResult {
        let target = self.tile_layer_at_mut(group_index, layer_index)?;

        if target.flag == Some(TileLayerFlag::Game) {
            return Err(Error::invariant("the game flag can only be moved to another layer"));
        }

        target.flag = None;
        Ok(())
    }

    fn tile_layer_at(&self, group_index: usize, layer_index: usize) -> Result<&TileLayer> {
        match self.groups
            .get(group_index).ok_or_else(|| Error::out_of_range("group index"))?
            .layers.get(layer_index).ok_or_else(|| Error::out_of_range("layer index"))?
        {
            Layer::Tiles(tile_layer) => Ok(tile_layer),
            _ => Err(Error::invariant("gameplay flags belong on tile layers")),
        }
    }

    fn tile_layer_at_mut(&mut self, group_index: usize, layer_index: usize) -> Result<&mut TileLayer> {
        match self.groups
            .get_mut(group_index).ok_or_else(|| Error::out_of_range("group index"))?
            .layers.get_mut(layer_index).ok_or_else(|| Error::out_of_range("layer index"))?
        {
            Layer::Tiles(tile_layer) => Ok(tile_layer),
            _ => Err(Error::invariant("gameplay flags belong on tile layers")),
        }
    }

    /// Check every structural invariant of this map.
    /// Reading and writing both require a valid map.
    pub fn validate(&self) -> UnitResult {
        for image in &self.images {
            image.validate()?;
        }

        for envelope in &self.envelopes {
            envelope.validate()?;
        }

        for flag in TileLayerFlag::ALL {
            let mut holders = self.layers().filter_map(|layer| match layer {
                Layer::Tiles(tile_layer) if tile_layer.flag == Some(flag) => Some(tile_layer),
                _ => None,
            });

            let first = holders.next();

            if holders.next().is_some() {
                return Err(Error::invariant("a gameplay flag is carried by more than one layer"));
            }

            if let Some(tile_layer) = first {
                if !flag.fits_grid(&tile_layer.tiles) {
                    return Err(Error::invariant("cell layout of a layer does not fit its gameplay flag"));
                }
            }
            else if flag == TileLayerFlag::Game {
                return Err(Error::invariant("the map has no game layer"));
            }
        }

        for group in &self.groups {
            group.validate(self.images.len(), self.envelopes.len(), self.sounds.len())?;
        }

        Ok(())
    }
}

impl Default for Map {
    fn default() -> Self {
        Map::new()
    }
}


/// Global map metadata. Empty strings are not stored in the file.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct Info {

    /// Who created this map.
    pub author: Text,

    /// Version label of this map, chosen by the author.
    pub version: Text,

    /// Acknowledgements.
    pub credits: Text,

    /// Usage license of this map.
    pub license: Text,

    /// Server configuration commands bundled with the map.
    pub settings: Vec<Text>,
}


/// A tile set or quad image.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Image {

    /// An image shipped with the game client, stored by name only.
    /// The dimensions are advisory, taken from the file.
    External {

        /// Name the client resolves to one of its bundled images.
        name: Text,

        /// Advisory size in pixels.
        size: Vec2<usize>,
    },

    /// An image embedded in the map file as raw RGBA bytes.
    Internal {

        /// Display name of this image.
        name: Text,

        /// Size in pixels.
        size: Vec2<usize>,

        /// Row-major RGBA bytes, four per pixel.
        pixels: ByteVec,
    },
}

impl Image {

    /// The name of this image.
    pub fn name(&self) -> &Text {
        match self {
            Image::External { name, .. } => name,
            Image::Internal { name, .. } => name,
        }
    }

    /// The size of this image in pixels. Advisory for external images.
    pub fn size(&self) -> Vec2<usize> {
        match self {
            Image::External { size, .. } => *size,
            Image::Internal { size, .. } => *size,
        }
    }

    /// Whether the pixel data lives outside the map file.
    pub fn is_external(&self) -> bool {
        matches!(self, Image::External { .. })
    }

    fn validate(&self) -> UnitResult {
        if let Image::Internal { size, pixels, .. } = self {
            let expected_byte_size = size.x()
                .checked_mul(size.y())
                .and_then(|pixel_count| pixel_count.checked_mul(4));

            if Some(pixels.len()) != expected_byte_size {
                return Err(Error::invariant("image pixel data does not match its size"));
            }
        }

        Ok(())
    }
}


/// What an envelope animates, which also fixes
/// how many of each point's values are meaningful.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum EnvelopeChannels {

    /// A single volume value.
    Volume,

    /// Two position offsets and a rotation.
    Position,

    /// Four color components.
    Color,
}

impl EnvelopeChannels {

    /// The channel count stored in the file.
    pub fn count(self) -> i32 {
        match self {
            EnvelopeChannels::Volume => 1,
            EnvelopeChannels::Position => 3,
            EnvelopeChannels::Color => 4,
        }
    }

    /// Look up the variant for a stored channel count.
    pub fn from_count(count: i32) -> Option<Self> {
        Some(match count {
            1 => EnvelopeChannels::Volume,
            3 => EnvelopeChannels::Position,
            4 => EnvelopeChannels::Color,
            _ => return None,
        })
    }
}


/// How an envelope interpolates between two neighbouring points.
/// A thin wrapper over the stored id so that unknown curves
/// survive a round-trip unchanged.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct CurveKind(pub i32);

impl CurveKind {

    /// Hold the previous value until the next point.
    pub const STEP: CurveKind = CurveKind(0);

    /// Interpolate linearly.
    pub const LINEAR: CurveKind = CurveKind(1);

    /// Ease in.
    pub const SLOW: CurveKind = CurveKind(2);

    /// Ease out.
    pub const FAST: CurveKind = CurveKind(3);

    /// Ease in and out.
    pub const SMOOTH: CurveKind = CurveKind(4);

    /// Bezier interpolation. The control points of newer format
    /// revisions are not decoded by this crate.
    pub const BEZIER: CurveKind = CurveKind(5);
}


/// One point of an envelope.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct EnvPoint {

    /// Point in time this point is anchored at, in milliseconds.
    pub time: i32,

    /// How to interpolate between this point and the next.
    pub curve: CurveKind,

    /// The animated values. Only the envelope's channel count is meaningful.
    pub values: [i32; 4],
}


/// An animation envelope: a named curve over a fixed set of channels.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Envelope {

    /// Display name of this envelope.
    pub name: Text,

    /// What this envelope animates.
    pub channels: EnvelopeChannels,

    /// Whether the envelope time is synchronized with the server clock
    /// instead of each client's local time.
    pub synchronized: bool,

    /// The points of this envelope in chronological order.
    pub points: Vec<EnvPoint>,
}

impl Envelope {
    fn validate(&self) -> UnitResult {
        if !self.name.fits_int_encoded(EnvelopeRecord::NAME_WORDS) {
            return Err(Error::invariant("envelope name is too long"));
        }

        Ok(())
    }
}


/// A sound sample.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Sound {

    /// A sample resolved by name outside the map file.
    External {

        /// Name the client resolves to a sample.
        name: Text,
    },

    /// A sample embedded in the map file.
    Internal {

        /// Display name of this sample.
        name: Text,

        /// The opus-encoded sample bytes, carried opaquely.
        data: ByteVec,
    },
}

impl Sound {

    /// The name of this sample.
    pub fn name(&self) -> &Text {
        match self {
            Sound::External { name } => name,
            Sound::Internal { name, .. } => name,
        }
    }
}


/// A group of layers sharing offset, parallax and clipping.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {

    /// World-space offset applied to all layers of this group.
    pub offset: Vec2<i32>,

    /// Parallax factors in percent. 100 scrolls with the camera;
    /// the group holding the game layer stays at 100.
    pub parallax: Vec2<i32>,

    /// Whether rendering of this group is clipped to `clip`.
    pub clipping: bool,

    /// The clip rectangle, in world coordinates.
    pub clip: Bounds,

    /// Display name of this group.
    pub name: Text,

    /// The layers of this group in drawing order, back to front.
    pub layers: Vec<Layer>,
}

impl Group {

    /// Create an empty group with neutral parallax and no clipping.
    pub fn new() -> Self {
        Group {
            offset: Vec2(0, 0),
            parallax: Vec2(100, 100),
            clipping: false,
            clip: Bounds::default(),
            name: Text::default(),
            layers: Vec::new(),
        }
    }

    fn validate(&self, image_count: usize, envelope_count: usize, sound_count: usize) -> UnitResult {
        if !self.name.fits_int_encoded(GroupRecord::NAME_WORDS) {
            return Err(Error::invariant("group name is too long"));
        }

        for layer in &self.layers {
            layer.validate(image_count, envelope_count, sound_count)?;
        }

        Ok(())
    }
}

impl Default for Group {
    fn default() -> Self {
        Group::new()
    }
}


/// A single layer of a group.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {

    /// A grid of tiles.
    Tiles(TileLayer),

    /// A list of freely transformable textured rectangles.
    Quads(QuadLayer),

    /// A list of positioned sound sources.
    Sounds(SoundLayer),
}

impl Layer {

    /// The display name of this layer.
    pub fn name(&self) -> &Text {
        match self {
            Layer::Tiles(layer) => &layer.name,
            Layer::Quads(layer) => &layer.name,
            Layer::Sounds(layer) => &layer.name,
        }
    }

    /// Whether low-detail clients may skip this layer.
    pub fn is_detail(&self) -> bool {
        match self {
            Layer::Tiles(layer) => layer.detail,
            Layer::Quads(layer) => layer.detail,
            Layer::Sounds(layer) => layer.detail,
        }
    }

    /// This layer as a tile layer, if it is one.
    pub fn as_tiles(&self) -> Option<&TileLayer> {
        match self {
            Layer::Tiles(layer) => Some(layer),
            _ => None,
        }
    }

    /// This layer as a mutable tile layer, if it is one.
    pub fn as_tiles_mut(&mut self) -> Option<&mut TileLayer> {
        match self {
            Layer::Tiles(layer) => Some(layer),
            _ => None,
        }
    }

    fn validate(&self, image_count: usize, envelope_count: usize, sound_count: usize) -> UnitResult {
        let check_reference = |reference: Option<usize>, count: usize, name: &'static str| {
            match reference {
                Some(index) if index >= count => Err(Error::out_of_range(name)),
                _ => Ok(()),
            }
        };

        if !self.name().fits_int_encoded(TileLayerRecord::NAME_WORDS) {
            return Err(Error::invariant("layer name is too long"));
        }

        match self {
            Layer::Tiles(layer) => {
                check_reference(layer.image, image_count, "image reference")?;
                check_reference(layer.color_envelope, envelope_count, "color envelope reference")?;

                if !layer.color.is_valid() {
                    return Err(Error::invariant("layer color component out of range"));
                }
            }

            Layer::Quads(layer) => {
                check_reference(layer.image, image_count, "image reference")?;

                for quad in &layer.quads {
                    check_reference(quad.position_envelope, envelope_count, "position envelope reference")?;
                    check_reference(quad.color_envelope, envelope_count, "color envelope reference")?;

                    if quad.corner_colors.iter().any(|color| !color.is_valid()) {
                        return Err(Error::invariant("quad color component out of range"));
                    }
                }
            }

            Layer::Sounds(layer) => {
                check_reference(layer.sound, sound_count, "sound reference")?;
            }
        }

        Ok(())
    }
}


/// The gameplay role a tile layer can take.
/// Each role exists at most once per map; the game role is required.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TileLayerFlag {

    /// The layer defining the playable grid. Vanilla cells.
    Game,

    /// The teleporter layer. Tele cells.
    Tele,

    /// The speedup layer. Speedup cells.
    Speedup,

    /// The front decoration layer of the game grid. Vanilla cells.
    Front,

    /// The switch layer. Switch cells.
    Switch,

    /// The tuning zone layer. Tune cells.
    Tune,
}

impl TileLayerFlag {

    /// All gameplay roles, in the order of their flag bits.
    pub const ALL: [TileLayerFlag; 6] = [
        TileLayerFlag::Game,
        TileLayerFlag::Tele,
        TileLayerFlag::Speedup,
        TileLayerFlag::Front,
        TileLayerFlag::Switch,
        TileLayerFlag::Tune,
    ];

    /// Position of this flag inside the stored flag bitset.
    pub fn bit(self) -> usize {
        match self {
            TileLayerFlag::Game => 0,
            TileLayerFlag::Tele => 1,
            TileLayerFlag::Speedup => 2,
            TileLayerFlag::Front => 3,
            TileLayerFlag::Switch => 4,
            TileLayerFlag::Tune => 5,
        }
    }

    /// Whether a grid with this cell layout can carry this flag.
    pub fn fits_grid(self, grid: &TileGrid) -> bool {
        match self {
            TileLayerFlag::Game | TileLayerFlag::Front => matches!(grid, TileGrid::Vanilla(_)),
            TileLayerFlag::Tele => matches!(grid, TileGrid::Tele(_)),
            TileLayerFlag::Speedup => matches!(grid, TileGrid::Speedup(_)),
            TileLayerFlag::Switch => matches!(grid, TileGrid::Switch(_)),
            TileLayerFlag::Tune => matches!(grid, TileGrid::Tune(_)),
        }
    }
}


/// A grid of tiles, possibly carrying one gameplay role.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {

    /// Whether low-detail clients may skip this layer.
    pub detail: bool,

    /// Display name of this layer.
    pub name: Text,

    /// Tint color applied to the whole layer.
    pub color: Color,

    /// Envelope animating the tint color.
    pub color_envelope: Option<usize>,

    /// Time offset into the color envelope, in milliseconds.
    pub color_envelope_offset: i32,

    /// The tile set image this layer draws from.
    pub image: Option<usize>,

    /// The cell storage of this layer.
    pub tiles: TileGrid,

    // mutated through the owning map to keep roles exclusive
    flag: Option<TileLayerFlag>,
}

impl TileLayer {

    /// Create an unnamed design layer owning the specified grid.
    pub fn new(tiles: TileGrid) -> Self {
        TileLayer {
            detail: false,
            name: Text::default(),
            color: Color::white(),
            color_envelope: None,
            color_envelope_offset: 0,
            image: None,
            tiles,
            flag: None,
        }
    }

    /// The gameplay role of this layer, if it has one.
    pub fn tile_flag(&self) -> Option<TileLayerFlag> {
        self.flag
    }

    /// Whether this layer defines the playable grid.
    pub fn is_game(&self) -> bool {
        self.flag == Some(TileLayerFlag::Game)
    }
}


/// One textured rectangle of a quad layer.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Quad {

    /// The four corners, in world coordinates.
    pub corners: [Vec2<i32>; 4],

    /// The point this quad rotates around.
    pub pivot: Vec2<i32>,

    /// The color at each corner.
    pub corner_colors: [Color; 4],

    /// The texture coordinate at each corner.
    pub texture_coords: [Vec2<i32>; 4],

    /// Envelope animating the position.
    pub position_envelope: Option<usize>,

    /// Time offset into the position envelope, in milliseconds.
    pub position_envelope_offset: i32,

    /// Envelope animating the color.
    pub color_envelope: Option<usize>,

    /// Time offset into the color envelope, in milliseconds.
    pub color_envelope_offset: i32,
}


/// A list of freely transformable textured rectangles.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadLayer {

    /// Whether low-detail clients may skip this layer.
    pub detail: bool,

    /// Display name of this layer.
    pub name: Text,

    /// The image this layer textures its quads with.
    pub image: Option<usize>,

    /// The quads of this layer in drawing order.
    pub quads: Vec<Quad>,
}

impl QuadLayer {

    /// Create an unnamed empty quad layer.
    pub fn new() -> Self {
        QuadLayer {
            detail: false,
            name: Text::default(),
            image: None,
            quads: Vec::new(),
        }
    }
}

impl Default for QuadLayer {
    fn default() -> Self {
        QuadLayer::new()
    }
}


/// A list of positioned sound sources.
/// The source records are carried opaquely so that they
/// survive a round-trip without being interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundLayer {

    /// Whether low-detail clients may skip this layer.
    pub detail: bool,

    /// Display name of this layer.
    pub name: Text,

    /// The sample this layer plays.
    pub sound: Option<usize>,

    /// Number of sources declared in the file.
    pub source_count: i32,

    /// The raw source records, exactly as stored in the data pool.
    pub sources: ByteVec,

    /// Whether this layer was stored under the deprecated layer kind,
    /// which is preserved when writing.
    pub deprecated: bool,
}


#[cfg(test)]
mod test {
    use super::*;

    fn vanilla_layer() -> TileLayer {
        TileLayer::new(TileGrid::Vanilla(VanillaTiles::new(Vec2(10, 10))))
    }

    #[test]
    fn default_document_is_valid() {
        let map = Map::new();

        map.validate().unwrap();
        assert!(map.game_layer().is_some());
        assert_eq!(map.game_layer().unwrap().name, Text::from("Game").unwrap());
    }

    #[test]
    fn setting_the_game_flag_transfers_it() {
        let mut map = Map::new();
        map.groups[0].layers.push(Layer::Tiles(vanilla_layer()));

        assert_eq!(map.tile_flag_position(TileLayerFlag::Game), Some((0, 0)));

        map.set_tile_flag(0, 1, TileLayerFlag::Game).unwrap();

        assert_eq!(map.tile_flag_position(TileLayerFlag::Game), Some((0, 1)));
        assert!(!map.groups[0].layers[0].as_tiles().unwrap().is_game());
        assert!(map.groups[0].layers[1].as_tiles().unwrap().is_game());

        map.validate().unwrap();
    }

    #[test]
    fn the_game_flag_cannot_be_cleared() {
        let mut map = Map::new();

        assert!(map.clear_tile_flag(0, 0).is_err());
        assert!(map.set_tile_flag(0, 0, TileLayerFlag::Front).is_err());
        assert!(map.game_layer().is_some());
    }

    #[test]
    fn flags_require_a_matching_grid() {
        let mut map = Map::new();
        map.groups[0].layers.push(Layer::Tiles(vanilla_layer()));

        assert!(map.set_tile_flag(0, 1, TileLayerFlag::Tele).is_err());
        assert!(map.set_tile_flag(0, 1, TileLayerFlag::Front).is_ok());

        let tele = TileLayer::new(TileGrid::Tele(tiles::TeleTiles::new(Vec2(10, 10))));
        map.groups[0].layers.push(Layer::Tiles(tele));
        assert!(map.set_tile_flag(0, 2, TileLayerFlag::Tele).is_ok());

        map.validate().unwrap();
    }

    #[test]
    fn replacing_a_non_game_flag_is_silent() {
        let mut map = Map::new();

        let switch = TileLayer::new(TileGrid::Switch(tiles::SwitchTiles::new(Vec2(10, 10))));
        map.groups[0].layers.push(Layer::Tiles(switch));
        map.set_tile_flag(0, 1, TileLayerFlag::Switch).unwrap();

        // moving the flag to another layer clears the first holder
        let other = TileLayer::new(TileGrid::Switch(tiles::SwitchTiles::new(Vec2(5, 5))));
        map.groups[0].layers.push(Layer::Tiles(other));
        map.set_tile_flag(0, 2, TileLayerFlag::Switch).unwrap();

        assert_eq!(map.tile_flag_position(TileLayerFlag::Switch), Some((0, 2)));
        assert_eq!(map.groups[0].layers[1].as_tiles().unwrap().tile_flag(), None);
    }

    #[test]
    fn dangling_references_are_rejected() {
        let mut map = Map::new();

        let mut layer = vanilla_layer();
        layer.image = Some(0);
        map.groups[0].layers.push(Layer::Tiles(layer));

        assert!(map.validate().is_err());

        map.images.push(Image::External {
            name: Text::from("grass_main").unwrap(),
            size: Vec2(1024, 1024),
        });

        map.validate().unwrap();
    }

    #[test]
    fn duplicate_gameplay_flags_are_rejected() {
        let mut map = Map::new();

        let mut second = vanilla_layer();
        second.flag = Some(TileLayerFlag::Game);
        map.groups[0].layers.push(Layer::Tiles(second));

        assert!(map.validate().is_err());
    }
}
