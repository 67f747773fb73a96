
//! Tile grid storage.
//!
//! A tile layer owns a rectangular grid of fixed-size cells.
//! The gameplay variant of the layer decides the cell layout;
//! the codec treats every variant as an opaque byte grid with
//! a few typed field accessors on top.

use bit_field::BitField;

use crate::compress::ByteVec;
use crate::error::{Error, Result, UnitResult};
use crate::math::Vec2;


/// Render flags of a single vanilla cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TileFlag {

    /// The tile is drawn mirrored along the vertical axis.
    FlipVertical,

    /// The tile is drawn mirrored along the horizontal axis.
    FlipHorizontal,

    /// The tile fully covers its cell, allowing draw-order optimizations.
    Opaque,

    /// The tile is drawn rotated by ninety degrees.
    Rotate,
}

impl TileFlag {

    /// Position of this flag inside the cell's flag byte.
    pub fn bit(self) -> usize {
        match self {
            TileFlag::FlipVertical => 0,
            TileFlag::FlipHorizontal => 1,
            TileFlag::Opaque => 2,
            TileFlag::Rotate => 3,
        }
    }
}


/// Rectangular byte buffer with a fixed per-cell stride.
#[derive(Debug, Clone, Eq, PartialEq)]
struct CellBuffer {
    size: Vec2<usize>,
    cell_byte_size: usize,
    bytes: ByteVec,
}

impl CellBuffer {
    fn new(size: Vec2<usize>, cell_byte_size: usize) -> Self {
        CellBuffer { size, cell_byte_size, bytes: vec![0; size.area() * cell_byte_size] }
    }

    fn from_bytes(size: Vec2<usize>, cell_byte_size: usize, bytes: ByteVec) -> Result<Self> {
        // checked, so that a forged size cannot overflow the length computation
        let expected_byte_size = size.x()
            .checked_mul(size.y())
            .and_then(|cell_count| cell_count.checked_mul(cell_byte_size))
            .ok_or_else(|| Error::out_of_range("tile grid size"))?;

        if bytes.len() != expected_byte_size {
            return Err(Error::invariant("tile data length does not match the layer size"));
        }

        Ok(CellBuffer { size, cell_byte_size, bytes })
    }

    fn field(&self, position: Vec2<usize>, byte: usize) -> Result<u8> {
        Ok(self.bytes[self.field_index(position, byte)?])
    }

    fn set_field(&mut self, position: Vec2<usize>, byte: usize, value: u8) -> UnitResult {
        let index = self.field_index(position, byte)?;
        self.bytes[index] = value;
        Ok(())
    }

    fn field_index(&self, position: Vec2<usize>, byte: usize) -> Result<usize> {
        debug_assert!(byte < self.cell_byte_size, "cell field byte bug");

        if position.x() >= self.size.x() || position.y() >= self.size.y() {
            return Err(Error::out_of_range("tile coordinate"));
        }

        Ok((position.y() * self.size.x() + position.x()) * self.cell_byte_size + byte)
    }
}


/// The cell grid of plain design layers and of the game and front
/// layers: a tile id selecting into the tile set, and render flags.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VanillaTiles {
    cells: CellBuffer,
}

impl VanillaTiles {

    /// Number of bytes a single cell occupies.
    pub const CELL_BYTE_SIZE: usize = 4;

    /// Create a grid of the specified size with all cells empty.
    pub fn new(size: Vec2<usize>) -> Self {
        VanillaTiles { cells: CellBuffer::new(size, Self::CELL_BYTE_SIZE) }
    }

    /// Wrap a decompressed data blob,
    /// validating its length against the grid size.
    pub fn from_bytes(size: Vec2<usize>, bytes: ByteVec) -> Result<Self> {
        Ok(VanillaTiles { cells: CellBuffer::from_bytes(size, Self::CELL_BYTE_SIZE, bytes)? })
    }

    /// The tile id of the specified cell.
    pub fn id(&self, position: Vec2<usize>) -> Result<u8> {
        self.cells.field(position, 0)
    }

    /// Overwrite the tile id of the specified cell.
    pub fn set_id(&mut self, position: Vec2<usize>, id: u8) -> UnitResult {
        self.cells.set_field(position, 0, id)
    }

    /// Whether the specified cell has the specified render flag set.
    pub fn has_flag(&self, position: Vec2<usize>, flag: TileFlag) -> Result<bool> {
        Ok(self.cells.field(position, 1)?.get_bit(flag.bit()))
    }

    /// Set or clear a render flag of the specified cell.
    pub fn set_flag(&mut self, position: Vec2<usize>, flag: TileFlag, value: bool) -> UnitResult {
        let mut flags = self.cells.field(position, 1)?;
        flags.set_bit(flag.bit(), value);
        self.cells.set_field(position, 1, flags)
    }
}


macro_rules! implement_gameplay_tiles {
    ($(#[$documentation: meta])* $name: ident, $cell_byte_size: expr) => {
        $(#[$documentation])*
        #[derive(Debug, Clone, Eq, PartialEq)]
        pub struct $name {
            cells: CellBuffer,
        }

        impl $name {

            /// Number of bytes a single cell occupies.
            pub const CELL_BYTE_SIZE: usize = $cell_byte_size;

            /// Create a grid of the specified size with all cells empty.
            pub fn new(size: Vec2<usize>) -> Self {
                $name { cells: CellBuffer::new(size, Self::CELL_BYTE_SIZE) }
            }

            /// Wrap a decompressed data blob,
            /// validating its length against the grid size.
            pub fn from_bytes(size: Vec2<usize>, bytes: ByteVec) -> Result<Self> {
                Ok($name { cells: CellBuffer::from_bytes(size, Self::CELL_BYTE_SIZE, bytes)? })
            }

            /// The tile id of the specified cell.
            pub fn id(&self, position: Vec2<usize>) -> Result<u8> {
                self.cells.field(position, 1)
            }

            /// Overwrite the tile id of the specified cell.
            pub fn set_id(&mut self, position: Vec2<usize>, id: u8) -> UnitResult {
                self.cells.set_field(position, 1, id)
            }
        }
    };
}

implement_gameplay_tiles! {
    /// The cell grid of the tele layer: a teleporter number and a tile id.
    TeleTiles, 2
}

implement_gameplay_tiles! {
    /// The cell grid of the speedup layer: force, maximum speed,
    /// tile id and boost angle.
    SpeedupTiles, 6
}

implement_gameplay_tiles! {
    /// The cell grid of the switch layer: switch number, tile id,
    /// render flags and delay.
    SwitchTiles, 4
}

implement_gameplay_tiles! {
    /// The cell grid of the tune layer: a tuning zone number and a tile id.
    TuneTiles, 2
}


/// The cell storage of a tile layer.
/// One record layout on disk maps to one of these representations,
/// selected by the gameplay flag of the layer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TileGrid {

    /// Vanilla cells, used by plain design layers
    /// as well as the game and front layers.
    Vanilla(VanillaTiles),

    /// Tele cells of the tele layer.
    Tele(TeleTiles),

    /// Speedup cells of the speedup layer.
    Speedup(SpeedupTiles),

    /// Switch cells of the switch layer.
    Switch(SwitchTiles),

    /// Tune cells of the tune layer.
    Tune(TuneTiles),
}

impl TileGrid {

    fn cells(&self) -> &CellBuffer {
        match self {
            TileGrid::Vanilla(tiles) => &tiles.cells,
            TileGrid::Tele(tiles) => &tiles.cells,
            TileGrid::Speedup(tiles) => &tiles.cells,
            TileGrid::Switch(tiles) => &tiles.cells,
            TileGrid::Tune(tiles) => &tiles.cells,
        }
    }

    /// Size of this grid in cells.
    pub fn size(&self) -> Vec2<usize> {
        self.cells().size
    }

    /// Number of bytes a single cell of this grid occupies.
    pub fn cell_byte_size(&self) -> usize {
        self.cells().cell_byte_size
    }

    /// The raw cell bytes, exactly as stored in the data pool.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.cells().bytes
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn vanilla_ids_and_flags() {
        let mut tiles = VanillaTiles::new(Vec2(4, 3));

        tiles.set_id(Vec2(2, 1), 7).unwrap();
        tiles.set_flag(Vec2(2, 1), TileFlag::Rotate, true).unwrap();

        assert_eq!(tiles.id(Vec2(2, 1)).unwrap(), 7);
        assert!(tiles.has_flag(Vec2(2, 1), TileFlag::Rotate).unwrap());
        assert!(!tiles.has_flag(Vec2(2, 1), TileFlag::Opaque).unwrap());
        assert_eq!(tiles.id(Vec2(0, 0)).unwrap(), 0);

        // id at byte 0, flags at byte 1
        let grid = TileGrid::Vanilla(tiles);
        assert_eq!(grid.raw_bytes()[(1 * 4 + 2) * 4], 7);
        assert_eq!(grid.raw_bytes()[(1 * 4 + 2) * 4 + 1], 1 << 3);
    }

    #[test]
    fn coordinates_are_bounded() {
        let tiles = VanillaTiles::new(Vec2(4, 3));

        assert!(tiles.id(Vec2(3, 2)).is_ok());
        assert!(matches!(tiles.id(Vec2(4, 2)), Err(Error::OutOfRange(_))));
        assert!(matches!(tiles.id(Vec2(0, 3)), Err(Error::OutOfRange(_))));
    }

    #[test]
    fn blob_length_must_match() {
        assert!(TeleTiles::from_bytes(Vec2(10, 10), vec![0; 200]).is_ok());
        assert!(TeleTiles::from_bytes(Vec2(10, 10), vec![0; 199]).is_err());
        assert!(SpeedupTiles::from_bytes(Vec2(2, 2), vec![0; 24]).is_ok());
    }

    #[test]
    fn variant_strides() {
        assert_eq!(TileGrid::Vanilla(VanillaTiles::new(Vec2(1, 1))).cell_byte_size(), 4);
        assert_eq!(TileGrid::Tele(TeleTiles::new(Vec2(1, 1))).cell_byte_size(), 2);
        assert_eq!(TileGrid::Speedup(SpeedupTiles::new(Vec2(1, 1))).cell_byte_size(), 6);
        assert_eq!(TileGrid::Switch(SwitchTiles::new(Vec2(1, 1))).cell_byte_size(), 4);
        assert_eq!(TileGrid::Tune(TuneTiles::new(Vec2(1, 1))).cell_byte_size(), 2);
    }

    #[test]
    fn gameplay_ids_live_at_byte_one() {
        let mut tiles = SwitchTiles::new(Vec2(2, 2));
        tiles.set_id(Vec2(1, 0), 24).unwrap();

        assert_eq!(tiles.id(Vec2(1, 0)).unwrap(), 24);

        let grid = TileGrid::Switch(tiles);
        assert_eq!(grid.raw_bytes()[1 * 4 + 1], 24);
    }
}
