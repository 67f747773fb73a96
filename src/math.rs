
//! Simple vector and rectangle types used throughout the map model.

use crate::error::{Result, UnitResult};
use crate::io::{Data, SliceRead, Write};


/// Simple two-dimensional vector of any numerical type.
/// Supports only the two operations the map model needs.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Vec2<T>(pub T, pub T);

impl<T: Copy> Vec2<T> {

    /// The horizontal component of this vector.
    pub fn x(self) -> T {
        self.0
    }

    /// The vertical component of this vector.
    pub fn y(self) -> T {
        self.1
    }
}

impl Vec2<usize> {

    /// The number of cells in a grid of this size.
    pub fn area(self) -> usize {
        self.0 * self.1
    }
}

impl Data for Vec2<i32> {
    const BYTE_SIZE: usize = 2 * i32::BYTE_SIZE;

    fn read(read: &mut SliceRead<'_>) -> Result<Self> {
        Ok(Vec2(i32::read(read)?, i32::read(read)?))
    }

    fn read_slice(read: &mut SliceRead<'_>, slice: &mut [Self]) -> UnitResult {
        for vector in slice {
            *vector = Self::read(read)?;
        }

        Ok(())
    }

    fn write(self, write: &mut impl Write) -> UnitResult {
        self.0.write(write)?;
        self.1.write(write)
    }

    fn write_slice(write: &mut impl Write, slice: &[Self]) -> UnitResult {
        for vector in slice {
            vector.write(write)?;
        }

        Ok(())
    }
}


/// An axis-aligned integer rectangle, described by its
/// top left corner and its size. Used for group clipping.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Bounds {

    /// The top left corner of this rectangle.
    pub position: Vec2<i32>,

    /// The extent of this rectangle. May be zero.
    pub size: Vec2<i32>,
}

impl Data for Bounds {
    const BYTE_SIZE: usize = 2 * <Vec2<i32> as Data>::BYTE_SIZE;

    fn read(read: &mut SliceRead<'_>) -> Result<Self> {
        Ok(Bounds {
            position: Vec2::read(read)?,
            size: Vec2::read(read)?,
        })
    }

    fn read_slice(read: &mut SliceRead<'_>, slice: &mut [Self]) -> UnitResult {
        for bounds in slice {
            *bounds = Self::read(read)?;
        }

        Ok(())
    }

    fn write(self, write: &mut impl Write) -> UnitResult {
        self.position.write(write)?;
        self.size.write(write)
    }

    fn write_slice(write: &mut impl Write, slice: &[Self]) -> UnitResult {
        for bounds in slice {
            bounds.write(write)?;
        }

        Ok(())
    }
}
