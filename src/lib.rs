
//! Read and write Teeworlds and DDNet map files.
//! This library uses no foreign code or unsafe Rust.
//!
//! A map file is a generic item container with a zlib-compressed
//! data pool; this crate translates between that container and a
//! typed in-memory model of groups, layers, images, envelopes and
//! sounds.
//!
//! ```
//! use twmap::prelude::*;
//!
//! let map = Map::new(); // an empty map with its mandatory game layer
//!
//! let bytes = map.write_to_bytes().unwrap();
//! let reloaded = Map::read_from_bytes(&bytes).unwrap();
//!
//! assert_eq!(map, reloaded);
//! ```

#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused_extern_crates,
    unused,

    missing_copy_implementations,
    missing_debug_implementations,

    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
)]

#![deny(
    unused_variables,
    unused_assignments,
    dead_code,
    unused_must_use,
    missing_copy_implementations,
    trivial_numeric_casts,
    redundant_semicolons
)]

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod io; // public to allow for custom record parsing

pub mod error;
pub mod math;
pub mod compress;
pub mod format;
pub mod map;


/// Re-exports of all types commonly required
/// for simple reading and writing of a map.
pub mod prelude {

    // main exports
    pub use crate::map::{Map, Group, Layer, TileLayer, QuadLayer, SoundLayer, Quad};
    pub use crate::map::{Image, Info, Sound, Envelope, EnvPoint, EnvelopeChannels, CurveKind};
    pub use crate::map::TileLayerFlag;
    pub use crate::map::tiles::{
        TileGrid, TileFlag,
        VanillaTiles, TeleTiles, SpeedupTiles, SwitchTiles, TuneTiles,
    };

    // secondary data types
    pub use crate::format::records::Color;
    pub use crate::format::text::Text;
    pub use crate::math::{Bounds, Vec2};
    pub use crate::error::{Error, Result, UnitResult};
}
