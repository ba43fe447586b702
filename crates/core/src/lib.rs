//! Biomap is a tile-based world generator for a 2D biome map. This crate
//! contains all the core generation logic. Rendering and editing UIs are
//! implemented elsewhere, and talk to this crate through [World] and
//! [WorldConfig].
//!
//! A world is a rectangular grid of tiles, split into nine regions. Each
//! region can have landmasses stamped into it, with biomes picked from
//! weighted rules. Once all the land is placed, leftover water is classified
//! as either ocean or lake.
//!
//! ```
//! use biomap::{World, WorldConfig};
//!
//! let config = WorldConfig::default();
//! let world = World::generate(config).unwrap();
//! println!("{}", world.terrain_map().len());
//! // From here you can display/use the world however you like.
//! ```
//!
//! Generation is deterministic: the same config (including seed) always
//! produces the same tiles. See [WorldConfig] for details on how the world
//! generation can be customized.

mod config;
mod error;
mod util;
mod world;

pub use crate::{
    config::{
        parse_document, BiomeRule, BiomeRules, BiomeWeights, GenerationConfig,
        LandmassRule, LandmassSize, RegionMap, RegionRule, SeedId, Settings,
        SizedRule, WorldConfig,
    },
    error::{WorldError, WorldResult},
    util::range::NumRange,
    world::{
        chunk::{Chunk, ChunkBounds},
        grid::{Grid, GridPoint},
        region::{Region, RegionBounds},
        tile::{tag, BlobId, BlobMeta, TagSet, Tile},
        Biome, BiomeType, BlobType, World,
    },
};
// Re-exported so that consumers can inspect validation errors
pub use validator;
