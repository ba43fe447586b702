pub mod chunk;
mod generate;
pub mod grid;
pub mod region;
pub mod tile;

use crate::{
    config::{RegionMap, SeedId},
    error::{WorldError, WorldResult},
    timed,
    world::{
        chunk::Chunk,
        generate::WorldBuilder,
        grid::{Grid, GridPoint},
        region::Region,
        tile::Tile,
    },
    WorldConfig,
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::info;
use serde::{Deserialize, Serialize};
use std::io::Read;
use strum::{Display, EnumIter, EnumString};
use validator::Validate;

/// A fully generated world. Contains the authoritative grid of tiles, plus two
/// projections of it (biome only and elevation only) for consumers that
/// don't want to walk full tile objects. The projections are always kept in
/// sync with the tile grid.
///
/// ## Serialization
/// Worlds serialize to the JSON document that the browser app saves and
/// loads, with these fields:
/// - `seedID` - the world's [SeedId]
/// - `generatedAt` - RFC 3339 timestamp of generation
/// - `tags` - world-level tags
/// - `terrainMap` - the full tile grid, as an array of rows
/// - `biomeMap` - biome name per cell, as an array of rows
/// - `heightMap` - elevation per cell, as an array of rows
/// - `meta` - the region map used to generate the world
///
/// Serializing then deserializing a world gives back an identical world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
    #[serde(rename = "seedID")]
    seed_id: SeedId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    generated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    tags: Vec<String>,

    terrain_map: Grid<Tile>,
    biome_map: Grid<Biome>,
    height_map: Grid<f64>,

    /// The region configuration that this world was generated from
    meta: RegionMap,
}

impl World {
    /// Generate a new world with the given config. Returns an error if the
    /// config is invalid, in which case nothing is generated. Landmasses that
    /// can't be placed are skipped (with a warning in the logs), so the
    /// generated world may have fewer than the config asks for.
    pub fn generate(config: WorldConfig) -> WorldResult<Self> {
        info!("Generating world {}", config.seed);
        config.validate()?;

        let terrain_map = timed!(
            "World generation",
            log::Level::Info,
            WorldBuilder::new(&config).generate_world()
        )?;

        Ok(Self::from_terrain(
            config.seed,
            Some(Utc::now()),
            terrain_map,
            config.regions,
        ))
    }

    /// Build a world around a finished tile grid, deriving the projections
    fn from_terrain(
        seed_id: SeedId,
        generated_at: Option<DateTime<Utc>>,
        terrain_map: Grid<Tile>,
        meta: RegionMap,
    ) -> Self {
        Self {
            seed_id,
            generated_at,
            tags: Vec::new(),
            biome_map: terrain_map.map(Tile::biome),
            height_map: terrain_map.map(Tile::elevation),
            terrain_map,
            meta,
        }
    }

    /// Deserialize a world from JSON. Fails if the input is malformed, is
    /// missing any required fields, or is internally inconsistent (e.g. the
    /// biome map doesn't match the tiles).
    pub fn from_json(json: &str) -> WorldResult<Self> {
        let world: Self =
            serde_json::from_str(json).map_err(WorldError::world_load)?;
        world.check_consistency()?;
        Ok(world)
    }

    /// Same as [World::from_json], but reads from a stream.
    pub fn from_reader(reader: impl Read) -> WorldResult<Self> {
        let world: Self =
            serde_json::from_reader(reader).map_err(WorldError::world_load)?;
        world.check_consistency()?;
        Ok(world)
    }

    /// Serialize this world into JSON. This is a recoverable format, which can
    /// be loaded back into a [World] with [World::from_json].
    pub fn to_json(&self) -> String {
        // Panic here indicates an internal bug in the data format
        serde_json::to_string(self).expect("error serializing world")
    }

    /// Same as [World::to_json], but indented for humans
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).expect("error serializing world")
    }

    pub fn seed_id(&self) -> &SeedId {
        &self.seed_id
    }

    /// When the world was generated. Only missing for worlds loaded from
    /// documents that didn't record it.
    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        self.generated_at
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn width(&self) -> u32 {
        self.terrain_map.width()
    }

    pub fn height(&self) -> u32 {
        self.terrain_map.height()
    }

    /// The authoritative grid of tiles
    pub fn terrain_map(&self) -> &Grid<Tile> {
        &self.terrain_map
    }

    /// Biome of every tile
    pub fn biome_map(&self) -> &Grid<Biome> {
        &self.biome_map
    }

    /// Elevation of every tile
    pub fn height_map(&self) -> &Grid<f64> {
        &self.height_map
    }

    /// The region map this world was generated from
    pub fn meta(&self) -> &RegionMap {
        &self.meta
    }

    pub fn tile(&self, point: GridPoint) -> Option<&Tile> {
        self.terrain_map.get(point)
    }

    /// Manually override the biome of a single tile. This is an editing tool,
    /// so unlike generation it can change any tile to any biome. The biome
    /// map is updated to match.
    ///
    /// Tags are left untouched. An edit can leave a water tile without the
    /// matching `ocean` or `lake` tag, or a land tile without `land`. Loading
    /// doesn't check tags, so such a world still round-trips through JSON.
    pub fn set_biome(
        &mut self,
        point: GridPoint,
        biome: Biome,
    ) -> WorldResult<()> {
        let tile = self
            .terrain_map
            .get_mut(point)
            .ok_or(WorldError::OutOfBounds(point))?;
        tile.set_biome(biome);
        self.biome_map[point] = biome;
        info!("Biome set to {} at {}", biome, point);
        Ok(())
    }

    /// Split the world into square chunks for rendering. See [chunk::chunks].
    pub fn chunks(&self, chunk_size: u32) -> Vec<Chunk> {
        chunk::chunks(&self.terrain_map, chunk_size)
    }

    /// Count the tiles of each biome, in order of first appearance
    pub fn biome_counts(&self) -> IndexMap<Biome, usize> {
        let mut counts = IndexMap::new();
        for biome in self.biome_map.values() {
            *counts.entry(*biome).or_insert(0) += 1;
        }
        counts
    }

    /// Make sure the projections and tile grid agree with each other, and
    /// that every tile is where it says it is. Deserialization alone can't
    /// catch these.
    fn check_consistency(&self) -> WorldResult<()> {
        let (width, height) = (self.width(), self.height());
        let dimensions = |grid_width: u32, grid_height: u32, name: &str| {
            if (grid_width, grid_height) == (width, height) {
                Ok(())
            } else {
                Err(WorldError::world_load(format!(
                    "{} is {}x{}, but terrainMap is {}x{}",
                    name, grid_width, grid_height, width, height
                )))
            }
        };
        dimensions(
            self.biome_map.width(),
            self.biome_map.height(),
            "biomeMap",
        )?;
        dimensions(
            self.height_map.width(),
            self.height_map.height(),
            "heightMap",
        )?;

        for (point, tile) in self.terrain_map.iter() {
            let problem = if tile.position != point {
                Some(format!("tile claims position {}", tile.position))
            } else if tile.region != Region::of(point, width, height) {
                Some(format!("tile has wrong region {}", tile.region))
            } else if !Tile::ELEVATION_RANGE.contains(tile.elevation) {
                Some(format!("elevation {} out of range", tile.elevation))
            } else if self.biome_map[point] != tile.biome {
                Some(format!(
                    "biomeMap has {} but tile has {}",
                    self.biome_map[point], tile.biome
                ))
            } else if self.height_map[point] != tile.elevation {
                Some(format!(
                    "heightMap has {} but tile has {}",
                    self.height_map[point], tile.elevation
                ))
            } else {
                None
            };
            if let Some(problem) = problem {
                return Err(WorldError::world_load(format!(
                    "inconsistent tile at {}: {}",
                    point, problem
                )));
            }
        }
        Ok(())
    }
}

/// High-level categories for biomes: land or water?
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BiomeType {
    Water,
    Land,
}

/// A biome is the terrain classification of a tile. Every tile has exactly
/// one biome. Tiles start as [Biome::Water]; generation claims some as land
/// biomes, and turns enclosed water into [Biome::Lake].
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Biome {
    // Water
    Water,
    Lake,

    // Land
    Beach,
    Bedrock,
    Desert,
    Forest,
    Ice,
    Jungle,
    Mountain,
    Plains,
    Swamp,
    Tundra,
}

impl Biome {
    /// Get this biome's high-level category
    pub fn biome_type(self) -> BiomeType {
        match self {
            Self::Water | Self::Lake => BiomeType::Water,
            Self::Beach
            | Self::Bedrock
            | Self::Desert
            | Self::Forest
            | Self::Ice
            | Self::Jungle
            | Self::Mountain
            | Self::Plains
            | Self::Swamp
            | Self::Tundra => BiomeType::Land,
        }
    }
}

/// The shape category of a landmass blob. The type is also applied to every
/// tile the blob claims, as a tag.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BlobType {
    Continent,
    Island,
    Archipelago,
}
