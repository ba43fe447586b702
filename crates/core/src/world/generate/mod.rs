mod biome;
mod blob;
mod elevation;
mod landmass;
mod ocean;

use crate::{
    timed,
    world::{
        generate::{landmass::LandmassGenerator, ocean::WaterGenerator},
        grid::Grid,
        region::Region,
        tile::{BlobId, Tile},
    },
    WorldConfig,
};
use anyhow::Context;
use log::info;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::fmt::Debug;

/// A container for generating a new world. This applies a series of generators
/// in sequence to create the world. These fields are public to allow for
/// disjoint borrowing of multiple fields at once.
pub struct WorldBuilder<'a> {
    /// This config determinisitically controls world generation, meaning two
    /// worlds with the same config will always be identical (provided they
    /// were generated on the same version of the code).
    pub config: &'a WorldConfig,

    /// RNG provider. Seeded from the config's seed ID.
    pub rng: Pcg64,

    /// All the tiles in the world. These individual tiles will be mutated
    /// during world generation, but tiles can never be added/removed/moved!
    pub tiles: Grid<Tile>,

    /// Hands out an ID for each blob stamped during this run
    pub blob_ids: BlobIdAllocator,
}

impl<'a> WorldBuilder<'a> {
    pub fn new(config: &'a WorldConfig) -> Self {
        let width = config.settings.world_width;
        let height = config.settings.world_height;

        // Every tile starts as water, and never changes region
        let tiles = timed!(
            "World initialization",
            Grid::from_fn(width, height, |point| {
                Tile::new(point, Region::of(point, width, height))
            })
        );
        info!(
            "Initialized {}x{} world with {} tiles",
            width,
            height,
            tiles.len()
        );

        Self {
            config,
            rng: Pcg64::seed_from_u64(config.seed.to_u64()),
            tiles,
            blob_ids: BlobIdAllocator::default(),
        }
    }

    /// Generate a world by running a series of generation steps sequentially.
    /// Must be run from a blank slate. Outputs the finalized grid of tiles.
    pub fn generate_world(mut self) -> anyhow::Result<Grid<Tile>> {
        // Water can only be classified once all the land is in place
        self.apply_generator(LandmassGenerator)?;
        self.apply_generator(WaterGenerator)?;
        Ok(self.tiles)
    }

    /// A helper to run a generation step on this builder.
    fn apply_generator(
        &mut self,
        generator: impl Debug + Generate,
    ) -> anyhow::Result<()> {
        timed!(&format!("{:?}", generator), generator.generate(self))
            .with_context(|| format!("error in {:?}", generator))
    }
}

/// A type that generates some sort of data for the world. This takes in a set
/// of tiles that have some data generated, and mutates the tiles to add new
/// data. Generators are chained together, where each one adds some more data
/// until the world is complete.
trait Generate {
    /// Apply some generation step to the given world. This can mutate the
    /// world's tiles, but can never add/remove tiles, or change their positions
    /// or regions. Any error returned here is an internal failure (a bug),
    /// rather than anything invalid about the input, since the config is
    /// validated before generation starts.
    fn generate(&self, world: &mut WorldBuilder) -> anyhow::Result<()>;
}

/// Allocates blob IDs. Each generation run gets its own allocator, so IDs
/// start from 1 in every world.
#[derive(Debug, Default)]
pub struct BlobIdAllocator {
    last: u64,
}

impl BlobIdAllocator {
    pub fn next(&mut self) -> BlobId {
        self.last += 1;
        BlobId(self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_ids_increase() {
        let mut ids = BlobIdAllocator::default();
        assert_eq!(ids.next(), BlobId(1));
        assert_eq!(ids.next(), BlobId(2));
        assert_eq!(BlobIdAllocator::default().next(), BlobId(1));
    }

    #[test]
    fn test_builder_initializes_water() {
        let config = WorldConfig {
            seed: "WATER".into(),
            ..Default::default()
        };
        let builder = WorldBuilder::new(&config);
        assert_eq!(builder.tiles.width(), config.settings.world_width);
        assert_eq!(builder.tiles.height(), config.settings.world_height);
        for (point, tile) in builder.tiles.iter() {
            assert_eq!(tile.position(), point);
            assert!(tile.is_water());
            assert_eq!(tile.elevation(), 0.0);
            assert_eq!(
                tile.region(),
                Region::of(point, builder.tiles.width(), builder.tiles.height())
            );
        }
    }
}
