use crate::{
    config::BiomeWeights,
    util,
    world::{
        generate::{biome::pick_weighted_biome, elevation::Falloff},
        grid::{Grid, GridPoint},
        tile::{tag, BlobId, BlobMeta, Tile},
        BlobType,
    },
};
use log::debug;
use rand::Rng;

/// Number of decimal places kept for the values stored in [BlobMeta]
const META_PRECISION: i32 = 2;

/// A single landmass to stamp onto the grid
#[derive(Copy, Clone, Debug)]
pub struct Blob {
    pub id: BlobId,
    pub center: GridPoint,
    /// Must be positive
    pub radius: u32,
    pub blob_type: BlobType,
}

/// Everything about a blob's content, as opposed to its shape
#[derive(Copy, Clone, Debug)]
pub struct BlobOptions<'a> {
    /// Biomes for the inner half of the blob
    pub core_biomes: &'a BiomeWeights,
    /// Biomes for the outer half. Falls back to the core biomes.
    pub edge_biomes: Option<&'a BiomeWeights>,
    /// Applied to every claimed tile, on top of `land` and the blob type
    pub tags: &'a [String],
}

/// Stamp a blob onto the grid, claiming water tiles within (roughly) its
/// radius as land. Tiles that are already land are never touched, so stamps
/// can only ever add land. Returns the number of tiles claimed.
pub fn stamp_blob(
    tiles: &mut Grid<Tile>,
    blob: &Blob,
    options: &BlobOptions,
    rng: &mut impl Rng,
) -> anyhow::Result<usize> {
    let radius = i64::from(blob.radius);
    let cx = i64::from(blob.center.x);
    let cy = i64::from(blob.center.y);
    let edge_biomes = options.edge_biomes.unwrap_or(options.core_biomes);
    let mut claimed = 0;

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let point = match tiles.point(cx + dx, cy + dy) {
                Some(point) => point,
                None => continue,
            };

            let falloff = Falloff::compute(dx, dy, blob.radius, rng);
            if !falloff.qualifies() {
                continue;
            }
            let tile = &mut tiles[point];
            if !tile.is_water() {
                continue;
            }

            let weights = if falloff.is_core() {
                options.core_biomes
            } else {
                edge_biomes
            };
            tile.set_biome(pick_weighted_biome(weights, rng)?);
            tile.set_elevation(falloff.elevation())?;
            for extra in options.tags {
                tile.add_tag(extra.as_str());
            }
            tile.add_tag(tag::LAND);
            tile.add_tag(blob.blob_type.to_string());
            tile.set_meta(BlobMeta {
                blob_id: blob.id,
                distance: util::round_to(falloff.distance, META_PRECISION),
                falloff: util::round_to(falloff.value, META_PRECISION),
                blob_type: blob.blob_type,
            });
            claimed += 1;
        }
    }

    debug!(
        "Blob {} ({}) at {} with radius {} claimed {} tiles",
        blob.id, blob.blob_type, blob.center, blob.radius, claimed
    );
    Ok(claimed)
}
