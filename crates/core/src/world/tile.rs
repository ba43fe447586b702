use crate::{
    util::range::NumRange,
    world::{grid::GridPoint, region::Region, Biome, BiomeType, BlobType},
};
use fnv::FnvBuildHasher;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Well-known tile tags. Tags are free-form, so config can add any others it
/// likes; these are the ones generation applies itself.
pub mod tag {
    /// Applied to every tile claimed by a blob
    pub const LAND: &str = "land";
    /// Applied to continents created from a landmass size preset
    pub const MAINLAND: &str = "mainland";
    /// Water connected to the edge of the world
    pub const OCEAN: &str = "ocean";
    /// Water enclosed by land
    pub const LAKE: &str = "lake";
}

/// A set of free-form labels attached to a tile. Insertion order is kept for
/// stable output, but isn't meaningful. Duplicates are impossible.
pub type TagSet = IndexSet<String, FnvBuildHasher>;

/// A world is made up of a grid of tiles. Every tile starts as water, and the
/// generation process claims some of them as land.
///
/// Tiles can't be constructed outside this crate. They can only come from
/// world generation (see [World::generate](crate::World::generate)) or from
/// loading a saved world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tile {
    /// Location of this tile in the world grid. Never changes.
    pub(crate) position: GridPoint,

    /// The biome for this tile. See [Biome] for more info.
    pub(crate) biome: Biome,

    /// Elevation in `[0, 1]`. Untouched water stays at 0, and any tile
    /// claimed as land gets an elevation of at least 0.1.
    pub(crate) elevation: f64,

    /// The region this tile falls in. Assigned once when the grid is
    /// initialized, and never changes.
    pub(crate) region: Region,

    #[serde(default)]
    pub(crate) tags: TagSet,

    /// Provenance of the blob that claimed this tile, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) meta: Option<BlobMeta>,
}

impl Tile {
    /// Every tile's elevation will fall in this range (inclusive)
    pub const ELEVATION_RANGE: NumRange<f64> = NumRange::new(0.0, 1.0);

    /// Create a blank water tile
    pub(crate) fn new(position: GridPoint, region: Region) -> Self {
        Self {
            position,
            biome: Biome::Water,
            elevation: 0.0,
            region,
            tags: TagSet::default(),
            meta: None,
        }
    }

    pub fn position(&self) -> GridPoint {
        self.position
    }

    pub fn biome(&self) -> Biome {
        self.biome
    }

    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// All labels that have been applied to this tile, e.g. `land`, `ocean`,
    /// or the type of blob that created it.
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Metadata describing the blob that claimed this tile. `None` for tiles
    /// that were never touched by a blob.
    pub fn meta(&self) -> Option<&BlobMeta> {
        self.meta.as_ref()
    }

    /// Is this tile water (of any kind)?
    pub fn is_water(&self) -> bool {
        self.biome.biome_type() == BiomeType::Water
    }

    pub(crate) fn set_biome(&mut self, biome: Biome) {
        self.biome = biome;
    }

    /// Set the elevation for this tile. Returns an error if the value is out
    /// of [Self::ELEVATION_RANGE].
    pub(crate) fn set_elevation(
        &mut self,
        elevation: f64,
    ) -> anyhow::Result<()> {
        Self::ELEVATION_RANGE.ensure_contains(elevation)?;
        self.elevation = elevation;
        Ok(())
    }

    /// Add a tag. Returns `false` if the tile already had it.
    pub(crate) fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        self.tags.insert(tag.into())
    }

    pub(crate) fn set_meta(&mut self, meta: BlobMeta) {
        self.meta = Some(meta);
    }
}

/// Identifier for a single blob stamp. Unique within one generation run.
#[derive(
    Copy,
    Clone,
    Debug,
    derive_more::Display,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct BlobId(pub u64);

/// Records which blob claimed a tile, and where the tile sat within it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BlobMeta {
    pub blob_id: BlobId,
    /// Distance from the blob center, normalized by its radius (rounded)
    pub distance: f64,
    /// Jittered falloff value that qualified this tile (rounded)
    pub falloff: f64,
    #[serde(rename = "type")]
    pub blob_type: BlobType,
}
