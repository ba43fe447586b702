//! This crate provides WebAssembly bindings for biomap. The [Biomap] struct
//! is the main interface; you'll have to initialize a single instance of
//! [Biomap] in order to do any biomap operations from JS. From there, [Biomap]
//! provides functions for creating and validating world configs, generating
//! a world from that config, and loading saved worlds. Every world comes back
//! as a [WorldHandle], which the viewer reads from and edits through.
//!
//! You probably won't ever want to include this crate in another Rust project.
//! Instead, use `wasm-pack` to build this into an npm package, then import that
//! into your JS project.

mod util;

use crate::util::{
    js_error, to_js, ResultExt, SettingsHelper, WorldConfigHelper,
};
use biomap::{Biome, GridPoint, SeedId, Settings, World};
use log::warn;
use wasm_bindgen::{prelude::*, JsCast};

/// A top-level interface for interacting with biomap from Wasm.
#[wasm_bindgen]
pub struct Biomap;

#[wasm_bindgen]
impl Biomap {
    /// Initialize global state needed for world generation. Should be called
    /// once per app instance.
    #[wasm_bindgen(constructor)]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));
        wasm_logger::init(wasm_logger::Config::default());
        Self
    }

    /// Get the default world config as a JS object.
    pub fn default_world_config(&self) -> Result<WorldConfigObject, JsValue> {
        WorldConfigHelper::new().default()
    }

    /// Verify that the given JS object is a valid world config. Return the
    /// validated config, with all defaults populated, if it's valid. Return
    /// an error if it isn't.
    pub fn validate_world_config(
        &self,
        input: WorldConfigObject,
    ) -> Result<WorldConfigObject, JsValue> {
        WorldConfigHelper::new().validate(input)
    }

    /// Get the default settings as a JS object.
    pub fn default_settings(&self) -> Result<SettingsObject, JsValue> {
        SettingsHelper::new().default()
    }

    /// Same as [Biomap::validate_world_config], but just for settings.
    pub fn validate_settings(
        &self,
        input: SettingsObject,
    ) -> Result<SettingsObject, JsValue> {
        SettingsHelper::new().validate(input)
    }

    /// Generate a random seed ID. Uses the default length if none is given.
    pub fn generate_seed_id(&self, length: Option<usize>) -> String {
        let length = length.unwrap_or(SeedId::DEFAULT_LEN);
        SeedId::generate(&mut rand::thread_rng(), length).to_string()
    }

    /// Generate a new world with the given config. Returns an error if the
    /// config is invalid.
    pub fn generate_world(
        &self,
        config: WorldConfigObject,
    ) -> Result<WorldHandle, JsValue> {
        let config = WorldConfigHelper::new().deserialize(config)?;
        let chunk_size = config.settings.grid_chunk_size;
        let world = World::generate(config).into_js()?;
        Ok(WorldHandle { world, chunk_size })
    }

    /// Load a saved world from its JSON string. If the world can't be loaded,
    /// this returns `undefined`, and the caller should generate a new world
    /// instead.
    pub fn load_world(&self, json: &str) -> Option<WorldHandle> {
        match World::from_json(json) {
            Ok(world) => Some(WorldHandle {
                world,
                chunk_size: Settings::default().grid_chunk_size,
            }),
            Err(err) => {
                warn!("{}", err);
                None
            }
        }
    }
}

/// A generated (or loaded) world. The tiles live on the Rust side, and are
/// copied out to JS on request.
#[wasm_bindgen]
pub struct WorldHandle {
    world: World,
    /// Chunk size used when [WorldHandle::chunks] isn't given one
    chunk_size: u32,
}

#[wasm_bindgen]
impl WorldHandle {
    pub fn seed_id(&self) -> String {
        self.world.seed_id().to_string()
    }

    pub fn width(&self) -> u32 {
        self.world.width()
    }

    pub fn height(&self) -> u32 {
        self.world.height()
    }

    /// Serialize the world into the JSON save format. This can be loaded
    /// back with [Biomap::load_world].
    pub fn to_json(&self) -> String {
        self.world.to_json()
    }

    /// The full grid of tiles, as an array of rows
    pub fn terrain(&self) -> Result<TileGrid, JsValue> {
        Ok(to_js(self.world.terrain_map())?.unchecked_into())
    }

    /// Biome name of every tile, as an array of rows
    pub fn biome_map(&self) -> Result<JsValue, JsValue> {
        to_js(self.world.biome_map())
    }

    /// Elevation of every tile, as an array of rows
    pub fn height_map(&self) -> Result<JsValue, JsValue> {
        to_js(self.world.height_map())
    }

    /// Override the biome of one tile. Returns an error if the biome name is
    /// unknown, or the point is outside the world.
    pub fn set_biome(
        &mut self,
        x: u32,
        y: u32,
        biome: &str,
    ) -> Result<(), JsValue> {
        let biome: Biome = biome
            .parse()
            .map_err(|_| js_error(&format!("Unknown biome: {}", biome)))?;
        self.world.set_biome(GridPoint::new(x, y), biome).into_js()
    }

    /// Split the world into chunks for rendering. Uses the configured chunk
    /// size if none is given.
    pub fn chunks(&self, size: Option<u32>) -> Result<JsValue, JsValue> {
        let size = size.unwrap_or(self.chunk_size);
        if size == 0 {
            return Err(js_error("Chunk size must be at least 1"));
        }
        to_js(&self.world.chunks(size))
    }
}

#[wasm_bindgen(typescript_custom_section)]
const TS_APPEND_CONTENT: &'static str = r#"

export type RegionLabel = 'NW' | 'N' | 'NE' | 'W' | 'C' | 'E' | 'SW' | 'S' | 'SE';

export type BiomeWeights = { [biome: string]: number };

/**
 * See description in the `extern "C"` section below
 */
export interface SettingsObject {
    worldWidth: number;
    worldHeight: number;
    gridChunkSize: number;
}

export type RegionRuleObject =
    | { landmassSize: 'large' | 'medium' | 'small' }
    | {
          count: number;
          radius: number;
          type: 'continent' | 'island' | 'archipelago';
          tags?: string[];
          edgeBiomes?: BiomeWeights;
      };

/**
 * See description in the `extern "C"` section below
 */
export interface WorldConfigObject {
    seed: string | number;
    settings: SettingsObject;
    generation: {
        placementAttempts: number;
    };
    regions: { [region in RegionLabel]?: RegionRuleObject };
    biomeRules: { [region in RegionLabel]?: { biomeWeights: BiomeWeights } };
}

export interface TileObject {
    position: { x: number; y: number };
    biome: string;
    elevation: number;
    region: RegionLabel;
    tags: string[];
    meta?: {
        blobId: number;
        distance: number;
        falloff: number;
        type: 'continent' | 'island' | 'archipelago';
    };
}
"#;

#[wasm_bindgen]
extern "C" {
    /// A TS version of the [biomap::WorldConfig] type from the core crate.
    /// This needs to be mapped manually because some types change between
    /// Rust and TS. This type represents what **can be deserialized into a
    /// [biomap::WorldConfig]**.
    ///
    /// **It is very important that this stays up to date with the
    /// [biomap::WorldConfig] type**.
    #[wasm_bindgen(typescript_type = "WorldConfigObject")]
    pub type WorldConfigObject;

    /// Similar to [WorldConfigObject], but for settings alone.
    #[wasm_bindgen(typescript_type = "SettingsObject")]
    pub type SettingsObject;

    /// Rows of tiles, as returned by [WorldHandle::terrain]
    #[wasm_bindgen(typescript_type = "TileObject[][]")]
    pub type TileGrid;
}
