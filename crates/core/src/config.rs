mod seed;

pub use seed::SeedId;

use crate::{
    error::{WorldError, WorldResult},
    world::{region::Region, tile::tag, Biome, BiomeType, BlobType},
};
use indexmap::IndexMap;
use serde::{
    de::{self, DeserializeOwned},
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::{borrow::Cow, iter::FromIterator};
use validator::{Validate, ValidationError, ValidationErrors};

/// Configuration that defines a world generation process. Two worlds
/// generated with the same config will always be identical.
///
/// The config is split into the same pieces the browser app loads as separate
/// documents: global settings, the region map (how many landmasses go where),
/// and biome rules (which biomes those landmasses are made of).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct WorldConfig {
    /// Identifier for the world, which also seeds every random process
    /// during generation. See [SeedId].
    pub seed: SeedId,

    #[validate]
    pub settings: Settings,

    #[validate]
    pub generation: GenerationConfig,

    /// Landmass rules for each region
    #[validate]
    pub regions: RegionMap,

    /// Biome weights for each region
    #[validate]
    pub biome_rules: BiomeRules,
}

/// Global settings, shared with the rendering side of the app.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Number of tiles along the east-west axis
    #[validate(range(min = 1, max = 10000))]
    pub world_width: u32,

    /// Number of tiles along the north-south axis
    #[validate(range(min = 1, max = 10000))]
    pub world_height: u32,

    /// Side length (in tiles) of the chunks the world is split into for
    /// rendering. Has no effect on generation.
    #[validate(range(min = 1, max = 10000))]
    pub grid_chunk_size: u32,
}

/// Knobs for the generation algorithm itself
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationConfig {
    /// How many random spots to try when placing a landmass, before giving up
    /// on it. A spot is only accepted if it falls in the landmass's region,
    /// so small regions may need more attempts.
    #[validate(range(min = 1, max = 10000))]
    pub placement_attempts: u32,
}

/// Landmass rules, keyed by region label (`NW`, `C`, etc.). Regions that
/// aren't listed get no landmasses. Rules are applied in the order they're
/// declared.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionMap(pub IndexMap<String, RegionRule>);

/// Describes the landmasses to generate in a single region. This can either
/// be a shorthand size, which gets scaled to the world, or a full rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegionRule {
    Sized(SizedRule),
    Explicit(LandmassRule),
}

/// Shorthand for a region rule. See [LandmassSize].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SizedRule {
    pub landmass_size: LandmassSize,
}

/// Coarse landmass size presets. These scale with the size of the world,
/// based on the *extent* of a region (the shorter side of one ninth of the
/// world):
/// - `large` - one continent, with radius half the extent
/// - `medium` - two islands, with radius a quarter of the extent
/// - `small` - four archipelago blobs, with radius an eighth of the extent
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmassSize {
    Large,
    Medium,
    Small,
}

/// A full description of the landmasses to stamp in a region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LandmassRule {
    /// Number of landmasses to place in the region
    #[validate(range(max = 1000))]
    pub count: u32,

    /// Rough radius of each landmass, in tiles
    #[validate(range(min = 1, max = 10000))]
    pub radius: u32,

    #[serde(rename = "type")]
    pub blob_type: BlobType,

    /// Extra tags applied to every tile of these landmasses
    // Keep this above edge_biomes, TOML needs values before tables
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Biome weights for the outer half of each landmass. If omitted, the
    /// region's core weights are used all the way out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate]
    pub edge_biomes: Option<BiomeWeights>,
}

/// Biome rules, keyed by region label.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BiomeRules(pub IndexMap<String, BiomeRule>);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BiomeRule {
    /// Weights for the core of every landmass in the region
    #[validate]
    pub biome_weights: BiomeWeights,
}

/// A weighted set of biomes. A biome is picked with probability proportional
/// to its weight. Entries keep the order they were declared in, which keeps
/// selection deterministic for a given RNG.
///
/// A valid set is non-empty, has only finite non-negative weights that don't
/// sum to zero, and contains only land biomes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BiomeWeights(IndexMap<Biome, f64>);

impl WorldConfig {
    /// Get the biome rule for a region, if there is one
    pub fn biome_rule(&self, region: Region) -> Option<&BiomeRule> {
        self.biome_rules.get(region)
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        // This should produce a nice-looking world out of the box. The values
        // don't need to be sacred, but keep every region covered by a biome
        // rule.
        fn weights(entries: &[(Biome, f64)]) -> BiomeRule {
            BiomeRule {
                biome_weights: entries.iter().copied().collect(),
            }
        }
        fn sized(landmass_size: LandmassSize) -> RegionRule {
            RegionRule::Sized(SizedRule { landmass_size })
        }

        let regions = vec![
            ("C", sized(LandmassSize::Large)),
            ("NW", sized(LandmassSize::Small)),
            ("NE", sized(LandmassSize::Medium)),
            ("SW", sized(LandmassSize::Medium)),
            ("SE", sized(LandmassSize::Small)),
        ];
        let biome_rules = vec![
            ("NW", weights(&[(Biome::Tundra, 3.0), (Biome::Ice, 1.0)])),
            ("N", weights(&[(Biome::Tundra, 2.0), (Biome::Ice, 2.0)])),
            ("NE", weights(&[(Biome::Tundra, 2.0), (Biome::Forest, 1.0)])),
            ("W", weights(&[(Biome::Forest, 2.0), (Biome::Swamp, 1.0)])),
            (
                "C",
                weights(&[
                    (Biome::Plains, 3.0),
                    (Biome::Forest, 2.0),
                    (Biome::Mountain, 1.0),
                ]),
            ),
            ("E", weights(&[(Biome::Plains, 2.0), (Biome::Forest, 1.0)])),
            ("SW", weights(&[(Biome::Swamp, 2.0), (Biome::Jungle, 1.0)])),
            ("S", weights(&[(Biome::Desert, 3.0), (Biome::Plains, 1.0)])),
            ("SE", weights(&[(Biome::Desert, 2.0), (Biome::Beach, 1.0)])),
        ];

        Self {
            seed: SeedId::default(),
            settings: Settings::default(),
            generation: GenerationConfig::default(),
            regions: RegionMap(
                regions
                    .into_iter()
                    .map(|(label, rule)| (label.to_owned(), rule))
                    .collect(),
            ),
            biome_rules: BiomeRules(
                biome_rules
                    .into_iter()
                    .map(|(label, rule)| (label.to_owned(), rule))
                    .collect(),
            ),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world_width: 25,
            world_height: 25,
            grid_chunk_size: 10,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            placement_attempts: 25,
        }
    }
}

impl RegionMap {
    /// Iterate over each rule with its parsed region. Labels that aren't a
    /// valid region come back as errors; validation rejects those up front.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (Result<Region, &str>, &RegionRule)> {
        self.0.iter().map(|(label, rule)| {
            (label.parse().map_err(|_| label.as_str()), rule)
        })
    }
}

impl Validate for RegionMap {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_region_keyed(&self.0, |rule| rule.validate())
    }
}

impl RegionRule {
    /// Turn this rule into a concrete landmass rule for a world of the given
    /// size. Sized rules are scaled to the world, explicit rules are returned
    /// as-is.
    pub fn resolve(&self, settings: &Settings) -> Cow<'_, LandmassRule> {
        match self {
            Self::Explicit(rule) => Cow::Borrowed(rule),
            Self::Sized(SizedRule { landmass_size }) => {
                Cow::Owned(landmass_size.resolve(settings))
            }
        }
    }
}

impl Validate for RegionRule {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Self::Sized(_) => Ok(()),
            Self::Explicit(rule) => rule.validate(),
        }
    }
}

impl LandmassSize {
    /// Scale this preset to a world of the given size
    pub fn resolve(self, settings: &Settings) -> LandmassRule {
        let extent = (settings.world_width / 3).min(settings.world_height / 3);
        let (count, divisor, blob_type) = match self {
            Self::Large => (1, 2, BlobType::Continent),
            Self::Medium => (2, 4, BlobType::Island),
            Self::Small => (4, 8, BlobType::Archipelago),
        };
        let tags = if blob_type == BlobType::Continent {
            vec![tag::MAINLAND.to_owned()]
        } else {
            Vec::new()
        };
        LandmassRule {
            count,
            radius: (extent / divisor).max(1),
            blob_type,
            tags,
            edge_biomes: None,
        }
    }
}

impl BiomeRules {
    pub fn get(&self, region: Region) -> Option<&BiomeRule> {
        self.0.get(region.to_string().as_str())
    }
}

impl Validate for BiomeRules {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_region_keyed(&self.0, |rule| rule.validate())
    }
}

impl BiomeWeights {
    /// Iterate over biomes and their weights, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Biome, f64)> + '_ {
        self.0.iter().map(|(biome, weight)| (*biome, *weight))
    }

    /// Sum of all weights
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Biome, f64)> for BiomeWeights {
    fn from_iter<I: IntoIterator<Item = (Biome, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Validate for BiomeWeights {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.is_empty() {
            errors.add("weights", ValidationError::new("empty"));
        }
        for (biome, weight) in self.iter() {
            if !weight.is_finite() || weight < 0.0 {
                let mut error = ValidationError::new("invalid_weight");
                error.message = Some(
                    format!("weight for {} must be non-negative", biome).into(),
                );
                error.add_param("value".into(), &weight);
                errors.add("weights", error);
            }
            if biome.biome_type() != BiomeType::Land {
                let mut error = ValidationError::new("not_land");
                error.message = Some(
                    format!("{} can't be assigned to a landmass", biome).into(),
                );
                errors.add("weights", error);
            }
        }
        let total = self.total();
        if !self.is_empty() && (!total.is_finite() || total <= 0.0) {
            errors.add("weights", ValidationError::new("zero_total"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

// Always serialize biome names as plain string keys. Some formats (TOML) don't
// accept enum variants as map keys.
impl Serialize for BiomeWeights {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.0.iter().map(|(biome, weight)| (biome.to_string(), weight)),
        )
    }
}

impl<'de> Deserialize<'de> for BiomeWeights {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        let raw: IndexMap<String, f64> = IndexMap::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(name, weight)| {
                let biome = name.parse::<Biome>().map_err(|_| {
                    <D::Error as de::Error>::custom(format!(
                        "unknown biome `{}`",
                        name
                    ))
                })?;
                Ok((biome, weight))
            })
            .collect()
    }
}

/// Validate a map keyed by region label. Every key has to be one of the nine
/// region labels, and every value has to pass its own validation.
fn validate_region_keyed<T>(
    map: &IndexMap<String, T>,
    validate_value: impl Fn(&T) -> Result<(), ValidationErrors>,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for (label, value) in map {
        if label.parse::<Region>().is_err() {
            let mut error = ValidationError::new("unknown_region");
            error.message =
                Some(format!("`{}` is not a region label", label).into());
            error.add_param("label".into(), label);
            errors.add("region", error);
        }
        if let Err(value_errors) = validate_value(value) {
            let mut error = ValidationError::new("invalid_rule");
            error.message =
                Some(format!("rule for {}: {}", label, value_errors).into());
            error.add_param("label".into(), label);
            errors.add("rule", error);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse a JSON configuration document. The name of the document is only
/// used for error messages. This does **not** validate the parsed value.
pub fn parse_document<T: DeserializeOwned>(
    document: &str,
    json: &str,
) -> WorldResult<T> {
    serde_json::from_str(json).map_err(|source| WorldError::ConfigLoad {
        document: document.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn error_fields(errors: &ValidationErrors) -> Vec<&'static str> {
        let mut fields: Vec<&str> = errors.errors().keys().copied().collect();
        fields.sort_unstable();
        fields
    }

    #[test]
    fn test_default_is_valid() {
        WorldConfig::default().validate().unwrap();
    }

    #[test]
    fn test_region_rule_shapes() {
        let regions: RegionMap = serde_json::from_value(json!({
            "C": {"landmassSize": "large"},
            "NW": {"count": 2, "radius": 3, "type": "island"},
            "SE": {
                "count": 1,
                "radius": 4,
                "type": "archipelago",
                "edgeBiomes": {"beach": 1},
                "tags": ["reef"]
            }
        }))
        .unwrap();

        let rules: Vec<_> = regions.0.values().collect();
        assert_eq!(
            rules[0],
            &RegionRule::Sized(SizedRule {
                landmass_size: LandmassSize::Large
            })
        );
        match rules[2] {
            RegionRule::Explicit(rule) => {
                assert_eq!(rule.blob_type, BlobType::Archipelago);
                assert_eq!(rule.tags, vec!["reef".to_owned()]);
                assert_eq!(
                    rule.edge_biomes.as_ref().map(BiomeWeights::len),
                    Some(1)
                );
            }
            other => panic!("expected explicit rule, got {:?}", other),
        }
        regions.validate().unwrap();
    }

    #[test]
    fn test_region_rule_bad_shape() {
        // Neither shorthand nor full rule
        let result = serde_json::from_value::<RegionMap>(json!({
            "C": {"landmassSize": "huge"}
        }));
        assert!(result.is_err());
        let result = serde_json::from_value::<RegionMap>(json!({
            "C": {"radius": 3}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_landmass_size_resolve() {
        let settings = Settings {
            world_width: 100,
            world_height: 100,
            grid_chunk_size: 10,
        };
        // extent is 33
        let large = LandmassSize::Large.resolve(&settings);
        assert_eq!((large.count, large.radius), (1, 16));
        assert_eq!(large.blob_type, BlobType::Continent);
        assert_eq!(large.tags, vec!["mainland".to_owned()]);
        let medium = LandmassSize::Medium.resolve(&settings);
        assert_eq!((medium.count, medium.radius), (2, 8));
        assert_eq!(medium.blob_type, BlobType::Island);
        let small = LandmassSize::Small.resolve(&settings);
        assert_eq!((small.count, small.radius), (4, 4));
        assert_eq!(small.blob_type, BlobType::Archipelago);
        assert!(small.tags.is_empty());

        // Tiny worlds still get a usable radius
        let tiny = Settings {
            world_width: 3,
            world_height: 3,
            grid_chunk_size: 10,
        };
        assert_eq!(LandmassSize::Small.resolve(&tiny).radius, 1);
    }

    #[test]
    fn test_unknown_region_label() {
        let regions: RegionMap = serde_json::from_value(json!({
            "XX": {"landmassSize": "small"},
            "C": {"landmassSize": "small"},
        }))
        .unwrap();
        let errors = regions.validate().unwrap_err();
        assert_eq!(error_fields(&errors), vec!["region"]);
    }

    #[test]
    fn test_invalid_landmass_rule() {
        let regions: RegionMap = serde_json::from_value(json!({
            "C": {"count": 1, "radius": 0, "type": "continent"},
        }))
        .unwrap();
        let errors = regions.validate().unwrap_err();
        assert_eq!(error_fields(&errors), vec!["rule"]);
    }

    #[test]
    fn test_biome_weights_validation() {
        let valid: BiomeWeights =
            serde_json::from_value(json!({"plains": 1, "forest": 0})).unwrap();
        valid.validate().unwrap();

        let empty = BiomeWeights::default();
        assert!(empty.validate().is_err());

        let zero: BiomeWeights =
            serde_json::from_value(json!({"plains": 0})).unwrap();
        assert!(zero.validate().is_err());

        let negative: BiomeWeights =
            serde_json::from_value(json!({"plains": 2, "forest": -1}))
                .unwrap();
        assert!(negative.validate().is_err());

        let water: BiomeWeights =
            serde_json::from_value(json!({"water": 1})).unwrap();
        assert!(water.validate().is_err());
    }

    #[test]
    fn test_biome_weights_total_overflow() {
        // Each weight is finite, but the sum is not
        let weights: BiomeWeights =
            serde_json::from_value(json!({"plains": 1e308, "forest": 1e308}))
                .unwrap();
        assert!(weights.total().is_infinite());
        let errors = weights.validate().unwrap_err();
        let codes: Vec<_> = errors.field_errors()["weights"]
            .iter()
            .map(|error| &*error.code)
            .collect();
        assert_eq!(codes, vec!["zero_total"]);
    }

    #[test]
    fn test_region_map_keeps_declared_order() {
        let regions: RegionMap = serde_json::from_value(json!({
            "SE": {"landmassSize": "small"},
            "C": {"landmassSize": "large"},
            "NW": {"landmassSize": "medium"}
        }))
        .unwrap();
        let keys: Vec<&str> = regions.0.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["SE", "C", "NW"]);
    }

    #[test]
    fn test_biome_weights_order_and_names() {
        let weights: BiomeWeights = serde_json::from_value(
            json!({"tundra": 1, "desert": 2, "plains": 3}),
        )
        .unwrap();
        let biomes: Vec<Biome> = weights.iter().map(|(b, _)| b).collect();
        assert_eq!(biomes, vec![Biome::Tundra, Biome::Desert, Biome::Plains]);
        assert_eq!(
            serde_json::to_string(&weights).unwrap(),
            r#"{"tundra":1.0,"desert":2.0,"plains":3.0}"#
        );

        let unknown =
            serde_json::from_value::<BiomeWeights>(json!({"lava": 1}));
        assert!(unknown.is_err());
    }

    #[test]
    fn test_parse_document() {
        let settings: Settings = parse_document(
            "settings",
            r#"{"worldWidth": 100, "worldHeight": 50}"#,
        )
        .unwrap();
        assert_eq!(settings.world_width, 100);
        assert_eq!(settings.world_height, 50);
        // Missing fields get defaults
        assert_eq!(settings.grid_chunk_size, 10);

        let result = parse_document::<Settings>("settings", "{not json");
        match result {
            Err(WorldError::ConfigLoad { document, .. }) => {
                assert_eq!(document, "settings")
            }
            other => panic!("expected load failure, got {:?}", other),
        }
    }

    #[test]
    fn test_world_config_json_keys() {
        let config: WorldConfig = serde_json::from_value(json!({
            "seed": "ABCD",
            "settings": {"worldWidth": 30, "worldHeight": 20},
            "regions": {"C": {"landmassSize": "medium"}},
            "biomeRules": {"C": {"biomeWeights": {"plains": 1}}}
        }))
        .unwrap();
        assert_eq!(config.seed, SeedId::from("ABCD"));
        assert_eq!(config.generation.placement_attempts, 25);
        assert!(config.biome_rule(Region::Center).is_some());
        assert!(config.biome_rule(Region::North).is_none());
        config.validate().unwrap();
    }
}
