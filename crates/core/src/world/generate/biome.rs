use crate::{config::BiomeWeights, error::WorldResult, world::Biome};
use rand::Rng;
use validator::{ValidationError, ValidationErrors};

/// Pick a biome from a weighted set, with probability proportional to each
/// biome's weight. Consumes exactly one value from the RNG.
///
/// Entries are walked in declaration order, accumulating weight, and the first
/// entry whose running total reaches the roll wins. If float drift means no
/// entry qualifies, the first entry is used.
///
/// Returns an error if the set is empty or its weights don't sum to a positive
/// number. Validated configs never trigger this.
pub fn pick_weighted_biome(
    weights: &BiomeWeights,
    rng: &mut impl Rng,
) -> WorldResult<Biome> {
    let total = weights.total();
    let first = match weights.iter().next() {
        Some((biome, _)) if total.is_finite() && total > 0.0 => biome,
        _ => {
            let mut errors = ValidationErrors::new();
            let mut error = ValidationError::new("no_weight");
            error.message =
                Some("biome weights must have a positive total".into());
            errors.add("weights", error);
            return Err(errors.into());
        }
    };

    let roll = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    for (biome, weight) in weights.iter() {
        cumulative += weight;
        if cumulative >= roll {
            return Ok(biome);
        }
    }
    Ok(first)
}
