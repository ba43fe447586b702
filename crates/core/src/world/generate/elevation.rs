use crate::util::range::NumRange;
use rand::Rng;

/// A tile is only claimed by a blob if its falloff is strictly above this
pub const FALLOFF_THRESHOLD: f64 = 0.25;

/// Falloff is randomly nudged by up to this much in either direction, to rough
/// up the edges of each blob
const JITTER: f64 = 0.1;

/// Tiles closer than this (as a fraction of the radius) to a blob's center get
/// the blob's core biomes. Anything further out gets the edge biomes.
const CORE_DISTANCE: f64 = 0.5;

/// Final elevation of any tile claimed by a blob
const LAND_ELEVATION_RANGE: NumRange<f64> = NumRange::new(0.1, 1.0);

/// Falloff of a single tile relative to the center of a blob. Falloff is ~1 at
/// the center and drops to ~0 at the radius.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Falloff {
    /// Distance from the blob center, as a fraction of the radius
    pub distance: f64,
    /// `1 - distance`, plus jitter
    pub value: f64,
}

impl Falloff {
    /// Compute falloff for a tile offset `(dx, dy)` from the center of a blob.
    /// Draws one value from the RNG for jitter.
    pub fn compute(dx: i64, dy: i64, radius: u32, rng: &mut impl Rng) -> Self {
        let jitter = rng.gen_range(-JITTER..JITTER);
        Self::with_jitter(dx, dy, radius, jitter)
    }

    /// Compute falloff with a fixed jitter value
    pub fn with_jitter(dx: i64, dy: i64, radius: u32, jitter: f64) -> Self {
        let distance = ((dx * dx + dy * dy) as f64).sqrt() / f64::from(radius);
        Self {
            distance,
            value: 1.0 - distance + jitter,
        }
    }

    /// Is the tile close enough to the center to be claimed?
    pub fn qualifies(&self) -> bool {
        self.value > FALLOFF_THRESHOLD
    }

    /// Should the tile use the blob's core biomes, rather than edge biomes?
    pub fn is_core(&self) -> bool {
        self.distance < CORE_DISTANCE
    }

    /// Elevation for a claimed tile. Higher toward the center, and never
    /// below the land floor.
    pub fn elevation(&self) -> f64 {
        LAND_ELEVATION_RANGE
            .value(0.3 + self.value * 0.7)
            .clamp()
            .inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn test_center_always_qualifies() {
        let mut rng = Pcg64::seed_from_u64(5);
        for _ in 0..1000 {
            let falloff = Falloff::compute(0, 0, 5, &mut rng);
            assert_eq!(falloff.distance, 0.0);
            assert!(falloff.qualifies());
            assert!(falloff.is_core());
        }
    }

    #[test]
    fn test_radius_never_qualifies() {
        // At the radius, falloff is 0 +/- jitter, which can't reach the
        // threshold
        let mut rng = Pcg64::seed_from_u64(5);
        for _ in 0..1000 {
            let falloff = Falloff::compute(3, 4, 5, &mut rng);
            assert_approx_eq!(falloff.distance, 1.0);
            assert!(!falloff.qualifies());
        }
    }

    #[test]
    fn test_threshold_boundary() {
        // distance 0.7 -> base falloff 0.3
        let just_in = Falloff::with_jitter(7, 0, 10, -0.04);
        assert!(just_in.qualifies());
        let just_out = Falloff::with_jitter(7, 0, 10, -0.06);
        assert!(!just_out.qualifies());
        assert!(!just_out.is_core());
    }

    #[test]
    fn test_elevation() {
        assert_approx_eq!(Falloff::with_jitter(0, 0, 4, 0.0).elevation(), 1.0);
        // Jitter past 1 gets clamped
        let jittered = Falloff::with_jitter(0, 0, 4, 0.09);
        assert_approx_eq!(jittered.elevation(), 1.0);
        // 0.3 + 0.5 * 0.7
        assert_approx_eq!(
            Falloff::with_jitter(2, 0, 4, 0.0).elevation(),
            0.65
        );
        // Way outside the blob hits the floor
        assert_approx_eq!(
            Falloff::with_jitter(40, 0, 4, 0.0).elevation(),
            0.1
        );
    }
}
