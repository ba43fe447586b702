use crate::world::{
    generate::{
        blob::{stamp_blob, Blob, BlobOptions},
        Generate, WorldBuilder,
    },
    grid::GridPoint,
    region::Region,
};
use log::{info, warn};
use rand::Rng;

/// A generator to place landmasses in each configured region. Regions are
/// handled in the order they're declared. Every landmass gets a random center
/// that falls within its region. If no such center can be found within the
/// configured number of attempts, that landmass is skipped.
#[derive(Debug)]
pub struct LandmassGenerator;

impl Generate for LandmassGenerator {
    fn generate(&self, world: &mut WorldBuilder) -> anyhow::Result<()> {
        let config = world.config;
        let width = world.tiles.width();
        let height = world.tiles.height();
        let attempts = config.generation.placement_attempts;

        for (region, rule) in config.regions.iter() {
            let region = match region {
                Ok(region) => region,
                Err(label) => {
                    warn!("Skipping unknown region {:?}", label);
                    continue;
                }
            };
            let biome_rule = match config.biome_rule(region) {
                Some(biome_rule) => biome_rule,
                None => {
                    warn!("No biome rule for region {}, skipping it", region);
                    continue;
                }
            };

            let rule = rule.resolve(&config.settings);
            let options = BlobOptions {
                core_biomes: &biome_rule.biome_weights,
                edge_biomes: rule.edge_biomes.as_ref(),
                tags: &rule.tags,
            };

            let mut placed = 0;
            for i in 0..rule.count {
                let center = (0..attempts).find_map(|_| {
                    let point = GridPoint::new(
                        world.rng.gen_range(0..width),
                        world.rng.gen_range(0..height),
                    );
                    if Region::of(point, width, height) == region {
                        Some(point)
                    } else {
                        None
                    }
                });

                match center {
                    Some(center) => {
                        let blob = Blob {
                            id: world.blob_ids.next(),
                            center,
                            radius: rule.radius,
                            blob_type: rule.blob_type,
                        };
                        stamp_blob(
                            &mut world.tiles,
                            &blob,
                            &options,
                            &mut world.rng,
                        )?;
                        placed += 1;
                    }
                    None => warn!(
                        "Couldn't place {} {} of {} in region {} after {} \
                        attempts, skipping it",
                        rule.blob_type,
                        i + 1,
                        rule.count,
                        region,
                        attempts
                    ),
                }
            }
            info!(
                "Placed {}/{} {} landmasses in region {}",
                placed, rule.count, rule.blob_type, region
            );
        }

        Ok(())
    }
}
