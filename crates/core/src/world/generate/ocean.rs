use crate::world::{
    generate::{Generate, WorldBuilder},
    grid::Grid,
    tile::{tag, Tile},
    Biome,
};
use log::info;
use std::collections::VecDeque;

/// A generator to classify the water left over after landmasses are placed.
/// Any water connected to the edge of the world (through other water, with
/// no diagonal moves) is ocean. Everything else is enclosed by land, and
/// becomes a lake.
#[derive(Debug)]
pub struct WaterGenerator;

impl Generate for WaterGenerator {
    fn generate(&self, world: &mut WorldBuilder) -> anyhow::Result<()> {
        let tiles = &mut world.tiles;
        let mut visited = tiles.map(|_| false);

        // Breadth-first fill from every water tile on the edge. Neighbors are
        // queued blindly, and all the checks happen when they're popped.
        let mut queue: VecDeque<(i64, i64)> = tiles
            .edge_points()
            .into_iter()
            .filter(|point| tiles[*point].biome() == Biome::Water)
            .map(|point| (i64::from(point.x), i64::from(point.y)))
            .collect();
        let mut ocean_count = 0;
        while let Some((x, y)) = queue.pop_front() {
            let point = match tiles.point(x, y) {
                Some(point) if !visited[point] => point,
                _ => continue,
            };
            let tile = &mut tiles[point];
            if tile.biome() != Biome::Water {
                continue;
            }

            visited[point] = true;
            tile.add_tag(tag::OCEAN);
            ocean_count += 1;
            queue.extend(point.adjacents().iter().copied());
        }

        let lake_count = fill_lakes(tiles, &visited);
        info!(
            "Classified {} ocean tiles and {} lake tiles",
            ocean_count, lake_count
        );
        Ok(())
    }
}

/// Convert every unvisited water tile to a lake. Returns the number of lake
/// tiles.
fn fill_lakes(tiles: &mut Grid<Tile>, visited: &Grid<bool>) -> usize {
    let mut count = 0;
    for point in visited.points() {
        let tile = &mut tiles[point];
        if tile.biome() == Biome::Water && !visited[point] {
            tile.set_biome(Biome::Lake);
            tile.add_tag(tag::LAKE);
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        world::{grid::GridPoint, region::Region},
        WorldConfig,
    };

    /// Build a builder whose tiles are drawn from a picture. `#` is land,
    /// anything else is water.
    fn classify(config: &WorldConfig, picture: &[&str]) -> Grid<Tile> {
        let height = picture.len() as u32;
        let width = picture[0].len() as u32;
        let mut builder = WorldBuilder::new(config);
        builder.tiles = Grid::from_fn(width, height, |point| {
            let mut tile = Tile::new(point, Region::of(point, width, height));
            let row = picture[point.y as usize].as_bytes();
            if row[point.x as usize] == b'#' {
                tile.set_biome(Biome::Plains);
                tile.add_tag(tag::LAND);
            }
            tile
        });
        WaterGenerator.generate(&mut builder).unwrap();
        builder.tiles
    }

    fn assert_exclusive(tiles: &Grid<Tile>) {
        for (point, tile) in tiles.iter() {
            let ocean = tile.has_tag(tag::OCEAN);
            let lake = tile.has_tag(tag::LAKE);
            match tile.biome() {
                Biome::Water => assert!(ocean && !lake, "{}", point),
                Biome::Lake => assert!(lake && !ocean, "{}", point),
                _ => assert!(!ocean && !lake, "{}", point),
            }
        }
    }

    #[test]
    fn test_enclosed_lake() {
        let config = WorldConfig::default();
        let tiles = classify(
            &config,
            &[
                ".......", //
                ".#####.", //
                ".#..#..", //
                ".#####.", //
                ".......", //
            ],
        );
        assert_exclusive(&tiles);
        assert_eq!(tiles[GridPoint::new(2, 2)].biome(), Biome::Lake);
        assert_eq!(tiles[GridPoint::new(3, 2)].biome(), Biome::Lake);
        // Touches ocean on the right
        assert_eq!(tiles[GridPoint::new(5, 2)].biome(), Biome::Water);
        assert!(tiles[GridPoint::new(0, 0)].has_tag(tag::OCEAN));
    }

    #[test]
    fn test_diagonal_gap_is_closed() {
        let config = WorldConfig::default();
        let tiles = classify(
            &config,
            &[
                "..#..", //
                ".#.#.", //
                "#...#", //
                ".#.#.", //
                "..#..", //
            ],
        );
        assert_exclusive(&tiles);
        // Only reachable diagonally, so it's enclosed
        assert_eq!(tiles[GridPoint::new(2, 2)].biome(), Biome::Lake);
        assert_eq!(tiles[GridPoint::new(1, 0)].biome(), Biome::Water);
    }

    #[test]
    fn test_all_water() {
        let config = WorldConfig::default();
        let tiles = classify(&config, &["....", "....", "...."]);
        assert_exclusive(&tiles);
        assert!(tiles.values().all(|tile| tile.has_tag(tag::OCEAN)));
    }

    #[test]
    fn test_all_land() {
        let config = WorldConfig::default();
        let tiles = classify(&config, &["###", "###"]);
        assert_exclusive(&tiles);
        assert!(tiles.values().all(|tile| tile.tags().len() == 1));
    }

    #[test]
    fn test_land_ring_at_edge() {
        // Edge is all land, so there's no ocean at all
        let config = WorldConfig::default();
        let tiles = classify(&config, &["####", "#..#", "####"]);
        assert_exclusive(&tiles);
        assert_eq!(
            tiles.values().filter(|t| t.biome() == Biome::Lake).count(),
            2
        );
    }
}
