use biomap::{
    parse_document, tag, Biome, BlobId, BlobType, GridPoint, Region, Tile,
    World, WorldConfig,
};

/// Check the invariants that every generated world has to uphold
fn assert_world_invariants(world: &World) {
    let (width, height) = (world.width(), world.height());
    for (point, tile) in world.terrain_map().iter() {
        assert_eq!(tile.position(), point);
        assert_eq!(tile.region(), Region::of(point, width, height));
        assert_eq!(world.biome_map()[point], tile.biome());
        assert_eq!(world.height_map()[point], tile.elevation());

        let ocean = tile.has_tag(tag::OCEAN);
        let lake = tile.has_tag(tag::LAKE);
        match tile.biome() {
            Biome::Water => assert!(ocean && !lake, "bad water at {}", point),
            Biome::Lake => assert!(lake && !ocean, "bad lake at {}", point),
            _ => {
                assert!(!ocean && !lake, "land at {} has water tags", point);
                assert!(tile.has_tag(tag::LAND));
                assert!(tile.elevation() >= 0.1);
                assert!(tile.meta().is_some());
            }
        }
        if tile.is_water() {
            assert_eq!(tile.elevation(), 0.0, "water at {} has height", point);
            assert!(tile.meta().is_none());
        }
    }
}

/// Sanity check, make sure the default world config doesn't horrifically crash
/// and burn.
///
/// **NOTE:** the default world config uses a random seed so this could
/// _potentially_ have flaky failures
#[test]
fn test_world_gen_default() {
    let config = WorldConfig::default();
    let world = World::generate(config.clone()).unwrap();
    // Default config uses a random seed each time, so we want to log the
    // config to make sure we can reproduce the failure
    assert_eq!(
        world.terrain_map().len(),
        625,
        "Default config failed: {:?}",
        config
    );
    assert_world_invariants(&world);
    assert_eq!(world.seed_id(), &config.seed);
    assert_eq!(world.meta(), &config.regions);
}

/// A single continent in the middle of a small world
#[test]
fn test_world_gen_center_continent() {
    let config: WorldConfig = parse_document(
        "config",
        r#"{
            "seed": "CENTERCONTINENT",
            "settings": {"worldWidth": 20, "worldHeight": 20},
            "generation": {"placementAttempts": 1000},
            "regions": {"C": {"count": 1, "radius": 5, "type": "continent"}},
            "biomeRules": {"C": {"biomeWeights": {"plains": 1}}}
        }"#,
    )
    .unwrap();
    let world = World::generate(config).unwrap();
    assert_world_invariants(&world);

    let land: Vec<&Tile> = world
        .terrain_map()
        .values()
        .filter(|tile| !tile.is_water())
        .collect();
    assert!(!land.is_empty());
    for tile in &land {
        assert_eq!(tile.biome(), Biome::Plains);
        assert!(tile.has_tag("continent"));
        let meta = tile.meta().unwrap();
        assert_eq!(meta.blob_id, BlobId(1));
        assert_eq!(meta.blob_type, BlobType::Continent);
    }

    // The center always gets claimed, and it has to be in the center region
    let center = world
        .terrain_map()
        .iter()
        .find(|(_, tile)| tile.meta().map(|meta| meta.distance) == Some(0.0))
        .map(|(point, _)| point)
        .unwrap();
    assert_eq!(Region::of(center, 20, 20), Region::Center);

    // Jitter can't push anything this far out over the threshold
    for (point, tile) in world.terrain_map().iter() {
        let dx = f64::from(point.x) - f64::from(center.x);
        let dy = f64::from(point.y) - f64::from(center.y);
        if (dx * dx + dy * dy).sqrt() >= 5.0 * 0.85 {
            assert!(tile.is_water(), "{} should be water", point);
        }
    }
    // Corners are always open ocean
    assert!(world.terrain_map()[GridPoint::new(0, 0)].has_tag(tag::OCEAN));
    assert!(world.terrain_map()[GridPoint::new(19, 19)].has_tag(tag::OCEAN));
}

#[test]
fn test_world_gen_deterministic() {
    let config = WorldConfig {
        seed: "DETERMINISTIC".into(),
        ..Default::default()
    };
    let first = World::generate(config.clone()).unwrap();
    let second = World::generate(config.clone()).unwrap();
    assert_eq!(first.terrain_map(), second.terrain_map());

    let other = World::generate(WorldConfig {
        seed: "SOMETHINGELSE".into(),
        ..config
    })
    .unwrap();
    assert_ne!(first.terrain_map(), other.terrain_map());
}

/// Worlds too small for some regions to have any tiles
#[test]
fn test_world_gen_tiny() {
    for &(width, height) in &[(1, 1), (2, 2), (1, 5), (4, 2)] {
        let mut config = WorldConfig {
            seed: "TINY".into(),
            ..Default::default()
        };
        config.settings.world_width = width;
        config.settings.world_height = height;
        let world = World::generate(config).unwrap();
        assert_eq!(world.terrain_map().len(), (width * height) as usize);
        assert_world_invariants(&world);
    }
}

#[test]
fn test_world_round_trip() {
    let config = WorldConfig {
        seed: "ROUNDTRIP".into(),
        ..Default::default()
    };
    let world = World::generate(config).unwrap();
    let json = world.to_json();
    let loaded = World::from_json(&json).unwrap();
    assert_eq!(loaded, world);
    assert_eq!(loaded.generated_at(), world.generated_at());

    let loaded = World::from_reader(json.as_bytes()).unwrap();
    assert_eq!(loaded.terrain_map(), world.terrain_map());

    // The saved shape is what the browser app reads
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["seedID"], "ROUNDTRIP");
    let fields = ["generatedAt", "terrainMap", "biomeMap", "heightMap", "meta"];
    for field in &fields {
        assert!(value.get(field).is_some(), "missing {}", field);
    }
    assert_eq!(value["terrainMap"].as_array().unwrap().len(), 25);
    assert_eq!(value["terrainMap"][0][0]["region"], "NW");
}
