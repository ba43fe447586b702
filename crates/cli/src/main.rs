use anyhow::{bail, Context};
use biomap::{
    parse_document, timed, validator::Validate, BiomeRules, RegionMap, SeedId,
    Settings, World, WorldConfig,
};
use log::{info, warn, LevelFilter};
use serde::de::DeserializeOwned;
use simple_logger::SimpleLogger;
use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    process,
};
use structopt::StructOpt;
use strum::{Display, EnumString};

/// CLI for generating biome map worlds.
#[derive(Debug, StructOpt)]
#[structopt(name = "biomap")]
struct Opt {
    /// Path to a config file that defines the world to be generated. Supported
    /// formats: JSON, TOML. Any field left out uses its default.
    #[structopt(short, long)]
    config: Option<PathBuf>,

    /// Path to a settings document (world size, chunk size). Overrides the
    /// settings in `--config`.
    #[structopt(long)]
    settings: Option<PathBuf>,

    /// Path to a region map document. Overrides the regions in `--config`.
    #[structopt(long)]
    regions: Option<PathBuf>,

    /// Path to a biome rules document. Overrides the biome rules in
    /// `--config`.
    #[structopt(long)]
    biome_rules: Option<PathBuf>,

    /// Seed ID for the world. Overrides the seed in `--config`. If no seed is
    /// given anywhere, a random one is used.
    #[structopt(short, long)]
    seed: Option<String>,

    /// Path to an existing .json world file to load, instead of generating a
    /// new world
    #[structopt(short, long)]
    input: Option<PathBuf>,

    /// Directory of saved worlds, named by seed ID. If the world for the seed
    /// is in here, it's loaded. Otherwise a new world is generated with that
    /// seed.
    #[structopt(long)]
    seed_dir: Option<PathBuf>,

    /// If given, the world will be saved to this directory. The exact files
    /// that appear in the directory are defined by the output formats. See
    /// `--output-formats` for more info
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// The format(s) to output the world in. Supported formats:
    ///
    /// json - The full world, named by seed ID. Can be reloaded by this CLI
    ///   and the web app later. Use this for persisting & sharing worlds
    ///
    /// cfg - The config used for the world, in TOML format
    ///
    /// chunks - The world's chunk layout, as JSON
    #[structopt(short = "f", long)]
    output_formats: Vec<OutputFormat>,

    /// The logging level to use during world generation. See
    /// https://docs.rs/log/0.4.11/log/enum.LevelFilter.html for options
    #[structopt(long, default_value = "info")]
    log_level: LevelFilter,
}

/// Different output formats.
#[derive(Copy, Clone, Debug, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
enum OutputFormat {
    // If you change this, make sure to update the help text for
    // `--output-formats`!
    /// Export the world in a serialized JSON format, which can be deserialized
    /// later to recover the world
    Json,
    /// Export the world's config in a human-readable file
    Cfg,
    /// Export the chunks the world is split into for rendering
    Chunks,
}

/// Load a document from a file. TOML files are parsed as TOML, anything else
/// is treated as JSON.
fn load_document<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("error reading {:?}", path))?;
    let is_toml = path.extension().map_or(false, |ext| ext == "toml");
    if is_toml {
        toml::from_str(&contents)
            .with_context(|| format!("error loading {:?}", path))
    } else {
        Ok(parse_document(&path.to_string_lossy(), &contents)?)
    }
}

/// Build the world config from the full config file (if any), then apply
/// each individual override on top.
fn load_config(opt: &Opt) -> anyhow::Result<WorldConfig> {
    let mut config: WorldConfig = match &opt.config {
        Some(path) => load_document(path)?,
        None => WorldConfig::default(),
    };
    if let Some(path) = &opt.settings {
        config.settings = load_document::<Settings>(path)?;
    }
    if let Some(path) = &opt.regions {
        config.regions = load_document::<RegionMap>(path)?;
    }
    if let Some(path) = &opt.biome_rules {
        config.biome_rules = load_document::<BiomeRules>(path)?;
    }
    if let Some(seed) = &opt.seed {
        config.seed = SeedId::from(seed.as_str());
    }
    config.validate().context("invalid world config")?;
    Ok(config)
}

/// Load a world from a JSON file
fn load_world(path: &Path) -> anyhow::Result<World> {
    let file = File::open(path)
        .with_context(|| format!("error opening world file {:?}", path))?;
    let world = World::from_reader(file)
        .with_context(|| format!("error loading world file {:?}", path))?;
    info!("Loaded world {} from {:?}", world.seed_id(), path);
    Ok(world)
}

/// Generate an output form of the world in the given format.
fn gen_output(
    output_dir: &Path,
    output_format: OutputFormat,
    world: &World,
    config: &WorldConfig,
) -> anyhow::Result<()> {
    let (file_name, bytes) = match output_format {
        // Named by seed, so the output dir can be used as a seed dir later
        OutputFormat::Json => {
            (world.seed_id().file_name(), world.to_json().into_bytes())
        }
        OutputFormat::Cfg => {
            let toml = toml::to_string_pretty(config)
                .context("error serializing config")?;
            ("world.toml".to_owned(), toml.into_bytes())
        }
        OutputFormat::Chunks => {
            let chunks = world.chunks(config.settings.grid_chunk_size);
            let json = serde_json::to_string_pretty(&chunks)
                .context("error serializing chunks")?;
            ("chunks.json".to_owned(), json.into_bytes())
        }
    };
    let output_file_path = output_dir.join(file_name);

    timed!(
        format!(
            "Generating {} output and writing to {:?}",
            output_format, &output_file_path
        ),
        log::Level::Info,
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&output_file_path)
                .with_context(|| {
                    format!("error opening output file {:?}", &output_file_path)
                })?;
            file.write_all(&bytes).with_context(|| {
                format!("error writing to file {:?}", &output_file_path)
            })?;
        }
    );

    Ok(())
}

/// Reflect a loaded world in the config, so the cfg output describes the
/// world that was actually loaded
fn sync_config(config: &mut WorldConfig, world: &World) {
    config.seed = world.seed_id().clone();
    config.settings.world_width = world.width();
    config.settings.world_height = world.height();
    config.regions = world.meta().clone();
}

/// Run the CLI with some options
fn run(opt: Opt) -> anyhow::Result<()> {
    SimpleLogger::new().with_level(opt.log_level).init()?;

    let mut config = load_config(&opt)?;
    let world = match (&opt.input, &opt.seed_dir) {
        (Some(input_path), None) => {
            let world = load_world(input_path)?;
            sync_config(&mut config, &world);
            world
        }
        (None, Some(seed_dir)) => {
            let path = seed_dir.join(config.seed.file_name());
            match load_world(&path) {
                Ok(world) => {
                    sync_config(&mut config, &world);
                    world
                }
                Err(err) => {
                    warn!("{:#}; generating a new world instead", err);
                    World::generate(config.clone())?
                }
            }
        }
        (None, None) => World::generate(config.clone())?,
        (Some(_), Some(_)) => bail!(
            "--input (to load a specific world) and --seed-dir (to look up \
            a world by seed) can't be used together"
        ),
    };

    for (biome, count) in world.biome_counts() {
        info!("{}: {} tiles", biome, count);
    }

    // If an output dir was specified, write out output format(s) there
    if let Some(output_dir) = &opt.output {
        if opt.output_formats.is_empty() {
            bail!("output dir was specified, but no output formats were given")
        }
        fs::create_dir_all(output_dir)?;
        for output_format in &opt.output_formats {
            gen_output(output_dir, *output_format, &world, &config)?;
        }
    }

    Ok(())
}

fn main() {
    let exit_code = match run(Opt::from_args()) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    };
    process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_config() {
        let world_config = WorldConfig {
            seed: "LOADED".into(),
            settings: Settings {
                world_width: 15,
                world_height: 12,
                grid_chunk_size: 5,
            },
            regions: serde_json::from_str(r#"{"C": {"landmassSize": "small"}}"#)
                .unwrap(),
            ..Default::default()
        };
        let world = World::generate(world_config.clone()).unwrap();

        let mut config = WorldConfig::default();
        sync_config(&mut config, &world);
        assert_eq!(&config.seed, world.seed_id());
        assert_eq!(config.settings.world_width, 15);
        assert_eq!(config.settings.world_height, 12);
        assert_eq!(config.regions, world_config.regions);
        // Anything the world doesn't record is left alone
        assert_eq!(
            config.settings.grid_chunk_size,
            WorldConfig::default().settings.grid_chunk_size
        );
    }
}
