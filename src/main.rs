use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use planet_synth::biome::Biome;
use planet_synth::config::{DebugBands, PaletteSource, Preset, SurfaceConfig};
use planet_synth::overlay::{Season, SeasonalState};
use planet_synth::params::PlanetSeed;
use planet_synth::render::{self, ExportError};
use planet_synth::{Planet, SampleContext};

/// Procedural planet synthesizer: height, terrain and color maps from a
/// handful of physical parameters.
#[derive(Parser, Debug)]
#[command(name = "planet-synth")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Start from a named planet (jupiter, neptune, venus).
    #[arg(long)]
    preset: Option<Preset>,

    /// Planet mass in Earth masses.
    #[arg(short, long)]
    mass: Option<f32>,

    /// Planet radius in Earth radii.
    #[arg(short, long)]
    radius: Option<f32>,

    /// Surface temperature in Kelvin.
    #[arg(short, long)]
    temperature: Option<f32>,

    /// Biome display name, e.g. "Rocky Highlands".
    #[arg(short, long)]
    biome: Option<String>,

    /// Explicit seed; otherwise derived from the planet parameters.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stable planet identifier used to derive the seed.
    #[arg(long)]
    id: Option<String>,

    /// Map width in pixels (height is half).
    #[arg(short, long, default_value = "1024")]
    width: usize,

    /// Evaluation time in seconds.
    #[arg(long, default_value = "0")]
    time: f32,

    /// Seasonal overlay season (spring or summer).
    #[arg(long)]
    season: Option<String>,

    /// Seasonal timeline position, 0 to 100.
    #[arg(long, default_value = "0")]
    timeline: f32,

    /// Color land by temperature regime instead of biome.
    #[arg(long)]
    temperature_palette: bool,

    /// Render flat debug bands.
    #[arg(long)]
    debug: bool,

    /// Close-up landmark patch size in pixels.
    #[arg(long, default_value = "256")]
    patch_size: usize,

    /// Output directory.
    #[arg(short, long, default_value = "artifacts")]
    output: PathBuf,
}

fn parse_season(s: &str) -> Option<Season> {
    match s.to_ascii_lowercase().as_str() {
        "spring" => Some(Season::Spring),
        "summer" => Some(Season::Summer),
        _ => None,
    }
}

fn run(cli: Cli) -> Result<(), ExportError> {
    let (mut seed, mut config) = match cli.preset {
        Some(p) => p.build(),
        None => (PlanetSeed::default(), SurfaceConfig::default()),
    };
    seed.mass = cli.mass.or(seed.mass);
    seed.radius = cli.radius.or(seed.radius);
    seed.temperature = cli.temperature.or(seed.temperature);
    seed.seed = cli.seed.or(seed.seed);
    seed.identifier = cli.id.clone().or(seed.identifier);
    if let Some(name) = &cli.biome {
        let biome = Biome::from_name(name);
        if biome == Biome::Unknown {
            tracing::warn!(biome = %name, "unknown biome, using fallback ranges and palette");
        }
        seed.biome = Some(biome);
    }
    if cli.temperature_palette {
        config.palette = PaletteSource::Temperature;
    }
    if cli.debug {
        config.debug = Some(DebugBands::default());
    }

    let seasonal = match cli.season.as_deref() {
        Some(s) => match parse_season(s) {
            Some(season) => Some(SeasonalState::new(season, cli.timeline.clamp(0.0, 100.0))),
            None => {
                tracing::warn!(season = %s, "unknown season, overlay disabled");
                None
            }
        },
        None => None,
    };

    let planet = Planet::from_seed(&seed, config);
    let summary = planet.summary();
    tracing::info!(
        seed = summary.seed,
        class = summary.class.name(),
        density = summary.density,
        biome = summary.biome.name(),
        liquid = summary.liquid.name(),
        landmarks = planet.params().landmarks.len(),
        "planet classified"
    );

    let width = cli.width.max(2);
    let height = width / 2;
    let ctx = SampleContext {
        time: cli.time,
        view_dir: None,
        seasonal,
    };

    tracing::info!(width, height, time = cli.time, "generating maps");
    let (map, timings) = planet_synth::generate(&planet, width, height, &ctx);
    for t in &timings {
        tracing::info!(stage = t.name, ms = t.ms, "timing");
    }

    let out_dir = &cli.output;
    let save = |name: &str, rgba: &[u8], w: usize, h: usize| -> Result<(), ExportError> {
        let path = out_dir.join(name);
        render::save_png(&path, rgba, w, h)?;
        tracing::info!(path = %path.display(), "saved");
        Ok(())
    };

    save("map.png", &map.rgba, width, height)?;
    save("heightmap.png", &render::render_heightmap(&map.height), width, height)?;
    save("terrain.png", &render::render_terrain_types(&map.terrain), width, height)?;
    save("relief.png", &map.relief_rgba, width, height)?;

    let size = cli.patch_size.max(2);
    for i in 0..planet.params().landmarks.len() {
        if let Some(patch) = planet.landmark_patch(i, size) {
            save(&format!("landmark-{i}.png"), &patch.rgba, size, size)?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "export failed");
            ExitCode::FAILURE
        }
    }
}
