use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use base64::Engine;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use planet_synth::config::{DebugBands, Preset, SurfaceConfig};
use planet_synth::overlay::SeasonalState;
use planet_synth::params::{PlanetParameters, PlanetSeed};
use planet_synth::render::{self, ExportError};
use planet_synth::{Planet, SampleContext, Summary};

const MAX_WIDTH: usize = 4096;

#[derive(Deserialize)]
struct GenerateRequest {
    preset: Option<Preset>,
    #[serde(default)]
    planet: PlanetSeed,
    surface: Option<SurfaceConfig>,
    width: Option<usize>,
    height: Option<usize>,
    #[serde(default)]
    time: f32,
    seasonal: Option<SeasonalState>,
    debug: Option<DebugBands>,
    /// Also render close-up patches for every landmark.
    #[serde(default)]
    landmarks: bool,
}

#[derive(Serialize)]
struct GenerateResponse {
    params: PlanetParameters,
    summary: Summary,
    layers: Vec<Layer>,
    timings: Vec<TimingEntry>,
    width: usize,
    height: usize,
}

#[derive(Serialize)]
struct Layer {
    name: String,
    data_url: String,
}

#[derive(Serialize)]
struct TimingEntry {
    name: String,
    ms: f64,
}

fn data_url(rgba: &[u8], w: usize, h: usize) -> Result<String, ExportError> {
    let png = render::encode_png(rgba, w, h)?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(&png);
    Ok(format!("data:image/png;base64,{}", b64))
}

/// Fields set in `overlay` win over `base`.
fn overlay_seed(base: PlanetSeed, overlay: PlanetSeed) -> PlanetSeed {
    PlanetSeed {
        identifier: overlay.identifier.or(base.identifier),
        seed: overlay.seed.or(base.seed),
        mass: overlay.mass.or(base.mass),
        radius: overlay.radius.or(base.radius),
        temperature: overlay.temperature.or(base.temperature),
        biome: overlay.biome.or(base.biome),
        surface_roughness: overlay.surface_roughness.or(base.surface_roughness),
        terrain_erosion: overlay.terrain_erosion.or(base.terrain_erosion),
        water_height: overlay.water_height.or(base.water_height),
        water_level: overlay.water_level.or(base.water_level),
        biomass_level: overlay.biomass_level.or(base.biomass_level),
        plate_tectonics: overlay.plate_tectonics.or(base.plate_tectonics),
        soil_type: overlay.soil_type.or(base.soil_type),
        soil_texture: overlay.soil_texture.or(base.soil_texture),
        atmosphere_strength: overlay.atmosphere_strength.or(base.atmosphere_strength),
        salinity: overlay.salinity.or(base.salinity),
        mountain_height: overlay.mountain_height.or(base.mountain_height),
        cloud_count: overlay.cloud_count.or(base.cloud_count),
        volcanic_activity: overlay.volcanic_activity.or(base.volcanic_activity),
        landmarks: overlay.landmarks.or(base.landmarks),
        custom_colors: overlay.custom_colors.or(base.custom_colors),
    }
}

fn build_response(req: GenerateRequest) -> Result<GenerateResponse, ExportError> {
    let width = req.width.unwrap_or(1024).clamp(2, MAX_WIDTH);
    let height = req.height.unwrap_or(width / 2).clamp(1, MAX_WIDTH);

    let (base_seed, base_config) = match req.preset {
        Some(p) => p.build(),
        None => (PlanetSeed::default(), SurfaceConfig::default()),
    };
    let seed = overlay_seed(base_seed, req.planet);
    let mut config = req.surface.unwrap_or(base_config);
    if req.debug.is_some() {
        config.debug = req.debug;
    }

    let planet = Planet::from_seed(&seed, config);
    let ctx = SampleContext {
        time: req.time,
        view_dir: None,
        seasonal: req.seasonal,
    };
    let (map, timings) = planet_synth::generate(&planet, width, height, &ctx);

    let mut layers = vec![
        Layer {
            name: "map".into(),
            data_url: data_url(&map.rgba, width, height)?,
        },
        Layer {
            name: "heightmap".into(),
            data_url: data_url(&render::render_heightmap(&map.height), width, height)?,
        },
        Layer {
            name: "terrain".into(),
            data_url: data_url(&render::render_terrain_types(&map.terrain), width, height)?,
        },
        Layer {
            name: "relief".into(),
            data_url: data_url(&map.relief_rgba, width, height)?,
        },
    ];

    if req.landmarks {
        let size = 256;
        for (i, landmark) in planet.params().landmarks.iter().enumerate() {
            if let Some(patch) = planet.landmark_patch(i, size) {
                layers.push(Layer {
                    name: format!("landmark-{i}:{}", landmark.kind.name()),
                    data_url: data_url(&patch.rgba, size, size)?,
                });
            }
        }
    }

    let timing_entries = timings
        .iter()
        .map(|t| TimingEntry {
            name: t.name.to_string(),
            ms: t.ms,
        })
        .collect();

    Ok(GenerateResponse {
        params: planet.params().clone(),
        summary: planet.summary(),
        layers,
        timings: timing_entries,
        width,
        height,
    })
}

async fn generate_handler(
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, StatusCode> {
    let response = tokio::task::spawn_blocking(move || build_response(req))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "generation task failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            tracing::error!(error = %e, "encoding layers failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    tracing::info!(
        seed = response.summary.seed,
        class = response.summary.class.name(),
        width = response.width,
        height = response.height,
        "planet generated"
    );
    Ok(Json(response))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app = Router::new()
        .route("/api/planet", post(generate_handler))
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!("planet-synth server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
