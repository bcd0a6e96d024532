pub mod biome;
pub mod classifier;
pub mod color;
pub mod config;
pub mod elevation;
pub mod grid;
pub mod landmarks;
pub mod noise;
pub mod overlay;
pub mod params;
pub mod render;
pub mod rng;

use std::time::Instant;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use biome::{Biome, get_surface_deposits};
use classifier::{LiquidType, PlanetClass, is_liquid_available};
use color::Rgb;
use config::SurfaceConfig;
use elevation::{HeightField, MAX_CONTINENTS, Relief, TerrainType, determine_terrain_type};
use grid::Grid;
use landmarks::profile::{ProfilePatch, build_profile_patch};
use landmarks::{Landmark, active_landmarks};
use overlay::{GasPhase, SeasonalFeature, SeasonalState, apply_seasonal_overlay};
use params::{PlanetParameters, PlanetSeed, merge_with_defaults};
use render::{Shading, SurfacePalette};

/// Per-query inputs supplied by the host. Time is explicit; nothing here
/// reads a clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleContext {
    pub time: f32,
    pub view_dir: Option<Vec3>,
    pub seasonal: Option<SeasonalState>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub elevation: f32,
    pub terrain: TerrainType,
    pub color: Rgb,
}

/// Classification summary reported by the hosts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub seed: u64,
    pub class: PlanetClass,
    pub density: f32,
    pub biome: Biome,
    pub liquid: LiquidType,
    pub liquid_available: bool,
    pub surface_deposits: Vec<String>,
    pub active_landmarks: usize,
}

/// A finalized planet, ready for evaluation from any number of threads.
/// Landmarks are resolved once here and never re-derived per sample.
#[derive(Clone, Debug)]
pub struct Planet {
    params: PlanetParameters,
    config: SurfaceConfig,
    class: PlanetClass,
    landmarks: Vec<Landmark>,
    palette: SurfacePalette,
    seasonal_features: Vec<SeasonalFeature>,
}

impl Planet {
    pub fn new(params: PlanetParameters, mut config: SurfaceConfig) -> Self {
        let params = params.finalize();
        if config.continent_count > MAX_CONTINENTS {
            tracing::debug!(
                requested = config.continent_count,
                max = MAX_CONTINENTS,
                "clamping continent count"
            );
            config.continent_count = MAX_CONTINENTS;
        }
        let class = params.class();
        let landmarks = active_landmarks(&params.landmarks, class);
        let palette = SurfacePalette::resolve(&config.palette, &params);

        tracing::debug!(
            seed = params.seed,
            class = class.name(),
            biome = params.biome.name(),
            liquid = params.liquid_type.name(),
            landmarks = landmarks.len(),
            "planet ready"
        );

        Self {
            params,
            config,
            class,
            landmarks,
            palette,
            seasonal_features: SeasonalFeature::defaults(),
        }
    }

    pub fn from_seed(seed: &PlanetSeed, config: SurfaceConfig) -> Self {
        Self::new(merge_with_defaults(seed), config)
    }

    pub fn params(&self) -> &PlanetParameters {
        &self.params
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn class(&self) -> PlanetClass {
        self.class
    }

    /// Landmarks taking part in evaluation.
    pub fn active_landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn palette(&self) -> &SurfacePalette {
        &self.palette
    }

    pub fn with_seasonal_features(mut self, features: Vec<SeasonalFeature>) -> Self {
        self.seasonal_features = features;
        self
    }

    pub fn height_field(&self) -> HeightField<'_> {
        HeightField {
            params: &self.params,
            config: &self.config,
            landmarks: &self.landmarks,
            class: self.class,
        }
    }

    pub fn shading(&self) -> Shading<'_> {
        Shading {
            params: &self.params,
            config: &self.config,
            palette: &self.palette,
        }
    }

    pub fn elevation(&self, p: Vec3, time: f32) -> f32 {
        self.height_field().height(p, time)
    }

    pub fn terrain_type(&self, elevation: f32) -> TerrainType {
        determine_terrain_type(elevation, self.params.water_level)
    }

    /// Surface color for an already computed elevation.
    pub fn color_at(&self, p: Vec3, elevation: f32, ctx: &SampleContext) -> Rgb {
        let p = p.normalize_or_zero();
        let shading = self.shading();
        if let Some(bands) = &self.config.debug {
            return shading.debug_color(elevation, bands);
        }

        let phase = GasPhase::at(ctx.time);
        match self.class {
            PlanetClass::Gaseous => shading.gas_color(p, &phase, ctx.view_dir),
            PlanetClass::Terrestrial => {
                let mask = self.height_field().continent_mask(p);
                let c = shading.surface_color(p, elevation, mask, &phase, ctx.view_dir);
                match &ctx.seasonal {
                    Some(state) => apply_seasonal_overlay(c, p, state, &self.seasonal_features),
                    None => c,
                }
            }
        }
    }

    /// Elevation, terrain class and color at unit direction `p`.
    pub fn sample(&self, p: Vec3, ctx: &SampleContext) -> Sample {
        let elevation = self.elevation(p, ctx.time);
        Sample {
            elevation,
            terrain: self.terrain_type(elevation),
            color: self.color_at(p, elevation, ctx),
        }
    }

    pub fn relief(&self, p: Vec3) -> Relief {
        self.height_field().relief(p)
    }

    /// Close-up patch around one of the planet's landmarks (all categories).
    pub fn landmark_patch(&self, index: usize, size: usize) -> Option<ProfilePatch> {
        let landmark = self.params.landmarks.get(index)?;
        Some(build_profile_patch(
            landmark,
            self.params.surface_roughness,
            size,
            1.0,
            self.params.seed,
        ))
    }

    pub fn summary(&self) -> Summary {
        Summary {
            seed: self.params.seed,
            class: self.class,
            density: self.params.density(),
            biome: self.params.biome,
            liquid: self.params.liquid_type,
            liquid_available: is_liquid_available(self.params.temperature, self.params.liquid_type),
            surface_deposits: get_surface_deposits(self.params.biome)
                .iter()
                .map(|s| s.to_string())
                .collect(),
            active_landmarks: self.landmarks.len(),
        }
    }
}

pub struct Map {
    pub w: usize,
    pub h: usize,
    pub height: Grid<f32>,
    pub terrain: Grid<TerrainType>,
    pub rgba: Vec<u8>,
    pub relief_rgba: Vec<u8>,
}

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

fn stage<T>(timings: &mut Vec<Timing>, name: &'static str, f: impl FnOnce() -> T) -> T {
    let t = Instant::now();
    let out = f();
    let ms = t.elapsed().as_secs_f64() * 1000.0;
    tracing::debug!(stage = name, ms, "stage done");
    timings.push(Timing { name, ms });
    out
}

/// Rasterize `planet` into a `w`×`h` equirectangular map.
pub fn generate(planet: &Planet, w: usize, h: usize, ctx: &SampleContext) -> (Map, Vec<Timing>) {
    let mut timings = Vec::new();
    let total_start = Instant::now();
    let field = planet.height_field();

    // 1. Elevation
    let height = stage(&mut timings, "elevation", || {
        elevation::build_height_grid(&field, w, h, ctx.time)
    });

    // 2. Coarse terrain classes
    let terrain = stage(&mut timings, "terrain", || {
        elevation::classify_grid(&height, planet.params.water_level)
    });

    // 3. Surface color
    let rgba = stage(&mut timings, "color", || {
        render::render_map(&height, |p, e| planet.color_at(p, e, ctx))
    });

    // 4. Coarse relief
    let relief_rgba = stage(&mut timings, "relief", || render::render_relief(&field, w, h));

    let total_ms = total_start.elapsed().as_secs_f64() * 1000.0;
    timings.push(Timing {
        name: "TOTAL",
        ms: total_ms,
    });

    let map = Map {
        w,
        h,
        height,
        terrain,
        rgba,
        relief_rgba,
    };

    (map, timings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DebugBands, Preset};
    use crate::overlay::Season;

    fn earth() -> Planet {
        Planet::from_seed(
            &PlanetSeed::new(1.0, 1.0, 288.0, Biome::RockyHighlands),
            SurfaceConfig::default(),
        )
    }

    #[test]
    fn test_planet_filters_landmarks_by_class() {
        let p = earth();
        assert_eq!(p.params().landmarks.len(), 2);
        assert_eq!(p.active_landmarks().len(), 1);
        assert_eq!(p.active_landmarks()[0].classification_id, "default-terrestrial");
    }

    #[test]
    fn test_sample_is_deterministic() {
        let a = earth();
        let b = earth();
        let ctx = SampleContext { time: 2.5, ..Default::default() };
        for i in 0..50 {
            let dir = grid::equirect_direction(i % 10, i / 10, 10, 5);
            assert_eq!(a.sample(dir, &ctx), b.sample(dir, &ctx));
        }
    }

    #[test]
    fn test_sample_terrain_matches_classifier() {
        let p = earth();
        let ctx = SampleContext::default();
        let s = p.sample(Vec3::new(0.1, 0.5, 0.8), &ctx);
        assert_eq!(s.terrain, determine_terrain_type(s.elevation, p.params().water_level));
    }

    #[test]
    fn test_continent_count_clamped() {
        let config = SurfaceConfig { continent_count: 40, ..Default::default() };
        let p = Planet::new(PlanetParameters::default(), config);
        assert_eq!(p.config().continent_count, MAX_CONTINENTS);
    }

    #[test]
    fn test_debug_mode_uses_flat_bands() {
        let config = SurfaceConfig { debug: Some(DebugBands::default()), ..Default::default() };
        let p = Planet::new(PlanetParameters::default(), config);
        let c = p.color_at(Vec3::X, -0.15, &SampleContext::default());
        assert_eq!(c, p.palette().ocean);
    }

    #[test]
    fn test_seasonal_overlay_tints_poles() {
        let p = earth();
        let plain = SampleContext::default();
        let winter = SampleContext {
            seasonal: Some(SeasonalState::new(Season::Spring, 0.0)),
            ..Default::default()
        };
        let pole = Vec3::Y;
        assert_ne!(p.sample(pole, &plain).color, p.sample(pole, &winter).color);
    }

    #[test]
    fn test_no_seasonal_features_leaves_equator_untouched() {
        let p = earth().with_seasonal_features(Vec::new());
        let plain = SampleContext::default();
        let seasonal = SampleContext {
            seasonal: Some(SeasonalState::new(Season::Summer, 50.0)),
            ..Default::default()
        };
        let equator = Vec3::new(0.6, 0.0, 0.8);
        assert_eq!(p.sample(equator, &plain).color, p.sample(equator, &seasonal).color);
    }

    #[test]
    fn test_generate_dimensions_and_timings() {
        let (planet_seed, config) = Preset::Jupiter.build();
        let planet = Planet::from_seed(&planet_seed, config);
        let (map, timings) = generate(&planet, 24, 12, &SampleContext::default());
        assert_eq!(map.rgba.len(), 24 * 12 * 4);
        assert_eq!(map.relief_rgba.len(), 24 * 12 * 4);
        assert_eq!(map.height.data.len(), 24 * 12);
        let names: Vec<_> = timings.iter().map(|t| t.name).collect();
        assert_eq!(names, ["elevation", "terrain", "color", "relief", "TOTAL"]);
    }

    #[test]
    fn test_landmark_patch() {
        let p = earth();
        let patch = p.landmark_patch(1, 8).unwrap();
        assert_eq!(patch.rgba.len(), 8 * 8 * 4);
        assert!(p.landmark_patch(5, 8).is_none());
    }

    #[test]
    fn test_summary() {
        let s = earth().summary();
        assert_eq!(s.class, PlanetClass::Terrestrial);
        assert_eq!(s.liquid, LiquidType::Water);
        assert!(s.liquid_available);
        assert!(!s.surface_deposits.is_empty());
    }
}
