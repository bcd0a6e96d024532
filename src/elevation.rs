use glam::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::biome::{BiomePalette, SoilType, get_biome_colors};
use crate::classifier::{PlanetClass, TerrainBands, normalize_height};
use crate::color::Rgb;
use crate::config::SurfaceConfig;
use crate::grid::{Grid, equirect_direction};
use crate::landmarks::{
    Landmark, TerrainInfluence, apply_landmark_effect, calculate_landmark_influence,
    calculate_landmark_terrain_influence,
};
use crate::noise::{fbm, gradient_noise3, lerp, ridged, smoothstep};
use crate::overlay::GasPhase;
use crate::params::{PlanetParameters, SoilTexture};
use crate::rng::{seed_u32, splitmix32};

pub const MAX_CONTINENTS: usize = 10;
pub const CRATER_COUNT: usize = 6;

const SALT_CONTINENT_EDGE: u64 = 0xC0A5_7ED6_E000_0001;
const SALT_ISLANDS: u64 = 0x15A1_A4D5_0000_0002;
const SALT_BASE: u64 = 0xBA5E_E1EF_DEAD_CAFE;
const SALT_RIDGE: u64 = 0x21D6_E500_CAFE_BABE;
const SALT_PLAINS: u64 = 0x91A1_45EE_0000_0003;
const SALT_CRATERS: u64 = 0xC4A7_E45A_0000_0004;
const SALT_TEXTURE: u64 = 0x7E47_04E5_0000_0005;
const SALT_ROUGHNESS: u64 = 0x2046_4E55_0000_0006;
const SALT_STORMS: u64 = 0x5702_4A55_0000_0007;
const SALT_CYCLONES: u64 = 0xC7C1_0E55_0000_0008;
const SALT_RELIEF: u64 = 0x2E11_EF00_0000_0009;
const SALT_MICRO: u64 = 0x4C20_0000_0000_000A;
const SALT_VOLCANIC: u64 = 0x501C_A41C_0000_000B;

const GOLDEN_ANGLE: f32 = 2.399_963;

/// Coarse four-way terrain classification shared by the height field and
/// the relief map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainType {
    OceanFloor,
    Beach,
    #[default]
    Regular,
    Mountain,
}

impl TerrainType {
    pub const ALL: [TerrainType; 4] = [
        TerrainType::OceanFloor,
        TerrainType::Beach,
        TerrainType::Regular,
        TerrainType::Mountain,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TerrainType::OceanFloor => "ocean_floor",
            TerrainType::Beach => "beach",
            TerrainType::Regular => "regular",
            TerrainType::Mountain => "mountain",
        }
    }
}

/// Bucket a raw height against `water_level`. Bands are half-open, so a
/// height exactly on a threshold lands in the higher band.
pub fn determine_terrain_type(height: f32, water_level: f32) -> TerrainType {
    let n = normalize_height(height);
    let bands = TerrainBands::for_water_level(water_level);
    if n < bands.ocean_floor_max {
        TerrainType::OceanFloor
    } else if n < bands.beach_max {
        TerrainType::Beach
    } else if n < bands.regular_max {
        TerrainType::Regular
    } else {
        TerrainType::Mountain
    }
}

/// Stable per-planet phase in [0, 1000), used to rotate continents and craters.
#[inline]
pub fn seed_phase(seed: u64) -> f32 {
    (seed % 1000) as f32
}

/// Land likelihood in [0, 1]: the max over up to ten noisy continent discs,
/// plus a faint island term.
pub fn continent_mask(p: Vec3, seed: u64, count: usize, size: f32) -> f32 {
    let count = count.min(MAX_CONTINENTS);
    let phase = seed_phase(seed);
    let offset = Vec3::new(0.1, 0.2, 0.3) * phase;
    let edge_seed = seed_u32(seed, SALT_CONTINENT_EDGE);

    let mut mask = 0.0f32;
    for i in 0..count {
        let f = i as f32 / count as f32;
        let a1 = f * 6.28 + phase * 0.1;
        let a2 = f * 3.14 + phase * 0.2;
        let centre = Vec3::new(a1.sin() * a2.cos(), a1.sin() * a2.sin(), a1.cos());

        let shape = if size > 0.0 {
            smoothstep(size, 0.0, p.distance(centre))
        } else {
            0.0
        };
        let edge = fbm(p * 2.0 + offset + centre, edge_seed, 3) * 0.5;
        mask = mask.max(shape + edge * 0.3);
    }

    let islands = fbm(p * 3.0 + offset, seed_u32(seed, SALT_ISLANDS), 4) * 0.3;
    (mask + islands * 0.3).clamp(0.0, 1.0)
}

fn crater_centre(k: usize, phase: f32) -> Vec3 {
    let y = 1.0 - (k as f32 + 0.5) / CRATER_COUNT as f32 * 2.0;
    let r = (1.0 - y * y).max(0.0).sqrt();
    let theta = k as f32 * GOLDEN_ANGLE + phase;
    Vec3::new(r * theta.cos(), y, r * theta.sin())
}

/// Six shallow bowls on a Fibonacci spiral, each with a raised rim over its
/// outer fifth. Distances are chords on the unit sphere.
pub fn crater_field(p: Vec3, seed: u64) -> f32 {
    const DEPTH: f32 = 0.015;
    let phase = seed_phase(seed);
    let s = seed_u32(seed, SALT_CRATERS);

    let mut total = 0.0;
    for k in 0..CRATER_COUNT {
        let jitter = splitmix32(s.wrapping_add(k as u32)) as f32 / u32::MAX as f32;
        let radius = 0.15 + 0.1 * jitter;
        let t = p.distance(crater_centre(k, phase)) / radius;
        if t >= 1.0 {
            continue;
        }
        total += if t > 0.8 {
            DEPTH * 0.5 * (1.0 - (t - 0.8) * 5.0)
        } else {
            -DEPTH * (1.0 - (t / 0.8).powi(2))
        };
    }
    total
}

/// Fine relief subtracted from terrestrial terrain, shaped by soil texture
/// and amplified or damped by soil type.
pub fn soil_texture_detail(p: Vec3, texture: SoilTexture, soil: SoilType, seed: u64) -> f32 {
    let s = seed_u32(seed, SALT_TEXTURE);
    let n = |q: Vec3| gradient_noise3(q, s);
    let (scale, depth) = texture.pattern();

    let pattern = match texture {
        SoilTexture::Cracked => {
            let wide = if n(p * scale * 2.0).abs() < 0.1 { depth * 1.5 } else { 0.0 };
            let fine = if n(p * scale * 5.0).abs() < 0.05 { depth * 0.8 } else { 0.0 };
            wide + fine
        }
        SoilTexture::Layered => (n(p * scale * 0.5) * 20.0).sin() * depth * 0.8,
        SoilTexture::Porous => {
            if n(p * scale * 4.0) > 0.8 { depth * 1.5 } else { 0.0 }
        }
        SoilTexture::Grainy => n(p * scale * 8.0) * n(p * scale * 12.0) * depth,
        SoilTexture::Crystalline => {
            if n(p * scale * 3.0).abs() > 0.7 { depth * 1.2 } else { 0.0 }
        }
        SoilTexture::Smooth | SoilTexture::Rough | SoilTexture::Unknown => {
            n(p * scale) * depth * 0.5
        }
    };

    let soil_gain = match soil {
        SoilType::Volcanic => 1.5,
        SoilType::Sandy => 0.7,
        _ => 1.0,
    };
    pattern * 0.7 * soil_gain * 0.08
}

/// Summed per-type terrain influence of every landmark at `p`.
pub fn landmark_terrain(p: Vec3, landmarks: &[Landmark]) -> TerrainInfluence {
    landmarks
        .iter()
        .map(|l| calculate_landmark_terrain_influence(p, l))
        .fold(TerrainInfluence::default(), |acc, t| TerrainInfluence {
            height: acc.height + t.height,
            roughness: acc.roughness + t.roughness,
        })
}

/// Output of the coarse relief path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Relief {
    pub height: f32,
    pub offset: f32,
    pub terrain: TerrainType,
    pub color: Rgb,
}

/// Everything the height synthesizer reads for one planet. Borrowed, so
/// evaluation is free to run from any number of threads.
#[derive(Clone, Copy)]
pub struct HeightField<'a> {
    pub params: &'a PlanetParameters,
    pub config: &'a SurfaceConfig,
    pub landmarks: &'a [Landmark],
    pub class: PlanetClass,
}

impl HeightField<'_> {
    pub fn continent_mask(&self, p: Vec3) -> f32 {
        continent_mask(
            p.normalize_or_zero(),
            self.params.seed,
            self.config.continent_count,
            self.config.continent_size,
        )
    }

    /// Elevation at unit direction `p` and time `time`. Terrestrial terrain
    /// ignores time.
    pub fn height(&self, p: Vec3, time: f32) -> f32 {
        let p = p.normalize_or_zero();
        match self.class {
            PlanetClass::Terrestrial => self.terrestrial(p),
            PlanetClass::Gaseous => self.gaseous(p, &GasPhase::at(time)),
        }
    }

    fn terrestrial(&self, p: Vec3) -> f32 {
        let params = self.params;
        let seed = params.seed;
        let ns = self.config.noise_scale;

        let mask = self.continent_mask(p);
        let base = fbm(p * params.surface_roughness * ns * 2.0, seed_u32(seed, SALT_BASE), 4);
        let landmass = smoothstep(-0.3, 0.3, base);
        let ridge = ridged(p * 3.0 * ns, seed_u32(seed, SALT_RIDGE));
        let plains = 0.01 * fbm(p * 6.0, seed_u32(seed, SALT_PLAINS), 3);
        let craters = crater_field(p, seed);
        let volcanic = fbm(p * 8.0 * ns, seed_u32(seed, SALT_VOLCANIC), 2).powi(3)
            * params.volcanic_activity
            * mask
            * 0.1;

        let lm = landmark_terrain(p, self.landmarks);
        let extra_roughness = if lm.roughness > 0.0 {
            gradient_noise3(p * 20.0 * lm.roughness, seed_u32(seed, SALT_ROUGHNESS)) * lm.roughness * 0.2
        } else {
            0.0
        };
        let texture = soil_texture_detail(p, params.soil_texture, params.soil_type, seed);

        let e = -0.12
            + 0.16 * mask * (0.6 + 0.4 * landmass)
            + 0.04 * base * mask
            + 0.08 * params.mountain_height * ridge * mask * landmass
            + plains
            + craters
            + volcanic
            + lm.height
            + extra_roughness
            - texture;
        e * (1.0 - 0.3 * params.terrain_erosion)
    }

    fn gaseous(&self, p: Vec3, phase: &GasPhase) -> f32 {
        let seed = self.params.seed;
        let bands = (p.y * 10.0 + phase.band).sin() * 0.5;
        let storms = gradient_noise3(
            p * Vec3::new(2.0, 8.0, 2.0) + Vec3::splat(phase.storm),
            seed_u32(seed, SALT_STORMS),
        ) * 0.5;
        let cyclones = gradient_noise3(
            p * Vec3::new(4.0, 1.0, 4.0) + Vec3::splat(phase.cyclone),
            seed_u32(seed, SALT_CYCLONES),
        ) * 0.25;
        let lm = landmark_terrain(p, self.landmarks);
        0.05 * (lerp(bands, storms, 0.5) + cyclones) + 0.5 * lm.height
    }

    /// Coarse mesh-style relief: high-octave noise reshaped by the generic
    /// landmark influence, classified and colored from the 4-band palette.
    pub fn relief(&self, p: Vec3) -> Relief {
        let params = self.params;
        let p = p.normalize_or_zero();
        let s = seed_u32(params.seed, SALT_RELIEF);

        let mut h = match self.class {
            PlanetClass::Terrestrial => {
                fbm(p * params.surface_roughness * 1.2, s, 7)
                    * params.mountain_height
                    * (1.0 - 0.3 * params.terrain_erosion)
            }
            PlanetClass::Gaseous => 0.1 * gradient_noise3(p * 2.0 * params.surface_roughness, s),
        };
        for lm in self.landmarks {
            let influence = calculate_landmark_influence(p, lm, params.radius);
            if influence > 0.0 {
                h = apply_landmark_effect(h, influence, lm.influence_type);
            }
        }

        let scale = match self.class {
            PlanetClass::Terrestrial => 0.08,
            PlanetClass::Gaseous => 0.05,
        };
        let offset = h * scale * params.surface_roughness * 1.5;
        let terrain = determine_terrain_type(offset, params.water_level);

        let palette = params
            .custom_colors
            .unwrap_or_else(|| get_biome_colors(params.biome));
        let mut color = relief_color(&palette, params.soil_type, terrain);
        if terrain == TerrainType::Mountain {
            let micro = gradient_noise3(p * 50.0, seed_u32(params.seed, SALT_MICRO));
            color = color.scale(if micro < 0.0 { 0.9 } else { 1.1 }).clamped();
        }

        Relief { height: h, offset, terrain, color }
    }
}

fn relief_color(palette: &BiomePalette, soil: SoilType, terrain: TerrainType) -> Rgb {
    let (base, ratio) = match terrain {
        TerrainType::OceanFloor => (palette.ocean_floor, 0.3),
        TerrainType::Beach => (palette.beach, 0.6),
        TerrainType::Regular => (palette.regular, 0.7),
        TerrainType::Mountain => (palette.mountain, 0.8),
    };
    base.lerp(soil.base_color(), ratio)
}

/// Equirectangular elevation grid, one sample per pixel centre.
pub fn build_height_grid(field: &HeightField, w: usize, h: usize, time: f32) -> Grid<f32> {
    let mut height = Grid::<f32>::new(w, h);
    height
        .data
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = field.height(equirect_direction(x, y, w, h), time);
            }
        });
    height
}

/// Per-pixel terrain classes for a height grid.
pub fn classify_grid(height: &Grid<f32>, water_level: f32) -> Grid<TerrainType> {
    let mut out = Grid::<TerrainType>::new(height.w, height.h);
    out.data
        .par_iter_mut()
        .zip(height.data.par_iter())
        .for_each(|(t, &e)| *t = determine_terrain_type(e, water_level));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{InfluenceType, LandmarkCategory, LandmarkKind};
    use crate::rng::Rng;
    use approx::assert_relative_eq;

    fn sample_directions(n: usize, seed: u64) -> Vec<Vec3> {
        let mut rng = Rng::new(seed);
        (0..n)
            .map(|_| {
                Vec3::new(
                    rng.range_f32(-1.0, 1.0),
                    rng.range_f32(-1.0, 1.0),
                    rng.range_f32(-1.0, 1.0),
                )
                .normalize_or(Vec3::X)
            })
            .collect()
    }

    fn field<'a>(
        params: &'a PlanetParameters,
        config: &'a SurfaceConfig,
        landmarks: &'a [Landmark],
        class: PlanetClass,
    ) -> HeightField<'a> {
        HeightField { params, config, landmarks, class }
    }

    #[test]
    fn test_terrain_type_thresholds() {
        // water level 0.5: bands at n = 0.3, 0.5, 0.9
        let h = |n: f32| n * 0.3 - 0.15;
        assert_eq!(determine_terrain_type(h(0.1), 0.5), TerrainType::OceanFloor);
        assert_eq!(determine_terrain_type(h(0.4), 0.5), TerrainType::Beach);
        assert_eq!(determine_terrain_type(h(0.7), 0.5), TerrainType::Regular);
        assert_eq!(determine_terrain_type(h(0.95), 0.5), TerrainType::Mountain);
        assert_eq!(determine_terrain_type(h(0.0) + 0.3 * 0.5, 0.5), TerrainType::Regular);
    }

    #[test]
    fn test_terrain_type_is_monotonic() {
        for wl in [0.0, 0.3, 0.65, 1.0] {
            let mut prev = TerrainType::OceanFloor;
            for i in 0..=400 {
                let height = -0.3 + i as f32 * 0.0015;
                let t = determine_terrain_type(height, wl);
                let rank = |t: TerrainType| TerrainType::ALL.iter().position(|&x| x == t);
                assert!(rank(t) >= rank(prev), "wl {wl} h {height}");
                prev = t;
            }
        }
    }

    #[test]
    fn test_continent_mask_range_and_determinism() {
        for p in sample_directions(500, 4) {
            let m = continent_mask(p, 1234, 5, 0.5);
            assert!((0.0..=1.0).contains(&m));
            assert_eq!(m, continent_mask(p, 1234, 5, 0.5));
        }
    }

    #[test]
    fn test_continent_count_is_capped() {
        for p in sample_directions(100, 8) {
            assert_eq!(continent_mask(p, 77, 50, 0.5), continent_mask(p, 77, MAX_CONTINENTS, 0.5));
        }
    }

    #[test]
    fn test_zero_continents_leave_only_edges() {
        // With no continents at all the mask is the island term alone.
        for p in sample_directions(200, 3) {
            let m = continent_mask(p, 5, 0, 0.5);
            assert!(m <= 0.2, "{m}");
        }
    }

    #[test]
    fn test_crater_field_bounds() {
        for p in sample_directions(2000, 6) {
            let c = crater_field(p, 42);
            assert!((-0.015 * CRATER_COUNT as f32..=0.0075 * CRATER_COUNT as f32).contains(&c));
        }
        // Crater centres are carved.
        assert!(crater_field(crater_centre(0, seed_phase(42)), 42) < 0.0);
    }

    #[test]
    fn test_soil_gain() {
        let p = Vec3::new(0.3, 0.2, 0.9).normalize();
        let rocky = soil_texture_detail(p, SoilTexture::Rough, SoilType::Rocky, 3);
        let volcanic = soil_texture_detail(p, SoilTexture::Rough, SoilType::Volcanic, 3);
        let sandy = soil_texture_detail(p, SoilTexture::Rough, SoilType::Sandy, 3);
        assert_relative_eq!(volcanic, rocky * 1.5, epsilon = 1e-7);
        assert_relative_eq!(sandy, rocky * 0.7, epsilon = 1e-7);
    }

    #[test]
    fn test_terrestrial_height_is_finite_and_deterministic() {
        let params = PlanetParameters::default().finalize();
        let config = SurfaceConfig::default();
        let f = field(&params, &config, &params.landmarks, PlanetClass::Terrestrial);
        for p in sample_directions(300, 11) {
            let e = f.height(p, 0.0);
            assert!(e.is_finite());
            assert_eq!(e, f.height(p, 123.0));
            assert!(e > -0.5 && e < 0.5, "{e}");
        }
    }

    #[test]
    fn test_volcanic_activity_shapes_continents() {
        let calm = PlanetParameters { volcanic_activity: 0.0, ..Default::default() };
        let active = PlanetParameters { volcanic_activity: 1.0, ..Default::default() };
        let config = SurfaceConfig::default();
        let a = field(&calm, &config, &[], PlanetClass::Terrestrial);
        let b = field(&active, &config, &[], PlanetClass::Terrestrial);

        let mut changed = 0;
        for p in sample_directions(300, 17) {
            let (ea, eb) = (a.height(p, 0.0), b.height(p, 0.0));
            if a.continent_mask(p) == 0.0 {
                assert_eq!(ea, eb);
            } else if ea != eb {
                changed += 1;
            }
        }
        assert!(changed > 0);
    }

    #[test]
    fn test_gaseous_height_moves_with_time() {
        let params = PlanetParameters { mass: 10.0, ..Default::default() }.finalize();
        let config = SurfaceConfig::default();
        let f = field(&params, &config, &[], PlanetClass::Gaseous);
        let p = Vec3::new(0.2, 0.4, 0.8).normalize();
        let a = f.height(p, 0.0);
        let b = f.height(p, 30.0);
        assert!(a.is_finite() && b.is_finite());
        assert_ne!(a, b);
        assert!(a.abs() <= 0.05);
    }

    #[test]
    fn test_landmark_raises_terrain() {
        let params = PlanetParameters::default().finalize();
        let config = SurfaceConfig::default();
        let peak = Landmark {
            classification_id: "peak".into(),
            kind: LandmarkKind::MountainPeak,
            visual_effect: String::new(),
            coordinates: Vec3::Z,
            influence_type: InfluenceType::Mountain,
            influence_radius: Some(0.5),
            influence_strength: Some(1.0),
            influence_roughness: Some(0.5),
            category: LandmarkCategory::Terrestrial,
        };
        let with = [peak];
        let bare = field(&params, &config, &[], PlanetClass::Terrestrial).height(Vec3::Z, 0.0);
        let raised = field(&params, &config, &with, PlanetClass::Terrestrial).height(Vec3::Z, 0.0);
        let erosion = 1.0 - 0.3 * params.terrain_erosion;
        assert_relative_eq!(raised - bare, 0.08 * erosion, epsilon = 1e-5);
    }

    #[test]
    fn test_relief_classification_matches_offset() {
        let params = PlanetParameters::default().finalize();
        let config = SurfaceConfig::default();
        let f = field(&params, &config, &params.landmarks, PlanetClass::Terrestrial);
        for p in sample_directions(200, 21) {
            let r = f.relief(p);
            assert_eq!(r.terrain, determine_terrain_type(r.offset, params.water_level));
            assert!((0.0..=1.0).contains(&r.color.r));
        }
    }

    #[test]
    fn test_height_grid_shape() {
        let params = PlanetParameters::default().finalize();
        let config = SurfaceConfig::default();
        let f = field(&params, &config, &params.landmarks, PlanetClass::Terrestrial);
        let g = build_height_grid(&f, 32, 16, 0.0);
        assert_eq!(g.data.len(), 32 * 16);
        assert_eq!(g.get(5, 3), f.height(equirect_direction(5, 3, 32, 16), 0.0));
        let t = classify_grid(&g, params.water_level);
        assert_eq!(t.get(5, 3), determine_terrain_type(g.get(5, 3), params.water_level));
    }
}
