use std::path::Path;

use glam::Vec3;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::biome::{get_biome_colors, temperature_adjusted_colors};
use crate::classifier::normalize_height;
use crate::color::Rgb;
use crate::config::{DebugBands, PaletteSource, SurfaceConfig};
use crate::elevation::{HeightField, TerrainType};
use crate::grid::{Grid, equirect_direction};
use crate::noise::{fbm, gradient_noise3, smoothstep};
use crate::overlay::{GasPhase, cloud_cover};
use crate::params::PlanetParameters;
use crate::rng::seed_u32;

const SALT_OCEAN: u64 = 0x0CEA_4000_0000_0001;
const SALT_WAVES: u64 = 0x0CEA_4000_0000_0002;
const SALT_SAND: u64 = 0x5A4D_0000_0000_0003;
const SALT_LAND: u64 = 0x1A4D_0000_0000_0004;
const SALT_VEGETATION: u64 = 0x7E6E_7A7E_0000_0005;
const SALT_BANDS: u64 = 0xBA4D_5000_0000_0006;
const SALT_GAS_STORMS: u64 = 0x5702_4A00_0000_0007;
const SALT_SWIRL: u64 = 0x5A12_1000_0000_0008;

const DEFAULT_ATMOSPHERE: Rgb = Rgb::hex(0x87CEEB);

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Pixel buffer holds {len} bytes, expected {expected} for {w}x{h} RGBA")]
    BufferSize { len: usize, expected: usize, w: usize, h: usize },
}

/// The seven color bands of the surface shader, lowest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceBand {
    Ocean,
    Beach,
    Lowland,
    Midland,
    Highland,
    Mountain,
    Snow,
}

impl SurfaceBand {
    pub const ALL: [SurfaceBand; 7] = [
        SurfaceBand::Ocean,
        SurfaceBand::Beach,
        SurfaceBand::Lowland,
        SurfaceBand::Midland,
        SurfaceBand::Highland,
        SurfaceBand::Mountain,
        SurfaceBand::Snow,
    ];

    /// Flat band for normalized height `n`, as drawn by the debug view.
    pub fn classify(n: f32, water_level: f32, beach_width: f32) -> SurfaceBand {
        let w = water_level;
        if n < w {
            SurfaceBand::Ocean
        } else if n < w + beach_width {
            SurfaceBand::Beach
        } else if n < w + 0.15 {
            SurfaceBand::Lowland
        } else if n < w + 0.3 {
            SurfaceBand::Midland
        } else if n < w + 0.45 {
            SurfaceBand::Highland
        } else if n < w + 0.6 {
            SurfaceBand::Mountain
        } else {
            SurfaceBand::Snow
        }
    }
}

/// Full surface palette: seven land/sea bands plus atmosphere and the
/// secondary ocean pattern color.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfacePalette {
    pub atmosphere: Rgb,
    pub ocean: Rgb,
    pub ocean_pattern: Rgb,
    pub beach: Rgb,
    pub lowland: Rgb,
    pub midland: Rgb,
    pub highland: Rgb,
    pub mountain: Rgb,
    pub snow: Rgb,
}

impl SurfacePalette {
    /// Atmosphere, ocean, ocean pattern, beach, lowland, midland, highland,
    /// mountain, snow.
    pub const fn from_hex(c: [u32; 9]) -> Self {
        Self {
            atmosphere: Rgb::hex(c[0]),
            ocean: Rgb::hex(c[1]),
            ocean_pattern: Rgb::hex(c[2]),
            beach: Rgb::hex(c[3]),
            lowland: Rgb::hex(c[4]),
            midland: Rgb::hex(c[5]),
            highland: Rgb::hex(c[6]),
            mountain: Rgb::hex(c[7]),
            snow: Rgb::hex(c[8]),
        }
    }

    /// Biome (or custom) 4-band palette stretched to seven bands, with the
    /// liquid's colors for the sea.
    pub fn from_biome(params: &PlanetParameters) -> Self {
        let four = params
            .custom_colors
            .unwrap_or_else(|| get_biome_colors(params.biome));
        let snow = temperature_adjusted_colors(params.temperature, params.biomass_level).snow;
        Self {
            atmosphere: DEFAULT_ATMOSPHERE,
            ocean: params.liquid_type.color(),
            ocean_pattern: params.liquid_type.pattern_color(),
            beach: four.beach,
            lowland: four.regular,
            midland: four.regular.lerp(four.mountain, 0.35),
            highland: four.regular.lerp(four.mountain, 0.7),
            mountain: four.mountain,
            snow,
        }
    }

    /// Land bands from the temperature regime and biomass.
    pub fn from_temperature(params: &PlanetParameters) -> Self {
        let t = temperature_adjusted_colors(params.temperature, params.biomass_level);
        Self {
            atmosphere: DEFAULT_ATMOSPHERE,
            ocean: params.liquid_type.color(),
            ocean_pattern: params.liquid_type.pattern_color(),
            beach: t.beach,
            lowland: t.lowland,
            midland: t.midland,
            highland: t.highland,
            mountain: t.mountain,
            snow: t.snow,
        }
    }

    pub fn resolve(source: &PaletteSource, params: &PlanetParameters) -> Self {
        match source {
            PaletteSource::Biome => Self::from_biome(params),
            PaletteSource::Temperature => Self::from_temperature(params),
            PaletteSource::Explicit(p) => *p,
        }
    }

    pub fn band(&self, band: SurfaceBand) -> Rgb {
        match band {
            SurfaceBand::Ocean => self.ocean,
            SurfaceBand::Beach => self.beach,
            SurfaceBand::Lowland => self.lowland,
            SurfaceBand::Midland => self.midland,
            SurfaceBand::Highland => self.highland,
            SurfaceBand::Mountain => self.mountain,
            SurfaceBand::Snow => self.snow,
        }
    }
}

/// Rim term for a sphere normal `p` seen along `view_dir`; 0 with no view.
#[inline]
pub fn fresnel(p: Vec3, view_dir: Option<Vec3>) -> f32 {
    match view_dir {
        Some(v) => {
            let v = v.normalize_or_zero();
            if v == Vec3::ZERO {
                return 0.0;
            }
            let f = 1.0 - p.dot(v).abs();
            f * f
        }
        None => 0.0,
    }
}

/// Inputs for coloring one planet surface.
#[derive(Clone, Copy)]
pub struct Shading<'a> {
    pub params: &'a PlanetParameters,
    pub config: &'a SurfaceConfig,
    pub palette: &'a SurfacePalette,
}

impl Shading<'_> {
    /// Flat band color, black where the band is hidden.
    pub fn debug_color(&self, elevation: f32, bands: &DebugBands) -> Rgb {
        let band = SurfaceBand::classify(
            normalize_height(elevation),
            self.params.water_level,
            self.config.beach_width,
        );
        if bands.visible(band) {
            self.palette.band(band)
        } else {
            Rgb::BLACK
        }
    }

    /// Terrestrial surface color at unit direction `p`.
    pub fn surface_color(
        &self,
        p: Vec3,
        elevation: f32,
        mask: f32,
        phase: &GasPhase,
        view_dir: Option<Vec3>,
    ) -> Rgb {
        let params = self.params;
        let pal = self.palette;
        let seed = params.seed;
        let n = normalize_height(elevation);
        let wl = params.water_level;
        let bw = self.config.beach_width;
        let t = phase.time;

        let mut color = if mask < 0.2 || n < wl - 0.02 {
            let pattern = gradient_noise3(p * 20.0 + Vec3::new(t * 0.05, 0.0, 0.0), seed_u32(seed, SALT_OCEAN))
                * 0.5
                + 0.5;
            let base = pal.ocean.lerp(pal.ocean_pattern, pattern * 0.3);
            let depth = if wl > 0.0 { (1.0 - n / wl).clamp(0.0, 1.0) } else { 0.0 };
            let s = seed_u32(seed, SALT_WAVES);
            let waves = gradient_noise3(p * 50.0 + Vec3::new(t * 0.2, 0.0, 0.0), s) * 0.02;
            let currents = gradient_noise3(p * 20.0 + Vec3::new(t * 0.1, t * 0.05, 0.0), s) * 0.03;
            let w = waves + currents;
            base.scale(1.2).lerp(base.scale(0.7), depth).offset(w, w, w)
        } else if n < wl + bw {
            let ripple = gradient_noise3(p * 100.0, seed_u32(seed, SALT_SAND)) * 0.05;
            pal.ocean
                .lerp(pal.beach, smoothstep(wl, wl + bw, n))
                .offset(ripple, ripple, ripple)
        } else {
            self.land_color(p, (n - wl) / 0.5)
        };

        color = color.lerp(pal.atmosphere, fresnel(p, view_dir) * 0.4 * params.atmosphere_strength);
        if n > wl - 0.05 {
            let cover = cloud_cover(p, phase, seed, params.cloud_count);
            color = color.lerp(Rgb::WHITE, cover * 0.7);
        }
        color.clamped()
    }

    fn land_color(&self, p: Vec3, land: f32) -> Rgb {
        let params = self.params;
        let pal = self.palette;
        let seed = params.seed;
        let noise = fbm(p * 10.0, seed_u32(seed, SALT_LAND), 2) * 0.1;
        let snow_line = 0.8 - (params.temperature / 700.0) * 0.4;

        let mut c = if land > snow_line {
            pal.mountain.lerp(pal.snow, smoothstep(snow_line, snow_line + 0.1, land))
        } else if land < 0.25 {
            pal.beach.lerp(pal.lowland, smoothstep(0.0, 0.25, land + noise))
        } else if land < 0.5 {
            pal.lowland.lerp(pal.midland, smoothstep(0.25, 0.5, land + noise))
        } else if land < 0.75 {
            pal.midland.lerp(pal.highland, smoothstep(0.5, 0.75, land + noise))
        } else {
            pal.highland.lerp(pal.mountain, smoothstep(0.75, 0.9, land + noise))
        };

        let temp_factor = ((params.temperature - 50.0) / 650.0).clamp(0.0, 1.0);
        if temp_factor < 0.3 && land > 0.6 {
            c = c.lerp(pal.snow, smoothstep(0.6, 0.8, land));
        } else if temp_factor > 0.7 {
            c = c.lerp(Rgb::new(0.8, 0.6, 0.4), 0.3);
        }

        if params.biomass_level > 0.0 && temp_factor > 0.2 && temp_factor < 0.8 {
            let detail = fbm(p * 15.0, seed_u32(seed, SALT_VEGETATION), 2) * 0.5 + 0.5;
            let amount = params.biomass_level
                * smoothstep(0.1, 0.4, land)
                * (1.0 - smoothstep(0.6, 0.9, land))
                * detail;
            let green = Rgb::new(0.1, 0.5, 0.1).lerp(Rgb::new(0.2, 0.6, 0.2), temp_factor);
            c = c.lerp(green, amount.clamp(0.0, 1.0));
        }

        params.soil_type.tint(c)
    }

    /// Banded gas-giant color, driven by the palette's atmosphere color.
    pub fn gas_color(&self, p: Vec3, phase: &GasPhase, view_dir: Option<Vec3>) -> Rgb {
        let atm = self.palette.atmosphere;
        let seed = self.params.seed;

        let detail = fbm(p * 50.0, seed_u32(seed, SALT_BANDS), 3) * 0.3;
        let bands = (p.y * 10.0 + phase.band).sin() * 0.5 + 0.5 + detail * 0.2;
        let band_color = atm.scale(0.8).lerp(atm.scale(1.2), bands);

        let s = seed_u32(seed, SALT_GAS_STORMS);
        let storm = gradient_noise3(p * Vec3::new(8.0, 2.0, 8.0) + Vec3::splat(phase.color_storm), s)
            + fbm(p * 300.0, s, 3) * 0.5 * 0.3;
        let storminess = smoothstep(0.6, 0.8, storm);
        let storm_color = Rgb::new(1.0, 1.0, 0.9).scale(storminess);
        let mut c = band_color.lerp(storm_color, storminess * 0.5);

        let swirl = gradient_noise3(p * 3.0 + phase.swirl, seed_u32(seed, SALT_SWIRL)) * 0.2;
        c = c.lerp(band_color.scale(1.3), swirl);

        c.lerp(atm, fresnel(p, view_dir) * 0.4 * self.params.atmosphere_strength)
            .clamped()
    }
}

/// Shade every pixel of an equirectangular map from its direction and
/// elevation, one row per task.
pub fn render_map<F>(height: &Grid<f32>, shade: F) -> Vec<u8>
where
    F: Fn(Vec3, f32) -> Rgb + Sync,
{
    let w = height.w;
    let h = height.h;
    let mut rgba = vec![0u8; w * h * 4];

    rgba.par_chunks_mut(w * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..w {
                let c = shade(equirect_direction(x, y, w, h), height.get(x, y));
                row[x * 4..x * 4 + 4].copy_from_slice(&c.to_rgba8());
            }
        });

    rgba
}

/// Coarse relief map colored from the 4-band biome palette.
pub fn render_relief(field: &HeightField, w: usize, h: usize) -> Vec<u8> {
    let mut rgba = vec![0u8; w * h * 4];
    rgba.par_chunks_mut(w * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..w {
                let r = field.relief(equirect_direction(x, y, w, h));
                row[x * 4..x * 4 + 4].copy_from_slice(&r.color.to_rgba8());
            }
        });
    rgba
}

/// Diagnostic: grayscale heightmap, stretched to the grid's own range.
pub fn render_heightmap(height: &Grid<f32>) -> Vec<u8> {
    let min_h = height.data.iter().cloned().fold(f32::INFINITY, f32::min);
    let max_h = height.data.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let range = (max_h - min_h).max(1e-6);
    let mut rgba = vec![0u8; height.data.len() * 4];
    for (px, &e) in rgba.chunks_exact_mut(4).zip(&height.data) {
        let v = ((e - min_h) / range * 255.0).clamp(0.0, 255.0) as u8;
        px.copy_from_slice(&[v, v, v, 255]);
    }
    rgba
}

const TERRAIN_COLORS: [[u8; 4]; 4] = [
    [24, 52, 110, 255],
    [222, 206, 150, 255],
    [88, 150, 72, 255],
    [150, 140, 130, 255],
];

/// Diagnostic: the four coarse terrain classes as flat colors.
pub fn render_terrain_types(terrain: &Grid<TerrainType>) -> Vec<u8> {
    let mut rgba = vec![0u8; terrain.data.len() * 4];
    for (px, t) in rgba.chunks_exact_mut(4).zip(&terrain.data) {
        let i = match t {
            TerrainType::OceanFloor => 0,
            TerrainType::Beach => 1,
            TerrainType::Regular => 2,
            TerrainType::Mountain => 3,
        };
        px.copy_from_slice(&TERRAIN_COLORS[i]);
    }
    rgba
}

fn check_len(rgba: &[u8], w: usize, h: usize) -> Result<(), ExportError> {
    let expected = w * h * 4;
    if rgba.len() != expected {
        return Err(ExportError::BufferSize { len: rgba.len(), expected, w, h });
    }
    Ok(())
}

pub fn save_png(path: &Path, rgba: &[u8], w: usize, h: usize) -> Result<(), ExportError> {
    check_len(rgba, w, h)?;
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    image::save_buffer(path, rgba, w as u32, h as u32, image::ColorType::Rgba8)?;
    Ok(())
}

/// In-memory PNG encoding.
pub fn encode_png(rgba: &[u8], w: usize, h: usize) -> Result<Vec<u8>, ExportError> {
    check_len(rgba, w, h)?;
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(rgba, w as u32, h as u32, image::ExtendedColorType::Rgba8)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::Biome;
    use crate::classifier::LiquidType;
    use approx::assert_relative_eq;

    fn earth() -> PlanetParameters {
        PlanetParameters::default().finalize()
    }

    #[test]
    fn test_band_thresholds() {
        let b = |n| SurfaceBand::classify(n, 0.5, 0.03);
        assert_eq!(b(0.49), SurfaceBand::Ocean);
        assert_eq!(b(0.5), SurfaceBand::Beach);
        assert_eq!(b(0.6), SurfaceBand::Lowland);
        assert_eq!(b(0.7), SurfaceBand::Midland);
        assert_eq!(b(0.9), SurfaceBand::Highland);
        assert_eq!(b(1.0), SurfaceBand::Mountain);
        assert_eq!(b(1.2), SurfaceBand::Snow);
    }

    #[test]
    fn test_biome_palette_uses_liquid() {
        let mut p = earth();
        p.liquid_type = LiquidType::Methane;
        let pal = SurfacePalette::from_biome(&p);
        assert_eq!(pal.ocean, LiquidType::Methane.color());
        let four = get_biome_colors(Biome::RockyHighlands);
        assert_eq!(pal.lowland, four.regular);
        assert_eq!(pal.mountain, four.mountain);
    }

    #[test]
    fn test_hidden_debug_band_is_black() {
        let p = earth();
        let config = SurfaceConfig::default();
        let palette = SurfacePalette::from_biome(&p);
        let s = Shading { params: &p, config: &config, palette: &palette };
        let deep = -0.15;
        let hidden = DebugBands { ocean: false, ..Default::default() };
        assert_eq!(s.debug_color(deep, &hidden), Rgb::BLACK);
        assert_eq!(s.debug_color(deep, &DebugBands::default()), palette.ocean);
    }

    #[test]
    fn test_surface_colors_stay_in_gamut() {
        let p = earth();
        let config = SurfaceConfig::default();
        let palette = SurfacePalette::from_biome(&p);
        let s = Shading { params: &p, config: &config, palette: &palette };
        let phase = GasPhase::at(12.0);
        for i in 0..200 {
            let dir = equirect_direction(i % 20, i / 20, 20, 10);
            let e = -0.15 + (i as f32 / 200.0) * 0.35;
            for c in [
                s.surface_color(dir, e, 1.0, &phase, Some(Vec3::Z)),
                s.gas_color(dir, &phase, None),
            ] {
                for ch in [c.r, c.g, c.b] {
                    assert!((0.0..=1.0).contains(&ch));
                }
            }
        }
    }

    #[test]
    fn test_open_sea_under_low_mask() {
        let p = earth();
        let config = SurfaceConfig::default();
        let palette = SurfacePalette::from_biome(&p);
        let s = Shading { params: &p, config: &config, palette: &palette };
        // High ground but no continent: still sea, so blue dominates.
        let c = s.surface_color(Vec3::X, 0.1, 0.0, &GasPhase::default(), None);
        assert!(c.b > c.r);
    }

    #[test]
    fn test_fresnel() {
        assert_eq!(fresnel(Vec3::Z, None), 0.0);
        assert_eq!(fresnel(Vec3::Z, Some(Vec3::Z)), 0.0);
        assert_eq!(fresnel(Vec3::X, Some(Vec3::Z)), 1.0);
        assert_eq!(fresnel(Vec3::X, Some(Vec3::ZERO)), 0.0);
    }

    #[test]
    fn test_atmosphere_strength_scales_rim() {
        let config = SurfaceConfig::default();
        let phase = GasPhase::default();
        let color = |strength: f32, view: Option<Vec3>| {
            let p = PlanetParameters { atmosphere_strength: strength, cloud_count: 0.0, ..earth() };
            let palette = SurfacePalette::from_biome(&p);
            let s = Shading { params: &p, config: &config, palette: &palette };
            (s.surface_color(Vec3::X, 0.1, 1.0, &phase, view), s.gas_color(Vec3::X, &phase, view))
        };
        let limb = Some(Vec3::Z);
        assert_eq!(color(0.0, limb), color(0.0, None));
        assert_eq!(color(1.0, None), color(0.0, None));
        let (thin_land, thin_gas) = color(0.2, limb);
        let (thick_land, thick_gas) = color(1.0, limb);
        assert_ne!(thin_land, thick_land);
        assert_ne!(thin_gas, thick_gas);
    }

    #[test]
    fn test_clouds_cover_the_rim() {
        let config = SurfaceConfig::default();
        let phase = GasPhase::default();
        let clear = PlanetParameters { atmosphere_strength: 1.0, cloud_count: 0.0, ..earth() };
        let cloudy = PlanetParameters { cloud_count: 100.0, ..clear.clone() };
        let palette = SurfacePalette::from_biome(&clear);
        let shade = |params: &PlanetParameters, p: Vec3| {
            Shading { params, config: &config, palette: &palette }
                .surface_color(p, 0.1, 1.0, &phase, Some(Vec3::Z))
        };

        let mut checked = 0;
        for i in 0..400 {
            let p = equirect_direction(i % 40, i / 40, 40, 10);
            let cover = cloud_cover(p, &phase, clear.seed, cloudy.cloud_count);
            if cover <= 0.0 {
                continue;
            }
            let base = shade(&clear, p);
            if [base.r, base.g, base.b].iter().any(|&c| c <= 0.0 || c >= 1.0) {
                continue;
            }
            let expected = base.lerp(Rgb::WHITE, cover * 0.7);
            let got = shade(&cloudy, p);
            assert_relative_eq!(got.r, expected.r, epsilon = 1e-5);
            assert_relative_eq!(got.g, expected.g, epsilon = 1e-5);
            assert_relative_eq!(got.b, expected.b, epsilon = 1e-5);
            checked += 1;
        }
        assert!(checked > 0);
    }

    #[test]
    fn test_heightmap_stretches_range() {
        let mut g: Grid<f32> = Grid::new(2, 1);
        g.set(0, 0, -0.1);
        g.set(1, 0, 0.05);
        let rgba = render_heightmap(&g);
        assert_eq!(&rgba[..4], &[0, 0, 0, 255]);
        assert_eq!(&rgba[4..], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_encode_png_checks_buffer() {
        let ok = encode_png(&[0u8; 16], 2, 2).unwrap();
        assert_eq!(&ok[1..4], b"PNG");
        assert!(matches!(encode_png(&[0u8; 15], 2, 2), Err(ExportError::BufferSize { .. })));
    }
}
