//! Close-up relief patches: a flat local view of the terrain around one
//! landmark, in planar coordinates centred on it.

use glam::Vec3;
use rayon::prelude::*;

use super::{InfluenceType, Landmark, LandmarkCategory};
use crate::color::Rgb;
use crate::grid::Grid;
use crate::noise::gradient_noise3;
use crate::rng::seed_u32;

const SALT_PROFILE: u64 = 0x9A7C_0FF1_0003;

const DEFAULT_RADIUS: f32 = 0.5;
const DEFAULT_STRENGTH: f32 = 0.7;
const DEFAULT_ROUGHNESS: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileSample {
    pub height: f32,
    pub color: Rgb,
}

/// One close-up patch: heights plus packed RGBA.
pub struct ProfilePatch {
    pub height: Grid<f32>,
    pub rgba: Vec<u8>,
}

struct Local {
    x: f32,
    y: f32,
    d: f32,
    infl: f32,
    r: f32,
    seed: u32,
}

impl Local {
    #[inline]
    fn n(&self, x: f32, y: f32) -> f32 {
        gradient_noise3(Vec3::new(x, y, 0.0), self.seed)
    }
}

fn terrestrial(l: &Local, t: InfluenceType) -> ProfileSample {
    let (x, y, d, infl, r) = (l.x, l.y, l.d, l.infl, l.r);
    let (height, color) = match t {
        InfluenceType::Crater => {
            let h = if d < r * 0.8 {
                -infl * 1.2 + l.n(d * 10.0, 0.0) * infl * 0.1
            } else if d < r * 1.2 {
                infl * 0.8
            } else {
                0.0
            };
            (h, Rgb::hex(0x8D6E63))
        }
        InfluenceType::Mountain => {
            let h = infl * 1.5 * (-d / (r * 0.6)).exp() + l.n(d * 15.0, d * 15.0) * infl * 0.3;
            let mut c = Rgb::hex(0xA1887F);
            if h > 0.5 {
                c = c.lerp(Rgb::WHITE, ((h - 0.5) * 2.0).min(1.0));
            }
            (h, c)
        }
        InfluenceType::Volcano => {
            let h = if d < r * 0.2 {
                -infl * 0.8 + l.n(d * 20.0, d * 20.0) * infl * 0.1
            } else {
                infl * 1.8 * (-d / (r * 0.4)).exp() + l.n(d * 12.0, d * 12.0) * infl * 0.2
            };
            let c = Rgb::hex(0x5D4037).lerp(Rgb::hex(0xBF360C), (h / 1.5).clamp(0.0, 1.0));
            (h, c)
        }
        InfluenceType::Valley | InfluenceType::Canyon => {
            let yd = y.abs();
            let h = if yd < r * 0.3 {
                -infl * 1.2 + l.n(y * 25.0, y * 5.0) * infl * 0.15
            } else if yd < r * 0.5 {
                infl * 0.4 * (1.0 - (yd - r * 0.3) / (r * 0.2))
            } else {
                0.0
            };
            (h, Rgb::hex(0x795548))
        }
        InfluenceType::Basin => {
            let h = -infl * 0.8 * (-d / (r * 1.5)).exp() + l.n(d * 8.0, d * 8.0) * infl * 0.15;
            (h, Rgb::hex(0x8D6E63))
        }
        InfluenceType::Dune => {
            let h = infl * 0.8 * (d * 8.0 / r).sin() + infl * 0.3 * (x * 12.0 / r).sin();
            (h, Rgb::hex(0xD7CCC8))
        }
        InfluenceType::Glacier => {
            let mut h = infl * 0.8 * (1.0 - (d / r).powf(1.5));
            let cracks = l.n(x * 20.0, y * 20.0);
            if cracks > 0.7 {
                h -= infl * 0.4 * (cracks - 0.7) * 3.0;
            }
            (h, Rgb::hex(0xE0F7FA))
        }
        InfluenceType::OceanRidge => {
            let h = infl * 0.8 * (-y.abs() / (r * 0.2)).exp() + l.n(x * 15.0, y * 5.0) * infl * 0.2;
            (h, Rgb::hex(0x0288D1))
        }
        InfluenceType::Trench => {
            let td = y.abs();
            let h = if td < r * 0.2 {
                -infl * 1.5 + l.n(y * 20.0, y * 5.0) * infl * 0.1
            } else if td < r * 0.4 {
                -infl * (1.0 - (td - r * 0.2) / (r * 0.2))
            } else {
                0.0
            };
            (h, Rgb::hex(0x01579B))
        }
        InfluenceType::IcePatch => {
            let crystal = if l.n(x * 30.0, y * 30.0) > 0.7 { infl * 0.15 } else { 0.0 };
            let h = infl * 0.3 * (-d / (r * 0.8)).exp() + crystal;
            (h, Rgb::hex(0xECEFF1))
        }
        InfluenceType::LavaFlow => {
            let base = infl * 0.4 * (-d / (r * 0.7)).exp();
            let pattern = (x * 5.0 + y * 5.0 + l.n(x * 8.0, y * 8.0) * 10.0).sin() * 0.5 + 0.5;
            let channel = if pattern < 0.3 { -infl * 0.2 } else { 0.0 };
            (base + channel, Rgb::hex(0xD84315))
        }
        _ => (infl * l.n(x * 5.0, y * 5.0) * 0.8, Rgb::hex(0xA1887F)),
    };
    ProfileSample { height, color }
}

fn gaseous(l: &Local, t: InfluenceType) -> ProfileSample {
    let (x, y, d, infl, r) = (l.x, l.y, l.d, l.infl, l.r);
    let angle = y.atan2(x);
    let (height, color) = match t {
        InfluenceType::Storm => {
            let h = infl * (-d / (r * 0.5)).exp() + infl * 0.3 * (angle * 5.0 + d * 10.0).sin();
            (h, Rgb::hex(0xE57373))
        }
        InfluenceType::Vortex => {
            let h = infl * (angle * 8.0 + d * 15.0).sin() * (-d / r).exp();
            (h, Rgb::hex(0x81D4FA))
        }
        InfluenceType::Band => (infl * (y * 15.0).sin(), Rgb::hex(0xFFD54F)),
        InfluenceType::Spot => {
            let sx = x / 0.7;
            let spot = (sx * sx + y * y).sqrt();
            (infl * (1.0 - (spot / r).min(1.0)), Rgb::hex(0xFF8A65))
        }
        InfluenceType::Turbulent => {
            let h = infl * l.n(x * 10.0, y * 10.0) + infl * 0.5 * l.n(x * 20.0, y * 20.0);
            (h, Rgb::hex(0x9575CD))
        }
        InfluenceType::Cyclone => {
            let h = infl * (d * 10.0 + angle * 3.0).sin() * (-d / r).exp();
            (h, Rgb::hex(0x4FC3F7))
        }
        InfluenceType::Anticyclone => {
            let h = infl * (d * 10.0 - angle * 3.0).sin() * (-d / r).exp();
            (h, Rgb::hex(0xFFF176))
        }
        InfluenceType::ZonalFlow => {
            let h = infl * (y * 20.0).sin() * 0.5 + infl * (y * 10.0 + x * 2.0).sin() * 0.3;
            (h, Rgb::hex(0xAED581))
        }
        _ => {
            let h = infl * l.n(x * 5.0, y * 5.0) * 0.6 + infl * 0.4 * (x * 8.0 + y * 8.0).sin();
            (h, Rgb::hex(0xB0BEC5))
        }
    };
    ProfileSample { height: height + l.n(x * 15.0, y * 15.0) * infl * 0.2, color }
}

/// Local height and color at planar offset `(x, y)` from the landmark centre.
/// Missing radius, strength or roughness fall back to 0.5, 0.7 and 0.5.
pub fn profile_sample(
    landmark: &Landmark,
    surface_roughness: f32,
    x: f32,
    y: f32,
    seed: u64,
) -> ProfileSample {
    let r = landmark.influence_radius.unwrap_or(DEFAULT_RADIUS).max(1e-3);
    let strength = landmark.influence_strength.unwrap_or(DEFAULT_STRENGTH);
    let roughness = landmark.influence_roughness.unwrap_or(DEFAULT_ROUGHNESS);
    let d = (x * x + y * y).sqrt();
    let falloff = (1.0 - d / (r * 2.0)).max(0.0);
    let local = Local {
        x,
        y,
        d,
        infl: falloff * strength * 2.5,
        r,
        seed: seed_u32(seed, SALT_PROFILE),
    };

    match landmark.category {
        LandmarkCategory::Terrestrial => {
            let mut s = terrestrial(&local, landmark.influence_type);
            let combined = surface_roughness * roughness;
            let scale = 8.0 + combined * 15.0;
            s.height += local.n(x * scale, y * scale) * combined * 0.4;
            s
        }
        LandmarkCategory::Gaseous => gaseous(&local, landmark.influence_type),
    }
}

/// Rasterize a `size`×`size` patch spanning `[-extent, extent]` on both axes.
pub fn build_profile_patch(
    landmark: &Landmark,
    surface_roughness: f32,
    size: usize,
    extent: f32,
    seed: u64,
) -> ProfilePatch {
    let mut height = Grid::new(size, size);
    let mut rgba = vec![0u8; size * size * 4];
    let step = if size > 1 { 2.0 * extent / (size - 1) as f32 } else { 0.0 };

    height
        .data
        .par_chunks_mut(size)
        .zip(rgba.par_chunks_mut(size * 4))
        .enumerate()
        .for_each(|(j, (hrow, crow))| {
            let y = -extent + j as f32 * step;
            for i in 0..size {
                let x = -extent + i as f32 * step;
                let s = profile_sample(landmark, surface_roughness, x, y, seed);
                hrow[i] = s.height;
                crow[i * 4..i * 4 + 4].copy_from_slice(&s.color.to_rgba8());
            }
        });

    ProfilePatch { height, rgba }
}
