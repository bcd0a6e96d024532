use approx::assert_relative_eq;
use glam::Vec3;
use rayon::prelude::*;

use planet_synth::biome::Biome;
use planet_synth::classifier::{LiquidType, PlanetClass, is_liquid_available};
use planet_synth::config::{Preset, SurfaceConfig};
use planet_synth::grid::equirect_direction;
use planet_synth::landmarks::{LandmarkCategory, LandmarkKind};
use planet_synth::params::{PlanetSeed, merge_with_defaults};
use planet_synth::{Planet, SampleContext};

fn earth_seed() -> PlanetSeed {
    PlanetSeed::new(1.0, 1.0, 288.0, Biome::RockyHighlands)
}

#[test]
fn test_earth_like_planet() {
    let p = merge_with_defaults(&earth_seed());
    assert_relative_eq!(p.density(), 5.51, epsilon = 1e-3);
    assert_eq!(p.class(), PlanetClass::Terrestrial);
    assert_eq!(p.liquid_type, LiquidType::Water);
    assert!(is_liquid_available(p.temperature, LiquidType::Water));

    assert_eq!(p.landmarks.len(), 2);
    let peak = &p.landmarks[0];
    assert_eq!(peak.kind, LandmarkKind::MountainPeak);
    assert_eq!(peak.classification_id, "default-terrestrial");
    let expected = Vec3::new(0.5, 0.7, 0.5).normalize();
    assert_relative_eq!(peak.coordinates.x, expected.x, epsilon = 1e-5);
    assert_relative_eq!(peak.coordinates.y, expected.y, epsilon = 1e-5);
    assert_relative_eq!(peak.coordinates.z, expected.z, epsilon = 1e-5);
    assert_eq!(p.landmarks[1].category, LandmarkCategory::Gaseous);
}

#[test]
fn test_same_seed_same_surface() {
    let a = Planet::from_seed(&earth_seed(), SurfaceConfig::default());
    let b = Planet::from_seed(&earth_seed(), SurfaceConfig::default());
    let ctx = SampleContext { time: 12.0, ..Default::default() };
    for y in 0..8 {
        for x in 0..16 {
            let dir = equirect_direction(x, y, 16, 8);
            assert_eq!(a.sample(dir, &ctx), b.sample(dir, &ctx));
        }
    }
}

#[test]
fn test_planet_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Planet>();
}

#[test]
fn test_parallel_sampling_matches_serial() {
    let (seed, config) = Preset::Venus.build();
    let planet = Planet::from_seed(&seed, config);
    let ctx = SampleContext::default();
    let dirs: Vec<Vec3> = (0..256).map(|i| equirect_direction(i % 32, i / 32, 32, 8)).collect();

    let serial: Vec<_> = dirs.iter().map(|&d| planet.sample(d, &ctx)).collect();
    let parallel: Vec<_> = dirs.par_iter().map(|&d| planet.sample(d, &ctx)).collect();
    assert_eq!(serial, parallel);
}

#[test]
fn test_gas_giant_changes_over_time() {
    let (seed, config) = Preset::Jupiter.build();
    let planet = Planet::from_seed(&seed, config);
    assert_eq!(planet.class(), PlanetClass::Gaseous);

    let dir = Vec3::new(0.3, 0.2, 0.9).normalize();
    let t0 = planet.sample(dir, &SampleContext::default());
    let t1 = planet.sample(dir, &SampleContext { time: 40.0, ..Default::default() });
    assert_ne!(t0.elevation, t1.elevation);
}

#[test]
fn test_generated_map_is_opaque() {
    let planet = Planet::from_seed(&earth_seed(), SurfaceConfig::default());
    let (map, _) = planet_synth::generate(&planet, 32, 16, &SampleContext::default());
    assert_eq!(map.w, 32);
    assert_eq!(map.h, 16);
    assert!(map.rgba.chunks(4).all(|px| px[3] == 255));
    assert!(map.height.data.iter().all(|h| h.is_finite()));
}
