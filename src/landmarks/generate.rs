use glam::Vec3;
use std::f32::consts::TAU;

use super::{InfluenceType, Landmark, LandmarkCategory, LandmarkKind};
use crate::params::PlanetParameters;
use crate::rng::Rng;

pub const SALT_LANDMARKS: u64 = 0x1A4D_4A2C_0001;

struct TerrestrialPreset {
    keywords: &'static [&'static str],
    kind: LandmarkKind,
    visual_effect: &'static str,
    influence_type: InfluenceType,
    radius: f32,
    strength: f32,
    roughness: f32,
    coordinates: [f32; 3],
}

/// First keyword hit on the biome name wins; the last row is the fallback.
static TERRESTRIAL_PRESETS: [TerrestrialPreset; 6] = [
    TerrestrialPreset {
        keywords: &["Ocean"],
        kind: LandmarkKind::OceanicTrench,
        visual_effect: "Deep Water Shimmer",
        influence_type: InfluenceType::Trench,
        radius: 0.6,
        strength: 0.7,
        roughness: 0.4,
        coordinates: [0.0, -0.4, 0.9],
    },
    TerrestrialPreset {
        keywords: &["Volcanic"],
        kind: LandmarkKind::ActiveVolcano,
        visual_effect: "Lava Glow",
        influence_type: InfluenceType::Volcano,
        radius: 0.4,
        strength: 0.9,
        roughness: 0.8,
        coordinates: [0.3, 0.5, 0.8],
    },
    TerrestrialPreset {
        keywords: &["Jungle", "Tropical"],
        kind: LandmarkKind::RiverValley,
        visual_effect: "Mist",
        influence_type: InfluenceType::Valley,
        radius: 0.5,
        strength: 0.6,
        roughness: 0.5,
        coordinates: [-0.5, 0.2, 0.8],
    },
    TerrestrialPreset {
        keywords: &["Dune", "Desert", "Arid"],
        kind: LandmarkKind::SandFormation,
        visual_effect: "Shifting Sands",
        influence_type: InfluenceType::Dune,
        radius: 0.5,
        strength: 0.5,
        roughness: 0.6,
        coordinates: [0.7, 0.1, 0.7],
    },
    TerrestrialPreset {
        keywords: &["Frigid", "Tundra"],
        kind: LandmarkKind::IceFormation,
        visual_effect: "Ice Shimmer",
        influence_type: InfluenceType::Glacier,
        radius: 0.5,
        strength: 0.6,
        roughness: 0.3,
        coordinates: [0.0, 0.9, 0.4],
    },
    TerrestrialPreset {
        keywords: &[],
        kind: LandmarkKind::MountainPeak,
        visual_effect: "Snow Cap",
        influence_type: InfluenceType::Mountain,
        radius: 0.3,
        strength: 0.8,
        roughness: 0.7,
        coordinates: [0.5, 0.7, 0.5],
    },
];

const GASEOUS_CANDIDATES: [(LandmarkKind, &str, InfluenceType); 4] = [
    (LandmarkKind::GreatStorm, "Swirling Clouds", InfluenceType::Storm),
    (LandmarkKind::CyclonicFormation, "Spiral Winds", InfluenceType::Cyclone),
    (LandmarkKind::AtmosphericBands, "Color Bands", InfluenceType::Band),
    (LandmarkKind::Vortex, "Rotating Vortex", InfluenceType::Vortex),
];

fn terrestrial_preset(biome_name: &str) -> &'static TerrestrialPreset {
    TERRESTRIAL_PRESETS
        .iter()
        .find(|p| p.keywords.iter().any(|k| biome_name.contains(k)))
        .unwrap_or(&TERRESTRIAL_PRESETS[TERRESTRIAL_PRESETS.len() - 1])
}

/// Uniform direction on the unit sphere.
fn random_direction(rng: &mut Rng) -> Vec3 {
    let z = rng.range_f32(-1.0, 1.0);
    let phi = rng.range_f32(0.0, TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// One terrestrial landmark chosen from the biome name and one gaseous
/// landmark drawn from `seed`. Identical inputs give identical output.
pub fn generate_default_landmarks(params: &PlanetParameters, seed: u64) -> Vec<Landmark> {
    let preset = terrestrial_preset(params.biome.name());
    let [x, y, z] = preset.coordinates;
    let terrestrial = Landmark {
        classification_id: "default-terrestrial".into(),
        kind: preset.kind,
        visual_effect: preset.visual_effect.into(),
        coordinates: Vec3::new(x, y, z).normalize(),
        influence_type: preset.influence_type,
        influence_radius: Some(preset.radius),
        influence_strength: Some(preset.strength),
        influence_roughness: Some(preset.roughness),
        category: LandmarkCategory::Terrestrial,
    };

    let mut rng = Rng::new(seed ^ SALT_LANDMARKS);
    let (kind, visual_effect, influence_type) =
        GASEOUS_CANDIDATES[rng.range_usize(GASEOUS_CANDIDATES.len())];
    let gaseous = Landmark {
        classification_id: "default-gaseous".into(),
        kind,
        visual_effect: visual_effect.into(),
        coordinates: random_direction(&mut rng),
        influence_type,
        influence_radius: Some(rng.range_f32(0.5, 1.0)),
        influence_strength: Some(rng.range_f32(0.4, 0.8)),
        influence_roughness: Some(rng.range_f32(0.6, 0.9)),
        category: LandmarkCategory::Gaseous,
    };

    tracing::debug!(
        biome = params.biome.name(),
        terrestrial = terrestrial.kind.name(),
        gaseous = gaseous.kind.name(),
        "generated default landmarks"
    );

    vec![terrestrial, gaseous]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::Biome;
    use approx::assert_relative_eq;

    fn params_for(biome: Biome) -> PlanetParameters {
        PlanetParameters { biome, ..Default::default() }
    }

    #[test]
    fn test_keyword_selection() {
        let cases = [
            (Biome::OceanicWorld, LandmarkKind::OceanicTrench),
            (Biome::VolcanicTerrain, LandmarkKind::ActiveVolcano),
            (Biome::TropicalJungle, LandmarkKind::RiverValley),
            (Biome::AridDunes, LandmarkKind::SandFormation),
            (Biome::DuneFields, LandmarkKind::SandFormation),
            (Biome::FrigidExpanse, LandmarkKind::IceFormation),
            (Biome::TundraBasin, LandmarkKind::IceFormation),
            (Biome::RockyHighlands, LandmarkKind::MountainPeak),
            (Biome::CoralReefs, LandmarkKind::MountainPeak),
            (Biome::Unknown, LandmarkKind::MountainPeak),
        ];
        for (biome, kind) in cases {
            let lms = generate_default_landmarks(&params_for(biome), 1);
            assert_eq!(lms[0].kind, kind, "{}", biome.name());
        }
    }

    #[test]
    fn test_one_of_each_category() {
        let lms = generate_default_landmarks(&params_for(Biome::RockyHighlands), 99);
        assert_eq!(lms.len(), 2);
        assert_eq!(lms[0].category, LandmarkCategory::Terrestrial);
        assert_eq!(lms[1].category, LandmarkCategory::Gaseous);
        assert_eq!(lms[0].influence_type, InfluenceType::Mountain);
        assert_relative_eq!(lms[0].coordinates.length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_gaseous_draw_ranges_and_determinism() {
        let p = params_for(Biome::BasaltPlains);
        for seed in 0..200u64 {
            let a = generate_default_landmarks(&p, seed);
            assert_eq!(a, generate_default_landmarks(&p, seed));
            let g = &a[1];
            let r = g.influence_radius.unwrap();
            let s = g.influence_strength.unwrap();
            let k = g.influence_roughness.unwrap();
            assert!((0.5..1.0).contains(&r));
            assert!((0.4..0.8).contains(&s));
            assert!((0.6..0.9).contains(&k));
            assert_relative_eq!(g.coordinates.length(), 1.0, epsilon = 1e-4);
            assert_eq!(g.influence_type.category(), Some(LandmarkCategory::Gaseous));
        }
    }

    #[test]
    fn test_gas_giant_gets_both_categories() {
        let giant = PlanetParameters { mass: 10.0, radius: 1.0, ..params_for(Biome::Unknown) };
        assert_eq!(giant.class(), crate::classifier::PlanetClass::Gaseous);
        for seed in [0u64, 7, 9012] {
            let lms = generate_default_landmarks(&giant, seed);
            assert!(lms.iter().any(|l| l.category == LandmarkCategory::Terrestrial));
            assert!(lms.iter().any(|l| l.category == LandmarkCategory::Gaseous));
            assert_eq!(lms, generate_default_landmarks(&giant, seed));
        }

        let (jupiter, _) = crate::config::Preset::Jupiter.build();
        let p = crate::params::merge_with_defaults(&jupiter);
        assert_eq!(p.class(), crate::classifier::PlanetClass::Gaseous);
        let categories: Vec<_> = p.landmarks.iter().map(|l| l.category).collect();
        assert_eq!(categories, [LandmarkCategory::Terrestrial, LandmarkCategory::Gaseous]);
    }

    #[test]
    fn test_seed_changes_gaseous_landmark() {
        let p = params_for(Biome::BasaltPlains);
        let a = generate_default_landmarks(&p, 1);
        let b = generate_default_landmarks(&p, 2);
        assert_eq!(a[0], b[0]);
        assert_ne!(a[1].coordinates, b[1].coordinates);
    }
}
