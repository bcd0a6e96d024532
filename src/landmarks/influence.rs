use glam::Vec3;

use super::{InfluenceType, Landmark};

/// Great-circle angle between two directions. Exactly 0 for equal inputs.
#[inline]
fn angle_between(a: Vec3, b: Vec3) -> f32 {
    a.cross(b).length().atan2(a.dot(b))
}

/// Linear-falloff influence of `landmark` at `position`: `influence_strength`
/// at the centre, 0 at and beyond `influence_radius` (angular distance along
/// the surface, measured in planet radii).
pub fn calculate_landmark_influence(position: Vec3, landmark: &Landmark, planet_radius: f32) -> f32 {
    let Some((radius, strength)) = landmark.active_params() else {
        return 0.0;
    };
    let p = position.normalize_or_zero();
    let c = landmark.coordinates.normalize_or_zero();
    if p == Vec3::ZERO || c == Vec3::ZERO || radius <= 0.0 || planet_radius <= 0.0 {
        return 0.0;
    }

    let surface_distance = angle_between(p, c) * planet_radius;
    let max_distance = radius * planet_radius;
    if surface_distance >= max_distance {
        return 0.0;
    }
    strength * (1.0 - surface_distance / max_distance)
}

/// Height and roughness deltas from one landmark, for the terrain synthesizer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TerrainInfluence {
    pub height: f32,
    pub roughness: f32,
}

/// Per-type height contribution at chord distance `d` from the centre.
/// Measured on the unit sphere, so independent of planet radius.
pub fn calculate_landmark_terrain_influence(position: Vec3, landmark: &Landmark) -> TerrainInfluence {
    let Some((radius, strength)) = landmark.active_params() else {
        return TerrainInfluence::default();
    };
    if radius <= 0.0 {
        return TerrainInfluence::default();
    }
    let d = (position.normalize_or_zero() - landmark.coordinates.normalize_or_zero()).length();
    if d > radius {
        return TerrainInfluence::default();
    }
    let influence = strength * (1.0 - d / radius);

    let height = influence
        * match landmark.influence_type {
            InfluenceType::Crater => -0.05,
            InfluenceType::Mountain => 0.08,
            InfluenceType::Valley => -0.04,
            InfluenceType::Volcano => 0.10,
            InfluenceType::Basin => -0.03,
            InfluenceType::Dune => 0.02 * (d * 5.0).sin(),
            InfluenceType::Glacier => 0.03,
            InfluenceType::Canyon => -0.06,
            InfluenceType::OceanRidge => 0.04,
            InfluenceType::Trench => -0.08,
            InfluenceType::IcePatch => 0.01,
            InfluenceType::LavaFlow => 0.02,
            InfluenceType::Storm => 0.03,
            InfluenceType::Cyclone => 0.025,
            InfluenceType::Anticyclone => -0.025,
            InfluenceType::Vortex => -0.03,
            InfluenceType::Band => 0.015,
            InfluenceType::Spot => 0.02,
            InfluenceType::Turbulent => 0.01 * (d * 20.0).sin(),
            InfluenceType::ZonalFlow => 0.01,
            InfluenceType::Unknown => 0.0,
        };
    let roughness = match landmark.influence_type {
        InfluenceType::Volcano => 0.1 * influence * landmark.influence_roughness.unwrap_or(0.5),
        _ => 0.0,
    };
    TerrainInfluence { height, roughness }
}

/// Reshape `base_height` by `influence` according to the landmark type.
/// Used by the coarse relief path; unknown types pass the height through.
pub fn apply_landmark_effect(base_height: f32, influence: f32, influence_type: InfluenceType) -> f32 {
    let delta = match influence_type {
        InfluenceType::Mountain => 0.8 * influence,
        InfluenceType::Crater => -0.5 * influence,
        InfluenceType::Valley => -0.6 * influence,
        InfluenceType::Volcano => influence,
        InfluenceType::Basin => -0.4 * influence,
        InfluenceType::Dune => (base_height * 10.0).sin() * 0.2 * influence,
        InfluenceType::Glacier => 0.3 * influence,
        InfluenceType::Canyon => -0.7 * influence,
        InfluenceType::OceanRidge => 0.4 * influence,
        InfluenceType::Trench => -0.9 * influence,
        InfluenceType::IcePatch => 0.1 * influence,
        InfluenceType::LavaFlow => 0.2 * influence,
        InfluenceType::Storm => 0.3 * influence,
        InfluenceType::Cyclone => 0.25 * influence,
        InfluenceType::Anticyclone => -0.25 * influence,
        InfluenceType::Vortex => -0.3 * influence,
        InfluenceType::Band => 0.15 * influence,
        InfluenceType::Spot => 0.2 * influence,
        InfluenceType::Turbulent => (base_height * 20.0).sin() * 0.1 * influence,
        InfluenceType::ZonalFlow => 0.1 * influence,
        InfluenceType::Unknown => 0.0,
    };
    base_height + delta
}
