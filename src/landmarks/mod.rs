//! Landmark field: named surface or atmospheric features that locally
//! perturb elevation around a point on the sphere.

pub mod generate;
pub mod influence;
pub mod profile;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::classifier::PlanetClass;
use crate::params::PlanetParameters;

pub use generate::generate_default_landmarks;
pub use influence::{
    TerrainInfluence, apply_landmark_effect, calculate_landmark_influence,
    calculate_landmark_terrain_influence,
};

/// At most this many landmarks take part in evaluation.
pub const MAX_ACTIVE_LANDMARKS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandmarkCategory {
    Terrestrial,
    Gaseous,
}

impl From<PlanetClass> for LandmarkCategory {
    fn from(class: PlanetClass) -> Self {
        match class {
            PlanetClass::Terrestrial => LandmarkCategory::Terrestrial,
            PlanetClass::Gaseous => LandmarkCategory::Gaseous,
        }
    }
}

/// How a landmark reshapes the height field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InfluenceType {
    Crater,
    Mountain,
    Valley,
    Volcano,
    Basin,
    Dune,
    Glacier,
    Canyon,
    OceanRidge,
    Trench,
    IcePatch,
    LavaFlow,
    Storm,
    Vortex,
    Band,
    Spot,
    Turbulent,
    Cyclone,
    Anticyclone,
    ZonalFlow,
    /// Unrecognized type; contributes nothing.
    #[default]
    Unknown,
}

impl InfluenceType {
    pub const TERRESTRIAL: [InfluenceType; 12] = [
        InfluenceType::Mountain,
        InfluenceType::Crater,
        InfluenceType::Valley,
        InfluenceType::Basin,
        InfluenceType::Canyon,
        InfluenceType::Volcano,
        InfluenceType::Dune,
        InfluenceType::Glacier,
        InfluenceType::Trench,
        InfluenceType::OceanRidge,
        InfluenceType::IcePatch,
        InfluenceType::LavaFlow,
    ];

    pub const GASEOUS: [InfluenceType; 8] = [
        InfluenceType::Storm,
        InfluenceType::Vortex,
        InfluenceType::Band,
        InfluenceType::Spot,
        InfluenceType::Turbulent,
        InfluenceType::Cyclone,
        InfluenceType::Anticyclone,
        InfluenceType::ZonalFlow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InfluenceType::Crater => "crater",
            InfluenceType::Mountain => "mountain",
            InfluenceType::Valley => "valley",
            InfluenceType::Volcano => "volcano",
            InfluenceType::Basin => "basin",
            InfluenceType::Dune => "dune",
            InfluenceType::Glacier => "glacier",
            InfluenceType::Canyon => "canyon",
            InfluenceType::OceanRidge => "ocean_ridge",
            InfluenceType::Trench => "trench",
            InfluenceType::IcePatch => "ice_patch",
            InfluenceType::LavaFlow => "lava_flow",
            InfluenceType::Storm => "storm",
            InfluenceType::Vortex => "vortex",
            InfluenceType::Band => "band",
            InfluenceType::Spot => "spot",
            InfluenceType::Turbulent => "turbulent",
            InfluenceType::Cyclone => "cyclone",
            InfluenceType::Anticyclone => "anticyclone",
            InfluenceType::ZonalFlow => "zonal_flow",
            InfluenceType::Unknown => "unknown",
        }
    }

    pub fn from_name(name: &str) -> Self {
        Self::TERRESTRIAL
            .iter()
            .chain(Self::GASEOUS.iter())
            .copied()
            .find(|t| t.name() == name)
            .unwrap_or(InfluenceType::Unknown)
    }

    /// Human-readable label for UI listings.
    pub fn display_name(&self) -> &'static str {
        match self {
            InfluenceType::Mountain => "Mountain Range",
            InfluenceType::Crater => "Impact Crater",
            InfluenceType::Valley => "Valley",
            InfluenceType::Basin => "Basin",
            InfluenceType::Canyon => "Canyon",
            InfluenceType::Trench => "Oceanic Trench",
            InfluenceType::Dune => "Dune Field",
            InfluenceType::Volcano => "Volcano",
            InfluenceType::Glacier => "Glacier",
            InfluenceType::OceanRidge => "Ocean Ridge",
            InfluenceType::IcePatch => "Ice Patch",
            InfluenceType::LavaFlow => "Lava Flow",
            InfluenceType::Storm => "Storm System",
            InfluenceType::Vortex => "Vortex",
            InfluenceType::Band => "Cloud Band",
            InfluenceType::Spot => "Persistent Spot",
            InfluenceType::Turbulent => "Turbulent Region",
            InfluenceType::Cyclone => "Cyclonic Storm",
            InfluenceType::Anticyclone => "Anticyclonic System",
            InfluenceType::ZonalFlow => "Zonal Flow Pattern",
            InfluenceType::Unknown => "Unknown",
        }
    }

    pub fn category(&self) -> Option<LandmarkCategory> {
        if Self::GASEOUS.contains(self) {
            Some(LandmarkCategory::Gaseous)
        } else if Self::TERRESTRIAL.contains(self) {
            Some(LandmarkCategory::Terrestrial)
        } else {
            None
        }
    }
}

impl From<String> for InfluenceType {
    fn from(s: String) -> Self {
        InfluenceType::from_name(&s)
    }
}

impl From<InfluenceType> for String {
    fn from(t: InfluenceType) -> Self {
        t.name().to_string()
    }
}

/// Influence types a user may add to a planet. Volcanoes need volcanic
/// activity above 0.5, glaciers need temperatures under 250 K, and ocean
/// ridges and trenches need a water level above 0.5.
pub fn available_influence_types(
    category: LandmarkCategory,
    params: &PlanetParameters,
) -> Vec<InfluenceType> {
    match category {
        LandmarkCategory::Gaseous => InfluenceType::GASEOUS.to_vec(),
        LandmarkCategory::Terrestrial => {
            let mut types = vec![
                InfluenceType::Mountain,
                InfluenceType::Crater,
                InfluenceType::Valley,
                InfluenceType::Basin,
                InfluenceType::Canyon,
                InfluenceType::Dune,
            ];
            if params.volcanic_activity > 0.5 {
                types.push(InfluenceType::Volcano);
            }
            if params.temperature < 250.0 {
                types.push(InfluenceType::Glacier);
            }
            if params.water_level > 0.5 {
                types.push(InfluenceType::OceanRidge);
                types.push(InfluenceType::Trench);
            }
            types
        }
    }
}

/// Named landmark type, shown to users.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LandmarkKind {
    MountainPeak,
    ActiveVolcano,
    OceanicTrench,
    SandFormation,
    IceFormation,
    RiverValley,
    ImpactCrater,
    GreatStorm,
    CyclonicFormation,
    AtmosphericBands,
    Vortex,
    Unidentified,
}

impl LandmarkKind {
    const ALL: [LandmarkKind; 11] = [
        LandmarkKind::MountainPeak,
        LandmarkKind::ActiveVolcano,
        LandmarkKind::OceanicTrench,
        LandmarkKind::SandFormation,
        LandmarkKind::IceFormation,
        LandmarkKind::RiverValley,
        LandmarkKind::ImpactCrater,
        LandmarkKind::GreatStorm,
        LandmarkKind::CyclonicFormation,
        LandmarkKind::AtmosphericBands,
        LandmarkKind::Vortex,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LandmarkKind::MountainPeak => "Mountain Peak",
            LandmarkKind::ActiveVolcano => "Active Volcano",
            LandmarkKind::OceanicTrench => "Oceanic Trench",
            LandmarkKind::SandFormation => "Sand Formation",
            LandmarkKind::IceFormation => "Ice Formation",
            LandmarkKind::RiverValley => "River Valley",
            LandmarkKind::ImpactCrater => "Impact Crater",
            LandmarkKind::GreatStorm => "Great Storm",
            LandmarkKind::CyclonicFormation => "Cyclonic Formation",
            LandmarkKind::AtmosphericBands => "Atmospheric Bands",
            LandmarkKind::Vortex => "Vortex",
            LandmarkKind::Unidentified => "Unidentified",
        }
    }

    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == name)
            .unwrap_or(LandmarkKind::Unidentified)
    }
}

impl From<String> for LandmarkKind {
    fn from(s: String) -> Self {
        LandmarkKind::from_name(&s)
    }
}

impl From<LandmarkKind> for String {
    fn from(k: LandmarkKind) -> Self {
        k.name().to_string()
    }
}

/// A feature anchored at a direction on the unit sphere. Radius is angular
/// (radians, i.e. a fraction of planet radius along the surface). A landmark
/// missing its radius or strength has no effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub classification_id: String,
    pub kind: LandmarkKind,
    pub visual_effect: String,
    pub coordinates: Vec3,
    pub influence_type: InfluenceType,
    pub influence_radius: Option<f32>,
    pub influence_strength: Option<f32>,
    pub influence_roughness: Option<f32>,
    pub category: LandmarkCategory,
}

impl Landmark {
    /// Radius and strength, when both are set.
    #[inline]
    pub fn active_params(&self) -> Option<(f32, f32)> {
        Some((self.influence_radius?, self.influence_strength?))
    }
}

/// Landmarks that take part in evaluating a planet of `class`: matching
/// category, capped at [`MAX_ACTIVE_LANDMARKS`].
pub fn active_landmarks(landmarks: &[Landmark], class: PlanetClass) -> Vec<Landmark> {
    let category = LandmarkCategory::from(class);
    landmarks
        .iter()
        .filter(|l| l.category == category)
        .take(MAX_ACTIVE_LANDMARKS)
        .cloned()
        .collect()
}
