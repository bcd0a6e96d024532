//! The planet parameter record and the merge that fills it from a partial seed.

use serde::{Deserialize, Serialize};

use crate::biome::{Biome, BiomePalette, SoilType, TunableParameter, adjust_parameters_for_biome};
use crate::classifier::{self, LiquidType, PlanetClass};
use crate::landmarks::{Landmark, generate_default_landmarks};
use crate::rng::seed_from_key;

/// Micro-relief pattern of the ground surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SoilTexture {
    Smooth,
    #[default]
    Rough,
    Cracked,
    Layered,
    Porous,
    Grainy,
    Crystalline,
    /// Any unrecognized texture name. Uses the generic noise pattern.
    Unknown,
}

impl SoilTexture {
    pub const ALL: [SoilTexture; 7] = [
        SoilTexture::Smooth,
        SoilTexture::Rough,
        SoilTexture::Cracked,
        SoilTexture::Layered,
        SoilTexture::Porous,
        SoilTexture::Grainy,
        SoilTexture::Crystalline,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SoilTexture::Smooth => "smooth",
            SoilTexture::Rough => "rough",
            SoilTexture::Cracked => "cracked",
            SoilTexture::Layered => "layered",
            SoilTexture::Porous => "porous",
            SoilTexture::Grainy => "grainy",
            SoilTexture::Crystalline => "crystalline",
            SoilTexture::Unknown => "unknown",
        }
    }

    pub fn from_name(name: &str) -> Self {
        SoilTexture::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name))
            .unwrap_or(SoilTexture::Unknown)
    }

    /// `(scale, depth)`: noise frequency and displacement depth of the pattern.
    pub fn pattern(&self) -> (f32, f32) {
        match self {
            SoilTexture::Smooth => (5.0, 0.01),
            SoilTexture::Rough => (15.0, 0.05),
            SoilTexture::Cracked => (20.0, 0.08),
            SoilTexture::Layered => (12.0, 0.04),
            SoilTexture::Porous => (25.0, 0.06),
            SoilTexture::Grainy => (30.0, 0.03),
            SoilTexture::Crystalline => (18.0, 0.07),
            SoilTexture::Unknown => (1.0, 0.05),
        }
    }
}

impl From<String> for SoilTexture {
    fn from(s: String) -> Self {
        SoilTexture::from_name(&s)
    }
}

impl From<SoilTexture> for String {
    fn from(t: SoilTexture) -> Self {
        t.name().to_string()
    }
}

/// Full description of one planet. Mass and radius are in Earth units,
/// temperature in Kelvin; the remaining scalars are mostly unit-scaled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetParameters {
    pub seed: u64,
    pub mass: f32,
    pub radius: f32,
    pub temperature: f32,
    pub surface_roughness: f32,
    pub terrain_erosion: f32,
    pub water_height: f32,
    pub water_level: f32,
    pub biomass_level: f32,
    pub plate_tectonics: f32,
    pub soil_type: SoilType,
    pub soil_texture: SoilTexture,
    pub atmosphere_strength: f32,
    pub liquid_type: LiquidType,
    pub salinity: f32,
    pub biome: Biome,
    pub mountain_height: f32,
    pub cloud_count: f32,
    pub volcanic_activity: f32,
    pub landmarks: Vec<Landmark>,
    pub custom_colors: Option<BiomePalette>,
}

impl Default for PlanetParameters {
    fn default() -> Self {
        Self {
            seed: 0,
            mass: 1.0,
            radius: 1.0,
            temperature: 288.0,
            surface_roughness: 0.6,
            terrain_erosion: 0.3,
            water_height: 0.55,
            water_level: 0.65,
            biomass_level: 0.7,
            plate_tectonics: 0.5,
            soil_type: SoilType::Rocky,
            soil_texture: SoilTexture::Rough,
            atmosphere_strength: 0.8,
            liquid_type: LiquidType::Water,
            salinity: 0.35,
            biome: Biome::RockyHighlands,
            mountain_height: 0.6,
            cloud_count: 30.0,
            volcanic_activity: 0.2,
            landmarks: Vec::new(),
            custom_colors: None,
        }
    }
}

impl PlanetParameters {
    pub fn tunable(&self, p: TunableParameter) -> f32 {
        match p {
            TunableParameter::Temperature => self.temperature,
            TunableParameter::AtmosphereStrength => self.atmosphere_strength,
            TunableParameter::CloudCount => self.cloud_count,
            TunableParameter::WaterHeight => self.water_height,
            TunableParameter::SurfaceRoughness => self.surface_roughness,
            TunableParameter::PlateTectonics => self.plate_tectonics,
            TunableParameter::BiomassLevel => self.biomass_level,
            TunableParameter::WaterLevel => self.water_level,
            TunableParameter::Salinity => self.salinity,
            TunableParameter::VolcanicActivity => self.volcanic_activity,
        }
    }

    pub fn tunable_mut(&mut self, p: TunableParameter) -> &mut f32 {
        match p {
            TunableParameter::Temperature => &mut self.temperature,
            TunableParameter::AtmosphereStrength => &mut self.atmosphere_strength,
            TunableParameter::CloudCount => &mut self.cloud_count,
            TunableParameter::WaterHeight => &mut self.water_height,
            TunableParameter::SurfaceRoughness => &mut self.surface_roughness,
            TunableParameter::PlateTectonics => &mut self.plate_tectonics,
            TunableParameter::BiomassLevel => &mut self.biomass_level,
            TunableParameter::WaterLevel => &mut self.water_level,
            TunableParameter::Salinity => &mut self.salinity,
            TunableParameter::VolcanicActivity => &mut self.volcanic_activity,
        }
    }

    pub fn density(&self) -> f32 {
        classifier::density(self.mass, self.radius)
    }

    pub fn class(&self) -> PlanetClass {
        classifier::planet_class(self.mass, self.radius)
    }

    /// Bring a record into a consistent state: tunables clamped to the biome,
    /// liquid derived from the clamped temperature, default landmarks added
    /// when none are given.
    pub fn finalize(self) -> Self {
        let mut p = adjust_parameters_for_biome(self.biome, &self);
        p.liquid_type = classifier::liquid_type(p.temperature);
        if p.landmarks.is_empty() {
            p.landmarks = generate_default_landmarks(&p, p.seed);
        }
        p
    }
}

/// Partial planet description. Every field left `None` takes its default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetSeed {
    /// Stable identifier; keys the seed when `seed` is absent.
    pub identifier: Option<String>,
    pub seed: Option<u64>,
    pub mass: Option<f32>,
    pub radius: Option<f32>,
    pub temperature: Option<f32>,
    pub biome: Option<Biome>,
    pub surface_roughness: Option<f32>,
    pub terrain_erosion: Option<f32>,
    pub water_height: Option<f32>,
    pub water_level: Option<f32>,
    pub biomass_level: Option<f32>,
    pub plate_tectonics: Option<f32>,
    pub soil_type: Option<SoilType>,
    pub soil_texture: Option<SoilTexture>,
    pub atmosphere_strength: Option<f32>,
    pub salinity: Option<f32>,
    pub mountain_height: Option<f32>,
    pub cloud_count: Option<f32>,
    pub volcanic_activity: Option<f32>,
    pub landmarks: Option<Vec<Landmark>>,
    pub custom_colors: Option<BiomePalette>,
}

impl PlanetSeed {
    pub fn new(mass: f32, radius: f32, temperature: f32, biome: Biome) -> Self {
        Self {
            mass: Some(mass),
            radius: Some(radius),
            temperature: Some(temperature),
            biome: Some(biome),
            ..Default::default()
        }
    }

    fn resolve_seed(&self, biome: Biome, mass: f32, radius: f32, temperature: f32) -> u64 {
        if let Some(seed) = self.seed {
            return seed;
        }
        match &self.identifier {
            Some(id) => seed_from_key(id),
            None => seed_from_key(&format!("{}:{mass}:{radius}:{temperature}", biome.name())),
        }
    }
}

/// Fill a partial seed with defaults and finalize it.
pub fn merge_with_defaults(seed: &PlanetSeed) -> PlanetParameters {
    let d = PlanetParameters::default();
    let biome = seed.biome.unwrap_or(d.biome);
    let mass = seed.mass.unwrap_or(d.mass);
    let radius = seed.radius.unwrap_or(d.radius);
    let temperature = seed.temperature.unwrap_or(d.temperature);

    PlanetParameters {
        seed: seed.resolve_seed(biome, mass, radius, temperature),
        mass,
        radius,
        temperature,
        surface_roughness: seed.surface_roughness.unwrap_or(d.surface_roughness),
        terrain_erosion: seed.terrain_erosion.unwrap_or(d.terrain_erosion),
        water_height: seed.water_height.unwrap_or(d.water_height),
        water_level: seed.water_level.unwrap_or(d.water_level),
        biomass_level: seed.biomass_level.unwrap_or(d.biomass_level),
        plate_tectonics: seed.plate_tectonics.unwrap_or(d.plate_tectonics),
        soil_type: seed.soil_type.unwrap_or(d.soil_type),
        soil_texture: seed.soil_texture.unwrap_or(d.soil_texture),
        atmosphere_strength: seed.atmosphere_strength.unwrap_or(d.atmosphere_strength),
        liquid_type: d.liquid_type,
        salinity: seed.salinity.unwrap_or(d.salinity),
        biome,
        mountain_height: seed.mountain_height.unwrap_or(d.mountain_height),
        cloud_count: seed.cloud_count.unwrap_or(d.cloud_count),
        volcanic_activity: seed.volcanic_activity.unwrap_or(d.volcanic_activity),
        landmarks: seed.landmarks.clone().unwrap_or_default(),
        custom_colors: seed.custom_colors,
    }
    .finalize()
}
