//! Biome catalogue: per-biome parameter ranges, surface deposits, palettes,
//! and the soil-type color tint.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::params::PlanetParameters;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Biome {
    RockyHighlands,
    BarrenWasteland,
    AridDunes,
    FrigidExpanse,
    VolcanicTerrain,
    BasaltPlains,
    SedimentFlats,
    CrateredTerrain,
    TundraBasin,
    TemperateHighlands,
    OceanicWorld,
    TropicalJungle,
    FloodBasin,
    CoralReefs,
    DuneFields,
    /// Any unrecognized biome name. Resolves to the universal defaults.
    #[default]
    Unknown,
}

impl Biome {
    pub const ALL: [Biome; 15] = [
        Biome::RockyHighlands,
        Biome::BarrenWasteland,
        Biome::AridDunes,
        Biome::FrigidExpanse,
        Biome::VolcanicTerrain,
        Biome::BasaltPlains,
        Biome::SedimentFlats,
        Biome::CrateredTerrain,
        Biome::TundraBasin,
        Biome::TemperateHighlands,
        Biome::OceanicWorld,
        Biome::TropicalJungle,
        Biome::FloodBasin,
        Biome::CoralReefs,
        Biome::DuneFields,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Biome::RockyHighlands => "Rocky Highlands",
            Biome::BarrenWasteland => "Barren Wasteland",
            Biome::AridDunes => "Arid Dunes",
            Biome::FrigidExpanse => "Frigid Expanse",
            Biome::VolcanicTerrain => "Volcanic Terrain",
            Biome::BasaltPlains => "Basalt Plains",
            Biome::SedimentFlats => "Sediment Flats",
            Biome::CrateredTerrain => "Cratered Terrain",
            Biome::TundraBasin => "Tundra Basin",
            Biome::TemperateHighlands => "Temperate Highlands",
            Biome::OceanicWorld => "Oceanic World",
            Biome::TropicalJungle => "Tropical Jungle",
            Biome::FloodBasin => "Flood Basin",
            Biome::CoralReefs => "Coral Reefs",
            Biome::DuneFields => "Dune Fields",
            Biome::Unknown => "Unknown",
        }
    }

    /// Exact display-name lookup; anything else is `Unknown`.
    pub fn from_name(name: &str) -> Self {
        Biome::ALL
            .iter()
            .copied()
            .find(|b| b.name() == name)
            .unwrap_or(Biome::Unknown)
    }

    #[inline]
    fn table_index(self) -> Option<usize> {
        (self != Biome::Unknown).then_some(self as usize)
    }
}

impl From<String> for Biome {
    fn from(s: String) -> Self {
        Biome::from_name(&s)
    }
}

impl From<Biome> for String {
    fn from(b: Biome) -> Self {
        b.name().to_string()
    }
}

/// The ten scalar parameters a biome constrains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TunableParameter {
    Temperature,
    AtmosphereStrength,
    CloudCount,
    WaterHeight,
    SurfaceRoughness,
    PlateTectonics,
    BiomassLevel,
    WaterLevel,
    Salinity,
    VolcanicActivity,
}

impl TunableParameter {
    pub const ALL: [TunableParameter; 10] = [
        TunableParameter::Temperature,
        TunableParameter::AtmosphereStrength,
        TunableParameter::CloudCount,
        TunableParameter::WaterHeight,
        TunableParameter::SurfaceRoughness,
        TunableParameter::PlateTectonics,
        TunableParameter::BiomassLevel,
        TunableParameter::WaterLevel,
        TunableParameter::Salinity,
        TunableParameter::VolcanicActivity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TunableParameter::Temperature => "temperature",
            TunableParameter::AtmosphereStrength => "atmosphereStrength",
            TunableParameter::CloudCount => "cloudCount",
            TunableParameter::WaterHeight => "waterHeight",
            TunableParameter::SurfaceRoughness => "surfaceRoughness",
            TunableParameter::PlateTectonics => "plateTectonics",
            TunableParameter::BiomassLevel => "biomassLevel",
            TunableParameter::WaterLevel => "waterLevel",
            TunableParameter::Salinity => "salinity",
            TunableParameter::VolcanicActivity => "volcanicActivity",
        }
    }

    /// Accepts both `camelCase` and `snake_case` keys.
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name.chars().filter(|c| *c != '_').collect();
        TunableParameter::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(&key))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Range used when a parameter name is not one of the ten tunables.
pub const UNIT_RANGE: ParamRange = ParamRange::new(0.0, 1.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeRanges {
    pub temperature: ParamRange,
    pub atmosphere_strength: ParamRange,
    pub cloud_count: ParamRange,
    pub water_height: ParamRange,
    pub surface_roughness: ParamRange,
    pub plate_tectonics: ParamRange,
    pub biomass_level: ParamRange,
    pub water_level: ParamRange,
    pub salinity: ParamRange,
    pub volcanic_activity: ParamRange,
}

impl BiomeRanges {
    pub fn get(&self, parameter: TunableParameter) -> ParamRange {
        match parameter {
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
}

pub static DEFAULT_RANGES: BiomeRanges = BiomeRanges {
    temperature: ParamRange::new(50.0, 400.0),
    atmosphere_strength: ParamRange::new(0.0, 1.0),
    cloud_count: ParamRange::new(0.0, 100.0),
    water_height: ParamRange::new(0.0, 1.0),
    surface_roughness: ParamRange::new(0.0, 2.0),
    plate_tectonics: ParamRange::new(0.0, 1.0),
    biomass_level: ParamRange::new(0.0, 1.0),
    water_level: ParamRange::new(0.0, 1.0),
    salinity: ParamRange::new(0.0, 1.0),
    volcanic_activity: ParamRange::new(0.0, 1.0),
};

static BIOME_RANGES: [BiomeRanges; 15] = [
    // Rocky Highlands
    BiomeRanges {
        temperature: ParamRange::new(240.0, 320.0),
        atmosphere_strength: ParamRange::new(0.3, 0.7),
        cloud_count: ParamRange::new(10.0, 60.0),
        water_height: ParamRange::new(0.0, 0.2),
        surface_roughness: ParamRange::new(0.5, 1.0),
        plate_tectonics: ParamRange::new(0.4, 0.9),
        biomass_level: ParamRange::new(0.01, 0.2),
        water_level: ParamRange::new(0.1, 0.3),
        salinity: ParamRange::new(0.1, 0.5),
        volcanic_activity: ParamRange::new(0.2, 0.8),
    },
    // Barren Wasteland
    BiomeRanges {
        temperature: ParamRange::new(180.0, 260.0),
        atmosphere_strength: ParamRange::new(0.1, 0.5),
        cloud_count: ParamRange::new(0.0, 10.0),
        water_height: ParamRange::new(0.0, 0.05),
        surface_roughness: ParamRange::new(0.2, 0.8),
        plate_tectonics: ParamRange::new(0.1, 0.5),
        biomass_level: ParamRange::new(0.0, 0.05),
        water_level: ParamRange::new(0.0, 0.1),
        salinity: ParamRange::new(0.0, 0.3),
        volcanic_activity: ParamRange::new(0.0, 0.3),
    },
    // Arid Dunes
    BiomeRanges {
        temperature: ParamRange::new(250.0, 330.0),
        atmosphere_strength: ParamRange::new(0.2, 0.6),
        cloud_count: ParamRange::new(5.0, 40.0),
        water_height: ParamRange::new(0.0, 0.2),
        surface_roughness: ParamRange::new(0.3, 0.9),
        plate_tectonics: ParamRange::new(0.1, 0.4),
        biomass_level: ParamRange::new(0.0, 0.1),
        water_level: ParamRange::new(0.0, 0.2),
        salinity: ParamRange::new(0.0, 0.4),
        volcanic_activity: ParamRange::new(0.1, 0.6),
    },
    // Frigid Expanse
    BiomeRanges {
        temperature: ParamRange::new(120.0, 240.0),
        atmosphere_strength: ParamRange::new(0.4, 0.9),
        cloud_count: ParamRange::new(20.0, 100.0),
        water_height: ParamRange::new(0.1, 0.5),
        surface_roughness: ParamRange::new(0.2, 0.6),
        plate_tectonics: ParamRange::new(0.1, 0.3),
        biomass_level: ParamRange::new(0.0, 0.3),
        water_level: ParamRange::new(0.2, 0.8),
        salinity: ParamRange::new(0.2, 0.8),
        volcanic_activity: ParamRange::new(0.0, 0.2),
    },
    // Volcanic Terrain
    BiomeRanges {
        temperature: ParamRange::new(300.0, 1200.0),
        atmosphere_strength: ParamRange::new(0.5, 1.2),
        cloud_count: ParamRange::new(15.0, 70.0),
        water_height: ParamRange::new(0.0, 0.1),
        surface_roughness: ParamRange::new(0.7, 1.2),
        plate_tectonics: ParamRange::new(0.5, 1.0),
        biomass_level: ParamRange::new(0.02, 0.1),
        water_level: ParamRange::new(0.0, 0.2),
        salinity: ParamRange::new(0.0, 0.2),
        volcanic_activity: ParamRange::new(0.5, 1.2),
    },
    // Basalt Plains
    BiomeRanges {
        temperature: ParamRange::new(220.0, 350.0),
        atmosphere_strength: ParamRange::new(0.3, 0.8),
        cloud_count: ParamRange::new(10.0, 50.0),
        water_height: ParamRange::new(0.0, 0.3),
        surface_roughness: ParamRange::new(0.3, 0.7),
        plate_tectonics: ParamRange::new(0.3, 0.7),
        biomass_level: ParamRange::new(0.0, 0.15),
        water_level: ParamRange::new(0.0, 0.3),
        salinity: ParamRange::new(0.1, 0.4),
        volcanic_activity: ParamRange::new(0.2, 0.6),
    },
    // Sediment Flats
    BiomeRanges {
        temperature: ParamRange::new(260.0, 310.0),
        atmosphere_strength: ParamRange::new(0.4, 0.7),
        cloud_count: ParamRange::new(20.0, 60.0),
        water_height: ParamRange::new(0.1, 0.4),
        surface_roughness: ParamRange::new(0.1, 0.4),
        plate_tectonics: ParamRange::new(0.1, 0.4),
        biomass_level: ParamRange::new(0.05, 0.3),
        water_level: ParamRange::new(0.2, 0.5),
        salinity: ParamRange::new(0.2, 0.6),
        volcanic_activity: ParamRange::new(0.0, 0.3),
    },
    // Cratered Terrain
    BiomeRanges {
        temperature: ParamRange::new(200.0, 300.0),
        atmosphere_strength: ParamRange::new(0.1, 0.6),
        cloud_count: ParamRange::new(5.0, 40.0),
        water_height: ParamRange::new(0.0, 0.2),
        surface_roughness: ParamRange::new(0.4, 0.9),
        plate_tectonics: ParamRange::new(0.0, 0.3),
        biomass_level: ParamRange::new(0.0, 0.1),
        water_level: ParamRange::new(0.0, 0.2),
        salinity: ParamRange::new(0.0, 0.3),
        volcanic_activity: ParamRange::new(0.0, 0.4),
    },
    // Tundra Basin
    BiomeRanges {
        temperature: ParamRange::new(180.0, 270.0),
        atmosphere_strength: ParamRange::new(0.4, 0.8),
        cloud_count: ParamRange::new(30.0, 80.0),
        water_height: ParamRange::new(0.2, 0.5),
        surface_roughness: ParamRange::new(0.2, 0.5),
        plate_tectonics: ParamRange::new(0.1, 0.4),
        biomass_level: ParamRange::new(0.1, 0.4),
        water_level: ParamRange::new(0.3, 0.6),
        salinity: ParamRange::new(0.1, 0.4),
        volcanic_activity: ParamRange::new(0.0, 0.2),
    },
    // Temperate Highlands
    BiomeRanges {
        temperature: ParamRange::new(270.0, 310.0),
        atmosphere_strength: ParamRange::new(0.5, 0.9),
        cloud_count: ParamRange::new(40.0, 90.0),
        water_height: ParamRange::new(0.3, 0.6),
        surface_roughness: ParamRange::new(0.4, 0.8),
        plate_tectonics: ParamRange::new(0.3, 0.7),
        biomass_level: ParamRange::new(0.3, 0.8),
        water_level: ParamRange::new(0.3, 0.7),
        salinity: ParamRange::new(0.2, 0.5),
        volcanic_activity: ParamRange::new(0.1, 0.4),
    },
    // Oceanic World
    BiomeRanges {
        temperature: ParamRange::new(260.0, 320.0),
        atmosphere_strength: ParamRange::new(0.6, 1.0),
        cloud_count: ParamRange::new(60.0, 100.0),
        water_height: ParamRange::new(0.9, 1.0),
        surface_roughness: ParamRange::new(0.1, 0.3),
        plate_tectonics: ParamRange::new(0.2, 0.6),
        biomass_level: ParamRange::new(0.4, 0.9),
        water_level: ParamRange::new(0.9, 1.0),
        salinity: ParamRange::new(0.5, 0.9),
        volcanic_activity: ParamRange::new(0.1, 0.5),
    },
    // Tropical Jungle
    BiomeRanges {
        temperature: ParamRange::new(290.0, 330.0),
        atmosphere_strength: ParamRange::new(0.7, 1.0),
        cloud_count: ParamRange::new(70.0, 100.0),
        water_height: ParamRange::new(0.4, 0.7),
        surface_roughness: ParamRange::new(0.3, 0.7),
        plate_tectonics: ParamRange::new(0.2, 0.5),
        biomass_level: ParamRange::new(0.7, 1.0),
        water_level: ParamRange::new(0.5, 0.8),
        salinity: ParamRange::new(0.2, 0.4),
        volcanic_activity: ParamRange::new(0.1, 0.3),
    },
    // Flood Basin
    BiomeRanges {
        temperature: ParamRange::new(270.0, 320.0),
        atmosphere_strength: ParamRange::new(0.5, 0.9),
        cloud_count: ParamRange::new(50.0, 90.0),
        water_height: ParamRange::new(0.5, 0.8),
        surface_roughness: ParamRange::new(0.1, 0.3),
        plate_tectonics: ParamRange::new(0.1, 0.3),
        biomass_level: ParamRange::new(0.3, 0.7),
        water_level: ParamRange::new(0.6, 0.9),
        salinity: ParamRange::new(0.3, 0.6),
        volcanic_activity: ParamRange::new(0.0, 0.2),
    },
    // Coral Reefs
    BiomeRanges {
        temperature: ParamRange::new(280.0, 310.0),
        atmosphere_strength: ParamRange::new(0.6, 0.9),
        cloud_count: ParamRange::new(40.0, 80.0),
        water_height: ParamRange::new(0.6, 0.9),
        surface_roughness: ParamRange::new(0.2, 0.5),
        plate_tectonics: ParamRange::new(0.1, 0.4),
        biomass_level: ParamRange::new(0.6, 0.9),
        water_level: ParamRange::new(0.7, 0.9),
        salinity: ParamRange::new(0.6, 0.9),
        volcanic_activity: ParamRange::new(0.0, 0.2),
    },
    // Dune Fields
    BiomeRanges {
        temperature: ParamRange::new(270.0, 350.0),
        atmosphere_strength: ParamRange::new(0.2, 0.6),
        cloud_count: ParamRange::new(10.0, 50.0),
        water_height: ParamRange::new(0.0, 0.1),
        surface_roughness: ParamRange::new(0.3, 0.7),
        plate_tectonics: ParamRange::new(0.0, 0.3),
        biomass_level: ParamRange::new(0.0, 0.1),
        water_level: ParamRange::new(0.0, 0.1),
        salinity: ParamRange::new(0.0, 0.3),
        volcanic_activity: ParamRange::new(0.0, 0.3),
    },
];

static SURFACE_DEPOSITS: [&[&str]; 15] = [
    &["Bedrock", "Big Rocks", "Surface Cracks"],
    &["Dust Deposits", "Surface Cracks"],
    &["Sand", "Unconsolidated Soil"],
    &["Ice Sheets", "Frozen Lakes"],
    &["Volcanic Ash", "Lava Fields"],
    &["Basaltic Rock", "Mineral Deposits"],
    &["Clay", "Fine Sand", "Sulfate-Rich Soil"],
    &["Regolith", "Dust Deposits"],
    &["Permafrost", "Pebbles", "Rocky Terrain"],
    &["Mineral-Rich Soil", "Loam"],
    &["Deep Water", "Sedimentary Layers"],
    &["Dense Vegetation", "Wet Soil"],
    &["Silt", "Muddy Terrain"],
    &["Limestone", "Organic Deposits"],
    &["Fine Sand", "Wind-Driven Erosion"],
];

static BIOME_PALETTES: [BiomePalette; 15] = [
    BiomePalette::from_hex(0x3D2314, 0x8D6E63, 0xA1887F, 0xE0E0E0),
    BiomePalette::from_hex(0x3E2723, 0x5D4037, 0x795548, 0xA1887F),
    BiomePalette::from_hex(0xB59677, 0xD7CDA5, 0xE6D7B3, 0xF5EED5),
    BiomePalette::from_hex(0x78909C, 0xB0BEC5, 0xECEFF1, 0xFFFFFF),
    BiomePalette::from_hex(0x1A1A1A, 0x3E2723, 0x5D4037, 0x795548),
    BiomePalette::from_hex(0x212121, 0x424242, 0x616161, 0x9E9E9E),
    BiomePalette::from_hex(0x6D4C41, 0x8D6E63, 0xBCAAA4, 0xD7CCC8),
    BiomePalette::from_hex(0x424242, 0x616161, 0x9E9E9E, 0xE0E0E0),
    BiomePalette::from_hex(0x546E7A, 0x78909C, 0xB0BEC5, 0xECEFF1),
    BiomePalette::from_hex(0x2E7D32, 0x43A047, 0x66BB6A, 0xA5D6A7),
    BiomePalette::from_hex(0x01579B, 0x0288D1, 0x29B6F6, 0x81D4FA),
    BiomePalette::from_hex(0x1B5E20, 0x2E7D32, 0x43A047, 0x66BB6A),
    BiomePalette::from_hex(0x00695C, 0x00897B, 0x26A69A, 0x80CBC4),
    BiomePalette::from_hex(0x0277BD, 0x039BE5, 0x29B6F6, 0x81D4FA),
    BiomePalette::from_hex(0xBF360C, 0xE64A19, 0xFF7043, 0xFFAB91),
];

static UNKNOWN_DEPOSITS: &[&str] = &["Unknown"];
static FALLBACK_PALETTE: BiomePalette = BiomePalette::from_hex(0x3D2314, 0x8D6E63, 0xA1887F, 0xE0E0E0);

/// Ranges for every tunable of `biome`; `Unknown` gets the universal defaults.
pub fn biome_ranges(biome: Biome) -> &'static BiomeRanges {
    biome.table_index().map_or(&DEFAULT_RANGES, |i| &BIOME_RANGES[i])
}

pub fn get_parameter_range(biome: Biome, parameter: TunableParameter) -> ParamRange {
    biome_ranges(biome).get(parameter)
}

/// String-keyed lookup; unknown parameter names get [0, 1].
pub fn parameter_range_by_name(biome: Biome, parameter: &str) -> ParamRange {
    TunableParameter::from_name(parameter).map_or(UNIT_RANGE, |p| get_parameter_range(biome, p))
}

/// Never panics, even on an inverted range (min wins).
#[inline]
pub fn clamp_to_range(value: f32, range: ParamRange) -> f32 {
    value.min(range.max).max(range.min)
}

/// Copy of `params` with all ten tunables clamped into the ranges of `biome`.
pub fn adjust_parameters_for_biome(biome: Biome, params: &PlanetParameters) -> PlanetParameters {
    let ranges = biome_ranges(biome);
    let mut out = params.clone();
    for p in TunableParameter::ALL {
        let v = out.tunable_mut(p);
        *v = clamp_to_range(*v, ranges.get(p));
    }
    out
}

pub fn get_surface_deposits(biome: Biome) -> &'static [&'static str] {
    biome.table_index().map_or(UNKNOWN_DEPOSITS, |i| SURFACE_DEPOSITS[i])
}

/// Four-band terrain palette, indexed by terrain type.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomePalette {
    pub ocean_floor: Rgb,
    pub beach: Rgb,
    pub regular: Rgb,
    pub mountain: Rgb,
}

impl BiomePalette {
    pub const fn from_hex(ocean_floor: u32, beach: u32, regular: u32, mountain: u32) -> Self {
        Self {
            ocean_floor: Rgb::hex(ocean_floor),
            beach: Rgb::hex(beach),
            regular: Rgb::hex(regular),
            mountain: Rgb::hex(mountain),
        }
    }
}

pub fn get_biome_colors(biome: Biome) -> BiomePalette {
    biome.table_index().map_or(FALLBACK_PALETTE, |i| BIOME_PALETTES[i])
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SoilType {
    #[default]
    Rocky,
    Sandy,
    Volcanic,
    Organic,
    Dusty,
    Frozen,
    Muddy,
    /// Any unrecognized soil name. Carries no tint.
    Unknown,
}

impl SoilType {
    pub const ALL: [SoilType; 7] = [
        SoilType::Rocky,
        SoilType::Sandy,
        SoilType::Volcanic,
        SoilType::Organic,
        SoilType::Dusty,
        SoilType::Frozen,
        SoilType::Muddy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SoilType::Rocky => "rocky",
            SoilType::Sandy => "sandy",
            SoilType::Volcanic => "volcanic",
            SoilType::Organic => "organic",
            SoilType::Dusty => "dusty",
            SoilType::Frozen => "frozen",
            SoilType::Muddy => "muddy",
            SoilType::Unknown => "unknown",
        }
    }

    pub fn from_name(name: &str) -> Self {
        SoilType::ALL
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(name))
            .unwrap_or(SoilType::Unknown)
    }

    /// Per-channel RGB delta in normalized units.
    pub fn delta(&self) -> [f32; 3] {
        match self {
            SoilType::Rocky => [0.0, -0.05, -0.05],
            SoilType::Sandy => [0.1, 0.05, -0.1],
            SoilType::Volcanic => [-0.1, -0.1, -0.1],
            SoilType::Organic => [-0.1, 0.1, -0.1],
            SoilType::Dusty => [0.05, 0.0, -0.05],
            SoilType::Frozen => [-0.05, 0.0, 0.1],
            SoilType::Muddy => [-0.05, -0.05, -0.1],
            SoilType::Unknown => [0.0, 0.0, 0.0],
        }
    }

    /// Delta applied and clamped, without 8-bit quantization.
    #[inline]
    pub fn tint(&self, color: Rgb) -> Rgb {
        let [dr, dg, db] = self.delta();
        color.offset(dr, dg, db).clamped()
    }

    /// Representative ground color, blended into coarse relief maps.
    pub fn base_color(&self) -> Rgb {
        match self {
            SoilType::Rocky => Rgb::hex(0x8B7765),
            SoilType::Sandy => Rgb::hex(0xD2B48C),
            SoilType::Volcanic => Rgb::hex(0x3B3131),
            SoilType::Organic => Rgb::hex(0x5C4033),
            SoilType::Dusty => Rgb::hex(0xC2B280),
            SoilType::Frozen => Rgb::hex(0xDDE6F0),
            SoilType::Muddy => Rgb::hex(0x6B5344),
            SoilType::Unknown => Rgb::hex(0x808080),
        }
    }
}

impl From<String> for SoilType {
    fn from(s: String) -> Self {
        SoilType::from_name(&s)
    }
}

impl From<SoilType> for String {
    fn from(s: SoilType) -> Self {
        s.name().to_string()
    }
}

/// Shift `color` by the soil delta, clamp, and snap back to 8-bit channels.
pub fn modify_color_for_soil_type(color: Rgb, soil: SoilType) -> Rgb {
    soil.tint(color).quantized()
}

/// Six-band land palette chosen from temperature regime and biomass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainColors {
    pub beach: Rgb,
    pub lowland: Rgb,
    pub midland: Rgb,
    pub highland: Rgb,
    pub mountain: Rgb,
    pub snow: Rgb,
}

pub fn temperature_adjusted_colors(temperature: f32, biomass: f32) -> TerrainColors {
    let hex = Rgb::hex;
    let pick = |cond: bool, a: u32, b: u32| if cond { hex(a) } else { hex(b) };
    if temperature < 200.0 {
        TerrainColors {
            beach: hex(0xE0E0FF),
            lowland: pick(biomass > 0.1, 0xB0C4DE, 0xDCDCDC),
            midland: hex(0xC0C0C0),
            highland: hex(0xA9A9A9),
            mountain: hex(0x696969),
            snow: hex(0xF0F8FF),
        }
    } else if temperature < 273.0 {
        TerrainColors {
            beach: hex(0xD2B48C),
            lowland: pick(biomass > 0.3, 0x9ACD32, 0xF5F5DC),
            midland: pick(biomass > 0.2, 0x6B8E23, 0xDCDCDC),
            highland: hex(0x8B7355),
            mountain: hex(0xA0A0A0),
            snow: hex(0xFFFAFA),
        }
    } else if temperature < 350.0 {
        let (lowland, midland) = if biomass < 0.1 {
            (hex(0xD2B48C), hex(0xCD853F))
        } else if biomass > 0.8 {
            (hex(0x228B22), hex(0x006400))
        } else {
            (hex(0x32CD32), hex(0x228B22))
        };
        TerrainColors {
            beach: hex(0xF0E68C),
            lowland,
            midland,
            highland: hex(0x8B4513),
            mountain: hex(0xA0A0A0),
            snow: hex(0xFFFFFF),
        }
    } else if temperature < 500.0 {
        TerrainColors {
            beach: hex(0xDEB887),
            lowland: pick(biomass > 0.2, 0x9ACD32, 0xD2B48C),
            midland: pick(biomass > 0.1, 0x8FBC8F, 0xCD853F),
            highland: hex(0xA0522D),
            mountain: hex(0x696969),
            snow: hex(0xF5DEB3),
        }
    } else if temperature < 700.0 {
        TerrainColors {
            beach: hex(0xCD853F),
            lowland: hex(0xA0522D),
            midland: hex(0x8B4513),
            highland: hex(0x800000),
            mountain: hex(0x2F4F4F),
            snow: hex(0xD3D3D3),
        }
    } else {
        TerrainColors {
            beach: hex(0xFF6347),
            lowland: hex(0xFF4500),
            midland: hex(0xDC143C),
            highland: hex(0xA03010),
            mountain: hex(0x802000),
            snow: hex(0xD0D0D0),
        }
    }
}
