//! Physical classification: density, planet class, surface liquid and the
//! elevation thresholds that split terrain into four bands.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Earth's mean density in g/cm³; `density(1, 1)` returns this.
pub const EARTH_DENSITY: f32 = 5.51;
/// A body above this many Earth masses is a gas giant.
pub const GAS_MASS_THRESHOLD: f32 = 7.0;
/// A body above this many Earth radii is a gas giant.
pub const GAS_RADIUS_THRESHOLD: f32 = 2.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanetClass {
    Terrestrial,
    Gaseous,
}

impl PlanetClass {
    pub fn name(&self) -> &'static str {
        match self {
            PlanetClass::Terrestrial => "terrestrial",
            PlanetClass::Gaseous => "gaseous",
        }
    }
}

/// Bulk density from mass and radius in Earth units.
pub fn density(mass: f32, radius: f32) -> f32 {
    debug_assert!(radius > 0.0, "radius must be positive");
    mass / radius.powi(3) * EARTH_DENSITY
}

pub fn planet_class(mass: f32, radius: f32) -> PlanetClass {
    if mass > GAS_MASS_THRESHOLD || radius > GAS_RADIUS_THRESHOLD {
        PlanetClass::Gaseous
    } else {
        PlanetClass::Terrestrial
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LiquidType {
    Water,
    Methane,
    Nitrogen,
    Ammonia,
    Ethane,
    #[default]
    None,
}

pub struct LiquidInfo {
    pub kind: LiquidType,
    /// Inclusive temperature range in Kelvin.
    pub min_temp: f32,
    pub max_temp: f32,
    pub color: Rgb,
    /// Darker shade used for surface patterns.
    pub pattern: Rgb,
}

/// Checked in order; the first range containing the temperature wins.
pub static LIQUIDS: [LiquidInfo; 5] = [
    LiquidInfo {
        kind: LiquidType::Water,
        min_temp: 273.0,
        max_temp: 373.0,
        color: Rgb::hex(0x1E90FF),
        pattern: Rgb::hex(0x1E7FFF),
    },
    LiquidInfo {
        kind: LiquidType::Methane,
        min_temp: 91.0,
        max_temp: 112.0,
        color: Rgb::hex(0xA2CDB0),
        pattern: Rgb::hex(0x8EBDA0),
    },
    LiquidInfo {
        kind: LiquidType::Nitrogen,
        min_temp: 63.0,
        max_temp: 77.0,
        color: Rgb::hex(0xD6E7FF),
        pattern: Rgb::hex(0xC0D6FF),
    },
    LiquidInfo {
        kind: LiquidType::Ammonia,
        min_temp: 195.0,
        max_temp: 240.0,
        color: Rgb::hex(0xDDA0DD),
        pattern: Rgb::hex(0xC98FC9),
    },
    LiquidInfo {
        kind: LiquidType::Ethane,
        min_temp: 90.0,
        max_temp: 184.0,
        color: Rgb::hex(0xC9B98F),
        pattern: Rgb::hex(0xB5A67E),
    },
];

const NO_LIQUID_COLOR: Rgb = Rgb::hex(0x808080);
const NO_LIQUID_PATTERN: Rgb = Rgb::hex(0x707070);

impl LiquidType {
    pub fn info(&self) -> Option<&'static LiquidInfo> {
        LIQUIDS.iter().find(|l| l.kind == *self)
    }

    pub fn color(&self) -> Rgb {
        self.info().map_or(NO_LIQUID_COLOR, |l| l.color)
    }

    pub fn pattern_color(&self) -> Rgb {
        self.info().map_or(NO_LIQUID_PATTERN, |l| l.pattern)
    }

    pub fn name(&self) -> &'static str {
        match self {
            LiquidType::Water => "water",
            LiquidType::Methane => "methane",
            LiquidType::Nitrogen => "nitrogen",
            LiquidType::Ammonia => "ammonia",
            LiquidType::Ethane => "ethane",
            LiquidType::None => "none",
        }
    }

    /// Unrecognized names read as `None`.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "water" => LiquidType::Water,
            "methane" => LiquidType::Methane,
            "nitrogen" => LiquidType::Nitrogen,
            "ammonia" => LiquidType::Ammonia,
            "ethane" => LiquidType::Ethane,
            _ => LiquidType::None,
        }
    }
}

impl From<String> for LiquidType {
    fn from(s: String) -> Self {
        LiquidType::from_name(&s)
    }
}

impl From<LiquidType> for String {
    fn from(l: LiquidType) -> Self {
        l.name().to_string()
    }
}

/// Surface liquid stable at `temperature` (Kelvin).
pub fn liquid_type(temperature: f32) -> LiquidType {
    LIQUIDS
        .iter()
        .find(|l| temperature >= l.min_temp && temperature <= l.max_temp)
        .map_or(LiquidType::None, |l| l.kind)
}

pub fn is_liquid_available(temperature: f32, liquid: LiquidType) -> bool {
    liquid
        .info()
        .is_some_and(|l| temperature >= l.min_temp && temperature <= l.max_temp)
}

/// Upper bounds (exclusive) of the four terrain bands, in normalized height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainBands {
    pub ocean_floor_max: f32,
    pub beach_max: f32,
    pub regular_max: f32,
}

impl TerrainBands {
    pub fn for_water_level(water_level: f32) -> Self {
        Self {
            ocean_floor_max: water_level - 0.2,
            beach_max: water_level,
            regular_max: water_level + 0.4,
        }
    }
}

/// Maps a raw synthesized height (about ±0.15) onto [0, 1].
#[inline]
pub fn normalize_height(height: f32) -> f32 {
    (height + 0.15) / 0.3
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_earth_density() {
        assert_relative_eq!(density(1.0, 1.0), 5.51);
        assert_relative_eq!(density(8.0, 2.0), 5.51);
    }

    #[test]
    fn test_class_thresholds_are_strict() {
        assert_eq!(planet_class(7.0, 1.0), PlanetClass::Terrestrial);
        assert_eq!(planet_class(7.01, 1.0), PlanetClass::Gaseous);
        assert_eq!(planet_class(1.0, 2.5), PlanetClass::Terrestrial);
        assert_eq!(planet_class(1.0, 2.51), PlanetClass::Gaseous);
    }

    #[test]
    fn test_liquid_ranges_are_inclusive() {
        assert_eq!(liquid_type(273.0), LiquidType::Water);
        assert_eq!(liquid_type(373.0), LiquidType::Water);
        assert_eq!(liquid_type(288.0), LiquidType::Water);
        assert_eq!(liquid_type(63.0), LiquidType::Nitrogen);
        assert_eq!(liquid_type(200.0), LiquidType::Ammonia);
        assert_eq!(liquid_type(150.0), LiquidType::Ethane);
    }

    #[test]
    fn test_liquid_priority_breaks_overlaps() {
        // 100 K lies in both the methane and ethane ranges.
        assert_eq!(liquid_type(100.0), LiquidType::Methane);
        assert_eq!(liquid_type(90.5), LiquidType::Ethane);
    }

    #[test]
    fn test_no_liquid_outside_every_range() {
        assert_eq!(liquid_type(40.0), LiquidType::None);
        assert_eq!(liquid_type(500.0), LiquidType::None);
        assert_eq!(liquid_type(260.0), LiquidType::None);
        assert_eq!(LiquidType::None.color(), Rgb::hex(0x808080));
    }

    #[test]
    fn test_liquid_serde_uses_names() {
        let json = serde_json::to_string(&LiquidType::Methane).unwrap();
        assert_eq!(json, "\"methane\"");
        let back: LiquidType = serde_json::from_str("\"mercury\"").unwrap();
        assert_eq!(back, LiquidType::None);
    }

    #[test]
    fn test_liquid_availability() {
        assert!(is_liquid_available(300.0, LiquidType::Water));
        assert!(!is_liquid_available(100.0, LiquidType::Water));
        assert!(is_liquid_available(100.0, LiquidType::Ethane));
        assert!(!is_liquid_available(100.0, LiquidType::None));
    }

    #[test]
    fn test_terrain_bands_follow_water_level() {
        let bands = TerrainBands::for_water_level(0.5);
        assert_relative_eq!(bands.ocean_floor_max, 0.3);
        assert_relative_eq!(bands.beach_max, 0.5);
        assert_relative_eq!(bands.regular_max, 0.9);
    }
}
