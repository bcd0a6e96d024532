use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::biome::Biome;
use crate::params::PlanetSeed;
use crate::render::{SurfaceBand, SurfacePalette};

/// Per-band visibility for the flat debug view. Hidden bands render black.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugBands {
    pub ocean: bool,
    pub beach: bool,
    pub lowland: bool,
    pub midland: bool,
    pub highland: bool,
    pub mountain: bool,
    pub snow: bool,
}

impl Default for DebugBands {
    fn default() -> Self {
        Self {
            ocean: true,
            beach: true,
            lowland: true,
            midland: true,
            highland: true,
            mountain: true,
            snow: true,
        }
    }
}

impl DebugBands {
    pub fn visible(&self, band: SurfaceBand) -> bool {
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

/// Where the seven-band surface palette comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteSource {
    /// Biome 4-band palette and liquid colors.
    #[default]
    Biome,
    /// Land colors picked from the temperature regime.
    Temperature,
    Explicit(SurfacePalette),
}

/// Synthesis knobs that are not physical planet parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    // Continents
    pub continent_count: usize,
    pub continent_size: f32,
    pub noise_scale: f32,

    // Coloring
    pub beach_width: f32,
    pub palette: PaletteSource,
    pub debug: Option<DebugBands>,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            continent_count: 5,
            continent_size: 0.5,
            noise_scale: 1.0,
            beach_width: 0.03,
            palette: PaletteSource::Biome,
            debug: None,
        }
    }
}

/// Named example planets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Jupiter,
    Neptune,
    Venus,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Jupiter, Preset::Neptune, Preset::Venus];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Jupiter => "jupiter",
            Preset::Neptune => "neptune",
            Preset::Venus => "venus",
        }
    }

    /// Seed plus surface configuration for this preset. Palettes are listed
    /// atmosphere, ocean, ocean pattern, beach, lowland, midland, highland,
    /// mountain, snow.
    pub fn build(&self) -> (PlanetSeed, SurfaceConfig) {
        let defaults = SurfaceConfig::default();
        match self {
            Preset::Jupiter => (
                PlanetSeed {
                    identifier: Some("jupiter".into()),
                    seed: Some(9012),
                    mass: Some(8.0),
                    radius: Some(2.5),
                    temperature: Some(165.0),
                    biome: Some(Biome::Unknown),
                    surface_roughness: Some(0.3),
                    ..Default::default()
                },
                SurfaceConfig {
                    continent_size: 0.0,
                    noise_scale: 0.5,
                    palette: PaletteSource::Explicit(SurfacePalette::from_hex([
                        0xDAA520, 0xB8860B, 0x8B7355, 0xDAA520, 0xB8860B, 0x8B7355, 0x8B4513,
                        0x654321, 0xF5DEB3,
                    ])),
                    ..defaults
                },
            ),
            Preset::Neptune => (
                PlanetSeed {
                    identifier: Some("neptune".into()),
                    seed: Some(3456),
                    mass: Some(5.0),
                    radius: Some(2.0),
                    temperature: Some(72.0),
                    biome: Some(Biome::Unknown),
                    surface_roughness: Some(0.2),
                    ..Default::default()
                },
                SurfaceConfig {
                    noise_scale: 0.3,
                    palette: PaletteSource::Explicit(SurfacePalette::from_hex([
                        0x4169E1, 0x0000CD, 0x191970, 0x4169E1, 0x0000CD, 0x191970, 0x000080,
                        0x483D8B, 0xE6E6FA,
                    ])),
                    ..defaults
                },
            ),
            Preset::Venus => (
                PlanetSeed {
                    identifier: Some("venus".into()),
                    seed: Some(7890),
                    mass: Some(0.8),
                    radius: Some(0.9),
                    temperature: Some(737.0),
                    biome: Some(Biome::VolcanicTerrain),
                    surface_roughness: Some(0.4),
                    volcanic_activity: Some(0.8),
                    ..Default::default()
                },
                SurfaceConfig {
                    continent_count: 3,
                    continent_size: 0.6,
                    noise_scale: 0.8,
                    palette: PaletteSource::Explicit(SurfacePalette::from_hex([
                        0xFFA500, 0xFF4500, 0xFF6347, 0xFFA500, 0xFF8C00, 0xFF4500, 0x8B0000,
                        0x2F4F4F, 0xD3D3D3,
                    ])),
                    ..defaults
                },
            ),
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown preset '{s}' (expected jupiter, neptune or venus)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::PlanetClass;
    use crate::color::Rgb;
    use crate::params::merge_with_defaults;

    #[test]
    fn test_defaults() {
        let c = SurfaceConfig::default();
        assert_eq!(c.continent_count, 5);
        assert_eq!(c.palette, PaletteSource::Biome);
        assert!(c.debug.is_none());
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("Jupiter".parse::<Preset>(), Ok(Preset::Jupiter));
        assert_eq!("venus".parse::<Preset>(), Ok(Preset::Venus));
        assert!("pluto".parse::<Preset>().is_err());
    }

    #[test]
    fn test_presets_classify_as_expected() {
        let class = |p: Preset| merge_with_defaults(&p.build().0).class();
        assert_eq!(class(Preset::Jupiter), PlanetClass::Gaseous);
        assert_eq!(class(Preset::Neptune), PlanetClass::Terrestrial);
        assert_eq!(class(Preset::Venus), PlanetClass::Terrestrial);
    }

    #[test]
    fn test_preset_palettes() {
        let (_, venus) = Preset::Venus.build();
        let PaletteSource::Explicit(pal) = venus.palette else {
            panic!("venus has an explicit palette");
        };
        assert_eq!(pal.atmosphere, Rgb::hex(0xFFA500));
        assert_eq!(pal.snow, Rgb::hex(0xD3D3D3));
        assert_eq!(venus.continent_count, 3);
    }

    #[test]
    fn test_debug_bands_toggle() {
        let bands = DebugBands { snow: false, ..Default::default() };
        assert!(bands.visible(SurfaceBand::Ocean));
        assert!(!bands.visible(SurfaceBand::Snow));
    }

    #[test]
    fn test_config_json_fills_defaults() {
        let c: SurfaceConfig = serde_json::from_str(r#"{"continent_count": 2}"#).unwrap();
        assert_eq!(c.continent_count, 2);
        assert_eq!(c.noise_scale, 1.0);
    }
}
