//! Time-varying overlay: gas-giant band motion, seasonal ice caps and
//! deposits, and cloud cover. Everything here is a pure function of its
//! inputs, so time can be scrubbed forward or backward freely.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::color::Rgb;
use crate::noise::{fbm, smoothstep};
use crate::rng::seed_u32;

const SALT_CLOUDS: u64 = 0xC10D_5EED_0001;

const WIND_LENGTH: f32 = 0.2;
const WIND_HALF_WIDTH: f32 = 0.01;
const WIND_ALPHA: f32 = 0.8;

/// Phase offsets for animated gas-giant features at time `t` (seconds).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GasPhase {
    pub time: f32,
    pub band: f32,
    pub storm: f32,
    pub cyclone: f32,
    pub color_storm: f32,
    pub swirl: Vec3,
    pub cloud_drift: f32,
}

impl GasPhase {
    pub fn at(time: f32) -> Self {
        Self {
            time,
            band: time * 0.1,
            storm: time * 0.15,
            cyclone: time * 0.05,
            color_storm: time * 0.1,
            swirl: Vec3::new(time * 0.02, time * 0.01, 0.0),
            cloud_drift: time * 0.01,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    #[default]
    Spring,
    Summer,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FadeCurve {
    #[default]
    Linear,
    Smooth,
}

impl FadeCurve {
    #[inline]
    fn apply(self, v: f32) -> f32 {
        match self {
            FadeCurve::Linear => v,
            FadeCurve::Smooth => smoothstep(0.0, 1.0, v),
        }
    }
}

/// Position along a seasonal timeline, `timeline` in [0, 100].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonalState {
    pub season: Season,
    pub timeline: f32,
    #[serde(default)]
    pub fade: FadeCurve,
}

impl SeasonalState {
    pub fn new(season: Season, timeline: f32) -> Self {
        Self { season, timeline, fade: FadeCurve::Linear }
    }

    /// Solar longitude in degrees for the current timeline position.
    pub fn solar_longitude(&self) -> f32 {
        180.0 + (self.timeline * 0.9).round()
    }
}

/// Fraction of polar ice present. Spring melts from 1 to 0, summer refreezes.
pub fn ice_coverage(state: &SeasonalState) -> f32 {
    let p = state.timeline;
    let v = match state.season {
        Season::Spring => 1.0 - p / 100.0,
        Season::Summer => p / 100.0,
    };
    state.fade.apply(v.clamp(0.0, 1.0))
}

/// Visibility of fan and blotch deposits. Spring ramps in over the first
/// half; summer fades out over the second half.
pub fn deposit_visibility(state: &SeasonalState) -> f32 {
    let p = state.timeline;
    let v = match state.season {
        Season::Spring => p / 50.0,
        Season::Summer => 1.0 - (p - 50.0) / 50.0,
    };
    state.fade.apply(v.clamp(0.0, 1.0))
}

/// Visibility of the wind streaks drawn from each fan. They fade out over
/// the timeline, strongest while fans are forming.
pub fn wind_visibility(state: &SeasonalState) -> f32 {
    state.fade.apply((1.0 - state.timeline / 100.0).clamp(0.0, 1.0))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositKind {
    Fan,
    Blotch,
}

/// A seasonal surface deposit. `position` is `(u, v)` in equirectangular map
/// space, both in [0, 1]; fans spread over a 90° wedge around `orientation`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonalFeature {
    pub kind: DepositKind,
    pub position: (f32, f32),
    pub orientation: f32,
    pub size: f32,
    pub intensity: f32,
}

impl SeasonalFeature {
    pub fn defaults() -> Vec<SeasonalFeature> {
        vec![
            SeasonalFeature { kind: DepositKind::Fan, position: (0.2, 0.3), orientation: 45.0, size: 0.8, intensity: 0.9 },
            SeasonalFeature { kind: DepositKind::Fan, position: (0.6, 0.4), orientation: 120.0, size: 0.6, intensity: 0.7 },
            SeasonalFeature { kind: DepositKind::Blotch, position: (0.4, 0.6), orientation: 0.0, size: 0.5, intensity: 0.8 },
            SeasonalFeature { kind: DepositKind::Blotch, position: (0.7, 0.7), orientation: 0.0, size: 0.7, intensity: 0.9 },
        ]
    }

    fn centre(&self) -> Vec3 {
        let (u, v) = self.position;
        let lon = u * TAU - PI;
        let lat = FRAC_PI_2 - v * PI;
        Vec3::new(lat.cos() * lon.cos(), lat.sin(), lat.cos() * lon.sin())
    }

    /// Angular radius at the given visibility.
    fn radius(&self, visibility: f32) -> f32 {
        let scale = match self.kind {
            DepositKind::Fan => 0.3,
            DepositKind::Blotch => 0.25,
        };
        self.size * scale * visibility
    }

    /// `(color, alpha)` for the season.
    fn tint(&self, season: Season) -> (Rgb, f32) {
        let rgb = |r: u8, g: u8, b: u8| Rgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
        match (self.kind, season) {
            (DepositKind::Fan, Season::Spring) => (rgb(64, 64, 64), 0.8),
            (DepositKind::Fan, Season::Summer) => (rgb(139, 69, 19), 0.7),
            (DepositKind::Blotch, Season::Spring) => (rgb(32, 32, 32), 0.9),
            (DepositKind::Blotch, Season::Summer) => (rgb(101, 67, 33), 0.8),
        }
    }

    /// Angular distance from the centre to `p`, and the bearing of `p`
    /// relative to `orientation` in degrees, in (-180, 180].
    fn locate(&self, p: Vec3) -> (f32, f32) {
        let c = self.centre();
        let angle = p.cross(c).length().atan2(p.dot(c));
        let east = Vec3::Y.cross(c).normalize_or(Vec3::X);
        let north = c.cross(east);
        let offset = p - c;
        let bearing = offset.dot(north).atan2(offset.dot(east)).to_degrees();
        let delta = (bearing - self.orientation + 540.0).rem_euclid(360.0) - 180.0;
        (angle, delta)
    }

    fn covers(&self, p: Vec3, visibility: f32) -> bool {
        let radius = self.radius(visibility);
        let (angle, delta) = self.locate(p);
        if radius <= 0.0 || angle > radius {
            return false;
        }
        match self.kind {
            DepositKind::Blotch => true,
            DepositKind::Fan => delta.abs() <= 45.0 || angle < 1e-4,
        }
    }

    /// Whether `p` lies on this fan's wind streak: a thin line leaving the
    /// centre along `orientation`. Blotches carry no wind.
    fn on_wind_streak(&self, p: Vec3, visibility: f32) -> bool {
        if self.kind != DepositKind::Fan || visibility <= 0.0 {
            return false;
        }
        let length = WIND_LENGTH * visibility;
        let half_width = WIND_HALF_WIDTH * visibility;
        let (angle, delta) = self.locate(p);
        if angle > length || delta.abs() >= 90.0 {
            return false;
        }
        angle * delta.to_radians().sin().abs() <= half_width
    }
}

fn ice_tint(season: Season) -> (Rgb, f32) {
    match season {
        Season::Spring => (Rgb::new(200.0 / 255.0, 200.0 / 255.0, 1.0), 0.4),
        Season::Summer => (Rgb::new(1.0, 200.0 / 255.0, 150.0 / 255.0), 0.2),
    }
}

/// Composite seasonal deposits, fan wind streaks and the polar ice cap over
/// `color` at unit direction `p`.
pub fn apply_seasonal_overlay(
    color: Rgb,
    p: Vec3,
    state: &SeasonalState,
    features: &[SeasonalFeature],
) -> Rgb {
    let mut out = color;

    let visibility = deposit_visibility(state);
    if visibility > 0.0 {
        for f in features.iter().filter(|f| f.covers(p, visibility)) {
            let (tint, alpha) = f.tint(state.season);
            out = out.lerp(tint, alpha * f.intensity.clamp(0.0, 1.0));
        }
    }

    let wind = wind_visibility(state);
    if features.iter().any(|f| f.on_wind_streak(p, wind)) {
        out = out.lerp(Rgb::WHITE, WIND_ALPHA * wind);
    }

    let coverage = ice_coverage(state);
    if coverage > 0.0 {
        let edge = 1.0 - 0.5 * coverage;
        let cap = smoothstep(edge, edge + 0.05, p.y.abs());
        let (tint, alpha) = ice_tint(state.season);
        out = out.lerp(tint, alpha * cap);
    }

    out
}

/// Cloud density at `p`, in [0, 1], scaled by the planet's cloud count.
pub fn cloud_cover(p: Vec3, phase: &GasPhase, seed: u64, cloud_count: f32) -> f32 {
    let q = p * 2.0 + Vec3::new(phase.cloud_drift, 0.0, 0.0);
    let n = fbm(q, seed_u32(seed, SALT_CLOUDS), 4);
    smoothstep(0.4, 0.6, n) * (cloud_count / 100.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ice_coverage_across_seasons() {
        assert_eq!(ice_coverage(&SeasonalState::new(Season::Spring, 0.0)), 1.0);
        assert_eq!(ice_coverage(&SeasonalState::new(Season::Spring, 100.0)), 0.0);
        assert_eq!(ice_coverage(&SeasonalState::new(Season::Summer, 0.0)), 0.0);
        assert_relative_eq!(ice_coverage(&SeasonalState::new(Season::Summer, 25.0)), 0.25);
        assert_eq!(ice_coverage(&SeasonalState::new(Season::Summer, 140.0)), 1.0);
    }

    #[test]
    fn test_deposit_visibility_ramps() {
        assert_relative_eq!(deposit_visibility(&SeasonalState::new(Season::Spring, 25.0)), 0.5);
        assert_eq!(deposit_visibility(&SeasonalState::new(Season::Spring, 80.0)), 1.0);
        assert_eq!(deposit_visibility(&SeasonalState::new(Season::Summer, 30.0)), 1.0);
        assert_relative_eq!(deposit_visibility(&SeasonalState::new(Season::Summer, 75.0)), 0.5);
        assert_eq!(deposit_visibility(&SeasonalState::new(Season::Summer, 100.0)), 0.0);
    }

    #[test]
    fn test_smooth_fade_keeps_endpoints() {
        let mut s = SeasonalState::new(Season::Spring, 0.0);
        s.fade = FadeCurve::Smooth;
        assert_eq!(ice_coverage(&s), 1.0);
        s.timeline = 50.0;
        assert_relative_eq!(ice_coverage(&s), 0.5);
        assert_relative_eq!(wind_visibility(&s), 0.5);
    }

    #[test]
    fn test_solar_longitude() {
        assert_eq!(SeasonalState::new(Season::Spring, 0.0).solar_longitude(), 180.0);
        assert_eq!(SeasonalState::new(Season::Spring, 100.0).solar_longitude(), 270.0);
    }

    #[test]
    fn test_overlay_is_identity_without_ice_or_deposits() {
        // Spring at 0: no deposits yet, but full ice. Check the equator.
        let s = SeasonalState::new(Season::Spring, 0.0);
        let c = Rgb::new(0.3, 0.4, 0.5);
        let equator = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(apply_seasonal_overlay(c, equator, &s, &SeasonalFeature::defaults()), c);
        // ...while the pole is tinted.
        let pole = apply_seasonal_overlay(c, Vec3::Y, &s, &[]);
        assert_ne!(pole, c);
    }

    #[test]
    fn test_blotch_darkens_its_centre() {
        let s = SeasonalState::new(Season::Summer, 40.0);
        let blotch = SeasonalFeature {
            kind: DepositKind::Blotch,
            position: (0.5, 0.5),
            orientation: 0.0,
            size: 1.0,
            intensity: 1.0,
        };
        let c = Rgb::WHITE;
        let at = apply_seasonal_overlay(c, blotch.centre(), &s, &[blotch]);
        assert!(at.r < 1.0);
        let away = apply_seasonal_overlay(c, -blotch.centre(), &s, &[blotch]);
        assert_eq!(away, c);
    }

    #[test]
    fn test_wind_streaks_follow_fans_and_fade() {
        let fan = SeasonalFeature {
            kind: DepositKind::Fan,
            position: (0.5, 0.5),
            orientation: 0.0,
            size: 1.0,
            intensity: 1.0,
        };
        // Fan centre is +X; its local east axis is -Z.
        let ahead = Vec3::new(0.1f32.cos(), 0.0, -(0.1f32.sin()));
        let behind = Vec3::new(0.1f32.cos(), 0.0, 0.1f32.sin());
        let (_, delta) = fan.locate(ahead);
        assert!(delta.abs() < 1.0, "{delta}");

        // Spring 0: full wind, no deposits yet.
        let c = Rgb::new(0.2, 0.2, 0.2);
        let spring = SeasonalState::new(Season::Spring, 0.0);
        assert_eq!(deposit_visibility(&spring), 0.0);
        assert!(apply_seasonal_overlay(c, ahead, &spring, &[fan]).r > c.r);
        assert_eq!(apply_seasonal_overlay(c, behind, &spring, &[fan]), c);

        let late = SeasonalState::new(Season::Spring, 100.0);
        assert_eq!(wind_visibility(&late), 0.0);
        assert!(!fan.on_wind_streak(ahead, wind_visibility(&late)));

        let blotch = SeasonalFeature { kind: DepositKind::Blotch, ..fan };
        assert!(!blotch.on_wind_streak(ahead, 1.0));
    }

    #[test]
    fn test_gas_phase_is_linear_in_time() {
        let a = GasPhase::at(10.0);
        assert_relative_eq!(a.band, 1.0);
        assert_relative_eq!(a.storm, 1.5);
        assert_relative_eq!(a.cyclone, 0.5);
        assert_eq!(GasPhase::at(-3.0), GasPhase::at(-3.0));
    }

    #[test]
    fn test_cloud_cover_bounds() {
        let phase = GasPhase::at(4.0);
        for i in 0..500 {
            let p = crate::grid::equirect_direction(i % 50, i / 50, 50, 10);
            let c = cloud_cover(p, &phase, 7, 60.0);
            assert!((0.0..=0.6).contains(&c));
            assert_eq!(cloud_cover(p, &phase, 7, 0.0), 0.0);
        }
    }
}
