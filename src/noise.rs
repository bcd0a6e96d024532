use glam::Vec3;

use crate::rng::hash3;

#[inline]
fn smootherstep(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Smoothstep: 0 at edge0, 1 at edge1. Edges may be reversed.
/// Degenerate edges collapse to a step at edge0.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// 3D gradient noise (Perlin-style) over the twelve cube-edge directions.
/// Output is roughly [-1, 1] and exactly 0 on lattice points.
#[inline]
pub fn gradient_noise3(p: Vec3, seed: u32) -> f32 {
    let ix = p.x.floor() as i32;
    let iy = p.y.floor() as i32;
    let iz = p.z.floor() as i32;
    let fx = p.x - ix as f32;
    let fy = p.y - iy as f32;
    let fz = p.z - iz as f32;
    let sx = smootherstep(fx);
    let sy = smootherstep(fy);
    let sz = smootherstep(fz);

    #[inline]
    fn grad(hash: u32, dx: f32, dy: f32, dz: f32) -> f32 {
        // 12 edge gradients, 4 repeated to fill 16 slots.
        match hash & 15 {
            0 | 12 => dx + dy,
            1 | 13 => -dx + dy,
            2 => dx - dy,
            3 => -dx - dy,
            4 => dx + dz,
            5 => -dx + dz,
            6 => dx - dz,
            7 => -dx - dz,
            8 => dy + dz,
            9 | 14 => -dy + dz,
            10 => dy - dz,
            _ => -dy - dz,
        }
    }

    let corner = |ox: i32, oy: i32, oz: i32| {
        grad(
            hash3(ix + ox, iy + oy, iz + oz, seed),
            fx - ox as f32,
            fy - oy as f32,
            fz - oz as f32,
        )
    };

    let x00 = lerp(corner(0, 0, 0), corner(1, 0, 0), sx);
    let x10 = lerp(corner(0, 1, 0), corner(1, 1, 0), sx);
    let x01 = lerp(corner(0, 0, 1), corner(1, 0, 1), sx);
    let x11 = lerp(corner(0, 1, 1), corner(1, 1, 1), sx);
    let y0 = lerp(x00, x10, sy);
    let y1 = lerp(x01, x11, sy);
    lerp(y0, y1, sz)
}

/// Fractal Brownian motion: raw amplitude sum, persistence 0.5, lacunarity 2.
/// Not normalized, so the magnitude grows slightly with octave count.
pub fn fbm(p: Vec3, seed: u32, octaves: u32) -> f32 {
    let mut sum = 0.0;
    let mut amp = 1.0;
    let mut freq = 1.0;
    for i in 0..octaves {
        sum += gradient_noise3(p * freq, seed.wrapping_add(i)) * amp;
        amp *= 0.5;
        freq *= 2.0;
    }
    sum
}

/// Single-octave ridge: (1 - |n|)^2, peaking along noise zero crossings.
#[inline]
pub fn ridged(p: Vec3, seed: u32) -> f32 {
    let r = 1.0 - gradient_noise3(p, seed).abs();
    r * r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Rng;

    #[test]
    fn test_noise_is_zero_on_lattice() {
        assert_eq!(gradient_noise3(Vec3::new(3.0, -2.0, 7.0), 11), 0.0);
    }

    #[test]
    fn test_noise_is_deterministic_and_bounded() {
        let mut rng = Rng::new(3);
        for _ in 0..2000 {
            let p = Vec3::new(
                rng.range_f32(-50.0, 50.0),
                rng.range_f32(-50.0, 50.0),
                rng.range_f32(-50.0, 50.0),
            );
            let a = gradient_noise3(p, 42);
            assert_eq!(a, gradient_noise3(p, 42));
            assert!(a.abs() <= 1.5, "{a}");
        }
    }

    #[test]
    fn test_fbm_stays_finite() {
        let mut rng = Rng::new(8);
        for _ in 0..500 {
            let p = Vec3::new(rng.next_f32(), rng.next_f32(), rng.next_f32()) * 10.0;
            let v = fbm(p, 1, 7);
            assert!(v.is_finite() && v.abs() < 3.0);
        }
    }

    #[test]
    fn test_smoothstep_handles_reversed_and_degenerate_edges() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert_eq!(smoothstep(0.5, 0.0, 0.0), 1.0);
        assert_eq!(smoothstep(0.5, 0.0, 0.6), 0.0);
        assert_eq!(smoothstep(0.3, 0.3, 0.2), 0.0);
        assert_eq!(smoothstep(0.3, 0.3, 0.3), 1.0);
    }

    #[test]
    fn test_ridged_is_unit_bounded() {
        for i in 0..200 {
            let v = ridged(Vec3::splat(i as f32 * 0.173), 4);
            assert!((0.0..=1.0).contains(&v));
        }
    }
}
