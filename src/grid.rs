use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Row-major flat grid. No per-cell objects, f32 friendly.
#[derive(Clone, Debug)]
pub struct Grid<T> {
    pub data: Vec<T>,
    pub w: usize,
    pub h: usize,
}

impl<T: Copy + Default> Grid<T> {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            data: vec![T::default(); w * h],
            w,
            h,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.w && y < self.h);
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: T) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }
}

/// Unit-sphere direction at the centre of pixel `(x, y)` of a `w`×`h`
/// equirectangular map. Row 0 is the north pole side, +Y is north.
#[inline]
pub fn equirect_direction(x: usize, y: usize, w: usize, h: usize) -> Vec3 {
    let lon = (x as f32 + 0.5) / w as f32 * TAU - PI;
    let lat = FRAC_PI_2 - (y as f32 + 0.5) / h as f32 * PI;
    let (sin_lat, cos_lat) = lat.sin_cos();
    Vec3::new(cos_lat * lon.cos(), sin_lat, cos_lat * lon.sin())
}
