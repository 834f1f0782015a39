//! Initial density seeding. Higher density is more solid; a sample is solid
//! once it reaches the iso-level, and the surface helpers place the 0.5
//! crossing on the modelled surface.
use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::config::Generation;
use sculpt_geom::Vec3;

/// Density at a world-space lattice position, read once per point when a chunk is (re)seeded.
pub trait DensitySource {
    fn density(&self, wx: f32, wy: f32, wz: f32) -> f32;
}

impl<F> DensitySource for F
where
    F: Fn(f32, f32, f32) -> f32,
{
    #[inline]
    fn density(&self, wx: f32, wy: f32, wz: f32) -> f32 {
        self(wx, wy, wz)
    }
}

/// Height-field terrain: flat ground optionally displaced by 2D Perlin noise.
pub struct NoiseTerrain {
    noise: FastNoiseLite,
    pub generate_noise: bool,
    pub ground_height: f32,
    pub noise_scale: f32,
    pub noise_stretch: f32,
}

impl NoiseTerrain {
    pub fn new(seed: i32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::Perlin));
        noise.set_frequency(Some(0.01));
        Self {
            noise,
            generate_noise: true,
            ground_height: 10.0,
            noise_scale: 1.0,
            noise_stretch: 1.0,
        }
    }

    pub fn from_config(cfg: &Generation) -> Self {
        log::debug!(
            "noise terrain seed={} ground={} scale={} stretch={} noise={}",
            cfg.seed,
            cfg.ground_height,
            cfg.noise_scale,
            cfg.noise_stretch,
            cfg.generate_noise
        );
        Self {
            generate_noise: cfg.generate_noise,
            ground_height: cfg.ground_height,
            noise_scale: cfg.noise_scale,
            noise_stretch: cfg.noise_stretch,
            ..Self::new(cfg.seed)
        }
    }

    /// Surface height above the column at `(wx, wz)`.
    pub fn height_at(&self, wx: f32, wz: f32) -> f32 {
        if !self.generate_noise {
            return self.ground_height;
        }
        let stretch = self.noise_stretch * 0.1;
        let n = self.noise.get_noise_2d(wx / stretch, wz / stretch);
        let n01 = ((n + 1.0) * 0.5).clamp(0.0, 1.0);
        self.ground_height + n01 * self.noise_scale * 10.0
    }
}

impl DensitySource for NoiseTerrain {
    fn density(&self, wx: f32, wy: f32, wz: f32) -> f32 {
        flat_plane(wy, self.height_at(wx, wz))
    }
}

/// Solid below `height`, crossing 0.5 exactly at it.
#[inline]
pub fn flat_plane(y: f32, height: f32) -> f32 {
    (0.5 + height - y).clamp(0.0, 1.0)
}

/// Solid inside the ball, crossing 0.5 at its boundary.
#[inline]
pub fn sphere(p: Vec3, center: Vec3, radius: f32) -> f32 {
    (0.5 + radius - p.distance(center)).clamp(0.0, 1.0)
}

#[inline]
pub fn union(a: f32, b: f32) -> f32 {
    a.max(b)
}

#[inline]
pub fn intersection(a: f32, b: f32) -> f32 {
    a.min(b)
}

/// `a` with `b` carved out of it.
#[inline]
pub fn subtract(a: f32, b: f32) -> f32 {
    a.min(1.0 - b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_ground_without_noise() {
        let mut t = NoiseTerrain::new(7);
        t.generate_noise = false;
        t.ground_height = 4.0;
        assert_eq!(t.density(3.0, 4.0, -2.0), 0.5);
        assert_eq!(t.density(0.0, 0.0, 0.0), 1.0);
        assert_eq!(t.density(0.0, 9.0, 0.0), 0.0);
    }

    #[test]
    fn noise_only_raises_ground() {
        let t = NoiseTerrain::new(1337);
        for i in -20..20 {
            let (x, z) = (i as f32 * 3.7, i as f32 * -1.3);
            let h = t.height_at(x, z);
            assert!(h >= t.ground_height && h <= t.ground_height + 10.0 * t.noise_scale);
        }
    }

    #[test]
    fn same_seed_same_field() {
        let a = NoiseTerrain::new(42);
        let b = NoiseTerrain::new(42);
        assert_eq!(a.density(5.0, 12.0, -3.0), b.density(5.0, 12.0, -3.0));
    }

    #[test]
    fn csg_combinators() {
        assert_eq!(union(0.2, 0.7), 0.7);
        assert_eq!(intersection(0.2, 0.7), 0.2);
        assert_eq!(subtract(1.0, 1.0), 0.0);
        assert_eq!(subtract(1.0, 0.0), 1.0);
        let c = Vec3::new(0.0, 0.0, 0.0);
        assert_eq!(sphere(Vec3::new(2.0, 0.0, 0.0), c, 2.0), 0.5);
        assert_eq!(sphere(c, c, 2.0), 1.0);
    }

    #[test]
    fn closures_are_sources() {
        let src = |_x: f32, y: f32, _z: f32| flat_plane(y, 1.0);
        assert_eq!(src.density(0.0, 1.0, 0.0), 0.5);
    }
}
