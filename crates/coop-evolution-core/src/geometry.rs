use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Euclidean distance between two points.
pub fn dist(a: [f64; 2], b: [f64; 2]) -> f64 {
    dist_sqr(a, b).sqrt()
}

/// Squared Euclidean distance; used wherever only a comparison is needed.
pub fn dist_sqr(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.clamp(min, max)
}

/// -1, 0 or 1 depending on the sign of `value`.
pub fn sgn(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Continuous uniform sample in `[low, high)`.
///
/// Computed as `low + (high - low) * u`; `low == high` is allowed and every
/// call consumes exactly one draw.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    low + (high - low) * rng.random::<f64>()
}

/// Rectangular toroidal extent shared by every actor in one simulation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Wrap a position and heading into `[0,W) x [0,H) x [0,2pi)`.
    pub fn wrap(&self, position: [f64; 2], heading: f64) -> ([f64; 2], f64) {
        (
            [
                wrap_half_open(position[0], self.width),
                wrap_half_open(position[1], self.height),
            ],
            wrap_half_open(heading, TAU),
        )
    }

    /// Uniformly random position and heading inside the bounds.
    pub fn random_pose<R: Rng + ?Sized>(&self, rng: &mut R) -> ([f64; 2], f64) {
        let x = uniform(rng, 0.0, self.width);
        let y = uniform(rng, 0.0, self.height);
        let heading = uniform(rng, 0.0, TAU);
        self.wrap([x, y], heading)
    }
}

// rem_euclid can round up to `modulus` for tiny negative inputs.
fn wrap_half_open(value: f64, modulus: f64) -> f64 {
    let wrapped = value.rem_euclid(modulus);
    if wrapped >= modulus {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn sgn_covers_all_signs() {
        assert_eq!(sgn(3.5), 1.0);
        assert_eq!(sgn(-0.1), -1.0);
        assert_eq!(sgn(0.0), 0.0);
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(dist([0.0, 0.0], [3.0, 4.0]), 5.0);
        assert_eq!(dist_sqr([1.0, 1.0], [4.0, 5.0]), 25.0);
    }

    #[test]
    fn wrap_keeps_negative_and_overflowing_values_in_bounds() {
        let bounds = Bounds::new(100.0, 50.0);
        let cases = [
            ([-1.0, -1.0], -0.5),
            ([100.0, 50.0], TAU),
            ([250.5, -120.25], 7.0 * TAU + 0.1),
            ([-1e-18, -1e-18], -1e-18),
        ];
        for (pos, heading) in cases {
            let (p, h) = bounds.wrap(pos, heading);
            assert!((0.0..100.0).contains(&p[0]), "x={} out of bounds", p[0]);
            assert!((0.0..50.0).contains(&p[1]), "y={} out of bounds", p[1]);
            assert!((0.0..TAU).contains(&h), "heading={h} out of bounds");
        }
    }

    #[test]
    fn uniform_allows_degenerate_range() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        assert_eq!(uniform(&mut rng, 2.0, 2.0), 2.0);
        for _ in 0..100 {
            let v = uniform(&mut rng, -0.25, 1.0);
            assert!((-0.25..1.0).contains(&v));
        }
    }

    #[test]
    fn random_pose_is_inside_bounds() {
        let bounds = Bounds::new(1024.0, 768.0);
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        for _ in 0..200 {
            let (p, h) = bounds.random_pose(&mut rng);
            assert!(p[0] >= 0.0 && p[0] < 1024.0);
            assert!(p[1] >= 0.0 && p[1] < 768.0);
            assert!((0.0..TAU).contains(&h));
        }
    }
}
