use crate::geometry::Bounds;
use rand::Rng;

/// Physical state shared by every simulated body.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    position: [f64; 2],
    heading: f64,
    pub radius: f64,
    pub health: f64,
}

impl Body {
    pub fn new(
        position: [f64; 2],
        heading: f64,
        radius: f64,
        health: f64,
        bounds: &Bounds,
    ) -> Self {
        let (position, heading) = bounds.wrap(position, heading);
        Self {
            position,
            heading,
            radius,
            health,
        }
    }

    pub fn random<R: Rng + ?Sized>(bounds: &Bounds, radius: f64, health: f64, rng: &mut R) -> Self {
        let (position, heading) = bounds.random_pose(rng);
        Self {
            position,
            heading,
            radius,
            health,
        }
    }

    pub fn position(&self) -> [f64; 2] {
        self.position
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Displace relative to the current pose, then wrap into the world.
    pub fn move_by(&mut self, dx: f64, dy: f64, dheading: f64, bounds: &Bounds) {
        self.move_to(
            [self.position[0] + dx, self.position[1] + dy],
            self.heading + dheading,
            bounds,
        );
    }

    pub fn move_to(&mut self, position: [f64; 2], heading: f64, bounds: &Bounds) {
        let (position, heading) = bounds.wrap(position, heading);
        self.position = position;
        self.heading = heading;
    }

    pub fn move_to_random<R: Rng + ?Sized>(&mut self, bounds: &Bounds, rng: &mut R) {
        let (position, heading) = bounds.random_pose(rng);
        self.position = position;
        self.heading = heading;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActorKind {
    Agent,
    Food,
}

/// Capability surface common to agents and food.
pub trait Entity {
    fn body(&self) -> &Body;

    fn kind(&self) -> ActorKind;

    fn position(&self) -> [f64; 2] {
        self.body().position()
    }

    fn is_alive(&self) -> bool {
        self.body().is_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    #[test]
    fn move_by_wraps_negative_displacement() {
        let bounds = Bounds::new(100.0, 80.0);
        let mut body = Body::new([1.0, 1.0], 0.1, 5.0, 100.0, &bounds);
        body.move_by(-3.0, -81.5, -0.3, &bounds);
        assert!((body.position()[0] - 98.0).abs() < 1e-9);
        assert!((body.position()[1] - 79.5).abs() < 1e-9);
        assert!((body.heading() - (TAU - 0.2)).abs() < 1e-9);
    }

    #[test]
    fn new_wraps_out_of_range_pose() {
        let bounds = Bounds::new(10.0, 10.0);
        let body = Body::new([25.0, -5.0], TAU + 1.0, 1.0, 1.0, &bounds);
        assert_eq!(body.position(), [5.0, 5.0]);
        assert!((body.heading() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn alive_only_with_positive_health() {
        let bounds = Bounds::new(10.0, 10.0);
        let mut body = Body::new([0.0, 0.0], 0.0, 1.0, 0.5, &bounds);
        assert!(body.is_alive());
        body.health = 0.0;
        assert!(!body.is_alive());
        body.health = -3.0;
        assert!(!body.is_alive());
    }
}
