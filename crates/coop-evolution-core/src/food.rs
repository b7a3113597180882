use crate::actor::{ActorKind, Body, Entity};
use crate::config::SimConfig;
use rand::Rng;

/// A stationary pellet that restores health when eaten.
#[derive(Clone, Debug, PartialEq)]
pub struct Food {
    body: Body,
    energy: f64,
}

impl Food {
    pub fn new(body: Body, energy: f64) -> Self {
        Self { body, energy }
    }

    pub fn random<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> Self {
        let body = Body::random(&config.bounds(), config.food_radius, config.initial_health, rng);
        Self::new(body, config.food_energy)
    }

    /// Mark as consumed and return the health it yields.
    pub fn eat(&mut self) -> f64 {
        self.body.health = 0.0;
        self.energy
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Per-tick hook; food has no behavior of its own yet.
    pub fn on_tick(&mut self) {}
}

impl Entity for Food {
    fn body(&self) -> &Body {
        &self.body
    }

    fn kind(&self) -> ActorKind {
        ActorKind::Food
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn eating_kills_food_and_yields_energy() {
        let config = SimConfig::default();
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let mut food = Food::random(&config, &mut rng);
        assert!(food.is_alive());
        assert_eq!(food.kind(), ActorKind::Food);
        assert_eq!(food.body().radius, 5.0);
        assert_eq!(food.eat(), 50.0);
        assert!(!food.is_alive());
    }
}
