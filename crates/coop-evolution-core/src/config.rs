use crate::geometry::Bounds;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for reproducible simulation runs.
    pub seed: u64,
    /// Width of the toroidal world in world units.
    pub world_width: f64,
    /// Height of the toroidal world in world units.
    pub world_height: f64,
    /// Agents per generation after a transition.
    pub target_population: usize,
    /// A generation ends once the population shrinks to this fraction of
    /// `target_population`.
    pub survivor_fraction: f64,
    /// Food items kept in the world per target agent.
    pub food_per_agent: f64,

    /// Collision radius of an agent; two agents interact within twice this.
    pub agent_radius: f64,
    /// Health every agent starts (and restarts) a generation with.
    pub initial_health: f64,
    /// Flat health loss on a tick without eating.
    pub hunger_per_tick: f64,
    /// Extra health loss per unit of forward force.
    pub hunger_movement_ratio: f64,
    pub forward_speed: f64,
    pub forward_max: f64,
    pub turn_speed: f64,
    pub turn_max: f64,
    /// Angular offset of the food smell sensors from the heading (radians).
    pub smell_angle: f64,
    /// Distance of the smell sensors beyond the agent's radius.
    pub smell_length: f64,
    pub smell_reach: f64,
    pub sight_angle: f64,
    pub sight_length: f64,
    pub sight_reach: f64,
    /// Added to an agent-sight sensor when the nearest agent attacked us
    /// during our last resolved encounter.
    pub wariness_bonus: f64,
    /// Scale applied to the Prisoner's Dilemma payoff before it hits health.
    pub pd_health_multiplier: f64,

    pub food_energy: f64,
    pub food_radius: f64,

    /// Per-synapse probability of a mutation.
    pub mutation_odds: f64,
    /// Largest absolute weight shift of one mutation.
    pub mutation_shift: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            world_width: 1024.0,
            world_height: 768.0,
            target_population: 20,
            survivor_fraction: 0.25,
            food_per_agent: 1.0,
            agent_radius: 20.0,
            initial_health: 100.0,
            hunger_per_tick: 0.34,
            hunger_movement_ratio: 0.05,
            forward_speed: 7.0,
            forward_max: 5.0,
            turn_speed: PI / 18.0,
            turn_max: PI / 18.0,
            smell_angle: PI / 6.0,
            smell_length: 20.0,
            smell_reach: 50.0,
            sight_angle: PI / 4.5,
            sight_length: 40.0,
            sight_reach: 60.0,
            wariness_bonus: 0.5,
            pd_health_multiplier: 20.0,
            food_energy: 50.0,
            food_radius: 5.0,
            mutation_odds: 0.2,
            mutation_shift: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimConfigError {
    #[error("world_width and world_height must be positive and finite")]
    InvalidWorldSize,
    #[error("world size ({actual}) exceeds supported maximum ({max})")]
    WorldSizeTooLarge { max: f64, actual: f64 },
    #[error("target_population must be positive")]
    InvalidTargetPopulation,
    #[error("target_population ({actual}) exceeds supported maximum ({max})")]
    TooManyAgents { max: usize, actual: usize },
    #[error("survivor_fraction must be within [0, 0.5], got {0}")]
    InvalidSurvivorFraction(f64),
    #[error("food_per_agent must be non-negative and finite")]
    InvalidFoodPerAgent,
    #[error("mutation_odds must be within [0, 1], got {0}")]
    InvalidMutationOdds(f64),
    #[error("{0} must be non-negative and finite")]
    InvalidParameter(&'static str),
    #[error("{0} must be positive and finite")]
    NonPositiveParameter(&'static str),
}

impl SimConfig {
    pub const MAX_WORLD_SIZE: f64 = 65_536.0;
    pub const MAX_TARGET_POPULATION: usize = 10_000;

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.world_width, self.world_height)
    }

    /// Survivor count at or below which a generation ends.
    pub fn survivor_threshold(&self) -> f64 {
        self.target_population as f64 * self.survivor_fraction
    }

    pub fn food_count(&self) -> usize {
        (self.target_population as f64 * self.food_per_agent) as usize
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn validate(&self) -> Result<(), SimConfigError> {
        for size in [self.world_width, self.world_height] {
            if !(size.is_finite() && size > 0.0) {
                return Err(SimConfigError::InvalidWorldSize);
            }
            if size > Self::MAX_WORLD_SIZE {
                return Err(SimConfigError::WorldSizeTooLarge {
                    max: Self::MAX_WORLD_SIZE,
                    actual: size,
                });
            }
        }
        if self.target_population == 0 {
            return Err(SimConfigError::InvalidTargetPopulation);
        }
        if self.target_population > Self::MAX_TARGET_POPULATION {
            return Err(SimConfigError::TooManyAgents {
                max: Self::MAX_TARGET_POPULATION,
                actual: self.target_population,
            });
        }
        // Every survivor re-enters with one clone, so more than half would
        // overfill the next generation.
        if !(0.0..=0.5).contains(&self.survivor_fraction) {
            return Err(SimConfigError::InvalidSurvivorFraction(
                self.survivor_fraction,
            ));
        }
        if !(self.food_per_agent.is_finite() && self.food_per_agent >= 0.0) {
            return Err(SimConfigError::InvalidFoodPerAgent);
        }
        if !(0.0..=1.0).contains(&self.mutation_odds) {
            return Err(SimConfigError::InvalidMutationOdds(self.mutation_odds));
        }
        let non_negative = [
            ("agent_radius", self.agent_radius),
            ("initial_health", self.initial_health),
            ("hunger_per_tick", self.hunger_per_tick),
            ("hunger_movement_ratio", self.hunger_movement_ratio),
            ("forward_speed", self.forward_speed),
            ("forward_max", self.forward_max),
            ("turn_speed", self.turn_speed),
            ("turn_max", self.turn_max),
            ("smell_length", self.smell_length),
            ("sight_length", self.sight_length),
            ("pd_health_multiplier", self.pd_health_multiplier),
            ("food_energy", self.food_energy),
            ("food_radius", self.food_radius),
            ("mutation_shift", self.mutation_shift),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SimConfigError::InvalidParameter(name));
            }
        }
        // Sensor falloff divides by the reach.
        for (name, value) in [
            ("smell_reach", self.smell_reach),
            ("sight_reach", self.sight_reach),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimConfigError::NonPositiveParameter(name));
            }
        }
        for (name, value) in [
            ("smell_angle", self.smell_angle),
            ("sight_angle", self.sight_angle),
            ("wariness_bonus", self.wariness_bonus),
        ] {
            if !value.is_finite() {
                return Err(SimConfigError::InvalidParameter(name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.survivor_threshold(), 5.0);
        assert_eq!(config.food_count(), 20);
    }

    #[test]
    fn rejects_bad_world_size() {
        let config = SimConfig {
            world_height: f64::NAN,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimConfigError::InvalidWorldSize));
        let config = SimConfig {
            world_width: 0.0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimConfigError::InvalidWorldSize));
    }

    #[test]
    fn rejects_survivor_fraction_that_overfills_population() {
        let config = SimConfig {
            survivor_fraction: 0.75,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimConfigError::InvalidSurvivorFraction(0.75))
        );
    }

    #[test]
    fn rejects_negative_physical_constants() {
        let config = SimConfig {
            hunger_per_tick: -1.0,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimConfigError::InvalidParameter("hunger_per_tick"))
        );
    }

    #[test]
    fn rejects_zero_reach() {
        let config = SimConfig {
            smell_reach: 0.0,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimConfigError::NonPositiveParameter("smell_reach"))
        );
        let config = SimConfig {
            sight_reach: 0.0,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimConfigError::NonPositiveParameter("sight_reach"))
        );
        let config = SimConfig {
            sight_reach: f64::INFINITY,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = SimConfig::from_json_str(r#"{"seed": 7, "world_width": 640.0}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.world_width, 640.0);
        assert_eq!(config.world_height, 768.0);
        assert_eq!(config.target_population, 20);
    }
}
