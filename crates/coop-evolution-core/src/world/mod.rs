pub mod lifecycle;
pub mod metrics;
#[cfg(test)]
mod tests;

pub use metrics::*;

use crate::agent::{Agent, AgentId, InteractionOutcome};
use crate::config::{SimConfig, SimConfigError};
use crate::food::Food;
use crate::genetics::MutationRates;
use crate::geometry::Bounds;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// Simulation orchestrator: owns the population and drives ticks and
/// generation transitions.
///
/// A new world is empty; the first [`World::on_tick`] seeds generation 0.
pub struct World {
    pub(crate) agents: Vec<Agent>,
    pub(crate) food: Vec<Food>,
    pub(crate) config: SimConfig,
    pub(crate) bounds: Bounds,
    pub(crate) mutation_rates: MutationRates,
    pub(crate) rng: ChaCha12Rng,
    pub(crate) generation: u32,
    pub(crate) tick: u64,
    pub(crate) next_agent_id: u64,
    pub(crate) tally: InteractionTally,
    pub(crate) history: Vec<GenerationStats>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldInitError {
    #[error(transparent)]
    Config(#[from] SimConfigError),
}

impl World {
    pub fn new(config: SimConfig) -> Self {
        Self::try_new(config).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(config: SimConfig) -> Result<Self, WorldInitError> {
        config.validate()?;
        Ok(Self {
            agents: Vec::new(),
            food: Vec::new(),
            bounds: config.bounds(),
            mutation_rates: MutationRates::from_config(&config),
            rng: ChaCha12Rng::seed_from_u64(config.seed),
            config,
            generation: 0,
            tick: 0,
            next_agent_id: 0,
            tally: InteractionTally::default(),
            history: Vec::new(),
        })
    }

    /// Default configuration on a `width` x `height` world.
    pub fn with_size(width: f64, height: f64) -> Self {
        Self::new(SimConfig {
            world_width: width,
            world_height: height,
            ..SimConfig::default()
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn food(&self) -> &[Food] {
        &self.food
    }

    /// `(generation, tick)`; `generation` counts generations started so far.
    pub fn gen_tick(&self) -> (u32, u64) {
        (self.generation, self.tick)
    }

    /// Statistics of every completed generation, oldest first.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Outcome counts of the generation in progress.
    pub fn tally(&self) -> InteractionTally {
        self.tally
    }

    /// Record one resolved encounter for the current generation.
    pub fn log_event(&mut self, outcome: InteractionOutcome) {
        self.tally.record(outcome);
    }

    pub fn find_agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    pub(crate) fn next_agent_id(&mut self) -> AgentId {
        let id = AgentId(self.next_agent_id);
        self.next_agent_id += 1;
        id
    }
}
