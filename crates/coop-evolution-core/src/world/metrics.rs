use super::World;
use crate::actor::Entity;
use crate::agent::{AgentId, InteractionOutcome};
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolved-encounter counts for one generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionTally {
    pub cooperate_cooperate: usize,
    pub cooperate_defect: usize,
    pub defect_defect: usize,
}

impl InteractionTally {
    pub fn record(&mut self, outcome: InteractionOutcome) {
        match outcome {
            InteractionOutcome::CooperateCooperate => self.cooperate_cooperate += 1,
            InteractionOutcome::CooperateDefect => self.cooperate_defect += 1,
            InteractionOutcome::DefectDefect => self.defect_defect += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.cooperate_cooperate + self.cooperate_defect + self.defect_defect
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation label of the population that just ended.
    pub generation: u32,
    /// Ticks the generation lasted.
    pub lifetime_ticks: u64,
    pub interactions: InteractionTally,
}

/// Read-only view of one agent for visualization and dumps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub generation: u32,
    pub position: [f64; 2],
    pub heading: f64,
    pub radius: f64,
    pub health: f64,
    pub attacked: bool,
}

/// End-of-run report: configuration, per-generation series and a sample
/// brain. `Display` renders the plain-text layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub world_size: [f64; 2],
    pub target_population: usize,
    pub survivor_fraction: f64,
    pub food_per_agent: f64,
    pub final_generation: u32,
    pub generations: Vec<GenerationStats>,
    /// Pretty-printed brain of a random living agent, if any remain.
    pub sample_brain: Option<String>,
}

impl RunReport {
    pub fn lifetimes(&self) -> Vec<u64> {
        self.generations.iter().map(|g| g.lifetime_ticks).collect()
    }

    pub fn series(&self, pick: impl Fn(&InteractionTally) -> usize) -> Vec<usize> {
        self.generations.iter().map(|g| pick(&g.interactions)).collect()
    }
}

fn join<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---> Model parameters")?;
        writeln!(
            f,
            "World size:         ({},{})",
            self.world_size[0], self.world_size[1]
        )?;
        writeln!(f, "Agents:             {}", self.target_population)?;
        writeln!(f, "Survivor percent:   {:.2}", self.survivor_fraction)?;
        writeln!(f, "Food per Agent:     {:.2}", self.food_per_agent)?;
        writeln!(f, "---> Model results")?;
        writeln!(f, "Final generation:   {}", self.final_generation)?;
        writeln!(f, "Lifetimes:          [{}]", join(&self.lifetimes()))?;
        writeln!(f, "All events:         [{}]", join(&self.series(|t| t.total())))?;
        writeln!(
            f,
            "C-C events:         [{}]",
            join(&self.series(|t| t.cooperate_cooperate))
        )?;
        writeln!(
            f,
            "C-D events:         [{}]",
            join(&self.series(|t| t.cooperate_defect))
        )?;
        writeln!(
            f,
            "D-D events:         [{}]",
            join(&self.series(|t| t.defect_defect))
        )?;
        writeln!(f, "---> Configuration of random living Agent")?;
        match &self.sample_brain {
            Some(brain) => writeln!(f, "{brain}"),
            None => writeln!(f, "No current Agents"),
        }
    }
}

impl World {
    pub fn agent_snapshots(&self) -> Vec<AgentSnapshot> {
        self.agents
            .iter()
            .map(|a| AgentSnapshot {
                id: a.id(),
                generation: a.generation(),
                position: a.position(),
                heading: a.heading(),
                radius: a.radius(),
                health: a.health(),
                attacked: a.interact_attacked(),
            })
            .collect()
    }

    /// Finalize the run. The sample brain is chosen with the world's RNG.
    pub fn on_exit(&mut self) -> RunReport {
        let sample_brain = self
            .agents
            .choose(&mut self.rng)
            .map(|agent| agent.brain().pretty_print());
        let report = self.build_report(sample_brain);
        tracing::info!(
            final_generation = report.final_generation,
            completed = report.generations.len(),
            living = self.agents.len(),
            "simulation finished"
        );
        report
    }

    /// Report on the run so far without touching simulation state. The
    /// sample brain is drawn from an RNG derived from the seed and the
    /// current `(generation, tick)`, so repeated calls agree.
    pub fn report(&self) -> RunReport {
        let mut rng = ChaCha12Rng::seed_from_u64(
            self.config.seed ^ (u64::from(self.generation) << 40) ^ self.tick,
        );
        let sample_brain = self
            .agents
            .choose(&mut rng)
            .map(|agent| agent.brain().pretty_print());
        self.build_report(sample_brain)
    }

    fn build_report(&self, sample_brain: Option<String>) -> RunReport {
        RunReport {
            world_size: [self.config.world_width, self.config.world_height],
            target_population: self.config.target_population,
            survivor_fraction: self.config.survivor_fraction,
            food_per_agent: self.config.food_per_agent,
            final_generation: self.generation.saturating_sub(1),
            generations: self.history.clone(),
            sample_brain,
        }
    }
}
