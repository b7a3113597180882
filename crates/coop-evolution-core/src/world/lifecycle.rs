use super::{GenerationStats, InteractionTally, World};
use crate::actor::Entity;
use crate::agent::{Agent, AgentId, TickContext};
use crate::food::Food;
use crate::genetics;
use crate::nn::NeuralNetwork;
use crate::spatial::FoodIndex;
use rand::seq::IndexedRandom;
use std::collections::HashMap;
use tracing::{debug, info, warn};

impl World {
    /// Advance one tick: act pass, resolve pass, food update, maintenance.
    pub fn on_tick(&mut self) {
        self.tick += 1;
        self.act_phase();
        self.resolve_phase();
        for food in self.food.iter_mut().filter(|f| f.is_alive()) {
            food.on_tick();
        }
        self.update_world();
    }

    /// Tick until generation `max_generation` has completed, or until
    /// `max_ticks` ticks ran if given. Returns the number of ticks executed.
    pub fn run_generations(&mut self, max_generation: u32, max_ticks: Option<u64>) -> u64 {
        let goal = max_generation.saturating_add(1);
        let mut ticks = 0;
        while self.generation < goal {
            if max_ticks.is_some_and(|limit| ticks >= limit) {
                warn!(ticks, generation = self.generation, "tick limit reached");
                break;
            }
            self.on_tick();
            ticks += 1;
        }
        ticks
    }

    fn act_phase(&mut self) {
        let food_index = FoodIndex::build(&self.food);
        let ctx = TickContext {
            config: &self.config,
            bounds: self.bounds,
            food_index: &food_index,
        };
        for idx in 0..self.agents.len() {
            if self.agents[idx].is_alive() {
                Agent::act(&mut self.agents, idx, &mut self.food, &ctx, &mut self.rng);
            }
        }
    }

    fn resolve_phase(&mut self) {
        let decisions: HashMap<AgentId, bool> = self
            .agents
            .iter()
            .map(|a| (a.id(), a.interact_attacked()))
            .collect();
        let multiplier = self.config.pd_health_multiplier;
        for idx in 0..self.agents.len() {
            if !self.agents[idx].is_alive() {
                continue;
            }
            if let Some(outcome) = self.agents[idx].process_attacks(&decisions, multiplier) {
                self.log_event(outcome);
            }
        }
    }

    /// Reap at most one dead agent, replace eaten food, and start the next
    /// generation once the population has shrunk to the survivor threshold.
    fn update_world(&mut self) {
        self.reap_dead_agent();
        self.replace_eaten_food();
        if self.agents.len() as f64 <= self.config.survivor_threshold() {
            self.start_next_generation();
        }
    }

    fn reap_dead_agent(&mut self) -> Option<AgentId> {
        let idx = self.agents.iter().position(|a| !a.is_alive())?;
        let dead = self.agents.remove(idx).id();
        for agent in &mut self.agents {
            agent.forget(dead);
        }
        debug!(%dead, tick = self.tick, remaining = self.agents.len(), "agent reaped");
        Some(dead)
    }

    fn replace_eaten_food(&mut self) {
        let before = self.food.len();
        self.food.retain(|f| f.is_alive());
        for _ in self.food.len()..before {
            let fresh = Food::random(&self.config, &mut self.rng);
            self.food.push(fresh);
        }
    }

    fn spawn_agent(&mut self, brain: NeuralNetwork) -> Agent {
        let id = self.next_agent_id();
        Agent::new(id, self.generation, brain, &self.config, &mut self.rng)
    }

    fn seed_population(&mut self) {
        let mut agents = Vec::with_capacity(self.config.target_population);
        for _ in 0..self.config.target_population {
            let brain = genetics::random_brain(&mut self.rng);
            agents.push(self.spawn_agent(brain));
        }
        self.agents = agents;
    }

    /// Each survivor yields a mutated clone and is kept after a reset; the
    /// rest of the target is filled by crossover of random survivors.
    fn breed_next_population(&mut self) {
        let survivors = std::mem::take(&mut self.agents);
        if survivors.is_empty() {
            warn!(
                generation = self.generation,
                "no survivors, reseeding with random brains"
            );
            self.seed_population();
            return;
        }
        let target = self.config.target_population;
        let mut next = Vec::with_capacity(target.max(survivors.len() * 2));
        let mut parents = Vec::with_capacity(survivors.len());
        for mut parent in survivors {
            let mut brain = parent.brain().clone();
            genetics::mutate(&mut brain, &mut self.rng, &self.mutation_rates);
            let child = self.spawn_agent(brain);
            next.push(child);
            parent.reset(&self.config, &mut self.rng);
            parents.push(next.len());
            next.push(parent);
        }
        while next.len() < target {
            let a = parents.choose(&mut self.rng).copied();
            let b = parents.choose(&mut self.rng).copied();
            let (Some(a), Some(b)) = (a, b) else {
                break;
            };
            let mut brain = genetics::breed(next[a].brain(), next[b].brain(), &mut self.rng);
            genetics::mutate(&mut brain, &mut self.rng, &self.mutation_rates);
            let child = self.spawn_agent(brain);
            next.push(child);
        }
        self.agents = next;
    }

    fn spawn_food(&mut self) {
        let count = self.config.food_count();
        self.food = (0..count)
            .map(|_| Food::random(&self.config, &mut self.rng))
            .collect();
    }

    /// Close the current generation (recording its statistics) and populate
    /// the next one. Generation 0 is seeded with random brains.
    pub(crate) fn start_next_generation(&mut self) {
        if self.generation == 0 {
            self.seed_population();
        } else {
            let stats = GenerationStats {
                generation: self.generation - 1,
                lifetime_ticks: self.tick,
                interactions: self.tally,
            };
            info!(
                generation = stats.generation,
                lifetime = stats.lifetime_ticks,
                cc = stats.interactions.cooperate_cooperate,
                cd = stats.interactions.cooperate_defect,
                dd = stats.interactions.defect_defect,
                survivors = self.agents.len(),
                "generation complete"
            );
            self.history.push(stats);
            self.breed_next_population();
        }
        self.spawn_food();
        self.generation += 1;
        self.tick = 0;
        self.tally = InteractionTally::default();
        debug!(
            generation = self.generation,
            agents = self.agents.len(),
            food = self.food.len(),
            "generation started"
        );
    }
}
