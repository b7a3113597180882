use crate::actor::{ActorKind, Body, Entity};
use crate::brain::BrainSlots;
use crate::config::SimConfig;
use crate::food::Food;
use crate::geometry::{clamp, dist, dist_sqr, uniform, Bounds};
use crate::nn::{NeuralNetwork, NeuronId};
use crate::spatial::FoodIndex;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Stable identity of an agent for the lifetime of a run. Never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent-{}", self.0)
    }
}

/// Result of one resolved encounter, from the reporting agent's side.
/// Defect-cooperate is folded into `CooperateDefect`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionOutcome {
    CooperateCooperate,
    CooperateDefect,
    DefectDefect,
}

impl InteractionOutcome {
    pub fn from_decisions(did_attack: bool, got_attacked: bool) -> Self {
        match (did_attack, got_attacked) {
            (false, false) => Self::CooperateCooperate,
            (true, true) => Self::DefectDefect,
            _ => Self::CooperateDefect,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::CooperateCooperate => "cc",
            Self::CooperateDefect => "cd",
            Self::DefectDefect => "dd",
        }
    }
}

/// Prisoner's Dilemma payoff to the agent that chose `did_attack`.
pub fn payoff(did_attack: bool, got_attacked: bool) -> f64 {
    match (did_attack, got_attacked) {
        (true, true) => -1.0,
        (false, true) => -2.0,
        (true, false) => 1.0,
        (false, false) => 0.0,
    }
}

/// Summed strength of one directional sensor and the nearest entity it saw.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SensorReading {
    pub value: f64,
    pub nearest: Option<usize>,
}

impl SensorReading {
    /// Accumulate `(reach - d) / reach` for each candidate within `reach`.
    /// Ties on distance keep the earliest candidate.
    pub fn gather<I>(point: [f64; 2], reach: f64, candidates: I) -> Self
    where
        I: IntoIterator<Item = (usize, [f64; 2])>,
    {
        let reach_sqr = reach * reach;
        let mut reading = Self::default();
        let mut closest_dist = 0.0;
        for (idx, position) in candidates {
            let d_sqr = dist_sqr(point, position);
            if d_sqr > reach_sqr {
                continue;
            }
            let d = d_sqr.sqrt();
            if reading.nearest.is_none() || d < closest_dist {
                reading.nearest = Some(idx);
                closest_dist = d;
            }
            reading.value += (reach - d) / reach;
        }
        reading
    }
}

/// Read-only context for the act pass of one tick.
pub struct TickContext<'a> {
    pub config: &'a SimConfig,
    pub bounds: Bounds,
    pub food_index: &'a FoodIndex,
}

#[derive(Clone, Debug)]
pub struct Agent {
    id: AgentId,
    body: Body,
    generation: u32,
    brain: NeuralNetwork,
    slots: BrainSlots,
    forward_force: f64,
    turn_force: f64,
    /// Whether each encountered agent attacked in our latest resolved encounter.
    memory: HashMap<AgentId, bool>,
    interact_agent: Option<AgentId>,
    prev_interact_agent: Option<AgentId>,
    interact_attacked: bool,
}

impl Agent {
    /// Spawn at a random pose with full health.
    pub fn new<R: Rng + ?Sized>(
        id: AgentId,
        generation: u32,
        brain: NeuralNetwork,
        config: &SimConfig,
        rng: &mut R,
    ) -> Self {
        let body = Body::random(&config.bounds(), config.agent_radius, config.initial_health, rng);
        Self::with_body(id, generation, brain, body)
    }

    /// Panics if `brain` lacks one of the fixed sensor/motor neurons.
    pub fn with_body(id: AgentId, generation: u32, brain: NeuralNetwork, body: Body) -> Self {
        let slots = BrainSlots::bind(&brain);
        Self {
            id,
            body,
            generation,
            brain,
            slots,
            forward_force: 0.0,
            turn_force: 0.0,
            memory: HashMap::new(),
            interact_agent: None,
            prev_interact_agent: None,
            interact_attacked: false,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn brain(&self) -> &NeuralNetwork {
        &self.brain
    }

    pub fn health(&self) -> f64 {
        self.body.health
    }

    pub fn heading(&self) -> f64 {
        self.body.heading()
    }

    pub fn radius(&self) -> f64 {
        self.body.radius
    }

    pub fn forward_force(&self) -> f64 {
        self.forward_force
    }

    pub fn turn_force(&self) -> f64 {
        self.turn_force
    }

    /// This agent's decision in its current (or latest) interaction.
    pub fn interact_attacked(&self) -> bool {
        self.interact_attacked
    }

    pub fn interact_agent(&self) -> Option<AgentId> {
        self.interact_agent
    }

    pub fn prev_interact_agent(&self) -> Option<AgentId> {
        self.prev_interact_agent
    }

    pub fn memory(&self) -> &HashMap<AgentId, bool> {
        &self.memory
    }

    pub fn was_attacked_by(&self, other: AgentId) -> bool {
        self.memory.get(&other).copied().unwrap_or(false)
    }

    /// Drop everything remembered about a removed agent.
    pub fn forget(&mut self, other: AgentId) {
        self.memory.remove(&other);
    }

    pub(crate) fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Fresh pose, health, memory and interaction state; the brain keeps its
    /// weights and the agent keeps its id and generation label.
    pub fn reset<R: Rng + ?Sized>(&mut self, config: &SimConfig, rng: &mut R) {
        self.body.move_to_random(&config.bounds(), rng);
        self.body.health = config.initial_health;
        self.forward_force = 0.0;
        self.turn_force = 0.0;
        self.brain.reset();
        self.memory.clear();
        self.interact_agent = None;
        self.prev_interact_agent = None;
        self.interact_attacked = false;
    }

    /// First pass of a tick for `agents[idx]`: sense, think, move, engage,
    /// eat. Side effects on other agents are limited to marking an
    /// engagement partner.
    pub fn act<R: Rng + ?Sized>(
        agents: &mut [Agent],
        idx: usize,
        food: &mut [Food],
        ctx: &TickContext<'_>,
        rng: &mut R,
    ) {
        let config = ctx.config;
        agents[idx].update_hunger_sensor(config);
        Self::update_agent_sensors(agents, idx, config);
        agents[idx].update_food_sensors(food, ctx.food_index, config);
        agents[idx].brain.update();
        agents[idx].steer(config, &ctx.bounds);
        Self::engage(agents, idx, rng);
        agents[idx].feed(food, ctx.food_index, config);
    }

    fn set_input(&mut self, slot: NeuronId, energy: f64) {
        self.brain.set_energy(slot, energy);
    }

    fn update_hunger_sensor(&mut self, config: &SimConfig) {
        let hunger = clamp(
            (config.initial_health - self.body.health) / config.initial_health,
            -1.0,
            1.0,
        );
        self.set_input(self.slots.hunger, hunger);
    }

    /// Sensor location `length + radius` away at `heading + angle`.
    pub fn sensor_point(&self, angle: f64, length: f64) -> [f64; 2] {
        let length = length + self.body.radius;
        let heading = self.body.heading() + angle;
        let [x, y] = self.body.position();
        [x + heading.cos() * length, y + heading.sin() * length]
    }

    fn sense_agents(agents: &[Agent], idx: usize, angle: f64, config: &SimConfig) -> SensorReading {
        let point = agents[idx].sensor_point(angle, config.sight_length);
        let candidates = agents
            .iter()
            .enumerate()
            .filter(|(j, other)| *j != idx && other.is_alive())
            .map(|(j, other)| (j, other.position()));
        SensorReading::gather(point, config.sight_reach, candidates)
    }

    fn update_agent_sensors(agents: &mut [Agent], idx: usize, config: &SimConfig) {
        let left = Self::sense_agents(agents, idx, -config.sight_angle, config);
        let right = Self::sense_agents(agents, idx, config.sight_angle, config);
        let wary = |reading: &SensorReading| {
            reading
                .nearest
                .is_some_and(|j| agents[idx].was_attacked_by(agents[j].id))
        };
        let bonus = |reading: &SensorReading| {
            if wary(reading) {
                config.wariness_bonus
            } else {
                0.0
            }
        };
        let left_value = left.value + bonus(&left);
        let right_value = right.value + bonus(&right);
        let agent = &mut agents[idx];
        agent.set_input(agent.slots.agent_left, left_value);
        agent.set_input(agent.slots.agent_right, right_value);
    }

    fn sense_food(
        &self,
        food: &[Food],
        index: &FoodIndex,
        angle: f64,
        config: &SimConfig,
    ) -> SensorReading {
        let point = self.sensor_point(angle, config.smell_length);
        let candidates = index
            .within(point, config.smell_reach)
            .into_iter()
            .filter(|&i| food[i].is_alive())
            .map(|i| (i, food[i].position()));
        SensorReading::gather(point, config.smell_reach, candidates)
    }

    fn update_food_sensors(&mut self, food: &[Food], index: &FoodIndex, config: &SimConfig) {
        let left = self.sense_food(food, index, -config.smell_angle, config);
        let right = self.sense_food(food, index, config.smell_angle, config);
        self.set_input(self.slots.food_left, left.value);
        self.set_input(self.slots.food_right, right.value);
    }

    /// Turn the motor outputs into forward and turn forces and move. Forward
    /// force is never negative.
    fn steer(&mut self, config: &SimConfig, bounds: &Bounds) {
        let left = self.brain.activation(self.slots.move_left);
        let right = self.brain.activation(self.slots.move_right);
        self.forward_force = clamp(
            (left / 2.0 + right / 2.0) * config.forward_speed,
            0.0,
            config.forward_max,
        );
        self.turn_force = clamp(
            (right - left) * config.turn_speed,
            -config.turn_max,
            config.turn_max,
        );
        let heading = self.body.heading();
        self.body.move_by(
            heading.cos() * self.forward_force,
            heading.sin() * self.forward_force,
            self.turn_force,
            bounds,
        );
    }

    fn will_attack<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        let prob = clamp(self.brain.activation(self.slots.attack), 0.0, 1.0);
        uniform(rng, 0.0, 1.0) <= prob
    }

    /// Pair `agents[idx]` with the first free live agent in contact range.
    /// A pairing that continues last tick's encounter keeps the previous
    /// decisions instead of drawing new ones.
    pub(crate) fn engage<R: Rng + ?Sized>(agents: &mut [Agent], idx: usize, rng: &mut R) {
        if agents[idx].interact_agent.is_some() {
            return;
        }
        let me = &agents[idx];
        let contact_sqr = (me.body.radius * 2.0).powi(2);
        let partner = agents.iter().enumerate().position(|(j, other)| {
            j != idx
                && other.is_alive()
                && other.interact_agent.is_none()
                && dist_sqr(me.position(), other.position()) <= contact_sqr
        });
        let Some(j) = partner else {
            agents[idx].interact_attacked = false;
            return;
        };
        let (my_id, partner_id) = (agents[idx].id, agents[j].id);
        agents[idx].interact_agent = Some(partner_id);
        agents[j].interact_agent = Some(my_id);
        if agents[idx].prev_interact_agent != Some(partner_id) {
            agents[idx].interact_attacked = agents[idx].will_attack(rng);
            agents[j].interact_attacked = agents[j].will_attack(rng);
        }
    }

    /// Eat the first live food in reach, otherwise pay the hunger cost.
    fn feed(&mut self, food: &mut [Food], index: &FoodIndex, config: &SimConfig) {
        let me = self.position();
        let eaten = index
            .within(me, self.body.radius + config.food_radius)
            .into_iter()
            .find(|&i| {
                food[i].is_alive()
                    && dist(me, food[i].position()) <= self.body.radius + food[i].body().radius
            });
        match eaten {
            Some(i) => self.body.health += food[i].eat(),
            None => {
                self.body.health -=
                    self.forward_force * config.hunger_movement_ratio + config.hunger_per_tick;
            }
        }
    }

    /// Second pass: score this tick's encounter unless it continues the one
    /// already scored, then clear the engagement. `decisions` maps every
    /// agent to its `interact_attacked` flag for this tick.
    pub fn process_attacks(
        &mut self,
        decisions: &HashMap<AgentId, bool>,
        multiplier: f64,
    ) -> Option<InteractionOutcome> {
        let other = self.interact_agent.take()?;
        if self.prev_interact_agent == Some(other) {
            return None;
        }
        let got_attacked = *decisions.get(&other)?;
        let did_attack = self.interact_attacked;
        self.body.health += payoff(did_attack, got_attacked) * multiplier;
        self.memory.insert(other, got_attacked);
        self.prev_interact_agent = Some(other);
        Some(InteractionOutcome::from_decisions(did_attack, got_attacked))
    }
}

impl Entity for Agent {
    fn body(&self) -> &Body {
        &self.body
    }

    fn kind(&self) -> ActorKind {
        ActorKind::Agent
    }
}
