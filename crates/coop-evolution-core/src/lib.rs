//! Evolution of cooperation among neural-network agents.
//!
//! Agents wander a bounded 2D world, smell food and see each other through
//! a small fixed-topology network, and meet in Prisoner's Dilemma
//! encounters whose payoffs are paid in health. When the population shrinks
//! to a survivor threshold, a genetic algorithm repopulates it from the
//! survivors' brains.

pub mod actor;
pub mod agent;
pub mod brain;
pub mod config;
pub mod food;
pub mod genetics;
pub mod geometry;
pub mod nn;
pub mod spatial;
pub mod world;

pub use agent::{Agent, AgentId, InteractionOutcome};
pub use config::{SimConfig, SimConfigError};
pub use nn::{NetworkParseError, NetworkSnapshot, NeuralNetwork};
pub use world::{
    AgentSnapshot, GenerationStats, InteractionTally, RunReport, World, WorldInitError,
};
