//! Fixed agent brain topology.
//!
//! 5 inputs, 4 hidden, 3 outputs. Neuron names are part of the serialized
//! format, so tooling that reads brains depends on them.

use crate::nn::{NeuralNetwork, NeuronId};

pub const AGENT_LEFT: &str = "agnt_lft";
pub const FOOD_LEFT: &str = "fd_lft";
pub const HUNGER: &str = "hunger";
pub const FOOD_RIGHT: &str = "fd_rght";
pub const AGENT_RIGHT: &str = "agnt_rght";
pub const HIDDEN: [&str; 4] = ["lgc_0", "lgc_1", "lgc_2", "lgc_3"];
pub const MOVE_LEFT: &str = "mv_lft";
pub const ATTACK: &str = "atk";
pub const MOVE_RIGHT: &str = "mv_rght";

/// Input neurons in canonical insertion order.
pub const INPUTS: [&str; 5] = [AGENT_LEFT, FOOD_LEFT, HUNGER, FOOD_RIGHT, AGENT_RIGHT];
/// Output neurons in canonical insertion order.
pub const OUTPUTS: [&str; 3] = [MOVE_LEFT, ATTACK, MOVE_RIGHT];

/// Sensor and motor neurons resolved once when a brain is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrainSlots {
    pub hunger: NeuronId,
    pub food_left: NeuronId,
    pub food_right: NeuronId,
    pub agent_left: NeuronId,
    pub agent_right: NeuronId,
    pub move_left: NeuronId,
    pub move_right: NeuronId,
    pub attack: NeuronId,
}

impl BrainSlots {
    /// Resolve the sensor/motor names, or report the first one missing.
    pub fn try_bind(brain: &NeuralNetwork) -> Result<Self, &'static str> {
        let slot = |name: &'static str| brain.find(name).ok_or(name);
        Ok(Self {
            hunger: slot(HUNGER)?,
            food_left: slot(FOOD_LEFT)?,
            food_right: slot(FOOD_RIGHT)?,
            agent_left: slot(AGENT_LEFT)?,
            agent_right: slot(AGENT_RIGHT)?,
            move_left: slot(MOVE_LEFT)?,
            move_right: slot(MOVE_RIGHT)?,
            attack: slot(ATTACK)?,
        })
    }

    /// Panics if the brain lacks a slot.
    pub fn bind(brain: &NeuralNetwork) -> Self {
        Self::try_bind(brain)
            .unwrap_or_else(|name| panic!("brain topology is missing neuron `{name}`"))
    }
}

/// Empty network with the canonical neurons and no synapses.
pub fn skeleton() -> NeuralNetwork {
    let mut brain = NeuralNetwork::new();
    for name in INPUTS {
        brain.add_neuron(name, true);
    }
    for name in HIDDEN {
        brain.add_neuron(name, false);
    }
    for name in OUTPUTS {
        brain.add_neuron(name, false);
    }
    brain
}
