use crate::brain::{self, AGENT_LEFT, AGENT_RIGHT, ATTACK, FOOD_LEFT, FOOD_RIGHT, HUNGER};
use crate::brain::{MOVE_LEFT, MOVE_RIGHT};
use crate::config::SimConfig;
use crate::geometry::{clamp, uniform};
use crate::nn::NeuralNetwork;
use rand::Rng;

/// Initial synapse layout: (source, destination, weight low, weight high).
///
/// The ranges bias fresh brains towards turning at food and approaching
/// agents on the same side while keeping the attack drive near neutral.
pub const SYNAPSE_LAYOUT: [(&str, &str, f64, f64); 18] = [
    // Input to hidden, left side
    (AGENT_LEFT, "lgc_0", -0.25, 1.0),
    (AGENT_LEFT, "lgc_1", -1.0, 1.0),
    (FOOD_LEFT, "lgc_0", -0.25, 0.25),
    (FOOD_LEFT, "lgc_1", -0.25, 1.0),
    // Input to hidden, center
    (HUNGER, "lgc_1", -0.25, 0.75),
    (HUNGER, "lgc_2", -0.25, 0.75),
    // Input to hidden, right side
    (FOOD_RIGHT, "lgc_2", -0.25, 1.0),
    (FOOD_RIGHT, "lgc_3", -0.25, 0.25),
    (AGENT_RIGHT, "lgc_2", -0.25, 0.25),
    (AGENT_RIGHT, "lgc_3", -0.25, 1.0),
    // Hidden to output, left side
    ("lgc_0", MOVE_LEFT, -0.25, 0.25),
    ("lgc_0", ATTACK, -0.5, 0.5),
    ("lgc_1", MOVE_LEFT, -0.25, 1.0),
    ("lgc_1", ATTACK, -0.25, 0.25),
    // Hidden to output, right side
    ("lgc_2", ATTACK, -0.25, 0.25),
    ("lgc_2", MOVE_RIGHT, -0.25, 1.0),
    ("lgc_3", ATTACK, -0.5, 0.5),
    ("lgc_3", MOVE_RIGHT, -0.25, 0.25),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MutationRates {
    /// Probability that a given synapse is perturbed.
    pub odds: f64,
    /// Largest absolute shift of a perturbation.
    pub shift: f64,
    /// Weights are clamped to `[-limit, limit]` after a perturbation.
    pub limit: f64,
}

impl Default for MutationRates {
    fn default() -> Self {
        Self {
            odds: 0.2,
            shift: 0.5,
            limit: 1.0,
        }
    }
}

impl MutationRates {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            odds: config.mutation_odds,
            shift: config.mutation_shift,
            ..Self::default()
        }
    }
}

/// Fresh brain with every weight drawn from its layout range.
pub fn random_brain<R: Rng + ?Sized>(rng: &mut R) -> NeuralNetwork {
    let mut net = brain::skeleton();
    for (src, dest, low, high) in SYNAPSE_LAYOUT {
        let (Some(src), Some(dest)) = (net.find(src), net.find(dest)) else {
            panic!("synapse layout references a neuron missing from the skeleton");
        };
        let weight = uniform(rng, low, high);
        net.add_synapse(src, dest, weight);
    }
    net
}

/// Per-synapse crossover starting from a copy of `parent_1`.
///
/// Each weight is taken from parent 2 (`c > 0.66`), averaged (`c > 0.33`) or
/// kept. Results are not clamped.
pub fn breed<R: Rng + ?Sized>(
    parent_1: &NeuralNetwork,
    parent_2: &NeuralNetwork,
    rng: &mut R,
) -> NeuralNetwork {
    assert_eq!(
        parent_1.synapses().len(),
        parent_2.synapses().len(),
        "parents must share a topology"
    );
    let mut child = parent_1.clone();
    for (synapse, other) in child.synapses_mut().iter_mut().zip(parent_2.synapses()) {
        let chance = uniform(rng, 0.0, 1.0);
        if chance > 0.66 {
            synapse.weight = other.weight;
        } else if chance > 0.33 {
            synapse.weight = (synapse.weight + other.weight) / 2.0;
        }
    }
    child
}

/// Perturb each synapse with probability `rates.odds`, then clamp it.
pub fn mutate<R: Rng + ?Sized>(net: &mut NeuralNetwork, rng: &mut R, rates: &MutationRates) {
    for synapse in net.synapses_mut() {
        if uniform(rng, 0.0, 1.0) <= rates.odds {
            synapse.weight += rates.shift * uniform(rng, -1.0, 1.0);
            synapse.weight = clamp(synapse.weight, -rates.limit, rates.limit);
        }
    }
}
