//! Sparse named neural network with a two-phase forward pass.
//!
//! Neurons keep insertion order (inputs, hidden, outputs by convention) and
//! synapses refer to them by [`NeuronId`], an index into that order, so a
//! derived `Clone` is a deep copy with identical topology.
//!
//! Textual form: `[name:is_input,...][weight:src_name:dest_name,...]`.

use crate::geometry::sgn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeuronId(pub usize);

#[derive(Clone, Debug, PartialEq)]
pub struct Neuron {
    name: String,
    is_input: bool,
    pub energy: f64,
}

impl Neuron {
    pub fn new(name: impl Into<String>, is_input: bool) -> Self {
        Self {
            name: name.into(),
            is_input,
            energy: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_input(&self) -> bool {
        self.is_input
    }

    /// Compressive odd response `sgn(e) * sqrt(|e|)`.
    pub fn activation(&self) -> f64 {
        sgn(self.energy) * self.energy.abs().sqrt()
    }

    // Inputs hold externally written energy across updates.
    fn clear_energy(&mut self) {
        if !self.is_input {
            self.energy = 0.0;
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Synapse {
    src: NeuronId,
    dest: NeuronId,
    pub weight: f64,
    energy: f64,
}

impl Synapse {
    pub fn src(&self) -> NeuronId {
        self.src
    }

    pub fn dest(&self) -> NeuronId {
        self.dest
    }

    /// Energy computed by the most recent update.
    pub fn energy(&self) -> f64 {
        self.energy
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NeuralNetwork {
    neurons: Vec<Neuron>,
    synapses: Vec<Synapse>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkParseError {
    #[error("bad input format: expected `[neurons][synapses]`")]
    BracketStructure,
    #[error("bad neuron entry `{0}`: expected `name:is_input`")]
    NeuronEntry(String),
    #[error("bad is_input flag `{0}`: expected 0 or 1")]
    InputFlag(String),
    #[error("duplicate neuron name `{0}`")]
    DuplicateNeuron(String),
    #[error("bad synapse entry `{0}`: expected `weight:src:dest`")]
    SynapseEntry(String),
    #[error("synapse weight `{0}` is not a finite number")]
    Weight(String),
    #[error("synapse references unknown neuron `{0}`")]
    UnknownNeuron(String),
}

impl NeuralNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a neuron and return its id. Names must be unique and must not
    /// contain any of `[]:,` if the network is to be serialized.
    pub fn add_neuron(&mut self, name: impl Into<String>, is_input: bool) -> NeuronId {
        let neuron = Neuron::new(name, is_input);
        debug_assert!(
            self.find(neuron.name()).is_none(),
            "neuron names must be unique within a network"
        );
        self.neurons.push(neuron);
        NeuronId(self.neurons.len() - 1)
    }

    pub fn add_synapse(&mut self, src: NeuronId, dest: NeuronId, weight: f64) {
        assert!(
            src.0 < self.neurons.len() && dest.0 < self.neurons.len(),
            "synapse endpoints must belong to this network"
        );
        self.synapses.push(Synapse {
            src,
            dest,
            weight,
            energy: 0.0,
        });
    }

    pub fn find(&self, name: &str) -> Option<NeuronId> {
        self.neurons
            .iter()
            .position(|n| n.name == name)
            .map(NeuronId)
    }

    pub fn neuron(&self, id: NeuronId) -> &Neuron {
        &self.neurons[id.0]
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn synapses(&self) -> &[Synapse] {
        &self.synapses
    }

    pub fn synapses_mut(&mut self) -> &mut [Synapse] {
        &mut self.synapses
    }

    pub fn set_energy(&mut self, id: NeuronId, energy: f64) {
        self.neurons[id.0].energy = energy;
    }

    pub fn activation(&self, id: NeuronId) -> f64 {
        self.neurons[id.0].activation()
    }

    /// One forward step. All synapse energies are computed from the current
    /// activations before any neuron is cleared, so synapse order never
    /// matters.
    pub fn update(&mut self) {
        let neurons = &self.neurons;
        for synapse in &mut self.synapses {
            synapse.energy = neurons[synapse.src.0].activation() * synapse.weight;
        }
        for neuron in &mut self.neurons {
            neuron.clear_energy();
        }
        for synapse in &self.synapses {
            self.neurons[synapse.dest.0].energy += synapse.energy;
        }
    }

    /// Zero every neuron and synapse energy, keeping weights.
    pub fn reset(&mut self) {
        for synapse in &mut self.synapses {
            synapse.energy = 0.0;
        }
        for neuron in &mut self.neurons {
            neuron.energy = 0.0;
        }
    }

    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// Replace this network with the parsed content of `text`. On error the
    /// network is left untouched.
    pub fn deserialize(&mut self, text: &str) -> Result<(), NetworkParseError> {
        *self = text.parse()?;
        Ok(())
    }

    /// Human-readable synapse listing, e.g. `hunger * 0.42 -> lgc_1, ...`.
    pub fn pretty_print(&self) -> String {
        self.synapses
            .iter()
            .map(|s| {
                format!(
                    "{} * {:3.2} -> {}",
                    self.neurons[s.src.0].name, s.weight, self.neurons[s.dest.0].name
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            neurons: self
                .neurons
                .iter()
                .map(|n| NeuronState {
                    name: n.name.clone(),
                    is_input: n.is_input,
                    energy: n.energy,
                    activation: n.activation(),
                })
                .collect(),
            synapses: self
                .synapses
                .iter()
                .map(|s| SynapseState {
                    src: self.neurons[s.src.0].name.clone(),
                    dest: self.neurons[s.dest.0].name.clone(),
                    weight: s.weight,
                    energy: s.energy,
                })
                .collect(),
        }
    }
}

impl fmt::Display for NeuralNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, n) in self.neurons.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", n.name, u8::from(n.is_input))?;
        }
        f.write_str("][")?;
        for (i, s) in self.synapses.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(
                f,
                "{}:{}:{}",
                s.weight, self.neurons[s.src.0].name, self.neurons[s.dest.0].name
            )?;
        }
        f.write_str("]")
    }
}

impl FromStr for NeuralNetwork {
    type Err = NetworkParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (neuron_part, synapse_part) = split_groups(text.trim())?;
        let mut net = NeuralNetwork::new();

        for entry in split_entries(neuron_part) {
            let (name, flag) = entry
                .split_once(':')
                .filter(|(name, flag)| !name.is_empty() && !flag.contains(':'))
                .ok_or_else(|| NetworkParseError::NeuronEntry(entry.to_string()))?;
            let is_input = match flag {
                "1" | "true" | "True" => true,
                "0" | "false" | "False" => false,
                other => return Err(NetworkParseError::InputFlag(other.to_string())),
            };
            if net.find(name).is_some() {
                return Err(NetworkParseError::DuplicateNeuron(name.to_string()));
            }
            net.add_neuron(name, is_input);
        }

        for entry in split_entries(synapse_part) {
            let fields: Vec<&str> = entry.split(':').collect();
            let [weight, src, dest] = fields[..] else {
                return Err(NetworkParseError::SynapseEntry(entry.to_string()));
            };
            let weight = weight
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|w| w.is_finite())
                .ok_or_else(|| NetworkParseError::Weight(weight.to_string()))?;
            let src_id = net
                .find(src)
                .ok_or_else(|| NetworkParseError::UnknownNeuron(src.to_string()))?;
            let dest_id = net
                .find(dest)
                .ok_or_else(|| NetworkParseError::UnknownNeuron(dest.to_string()))?;
            net.add_synapse(src_id, dest_id, weight);
        }

        Ok(net)
    }
}

/// Split `[a][b]` into `("a", "b")`; no other brackets are allowed.
fn split_groups(text: &str) -> Result<(&str, &str), NetworkParseError> {
    let inner = text
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(NetworkParseError::BracketStructure)?;
    let (first, second) = inner
        .split_once("][")
        .ok_or(NetworkParseError::BracketStructure)?;
    if [first, second]
        .iter()
        .any(|group| group.contains('[') || group.contains(']'))
    {
        return Err(NetworkParseError::BracketStructure);
    }
    Ok((first, second))
}

fn split_entries(group: &str) -> impl Iterator<Item = &str> {
    // An empty group is an empty list, not one empty entry.
    group
        .split(',')
        .filter(move |_| !group.is_empty())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NeuronState {
    pub name: String,
    pub is_input: bool,
    pub energy: f64,
    pub activation: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SynapseState {
    pub src: String,
    pub dest: String,
    pub weight: f64,
    pub energy: f64,
}

/// Read-only copy of a network's state for inspection tools.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub neurons: Vec<NeuronState>,
    pub synapses: Vec<SynapseState>,
}
