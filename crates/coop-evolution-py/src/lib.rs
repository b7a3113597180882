use coop_evolution_core::actor::Entity;
use coop_evolution_core::{Agent, SimConfig, World};
use pyo3::exceptions::{PyIndexError, PyValueError};
use pyo3::prelude::*;

/// Agent state for drawing: `(x, y, heading, radius, health, attacked, generation)`.
type AgentState = (f64, f64, f64, f64, f64, bool, u32);

/// Python handle on a simulation world. The visualization layer calls
/// `on_tick` once per frame and reads state back through the accessors.
#[pyclass(name = "World")]
struct PyWorld {
    inner: World,
}

impl PyWorld {
    fn agent(&self, index: usize) -> PyResult<&Agent> {
        self.inner.agents().get(index).ok_or_else(|| {
            PyIndexError::new_err(format!(
                "agent index {index} out of range ({} agents)",
                self.inner.agents().len()
            ))
        })
    }
}

#[pymethods]
impl PyWorld {
    #[new]
    #[pyo3(signature = (width, height, seed=None))]
    fn new(width: f64, height: f64, seed: Option<u64>) -> PyResult<Self> {
        let defaults = SimConfig::default();
        let config = SimConfig {
            world_width: width,
            world_height: height,
            seed: seed.unwrap_or(defaults.seed),
            ..defaults
        };
        let inner = World::try_new(config).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    fn on_tick(&mut self) {
        self.inner.on_tick();
    }

    /// Finalize the run and return the plain-text report.
    fn on_exit(&mut self) -> String {
        self.inner.on_exit().to_string()
    }

    /// JSON report of the run so far; does not advance or reseed anything.
    fn report_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner.report())
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn gen_tick(&self) -> (u32, u64) {
        self.inner.gen_tick()
    }

    fn agent_states(&self) -> Vec<AgentState> {
        self.inner
            .agents()
            .iter()
            .map(|a| {
                let [x, y] = a.position();
                (
                    x,
                    y,
                    a.heading(),
                    a.radius(),
                    a.health(),
                    a.interact_attacked(),
                    a.generation(),
                )
            })
            .collect()
    }

    /// Live food as `(x, y, radius)`.
    fn food_states(&self) -> Vec<(f64, f64, f64)> {
        self.inner
            .food()
            .iter()
            .filter(|f| f.is_alive())
            .map(|f| {
                let [x, y] = f.position();
                (x, y, f.body().radius)
            })
            .collect()
    }

    fn brain(&self, index: usize) -> PyResult<String> {
        Ok(self.agent(index)?.brain().serialize())
    }

    fn brain_snapshot_json(&self, index: usize) -> PyResult<String> {
        let snapshot = self.agent(index)?.brain().snapshot();
        serde_json::to_string(&snapshot).map_err(|e| PyValueError::new_err(e.to_string()))
    }
}

#[pyfunction]
fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_class::<PyWorld>()?;
    Ok(())
}
