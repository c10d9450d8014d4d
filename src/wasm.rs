//! WASM bindings for Heatfilm Core.
//!
//! This module provides JavaScript-friendly bindings for running a
//! simulation in the browser and plotting the surface profile.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmHeatSim } from 'heatfilm_core';
//!
//! await init();
//!
//! const sim = new WasmHeatSim(deckText);
//! sim.run();
//!
//! // [x0, T0, x1, T1, ...]
//! const profile = sim.surface_profile();
//! console.log(`${sim.steps} steps, t = ${sim.final_time}`);
//! ```

use wasm_bindgen::prelude::*;

use crate::error::HeatFilmError;
use crate::input;
use crate::output::Recorder;
use crate::solver::Simulator;

fn to_js(e: HeatFilmError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// WASM-compatible heater stack simulator.
///
/// Wraps the native [`Simulator`] and keeps the selected output steps in
/// memory instead of writing files.
#[wasm_bindgen]
pub struct WasmHeatSim {
    simulator: Simulator,
    recorder: Recorder,
}

#[wasm_bindgen]
impl WasmHeatSim {
    /// Create a new simulator from input deck text.
    ///
    /// # Returns
    /// A new `WasmHeatSim` instance or an error if the deck is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(deck: &str) -> Result<WasmHeatSim, JsValue> {
        let config = input::parse(deck).map_err(to_js)?;
        let simulator = Simulator::new(&config).map_err(to_js)?;
        Ok(WasmHeatSim {
            simulator,
            recorder: Recorder::new(),
        })
    }

    /// Run to the end time or steady state.
    #[wasm_bindgen]
    pub fn run(&mut self) -> Result<(), JsValue> {
        self.simulator.run(&mut self.recorder).map_err(to_js)?;
        Ok(())
    }

    /// Advance one accepted step. Returns the new time.
    #[wasm_bindgen]
    pub fn step(&mut self) -> Result<f64, JsValue> {
        let report = self.simulator.step().map_err(to_js)?;
        Ok(report.time)
    }

    /// Surface profile of the last converged field, flattened as
    /// `[x0, T0, x1, T1, ...]`.
    #[wasm_bindgen]
    pub fn surface_profile(&self) -> Vec<f64> {
        self.simulator
            .surface_profile()
            .into_iter()
            .flat_map(|(x, t)| [x, t])
            .collect()
    }

    /// Nodal temperatures of the last converged field.
    #[wasm_bindgen]
    pub fn temperatures(&self) -> Vec<f64> {
        self.simulator.temperatures().to_vec()
    }

    /// Number of recorded output steps.
    #[wasm_bindgen(getter)]
    pub fn recorded_steps(&self) -> usize {
        self.recorder.snapshots.len()
    }

    #[wasm_bindgen(getter)]
    pub fn final_time(&self) -> f64 {
        self.simulator.time()
    }

    /// Accepted steps so far.
    #[wasm_bindgen(getter)]
    pub fn steps(&self) -> usize {
        self.simulator.state().step
    }

    /// Heater current densities in A/cm^2.
    #[wasm_bindgen]
    pub fn current_densities(&self) -> Vec<f64> {
        self.simulator.current_densities()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
