//! # Heatfilm Core
//!
//! Transient nonlinear heat conduction in a layered thin-film heater stack.
//!
//! This library provides:
//! - A labelled-field input deck for geometry, mesh seeds and time stepping
//! - A structured layered mesh of bilinear quadrilaterals
//! - Temperature-dependent material laws for silicon, titanium, silicon
//!   dioxide and copper, Joule heating in the titanium heaters and radiation
//!   from the copper surface
//! - A Newton-Raphson solver on symmetric skyline storage with adaptive
//!   time stepping
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`input`] - Parser for the input deck and the typed configuration
//! - [`mesh`] - Layered grid, heater registry and radiating boundary
//! - [`materials`] - Material laws and Joule heating
//! - [`elements`] - Element matrices and vectors by Gauss quadrature
//! - [`solver`] - Equation numbering, skyline matrices, Newton-Raphson and
//!   time integration
//! - [`output`] - VTK, surface profile and current density files
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! heatfilm input.deck --output results/
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use heatfilm_core::{input, output::FileOutput, Simulator};
//!
//! let config = input::parse_file("input.deck".as_ref())?;
//! let mut simulator = Simulator::new(&config)?;
//! let mut sink = FileOutput::new("results")?;
//! let summary = simulator.run(&mut sink)?;
//! println!("{} steps, t = {}", summary.steps, summary.final_time);
//! # Ok::<(), heatfilm_core::HeatFilmError>(())
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmHeatSim } from 'heatfilm_core';
//!
//! const sim = new WasmHeatSim(deckText);
//! sim.run();
//! const profile = sim.surface_profile();
//! ```
//!
//! ## Method
//!
//! Each time increment is integrated with backward Euler:
//!
//! 1. Assemble conduction, mass, Joule and radiation terms at the current
//!    temperature iterate
//! 2. Solve the linearised system for a temperature update
//! 3. Repeat until both the update and the residual are small
//!
//! Failed or implausible increments are retried with a quarter of the time
//! increment; steady runs double it.
//!
//! Units are mm, s, K, mA, tonne and mW throughout.

pub mod elements;
pub mod error;
pub mod input;
pub mod materials;
pub mod mesh;
pub mod output;
pub mod solver;

// Re-export main types for convenience
pub use error::{HeatFilmError, Result};
pub use input::SimulationConfig;
pub use mesh::LayeredMesh;
pub use solver::{RunSummary, Simulator, Termination};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmHeatSim;

/// Stefan-Boltzmann constant in mW/(mm^2 K^4)
pub const STEFAN_BOLTZMANN: f64 = 5.6703e-11;
