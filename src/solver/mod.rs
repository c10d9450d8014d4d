//! Nonlinear transient solver.
//!
//! This module provides the numerical engine of the heat-conduction model.
//!
//! ## Backward-Euler Newton-Raphson
//!
//! Every time increment solves the nonlinear system
//! ```text
//! r(T) = Q(T) - R(T) - M(T)/dt (T - T_prev) - K(T) T = 0
//! ```
//! over the free equations, where:
//! - K is the conduction stiffness
//! - M/dt is the thermal mass divided by the increment
//! - Q is the Joule heat plus the essential-boundary load
//! - R is the radiative loss on the top surface
//!
//! Each Newton iteration solves `J dT = r` with
//! `J = M/dt + K + dR/dT + dQ/dT`, stored as a symmetric skyline matrix
//! and factored in place by Cholesky decomposition.

mod newton;
pub(crate) mod numbering;
mod simulator;
mod skyline;
mod system;

pub use newton::NewtonRaphson;
pub use numbering::EquationNumbering;
pub use simulator::{
    ControllerSettings, RunSummary, SimulationState, Simulator, StepReport, Termination,
};
pub use skyline::SkylineMatrix;
pub use system::{norm, AssemblyInput, GlobalSystem};

/// Bound on the Euclidean norm of the Newton increment.
pub const DEFAULT_INCREMENT_TOLERANCE: f64 = 1e-5;

/// Bound on the Euclidean norm of the nonlinear residual.
pub const DEFAULT_RESIDUAL_TOLERANCE: f64 = 1e-5;

/// Change in the field norm between accepted steps regarded as steady.
pub const DEFAULT_STEADY_STATE_TOLERANCE: f64 = 1e-5;

/// Maximum linear solves per time increment attempt.
pub const DEFAULT_MAX_NEWTON_ITERATIONS: usize = 10;
