//! Adaptive time integration.
//!
//! Each call to [`Simulator::step`] produces one accepted time step:
//!
//! 1. Seed the iterate from the last converged field.
//! 2. If the heater shutoff time lies inside the increment, shorten the
//!    increment to land on it.
//! 3. Run Newton-Raphson. A non-positive-definite Jacobian, an exhausted
//!    iteration budget, or a nodal temperature change above the configured
//!    limit rejects the attempt: the increment is quartered and the attempt
//!    restarts from the last converged field.
//! 4. On acceptance advance the clock, switch the heaters off when landing on
//!    the shutoff time, and double the increment after two accepted steps
//!    at the same size.
//! 5. Compare the field norm with the previous step to detect steady state.

use tracing::{info, warn};

use crate::error::{HeatFilmError, Result};
use crate::input::SimulationConfig;
use crate::materials::JouleHeating;
use crate::mesh::{generate, validate_mesh, HeaterRegistry, LayeredMesh};
use crate::output::{surface_profile, OutputSink, Snapshot};

use super::system::{norm, AssemblyInput, GlobalSystem};
use super::{EquationNumbering, NewtonRaphson};

/// Relative tolerance for landing on the heater shutoff time.
const LANDING_TOLERANCE: f64 = 1e-9;

/// Time-stepping limits and physical constants used by the controller.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub initial_dt: f64,
    pub min_dt: f64,
    pub total_time: f64,
    pub max_steps: usize,
    pub output_interval: usize,
    pub max_temperature_change: f64,
    pub shutoff_time: Option<f64>,
    pub steady_state_tolerance: f64,
    pub boundary_temperature: f64,
    pub ambient_temperature: f64,
    pub initial_temperature: f64,
}

impl ControllerSettings {
    pub fn from_config(config: &SimulationConfig) -> Self {
        let time = &config.time;
        Self {
            initial_dt: time.initial_dt,
            min_dt: time.min_dt,
            total_time: time.total_time,
            max_steps: time.max_steps,
            output_interval: time.output_interval,
            max_temperature_change: time.max_temperature_change,
            shutoff_time: time.shutoff_time,
            steady_state_tolerance: config.solver.steady_state_tolerance,
            boundary_temperature: config.temperatures.boundary,
            ambient_temperature: config.temperatures.ambient,
            initial_temperature: config.temperatures.initial,
        }
    }
}

/// Mutable state of a run.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Newton iterate, one value per node
    pub current: Vec<f64>,
    /// Last converged field, one value per node
    pub previous: Vec<f64>,
    pub time: f64,
    pub dt: f64,
    /// Accepted steps since the increment last changed
    pub unchanged_steps: usize,
    pub heaters: HeaterRegistry,
    pub heaters_off: bool,
    /// Field norm at the previous accepted step
    pub last_norm: Option<f64>,
    /// Accepted steps so far
    pub step: usize,
    /// Rejected attempts so far
    pub rejections: usize,
}

/// Outcome of one accepted step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// 1-based step number
    pub step: usize,
    /// Time at the end of the step
    pub time: f64,
    /// Increment the step was taken with
    pub dt: f64,
    /// Newton solves of the accepted attempt
    pub iterations: usize,
    /// Attempts including rejected ones
    pub attempts: usize,
    pub heaters_switched_off: bool,
    pub steady: bool,
    pub output_due: bool,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    SteadyState,
    EndTime,
}

/// Summary returned by [`Simulator::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: usize,
    pub final_time: f64,
    pub termination: Termination,
}

/// Transient nonlinear heat-conduction simulator.
#[derive(Debug)]
pub struct Simulator {
    mesh: LayeredMesh,
    numbering: EquationNumbering,
    system: GlobalSystem,
    newton: NewtonRaphson,
    joule: JouleHeating,
    settings: ControllerSettings,
    /// Configured heater currents, for the current density report
    rated_currents: Vec<f64>,
    /// x range of the surface profile and the offset subtracted from it
    surface_window: (f64, f64),
    state: SimulationState,
}

impl Simulator {
    /// Generate the mesh described by `config` and set up a simulator on it.
    ///
    /// `config` is validated first, so hand-built configurations get the
    /// same checks as parsed decks.
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        let mesh = generate(config)?;
        Self::build(config, mesh)
    }

    /// Set up a simulator on an externally provided mesh.
    pub fn with_mesh(config: &SimulationConfig, mesh: LayeredMesh) -> Result<Self> {
        config.validate()?;
        Self::build(config, mesh)
    }

    fn build(config: &SimulationConfig, mesh: LayeredMesh) -> Result<Self> {
        validate_mesh(&mesh)?;
        let numbering = EquationNumbering::new(&mesh)?;
        let system = GlobalSystem::new(&numbering);
        let solver = &config.solver;
        let newton = NewtonRaphson::with_config(
            solver.max_newton_iterations,
            solver.increment_tolerance,
            solver.residual_tolerance,
        );
        let settings = ControllerSettings::from_config(config);

        let mut field = vec![settings.initial_temperature; mesh.num_nodes()];
        for &node in numbering.boundary_nodes() {
            field[node] = settings.boundary_temperature;
        }

        info!(
            nodes = mesh.num_nodes(),
            elements = mesh.num_elements(),
            equations = numbering.num_equations(),
            stored = numbering.row_ends().last().copied().unwrap_or(0),
            "simulator ready"
        );

        let geometry = &config.geometry;
        let state = SimulationState {
            current: field.clone(),
            previous: field,
            time: 0.0,
            dt: settings.initial_dt,
            unchanged_steps: 0,
            heaters: mesh.heaters.clone(),
            heaters_off: false,
            last_norm: None,
            step: 0,
            rejections: 0,
        };

        Ok(Self {
            joule: JouleHeating::new(geometry.heater_cross_section()),
            rated_currents: config.heater_currents.clone(),
            surface_window: (
                geometry.width_of_end,
                geometry.model_length() - geometry.width_of_end,
            ),
            mesh,
            numbering,
            system,
            newton,
            settings,
            state,
        })
    }

    pub fn mesh(&self) -> &LayeredMesh {
        &self.mesh
    }

    pub fn numbering(&self) -> &EquationNumbering {
        &self.numbering
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Last converged temperature field.
    pub fn temperatures(&self) -> &[f64] {
        &self.state.previous
    }

    pub fn time(&self) -> f64 {
        self.state.time
    }

    /// Current density of every heater at its configured current, A/cm^2.
    pub fn current_densities(&self) -> Vec<f64> {
        self.rated_currents
            .iter()
            .map(|&i| self.joule.current_density_a_per_cm2(i))
            .collect()
    }

    /// Copper surface temperatures between the end regions as
    /// `(x - width_of_end, T)`, sorted by x.
    pub fn surface_profile(&self) -> Vec<(f64, f64)> {
        let (left, right) = self.surface_window;
        surface_profile(&self.mesh, &self.state.previous, left, right)
    }

    /// Snapshot of the last converged field for output.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            step: self.state.step,
            time: self.state.time,
            nx: self.mesh.nx,
            ny: self.mesh.ny,
            nodes: &self.mesh.nodes,
            temperatures: &self.state.previous,
            surface: self.surface_profile(),
        }
    }

    /// Whether `t` lands on `target` within tolerance.
    fn lands_on(t: f64, target: f64) -> bool {
        (t - target).abs() <= LANDING_TOLERANCE * target.abs().max(f64::MIN_POSITIVE)
    }

    /// Quarter the increment and restart the attempt from the last converged
    /// field.
    fn reject(&mut self, reason: &HeatFilmError) -> Result<()> {
        let state = &mut self.state;
        state.current.copy_from_slice(&state.previous);
        state.unchanged_steps = 0;
        state.rejections += 1;
        state.dt /= 4.0;
        if state.dt < self.settings.min_dt {
            return Err(HeatFilmError::TimeIncrementTooSmall {
                dt: state.dt,
                min_dt: self.settings.min_dt,
            });
        }
        warn!(dt = state.dt, %reason, "reducing time increment");
        Ok(())
    }

    /// Largest nodal change above the limit, if any.
    fn temperature_jump(&self) -> Option<HeatFilmError> {
        let limit = self.settings.max_temperature_change;
        self.state
            .current
            .iter()
            .zip(&self.state.previous)
            .enumerate()
            .map(|(node, (c, p))| (node, (c - p).abs()))
            .filter(|&(_, change)| change > limit)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(node, change)| HeatFilmError::TemperatureJump {
                node,
                change,
                limit,
            })
    }

    /// Advance by one accepted time step.
    pub fn step(&mut self) -> Result<StepReport> {
        if self.state.step >= self.settings.max_steps {
            return Err(HeatFilmError::MaxStepsExceeded {
                max_steps: self.settings.max_steps,
                time: self.state.time,
            });
        }

        self.state.current.copy_from_slice(&self.state.previous);
        let mut attempts = 0;

        let iterations = loop {
            attempts += 1;

            if let Some(t_off) = self.settings.shutoff_time {
                let state = &mut self.state;
                let end = state.time + state.dt;
                if !state.heaters_off
                    && end > t_off
                    && !Self::lands_on(end, t_off)
                    && t_off - state.time >= self.settings.min_dt
                {
                    state.dt = t_off - state.time;
                    state.unchanged_steps = 0;
                    warn!(dt = state.dt, t_off, "cutting time increment to heater shutoff");
                }
            }

            let input = AssemblyInput {
                mesh: &self.mesh,
                numbering: &self.numbering,
                heaters: &self.state.heaters,
                joule: &self.joule,
                previous: &self.state.previous,
                dt: self.state.dt,
                boundary_temperature: self.settings.boundary_temperature,
                ambient_temperature: self.settings.ambient_temperature,
            };

            match self
                .newton
                .solve(&mut self.system, &input, &mut self.state.current)
            {
                Ok(iterations) => match self.temperature_jump() {
                    Some(jump) => self.reject(&jump)?,
                    None => break iterations,
                },
                Err(e) if e.is_recoverable() => self.reject(&e)?,
                Err(e) => return Err(e),
            }
        };

        let state = &mut self.state;
        let dt = state.dt;
        let end = state.time + dt;

        let switch_off = match self.settings.shutoff_time {
            Some(t_off) if !state.heaters_off => end >= t_off || Self::lands_on(end, t_off),
            _ => false,
        };
        state.time = match self.settings.shutoff_time {
            Some(t_off) if switch_off && Self::lands_on(end, t_off) => t_off,
            _ => end,
        };
        if switch_off {
            state.heaters.switch_off();
            state.heaters_off = true;
            warn!(time = state.time, "heaters switched off");
        }

        state.unchanged_steps += 1;
        if state.unchanged_steps == 2 {
            state.dt *= 2.0;
            state.unchanged_steps = 0;
            info!(dt = state.dt, "increasing time increment");
        }

        state.previous.copy_from_slice(&state.current);
        let field_norm = norm(&state.previous);
        let steady = state
            .last_norm
            .is_some_and(|last| (field_norm - last).abs() < self.settings.steady_state_tolerance);
        state.last_norm = Some(field_norm);

        let index = state.step;
        state.step += 1;

        let output_due = steady
            || (index + 1) % self.settings.output_interval == 0
            || index + 1 == self.settings.max_steps
            || state.time > self.settings.total_time
            || switch_off;

        info!(
            step = state.step,
            time = state.time,
            dt,
            iterations,
            attempts,
            "time step accepted"
        );

        Ok(StepReport {
            step: state.step,
            time: state.time,
            dt,
            iterations,
            attempts,
            heaters_switched_off: switch_off,
            steady,
            output_due,
        })
    }

    /// Step until past the total simulation time or steady state, writing
    /// selected steps and the final current densities to `sink`.
    pub fn run(&mut self, sink: &mut dyn OutputSink) -> Result<RunSummary> {
        let mut termination = Termination::EndTime;

        while self.state.time <= self.settings.total_time {
            let report = self.step()?;
            if report.output_due {
                sink.write_step(&self.snapshot())?;
            }
            if report.steady {
                info!(step = report.step, time = report.time, "steady state reached");
                termination = Termination::SteadyState;
                break;
            }
        }

        sink.write_current_densities(&self.current_densities())?;

        Ok(RunSummary {
            steps: self.state.step,
            final_time: self.state.time,
            termination,
        })
    }
}
