//! Typed simulation parameters.

use super::deck::{DeckEntry, InputDeck};
use crate::error::{HeatFilmError, Result};
use crate::solver::{
    DEFAULT_INCREMENT_TOLERANCE, DEFAULT_MAX_NEWTON_ITERATIONS, DEFAULT_RESIDUAL_TOLERANCE,
    DEFAULT_STEADY_STATE_TOLERANCE,
};

/// Length of the region holding the heaters, mm.
pub const DEFAULT_HEATED_LENGTH: f64 = 1.0;

/// Heaters across the heated region.
pub const DEFAULT_NUMBER_OF_HEATERS: usize = 10;

/// Element counts across each region of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSeeds {
    /// Cells across each end region
    pub end: usize,
    /// Cells across a gap between heaters
    pub gap: usize,
    /// Cells across a heater
    pub heater: usize,
    /// Rows through the isolator
    pub isolator: usize,
    /// Rows through the silicon dioxide
    pub silicon_dioxide: usize,
    /// Rows through the copper
    pub copper: usize,
}

/// Time stepping controls.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeControl {
    /// Time at which every heater current is zeroed
    pub shutoff_time: Option<f64>,
    /// Write every n-th accepted step
    pub output_interval: usize,
    pub max_steps: usize,
    pub total_time: f64,
    pub initial_dt: f64,
    pub min_dt: f64,
    /// Largest nodal temperature change accepted within one step, K
    pub max_temperature_change: f64,
}

/// Layer thicknesses and in-plane widths, mm.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub width_of_end: f64,
    pub width_of_heater: f64,
    pub length_of_heated_region: f64,
    pub number_of_heaters: usize,
    pub thickness_of_silicon: f64,
    pub thickness_of_isolator: f64,
    pub thickness_of_titanium: f64,
    pub thickness_of_silicon_dioxide: f64,
    pub thickness_of_copper: f64,
}

impl Geometry {
    /// Heater pitch minus the heater width.
    pub fn width_of_gap(&self) -> f64 {
        self.length_of_heated_region / self.number_of_heaters as f64 - self.width_of_heater
    }

    /// Heated region plus both end regions.
    pub fn model_length(&self) -> f64 {
        self.length_of_heated_region + 2.0 * self.width_of_end
    }

    pub fn total_thickness(&self) -> f64 {
        self.thickness_of_silicon
            + self.thickness_of_isolator
            + self.thickness_of_titanium
            + self.thickness_of_silicon_dioxide
            + self.thickness_of_copper
    }

    /// Cross section carrying the heater current, mm^2.
    pub fn heater_cross_section(&self) -> f64 {
        self.thickness_of_titanium * self.width_of_heater
    }
}

/// Temperatures, K.
#[derive(Debug, Clone, PartialEq)]
pub struct Temperatures {
    pub ambient: f64,
    /// Prescribed on the bottom of the substrate
    pub boundary: f64,
    /// Initial temperature of every free node
    pub initial: f64,
}

/// Newton-Raphson and steady-state tolerances.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverSettings {
    pub increment_tolerance: f64,
    pub residual_tolerance: f64,
    pub steady_state_tolerance: f64,
    pub max_newton_iterations: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            increment_tolerance: DEFAULT_INCREMENT_TOLERANCE,
            residual_tolerance: DEFAULT_RESIDUAL_TOLERANCE,
            steady_state_tolerance: DEFAULT_STEADY_STATE_TOLERANCE,
            max_newton_iterations: DEFAULT_MAX_NEWTON_ITERATIONS,
        }
    }
}

/// Every parameter of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub mesh: MeshSeeds,
    pub time: TimeControl,
    pub geometry: Geometry,
    pub temperatures: Temperatures,
    pub solver: SolverSettings,
    /// One current per heater, mA
    pub heater_currents: Vec<f64>,
}

/// Labels understood by [`SimulationConfig::from_deck`].
const KNOWN_FIELDS: &[&str] = &[
    "mesh_seeds_on_end",
    "mesh_seeds_on_gap",
    "mesh_seeds_on_heater",
    "mesh_seeds_along_isolator_thickness",
    "mesh_seeds_along_silicon_dioxide_thickness",
    "mesh_seeds_along_copper_thickness",
    "time_to_turn_off_heaters",
    "output_time_step_interval",
    "maximum_time_steps",
    "total_simulation_time",
    "initial_time_increment",
    "minimum_time_increment",
    "maximum_temperature_change_per_time_increment",
    "width_of_end",
    "thickness_of_copper",
    "thickness_of_silicon",
    "thickness_of_isolator",
    "thickness_of_silicon_dioxide",
    "thickness_of_titanium",
    "width_of_heater",
    "length_of_heated_region",
    "number_of_heaters",
    "ambient_temperature",
    "boundary_condition_temperature",
    "sample_initial_temperature",
    "heater_currents",
    "increment_tolerance",
    "residual_tolerance",
    "steady_state_tolerance",
    "maximum_newton_iterations",
];

fn required<'a>(deck: &'a InputDeck, label: &str) -> Result<&'a DeckEntry> {
    deck.get(label).ok_or_else(|| HeatFilmError::MissingField {
        label: label.to_string(),
    })
}

fn single(entry: &DeckEntry) -> Result<f64> {
    match entry.values.as_slice() {
        [v] => Ok(*v),
        values => Err(HeatFilmError::invalid_value(
            &entry.label,
            format!("expected one value, got {}", values.len()),
        )),
    }
}

fn real(deck: &InputDeck, label: &str) -> Result<f64> {
    single(required(deck, label)?)
}

fn real_or(deck: &InputDeck, label: &str, default: f64) -> Result<f64> {
    deck.get(label).map_or(Ok(default), single)
}

fn whole(entry: &DeckEntry) -> Result<usize> {
    let v = single(entry)?;
    if v < 0.0 || v.fract() != 0.0 {
        return Err(HeatFilmError::invalid_value(
            &entry.label,
            format!("expected a non-negative integer, got {}", v),
        ));
    }
    Ok(v as usize)
}

fn count(deck: &InputDeck, label: &str) -> Result<usize> {
    whole(required(deck, label)?)
}

fn count_or(deck: &InputDeck, label: &str, default: usize) -> Result<usize> {
    deck.get(label).map_or(Ok(default), whole)
}

fn positive(field: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(HeatFilmError::invalid_value(
            field,
            format!("must be positive, got {}", value),
        ))
    }
}

fn nonzero(field: &str, value: usize) -> Result<()> {
    if value == 0 {
        Err(HeatFilmError::invalid_value(field, "must be at least 1"))
    } else {
        Ok(())
    }
}

impl SimulationConfig {
    /// Interpret a parsed deck. The result is validated.
    pub fn from_deck(deck: &InputDeck) -> Result<Self> {
        if let Some(entry) = deck.iter().find(|e| !KNOWN_FIELDS.contains(&e.label.as_str())) {
            return Err(HeatFilmError::UnknownField {
                label: entry.label.clone(),
                line: entry.line,
            });
        }

        let mesh = MeshSeeds {
            end: count(deck, "mesh_seeds_on_end")?,
            gap: count(deck, "mesh_seeds_on_gap")?,
            heater: count(deck, "mesh_seeds_on_heater")?,
            isolator: count(deck, "mesh_seeds_along_isolator_thickness")?,
            silicon_dioxide: count(deck, "mesh_seeds_along_silicon_dioxide_thickness")?,
            copper: count(deck, "mesh_seeds_along_copper_thickness")?,
        };

        let shutoff = real_or(deck, "time_to_turn_off_heaters", 0.0)?;
        let time = TimeControl {
            shutoff_time: (shutoff > 0.0).then_some(shutoff),
            output_interval: count(deck, "output_time_step_interval")?,
            max_steps: count(deck, "maximum_time_steps")?,
            total_time: real(deck, "total_simulation_time")?,
            initial_dt: real(deck, "initial_time_increment")?,
            min_dt: real(deck, "minimum_time_increment")?,
            max_temperature_change: real(deck, "maximum_temperature_change_per_time_increment")?,
        };

        let geometry = Geometry {
            width_of_end: real(deck, "width_of_end")?,
            width_of_heater: real(deck, "width_of_heater")?,
            length_of_heated_region: real_or(
                deck,
                "length_of_heated_region",
                DEFAULT_HEATED_LENGTH,
            )?,
            number_of_heaters: count_or(deck, "number_of_heaters", DEFAULT_NUMBER_OF_HEATERS)?,
            thickness_of_silicon: real(deck, "thickness_of_silicon")?,
            thickness_of_isolator: real(deck, "thickness_of_isolator")?,
            thickness_of_titanium: real(deck, "thickness_of_titanium")?,
            thickness_of_silicon_dioxide: real(deck, "thickness_of_silicon_dioxide")?,
            thickness_of_copper: real(deck, "thickness_of_copper")?,
        };

        let temperatures = Temperatures {
            ambient: real(deck, "ambient_temperature")?,
            boundary: real(deck, "boundary_condition_temperature")?,
            initial: real(deck, "sample_initial_temperature")?,
        };

        let defaults = SolverSettings::default();
        let solver = SolverSettings {
            increment_tolerance: real_or(
                deck,
                "increment_tolerance",
                defaults.increment_tolerance,
            )?,
            residual_tolerance: real_or(deck, "residual_tolerance", defaults.residual_tolerance)?,
            steady_state_tolerance: real_or(
                deck,
                "steady_state_tolerance",
                defaults.steady_state_tolerance,
            )?,
            max_newton_iterations: count_or(
                deck,
                "maximum_newton_iterations",
                defaults.max_newton_iterations,
            )?,
        };

        let config = Self {
            mesh,
            time,
            geometry,
            temperatures,
            solver,
            heater_currents: required(deck, "heater_currents")?.values.clone(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject parameter combinations the mesh generator or the time
    /// integration cannot work with.
    pub fn validate(&self) -> Result<()> {
        let m = &self.mesh;
        nonzero("mesh_seeds_on_end", m.end)?;
        nonzero("mesh_seeds_on_gap", m.gap)?;
        nonzero("mesh_seeds_on_heater", m.heater)?;
        nonzero("mesh_seeds_along_isolator_thickness", m.isolator)?;
        nonzero("mesh_seeds_along_silicon_dioxide_thickness", m.silicon_dioxide)?;
        nonzero("mesh_seeds_along_copper_thickness", m.copper)?;
        if m.gap % 2 != 0 {
            return Err(HeatFilmError::invalid_value(
                "mesh_seeds_on_gap",
                "must be even so the outer half gaps get equal cells",
            ));
        }

        let t = &self.time;
        nonzero("output_time_step_interval", t.output_interval)?;
        nonzero("maximum_time_steps", t.max_steps)?;
        positive("total_simulation_time", t.total_time)?;
        positive("initial_time_increment", t.initial_dt)?;
        positive("minimum_time_increment", t.min_dt)?;
        positive(
            "maximum_temperature_change_per_time_increment",
            t.max_temperature_change,
        )?;
        if t.min_dt > t.initial_dt {
            return Err(HeatFilmError::invalid_value(
                "minimum_time_increment",
                format!("{} exceeds the initial increment {}", t.min_dt, t.initial_dt),
            ));
        }

        let g = &self.geometry;
        positive("width_of_end", g.width_of_end)?;
        positive("width_of_heater", g.width_of_heater)?;
        positive("length_of_heated_region", g.length_of_heated_region)?;
        nonzero("number_of_heaters", g.number_of_heaters)?;
        positive("thickness_of_silicon", g.thickness_of_silicon)?;
        positive("thickness_of_isolator", g.thickness_of_isolator)?;
        positive("thickness_of_titanium", g.thickness_of_titanium)?;
        positive("thickness_of_silicon_dioxide", g.thickness_of_silicon_dioxide)?;
        positive("thickness_of_copper", g.thickness_of_copper)?;
        if g.width_of_gap() <= 0.0 {
            return Err(HeatFilmError::invalid_value(
                "width_of_heater",
                format!(
                    "{} leaves no gap at a pitch of {}",
                    g.width_of_heater,
                    g.length_of_heated_region / g.number_of_heaters as f64
                ),
            ));
        }

        let s = &self.solver;
        positive("increment_tolerance", s.increment_tolerance)?;
        positive("residual_tolerance", s.residual_tolerance)?;
        positive("steady_state_tolerance", s.steady_state_tolerance)?;

        if self.heater_currents.len() != g.number_of_heaters {
            return Err(HeatFilmError::invalid_value(
                "heater_currents",
                format!(
                    "expected {} values, got {}",
                    g.number_of_heaters,
                    self.heater_currents.len()
                ),
            ));
        }

        Ok(())
    }
}
