//! Input deck reader.
//!
//! The deck is a line-oriented list of labelled numeric fields. Field order
//! is free and labels are case-insensitive.
//!
//! # Grammar Overview
//!
//! ```text
//! deck    = { line }
//! line    = comment | entry | empty
//! comment = ('#' | ';') { any_char }
//! entry   = label ['='] value { value }
//!
//! label   = (letter | '_') { letter | digit | '_' }
//! value   = number [unit_suffix]
//! number  = ['-'|'+'] digit* ['.' digit*] [('e'|'E') ['-'|'+'] digit+]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! ```
//!
//! # Fields
//!
//! | Section | Labels |
//! |---------|--------|
//! | Mesh | `mesh_seeds_on_end`, `mesh_seeds_on_gap`, `mesh_seeds_on_heater`, `mesh_seeds_along_isolator_thickness`, `mesh_seeds_along_silicon_dioxide_thickness`, `mesh_seeds_along_copper_thickness` |
//! | Time | `time_to_turn_off_heaters` (0 = never), `output_time_step_interval`, `maximum_time_steps`, `total_simulation_time`, `initial_time_increment`, `minimum_time_increment`, `maximum_temperature_change_per_time_increment` |
//! | Geometry | `width_of_end`, `thickness_of_copper`, `thickness_of_silicon`, `thickness_of_isolator`, `thickness_of_silicon_dioxide`, `thickness_of_titanium`, `width_of_heater`, `length_of_heated_region` (1.0), `number_of_heaters` (10) |
//! | Temperatures | `ambient_temperature`, `boundary_condition_temperature`, `sample_initial_temperature` |
//! | Heaters | `heater_currents` followed by one value per heater |
//! | Solver | `increment_tolerance`, `residual_tolerance`, `steady_state_tolerance`, `maximum_newton_iterations` (all optional) |
//!
//! Units: mm, s, K, mA.
//!
//! # Example
//!
//! ```text
//! # three heaters, middle one on
//! number_of_heaters      3
//! heater_currents        0 100 0
//! width_of_heater        0.05     # mm
//! initial_time_increment 2m       # s
//! ```

mod config;
mod deck;
mod lexer;
mod parser;

pub use config::{
    Geometry, MeshSeeds, SimulationConfig, SolverSettings, Temperatures, TimeControl,
    DEFAULT_HEATED_LENGTH, DEFAULT_NUMBER_OF_HEATERS,
};
pub use deck::{DeckEntry, InputDeck};
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use std::path::Path;

use crate::error::{HeatFilmError, Result};

/// Parse deck text into an [`InputDeck`].
pub fn parse_deck(input: &str) -> Result<InputDeck> {
    Parser::new(Lexer::new(input))?.parse()
}

/// Parse and interpret deck text.
pub fn parse(input: &str) -> Result<SimulationConfig> {
    SimulationConfig::from_deck(&parse_deck(input)?)
}

/// Read, parse and interpret a deck file.
pub fn parse_file(path: &Path) -> Result<SimulationConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| HeatFilmError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}
