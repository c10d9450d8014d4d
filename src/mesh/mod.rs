//! Mesh representation, generation and validation.
//!
//! The solver consumes a [`LayeredMesh`]: node coordinates, bilinear element
//! connectivity with a material per element, the heater elements grouped by
//! heater, and the radiating top-row elements. [`generate`] builds the
//! structured grid of the heater stack from a [`SimulationConfig`];
//! [`LayeredMesh::from_arrays`] accepts arrays from any other provider.
//!
//! [`SimulationConfig`]: crate::input::SimulationConfig

mod generator;
mod layout;
mod types;
mod validate;

pub use generator::{generate, SILICON_SEEDS, TITANIUM_SEEDS};
pub use layout::LayeredMesh;
pub use types::*;
pub use validate::validate_mesh;
