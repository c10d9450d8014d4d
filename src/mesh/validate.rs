//! Mesh validation.

use crate::error::{HeatFilmError, Result};
use crate::materials::Material;

use super::LayeredMesh;

/// Validate a mesh for simulation.
///
/// Checks:
/// - Element count matches the structured grid
/// - Every heater element is titanium
/// - Every radiating element has its top edge on the top surface
/// - Every element has positive area with counter-clockwise node order
pub fn validate_mesh(mesh: &LayeredMesh) -> Result<()> {
    let expected = (mesh.nx - 1) * (mesh.ny - 1);
    if mesh.num_elements() != expected {
        return Err(HeatFilmError::invalid_mesh(format!(
            "expected {expected} elements for a {}x{} grid, got {}",
            mesh.nx,
            mesh.ny,
            mesh.num_elements()
        )));
    }

    if let Some((e, _)) = mesh
        .heaters
        .elements()
        .find(|&(e, _)| mesh.elements[e].material != Material::Titanium)
    {
        return Err(HeatFilmError::invalid_mesh(format!(
            "heater element {e} is {}, not titanium",
            mesh.elements[e].material
        )));
    }

    let top = mesh.max_y();
    let tol = 1e-9 * top.abs().max(1.0);
    for e in mesh.radiating.iter() {
        let coords = mesh.element_coords(e);
        if (coords[2][1] - top).abs() > tol || (coords[3][1] - top).abs() > tol {
            return Err(HeatFilmError::invalid_mesh(format!(
                "radiating element {e} is not on the top surface"
            )));
        }
    }

    for e in 0..mesh.num_elements() {
        let c = mesh.element_coords(e);
        // shoelace
        let twice_area: f64 = (0..4)
            .map(|k| {
                let [x0, y0] = c[k];
                let [x1, y1] = c[(k + 1) % 4];
                x0 * y1 - x1 * y0
            })
            .sum();
        if twice_area <= 0.0 {
            return Err(HeatFilmError::invalid_mesh(format!(
                "element {e} has non-positive area or clockwise node order"
            )));
        }
    }

    Ok(())
}
