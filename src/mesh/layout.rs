//! The structured layered mesh.

use crate::elements::{ElementCoords, ElementVector};
use crate::error::{HeatFilmError, Result};
use crate::materials::Material;

use super::{Element, HeaterRegistry, Node, RadiationBoundarySet};

/// A structured `nx` x `ny` node grid with per-element materials and the
/// heater and radiation element sets.
///
/// Nodes are numbered row-major from the bottom-left corner, so node
/// `(i, j)` has index `j * nx + i`; elements follow the same scheme on the
/// `(nx - 1) x (ny - 1)` cell grid.
#[derive(Debug, Clone)]
pub struct LayeredMesh {
    /// Node columns
    pub nx: usize,
    /// Node rows
    pub ny: usize,
    pub nodes: Vec<Node>,
    pub elements: Vec<Element>,
    pub heaters: HeaterRegistry,
    pub radiating: RadiationBoundarySet,
}

impl LayeredMesh {
    /// Build a mesh from externally supplied arrays.
    ///
    /// Material ids outside `0..=3` and connectivity referencing missing
    /// nodes are rejected.
    pub fn from_arrays(
        nx: usize,
        ny: usize,
        coordinates: &[[f64; 2]],
        connectivity: &[[usize; 4]],
        material_ids: &[u8],
        heaters: HeaterRegistry,
        radiating: RadiationBoundarySet,
    ) -> Result<Self> {
        if nx < 2 || ny < 2 {
            return Err(HeatFilmError::invalid_mesh(format!(
                "grid must have at least 2x2 nodes, got {nx}x{ny}"
            )));
        }
        if coordinates.len() != nx * ny {
            return Err(HeatFilmError::invalid_mesh(format!(
                "expected {} node coordinates, got {}",
                nx * ny,
                coordinates.len()
            )));
        }
        if connectivity.len() != material_ids.len() {
            return Err(HeatFilmError::invalid_mesh(format!(
                "{} elements but {} material ids",
                connectivity.len(),
                material_ids.len()
            )));
        }

        let nodes: Vec<Node> = coordinates.iter().map(|&[x, y]| Node::new(x, y)).collect();

        let elements = connectivity
            .iter()
            .zip(material_ids)
            .enumerate()
            .map(|(index, (&conn, &id))| {
                if let Some(&bad) = conn.iter().find(|&&n| n >= nodes.len()) {
                    return Err(HeatFilmError::invalid_mesh(format!(
                        "element {index} references missing node {bad}"
                    )));
                }
                Ok(Element {
                    nodes: conn,
                    material: Material::from_id(index, id)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mesh = Self {
            nx,
            ny,
            nodes,
            elements,
            heaters,
            radiating,
        };

        let num_elements = mesh.num_elements();
        let out_of_range = mesh
            .heaters
            .elements()
            .map(|(e, _)| e)
            .chain(mesh.radiating.iter())
            .find(|&e| e >= num_elements);
        if let Some(e) = out_of_range {
            return Err(HeatFilmError::invalid_mesh(format!(
                "boundary set references missing element {e}"
            )));
        }

        Ok(mesh)
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Physical coordinates of an element's nodes in local order.
    pub fn element_coords(&self, element: usize) -> ElementCoords {
        self.elements[element].nodes.map(|n| {
            let node = &self.nodes[n];
            [node.x, node.y]
        })
    }

    /// Gather nodal values of `field` for one element in local order.
    pub fn gather(&self, element: usize, field: &[f64]) -> ElementVector {
        self.elements[element].nodes.map(|n| field[n])
    }

    /// Smallest y coordinate in the mesh.
    pub fn min_y(&self) -> f64 {
        self.nodes.iter().map(|n| n.y).fold(f64::INFINITY, f64::min)
    }

    /// Largest y coordinate in the mesh.
    pub fn max_y(&self) -> f64 {
        self.nodes.iter().map(|n| n.y).fold(f64::NEG_INFINITY, f64::max)
    }

    /// Nodes on the top surface, left to right.
    pub fn top_surface_nodes(&self) -> Vec<usize> {
        let top = self.max_y();
        let tol = 1e-9 * top.abs().max(1.0);
        let mut nodes: Vec<usize> = (0..self.num_nodes())
            .filter(|&n| (self.nodes[n].y - top).abs() <= tol)
            .collect();
        nodes.sort_by(|&a, &b| self.nodes[a].x.total_cmp(&self.nodes[b].x));
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Heater;

    fn grid_2x2() -> (Vec<[f64; 2]>, Vec<[usize; 4]>) {
        // 3x3 nodes, 2x2 elements on the unit square
        let mut coords = Vec::new();
        for j in 0..3 {
            for i in 0..3 {
                coords.push([i as f64 * 0.5, j as f64 * 0.5]);
            }
        }
        let mut conn = Vec::new();
        for j in 0..2 {
            for i in 0..2 {
                let n0 = j * 3 + i;
                conn.push([n0, n0 + 1, n0 + 4, n0 + 3]);
            }
        }
        (coords, conn)
    }

    #[test]
    fn test_from_arrays() {
        let (coords, conn) = grid_2x2();
        let heaters = HeaterRegistry::new(vec![Heater {
            elements: vec![0],
            current: 5.0,
        }]);
        let mesh = LayeredMesh::from_arrays(
            3,
            3,
            &coords,
            &conn,
            &[1, 0, 3, 3],
            heaters,
            RadiationBoundarySet::new(vec![2, 3]),
        )
        .unwrap();

        assert_eq!(mesh.num_nodes(), 9);
        assert_eq!(mesh.num_elements(), 4);
        assert_eq!(mesh.elements[0].material, Material::Titanium);
        assert_eq!(mesh.element_coords(3)[2], [1.0, 1.0]);
        assert_eq!(mesh.top_surface_nodes(), vec![6, 7, 8]);
        assert_eq!(mesh.min_y(), 0.0);
    }

    #[test]
    fn test_from_arrays_rejects_bad_material() {
        let (coords, conn) = grid_2x2();
        let err = LayeredMesh::from_arrays(
            3,
            3,
            &coords,
            &conn,
            &[0, 0, 7, 0],
            HeaterRegistry::default(),
            RadiationBoundarySet::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            HeatFilmError::InvalidMaterial { element: 2, id: 7 }
        ));
    }

    #[test]
    fn test_from_arrays_rejects_missing_node() {
        let (coords, mut conn) = grid_2x2();
        conn[1][2] = 42;
        let err = LayeredMesh::from_arrays(
            3,
            3,
            &coords,
            &conn,
            &[0; 4],
            HeaterRegistry::default(),
            RadiationBoundarySet::default(),
        )
        .unwrap_err();
        assert!(matches!(err, HeatFilmError::InvalidMesh { .. }));
    }

    #[test]
    fn test_gather() {
        let (coords, conn) = grid_2x2();
        let mesh = LayeredMesh::from_arrays(
            3,
            3,
            &coords,
            &conn,
            &[0; 4],
            HeaterRegistry::default(),
            RadiationBoundarySet::new(vec![2, 3]),
        )
        .unwrap();
        let field: Vec<f64> = (0..9).map(|n| n as f64).collect();
        assert_eq!(mesh.gather(1, &field), [1.0, 2.0, 5.0, 4.0]);
    }
}
