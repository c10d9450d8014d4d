//! Equation numbers and skyline profile.

use std::fmt;

use crate::error::{HeatFilmError, Result};
use crate::mesh::{Element, LayeredMesh};

/// Maps nodes to equation numbers and holds the skyline row layout.
///
/// Nodes on the bottom edge (minimum y) carry the prescribed boundary
/// temperature and get no equation. Every other node receives the next
/// equation number in node order.
#[derive(Debug, Clone)]
pub struct EquationNumbering {
    /// Equation number per node; `None` for essential-boundary nodes
    numbers: Vec<Option<usize>>,
    /// Essential-boundary nodes in node order
    boundary_nodes: Vec<usize>,
    /// One past the last stored entry of each row in flattened storage
    row_ends: Vec<usize>,
}

impl EquationNumbering {
    /// Number the nodes of a structured mesh, expecting one boundary node per
    /// grid column.
    pub fn new(mesh: &LayeredMesh) -> Result<Self> {
        Self::with_expected_boundary(mesh, mesh.nx)
    }

    /// Number the nodes of `mesh`, failing unless exactly `expected` nodes lie
    /// on the essential boundary.
    pub fn with_expected_boundary(mesh: &LayeredMesh, expected: usize) -> Result<Self> {
        let min_y = mesh.min_y();
        let tol = 1e-12 * mesh.max_y().abs().max(1.0);

        let mut numbers = Vec::with_capacity(mesh.num_nodes());
        let mut boundary_nodes = Vec::new();
        let mut count = 0;
        for (index, node) in mesh.nodes.iter().enumerate() {
            if (node.y - min_y).abs() <= tol {
                boundary_nodes.push(index);
                numbers.push(None);
            } else {
                numbers.push(Some(count));
                count += 1;
            }
        }

        if boundary_nodes.len() != expected {
            return Err(HeatFilmError::BoundaryNodeCount {
                found: boundary_nodes.len(),
                expected,
            });
        }

        let mut numbering = Self {
            numbers,
            boundary_nodes,
            row_ends: Vec::new(),
        };
        numbering.row_ends = numbering.compute_row_ends(&mesh.elements, count);
        Ok(numbering)
    }

    /// Smallest equation sharing an element with each equation, turned into
    /// cumulative row ends.
    fn compute_row_ends(&self, elements: &[Element], count: usize) -> Vec<usize> {
        let mut lowest: Vec<usize> = (0..count).collect();
        for element in elements {
            let eqs = self.element_equations(element);
            let Some(min) = eqs.iter().flatten().min().copied() else {
                continue;
            };
            for eq in eqs.iter().flatten() {
                lowest[*eq] = lowest[*eq].min(min);
            }
        }

        let mut end = 0;
        lowest
            .iter()
            .enumerate()
            .map(|(eq, low)| {
                end += eq - low + 1;
                end
            })
            .collect()
    }

    /// Number of free equations.
    pub fn num_equations(&self) -> usize {
        self.row_ends.len()
    }

    /// Equation number of `node`, or `None` when its temperature is prescribed.
    #[inline]
    pub fn equation(&self, node: usize) -> Option<usize> {
        self.numbers[node]
    }

    /// Equation numbers of an element's nodes in local order.
    pub fn element_equations(&self, element: &Element) -> [Option<usize>; 4] {
        element.nodes.map(|n| self.numbers[n])
    }

    /// Essential-boundary nodes.
    pub fn boundary_nodes(&self) -> &[usize] {
        &self.boundary_nodes
    }

    /// Cumulative row ends for skyline storage.
    pub fn row_ends(&self) -> &[usize] {
        &self.row_ends
    }

    /// Half-bandwidth of equation `eq`, diagonal included.
    pub fn half_bandwidth(&self, eq: usize) -> usize {
        let start = if eq == 0 { 0 } else { self.row_ends[eq - 1] };
        self.row_ends[eq] - start
    }
}

impl fmt::Display for EquationNumbering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} equations, {} boundary nodes, {} stored entries",
            self.num_equations(),
            self.boundary_nodes.len(),
            self.row_ends.last().copied().unwrap_or(0)
        )?;
        for (node, number) in self.numbers.iter().enumerate() {
            match number {
                Some(eq) => writeln!(f, "node {node}: eq {eq}")?,
                None => writeln!(f, "node {node}: fixed")?,
            }
        }
        Ok(())
    }
}
