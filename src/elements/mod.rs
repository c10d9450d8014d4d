//! Element kernels for 4-node bilinear quadrilaterals.
//!
//! Every kernel integrates over the reference square with a Gauss rule and
//! returns dense 4x4 local matrices (and 4-vectors for loads) in local node
//! order. Scattering into global storage is the job of
//! [`GlobalSystem`](crate::solver::GlobalSystem).
//!
//! | Kernel                  | Rule            | Integrand                          |
//! |-------------------------|-----------------|------------------------------------|
//! | [`conduction_stiffness`]| 3x3             | k(T) grad N_i . grad N_j           |
//! | [`thermal_mass`]        | 3x3             | rho cp(T) / dt N_i N_j             |
//! | [`joule_heating`]       | 2x2             | q(T) N_i, dq/dT N_i N_j            |
//! | [`radiation`]           | 4-point on edge | sigma eps (T^4 - Ta^4) N_i, tangent|

mod diffusion;
pub mod quadrature;
pub mod shape;
mod sources;

pub use diffusion::{conduction_stiffness, thermal_mass};
pub use sources::{joule_heating, radiation};

/// Nodes of a bilinear quadrilateral.
pub const NODES_PER_ELEMENT: usize = 4;

/// Dense local matrix.
pub type ElementMatrix = [[f64; NODES_PER_ELEMENT]; NODES_PER_ELEMENT];

/// Dense local vector.
pub type ElementVector = [f64; NODES_PER_ELEMENT];

/// Nodal coordinates of one element in local order.
pub type ElementCoords = [[f64; 2]; NODES_PER_ELEMENT];
