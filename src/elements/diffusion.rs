//! Conduction stiffness and thermal mass.

use super::quadrature::{tensor, GAUSS_3};
use super::shape::evaluate;
use super::{ElementCoords, ElementMatrix, ElementVector, NODES_PER_ELEMENT};

/// Conduction stiffness `K_ij = ∫ k(T) grad N_i . grad N_j dA`.
///
/// `conductivity` is evaluated at the temperature interpolated from
/// `temperatures` at each quadrature point.
pub fn conduction_stiffness(
    coords: &ElementCoords,
    temperatures: &ElementVector,
    conductivity: impl Fn(f64) -> f64,
) -> ElementMatrix {
    let mut k = [[0.0; NODES_PER_ELEMENT]; NODES_PER_ELEMENT];

    for (xi, eta, w) in tensor(&GAUSS_3) {
        let sh = evaluate(coords, xi, eta);
        let factor = conductivity(sh.interpolate(temperatures)) * sh.det * w;

        for i in 0..NODES_PER_ELEMENT {
            for j in 0..NODES_PER_ELEMENT {
                let dot = sh.grad[i][0] * sh.grad[j][0] + sh.grad[i][1] * sh.grad[j][1];
                k[i][j] += factor * dot;
            }
        }
    }

    k
}

/// Thermal mass pre-divided by the time increment,
/// `M_ij = ∫ rho cp(T) / dt N_i N_j dA`.
///
/// `heat_capacity` returns the volumetric capacity `rho cp(T)`.
pub fn thermal_mass(
    coords: &ElementCoords,
    temperatures: &ElementVector,
    heat_capacity: impl Fn(f64) -> f64,
    dt: f64,
) -> ElementMatrix {
    let mut m = [[0.0; NODES_PER_ELEMENT]; NODES_PER_ELEMENT];

    for (xi, eta, w) in tensor(&GAUSS_3) {
        let sh = evaluate(coords, xi, eta);
        let factor = heat_capacity(sh.interpolate(temperatures)) / dt * sh.det * w;

        for i in 0..NODES_PER_ELEMENT {
            for j in 0..NODES_PER_ELEMENT {
                m[i][j] += factor * sh.n[i] * sh.n[j];
            }
        }
    }

    m
}
