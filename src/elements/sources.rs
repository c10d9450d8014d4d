//! Joule heating and surface radiation.

use super::quadrature::{tensor, GAUSS_2, GAUSS_4};
use super::shape::evaluate;
use super::{ElementCoords, ElementMatrix, ElementVector, NODES_PER_ELEMENT};
use crate::materials::{JouleHeating, Material};
use crate::STEFAN_BOLTZMANN;

/// Local nodes on the radiating (top) edge: top-right, top-left.
const EDGE_NODES: [usize; 2] = [2, 3];

/// Joule heat load and its tangent for a heater element carrying `current_ma`.
///
/// Returns `(load, tangent)` with `load_i = ∫ q(T) N_i dA` and
/// `tangent_ij = ∫ dq/dT N_i N_j dA`.
pub fn joule_heating(
    coords: &ElementCoords,
    temperatures: &ElementVector,
    joule: &JouleHeating,
    current_ma: f64,
) -> (ElementVector, ElementMatrix) {
    let mut load = [0.0; NODES_PER_ELEMENT];
    let mut tangent = [[0.0; NODES_PER_ELEMENT]; NODES_PER_ELEMENT];

    for (xi, eta, w) in tensor(&GAUSS_2) {
        let sh = evaluate(coords, xi, eta);
        let t = sh.interpolate(temperatures);
        let dv = sh.det * w;
        let q = joule.heat_flux(t, current_ma) * dv;
        let dq = joule.heat_flux_derivative(t, current_ma) * dv;

        for i in 0..NODES_PER_ELEMENT {
            load[i] += sh.n[i] * q;
            for j in 0..NODES_PER_ELEMENT {
                tangent[i][j] += sh.n[i] * sh.n[j] * dq;
            }
        }
    }

    (load, tangent)
}

/// Radiative loss and tangent along the top edge of an element.
///
/// Only local nodes 2 and 3 receive contributions. The loss per unit edge
/// length is `sigma eps(T) (T^4 - Ta^4)`; the tangent coefficient is
/// `4 sigma eps(T) T^3 + sigma eps'(T) T^4`.
pub fn radiation(
    coords: &ElementCoords,
    temperatures: &ElementVector,
    ambient: f64,
) -> (ElementVector, ElementMatrix) {
    let mut load = [0.0; NODES_PER_ELEMENT];
    let mut tangent = [[0.0; NODES_PER_ELEMENT]; NODES_PER_ELEMENT];

    let [a, b] = EDGE_NODES;
    let dx = coords[a][0] - coords[b][0];
    let dy = coords[a][1] - coords[b][1];
    let det = 0.5 * dx.hypot(dy);
    let ambient4 = ambient.powi(4);

    for p in &GAUSS_4 {
        // N_a = (1 + xi)/2 at the right end, N_b = (1 - xi)/2 at the left end
        let n = [0.5 * (1.0 + p.coord), 0.5 * (1.0 - p.coord)];
        let t = n[0] * temperatures[a] + n[1] * temperatures[b];
        let (eps, deps) = Material::Copper.emissivity(t);
        let c = STEFAN_BOLTZMANN * eps;
        let dc = STEFAN_BOLTZMANN * deps;
        let coefficient = 4.0 * c * t.powi(3) + dc * t.powi(4);
        let dl = det * p.weight;

        for (r, &row) in EDGE_NODES.iter().enumerate() {
            load[row] += n[r] * c * (t.powi(4) - ambient4) * dl;
            for (s, &col) in EDGE_NODES.iter().enumerate() {
                tangent[row][col] += coefficient * n[r] * n[s] * dl;
            }
        }
    }

    (load, tangent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CELL: ElementCoords = [[0.0, 0.0], [0.4, 0.0], [0.4, 0.05], [0.0, 0.05]];

    #[test]
    fn test_joule_load_integrates_uniform_source() {
        let joule = JouleHeating::new(1e-4);
        let temps = [350.0; 4];
        let (load, tangent) = joule_heating(&CELL, &temps, &joule, 20.0);
        let total: f64 = load.iter().sum();
        let area = 0.4 * 0.05;
        assert_relative_eq!(total, joule.heat_flux(350.0, 20.0) * area, max_relative = 1e-12);
        for i in 0..4 {
            assert_relative_eq!(load[i], total / 4.0, max_relative = 1e-12);
            for j in 0..4 {
                assert_relative_eq!(tangent[i][j], tangent[j][i], max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_joule_without_current() {
        let joule = JouleHeating::new(1e-4);
        let (load, tangent) = joule_heating(&CELL, &[300.0; 4], &joule, 0.0);
        assert!(load.iter().all(|v| *v == 0.0));
        assert!(tangent.iter().flatten().all(|v| *v == 0.0));
    }

    #[test]
    fn test_radiation_only_touches_top_edge() {
        let temps = [300.0, 310.0, 500.0, 480.0];
        let (load, tangent) = radiation(&CELL, &temps, 300.0);
        assert_eq!(load[0], 0.0);
        assert_eq!(load[1], 0.0);
        assert!(load[2] > 0.0 && load[3] > 0.0);
        for i in 0..4 {
            for j in 0..4 {
                if i < 2 || j < 2 {
                    assert_eq!(tangent[i][j], 0.0);
                }
            }
        }
        assert_relative_eq!(tangent[2][3], tangent[3][2], max_relative = 1e-12);
    }

    #[test]
    fn test_radiation_uniform_edge_total() {
        let t = 600.0;
        let ambient = 300.0;
        let (load, _) = radiation(&CELL, &[t; 4], ambient);
        let (eps, _) = Material::Copper.emissivity(t);
        let expected = STEFAN_BOLTZMANN * eps * (t.powi(4) - ambient.powi(4)) * 0.4;
        assert_relative_eq!(load[2] + load[3], expected, max_relative = 1e-9);
        assert_relative_eq!(load[2], load[3], max_relative = 1e-9);
    }

    #[test]
    fn test_radiation_at_ambient_has_no_load() {
        let (load, tangent) = radiation(&CELL, &[300.0; 4], 300.0);
        assert!(load.iter().all(|v| v.abs() < 1e-12));
        assert!(tangent[2][2] > 0.0);
    }
}
