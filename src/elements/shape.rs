//! Bilinear isoparametric mapping.
//!
//! Local node order is bottom-left, bottom-right, top-right, top-left, with
//! reference coordinates (-1,-1), (1,-1), (1,1), (-1,1):
//!
//! ```text
//! N_i(xi, eta) = (1 + xi*xi_i) * (1 + eta*eta_i) / 4
//! ```

use super::NODES_PER_ELEMENT;

/// Reference coordinates of the four local nodes.
const CORNERS: [[f64; 2]; NODES_PER_ELEMENT] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];

/// Shape function values and physical gradients at one point.
#[derive(Debug, Clone, Copy)]
pub struct ShapeEval {
    /// N_i
    pub n: [f64; NODES_PER_ELEMENT],
    /// dN_i/dx, dN_i/dy
    pub grad: [[f64; 2]; NODES_PER_ELEMENT],
    /// |det J|
    pub det: f64,
}

impl ShapeEval {
    /// Interpolate nodal values at this point.
    #[inline]
    pub fn interpolate(&self, nodal: &[f64; NODES_PER_ELEMENT]) -> f64 {
        self.n.iter().zip(nodal).map(|(n, v)| n * v).sum()
    }
}

/// Shape functions at `(xi, eta)`.
pub fn shape_functions(xi: f64, eta: f64) -> [f64; NODES_PER_ELEMENT] {
    CORNERS.map(|[a, b]| 0.25 * (1.0 + xi * a) * (1.0 + eta * b))
}

/// Local derivatives `[dN/dxi, dN/deta]` at `(xi, eta)`.
pub fn local_derivatives(xi: f64, eta: f64) -> [[f64; 2]; NODES_PER_ELEMENT] {
    CORNERS.map(|[a, b]| [0.25 * a * (1.0 + eta * b), 0.25 * b * (1.0 + xi * a)])
}

/// Jacobian `[[dx/dxi, dy/dxi], [dx/deta, dy/deta]]`.
pub fn jacobian(
    coords: &[[f64; 2]; NODES_PER_ELEMENT],
    local: &[[f64; 2]; NODES_PER_ELEMENT],
) -> [[f64; 2]; 2] {
    let mut j = [[0.0; 2]; 2];
    for (d, c) in local.iter().zip(coords) {
        j[0][0] += d[0] * c[0];
        j[0][1] += d[0] * c[1];
        j[1][0] += d[1] * c[0];
        j[1][1] += d[1] * c[1];
    }
    j
}

/// Evaluate everything needed for area integrals at `(xi, eta)`.
pub fn evaluate(coords: &[[f64; 2]; NODES_PER_ELEMENT], xi: f64, eta: f64) -> ShapeEval {
    let local = local_derivatives(xi, eta);
    let j = jacobian(coords, &local);
    let det = j[0][0] * j[1][1] - j[0][1] * j[1][0];
    let inv = [[j[1][1] / det, -j[0][1] / det], [-j[1][0] / det, j[0][0] / det]];

    let grad = local.map(|[dxi, deta]| {
        [
            inv[0][0] * dxi + inv[0][1] * deta,
            inv[1][0] * dxi + inv[1][1] * deta,
        ]
    });

    ShapeEval {
        n: shape_functions(xi, eta),
        grad,
        det: det.abs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const RECT: [[f64; 2]; 4] = [[0.0, 0.0], [2.0, 0.0], [2.0, 0.5], [0.0, 0.5]];

    #[test]
    fn test_partition_of_unity() {
        for (xi, eta) in [(0.0, 0.0), (0.3, -0.7), (-1.0, 1.0)] {
            let sum: f64 = shape_functions(xi, eta).iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_kronecker_at_corners() {
        for (i, [a, b]) in CORNERS.iter().enumerate() {
            let n = shape_functions(*a, *b);
            for (k, v) in n.iter().enumerate() {
                assert_relative_eq!(*v, if k == i { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn test_rectangle_determinant() {
        // area 1.0 over reference area 4.0
        let eval = evaluate(&RECT, 0.2, -0.4);
        assert_relative_eq!(eval.det, 0.25, epsilon = 1e-14);
    }

    #[test]
    fn test_gradients_reproduce_linear_field() {
        // T = 3x - 2y + 1
        let nodal = RECT.map(|[x, y]| 3.0 * x - 2.0 * y + 1.0);
        let eval = evaluate(&RECT, -0.35, 0.6);
        let gx: f64 = eval.grad.iter().zip(&nodal).map(|(g, t)| g[0] * t).sum();
        let gy: f64 = eval.grad.iter().zip(&nodal).map(|(g, t)| g[1] * t).sum();
        assert_relative_eq!(gx, 3.0, epsilon = 1e-12);
        assert_relative_eq!(gy, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gradients_on_skewed_element() {
        let skew = [[0.0, 0.0], [1.0, 0.2], [1.3, 1.1], [0.1, 0.9]];
        let nodal = skew.map(|[x, y]| 0.5 * x + 4.0 * y);
        let eval = evaluate(&skew, 0.1, 0.1);
        let gx: f64 = eval.grad.iter().zip(&nodal).map(|(g, t)| g[0] * t).sum();
        let gy: f64 = eval.grad.iter().zip(&nodal).map(|(g, t)| g[1] * t).sum();
        assert_relative_eq!(gx, 0.5, epsilon = 1e-12);
        assert_relative_eq!(gy, 4.0, epsilon = 1e-12);
    }
}
