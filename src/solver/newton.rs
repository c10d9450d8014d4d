//! Newton-Raphson iteration for one time increment.

use tracing::debug;

use super::system::{AssemblyInput, GlobalSystem};
use super::{
    DEFAULT_INCREMENT_TOLERANCE, DEFAULT_MAX_NEWTON_ITERATIONS, DEFAULT_RESIDUAL_TOLERANCE,
};
use crate::error::{HeatFilmError, Result};

/// Newton-Raphson solver over the assembled [`GlobalSystem`].
#[derive(Debug, Clone)]
pub struct NewtonRaphson {
    /// Maximum linear solves per attempt
    pub max_iterations: usize,
    /// Bound on the Euclidean norm of the last increment
    pub increment_tolerance: f64,
    /// Bound on the Euclidean norm of the residual
    pub residual_tolerance: f64,
}

impl Default for NewtonRaphson {
    fn default() -> Self {
        Self::new()
    }
}

impl NewtonRaphson {
    /// Create a new Newton-Raphson solver with default tolerances.
    pub fn new() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_NEWTON_ITERATIONS,
            increment_tolerance: DEFAULT_INCREMENT_TOLERANCE,
            residual_tolerance: DEFAULT_RESIDUAL_TOLERANCE,
        }
    }

    /// Create a solver with explicit limits.
    pub fn with_config(
        max_iterations: usize,
        increment_tolerance: f64,
        residual_tolerance: f64,
    ) -> Self {
        Self {
            max_iterations,
            increment_tolerance,
            residual_tolerance,
        }
    }

    /// Iterate on `current` until both the last increment and the residual
    /// are below tolerance.
    ///
    /// Every iteration reassembles the system at the current iterate before
    /// testing convergence, so the increment left over from the previous
    /// solve takes part in the first test. Returns the number of linear
    /// solves performed.
    ///
    /// Fails with [`HeatFilmError::NotPositiveDefinite`] when the Jacobian
    /// cannot be factored and [`HeatFilmError::ConvergenceFailure`] once the
    /// iteration cap is exceeded; `current` is then left mid-iteration.
    pub fn solve(
        &self,
        system: &mut GlobalSystem,
        input: &AssemblyInput<'_>,
        current: &mut [f64],
    ) -> Result<usize> {
        let mut iterations = 0;

        loop {
            system.assemble(input, current)?;

            let increment_norm = system.increment_norm();
            let residual_norm = system.residual_norm();
            debug!(iterations, increment_norm, residual_norm, "newton iteration");

            if increment_norm < self.increment_tolerance && residual_norm < self.residual_tolerance
            {
                return Ok(iterations);
            }

            iterations += 1;
            system.solve_increment()?;

            if iterations > self.max_iterations {
                return Err(HeatFilmError::convergence_failure(
                    self.max_iterations,
                    residual_norm,
                ));
            }

            for (node, t) in current.iter_mut().enumerate() {
                if let Some(eq) = input.numbering.equation(node) {
                    *t += system.increment[eq];
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::JouleHeating;
    use crate::mesh::{Heater, HeaterRegistry, LayeredMesh};
    use crate::solver::numbering::tests::unit_grid;
    use crate::solver::EquationNumbering;

    fn heated_grid() -> (LayeredMesh, EquationNumbering, HeaterRegistry) {
        let mut mesh = unit_grid(3, 3);
        mesh.elements[2].material = crate::materials::Material::Titanium;
        let heaters = HeaterRegistry::new(vec![Heater {
            elements: vec![2],
            current: 0.5,
        }]);
        let numbering = EquationNumbering::new(&mesh).unwrap();
        (mesh, numbering, heaters)
    }

    #[test]
    fn test_converges_from_cold_start() {
        let (mesh, numbering, heaters) = heated_grid();
        let joule = JouleHeating::new(1e-4);
        let previous = vec![300.0; mesh.num_nodes()];
        let input = AssemblyInput {
            mesh: &mesh,
            numbering: &numbering,
            heaters: &heaters,
            joule: &joule,
            previous: &previous,
            dt: 0.01,
            boundary_temperature: 300.0,
            ambient_temperature: 300.0,
        };
        let mut system = GlobalSystem::new(&numbering);
        let mut current = previous.clone();

        let iterations = NewtonRaphson::new()
            .solve(&mut system, &input, &mut current)
            .unwrap();

        assert!(iterations >= 1 && iterations <= 10);
        assert!(system.residual_norm() < 1e-5);
        // heated free nodes warm up, fixed nodes stay put
        assert!(current[6] > 300.0);
        assert_eq!(current[0], 300.0);
    }

    #[test]
    fn test_converged_start_needs_no_solve() {
        let (mesh, numbering, _) = heated_grid();
        let joule = JouleHeating::new(1e-4);
        let heaters = HeaterRegistry::default();
        let previous = vec![300.0; mesh.num_nodes()];
        let input = AssemblyInput {
            mesh: &mesh,
            numbering: &numbering,
            heaters: &heaters,
            joule: &joule,
            previous: &previous,
            dt: 0.01,
            boundary_temperature: 300.0,
            ambient_temperature: 300.0,
        };
        let mut system = GlobalSystem::new(&numbering);
        let mut current = previous.clone();
        let iterations = NewtonRaphson::new()
            .solve(&mut system, &input, &mut current)
            .unwrap();
        assert_eq!(iterations, 0);
    }

    #[test]
    fn test_iteration_cap() {
        let (mesh, numbering, heaters) = heated_grid();
        let joule = JouleHeating::new(1e-4);
        let previous = vec![300.0; mesh.num_nodes()];
        let input = AssemblyInput {
            mesh: &mesh,
            numbering: &numbering,
            heaters: &heaters,
            joule: &joule,
            previous: &previous,
            dt: 0.01,
            boundary_temperature: 300.0,
            ambient_temperature: 300.0,
        };
        let mut system = GlobalSystem::new(&numbering);
        let mut current = previous.clone();
        let newton = NewtonRaphson::with_config(0, 1e-5, 1e-5);
        let err = newton.solve(&mut system, &input, &mut current).unwrap_err();
        assert!(matches!(err, HeatFilmError::ConvergenceFailure { .. }));
        assert!(err.is_recoverable());
    }
}
