//! Global matrices, loads and the nonlinear residual.

use crate::elements::{
    conduction_stiffness, joule_heating, radiation, thermal_mass, ElementMatrix, ElementVector,
};
use crate::error::Result;
use crate::materials::JouleHeating;
use crate::mesh::{HeaterRegistry, LayeredMesh};

use super::{EquationNumbering, SkylineMatrix};

/// Everything assembly reads besides the system itself.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    pub mesh: &'a LayeredMesh,
    pub numbering: &'a EquationNumbering,
    pub heaters: &'a HeaterRegistry,
    pub joule: &'a JouleHeating,
    /// Last converged temperature, one value per node
    pub previous: &'a [f64],
    /// Time increment
    pub dt: f64,
    /// Prescribed temperature of essential-boundary nodes
    pub boundary_temperature: f64,
    /// Ambient temperature for radiation
    pub ambient_temperature: f64,
}

/// The assembled nonlinear system `J dT = r` over the free equations.
#[derive(Debug, Clone)]
pub struct GlobalSystem {
    pub stiffness: SkylineMatrix,
    /// Thermal mass divided by the time increment
    pub mass: SkylineMatrix,
    pub radiation_tangent: SkylineMatrix,
    pub joule_tangent: SkylineMatrix,
    /// `mass + stiffness + radiation_tangent + joule_tangent`
    pub jacobian: SkylineMatrix,
    /// Joule heat plus the essential-boundary contribution
    pub heat_load: Vec<f64>,
    pub radiation_load: Vec<f64>,
    pub residual: Vec<f64>,
    /// Last Newton update
    pub increment: Vec<f64>,
}

impl GlobalSystem {
    /// Allocate storage for the layout of `numbering`.
    pub fn new(numbering: &EquationNumbering) -> Self {
        let row_ends = numbering.row_ends();
        let n = numbering.num_equations();
        Self {
            stiffness: SkylineMatrix::new(row_ends),
            mass: SkylineMatrix::new(row_ends),
            radiation_tangent: SkylineMatrix::new(row_ends),
            joule_tangent: SkylineMatrix::new(row_ends),
            jacobian: SkylineMatrix::new(row_ends),
            heat_load: vec![0.0; n],
            radiation_load: vec![0.0; n],
            residual: vec![0.0; n],
            increment: vec![0.0; n],
        }
    }

    /// Number of free equations.
    pub fn size(&self) -> usize {
        self.residual.len()
    }

    /// Zero every matrix and load. The last increment is kept.
    pub fn clear(&mut self) {
        self.stiffness.clear();
        self.mass.clear();
        self.radiation_tangent.clear();
        self.joule_tangent.clear();
        self.jacobian.clear();
        self.heat_load.fill(0.0);
        self.radiation_load.fill(0.0);
        self.residual.fill(0.0);
    }

    /// Rebuild all matrices, loads, the Jacobian and the residual at the
    /// temperature iterate `current` (one value per node).
    pub fn assemble(&mut self, input: &AssemblyInput<'_>, current: &[f64]) -> Result<()> {
        self.clear();
        let mesh = input.mesh;

        for (e, element) in mesh.elements.iter().enumerate() {
            let coords = mesh.element_coords(e);
            let temps = mesh.gather(e, current);
            let eqs = input.numbering.element_equations(element);
            let material = element.material;

            let k = conduction_stiffness(&coords, &temps, |t| material.conductivity(t));
            for (a, row) in eqs.iter().enumerate() {
                for (b, col) in eqs.iter().enumerate() {
                    match (row, col) {
                        (Some(r), Some(c)) if c <= r => self.stiffness.add(*r, *c, k[a][b])?,
                        (Some(r), None) => {
                            self.heat_load[*r] -= k[a][b] * input.boundary_temperature
                        }
                        _ => {}
                    }
                }
            }

            let m = thermal_mass(
                &coords,
                &temps,
                |t| material.density() * material.specific_heat(t),
                input.dt,
            );
            scatter(&mut self.mass, &eqs, &m)?;
        }

        for (e, current_ma) in input.heaters.elements() {
            let coords = mesh.element_coords(e);
            let temps = mesh.gather(e, current);
            let eqs = input.numbering.element_equations(&mesh.elements[e]);
            let (load, tangent) = joule_heating(&coords, &temps, input.joule, current_ma);
            scatter(&mut self.joule_tangent, &eqs, &tangent)?;
            scatter_load(&mut self.heat_load, &eqs, &load);
        }

        for e in input.mesh.radiating.iter() {
            let coords = mesh.element_coords(e);
            let temps = mesh.gather(e, current);
            let eqs = input.numbering.element_equations(&mesh.elements[e]);
            let (load, tangent) = radiation(&coords, &temps, input.ambient_temperature);
            scatter(&mut self.radiation_tangent, &eqs, &tangent)?;
            scatter_load(&mut self.radiation_load, &eqs, &load);
        }

        self.jacobian.assign_sum(&[
            &self.mass,
            &self.stiffness,
            &self.radiation_tangent,
            &self.joule_tangent,
        ]);
        self.compute_residual(input.numbering, current, input.previous);
        Ok(())
    }

    /// `r_i = Q_i - R_i - sum_j M_ij (T_j - T_prev_j) - sum_j K_ij T_j` over
    /// free equations.
    pub fn compute_residual(
        &mut self,
        numbering: &EquationNumbering,
        current: &[f64],
        previous: &[f64],
    ) {
        let n = self.size();
        let mut t = vec![0.0; n];
        let mut dt = vec![0.0; n];
        for (node, (tc, tp)) in current.iter().zip(previous).enumerate() {
            if let Some(eq) = numbering.equation(node) {
                t[eq] = *tc;
                dt[eq] = tc - tp;
            }
        }

        let m_dt = self.mass.mul_vec(&dt);
        let k_t = self.stiffness.mul_vec(&t);
        for i in 0..n {
            self.residual[i] = self.heat_load[i] - self.radiation_load[i] - m_dt[i] - k_t[i];
        }
    }

    /// Factor the Jacobian and solve for the Newton increment.
    ///
    /// The Jacobian is overwritten by its factor; the residual is preserved.
    pub fn solve_increment(&mut self) -> Result<()> {
        self.jacobian.factor()?;
        self.increment.copy_from_slice(&self.residual);
        self.jacobian.solve(&mut self.increment);
        Ok(())
    }

    /// Euclidean norm of the last increment.
    pub fn increment_norm(&self) -> f64 {
        norm(&self.increment)
    }

    /// Euclidean norm of the residual.
    pub fn residual_norm(&self) -> f64 {
        norm(&self.residual)
    }
}

/// Add the free lower-triangle part of a local matrix.
fn scatter(
    target: &mut SkylineMatrix,
    eqs: &[Option<usize>; 4],
    local: &ElementMatrix,
) -> Result<()> {
    for (a, row) in eqs.iter().enumerate() {
        for (b, col) in eqs.iter().enumerate() {
            if let (Some(r), Some(c)) = (row, col) {
                if c <= r {
                    target.add(*r, *c, local[a][b])?;
                }
            }
        }
    }
    Ok(())
}

fn scatter_load(target: &mut [f64], eqs: &[Option<usize>; 4], local: &ElementVector) {
    for (eq, value) in eqs.iter().zip(local) {
        if let Some(r) = eq {
            target[*r] += value;
        }
    }
}

/// Euclidean norm.
pub fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}
