//! Joule heating in the titanium heater film.
//!
//! Volumetric heat generation is `rho(T) * J^2` with the current density
//! `J = I / A` taken over the heater cross section. Titanium resistivity
//! follows a quadratic fit:
//!
//! ```text
//! rho(T) = 1.403e-15*T^2 + 1.037e-8*T - 2.831e-6   [Ohm m]
//! ```
//!
//! Currents are given in mA and the cross section in mm^2; the result is
//! returned in mW/mm^3.

use super::Quadratic;

/// Titanium resistivity in Ohm m.
const TITANIUM_RESISTIVITY: Quadratic = Quadratic::new(1.403e-15, 1.037e-8, -2.831e-6);

/// W/m^3 to mW/mm^3.
const WATTS_PER_CUBIC_METER: f64 = 1.0e-6;

/// Heat source of a heater strip with a fixed cross section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JouleHeating {
    /// Cross-sectional area in mm^2
    pub cross_section_mm2: f64,
}

impl JouleHeating {
    pub fn new(cross_section_mm2: f64) -> Self {
        Self { cross_section_mm2 }
    }

    /// Current density squared, in (A/m^2)^2.
    fn current_density_sq(&self, current_ma: f64) -> f64 {
        let amps = current_ma * 1.0e-3;
        let area_m2 = self.cross_section_mm2 * 1.0e-6;
        let j = amps / area_m2;
        j * j
    }

    /// Volumetric heat generation at temperature `t` for `current_ma`.
    pub fn heat_flux(&self, t: f64, current_ma: f64) -> f64 {
        TITANIUM_RESISTIVITY.eval(t) * self.current_density_sq(current_ma) * WATTS_PER_CUBIC_METER
    }

    /// Derivative of [`heat_flux`](Self::heat_flux) with respect to temperature.
    pub fn heat_flux_derivative(&self, t: f64, current_ma: f64) -> f64 {
        TITANIUM_RESISTIVITY.derivative(t)
            * self.current_density_sq(current_ma)
            * WATTS_PER_CUBIC_METER
    }

    /// Current density in A/cm^2.
    pub fn current_density_a_per_cm2(&self, current_ma: f64) -> f64 {
        (current_ma * 1.0e-3) / (self.cross_section_mm2 * 1.0e-2)
    }
}
