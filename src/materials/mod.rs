//! Temperature-dependent material laws.
//!
//! The layered stack is built from four materials. Each one carries a
//! constant density and quadratic fits of conductivity and specific heat:
//!
//! ```text
//! k(T)  = a2*T^2 + a1*T + a0      [mW/(mm K)]
//! cp(T) = b2*T^2 + b1*T + b0      [mJ/(tonne K)]
//! ```
//!
//! The top copper surface additionally radiates with a quadratic emissivity
//! fit, and titanium heater cells generate Joule heat (see [`JouleHeating`]).

mod joule;
mod laws;

pub use joule::JouleHeating;
pub use laws::{MaterialLaw, Quadratic, COPPER_EMISSIVITY};

use crate::error::{HeatFilmError, Result};

/// One of the four materials of the thin-film stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Material {
    Silicon,
    Titanium,
    SiliconDioxide,
    Copper,
}

impl Material {
    /// All materials in id order.
    pub const ALL: [Material; 4] = [
        Material::Silicon,
        Material::Titanium,
        Material::SiliconDioxide,
        Material::Copper,
    ];

    /// Resolve a raw material id read from mesh arrays.
    ///
    /// `element` is only used for the error message.
    pub fn from_id(element: usize, id: u8) -> Result<Self> {
        Self::ALL
            .get(id as usize)
            .copied()
            .ok_or(HeatFilmError::InvalidMaterial { element, id })
    }

    /// Numeric id as used in mesh arrays (0..=3).
    pub fn id(self) -> u8 {
        match self {
            Material::Silicon => 0,
            Material::Titanium => 1,
            Material::SiliconDioxide => 2,
            Material::Copper => 3,
        }
    }

    /// Closed-form law for this material.
    pub fn law(self) -> &'static MaterialLaw {
        &laws::LAWS[self.id() as usize]
    }

    /// Thermal conductivity at temperature `t`.
    pub fn conductivity(self, t: f64) -> f64 {
        self.law().conductivity.eval(t)
    }

    /// Derivative of conductivity with respect to temperature.
    pub fn conductivity_derivative(self, t: f64) -> f64 {
        self.law().conductivity.derivative(t)
    }

    /// Specific heat at temperature `t`.
    pub fn specific_heat(self, t: f64) -> f64 {
        self.law().specific_heat.eval(t)
    }

    /// Constant density in tonne/mm^3.
    pub fn density(self) -> f64 {
        self.law().density
    }

    /// Surface emissivity and its temperature derivative.
    ///
    /// Only copper radiates, so every material reports the copper fit; the
    /// radiating element set decides where it applies.
    pub fn emissivity(self, t: f64) -> (f64, f64) {
        (COPPER_EMISSIVITY.eval(t), COPPER_EMISSIVITY.derivative(t))
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Material::Silicon => "silicon",
            Material::Titanium => "titanium",
            Material::SiliconDioxide => "silicon dioxide",
            Material::Copper => "copper",
        }
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_id_roundtrip() {
        for material in Material::ALL {
            assert_eq!(Material::from_id(0, material.id()).unwrap(), material);
        }
    }

    #[test]
    fn test_from_id_rejects_out_of_range() {
        let err = Material::from_id(17, 4).unwrap_err();
        assert!(matches!(
            err,
            HeatFilmError::InvalidMaterial { element: 17, id: 4 }
        ));
    }

    #[test]
    fn test_silicon_conductivity_at_room_temperature() {
        let t = 300.0;
        let expected = 0.0002723 * t * t - 0.5435 * t + 295.9;
        assert_relative_eq!(Material::Silicon.conductivity(t), expected);
        assert_relative_eq!(
            Material::Silicon.conductivity_derivative(t),
            2.0 * 0.0002723 * t - 0.5435
        );
    }

    #[test]
    fn test_copper_is_densest() {
        let copper = Material::Copper.density();
        for material in Material::ALL {
            assert!(material.density() <= copper);
        }
    }

    #[test]
    fn test_emissivity_shared() {
        let (e_si, de_si) = Material::Silicon.emissivity(400.0);
        let (e_cu, de_cu) = Material::Copper.emissivity(400.0);
        assert_eq!(e_si, e_cu);
        assert_eq!(de_si, de_cu);
        assert!(e_cu > 0.0 && e_cu < 1.0);
    }
}
