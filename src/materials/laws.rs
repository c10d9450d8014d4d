//! Coefficient tables for the four material laws.

/// Quadratic polynomial `a2*T^2 + a1*T + a0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadratic {
    pub a2: f64,
    pub a1: f64,
    pub a0: f64,
}

impl Quadratic {
    pub const fn new(a2: f64, a1: f64, a0: f64) -> Self {
        Self { a2, a1, a0 }
    }

    /// Value at `t`.
    #[inline]
    pub fn eval(&self, t: f64) -> f64 {
        (self.a2 * t + self.a1) * t + self.a0
    }

    /// First derivative at `t`.
    #[inline]
    pub fn derivative(&self, t: f64) -> f64 {
        2.0 * self.a2 * t + self.a1
    }
}

/// Density plus conductivity and specific-heat fits for one material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialLaw {
    /// tonne/mm^3
    pub density: f64,
    /// mW/(mm K)
    pub conductivity: Quadratic,
    /// mJ/(tonne K)
    pub specific_heat: Quadratic,
}

/// Laws indexed by material id.
pub(super) static LAWS: [MaterialLaw; 4] = [
    // crystalline silicon
    MaterialLaw {
        density: 2.329e-9,
        conductivity: Quadratic::new(0.0002723, -0.5435, 295.9),
        specific_heat: Quadratic::new(-632.6, 9.952e5, 5.189e8),
    },
    // titanium
    MaterialLaw {
        density: 4.506e-9,
        conductivity: Quadratic::new(1.375e-5, -0.01653, 22.72),
        specific_heat: Quadratic::new(714.2, -6.233e5, 7.128e8),
    },
    // silicon dioxide
    MaterialLaw {
        density: 2.65e-9,
        conductivity: Quadratic::new(4.8e-5, -0.06094, 24.24),
        specific_heat: Quadratic::new(-437.4, 1.404e6, 3.903e8),
    },
    // copper
    MaterialLaw {
        density: 8.96e-9,
        conductivity: Quadratic::new(-9.085e-6, -0.05699, 405.6987),
        specific_heat: Quadratic::new(180.2, -1.723e5, 4.175e8),
    },
];

/// Emissivity of the radiating copper surface.
pub const COPPER_EMISSIVITY: Quadratic = Quadratic::new(-1.932e-7, 0.0003696, 0.07681);
