//! Gauss-Legendre rules on the reference interval [-1, 1].

/// One-dimensional quadrature point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussPoint {
    pub coord: f64,
    pub weight: f64,
}

const fn gp(coord: f64, weight: f64) -> GaussPoint {
    GaussPoint { coord, weight }
}

/// 2-point rule, exact for cubics.
pub const GAUSS_2: [GaussPoint; 2] = [
    gp(-0.577_350_269_189_625_8, 1.0),
    gp(0.577_350_269_189_625_8, 1.0),
];

/// 3-point rule, exact for quintics.
pub const GAUSS_3: [GaussPoint; 3] = [
    gp(-0.774_596_669_241_483_4, 5.0 / 9.0),
    gp(0.0, 8.0 / 9.0),
    gp(0.774_596_669_241_483_4, 5.0 / 9.0),
];

/// 4-point rule used along radiating edges.
pub const GAUSS_4: [GaussPoint; 4] = [
    gp(-0.861_136_311_594_052_6, 0.347_854_845_137_453_9),
    gp(-0.339_981_043_584_856_3, 0.652_145_154_862_546_1),
    gp(0.339_981_043_584_856_3, 0.652_145_154_862_546_1),
    gp(0.861_136_311_594_052_6, 0.347_854_845_137_453_9),
];

/// Tensor-product points `(xi, eta, weight)` of a 1-D rule.
pub fn tensor(rule: &[GaussPoint]) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
    rule.iter().flat_map(move |a| {
        rule.iter()
            .map(move |b| (a.coord, b.coord, a.weight * b.weight))
    })
}
