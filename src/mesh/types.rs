//! Core types for mesh representation.

use std::fmt;

use crate::materials::Material;

/// A mesh node in physical coordinates (mm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub x: f64,
    pub y: f64,
}

impl Node {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 4-node bilinear quadrilateral.
///
/// Nodes are ordered bottom-left, bottom-right, top-right, top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub nodes: [usize; 4],
    pub material: Material,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.nodes;
        write!(f, "[{a} {b} {c} {d}] {}", self.material)
    }
}

/// One heater strip: its elements and the current through it (mA).
#[derive(Debug, Clone, PartialEq)]
pub struct Heater {
    pub elements: Vec<usize>,
    pub current: f64,
}

/// Heater elements grouped by heater number, with one current per heater.
///
/// Currents are the only part of the mesh description that changes during a
/// run; they are zeroed when the heaters are switched off.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaterRegistry {
    heaters: Vec<Heater>,
}

impl HeaterRegistry {
    pub fn new(heaters: Vec<Heater>) -> Self {
        Self { heaters }
    }

    /// Number of heaters.
    pub fn len(&self) -> usize {
        self.heaters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heaters.is_empty()
    }

    pub fn heaters(&self) -> &[Heater] {
        &self.heaters
    }

    /// Every heater element paired with the current of its heater.
    pub fn elements(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.heaters
            .iter()
            .flat_map(|h| h.elements.iter().map(move |&e| (e, h.current)))
    }

    /// Zero every heater current.
    pub fn switch_off(&mut self) {
        for heater in &mut self.heaters {
            heater.current = 0.0;
        }
    }

    /// Whether every heater carries zero current.
    pub fn is_off(&self) -> bool {
        self.heaters.iter().all(|h| h.current == 0.0)
    }
}

/// Elements whose top edge radiates to the ambient.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadiationBoundarySet {
    elements: Vec<usize>,
}

impl RadiationBoundarySet {
    pub fn new(elements: Vec<usize>) -> Self {
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.elements.iter().copied()
    }
}
