use super::ids::BondEndIndex;
use crate::core::utils::geometry::{centroid, distance_to_line};
use nalgebra::Point2;
use serde::Serialize;

/// Fraction of the center-to-edge distance used for the inscribed aromatic circle.
const AROMATIC_CIRCLE_RATIO: f32 = 0.75;

/// A ring of the planar embedding, bounded by a cycle of bond ends.
///
/// The bond ends are stored in traversal order and always carry one turn angle each.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ring {
    bond_ends: Vec<BondEndIndex>,
    angles: Vec<f32>,
    pub dbl_bond_count: usize,
    aromatic: bool,
    pub center: Point2<f32>,
    radius: f32,
}

impl Default for Ring {
    fn default() -> Self {
        Self {
            bond_ends: Vec::new(),
            angles: Vec::new(),
            dbl_bond_count: 0,
            aromatic: true,
            center: Point2::origin(),
            radius: 0.0,
        }
    }
}

impl Ring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.bond_ends.clear();
        self.angles.clear();
        self.dbl_bond_count = 0;
        self.aromatic = true;
        self.center = Point2::origin();
        self.radius = 0.0;
    }

    /// Appends the next bond end of the boundary and the turn angle at its anchor.
    pub fn push_edge(&mut self, bond_end: BondEndIndex, angle: f32) {
        self.bond_ends.push(bond_end);
        self.angles.push(angle);
    }

    pub fn bond_ends(&self) -> &[BondEndIndex] {
        &self.bond_ends
    }

    pub fn angles(&self) -> &[f32] {
        &self.angles
    }

    pub fn len(&self) -> usize {
        self.bond_ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bond_ends.is_empty()
    }

    /// Starts out `true` and stays so until [`Ring::revoke_aromatic`] is called for the
    /// first non-aromatic bond.
    pub fn aromatic(&self) -> bool {
        self.aromatic
    }

    pub fn revoke_aromatic(&mut self) {
        self.aromatic = false;
        self.radius = 0.0;
    }

    /// Radius of the aromatic circle; zero unless [`Ring::aromatic`].
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Derives `center` and `radius` from the anchor points of the boundary, given in
    /// traversal order.
    ///
    /// The center is the vertex centroid for every ring. The radius is set only for
    /// aromatic rings, as a fixed fraction of the distance from the center to the
    /// nearest edge.
    pub fn derive_geometry(&mut self, vertices: &[Point2<f32>]) {
        debug_assert_eq!(vertices.len(), self.bond_ends.len());
        self.center = centroid(vertices).unwrap_or_else(Point2::origin);
        self.radius = 0.0;
        if !self.aromatic || vertices.len() < 3 {
            return;
        }
        let nearest_edge = vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .map(|(a, b)| distance_to_line(&self.center, a, b))
            .fold(f32::INFINITY, f32::min);
        if nearest_edge.is_finite() {
            self.radius = nearest_edge * AROMATIC_CIRCLE_RATIO;
        }
    }
}
