//! Angular linking of the bond ends around each atom.
//!
//! Bond ends sharing an anchor atom are sorted by polar angle and joined into a
//! circular `next` list. Each end caches the angle, cosine and sine toward its
//! counter-clockwise (`left`) and clockwise (`right`) neighbor; an atom with a single
//! bond leaves both sides unset.

use super::context::RenderScratch;
use crate::core::models::bond::NeighborAngle;
use crate::core::models::render_data::MoleculeRenderData;
use crate::core::utils::geometry::polar_angle;
use std::f32::consts::TAU;

pub(crate) fn link_bond_ends(data: &mut MoleculeRenderData, scratch: &mut RenderScratch) {
    let order = &mut scratch.order;
    order.clear();
    order.extend(
        data.bond_ends
            .iter()
            .enumerate()
            .map(|(i, be)| (be.atom, polar_angle(&be.dir), i)),
    );
    order.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then(a.1.total_cmp(&b.1))
            .then(a.2.cmp(&b.2))
    });

    let mut start = 0;
    while start < order.len() {
        let atom = order[start].0;
        let end = order[start..]
            .iter()
            .position(|e| e.0 != atom)
            .map_or(order.len(), |k| start + k);
        link_atom(data, &order[start..end]);
        start = end;
    }
}

fn link_atom(data: &mut MoleculeRenderData, group: &[(usize, f32, usize)]) {
    let n = group.len();
    let atom = group[0].0;
    data.atoms[atom].first_bond_end = Some(group[0].2);

    // Counter-clockwise sweep from group[k] to group[k + 1], wrapping past 2π.
    let sweep = |k: usize| -> f32 {
        if k + 1 < n {
            group[k + 1].1 - group[k].1
        } else {
            group[0].1 + TAU - group[k].1
        }
    };

    for (k, &(_, _, be)) in group.iter().enumerate() {
        let next = group[(k + 1) % n].2;
        let prev = group[(k + n - 1) % n].2;
        let dir = data.bond_ends[be].dir;
        data.atoms[atom].add_neighbor_direction(&dir);

        let end = &mut data.bond_ends[be];
        end.next = Some(next);
        if n > 1 {
            end.left = Some(NeighborAngle::new(next, sweep(k)));
            end.right = Some(NeighborAngle::new(prev, sweep((k + n - 1) % n)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::AtomDesc;
    use nalgebra::Point2;
    use std::f32::consts::PI;

    fn star(angles_deg: &[f32]) -> MoleculeRenderData {
        let mut data = MoleculeRenderData::new();
        let center = data.add_atom(AtomDesc::new(Point2::origin(), "C"));
        for &deg in angles_deg {
            let a = deg.to_radians();
            let n = data.add_atom(AtomDesc::new(Point2::new(a.cos(), a.sin()), "C"));
            data.add_bond(center, n);
        }
        let mut scratch = RenderScratch::new();
        link_bond_ends(&mut data, &mut scratch);
        data
    }

    #[test]
    fn three_bond_star_has_equal_neighbor_angles() {
        let data = star(&[0.0, 120.0, 240.0]);
        for be in data.bond_ends_around(0) {
            let end = &data.bond_ends[be];
            assert!((end.lang() - 2.0 * PI / 3.0).abs() < 1e-4);
            assert!((end.rang() - 2.0 * PI / 3.0).abs() < 1e-4);
            assert!((end.lcos() + 0.5).abs() < 1e-4);
            assert!((end.rcos() + 0.5).abs() < 1e-4);
            assert!((end.lcos() - end.lang().cos()).abs() < 1e-6);
        }
    }

    #[test]
    fn terminal_bond_ends_keep_sentinels() {
        let data = star(&[0.0, 120.0, 240.0]);
        for atom in 1..4 {
            let be = data.atoms[atom].first_bond_end.unwrap();
            let end = &data.bond_ends[be];
            assert_eq!(end.lang(), TAU);
            assert_eq!(end.rang(), TAU);
            assert_eq!(end.lcos(), -1.0);
            assert_eq!(end.lnei(), None);
            assert_eq!(data.bond_ends_around(atom).count(), 1);
        }
    }

    #[test]
    fn bond_ends_are_ordered_by_ascending_angle() {
        let data = star(&[200.0, 10.0, 95.0]);
        let around: Vec<_> = data
            .bond_ends_around(0)
            .map(|be| data.bond_ends[be].other_atom)
            .collect();
        assert_eq!(around, vec![2, 3, 1]);
        let first = data.atoms[0].first_bond_end.unwrap();
        let end = &data.bond_ends[first];
        assert!((end.lang() - 85f32.to_radians()).abs() < 1e-4);
        assert!((end.rang() - 170f32.to_radians()).abs() < 1e-4);
        assert_eq!(end.lnei(), Some(data.bond_ends[first].next.unwrap()));
    }

    #[test]
    fn left_and_right_angles_sum_to_full_turn() {
        let data = star(&[30.0, 150.0]);
        for be in data.bond_ends_around(0) {
            let end = &data.bond_ends[be];
            assert!((end.lang() + end.rang() - TAU).abs() < 1e-4);
        }
    }

    #[test]
    fn neighbor_sines_accumulate_on_the_atom() {
        let data = star(&[0.0, 90.0]);
        assert!((data.atoms[0].right_sin - 1.0).abs() < 1e-5);
        assert!((data.atoms[0].upper_sin - 1.0).abs() < 1e-5);
    }
}
