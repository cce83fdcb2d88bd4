use molrender::core::io::format::read_structures;
use molrender::core::models::bond::{BondEndError, BondOrder};
use molrender::core::models::render_data::MoleculeRenderData;
use molrender::core::models::sgroup::SGroupKind;
use molrender::core::models::structure::{Structure, StructureAtom, StructureBond, StructureSGroup};
use molrender::core::utils::trig;
use molrender::engine::config::{RenderOptions, RenderOptionsBuilder};
use molrender::engine::metrics::MonospaceMetrics;
use molrender::workflows::prepare;
use std::f32::consts::{PI, TAU};
use std::io::Write;

fn options() -> RenderOptions {
    RenderOptionsBuilder::new().bond_length(30.0).build().unwrap()
}

fn populate(structure: &Structure) -> MoleculeRenderData {
    prepare::run(structure, &options(), &MonospaceMetrics::default())
        .unwrap()
        .data
}

fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-3, "{a} != {b}");
}

fn hexagon(name: &str, orders: [BondOrder; 6]) -> Structure {
    let mut s = Structure::new(name);
    for k in 0..6 {
        let a = k as f32 * PI / 3.0;
        s.atoms.push(StructureAtom::new("C", a.cos(), a.sin()));
    }
    for (k, order) in orders.into_iter().enumerate() {
        s.bonds.push(StructureBond::new(k, (k + 1) % 6, order));
    }
    s
}

#[test]
fn ethene_double_bond_is_centered_between_labels() {
    let mut s = Structure::new("ethene");
    s.atoms.push(StructureAtom::new("C", 0.0, 0.0));
    s.atoms.push(StructureAtom::new("C", 1.0, 0.0));
    s.bonds.push(StructureBond::new(0, 1, BondOrder::Double));
    let data = populate(&s);

    assert!(data.atoms.iter().all(|a| a.show_label && a.implicit_h == 2));
    let bond = &data.bonds[0];
    assert!(bond.centered);
    assert_eq!(bond.double_side, 0);
    assert!(bond.second_line.is_none());
    assert_eq!(bond.ext_p, 0.0);
    assert_eq!(bond.ext_n, 0.0);
    assert_eq!(bond.get_bond_end(bond.beg), Ok(bond.be1));
    assert_eq!(bond.get_bond_end(bond.end), Ok(bond.be2));
    for be in &data.bond_ends {
        assert!(be.centered);
        assert!(be.offset > 0.0);
        assert_eq!(be.lang(), TAU);
        assert_eq!(be.rang(), TAU);
    }
    assert!(data.rings.is_empty());
}

fn propane() -> Structure {
    let mut s = Structure::new("propane");
    s.atoms.push(StructureAtom::new("C", 0.0, 0.0));
    s.atoms.push(StructureAtom::new("C", 0.866, 0.5));
    s.atoms.push(StructureAtom::new("C", 1.732, 0.0));
    s.bonds.push(StructureBond::new(0, 1, BondOrder::Single));
    s.bonds.push(StructureBond::new(1, 2, BondOrder::Single));
    s
}

#[test]
fn chain_ends_have_no_neighbor_angles_after_prepare() {
    let data = populate(&propane());

    for atom in [0, 2] {
        let end = &data.bond_ends[data.atoms[atom].first_bond_end.unwrap()];
        assert_eq!(end.lcos(), -1.0);
        assert_eq!(end.rcos(), -1.0);
        assert_eq!(end.lnei(), None);
        assert_eq!(end.rnei(), None);
        assert_eq!(end.lang(), TAU);
        assert_eq!(end.rang(), TAU);
    }

    let middle = &data.bond_ends[data.atoms[1].first_bond_end.unwrap()];
    assert!(middle.lnei().is_some() && middle.rnei().is_some());
    assert_close(middle.lcos(), middle.lang().cos());
    assert_close(middle.lang() + middle.rang(), TAU);
}

#[test]
fn bond_end_lookup_rejects_atoms_off_the_bond() {
    let data = populate(&propane());

    let first = &data.bonds[0];
    assert_eq!(
        first.get_bond_end(2),
        Err(BondEndError::NotAdjacent { atom: 2, bond: 0 })
    );
    let shared = data.bonds[1].get_bond_end(1).unwrap();
    assert_eq!(data.bond_ends[shared].atom, 1);
    assert_eq!(data.bond_ends[shared].other_atom, 2);
}

#[test]
#[should_panic(expected = "outside [-1, 1]")]
fn half_angle_helpers_reject_cosines_past_rounding_noise() {
    assert!(trig::ctg2c(1.00005).is_none());
    trig::sin2c(1.01);
}

#[test]
fn benzene_is_one_aromatic_ring_with_hidden_labels() {
    let data = populate(&hexagon("benzene", [BondOrder::Aromatic; 6]));

    assert_eq!(data.rings.len(), 1);
    let ring = &data.rings[0];
    assert!(ring.aromatic());
    assert_eq!(ring.len(), 6);
    assert!(ring.center.coords.norm() < 1e-3);
    assert!(ring.radius() > 0.0 && ring.radius() < 30.0);
    for bond in &data.bonds {
        assert!(bond.in_ring && bond.arom_ring);
        assert!(bond.second_line.is_none());
        assert!(bond.second_line_dash.is_none());
    }
    assert!(data.atoms.iter().all(|a| !a.show_label));
    assert!(data.text_items.is_empty());
}

#[test]
fn kekule_double_bonds_are_drawn_inside_the_ring() {
    use BondOrder::{Double, Single};
    let data = populate(&hexagon("cyclohexatriene", [Double, Single, Double, Single, Double, Single]));
    let ring = &data.rings[0];
    assert!(!ring.aromatic());
    assert_eq!(ring.dbl_bond_count, 3);
    assert_eq!(ring.radius(), 0.0);

    for bond in data.bonds.iter().filter(|b| b.order == Double) {
        let [p, q] = bond.second_line.expect("offset second line");
        let mid = nalgebra::center(&p, &q);
        assert!((mid - ring.center).norm() < (bond.center - ring.center).norm());
        assert!((q - p).norm() < bond.length);
        assert_eq!(bond.double_side, 1);
    }
}

#[test]
fn three_bond_star_links_its_center() {
    let mut s = Structure::new("isobutylene");
    s.atoms.push(StructureAtom::new("C", 0.0, 0.0));
    for deg in [90.0f32, 210.0, 330.0] {
        let a = deg.to_radians();
        s.atoms.push(StructureAtom::new("C", a.cos(), a.sin()));
    }
    s.bonds.push(StructureBond::new(0, 1, BondOrder::Double));
    s.bonds.push(StructureBond::new(0, 2, BondOrder::Single));
    s.bonds.push(StructureBond::new(0, 3, BondOrder::Single));
    let data = populate(&s);

    let ends: Vec<_> = data.bond_ends_around(0).collect();
    assert_eq!(ends.len(), 3);
    let total: f32 = ends.iter().map(|&be| data.bond_ends[be].lang()).sum();
    assert_close(total, TAU);
    for &be in &ends {
        assert_close(data.bond_ends[be].lang(), TAU / 3.0);
        assert_close(data.bond_ends[be].rang(), TAU / 3.0);
    }

    assert!(!data.atoms[0].show_label);
    assert!(data.atoms[1..].iter().all(|a| a.show_label));
    // Terminal CH2 against a symmetric center.
    assert!(data.bonds[0].centered);
    assert_eq!(data.atoms[0].implicit_h, 0);
}

#[test]
fn repeat_unit_is_bracketed() {
    let mut s = Structure::new("polyethylene");
    s.atoms.push(StructureAtom::new("C", 0.0, 0.0));
    s.atoms.push(StructureAtom::new("C", 0.866, 0.5));
    s.bonds.push(StructureBond::new(0, 1, BondOrder::Single));
    s.sgroups.push(StructureSGroup {
        kind: SGroupKind::Sru,
        atoms: vec![0, 1],
        subscript: None,
    });
    let data = populate(&s);

    let group = &data.sgroups[0];
    let brackets = group.brackets.slice(&data.brackets);
    assert_eq!(brackets.len(), 2);
    for atom in &data.atoms {
        assert!(atom.pos.x > brackets[0].p0.x && atom.pos.x < brackets[1].p0.x);
        assert!(atom.pos.y > brackets[0].p0.y && atom.pos.y < brackets[0].p1.y);
    }
    let subscript = group.text_items.slice(&data.text_items);
    assert_eq!(subscript[0].text, "n");
}

#[test]
fn structures_read_from_toml_prepare_end_to_end() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        file,
        r#"
        [[structure]]
        name = "methanol"
        atoms = [
            {{ label = "C", pos = [0.0, 0.0] }},
            {{ label = "O", pos = [1.0, 0.0] }},
        ]
        bonds = [{{ begin = 0, end = 1 }}]

        [[structure]]
        name = "water"
        atoms = [{{ label = "O", pos = [0.0, 0.0] }}]
        "#
    )
    .unwrap();
    file.flush().unwrap();

    let structures = read_structures(file.path()).unwrap();
    assert_eq!(structures.len(), 2);
    let methanol = populate(&structures[0]);
    assert_eq!(methanol.atoms[1].implicit_h, 1);
    let water = populate(&structures[1]);
    assert_eq!(water.atoms[0].implicit_h, 2);
    assert!(water.bonds.is_empty());
}
