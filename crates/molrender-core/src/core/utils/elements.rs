use phf::{Map, phf_map};

/// Default valences of the elements a depiction commonly labels. The first entry is
/// the lowest valence; heavier valences are tried in order when the bond order sum
/// exceeds it.
static DEFAULT_VALENCES: Map<&'static str, &'static [u8]> = phf_map! {
    "H" => &[1],
    "B" => &[3],
    "C" => &[4],
    "N" => &[3, 5],
    "O" => &[2],
    "F" => &[1],
    "Si" => &[4],
    "P" => &[3, 5],
    "S" => &[2, 4, 6],
    "Cl" => &[1, 3, 5, 7],
    "Se" => &[2, 4, 6],
    "Br" => &[1, 3, 5, 7],
    "I" => &[1, 3, 5, 7],
    "He" => &[0], "Ne" => &[0], "Ar" => &[0], "Kr" => &[0], "Xe" => &[0],
    "Li" => &[1], "Na" => &[1], "K" => &[1], "Rb" => &[1], "Cs" => &[1],
    "Be" => &[2], "Mg" => &[2], "Ca" => &[2], "Sr" => &[2], "Ba" => &[2],
    "Al" => &[3], "Ga" => &[3], "In" => &[3], "Tl" => &[1, 3],
    "Ge" => &[4], "Sn" => &[2, 4], "Pb" => &[2, 4],
    "As" => &[3, 5], "Sb" => &[3, 5], "Bi" => &[3, 5],
    "Te" => &[2, 4, 6],
    "Fe" => &[], "Co" => &[], "Ni" => &[], "Cu" => &[], "Zn" => &[],
    "Mn" => &[], "Cr" => &[], "Ti" => &[], "V" => &[], "Sc" => &[],
    "Pd" => &[], "Pt" => &[], "Ag" => &[], "Au" => &[], "Hg" => &[],
    "Ru" => &[], "Rh" => &[], "Os" => &[], "Ir" => &[], "Cd" => &[],
    "Mo" => &[], "W" => &[], "Zr" => &[], "Y" => &[], "Nb" => &[],
    "Tc" => &[], "Re" => &[], "Hf" => &[], "Ta" => &[], "La" => &[],
    "U" => &[], "Gd" => &[], "D" => &[1], "T" => &[1],
};

pub fn is_known_element(symbol: &str) -> bool {
    DEFAULT_VALENCES.contains_key(symbol)
}

pub fn is_carbon(symbol: &str) -> bool {
    symbol == "C"
}

/// Implicit hydrogen count for an atom of `symbol` with the given bond order sum and
/// formal charge, or `None` for elements without a default valence (metals, unknowns).
///
/// Charge shifts the effective valence the way organic depiction conventions expect:
/// positive charge on N/P/O/S adds a bond (ammonium, oxonium), negative charge on those
/// and on carbon removes one, while boron gains a bond on a negative charge.
pub fn implicit_hydrogens(symbol: &str, bond_order_sum: u32, charge: i32) -> Option<u32> {
    let valences = DEFAULT_VALENCES.get(symbol)?;
    if valences.is_empty() {
        return None;
    }
    let adjust: i32 = match symbol {
        "N" | "P" | "O" | "S" | "Se" | "As" => charge,
        "B" | "Al" => -charge,
        _ => -charge.abs(),
    };
    for &v in valences.iter() {
        let target = v as i32 + adjust;
        if target >= bond_order_sum as i32 {
            return Some((target - bond_order_sum as i32) as u32);
        }
    }
    Some(0)
}
