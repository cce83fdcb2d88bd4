//! The laid-out molecular graph handed over by the layout collaborator.
//!
//! Coordinates are final 2D positions in bond-length units with y pointing up; this
//! layer never moves atoms. Indices in bonds and S-groups refer to the position of an
//! atom in [`Structure::atoms`].

use super::atom::{AtomKind, Inversion, StereoGroup};
use super::bond::{BondOrder, BondTopology, QueryBondType, ReactingCenter, StereoDirection};
use super::sgroup::SGroupKind;
use crate::core::utils::elements;
use nalgebra::{Point2, Vector2};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Radical {
    #[default]
    None,
    Singlet,
    Doublet,
    Triplet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct StructureAtom {
    /// Element symbol, pseudo-atom text or R-site name.
    pub label: String,
    pub pos: [f32; 2],
    #[serde(default)]
    pub kind: AtomKind,
    #[serde(default)]
    pub charge: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isotope: Option<u32>,
    #[serde(default)]
    pub radical: Radical,
    /// Implicit hydrogen count; derived from default valences when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implicit_h: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aam: Option<u32>,
    #[serde(default)]
    pub inversion: Inversion,
    #[serde(default)]
    pub exact_change: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stereo_group: Option<StereoGroup>,
    /// Attachment orders of an R-site, one marker per entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rsite_attachment_orders: Vec<u32>,
    /// Attachment point ordinals of an R-group member.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachment_points: Vec<u32>,
    /// Alternatives of a query atom list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub atom_list: Vec<String>,
    #[serde(default)]
    pub highlighted: bool,
}

impl StructureAtom {
    pub fn new(label: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            label: label.into(),
            pos: [x, y],
            kind: AtomKind::Regular,
            charge: 0,
            isotope: None,
            radical: Radical::None,
            implicit_h: None,
            aam: None,
            inversion: Inversion::Unmarked,
            exact_change: false,
            stereo_group: None,
            rsite_attachment_orders: Vec::new(),
            attachment_points: Vec::new(),
            atom_list: Vec::new(),
            highlighted: false,
        }
    }

    pub fn position(&self) -> Point2<f32> {
        Point2::new(self.pos[0], self.pos[1])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct StructureBond {
    pub begin: usize,
    pub end: usize,
    #[serde(default)]
    pub order: BondOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryBondType>,
    #[serde(default)]
    pub stereo: StereoDirection,
    /// Double bond with unspecified cis/trans configuration, drawn crossed.
    #[serde(default)]
    pub cistrans: bool,
    #[serde(default)]
    pub topology: BondTopology,
    #[serde(default)]
    pub reacting_center: ReactingCenter,
    #[serde(default)]
    pub stereo_care: bool,
    #[serde(default)]
    pub highlighted: bool,
}

impl StructureBond {
    pub fn new(begin: usize, end: usize, order: BondOrder) -> Self {
        Self {
            begin,
            end,
            order,
            query: None,
            stereo: StereoDirection::None,
            cistrans: false,
            topology: BondTopology::Either,
            reacting_center: ReactingCenter::Unmarked,
            stereo_care: false,
            highlighted: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct StructureSGroup {
    #[serde(default)]
    pub kind: SGroupKind,
    pub atoms: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscript: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructureError {
    #[error("Atom {atom} has unknown element symbol '{label}'")]
    UnknownElement { atom: usize, label: String },
    #[error("Bond {bond} references missing atom {atom}")]
    DanglingBond { bond: usize, atom: usize },
    #[error("Bond {bond} connects atom {atom} to itself")]
    SelfLoop { bond: usize, atom: usize },
    #[error("Atoms {0} and {1} are connected by more than one bond")]
    DuplicateBond(usize, usize),
    #[error("S-group {sgroup} references missing atom {atom}")]
    DanglingSGroupAtom { sgroup: usize, atom: usize },
}

/// String properties of a structure in input order.
///
/// A repeated key overwrites the earlier value in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Properties(Vec<(String, String)>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + Clone + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PropertiesVisitor;

        impl<'de> Visitor<'de> for PropertiesVisitor {
            type Value = Properties;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a table of string properties")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Properties, A::Error> {
                let mut props = Properties(Vec::with_capacity(access.size_hint().unwrap_or(0)));
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    props.insert(key, value);
                }
                Ok(props)
            }
        }

        deserializer.deserialize_map(PropertiesVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Structure {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
    #[serde(default)]
    pub atoms: Vec<StructureAtom>,
    #[serde(default)]
    pub bonds: Vec<StructureBond>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sgroups: Vec<StructureSGroup>,
}

impl Structure {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key)
    }

    pub fn properties_iter(&self) -> impl Iterator<Item = (&str, &str)> + Clone + '_ {
        self.properties.iter()
    }

    /// Mean length of the bonds in input units, or `None` for a structure without bonds.
    pub fn mean_bond_length(&self) -> Option<f32> {
        let (sum, count) = self
            .bonds
            .iter()
            .filter_map(|b| {
                let p = self.atoms.get(b.begin)?.position();
                let q = self.atoms.get(b.end)?.position();
                Some((q - p).norm())
            })
            .fold((0.0f32, 0usize), |(s, n), len| (s + len, n + 1));
        (count > 0).then(|| sum / count as f32)
    }

    /// Width and height of the atom positions measured in mean bond lengths.
    pub fn normalized_extent(&self) -> Option<Vector2<f32>> {
        let mean = self.mean_bond_length().filter(|&m| m > 0.0)?;
        let (first, rest) = self.atoms.split_first()?;
        let (min, max) = rest.iter().fold(
            (first.position(), first.position()),
            |(min, max), a| {
                let p = a.position();
                (
                    Point2::new(min.x.min(p.x), min.y.min(p.y)),
                    Point2::new(max.x.max(p.x), max.y.max(p.y)),
                )
            },
        );
        Some((max - min) / mean)
    }

    /// Checks element symbols and every atom reference.
    pub fn validate(&self) -> Result<(), StructureError> {
        for (i, atom) in self.atoms.iter().enumerate() {
            if atom.kind == AtomKind::Regular && !elements::is_known_element(&atom.label) {
                return Err(StructureError::UnknownElement {
                    atom: i,
                    label: atom.label.clone(),
                });
            }
        }

        let mut seen = std::collections::HashSet::with_capacity(self.bonds.len());
        for (i, bond) in self.bonds.iter().enumerate() {
            for atom in [bond.begin, bond.end] {
                if atom >= self.atoms.len() {
                    return Err(StructureError::DanglingBond { bond: i, atom });
                }
            }
            if bond.begin == bond.end {
                return Err(StructureError::SelfLoop {
                    bond: i,
                    atom: bond.begin,
                });
            }
            let key = (bond.begin.min(bond.end), bond.begin.max(bond.end));
            if !seen.insert(key) {
                return Err(StructureError::DuplicateBond(key.0, key.1));
            }
        }

        for (i, sgroup) in self.sgroups.iter().enumerate() {
            if let Some(&atom) = sgroup.atoms.iter().find(|&&a| a >= self.atoms.len()) {
                return Err(StructureError::DanglingSGroupAtom { sgroup: i, atom });
            }
        }
        Ok(())
    }
}
