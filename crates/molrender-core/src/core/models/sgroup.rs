use super::ids::{AtomIndex, ItemRange};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SGroupKind {
    #[default]
    Generic,
    /// Structural repeat unit.
    Sru,
    Multiple,
    Copolymer,
    Superatom,
    Data,
}

impl SGroupKind {
    /// Whether groups of this kind are enclosed in a bracket pair.
    pub fn is_bracketed(self) -> bool {
        matches!(
            self,
            SGroupKind::Generic | SGroupKind::Sru | SGroupKind::Multiple | SGroupKind::Copolymer
        )
    }
}

/// Render-time descriptor of a substructure annotation.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SGroup {
    pub kind: SGroupKind,
    pub atoms: Vec<AtomIndex>,
    pub subscript: Option<String>,
    pub text_items: ItemRange,
    pub graph_items: ItemRange,
    pub brackets: ItemRange,
}

impl SGroup {
    pub fn new(kind: SGroupKind, atoms: Vec<AtomIndex>) -> Self {
        Self {
            kind,
            atoms,
            ..Self::default()
        }
    }

    pub fn clear(&mut self) {
        self.kind = SGroupKind::Generic;
        self.atoms.clear();
        self.subscript = None;
        self.text_items = ItemRange::EMPTY;
        self.graph_items = ItemRange::EMPTY;
        self.brackets = ItemRange::EMPTY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_polymer_like_groups_are_bracketed() {
        assert!(SGroupKind::Sru.is_bracketed());
        assert!(SGroupKind::Multiple.is_bracketed());
        assert!(SGroupKind::Generic.is_bracketed());
        assert!(SGroupKind::Copolymer.is_bracketed());
        assert!(!SGroupKind::Superatom.is_bracketed());
        assert!(!SGroupKind::Data.is_bracketed());
    }

    #[test]
    fn clear_drops_ranges_and_membership() {
        let mut g = SGroup::new(SGroupKind::Sru, vec![1, 2]);
        g.subscript = Some("n".to_string());
        g.brackets = ItemRange::new(0, 2);
        g.clear();
        assert_eq!(g, SGroup::default());
    }
}
