//! # Render Models
//!
//! The annotated-graph layer that sits between a laid-out molecule and a drawing
//! backend.
//!
//! - [`structure`] - the laid-out input graph (atoms, bonds, S-groups, properties)
//! - [`atom`] / [`bond`] - per-atom and per-bond descriptors, including the directed
//!   [`bond::BondEnd`]s that carry each atom's angular neighborhood
//! - [`ring`] - rings of the planar embedding and their aromatic circles
//! - [`sgroup`] - substructure annotations with their bracket items
//! - [`items`] - secondary drawable annotations sharing one envelope
//! - [`render_data`] - the per-structure aggregate owning all of the above
//! - [`ids`] - index aliases and the [`ids::ItemRange`] span type
//!
//! Nothing here holds references into anything else: every cross-link is an index or
//! a range into a flat array of [`render_data::MoleculeRenderData`], so an instance can
//! be cleared, reused, cloned or serialized as a unit.

pub mod atom;
pub mod bond;
pub mod ids;
pub mod items;
pub mod render_data;
pub mod ring;
pub mod sgroup;
pub mod structure;
