//! # molrender
//!
//! The geometric render model behind 2D chemical structure diagrams. Given a molecule
//! whose atoms already have 2D coordinates, the library computes everything a drawing
//! backend needs: bond-end geometry and angular neighbors, ring perception with
//! aromatic circles, double-bond line placement, atom labels with hydrogens, charges
//! and radicals, S-group brackets, and the full set of dimensional constants that
//! scale them.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`MoleculeRenderData` and its
//!   descriptors), the scale-derived `RenderSettings`, page layout options, half-angle
//!   trigonometry and structure file I/O.
//!
//! - **[`engine`]: The Logic Core.** The population pass: loading and scaling, bond-end
//!   linking, ring perception, label annotation, bond geometry and brackets. Each pass
//!   reads a shared immutable context and writes only into buffers owned by its worker.
//!
//! - **[`workflows`]: The Public API.** Entry points that tie `engine` and `core`
//!   together, for a single structure or for a parallel batch.
//!
//! Drawing itself (fonts, vector output, color palettes) stays with the backend.

pub mod core;
pub mod engine;
pub mod workflows;
