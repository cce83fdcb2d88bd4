//! # Core Module
//!
//! Stateless building blocks of the render model: the data structures a render pass
//! fills, the dimensional constants that scale them and structure file I/O.
//!
//! - **Descriptors** ([`models`]) - atoms, bonds, bond ends, rings, S-groups and
//!   drawable items, owned by one flat per-structure aggregate
//! - **Dimensions** ([`settings`]) - every stroke width, font size, offset and dash
//!   pattern, derived from a single scale factor
//! - **Page layout** ([`canvas`]) - size, margins, grid and title/comment placement
//! - **File I/O** ([`io`]) - reading laid-out structures and writing render dumps
//! - **Math** ([`utils`]) - half-angle trigonometry, plane geometry and element data

pub mod canvas;
pub mod io;
pub mod models;
pub mod settings;
pub mod utils;
