//! # Engine Module
//!
//! The population pass that turns a laid-out [`Structure`](crate::core::models::structure::Structure)
//! into a filled [`MoleculeRenderData`](crate::core::models::render_data::MoleculeRenderData).
//!
//! ## Overview
//!
//! A pass runs a fixed sequence of steps over one structure. Every step reads the
//! shared, immutable [`context::RenderContext`] and writes only into the render data
//! and the worker-owned [`context::RenderScratch`], so independent structures can be
//! processed on different threads without synchronization.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Render options and their builder
//! - **Context** ([`context`]) - Read-only pass inputs and per-worker scratch buffers
//! - **Text metrics** ([`metrics`]) - Pluggable text extent estimation for label placement
//! - **Progress Monitoring** ([`progress`]) - Batch progress events and callbacks
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! The internal steps run in this order: loading and scaling, angular linking of bond
//! ends, ring perception, atom annotation, bond geometry and S-group brackets.

pub(crate) mod bonds;
pub mod config;
pub mod context;
pub mod error;
pub(crate) mod labels;
pub(crate) mod linking;
pub(crate) mod load;
pub mod metrics;
pub mod progress;
pub(crate) mod rings;
pub(crate) mod sgroups;
