//! # Workflows Module
//!
//! High-level entry points that run the complete population pass over laid-out
//! structures.
//!
//! ## Overview
//!
//! Workflows are the top-level API of the library. They derive the dimensional
//! settings from the render options, own the per-pass buffers and drive the engine
//! steps in order, so callers only deal with structures in and render data out.
//!
//! ## Architecture
//!
//! - **Single structure** ([`prepare`]) - One pass producing owned render data, plus a
//!   buffer-reusing variant for callers that manage their own workspace
//! - **Batch** ([`batch`]) - Many structures in parallel, one reusable workspace per
//!   worker thread, with per-item failure isolation and progress reporting

pub mod batch;
pub mod prepare;
