use super::config::RenderOptions;
use super::metrics::TextMetrics;
use crate::core::models::ids::{AtomIndex, BondEndIndex};
use crate::core::settings::RenderSettings;
use nalgebra::Point2;

/// Read-only inputs shared by every step of a render pass.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub settings: &'a RenderSettings,
    pub options: &'a RenderOptions,
    pub metrics: &'a dyn TextMetrics,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        settings: &'a RenderSettings,
        options: &'a RenderOptions,
        metrics: &'a dyn TextMetrics,
    ) -> Self {
        Self {
            settings,
            options,
            metrics,
        }
    }
}

/// Temporary buffers of a render pass, owned by one worker and reused across passes.
///
/// Contents never outlive a single pass; a fresh instance only costs reallocation.
#[derive(Debug, Default)]
pub struct RenderScratch {
    /// Bond ends keyed by anchor atom and polar angle, for angular linking.
    pub(crate) order: Vec<(AtomIndex, f32, BondEndIndex)>,
    /// Bond ends already assigned to a face.
    pub(crate) visited: Vec<bool>,
    pub(crate) face: Vec<BondEndIndex>,
    pub(crate) face_angles: Vec<f32>,
    pub(crate) vertices: Vec<Point2<f32>>,
}

impl RenderScratch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.visited.clear();
        self.face.clear();
        self.face_angles.clear();
        self.vertices.clear();
    }
}
