use nalgebra::Vector2;

/// Source of text extents for label placement.
///
/// A drawing backend with access to real fonts can implement this so labels are
/// positioned against actual glyph boxes.
pub trait TextMetrics: Sync {
    /// Width and height of `text` set at `font_size` pixels.
    fn text_extent(&self, text: &str, font_size: f32) -> Vector2<f32>;
}

/// Fixed-advance estimate: every character is `advance` ems wide and `height` ems tall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub advance: f32,
    pub height: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            advance: 0.6,
            height: 0.75,
        }
    }
}

impl TextMetrics for MonospaceMetrics {
    fn text_extent(&self, text: &str, font_size: f32) -> Vector2<f32> {
        let chars = text.chars().count() as f32;
        if chars == 0.0 {
            return Vector2::zeros();
        }
        Vector2::new(chars * self.advance * font_size, self.height * font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monospace_extent_scales_with_length_and_size() {
        let m = MonospaceMetrics::default();
        let one = m.text_extent("N", 10.0);
        let two = m.text_extent("NH", 10.0);
        assert!((one.x - 6.0).abs() < 1e-6);
        assert!((two.x - 12.0).abs() < 1e-6);
        assert!((one.y - 7.5).abs() < 1e-6);
        assert_eq!(m.text_extent("", 10.0), Vector2::zeros());
    }
}
