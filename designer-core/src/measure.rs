//! Text measurement.

use crate::element::TextStyle;
use crate::geometry::Size;

/// Measures the unscaled bounding box of a text run.
pub trait TextMeasurer {
    /// Natural size of `content` rendered with `style`.
    fn measure(&self, content: &str, style: &TextStyle) -> Size;
}

/// Font-agnostic estimate based on character counts.
///
/// Good enough for headless use; hosts with real font metrics should supply
/// their own measurer.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicMeasurer {
    /// Average glyph advance as a fraction of the font size.
    pub advance: f32,
}

impl Default for HeuristicMeasurer {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl TextMeasurer for HeuristicMeasurer {
    #[allow(clippy::cast_precision_loss)]
    fn measure(&self, content: &str, style: &TextStyle) -> Size {
        let lines: Vec<&str> = content.split('\n').collect();
        let longest = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);

        let glyphs = longest as f32 * self.advance * style.font_size;
        let spacing =
            style.letter_spacing / 1000.0 * style.font_size * longest.saturating_sub(1) as f32;
        let width = (glyphs + spacing).max(0.0) + style.rendered_stroke_width();
        let height = lines.len() as f32 * style.font_size * style.line_height;
        Size::new(width, height)
    }
}
