//! The text-measurement seam between layout and rendering.
//!
//! Wrap and flow decisions must use the same font metrics that later paint the
//! text, otherwise measured and visual widths disagree.  [`FontMetrics`] wraps
//! the `genpdf` font cache that the painter draws through; [`CharMetrics`] is a
//! deterministic approximation for dry runs and tests that have no font files.

use genpdf::fonts::FontCache;
use genpdf::style::Style;
use genpdf::Mm;

/// Converts a plain millimetre value into the renderer's unit type.
pub fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

/// Converts the renderer's unit type back into a plain millimetre value.
pub fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Text metrics in millimetres for a given style.
pub trait Measure {
    /// Width of `text` when rendered with `style`.
    fn text_width(&self, text: &str, style: Style) -> f64;

    /// Height of one line of `style`, including leading.
    fn line_height(&self, style: Style) -> f64;
}

/// Metrics backed by the font cache used for painting.
pub struct FontMetrics<'a> {
    font_cache: &'a FontCache,
}

impl<'a> FontMetrics<'a> {
    /// Creates metrics over the given font cache.
    pub fn new(font_cache: &'a FontCache) -> Self {
        Self { font_cache }
    }
}

impl Measure for FontMetrics<'_> {
    fn text_width(&self, text: &str, style: Style) -> f64 {
        mm_to_f64(style.str_width(self.font_cache, text))
    }

    fn line_height(&self, style: Style) -> f64 {
        mm_to_f64(style.line_height(self.font_cache))
    }
}

/// Character-count metrics: every glyph is a fixed fraction of the font size,
/// bold slightly wider.  Deterministic and independent of any font file.
#[derive(Clone, Copy, Debug)]
pub struct CharMetrics {
    /// Width of one character in millimetres per point of font size.
    pub char_width_per_pt: f64,
    /// Line height in millimetres per point of font size.
    pub line_height_per_pt: f64,
}

impl Default for CharMetrics {
    fn default() -> Self {
        Self {
            char_width_per_pt: 0.18,
            line_height_per_pt: 0.42,
        }
    }
}

impl Measure for CharMetrics {
    fn text_width(&self, text: &str, style: Style) -> f64 {
        let bold_factor = if style.is_bold() { 1.1 } else { 1.0 };
        text.chars().count() as f64
            * self.char_width_per_pt
            * f64::from(style.font_size())
            * bold_factor
    }

    fn line_height(&self, style: Style) -> f64 {
        self.line_height_per_pt * f64::from(style.font_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_metrics_scale_with_length_and_weight() {
        let metrics = CharMetrics::default();
        let mut style = Style::new();
        style.set_font_size(10);

        let narrow = metrics.text_width("ab", style);
        let wide = metrics.text_width("abcd", style);
        assert!(wide > narrow);

        let mut bold = style;
        bold.set_bold();
        assert!(metrics.text_width("abcd", bold) > wide);
    }
}
