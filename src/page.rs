//! Page geometry, the vertical cursor, and page-break decisions.
//!
//! The layout pass walks the record once, top to bottom, tracking a cursor in
//! absolute page millimetres.  Every renderer asks [`LayoutContext::ensure_space`]
//! before painting an atomic block; when the block does not fit, the context
//! starts a new page and resets the cursor to the top margin.  The result of
//! the pass is a [`LayoutPlan`]: positioned paint operations per page plus the
//! hyperlink regions and outline marks discovered along the way.

use genpdf::style::{Color, Style};
use log::debug;

use crate::measure::Measure;
use crate::style::StyleSheet;

/// Fixed page geometry in millimetres.  The coordinate origin is the top-left
/// corner of the page with y growing downwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub page_width: f64,
    pub page_height: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    /// Strip above the bottom margin excluded from body layout so the footer
    /// line never collides with content.
    pub footer_reserve: f64,
}

impl PageGeometry {
    /// Left edge of the content area.
    pub fn content_left(&self) -> f64 {
        self.margin_left
    }

    /// Right edge of the content area.
    pub fn content_right(&self) -> f64 {
        self.page_width - self.margin_right
    }

    /// Top margin boundary; the cursor resets here after a page break.
    pub fn content_top(&self) -> f64 {
        self.margin_top
    }

    /// Bottom margin boundary of the page.
    pub fn content_bottom(&self) -> f64 {
        self.page_height - self.margin_bottom
    }

    /// Usable width between the margins.
    pub fn content_width(&self) -> f64 {
        self.content_right() - self.content_left()
    }

    /// Lower boundary for body content, above the reserved footer strip.
    pub fn body_bottom(&self) -> f64 {
        self.content_bottom() - self.footer_reserve
    }
}

/// Outcome of a page-break check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpaceDecision {
    /// The block fits; the cursor is unchanged.
    Fits,
    /// The block would cross the bottom boundary; continue on a new page.
    Break,
}

/// Decides whether a block of `required` vertical extent fits at `cursor`.
///
/// Returns the cursor to paint at: unchanged when the block fits, the top
/// margin of a fresh page otherwise.
pub fn ensure_space(cursor: f64, required: f64, geometry: &PageGeometry) -> (f64, SpaceDecision) {
    if cursor + required <= geometry.body_bottom() {
        (cursor, SpaceDecision::Fits)
    } else {
        (geometry.content_top(), SpaceDecision::Break)
    }
}

/// One positioned text fragment with a single style.
#[derive(Clone, Debug)]
pub struct TextRun {
    pub text: String,
    pub style: Style,
}

impl TextRun {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// A paint operation positioned in absolute page millimetres.
#[derive(Clone, Debug)]
pub enum PaintOp {
    /// One baseline of text; the runs paint left to right, each advancing by
    /// its own measured width.  `y` is the top of the line box.
    Text {
        x: f64,
        y: f64,
        runs: Vec<TextRun>,
    },
    /// A stroked rectangle with chamfered corners.
    Outline {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
        chamfer: f64,
    },
    /// A horizontal rule.
    Rule {
        x: f64,
        y: f64,
        width: f64,
        color: Color,
    },
}

/// A clickable region tied to one page of the plan.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkRegion {
    /// Zero-based page index.
    pub page: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub uri: String,
}

/// A section start recorded for the document outline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineMark {
    pub title: String,
    /// Zero-based page index.
    pub page: usize,
}

/// The complete result of a layout pass.
#[derive(Clone, Debug, Default)]
pub struct LayoutPlan {
    pub pages: Vec<Vec<PaintOp>>,
    pub links: Vec<LinkRegion>,
    pub outline: Vec<OutlineMark>,
}

/// The single-owner layout state threaded through the section renderers.
///
/// Each concurrent render owns its own context; nothing here is shared.
pub struct LayoutContext<'a> {
    pub styles: &'a StyleSheet,
    measure: &'a dyn Measure,
    geometry: PageGeometry,
    cursor: f64,
    plan: LayoutPlan,
}

impl<'a> LayoutContext<'a> {
    /// Creates a context with one empty page and the cursor at the top margin.
    pub fn new(measure: &'a dyn Measure, styles: &'a StyleSheet, geometry: PageGeometry) -> Self {
        Self {
            styles,
            measure,
            geometry,
            cursor: geometry.content_top(),
            plan: LayoutPlan {
                pages: vec![Vec::new()],
                ..LayoutPlan::default()
            },
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Current vertical paint position on the active page.
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Zero-based index of the active page.
    pub fn page_index(&self) -> usize {
        self.plan.pages.len() - 1
    }

    /// Moves the cursor down.
    pub fn advance(&mut self, extent: f64) {
        self.cursor += extent;
    }

    /// Applies [`ensure_space`], materializing the page boundary when the
    /// block does not fit.  Returns the decision so callers can skip leading
    /// gaps at the top of a fresh page.
    pub fn ensure_space(&mut self, required: f64) -> SpaceDecision {
        let (cursor, decision) = ensure_space(self.cursor, required, &self.geometry);
        if decision == SpaceDecision::Break {
            self.break_page();
            debug_assert_eq!(self.cursor, cursor);
        }
        decision
    }

    /// Starts a new page and resets the cursor to the top margin.
    pub fn break_page(&mut self) {
        self.plan.pages.push(Vec::new());
        self.cursor = self.geometry.content_top();
        debug!("page break, continuing on page {}", self.plan.pages.len());
    }

    /// Appends a paint operation to the active page.
    pub fn push(&mut self, op: PaintOp) {
        self.plan
            .pages
            .last_mut()
            .expect("the plan always holds at least one page")
            .push(op);
    }

    /// Records a clickable region on the active page.
    pub fn link(&mut self, x: f64, y: f64, width: f64, height: f64, uri: impl Into<String>) {
        let region = LinkRegion {
            page: self.page_index(),
            x,
            y,
            width,
            height,
            uri: uri.into(),
        };
        self.plan.links.push(region);
    }

    /// Records a section start for the document outline.
    pub fn mark_section(&mut self, title: impl Into<String>) {
        let mark = OutlineMark {
            title: title.into(),
            page: self.page_index(),
        };
        self.plan.outline.push(mark);
    }

    /// The metrics used for painting.
    pub fn metrics(&self) -> &dyn Measure {
        self.measure
    }

    /// Width of `text` in the metrics used for painting.
    pub fn text_width(&self, text: &str, style: Style) -> f64 {
        self.measure.text_width(text, style)
    }

    /// Line height of `style` in the metrics used for painting.
    pub fn line_height(&self, style: Style) -> f64 {
        self.measure.line_height(style)
    }

    /// Finishes the pass and hands out the accumulated plan.
    pub fn finish(self) -> LayoutPlan {
        self.plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::CharMetrics;

    fn geometry() -> PageGeometry {
        PageGeometry {
            page_width: 210.0,
            page_height: 297.0,
            margin_top: 16.0,
            margin_right: 16.0,
            margin_bottom: 16.0,
            margin_left: 16.0,
            footer_reserve: 10.0,
        }
    }

    #[test]
    fn fitting_block_leaves_cursor_unchanged() {
        let geometry = geometry();
        let (cursor, decision) = ensure_space(100.0, 50.0, &geometry);
        assert_eq!(cursor, 100.0);
        assert_eq!(decision, SpaceDecision::Fits);
    }

    #[test]
    fn block_exactly_at_boundary_fits() {
        let geometry = geometry();
        let bottom = geometry.body_bottom();
        let (cursor, decision) = ensure_space(bottom - 30.0, 30.0, &geometry);
        assert_eq!(cursor, bottom - 30.0);
        assert_eq!(decision, SpaceDecision::Fits);
    }

    #[test]
    fn overflowing_block_resets_cursor_to_top_margin() {
        let geometry = geometry();
        let (cursor, decision) = ensure_space(geometry.body_bottom() - 10.0, 30.0, &geometry);
        assert_eq!(cursor, geometry.content_top());
        assert_eq!(decision, SpaceDecision::Break);
    }

    #[test]
    fn context_materializes_the_boundary() {
        let metrics = CharMetrics::default();
        let styles = StyleSheet::default();
        let geometry = geometry();
        let mut ctx = LayoutContext::new(&metrics, &styles, geometry);

        ctx.advance(geometry.body_bottom() - geometry.content_top() - 5.0);
        assert_eq!(ctx.page_index(), 0);

        assert_eq!(ctx.ensure_space(20.0), SpaceDecision::Break);
        assert_eq!(ctx.page_index(), 1);
        assert_eq!(ctx.cursor(), geometry.content_top());
    }

    #[test]
    fn links_attach_to_the_active_page() {
        let metrics = CharMetrics::default();
        let styles = StyleSheet::default();
        let mut ctx = LayoutContext::new(&metrics, &styles, geometry());

        ctx.link(10.0, 20.0, 30.0, 4.0, "https://example.com");
        ctx.break_page();
        ctx.link(10.0, 20.0, 30.0, 4.0, "https://example.org");

        let plan = ctx.finish();
        assert_eq!(plan.links[0].page, 0);
        assert_eq!(plan.links[1].page, 1);
    }
}
