//! Flow layout for badges and paragraphs.
//!
//! Badges flow left to right and wrap onto a new row when the next badge would
//! cross the right boundary; rows are atomic with respect to page breaks.
//! Paragraphs wrap on word boundaries without hyphenation; each wrapped line
//! is re-segmented for emphasis and painted run by run, because emphasis
//! changes the font metrics mid-line.

use genpdf::style::Style;

use crate::measure::Measure;
use crate::page::{LayoutContext, PaintOp, TextRun};
use crate::segment;
use crate::style::{emphasized, Spacing};

/// A badge placed by the flow algorithm, before painting.
#[derive(Clone, Debug, PartialEq)]
pub struct BadgePlacement {
    /// Zero-based row index within the badge block.
    pub row: usize,
    /// Left edge in absolute page millimetres.
    pub x: f64,
    /// Full badge width including the horizontal padding.
    pub width: f64,
    /// Visible label with emphasis delimiters stripped.
    pub text: String,
    /// Whether the whole badge paints bold.
    pub bold: bool,
}

/// Assigns badges to rows within `max_width`, starting every row at
/// `origin_x`.
///
/// A label whose badge alone is wider than `max_width` still gets placed: it
/// opens its own row and overflows the boundary rather than being split.
/// Blank labels are dropped.  Widths are measured with the style that paints
/// the badge, bold for labels carrying an emphasis pair.
pub fn badge_rows<S: AsRef<str>>(
    labels: &[S],
    origin_x: f64,
    max_width: f64,
    style: Style,
    measure: &dyn Measure,
    spacing: &Spacing,
) -> Vec<BadgePlacement> {
    let mut placements = Vec::new();
    let mut current_x = origin_x;
    let mut row = 0;

    for label in labels {
        let (text, bold) = segment::visible_text(label.as_ref());
        if text.trim().is_empty() {
            continue;
        }
        let badge_style = if bold { emphasized(style) } else { style };
        let width = measure.text_width(&text, badge_style) + 2.0 * spacing.badge_hpad;

        if current_x + width > origin_x + max_width && current_x > origin_x {
            current_x = origin_x;
            row += 1;
        }

        placements.push(BadgePlacement {
            row,
            x: current_x,
            width,
            text,
            bold,
        });
        current_x += width + spacing.badge_gap;
    }

    placements
}

/// Height of one badge row for `style`, outline plus the inter-row gap.
pub fn badge_row_height(ctx: &LayoutContext, style: Style) -> f64 {
    let spacing = ctx.styles.spacing;
    badge_height(ctx, style, &spacing) + spacing.badge_row_gap
}

fn badge_height(ctx: &LayoutContext, style: Style, spacing: &Spacing) -> f64 {
    ctx.line_height(style) + 2.0 * spacing.badge_vpad
}

/// Paints placed badges row by row, advancing the cursor.
///
/// Each row is checked against the page boundary before it is painted, so a
/// long badge block spills across pages between rows, never through one.
pub fn paint_badge_rows(ctx: &mut LayoutContext, placements: &[BadgePlacement], style: Style) {
    if placements.is_empty() {
        return;
    }

    let spacing = ctx.styles.spacing;
    let border = ctx.styles.colors.badge_border;
    let badge_h = badge_height(ctx, style, &spacing);
    let row_h = badge_h + spacing.badge_row_gap;

    let mut current_row = placements[0].row;
    ctx.ensure_space(row_h);
    let mut top = ctx.cursor();

    for placement in placements {
        if placement.row != current_row {
            current_row = placement.row;
            ctx.advance(row_h);
            ctx.ensure_space(row_h);
            top = ctx.cursor();
        }
        paint_badge(ctx, placement, style, top, badge_h, &spacing, border);
    }

    ctx.advance(row_h);
}

/// Paints badges in a fixed grid of `columns` per row, indexed by position
/// rather than measured width.  Used for the languages section.
pub fn paint_badge_grid<S: AsRef<str>>(
    ctx: &mut LayoutContext,
    labels: &[S],
    columns: usize,
    style: Style,
) {
    let columns = columns.max(1);
    let spacing = ctx.styles.spacing;
    let border = ctx.styles.colors.badge_border;
    let badge_h = badge_height(ctx, style, &spacing);
    let row_h = badge_h + spacing.badge_row_gap;
    let origin_x = ctx.geometry().content_left();
    let column_width = ctx.geometry().content_width() / columns as f64;

    let mut painted = 0usize;
    let mut top = ctx.cursor();

    for label in labels {
        let (text, bold) = segment::visible_text(label.as_ref());
        if text.trim().is_empty() {
            continue;
        }

        let column = painted % columns;
        if column == 0 {
            if painted > 0 {
                ctx.advance(row_h);
            }
            ctx.ensure_space(row_h);
            top = ctx.cursor();
        }

        let badge_style = if bold { emphasized(style) } else { style };
        let width = ctx.text_width(&text, badge_style) + 2.0 * spacing.badge_hpad;
        let placement = BadgePlacement {
            row: painted / columns,
            x: origin_x + column as f64 * column_width,
            width,
            text,
            bold,
        };
        paint_badge(ctx, &placement, style, top, badge_h, &spacing, border);
        painted += 1;
    }

    if painted > 0 {
        ctx.advance(row_h);
    }
}

fn paint_badge(
    ctx: &mut LayoutContext,
    placement: &BadgePlacement,
    style: Style,
    top: f64,
    badge_h: f64,
    spacing: &Spacing,
    border: genpdf::style::Color,
) {
    let badge_style = if placement.bold {
        emphasized(style)
    } else {
        style
    };
    ctx.push(PaintOp::Outline {
        x: placement.x,
        y: top,
        width: placement.width,
        height: badge_h,
        color: border,
        chamfer: spacing.badge_chamfer,
    });
    ctx.push(PaintOp::Text {
        x: placement.x + spacing.badge_hpad,
        y: top + spacing.badge_vpad,
        runs: vec![TextRun::new(placement.text.clone(), badge_style)],
    });
}

/// Wraps `text` to `max_width` on word boundaries, without hyphenation.
///
/// Explicit newlines force breaks.  A single word wider than `max_width`
/// stays whole on its own line and overflows rather than being split.
pub fn wrap_text(text: &str, max_width: f64, style: Style, measure: &dyn Measure) -> Vec<String> {
    let space_width = measure.text_width(" ", style);
    let mut lines = Vec::new();

    for block in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0.0;

        for word in block.split_whitespace() {
            let word_width = measure.text_width(word, style);
            if line.is_empty() {
                line.push_str(word);
                line_width = word_width;
            } else if line_width + space_width + word_width > max_width {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
                line_width = word_width;
            } else {
                line.push(' ');
                line.push_str(word);
                line_width += space_width + word_width;
            }
        }

        if !line.is_empty() {
            lines.push(line);
        }
    }

    lines
}

/// Wraps and paints a paragraph at `x`, advancing the cursor by one line
/// height per painted line.  Returns the total vertical extent consumed.
///
/// Lines are atomic: the page boundary is re-checked per line, so a long
/// paragraph spills across pages between lines.  Each line is re-segmented so
/// emphasized runs paint with their own metrics.
pub fn paint_paragraph(
    ctx: &mut LayoutContext,
    text: &str,
    x: f64,
    max_width: f64,
    style: Style,
) -> f64 {
    let line_h = ctx.line_height(style);
    let lines = wrap_text(text, max_width, style, ctx.metrics());
    for line in &lines {
        ctx.ensure_space(line_h);
        let runs = segment::segment(line)
            .into_iter()
            .map(|run| {
                let run_style = if run.emphasized {
                    emphasized(style)
                } else {
                    style
                };
                TextRun::new(run.text, run_style)
            })
            .collect();
        ctx.push(PaintOp::Text {
            x,
            y: ctx.cursor(),
            runs,
        });
        ctx.advance(line_h);
    }
    line_h * lines.len() as f64
}
