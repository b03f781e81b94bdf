//! The document driver: configuration, layout, painting, post-processing.
//!
//! Rendering runs in distinct stages.  Fonts are resolved first so that the
//! layout pass measures with exactly the metrics that will paint.  The layout
//! pass walks the record once and produces a [`LayoutPlan`]; a painter element
//! then materializes one physical page per planned page through `genpdf`, and
//! the annotation pass injects hyperlinks and the outline into the finished
//! bytes.  A failure in any stage aborts the whole render; partial documents
//! are never returned.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use genpdf::error::{Error as PdfError, ErrorKind};
use genpdf::fonts::{FontCache, FontData, FontFamily};
use genpdf::style::Style;
use genpdf::{render, Element, Margins, Position, RenderResult, SimplePageDecorator, Size};
use log::{debug, info};

use crate::annotate::{self, AnnotateError};
use crate::fonts::{self, FontRequest};
use crate::measure::{mm_from_f64, FontMetrics, Measure};
use crate::model::CvRecord;
use crate::page::{LayoutContext, LayoutPlan, PageGeometry, PaintOp};
use crate::sections;
use crate::style::{ColorScheme, Spacing, StyleSheet};

/// Render configuration with documented defaults: A4 paper, 16 mm margins,
/// the default style sheet, the bundled font family, and today's date for the
/// footer line.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Paper width in millimetres.
    pub paper_width: f64,
    /// Paper height in millimetres.
    pub paper_height: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub styles: StyleSheet,
    pub font: FontRequest,
    /// Date stamped into the footer.  Part of the configuration so a given
    /// record and configuration always render identically.
    pub generated_on: NaiveDate,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            paper_width: 210.0,
            paper_height: 297.0,
            margin_top: 16.0,
            margin_right: 16.0,
            margin_bottom: 16.0,
            margin_left: 16.0,
            styles: StyleSheet::default(),
            font: FontRequest::default(),
            generated_on: chrono::Local::now().date_naive(),
        }
    }
}

impl RenderConfig {
    /// The page geometry derived from paper size, margins, and the footer
    /// reservation.
    pub fn geometry(&self) -> PageGeometry {
        PageGeometry {
            page_width: self.paper_width,
            page_height: self.paper_height,
            margin_top: self.margin_top,
            margin_right: self.margin_right,
            margin_bottom: self.margin_bottom,
            margin_left: self.margin_left,
            footer_reserve: self.styles.spacing.footer_reserve,
        }
    }
}

/// Errors surfaced by [`CvDocument::render`].
#[derive(Debug)]
pub enum RenderError {
    /// No usable font family could be resolved.
    Font(PdfError),
    /// Painting the planned pages failed.
    Render(PdfError),
    /// The annotation pass could not rewrite the rendered bytes.
    Annotate(AnnotateError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Font(err) => write!(f, "Font resolution failed: {err}"),
            Self::Render(err) => write!(f, "Rendering failed: {err}"),
            Self::Annotate(err) => write!(f, "Annotation failed: {err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Font(err) | Self::Render(err) => Some(err),
            Self::Annotate(err) => Some(err),
        }
    }
}

/// A finished document.
pub struct RenderedCv {
    /// The complete PDF.
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// `{firstName}_{lastName}_CV.pdf`, sanitized.
    pub suggested_filename: String,
}

impl RenderedCv {
    /// Writes the document into `directory` under the suggested filename and
    /// returns the full path.
    pub fn save_to(&self, directory: impl AsRef<Path>) -> io::Result<PathBuf> {
        let path = directory.as_ref().join(&self.suggested_filename);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Builder for rendering one [`CvRecord`] into a PDF document.
pub struct CvDocument {
    record: CvRecord,
    config: RenderConfig,
}

impl CvDocument {
    /// Creates a driver for `record` with the default configuration.
    pub fn new(record: CvRecord) -> Self {
        Self {
            record,
            config: RenderConfig::default(),
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides the color scheme.
    pub fn with_colors(mut self, colors: ColorScheme) -> Self {
        self.config.styles.colors = colors;
        self
    }

    /// Overrides the spacing constants.
    pub fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.config.styles.spacing = spacing;
        self
    }

    /// Overrides the full style sheet.
    pub fn with_styles(mut self, styles: StyleSheet) -> Self {
        self.config.styles = styles;
        self
    }

    /// Overrides the font request.
    pub fn with_font(mut self, font: FontRequest) -> Self {
        self.config.font = font;
        self
    }

    /// Overrides the footer date.
    pub fn with_generated_on(mut self, date: NaiveDate) -> Self {
        self.config.generated_on = date;
        self
    }

    /// Renders the record to a finished PDF.
    pub fn render(self) -> Result<RenderedCv, RenderError> {
        let family = fonts::resolve_font_family(&self.config.font).map_err(RenderError::Font)?;

        let font_cache = FontCache::new(family.clone());
        let metrics = FontMetrics::new(&font_cache);
        let plan = plan_layout(&self.record, &self.config, &metrics);
        info!(
            "laid out {} page(s), {} link region(s), {} outline mark(s)",
            plan.pages.len(),
            plan.links.len(),
            plan.outline.len()
        );

        let title = format!("{} \u{2014} CV", self.record.full_name());
        let bytes = paint_plan(&plan, &self.config, family, &title).map_err(RenderError::Render)?;
        let bytes = annotate::apply_annotations(
            &bytes,
            &plan.links,
            &plan.outline,
            &self.config.geometry(),
        )
        .map_err(RenderError::Annotate)?;

        Ok(RenderedCv {
            bytes,
            page_count: plan.pages.len(),
            suggested_filename: self.record.suggested_filename(),
        })
    }
}

/// Runs the layout pass alone, without touching any font file, using the
/// provided metrics.  The driver calls this with [`FontMetrics`]; tests can
/// pass any [`Measure`] implementation.
pub fn plan_layout(
    record: &CvRecord,
    config: &RenderConfig,
    measure: &dyn Measure,
) -> LayoutPlan {
    let mut ctx = LayoutContext::new(measure, &config.styles, config.geometry());
    let generated_on = config.generated_on.format("%B %d, %Y").to_string();
    sections::render_document(record, &mut ctx, &generated_on);
    ctx.finish()
}

fn paint_plan(
    plan: &LayoutPlan,
    config: &RenderConfig,
    family: FontFamily<FontData>,
    title: &str,
) -> Result<Vec<u8>, PdfError> {
    let mut document = genpdf::Document::new(family);
    document.set_title(title);
    document.set_minimal_conformance();
    document.set_paper_size(Size::new(
        mm_from_f64(config.paper_width),
        mm_from_f64(config.paper_height),
    ));

    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(Margins::trbl(
        mm_from_f64(config.margin_top),
        mm_from_f64(config.margin_right),
        mm_from_f64(config.margin_bottom),
        mm_from_f64(config.margin_left),
    ));
    document.set_page_decorator(decorator);

    document.push(PagePainter::new(plan.pages.clone(), config.geometry()));

    let mut bytes = Vec::new();
    document.render(&mut bytes)?;
    Ok(bytes)
}

/// Paints one planned page per invocation.  The planned operations carry
/// absolute page coordinates; the painter shifts them into the margin-relative
/// area `genpdf` hands out and reports `has_more` until every page is out.
struct PagePainter {
    pages: Vec<Vec<PaintOp>>,
    geometry: PageGeometry,
    next: usize,
}

impl PagePainter {
    fn new(pages: Vec<Vec<PaintOp>>, geometry: PageGeometry) -> Self {
        Self {
            pages,
            geometry,
            next: 0,
        }
    }
}

impl Element for PagePainter {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, PdfError> {
        let mut result = RenderResult::default();
        let Some(ops) = self.pages.get(self.next) else {
            return Ok(result);
        };
        debug!("painting page {} with {} operation(s)", self.next + 1, ops.len());

        let left = self.geometry.content_left();
        let top = self.geometry.content_top();

        for op in ops {
            match op {
                PaintOp::Text { x, y, runs } => {
                    let Some(first) = runs.first() else {
                        continue;
                    };
                    let position = Position::new(mm_from_f64(x - left), mm_from_f64(y - top));
                    let section_style = style.and(first.style);
                    let mut section = area
                        .text_section(&context.font_cache, position, section_style)
                        .ok_or_else(|| {
                            PdfError::new(
                                "Planned text does not fit on the page",
                                ErrorKind::PageSizeExceeded,
                            )
                        })?;
                    for run in runs {
                        section.print_str(&run.text, style.and(run.style))?;
                    }
                }
                PaintOp::Outline {
                    x,
                    y,
                    width,
                    height,
                    color,
                    chamfer,
                } => {
                    let points = chamfered_outline(
                        x - left,
                        y - top,
                        *width,
                        *height,
                        *chamfer,
                    );
                    area.draw_line(points, Style::new().with_color(*color));
                }
                PaintOp::Rule { x, y, width, color } => {
                    let points = vec![
                        Position::new(mm_from_f64(x - left), mm_from_f64(y - top)),
                        Position::new(mm_from_f64(x - left + width), mm_from_f64(y - top)),
                    ];
                    area.draw_line(points, Style::new().with_color(*color));
                }
            }
        }

        self.next += 1;
        result.size = area.size();
        result.has_more = self.next < self.pages.len();
        Ok(result)
    }
}

/// A closed rectangle path with chamfered corners, in area coordinates.
fn chamfered_outline(x: f64, y: f64, width: f64, height: f64, chamfer: f64) -> Vec<Position> {
    let c = chamfer.min(width / 2.0).min(height / 2.0).max(0.0);
    let points = [
        (x + c, y),
        (x + width - c, y),
        (x + width, y + c),
        (x + width, y + height - c),
        (x + width - c, y + height),
        (x + c, y + height),
        (x, y + height - c),
        (x, y + c),
        (x + c, y),
    ];
    points
        .iter()
        .map(|(px, py)| Position::new(mm_from_f64(*px), mm_from_f64(*py)))
        .collect()
}
