//! Typography presets, spacing constants, and the color scheme.
//!
//! Every renderer draws through the presets defined here, so the visual
//! identity of the document lives in one place.  All lengths are millimetres,
//! font sizes are points.

use genpdf::style::{Color, Style};

/// Named colors used across the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorScheme {
    pub text: Color,
    pub heading: Color,
    pub muted: Color,
    pub accent: Color,
    pub link: Color,
    pub badge_text: Color,
    pub badge_border: Color,
    pub panel: Color,
    pub rule: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            text: Color::Rgb(55, 65, 81),
            heading: Color::Rgb(17, 24, 39),
            muted: Color::Rgb(107, 114, 128),
            accent: Color::Rgb(37, 99, 235),
            link: Color::Rgb(37, 99, 235),
            badge_text: Color::Rgb(31, 41, 55),
            badge_border: Color::Rgb(156, 163, 175),
            panel: Color::Rgb(209, 213, 219),
            rule: Color::Rgb(209, 213, 219),
        }
    }
}

/// Font sizes in points for the named presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontSizes {
    pub name: u8,
    pub section_heading: u8,
    pub entry_heading: u8,
    pub body: u8,
    pub meta: u8,
    pub badge: u8,
    pub footer: u8,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            name: 22,
            section_heading: 13,
            entry_heading: 11,
            body: 10,
            meta: 9,
            badge: 9,
            footer: 8,
        }
    }
}

/// Vertical and horizontal spacing constants in millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spacing {
    /// Gap above each section heading.
    pub section_gap: f64,
    /// Gap between a section heading and its accent rule.
    pub heading_rule_gap: f64,
    /// Gap between a section heading block and the section body.
    pub after_heading: f64,
    /// Gap between consecutive entries within a section.
    pub entry_gap: f64,
    /// Gap between a heading row and a following paragraph.
    pub paragraph_gap: f64,
    /// Gap after the name line in the header.
    pub name_gap: f64,
    /// Row height of the two-column contact grid.
    pub contact_row: f64,
    /// Horizontal padding inside a badge.
    pub badge_hpad: f64,
    /// Vertical padding inside a badge.
    pub badge_vpad: f64,
    /// Horizontal gap between badges in a row.
    pub badge_gap: f64,
    /// Vertical gap between badge rows.
    pub badge_row_gap: f64,
    /// Corner chamfer of the badge outline.
    pub badge_chamfer: f64,
    /// Indentation of nested project blocks.
    pub indent: f64,
    /// Padding of the panel behind a project heading row.
    pub panel_pad: f64,
    /// Corner chamfer of the project panel outline.
    pub panel_chamfer: f64,
    /// Columns in the languages grid.
    pub grid_columns: usize,
    /// Height reserved above the bottom margin for the footer line.
    pub footer_reserve: f64,
    /// Distance between the body boundary and the footer baseline.
    pub footer_offset: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            section_gap: 6.0,
            heading_rule_gap: 1.2,
            after_heading: 3.0,
            entry_gap: 3.4,
            paragraph_gap: 1.6,
            name_gap: 2.0,
            contact_row: 5.4,
            badge_hpad: 2.4,
            badge_vpad: 0.8,
            badge_gap: 2.0,
            badge_row_gap: 1.6,
            badge_chamfer: 1.0,
            indent: 5.0,
            panel_pad: 1.2,
            panel_chamfer: 1.2,
            grid_columns: 3,
            footer_reserve: 10.0,
            footer_offset: 4.0,
        }
    }
}

/// The complete style configuration consumed by the section renderers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleSheet {
    pub colors: ColorScheme,
    pub sizes: FontSizes,
    pub spacing: Spacing,
}

impl StyleSheet {
    /// The name line at the top of the document.
    pub fn name(&self) -> Style {
        bold(preset(self.sizes.name, self.colors.heading))
    }

    /// Contact grid cells.
    pub fn contact(&self) -> Style {
        preset(self.sizes.meta, self.colors.muted)
    }

    /// Clickable contact cells and inline links.
    pub fn link(&self) -> Style {
        preset(self.sizes.meta, self.colors.link)
    }

    /// Section titles.
    pub fn section_heading(&self) -> Style {
        bold(preset(self.sizes.section_heading, self.colors.heading))
    }

    /// Entry heading rows (experience positions, institutions, project names).
    pub fn entry_heading(&self) -> Style {
        bold(preset(self.sizes.entry_heading, self.colors.heading))
    }

    /// Project names rendered as hyperlinks.
    pub fn entry_heading_link(&self) -> Style {
        bold(preset(self.sizes.entry_heading, self.colors.link))
    }

    /// Bullet headings of nested project entries.
    pub fn sub_heading(&self) -> Style {
        bold(preset(self.sizes.body, self.colors.heading))
    }

    /// Right-aligned date ranges and similar secondary labels.
    pub fn meta(&self) -> Style {
        preset(self.sizes.meta, self.colors.muted)
    }

    /// Body paragraphs.
    pub fn body(&self) -> Style {
        preset(self.sizes.body, self.colors.text)
    }

    /// Badge labels.
    pub fn badge(&self) -> Style {
        preset(self.sizes.badge, self.colors.badge_text)
    }

    /// The footer line on the last page.
    pub fn footer(&self) -> Style {
        preset(self.sizes.footer, self.colors.muted)
    }
}

/// Returns `style` with the bold flag set, used for emphasized runs.
pub fn emphasized(style: Style) -> Style {
    bold(style)
}

fn preset(font_size: u8, color: Color) -> Style {
    let mut style = Style::new();
    style.set_font_size(font_size);
    style.set_color(color);
    style
}

fn bold(mut style: Style) -> Style {
    style.set_bold();
    style
}
