//! The section renderers and their fixed invocation order.
//!
//! Each renderer reads one slice of the record and paints through the layout
//! context: Header/Contact, About, Skills, Experience, Education, Projects,
//! Languages, then the footer line.  A section whose data is absent or empty
//! paints nothing and leaves the cursor untouched.

use crate::flow;
use crate::model::{CvRecord, Education, Experience, Project};
use crate::page::{LayoutContext, PaintOp, SpaceDecision, TextRun};

/// Runs every section renderer in order against the given context.
/// `generated_on` is the preformatted date for the footer line.
pub fn render_document(record: &CvRecord, ctx: &mut LayoutContext, generated_on: &str) {
    render_header(record, ctx);
    render_about(record, ctx);
    render_skills(record, ctx);
    render_experience(record, ctx);
    render_education(record, ctx);
    render_projects(record, ctx);
    render_languages(record, ctx);
    render_footer(ctx, generated_on);
}

/// Paints a section title with its accent rule.  `lead` is the height of the
/// first content block after the heading, kept on the same page as the title.
fn section_heading(ctx: &mut LayoutContext, title: &str, lead: f64) {
    let styles = ctx.styles;
    let spacing = styles.spacing;
    let style = styles.section_heading();
    let heading_h = ctx.line_height(style);
    let block = heading_h + spacing.heading_rule_gap + spacing.after_heading + lead;

    if ctx.ensure_space(spacing.section_gap + block) == SpaceDecision::Fits {
        ctx.advance(spacing.section_gap);
    }
    ctx.mark_section(title);

    let left = ctx.geometry().content_left();
    let width = ctx.geometry().content_width();
    ctx.push(PaintOp::Text {
        x: left,
        y: ctx.cursor(),
        runs: vec![TextRun::new(title, style)],
    });
    ctx.advance(heading_h + spacing.heading_rule_gap);
    ctx.push(PaintOp::Rule {
        x: left,
        y: ctx.cursor(),
        width,
        color: styles.colors.rule,
    });
    ctx.advance(spacing.after_heading);
}

/// Paints an entry heading row: a left label and an optional right-aligned
/// label sharing the same baseline.
fn paint_heading_row(
    ctx: &mut LayoutContext,
    left_text: &str,
    left_style: genpdf::style::Style,
    right_text: &str,
    right_style: genpdf::style::Style,
) {
    let y = ctx.cursor();
    let left = ctx.geometry().content_left();
    let right = ctx.geometry().content_right();

    ctx.push(PaintOp::Text {
        x: left,
        y,
        runs: vec![TextRun::new(left_text, left_style)],
    });
    if !right_text.is_empty() {
        let width = ctx.text_width(right_text, right_style);
        let drop = (ctx.line_height(left_style) - ctx.line_height(right_style)).max(0.0);
        ctx.push(PaintOp::Text {
            x: right - width,
            y: y + drop,
            runs: vec![TextRun::new(right_text, right_style)],
        });
    }
}

fn render_header(record: &CvRecord, ctx: &mut LayoutContext) {
    let styles = ctx.styles;
    let spacing = styles.spacing;
    let geometry = *ctx.geometry();

    let name_style = styles.name();
    let name_h = ctx.line_height(name_style);
    ctx.push(PaintOp::Text {
        x: geometry.content_left(),
        y: ctx.cursor(),
        runs: vec![TextRun::new(record.full_name(), name_style)],
    });
    ctx.advance(name_h + spacing.name_gap);

    let mut cells: Vec<(String, String)> = Vec::new();
    let email = record.email.trim();
    if !email.is_empty() {
        cells.push((email.to_string(), format!("mailto:{}", email)));
    }
    if let Some(phone) = record
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|phone| !phone.is_empty())
    {
        let target: String = phone
            .chars()
            .filter(|ch| !ch.is_whitespace() && *ch != '(' && *ch != ')')
            .collect();
        cells.push((phone.to_string(), format!("tel:{}", target)));
    }
    if let Some(url) = record.github_url() {
        let label = record.github.as_deref().unwrap_or_default().trim();
        cells.push((label.to_string(), url));
    }
    if let Some(url) = record.linkedin_url() {
        let label = record.linkedin.as_deref().unwrap_or_default().trim();
        cells.push((label.to_string(), url));
    }
    if cells.is_empty() {
        return;
    }

    let contact_style = styles.link();
    let line_h = ctx.line_height(contact_style);
    let rows = (cells.len() + 1) / 2;
    let grid_h = rows as f64 * spacing.contact_row;
    ctx.ensure_space(grid_h);

    let base = ctx.cursor();
    let column_width = geometry.content_width() / 2.0;
    for (index, (label, uri)) in cells.iter().enumerate() {
        let column = index % 2;
        let row = index / 2;
        let x = geometry.content_left() + column as f64 * column_width;
        let y = base + row as f64 * spacing.contact_row;
        let width = ctx.text_width(label, contact_style);
        ctx.push(PaintOp::Text {
            x,
            y,
            runs: vec![TextRun::new(label.clone(), contact_style)],
        });
        ctx.link(x, y, width, line_h, uri.clone());
    }
    ctx.advance(grid_h);
}

fn render_about(record: &CvRecord, ctx: &mut LayoutContext) {
    let Some(about) = record
        .about
        .as_deref()
        .map(str::trim)
        .filter(|about| !about.is_empty())
    else {
        return;
    };

    let body = ctx.styles.body();
    let lead = ctx.line_height(body);
    section_heading(ctx, "About", lead);

    let left = ctx.geometry().content_left();
    let width = ctx.geometry().content_width();
    flow::paint_paragraph(ctx, about, left, width, body);
}

fn render_skills(record: &CvRecord, ctx: &mut LayoutContext) {
    let styles = ctx.styles;
    let badge = styles.badge();
    let left = ctx.geometry().content_left();
    let width = ctx.geometry().content_width();

    let placements = flow::badge_rows(
        &record.skills,
        left,
        width,
        badge,
        ctx.metrics(),
        &styles.spacing,
    );
    if placements.is_empty() {
        return;
    }

    let lead = flow::badge_row_height(ctx, badge);
    section_heading(ctx, "Skills", lead);
    flow::paint_badge_rows(ctx, &placements, badge);
}

fn render_experience(record: &CvRecord, ctx: &mut LayoutContext) {
    if record.experience.is_empty() {
        return;
    }

    let styles = ctx.styles;
    let spacing = styles.spacing;
    let heading = styles.entry_heading();
    let body = styles.body();
    let lead =
        ctx.line_height(heading) + spacing.paragraph_gap + ctx.line_height(body);
    section_heading(ctx, "Experience", lead);

    for (index, entry) in record.experience.iter().enumerate() {
        if index > 0 {
            ctx.advance(spacing.entry_gap);
        }
        render_experience_entry(entry, ctx);
    }
}

fn render_experience_entry(entry: &Experience, ctx: &mut LayoutContext) {
    let styles = ctx.styles;
    let spacing = styles.spacing;
    let heading = styles.entry_heading();
    let meta = styles.meta();
    let body = styles.body();
    let geometry = *ctx.geometry();

    let heading_h = ctx.line_height(heading);
    let body_h = ctx.line_height(body);
    ctx.ensure_space(heading_h + spacing.paragraph_gap + body_h);

    let title = format!("{} at {}", entry.position, entry.company);
    paint_heading_row(ctx, &title, heading, &entry.date_label(), meta);
    ctx.advance(heading_h);

    if let Some(summary) = entry
        .summary
        .as_deref()
        .map(str::trim)
        .filter(|summary| !summary.is_empty())
    {
        ctx.advance(spacing.paragraph_gap);
        flow::paint_paragraph(
            ctx,
            summary,
            geometry.content_left(),
            geometry.content_width(),
            body,
        );
    }

    for project in &entry.projects {
        render_nested_project(project, ctx);
    }
}

fn render_nested_project(project: &Project, ctx: &mut LayoutContext) {
    let styles = ctx.styles;
    let spacing = styles.spacing;
    let bullet = styles.sub_heading();
    let body = styles.body();
    let badge = styles.badge();
    let geometry = *ctx.geometry();

    let x = geometry.content_left() + spacing.indent;
    let width = geometry.content_width() - spacing.indent;
    let bullet_h = ctx.line_height(bullet);
    let body_h = ctx.line_height(body);

    ctx.advance(spacing.paragraph_gap);
    ctx.ensure_space(bullet_h + body_h);
    ctx.push(PaintOp::Text {
        x,
        y: ctx.cursor(),
        runs: vec![TextRun::new(format!("\u{2022} {}", project.name), bullet)],
    });
    ctx.advance(bullet_h);

    if !project.description.trim().is_empty() {
        flow::paint_paragraph(ctx, &project.description, x, width, body);
    }

    let placements = flow::badge_rows(
        &project.technologies,
        x,
        width,
        badge,
        ctx.metrics(),
        &spacing,
    );
    if !placements.is_empty() {
        ctx.advance(spacing.badge_row_gap);
        flow::paint_badge_rows(ctx, &placements, badge);
    }
}

fn render_education(record: &CvRecord, ctx: &mut LayoutContext) {
    if record.education.is_empty() {
        return;
    }

    let styles = ctx.styles;
    let spacing = styles.spacing;
    let heading = styles.entry_heading();
    let body = styles.body();
    let lead = ctx.line_height(heading) + ctx.line_height(body);
    section_heading(ctx, "Education", lead);

    for (index, entry) in record.education.iter().enumerate() {
        if index > 0 {
            ctx.advance(spacing.entry_gap);
        }
        render_education_entry(entry, ctx);
    }
}

fn render_education_entry(entry: &Education, ctx: &mut LayoutContext) {
    let styles = ctx.styles;
    let heading = styles.entry_heading();
    let meta = styles.meta();
    let body = styles.body();
    let geometry = *ctx.geometry();

    let heading_h = ctx.line_height(heading);
    let body_h = ctx.line_height(body);
    ctx.ensure_space(heading_h + body_h);

    paint_heading_row(ctx, &entry.institution, heading, &entry.date_label(), meta);
    ctx.advance(heading_h);

    if !entry.degree.trim().is_empty() {
        flow::paint_paragraph(
            ctx,
            &entry.degree,
            geometry.content_left(),
            geometry.content_width(),
            body,
        );
    }
}

fn render_projects(record: &CvRecord, ctx: &mut LayoutContext) {
    if record.projects.is_empty() {
        return;
    }

    let styles = ctx.styles;
    let spacing = styles.spacing;
    let heading_h = ctx.line_height(styles.entry_heading());
    let body_h = ctx.line_height(styles.body());
    let panel_h = heading_h + 2.0 * spacing.panel_pad;
    let lead = panel_h + spacing.paragraph_gap + body_h;
    section_heading(ctx, "Projects", lead);

    for (index, project) in record.projects.iter().enumerate() {
        if index > 0 {
            ctx.advance(spacing.entry_gap);
        }
        render_project_entry(project, ctx);
    }
}

fn render_project_entry(project: &Project, ctx: &mut LayoutContext) {
    let styles = ctx.styles;
    let spacing = styles.spacing;
    let body = styles.body();
    let badge = styles.badge();
    let geometry = *ctx.geometry();
    let left = geometry.content_left();
    let right = geometry.content_right();
    let width = geometry.content_width();

    let link_url = project.link_url();
    let heading_style = if link_url.is_some() {
        styles.entry_heading_link()
    } else {
        styles.entry_heading()
    };
    let heading_h = ctx.line_height(styles.entry_heading());
    let body_h = ctx.line_height(body);
    let panel_h = heading_h + 2.0 * spacing.panel_pad;
    ctx.ensure_space(panel_h + spacing.paragraph_gap + body_h);

    let top = ctx.cursor();
    ctx.push(PaintOp::Outline {
        x: left,
        y: top,
        width,
        height: panel_h,
        color: styles.colors.panel,
        chamfer: spacing.panel_chamfer,
    });

    let text_x = left + spacing.badge_hpad;
    let text_y = top + spacing.panel_pad;
    let name_width = ctx.text_width(&project.name, heading_style);
    ctx.push(PaintOp::Text {
        x: text_x,
        y: text_y,
        runs: vec![TextRun::new(project.name.clone(), heading_style)],
    });
    if let Some(url) = link_url {
        ctx.link(text_x, text_y, name_width, heading_h, url);
    }

    if let Some(handle) = project
        .github
        .as_deref()
        .map(str::trim)
        .filter(|handle| !handle.is_empty())
    {
        let handle_style = styles.link();
        let handle_width = ctx.text_width(handle, handle_style);
        let handle_h = ctx.line_height(handle_style);
        let drop = (heading_h - handle_h).max(0.0);
        let x = right - spacing.badge_hpad - handle_width;
        ctx.push(PaintOp::Text {
            x,
            y: text_y + drop,
            runs: vec![TextRun::new(handle, handle_style)],
        });
        if let Some(url) = project.github_url() {
            ctx.link(x, text_y + drop, handle_width, handle_h, url);
        }
    }
    ctx.advance(panel_h);

    if !project.description.trim().is_empty() {
        ctx.advance(spacing.paragraph_gap);
        flow::paint_paragraph(ctx, &project.description, left, width, body);
    }

    let placements = flow::badge_rows(
        &project.technologies,
        left,
        width,
        badge,
        ctx.metrics(),
        &spacing,
    );
    if !placements.is_empty() {
        ctx.advance(spacing.badge_row_gap);
        flow::paint_badge_rows(ctx, &placements, badge);
    }
}

fn render_languages(record: &CvRecord, ctx: &mut LayoutContext) {
    let labels: Vec<String> = record
        .languages
        .iter()
        .filter(|entry| !entry.name.trim().is_empty())
        .map(|entry| {
            if entry.level.trim().is_empty() {
                entry.name.trim().to_string()
            } else {
                format!("{} \u{00b7} {}", entry.name.trim(), entry.level.trim())
            }
        })
        .collect();
    if labels.is_empty() {
        return;
    }

    let styles = ctx.styles;
    let badge = styles.badge();
    let lead = flow::badge_row_height(ctx, badge);
    section_heading(ctx, "Languages", lead);
    flow::paint_badge_grid(ctx, &labels, styles.spacing.grid_columns, badge);
}

fn render_footer(ctx: &mut LayoutContext, generated_on: &str) {
    let styles = ctx.styles;
    let geometry = *ctx.geometry();
    let style = styles.footer();

    let text = format!("Generated on {}", generated_on);
    let line_h = ctx.line_height(style);
    let width = ctx.text_width(&text, style);
    let x = geometry.content_left() + (geometry.content_width() - width) / 2.0;
    let y = geometry.content_bottom() - styles.spacing.footer_offset - line_h;
    ctx.push(PaintOp::Text {
        x,
        y,
        runs: vec![TextRun::new(text, style)],
    });
}
