use chrono::NaiveDate;

use cvpress::document::{plan_layout, RenderConfig};
use cvpress::measure::CharMetrics;
use cvpress::model::{CvRecord, Experience, Project};
use cvpress::page::{LayoutPlan, PaintOp};

fn config() -> RenderConfig {
    RenderConfig {
        generated_on: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        ..RenderConfig::default()
    }
}

fn narrow_config() -> RenderConfig {
    RenderConfig {
        paper_width: 80.0,
        ..config()
    }
}

fn base_record() -> CvRecord {
    CvRecord::new("Ada", "Lovelace", "ada@example.com")
}

fn page_texts(plan: &LayoutPlan, page: usize) -> Vec<String> {
    plan.pages[page]
        .iter()
        .filter_map(|op| match op {
            PaintOp::Text { runs, .. } => Some(
                runs.iter()
                    .map(|run| run.text.as_str())
                    .collect::<String>(),
            ),
            _ => None,
        })
        .collect()
}

fn page_of(plan: &LayoutPlan, needle: &str) -> Option<usize> {
    (0..plan.pages.len()).find(|page| {
        page_texts(plan, *page)
            .iter()
            .any(|text| text.contains(needle))
    })
}

#[test]
fn narrow_page_wraps_skills_onto_aligned_rows() {
    let mut record = base_record();
    record.skills = vec![
        "JavaScript".into(),
        "**React**".into(),
        "Node.js".into(),
        "PostgreSQL".into(),
        "Docker".into(),
        "AWS".into(),
    ];

    let metrics = CharMetrics::default();
    let config = narrow_config();
    let plan = plan_layout(&record, &config, &metrics);

    let mut badge_positions: Vec<(f64, f64)> = plan
        .pages
        .iter()
        .flatten()
        .filter_map(|op| match op {
            PaintOp::Outline { x, y, .. } => Some((*y, *x)),
            _ => None,
        })
        .collect();
    badge_positions.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut rows: Vec<(f64, f64)> = Vec::new();
    for (y, x) in badge_positions {
        match rows.last() {
            Some((last_y, _)) if (*last_y - y).abs() < 1e-9 => {}
            _ => rows.push((y, x)),
        }
    }

    assert!(rows.len() >= 2, "six skills on a narrow page need two rows");
    let origin = config.geometry().content_left();
    for (_, first_x) in &rows {
        assert_eq!(*first_x, origin, "each row starts at the horizontal origin");
    }
}

#[test]
fn overflow_breaks_between_entries_not_inside_them() {
    let mut record = base_record();
    for index in 0..18 {
        record.experience.push(Experience {
            company: "Initech".into(),
            position: format!("Engineer {index}"),
            start_date: "2020".into(),
            end_date: "2024".into(),
            summary: Some(
                "Maintained deployment tooling and reviewed changes across three teams."
                    .into(),
            ),
            projects: Vec::new(),
        });
    }

    let metrics = CharMetrics::default();
    let plan = plan_layout(&record, &config(), &metrics);
    assert!(plan.pages.len() > 1, "eighteen entries exceed one page");

    for index in 0..18 {
        let heading = format!("Engineer {index} at Initech");
        let heading_page = page_of(&plan, &heading).expect("heading painted");
        let texts = page_texts(&plan, heading_page);
        let heading_at = texts
            .iter()
            .position(|text| text.contains(&heading))
            .unwrap();
        assert!(
            texts[heading_at + 1..]
                .iter()
                .any(|text| text.contains("Maintained deployment tooling")),
            "entry heading on page {heading_page} must keep its first summary line"
        );
    }
}

#[test]
fn github_links_normalize_only_when_schemeless() {
    let mut record = base_record();
    record.projects = vec![
        Project {
            name: "spoon-knife".into(),
            description: "Fork playground.".into(),
            github: Some("octocat".into()),
            ..Project::default()
        },
        Project {
            name: "hello-world".into(),
            description: "First repository.".into(),
            github: Some("https://github.com/octocat".into()),
            ..Project::default()
        },
    ];

    let metrics = CharMetrics::default();
    let plan = plan_layout(&record, &config(), &metrics);

    let github_targets: Vec<&str> = plan
        .links
        .iter()
        .map(|link| link.uri.as_str())
        .filter(|uri| uri.contains("github.com"))
        .collect();
    assert!(!github_targets.is_empty());
    assert!(github_targets
        .iter()
        .all(|uri| *uri == "https://github.com/octocat"));
}

#[test]
fn planning_twice_yields_the_same_plan() {
    let mut record = base_record();
    record.about = Some("Wrote the **first** published algorithm.".into());
    record.skills = vec!["Analysis".into(), "Poetry of numbers".into()];
    record.github = Some("octocat".into());

    let metrics = CharMetrics::default();
    let config = config();
    let first = plan_layout(&record, &config, &metrics);
    let second = plan_layout(&record, &config, &metrics);

    assert_eq!(first.pages.len(), second.pages.len());
    assert_eq!(first.links, second.links);
    assert_eq!(first.outline, second.outline);
    assert_eq!(format!("{:?}", first.pages), format!("{:?}", second.pages));
}

#[test]
fn footer_appears_once_on_the_last_page() {
    let mut record = base_record();
    for index in 0..20 {
        record.experience.push(Experience {
            company: "Initech".into(),
            position: format!("Engineer {index}"),
            start_date: "2020".into(),
            end_date: "2024".into(),
            summary: Some("Shipped quarterly platform releases.".into()),
            projects: Vec::new(),
        });
    }

    let metrics = CharMetrics::default();
    let plan = plan_layout(&record, &config(), &metrics);
    assert!(plan.pages.len() > 1);

    let last = plan.pages.len() - 1;
    for page in 0..plan.pages.len() {
        let found = page_texts(&plan, page)
            .iter()
            .any(|text| text.contains("Generated on January 01, 2026"));
        assert_eq!(found, page == last, "footer only on the final page");
    }
}
