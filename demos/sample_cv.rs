//! Renders a sample CV to the working directory.
//!
//! Fonts must be present under `assets/fonts`, reachable via `CVPRESS_FONTS_DIR`,
//! or installed as one of the known system families before running this demo.

use std::error::Error;

use cvpress::document::CvDocument;
use cvpress::enrich::{self, CvDraft, RepoSummary};
use cvpress::model::{Education, Experience, LanguageEntry, Project};

fn main() -> Result<(), Box<dyn Error>> {
    let manual = CvDraft {
        first_name: Some("Ada".into()),
        last_name: Some("Lovelace".into()),
        email: Some("ada@example.com".into()),
        github: Some("octocat".into()),
        linkedin: Some("ada-lovelace".into()),
        skills: vec!["Rust".into(), "**PostgreSQL**".into(), "Docker".into()],
        education: vec![Education {
            institution: "University of London".into(),
            degree: "BSc Mathematics".into(),
            graduation_date: "2014".into(),
            start_date: Some("2011".into()),
        }],
        experience: vec![Experience {
            company: "Initech".into(),
            position: "Senior Engineer".into(),
            start_date: "2020".into(),
            end_date: "2024".into(),
            summary: Some("Led the rewrite of the **reporting pipeline**.".into()),
            projects: vec![Project {
                name: "report-engine".into(),
                description: "Batch renderer for customer statements.".into(),
                technologies: vec!["Rust".into(), "PostgreSQL".into()],
                ..Project::default()
            }],
        }],
        languages: vec![
            LanguageEntry::new("English", "Native"),
            LanguageEntry::new("French", "Intermediate"),
        ],
        ..CvDraft::default()
    };

    // A typical model completion: prose around a fenced JSON payload.
    let completion = r#"Here is the polished record:
```json
{
  "about": "Engineer focused on reliable document tooling and long-lived data models.",
  "skills": ["rust", "AWS", "Terraform"]
}
```"#;
    let enhanced = enrich::parse_completion(completion).unwrap_or_default();
    let mut draft = enrich::reconcile(&manual, &enhanced);

    // Projects fetched from public repository metadata.
    draft.projects.push(Project::from(RepoSummary {
        name: "spoon-knife".into(),
        description: Some("A fork playground used for demos.".into()),
        languages: vec!["JavaScript".into()],
        stars: 12000,
        forks: 140000,
        technologies: vec!["Git".into()],
        url: Some("octocat/Spoon-Knife".into()),
    }));

    let record = draft.into_record()?;
    let rendered = CvDocument::new(record).render()?;
    let path = rendered.save_to(".")?;
    println!(
        "Wrote {} ({} page(s), {} bytes)",
        path.display(),
        rendered.page_count,
        rendered.bytes.len()
    );
    Ok(())
}
