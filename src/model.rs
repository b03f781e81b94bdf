//! Data structures describing the content of a CV document.
//!
//! The types in this module form a serialization-friendly model that the
//! layout engine consumes read-only.  They intentionally avoid referencing the
//! rendering crate so that records can be produced by frontends, persisted, or
//! exchanged over the network without pulling in heavy dependencies.  Field
//! names serialize in camelCase to match the JSON exchanged with enrichment
//! services.

use serde::{Deserialize, Serialize};

/// A fully assembled CV record.
///
/// `first_name`, `last_name`, and `email` are required; everything else is
/// optional or defaults to empty.  The record is immutable input to the layout
/// engine: renderers derive display values (such as normalized link targets)
/// on the fly and never write back into the record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// GitHub handle or profile URL.
    #[serde(default)]
    pub github: Option<String>,
    /// LinkedIn handle or profile URL.
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    /// Ordered skill labels.  A label may carry one `**...**` emphasis pair,
    /// which renders the whole badge in bold.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Language/proficiency pairs.  Names are unique; the stored order is the
    /// render order.
    #[serde(default)]
    pub languages: Vec<LanguageEntry>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl CvRecord {
    /// Creates a record with the required fields set and everything else
    /// empty.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Returns `"{first} {last}"` with surrounding whitespace trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Suggested output filename, `{firstName}_{lastName}_CV.pdf`, reduced to
    /// a filesystem-safe subset.
    pub fn suggested_filename(&self) -> String {
        let stem = format!("{}_{}_CV", self.first_name.trim(), self.last_name.trim());
        let mut sanitized = String::with_capacity(stem.len());
        for ch in stem.chars() {
            if ch.is_alphanumeric() || ch == '-' || ch == '_' {
                sanitized.push(ch);
            } else if ch.is_whitespace() {
                sanitized.push('_');
            }
        }
        sanitized.push_str(".pdf");
        sanitized
    }

    /// The GitHub profile URL for the contact grid, if a handle is present.
    pub fn github_url(&self) -> Option<String> {
        match self.github.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => Some(normalize_github(value)),
            _ => None,
        }
    }

    /// The LinkedIn profile URL for the contact grid, if a handle is present.
    pub fn linkedin_url(&self) -> Option<String> {
        match self.linkedin.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => Some(normalize_linkedin(value)),
            _ => None,
        }
    }
}

/// One language/proficiency pair, e.g. `("English", "Fluent")`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageEntry {
    pub name: String,
    pub level: String,
}

impl LanguageEntry {
    /// Creates a language entry.
    pub fn new(name: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: level.into(),
        }
    }
}

/// A single education entry.  All dates are display strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub graduation_date: String,
    #[serde(default)]
    pub start_date: Option<String>,
}

impl Education {
    /// The right-aligned date label: `"{start} – {graduation}"` when a start
    /// date is recorded, otherwise the graduation date alone.
    pub fn date_label(&self) -> String {
        match &self.start_date {
            Some(start) if !start.trim().is_empty() => {
                format!("{} \u{2013} {}", start, self.graduation_date)
            }
            _ => self.graduation_date.clone(),
        }
    }
}

/// A single work experience entry with optional nested projects.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Experience {
    /// The right-aligned date label, `"{start} – {end}"`.
    pub fn date_label(&self) -> String {
        format!("{} \u{2013} {}", self.start_date, self.end_date)
    }
}

/// A project, either standalone or nested under an [`Experience`].
///
/// `technologies` is always a sequence: records deserialized from sources that
/// omit the field get an empty vector, never an absent one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    /// GitHub handle, repository path, or full URL.
    #[serde(default)]
    pub github: Option<String>,
    /// Project homepage; may be a bare domain.
    #[serde(default)]
    pub url: Option<String>,
}

impl Project {
    /// The link target for the project heading.  The homepage wins over the
    /// GitHub reference when both are present.
    pub fn link_url(&self) -> Option<String> {
        if let Some(url) = self.url.as_deref() {
            if !url.trim().is_empty() {
                return Some(normalize_web_url(url));
            }
        }
        self.github_url()
    }

    /// The normalized GitHub URL, if a reference is present.
    pub fn github_url(&self) -> Option<String> {
        match self.github.as_deref() {
            Some(github) if !github.trim().is_empty() => Some(normalize_github(github)),
            _ => None,
        }
    }
}

fn has_scheme(value: &str) -> bool {
    value.contains("://")
}

/// Expands a bare GitHub handle or repository path to a full profile URL.
/// Values that already carry a URL scheme pass through unchanged.
pub fn normalize_github(value: &str) -> String {
    let value = value.trim();
    if has_scheme(value) {
        value.to_string()
    } else if let Some(rest) = value.strip_prefix("github.com/") {
        format!("https://github.com/{}", rest)
    } else {
        format!("https://github.com/{}", value.trim_start_matches('@'))
    }
}

/// Expands a bare LinkedIn handle to a full profile URL.  Values that already
/// carry a URL scheme pass through unchanged.
pub fn normalize_linkedin(value: &str) -> String {
    let value = value.trim();
    if has_scheme(value) {
        value.to_string()
    } else if value.starts_with("linkedin.com/") || value.starts_with("www.linkedin.com/") {
        format!("https://{}", value)
    } else {
        format!("https://www.linkedin.com/in/{}", value.trim_start_matches('@'))
    }
}

/// Prefixes `https://` onto bare domains.  Values that already carry a URL
/// scheme pass through unchanged.
pub fn normalize_web_url(value: &str) -> String {
    let value = value.trim();
    if has_scheme(value) {
        value.to_string()
    } else {
        format!("https://{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_github_handle_expands_to_profile_url() {
        assert_eq!(normalize_github("octocat"), "https://github.com/octocat");
    }

    #[test]
    fn full_github_url_passes_through() {
        assert_eq!(
            normalize_github("https://github.com/octocat"),
            "https://github.com/octocat"
        );
    }

    #[test]
    fn schemeless_github_domain_gains_scheme() {
        assert_eq!(
            normalize_github("github.com/octocat/spoon-knife"),
            "https://github.com/octocat/spoon-knife"
        );
    }

    #[test]
    fn linkedin_handle_expands_to_profile_url() {
        assert_eq!(
            normalize_linkedin("jane-doe"),
            "https://www.linkedin.com/in/jane-doe"
        );
    }

    #[test]
    fn project_homepage_wins_over_github() {
        let project = Project {
            name: "demo".into(),
            description: "d".into(),
            technologies: Vec::new(),
            github: Some("octocat".into()),
            url: Some("demo.example.com".into()),
        };
        assert_eq!(project.link_url().as_deref(), Some("https://demo.example.com"));
    }

    #[test]
    fn project_without_homepage_links_to_github() {
        let project = Project {
            name: "demo".into(),
            description: "d".into(),
            github: Some("octocat".into()),
            ..Project::default()
        };
        assert_eq!(project.link_url().as_deref(), Some("https://github.com/octocat"));
    }

    #[test]
    fn missing_technologies_deserialize_to_empty() {
        let project: Project =
            serde_json::from_str(r#"{"name": "demo", "description": "d"}"#).unwrap();
        assert!(project.technologies.is_empty());
    }

    #[test]
    fn suggested_filename_is_sanitized() {
        let record = CvRecord::new("Ada", "Lovelace King", "ada@example.com");
        assert_eq!(record.suggested_filename(), "Ada_Lovelace_King_CV.pdf");
    }
}
