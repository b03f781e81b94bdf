//! Reconciliation of manually entered and machine-enhanced record fragments.
//!
//! The upstream pipeline collects up to three partial views of a CV: the form
//! fields the user typed, a JSON completion from a language model, and project
//! entries derived from public repository metadata.  This module holds the
//! pure contracts of that pipeline: extracting a JSON payload from a free-text
//! completion, merging two typed partial records under a fixed precedence, and
//! promoting the merged draft into a validated [`CvRecord`].  Transport,
//! provider request shapes, and retries live outside this crate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{CvRecord, Education, Experience, LanguageEntry, Project};

/// A partial CV as produced by one input source.  Every field is optional or
/// defaults to empty so that arbitrary subsets deserialize cleanly.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CvDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub about: Option<String>,
    pub skills: Vec<String>,
    pub languages: Vec<LanguageEntry>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
}

impl CvDraft {
    /// Promotes the draft into a record, verifying the required fields.
    pub fn into_record(self) -> Result<CvRecord, EnhanceError> {
        let first_name = require(self.first_name, "firstName")?;
        let last_name = require(self.last_name, "lastName")?;
        let email = require(self.email, "email")?;
        Ok(CvRecord {
            first_name,
            last_name,
            email,
            phone: self.phone,
            github: self.github,
            linkedin: self.linkedin,
            about: self.about,
            skills: self.skills,
            languages: self.languages,
            education: self.education,
            experience: self.experience,
            projects: self.projects,
        })
    }
}

fn require(value: Option<String>, field: &'static str) -> Result<String, EnhanceError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(EnhanceError::MissingField(field)),
    }
}

/// Errors of the enrichment contracts.  All of them are recoverable: callers
/// fall back to the pre-enrichment record instead of failing the request.
#[derive(Debug)]
pub enum EnhanceError {
    /// The completion contained neither a fenced code block nor a brace span.
    NoJsonPayload,
    /// The extracted payload was not valid JSON for a [`CvDraft`].
    Json(serde_json::Error),
    /// A required field was empty after merging.
    MissingField(&'static str),
}

impl From<serde_json::Error> for EnhanceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl fmt::Display for EnhanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoJsonPayload => write!(f, "completion carries no JSON payload"),
            Self::Json(err) => write!(f, "completion payload is not a valid record: {err}"),
            Self::MissingField(field) => write!(f, "required field '{field}' is empty"),
        }
    }
}

impl std::error::Error for EnhanceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

/// Extracts the JSON payload from a model completion.
///
/// The first fenced code block wins, with an optional language tag after the
/// opening fence.  Without a fence, the outermost `{...}` span is used.
pub fn extract_json_payload(completion: &str) -> Option<&str> {
    if let Some(open) = completion.find("```") {
        let after_fence = &completion[open + 3..];
        let body_start = after_fence.find('\n').map(|idx| idx + 1).unwrap_or(0);
        let body = &after_fence[body_start..];
        if let Some(close) = body.find("```") {
            let payload = body[..close].trim();
            if !payload.is_empty() {
                return Some(payload);
            }
        }
    }

    let open = completion.find('{')?;
    let close = completion.rfind('}')?;
    if close > open {
        Some(completion[open..=close].trim())
    } else {
        None
    }
}

/// Parses a model completion into a draft, tolerating prose around the JSON.
pub fn parse_completion(completion: &str) -> Result<CvDraft, EnhanceError> {
    let payload = extract_json_payload(completion).ok_or(EnhanceError::NoJsonPayload)?;
    Ok(serde_json::from_str(payload)?)
}

/// Merges two drafts under the documented precedence.
///
/// Scalars: the manual value wins unless it is absent or blank.  Sequences:
/// manual entries first, then enhanced entries that do not duplicate one
/// already present (case-insensitive on the identifying fields).  Languages
/// merge key-wise on the language name, with the manual level winning.
pub fn reconcile(manual: &CvDraft, enhanced: &CvDraft) -> CvDraft {
    CvDraft {
        first_name: pick_scalar(&manual.first_name, &enhanced.first_name),
        last_name: pick_scalar(&manual.last_name, &enhanced.last_name),
        email: pick_scalar(&manual.email, &enhanced.email),
        phone: pick_scalar(&manual.phone, &enhanced.phone),
        github: pick_scalar(&manual.github, &enhanced.github),
        linkedin: pick_scalar(&manual.linkedin, &enhanced.linkedin),
        about: pick_scalar(&manual.about, &enhanced.about),
        skills: merge_by_key(&manual.skills, &enhanced.skills, |skill| {
            skill.trim().to_lowercase()
        }),
        languages: merge_languages(&manual.languages, &enhanced.languages),
        education: merge_by_key(&manual.education, &enhanced.education, |entry| {
            format!(
                "{}|{}",
                entry.institution.trim().to_lowercase(),
                entry.degree.trim().to_lowercase()
            )
        }),
        experience: merge_by_key(&manual.experience, &enhanced.experience, |entry| {
            format!(
                "{}|{}|{}",
                entry.company.trim().to_lowercase(),
                entry.position.trim().to_lowercase(),
                entry.start_date.trim().to_lowercase()
            )
        }),
        projects: merge_by_key(&manual.projects, &enhanced.projects, |project| {
            project.name.trim().to_lowercase()
        }),
    }
}

fn pick_scalar(manual: &Option<String>, enhanced: &Option<String>) -> Option<String> {
    match manual {
        Some(value) if !value.trim().is_empty() => Some(value.clone()),
        _ => enhanced.clone(),
    }
}

fn merge_by_key<T: Clone, K: Eq + std::hash::Hash>(
    manual: &[T],
    enhanced: &[T],
    key: impl Fn(&T) -> K,
) -> Vec<T> {
    let mut seen = std::collections::HashSet::new();
    let mut merged = Vec::with_capacity(manual.len() + enhanced.len());
    for item in manual.iter().chain(enhanced) {
        if seen.insert(key(item)) {
            merged.push(item.clone());
        }
    }
    merged
}

fn merge_languages(manual: &[LanguageEntry], enhanced: &[LanguageEntry]) -> Vec<LanguageEntry> {
    merge_by_key(manual, enhanced, |entry| entry.name.trim().to_lowercase())
}

/// Public metadata of one hosted repository, as gathered by the upstream
/// fetcher.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepoSummary {
    pub name: String,
    pub description: Option<String>,
    /// Languages detected on the repository, most prominent first.
    pub languages: Vec<String>,
    pub stars: u32,
    pub forks: u32,
    /// Technology labels derived from configuration-file sniffing.  Labels
    /// arrive as-is; no normalization is assumed.
    pub technologies: Vec<String>,
    /// Repository URL or `owner/name` path.
    pub url: Option<String>,
}

impl From<RepoSummary> for Project {
    fn from(repo: RepoSummary) -> Self {
        let mut technologies = merge_by_key(&repo.technologies, &repo.languages, |label| {
            label.trim().to_lowercase()
        });
        technologies.retain(|label| !label.trim().is_empty());

        let description = match repo.description {
            Some(description) if !description.trim().is_empty() => description,
            _ => format!(
                "Public repository with {} stars and {} forks.",
                repo.stars, repo.forks
            ),
        };

        Project {
            name: repo.name,
            description,
            technologies,
            github: repo.url,
            url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_block_wins_over_brace_span() {
        let completion = "Here is the record:\n```json\n{\"firstName\": \"Ada\"}\n```\nExtra {junk}.";
        assert_eq!(
            extract_json_payload(completion),
            Some("{\"firstName\": \"Ada\"}")
        );
    }

    #[test]
    fn fence_without_language_tag_is_accepted() {
        let completion = "```\n{\"email\": \"a@b.c\"}\n```";
        assert_eq!(extract_json_payload(completion), Some("{\"email\": \"a@b.c\"}"));
    }

    #[test]
    fn brace_span_is_the_fallback() {
        let completion = "Sure! {\"firstName\": \"Ada\", \"nested\": {\"x\": 1}} hope that helps";
        assert_eq!(
            extract_json_payload(completion),
            Some("{\"firstName\": \"Ada\", \"nested\": {\"x\": 1}}")
        );
    }

    #[test]
    fn prose_without_json_yields_nothing() {
        assert_eq!(extract_json_payload("I could not produce a record."), None);
        assert!(matches!(
            parse_completion("no json here"),
            Err(EnhanceError::NoJsonPayload)
        ));
    }

    #[test]
    fn invalid_payload_is_a_recoverable_parse_error() {
        let result = parse_completion("{\"skills\": \"not-an-array\"}");
        assert!(matches!(result, Err(EnhanceError::Json(_))));
    }

    #[test]
    fn manual_scalars_win_unless_blank() {
        let manual = CvDraft {
            first_name: Some("Ada".into()),
            about: Some("  ".into()),
            ..CvDraft::default()
        };
        let enhanced = CvDraft {
            first_name: Some("Adeline".into()),
            about: Some("Pioneer of computing.".into()),
            ..CvDraft::default()
        };

        let merged = reconcile(&manual, &enhanced);
        assert_eq!(merged.first_name.as_deref(), Some("Ada"));
        assert_eq!(merged.about.as_deref(), Some("Pioneer of computing."));
    }

    #[test]
    fn sequences_concatenate_without_duplicates() {
        let manual = CvDraft {
            skills: vec!["Rust".into(), "SQL".into()],
            ..CvDraft::default()
        };
        let enhanced = CvDraft {
            skills: vec!["rust".into(), "Docker".into()],
            ..CvDraft::default()
        };

        let merged = reconcile(&manual, &enhanced);
        assert_eq!(merged.skills, vec!["Rust", "SQL", "Docker"]);
    }

    #[test]
    fn languages_merge_key_wise_with_manual_level_winning() {
        let manual = CvDraft {
            languages: vec![LanguageEntry::new("English", "Native")],
            ..CvDraft::default()
        };
        let enhanced = CvDraft {
            languages: vec![
                LanguageEntry::new("english", "Fluent"),
                LanguageEntry::new("French", "Basic"),
            ],
            ..CvDraft::default()
        };

        let merged = reconcile(&manual, &enhanced);
        assert_eq!(
            merged.languages,
            vec![
                LanguageEntry::new("English", "Native"),
                LanguageEntry::new("French", "Basic"),
            ]
        );
    }

    #[test]
    fn into_record_requires_the_mandatory_fields() {
        let draft = CvDraft {
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            ..CvDraft::default()
        };
        assert!(matches!(
            draft.into_record(),
            Err(EnhanceError::MissingField("email"))
        ));
    }

    #[test]
    fn repo_summary_becomes_a_project() {
        let repo = RepoSummary {
            name: "cvpress".into(),
            description: None,
            languages: vec!["Rust".into()],
            stars: 42,
            forks: 7,
            technologies: vec!["rust".into(), "PDF".into()],
            url: Some("octocat/cvpress".into()),
        };

        let project = Project::from(repo);
        assert_eq!(project.name, "cvpress");
        assert_eq!(project.technologies, vec!["rust", "PDF"]);
        assert!(project.description.contains("42 stars"));
        assert_eq!(project.github.as_deref(), Some("octocat/cvpress"));
    }
}
