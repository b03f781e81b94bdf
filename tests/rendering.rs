use chrono::NaiveDate;
use sha2::{Digest, Sha256};

use cvpress::document::{CvDocument, RenderedCv};
use cvpress::fonts;
use cvpress::model::{CvRecord, Education, Experience, LanguageEntry, Project};

fn sample_record() -> CvRecord {
    let mut record = CvRecord::new("Ada", "Lovelace", "ada@example.com");
    record.phone = Some("+44 20 7946 0958".into());
    record.github = Some("octocat".into());
    record.linkedin = Some("ada-lovelace".into());
    record.about = Some(
        "Engineer with a focus on **reliable** document tooling and long-lived data models."
            .into(),
    );
    record.skills = vec![
        "JavaScript".into(),
        "**React**".into(),
        "Node.js".into(),
        "PostgreSQL".into(),
        "Docker".into(),
        "AWS".into(),
    ];
    record.experience = vec![Experience {
        company: "Initech".into(),
        position: "Senior Engineer".into(),
        start_date: "2020".into(),
        end_date: "2024".into(),
        summary: Some("Led the reporting pipeline rewrite.".into()),
        projects: vec![Project {
            name: "report-engine".into(),
            description: "Batch renderer for customer statements.".into(),
            technologies: vec!["Rust".into(), "PostgreSQL".into()],
            ..Project::default()
        }],
    }];
    record.education = vec![Education {
        institution: "University of London".into(),
        degree: "BSc Mathematics".into(),
        graduation_date: "2014".into(),
        start_date: Some("2011".into()),
    }];
    record.projects = vec![Project {
        name: "spoon-knife".into(),
        description: "A fork playground used for demos.".into(),
        technologies: vec!["Git".into()],
        github: Some("octocat".into()),
        ..Project::default()
    }];
    record.languages = vec![
        LanguageEntry::new("English", "Native"),
        LanguageEntry::new("French", "Intermediate"),
    ];
    record
}

fn render_sample() -> Option<RenderedCv> {
    if !fonts::fonts_available() {
        eprintln!("Skipping rendering assertions: no usable font family on this machine");
        return None;
    }

    let rendered = CvDocument::new(sample_record())
        .with_generated_on(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
        .render()
        .expect("render sample cv");
    Some(rendered)
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() {
                    let byte = data[cursor];
                    if byte == terminator {
                        break;
                    }
                    if terminator == b')' {
                        data[cursor] = b'0';
                    } else if !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    fn scrub_xml(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while offset + start.len() < data.len() {
            if let Some(start_pos) = data[offset..]
                .windows(start.len())
                .position(|window| window == start)
            {
                let start_index = offset + start_pos + start.len();
                if let Some(end_pos) = data[start_index..]
                    .windows(end.len())
                    .position(|window| window == end)
                {
                    for byte in &mut data[start_index..start_index + end_pos] {
                        if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                            *byte = b'0';
                        }
                    }
                    offset = start_index + end_pos + end.len();
                } else {
                    break;
                }
            } else {
                break;
            }
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/CreationDate (", b')');
    scrub_segment(&mut normalized, b"/ModDate (", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    scrub_segment(&mut normalized, b"/ID [", b']');
    scrub_segment(&mut normalized, b"/Producer(", b')');
    scrub_segment(&mut normalized, b"/Producer (", b')');
    scrub_xml(&mut normalized, b"<xmp:CreateDate>", b"</xmp:CreateDate>");
    scrub_xml(&mut normalized, b"<xmp:ModifyDate>", b"</xmp:ModifyDate>");
    scrub_xml(&mut normalized, b"<xmp:MetadataDate>", b"</xmp:MetadataDate>");
    scrub_xml(&mut normalized, b"<xmpMM:DocumentID>", b"</xmpMM:DocumentID>");
    scrub_xml(&mut normalized, b"<xmpMM:InstanceID>", b"</xmpMM:InstanceID>");
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    let normalized = scrub_pdf(bytes);
    let digest = Sha256::digest(&normalized);
    digest.into()
}

#[test]
fn renders_non_empty_paginated_output() {
    let Some(rendered) = render_sample() else {
        return;
    };

    assert!(rendered.bytes.starts_with(b"%PDF"));
    assert!(rendered.page_count >= 1);
    assert_eq!(rendered.suggested_filename, "Ada_Lovelace_CV.pdf");
}

#[test]
fn rendering_is_deterministic() {
    let Some(first) = render_sample() else {
        return;
    };
    let Some(second) = render_sample() else {
        return;
    };

    assert_eq!(first.bytes.len(), second.bytes.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&first.bytes),
        normalized_hash(&second.bytes),
        "renders must be identical after metadata normalization"
    );
}

#[test]
fn links_and_outline_are_embedded() {
    let Some(rendered) = render_sample() else {
        return;
    };

    let text = String::from_utf8_lossy(&rendered.bytes).to_string();
    assert!(text.contains("/Annots"), "link annotations expected");
    assert!(
        text.contains("https://github.com/octocat"),
        "normalized GitHub target expected"
    );
    assert!(text.contains("mailto:ada@example.com"));
    assert!(text.contains("/Outlines"), "section outline expected");
}

#[test]
fn save_to_writes_the_suggested_filename() {
    let Some(rendered) = render_sample() else {
        return;
    };

    let directory = std::env::temp_dir().join(format!("cvpress-test-{}", std::process::id()));
    std::fs::create_dir_all(&directory).unwrap();
    let path = rendered.save_to(&directory).unwrap();
    assert!(path.ends_with("Ada_Lovelace_CV.pdf"));
    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, rendered.bytes);
    let _ = std::fs::remove_dir_all(&directory);
}
