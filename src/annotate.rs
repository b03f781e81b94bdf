//! Hyperlink and outline injection built on top of `lopdf`.
//!
//! The rendering layer produces plain painted pages; clickable regions and the
//! document outline are added afterwards by reopening the PDF bytes, inserting
//! `/Annots` link annotations for every recorded region, and wiring a flat
//! `/Outlines` tree with one entry per painted section.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::page::{LinkRegion, OutlineMark, PageGeometry};

const MM_TO_PT: f64 = 72.0 / 25.4;

/// Click slop around a link's text bounds, in millimetres.
const LINK_PADDING_MM: f64 = 0.4;

/// Errors that can occur while embedding annotations into a rendered PDF.
#[derive(Debug)]
pub enum AnnotateError {
    /// The PDF bytes could not be parsed or rewritten by `lopdf`.
    Pdf(lopdf::Error),
    /// A required catalog entry was missing from the document trailer.
    MissingCatalog,
    /// The catalog object was not a dictionary.
    InvalidCatalog,
    /// A referenced page number did not exist in the rendered document.
    MissingPage {
        /// The requested (1-indexed) page number that could not be resolved.
        page_number: usize,
    },
    /// A page object was not a dictionary.
    InvalidPage {
        /// The (1-indexed) page number of the malformed object.
        page_number: usize,
    },
}

impl From<lopdf::Error> for AnnotateError {
    fn from(err: lopdf::Error) -> Self {
        Self::Pdf(err)
    }
}

impl std::fmt::Display for AnnotateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdf(err) => write!(f, "Failed to rewrite PDF bytes: {err}"),
            Self::MissingCatalog => write!(f, "PDF catalog entry is missing"),
            Self::InvalidCatalog => write!(f, "PDF catalog entry is not a dictionary"),
            Self::MissingPage { page_number } => {
                write!(f, "Annotation refers to missing page {page_number}")
            }
            Self::InvalidPage { page_number } => {
                write!(f, "Page {page_number} is not a dictionary")
            }
        }
    }
}

impl std::error::Error for AnnotateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pdf(err) => Some(err),
            _ => None,
        }
    }
}

/// Applies link annotations and the section outline to rendered PDF bytes.
///
/// Regions and marks carry zero-based page indices matching the layout plan.
/// With nothing to add, the input bytes pass through untouched.
pub fn apply_annotations(
    pdf_bytes: &[u8],
    links: &[LinkRegion],
    outline: &[OutlineMark],
    geometry: &PageGeometry,
) -> Result<Vec<u8>, AnnotateError> {
    if links.is_empty() && outline.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let mut document = Document::load_mem(pdf_bytes)?;
    let pages = document.get_pages();

    insert_link_annotations(&mut document, links, geometry, &pages)?;
    insert_outline(&mut document, outline, &pages)?;

    let mut buffer = Vec::new();
    document.save_to(&mut buffer).map_err(lopdf::Error::from)?;
    Ok(buffer)
}

fn insert_link_annotations(
    document: &mut Document,
    links: &[LinkRegion],
    geometry: &PageGeometry,
    pages: &BTreeMap<u32, ObjectId>,
) -> Result<(), AnnotateError> {
    let mut by_page: BTreeMap<usize, Vec<&LinkRegion>> = BTreeMap::new();
    for link in links {
        by_page.entry(link.page).or_default().push(link);
    }

    for (page_index, regions) in by_page {
        let page_number = page_index + 1;
        let page_id = pages
            .get(&(page_number as u32))
            .copied()
            .ok_or(AnnotateError::MissingPage { page_number })?;

        let mut references = Vec::with_capacity(regions.len());
        for region in regions {
            let mut action = Dictionary::new();
            action.set("Type", Object::Name("Action".into()));
            action.set("S", Object::Name("URI".into()));
            action.set("URI", Object::string_literal(region.uri.as_str()));

            let mut annotation = Dictionary::new();
            annotation.set("Type", Object::Name("Annot".into()));
            annotation.set("Subtype", Object::Name("Link".into()));
            annotation.set("Rect", Object::Array(region_rect(region, geometry)));
            annotation.set(
                "Border",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(0),
                ]),
            );
            annotation.set("A", Object::Dictionary(action));

            let id = document.new_object_id();
            document.objects.insert(id, Object::Dictionary(annotation));
            references.push(Object::Reference(id));
        }

        let page_object = document
            .objects
            .get_mut(&page_id)
            .ok_or(AnnotateError::MissingPage { page_number })?;
        let page_dict = page_object
            .as_dict_mut()
            .map_err(|_| AnnotateError::InvalidPage { page_number })?;

        let mut annotations = match page_dict.get(b"Annots") {
            Ok(Object::Array(existing)) => existing.clone(),
            _ => Vec::new(),
        };
        annotations.extend(references);
        page_dict.set("Annots", Object::Array(annotations));
    }

    Ok(())
}

/// Converts a region from top-left millimetre coordinates into the PDF's
/// bottom-left point coordinates, rounded to whole points.
fn region_rect(region: &LinkRegion, geometry: &PageGeometry) -> Vec<Object> {
    let x1 = (region.x - LINK_PADDING_MM) * MM_TO_PT;
    let y1 = (geometry.page_height - region.y - region.height - LINK_PADDING_MM) * MM_TO_PT;
    let x2 = (region.x + region.width + LINK_PADDING_MM) * MM_TO_PT;
    let y2 = (geometry.page_height - region.y + LINK_PADDING_MM) * MM_TO_PT;
    [x1, y1, x2, y2]
        .iter()
        .map(|value| Object::Integer(value.round() as i64))
        .collect()
}

struct OutlineEntry {
    object_id: ObjectId,
    page_ref: ObjectId,
    title: String,
}

fn insert_outline(
    document: &mut Document,
    marks: &[OutlineMark],
    pages: &BTreeMap<u32, ObjectId>,
) -> Result<(), AnnotateError> {
    if marks.is_empty() {
        return Ok(());
    }

    let mut entries = Vec::with_capacity(marks.len());
    for mark in marks {
        let page_number = mark.page + 1;
        let page_ref = pages
            .get(&(page_number as u32))
            .copied()
            .ok_or(AnnotateError::MissingPage { page_number })?;
        entries.push(OutlineEntry {
            object_id: document.new_object_id(),
            page_ref,
            title: mark.title.clone(),
        });
    }

    let outlines_id = document.new_object_id();
    for (index, entry) in entries.iter().enumerate() {
        let mut dictionary = Dictionary::new();
        dictionary.set("Title", Object::string_literal(entry.title.as_str()));
        dictionary.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(entry.page_ref),
                Object::Name("Fit".into()),
            ]),
        );
        dictionary.set("Parent", Object::Reference(outlines_id));
        if index > 0 {
            dictionary.set("Prev", Object::Reference(entries[index - 1].object_id));
        }
        if index + 1 < entries.len() {
            dictionary.set("Next", Object::Reference(entries[index + 1].object_id));
        }
        document
            .objects
            .insert(entry.object_id, Object::Dictionary(dictionary));
    }

    let mut root = Dictionary::new();
    root.set("Type", Object::Name("Outlines".into()));
    root.set("Count", Object::Integer(entries.len() as i64));
    if let Some(first) = entries.first() {
        root.set("First", Object::Reference(first.object_id));
    }
    if let Some(last) = entries.last() {
        root.set("Last", Object::Reference(last.object_id));
    }
    document.objects.insert(outlines_id, Object::Dictionary(root));

    let catalog_id = document
        .trailer
        .get(b"Root")
        .ok()
        .and_then(|object| object.as_reference().ok())
        .ok_or(AnnotateError::MissingCatalog)?;
    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(AnnotateError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| AnnotateError::InvalidCatalog)?;
    catalog.set("Outlines", Object::Reference(outlines_id));

    Ok(())
}
