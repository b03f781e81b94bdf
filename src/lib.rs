//! Core entry point for the cvpress crate.
//!
//! A [`model::CvRecord`] goes in, a paginated PDF comes out.  The usual path
//! is [`document::CvDocument`]: it resolves fonts, runs the cursor-driven
//! layout pass, paints the planned pages, and injects hyperlinks and the
//! section outline.  The [`enrich`] module holds the pure contracts of the
//! upstream data-gathering pipeline.

pub mod annotate;
pub mod document;
pub mod enrich;
pub mod flow;
pub mod fonts;
pub mod measure;
pub mod model;
pub mod page;
pub mod sections;
pub mod segment;
pub mod style;
