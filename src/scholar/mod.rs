//! Publication search: source abstraction, aggregation, and rendering.
//!
//! # Architecture
//!
//! ```text
//! keywords → Aggregator
//!   ├── PublicationSource::search(keyword) → PublicationCursor
//!   │     └── cursor.next() … Ok(Some(RawRecord)) | Ok(None) = exhausted
//!   ├── per-pull throttle + timeout
//!   ├── per-keyword cap (5) and global cap (5)
//!   └── RawRecord → Publication normalization
//! Aggregation → render_observation → plain-text Observation
//! ```
//!
//! The aggregator never fails for keyword-level errors; it records them in
//! [`Aggregation`] and continues, so one bad keyword cannot null out the
//! result.

pub mod aggregator;
pub mod record;
pub mod render;
pub mod source;
pub mod tool;

pub use aggregator::{Aggregation, Aggregator, tokenize};
pub use record::{Publication, RawRecord};
pub use render::render_observation;
pub use source::{PublicationCursor, PublicationSource, ScholarApiSource};
pub use tool::{LITERATURE_TOOL_NAME, LiteratureSearchTool};
