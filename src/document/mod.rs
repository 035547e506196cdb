//! Content shapes and the renderers that present them.
//!
//! Everything here is synchronous and free of I/O so it can be exercised
//! directly in tests and moved onto a blocking thread by the service layer.

pub mod docx;
pub mod export;
pub mod kind;
pub mod metrics;
pub mod normalizer;
pub mod payload;
pub mod pdf;
pub mod rules;
pub mod shape;
pub mod view;

pub use export::{export, ExportError, ExportFormat, ExportResult, ExportedDocument};
pub use kind::ContentKind;
pub use normalizer::normalize;
pub use shape::{Branch, ContentShape, NormalizedContent, Question};
pub use view::{render as render_view, ViewTree};
