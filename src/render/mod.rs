// src/render/mod.rs
// =============================================================================
// Turns repository metadata and a file tree into a Markdown document.
//
// Submodules:
// - markdown: The document sections and the pipeline that joins them
// - tree_text: The box-drawing rendering of the file tree
// - format: Number, date and badge formatting helpers
// =============================================================================

mod format;
mod markdown;
mod tree_text;

pub use markdown::render_markdown;
