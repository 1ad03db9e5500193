//! tend: recurring maintenance tasks tracked in markdown notes.
//!
//! The engine is pure computation over note frontmatter: date arithmetic,
//! status classification, the filter query language, and the markdown
//! history table. `engine::vault` is the single storage edge.

pub mod engine;
