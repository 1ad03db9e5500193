//! CLI command handlers.

pub mod complete;
pub mod due;
pub mod list;
pub mod query;
mod render;
pub mod status;
