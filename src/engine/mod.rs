//! Core engine modules for tend.

pub mod dates;
pub mod filter;
pub mod history;
pub mod identity;
pub mod locale;
pub mod status;
pub mod types;
pub mod vault;
