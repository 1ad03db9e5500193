//! Identity: who gets written into the history table's User column.
//!
//! Modeled as an injected capability so the core never reaches for the
//! environment itself. Lookup is best-effort; failure falls back to `"-"`
//! and never fails the completion.

/// Placeholder written when no identity can be determined.
pub const UNKNOWN_USER: &str = "-";

pub trait IdentityProvider {
    fn username(&self) -> String;
}

/// Reads `USER` (Unix) then `USERNAME` (Windows) from the environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvIdentity;

impl IdentityProvider for EnvIdentity {
    fn username(&self) -> String {
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_USER.to_string())
    }
}

/// Fixed identity, for tests and for hosts that know their user.
#[derive(Debug, Clone)]
pub struct FixedIdentity(pub String);

impl IdentityProvider for FixedIdentity {
    fn username(&self) -> String {
        self.0.clone()
    }
}
