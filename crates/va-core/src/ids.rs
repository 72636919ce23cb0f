//! ID prefixes and generation.
//!
//! IDs are `{prefix}-{8 hex chars}` drawn from the OS random source.

use crate::errors::CoreError;

pub const PREFIX_REPORT: &str = "rep";
pub const PREFIX_SOURCE: &str = "src";
pub const PREFIX_JOB: &str = "job";

/// Generate a fresh ID with the given prefix.
///
/// # Errors
///
/// Returns `CoreError::Other` if the OS random source is unavailable.
pub fn generate(prefix: &str) -> Result<String, CoreError> {
    let mut buf = [0u8; 4];
    getrandom::fill(&mut buf).map_err(|e| anyhow::anyhow!("random source unavailable: {e}"))?;
    Ok(format_id(prefix, &buf))
}

/// Render an ID from raw bytes.
#[must_use]
pub fn format_id(prefix: &str, bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut id = String::with_capacity(prefix.len() + 1 + bytes.len() * 2);
    id.push_str(prefix);
    id.push('-');
    for b in bytes {
        let _ = write!(id, "{b:02x}");
    }
    id
}

/// Check that `id` has the shape `{prefix}-{hex}`.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|hex| !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
