//! Route pattern parsing.
//!
//! # Responsibilities
//! - Split a pattern (or a concrete request path) into segments
//! - Recognise named parameters (`:name`) and wildcards (`*name`)
//! - Report patterns whose structure cannot be honoured
//!
//! # Design Decisions
//! - Empty segments are dropped, so leading, trailing and doubled slashes are transparent
//! - Only one wildcard is supported and it is always terminal; parsing stops right after it
//! - `parse` never fails; `validate` is the strict view of the same rules

use thiserror::Error;

/// Prefix marking a named parameter segment.
pub const PARAM: char = ':';

/// Prefix marking a wildcard segment.
pub const WILDCARD: char = '*';

/// Structural problems in a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// Segments follow a wildcard and can never be matched.
    #[error("pattern `{pattern}` has segments after wildcard `{wildcard}`: {dropped:?}")]
    TrailingSegments {
        pattern: String,
        wildcard: String,
        dropped: Vec<String>,
    },
}

/// Split `pattern` into its segments.
///
/// Everything after the first wildcard segment is ignored.
pub fn parse(pattern: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    for item in pattern.split('/').filter(|s| !s.is_empty()) {
        parts.push(item);
        if is_wildcard(item) {
            break;
        }
    }
    parts
}

/// Check that nothing in `pattern` is silently discarded by [`parse`].
pub fn validate(pattern: &str) -> Result<(), PatternError> {
    let mut items = pattern.split('/').filter(|s| !s.is_empty());
    let Some(wildcard) = items.by_ref().find(|s| is_wildcard(s)) else {
        return Ok(());
    };
    let dropped: Vec<String> = items.map(str::to_owned).collect();
    if dropped.is_empty() {
        return Ok(());
    }
    Err(PatternError::TrailingSegments {
        pattern: pattern.to_owned(),
        wildcard: wildcard.to_owned(),
        dropped,
    })
}

/// True when the segment starts with `:` or `*`.
pub fn is_wild(segment: &str) -> bool {
    segment.starts_with(PARAM) || segment.starts_with(WILDCARD)
}

pub fn is_wildcard(segment: &str) -> bool {
    segment.starts_with(WILDCARD)
}

pub fn is_param(segment: &str) -> bool {
    segment.starts_with(PARAM)
}
