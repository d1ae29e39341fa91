//! Request-building helpers.
//!
//! Operations build their request values field by field from a flat input
//! struct. A field is only present on the request when the caller set it, and
//! nested groups whose members are all unset disappear instead of being sent
//! as empty structures. These helpers carry that rule so each operation's
//! `build_request` stays a straight list of assignments.

use crate::error::ValidationError;

/// Collapse a nested group to `None` when none of its members are set.
///
/// Groups derive `Default` with every member `Option`/empty, so "all unset"
/// is exactly "equal to the default". Apply bottom-up: collapse children
/// first, then build and collapse the parent.
pub fn collapse<T>(group: T) -> Option<T>
where
    T: Default + PartialEq,
{
    if group == T::default() {
        None
    } else {
        Some(group)
    }
}

/// An empty list is treated as unset.
pub fn non_empty<T>(list: Vec<T>) -> Option<Vec<T>> {
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}

/// Fail when a required string input is missing or blank.
pub fn require_str(name: &'static str, value: &Option<String>) -> Result<(), ValidationError> {
    match value.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => Ok(()),
        _ => Err(ValidationError::MissingParameter(name)),
    }
}

/// Fail unless at least one of the named inputs is set.
pub fn require_one_of(candidates: &[(&'static str, bool)]) -> Result<(), ValidationError> {
    if candidates.iter().any(|(_, set)| *set) {
        Ok(())
    } else {
        Err(ValidationError::MissingOneOf(
            candidates.iter().map(|(name, _)| *name).collect(),
        ))
    }
}

/// Fail when a numeric input falls outside `[min, max]`.
pub fn require_range<T>(
    name: &'static str,
    value: Option<T>,
    min: T,
    max: T,
) -> Result<(), ValidationError>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    match value {
        Some(v) if v < min || v > max => Err(ValidationError::invalid(
            name,
            format!("{v} is outside {min}..={max}"),
        )),
        _ => Ok(()),
    }
}
