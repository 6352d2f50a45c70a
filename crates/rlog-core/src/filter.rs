//! Filter: decides whether a scope is enabled by the active ruleset.

use crate::types::WILDCARD;

/// Return `true` if any rule is the wildcard or a prefix of `scope`.
///
/// The empty rule is a prefix of every scope and so enables everything.
pub fn enabled<S: AsRef<str>>(rules: &[S], scope: &str) -> bool {
    rules.iter().any(|rule| {
        let rule = rule.as_ref();
        rule == WILDCARD || scope.starts_with(rule)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
