//! Finding import directives in content.

use regex::Regex;
use std::ops::Range;

/// One directive match in a piece of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Byte range of the whole match in the scanned content
    pub span: Range<usize>,
    /// The captured path argument, untrimmed
    pub argument: String,
}

/// Collect every non-overlapping directive in `content`, left to right.
///
/// Offsets refer to `content` as passed in, so callers can splice replacements
/// without re-scanning. Matches where `capture_group` did not participate are
/// skipped and left in the text.
#[must_use]
pub fn scan_directives(pattern: &Regex, capture_group: usize, content: &str) -> Vec<Directive> {
    pattern
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let Some(argument) = caps.get(capture_group) else {
                tracing::debug!(
                    "Directive '{}' has no capture group {}; leaving it in place",
                    whole.as_str(),
                    capture_group
                );
                return None;
            };
            Some(Directive {
                span: whole.range(),
                argument: argument.as_str().to_string(),
            })
        })
        .collect()
}
