//! Pure syntactic scan of a prompt string for `{{name}}` placeholders
//! (spec.md §4.1 "Tie-breaks & edge cases").

use std::collections::BTreeSet;

/// Extract every distinct `{{name}}` placeholder from `prompt`, in a
/// deterministic (sorted) order. No trimming is performed — `{{ name }}`
/// and `{{name}}` are different placeholders, matching the spec's "exact
/// match required" rule.
pub fn extract_placeholders(prompt: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut rest = prompt;
    while let Some(start) = rest.find("{{") {
        let after_open = &rest[start + 2..];
        if let Some(end) = after_open.find("}}") {
            names.insert(after_open[..end].to_string());
            rest = &after_open[end + 2..];
        } else {
            break;
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_distinct_names() {
        let names = extract_placeholders("Explain {{word}} in {{sentence}} using {{word}}.");
        assert_eq!(
            names,
            BTreeSet::from(["word".to_string(), "sentence".to_string()])
        );
    }

    #[test]
    fn no_placeholders_is_empty() {
        assert!(extract_placeholders("plain text").is_empty());
    }

    #[test]
    fn exact_match_no_trim() {
        let names = extract_placeholders("{{ word }} and {{word}}");
        assert_eq!(
            names,
            BTreeSet::from([" word ".to_string(), "word".to_string()])
        );
    }

    #[test]
    fn unterminated_placeholder_is_ignored() {
        assert!(extract_placeholders("broken {{word").is_empty());
    }
}
