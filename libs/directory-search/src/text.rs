/// Case folding used by every text comparison in the engine.
pub(crate) fn casefold(input: &str) -> String {
    input.to_lowercase()
}

/// Case-insensitive literal substring test. `needle` must already be folded.
pub(crate) fn contains_folded(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    casefold(haystack).contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_non_ascii() {
        assert!(contains_folded("ÉCOLE Polytechnique", &casefold("école")));
        assert!(contains_folded("Straße", "straße"));
    }

    #[test]
    fn metacharacters_are_literal() {
        assert!(contains_folded("C++ (templates)", "++ ("));
        assert!(!contains_folded("anything", ".*"));
        assert!(contains_folded("100% rust_lang", "% rust_"));
    }
}
