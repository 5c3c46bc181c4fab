//! Splitting a raw performer credit into individual names.

use regex::Regex;
use std::sync::LazyLock;

/// Separator patterns in precedence order. The first pattern that matches
/// anywhere in the credit wins and performs the split; later patterns are
/// not consulted, so `&` outranks the comma when both are present.
static SEPARATORS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\s+feat\.?\s+",
        r"(?i)\s+ft\.?\s+",
        r"(?i)\s+featuring\s+",
        r"\s*&\s*",
        r"\s*,\s*",
        r"(?i)\s+vs\.?\s+",
        r"(?i)\s+x\s+",
        r"\s*\+\s*",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Drop parenthetical annotations and collapse runs of whitespace.
fn clean_name(raw: &str) -> String {
    let without_parens = PARENTHETICAL.replace_all(raw, "");
    WHITESPACE
        .replace_all(without_parens.trim(), " ")
        .to_string()
}

/// Split a raw performer credit into one or more names.
///
/// Falls back to the original trimmed credit as a single-element list when
/// no separator matches, or when cleanup leaves nothing behind.
pub fn parse_performers(credit: &str) -> Vec<String> {
    let trimmed = credit.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let segments: Vec<&str> = match SEPARATORS.iter().find(|sep| sep.is_match(trimmed)) {
        Some(sep) => sep.split(trimmed).collect(),
        None => vec![trimmed],
    };

    let cleaned: Vec<String> = segments
        .into_iter()
        .map(clean_name)
        .filter(|name| !name.is_empty())
        .collect();

    if cleaned.is_empty() {
        vec![trimmed.to_string()]
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_performer_passthrough() {
        assert_eq!(parse_performers("Sezen Aksu"), vec!["Sezen Aksu"]);
        assert_eq!(parse_performers("  Tarkan  "), vec!["Tarkan"]);
    }

    #[test]
    fn test_feat_variants() {
        assert_eq!(parse_performers("A feat. B"), vec!["A", "B"]);
        assert_eq!(parse_performers("A feat B"), vec!["A", "B"]);
        assert_eq!(parse_performers("A ft. B"), vec!["A", "B"]);
        assert_eq!(parse_performers("A FEATURING B"), vec!["A", "B"]);
    }

    #[test]
    fn test_ampersand_outranks_comma() {
        // The comma inside the first segment is left intact because `&`
        // matched first.
        assert_eq!(parse_performers("A, B & C"), vec!["A, B", "C"]);
    }

    #[test]
    fn test_comma_split_without_ampersand() {
        assert_eq!(parse_performers("A, B, C"), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_collab_separators() {
        assert_eq!(parse_performers("A vs. B"), vec!["A", "B"]);
        assert_eq!(parse_performers("A x B"), vec!["A", "B"]);
        assert_eq!(parse_performers("A + B"), vec!["A", "B"]);
    }

    #[test]
    fn test_x_requires_word_boundaries() {
        // "x" only separates as a standalone token, not inside a name.
        assert_eq!(parse_performers("Xavier"), vec!["Xavier"]);
        assert_eq!(parse_performers("Max Power"), vec!["Max Power"]);
    }

    #[test]
    fn test_parentheticals_removed_and_whitespace_collapsed() {
        assert_eq!(
            parse_performers("A (Live) feat. B   (Remix)"),
            vec!["A", "B"]
        );
    }

    #[test]
    fn test_cleanup_removing_everything_falls_back_to_original() {
        assert_eq!(parse_performers("(Remix)"), vec!["(Remix)"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_performers("   ").is_empty());
    }
}
