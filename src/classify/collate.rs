//! Locale-aware, case-insensitive collation for grouping keys.
//!
//! Performer names sort under Turkish collation (dotted/dotless i, letters
//! like ç and ş ranked after their base forms); genre names sort
//! accent-insensitively. Both comparisons fall back to a raw byte compare on
//! fold-equal inputs so the resulting order is total and deterministic.

use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Latin letters in Turkish collation order (q, w, x interleaved where CLDR
/// places them).
const TURKISH_ORDER: &str = "abcçdefgğhıijklmnoöpqrsştuüvwxyz";

/// Turkish-aware lowercase: uppercase I folds to dotless ı, dotted İ to i.
fn turkish_lower(s: &str) -> String {
    s.chars()
        .flat_map(|c| match c {
            'I' => vec!['ı'],
            'İ' => vec!['i'],
            other => other.to_lowercase().collect(),
        })
        .collect()
}

/// Sort key for one folded character: non-letters first (by code point),
/// then the Turkish alphabet, then anything else by code point.
fn turkish_char_key(c: char) -> (u8, u32) {
    if !c.is_alphabetic() {
        return (0, c as u32);
    }
    match TURKISH_ORDER.chars().position(|t| t == c) {
        Some(rank) => (1, rank as u32),
        None => (2, c as u32),
    }
}

/// Case-insensitive comparison under Turkish collation.
pub fn turkish_cmp(a: &str, b: &str) -> Ordering {
    let fold_a = turkish_lower(a);
    let fold_b = turkish_lower(b);

    let keys_a = fold_a.chars().map(turkish_char_key);
    let keys_b = fold_b.chars().map(turkish_char_key);
    keys_a.cmp(keys_b).then_with(|| a.cmp(b))
}

/// Accent- and case-insensitive fold (NFD, combining marks stripped).
fn base_fold(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Accent- and case-insensitive comparison for genre keys.
pub fn base_cmp(a: &str, b: &str) -> Ordering {
    base_fold(a).cmp(&base_fold(b)).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turkish_letters_rank_after_base_forms() {
        let mut names = vec!["Şebnem", "Selda", "Ceza", "Çelik", "Gaye", "Gökhan"];
        names.sort_by(|a, b| turkish_cmp(a, b));
        assert_eq!(names, vec!["Ceza", "Çelik", "Gaye", "Gökhan", "Selda", "Şebnem"]);
    }

    #[test]
    fn test_dotless_i_folding() {
        // Uppercase I is dotless ı in Turkish, so "Irmak" sorts with the
        // ı-names, before every i-name.
        let mut names = vec!["İrem", "Irmak", "Işın"];
        names.sort_by(|a, b| turkish_cmp(a, b));
        assert_eq!(names, vec!["Irmak", "Işın", "İrem"]);
    }

    #[test]
    fn test_case_insensitive_with_deterministic_tiebreak() {
        // Case variants fold together; the raw tie-break keeps the order
        // total, so any starting permutation sorts identically.
        let mut names = vec!["tarkan", "TARKAN", "Tarkan"];
        names.sort_by(|a, b| turkish_cmp(a, b));
        let mut again = vec!["Tarkan", "tarkan", "TARKAN"];
        again.sort_by(|a, b| turkish_cmp(a, b));
        assert_eq!(names, again);
    }

    #[test]
    fn test_digits_sort_before_letters() {
        let mut names = vec!["Athena", "9mm"];
        names.sort_by(|a, b| turkish_cmp(a, b));
        assert_eq!(names, vec!["9mm", "Athena"]);
    }

    #[test]
    fn test_base_cmp_ignores_accents_and_case() {
        // Accent-folded equal; only the raw tie-break separates them.
        assert_eq!(base_fold("Réggae"), base_fold("reggae"));
        assert_eq!(base_cmp("Réggae", "reggae"), Ordering::Less);
        let mut genres = vec!["rock", "Anadolu rock", "pop", "Arabesk"];
        genres.sort_by(|a, b| base_cmp(a, b));
        assert_eq!(genres, vec!["Anadolu rock", "Arabesk", "pop", "rock"]);
    }
}
