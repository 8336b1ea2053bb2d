// Text folding for case/accent-insensitive search and collation

use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Lowercase a string and strip diacritics, keeping `ñ` as its own letter
///
/// "Tinte Rubio Cenizo" and "tinte rubio cenizó" fold to the same value,
/// while "peña" and "pena" stay distinct.
pub fn fold(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            'ñ' | 'Ñ' => out.push('ñ'),
            _ => out.extend(ch.to_lowercase().nfd().filter(|c| !is_combining_mark(*c))),
        }
    }
    out
}

/// Normalize a free-text query, returning None when it is blank
pub fn search_needle(query: Option<&str>) -> Option<String> {
    let trimmed = query?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(fold(trimmed))
}

/// True if any of the fields contains the (already folded) needle
pub fn any_contains(needle: &str, fields: &[Option<&str>]) -> bool {
    fields.iter().flatten().any(|field| fold(field).contains(needle))
}

/// Sort key approximating Spanish collation order
fn collation_key(value: &str) -> String {
    // '~' sorts after every ASCII letter, so "ñ" lands between "nz" and "o"
    fold(value).replace('ñ', "n~")
}

/// Locale-aware string comparison
///
/// Primary order ignores case and accents; the raw strings break ties so
/// the result is still total.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b)).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_strips_case_and_accents() {
        assert_eq!(fold("Acondicionador Ácido"), "acondicionador acido");
        assert_eq!(fold("CORTÉ"), "corte");
        assert_eq!(fold("Peña"), "peña");
    }

    #[test]
    fn test_search_needle_blank_is_none() {
        assert_eq!(search_needle(None), None);
        assert_eq!(search_needle(Some("")), None);
        assert_eq!(search_needle(Some("   \t")), None);
        assert_eq!(search_needle(Some("  Shampoo ")), Some("shampoo".to_string()));
    }

    #[test]
    fn test_any_contains() {
        let needle = search_needle(Some("keratina")).unwrap();
        assert!(any_contains(&needle, &[Some("Tratamiento"), Some("con Queratina y KERATINA")]));
        assert!(!any_contains(&needle, &[Some("Tratamiento"), None]));
        assert!(!any_contains(&needle, &[]));
    }

    #[test]
    fn test_compare_text_ignores_case_and_accents() {
        assert_eq!(compare_text("árbol", "Banco"), Ordering::Less);
        assert_eq!(compare_text("zeta", "Ámbar"), Ordering::Greater);
        assert_eq!(compare_text("abc", "abc"), Ordering::Equal);
        // Same primary key, raw bytes decide
        assert_ne!(compare_text("Corte", "corte"), Ordering::Equal);
    }

    #[test]
    fn test_compare_text_enye_after_n() {
        assert_eq!(compare_text("nube", "ñandu"), Ordering::Less);
        assert_eq!(compare_text("nz", "ña"), Ordering::Less);
        assert_eq!(compare_text("ñu", "oso"), Ordering::Less);
    }
}
