//! Accent- and case-folding for Vietnamese free text.
//!
//! Addresses are typed by buyers and vendors in every possible way: with or without tone marks, upper or lower case,
//! and with `Đ` sometimes written as `D`. Both the lookup tables and the input go through [`normalize`] so that they
//! can be compared token by token.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("static token pattern"));

/// Folds letters that Unicode decomposition leaves alone onto their base Latin letter.
fn fold_letter(c: char) -> char {
    match c {
        'đ' | 'Đ' | 'ð' | 'Ð' => 'd',
        'ł' | 'Ł' => 'l',
        'ø' | 'Ø' => 'o',
        _ => c,
    }
}

/// Decomposes the text (NFD), drops the combining marks, folds special letters and lower-cases the result.
///
/// ```rust,ignore
/// assert_eq!(normalize("Đường Ngũ Hành Sơn"), "duong ngu hanh son");
/// ```
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(fold_letter)
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalizes the text and splits it into word tokens. Punctuation and whitespace are separators; they never appear
/// inside a token.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    TOKEN.find_iter(&normalized).map(|m| m.as_str().to_string()).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strips_tone_marks_and_case() {
        assert_eq!(normalize("Ngũ Hành Sơn"), "ngu hanh son");
        assert_eq!(normalize("LIÊN CHIỂU"), "lien chieu");
        assert_eq!(normalize("Cẩm Lệ"), "cam le");
        assert_eq!(normalize("Hòa Vang"), normalize("Hoà Vang"));
    }

    #[test]
    fn folds_d_with_stroke() {
        assert_eq!(normalize("Điện Biên Phủ"), "dien bien phu");
        assert_eq!(normalize("Bạch Đằng"), "bach dang");
        assert_eq!(normalize("đ"), normalize("D"));
    }

    #[test]
    fn idempotent() {
        for s in ["12 Trần Phú, Hải Châu", "K45/2 Lê Duẩn", "ExampleStreet"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn tokens_split_on_punctuation() {
        assert_eq!(tokenize("K12/4 Lê-Duẩn, Q.Hải Châu"), vec!["k12", "4", "le", "duan", "q", "hai", "chau"]);
        assert!(tokenize(" ,.; ").is_empty());
    }
}
