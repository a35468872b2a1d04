//! Free-text address to [`District`] inference.
//!
//! Table keys and the address are both reduced to normalized word tokens (see [`super::normalizer`]). Keys live in a
//! token trie, and the address is scanned from every token position for the longest key that matches whole tokens.
//! This gives the two properties the checkout relies on:
//!
//! * A key only matches complete words. `Hoàng Sa` does not match inside `Hoàng Sang`.
//! * Precedence between overlapping keys is explicit: the longest match (in tokens) wins, ties go to the match that
//!   starts earliest in the address. `Nguyễn Tất Thành Nối Dài` therefore beats `Nguyễn Tất Thành`, whatever order the
//!   table lists them in.
//!
//! Street matches always take priority over district keyword matches.

use std::collections::HashMap;

use log::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::{
    normalizer::tokenize,
    tables::{DA_NANG_DISTRICT_KEYWORDS, DA_NANG_STREETS},
    District,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("The table key '{0}' contains no letters or digits")]
    EmptyKey(String),
    #[error("'{key}' and '{existing}' normalize to the same key ({existing_district} / {district})")]
    DuplicateKey { key: String, existing: String, existing_district: District, district: District },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchSource {
    Street,
    DistrictName,
}

/// The result of a successful resolution, with enough detail to explain it to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictMatch {
    pub district: District,
    /// The table key that matched, as written in the table
    pub matched_key: String,
    pub source: MatchSource,
    /// Token offset of the match in the normalized address
    pub position: usize,
}

//--------------------------------------      TokenTrie       ---------------------------------------------------------
#[derive(Debug, Default, Clone)]
struct TrieNode {
    children: HashMap<String, TrieNode>,
    terminal: Option<(District, String)>,
}

#[derive(Debug, Default, Clone)]
struct TokenTrie {
    root: TrieNode,
    len: usize,
}

struct TrieHit<'a> {
    district: District,
    key: &'a str,
    start: usize,
    tokens: usize,
}

impl TokenTrie {
    fn insert(&mut self, key: &str, district: District) -> Result<(), ResolutionError> {
        let tokens = tokenize(key);
        if tokens.is_empty() {
            return Err(ResolutionError::EmptyKey(key.to_string()));
        }
        let mut node = &mut self.root;
        for token in tokens {
            node = node.children.entry(token).or_default();
        }
        if let Some((existing_district, existing)) = &node.terminal {
            return Err(ResolutionError::DuplicateKey {
                key: key.to_string(),
                existing: existing.clone(),
                existing_district: *existing_district,
                district,
            });
        }
        node.terminal = Some((district, key.to_string()));
        self.len += 1;
        Ok(())
    }

    /// The longest key that matches at `start`, if any.
    fn longest_at(&self, tokens: &[String], start: usize) -> Option<TrieHit<'_>> {
        let mut node = &self.root;
        let mut best = None;
        for (offset, token) in tokens.iter().skip(start).enumerate() {
            match node.children.get(token) {
                Some(next) => node = next,
                None => break,
            }
            if let Some((district, key)) = &node.terminal {
                best = Some(TrieHit { district: *district, key: key.as_str(), start, tokens: offset + 1 });
            }
        }
        best
    }

    /// Longest match anywhere in the token stream; the earliest one wins a tie.
    fn best_match(&self, tokens: &[String]) -> Option<TrieHit<'_>> {
        let mut best: Option<TrieHit<'_>> = None;
        for start in 0..tokens.len() {
            if let Some(hit) = self.longest_at(tokens, start) {
                let better = best.as_ref().map_or(true, |b| hit.tokens > b.tokens);
                if better {
                    best = Some(hit);
                }
            }
        }
        best
    }
}

//--------------------------------------   DistrictResolver   ---------------------------------------------------------
/// Resolves free-text addresses to districts using a street table and a district keyword table.
///
/// Resolution is pure: it never touches the network and always gives the same answer for the same text.
#[derive(Debug, Clone)]
pub struct DistrictResolver {
    streets: TokenTrie,
    keywords: TokenTrie,
}

impl DistrictResolver {
    /// Builds a resolver from custom tables. Fails if a key is blank or if two keys of the same table normalize to the
    /// same token sequence, since one of them could never match.
    pub fn new<'a, S, K>(streets: S, keywords: K) -> Result<Self, ResolutionError>
    where
        S: IntoIterator<Item = (&'a str, District)>,
        K: IntoIterator<Item = (&'a str, District)>,
    {
        let mut street_trie = TokenTrie::default();
        for (key, district) in streets {
            street_trie.insert(key, district)?;
        }
        let mut keyword_trie = TokenTrie::default();
        for (key, district) in keywords {
            keyword_trie.insert(key, district)?;
        }
        debug!("🧭️ District resolver loaded {} streets and {} keywords", street_trie.len, keyword_trie.len);
        Ok(Self { streets: street_trie, keywords: keyword_trie })
    }

    /// The resolver for Đà Nẵng, built from the static tables in [`crate::address::tables`].
    pub fn da_nang() -> Result<Self, ResolutionError> {
        Self::new(DA_NANG_STREETS.iter().copied(), DA_NANG_DISTRICT_KEYWORDS.iter().copied())
    }

    pub fn street_count(&self) -> usize {
        self.streets.len
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len
    }

    /// Best-guess district for the address, or `None` if neither a street nor a district name is recognised.
    pub fn resolve_district(&self, free_text: &str) -> Option<District> {
        self.resolve(free_text).map(|m| m.district)
    }

    /// Like [`Self::resolve_district`], but also reports which table entry matched.
    pub fn resolve(&self, free_text: &str) -> Option<DistrictMatch> {
        let tokens = tokenize(free_text);
        let found = self
            .streets
            .best_match(&tokens)
            .map(|hit| (hit, MatchSource::Street))
            .or_else(|| self.keywords.best_match(&tokens).map(|hit| (hit, MatchSource::DistrictName)));
        match found {
            Some((hit, source)) => {
                trace!("🧭️ '{free_text}' matched '{}' ({source:?}) -> {}", hit.key, hit.district);
                Some(DistrictMatch {
                    district: hit.district,
                    matched_key: hit.key.to_string(),
                    source,
                    position: hit.start,
                })
            },
            None => {
                debug!("🧭️ Could not resolve a district for '{free_text}'");
                None
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const NO_KEYWORDS: [(&str, District); 0] = [];

    fn resolver() -> DistrictResolver {
        DistrictResolver::da_nang().expect("static tables are valid")
    }

    #[test]
    fn static_tables_load() {
        let r = resolver();
        assert_eq!(r.street_count(), DA_NANG_STREETS.len());
        assert_eq!(r.keyword_count(), DA_NANG_DISTRICT_KEYWORDS.len());
    }

    #[test]
    fn street_lookup_ignores_accents_and_case() {
        let r = resolver();
        assert_eq!(r.resolve_district("12 Bạch Đằng, Đà Nẵng"), Some(District::HaiChau));
        assert_eq!(r.resolve_district("12 bach dang, da nang"), Some(District::HaiChau));
        assert_eq!(r.resolve_district("45 DIEN BIEN PHU"), Some(District::ThanhKhe));
        assert_eq!(r.resolve_district("k12/3 ngo quyen"), Some(District::SonTra));
    }

    #[test]
    fn street_key_written_as_one_word() {
        let r = DistrictResolver::new([("ExampleStreet", District::CamLe)], NO_KEYWORDS).unwrap();
        assert_eq!(r.resolve_district("12 examplestreet, CityName"), Some(District::CamLe));
        assert_eq!(r.resolve_district("12 EXAMPLESTREET"), Some(District::CamLe));
        assert_eq!(r.resolve_district("12 ExampleStreets"), None);
    }

    #[test]
    fn whole_words_only() {
        let r = resolver();
        // "Hoàng Sa" must not match inside "Hoàng Sang"
        assert_eq!(r.resolve_district("7 Hoàng Sang"), None);
        // "Âu Cơ" must not match inside "Lâu Cơm"
        assert_eq!(r.resolve_district("Lau Com market"), None);
        assert_eq!(r.resolve_district("7 Hoàng Sa"), Some(District::SonTra));
    }

    #[test]
    fn longest_street_wins() {
        let r = resolver();
        assert_eq!(r.resolve_district("88 Nguyễn Tất Thành"), Some(District::ThanhKhe));
        assert_eq!(r.resolve_district("88 Nguyễn Tất Thành nối dài"), Some(District::LienChieu));
        // Table order does not matter
        let r = DistrictResolver::new(
            [("Nguyễn Tất Thành Nối Dài", District::LienChieu), ("Nguyễn Tất Thành", District::ThanhKhe)],
            NO_KEYWORDS,
        )
        .unwrap();
        assert_eq!(r.resolve_district("88 Nguyen Tat Thanh noi dai"), Some(District::LienChieu));
        assert_eq!(r.resolve_district("88 Nguyen Tat Thanh"), Some(District::ThanhKhe));
    }

    #[test]
    fn equal_length_matches_prefer_the_first() {
        let r = resolver();
        let m = r.resolve("Góc Lê Duẩn và Điện Biên Phủ").unwrap();
        // Điện Biên Phủ has three tokens, Lê Duẩn two
        assert_eq!(m.district, District::ThanhKhe);
        let m = r.resolve("Góc Trần Phú và Ngô Quyền").unwrap();
        assert_eq!(m.district, District::HaiChau);
        assert_eq!(m.matched_key, "Trần Phú");
        assert_eq!(m.position, 1);
    }

    #[test]
    fn streets_beat_district_names() {
        let r = resolver();
        let m = r.resolve("20 Võ Nguyên Giáp, quận Sơn Trà").unwrap();
        assert_eq!(m.district, District::NguHanhSon);
        assert_eq!(m.source, MatchSource::Street);
    }

    #[test]
    fn falls_back_to_district_names() {
        let r = resolver();
        let m = r.resolve("Kiệt 5, phường Hòa Minh, quận Liên Chiểu").unwrap();
        assert_eq!(m.district, District::LienChieu);
        assert_eq!(m.source, MatchSource::DistrictName);
        assert_eq!(r.resolve_district("thon 3, xa hoa phong, huyen hoa vang"), Some(District::HoaVang));
    }

    #[test]
    fn unknown_addresses() {
        let r = resolver();
        assert_eq!(r.resolve_district(""), None);
        assert_eq!(r.resolve_district("1 Đinh Tiên Hoàng, Hà Nội"), None);
    }

    #[test]
    fn idempotent_resolution() {
        let r = resolver();
        let text = "  Số 3, ĐƯỜNG Trường Chinh ";
        assert_eq!(r.resolve(text), r.resolve(text));
        assert_eq!(r.resolve_district(text), Some(District::CamLe));
    }

    #[test]
    fn rejects_duplicate_keys() {
        let err = DistrictResolver::new([("Hòa Vang", District::HoaVang), ("Hoà Vang", District::CamLe)], NO_KEYWORDS);
        assert!(matches!(err, Err(ResolutionError::DuplicateKey { .. })));
        let err = DistrictResolver::new([("  ,  ", District::HoaVang)], NO_KEYWORDS);
        assert_eq!(err.unwrap_err(), ResolutionError::EmptyKey("  ,  ".to_string()));
    }
}
