//! Name normalization and string similarity primitives.
//!
//! Attendance logs are full of noise: honorifics, credential abbreviations,
//! device tokens appended by the meeting client ("Jane Doe (iPad)"), and
//! accented characters that registrant directories spell plainly. Everything
//! here reduces names to a canonical lowercase form so that grouping and
//! matching operate on comparable strings.

/// Tokens removed from names before comparison.
///
/// Covers honorifics, common credential abbreviations, generational
/// suffixes, and device names that meeting clients append to display names.
const NOISE_TOKENS: &[&str] = &[
    // Honorifics
    "dr", "mr", "mrs", "ms", "prof",
    // Credentials
    "cpa", "cma", "mba", "phd", "cgba", "cfm", "ea", "cb", "cisa", "cism", "csca",
    // Generational suffixes
    "jr", "sr", "ii", "iii", "iv",
    // Device tokens
    "iphone", "ipad", "android", "mobile", "desktop", "pc",
];

/// Normalizes a display name into a canonical matching key.
///
/// Lowercases, folds diacritics, strips parenthetical text, drops
/// everything that is not a letter or a space, removes noise tokens,
/// and collapses whitespace. Returns an empty string if nothing
/// meaningful survives.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let mut cleaned = String::with_capacity(name.len());
    let mut paren_depth: u32 = 0;

    for ch in name.chars() {
        match ch {
            '(' => paren_depth += 1,
            ')' => paren_depth = paren_depth.saturating_sub(1),
            _ if paren_depth > 0 => {}
            _ if ch.is_whitespace() => cleaned.push(' '),
            _ if ch.is_ascii_alphabetic() => cleaned.push(ch.to_ascii_lowercase()),
            _ => {
                // Digits, punctuation, and unfoldable symbols are dropped.
                if let Some(folded) = fold_diacritic(ch) {
                    for f in folded.chars() {
                        cleaned.push(f.to_ascii_lowercase());
                    }
                }
            }
        }
    }

    let tokens: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|t| !NOISE_TOKENS.contains(t))
        .collect();

    tokens.join(" ")
}

/// Folds an accented character to its unaccented ASCII base.
///
/// Only covers the Latin range commonly seen in attendance exports.
/// Returns `None` for characters without a mapping.
fn fold_diacritic(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => "A",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => "E",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'į' => "i",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ĩ' | 'Ī' | 'Į' => "I",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' | 'Ŏ' | 'Ő' => "O",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' => "u",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' => "U",
        'ç' | 'ć' | 'č' => "c",
        'Ç' | 'Ć' | 'Č' => "C",
        'ñ' | 'ń' | 'ň' => "n",
        'Ñ' | 'Ń' | 'Ň' => "N",
        'ý' | 'ÿ' => "y",
        'Ý' | 'Ÿ' => "Y",
        'š' | 'ś' => "s",
        'Š' | 'Ś' => "S",
        'ž' | 'ź' | 'ż' => "z",
        'Ž' | 'Ź' | 'Ż' => "Z",
        'ł' => "l",
        'Ł' => "L",
        'đ' => "d",
        'Đ' => "D",
        'ß' => "ss",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        _ => return None,
    };
    Some(folded)
}

/// Levenshtein edit distance over characters.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr: Vec<usize> = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Similarity in \[0.0, 1.0\] derived from edit distance.
///
/// Identical strings score 1.0; if either side is empty the score is 0.0.
#[must_use]
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let distance = levenshtein(a, b);
    let max_len = a.chars().count().max(b.chars().count());

    #[expect(clippy::cast_precision_loss, reason = "name lengths are tiny")]
    let score = 1.0 - (distance as f64 / max_len as f64);
    score
}

/// Token-level similarity between two normalized names.
///
/// Each token of `a` is scored against its best counterpart in `b`:
/// exact match scores 1.0, a prefix containment between tokens of length
/// >= 3 scores `min_len / max_len`, and otherwise a high edit similarity
/// (> 0.85) counts at face value. The token scores are summed and divided
/// by the larger token count so extra tokens on either side dilute the
/// result.
#[must_use]
pub fn token_similarity(a: &str, b: &str) -> f64 {
    let tokens_a: Vec<&str> = a.split_whitespace().filter(|t| t.len() > 1).collect();
    let tokens_b: Vec<&str> = b.split_whitespace().filter(|t| t.len() > 1).collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let mut total = 0.0;
    for ta in &tokens_a {
        let mut best = 0.0_f64;
        for tb in &tokens_b {
            best = best.max(token_pair_score(ta, tb));
        }
        total += best;
    }

    #[expect(clippy::cast_precision_loss, reason = "token counts are tiny")]
    let divisor = tokens_a.len().max(tokens_b.len()) as f64;
    total / divisor
}

/// Scores one token of `a` against one token of `b`.
fn token_pair_score(ta: &str, tb: &str) -> f64 {
    if ta == tb {
        return 1.0;
    }
    if ta.len() < 3 || tb.len() < 3 {
        return 0.0;
    }

    if ta.starts_with(tb) || tb.starts_with(ta) {
        let min_len = ta.len().min(tb.len());
        let max_len = ta.len().max(tb.len());
        #[expect(clippy::cast_precision_loss, reason = "name lengths are tiny")]
        let score = min_len as f64 / max_len as f64;
        return score;
    }

    let sim = edit_similarity(ta, tb);
    if sim > 0.85 { sim } else { 0.0 }
}

/// Moves the final token (surname) to the front: "jane q doe" -> "doe jane q".
///
/// Names with fewer than two tokens are returned unchanged.
#[must_use]
pub fn reverse_name(name: &str) -> String {
    let mut parts: Vec<&str> = name.split_whitespace().collect();
    if parts.len() < 2 {
        return name.to_string();
    }

    let surname = parts.pop().unwrap_or_default();
    format!("{surname} {}", parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== normalize_name ==========

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize_name("  Jane Doe  "), "jane doe");
    }

    #[test]
    fn normalize_strips_honorifics_and_credentials() {
        assert_eq!(normalize_name("Dr. Jane Doe, CPA"), "jane doe");
        assert_eq!(normalize_name("Prof John Smith PhD"), "john smith");
    }

    #[test]
    fn normalize_strips_device_tokens() {
        assert_eq!(normalize_name("Jane Doe iPhone"), "jane doe");
        assert_eq!(normalize_name("John iPad Smith"), "john smith");
    }

    #[test]
    fn normalize_strips_parentheticals() {
        assert_eq!(normalize_name("Jane Doe (she/her)"), "jane doe");
        assert_eq!(normalize_name("John (Johnny) Smith"), "john smith");
    }

    #[test]
    fn normalize_folds_diacritics() {
        assert_eq!(normalize_name("José García"), "jose garcia");
        assert_eq!(normalize_name("Müller"), "muller");
        assert_eq!(normalize_name("Łukasz Señor"), "lukasz senor");
    }

    #[test]
    fn normalize_drops_digits_and_punctuation() {
        assert_eq!(normalize_name("Jane Doe 2"), "jane doe");
        assert_eq!(normalize_name("O'Brien, Pat"), "obrien pat");
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_name("Jane\t  Doe"), "jane doe");
    }

    #[test]
    fn normalize_empty_when_only_noise() {
        assert_eq!(normalize_name("Dr. (iPad)"), "");
        assert_eq!(normalize_name(""), "");
    }

    // ========== levenshtein / edit_similarity ==========

    #[test]
    fn levenshtein_basic_distances() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("john", "jon"), 1);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn edit_similarity_identical_is_one() {
        assert!((edit_similarity("jane", "jane") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn edit_similarity_empty_is_zero() {
        assert!((edit_similarity("", "jane")).abs() < f64::EPSILON);
        assert!((edit_similarity("jane", "")).abs() < f64::EPSILON);
    }

    #[test]
    fn edit_similarity_john_jon() {
        // Distance 1 over max length 4.
        assert!((edit_similarity("john", "jon") - 0.75).abs() < 1e-9);
    }

    // ========== token_similarity ==========

    #[test]
    fn token_similarity_exact_tokens() {
        assert!((token_similarity("jane doe", "jane doe") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn token_similarity_reordered_tokens() {
        // Token matching ignores order entirely.
        assert!((token_similarity("doe jane", "jane doe") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn token_similarity_prefix_containment() {
        // "rob" vs "robert": 3/6 for that token, "smith" exact.
        let score = token_similarity("rob smith", "robert smith");
        assert!((score - (0.5 + 1.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn token_similarity_rejects_weak_edits() {
        // "jane" vs "john" similarity is 0.25, below the 0.85 cutoff.
        assert!(token_similarity("jane", "john").abs() < f64::EPSILON);
    }

    #[test]
    fn token_similarity_empty_sides() {
        assert!(token_similarity("", "jane doe").abs() < f64::EPSILON);
        assert!(token_similarity("a b", "c d").abs() < f64::EPSILON);
    }

    #[test]
    fn token_similarity_extra_tokens_dilute() {
        // One of three tokens matches exactly.
        let score = token_similarity("jane", "jane middle doe");
        assert!((score - 1.0 / 3.0).abs() < 1e-9);
    }

    // ========== reverse_name ==========

    #[test]
    fn reverse_name_moves_surname_first() {
        assert_eq!(reverse_name("jane doe"), "doe jane");
        assert_eq!(reverse_name("jane q doe"), "doe jane q");
    }

    #[test]
    fn reverse_name_single_token_unchanged() {
        assert_eq!(reverse_name("jane"), "jane");
        assert_eq!(reverse_name(""), "");
    }
}
