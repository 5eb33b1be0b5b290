//! Typo-tolerant text similarity
//!
//! Similarities are in `0.0..=1.0`. Inputs are compared lowercased and split
//! into alphanumeric tokens, so `react expert` lines up with
//! `dev/frontend/react-expert`.

use strsim::normalized_damerau_levenshtein;

/// Similarity of a substring hit that is not an exact match
const CONTAINS_SIMILARITY: f64 = 0.9;

/// Lowercase alphanumeric tokens of `text`
pub fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn token_similarity(query: &str, candidate: &str) -> f64 {
    if query == candidate {
        1.0
    } else if candidate.starts_with(query) {
        CONTAINS_SIMILARITY
    } else {
        normalized_damerau_levenshtein(query, candidate)
    }
}

/// Similarity of a lowercased `query` against free text
///
/// The best of a whole-string comparison and a token-wise comparison, where
/// each query token is matched to its closest text token and the results are
/// averaged.
pub fn text_similarity(query: &str, query_tokens: &[String], text: &str) -> f64 {
    let text = text.to_lowercase();
    if text.is_empty() || query.is_empty() {
        return 0.0;
    }
    if text == query {
        return 1.0;
    }
    if text.contains(query) {
        return CONTAINS_SIMILARITY;
    }

    let whole = normalized_damerau_levenshtein(query, &text);

    let text_tokens = tokens(&text);
    if query_tokens.is_empty() || text_tokens.is_empty() {
        return whole;
    }
    let total: f64 = query_tokens
        .iter()
        .map(|q| {
            text_tokens
                .iter()
                .map(|t| token_similarity(q, t))
                .fold(0.0, f64::max)
        })
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let tokenwise = total / query_tokens.len() as f64;

    whole.max(tokenwise)
}
