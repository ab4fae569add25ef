use std::collections::HashMap;

/// Split text into whitespace-delimited tokens.
///
/// Line terminators (`\n`, `\r\n`, lone `\r`) act as plain separators, so a
/// token never spans lines. Tokens are returned verbatim: no case folding,
/// no punctuation stripping, no stemming.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Count exact occurrences of each vocabulary term in `text`.
///
/// The returned vector is aligned with `terms`: `counts[i]` is the number of
/// tokens equal to `terms[i]`.
pub fn count_terms<S: AsRef<str>>(text: &str, terms: &[S]) -> Vec<u64> {
    let mut seen: HashMap<&str, u64> = HashMap::new();
    for token in tokenize(text) {
        *seen.entry(token).or_insert(0) += 1;
    }
    terms
        .iter()
        .map(|t| seen.get(t.as_ref()).copied().unwrap_or(0))
        .collect()
}
