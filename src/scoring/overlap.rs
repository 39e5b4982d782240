use std::collections::HashSet;

const STOPWORDS: [&str; 28] = [
    "the", "a", "an", "and", "or", "of", "to", "in", "on", "for", "is", "are", "was", "were",
    "be", "this", "that", "with", "by", "as", "at", "it", "from", "we", "our", "their", "they",
    "you",
];

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| word.len() > 1 && !STOPWORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// First `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Share of each sentence's content words that also appear in `reference`.
/// All zeros when the reference has no content words.
pub fn overlap_scores<S: AsRef<str>>(sentences: &[S], reference: &str) -> Vec<f64> {
    let reference_tokens: HashSet<String> = tokenize(reference).into_iter().collect();
    if reference_tokens.is_empty() {
        return vec![0.0; sentences.len()];
    }

    sentences
        .iter()
        .map(|sentence| {
            let tokens = tokenize(sentence.as_ref());
            if tokens.is_empty() {
                return 0.0;
            }
            let hits = tokens
                .iter()
                .filter(|token| reference_tokens.contains(*token))
                .count();
            hits as f64 / tokens.len() as f64
        })
        .collect()
}
