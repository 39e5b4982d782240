/// Split prose into sentences: whitespace runs collapse to one space, and a
/// sentence ends at `.`, `?` or `!` followed by whitespace. Empty pieces are
/// dropped.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();

    let mut sentences = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for word in words {
        current.push(word);
        if word.ends_with(['.', '?', '!']) {
            sentences.push(current.join(" "));
            current.clear();
        }
    }
    if !current.is_empty() {
        sentences.push(current.join(" "));
    }
    sentences
}
