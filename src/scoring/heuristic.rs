/// Length, digit and position based importance in [0, 1].
///
/// `0.6 * min(words / 20, 1) + 0.3 * has_digit + 0.1 * position`, where
/// position is 0.5 for the first and last sentence and 0 otherwise.
pub fn heuristic_scores<S: AsRef<str>>(sentences: &[S]) -> Vec<f64> {
    let n = sentences.len();
    sentences
        .iter()
        .enumerate()
        .map(|(idx, sentence)| {
            let sentence = sentence.as_ref();
            let words = sentence.split_whitespace().count();
            let len_score = (words as f64 / 20.0).min(1.0);
            let has_number = if sentence.chars().any(|c| c.is_ascii_digit()) {
                1.0
            } else {
                0.0
            };
            let position_bonus = if idx == 0 || idx + 1 == n { 0.5 } else { 0.0 };
            len_score * 0.6 + has_number * 0.3 + position_bonus * 0.1
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_components() {
        let sentences = [
            "Short opener.",
            "This middle sentence mentions 2024 and has exactly ten words in it.",
            "A plain middle sentence.",
            "The closing line.",
        ];
        let scores = heuristic_scores(&sentences);

        assert_eq!(scores.len(), 4);
        // 2 words, first sentence.
        assert!((scores[0] - (0.1 * 0.6 + 0.05)).abs() < 1e-9);
        // 12 words with a digit.
        assert!((scores[1] - (0.6 * 0.6 + 0.3)).abs() < 1e-9);
        assert!((scores[2] - (0.2 * 0.6)).abs() < 1e-9);
        assert!((scores[3] - (0.15 * 0.6 + 0.05)).abs() < 1e-9);
    }

    #[test]
    fn scores_stay_in_unit_range() {
        let long = "word 1 ".repeat(50);
        let scores = heuristic_scores(&[long.as_str(), "", long.as_str()]);
        assert_eq!(scores.len(), 3);
        for score in scores {
            assert!((0.0..=1.0).contains(&score), "{score} out of range");
        }
    }

    #[test]
    fn empty_input() {
        assert!(heuristic_scores::<&str>(&[]).is_empty());
    }
}
