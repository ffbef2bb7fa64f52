use ahash::AHashMap as HashMap;

/// Count word n-grams for every size in `ngram_range` (inclusive). Multi-word
/// n-grams are keyed by their tokens joined with a single space.
pub fn count_ngrams(tokens: &[String], ngram_range: (usize, usize)) -> HashMap<String, usize> {
    let (min_n, max_n) = ngram_range;
    let mut ngram_counter = HashMap::new();

    for n in min_n..=max_n {
        for window in tokens.windows(n) {
            *ngram_counter.entry(window.join(" ")).or_insert(0) += 1;
        }
    }
    ngram_counter
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|&w| w.to_owned()).collect()
    }

    #[test]
    fn test_unigram_counts() {
        let counts = count_ngrams(&tokens(&["free", "free", "prize"]), (1, 1));
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["free"], 2);
        assert_eq!(counts["prize"], 1);
    }

    #[test]
    fn test_bigrams_join_with_space() {
        let counts = count_ngrams(&tokens(&["claim", "free", "prize"]), (1, 2));
        assert_eq!(counts.len(), 5);
        assert_eq!(counts["claim free"], 1);
        assert_eq!(counts["free prize"], 1);
    }

    #[test]
    fn test_ngrams_longer_than_document_are_skipped() {
        let counts = count_ngrams(&tokens(&["hello"]), (2, 3));
        assert!(counts.is_empty());
    }
}
