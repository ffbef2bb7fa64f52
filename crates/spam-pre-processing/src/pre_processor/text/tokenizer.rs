//! Treebank-style word tokenizer.
//!
//! Follows the conventions of NLTK's `word_tokenize`: text is first split into
//! sentences, then each sentence goes through the Penn Treebank substitution
//! rules, which pad punctuation, quotes and clitics with spaces before a final
//! whitespace split.

use std::sync::LazyLock;

use regex::Regex;

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

fn compile(specs: &[(&str, &'static str)]) -> Vec<Rule> {
    specs
        .iter()
        .map(|&(pattern, replacement)| Rule {
            pattern: Regex::new(pattern).expect("tokenizer rule patterns are valid"),
            replacement,
        })
        .collect()
}

fn apply(rules: &[Rule], text: String) -> String {
    rules.iter().fold(text, |text, rule| {
        rule.pattern
            .replace_all(&text, rule.replacement)
            .into_owned()
    })
}

static STARTING_QUOTES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    compile(&[
        (r"([«“‘„]|`+)", " ${1} "),
        (r#"^""#, "``"),
        (r"(``)", " ${1} "),
        (r#"([ (\[{<])("|'{2})"#, "${1} `` "),
        // A quote before a one-letter word that is not a clitic (`'s`, `'t`, ...).
        (r"'([\w&&[^mtsdnMTSDN]])\b", "' ${1}"),
    ])
});

static PUNCTUATION: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    compile(&[
        (r#"([^.])(\.)([\]\)}>"']*)\s*$"#, "${1} ${2} ${3} "),
        (r"([:,])([^\d])", " ${1} ${2}"),
        (r"([:,])$", " ${1} "),
        (r"\.{2,}", " ${0} "),
        (r"[;@#$%&]", " ${0} "),
        (r#"([^.])(\.)([\]\)}>"']*)\s*$"#, "${1} ${2}${3} "),
        (r"[?!]", " ${0} "),
        (r"([^'])' ", "${1} ' "),
        (r"[*]", " ${0} "),
    ])
});

static BRACKETS_AND_DASHES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    compile(&[(r"[\]\[\(\)\{\}<>]", " ${0} "), (r"--", " -- ")])
});

static ENDING_QUOTES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    compile(&[
        (r"([»”’])", " ${1} "),
        (r"''", " '' "),
        (r#"""#, " '' "),
        (r"([^' ])('[sS]|'[mM]|'[dD]|') ", "${1} ${2} "),
        (r"([^' ])('ll|'LL|'re|'RE|'ve|'VE|n't|N'T) ", "${1} ${2} "),
    ])
});

// The regex crate has no lookahead, so `wanna` consumes its trailing
// whitespace and puts it back.
static CONTRACTIONS: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    compile(&[
        (r"(?i)\b(can)(not)\b", " ${1} ${2} "),
        (r"(?i)\b(d)('ye)\b", " ${1} ${2} "),
        (r"(?i)\b(gim)(me)\b", " ${1} ${2} "),
        (r"(?i)\b(gon)(na)\b", " ${1} ${2} "),
        (r"(?i)\b(got)(ta)\b", " ${1} ${2} "),
        (r"(?i)\b(lem)(me)\b", " ${1} ${2} "),
        (r"(?i)\b(more)('n)\b", " ${1} ${2} "),
        (r"(?i)\b(wan)(na)(\s)", " ${1} ${2} ${3}"),
        (r"(?i) ('t)(is)\b", " ${1} ${2} "),
        (r"(?i) ('t)(was)\b", " ${1} ${2} "),
    ])
});

static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[.!?]+["')\]]*\s+"#).expect("sentence boundary pattern is valid")
});

/// Words that end in a period without ending the sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "inc", "ltd",
    "co", "corp", "no", "approx", "dept", "est", "jan", "feb", "mar", "apr", "jun", "jul", "aug",
    "sep", "sept", "oct", "nov", "dec", "u.s", "u.k",
];

fn is_abbreviation(word: &str) -> bool {
    let word = word
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    let mut chars = word.chars();
    let is_initial = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic());
    is_initial || ABBREVIATIONS.contains(&word.as_str())
}

fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_END.find_iter(text) {
        let preceding = &text[start..boundary.start()];
        let last_word = preceding.rsplit(char::is_whitespace).next().unwrap_or("");
        if boundary.as_str().starts_with('.') && is_abbreviation(last_word) {
            continue;
        }
        sentences.push(text[start..boundary.end()].trim());
        start = boundary.end();
    }
    sentences.push(text[start..].trim());

    sentences.retain(|sentence| !sentence.is_empty());
    sentences
}

fn tokenize_sentence(sentence: &str) -> Vec<String> {
    let text = apply(&STARTING_QUOTES, sentence.to_owned());
    let text = apply(&PUNCTUATION, text);
    let text = apply(&BRACKETS_AND_DASHES, text);
    let text = apply(&ENDING_QUOTES, format!(" {text} "));
    let text = apply(&CONTRACTIONS, text);

    text.split_whitespace().map(str::to_owned).collect()
}

/// Split `text` into word and punctuation tokens.
///
/// Never fails: any string, including the empty string, produces a (possibly
/// empty) token list.
#[must_use]
pub fn word_tokenize(text: &str) -> Vec<String> {
    split_sentences(text)
        .into_iter()
        .flat_map(tokenize_sentence)
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        word_tokenize(text)
    }

    #[test]
    fn test_separates_trailing_punctuation() {
        assert_eq!(tokens("Hello, world!"), ["Hello", ",", "world", "!"]);
    }

    #[test]
    fn test_splits_contractions() {
        assert_eq!(tokens("I don't know"), ["I", "do", "n't", "know"]);
        assert_eq!(tokens("you've won"), ["you", "'ve", "won"]);
        assert_eq!(tokens("it's here"), ["it", "'s", "here"]);
        assert_eq!(tokens("I cannot go"), ["I", "can", "not", "go"]);
        assert_eq!(tokens("gonna wanna go"), ["gon", "na", "wan", "na", "go"]);
    }

    #[test]
    fn test_keeps_numbers_with_separators() {
        assert_eq!(tokens("$500,000!"), ["$", "500,000", "!"]);
        assert_eq!(tokens("pi is 3.14 ok"), ["pi", "is", "3.14", "ok"]);
    }

    #[test]
    fn test_splits_sentences_before_final_periods() {
        assert_eq!(
            tokens("Activity detected. Verify now."),
            ["Activity", "detected", ".", "Verify", "now", "."]
        );
    }

    #[test]
    fn test_abbreviations_do_not_end_sentences() {
        assert_eq!(
            tokens("Mr. Smith went home. He slept."),
            ["Mr.", "Smith", "went", "home", ".", "He", "slept", "."]
        );
    }

    #[test]
    fn test_quotes_and_brackets() {
        assert_eq!(
            tokens(r#"He said "hi" (twice)"#),
            ["He", "said", "``", "hi", "''", "(", "twice", ")"]
        );
    }

    #[test]
    fn test_quoted_single_letter() {
        assert_eq!(tokens("grade 'b' student"), ["grade", "'", "b", "'", "student"]);
        assert_eq!(tokens("it's 'd' day"), ["it", "'s", "'d", "'", "day"]);
    }

    #[test]
    fn test_single_letter_before_period_is_an_initial() {
        assert_eq!(tokens("Plan B. Free prize"), ["Plan", "B.", "Free", "prize"]);
    }

    #[test]
    fn test_repeated_punctuation_and_ellipsis() {
        assert_eq!(tokens("today!!!"), ["today", "!", "!", "!"]);
        assert_eq!(tokens("wait... what"), ["wait", "...", "what"]);
    }

    #[test]
    fn test_colons_and_symbols() {
        assert_eq!(tokens("alert: 50% off @ shop"), ["alert", ":", "50", "%", "off", "@", "shop"]);
        assert_eq!(tokens("meet at 10:30"), ["meet", "at", "10:30"]);
    }

    #[test]
    fn test_unicode_words_pass_through() {
        assert_eq!(tokens("café crème brûlée"), ["café", "crème", "brûlée"]);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(tokens("").is_empty());
        assert!(tokens("   \n\t ").is_empty());
    }
}
