// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sentence tokenization for the embedding demos.
//!
//! Tokens are lower-cased alphabetic runs of 2 to 15 characters. Digits,
//! punctuation and underscores split tokens and are never part of one.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Minimum token length in characters.
pub const MIN_TOKEN_LEN: usize = 2;

/// Maximum token length in characters.
pub const MAX_TOKEN_LEN: usize = 15;

static ALPHABETIC_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\W\d_]+").expect("valid token regex"));

const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "done",
    "down", "due", "during", "each", "either", "else", "elsewhere", "enough", "etc", "even",
    "ever", "every", "everyone", "everything", "everywhere", "except", "few", "for", "former",
    "formerly", "from", "further", "had", "has", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "i", "ie", "if", "in", "indeed", "into", "is", "it", "its", "itself",
    "just", "last", "latter", "latterly", "least", "less", "made", "make", "many", "may", "me",
    "meanwhile", "might", "mine", "more", "moreover", "most", "mostly", "much", "must", "my",
    "myself", "namely", "neither", "never", "nevertheless", "next", "no", "nobody", "none",
    "noone", "nor", "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one",
    "only", "onto", "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out",
    "over", "own", "per", "perhaps", "please", "quite", "rather", "re", "really", "same", "say",
    "see", "seem", "seemed", "seeming", "seems", "several", "she", "should", "since", "so",
    "some", "somehow", "someone", "something", "sometime", "sometimes", "somewhere", "still",
    "such", "than", "that", "the", "their", "them", "themselves", "then", "thence", "there",
    "thereafter", "thereby", "therefore", "therein", "thereupon", "these", "they", "this",
    "those", "though", "through", "throughout", "thru", "thus", "to", "together", "too",
    "toward", "towards", "under", "until", "up", "upon", "us", "used", "using", "various", "very",
    "via", "was", "we", "well", "were", "what", "whatever", "when", "whence", "whenever",
    "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever", "whether",
    "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why", "will",
    "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

static STOPWORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ENGLISH_STOPWORDS.iter().copied().collect());

/// Whether `word` (already lower-cased) is an English stopword.
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Splits sentences into training tokens.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    remove_stopwords: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            remove_stopwords: true,
        }
    }
}

impl Tokenizer {
    pub fn new(remove_stopwords: bool) -> Self {
        Self { remove_stopwords }
    }

    pub fn tokenize(&self, sentence: &str) -> Vec<String> {
        let lowered = sentence.to_lowercase();
        ALPHABETIC_RUN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| {
                let len = token.chars().count();
                (MIN_TOKEN_LEN..=MAX_TOKEN_LEN).contains(&len)
            })
            .filter(|token| !(self.remove_stopwords && is_stopword(token)))
            .map(str::to_string)
            .collect()
    }

    /// Tokenize each sentence; the result has one entry per input sentence.
    pub fn tokenize_all<S: AsRef<str>>(&self, sentences: &[S]) -> Vec<Vec<String>> {
        sentences
            .iter()
            .map(|sentence| self.tokenize(sentence.as_ref()))
            .collect()
    }
}

/// Whether tokenization produced nothing usable at all.
pub fn has_tokens(tokenized: &[Vec<String>]) -> bool {
    tokenized.iter().any(|tokens| !tokens.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_drops_stopwords() {
        let tokens = Tokenizer::default().tokenize("The Company reported its ESG targets.");
        assert_eq!(tokens, vec!["company", "reported", "esg", "targets"]);
    }

    #[test]
    fn keeps_stopwords_when_asked() {
        let tokens = Tokenizer::new(false).tokenize("the cat");
        assert_eq!(tokens, vec!["the", "cat"]);
    }

    #[test]
    fn drops_non_alphabetic_and_out_of_range_tokens() {
        let tokens = Tokenizer::new(false).tokenize("co2 e-mail x 2023 supercalifragilistic under_score");
        assert_eq!(tokens, vec!["co", "mail", "under", "score"]);
    }

    #[test]
    fn handles_non_ascii_letters() {
        let tokens = Tokenizer::default().tokenize("Café naïve résumé");
        assert_eq!(tokens, vec!["café", "naïve", "résumé"]);
    }

    #[test]
    fn detects_empty_tokenization() {
        let tokenizer = Tokenizer::default();
        assert!(!has_tokens(&tokenizer.tokenize_all(&["the and of", "123 !!"])));
        assert!(has_tokens(&tokenizer.tokenize_all(&["the and of", "green energy"])));
        assert!(!has_tokens(&tokenizer.tokenize_all::<&str>(&[])));
    }
}
