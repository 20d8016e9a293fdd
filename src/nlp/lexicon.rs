//! Built-in deterministic tagger
//!
//! Lexicon- and suffix-driven tagging over whitespace tokens. Closed word
//! classes come from small fixed lists; open classes fall back to
//! capitalization and suffix heuristics. Deliberately noisy in the same ways
//! a general-purpose tagger is noisy: it over-fires on capitalized words and
//! under-fires on names it has never seen, which is exactly the behavior the
//! extraction pipeline is built to compensate for.

use super::tagger::{PosTag, PosTagger, TaggedToken, TaggerResult};
use async_trait::async_trait;

const PRONOUNS: &[&str] = &[
    "i", "me", "my", "mine", "myself", "you", "your", "yours", "yourself", "he", "him", "his",
    "himself", "she", "her", "hers", "herself", "it", "its", "itself", "we", "us", "our", "ours",
    "ourselves", "they", "them", "their", "theirs", "themselves", "who", "whom", "whose", "this",
    "that", "these", "those", "someone", "anyone", "everyone", "something", "anything",
    "everything", "nothing",
];

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "some", "any", "no", "every", "each", "either", "neither", "both", "all",
    "few", "many", "much", "several", "most",
];

const PREPOSITIONS: &[&str] = &[
    "in", "on", "at", "by", "for", "with", "about", "against", "between", "into", "through",
    "during", "before", "after", "above", "below", "from", "up", "down", "out", "off", "over",
    "under", "to", "of", "near", "around",
];

const CONJUNCTIONS: &[&str] = &[
    "and", "but", "or", "nor", "so", "yet", "because", "although", "since", "unless", "while",
    "whereas", "if", "though", "when", "whenever", "where", "wherever",
];

const ADVERBS: &[&str] = &[
    "very", "really", "quite", "too", "also", "just", "then", "there", "here", "now", "soon",
    "later", "again", "always", "never", "often", "sometimes", "maybe", "perhaps", "today",
    "yesterday", "tomorrow", "tonight", "still", "already", "almost", "away", "back", "even",
    "ever", "far", "fast", "hard", "well", "not",
];

const ADJECTIVES: &[&str] = &[
    "good", "bad", "great", "nice", "big", "small", "little", "long", "short", "happy", "sad",
    "new", "old", "young", "early", "late", "fun", "tired", "busy", "quiet", "loud", "warm",
    "cold", "hot", "beautiful", "lovely", "amazing", "wonderful", "terrible", "awful", "okay",
    "fine", "favorite", "other", "own", "same", "different", "whole", "last", "next", "first",
];

const VERBS: &[&str] = &[
    "is", "am", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
    "did", "go", "goes", "went", "gone", "get", "got", "make", "made", "say", "said", "see",
    "saw", "seen", "met", "meet", "come", "came", "take", "took", "think", "thought", "know",
    "knew", "feel", "felt", "want", "wanted", "told", "tell", "ate", "eat", "ran", "run", "play",
    "played", "talk", "talked", "walk", "walked", "visit", "visited", "call", "called", "jumped",
    "jump", "stayed", "stay", "tried", "try", "seems", "seemed", "started", "start", "finished",
    "finish", "helped", "help", "worked", "work", "spoke", "wrote", "write", "read", "bought",
    "buy", "gave", "give", "found", "find", "left", "leave", "brought", "bring",
];

/// Common given names; the bulk person detector fires on these
const GIVEN_NAMES: &[&str] = &[
    "anna", "ben", "carlos", "clara", "daniel", "david", "elena", "emily", "emma", "grace",
    "hannah", "henry", "jack", "james", "john", "julia", "kate", "laura", "leo", "liam", "lily",
    "lucas", "lucy", "maria", "mark", "mary", "max", "mia", "michael", "nina", "noah", "oliver",
    "olivia", "paul", "peter", "rachel", "sam", "sarah", "sofia", "thomas", "tom",
];

/// Words that look like adverbs by suffix but are not
const LY_NOUN_EXCEPTIONS: &[&str] = &[
    "family", "italy", "july", "jelly", "belly", "rally", "lily", "holly", "assembly",
    "butterfly", "monopoly",
];

/// Words that look like verbs by suffix but are nouns
const ING_ED_NOUN_EXCEPTIONS: &[&str] = &[
    "morning", "evening", "wedding", "meeting", "feeling", "building", "painting", "ceiling",
    "hundred", "weekend",
];

/// Calendar words: capitalized in prose but never person candidates
const TIME_NOUNS: &[&str] = &[
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday", "january",
    "february", "march", "april", "june", "august", "september", "october", "november",
    "december", "may", "july", "spring", "summer", "autumn", "winter",
];

/// Deterministic lexicon/suffix tagger
///
/// The default tagger backend. Tests that need full control over tags use a
/// scripted fake instead.
#[derive(Debug, Clone, Default)]
pub struct LexiconTagger;

impl LexiconTagger {
    pub fn new() -> Self {
        Self
    }

    /// Split text into word tokens paired with a sentence-initial flag
    fn word_tokens(text: &str) -> Vec<(String, bool)> {
        let mut out = Vec::new();
        let mut sentence_start = true;
        for raw in text.split_whitespace() {
            let ends_sentence = raw.ends_with(['.', '!', '?']);
            let word: String = raw
                .trim_matches(|c: char| !c.is_alphanumeric() && c != '-' && c != '\'')
                .to_string();
            if !word.is_empty() {
                out.push((word, sentence_start));
                sentence_start = ends_sentence;
            } else {
                // punctuation-only token still terminates a sentence
                sentence_start = sentence_start || ends_sentence;
            }
        }
        out
    }

    fn is_capitalized(word: &str) -> bool {
        word.chars().next().is_some_and(|c| c.is_uppercase())
    }

    fn tag_one(word: &str, sentence_initial: bool) -> PosTag {
        let lower = word.to_lowercase();

        if word.chars().next().is_some_and(|c| c.is_ascii_digit()) && word.parse::<f64>().is_ok() {
            return PosTag::Value;
        }
        if PRONOUNS.contains(&lower.as_str()) {
            return PosTag::Pronoun;
        }
        if DETERMINERS.contains(&lower.as_str()) {
            return PosTag::Determiner;
        }
        if PREPOSITIONS.contains(&lower.as_str()) {
            return PosTag::Preposition;
        }
        if CONJUNCTIONS.contains(&lower.as_str()) {
            return PosTag::Conjunction;
        }
        if ADVERBS.contains(&lower.as_str())
            || (lower.len() > 4
                && lower.ends_with("ly")
                && !LY_NOUN_EXCEPTIONS.contains(&lower.as_str()))
        {
            return PosTag::Adverb;
        }
        if ADJECTIVES.contains(&lower.as_str()) {
            return PosTag::Adjective;
        }
        if VERBS.contains(&lower.as_str())
            || (lower.len() > 4
                && (lower.ends_with("ing") || lower.ends_with("ed"))
                && !ING_ED_NOUN_EXCEPTIONS.contains(&lower.as_str()))
        {
            return PosTag::Verb;
        }
        if TIME_NOUNS.contains(&lower.as_str()) {
            return PosTag::Noun;
        }
        if Self::is_capitalized(word) {
            if GIVEN_NAMES.contains(&lower.as_str()) {
                return PosTag::Person;
            }
            if !sentence_initial {
                return PosTag::ProperNoun;
            }
        }
        PosTag::Noun
    }
}

#[async_trait]
impl PosTagger for LexiconTagger {
    async fn tag(&self, text: &str) -> TaggerResult<Vec<TaggedToken>> {
        Ok(Self::word_tokens(text)
            .into_iter()
            .map(|(word, initial)| {
                let tag = Self::tag_one(&word, initial);
                TaggedToken::new(word, tag)
            })
            .collect())
    }

    /// Person-led capitalized runs: a known given name optionally followed
    /// by further capitalized words ("Anna", "Anna Smith").
    async fn person_spans(&self, text: &str) -> TaggerResult<Vec<String>> {
        let tokens = Self::word_tokens(text);
        let mut spans = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let (word, initial) = &tokens[i];
            if Self::tag_one(word, *initial) == PosTag::Person {
                let mut span = vec![word.clone()];
                let mut j = i + 1;
                while j < tokens.len() {
                    let (next, next_initial) = &tokens[j];
                    let tag = Self::tag_one(next, *next_initial);
                    if matches!(tag, PosTag::ProperNoun | PosTag::Person) {
                        span.push(next.clone());
                        j += 1;
                    } else {
                        break;
                    }
                }
                spans.push(span.join(" "));
                i = j;
            } else {
                i += 1;
            }
        }
        Ok(spans)
    }

    /// Contiguous noun runs; a run containing any excluded tag is skipped
    async fn noun_phrases(&self, text: &str, exclude: &[PosTag]) -> TaggerResult<Vec<String>> {
        let tokens = Self::word_tokens(text);
        let mut phrases = Vec::new();
        let mut run: Vec<String> = Vec::new();
        let mut run_excluded = false;

        for (word, initial) in tokens {
            let tag = Self::tag_one(&word, initial);
            if matches!(tag, PosTag::Noun | PosTag::ProperNoun | PosTag::Person) {
                run_excluded = run_excluded || exclude.contains(&tag);
                run.push(word);
            } else {
                if !run.is_empty() && !run_excluded {
                    phrases.push(run.join(" "));
                }
                run.clear();
                run_excluded = false;
            }
        }
        if !run.is_empty() && !run_excluded {
            phrases.push(run.join(" "));
        }
        Ok(phrases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn function_words_get_closed_class_tags() {
        let tagger = LexiconTagger::new();
        let tokens = tagger.tag("The dog ran with me because").await.unwrap();
        let tags: Vec<PosTag> = tokens.iter().map(|t| t.tag).collect();
        assert_eq!(
            tags,
            vec![
                PosTag::Determiner,
                PosTag::Noun,
                PosTag::Verb,
                PosTag::Preposition,
                PosTag::Pronoun,
                PosTag::Conjunction,
            ]
        );
    }

    #[tokio::test]
    async fn mid_sentence_capitalized_word_is_proper_noun() {
        let tagger = LexiconTagger::new();
        let tokens = tagger.tag("We visited Portland yesterday.").await.unwrap();
        let portland = tokens.iter().find(|t| t.matches("portland")).unwrap();
        assert_eq!(portland.tag, PosTag::ProperNoun);
    }

    #[tokio::test]
    async fn known_given_name_is_person() {
        let tagger = LexiconTagger::new();
        let tokens = tagger.tag("I met Henry at the park").await.unwrap();
        let henry = tokens.iter().find(|t| t.matches("henry")).unwrap();
        assert_eq!(henry.tag, PosTag::Person);
    }

    #[tokio::test]
    async fn person_spans_cover_multi_word_names() {
        let tagger = LexiconTagger::new();
        let spans = tagger
            .person_spans("I met Anna Smith and Henry downtown.")
            .await
            .unwrap();
        assert_eq!(spans, vec!["Anna Smith".to_string(), "Henry".to_string()]);
    }

    #[tokio::test]
    async fn noun_phrases_respect_exclusions() {
        let tagger = LexiconTagger::new();
        let phrases = tagger
            .noun_phrases(
                "We ate dinner with Henry near the lake",
                &[PosTag::Person, PosTag::ProperNoun],
            )
            .await
            .unwrap();
        assert!(phrases.contains(&"dinner".to_string()));
        assert!(phrases.contains(&"lake".to_string()));
        assert!(!phrases.iter().any(|p| p.contains("Henry")));
    }

    #[tokio::test]
    async fn family_is_not_an_adverb() {
        let tagger = LexiconTagger::new();
        let tag = tagger.tag_word("family").await.unwrap();
        assert_eq!(tag, Some(PosTag::Noun));
    }
}
