//! Name validation via contextual re-tagging votes
//!
//! The tagger is unreliable on isolated words: it over-fires on capitalized
//! non-names and under-fires on names it has never seen. Instead of trusting
//! a single tag, [`NameValidator`] re-embeds each candidate into fixed
//! carrier sentences whose grammar forces disambiguation, tallies votes
//! across them, and only then falls back to a positional check against the
//! original text. False negatives are preferred over false positives: a
//! wrong name shown to the user is worse than a missed one.

use crate::nlp::{PosTag, PosTagger};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Closed set of grammatical function words that can never be names.
///
/// Checked before any tagging; covers pronouns, determiners, prepositions,
/// conjunctions and common adverbs the tagger sometimes promotes when they
/// appear capitalized at sentence start.
const FUNCTION_WORDS: &[&str] = &[
    // pronouns
    "i", "me", "my", "mine", "you", "your", "yours", "he", "him", "his", "she", "her", "hers",
    "it", "its", "we", "us", "our", "ours", "they", "them", "their", "theirs", "who", "whom",
    "whose", "this", "that", "these", "those", "someone", "anyone", "everyone", "something",
    "anything", "everything", "nothing", "myself", "himself", "herself", "itself", "themselves",
    // determiners
    "a", "an", "the", "some", "any", "no", "every", "each", "either", "neither", "both", "all",
    "few", "many", "much", "several", "most",
    // prepositions
    "in", "on", "at", "by", "for", "with", "about", "against", "between", "into", "through",
    "during", "before", "after", "above", "below", "from", "up", "down", "out", "off", "over",
    "under", "to", "of", "near", "around",
    // conjunctions
    "and", "but", "or", "nor", "so", "yet", "because", "although", "since", "unless", "while",
    "whereas", "if", "though", "when", "whenever", "where", "wherever",
    // common adverbs
    "very", "really", "quite", "too", "also", "just", "then", "there", "here", "now", "soon",
    "later", "again", "always", "never", "often", "sometimes", "maybe", "perhaps", "today",
    "yesterday", "tomorrow", "tonight", "still", "already", "almost", "not", "well",
];

/// Carrier sentences: synthetic contexts whose grammar forces the tagger to
/// commit. `{}` is replaced with the candidate token.
const CARRIERS: &[&str] = &[
    "I met {} yesterday.",
    "{} is a person.",
    "I was talking with {}.",
];

/// Single-word relational indicators for the positional fallback
const RELATIONAL_WORDS: &[&str] = &[
    "met", "with", "saw", "told", "asked", "called", "texted", "visited", "thanked", "missed",
    "joined", "helped", "hugged",
];

/// Two-word relational indicators ("talked to Sam", "went with Anna")
const RELATIONAL_PAIRS: &[(&str, &str)] = &[
    ("talked", "to"),
    ("talked", "with"),
    ("spoke", "to"),
    ("spoke", "with"),
    ("went", "with"),
    ("played", "with"),
    ("wrote", "to"),
    ("jumped", "on"),
];

/// Longest accepted single-word name; anything longer with no internal space
/// is assumed to be a mis-joined phrase
const MAX_UNSPACED_NAME_LEN: usize = 25;

/// Vote tally for one candidate across all carriers
#[derive(Debug, Default, Clone, Copy)]
struct CarrierVotes {
    name_votes: u32,
    noun_votes: u32,
    disqualified: bool,
}

/// Validates person-name candidates by contextual re-tagging
pub struct NameValidator {
    tagger: Arc<dyn PosTagger>,
}

impl NameValidator {
    pub fn new(tagger: Arc<dyn PosTagger>) -> Self {
        Self { tagger }
    }

    /// Decide whether `token` names a person, given the text it came from
    ///
    /// A tagger failure on one carrier drops that carrier's votes and moves
    /// on; it never fails the whole decision.
    pub async fn is_valid_name(&self, token: &str, full_text: &str) -> bool {
        let token = token.trim();
        if token.is_empty() {
            return false;
        }
        let head = first_word(token);
        if FUNCTION_WORDS.contains(&head.to_lowercase().as_str()) {
            return false;
        }

        let votes = self.carrier_votes(token, head).await;
        if votes.disqualified {
            return false;
        }
        if votes.name_votes >= 2 || (votes.name_votes > 0 && votes.noun_votes == 0) {
            return true;
        }

        self.positional_match(head, full_text)
    }

    /// Tally votes from re-tagging the token inside each carrier sentence
    async fn carrier_votes(&self, token: &str, head: &str) -> CarrierVotes {
        let mut votes = CarrierVotes::default();

        for template in CARRIERS {
            let carrier = template.replace("{}", token);

            match self.tagger.person_spans(&carrier).await {
                Ok(spans) => {
                    if spans.iter().any(|s| span_covers(s, head)) {
                        votes.name_votes += 2;
                    }
                }
                Err(e) => debug!(carrier = %carrier, error = %e, "person-span pass failed"),
            }

            match self.tagger.tag(&carrier).await {
                Ok(tokens) => {
                    for t in tokens.iter().filter(|t| t.matches(head)) {
                        match t.tag {
                            PosTag::ProperNoun | PosTag::Person => votes.name_votes += 1,
                            PosTag::Noun => votes.noun_votes += 1,
                            PosTag::Verb | PosTag::Adjective | PosTag::Adverb => {
                                votes.disqualified = true;
                            }
                            _ => {}
                        }
                    }
                }
                Err(e) => debug!(carrier = %carrier, error = %e, "carrier tagging failed"),
            }
        }

        votes
    }

    /// Fallback: does the token follow a relational indicator in the source
    /// text, directly or separated by one filler word?
    fn positional_match(&self, head: &str, full_text: &str) -> bool {
        let words: Vec<String> = full_text
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric() && c != '-' && c != '\'')
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect();
        let target = head.to_lowercase();

        for (i, word) in words.iter().enumerate() {
            if *word != target {
                continue;
            }
            let prev = |back: usize| i.checked_sub(back).map(|j| words[j].as_str());

            // indicator immediately before, or one filler word between
            if prev(1).is_some_and(|w| RELATIONAL_WORDS.contains(&w))
                || prev(2).is_some_and(|w| RELATIONAL_WORDS.contains(&w))
            {
                return true;
            }
            for (a, b) in RELATIONAL_PAIRS {
                if (prev(2) == Some(a) && prev(1) == Some(b))
                    || (prev(3) == Some(a) && prev(2) == Some(b))
                {
                    return true;
                }
            }
        }
        false
    }
}

fn first_word(token: &str) -> &str {
    token.split_whitespace().next().unwrap_or(token)
}

/// True if a detected person span contains the candidate word
fn span_covers(span: &str, word: &str) -> bool {
    span.split_whitespace().any(|w| w.eq_ignore_ascii_case(word))
}

/// Clean an accepted candidate into display form
///
/// Strips punctuation and quotes, preserves internal spaces, title-cases
/// each word (hyphen segments independently), collapses duplicate words,
/// and discards over-long unspaced tokens (mis-joined phrases).
pub fn normalize_name(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '\'' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut words: Vec<String> = Vec::new();
    for word in cleaned.split_whitespace() {
        let word = word.trim_matches(|c: char| c == '-' || c == '\'');
        if word.is_empty() {
            continue;
        }
        let key = word.to_lowercase();
        if seen.insert(key) {
            words.push(title_case(word));
        }
    }

    if words.is_empty() {
        return None;
    }
    let name = words.join(" ");
    if !name.contains(' ') && name.chars().count() > MAX_UNSPACED_NAME_LEN {
        return None;
    }
    Some(name)
}

/// Title-case one word; hyphen segments are cased independently
fn title_case(word: &str) -> String {
    word.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Case-insensitive global dedup, keeping first-seen casing
pub fn dedup_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    names
        .into_iter()
        .filter(|n| seen.insert(n.to_lowercase()))
        .collect()
}
