//! Query tokenization and lexical chunk scoring.

use docqa_core::Chunk;
use serde::Serialize;
use std::collections::BTreeSet;

/// Deduplicated match tokens derived from one query.
pub type TokenSet = BTreeSet<String>;

/// Per-occurrence weight cap: tokens longer than this count the same.
const MAX_TOKEN_WEIGHT: usize = 5;

/// A chunk with its score for the current query. Never stored.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Alpha,
    Digit,
    Cjk,
    Other,
}

fn classify(c: char) -> CharClass {
    if c.is_ascii_alphabetic() {
        CharClass::Alpha
    } else if c.is_ascii_digit() {
        CharClass::Digit
    } else if is_cjk(c) {
        CharClass::Cjk
    } else {
        CharClass::Other
    }
}

/// CJK unified ideographs, extension A, and compatibility ideographs.
fn is_cjk(c: char) -> bool {
    matches!(c as u32, 0x4E00..=0x9FFF | 0x3400..=0x4DBF | 0xF900..=0xFAFF)
}

/// Convert a free-text query into match tokens.
///
/// - ASCII alphabetic runs of 2+ characters
/// - CJK runs of 2+ characters, plus every 2-gram and 3-gram inside the run
/// - digit runs of any length
pub fn tokenize(query: &str) -> TokenSet {
    let lower = query.to_lowercase();
    let chars: Vec<char> = lower.chars().collect();
    let mut tokens = TokenSet::new();

    let mut i = 0;
    while i < chars.len() {
        let class = classify(chars[i]);
        let start = i;
        while i < chars.len() && classify(chars[i]) == class {
            i += 1;
        }
        let run = &chars[start..i];

        match class {
            CharClass::Alpha if run.len() >= 2 => {
                tokens.insert(run.iter().collect());
            }
            CharClass::Digit => {
                tokens.insert(run.iter().collect());
            }
            CharClass::Cjk if run.len() >= 2 => {
                tokens.insert(run.iter().collect());
                for gram in run.windows(2).chain(run.windows(3)) {
                    tokens.insert(gram.iter().collect());
                }
            }
            _ => {}
        }
    }
    tokens
}

fn token_weight(token: &str) -> u64 {
    token.chars().count().min(MAX_TOKEN_WEIGHT) as u64
}

/// Score chunk text against query tokens.
///
/// Each token contributes `occurrences × min(len, 5)`. Occurrences are
/// counted non-overlapping, scanning left to right.
pub fn score(text: &str, tokens: &TokenSet) -> u64 {
    let lower = text.to_lowercase();
    tokens
        .iter()
        .filter(|t| !t.is_empty())
        .map(|t| lower.matches(t.as_str()).count() as u64 * token_weight(t))
        .sum()
}
