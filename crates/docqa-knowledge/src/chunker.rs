//! Document chunking.
//!
//! Text is normalized (whitespace runs collapsed) and cut into windows of
//! `chunk_size` characters. Each window end is moved to the nearest
//! sentence or line boundary within [-50, +100] characters, and the next
//! window starts `overlap` characters before the previous end.

use docqa_core::Chunk;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_OVERLAP: usize = 200;

/// How far before the naive window end a boundary may be taken.
const BOUNDARY_LOOKBEHIND: usize = 50;
/// How far after the naive window end a boundary may be taken.
const BOUNDARY_LOOKAHEAD: usize = 100;

fn is_boundary(c: char) -> bool {
    matches!(c, '.' | '\n' | '。')
}

/// Collapse whitespace: a run containing a line break becomes a single
/// `\n`, any other run becomes a single space. Leading and trailing
/// whitespace is dropped.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending: Option<char> = None;

    for c in text.chars() {
        if c.is_whitespace() {
            let ws = if c == '\n' || c == '\r' { '\n' } else { ' ' };
            pending = match pending {
                Some('\n') => Some('\n'),
                _ => Some(ws),
            };
        } else {
            if let Some(ws) = pending.take() {
                if !out.is_empty() {
                    out.push(ws);
                }
            }
            out.push(c);
        }
    }
    out
}

/// Split `text` into overlapping chunks belonging to `document_name`.
///
/// Empty input (or input that is only whitespace) yields no chunks.
/// `overlap >= chunk_size` is tolerated: the window then advances without
/// overlap instead of looping.
pub fn chunk_text(text: &str, document_name: &str, chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    let normalized = normalize(text);
    let chars: Vec<char> = normalized.chars().collect();
    let len = chars.len();
    if len == 0 || chunk_size == 0 {
        return Vec::new();
    }

    let mut chunks: Vec<Chunk> = Vec::new();
    let mut start = 0usize;

    while start < len {
        let mut end = (start + chunk_size).min(len);
        if end < len {
            if let Some(cut) = find_boundary(&chars, start, end) {
                end = cut;
            }
        }

        let piece: String = chars[start..end].iter().collect();
        let trimmed = piece.trim();
        if !trimmed.is_empty() {
            chunks.push(Chunk::new(document_name, chunks.len(), trimmed.to_string()));
        }

        if end >= len {
            break;
        }
        let next = end.saturating_sub(overlap);
        start = if next > start { next } else { end };
    }

    let total = chunks.len();
    for chunk in &mut chunks {
        chunk.total_chunks = total;
    }

    tracing::debug!("Chunked '{}': {} chars → {} chunks", document_name, len, total);
    chunks
}

/// Find the boundary nearest to `end` in `[end - 50, end + 100)`, never at
/// or before `start`. Returns the exclusive cut position (just past the
/// punctuation). Ties go to the earlier boundary.
fn find_boundary(chars: &[char], start: usize, end: usize) -> Option<usize> {
    let lo = end.saturating_sub(BOUNDARY_LOOKBEHIND).max(start + 1);
    let hi = (end + BOUNDARY_LOOKAHEAD).min(chars.len());

    (lo..hi)
        .filter(|&i| is_boundary(chars[i]))
        .map(|i| i + 1)
        .min_by_key(|&cut| cut.abs_diff(end))
}
