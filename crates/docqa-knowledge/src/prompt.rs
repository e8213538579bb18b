//! Context assembly and the citation-constrained system prompt.

use docqa_core::Chunk;

/// Visible separator between rendered segments.
pub const SEGMENT_SEPARATOR: &str = "\n\n---\n\n";

/// Render retrieved chunks as numbered, source-labeled segments in
/// retrieval order.
pub fn assemble_context(chunks: &[Chunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "【segment {}】source: {}\n\"{}\"",
                i + 1,
                c.source_document,
                c.text
            )
        })
        .collect::<Vec<_>>()
        .join(SEGMENT_SEPARATOR)
}

/// Unique source document names, in first-seen order.
pub fn source_names(chunks: &[Chunk]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for chunk in chunks {
        if !names.iter().any(|n| n == &chunk.source_document) {
            names.push(chunk.source_document.clone());
        }
    }
    names
}

/// Build the system prompt.
///
/// Without context the model is told to say the knowledge base has no
/// answer. With context it must quote, summarize and advise strictly from
/// the embedded segments.
pub fn build_system_prompt(document_names: &[String], context: &str, has_context: bool) -> String {
    if !has_context {
        return "You are a document question-answering assistant. The knowledge base \
                returned no content for this question. Reply that the uploaded documents \
                do not contain an answer, and ask the user to rephrase the question or \
                upload a relevant document. Do not answer from general knowledge."
            .to_string();
    }

    let sources = document_names.join(", ");
    format!(
        "You are a document question-answering assistant. Answer ONLY from the \
document segments below.

Documents: {sources}

=== DOCUMENT SEGMENTS ===
{context}
=== END OF SEGMENTS ===

Reply using exactly this structure:

## Matched Original Text
Quote the passages that answer the question word for word, each labeled with \
its source document name, e.g. [source: document name] \"quoted text\".

## Key Points
Concise bullet points extracted from the quoted text.

## Suggestions
Actionable suggestions derived only from the quoted text.

Rules:
1. Quote verbatim. Do not paraphrase or rewrite the original text.
2. Do not fabricate content, sources, figures or quotes.
3. Do not use outside knowledge. If the segments do not answer the question, \
say so plainly.
4. Cite only the documents listed above."
    )
}
