//! Line-boundary text chunker.
//!
//! Splits extracted document text into passages that respect a configurable
//! `max_chars` limit. Paragraphs (non-blank trimmed lines) are greedily
//! merged, joined by a line break, until the next paragraph would push the
//! buffer past the limit; a single paragraph longer than the limit is hard
//! split into fixed-size slices.
//!
//! Lengths are measured in chars so a hard split never lands inside a
//! multi-byte code point.

/// Default passage size limit, in chars.
pub const DEFAULT_MAX_CHARS: usize = 900;

/// Split text into passages of at most `max_chars` chars.
/// Returns passages in original paragraph order; blank lines never produce
/// a passage, so empty or all-whitespace input yields an empty vec.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars: usize = 0;

    for line in text.split('\n') {
        let para = line.trim();
        if para.is_empty() {
            continue;
        }
        let para_chars = para.chars().count();

        // The prospective length always counts the joining line break, even
        // into an empty buffer, so a paragraph of exactly max_chars takes
        // the flush path below and is kept whole there.
        let would_be = current_chars + 1 + para_chars;

        if would_be <= max_chars {
            if !current.is_empty() {
                current.push('\n');
                current_chars += 1;
            }
            current.push_str(para);
            current_chars += para_chars;
        } else {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_chars = 0;
            }
            if para_chars > max_chars {
                // Hard split at max_chars boundaries, measured in chars.
                let mut remaining = para;
                while !remaining.is_empty() {
                    let split_at = remaining
                        .char_indices()
                        .nth(max_chars)
                        .map(|(pos, _)| pos)
                        .unwrap_or(remaining.len());
                    let (piece, rest) = remaining.split_at(split_at);
                    chunks.push(piece.to_string());
                    remaining = rest;
                }
            } else {
                current.push_str(para);
                current_chars = para_chars;
            }
        }
    }

    // Flush remaining
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
