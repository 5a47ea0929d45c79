#[cfg(test)]
mod tests;

/// Vector index metadata limit in bytes. Serialized record metadata must
/// stay under this quota.
pub const METADATA_BYTE_QUOTA: usize = 40960;

/// Tokens held back from the provider limit when packing words into
/// embedding requests.
pub const TOKEN_BUDGET_MARGIN: usize = 100;

/// Estimate token count from text length (1 token ≈ 4 characters).
#[inline]
pub fn estimate_token_count(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Split an oversized payload to fit the metadata byte quota.
///
/// Payloads within the quota pass through unchanged. Oversized payloads are
/// split at the character midpoint into exactly two parts whose
/// concatenation equals the input. The split is not content-aware and never
/// recurses: a payload more than double the quota leaves halves that still
/// exceed it.
#[inline]
pub fn split_to_quota(content: &str) -> Vec<String> {
    if content.len() <= METADATA_BYTE_QUOTA {
        return vec![content.to_string()];
    }

    let midpoint = content.chars().count() / 2;
    let mid_byte = content
        .char_indices()
        .nth(midpoint)
        .map(|(offset, _)| offset)
        .unwrap_or(content.len());
    let (head, tail) = content.split_at(mid_byte);

    vec![head.to_string(), tail.to_string()]
}

/// Greedily pack space-delimited words into chunks bounded by
/// `token_budget` estimated tokens.
///
/// A chunk is flushed when the next word would push it past the budget, so
/// a single word larger than the budget still forms its own chunk.
#[inline]
pub fn pack_words(text: &str, token_budget: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current_chunk = String::new();
    let mut current_token_count = 0;

    for word in text.split(' ') {
        let word_tokens = estimate_token_count(word);

        if current_token_count + word_tokens > token_budget {
            let trimmed = current_chunk.trim();
            if !trimmed.is_empty() {
                chunks.push(trimmed.to_string());
            }
            current_chunk = format!("{} ", word);
            current_token_count = word_tokens;
        } else {
            current_chunk.push_str(word);
            current_chunk.push(' ');
            current_token_count += word_tokens;
        }
    }

    let trimmed = current_chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }

    chunks
}
