use super::*;

#[test]
fn token_estimate_rounds_up() {
    assert_eq!(estimate_token_count(""), 0);
    assert_eq!(estimate_token_count("abcd"), 1);
    assert_eq!(estimate_token_count("abcde"), 2);
    assert_eq!(estimate_token_count("a"), 1);
}

#[test]
fn small_payload_passes_through_unchanged() {
    let content = "short policy text";
    assert_eq!(split_to_quota(content), vec![content.to_string()]);
}

#[test]
fn payload_at_quota_boundary_is_not_split() {
    let content = "x".repeat(METADATA_BYTE_QUOTA);
    assert_eq!(split_to_quota(&content), vec![content.clone()]);
}

#[test]
fn oversized_payload_splits_into_two_reconstructable_parts() {
    let content = "y".repeat(METADATA_BYTE_QUOTA + 40);
    let parts = split_to_quota(&content);

    assert_eq!(parts.len(), 2);
    assert_eq!(format!("{}{}", parts[0], parts[1]), content);
    assert!(parts[0].len() <= METADATA_BYTE_QUOTA);
    assert!(parts[1].len() <= METADATA_BYTE_QUOTA);
}

#[test]
fn split_point_respects_multibyte_characters() {
    // 3 bytes per char, so the byte midpoint falls inside a character
    let content = "日".repeat(METADATA_BYTE_QUOTA / 3 + 10);
    let parts = split_to_quota(&content);

    assert_eq!(parts.len(), 2);
    assert_eq!(format!("{}{}", parts[0], parts[1]), content);
}

#[test]
fn doubly_oversized_payload_still_splits_only_once() {
    // More than double the quota: the halves knowingly stay oversized
    let content = "z".repeat(METADATA_BYTE_QUOTA * 3);
    let parts = split_to_quota(&content);

    assert_eq!(parts.len(), 2);
    assert!(parts[0].len() > METADATA_BYTE_QUOTA);
}

#[test]
fn packs_all_words_within_budget() {
    let text = "alpha beta gamma delta epsilon";
    let chunks = pack_words(text, 1000);

    assert_eq!(chunks, vec![text.to_string()]);
}

#[test]
fn flushes_chunk_when_budget_exceeded() {
    // Each word is ~2 tokens; a budget of 4 fits two words per chunk
    let chunks = pack_words("aaaaaaa bbbbbbb ccccccc ddddddd", 4);

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0], "aaaaaaa bbbbbbb");
    assert_eq!(chunks[1], "ccccccc ddddddd");
}

#[test]
fn oversized_single_word_forms_its_own_chunk() {
    let big_word = "w".repeat(64);
    let text = format!("small {} small", big_word);
    let chunks = pack_words(&text, 4);

    assert!(chunks.contains(&big_word));
}

#[test]
fn empty_input_packs_to_nothing() {
    assert!(pack_words("", 100).is_empty());
    assert!(pack_words("   ", 100).is_empty());
}
