//! Keyword grouping for the secondary pass.

/// Split `keywords` into consecutive groups of at most `group_size`.
///
/// Order is preserved and every keyword lands in exactly one group; only the
/// last group may be short. A `group_size` of zero is treated as one.
pub fn chunk_keywords(keywords: &[String], group_size: usize) -> Vec<Vec<String>> {
    keywords
        .chunks(group_size.max(1))
        .map(|group| group.to_vec())
        .collect()
}
