//! Text segmentation and keyword matching.
//!
//! Structures assign contiguous slices of the story to their units (steps,
//! stages or acts). Splits are computed on characters, never bytes, so
//! multi-byte text is never cut inside a code point.

/// Split `text` into `n` contiguous parts of equal character length.
///
/// The last part takes the remainder. Empty text yields `n` empty parts.
pub fn split_even(text: &str, n: usize) -> Vec<&str> {
    if n == 0 {
        return Vec::new();
    }
    let weights = vec![1u32; n];
    split_weighted(text, &weights)
}

/// Split `text` into contiguous parts proportional to `weights`.
///
/// Part boundaries are rounded down; the last part takes the remainder.
pub fn split_weighted<'a>(text: &'a str, weights: &[u32]) -> Vec<&'a str> {
    if weights.is_empty() {
        return Vec::new();
    }

    let total_weight: u64 = weights.iter().map(|w| u64::from(*w)).sum();
    let boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let char_count = boundaries.len() as u64;

    let byte_at = |char_pos: u64| -> usize {
        boundaries
            .get(char_pos as usize)
            .copied()
            .unwrap_or(text.len())
    };

    let mut parts = Vec::with_capacity(weights.len());
    let mut acc: u64 = 0;
    let mut start = 0usize;

    for (i, weight) in weights.iter().enumerate() {
        acc += u64::from(*weight);
        let end = if i + 1 == weights.len() {
            text.len()
        } else if total_weight == 0 {
            start
        } else {
            byte_at(char_count * acc / total_weight)
        };
        parts.push(&text[start..end]);
        start = end;
    }

    parts
}

/// Count how many of `keywords` occur in `segment`, ignoring case.
pub fn keyword_hits(segment: &str, keywords: &[&str]) -> usize {
    let haystack = segment.to_lowercase();
    keywords
        .iter()
        .filter(|kw| haystack.contains(&kw.to_lowercase()))
        .count()
}

/// The keywords of `keywords` that occur in `segment`, ignoring case.
pub fn matched_keywords<'k>(segment: &str, keywords: &[&'k str]) -> Vec<&'k str> {
    let haystack = segment.to_lowercase();
    keywords
        .iter()
        .copied()
        .filter(|kw| haystack.contains(&kw.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_even_covers_text() {
        let text = "abcdefghijklmnopqrstuvwxyz";
        let parts = split_even(text, 8);
        assert_eq!(parts.len(), 8);
        assert_eq!(parts.concat(), text);
        assert_eq!(parts[0], "abc");
        assert_eq!(parts[7], "wxyz");
    }

    #[test]
    fn test_split_even_multibyte() {
        let text = "Зона комфорта — начало пути";
        let parts = split_even(text, 5);
        assert_eq!(parts.len(), 5);
        assert_eq!(parts.concat(), text);
    }

    #[test]
    fn test_split_even_short_text() {
        let parts = split_even("ab", 4);
        assert_eq!(parts.len(), 4);
        assert_eq!(parts.concat(), "ab");
    }

    #[test]
    fn test_split_empty() {
        let parts = split_even("", 3);
        assert_eq!(parts, vec!["", "", ""]);
        assert!(split_even("abc", 0).is_empty());
    }

    #[test]
    fn test_split_weighted_quarters() {
        let text = "a".repeat(100);
        let parts = split_weighted(&text, &[1, 2, 1]);
        let lens: Vec<usize> = parts.iter().map(|p| p.len()).collect();
        assert_eq!(lens, vec![25, 50, 25]);
    }

    #[test]
    fn test_keyword_hits_case_insensitive() {
        let segment = "The Mentor gave her a MAP and a warning.";
        assert_eq!(keyword_hits(segment, &["mentor", "map", "sword"]), 2);
        assert_eq!(matched_keywords(segment, &["mentor", "sword"]), vec!["mentor"]);
    }
}
