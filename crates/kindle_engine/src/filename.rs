use sha2::{Digest, Sha256};

const MAX_STEM_CHARS: usize = 50;

/// Attachment name for an article: `{sanitized_title}.epub`.
///
/// Keeps alphanumerics, spaces, `-` and `_`, trims trailing spaces, keeps at
/// most 50 characters. Falls back to `article` when nothing survives.
pub fn epub_filename(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let stem: String = kept.trim_end().chars().take(MAX_STEM_CHARS).collect();
    let stem = stem.trim();
    if stem.is_empty() {
        "article.epub".to_string()
    } else {
        format!("{stem}.epub")
    }
}

/// First eight hex digits of the SHA-256 of `input`.
pub fn short_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_is_dropped() {
        assert_eq!(
            epub_filename("Rust: Why? A \"Deep\" Dive / Part 1"),
            "Rust Why A Deep Dive  Part 1.epub"
        );
    }

    #[test]
    fn long_titles_are_cut() {
        let title = "a".repeat(80);
        assert_eq!(epub_filename(&title), format!("{}.epub", "a".repeat(50)));
    }

    #[test]
    fn empty_result_falls_back() {
        assert_eq!(epub_filename("???"), "article.epub");
        assert_eq!(epub_filename(""), "article.epub");
    }

    #[test]
    fn non_ascii_letters_are_kept() {
        assert_eq!(epub_filename("Café crème"), "Café crème.epub");
    }

    #[test]
    fn hash_is_stable_and_short() {
        let first = short_hash("https://example.com");
        assert_eq!(first.len(), 8);
        assert_eq!(first, short_hash("https://example.com"));
        assert_ne!(first, short_hash("https://example.org"));
    }
}
