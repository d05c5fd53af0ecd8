//! Dialect-aware image reference scanning.
//!
//! Two independent scanners (Markdown, HTML) each produce URL spans; the
//! combined sequence is sorted by position and de-overlapped so a single
//! reconstruction pass over the source text is always well defined.

use std::ops::Range;

/// Markup dialect an image reference was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Markdown,
    Html,
}

/// A located image URL inside source text. The span is the URL itself,
/// excluding surrounding syntax, so replacement preserves alt text,
/// attributes, and quoting byte-identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub dialect: Dialect,
    pub url_span: Range<usize>,
}

impl ImageRef {
    pub fn url<'t>(&self, text: &'t str) -> &'t str {
        &text[self.url_span.clone()]
    }
}

/// Scan `text` for image references in both dialects, in source order,
/// with overlapping matches dropped (first match wins).
pub fn scan(text: &str) -> Vec<ImageRef> {
    let mut refs = scan_markdown(text);
    refs.extend(scan_html(text));
    refs.sort_by_key(|r| r.url_span.start);

    let mut merged: Vec<ImageRef> = Vec::with_capacity(refs.len());
    for r in refs {
        if merged
            .last()
            .is_none_or(|prev| r.url_span.start >= prev.url_span.end)
        {
            merged.push(r);
        }
    }
    merged
}

/// Find `![alt](url)` occurrences. The URL is the run of non-whitespace,
/// non-`)` bytes after `](`; it must be non-empty and terminated by `)`.
pub fn scan_markdown(text: &str) -> Vec<ImageRef> {
    let bytes = text.as_bytes();
    let mut refs = Vec::new();
    let mut i = 0;

    while let Some(off) = text[i..].find("![") {
        let bang = i + off;
        // Resume after `![` whenever this occurrence is not a valid image.
        i = bang + 2;

        let Some(alt_len) = text[bang + 2..].find(']') else {
            break;
        };
        let bracket = bang + 2 + alt_len;
        if bytes.get(bracket + 1) != Some(&b'(') {
            continue;
        }

        let url_start = bracket + 2;
        let mut url_end = url_start;
        while url_end < bytes.len()
            && !bytes[url_end].is_ascii_whitespace()
            && bytes[url_end] != b')'
        {
            url_end += 1;
        }
        if url_end == url_start || bytes.get(url_end) != Some(&b')') {
            continue;
        }

        refs.push(ImageRef {
            dialect: Dialect::Markdown,
            url_span: url_start..url_end,
        });
        i = url_end + 1;
    }

    refs
}

/// Find `<img ... src="url" ...>` occurrences. Tag name and attribute name
/// match case-insensitively; single- and double-quoted values are accepted;
/// attribute order is irrelevant.
pub fn scan_html(text: &str) -> Vec<ImageRef> {
    // ASCII lowercasing preserves byte offsets, so spans found in the
    // lowered copy index directly into the original text.
    let lower = text.to_ascii_lowercase();
    let mut refs = Vec::new();
    let mut i = 0;

    while let Some(off) = lower[i..].find("<img") {
        let tag_start = i + off;
        i = tag_start + 4;

        // `<imgx` is some other tag, not an image.
        match lower.as_bytes().get(tag_start + 4) {
            Some(b) if b.is_ascii_whitespace() || *b == b'/' || *b == b'>' => {}
            _ => continue,
        }

        let Some(gt_off) = lower[tag_start..].find('>') else {
            break;
        };
        let tag_end = tag_start + gt_off;
        if let Some(url_span) = find_src_value(&lower[tag_start..tag_end], tag_start) {
            refs.push(ImageRef {
                dialect: Dialect::Html,
                url_span,
            });
        }
        i = tag_end + 1;
    }

    refs
}

/// Locate the quoted `src` attribute value within one lowercased tag body.
/// `base` is the tag's byte offset in the full text.
fn find_src_value(tag: &str, base: usize) -> Option<Range<usize>> {
    let bytes = tag.as_bytes();
    let mut j = 4; // past "<img"

    while let Some(off) = tag[j..].find("src") {
        let at = j + off;
        j = at + 3;

        // Standalone attribute name only — rejects e.g. `data-src`.
        if !bytes[at - 1].is_ascii_whitespace() {
            continue;
        }

        let mut k = at + 3;
        while k < bytes.len() && bytes[k].is_ascii_whitespace() {
            k += 1;
        }
        if bytes.get(k) != Some(&b'=') {
            continue;
        }
        k += 1;
        while k < bytes.len() && bytes[k].is_ascii_whitespace() {
            k += 1;
        }
        let quote = match bytes.get(k) {
            Some(&q @ (b'"' | b'\'')) => q,
            _ => continue,
        };

        let val_start = k + 1;
        let val_len = tag[val_start..].find(quote as char)?;
        if val_len == 0 {
            continue;
        }
        return Some(base + val_start..base + val_start + val_len);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(text: &str) -> Vec<&str> {
        scan(text).into_iter().map(|r| r.url(text)).collect::<Vec<_>>()
    }

    #[test]
    fn markdown_image() {
        assert_eq!(
            urls("before ![alt](https://example.com/a.png) after"),
            vec!["https://example.com/a.png"]
        );
    }

    #[test]
    fn markdown_empty_alt() {
        assert_eq!(urls("![](https://example.com/a.png)"), vec!["https://example.com/a.png"]);
    }

    #[test]
    fn markdown_link_is_not_an_image() {
        assert!(urls("[click here](https://example.com/doc)").is_empty());
    }

    #[test]
    fn markdown_empty_url_is_skipped() {
        assert!(urls("![alt]()").is_empty());
    }

    #[test]
    fn markdown_url_with_space_is_skipped() {
        // `![alt](url "title")` — the URL run is broken by whitespace.
        assert!(urls("![alt](https://example.com/a.png \"title\")").is_empty());
    }

    #[test]
    fn markdown_unterminated_is_skipped() {
        assert!(urls("![alt](https://example.com/a.png").is_empty());
    }

    #[test]
    fn html_double_quoted_src() {
        assert_eq!(
            urls(r#"<img src="https://example.com/a.png" alt="x">"#),
            vec!["https://example.com/a.png"]
        );
    }

    #[test]
    fn html_single_quoted_src() {
        assert_eq!(
            urls("<img alt='x' src='https://example.com/a.png'>"),
            vec!["https://example.com/a.png"]
        );
    }

    #[test]
    fn html_case_insensitive_tag_and_attribute() {
        assert_eq!(
            urls(r#"<IMG SRC="https://example.com/a.png">"#),
            vec!["https://example.com/a.png"]
        );
    }

    #[test]
    fn html_attribute_order_is_irrelevant() {
        assert_eq!(
            urls(r#"<img width="40" data-src="decoy" src="https://example.com/a.png"/>"#),
            vec!["https://example.com/a.png"]
        );
    }

    #[test]
    fn html_whitespace_around_equals() {
        assert_eq!(
            urls(r#"<img src = "https://example.com/a.png">"#),
            vec!["https://example.com/a.png"]
        );
    }

    #[test]
    fn html_other_tags_are_ignored() {
        assert!(urls(r#"<imgfoo src="https://example.com/a.png">"#).is_empty());
        assert!(urls(r#"<a href="https://example.com">link</a>"#).is_empty());
    }

    #[test]
    fn mixed_dialects_preserve_source_order() {
        let text = r#"<img src="https://h.com/1.png"> then ![m](https://m.com/2.png)"#;
        assert_eq!(urls(text), vec!["https://h.com/1.png", "https://m.com/2.png"]);
    }

    #[test]
    fn overlapping_matches_keep_first() {
        // Markdown syntax smuggled into an src attribute: only one span
        // survives so reconstruction stays single-pass.
        let text = r#"<img src="![x](https://a.com/p.png)">"#;
        let refs = scan(text);
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn multibyte_text_around_references() {
        let text = "héllo ![ünïcode](https://example.com/å.png) wörld";
        assert_eq!(urls(text), vec!["https://example.com/å.png"]);
    }

    #[test]
    fn no_references() {
        assert!(urls("plain text with no images at all").is_empty());
    }
}
