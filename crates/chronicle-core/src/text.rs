//! HTML-flavored text normalization.
//!
//! Snapshot text carries simple inline markup (`<span>`, `<em>`) that the
//! game occasionally leaves unbalanced. All stored and pattern-matched text
//! goes through [`normalize`] first: surrounding whitespace is trimmed,
//! stray closing tags are dropped and unclosed inline tags are closed, so
//! that equal content always compares equal.

const BALANCED_TAGS: &[&str] = &["span", "em", "strong", "i", "b", "ul", "li"];

/// Normalize a snapshot text fragment.
pub fn normalize(text: &str) -> String {
    let trimmed = text.trim();
    let mut out = String::with_capacity(trimmed.len());
    let mut open: Vec<&str> = Vec::new();
    let mut rest = trimmed;

    while let Some(start) = rest.find('<') {
        let Some(end) = rest[start..].find('>') else {
            // Dangling '<' with no tag end; keep verbatim
            out.push_str(rest);
            rest = "";
            break;
        };
        out.push_str(&rest[..start]);
        let tag = &rest[start..start + end + 1];
        rest = &rest[start + end + 1..];

        let inner = tag[1..tag.len() - 1].trim();
        if let Some(name) = inner.strip_prefix('/') {
            let name = name.trim();
            if let Some(pos) = open.iter().rposition(|t| *t == name) {
                // Close anything opened after it, then the tag itself
                while open.len() > pos {
                    let unclosed = open.pop().unwrap_or(name);
                    out.push_str("</");
                    out.push_str(unclosed);
                    out.push('>');
                }
            }
            // Stray closer: dropped
        } else {
            let name = inner
                .split_whitespace()
                .next()
                .unwrap_or("")
                .trim_end_matches('/');
            if !inner.ends_with('/') && BALANCED_TAGS.contains(&name) {
                open.push(name);
            }
            out.push_str(tag);
        }
    }
    out.push_str(rest);

    while let Some(unclosed) = open.pop() {
        out.push_str("</");
        out.push_str(unclosed);
        out.push('>');
    }
    out
}

/// Normalize an optional text fragment, preserving absence.
pub fn normalize_opt(text: Option<&str>) -> Option<String> {
    text.map(normalize)
}
