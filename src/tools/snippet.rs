/// Search snippet extraction
///
/// Offsets are in characters, not bytes, so multi-byte text never gets cut
/// mid-character.

const ELLIPSIS: &str = "...";

/// Characters of context kept before the match
const CONTEXT_BEFORE: usize = 50;
/// Characters of context kept after the end of the match
const CONTEXT_AFTER: usize = 100;

/// Excerpt of `content` around the first case-insensitive occurrence of `query`
///
/// Returns `None` when the query doesn't occur in the content. The excerpt is
/// prefixed with `...` when it doesn't start at the beginning of the content
/// and suffixed with `...` when it stops before the end. Whitespace is trimmed
/// from the cut text before the markers go on, so a marker never sits next to
/// a space left over from the cut.
pub fn snippet(content: &str, query: &str) -> Option<String> {
    let chars: Vec<char> = content.chars().collect();
    let folded: Vec<char> = chars.iter().copied().map(fold).collect();
    let needle: Vec<char> = query.chars().map(fold).collect();

    let start_of_match = find(&folded, &needle)?;

    let start = start_of_match.saturating_sub(CONTEXT_BEFORE);
    let end = (start_of_match + needle.len() + CONTEXT_AFTER).min(chars.len());

    let excerpt: String = chars[start..end].iter().collect();
    let mut out = String::with_capacity(excerpt.len() + 2 * ELLIPSIS.len());
    if start > 0 {
        out.push_str(ELLIPSIS);
    }
    out.push_str(excerpt.trim());
    if end < chars.len() {
        out.push_str(ELLIPSIS);
    }
    Some(out)
}

/// Single-character lowercase so folded text stays index-aligned with the input
fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Case-fold a whole string the same way snippets compare characters
pub fn fold_case(text: &str) -> String {
    text.chars().map(fold).collect()
}

fn find(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
