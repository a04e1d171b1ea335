// Whitespace normalisation and character budgets for extracted page text.

/// Joins page texts with a space, collapses whitespace runs, trims, and keeps at
/// most `budget` characters. Missing pages contribute nothing.
pub fn normalize_pages<'a, I>(pages: I, budget: usize) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut out = String::new();
    for page in pages.into_iter().flatten() {
        for word in page.split_whitespace() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
    }
    truncate_chars(&out, budget).to_string()
}

/// Prefix of `s` holding at most `budget` characters, cut on a char boundary.
pub fn truncate_chars(s: &str, budget: usize) -> &str {
    match s.char_indices().nth(budget) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
