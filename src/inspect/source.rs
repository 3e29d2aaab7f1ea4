//! Small lexical helpers for reading Rust source without parsing it.

/// Remove `//` and `/* */` comments, keeping string and char literals intact.
///
/// Newlines inside removed comments are preserved so that byte offsets of
/// later lines stay meaningful for diagnostics.
pub fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_string = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            match ch {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (ch, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(ch);
            }
            // '"' and escaped char literals; lifetimes fall through untouched
            ('\'', Some('"')) => {
                out.push(ch);
                out.extend(chars.by_ref().take(2));
            }
            ('\'', Some('\\')) => {
                out.push(ch);
                out.extend(chars.by_ref().take(2));
                for rest in chars.by_ref() {
                    out.push(rest);
                    if rest == '\'' {
                        break;
                    }
                }
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Text between the opening delimiter at `open_at` and its matching close,
/// exclusive of both. `None` when unbalanced.
pub fn balanced(source: &str, open_at: usize, open: char, close: char) -> Option<&str> {
    let body_start = open_at + open.len_utf8();
    let mut depth = 0usize;
    for (offset, ch) in source.get(open_at..)?.char_indices() {
        if ch == open {
            depth += 1;
        } else if ch == close {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return source.get(body_start..open_at + offset);
            }
        }
    }
    None
}

/// Split on commas that are not nested inside `<>`, `()`, `[]` or `{}`
pub fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        match ch {
            '<' | '(' | '[' | '{' => depth += 1,
            '>' | ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}
