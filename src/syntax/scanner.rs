//! Quote-aware helpers for slicing source lines.
//!
//! All offsets are byte offsets into the given text. Text inside `"..."` string
//! literals is never treated as structure.

/// Split off the first whitespace-separated word. The rest is trimmed.
pub fn split_first_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(end) => (&text[..end], text[end..].trim()),
        None => (text, ""),
    }
}

/// Split off the last whitespace-separated word. The part before it is trimmed.
pub fn split_last_word(text: &str) -> (&str, &str) {
    let text = text.trim_end();
    match text.rfind(char::is_whitespace) {
        Some(start) => {
            let word_start = start + text[start..].chars().next().map_or(1, char::len_utf8);
            (text[..start].trim(), &text[word_start..])
        }
        None => ("", text),
    }
}

/// True if the byte at `index` lies inside a string literal
fn inside_quotes(text: &str, index: usize) -> bool {
    text[..index].matches('"').count() % 2 == 1
}

fn is_whole_word(text: &str, start: usize, word: &str) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[start + word.len()..].chars().next();
    before.map_or(true, char::is_whitespace) && after.map_or(true, char::is_whitespace)
}

/// Find `word` as a whole word outside string literals, starting the search at `from`
pub fn find_word_from(text: &str, word: &str, from: usize) -> Option<usize> {
    text[from..]
        .match_indices(word)
        .map(|(index, _)| index + from)
        .find(|&index| is_whole_word(text, index, word) && !inside_quotes(text, index))
}

/// Find the first whole-word occurrence of `word` outside string literals
pub fn find_word(text: &str, word: &str) -> Option<usize> {
    find_word_from(text, word, 0)
}

/// Find the last whole-word occurrence of `word` outside string literals
pub fn rfind_word(text: &str, word: &str) -> Option<usize> {
    text.rmatch_indices(word)
        .map(|(index, _)| index)
        .find(|&index| is_whole_word(text, index, word) && !inside_quotes(text, index))
}

/// Find `target` outside string literals, starting at `from`
pub fn find_unquoted(text: &str, target: char, from: usize) -> Option<usize> {
    let mut in_quote = inside_quotes(text, from);
    for (index, ch) in text[from..].char_indices() {
        if ch == '"' {
            in_quote = !in_quote;
        } else if ch == target && !in_quote {
            return Some(index + from);
        }
    }
    None
}

/// Find the last `target` outside string literals
pub fn rfind_unquoted(text: &str, target: char) -> Option<usize> {
    let mut in_quote = false;
    let mut found = None;
    for (index, ch) in text.char_indices() {
        if ch == '"' {
            in_quote = !in_quote;
        } else if ch == target && !in_quote {
            found = Some(index);
        }
    }
    found
}

/// Given the offset of an opening `(` or `[`, find its matching closing bracket
pub fn matching_bracket(text: &str, open: usize) -> Option<usize> {
    let open_char = text[open..].chars().next()?;
    let close_char = match open_char {
        '(' => ')',
        '[' => ']',
        _ => return None,
    };

    let mut depth = 0usize;
    let mut in_quote = false;
    for (index, ch) in text[open..].char_indices() {
        match ch {
            '"' => in_quote = !in_quote,
            _ if in_quote => {}
            c if c == open_char => depth += 1,
            c if c == close_char => {
                depth -= 1;
                if depth == 0 {
                    return Some(index + open);
                }
            }
            _ => {}
        }
    }
    None
}

/// True if the whole (trimmed) text is wrapped in one matching pair of parentheses
pub fn is_enclosed(text: &str) -> bool {
    let text = text.trim();
    text.starts_with('(') && matching_bracket(text, 0) == Some(text.len() - 1)
}

/// Split on `separator` where it is outside strings, lists and parentheses. Parts are trimmed.
pub fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_quote = false;
    let mut start = 0;

    for (index, ch) in text.char_indices() {
        match ch {
            '"' => in_quote = !in_quote,
            _ if in_quote => {}
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            c if c == separator && depth == 0 => {
                parts.push(text[start..index].trim());
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts
}

/// Bare tokens of an expression: string literals and `[...]` lists are skipped,
/// whitespace and parentheses delimit tokens.
pub fn bare_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut chars = text.char_indices();

    while let Some((index, ch)) = chars.next() {
        let delimiter = ch.is_whitespace() || matches!(ch, '(' | ')' | '"' | '[');
        if delimiter {
            if let Some(token_start) = start.take() {
                tokens.push(&text[token_start..index]);
            }
        } else if start.is_none() {
            start = Some(index);
        }

        match ch {
            '"' => {
                // skip to the closing quote
                for (_, c) in chars.by_ref() {
                    if c == '"' {
                        break;
                    }
                }
            }
            '[' => {
                if let Some(close) = matching_bracket(text, index) {
                    while let Some((i, _)) = chars.next() {
                        if i == close {
                            break;
                        }
                    }
                }
            }
            _ => {}
        }
    }
    if let Some(token_start) = start {
        tokens.push(&text[token_start..]);
    }
    tokens
}

/// True for a `"..."` literal (the quotes are part of the value)
pub fn is_string_literal(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('"') && text.ends_with('"')
}

/// The contents of a string literal, or the text unchanged if it is not one
pub fn strip_quotes(text: &str) -> &str {
    if is_string_literal(text) {
        &text[1..text.len() - 1]
    } else {
        text
    }
}
