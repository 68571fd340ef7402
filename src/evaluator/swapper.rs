//! Replaces variable names in an expression with their literal values.

use crate::error::{IvritError, Result};
use crate::syntax::keywords::{self, AT};
use crate::syntax::scanner;
use crate::variables::value::{is_boolean_literal, is_float_literal, is_integer_literal};
use crate::variables::VariableStore;

/// Characters copied through unchanged
fn is_structural(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | '>' | '<') || keywords::is_numeric_operator(ch)
}

/// End of the bare word starting at `start`. A `-` followed by a letter joins
/// the word, so `לא-שווה` stays whole while `n-1` splits.
fn word_end(text: &str, start: usize) -> usize {
    let mut chars = text[start..].char_indices().peekable();
    while let Some((offset, c)) = chars.next() {
        let joins = c == '-' && chars.peek().map_or(false, |(_, next)| next.is_alphabetic());
        if !joins && (is_structural(c) || c == '"' || c == '[') {
            return start + offset;
        }
    }
    text.len()
}

/// Substitute each element of a list literal given the text between its brackets
fn substitute_list(inner: &str, variables: &VariableStore) -> Result<String> {
    if inner.trim().is_empty() {
        return Ok("[]".to_string());
    }
    let elements = scanner::split_top_level(inner, ',')
        .into_iter()
        .map(|element| substitute(element, variables))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("[{}]", elements.join(", ")))
}

/// Substitute every bare variable name with the literal value of its innermost binding.
///
/// String literals are copied verbatim, as are word operators and the list-index
/// marker. The elements of `[...]` lists are substituted one by one. Numeric and
/// truth literals pass through. Any other word is an error.
pub fn substitute(expression: &str, variables: &VariableStore) -> Result<String> {
    let mut swapped = String::with_capacity(expression.len());
    let mut index = 0;

    while let Some(ch) = expression[index..].chars().next() {
        let end = match ch {
            '"' => expression[index + 1..]
                .find('"')
                .map(|close| index + close + 2)
                .ok_or_else(|| IvritError::UnterminatedString(expression.to_string()))?,
            '[' => {
                let close = scanner::matching_bracket(expression, index)
                    .ok_or_else(|| IvritError::UnevenBrackets(expression.to_string()))?;
                swapped.push_str(&substitute_list(&expression[index + 1..close], variables)?);
                index = close + 1;
                continue;
            }
            c if is_structural(c) => index + c.len_utf8(),
            _ => {
                let end = word_end(expression, index);
                let word = &expression[index..end];

                if keywords::WORD_OPERATORS.contains(&word) || word == AT {
                    swapped.push_str(word);
                } else if let Some(variable) = variables.get(word) {
                    swapped.push_str(&variable.value().literal());
                } else if is_integer_literal(word) || is_float_literal(word) || is_boolean_literal(word)
                {
                    swapped.push_str(word);
                } else {
                    return Err(IvritError::UnresolvableToken(word.to_string()));
                }

                index = end;
                continue;
            }
        };

        swapped.push_str(&expression[index..end]);
        index = end;
    }

    Ok(swapped)
}
