//! Concatenation of string expressions: `"a" + 5 + (1 + 2)` evaluates to `"a53"`.

use super::list;
use crate::error::{IvritError, Result};
use crate::syntax::keywords::AT;
use crate::syntax::scanner;

/// Evaluate a string expression into a quoted literal.
///
/// An expression that starts with a list is returned unchanged, or
/// dereferenced when followed by `במקום N`.
pub fn evaluate(expression: &str) -> Result<String> {
    let expression = expression.trim();
    if expression.starts_with('[') {
        return evaluate_list(expression);
    }

    let mut result = String::new();
    let mut expecting_value = true;
    let mut index = 0;

    while let Some(ch) = expression[index..].chars().next() {
        if ch.is_whitespace() {
            index += ch.len_utf8();
            continue;
        }

        if !expecting_value {
            if ch != '+' {
                return Err(IvritError::UnexpectedString(expression.to_string()));
            }
            expecting_value = true;
            index += 1;
            continue;
        }

        let end = match ch {
            '+' => return Err(IvritError::IllegalPlusOperator(expression.to_string())),
            '"' => {
                let close = expression[index + 1..]
                    .find('"')
                    .map(|close| index + 1 + close)
                    .ok_or_else(|| IvritError::UnterminatedString(expression.to_string()))?;
                result.push_str(&expression[index + 1..close]);
                close + 1
            }
            '(' => {
                let close = scanner::matching_bracket(expression, index)
                    .ok_or_else(|| IvritError::UnevenBrackets(expression.to_string()))?;
                let value = super::evaluate_literal(&expression[index + 1..close])?;
                result.push_str(scanner::strip_quotes(&value));
                close + 1
            }
            '[' => {
                let close = scanner::matching_bracket(expression, index)
                    .ok_or_else(|| IvritError::UnevenBrackets(expression.to_string()))?;
                result.push_str(&expression[index..=close]);
                close + 1
            }
            _ => {
                let end = expression[index..]
                    .find(|c: char| c.is_whitespace() || matches!(c, '+' | '"' | '('))
                    .map_or(expression.len(), |offset| index + offset);
                result.push_str(&expression[index..end]);
                end
            }
        };

        expecting_value = false;
        index = end;
    }

    if expecting_value {
        return Err(IvritError::AnotherValueExpected(expression.to_string()));
    }
    Ok(format!("\"{}\"", result))
}

fn evaluate_list(expression: &str) -> Result<String> {
    let close = scanner::matching_bracket(expression, 0)
        .ok_or_else(|| IvritError::UnevenBrackets(expression.to_string()))?;
    let (list, rest) = expression.split_at(close + 1);
    let rest = rest.trim();
    if rest.is_empty() {
        return Ok(list.to_string());
    }

    let (marker, index) = scanner::split_first_word(rest);
    if marker != AT {
        return Err(IvritError::UnknownEvaluationFormat {
            count: 2,
            segment: rest.to_string(),
            expression: expression.to_string(),
        });
    }
    list::dereference(list, index)
}
