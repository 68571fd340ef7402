//! Bracket-driven simplification shared by the numeric and boolean evaluators.
//!
//! An expression is first given brackets where they are implied, then the
//! rightmost bracket pair is reduced to a single value until none remain. Each
//! pair must hold either one value or `left operator right`.

use crate::error::{IvritError, Result};
use crate::syntax::scanner;

/// An evaluator that reduces bracketed `left operator right` groups one at a time.
///
/// Brackets are inserted again after every reduction, so `(a + b) * c` reduces
/// fully once the inner group is a single value. A group holding only an
/// operator is an error.
pub trait OrderedEvaluator {
    /// Name of the value domain, used in error messages
    const DOMAIN: &'static str;

    /// True if `token` is an operator of this domain
    fn is_operator(&self, token: &str) -> bool;

    /// Compute `left operator right`. The operands arrive right first.
    fn evaluate_components(&self, operator: &str, right: &str, left: &str) -> Result<String>;

    /// Wrap the expression in brackets when it holds exactly one operator of this
    /// domain and is not already enclosed. Anything else is left unchanged.
    fn create_brackets(&self, expression: &str) -> String {
        let operators = scanner::bare_tokens(expression)
            .into_iter()
            .filter(|token| self.is_operator(token))
            .count();

        if operators == 1 && !scanner::is_enclosed(expression) {
            format!("({})", expression)
        } else {
            expression.to_string()
        }
    }

    fn evaluate(&self, expression: &str) -> Result<String> {
        let mut expression = self.create_brackets(expression.trim());
        while contains_bracket(&expression) {
            let simplified = self.simplify_brackets(&expression)?;
            expression = self.create_brackets(simplified.trim());
        }
        Ok(expression.trim().to_string())
    }

    /// Reduce the rightmost bracket pair to its value
    fn simplify_brackets(&self, expression: &str) -> Result<String> {
        let start = scanner::rfind_unquoted(expression, '(');
        let end = start.and_then(|start| scanner::find_unquoted(expression, ')', start));
        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(IvritError::UnevenBrackets(expression.to_string())),
        };

        let segment = &expression[start + 1..end];
        let components = segment_split(segment)?;
        let simplified = match components.as_slice() {
            [value] if !self.is_operator(value) => value.to_string(),
            [left, operator, right] => self.evaluate_components(operator, right, left)?,
            _ => {
                return Err(IvritError::UnknownEvaluationFormat {
                    count: components.len(),
                    segment: segment.to_string(),
                    expression: expression.to_string(),
                })
            }
        };

        Ok(format!(
            "{}{}{}",
            &expression[..start],
            simplified,
            &expression[end + 1..]
        ))
    }
}

fn contains_bracket(expression: &str) -> bool {
    scanner::find_unquoted(expression, '(', 0).is_some()
        || scanner::find_unquoted(expression, ')', 0).is_some()
}

/// Split a bracket's content on whitespace. String literals and `[...]` lists stay whole.
pub fn segment_split(segment: &str) -> Result<Vec<&str>> {
    let mut components = Vec::new();
    let mut index = 0;

    while let Some(ch) = segment[index..].chars().next() {
        if ch.is_whitespace() {
            index += ch.len_utf8();
            continue;
        }

        let end = match ch {
            '"' => segment[index + 1..]
                .find('"')
                .map(|close| index + close + 2)
                .ok_or_else(|| IvritError::UnterminatedString(segment.to_string()))?,
            '[' => scanner::matching_bracket(segment, index)
                .map(|close| close + 1)
                .ok_or_else(|| IvritError::UnevenBrackets(segment.to_string()))?,
            _ => segment[index..]
                .find(|c: char| c.is_whitespace() || c == '"')
                .map_or(segment.len(), |offset| index + offset),
        };

        components.push(&segment[index..end]);
        index = end;
    }

    Ok(components)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Joins its operands so the evaluation order is visible
    struct Recorder;

    impl OrderedEvaluator for Recorder {
        const DOMAIN: &'static str = "test";

        fn is_operator(&self, token: &str) -> bool {
            token == "~"
        }

        fn evaluate_components(&self, operator: &str, right: &str, left: &str) -> Result<String> {
            Ok(format!("{}{}{}", left, operator, right))
        }
    }

    #[test]
    fn test_segment_split() {
        assert_eq!(
            segment_split(r#" "a b"  שווה   x "#).unwrap(),
            vec![r#""a b""#, "שווה", "x"]
        );
        assert_eq!(
            segment_split(r#"["a b", "c"] במקום 2"#).unwrap(),
            vec![r#"["a b", "c"]"#, "במקום", "2"]
        );
        assert!(segment_split("").unwrap().is_empty());
        assert!(segment_split(r#""open"#).is_err());
    }

    #[test]
    fn test_create_brackets() {
        assert_eq!(Recorder.create_brackets("a ~ b"), "(a ~ b)");
        assert_eq!(Recorder.create_brackets("(a ~ b)"), "(a ~ b)");
        assert_eq!(Recorder.create_brackets("(a) ~ (b)"), "((a) ~ (b))");
        assert_eq!(Recorder.create_brackets("a ~ b ~ c"), "a ~ b ~ c");
        assert_eq!(Recorder.create_brackets(r#""~""#), r#""~""#);
    }

    #[test]
    fn test_rightmost_bracket_first() {
        assert_eq!(Recorder.evaluate("((a ~ b) ~ (c ~ d))").unwrap(), "a~b~c~d");
        assert_eq!(Recorder.evaluate("((x))").unwrap(), "x");
        assert_eq!(Recorder.evaluate("a ~ b").unwrap(), "a~b");
        assert_eq!(Recorder.evaluate("(a ~ b) ~ c").unwrap(), "a~b~c");
        assert_eq!(Recorder.evaluate("a ~ b ~ c").unwrap(), "a ~ b ~ c");
    }

    #[test]
    fn test_lone_operator_is_an_error() {
        assert_eq!(
            Recorder.evaluate("~"),
            Err(IvritError::UnknownEvaluationFormat {
                count: 1,
                segment: "~".to_string(),
                expression: "(~)".to_string(),
            })
        );
        assert!(Recorder.evaluate("((~))").is_err());
    }

    #[test]
    fn test_malformed_groups() {
        assert_eq!(
            Recorder.evaluate("(a"),
            Err(IvritError::UnevenBrackets("(a".to_string()))
        );
        assert_eq!(
            Recorder.evaluate("a ~ b)"),
            Err(IvritError::UnevenBrackets("a~b)".to_string()))
        );
        assert_eq!(
            Recorder.evaluate("(a b)"),
            Err(IvritError::UnknownEvaluationFormat {
                count: 2,
                segment: "a b".to_string(),
                expression: "(a b)".to_string(),
            })
        );
    }
}
