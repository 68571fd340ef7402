use std::cmp::Ordering;

use super::numeric::{Number, NumericEvaluator};
use super::ordered::OrderedEvaluator;
use super::string;
use crate::error::{IvritError, Result};
use crate::syntax::keywords::{self, AND, EQUALS, GREATER, LESS, NOT_EQUALS, OR};
use crate::syntax::scanner;
use crate::variables::value::{Value, VarType};

/// Evaluates comparisons and logical connectives into truth literals
pub struct BooleanEvaluator;

impl BooleanEvaluator {
    fn truth(&self, text: &str) -> Result<bool> {
        match VarType::Boolean.parse(text)? {
            Value::Boolean(value) => Ok(value),
            _ => Err(IvritError::type_mismatch(text, VarType::Boolean.name())),
        }
    }

    fn ordering(&self, left: &str, right: &str) -> Result<Ordering> {
        let (left, right) = (Number::parse(left)?, Number::parse(right)?);
        // NaN never orders, and never compares true
        Ok(left.compare(right).unwrap_or(Ordering::Equal))
    }
}

impl OrderedEvaluator for BooleanEvaluator {
    const DOMAIN: &'static str = "boolean";

    fn is_operator(&self, token: &str) -> bool {
        keywords::is_boolean_operator(token)
    }

    fn evaluate_components(&self, operator: &str, right: &str, left: &str) -> Result<String> {
        let result = match operator {
            EQUALS => left == right,
            NOT_EQUALS => left != right,
            AND => self.truth(left)? && self.truth(right)?,
            OR => self.truth(left)? || self.truth(right)?,
            GREATER => self.ordering(left, right)? == Ordering::Greater,
            LESS => self.ordering(left, right)? == Ordering::Less,
            "+" if scanner::is_string_literal(left) || scanner::is_string_literal(right) => {
                return string::evaluate(&format!("{} + {}", left, right));
            }
            _ => return NumericEvaluator.evaluate_components(operator, right, left),
        };
        Ok(keywords::truth_literal(result).to_string())
    }
}
