use std::cmp::Ordering;

use super::list;
use super::ordered::OrderedEvaluator;
use crate::error::{IvritError, Result};
use crate::syntax::keywords::AT;
use crate::variables::value::{format_float, is_float_literal, is_integer_literal};

/// A numeric operand. Integers stay integers until they meet a float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    pub fn parse(text: &str) -> Result<Number> {
        let text = text.trim();
        let mismatch = || IvritError::type_mismatch(text, "שלם או עשרוני");

        if is_integer_literal(text) {
            text.parse().map(Number::Integer).map_err(|_| mismatch())
        } else if is_float_literal(text) {
            text.parse().map(Number::Float).map_err(|_| mismatch())
        } else {
            Err(mismatch())
        }
    }

    fn as_float(self) -> f64 {
        match self {
            Number::Integer(n) => n as f64,
            Number::Float(n) => n,
        }
    }

    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_float().partial_cmp(&b.as_float()),
        }
    }

    pub fn literal(self) -> String {
        match self {
            Number::Integer(n) => n.to_string(),
            Number::Float(n) => format_float(n),
        }
    }
}

/// Evaluates `+ - * / %` and list indexing
pub struct NumericEvaluator;

impl NumericEvaluator {
    fn integer_operation(&self, operator: &str, left: i64, right: i64) -> Result<i64> {
        let overflow = || IvritError::Overflow(format!("{} {} {}", left, operator, right));
        match operator {
            "+" => left.checked_add(right).ok_or_else(overflow),
            "-" => left.checked_sub(right).ok_or_else(overflow),
            "*" => left.checked_mul(right).ok_or_else(overflow),
            "/" | "%" if right == 0 => Err(IvritError::DivisionByZero),
            "/" => left.checked_div(right).ok_or_else(overflow),
            "%" => left.checked_rem(right).ok_or_else(overflow),
            _ => Err(self.unsupported(operator)),
        }
    }

    fn float_operation(&self, operator: &str, left: f64, right: f64) -> Result<f64> {
        match operator {
            "+" => Ok(left + right),
            "-" => Ok(left - right),
            "*" => Ok(left * right),
            "/" | "%" if right == 0.0 => Err(IvritError::DivisionByZero),
            "/" => Ok(left / right),
            "%" => Ok(left % right),
            _ => Err(self.unsupported(operator)),
        }
    }

    fn unsupported(&self, operator: &str) -> IvritError {
        IvritError::UnsupportedOperator {
            operator: operator.to_string(),
            domain: Self::DOMAIN,
        }
    }
}

impl OrderedEvaluator for NumericEvaluator {
    const DOMAIN: &'static str = "numeric";

    fn is_operator(&self, token: &str) -> bool {
        matches!(token, "+" | "-" | "*" | "/" | "%") || token == AT
    }

    fn evaluate_components(&self, operator: &str, right: &str, left: &str) -> Result<String> {
        if operator == AT {
            return list::dereference(left, right);
        }
        if !self.is_operator(operator) {
            return Err(self.unsupported(operator));
        }

        let result = match (Number::parse(left)?, Number::parse(right)?) {
            (Number::Integer(a), Number::Integer(b)) => {
                Number::Integer(self.integer_operation(operator, a, b)?)
            }
            (a, b) => Number::Float(self.float_operation(operator, a.as_float(), b.as_float())?),
        };
        Ok(result.literal())
    }
}
