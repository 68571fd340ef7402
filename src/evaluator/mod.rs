//! Expression evaluation.
//!
//! Evaluation runs in two phases. Variable names are first replaced by the
//! literal values of their innermost bindings. The result is then handed to the
//! evaluator of its domain: boolean when it holds a boolean operator outside
//! string literals, string when it holds string literals, numeric otherwise.
//! Every evaluator returns a literal value as text.

pub mod boolean;
pub mod list;
pub mod numeric;
pub mod ordered;
pub mod string;
pub mod swapper;

use log::trace;

use crate::error::Result;
use crate::syntax::keywords;
use crate::syntax::scanner;
use crate::variables::VariableStore;
use boolean::BooleanEvaluator;
use numeric::NumericEvaluator;
use ordered::OrderedEvaluator;

/// Value domain of an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Boolean,
    String,
    Numeric,
}

impl Domain {
    /// Pick the domain of an expression whose variables are already substituted
    pub fn detect(expression: &str) -> Domain {
        if scanner::bare_tokens(expression)
            .into_iter()
            .any(keywords::is_boolean_operator)
        {
            Domain::Boolean
        } else if expression.matches('"').count() >= 2 {
            Domain::String
        } else {
            Domain::Numeric
        }
    }
}

/// Evaluates expressions against the current variable bindings
pub struct Evaluator<'a> {
    variables: &'a VariableStore,
}

impl<'a> Evaluator<'a> {
    pub fn new(variables: &'a VariableStore) -> Self {
        Evaluator { variables }
    }

    /// Evaluate an expression into a literal value
    pub fn evaluate(&self, expression: &str) -> Result<String> {
        let substituted = swapper::substitute(expression.trim(), self.variables)?;
        evaluate_literal(&substituted)
    }
}

/// Evaluate an expression that no longer contains variable names
pub fn evaluate_literal(expression: &str) -> Result<String> {
    let expression = expression.trim();
    let domain = Domain::detect(expression);
    trace!("evaluating {:?} expression '{}'", domain, expression);

    match domain {
        Domain::Boolean => BooleanEvaluator.evaluate(expression),
        Domain::String => string::evaluate(expression),
        Domain::Numeric => NumericEvaluator.evaluate(expression),
    }
}
