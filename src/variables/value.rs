use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{IvritError, Result};
use crate::syntax::keywords::{self, FALSE, LIST, TRUE};
use crate::syntax::scanner;

static INTEGER_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+$").expect("integer literal pattern"));

static FLOAT_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("float literal pattern")
});

/// Types a variable can be declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Integer,
    Float,
    Boolean,
    String,
}

impl VarType {
    /// Resolve a type word from the source
    pub fn from_name(name: &str) -> Result<VarType> {
        match name {
            "שלם" => Ok(VarType::Integer),
            "עשרוני" => Ok(VarType::Float),
            "טענה" => Ok(VarType::Boolean),
            "משפט" => Ok(VarType::String),
            _ => Err(IvritError::UnknownType(name.to_string())),
        }
    }

    /// The type word used in source code
    pub fn name(&self) -> &'static str {
        match self {
            VarType::Integer => "שלם",
            VarType::Float => "עשרוני",
            VarType::Boolean => "טענה",
            VarType::String => "משפט",
        }
    }

    /// Parse a single literal of this type
    pub fn parse(&self, text: &str) -> Result<Value> {
        let text = text.trim();
        let mismatch = || IvritError::type_mismatch(text, self.name());

        match self {
            VarType::Integer => {
                if !is_integer_literal(text) {
                    return Err(mismatch());
                }
                text.parse().map(Value::Integer).map_err(|_| mismatch())
            }
            VarType::Float => {
                if !is_float_literal(text) {
                    return Err(mismatch());
                }
                text.parse().map(Value::Float).map_err(|_| mismatch())
            }
            VarType::Boolean => match text {
                TRUE => Ok(Value::Boolean(true)),
                FALSE => Ok(Value::Boolean(false)),
                _ => Err(mismatch()),
            },
            VarType::String => {
                if scanner::is_string_literal(text) {
                    Ok(Value::String(text.to_string()))
                } else {
                    Err(mismatch())
                }
            }
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Runtime values in Ivrit
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// String value, stored with its delimiting quotes
    String(String),
    /// Homogeneous list of values of one element type
    List { kind: VarType, items: Vec<Value> },
}

impl Value {
    /// Parse a list literal `[a, b, ...]` whose elements all have type `kind`
    pub fn parse_list(kind: VarType, text: &str) -> Result<Value> {
        let text = text.trim();
        let elements = list_elements(text)
            .ok_or_else(|| IvritError::type_mismatch(text, format!("{} {}", LIST, kind)))?;

        let items = elements
            .iter()
            .map(|element| kind.parse(element))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::List { kind, items })
    }

    /// Parse `text` into a value of the same shape as this one
    pub fn reparse(&self, text: &str) -> Result<Value> {
        match self {
            Value::List { kind, .. } => Value::parse_list(*kind, text),
            _ => self.kind().parse(text),
        }
    }

    /// The declared type (the element type for lists)
    pub fn kind(&self) -> VarType {
        match self {
            Value::Integer(_) => VarType::Integer,
            Value::Float(_) => VarType::Float,
            Value::Boolean(_) => VarType::Boolean,
            Value::String(_) => VarType::String,
            Value::List { kind, .. } => *kind,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List { .. })
    }

    /// Get type name
    pub fn type_name(&self) -> String {
        match self {
            Value::List { kind, .. } => format!("{} {}", LIST, kind),
            other => other.kind().name().to_string(),
        }
    }

    /// The literal text of this value, as substituted into expressions.
    /// Strings keep their quotes.
    pub fn literal(&self) -> String {
        match self {
            Value::Integer(n) => n.to_string(),
            Value::Float(n) => format_float(*n),
            Value::Boolean(b) => keywords::truth_literal(*b).to_string(),
            Value::String(s) => s.clone(),
            Value::List { items, .. } => {
                let elements: Vec<String> = items.iter().map(Value::literal).collect();
                format!("[{}]", elements.join(", "))
            }
        }
    }

    /// Try to convert to list
    pub fn as_list_mut(&mut self) -> Option<(VarType, &mut Vec<Value>)> {
        match self {
            Value::List { kind, items } => Some((*kind, items)),
            _ => None,
        }
    }
}

/// Strings are shown without their quotes, everything else as its literal
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", scanner::strip_quotes(s)),
            other => write!(f, "{}", other.literal()),
        }
    }
}

/// A variable cell: a value plus its constancy, fixed at creation
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    value: Value,
    constant: bool,
}

impl Variable {
    pub fn new(value: Value, constant: bool) -> Self {
        Variable { value, constant }
    }

    /// Build a variable of the declared type from its literal text
    pub fn declare(kind: VarType, text: &str, is_list: bool, constant: bool) -> Result<Self> {
        let value = if is_list {
            Value::parse_list(kind, text)?
        } else {
            kind.parse(text)?
        };
        Ok(Variable::new(value, constant))
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_constant(&self) -> bool {
        self.constant
    }

    pub fn is_list(&self) -> bool {
        self.value.is_list()
    }

    /// Replace the value, keeping the declared type
    pub fn update(&mut self, name: &str, text: &str) -> Result<()> {
        if self.constant {
            return Err(IvritError::ConstantMutation(name.to_string()));
        }
        self.value = self.value.reparse(text)?;
        Ok(())
    }

    /// Mutable access to the elements of a list variable
    pub fn items_mut(&mut self, name: &str) -> Result<(VarType, &mut Vec<Value>)> {
        if self.constant {
            return Err(IvritError::ConstantMutation(name.to_string()));
        }
        self.value
            .as_list_mut()
            .ok_or_else(|| IvritError::NotAList(name.to_string()))
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Split a `[...]` literal into its element texts. Returns `None` if `text` is not a list.
pub fn list_elements(text: &str) -> Option<Vec<&str>> {
    let text = text.trim();
    if !text.starts_with('[') || scanner::matching_bracket(text, 0) != Some(text.len() - 1) {
        return None;
    }

    let inner = text[1..text.len() - 1].trim();
    if inner.is_empty() {
        return Some(Vec::new());
    }
    Some(scanner::split_top_level(inner, ','))
}

pub fn is_integer_literal(text: &str) -> bool {
    INTEGER_LITERAL.is_match(text)
}

pub fn is_float_literal(text: &str) -> bool {
    FLOAT_LITERAL.is_match(text)
}

pub fn is_boolean_literal(text: &str) -> bool {
    text == TRUE || text == FALSE
}

/// Floats always show a fractional part, so `5.0` stays distinguishable from `5`
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
