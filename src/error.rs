//! Error types for every stage of an Ivrit run

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, IvritError>;

/// Broad category of a failure. Every category is fatal to the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed headers, unmatched blocks, wrong component counts
    Structural,
    /// A value that does not fit its type, or incompatible operands
    TypeFormat,
    /// Unknown variable, label or function, or an empty call stack
    Reference,
    /// Mutating a constant
    Policy,
    /// The source loader or the I/O collaborator failed
    Io,
}

/// Errors raised while loading, preprocessing or interpreting a program
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IvritError {
    // Structural
    #[error("malformed function header on line {line}: '{text}'")]
    MalformedFunctionHeader { line: usize, text: String },

    #[error("'{keyword}' on line {line} has no open block to close")]
    UnmatchedBlock { keyword: String, line: usize },

    #[error("{open} block(s) are still open at the end of the program")]
    UnclosedBlocks { open: usize },

    #[error("'{keyword}' on line {line} is missing its condition")]
    MissingCondition { keyword: String, line: usize },

    #[error("malformed statement '{line}': {reason}")]
    MalformedStatement { line: String, reason: String },

    #[error("uneven brackets in '{0}'")]
    UnevenBrackets(String),

    #[error("unterminated string literal in '{0}'")]
    UnterminatedString(String),

    #[error("cannot evaluate {count} component(s) '{segment}' in '{expression}'")]
    UnknownEvaluationFormat {
        count: usize,
        segment: String,
        expression: String,
    },

    #[error("a value was written without a '+' before it in '{0}'")]
    UnexpectedString(String),

    #[error("found '+' where a value was expected in '{0}'")]
    IllegalPlusOperator(String),

    #[error("another value was expected at the end of '{0}'")]
    AnotherValueExpected(String),

    // Type/format
    #[error("the value '{value}' does not fit a variable of type {expected}")]
    TypeMismatch { value: String, expected: String },

    #[error("unknown type '{0}'")]
    UnknownType(String),

    #[error("operator '{operator}' is not supported for {domain} values")]
    UnsupportedOperator {
        operator: String,
        domain: &'static str,
    },

    #[error("integer overflow while evaluating '{0}'")]
    Overflow(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("index {index} is out of range for a list of {len} element(s)")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("'{0}' is not a list")]
    NotAList(String),

    #[error("unsupported compound assignment '{0}' before '='")]
    UnsupportedCompoundAssignment(String),

    // Reference
    #[error("cannot understand the word '{0}'")]
    UnresolvableToken(String),

    #[error("no variable named '{0}'")]
    UndefinedVariable(String),

    #[error("no jump flag named '{0}'")]
    UndefinedLabel(String),

    #[error("no function named '{0}'")]
    UndefinedFunction(String),

    #[error("cannot return from the global scope")]
    ReturnFromGlobalScope,

    #[error("function '{name}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("unrecognized action '{action}' in line '{line}'")]
    UnrecognizedAction { action: String, line: String },

    // Policy
    #[error("cannot change the value of the constant '{0}'")]
    ConstantMutation(String),

    // Collaborators
    #[error("failed to load source: {0}")]
    Load(String),

    #[error("input/output failure: {0}")]
    Io(String),

    /// An error raised while executing a specific source line
    #[error("line {number} ('{text}'): {source}")]
    AtLine {
        number: usize,
        text: String,
        #[source]
        source: Box<IvritError>,
    },
}

impl IvritError {
    pub fn malformed(line: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedStatement {
            line: line.into(),
            reason: reason.into(),
        }
    }

    pub fn type_mismatch(value: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::TypeMismatch {
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Attach the line being executed. An error that already carries a line keeps it.
    pub fn at_line(self, number: usize, text: impl Into<String>) -> Self {
        match self {
            Self::AtLine { .. } => self,
            other => Self::AtLine {
                number,
                text: text.into(),
                source: Box::new(other),
            },
        }
    }

    /// The error without its line wrapper
    pub fn root(&self) -> &IvritError {
        match self {
            Self::AtLine { source, .. } => source.root(),
            other => other,
        }
    }

    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            Self::MalformedFunctionHeader { .. }
            | Self::UnmatchedBlock { .. }
            | Self::UnclosedBlocks { .. }
            | Self::MissingCondition { .. }
            | Self::MalformedStatement { .. }
            | Self::UnevenBrackets(_)
            | Self::UnterminatedString(_)
            | Self::UnknownEvaluationFormat { .. }
            | Self::UnexpectedString(_)
            | Self::IllegalPlusOperator(_)
            | Self::AnotherValueExpected(_) => ErrorKind::Structural,
            Self::TypeMismatch { .. }
            | Self::UnknownType(_)
            | Self::UnsupportedOperator { .. }
            | Self::Overflow(_)
            | Self::DivisionByZero
            | Self::IndexOutOfRange { .. }
            | Self::NotAList(_)
            | Self::UnsupportedCompoundAssignment(_) => ErrorKind::TypeFormat,
            Self::UnresolvableToken(_)
            | Self::UndefinedVariable(_)
            | Self::UndefinedLabel(_)
            | Self::UndefinedFunction(_)
            | Self::ReturnFromGlobalScope
            | Self::ArityMismatch { .. }
            | Self::UnrecognizedAction { .. } => ErrorKind::Reference,
            Self::ConstantMutation(_) => ErrorKind::Policy,
            Self::Load(_) | Self::Io(_) => ErrorKind::Io,
            Self::AtLine { .. } => unreachable!("root() never returns a line wrapper"),
        }
    }
}
