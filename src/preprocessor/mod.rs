//! One pass over the program before it runs.
//!
//! Structured blocks are rewritten into labeled jumps first. The rewritten
//! lines are then scanned for jump labels and function headers.

pub mod desugar;

use std::collections::HashMap;
use std::fmt;

use log::{debug, info};

use crate::error::{IvritError, Result};
use crate::source::SourceProgram;
use crate::syntax::keywords::{ACCEPTS, FUNCTION, JUMP_FLAG, LIST, NOTHING, RETURNS};
use crate::variables::value::VarType;

/// Label name to the 1-based number of its label line
pub type LabelTable = HashMap<String, usize>;

/// Function name to its signature
pub type FunctionTable = HashMap<String, FunctionSignature>;

/// One declared parameter of a function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub kind: VarType,
    pub is_list: bool,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_list {
            write!(f, "{} ", LIST)?;
        }
        write!(f, "{} {}", self.kind, self.name)
    }
}

/// A function header: its parameters and the line execution enters at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    pub params: Vec<Parameter>,
    /// 1-based number of the header line. The first body line is read next.
    pub entry: usize,
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(Parameter::to_string).collect();
        if params.is_empty() {
            write!(f, "{}({})", self.name, NOTHING)
        } else {
            write!(f, "{}({})", self.name, params.join(", "))
        }
    }
}

/// A program ready to run
#[derive(Debug, Clone)]
pub struct Preprocessed {
    pub program: SourceProgram,
    pub labels: LabelTable,
    pub functions: FunctionTable,
}

/// Desugar the program, then collect its labels and function signatures
pub fn preprocess(program: SourceProgram) -> Result<Preprocessed> {
    info!("preprocessing {} line(s)", program.len());

    let lines = desugar::desugar(program.into_lines())?;
    let program = SourceProgram::new(lines);

    let mut labels = LabelTable::new();
    let mut functions = FunctionTable::new();

    for (index, line) in program.lines().iter().enumerate() {
        let number = index + 1;
        if let Some(label) = line.strip_prefix(JUMP_FLAG) {
            debug!("label '{}' at line {}", label, number);
            labels.insert(label.to_string(), number);
        } else if line.starts_with(&format!("{} ", FUNCTION)) {
            let signature = parse_function_header(line, number)?;
            debug!("function {} enters at line {}", signature, number);
            functions.insert(signature.name.clone(), signature);
        }
    }

    info!(
        "preprocessing finished: {} label(s), {} function(s)",
        labels.len(),
        functions.len()
    );
    Ok(Preprocessed {
        program,
        labels,
        functions,
    })
}

/// Parse `פונקציה name מקבלת params מחזירה type`
pub fn parse_function_header(line: &str, number: usize) -> Result<FunctionSignature> {
    let malformed = || IvritError::MalformedFunctionHeader {
        line: number,
        text: line.to_string(),
    };

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 6 || tokens[2] != ACCEPTS || tokens[tokens.len() - 2] != RETURNS {
        return Err(malformed());
    }

    let name = tokens[1].to_string();
    let param_tokens = &tokens[3..tokens.len() - 2];

    let mut params = Vec::new();
    if param_tokens != [NOTHING] {
        let mut rest = param_tokens;
        while !rest.is_empty() {
            let is_list = rest[0] == LIST;
            if is_list {
                rest = &rest[1..];
            }
            let (kind, param_name) = match rest {
                [kind, param_name, ..] => (*kind, *param_name),
                _ => return Err(malformed()),
            };
            let kind = VarType::from_name(kind).map_err(|_| malformed())?;
            let param_name = param_name.trim_end_matches(',');
            if param_name.is_empty() {
                return Err(malformed());
            }

            params.push(Parameter {
                name: param_name.to_string(),
                kind,
                is_list,
            });
            rest = &rest[2..];
        }
    }

    Ok(FunctionSignature {
        name,
        params,
        entry: number,
    })
}
