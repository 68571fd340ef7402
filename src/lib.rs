//! Ivrit: an interpreter for a line-oriented scripting language with Hebrew keywords.
//!
//! A program runs in two stages. [`preprocessor::preprocess`] rewrites
//! structured blocks into labeled jumps and collects labels and function
//! signatures. [`interpreter::Interpreter`] then walks the lines with an
//! explicit program counter, evaluating expressions by textual substitution.
//!
//! ```no_run
//! use ivrit::interpreter::{io::BufferedIo, Interpreter};
//! use ivrit::preprocessor::preprocess;
//! use ivrit::source::{SourceLoader, TextLoader};
//!
//! let program = TextLoader::new("הדפס 2 + 3").load()?;
//! let mut interpreter = Interpreter::new(preprocess(program)?, BufferedIo::new())?;
//! interpreter.run()?;
//! # Ok::<(), ivrit::error::IvritError>(())
//! ```

pub mod cli;
pub mod error;
pub mod evaluator;
pub mod interpreter;
pub mod jumper;
pub mod preprocessor;
pub mod source;
pub mod syntax;
pub mod variables;

pub use error::{IvritError, Result};
pub use interpreter::{Interpreter, RunOptions, Termination};
