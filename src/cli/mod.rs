use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::interpreter::io::ConsoleIo;
use crate::interpreter::{Interpreter, RunOptions};
use crate::preprocessor::{preprocess, Preprocessed};
use crate::source::{FileLoader, SourceLoader};

/// Ivrit interpreter CLI
#[derive(Parser)]
#[command(name = "ivrit")]
#[command(about = "Ivrit: a line-oriented interpreter for a Hebrew-keyword scripting language")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run an Ivrit program
    Run {
        /// Path to the Ivrit source file
        file: PathBuf,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,

        /// Do not print the start and termination banners
        #[arg(short, long)]
        quiet: bool,

        /// Do not print the remaining variables when the run ends
        #[arg(long)]
        no_dump: bool,
    },

    /// Preprocess a program and list its labels and functions
    Check {
        /// Path to the Ivrit source file
        file: PathBuf,
    },

    /// Print a program after structured blocks are rewritten into jumps
    Desugar {
        /// Path to the Ivrit source file
        file: PathBuf,
    },
}

/// Execute the CLI command
pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            file,
            verbose,
            quiet,
            no_dump,
        } => {
            let options = RunOptions {
                announce: !quiet,
                dump_variables: !no_dump,
            };
            run_file(file, verbose, options)
        }
        Commands::Check { file } => check_file(file),
        Commands::Desugar { file } => desugar_file(file),
    }
}

fn load_and_preprocess(file: &Path) -> Result<Preprocessed> {
    let program = FileLoader::new(file.to_string_lossy())
        .load()
        .with_context(|| format!("could not load {}", file.display()))?;
    let preprocessed = preprocess(program)
        .with_context(|| format!("preprocessing {} failed", file.display()))?;
    Ok(preprocessed)
}

/// Run an Ivrit file on the console
fn run_file(file: PathBuf, verbose: bool, options: RunOptions) -> Result<()> {
    if verbose {
        println!("Running Ivrit file: {}", file.display());
    }

    let preprocessed = load_and_preprocess(&file)?;
    if verbose {
        println!(
            "  Preprocessed {} line(s), {} label(s), {} function(s)",
            preprocessed.program.len(),
            preprocessed.labels.len(),
            preprocessed.functions.len()
        );
    }

    let mut interpreter = Interpreter::new(preprocessed, ConsoleIo)?.with_options(options);
    let termination = interpreter.run()?;

    if verbose {
        println!("  Finished: {:?}", termination);
    }
    Ok(())
}

/// Preprocess a file and print its label table and function signatures
fn check_file(file: PathBuf) -> Result<()> {
    println!("Checking: {}", file.display());
    println!("{}", "=".repeat(60));

    let preprocessed = load_and_preprocess(&file)?;

    let mut labels: Vec<_> = preprocessed.labels.iter().collect();
    labels.sort_by_key(|(_, line)| **line);
    println!("Labels:");
    for (label, line) in labels {
        println!("  {:>4}  @{}", line, label);
    }

    let mut functions: Vec<_> = preprocessed.functions.values().collect();
    functions.sort_by_key(|function| function.entry);
    println!("Functions:");
    for function in functions {
        println!("  {:>4}  {}", function.entry, function);
    }

    Ok(())
}

/// Print the desugared program with line numbers
fn desugar_file(file: PathBuf) -> Result<()> {
    let preprocessed = load_and_preprocess(&file)?;
    for (index, line) in preprocessed.program.lines().iter().enumerate() {
        println!("{:>4}  {}", index + 1, line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::parse_from(["ivrit", "run", "prog.ivr", "-q", "--no-dump"]);
        match cli.command {
            Commands::Run {
                file,
                verbose,
                quiet,
                no_dump,
            } => {
                assert_eq!(file, PathBuf::from("prog.ivr"));
                assert!(!verbose);
                assert!(quiet);
                assert!(no_dump);
            }
            _ => panic!("Expected the run command"),
        }
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::parse_from(["ivrit", "check", "prog.ivr"]);
        assert!(matches!(cli.command, Commands::Check { .. }));
    }
}
