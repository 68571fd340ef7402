use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::{IvritError, Result};

/// How a running program talks to the outside world
pub trait IvritIo {
    /// Show one message to the user
    fn print(&mut self, message: &str) -> Result<()>;

    /// Block until the user supplies a line of input
    fn read_input(&mut self) -> Result<String>;
}

/// Standard output and standard input
#[derive(Debug, Default)]
pub struct ConsoleIo;

impl IvritIo for ConsoleIo {
    fn print(&mut self, message: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", message).map_err(|e| IvritError::Io(e.to_string()))
    }

    fn read_input(&mut self) -> Result<String> {
        io::stdout()
            .flush()
            .map_err(|e| IvritError::Io(e.to_string()))?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| IvritError::Io(e.to_string()))?;
        if read == 0 {
            return Err(IvritError::Io("input ended while a value was expected".to_string()));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Scripted input and captured output, for embedding and tests
#[derive(Debug, Default, Clone)]
pub struct BufferedIo {
    inputs: VecDeque<String>,
    output: Vec<String>,
}

impl BufferedIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the lines that `read_input` will return, in order
    pub fn with_inputs<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BufferedIo {
            inputs: inputs.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }

    /// Every printed message, in order
    pub fn output(&self) -> &[String] {
        &self.output
    }
}

impl IvritIo for BufferedIo {
    fn print(&mut self, message: &str) -> Result<()> {
        self.output.push(message.to_string());
        Ok(())
    }

    fn read_input(&mut self) -> Result<String> {
        self.inputs
            .pop_front()
            .ok_or_else(|| IvritError::Io("no more scripted input".to_string()))
    }
}
