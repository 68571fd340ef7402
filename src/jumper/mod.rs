//! The program counter and everything that moves it.

use std::collections::HashMap;

use log::debug;

use crate::error::{IvritError, Result};
use crate::preprocessor::{FunctionTable, LabelTable};

/// Reaching `trigger` sends execution on to `end`
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingLink {
    trigger: String,
    end: String,
}

/// Where a call returns to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    return_to: usize,
    /// Pending links that were open when the call was made
    pending_depth: usize,
}

/// Redirects the cursor for jumps, calls, returns and deferred branch joins
#[derive(Debug, Clone)]
pub struct Jumper {
    labels: LabelTable,
    entries: HashMap<String, usize>,
    call_stack: Vec<Frame>,
    pending: Vec<PendingLink>,
    cursor: usize,
}

impl Jumper {
    pub fn new(labels: LabelTable, functions: &FunctionTable) -> Self {
        let entries = functions
            .iter()
            .map(|(name, signature)| (name.clone(), signature.entry))
            .collect();

        Jumper {
            labels,
            entries,
            call_stack: Vec::new(),
            pending: Vec::new(),
            cursor: 0,
        }
    }

    /// Index of the next line to read
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Step past the line about to be read and return its index
    pub fn advance(&mut self) -> usize {
        let current = self.cursor;
        self.cursor += 1;
        current
    }

    /// Number of active function calls
    pub fn call_depth(&self) -> usize {
        self.call_stack.len()
    }

    /// Continue after the label line of `label`
    pub fn jump_to(&mut self, label: &str) -> Result<()> {
        let target = *self
            .labels
            .get(label)
            .ok_or_else(|| IvritError::UndefinedLabel(label.to_string()))?;
        debug!("jump to '{}' (line {})", label, target);
        self.cursor = target;
        Ok(())
    }

    /// Continue after the header of `function`, remembering where to return to
    pub fn enter_function(&mut self, function: &str) -> Result<()> {
        let entry = *self
            .entries
            .get(function)
            .ok_or_else(|| IvritError::UndefinedFunction(function.to_string()))?;

        self.call_stack.push(Frame {
            return_to: self.cursor,
            pending_depth: self.pending.len(),
        });
        debug!(
            "call '{}' at line {}, returning to line {}",
            function,
            entry,
            self.cursor + 1
        );
        self.cursor = entry;
        Ok(())
    }

    /// Continue after the most recent call site.
    ///
    /// Links left pending inside the returning function are dropped.
    pub fn return_to_caller(&mut self) -> Result<()> {
        let frame = self
            .call_stack
            .pop()
            .ok_or(IvritError::ReturnFromGlobalScope)?;

        self.pending.truncate(frame.pending_depth);
        debug!("return to line {}", frame.return_to + 1);
        self.cursor = frame.return_to;
        Ok(())
    }

    /// Send execution to `end` once `trigger` is reached
    pub fn register_pending_link(&mut self, trigger: &str, end: &str) {
        self.pending.push(PendingLink {
            trigger: trigger.to_string(),
            end: end.to_string(),
        });
    }

    /// Follow the innermost pending link if `label` is its trigger
    pub fn on_label_encountered(&mut self, label: &str) -> Result<()> {
        let end = match self.pending.last() {
            Some(link) if link.trigger == label => link.end.clone(),
            _ => return Ok(()),
        };
        self.pending.pop();
        debug!("label '{}' links to '{}'", label, end);
        self.jump_to(&end)
    }
}
