//! Rewrites structured conditionals and loops into labeled jumps.
//!
//! ```text
//! אם cond          =>  אם cond אז @T, אחרת @E, בסוף @N
//!                      @T
//! אחרת             =>  @E
//! סוף              =>  @E (only if no אחרת was seen)
//!                      @N
//!
//! כל-עוד cond      =>  @W
//!                      אם cond אז @B, אחרת @X, בסוף @C
//!                      @B
//! סוף              =>  @X
//!                      קפוץ-ל O
//!                      @C
//!                      קפוץ-ל W
//!                      @O
//! ```
//!
//! A finished loop body reaches `@X` with the link `X -> C` pending, so it is
//! sent to `@C` and back to the test. A false test jumps to `@X` directly and
//! falls through to the exit jump.

use log::debug;

use crate::error::{IvritError, Result};
use crate::syntax::keywords::{BLOCK_END, ELSE, FINALLY, IF, JUMP, JUMP_FLAG, THEN, WHILE};
use crate::syntax::scanner;

/// Labels generated for one structured block
#[derive(Debug, Clone)]
struct BlockLabels {
    prefix: String,
}

impl BlockLabels {
    fn label(&self, part: &str) -> String {
        format!("{}.{}", self.prefix, part)
    }

    fn flag(&self, part: &str) -> String {
        format!("{}{}", JUMP_FLAG, self.label(part))
    }
}

#[derive(Debug, Clone)]
enum Block {
    Conditional { labels: BlockLabels, saw_else: bool },
    Loop { labels: BlockLabels },
}

/// A structured-control line
enum Structured<'a> {
    If(&'a str),
    Else,
    While(&'a str),
    End,
}

impl<'a> Structured<'a> {
    fn recognize(line: &'a str) -> Option<Structured<'a>> {
        let (word, rest) = scanner::split_first_word(line);
        match word {
            IF if scanner::find_word(rest, THEN).is_none() => Some(Structured::If(rest)),
            WHILE => Some(Structured::While(rest)),
            ELSE if rest.is_empty() => Some(Structured::Else),
            BLOCK_END if rest.is_empty() => Some(Structured::End),
            _ => None,
        }
    }
}

/// Open blocks and the label counters for each nesting depth
#[derive(Debug, Default)]
pub struct Desugarer {
    blocks: Vec<Block>,
    counters: Vec<usize>,
    output: Vec<String>,
}

impl Desugarer {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_labels(&mut self, kind: &str) -> BlockLabels {
        let depth = self.blocks.len();
        if self.counters.len() <= depth {
            self.counters.resize(depth + 1, 0);
        }
        let count = self.counters[depth];
        self.counters[depth] += 1;

        BlockLabels {
            prefix: format!("__{}{}.{}", kind, depth, count),
        }
    }

    fn emit(&mut self, line: String) {
        self.output.push(line);
    }

    fn open_conditional(&mut self, condition: &str, line_number: usize) -> Result<()> {
        if condition.is_empty() {
            return Err(IvritError::MissingCondition {
                keyword: IF.to_string(),
                line: line_number,
            });
        }

        let labels = self.next_labels("if");
        self.emit(format!(
            "{} {} {} {}, {} {}, {} {}",
            IF,
            condition,
            THEN,
            labels.flag("then"),
            ELSE,
            labels.flag("else"),
            FINALLY,
            labels.flag("end")
        ));
        self.emit(labels.flag("then"));
        self.blocks.push(Block::Conditional {
            labels,
            saw_else: false,
        });
        Ok(())
    }

    fn open_loop(&mut self, condition: &str, line_number: usize) -> Result<()> {
        if condition.is_empty() {
            return Err(IvritError::MissingCondition {
                keyword: WHILE.to_string(),
                line: line_number,
            });
        }

        let labels = self.next_labels("while");
        self.emit(labels.flag("test"));
        self.emit(format!(
            "{} {} {} {}, {} {}, {} {}",
            IF,
            condition,
            THEN,
            labels.flag("body"),
            ELSE,
            labels.flag("exit"),
            FINALLY,
            labels.flag("continue")
        ));
        self.emit(labels.flag("body"));
        self.blocks.push(Block::Loop { labels });
        Ok(())
    }

    fn else_branch(&mut self, line_number: usize) -> Result<()> {
        let unmatched = || IvritError::UnmatchedBlock {
            keyword: ELSE.to_string(),
            line: line_number,
        };

        let flag = match self.blocks.last_mut() {
            Some(Block::Conditional { labels, saw_else }) if !*saw_else => {
                *saw_else = true;
                labels.flag("else")
            }
            _ => return Err(unmatched()),
        };
        self.emit(flag);
        Ok(())
    }

    fn close_block(&mut self, line_number: usize) -> Result<()> {
        match self.blocks.pop() {
            Some(Block::Conditional { labels, saw_else }) => {
                if !saw_else {
                    self.emit(labels.flag("else"));
                }
                self.emit(labels.flag("end"));
            }
            Some(Block::Loop { labels }) => {
                self.emit(labels.flag("exit"));
                self.emit(format!("{} {}", JUMP, labels.label("out")));
                self.emit(labels.flag("continue"));
                self.emit(format!("{} {}", JUMP, labels.label("test")));
                self.emit(labels.flag("out"));
            }
            None => {
                return Err(IvritError::UnmatchedBlock {
                    keyword: BLOCK_END.to_string(),
                    line: line_number,
                })
            }
        }
        Ok(())
    }

    /// Rewrite one line. `line_number` is 1-based and only used in errors.
    pub fn push_line(&mut self, line: String, line_number: usize) -> Result<()> {
        match Structured::recognize(&line) {
            Some(Structured::If(condition)) => self.open_conditional(condition, line_number),
            Some(Structured::While(condition)) => self.open_loop(condition, line_number),
            Some(Structured::Else) => self.else_branch(line_number),
            Some(Structured::End) => self.close_block(line_number),
            None => {
                self.emit(line);
                Ok(())
            }
        }
    }

    /// The rewritten lines. Fails if a block is still open.
    pub fn finish(self) -> Result<Vec<String>> {
        if !self.blocks.is_empty() {
            return Err(IvritError::UnclosedBlocks {
                open: self.blocks.len(),
            });
        }
        Ok(self.output)
    }
}

/// Rewrite every structured block of a program into primitive lines
pub fn desugar(lines: Vec<String>) -> Result<Vec<String>> {
    let original = lines.len();
    let mut desugarer = Desugarer::new();
    for (index, line) in lines.into_iter().enumerate() {
        desugarer.push_line(line, index + 1)?;
    }

    let output = desugarer.finish()?;
    debug!(
        "desugared {} line(s) into {} line(s)",
        original,
        output.len()
    );
    Ok(output)
}
