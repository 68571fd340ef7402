pub mod io;

use log::{debug, info, trace};

use crate::error::{IvritError, Result};
use crate::evaluator::Evaluator;
use crate::jumper::Jumper;
use crate::preprocessor::Preprocessed;
use crate::source::SourceProgram;
use crate::syntax::keywords::{
    AT, ELSE, FALSE, FINALLY, FROM_END, FROM_START, IF, JUMP_FLAG, LIST, OF, THEN, TO_END,
    TO_START, TRUE, WITH,
};
use crate::syntax::{scanner, Command};
use crate::variables::value::{is_integer_literal, list_elements, VarType};
use crate::variables::{ListPosition, VariableStore};
use io::IvritIo;

/// How a run presents itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Print the start and termination banners
    pub announce: bool,
    /// Print every remaining variable when the run ends
    pub dump_variables: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            announce: true,
            dump_variables: true,
        }
    }
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// An exit statement was executed
    Exit,
    /// Execution ran past the last line
    EndOfProgram,
}

/// What the loop does after a statement
enum Flow {
    Continue,
    Halt,
}

/// Executes a preprocessed program line by line
pub struct Interpreter<I: IvritIo> {
    program: SourceProgram,
    jumper: Jumper,
    variables: VariableStore,
    io: I,
    options: RunOptions,
}

impl<I: IvritIo> Interpreter<I> {
    /// Create an interpreter whose global scope holds the truth constants
    pub fn new(preprocessed: Preprocessed, io: I) -> Result<Self> {
        let Preprocessed {
            program,
            labels,
            functions,
        } = preprocessed;

        let jumper = Jumper::new(labels, &functions);
        let mut variables = VariableStore::new(functions);
        variables.define_truth_constants()?;

        Ok(Interpreter {
            program,
            jumper,
            variables,
            io,
            options: RunOptions::default(),
        })
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    pub fn io(&self) -> &I {
        &self.io
    }

    pub fn into_io(self) -> I {
        self.io
    }

    /// Run until an exit statement or the end of the program
    pub fn run(&mut self) -> Result<Termination> {
        info!("interpreting {} line(s)", self.program.len());
        if self.options.announce {
            self.io.print("מתחיל לפרש את הקוד.")?;
        }

        let termination = loop {
            let index = self.jumper.cursor();
            let line = match self.program.line(index) {
                Some(line) => line.to_string(),
                None => break Termination::EndOfProgram,
            };
            self.jumper.advance();
            trace!("line {}: {}", index + 1, line);

            match self.step(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Halt) => break Termination::Exit,
                Err(err) => return Err(err.at_line(index + 1, line)),
            }
        };

        info!("run finished: {:?}", termination);
        self.report(termination)?;
        Ok(termination)
    }

    fn report(&mut self, termination: Termination) -> Result<()> {
        if self.options.announce {
            let banner = match termination {
                Termination::Exit => "פירוש הקוד הסתיים לאחר שעברנו דרך המילה 'צא'",
                Termination::EndOfProgram => {
                    "פירוש הקוד הסתיים לאחר שנקרא כל הקוד (לא עברנו דרך 'צא')"
                }
            };
            self.io.print(banner)?;
        }

        if self.options.dump_variables {
            self.io.print("המשתנים שנותרו לאחר סיום התכנית:")?;
            for (name, value) in self.variables.bindings() {
                self.io.print(&format!("({} : {})", name, value))?;
            }
        }
        Ok(())
    }

    /// Execute one line
    fn step(&mut self, line: &str) -> Result<Flow> {
        if let Some(label) = line.strip_prefix(JUMP_FLAG) {
            self.jumper.on_label_encountered(label)?;
            return Ok(Flow::Continue);
        }

        let (action, rest) = scanner::split_first_word(line);
        match Command::from_word(action) {
            Some(Command::Print) => self.print(rest)?,
            Some(Command::Variable) => self.declare(rest, false)?,
            Some(Command::Constant) => self.declare(rest, true)?,
            Some(Command::Delete) => self.variables.delete_variable(rest)?,
            Some(Command::If) => self.conditional(rest)?,
            Some(Command::Jump) => self.jumper.jump_to(rest.trim_start_matches(JUMP_FLAG))?,
            Some(Command::Call) => self.call(rest)?,
            Some(Command::Return) => self.return_from_function(rest)?,
            Some(Command::Input) => self.input(rest)?,
            Some(Command::Add) => self.add(rest)?,
            Some(Command::Remove) => self.remove(rest)?,
            Some(Command::Exit) => return Ok(Flow::Halt),
            None if self.variables.is_variable(action) => self.assign(action, rest)?,
            None => {
                return Err(IvritError::UnrecognizedAction {
                    action: action.to_string(),
                    line: line.to_string(),
                })
            }
        }
        Ok(Flow::Continue)
    }

    fn evaluate(&self, expression: &str) -> Result<String> {
        Evaluator::new(&self.variables).evaluate(expression)
    }

    /// Evaluate a list literal element by element. Anything else, such as
    /// the name of a list variable, is evaluated whole.
    fn evaluate_list(&self, text: &str) -> Result<String> {
        match list_elements(text) {
            Some(elements) => {
                let values = elements
                    .into_iter()
                    .map(|element| self.evaluate(element))
                    .collect::<Result<Vec<_>>>()?;
                Ok(format!("[{}]", values.join(", ")))
            }
            None => self.evaluate(text),
        }
    }

    /// Evaluate a 1-based list index
    fn evaluate_index(&self, text: &str) -> Result<i64> {
        let value = self.evaluate(text)?;
        is_integer_literal(&value)
            .then(|| value.parse().ok())
            .flatten()
            .ok_or_else(|| IvritError::type_mismatch(value, VarType::Integer.name()))
    }

    fn print(&mut self, expression: &str) -> Result<()> {
        let value = self.evaluate(expression)?;
        self.io.print(scanner::strip_quotes(&value))
    }

    /// `[רשימה] type name = value`
    fn declare(&mut self, declaration: &str, constant: bool) -> Result<()> {
        let malformed = || {
            IvritError::malformed(
                declaration,
                "expected '[רשימה] <type> <name> = <value>'",
            )
        };

        let equals = scanner::find_unquoted(declaration, '=', 0).ok_or_else(malformed)?;
        let value = declaration[equals + 1..].trim();
        if value.is_empty() {
            return Err(malformed());
        }

        let words: Vec<&str> = declaration[..equals].split_whitespace().collect();
        let (is_list, kind, name) = match words.as_slice() {
            [LIST, kind, name] => (true, *kind, *name),
            [kind, name] => (false, *kind, *name),
            _ => return Err(malformed()),
        };
        let kind = VarType::from_name(kind)?;

        let value = if is_list {
            self.evaluate_list(value)?
        } else {
            self.evaluate(value)?
        };
        self.variables
            .create_variable(name, kind, &value, is_list, constant)?;
        if let Some(variable) = self.variables.get(name) {
            debug!(
                "declared {} {} '{}' = {}",
                if variable.is_constant() { "constant" } else { "variable" },
                variable.value().type_name(),
                name,
                variable
            );
        }
        Ok(())
    }

    /// `cond אז @T, אחרת @E, בסוף @N`
    fn conditional(&mut self, rest: &str) -> Result<()> {
        let line = format!("{} {}", IF, rest);
        let malformed = |reason: &str| IvritError::malformed(line.as_str(), reason);

        let then_at =
            scanner::find_word(rest, THEN).ok_or_else(|| malformed("missing 'אז'"))?;
        let condition = rest[..then_at].trim();
        if condition.is_empty() {
            return Err(malformed("missing condition"));
        }

        let flags = &rest[then_at + THEN.len()..];
        let first_comma = scanner::find_unquoted(flags, ',', 0)
            .ok_or_else(|| malformed("missing ',' after the 'אז' label"))?;
        let second_comma = scanner::find_unquoted(flags, ',', first_comma + 1)
            .ok_or_else(|| malformed("missing ',' after the 'אחרת' label"))?;

        let then_flag = flags[..first_comma].trim();
        let (else_word, else_flag) = scanner::split_first_word(&flags[first_comma + 1..second_comma]);
        let (finally_word, end_flag) = scanner::split_first_word(&flags[second_comma + 1..]);
        if else_word != ELSE {
            return Err(malformed("missing 'אחרת'"));
        }
        if finally_word != FINALLY {
            return Err(malformed("missing 'בסוף'"));
        }
        if [then_flag, else_flag, end_flag].iter().any(|flag| flag.is_empty()) {
            return Err(malformed("a label is missing"));
        }

        let else_label = else_flag.trim_start_matches(JUMP_FLAG);
        let end_label = end_flag.trim_start_matches(JUMP_FLAG);

        match self.evaluate(condition)?.as_str() {
            TRUE => {
                self.jumper.register_pending_link(else_label, end_label);
                Ok(())
            }
            FALSE => self.jumper.jump_to(else_label),
            other => Err(IvritError::type_mismatch(other, VarType::Boolean.name())),
        }
    }

    /// `name [עם a, b]`
    fn call(&mut self, rest: &str) -> Result<()> {
        let (function, arguments) = scanner::split_first_word(rest);
        if function.is_empty() {
            return Err(IvritError::malformed(rest, "missing function name"));
        }

        let args = if arguments.is_empty() {
            Vec::new()
        } else {
            let (with, arguments) = scanner::split_first_word(arguments);
            if with != WITH {
                return Err(IvritError::malformed(
                    rest,
                    "arguments must follow the word 'עם'",
                ));
            }
            scanner::split_top_level(arguments, ',')
                .into_iter()
                .filter(|argument| !argument.is_empty())
                .map(|argument| self.evaluate(argument))
                .collect::<Result<Vec<_>>>()?
        };

        self.variables.push_function_scope(function, &args)?;
        self.jumper.enter_function(function)?;
        debug!("call depth is now {}", self.jumper.call_depth());
        Ok(())
    }

    fn return_from_function(&mut self, value: &str) -> Result<()> {
        if !value.is_empty() {
            let value = self.evaluate(value)?;
            debug!("return value {} is not passed back", value);
        }
        self.jumper.return_to_caller()?;
        self.variables.pop_scope()
    }

    fn input(&mut self, name: &str) -> Result<()> {
        let plain_string = match self.variables.get(name) {
            Some(variable) => variable.value().kind() == VarType::String && !variable.is_list(),
            None => return Err(IvritError::UndefinedVariable(name.to_string())),
        };

        let input = self.io.read_input()?;
        let input = input.trim();
        let value = if plain_string && !scanner::is_string_literal(input) {
            format!("\"{}\"", input)
        } else {
            self.evaluate(input)?
        };
        self.variables.update_variable(name, &value)
    }

    /// `value {לתחילת | לסוף | במקום N של} list`
    fn add(&mut self, rest: &str) -> Result<()> {
        let (before, list) = scanner::split_last_word(rest);
        let (value, marker) = scanner::split_last_word(before);

        let (value, position) = if TO_START.contains(&marker) {
            (value, ListPosition::Index(1))
        } else if TO_END.contains(&marker) {
            (value, ListPosition::End)
        } else if marker == OF {
            let at = scanner::rfind_word(value, AT)
                .ok_or_else(|| IvritError::malformed(rest, "missing 'במקום' before 'של'"))?;
            let index = self.evaluate_index(&value[at + AT.len()..])?;
            (&value[..at], ListPosition::Index(index))
        } else {
            return Err(IvritError::malformed(rest, "unknown position to add at"));
        };

        if value.trim().is_empty() {
            return Err(IvritError::malformed(rest, "missing value to add"));
        }
        let value = self.evaluate(value)?;
        self.variables.insert_list_element(list, position, &value)
    }

    /// `{מתחילת | מסוף | במקום N של} list`
    fn remove(&mut self, rest: &str) -> Result<()> {
        let (before, list) = scanner::split_last_word(rest);
        let (head, marker) = scanner::split_last_word(before);

        let position = match marker {
            FROM_START if head.is_empty() => ListPosition::Index(1),
            FROM_END if head.is_empty() => ListPosition::End,
            OF => {
                let (at, index) = scanner::split_first_word(head);
                if at != AT {
                    return Err(IvritError::malformed(rest, "missing 'במקום' before 'של'"));
                }
                ListPosition::Index(self.evaluate_index(index)?)
            }
            _ => return Err(IvritError::malformed(rest, "unknown position to remove from")),
        };
        self.variables.remove_list_element(list, position)
    }

    /// `= value`, `OP= value` or `במקום N = value`
    fn assign(&mut self, name: &str, rest: &str) -> Result<()> {
        let line = format!("{} {}", name, rest);
        let equals = scanner::find_unquoted(rest, '=', 0)
            .ok_or_else(|| IvritError::malformed(line.as_str(), "missing '='"))?;
        let target = rest[..equals].trim();
        let value = rest[equals + 1..].trim();
        if value.is_empty() {
            return Err(IvritError::malformed(line.as_str(), "missing value after '='"));
        }

        if let Some(index) = target.strip_prefix(AT) {
            if !self.variables.is_list(name) {
                return Err(IvritError::NotAList(name.to_string()));
            }
            let index = self.evaluate_index(index)?;
            let value = self.evaluate(value)?;
            return self.variables.update_list_element(name, index, &value);
        }

        let new_value = match target {
            "" if self.variables.is_list(name) => self.evaluate_list(value)?,
            "" => self.evaluate(value)?,
            "+" | "-" | "*" | "/" | "%" => self.compound(name, target, value)?,
            other => return Err(IvritError::UnsupportedCompoundAssignment(other.to_string())),
        };
        self.variables.update_variable(name, &new_value)
    }

    /// `name OP= value` computes `(value OP name)`. `+=` concatenates strings.
    fn compound(&self, name: &str, operator: &str, value: &str) -> Result<String> {
        let value = self.evaluate(value)?;
        let is_string = self
            .variables
            .get(name)
            .map_or(false, |variable| variable.value().kind() == VarType::String);

        if operator == "+" && (is_string || scanner::is_string_literal(&value)) {
            self.evaluate(&format!("{} + {}", name, value))
        } else {
            self.evaluate(&format!("({} {} {})", value, operator, name))
        }
    }
}
