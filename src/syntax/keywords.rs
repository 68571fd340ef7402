/// Statement keywords of the Ivrit language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Print,    // הדפס
    Variable, // משתנה
    Constant, // קבוע
    Delete,   // מחק
    If,       // אם
    Jump,     // קפוץ-ל
    Call,     // הפעל
    Return,   // תחזיר / תחזור
    Input,    // קלוט-ל
    Add,      // הוסף
    Remove,   // הסר
    Exit,     // צא
}

impl Command {
    pub const ALL: [Command; 12] = [
        Command::Print,
        Command::Variable,
        Command::Constant,
        Command::Delete,
        Command::If,
        Command::Jump,
        Command::Call,
        Command::Return,
        Command::Input,
        Command::Add,
        Command::Remove,
        Command::Exit,
    ];

    /// Every spelling of this command. Some commands have synonyms.
    pub fn literals(&self) -> &'static [&'static str] {
        match self {
            Command::Print => &["הדפס"],
            Command::Variable => &["משתנה"],
            Command::Constant => &["קבוע"],
            Command::Delete => &["מחק"],
            Command::If => &[IF],
            Command::Jump => &[JUMP],
            Command::Call => &["הפעל"],
            Command::Return => &["תחזיר", "תחזור"],
            Command::Input => &["קלוט-ל"],
            Command::Add => &["הוסף"],
            Command::Remove => &["הסר"],
            Command::Exit => &["צא"],
        }
    }

    pub fn matches(&self, word: &str) -> bool {
        self.literals().contains(&word)
    }

    /// Look up the command spelled by `word`
    pub fn from_word(word: &str) -> Option<Command> {
        Self::ALL.iter().copied().find(|command| command.matches(word))
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.literals()[0])
    }
}

/// First character of a line that can be jumped to
pub const JUMP_FLAG: char = '@';
/// First character of a comment line
pub const COMMENT: char = '#';

// Function headers
pub const FUNCTION: &str = "פונקציה";
pub const ACCEPTS: &str = "מקבלת";
pub const RETURNS: &str = "מחזירה";
pub const NOTHING: &str = "כלום";
pub const LIST: &str = "רשימה";

// Conditionals and loops
pub const IF: &str = "אם";
pub const THEN: &str = "אז";
pub const ELSE: &str = "אחרת";
pub const FINALLY: &str = "בסוף";
pub const WHILE: &str = "כל-עוד";
pub const BLOCK_END: &str = "סוף";
pub const JUMP: &str = "קפוץ-ל";

// Calls and list statements
pub const WITH: &str = "עם";
pub const AT: &str = "במקום";
pub const OF: &str = "של";
pub const TO_START: [&str; 2] = ["לתחילת", "בתחילת"];
pub const TO_END: [&str; 2] = ["לסוף", "בסוף"];
pub const FROM_START: &str = "מתחילת";
pub const FROM_END: &str = "מסוף";

// Truth literals
pub const TRUE: &str = "אמת";
pub const FALSE: &str = "שקר";

// Boolean operators
pub const EQUALS: &str = "שווה";
pub const NOT_EQUALS: &str = "לא-שווה";
pub const AND: &str = "וגם";
pub const OR: &str = "או";
pub const GREATER: &str = ">";
pub const LESS: &str = "<";

/// Boolean operators spelled as words. `לא-שווה` comes first so it is matched before `שווה`.
pub const WORD_OPERATORS: [&str; 4] = [NOT_EQUALS, EQUALS, AND, OR];
pub const BOOLEAN_OPERATORS: [&str; 6] = [NOT_EQUALS, EQUALS, AND, OR, GREATER, LESS];

pub fn is_boolean_operator(token: &str) -> bool {
    BOOLEAN_OPERATORS.contains(&token)
}

pub fn is_numeric_operator(ch: char) -> bool {
    matches!(ch, '+' | '-' | '*' | '/' | '%')
}

pub fn truth_literal(value: bool) -> &'static str {
    if value {
        TRUE
    } else {
        FALSE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(Command::from_word("הדפס"), Some(Command::Print));
        assert_eq!(Command::from_word("משתנה"), Some(Command::Variable));
        assert_eq!(Command::from_word("קפוץ-ל"), Some(Command::Jump));
        assert_eq!(Command::from_word("הסר"), Some(Command::Remove));
        assert_eq!(Command::from_word("צא"), Some(Command::Exit));
        assert_eq!(Command::from_word("פונקציה"), None);
        assert_eq!(Command::from_word("x"), None);
    }

    #[test]
    fn test_return_synonyms() {
        assert_eq!(Command::from_word("תחזיר"), Some(Command::Return));
        assert_eq!(Command::from_word("תחזור"), Some(Command::Return));
        assert_eq!(Command::Return.to_string(), "תחזיר");
    }

    #[test]
    fn test_operators() {
        for op in ["שווה", "לא-שווה", "וגם", "או", ">", "<"] {
            assert!(is_boolean_operator(op), "{} should be a boolean operator", op);
        }
        assert!(!is_boolean_operator("+"));
        assert!(is_numeric_operator('%'));
        assert!(!is_numeric_operator('>'));
    }
}
