use std::collections::HashMap;

use super::value::Variable;
use crate::error::{IvritError, Result};

/// One set of name bindings: the global scope or a single function activation
#[derive(Debug, Clone, Default)]
pub struct Scope {
    variables: HashMap<String, Variable>,
}

impl Scope {
    pub fn new() -> Self {
        Scope {
            variables: HashMap::new(),
        }
    }

    /// Define a variable in this scope, replacing any binding with the same name
    pub fn define(&mut self, name: String, variable: Variable) {
        self.variables.insert(name, variable);
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.variables.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Result<Variable> {
        self.variables
            .remove(name)
            .ok_or_else(|| IvritError::UndefinedVariable(name.to_string()))
    }

    pub fn clear(&mut self) {
        self.variables.clear();
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Bindings sorted by name, for stable dumps
    pub fn sorted(&self) -> Vec<(&String, &Variable)> {
        let mut entries: Vec<_> = self.variables.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}
