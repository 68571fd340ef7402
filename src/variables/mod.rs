//! Typed variable storage: a stack of scopes with the global scope at the bottom.
//!
//! Lookups, updates and deletions always act on the innermost scope that binds
//! the name, so a function-local variable shadows a global one of the same name
//! until its scope is popped.

pub mod scope;
pub mod value;

use log::debug;

use crate::error::{IvritError, Result};
use crate::preprocessor::FunctionTable;
use crate::syntax::keywords::{FALSE, TRUE};
use scope::Scope;
use value::{VarType, Variable};

/// Where a list element is inserted or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPosition {
    /// 1-based position
    Index(i64),
    /// After the last element (insert) or the last element (remove)
    End,
}

/// The scope stack of one program run
#[derive(Debug, Clone)]
pub struct VariableStore {
    scopes: Vec<Scope>,
    functions: FunctionTable,
}

impl VariableStore {
    /// Create a store holding only an empty global scope
    pub fn new(functions: FunctionTable) -> Self {
        VariableStore {
            scopes: vec![Scope::new()],
            functions,
        }
    }

    /// Bind the truth literals as global boolean constants
    pub fn define_truth_constants(&mut self) -> Result<()> {
        self.create_variable(TRUE, VarType::Boolean, TRUE, false, true)?;
        self.create_variable(FALSE, VarType::Boolean, FALSE, false, true)
    }

    /// Number of live scopes, the global one included
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_variable(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.contains(name))
    }

    /// True if the innermost binding of `name` is a list
    pub fn is_list(&self, name: &str) -> bool {
        self.get(name).map_or(false, Variable::is_list)
    }

    /// The innermost binding of `name`
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Variable> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
            .ok_or_else(|| IvritError::UndefinedVariable(name.to_string()))
    }

    /// The literal value of the innermost binding of `name`
    pub fn value_of(&self, name: &str) -> Result<String> {
        self.get(name)
            .map(|variable| variable.value().literal())
            .ok_or_else(|| IvritError::UndefinedVariable(name.to_string()))
    }

    /// A bound name stands for its value, anything else is taken literally
    fn resolve(&self, text: &str) -> String {
        let text = text.trim();
        match self.get(text) {
            Some(variable) => variable.value().literal(),
            None => text.to_string(),
        }
    }

    /// Create a variable in the innermost scope
    pub fn create_variable(
        &mut self,
        name: &str,
        kind: VarType,
        value: &str,
        is_list: bool,
        constant: bool,
    ) -> Result<()> {
        let value = self.resolve(value);
        let variable = Variable::declare(kind, &value, is_list, constant)?;
        self.innermost().define(name.to_string(), variable);
        Ok(())
    }

    /// Remove the innermost binding of `name`
    pub fn delete_variable(&mut self, name: &str) -> Result<()> {
        let scope = self
            .scopes
            .iter_mut()
            .rev()
            .find(|scope| scope.contains(name))
            .ok_or_else(|| IvritError::UndefinedVariable(name.to_string()))?;
        scope.remove(name)?;
        Ok(())
    }

    /// Assign a new value to the innermost binding of `name`
    pub fn update_variable(&mut self, name: &str, new_value: &str) -> Result<()> {
        let new_value = self.resolve(new_value);
        self.get_mut(name)?.update(name, &new_value)
    }

    /// Replace the element at a 1-based index
    pub fn update_list_element(&mut self, name: &str, index: i64, value: &str) -> Result<()> {
        let value = self.resolve(value);
        let (kind, items) = self.get_mut(name)?.items_mut(name)?;
        let slot = checked_index(index, items.len(), items.len())?;
        items[slot] = kind.parse(&value)?;
        Ok(())
    }

    /// Insert an element so that it ends up at `position`
    pub fn insert_list_element(
        &mut self,
        name: &str,
        position: ListPosition,
        value: &str,
    ) -> Result<()> {
        let value = self.resolve(value);
        let (kind, items) = self.get_mut(name)?.items_mut(name)?;
        let index = match position {
            ListPosition::Index(index) => index,
            ListPosition::End => items.len() as i64 + 1,
        };
        let slot = checked_index(index, items.len() + 1, items.len())?;
        items.insert(slot, kind.parse(&value)?);
        Ok(())
    }

    /// Remove the element at `position`
    pub fn remove_list_element(&mut self, name: &str, position: ListPosition) -> Result<()> {
        let (_, items) = self.get_mut(name)?.items_mut(name)?;
        let index = match position {
            ListPosition::Index(index) => index,
            ListPosition::End => items.len() as i64,
        };
        let slot = checked_index(index, items.len(), items.len())?;
        items.remove(slot);
        Ok(())
    }

    /// Push an empty scope
    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
        debug!("pushed scope {}", self.scopes.len() - 1);
    }

    /// Push a scope binding the parameters of `function` to `args`, positionally
    pub fn push_function_scope(&mut self, function: &str, args: &[String]) -> Result<()> {
        let signature = self
            .functions
            .get(function)
            .ok_or_else(|| IvritError::UndefinedFunction(function.to_string()))?;

        if signature.params.len() != args.len() {
            return Err(IvritError::ArityMismatch {
                name: function.to_string(),
                expected: signature.params.len(),
                got: args.len(),
            });
        }

        let mut scope = Scope::new();
        for (param, arg) in signature.params.iter().zip(args) {
            let value = self.resolve(arg);
            let variable = Variable::declare(param.kind, &value, param.is_list, false)?;
            scope.define(param.name.clone(), variable);
        }

        self.scopes.push(scope);
        debug!(
            "pushed scope {} for '{}' with {} argument(s)",
            self.scopes.len() - 1,
            function,
            args.len()
        );
        Ok(())
    }

    /// Clear and discard the innermost scope. The global scope is never popped.
    pub fn pop_scope(&mut self) -> Result<()> {
        if self.scopes.len() == 1 {
            return Err(IvritError::ReturnFromGlobalScope);
        }
        if let Some(mut scope) = self.scopes.pop() {
            scope.clear();
        }
        debug!("popped scope {}", self.scopes.len());
        Ok(())
    }

    /// Every live binding as `(name, value)`, global scope first
    pub fn bindings(&self) -> Vec<(String, String)> {
        self.scopes
            .iter()
            .flat_map(|scope| scope.sorted())
            .map(|(name, variable)| (name.clone(), variable.to_string()))
            .collect()
    }

    fn innermost(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }
}

impl Default for VariableStore {
    fn default() -> Self {
        Self::new(FunctionTable::new())
    }
}

/// Convert a 1-based index to a slot, accepting `1..=limit`
fn checked_index(index: i64, limit: usize, len: usize) -> Result<usize> {
    if index < 1 || index as usize > limit {
        return Err(IvritError::IndexOutOfRange { index, len });
    }
    Ok(index as usize - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessor::{FunctionSignature, Parameter};
    use pretty_assertions::assert_eq;

    fn store_with_function() -> VariableStore {
        let mut functions = FunctionTable::new();
        functions.insert(
            "סכום".to_string(),
            FunctionSignature {
                name: "סכום".to_string(),
                params: vec![
                    Parameter {
                        name: "a".to_string(),
                        kind: VarType::Integer,
                        is_list: false,
                    },
                    Parameter {
                        name: "ns".to_string(),
                        kind: VarType::Integer,
                        is_list: true,
                    },
                ],
                entry: 4,
            },
        );
        VariableStore::new(functions)
    }

    #[test]
    fn test_declare_then_read() {
        let mut store = VariableStore::default();
        store.create_variable("n", VarType::Integer, "5", false, false).unwrap();
        store.create_variable("f", VarType::Float, "2", false, false).unwrap();
        assert_eq!(store.value_of("n").unwrap(), "5");
        assert_eq!(store.value_of("f").unwrap(), "2.0");
    }

    #[test]
    fn test_constant_update_rejected() {
        let mut store = VariableStore::default();
        store.create_variable("k", VarType::Integer, "3", false, true).unwrap();
        assert_eq!(
            store.update_variable("k", "4"),
            Err(IvritError::ConstantMutation("k".to_string()))
        );
        assert_eq!(store.value_of("k").unwrap(), "3");
    }

    #[test]
    fn test_scope_shadowing() {
        let mut store = VariableStore::default();
        store.create_variable("n", VarType::Integer, "1", false, false).unwrap();
        store.push_scope();
        store.create_variable("n", VarType::Integer, "2", false, false).unwrap();
        assert_eq!(store.value_of("n").unwrap(), "2");

        store.update_variable("n", "3").unwrap();
        assert_eq!(store.value_of("n").unwrap(), "3");

        store.pop_scope().unwrap();
        assert_eq!(store.value_of("n").unwrap(), "1");
    }

    #[test]
    fn test_delete_innermost_only() {
        let mut store = VariableStore::default();
        store.create_variable("n", VarType::Integer, "1", false, false).unwrap();
        store.push_scope();
        store.create_variable("n", VarType::Integer, "2", false, false).unwrap();

        store.delete_variable("n").unwrap();
        assert_eq!(store.value_of("n").unwrap(), "1");
        store.delete_variable("n").unwrap();
        assert!(!store.is_variable("n"));
        assert_eq!(
            store.delete_variable("n"),
            Err(IvritError::UndefinedVariable("n".to_string()))
        );
    }

    #[test]
    fn test_update_from_variable_name() {
        let mut store = VariableStore::default();
        store.create_variable("a", VarType::Integer, "1", false, false).unwrap();
        store.create_variable("b", VarType::Integer, "9", false, false).unwrap();
        store.update_variable("a", "b").unwrap();
        assert_eq!(store.value_of("a").unwrap(), "9");
    }

    #[test]
    fn test_list_element_operations() {
        let mut store = VariableStore::default();
        store
            .create_variable("xs", VarType::Integer, "[10, 20, 30]", true, false)
            .unwrap();
        assert!(store.is_list("xs"));

        store.update_list_element("xs", 2, "25").unwrap();
        store.insert_list_element("xs", ListPosition::Index(1), "5").unwrap();
        store.insert_list_element("xs", ListPosition::End, "40").unwrap();
        assert_eq!(store.value_of("xs").unwrap(), "[5, 10, 25, 30, 40]");

        store.remove_list_element("xs", ListPosition::End).unwrap();
        store.remove_list_element("xs", ListPosition::Index(2)).unwrap();
        assert_eq!(store.value_of("xs").unwrap(), "[5, 25, 30]");

        assert_eq!(
            store.update_list_element("xs", 0, "1"),
            Err(IvritError::IndexOutOfRange { index: 0, len: 3 })
        );
        assert_eq!(
            store.remove_list_element("xs", ListPosition::Index(4)),
            Err(IvritError::IndexOutOfRange { index: 4, len: 3 })
        );
        assert!(store.insert_list_element("xs", ListPosition::Index(4), "1").is_ok());
    }

    #[test]
    fn test_list_operations_on_scalar() {
        let mut store = VariableStore::default();
        store.create_variable("n", VarType::Integer, "1", false, false).unwrap();
        assert_eq!(
            store.insert_list_element("n", ListPosition::End, "2"),
            Err(IvritError::NotAList("n".to_string()))
        );
    }

    #[test]
    fn test_function_scope_binds_parameters() {
        let mut store = store_with_function();
        store
            .create_variable("mine", VarType::Integer, "[1, 2]", true, false)
            .unwrap();
        store
            .push_function_scope("סכום", &["7".to_string(), "mine".to_string()])
            .unwrap();

        assert_eq!(store.depth(), 2);
        assert_eq!(store.value_of("a").unwrap(), "7");
        assert_eq!(store.value_of("ns").unwrap(), "[1, 2]");

        store.pop_scope().unwrap();
        assert!(!store.is_variable("a"));
    }

    #[test]
    fn test_function_scope_checks_arguments() {
        let mut store = store_with_function();
        assert_eq!(
            store.push_function_scope("סכום", &["1".to_string()]),
            Err(IvritError::ArityMismatch {
                name: "סכום".to_string(),
                expected: 2,
                got: 1,
            })
        );
        assert!(store
            .push_function_scope("סכום", &[r#""x""#.to_string(), "[1]".to_string()])
            .is_err());
        assert_eq!(store.depth(), 1);
    }

    #[test]
    fn test_global_scope_cannot_be_popped() {
        let mut store = VariableStore::default();
        assert_eq!(store.pop_scope(), Err(IvritError::ReturnFromGlobalScope));
    }

    #[test]
    fn test_bindings_dump() {
        let mut store = VariableStore::default();
        store.define_truth_constants().unwrap();
        store
            .create_variable("s", VarType::String, r#""שלום""#, false, false)
            .unwrap();
        store.push_scope();
        store.create_variable("n", VarType::Integer, "2", false, false).unwrap();

        assert_eq!(
            store.bindings(),
            vec![
                ("s".to_string(), "שלום".to_string()),
                ("אמת".to_string(), "אמת".to_string()),
                ("שקר".to_string(), "שקר".to_string()),
                ("n".to_string(), "2".to_string()),
            ]
        );
    }
}
