use crate::error::{IvritError, Result};
use crate::variables::value::{is_integer_literal, list_elements, VarType};

/// The element of a `[...]` literal at a 1-based index
pub fn dereference(list: &str, index: &str) -> Result<String> {
    let elements = list_elements(list).ok_or_else(|| IvritError::NotAList(list.to_string()))?;

    let index = index.trim();
    let index: i64 = is_integer_literal(index)
        .then(|| index.parse().ok())
        .flatten()
        .ok_or_else(|| IvritError::type_mismatch(index, VarType::Integer.name()))?;

    if index < 1 || index as usize > elements.len() {
        return Err(IvritError::IndexOutOfRange {
            index,
            len: elements.len(),
        });
    }
    Ok(elements[index as usize - 1].to_string())
}
