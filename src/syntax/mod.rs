//! Keywords, markers and text scanning shared by every stage

pub mod keywords;
pub mod scanner;

pub use keywords::Command;
