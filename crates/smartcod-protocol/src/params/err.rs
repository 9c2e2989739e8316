use thiserror::Error as TError;

use crate::params::ParamType;

#[derive(Debug, TError, PartialEq, Eq)]
pub enum Error {
    #[error("Signature '{0}' has no '--' between inputs and outputs")]
    MissingSeparator(String),
    #[error("Signature '{0}' has more than one '--'")]
    ExtraSeparator(String),
    #[error("Signature '{0}' has unbalanced parentheses")]
    UnbalancedParentheses(String),
    #[error("Unknown parameter type '{0}'")]
    UnknownType(String),

    #[error("Not enough arguments: expected {expected}, got {got}")]
    InsufficientArguments { expected: usize, got: usize },
    #[error("'{value}' is not a valid {}", .expected.describe())]
    ArgumentParse { value: String, expected: ParamType },
}
