//! Runtime error types for the C runner
//!
//! This module defines [`RuntimeError`], which represents all errors
//! that can occur during program execution (as opposed to parse errors).
//!
//! All runtime errors are fatal: execution stops, buffered output is
//! discarded, and the error propagates to the driver.

use crate::parser::ast::SourceLocation;
use std::fmt;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone)]
pub enum RuntimeError {
    /// Division or modulo with a zero right operand
    DivisionError {
        operation: String,
        location: SourceLocation,
    },

    /// Read of, or assignment to, a name with no declaration in scope
    UndefinedVariable {
        name: String,
        location: SourceLocation,
    },

    /// An invariant violation inside the engine
    Internal { message: String },
}

impl RuntimeError {
    /// The source location of the failing node, if it carries one
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            RuntimeError::DivisionError { location, .. } => Some(location),
            RuntimeError::UndefinedVariable { location, .. } => Some(location),
            RuntimeError::Internal { .. } => None,
        }
    }

    /// The message without its location, for callers that render the
    /// line number themselves
    pub fn message(&self) -> String {
        match self {
            RuntimeError::DivisionError { operation, .. } => operation.clone(),
            RuntimeError::UndefinedVariable { name, .. } => {
                format!("Undefined variable '{}'", name)
            }
            RuntimeError::Internal { message } => message.clone(),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::DivisionError {
                operation,
                location,
            } => {
                write!(f, "{} at line {}", operation, location.line)
            }
            RuntimeError::UndefinedVariable { name, location } => {
                write!(f, "Undefined variable '{}' at line {}", name, location.line)
            }
            RuntimeError::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}
