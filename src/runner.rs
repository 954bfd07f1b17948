//! The driver: the crate's one public entry point
//!
//! [`run`] composes the four pipeline stages (sanitize, lex, parse,
//! execute), measures total elapsed wall time, and maps every stage
//! failure into the tagged [`RunError`]. Failures are always returned as
//! values; nothing panics across this surface and the input string is
//! never mutated.
//!
//! Distinct calls share no state, so the driver is freely re-entrant
//! across threads as long as each call owns its source string.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::parser::parse::{ParseError, Parser};
use crate::preprocess;
use std::fmt;
use std::time::Instant;
use tracing::debug;

/// A successful run: the buffered program output, the parser warnings
/// followed by the runtime warnings, and the elapsed wall time in
/// seconds.
///
/// `output` and `warnings` are byte-identical across runs of the same
/// source; `duration` is the only non-deterministic field.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub output: String,
    pub warnings: Vec<String>,
    pub duration: f64,
}

/// A failed run, tagged by which contract the source broke.
#[derive(Debug, Clone)]
pub enum RunError {
    /// The lexer or parser rejected the input
    Syntax {
        message: String,
        line: Option<usize>,
    },
    /// Evaluation failed (division by zero, use before declaration)
    Runtime {
        message: String,
        line: Option<usize>,
    },
    /// A recognised but deliberately unimplemented construct
    Unsupported { message: String },
    /// An invariant violation inside the core
    Internal { message: String },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Syntax {
                message,
                line: Some(line),
            } => write!(f, "Syntax error on line {}: {}", line, message),
            RunError::Syntax {
                message,
                line: None,
            } => write!(f, "Syntax error: {}", message),
            RunError::Runtime {
                message,
                line: Some(line),
            } => write!(f, "Runtime error on line {}: {}", line, message),
            RunError::Runtime {
                message,
                line: None,
            } => write!(f, "Runtime error: {}", message),
            RunError::Unsupported { message } => {
                write!(f, "Unsupported operation: {}", message)
            }
            RunError::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for RunError {}

impl From<ParseError> for RunError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Syntax { message, location } => RunError::Syntax {
                message,
                line: Some(location.line),
            },
            ParseError::Unsupported { message } => RunError::Unsupported { message },
        }
    }
}

impl From<RuntimeError> for RunError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::Internal { message } => RunError::Internal { message },
            other => RunError::Runtime {
                line: other.location().map(|loc| loc.line),
                message: other.message(),
            },
        }
    }
}

/// Run a C source string through the full pipeline.
///
/// On success the result carries the concatenated `printf` output, the
/// warnings of both the parser and the interpreter (in that order), and
/// the elapsed duration. On failure the partial output is discarded and
/// only the error value reaches the caller.
pub fn run(source: &str) -> Result<RunOutput, RunError> {
    let started = Instant::now();

    let sanitized = preprocess::sanitize(source);
    let mut parser = Parser::new(&sanitized)?;
    let program = parser.parse_program()?;
    let mut warnings = parser.take_warnings();
    debug!(statements = program.body.len(), "parsed program");

    let mut interpreter = Interpreter::new();
    interpreter.run(&program.body)?;
    let output = interpreter.take_output();
    warnings.extend(interpreter.take_warnings());

    let duration = started.elapsed().as_secs_f64();
    debug!(
        output_bytes = output.len(),
        warnings = warnings.len(),
        duration_secs = duration,
        "execution finished"
    );

    Ok(RunOutput {
        output,
        warnings,
        duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_world() {
        let result = run("int main(void){ printf(\"Hello, world!\\n\"); return 0; }").unwrap();
        assert_eq!(result.output, "Hello, world!\n");
        assert!(result.warnings.is_empty());
        assert!(result.duration >= 0.0);
    }

    #[test]
    fn test_syntax_error_display() {
        let err = run("int main(void){ int x = ; }").unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.starts_with("Syntax error on line 1:"), "{rendered}");
    }

    #[test]
    fn test_runtime_error_display_carries_line() {
        let err = run("int main(void){\n  int x = 1;\n  x = x / 0;\n}").unwrap_err();
        match &err {
            RunError::Runtime { line, message } => {
                assert_eq!(*line, Some(3));
                assert!(message.contains("Division by zero"));
            }
            other => panic!("Expected runtime error, got {:?}", other),
        }
        assert_eq!(err.to_string(), "Runtime error on line 3: Division by zero");
    }

    #[test]
    fn test_unsupported_operator() {
        let err = run("int main(void){ int x = 1; x < 3; }").unwrap_err();
        assert!(matches!(err, RunError::Unsupported { .. }));
    }

    #[test]
    fn test_warnings_ordered_parser_then_runtime() {
        let source = "int main(void){ printf(\"%d %d\\n\", 1); return 0; } int tail;";
        let result = run(source).unwrap();
        assert_eq!(result.output, "1 %d\n");
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].contains("ignored"));
        assert!(result.warnings[1].contains("printf"));
    }

    #[test]
    fn test_runs_are_deterministic() {
        let source = "int main(void){ int s=0; for(int i=1;i<=10;i+=1){ s+=i; } printf(\"%d\\n\", s); }";
        let first = run(source).unwrap();
        let second = run(source).unwrap();
        assert_eq!(first.output, second.output);
        assert_eq!(first.warnings, second.warnings);
    }

    #[test]
    fn test_hash_lines_shift_reported_lines() {
        // The '#include' line is stripped before lexing, so the error on
        // source line 3 is reported against sanitized line 2.
        let source = "#include <stdio.h>\nint main(void){\n  int x = 1 / 0;\n}";
        let err = run(source).unwrap_err();
        match err {
            RunError::Runtime { line, .. } => assert_eq!(line, Some(2)),
            other => panic!("Expected runtime error, got {:?}", other),
        }
    }
}
